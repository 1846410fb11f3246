use crate::constants::{A4_HZ, A4_MIDI};
use crate::error::ParseError;
use std::fmt;
use std::str::FromStr;

/// Diatonic modes (relative semitone degrees)
pub const IONIAN: &[i32] = &[0, 2, 4, 5, 7, 9, 11, 12]; // major
pub const AEOLIAN: &[i32] = &[0, 2, 3, 5, 7, 8, 10, 12]; // natural minor

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

#[inline]
pub fn frequency_nth_tone(base_hz: f32, n: f32) -> f32 {
    base_hz * 2.0_f32.powf(n / 12.0)
}

#[inline]
pub fn nth_tone_from_frequency(base_hz: f32, frequency_hz: f32) -> f32 {
    12.0 * (frequency_hz / base_hz).log2()
}

pub fn midi_to_hz(midi: f32) -> f32 {
    frequency_nth_tone(A4_HZ, midi - A4_MIDI as f32)
}

/// Fractional MIDI note number; useful for resampling.
#[inline]
pub fn hz_to_midi_f(frequency_hz: f32) -> f32 {
    A4_MIDI as f32 + nth_tone_from_frequency(A4_HZ, frequency_hz)
}

/// Nearest MIDI note number.
#[inline]
pub fn hz_to_midi(frequency_hz: f32) -> i32 {
    hz_to_midi_f(frequency_hz).round() as i32
}

/// Pitch class (0 = C) of a spelled note such as `"F#"` or `"Bb"`.
pub fn pitch_class_from_name(name: &str) -> Option<i32> {
    let mut chars = name.chars();
    let base = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let mut pc: i32 = base;
    for accidental in chars {
        match accidental {
            '#' => pc += 1,
            'b' => pc -= 1,
            _ => return None,
        }
    }
    Some(pc.rem_euclid(12))
}

/// Note name with octave, e.g. `C#4` (sharps) or `Db4` (flats). MIDI 60 is C4.
pub fn note_name(midi: i32, sharps: bool) -> String {
    let names = if sharps { &SHARP_NAMES } else { &FLAT_NAMES };
    let pc = midi.rem_euclid(12) as usize;
    let octave = midi.div_euclid(12) - 1;
    format!("{}{}", names[pc], octave)
}

/// Parses names like `A4`, `C#3` or `Bb-1` into a MIDI note number.
pub fn parse_note_name(name: &str) -> Option<i32> {
    let split = name.find(|c: char| c.is_ascii_digit() || c == '-')?;
    let (pitch, octave) = name.split_at(split);
    let pc = pitch_class_from_name(pitch)?;
    let octave: i32 = octave.parse().ok()?;
    Some((octave + 1) * 12 + pc)
}

/// How cells are labelled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyLabels {
    /// Semitones relative to A4.
    Number,
    /// Note names spelled with sharps.
    #[default]
    Major,
    /// Note names spelled with flats.
    Minor,
}

impl KeyLabels {
    pub const ALL: [KeyLabels; 3] = [KeyLabels::Number, KeyLabels::Major, KeyLabels::Minor];

    pub fn label(self, frequency_hz: f32) -> String {
        match self {
            KeyLabels::Number => {
                format!("{}", nth_tone_from_frequency(A4_HZ, frequency_hz).round() as i32)
            }
            KeyLabels::Major => note_name(hz_to_midi(frequency_hz), true),
            KeyLabels::Minor => note_name(hz_to_midi(frequency_hz), false),
        }
    }

    pub fn next(self) -> Self {
        match self {
            KeyLabels::Number => KeyLabels::Major,
            KeyLabels::Major => KeyLabels::Minor,
            KeyLabels::Minor => KeyLabels::Number,
        }
    }
}

impl FromStr for KeyLabels {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "number" => Ok(KeyLabels::Number),
            "major" => Ok(KeyLabels::Major),
            "minor" => Ok(KeyLabels::Minor),
            _ => Err(ParseError::new("key labels", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    pub fn degrees(self) -> &'static [i32] {
        match self {
            Mode::Major => IONIAN,
            Mode::Minor => AEOLIAN,
        }
    }
}

/// A named major or minor scale used to filter which cells are playable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tonality {
    root: &'static str,
    pitch_class: i32,
    mode: Mode,
}

/// Roots in circle-of-fifths order, spelled the conventional way.
const MAJOR_ROOTS: [&str; 12] = [
    "C", "G", "D", "A", "E", "B", "F#", "Db", "Ab", "Eb", "Bb", "F",
];
const MINOR_ROOTS: [&str; 12] = [
    "A", "E", "B", "F#", "C#", "G#", "Eb", "Bb", "F", "C", "G", "D",
];

impl Tonality {
    /// Builds a tonality from a spelled root; returns `None` for unknown roots.
    pub fn new(root: &str, mode: Mode) -> Option<Self> {
        let pitch_class = pitch_class_from_name(root)?;
        // keep a 'static spelling so the value stays Copy
        let root = SHARP_NAMES
            .iter()
            .chain(FLAT_NAMES.iter())
            .find(|n| n.eq_ignore_ascii_case(root))
            .copied()?;
        Some(Self {
            root,
            pitch_class,
            mode,
        })
    }

    /// The 24 tonalities offered to the player.
    pub fn all() -> Vec<Tonality> {
        let majors = MAJOR_ROOTS.iter().filter_map(|r| Tonality::new(r, Mode::Major));
        let minors = MINOR_ROOTS.iter().filter_map(|r| Tonality::new(r, Mode::Minor));
        majors.chain(minors).collect()
    }

    pub fn root(&self) -> &'static str {
        self.root
    }

    pub fn pitch_class(&self) -> i32 {
        self.pitch_class
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Same mode, different root.
    pub fn with_root(&self, root: &str) -> Option<Self> {
        Tonality::new(root, self.mode)
    }

    pub fn with_mode(&self, mode: Mode) -> Self {
        Self { mode, ..*self }
    }

    pub fn contains_midi(&self, midi: i32) -> bool {
        let degree = (midi - self.pitch_class).rem_euclid(12);
        self.mode.degrees().contains(&degree)
    }

    pub fn contains(&self, frequency_hz: f32) -> bool {
        self.contains_midi(hz_to_midi(frequency_hz))
    }
}

impl fmt::Display for Tonality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            Mode::Major => "major",
            Mode::Minor => "minor",
        };
        write!(f, "{} {}", self.root, mode)
    }
}

impl FromStr for Tonality {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(root), Some(mode), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ParseError::new("tonality", s));
        };
        let mode = match mode.to_ascii_lowercase().as_str() {
            "major" => Mode::Major,
            "minor" => Mode::Minor,
            _ => return Err(ParseError::new("tonality", s)),
        };
        Tonality::new(root, mode).ok_or_else(|| ParseError::new("tonality", s))
    }
}

/// Whether a pitch survives the (optional) tonality filter.
#[inline]
pub fn is_in_key(frequency_hz: f32, tonality: Option<&Tonality>) -> bool {
    tonality.map_or(true, |t| t.contains(frequency_hz))
}
