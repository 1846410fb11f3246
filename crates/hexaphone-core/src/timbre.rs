//! Selectable sound characters and the sample sets backing them.

use crate::constants::SAMPLES_BASE_URL;
use crate::error::ParseError;
use crate::music::{midi_to_hz, parse_note_name};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Timbre {
    /// Synthesized voice; always available.
    #[default]
    Basic,
    Piano,
    Violin,
    Saxophone,
    Harp,
}

/// One recorded sample of a timbre.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleFile {
    pub note: &'static str,
    pub file: &'static str,
}

const fn sample(note: &'static str, file: &'static str) -> SampleFile {
    SampleFile { note, file }
}

const PIANO: &[SampleFile] = &[
    sample("A1", "A1.ogg"),
    sample("A2", "A2.ogg"),
    sample("A3", "A3.ogg"),
    sample("A4", "A4.ogg"),
    sample("A5", "A5.ogg"),
    sample("A6", "A6.ogg"),
    sample("C1", "C1.ogg"),
    sample("C2", "C2.ogg"),
    sample("C3", "C3.ogg"),
    sample("C4", "C4.ogg"),
    sample("C5", "C5.ogg"),
    sample("C6", "C6.ogg"),
    sample("C7", "C7.ogg"),
];

const VIOLIN: &[SampleFile] = &[
    sample("A3", "A3.ogg"),
    sample("A4", "A4.ogg"),
    sample("A5", "A5.ogg"),
    sample("A6", "A6.ogg"),
    sample("C4", "C4.ogg"),
    sample("C5", "C5.ogg"),
    sample("C6", "C6.ogg"),
    sample("C7", "C7.ogg"),
];

const SAXOPHONE: &[SampleFile] = &[
    sample("A3", "A3.ogg"),
    sample("A4", "A4.ogg"),
    sample("C3", "C3.ogg"),
    sample("C4", "C4.ogg"),
];

const HARP: &[SampleFile] = &[
    sample("A2", "A2.ogg"),
    sample("A4", "A4.ogg"),
    sample("A6", "A6.ogg"),
    sample("C3", "C3.ogg"),
    sample("C5", "C5.ogg"),
];

impl Timbre {
    pub const ALL: [Timbre; 5] = [
        Timbre::Basic,
        Timbre::Piano,
        Timbre::Violin,
        Timbre::Saxophone,
        Timbre::Harp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Timbre::Basic => "basic",
            Timbre::Piano => "piano",
            Timbre::Violin => "violin",
            Timbre::Saxophone => "saxophone",
            Timbre::Harp => "harp",
        }
    }

    pub fn is_synthesized(self) -> bool {
        self == Timbre::Basic
    }

    /// Recorded samples for this timbre; empty for the synthesized voice.
    pub fn samples(self) -> &'static [SampleFile] {
        match self {
            Timbre::Basic => &[],
            Timbre::Piano => PIANO,
            Timbre::Violin => VIOLIN,
            Timbre::Saxophone => SAXOPHONE,
            Timbre::Harp => HARP,
        }
    }

    /// URL of a sample file relative to the page.
    pub fn sample_url(self, sample: &SampleFile) -> String {
        format!("{}{}/{}", SAMPLES_BASE_URL, self.name(), sample.file)
    }
}

impl SampleFile {
    pub fn midi(&self) -> Option<i32> {
        parse_note_name(self.note)
    }

    pub fn frequency_hz(&self) -> Option<f32> {
        self.midi().map(|m| midi_to_hz(m as f32))
    }
}

impl fmt::Display for Timbre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Timbre {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Timbre::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseError::new("timbre", s))
    }
}
