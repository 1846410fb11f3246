// Note names, tonalities and timbre manifests.

use hexaphone_core::*;

#[test]
fn midi_to_hz_matches_a4_and_octave() {
    assert!((midi_to_hz(69.0) - 440.0).abs() < 1e-4);
    assert!((midi_to_hz(81.0) - 880.0).abs() < 1e-3);
    assert!((midi_to_hz(60.0) - 261.6256).abs() < 1e-2);
    assert_eq!(hz_to_midi(440.0), 69);
    assert_eq!(hz_to_midi(261.63), 60);
}

#[test]
fn frequency_and_semitones_invert_each_other() {
    for n in -36..=36 {
        let f = frequency_nth_tone(440.0, n as f32);
        assert!((nth_tone_from_frequency(440.0, f) - n as f32).abs() < 1e-3);
    }
}

#[test]
fn note_names_use_scientific_octaves() {
    assert_eq!(note_name(69, true), "A4");
    assert_eq!(note_name(60, true), "C4");
    assert_eq!(note_name(61, true), "C#4");
    assert_eq!(note_name(61, false), "Db4");
    assert_eq!(note_name(59, true), "B3");
    assert_eq!(note_name(0, true), "C-1");
}

#[test]
fn parse_note_name_handles_accidentals_and_negative_octaves() {
    assert_eq!(parse_note_name("A4"), Some(69));
    assert_eq!(parse_note_name("C#3"), Some(49));
    assert_eq!(parse_note_name("Db3"), Some(49));
    assert_eq!(parse_note_name("C-1"), Some(0));
    assert_eq!(parse_note_name("H2"), None);
    assert_eq!(parse_note_name("A"), None);
}

#[test]
fn pitch_classes_wrap() {
    assert_eq!(pitch_class_from_name("C"), Some(0));
    assert_eq!(pitch_class_from_name("Cb"), Some(11));
    assert_eq!(pitch_class_from_name("B#"), Some(0));
    assert_eq!(pitch_class_from_name("f#"), Some(6));
    assert_eq!(pitch_class_from_name("X"), None);
    assert_eq!(pitch_class_from_name(""), None);
}

#[test]
fn tonality_parses_and_displays() {
    let t: Tonality = "Eb major".parse().expect("tonality");
    assert_eq!(t.root(), "Eb");
    assert_eq!(t.pitch_class(), 3);
    assert_eq!(t.mode(), Mode::Major);
    assert_eq!(t.to_string(), "Eb major");

    let t: Tonality = "f# MINOR".parse().expect("tonality");
    assert_eq!(t.to_string(), "F# minor");

    assert!("C".parse::<Tonality>().is_err());
    assert!("C dorian".parse::<Tonality>().is_err());
    assert!("Q major".parse::<Tonality>().is_err());
    assert!("C major extra".parse::<Tonality>().is_err());
}

#[test]
fn tonality_membership_follows_the_scale() {
    let c_major = Tonality::new("C", Mode::Major).expect("C major");
    let a_minor = Tonality::new("A", Mode::Minor).expect("A minor");
    for midi in 48..72 {
        // relative keys share their notes
        assert_eq!(c_major.contains_midi(midi), a_minor.contains_midi(midi));
    }
    assert!(c_major.contains(440.0));
    assert!(!c_major.contains(466.16));
    assert!(is_in_key(466.16, None));
    assert!(!is_in_key(466.16, Some(&c_major)));
}

#[test]
fn tonality_transforms_keep_the_other_half() {
    let g_major = Tonality::new("G", Mode::Major).expect("G major");
    assert_eq!(g_major.with_mode(Mode::Minor).to_string(), "G minor");
    assert_eq!(
        g_major.with_root("Bb").map(|t| t.to_string()),
        Some("Bb major".to_string())
    );
    assert!(g_major.with_root("Z").is_none());
}

#[test]
fn twenty_four_distinct_tonalities_are_offered() {
    let all = Tonality::all();
    assert_eq!(all.len(), 24);
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            assert!(
                a.pitch_class() != b.pitch_class() || a.mode() != b.mode(),
                "{a} duplicates {b}"
            );
        }
    }
    assert_eq!(all[0].to_string(), "C major");
    assert_eq!(all[12].to_string(), "A minor");
}

#[test]
fn key_labels_cycle_and_parse() {
    assert_eq!(KeyLabels::default(), KeyLabels::Major);
    let mut l = KeyLabels::Number;
    for _ in 0..KeyLabels::ALL.len() {
        l = l.next();
    }
    assert_eq!(l, KeyLabels::Number);
    assert_eq!("minor".parse::<KeyLabels>(), Ok(KeyLabels::Minor));
    assert!("roman".parse::<KeyLabels>().is_err());
    assert_eq!(KeyLabels::Number.label(880.0), "12");
}

#[test]
fn timbres_parse_case_insensitively() {
    assert_eq!("Piano".parse::<Timbre>(), Ok(Timbre::Piano));
    assert_eq!(" harp ".parse::<Timbre>(), Ok(Timbre::Harp));
    assert!("kazoo".parse::<Timbre>().is_err());
    for t in Timbre::ALL {
        assert_eq!(t.to_string().parse::<Timbre>(), Ok(t));
    }
}

#[test]
fn only_basic_is_synthesized() {
    assert!(Timbre::Basic.is_synthesized());
    assert!(Timbre::Basic.samples().is_empty());
    for t in &Timbre::ALL[1..] {
        assert!(!t.is_synthesized());
        assert!(!t.samples().is_empty(), "{t} has no samples");
    }
}

#[test]
fn sample_manifests_name_real_notes() {
    for t in Timbre::ALL {
        for s in t.samples() {
            let f = s.frequency_hz().unwrap_or_else(|| panic!("{t}: bad note {}", s.note));
            assert!(f > 20.0 && f < 5000.0, "{t}: {} at {f} Hz", s.note);
        }
    }
}

#[test]
fn sample_urls_live_under_the_timbre_folder() {
    let s = Timbre::Piano.samples()[0];
    assert_eq!(Timbre::Piano.sample_url(&s), format!("/assets/samples/piano/{}", s.file));
}
