//! Integration tests for the symbolic analysis engine

use pitchscape::features::chord::{pitch_salience, SalienceWeights};
use pitchscape::features::distribution::{pcd_from_notes, pcd_from_slices, Weighting};
use pitchscape::features::key::{key_clarity, KeyFinder, ProfileBank, SimilarityMetric};
use pitchscape::preprocessing::{slice_events, slices_to_events};
use pitchscape::{
    analyze_events, classify, mode_polarity, pair_notes, score_keys, AnalysisConfig, AnalysisError,
    AnalysisFlag, Key, Slicer, TimeUnit, TimedEvent,
};

const TPB: u32 = 480;

/// Block chords, each held for `length` ticks, back to back
fn block_chords(chords: &[&[u8]], length: u64) -> Vec<TimedEvent> {
    let mut events = Vec::new();
    for chord in chords {
        events.extend(chord.iter().map(|&p| TimedEvent::note_on(p, 90, 0)));
        for (i, &p) in chord.iter().enumerate() {
            events.push(TimedEvent::note_off(p, if i == 0 { length } else { 0 }));
        }
    }
    events
}

/// Overlapping melody over a sustained bass, with controller noise
fn melody_over_pedal() -> Vec<TimedEvent> {
    vec![
        TimedEvent::note_on(48, 80, 0),
        TimedEvent::note_on(64, 90, 0),
        TimedEvent::other(120),
        TimedEvent::note_on(67, 90, 120),
        TimedEvent::note_off(64, 120),
        TimedEvent::note_on(72, 90, 120),
        TimedEvent::note_off(67, 0),
        TimedEvent::note_off(72, 480),
        TimedEvent::note_off(48, 0),
    ]
}

#[test]
fn test_overlapping_notes_slice_correctly() {
    let slices: Vec<_> = Slicer::new(&melody_over_pedal()).collect();
    let sets: Vec<Vec<i32>> = slices.iter().map(|s| s.pitch_list()).collect();
    assert_eq!(
        sets,
        vec![vec![48, 64], vec![48, 64, 67], vec![48, 67], vec![48, 72]],
        "controller event must not split the first slice"
    );
    let durations: Vec<f64> = slices.iter().map(|s| s.duration).collect();
    assert_eq!(durations, vec![240.0, 120.0, 120.0, 480.0]);
}

#[test]
fn test_reslicing_is_idempotent() {
    let slices = slice_events(&melody_over_pedal(), TPB, TimeUnit::Ticks, 120.0).unwrap();
    let replayed: Vec<_> = Slicer::new(&slices_to_events(&slices)).collect();
    assert_eq!(replayed, slices);
}

#[test]
fn test_slice_and_note_distributions_agree_on_block_chords() {
    let events = block_chords(&[&[60, 64, 67], &[62, 65, 69]], 480);
    let slices: Vec<_> = Slicer::new(&events).collect();
    let notes = pair_notes(&events);

    let from_slices = pcd_from_slices(&slices, Weighting::Duration).unwrap();
    let from_notes = pcd_from_notes(&notes, Weighting::Duration).unwrap();
    for pc in 0..12 {
        assert!((from_slices[pc] - from_notes[pc]).abs() < 1e-12, "pitch class {}", pc);
    }
    let total: f64 = from_slices.values().iter().sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn test_concrete_chord_scenarios() {
    let major = classify(&[60, 64, 67], "Cmaj").unwrap();
    assert_eq!(major.quality.as_deref(), Some("maj"));
    assert_eq!(major.root, Some(60));
    assert_eq!(major.bass, Some(60));
    assert_eq!(major.symbol.as_deref(), Some("Cmaj"));

    let minor = classify(&[60, 63, 67], "Cmaj").unwrap();
    assert_eq!(minor.quality.as_deref(), Some("min"));
    assert_eq!(minor.symbol.as_deref(), Some("Cmin"));

    let dyad = classify(&[60, 67], "Cmaj").unwrap();
    assert!(dyad.quality.is_none() && dyad.root.is_none() && dyad.symbol.is_none());
}

#[test]
fn test_salience_root_differs_from_bass_root() {
    // Second inversion of F major: lowest note C
    let chord = [60, 65, 69];
    let by_bass = classify(&chord, "Fmaj").unwrap();
    assert_eq!(by_bass.root_pitch_class, Some(0));

    let salience = pitch_salience(&chord, SalienceWeights::Parncutt1993).unwrap();
    assert_eq!(salience.root_pitch_class, Some(5));
    assert_eq!(salience.root, Some(65));
}

#[test]
fn test_key_finding_scenarios() {
    let kk = ProfileBank::builtin().get("KrumhanslKessler").unwrap().profile().clone();

    for metric in ["pearson", "spearman"] {
        let scores = score_keys(&kk.rotation(Key::Minor(7)), "KrumhanslKessler", metric).unwrap();
        assert_eq!(scores.best_key().map(|(k, _)| k), Some(Key::Minor(7)), "metric {}", metric);
    }

    let major = mode_polarity(&kk.rotation(Key::Major(0)), "KrumhanslKessler", "best", "pearson").unwrap();
    let minor = mode_polarity(&kk.rotation(Key::Minor(0)), "KrumhanslKessler", "best", "pearson").unwrap();
    assert!(major > 0.0 && minor < 0.0);

    let mut spike = [0.0; 12];
    spike[0] = 1.0;
    let ranked = score_keys(&spike, "KrumhanslKessler", "cosine").unwrap().ranked();
    assert_eq!(ranked[0].0.tonic(), 0);
    assert_eq!(ranked[1].0.tonic(), 0);
}

#[test]
fn test_custom_profile_table() {
    let table = "name,major,minor\n\
                 ,scale degrees\n\
                 Triads,1,0,0,0,1,0,0,1,0,0,0,0,1,0,0,1,0,0,0,1,0,0,0,0\n";
    let bank = ProfileBank::from_csv(table).unwrap();
    let finder = KeyFinder::with_bank(&bank);

    let mut d_minor = [0.0; 12];
    for pc in [2, 5, 9] {
        d_minor[pc] = 1.0 / 3.0;
    }
    let scores = finder.score_keys(&d_minor, "Triads", SimilarityMetric::Pearson).unwrap();
    assert_eq!(scores.best_key().map(|(k, _)| k), Some(Key::Minor(2)));
    let clarity = key_clarity(&scores);
    assert!(clarity > 0.0 && clarity <= 1.0, "clarity {} out of range", clarity);
}

#[test]
fn test_full_pipeline_in_seconds() {
    // ii - V - I in G major
    let events = block_chords(&[&[57, 60, 64], &[62, 66, 69, 72], &[55, 59, 62], &[55, 59, 62, 67]], 960);
    let config = AnalysisConfig {
        time_unit: TimeUnit::Seconds,
        tempo_bpm: 60.0,
        key_context: "Gmaj".to_string(),
        ..AnalysisConfig::default()
    };
    let result = analyze_events(&events, TPB, &config).unwrap();

    // The last two chords share a pitch-class set but not a pitch set
    assert_eq!(result.slices.len(), 4);
    assert!((result.slices[0].duration - 2.0).abs() < 1e-12, "two beats at 60 BPM");
    assert!((result.chords[3].offset - 6.0).abs() < 1e-12);

    let symbols: Vec<Option<&str>> = result.chords.iter().map(|c| c.chord.symbol.as_deref()).collect();
    assert_eq!(symbols, vec![Some("Amin"), Some("D7"), Some("Gmaj"), Some("Gmaj")]);

    assert_eq!(result.key, Key::Major(7));
    assert!(result.key_clarity > 0.0);
    assert_eq!(result.metadata.slice_count, 4);
    assert_eq!(result.metadata.profile, "KrumhanslKessler");
    assert_eq!(result.metadata.metric, "pearson");

    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"D7\""));
}

#[test]
fn test_pipeline_flags_unclassified_harmony() {
    // Alternating dyads never carry a chord symbol
    let events = block_chords(&[&[60, 67], &[62, 69], &[64, 71], &[65, 72], &[60, 67]], 480);
    let result = analyze_events(&events, TPB, &AnalysisConfig::default()).unwrap();
    assert!(result.chords.iter().all(|c| !c.chord.is_classified()));
    assert!(result.metadata.flags.contains(&AnalysisFlag::MostlyUnclassifiedChords));
    assert!(!result.metadata.warnings.is_empty());
}

#[test]
fn test_twelve_tone_row_yields_flagged_result() {
    // Equal time on every pitch class: no key correlates with the distribution
    let row: [&[u8]; 12] = [
        &[64], &[65], &[67], &[61], &[63], &[68], &[69], &[59], &[60], &[66], &[62], &[70],
    ];
    let result = analyze_events(&block_chords(&row, 480), TPB, &AnalysisConfig::default()).unwrap();

    assert_eq!(result.slices.len(), 12);
    assert_eq!(result.key_scores.len(), 24);
    assert!(result.key_scores.iter().all(|(_, score)| *score == 0.0));
    assert_eq!(result.key, Key::Major(0));
    assert_eq!(result.key_clarity, 0.0);
    for flag in [
        AnalysisFlag::WeakTonality,
        AnalysisFlag::AmbiguousMode,
        AnalysisFlag::MostlyUnclassifiedChords,
    ] {
        assert!(result.metadata.flags.contains(&flag), "missing {:?}", flag);
    }
}

#[test]
fn test_pipeline_velocity_weighting() {
    let mut events = block_chords(&[&[60, 64, 67]], 480);
    events.extend(block_chords(&[&[65, 69, 72]], 480).into_iter().map(|mut e| {
        if e.velocity > 0 {
            e.velocity = 20;
        }
        e
    }));
    let config = AnalysisConfig {
        weighting: Weighting::Velocity,
        ..AnalysisConfig::default()
    };
    let result = analyze_events(&events, TPB, &config).unwrap();
    assert!(result.pcd[4] > result.pcd[9], "loud E outweighs quiet A");
}

#[test]
fn test_invalid_arguments_are_rejected() {
    let pcd = [0.1, 0.0, 0.2, 0.0, 0.2, 0.1, 0.0, 0.3, 0.0, 0.1, 0.0, 0.0];
    assert!(matches!(
        score_keys(&pcd, "Nonexistent", "pearson"),
        Err(AnalysisError::InvalidProfile(_))
    ));
    assert!(matches!(
        score_keys(&pcd, "Temperley", "chebyshev"),
        Err(AnalysisError::InvalidMetric(_))
    ));
    assert!(matches!(
        mode_polarity(&pcd, "Temperley", "diff", "pearson"),
        Err(AnalysisError::InvalidMethod(_))
    ));
    assert!(matches!(
        score_keys(&pcd[..10], "Temperley", "pearson"),
        Err(AnalysisError::InvalidInput(_))
    ));

    let config = AnalysisConfig {
        profile: "Unknown".to_string(),
        ..AnalysisConfig::default()
    };
    let events = block_chords(&[&[60, 64, 67]], 480);
    assert!(matches!(
        analyze_events(&events, TPB, &config),
        Err(AnalysisError::InvalidProfile(_))
    ));
}
