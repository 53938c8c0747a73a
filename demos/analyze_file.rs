//! Example: Analyze a single Standard MIDI File
//!
//! Usage:
//!   cargo run --features midi --example analyze_file -- <file.mid> [profile] [metric]

use pitchscape::io::read_midi;
use pitchscape::{analyze_events, AnalysisConfig};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let mut args = env::args().skip(1);
    let path = args.next().ok_or("Usage: analyze_file <file.mid> [profile] [metric]")?;

    let bytes = std::fs::read(&path)?;
    let stream = read_midi(&bytes)?;

    // Configure analysis
    let mut config = AnalysisConfig {
        tempo_bpm: stream.tempo_bpm,
        use_detected_key_for_spelling: true,
        ..AnalysisConfig::default()
    };
    if let Some(profile) = args.next() {
        config.profile = profile;
    }
    if let Some(metric) = args.next() {
        config.metric = metric.parse()?;
    }

    // Analyze
    let result = analyze_events(&stream.events, stream.ticks_per_beat, &config)?;

    // Print results
    println!("Analysis Results for {}:", path);
    println!("  Key: {}, clarity: {:.3}", result.key.name(), result.key_clarity);
    println!("  Mode polarity: {:+.3}", result.mode_polarity);
    println!("  Slices: {}", result.slices.len());
    println!("  Processing time: {:.2} ms", result.metadata.processing_time_ms);

    println!("  Top keys:");
    for (key, score) in result.key_scores.ranked().iter().take(3) {
        println!("    {:>3}  {:.4}", key.name(), score);
    }

    println!("  Chords:");
    for slice in result.chords.iter().filter(|c| c.chord.is_classified()).take(16) {
        println!(
            "    {:>8.2}  {}",
            slice.offset,
            slice.chord.symbol.as_deref().unwrap_or("-")
        );
    }

    for warning in &result.metadata.warnings {
        println!("  Warning: {}", warning);
    }

    Ok(())
}
