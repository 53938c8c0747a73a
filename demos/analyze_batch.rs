//! Example: Analyze multiple MIDI files in parallel
//!
//! Usage:
//!   cargo run --release --features midi --example analyze_batch -- [--jobs N] [--json] <file1> <file2> ...
//!
//! Notes:
//! - Parallelism is across files (batch-level). Each file analysis is still single-threaded.
//! - Default workers: (available CPU threads - 1), keeping one core free for the system.

use pitchscape::io::read_midi;
use pitchscape::{analyze_events, AnalysisConfig, AnalysisResult};
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::time::Instant;

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

#[derive(Serialize)]
struct ItemOut {
    path: String,
    ok: bool,
    key: Option<String>,
    key_clarity: Option<f64>,
    mode_polarity: Option<f64>,
    slices: usize,
    processing_ms: f32,
    error: Option<String>,
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn analyze_path(path: &str, config: &AnalysisConfig) -> Result<AnalysisResult, BoxError> {
    let bytes = std::fs::read(path)?;
    let stream = read_midi(&bytes)?;
    let config = AnalysisConfig {
        tempo_bpm: stream.tempo_bpm,
        ..config.clone()
    };
    Ok(analyze_events(&stream.events, stream.ticks_per_beat, &config)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut paths: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--jobs" => {
                let v = args
                    .first()
                    .ok_or("--jobs requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
                jobs = Some(std::cmp::max(1, v));
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: analyze_batch [--jobs N] [--json] <file1> <file2> ...\n\
                     \n\
                     --jobs N   Parallel workers (default: CPU-1)\n\
                     --json     Emit one JSON object per line (JSONL)\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.is_empty() {
        eprintln!("ERROR: Provide at least one MIDI file path. Use --help for usage.");
        std::process::exit(2);
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} files, jobs={}", paths.len(), jobs);

    let config = AnalysisConfig::default();
    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let outs: Vec<ItemOut> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| match analyze_path(path, &config) {
                Ok(res) => ItemOut {
                    path: path.clone(),
                    ok: true,
                    key: Some(res.key.name()),
                    key_clarity: Some(res.key_clarity),
                    mode_polarity: Some(res.mode_polarity),
                    slices: res.slices.len(),
                    processing_ms: res.metadata.processing_time_ms,
                    error: None,
                },
                Err(e) => ItemOut {
                    path: path.clone(),
                    ok: false,
                    key: None,
                    key_clarity: None,
                    mode_polarity: None,
                    slices: 0,
                    processing_ms: 0.0,
                    error: Some(e.to_string()),
                },
            })
            .collect()
    });

    let failed = outs.iter().filter(|o| !o.ok).count();
    for o in &outs {
        if json {
            println!("{}", serde_json::to_string(o)?);
        } else if o.ok {
            println!(
                "{}\t{}\tclarity={:.3}\tpolarity={:+.3}\tslices={}",
                o.path,
                o.key.as_deref().unwrap_or("?"),
                o.key_clarity.unwrap_or(0.0),
                o.mode_polarity.unwrap_or(0.0),
                o.slices
            );
        } else {
            println!("{}\tERROR\t{}", o.path, o.error.as_deref().unwrap_or(""));
        }
    }

    eprintln!(
        "Done: {} ok, {} failed in {:.2}s",
        outs.len() - failed,
        failed,
        t0.elapsed().as_secs_f32()
    );
    Ok(())
}
