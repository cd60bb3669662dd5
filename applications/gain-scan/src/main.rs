/// gain-scan - ReplayGain scanner for audio files
use clap::Parser;
use serde::Serialize;
use soul_analyzer::{AnalysisOutcome, AnalysisPipeline, AnalyzerConfig};
use soul_core::{ReplayGain, Track};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod decode;

#[derive(Parser)]
#[command(name = "gain-scan")]
#[command(about = "Analyze audio files and report their ReplayGain", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SOUL_ANALYZER_CONFIG")]
    config: Option<PathBuf>,

    /// ReplayGain analyzer version to run (overrides the configuration)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
    rg_version: Option<u8>,

    /// Print one JSON object per file instead of text
    #[arg(long)]
    json: bool,

    /// Audio files to analyze
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Serialize)]
struct ScanReport<'a> {
    location: &'a Path,
    gain_db: Option<f64>,
    ratio: f64,
    outcome: AnalysisOutcome,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gain_scan=info,soul_analyzer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AnalyzerConfig::load(cli.config.as_deref())?;
    if let Some(version) = cli.rg_version {
        config.replaygain.analyzer_version = version;
    }
    tracing::debug!("Analyzer settings: {:?}", config.replaygain);

    let mut pipeline = AnalysisPipeline::from_config(&config);
    let mut failures = 0usize;

    for path in &cli.files {
        match scan_file(&mut pipeline, path) {
            Ok((track, outcome)) => print_report(&track, outcome, cli.json)?,
            Err(e) => {
                tracing::warn!("Failed to analyze {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} files could not be analyzed", failures, cli.files.len());
    }
    Ok(())
}

fn scan_file(
    pipeline: &mut AnalysisPipeline,
    path: &Path,
) -> soul_core::Result<(Track, AnalysisOutcome)> {
    let audio = decode::decode_stereo(path)?;
    tracing::info!(
        "Decoded {} ({} frames at {})",
        path.display(),
        audio.frames(),
        audio.sample_rate
    );

    let mut track = Track::from_path(path);
    let outcome = pipeline.analyze(&mut track, audio.sample_rate, &audio.samples);
    Ok((track, outcome))
}

fn print_report(track: &Track, outcome: AnalysisOutcome, json: bool) -> anyhow::Result<()> {
    let gain = track.replay_gain();

    if json {
        let report = ScanReport {
            location: track.location(),
            gain_db: gain.ratio_db(),
            ratio: gain.ratio(),
            outcome,
        };
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    if gain.has_ratio() {
        println!(
            "{}: {} (ratio {:.6})",
            track.location().display(),
            ReplayGain::ratio_to_string(gain.ratio()),
            gain.ratio()
        );
    } else {
        println!("{}: not analyzed", track.location().display());
    }
    Ok(())
}
