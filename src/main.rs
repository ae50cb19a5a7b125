use std::{fs, path::PathBuf, process::ExitCode};

use clap::Parser;
use photo_washer::{WashConfig, Washer, batch::collect_images, report::JsonReport};

/// Produce near-identical copies of photos with fresh pixels and metadata.
#[derive(Parser, Debug)]
#[command(name = "photo-washer", version)]
struct Cli {
    /// Image files or directories to wash (.jpg, .jpeg, .png, .gif)
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Directory washed copies are written to
    #[arg(short, long, default_value = "washed_photos")]
    output_dir: PathBuf,

    /// Process files one at a time
    #[arg(long)]
    sequential: bool,

    /// Base seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Fraction of pixels to perturb per frame
    #[arg(long, default_value_t = 0.01)]
    ratio: f64,

    /// JPEG encoding quality
    #[arg(long, default_value_t = 95)]
    quality: u8,

    /// Write a JSON summary of the run to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = WashConfig {
        perturb_ratio: cli.ratio,
        jpeg_quality: cli.quality,
        parallel: !cli.sequential,
        ..WashConfig::default()
    };
    if let Err(e) = config.validate() {
        eprintln!("{e}");
        return ExitCode::from(2);
    }

    let inputs = collect_images(&cli.paths);
    if inputs.is_empty() {
        eprintln!("No supported images found");
        return ExitCode::FAILURE;
    }

    let washer = Washer::new().with_config(config);
    let summary = match washer.wash_batch(&inputs, &cli.output_dir, cli.seed) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Cannot write to {}: {e}", cli.output_dir.display());
            return ExitCode::FAILURE;
        }
    };

    for entry in &summary.entries {
        println!("{}", entry.result);
    }
    println!("Done: {} of {} file(s) washed", summary.succeeded(), summary.total());

    if let Some(path) = cli.report {
        let written = JsonReport::from(&summary)
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&path, json).map_err(|e| e.to_string()));
        if let Err(e) = written {
            eprintln!("Failed to write report {}: {e}", path.display());
        }
    }

    ExitCode::SUCCESS
}
