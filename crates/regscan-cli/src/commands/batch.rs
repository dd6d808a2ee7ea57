//! Batch command - scan multiple photos with one scanner.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use regscan_core::VehicleScan;

use super::load_config;
use super::scan::build_scanner;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file JSON results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Skip the plate-region pre-crop
    #[arg(long)]
    no_crop: bool,
}

/// Result of scanning a single file.
struct ScanOutcome {
    path: PathBuf,
    scan: Option<VehicleScan>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(
                ext.to_lowercase().as_str(),
                "png" | "jpg" | "jpeg" | "webp" | "tiff" | "tif" | "bmp"
            )
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching image files found for pattern: {}", args.input);
    }

    println!("{} Found {} files to scan", style("ℹ").blue(), files.len());

    if let Some(output_dir) = &args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    // One scanner for the whole batch; the engine handle is reused
    let scanner = build_scanner(&config, args.no_crop)?;

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        let file_start = Instant::now();
        let outcome = fs::read(&path)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| Ok(scanner.scan(&bytes)?));
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match outcome {
            Ok(scan) => results.push(ScanOutcome {
                path,
                scan: Some(scan),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let message = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to scan {}: {}", path.display(), message);
                    results.push(ScanOutcome {
                        path,
                        scan: None,
                        error: Some(message),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to scan {}: {}", path.display(), message);
                    anyhow::bail!("Scan failed: {}", message);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.scan.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(scan) = &result.scan {
                let stem = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("scan");
                let output_path = output_dir.join(format!("{stem}.json"));
                fs::write(&output_path, serde_json::to_string_pretty(scan)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Scanned {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn write_summary(path: &PathBuf, results: &[ScanOutcome]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "file",
        "status",
        "plate",
        "odometer",
        "vin",
        "time_ms",
        "error",
    ])?;

    for result in results {
        let file = result.path.display().to_string();
        let time = result.processing_time_ms.to_string();
        match (&result.scan, &result.error) {
            (Some(scan), _) => writer.write_record([
                file.as_str(),
                "ok",
                scan.plate.as_deref().unwrap_or(""),
                &scan
                    .odometer
                    .as_ref()
                    .map(|r| r.to_string())
                    .unwrap_or_default(),
                scan.vin.as_deref().unwrap_or(""),
                &time,
                "",
            ])?,
            (None, error) => writer.write_record([
                file.as_str(),
                "failed",
                "",
                "",
                "",
                &time,
                error.as_deref().unwrap_or("unknown"),
            ])?,
        }
    }

    writer.flush()?;
    Ok(())
}
