//! Scan command - extract identifiers from a single vehicle photo.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use regscan_core::models::config::{EngineKind, RegscanConfig};
use regscan_core::{EdgeCropper, MotorRegistry, Scanner, VehicleScan, VisionOcr, WorkerOcr};

use super::load_config;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input image file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// OCR engine
    #[arg(long, value_enum)]
    engine: Option<EngineArg>,

    /// Base URL of the OCR worker service
    #[arg(long)]
    worker_url: Option<String>,

    /// API key for the vision engine
    #[arg(long)]
    api_key: Option<String>,

    /// Skip the plate-region pre-crop
    #[arg(long)]
    no_crop: bool,

    /// Enrich a recognized plate via the motor register
    #[arg(long)]
    lookup: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum EngineArg {
    Worker,
    Vision,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;

    if let Some(url) = &args.worker_url {
        config.ocr.worker_url = url.clone();
    }
    if let Some(key) = &args.api_key {
        config.ocr.vision_api_key = Some(key.clone());
    }
    if let Some(engine) = args.engine {
        config.ocr.engine = match engine {
            EngineArg::Worker => EngineKind::Worker,
            EngineArg::Vision => EngineKind::Vision,
        };
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Scanning {}", args.input.display());
    let image = fs::read(&args.input)?;

    let scanner = build_scanner(&config, args.no_crop)?;
    let scan = scanner.scan(&image)?;

    let output = format_scan(&scan, args.format)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{output}");
    }

    if args.lookup {
        match &scan.plate {
            Some(plate) => {
                let registry = MotorRegistry::new(config.registry.api_token.clone())
                    .with_base_url(&config.registry.base_url);
                let report = registry.lookup(plate)?;
                println!();
                super::lookup::print_report(&report);
            }
            None => println!(
                "{} No plate recognized, skipping registry lookup",
                style("ℹ").blue()
            ),
        }
    }

    Ok(())
}

/// Build a scanner from the configuration.
pub fn build_scanner(config: &RegscanConfig, no_crop: bool) -> anyhow::Result<Scanner> {
    let engine: Box<dyn regscan_core::OcrEngine> = match config.ocr.engine {
        EngineKind::Worker => Box::new(WorkerOcr::new(&config.ocr.worker_url)),
        EngineKind::Vision => {
            let key = config
                .ocr
                .vision_api_key
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("vision engine selected but no API key set"))?;
            Box::new(VisionOcr::new(key))
        }
    };

    let mut scanner = Scanner::new(engine, config.policy.clone());
    if config.crop.enabled && !no_crop {
        scanner = scanner.with_cropper(Box::new(EdgeCropper::new(config.crop.detector.clone())));
    }
    Ok(scanner)
}

/// Render a scan in the requested output format.
pub fn format_scan(scan: &VehicleScan, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(scan)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(["plate", "odometer", "vin"])?;
            writer.write_record([
                scan.plate.as_deref().unwrap_or(""),
                &scan
                    .odometer
                    .as_ref()
                    .map(|r| r.to_string())
                    .unwrap_or_default(),
                scan.vin.as_deref().unwrap_or(""),
            ])?;
            Ok(String::from_utf8(writer.into_inner()?)?)
        }
        OutputFormat::Text => Ok(format_scan_text(scan)),
    }
}

fn format_scan_text(scan: &VehicleScan) -> String {
    let mut lines = vec![
        format!("Plate:    {}", scan.plate.as_deref().unwrap_or("not found")),
        format!(
            "Odometer: {}",
            scan.odometer
                .as_ref()
                .map(|r| format!("{r} km"))
                .unwrap_or_else(|| "not found".to_string())
        ),
        format!("VIN:      {}", scan.vin.as_deref().unwrap_or("not found")),
    ];
    if !scan.raw_text.is_empty() {
        lines.push(format!("Tokens:   {}", scan.raw_text.join(" | ")));
    }
    for warning in &scan.metadata.warnings {
        lines.push(format!("Warning:  {warning}"));
    }
    lines.join("\n")
}
