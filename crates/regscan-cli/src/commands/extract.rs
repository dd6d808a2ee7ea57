//! Extract command - run the pure pipeline on OCR tokens, no network.

use std::io::Read;

use clap::Args;

use regscan_core::{RecognizedText, ScanPipeline, ScanPolicy};

use super::scan::{OutputFormat, format_scan};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// OCR tokens to run through the pipeline (reads stdin when empty)
    tokens: Vec<String>,

    /// Full text blob instead of tokens
    #[arg(short, long, conflicts_with = "tokens")]
    text: Option<String>,

    /// Policy profile
    #[arg(short, long, value_enum, default_value = "default")]
    profile: ProfileArg,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ProfileArg {
    /// Plate first, strict filters
    Default,
    /// VIN first, range-filtered odometer
    Vision,
    /// Compact plate, first-run odometer
    Worker,
}

pub fn run(args: ExtractArgs) -> anyhow::Result<()> {
    let policy = match args.profile {
        ProfileArg::Default => ScanPolicy::default(),
        ProfileArg::Vision => ScanPolicy::vision_profile(),
        ProfileArg::Worker => ScanPolicy::worker_profile(),
    };
    let pipeline = ScanPipeline::new(policy);

    let recognized = if let Some(text) = args.text {
        RecognizedText::from_text(text)
    } else if !args.tokens.is_empty() {
        RecognizedText::from_tokens(args.tokens)
    } else {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        RecognizedText::from_text(input.trim().to_string())
    };

    let scan = pipeline.scan(&recognized);
    println!("{}", format_scan(&scan, args.format)?);

    Ok(())
}
