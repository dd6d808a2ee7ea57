//! CLI application for Danish vehicle registration OCR.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, extract, lookup, scan};

/// Danish vehicle scanner - extract plate, odometer, and VIN from photos
#[derive(Parser)]
#[command(name = "regscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a single vehicle photo
    Scan(scan::ScanArgs),

    /// Run the extraction pipeline on raw OCR tokens, no network
    Extract(extract::ExtractArgs),

    /// Scan multiple photos
    Batch(batch::BatchArgs),

    /// Look up a plate in the motor register
    Lookup(lookup::LookupArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Scan(args) => scan::run(args, cli.config.as_deref()),
        Commands::Extract(args) => extract::run(args),
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()),
        Commands::Lookup(args) => lookup::run(args, cli.config.as_deref()),
        Commands::Config(args) => config::run(args),
    }
}
