//! Config command - manage the JSON configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use regscan_core::RegscanConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a fresh config file with the defaults
    Init(InitArgs),

    /// Print one value, addressed as section.field
    Get { key: String },

    /// Change one value, addressed as section.field
    Set { key: String, value: String },

    /// Print the config file location
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Where to write the file instead of the default location
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Replace an existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show(),
        ConfigCommand::Init(init) => init_file(init),
        ConfigCommand::Get { key } => get(&key),
        ConfigCommand::Set { key, value } => set(&key, &value),
        ConfigCommand::Path => path(),
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("regscan")
        .join("config.json")
}

fn load_or_default(path: &Path) -> anyhow::Result<RegscanConfig> {
    if path.exists() {
        Ok(RegscanConfig::from_file(path)?)
    } else {
        Ok(RegscanConfig::default())
    }
}

/// Dotted key to JSON pointer: "ocr.worker_url" becomes "/ocr/worker_url".
fn key_pointer(key: &str) -> String {
    key.split('.').fold(String::new(), |mut pointer, part| {
        pointer.push('/');
        pointer.push_str(part);
        pointer
    })
}

/// Replace the value at a dotted key inside the config tree.
///
/// Keys that do not already exist are refused, so a typo cannot silently
/// grow the file with a field nothing reads.
fn assign(tree: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let (section, field) = match key.rsplit_once('.') {
        Some((section, field)) => (tree.pointer_mut(&key_pointer(section)), field),
        None => (Some(&mut *tree), key),
    };

    let Some(Value::Object(fields)) = section else {
        anyhow::bail!("unknown configuration key: {key}");
    };
    if !fields.contains_key(field) {
        anyhow::bail!("unknown configuration key: {key}");
    }

    fields.insert(field.to_string(), value);
    Ok(())
}

fn show() -> anyhow::Result<()> {
    let config_path = default_config_path();
    if !config_path.exists() {
        eprintln!(
            "{} {} does not exist, showing the defaults",
            style("ℹ").blue(),
            config_path.display()
        );
    }

    let config = load_or_default(&config_path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn init_file(args: InitArgs) -> anyhow::Result<()> {
    let target = args.output.unwrap_or_else(default_config_path);

    if target.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (pass --force to replace it)",
            target.display()
        );
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    RegscanConfig::default().save(&target)?;
    println!(
        "{} Wrote default configuration to {}",
        style("✓").green(),
        target.display()
    );
    Ok(())
}

fn get(key: &str) -> anyhow::Result<()> {
    let config = load_or_default(&default_config_path())?;
    let tree = serde_json::to_value(&config)?;

    let value = tree
        .pointer(&key_pointer(key))
        .ok_or_else(|| anyhow::anyhow!("unknown configuration key: {key}"))?;
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn set(key: &str, raw: &str) -> anyhow::Result<()> {
    let config_path = default_config_path();
    let config = load_or_default(&config_path)?;

    // Bare words are taken as strings, anything else as a JSON literal
    let value: Value =
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

    let mut tree = serde_json::to_value(&config)?;
    assign(&mut tree, key, value.clone())?;

    // Round-trip through the typed config so a bad value is caught here,
    // not on the next load
    let updated: RegscanConfig = serde_json::from_value(tree)?;
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    updated.save(&config_path)?;

    println!("{} {} is now {}", style("✓").green(), key, value);
    Ok(())
}

fn path() -> anyhow::Result<()> {
    let config_path = default_config_path();
    let status = if config_path.exists() {
        style("exists").green()
    } else {
        style("missing, run 'regscan config init'").yellow()
    };
    println!("{} ({})", config_path.display(), status);
    Ok(())
}
