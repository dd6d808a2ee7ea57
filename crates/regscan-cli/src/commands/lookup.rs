//! Lookup command - query the motor register for a plate.

use clap::Args;
use console::style;

use regscan_core::models::vehicle::VehicleReport;
use regscan_core::MotorRegistry;

use super::load_config;

/// Arguments for the lookup command.
#[derive(Args)]
pub struct LookupArgs {
    /// Registration number to look up
    #[arg(required = true)]
    plate: String,

    /// Output the raw aggregated report as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: LookupArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let registry = MotorRegistry::new(config.registry.api_token.clone())
        .with_base_url(&config.registry.base_url);
    let report = registry.lookup(&args.plate)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("unknown")
}

pub fn print_report(report: &VehicleReport) {
    let v = &report.vehicle;
    let env = &report.environment;

    println!("{}", style("Vehicle").bold());
    println!("  Registration:  {}", v.registration_number);
    println!("  Status:        {}", field(&v.status));
    println!("  Type:          {}", field(&v.vehicle_type));
    println!("  Use:           {}", field(&v.vehicle_use));
    println!("  VIN:           {}", field(&v.vin));
    println!("  Make:          {}", field(&v.make));
    println!("  Model:         {}", field(&v.model));
    println!("  Variant:       {}", field(&v.variant));
    println!("  Year:          {}", v.year().as_deref().unwrap_or("unknown"));
    println!("  Fuel:          {}", field(&v.fuel_type));

    if let Some(mot) = &v.mot_info {
        println!();
        println!("{}", style("Latest inspection").bold());
        println!("  Date:          {}", field(&mot.date));
        println!("  Result:        {}", field(&mot.result));
        println!(
            "  Mileage:       {}",
            mot.mileage
                .map(|m| m.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
    }

    println!();
    println!("{}", style("Environment").bold());
    println!(
        "  CO2:           {}",
        env.co2_emission
            .map(|v| format!("{v} g/km"))
            .unwrap_or_else(|| "unknown".to_string())
    );
    println!(
        "  Fuel usage:    {}",
        env.fuel_usage
            .map(|v| format!("{v} km/l"))
            .unwrap_or_else(|| "unknown".to_string())
    );
    println!("  Euro norm:     {}", field(&env.euro_norm));
}
