use std::path::PathBuf;

use bike_simulation::*;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bike_sim")]
#[command(about = "Compare two bicycles over a stop-and-go route at constant power", long_about = None)]
struct Args {
    /// Scenario file (JSON); the reference scenario is used when omitted
    #[arg(long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Rider power in watts
    #[arg(long, value_name = "W")]
    power: Option<f64>,

    /// Rider mass in kilograms
    #[arg(long, value_name = "KG")]
    rider_mass: Option<f64>,

    /// Print the comparison as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Include the flat-ground acceleration curves
    #[arg(long, default_value_t = false)]
    curves: bool,

    /// Log every integration run
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut scenario = match &args.scenario {
        Some(path) => Scenario::from_file(path)?,
        None => Scenario::default(),
    };
    if let Some(power) = args.power {
        scenario.rider.power = power;
    }
    if let Some(rider_mass) = args.rider_mass {
        scenario.rider.rider_mass = rider_mass;
    }
    scenario.validate()?;

    let result = compare_bikes(
        &scenario.rider,
        &scenario.bike_a,
        &scenario.bike_b,
        &scenario.terrain,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let mut report = Report::new();
    report.add_terrain(&scenario.terrain);
    report.add_comparison(&result);
    if args.curves {
        let curves = default_velocity_curves(&scenario.rider, &scenario.bike_a, &scenario.bike_b)?;
        report.add_curves(&result, &curves);
    }
    report.display();

    Ok(())
}
