//! # Erection Cost CLI
//!
//! Runs a scenario file (or the built-in demo) through `erection_core` and
//! prints a summary of the least-cost erection plan, followed by the report
//! JSON.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use erection_core::calculations::{calculate, ErectionCostReport, SelectedPlan};
use erection_core::errors::{ErectionError, ErectionResult};
use erection_core::file_io::{load_scenario, save_report};
use erection_core::project::Scenario;
use erection_core::sample::demo_scenario;
use erection_core::weather::ContiguousExceedanceModel;

#[derive(Parser, Debug)]
#[command(name = "erection_cli", version, about = "Wind turbine erection cost estimator")]
struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Estimate erection cost for a scenario file
    Estimate {
        /// Path to the scenario JSON file
        scenario: PathBuf,

        /// Write the full report JSON here
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Run the built-in two-crane demo scenario
    Demo {
        /// Write the full report JSON here
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: logging already initialized");
    }

    let result = match &cli.command {
        Commands::Estimate { scenario, output } => {
            info!("Estimating {}", scenario.display());
            load_scenario(scenario).and_then(|s| run(&s, output.as_deref()))
        }
        Commands::Demo { output } => {
            info!("Running demo scenario");
            run(&demo_scenario(), output.as_deref())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.error_code(), "estimate failed");
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(scenario: &Scenario, output: Option<&Path>) -> ErectionResult<()> {
    let report = calculate(scenario, &ContiguousExceedanceModel::default())?;
    print_summary(&report);

    if let Some(path) = output {
        save_report(&report, path)?;
        println!();
        println!("Report written to {}", path.display());
    } else {
        println!();
        println!("JSON Output:");
        let json = serde_json::to_string_pretty(&report).map_err(|e| ErectionError::SerializationError {
            reason: e.to_string(),
        })?;
        println!("{}", json);
    }
    Ok(())
}

fn print_summary(report: &ErectionCostReport) {
    println!("═══════════════════════════════════════════════════════════");
    println!("  ERECTION COST ESTIMATE: {}", report.project_id);
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("Turbines:        {}", report.num_turbines);
    println!("Weather window:  {:.0} hr", report.weather_window_hr);
    println!(
        "Candidates:      {} same-crane, {} separate-crane",
        report.tables.same_crane.len(),
        report.tables.separate_cranes.len()
    );
    println!();

    let label = match &report.plan {
        SelectedPlan::SameCrane(_) => "one crane for all operations",
        SelectedPlan::SeparateCranes { .. } => "one crane per operation",
    };
    println!("Selected plan: {} ({})", report.plan.strategy(), label);
    for row in report.cost_breakdown() {
        println!(
            "  {:<10} {:<30} ${:>14.0}  {:>8.1} hr",
            row.scope.to_string(),
            row.crane.to_string(),
            row.costs.total_cost_usd,
            row.costs.time_with_weather_hr
        );
    }
    println!();

    println!("Cost by type:");
    for (cost_type, usd) in report.cost_by_type() {
        println!("  {:<18} ${:>14.0}", cost_type.to_string(), usd);
    }
    println!();
    println!("═══════════════════════════════════════════════════════════");
    println!("  TOTAL: ${:.0}  (${:.0} per turbine)", report.total_cost_usd(), report.cost_per_turbine_usd());
    println!("  Wind multiplier: {:.3}", report.wind_multiplier());
    println!("═══════════════════════════════════════════════════════════");
}

fn print_error(e: &ErectionError) {
    eprintln!("Error: {}", e);
    if e.is_data_error() {
        eprintln!("Check the scenario's crane and price tables.");
    }
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}
