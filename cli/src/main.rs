//! hospital-des: run hospital triage/doctor simulations from JSON scenarios
//!
//! ```text
//! hospital-des run scenario.json            # transcript on stdout
//! hospital-des run scenario.json -f json    # full report as JSON
//! hospital-des validate scenario.json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use hospital_des_core::{Engine, SimulationConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "hospital-des",
    about = "Discrete-event simulation of patients flowing through triage and doctor examination."
)]
struct Cli {
    /// Log level written to stderr (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a scenario to completion
    Run {
        /// Path to a JSON scenario file
        scenario: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Check patient conservation after every event
        #[arg(long)]
        check_invariants: bool,
    },
    /// Check a scenario file without running it
    Validate {
        /// Path to a JSON scenario file
        scenario: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Event transcript followed by doctor completion stacks
    Text,
    /// Full report as pretty JSON
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn execute(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Run {
            scenario,
            format,
            check_invariants,
        } => {
            tracing::info!("Loading scenario from: {}", scenario.display());
            let config = SimulationConfig::from_json_file(&scenario)?;
            let mut engine = Engine::new(config)?;

            let report = if check_invariants {
                engine.run_with(|_, state| state.check_conservation())?
            } else {
                engine.run()?
            };

            match format {
                OutputFormat::Text => print!("{}", report),
                OutputFormat::Json => println!("{}", report.to_json()?),
            }
            Ok(())
        }
        Commands::Validate { scenario } => {
            let config = SimulationConfig::from_json_file(&scenario)?;
            println!(
                "{}: ok ({} patients, {} triage units, {} doctors, {} tiers)",
                scenario.display(),
                config.num_patients(),
                config.num_triage_units,
                config.num_doctor_units,
                config.num_tiers
            );
            Ok(())
        }
    }
}
