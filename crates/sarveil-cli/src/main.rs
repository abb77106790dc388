mod commands;
mod progress;
mod summary;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sarveil_core::error::SarveilError;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sarveil", about = "SAR change-detection animations for points of interest")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, render and animate SAR change frames for a POI
    Run(commands::pipeline::RunArgs),
    /// List the SAR scenes found for a POI and date range
    Scenes(commands::scenes::ScenesArgs),
    /// Search for a cloud-free optical basemap
    Basemap(commands::basemap::BasemapArgs),
    /// Print or save the default pipeline config
    Config(commands::config::ConfigArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match &cli.command {
        Commands::Run(args) => commands::pipeline::run(args),
        Commands::Scenes(args) => commands::scenes::run(args),
        Commands::Basemap(args) => commands::basemap::run(args),
        Commands::Config(args) => commands::config::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<SarveilError>() {
            Some(SarveilError::NoScenesFound { window, .. }) => {
                eprintln!("No SAR scenes found between {window}. Try a wider date range.");
                ExitCode::from(2)
            }
            _ => {
                eprintln!("Error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}
