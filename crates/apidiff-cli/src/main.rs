//! apidiff CLI
//!
//! Command-line interface for apidiff

use apidiff_core::logging_facility::{self, Profile};
use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "apidiff")]
#[command(about = "apidiff - API difference reports between consecutive releases", long_about = None)]
struct Cli {
    /// Log output format (RUST_LOG overrides the level filter)
    #[arg(long, global = true, value_enum, default_value_t = LogProfile::Development)]
    log_profile: LogProfile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogProfile {
    Development,
    Production,
}

impl From<LogProfile> for Profile {
    fn from(profile: LogProfile) -> Self {
        match profile {
            LogProfile::Development => Profile::Development,
            LogProfile::Production => Profile::Production,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate and clean reports for each consecutive release pair
    Report(commands::report::ReportArgs),
    /// List the artifacts selected under one release root
    Artifacts(commands::artifacts::ArtifactsArgs),
    /// Clean an existing report
    Clean(commands::clean::CleanArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_profile.into());

    let result = match cli.command {
        Commands::Report(args) => commands::report::execute(args),
        Commands::Artifacts(args) => commands::artifacts::execute(args),
        Commands::Clean(args) => commands::clean::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
