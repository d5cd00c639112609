mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "platematch", about = "Cross-match plate detection catalogs across epochs")]
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
    /// Print or save the default match configuration
    Config(commands::config::ConfigArgs),
    /// Quality-filter a single detection table
    Filter(commands::filter::FilterArgs),
    /// Find which sources of the first plate reappear on the second
    Cross(commands::cross::CrossArgs),
    /// Find duplicated detections within one plate
    Duplicates(commands::duplicates::DuplicatesArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Config(args) => commands::config::run(args),
        Commands::Filter(args) => commands::filter::run(args),
        Commands::Cross(args) => commands::cross::run(args),
        Commands::Duplicates(args) => commands::duplicates::run(args),
    }
}
