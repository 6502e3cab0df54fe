//! CLI application for extracting and labeling tunnel displacement images.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, extract, label, status};

/// Tunnel image dataset tools - extract images from PDF reports and label them
#[derive(Parser)]
#[command(name = "tunlab")]
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
    /// Extract embedded images from PDF reports
    Extract(extract::ExtractArgs),

    /// Label extracted images interactively
    Label(label::LabelArgs),

    /// Show dataset progress
    Status(status::StatusArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
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

    // Execute command
    match cli.command {
        Commands::Extract(args) => extract::run(args, cli.config.as_deref()).await,
        Commands::Label(args) => label::run(args, cli.config.as_deref()).await,
        Commands::Status(args) => status::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args).await,
    }
}
