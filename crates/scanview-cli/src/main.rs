mod commands;
mod draw;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scanview", about = "Defect review viewer for scanned tile images")]
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
    /// Show image dimensions and pyramid levels
    Info(commands::info::InfoArgs),
    /// Render a tile view with defect overlays
    Render(commands::render::RenderArgs),
    /// Render the scan mosaic and print bin statistics
    Mosaic(commands::mosaic::MosaicArgs),
    /// Print or save the default viewer config
    Config(commands::config::ConfigArgs),
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
        Commands::Info(args) => commands::info::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Mosaic(args) => commands::mosaic::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
