//! Howl - command-line renderer for the Howling Wolves sampler.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "howl")]
#[command(author, version, about = "Howling Wolves sampler CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play notes through a sample or kit and write a WAV file
    Render(commands::render::RenderArgs),

    /// Randomize a preset with the Hunt
    Hunt(commands::hunt::HuntArgs),

    /// List the instrument parameters
    Params(commands::params::ParamsArgs),
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Hunt(args) => commands::hunt::run(args),
        Commands::Params(args) => commands::params::run(args),
    }
}
