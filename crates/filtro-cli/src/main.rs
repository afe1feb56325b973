//! Filtro CLI - Command-line interface for the filtro LTI filter engine.

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "filtro")]
#[command(author, version, about = "Filtro LTI filter CLI", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show coefficients, roots and equivalent forms of a filter
    Info(commands::info::InfoArgs),

    /// Print the frequency response table
    Response(commands::response::ResponseArgs),

    /// Print the impulse response of the realized filter
    Impulse(commands::impulse::ImpulseArgs),

    /// Filter whitespace-separated samples from a file or stdin
    Run(commands::run::RunArgs),

    /// Combine two filters in series or parallel
    Combine(commands::combine::CombineArgs),

    /// List or print built-in filter descriptions
    Factory(commands::factory::FactoryArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Response(args) => commands::response::run(args),
        Commands::Impulse(args) => commands::impulse::run(args),
        Commands::Run(args) => commands::run::run(args),
        Commands::Combine(args) => commands::combine::run(args),
        Commands::Factory(args) => commands::factory::run(args),
    }
}
