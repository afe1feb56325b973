//! Combine two filter descriptions.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use filtro_config::FilterConfig;
use filtro_core::{Connection, FilterStructure};

use super::common::load_config;

/// Connection mode on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Mode {
    /// A then B
    Series,
    /// A plus B
    Parallel,
}

impl From<Mode> for Connection {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Series => Connection::Series,
            Mode::Parallel => Connection::Parallel,
        }
    }
}

/// Combine two filters into one description.
#[derive(Args)]
pub struct CombineArgs {
    /// First filter (factory name or path)
    pub first: String,

    /// Second filter (factory name or path)
    pub second: String,

    /// How to connect the filters
    #[arg(short, long, value_enum, default_value = "series")]
    pub mode: Mode,

    /// Write the result here instead of printing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the combine command.
pub fn run(args: CombineArgs) -> anyhow::Result<()> {
    let first = load_config(&args.first)?;
    let second = load_config(&args.second)?;
    let connection = Connection::from(args.mode);

    let tf = connection.combine(
        &first.build_transfer_function()?,
        &second.build_transfer_function()?,
    );
    let name = match connection {
        Connection::Series => format!("{}*{}", first.name, second.name),
        Connection::Parallel => format!("{}+{}", first.name, second.name),
    };
    let config = FilterConfig::from_transfer_function(name, &tf)
        .with_description(format!(
            "{} and {} in {connection} ({})",
            first.name,
            second.name,
            FilterStructure::classify(&tf).name()
        ))
        .with_sample_rate(first.sample_rate);

    match &args.output {
        Some(path) => {
            config.save(path)?;
            println!("Saved {} to {}", config.name, path.display());
        }
        None => print!("{}", config.to_toml_string()?),
    }
    Ok(())
}
