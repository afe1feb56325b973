//! Filter text samples.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use filtro_core::{DiscreteSignal, Processor};

use super::common::{load_config, parse_samples};

/// Filter whitespace-separated samples, one output per line.
#[derive(Args)]
pub struct RunArgs {
    /// Factory name or path to a TOML description
    pub filter: String,

    /// Input file (reads stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Process sample by sample instead of as one block
    #[arg(long)]
    pub streaming: bool,
}

/// Run the run command.
pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = load_config(&args.filter)?;
    let mut filter = config.build_filter()?;

    let text = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };
    let input = DiscreteSignal::new(config.sample_rate, parse_samples(&text)?);
    tracing::debug!(samples = input.len(), streaming = args.streaming, "filtering input");

    let output = if args.streaming {
        let mut samples = input.samples.clone();
        filter.process_block_inplace(&mut samples);
        samples
    } else {
        filter.apply_to(&input).samples
    };

    for y in output {
        println!("{y}");
    }
    Ok(())
}
