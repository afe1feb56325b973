//! Impulse response of the realized filter.

use clap::Args;
use filtro_core::{DiscreteSignal, Processor};

use super::common::load_config;

/// Print the first samples of the impulse response.
#[derive(Args)]
pub struct ImpulseArgs {
    /// Factory name or path to a TOML description
    pub filter: String,

    /// Number of samples
    #[arg(short, long, default_value = "32")]
    pub length: usize,

    /// Feed the impulse sample by sample instead of as one block
    #[arg(long)]
    pub streaming: bool,
}

/// Run the impulse command.
pub fn run(args: ImpulseArgs) -> anyhow::Result<()> {
    let config = load_config(&args.filter)?;
    let mut filter = config.build_filter()?;
    let impulse = DiscreteSignal::unit_impulse(config.sample_rate, args.length);

    let output = if args.streaming {
        let mut samples = vec![0.0; impulse.len()];
        filter.process_block(&impulse.samples, &mut samples);
        samples
    } else {
        filter.apply_to(&impulse).samples
    };

    for (n, y) in output.iter().enumerate() {
        println!("{n:>6}  {y:.9}");
    }
    Ok(())
}
