//! Frequency response table.

use clap::Args;

use super::common::load_config;

/// Print magnitude, phase and group delay over `[0, fs/2]`.
#[derive(Args)]
pub struct ResponseArgs {
    /// Factory name or path to a TOML description
    pub filter: String,

    /// Number of frequency points from DC to Nyquist (at least 2)
    #[arg(short, long, default_value = "17")]
    pub points: usize,

    /// Print magnitude in dB
    #[arg(long)]
    pub db: bool,
}

/// Run the response command.
pub fn run(args: ResponseArgs) -> anyhow::Result<()> {
    if args.points < 2 {
        anyhow::bail!("--points must be at least 2, got {}", args.points);
    }

    let config = load_config(&args.filter)?;
    let tf = config.build_transfer_function()?;
    let fft_size = 2 * (args.points - 1);

    let response = tf.frequency_response(fft_size);
    let freqs = response.frequencies(f64::from(config.sample_rate));
    let magnitude = if args.db {
        response.magnitude_db()
    } else {
        response.magnitude()
    };
    let phase = response.unwrapped_phase();
    let group_delay: Vec<f64> = response
        .omegas()
        .into_iter()
        .map(|omega| tf.group_delay_at(omega))
        .collect();

    let mag_label = if args.db { "Magnitude (dB)" } else { "Magnitude" };
    println!(
        "{:>12}  {:>14}  {:>12}  {:>16}",
        "Freq (Hz)", mag_label, "Phase (rad)", "Group delay (smp)"
    );
    let rows = freqs
        .iter()
        .zip(&magnitude)
        .zip(&phase)
        .zip(&group_delay);
    for (((f, m), p), gd) in rows {
        println!("{f:>12.2}  {m:>14.6}  {p:>12.6}  {gd:>16.6}");
    }

    Ok(())
}
