//! Display a filter's coefficients, roots and equivalent forms.

use clap::Args;
use filtro_core::{Complex64, FilterStructure, TransferFunction};

use super::common::{format_coefficients, format_complex, load_config};

/// Display filter information.
#[derive(Args)]
pub struct InfoArgs {
    /// Factory name or path to a TOML description
    pub filter: String,

    /// Print machine-readable JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let config = load_config(&args.filter)?;
    let tf = config.build_transfer_function()?;
    let structure = FilterStructure::classify(&tf);
    let zeros = tf.zeros();
    let poles = tf.poles();
    let sections = tf.to_sos().ok();
    let state_space = tf.state_space().ok();

    if args.json {
        let pair = |z: &Complex64| [z.re, z.im];
        let sections_json = sections.as_ref().map(|cascade| {
            cascade
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "numerator": s.numerator(),
                        "denominator": s.denominator(),
                    })
                })
                .collect::<Vec<_>>()
        });
        let state_space_json = state_space.as_ref().map(|ss| {
            serde_json::json!({
                "a": ss.a,
                "b": ss.b,
                "c": ss.c,
                "d": ss.d,
            })
        });
        let report = serde_json::json!({
            "name": config.name,
            "description": config.description,
            "sample_rate": config.sample_rate,
            "structure": structure.name(),
            "order": tf.order(),
            "numerator": tf.numerator(),
            "denominator": tf.denominator(),
            "gain": tf.gain(),
            "zeros": zeros.iter().map(pair).collect::<Vec<_>>(),
            "poles": poles.iter().map(pair).collect::<Vec<_>>(),
            "stable": tf.is_stable(),
            "sections": sections_json,
            "state_space": state_space_json,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Name:        {}", config.name);
    if let Some(description) = &config.description {
        println!("Description: {description}");
    }
    println!("Sample Rate: {} Hz", config.sample_rate);
    println!("Structure:   {} (order {})", structure.name().to_uppercase(), tf.order());
    println!("Numerator:   {}", format_coefficients(tf.numerator()));
    println!("Denominator: {}", format_coefficients(tf.denominator()));
    println!("Gain:        {}", tf.gain());
    println!("Stable:      {}", if tf.is_stable() { "yes" } else { "no" });

    print_roots("Zeros", &zeros);
    print_roots("Poles", &poles);
    print_sections(sections.as_deref());

    match &state_space {
        Some(ss) if ss.order() > 0 => {
            println!();
            println!("State space (order {}):", ss.order());
            for (i, row) in ss.a.iter().enumerate() {
                let label = if i == 0 { "A =" } else { "   " };
                println!("  {label} {}", format_coefficients(row));
            }
            println!("  B = {}", format_coefficients(&ss.b));
            println!("  C = {}", format_coefficients(&ss.c));
            println!("  D = {}", ss.d);
        }
        Some(_) => {}
        None => {
            println!();
            println!("State space: not available (numerator longer than denominator)");
        }
    }

    Ok(())
}

fn print_roots(label: &str, roots: &[Complex64]) {
    println!();
    if roots.is_empty() {
        println!("{label}: none");
        return;
    }
    println!("{label}:");
    for z in roots {
        println!("  {:<28} |z| = {:.6}", format_complex(*z), z.norm());
    }
}

fn print_sections(sections: Option<&[TransferFunction]>) {
    println!();
    let Some(sections) = sections else {
        println!("Sections: not available (complex root without a conjugate)");
        return;
    };
    println!("Sections ({}):", sections.len());
    for (i, s) in sections.iter().enumerate() {
        println!(
            "  {i}: {} / {}",
            format_coefficients(s.numerator()),
            format_coefficients(s.denominator())
        );
    }
}
