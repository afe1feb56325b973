//! Built-in filter descriptions.

use clap::Args;
use filtro_config::{FACTORY_NAMES, factory_config};

/// List factory filters, or print one as TOML.
#[derive(Args)]
pub struct FactoryArgs {
    /// Factory filter to print
    pub name: Option<String>,
}

/// Run the factory command.
pub fn run(args: FactoryArgs) -> anyhow::Result<()> {
    if let Some(name) = &args.name {
        print!("{}", factory_config(name)?.to_toml_string()?);
        return Ok(());
    }

    println!("Factory filters:");
    for name in FACTORY_NAMES {
        let config = factory_config(name)?;
        println!(
            "  {:<18} {}",
            name,
            config.description.as_deref().unwrap_or("")
        );
    }
    Ok(())
}
