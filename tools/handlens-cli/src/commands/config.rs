//! Show or write the configuration file.

use handlens_common::config::AppConfig;

pub fn run(config: &AppConfig, write: bool) -> anyhow::Result<()> {
    config.validate()?;
    println!("{}", serde_json::to_string_pretty(config)?);

    if write {
        config.save()?;
        eprintln!("Configuration written.");
    }
    Ok(())
}
