use anyhow::{bail, Result};

use reveal_core::AppConfig;

pub fn init(force: bool) -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() && !force {
        bail!(
            "{} already exists.\nUse --force to overwrite it.",
            path.display()
        );
    }

    AppConfig::default().save()?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

pub fn path() -> Result<()> {
    let path = AppConfig::config_path();
    let note = if path.exists() { "" } else { " (not created yet)" };
    println!("{}{}", path.display(), note);
    Ok(())
}

pub fn show(config: &AppConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
