use crate::config::{AutosalesConfig, CONFIG_FILE_NAME};
use anyhow::Result;
use colored::Colorize;

pub fn handle_init(force: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config_path = cwd.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        );
    }

    let config = AutosalesConfig::default();
    config.save(&config_path)?;

    println!(
        "{} autosales config in {}",
        "Initialized".green(),
        cwd.display()
    );
    println!("  Config: {}", config_path.display());
    println!(
        "  Set {} to enable generation and {} to use a data service.",
        "OPENAI_API_KEY".yellow(),
        "DATA_SERVICE_URL".yellow()
    );

    Ok(())
}
