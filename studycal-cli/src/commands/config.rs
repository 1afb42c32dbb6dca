use anyhow::Result;
use owo_colors::OwoColorize;
use studycal_core::config::StudyCalConfig;

/// Print the config file location. With `--store-url` or `--api-key`, write
/// those values into the file first.
pub fn run(store_url: Option<String>, api_key: Option<String>) -> Result<()> {
    let config_path = StudyCalConfig::config_path()?;

    if store_url.is_none() && api_key.is_none() {
        if !config_path.exists() {
            StudyCalConfig::create_default_config(&config_path)?;
        }
        println!("{}", config_path.display());
        return Ok(());
    }

    let mut config = StudyCalConfig::read_file(&config_path)?;
    if let Some(url) = store_url {
        config.store_url = Some(url);
    }
    if let Some(key) = api_key {
        config.api_key = Some(key);
    }
    config.save_to(&config_path)?;

    println!("{} {}", "Saved".green(), config_path.display());
    Ok(())
}
