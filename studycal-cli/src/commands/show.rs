use anyhow::Result;
use owo_colors::OwoColorize;
use studycal_core::DateKey;

use super::open_store;
use crate::render::Render;

pub async fn run(date: DateKey) -> Result<()> {
    let store = open_store().await?;

    match store.total_for(&date) {
        Some(entry) => println!("{}  {}", date.to_string().bold(), entry.render()),
        None => println!("{}  {}", date.to_string().bold(), "nothing recorded".dimmed()),
    }

    Ok(())
}
