use anyhow::Result;
use owo_colors::OwoColorize;
use studycal_core::DateKey;

use super::{open_store, with_spinner};

pub async fn run(date: DateKey) -> Result<()> {
    let mut store = open_store().await?;

    if store.total_for(&date).is_none() {
        println!("{}", format!("Nothing recorded for {date}").dimmed());
        return Ok(());
    }

    with_spinner(format!("Deleting {date}"), store.remove(&date)).await?;

    println!("{} {}", "Deleted".red(), date.to_string().bold());
    Ok(())
}
