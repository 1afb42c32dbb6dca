use anyhow::Result;
use owo_colors::OwoColorize;
use studycal_core::{DateKey, EntryInput};

use super::{open_store, with_spinner};
use crate::render::Render;

/// Record a day, or replace what was recorded for it.
pub async fn run(
    date: DateKey,
    hours: Option<String>,
    minutes: Option<String>,
    content: Option<String>,
) -> Result<()> {
    let entry = EntryInput::new(
        hours.unwrap_or_default(),
        minutes.unwrap_or_default(),
        content.unwrap_or_default(),
    )
    .into_entry()?;

    let mut store = open_store().await?;
    let verb = if store.total_for(&date).is_some() {
        "Updated"
    } else {
        "Recorded"
    };

    with_spinner(format!("Saving {date}"), store.upsert(date, entry)).await?;

    if let Some(entry) = store.total_for(&date) {
        println!("{} {}  {}", verb.green(), date.to_string().bold(), entry.render());
    }

    Ok(())
}
