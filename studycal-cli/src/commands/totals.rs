use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use studycal_core::calendar;

use super::open_store;
use crate::render::render_totals;

pub async fn run(reference: NaiveDate) -> Result<()> {
    let store = open_store().await?;

    println!("{}", calendar::month_label(reference).dimmed());
    for line in render_totals(store.ledger(), reference) {
        println!("{line}");
    }

    Ok(())
}
