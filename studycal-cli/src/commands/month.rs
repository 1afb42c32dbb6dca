use anyhow::Result;
use chrono::NaiveDate;
use studycal_core::calendar;

use super::open_store;
use crate::render::{render_month, render_totals};

pub async fn run(reference: NaiveDate) -> Result<()> {
    let store = open_store().await?;

    for line in render_totals(store.ledger(), reference) {
        println!("{line}");
    }
    println!();

    for line in render_month(store.ledger(), reference, calendar::today()) {
        println!("{line}");
    }

    Ok(())
}
