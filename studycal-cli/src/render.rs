//! Terminal rendering for studycal types.
//!
//! Cell contents are laid out as plain text first and colored afterwards, so
//! padding is computed on visible characters only.

use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;
use studycal_core::calendar::{self, CalendarCell, TimeTotal};
use studycal_core::{StudyEntry, StudyLedger};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for TimeTotal {
    fn render(&self) -> String {
        self.to_string().bold().to_string()
    }
}

impl Render for StudyEntry {
    fn render(&self) -> String {
        match &self.content {
            Some(content) => format!("{} {}", self.to_string().bold(), content.dimmed()),
            None => self.to_string().bold().to_string(),
        }
    }
}

const CELL_WIDTH: usize = 11;
const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Text shown in one grid cell: day number, time, note.
#[derive(Debug, PartialEq, Eq)]
struct CellText {
    day: String,
    time: String,
    note: String,
}

/// Study time is only shown for days of the month being viewed.
fn cell_text(cell: &CalendarCell, ledger: &StudyLedger) -> CellText {
    let entry = cell
        .is_current_month
        .then(|| ledger.get(&cell.key()))
        .flatten();

    CellText {
        day: format!("{:>2}", cell.date.day()),
        time: entry.map(|e| e.to_string()).unwrap_or_default(),
        note: entry
            .and_then(|e| e.content.as_deref())
            .map(|c| truncate(c, CELL_WIDTH - 1))
            .unwrap_or_default(),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}

fn pad(text: &str) -> String {
    let used = text.chars().count();
    " ".repeat(CELL_WIDTH.saturating_sub(used))
}

fn render_day(cell: &CalendarCell, text: &str, today: NaiveDate) -> String {
    let weekday = cell.date.weekday().num_days_from_sunday();

    let colored = if cell.date == today {
        text.white().on_blue().bold().to_string()
    } else if !cell.is_current_month {
        text.dimmed().to_string()
    } else if weekday == 0 {
        text.red().to_string()
    } else if weekday == 6 {
        text.blue().to_string()
    } else {
        text.to_string()
    };

    format!("{colored}{}", pad(text))
}

fn render_weekday_header() -> String {
    WEEKDAYS
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let label = match i {
                0 => name.red().bold().to_string(),
                6 => name.blue().bold().to_string(),
                _ => name.bold().to_string(),
            };
            format!("{label}{}", pad(name))
        })
        .collect()
}

/// Month view: heading, weekday row, then three lines per week.
pub fn render_month(ledger: &StudyLedger, reference: NaiveDate, today: NaiveDate) -> Vec<String> {
    let grid = calendar::month_grid(reference);
    let mut lines = vec![
        format!("📚 {}", calendar::month_label(reference).bold()),
        String::new(),
        render_weekday_header(),
    ];

    for week in grid.chunks(7) {
        let texts: Vec<CellText> = week.iter().map(|cell| cell_text(cell, ledger)).collect();

        let days: String = week
            .iter()
            .zip(&texts)
            .map(|(cell, text)| render_day(cell, &text.day, today))
            .collect();
        let times: String = texts
            .iter()
            .map(|text| format!("{}{}", text.time.green(), pad(&text.time)))
            .collect();
        let notes: String = texts
            .iter()
            .map(|text| format!("{}{}", text.note.dimmed(), pad(&text.note)))
            .collect();

        lines.push(days.trim_end().to_string());
        lines.push(times.trim_end().to_string());
        lines.push(notes.trim_end().to_string());
    }

    lines
}

/// The three totals shown above the grid.
pub fn render_totals(ledger: &StudyLedger, reference: NaiveDate) -> Vec<String> {
    vec![
        format!(
            "⏰ This month  {}",
            calendar::monthly_total(ledger, reference).render()
        ),
        format!(
            "🎯 This year   {}",
            calendar::yearly_total(ledger, reference).render()
        ),
        format!("📊 All time    {}", calendar::all_time_total(ledger).render()),
    ]
}
