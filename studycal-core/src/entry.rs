//! Study entries and the date keys they are filed under.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{StudyCalError, StudyCalResult};

/// Longest note accepted for a single day, in characters.
pub const CONTENT_MAX_CHARS: usize = 30;

const MAX_HOURS: u32 = 23;
const MAX_MINUTES: u32 = 59;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Canonical identifier of a calendar day, rendered as `YYYY-MM-DD`.
///
/// A key wraps a plain calendar date. It is never derived from an instant, so
/// the same day always maps to the same key regardless of the local offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        DateKey(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        DateKey(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = StudyCalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT)
            .map(DateKey)
            .map_err(|_| StudyCalError::InvalidDate(s.to_string()))
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Time studied on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyEntry {
    pub hours: u32,
    pub minutes: u32,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_content"
    )]
    pub content: Option<String>,
}

impl StudyEntry {
    /// Build an entry, trimming the note and dropping it when empty.
    pub fn new(hours: u32, minutes: u32, content: Option<&str>) -> Self {
        StudyEntry {
            hours,
            minutes,
            content: content.and_then(normalize_content),
        }
    }

    pub fn total_minutes(&self) -> u64 {
        u64::from(self.hours) * 60 + u64::from(self.minutes)
    }
}

impl fmt::Display for StudyEntry {
    /// `2h` or `2h 15m`, matching the grid cell label.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}h", self.hours)?;
        if self.minutes > 0 {
            write!(f, " {}m", self.minutes)?;
        }
        Ok(())
    }
}

fn normalize_content(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(CONTENT_MAX_CHARS).collect())
}

fn deserialize_content<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(normalize_content))
}

/// Raw values typed into the record/edit form.
#[derive(Debug, Clone, Default)]
pub struct EntryInput {
    pub hours: String,
    pub minutes: String,
    pub content: String,
}

impl EntryInput {
    pub fn new(hours: impl Into<String>, minutes: impl Into<String>, content: impl Into<String>) -> Self {
        EntryInput {
            hours: hours.into(),
            minutes: minutes.into(),
            content: content.into(),
        }
    }

    /// Turn form text into an entry.
    ///
    /// Unparseable numbers read as zero and out-of-range values are clamped.
    /// At least one of hours or minutes has to be filled in.
    pub fn into_entry(self) -> StudyCalResult<StudyEntry> {
        if self.hours.trim().is_empty() && self.minutes.trim().is_empty() {
            return Err(StudyCalError::InvalidEntry(
                "enter hours or minutes to record".into(),
            ));
        }

        let hours = parse_clamped(&self.hours, MAX_HOURS);
        let minutes = parse_clamped(&self.minutes, MAX_MINUTES);

        Ok(StudyEntry::new(hours, minutes, Some(&self.content)))
    }
}

fn parse_clamped(raw: &str, max: u32) -> u32 {
    raw.trim()
        .parse::<i64>()
        .map(|n| n.clamp(0, i64::from(max)) as u32)
        .unwrap_or(0)
}
