use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::date_key::DateKey;

/// Fixed note palette. The first entry is the default colour.
pub const NOTE_COLORS: [&str; 8] = [
    "#FFFFFF", "#FFF9C4", "#FFCCBC", "#F8BBD9", "#E1BEE7", "#C5CAE9", "#B3E5FC", "#C8E6C9",
];

pub fn default_color() -> &'static str {
    NOTE_COLORS[0]
}

/// Returns the palette entry matching `raw` (case-insensitive), if any.
pub fn palette_color(raw: &str) -> Option<&'static str> {
    let trimmed = raw.trim();
    NOTE_COLORS
        .iter()
        .copied()
        .find(|color| color.eq_ignore_ascii_case(trimmed))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,

    /// Stored as written by the persistence layer; see [`Note::date_key`].
    pub date: String,

    pub content: String,

    #[serde(default = "default_color_string")]
    pub color: String,

    /// Records written without a timestamp read back as the Unix epoch.
    #[serde(default = "unknown_created_at")]
    pub created_at: DateTime<Utc>,
}

fn default_color_string() -> String {
    default_color().to_string()
}

fn unknown_created_at() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl Note {
    pub fn new(date: NaiveDate, content: String, color: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: DateKey::new(date).to_string(),
            content,
            color: color.to_string(),
            created_at: now,
        }
    }

    /// `None` when the stored date is not a canonical key.
    pub fn date_key(&self) -> Option<DateKey> {
        DateKey::parse(&self.date)
    }

    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.date_key().is_some_and(|key| key.date() == date)
    }
}
