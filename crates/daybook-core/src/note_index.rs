use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::date_key::DateKey;
use crate::note::Note;

/// Set of days that carry at least one note.
///
/// Always rebuilt from the whole collection, never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteIndex {
    dates: HashSet<DateKey>,
}

impl NoteIndex {
    #[tracing::instrument(skip_all, fields(notes = notes.len()))]
    pub fn build(notes: &[Note]) -> Self {
        let mut dates = HashSet::with_capacity(notes.len());
        for note in notes {
            match note.date_key() {
                Some(key) => {
                    dates.insert(key);
                }
                None => {
                    warn!(id = %note.id, date = %note.date, "note has malformed date key; not indexed");
                }
            }
        }
        debug!(days = dates.len(), "built note index");
        Self { dates }
    }

    pub fn has_notes(&self, key: &DateKey) -> bool {
        self.dates.contains(key)
    }

    pub fn has_notes_on(&self, date: NaiveDate) -> bool {
        self.has_notes(&DateKey::new(date))
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Notes for a single day, in collection order.
pub fn notes_for_day(notes: &[Note], date: NaiveDate) -> Vec<&Note> {
    notes.iter().filter(|note| note.is_on(date)).collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn note(id: &str, date: &str, content: &str) -> Note {
        Note {
            id: id.to_string(),
            date: date.to_string(),
            content: content.to_string(),
            color: "#FFFFFF".to_string(),
            created_at: Utc
                .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    fn key(raw: &str) -> DateKey {
        DateKey::parse(raw).expect("valid key")
    }

    #[test]
    fn membership_matches_note_dates_exactly() {
        let index = NoteIndex::build(&[note("1", "2025-03-15", "dentist")]);
        assert!(index.has_notes(&key("2025-03-15")));
        assert!(!index.has_notes(&key("2025-03-16")));
    }

    #[test]
    fn duplicate_days_collapse() {
        let index = NoteIndex::build(&[
            note("1", "2025-03-15", "a"),
            note("2", "2025-03-15", "b"),
            note("3", "2025-04-01", "c"),
        ]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn empty_collection_has_no_notes() {
        let index = NoteIndex::build(&[]);
        assert!(index.is_empty());
        assert!(!index.has_notes(&key("2025-03-15")));
    }

    #[test]
    fn malformed_keys_are_skipped() {
        let index = NoteIndex::build(&[
            note("1", "2025-3-15", "bad"),
            note("2", "garbage", "bad"),
            note("3", "2025-03-15", "good"),
        ]);
        assert_eq!(index.len(), 1);
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid date");
        assert!(index.has_notes_on(date));
    }

    #[test]
    fn rebuild_drops_removed_days() {
        let mut notes = vec![note("1", "2025-03-15", "a"), note("2", "2025-03-16", "b")];
        let before = NoteIndex::build(&notes);
        assert!(before.has_notes(&key("2025-03-16")));

        notes.retain(|n| n.id != "2");
        let after = NoteIndex::build(&notes);
        assert!(!after.has_notes(&key("2025-03-16")));
        assert!(after.has_notes(&key("2025-03-15")));
    }

    #[test]
    fn day_list_keeps_collection_order() {
        let notes = vec![
            note("1", "2025-03-15", "first"),
            note("2", "2025-03-16", "other day"),
            note("3", "2025-03-15", "second"),
        ];
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid date");
        let day: Vec<&str> = notes_for_day(&notes, date)
            .into_iter()
            .map(|n| n.content.as_str())
            .collect();
        assert_eq!(day, vec!["first", "second"]);
    }
}
