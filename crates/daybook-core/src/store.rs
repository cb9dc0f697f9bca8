use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use crate::navigator::Cursor;
use crate::note::Note;

const NOTES_FILE: &str = "notes.json";
const NOTES_BACKUP_FILE: &str = "notes.json.bak";
const ONBOARDING_FILE: &str = "onboarding.flag";
const CURSOR_FILE: &str = "cursor.json";

/// File-backed key-value storage for the note collection and app flags.
#[derive(Debug)]
pub struct NoteStore {
    pub data_dir: PathBuf,
    pub notes_path: PathBuf,
    pub notes_backup_path: PathBuf,
    pub onboarding_path: PathBuf,
    pub cursor_path: PathBuf,
}

impl NoteStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let notes_path = data_dir.join(NOTES_FILE);
        let notes_backup_path = data_dir.join(NOTES_BACKUP_FILE);
        let onboarding_path = data_dir.join(ONBOARDING_FILE);
        let cursor_path = data_dir.join(CURSOR_FILE);

        info!(
            data_dir = %data_dir.display(),
            notes = %notes_path.display(),
            "opened note store"
        );

        Ok(Self {
            data_dir,
            notes_path,
            notes_backup_path,
            onboarding_path,
            cursor_path,
        })
    }

    /// Loads every readable note.
    ///
    /// Records are decoded one at a time, so a single bad entry is skipped
    /// instead of hiding the rest. Whenever anything could not be read, the
    /// file as found is copied to `notes.json.bak` before the next save can
    /// replace it. A file that is not a JSON array at all loads as empty.
    #[tracing::instrument(skip(self))]
    pub fn load_notes(&self) -> Vec<Note> {
        let records = match read_json::<Vec<serde_json::Value>>(&self.notes_path) {
            Ok(Some(records)) => records,
            Ok(None) => {
                debug!("no notes file yet");
                return vec![];
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "error loading notes; starting empty");
                self.back_up_notes();
                return vec![];
            }
        };

        let total = records.len();
        let notes: Vec<Note> = records
            .into_iter()
            .enumerate()
            .filter_map(|(position, record)| match serde_json::from_value(record) {
                Ok(note) => Some(note),
                Err(err) => {
                    warn!(position, error = %err, "skipping unreadable note record");
                    None
                }
            })
            .collect();

        if notes.len() != total {
            self.back_up_notes();
        }
        debug!(count = notes.len(), skipped = total - notes.len(), "loaded notes");
        notes
    }

    fn back_up_notes(&self) {
        match fs::copy(&self.notes_path, &self.notes_backup_path) {
            Ok(_) => warn!(
                backup = %self.notes_backup_path.display(),
                "kept a copy of the unreadable notes file"
            ),
            Err(err) => error!(error = %err, "failed to back up notes file"),
        }
    }

    #[tracing::instrument(skip(self, notes), fields(count = notes.len()))]
    pub fn save_notes(&self, notes: &[Note]) -> anyhow::Result<()> {
        write_json_atomic(&self.notes_path, &notes).context("failed to save notes.json")
    }

    #[tracing::instrument(skip(self))]
    pub fn is_onboarding_completed(&self) -> bool {
        match fs::read_to_string(&self.onboarding_path) {
            Ok(raw) => raw.trim() == "true",
            Err(err) if err.kind() == ErrorKind::NotFound => false,
            Err(err) => {
                warn!(error = %err, "error reading onboarding flag");
                false
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn set_onboarding_completed(&self) -> anyhow::Result<()> {
        fs::write(&self.onboarding_path, "true")
            .with_context(|| format!("failed writing {}", self.onboarding_path.display()))
    }

    #[tracing::instrument(skip(self))]
    pub fn load_cursor(&self) -> Option<Cursor> {
        match read_json::<Cursor>(&self.cursor_path) {
            Ok(cursor) => cursor,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "ignoring unreadable cursor state");
                None
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn save_cursor(&self, cursor: Cursor) -> anyhow::Result<()> {
        write_json_atomic(&self.cursor_path, &cursor).context("failed to save cursor.json")
    }
}

fn read_json<T>(path: &Path) -> anyhow::Result<Option<T>>
where
    T: DeserializeOwned,
{
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("failed reading {}", path.display()));
        }
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let value = serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing {}", path.display()))?;
    Ok(Some(value))
}

#[tracing::instrument(skip(path, value))]
fn write_json_atomic<T>(path: &Path, value: &T) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
{
    debug!(file = %path.display(), "saving json atomically");

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut temp, value)?;
    writeln!(temp)?;
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use tempfile::tempdir;

    use super::*;
    use crate::navigator::ViewType;

    fn sample_note(date: NaiveDate, content: &str) -> Note {
        let now = Utc
            .with_ymd_and_hms(2025, 3, 15, 8, 0, 0)
            .single()
            .expect("valid now");
        Note::new(date, content.to_string(), "#FFF9C4", now)
    }

    #[test]
    fn notes_round_trip_through_disk() {
        let temp = tempdir().expect("tempdir");
        let store = NoteStore::open(temp.path()).expect("open store");
        assert!(store.load_notes().is_empty());

        let date = NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid date");
        let notes = vec![sample_note(date, "one"), sample_note(date, "two")];
        store.save_notes(&notes).expect("save notes");

        assert_eq!(store.load_notes(), notes);
    }

    #[test]
    fn corrupt_notes_file_loads_as_empty() {
        let temp = tempdir().expect("tempdir");
        let store = NoteStore::open(temp.path()).expect("open store");
        fs::write(&store.notes_path, "{not json").expect("write garbage");
        assert!(store.load_notes().is_empty());
        let backup = fs::read_to_string(&store.notes_backup_path).expect("read backup");
        assert_eq!(backup, "{not json");
    }

    #[test]
    fn one_bad_record_does_not_hide_the_others() {
        let temp = tempdir().expect("tempdir");
        let store = NoteStore::open(temp.path()).expect("open store");
        let raw = r##"[
            {"id":"a","date":"2025-03-15","content":"good one","color":"#FFFFFF","createdAt":"2025-03-15T08:00:00Z"},
            {"id":"b","date":"2025-03-15","content":42,"color":"#FFFFFF","createdAt":"2025-03-15T08:00:00Z"},
            {"id":"c","date":"2025-03-16","content":"no timestamp","color":"#FFF9C4"}
        ]"##;
        fs::write(&store.notes_path, raw).expect("write notes");

        let notes = store.load_notes();
        let ids: Vec<&str> = notes.iter().map(|note| note.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        let backup = fs::read_to_string(&store.notes_backup_path).expect("read backup");
        assert_eq!(backup, raw);
    }

    #[test]
    fn clean_file_leaves_no_backup() {
        let temp = tempdir().expect("tempdir");
        let store = NoteStore::open(temp.path()).expect("open store");
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid date");
        store
            .save_notes(&[sample_note(date, "one")])
            .expect("save notes");
        assert_eq!(store.load_notes().len(), 1);
        assert!(!store.notes_backup_path.exists());
    }

    #[test]
    fn onboarding_flag_persists() {
        let temp = tempdir().expect("tempdir");
        let store = NoteStore::open(temp.path()).expect("open store");
        assert!(!store.is_onboarding_completed());
        store.set_onboarding_completed().expect("set flag");
        assert!(store.is_onboarding_completed());

        let reopened = NoteStore::open(temp.path()).expect("reopen store");
        assert!(reopened.is_onboarding_completed());
    }

    #[test]
    fn cursor_persists_and_ignores_garbage() {
        let temp = tempdir().expect("tempdir");
        let store = NoteStore::open(temp.path()).expect("open store");
        assert_eq!(store.load_cursor(), None);

        let date = NaiveDate::from_ymd_opt(2025, 1, 31).expect("valid date");
        let cursor = Cursor::new(date, ViewType::Month);
        store.save_cursor(cursor).expect("save cursor");
        assert_eq!(store.load_cursor(), Some(cursor));

        fs::write(&store.cursor_path, r#"{"date":"2025-01-31","view":"decade"}"#)
            .expect("write garbage");
        assert_eq!(store.load_cursor(), None);
    }
}
