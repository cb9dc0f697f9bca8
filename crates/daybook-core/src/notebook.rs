use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use crate::note::{Note, palette_color};
use crate::note_index::{NoteIndex, notes_for_day};

/// Input of the note editor: an existing note's id when editing, none when
/// creating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub id: Option<String>,
    pub content: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(String),
    Updated(String),
    /// Blank content; nothing was written.
    Ignored,
}

/// The in-memory note collection and the actions that change it.
#[derive(Debug, Clone, Default)]
pub struct NoteBook {
    notes: Vec<Note>,
}

impl NoteBook {
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn index(&self) -> NoteIndex {
        NoteIndex::build(&self.notes)
    }

    pub fn notes_for_day(&self, date: NaiveDate) -> Vec<&Note> {
        notes_for_day(&self.notes, date)
    }

    pub fn find(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    #[tracing::instrument(skip(self, draft), fields(id = ?draft.id))]
    pub fn save(
        &mut self,
        draft: NoteDraft,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> anyhow::Result<SaveOutcome> {
        let content = draft.content.trim();
        if content.is_empty() {
            debug!("blank note content; nothing saved");
            return Ok(SaveOutcome::Ignored);
        }

        let color = palette_color(&draft.color)
            .ok_or_else(|| anyhow!("color {} is not in the note palette", draft.color))?;

        match draft.id {
            Some(id) => {
                let note = self
                    .notes
                    .iter_mut()
                    .find(|note| note.id == id)
                    .ok_or_else(|| anyhow!("note not found: {id}"))?;
                note.content = content.to_string();
                note.color = color.to_string();
                info!(id = %id, "updated note");
                Ok(SaveOutcome::Updated(id))
            }
            None => {
                let note = Note::new(date, content.to_string(), color, now);
                let id = note.id.clone();
                info!(id = %id, date = %note.date, "created note");
                self.notes.push(note);
                Ok(SaveOutcome::Created(id))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        let removed = self.notes.len() != before;
        debug!(removed, "delete note");
        removed
    }
}
