use std::io::Write;

use anyhow::{Context, anyhow};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use tracing::{info, instrument, warn};

use crate::cli::Command;
use crate::clock::Clock;
use crate::config::Config;
use crate::datemath::month_of;
use crate::grid::{build_month_grid, build_week_grid, build_year_grid};
use crate::navigator::{Cursor, ViewType};
use crate::note::default_color;
use crate::notebook::{NoteBook, NoteDraft, SaveOutcome};
use crate::render::Renderer;
use crate::store::NoteStore;

/// Everything a command needs, assembled once per invocation.
pub struct Session<'a> {
    pub store: &'a NoteStore,
    pub cfg: &'a Config,
    pub renderer: &'a Renderer,
    pub clock: Clock,
    pub now: DateTime<Utc>,
}

impl Session<'_> {
    /// Last saved cursor, or today in the configured default view.
    pub fn initial_cursor(&self) -> Cursor {
        if let Some(cursor) = self.store.load_cursor() {
            return cursor;
        }
        let view = self.cfg.default_view().unwrap_or_else(|err| {
            warn!(error = %err, "falling back to the day view");
            ViewType::Day
        });
        Cursor::new(self.clock.today(), view)
    }
}

/// Shows the welcome slides the first time daybook runs and records that
/// they were seen. `skip` marks them seen without printing. Returns whether
/// anything was printed.
#[instrument(skip(store, renderer, out))]
pub fn show_onboarding_once<W: Write>(
    store: &NoteStore,
    renderer: &Renderer,
    out: &mut W,
    skip: bool,
) -> anyhow::Result<bool> {
    if store.is_onboarding_completed() {
        return Ok(false);
    }
    if !skip {
        info!("first run; showing onboarding");
        renderer.write_onboarding(out)?;
    }
    store.set_onboarding_completed()?;
    Ok(!skip)
}

#[instrument(skip(session, out))]
pub fn dispatch<W: Write>(
    session: &Session<'_>,
    out: &mut W,
    command: Option<Command>,
) -> anyhow::Result<()> {
    let cursor = session.initial_cursor();
    let command = command.unwrap_or(Command::Show {
        view: None,
        date: None,
    });

    match command {
        Command::Show { view, date } => {
            let mut next = cursor;
            if let Some(raw) = view {
                match ViewType::from_key(&raw) {
                    Some(view) => next = next.switch_view(view),
                    None => warn!(view = %raw, "unknown view; keeping {}", cursor.view.as_key()),
                }
            }
            if let Some(date) = date {
                next.date = date.date();
            }
            navigate(session, out, next)
        }
        Command::Prev => navigate(session, out, cursor.previous()),
        Command::Next => navigate(session, out, cursor.next()),
        Command::Today => navigate(session, out, cursor.today(&session.clock)),
        Command::Day { date } => navigate(session, out, Cursor::select_day(date.date())),
        Command::Week { date } => navigate(session, out, Cursor::select_week(date.date())),
        Command::Month { month } => {
            navigate(session, out, Cursor::select_month(month.year, month.month))
        }
        Command::Add { date, color, text } => {
            let date = date.map(|key| key.date()).unwrap_or(cursor.date);
            let draft = NoteDraft {
                id: None,
                content: text.join(" "),
                color: color.unwrap_or_else(|| default_color().to_string()),
            };
            save_note(session, out, draft, date)
        }
        Command::Edit { id, color, text } => {
            let book = NoteBook::new(session.store.load_notes());
            let existing = book
                .find(&id)
                .ok_or_else(|| anyhow!("note not found: {id}"))?;
            let date = existing.date_key().map(|key| key.date()).unwrap_or(cursor.date);
            let draft = NoteDraft {
                id: Some(id.clone()),
                content: if text.is_empty() {
                    existing.content.clone()
                } else {
                    text.join(" ")
                },
                color: color.unwrap_or_else(|| existing.color.clone()),
            };
            save_note(session, out, draft, date)
        }
        Command::Delete { id } => {
            let mut book = NoteBook::new(session.store.load_notes());
            if !book.delete(&id) {
                return Err(anyhow!("note not found: {id}"));
            }
            session.store.save_notes(book.notes())?;
            info!(id = %id, "deleted note");
            writeln!(out, "Deleted note {id}.")?;
            Ok(())
        }
        Command::Notes { date } => {
            let date = date.map(|key| key.date()).unwrap_or(cursor.date);
            let book = NoteBook::new(session.store.load_notes());
            session
                .renderer
                .write_day(out, date, &book.notes_for_day(date), session.clock.today())
        }
        Command::Settings => session.renderer.write_settings(
            out,
            env!("CARGO_PKG_VERSION"),
            &session.store.data_dir.display().to_string(),
        ),
    }
}

#[instrument(skip(session, out), fields(view = cursor.view.as_key(), date = %cursor.date))]
fn navigate<W: Write>(session: &Session<'_>, out: &mut W, cursor: Cursor) -> anyhow::Result<()> {
    session
        .store
        .save_cursor(cursor)
        .context("failed to remember calendar position")?;
    let book = NoteBook::new(session.store.load_notes());
    render_view(session.renderer, out, cursor, &book, session.clock.today())
}

#[instrument(skip(session, out, draft))]
fn save_note<W: Write>(
    session: &Session<'_>,
    out: &mut W,
    draft: NoteDraft,
    date: NaiveDate,
) -> anyhow::Result<()> {
    let mut book = NoteBook::new(session.store.load_notes());
    match book.save(draft, date, session.now)? {
        SaveOutcome::Created(id) => {
            session.store.save_notes(book.notes())?;
            writeln!(out, "Created note {id}.")?;
        }
        SaveOutcome::Updated(id) => {
            session.store.save_notes(book.notes())?;
            writeln!(out, "Updated note {id}.")?;
        }
        SaveOutcome::Ignored => {
            writeln!(out, "Empty note; nothing saved.")?;
            return Ok(());
        }
    }
    session
        .renderer
        .write_day(out, date, &book.notes_for_day(date), session.clock.today())
}

/// Builds the grid (or day list) for `cursor` and writes it out.
pub fn render_view<W: Write>(
    renderer: &Renderer,
    out: &mut W,
    cursor: Cursor,
    book: &NoteBook,
    today: NaiveDate,
) -> anyhow::Result<()> {
    renderer.write_header(out, cursor, today)?;
    let date = cursor.date;
    match cursor.view {
        ViewType::Year => {
            let index = book.index();
            renderer.write_year(out, &build_year_grid(date.year(), &index, today))
        }
        ViewType::Month => {
            let index = book.index();
            let grid = build_month_grid(date.year(), month_of(date), &index, today);
            renderer.write_month(out, &grid)
        }
        ViewType::Week => {
            let index = book.index();
            renderer.write_week(out, &build_week_grid(date, &index, today))
        }
        ViewType::Day => renderer.write_day(out, date, &book.notes_for_day(date), today),
    }
}
