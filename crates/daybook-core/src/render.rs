use std::io::{self, IsTerminal, Write};

use chrono::{Datelike, NaiveDate};
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::datemath::{end_of_week, start_of_week};
use crate::grid::{DayCell, MonthCells, MonthGrid, WeekCells, week_rows};
use crate::labels::{Labels, Language};
use crate::navigator::{Cursor, ViewType};
use crate::note::Note;

pub const PRIVACY_POLICY_URL: &str = "https://example.com/privacy";
pub const TERMS_OF_SERVICE_URL: &str = "https://example.com/terms";

const NOTE_MARKER: &str = "•";

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    language: Language,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            color: cfg.color_enabled()? && io::stdout().is_terminal(),
            language: cfg.language()?,
        })
    }

    pub fn plain(language: Language) -> Self {
        Self {
            color: false,
            language,
        }
    }

    fn labels(&self) -> &'static Labels {
        self.language.labels()
    }

    /// Header title for the active view.
    pub fn title(&self, cursor: Cursor) -> String {
        let labels = self.labels();
        let date = cursor.date;
        match cursor.view {
            ViewType::Year => date.year().to_string(),
            ViewType::Month => format!("{} {}", labels.month(date.month()), date.year()),
            ViewType::Week => {
                let start = start_of_week(date);
                let end = end_of_week(date);
                if start.month() == end.month() {
                    format!("{} - {} {}", start.day(), end.day(), labels.month(start.month()))
                } else {
                    format!(
                        "{} {} - {} {}",
                        start.day(),
                        labels.month(start.month()),
                        end.day(),
                        labels.month(end.month())
                    )
                }
            }
            ViewType::Day => format!("{} {}", date.day(), labels.month(date.month())),
        }
    }

    pub fn write_header<W: Write>(
        &self,
        out: &mut W,
        cursor: Cursor,
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        let labels = self.labels();
        let tabs = ViewType::all()
            .into_iter()
            .map(|view| {
                let label = labels.view(view);
                if view == cursor.view {
                    self.paint(&format!("[{label}]"), "1;34")
                } else {
                    format!(" {label} ")
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{tabs}")?;
        writeln!(out, "< {} >", self.paint(&self.title(cursor), "1"))?;
        if cursor.show_today_button(today) {
            writeln!(out, "  {}", self.paint(labels.go_to_today, "34"))?;
        }
        writeln!(out)?;
        Ok(())
    }

    pub fn write_month<W: Write>(&self, out: &mut W, days: &MonthCells) -> anyhow::Result<()> {
        let labels = self.labels();
        write!(out, "{:>3} ", "")?;
        for name in labels.days_short {
            write!(out, "{} ", pad(&truncate(name, 3), 3))?;
        }
        writeln!(out)?;

        for row in week_rows(days) {
            write!(out, "{} ", self.paint(&format!("{:>3}", row.week_number), "2"))?;
            for cell in row.days {
                write!(out, "{} ", self.month_cell(cell))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn write_year<W: Write>(&self, out: &mut W, months: &[MonthGrid]) -> anyhow::Result<()> {
        let labels = self.labels();
        for grid in months {
            writeln!(out, "{}", self.paint(labels.month(grid.month.number_from_month()), "1"))?;
            for row in grid.days.chunks(7) {
                let line = row
                    .iter()
                    .map(|cell| self.month_cell(cell))
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(out, "  {line}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn write_week<W: Write>(&self, out: &mut W, days: &WeekCells) -> anyhow::Result<()> {
        let labels = self.labels();
        let name_width = labels
            .days_full
            .iter()
            .map(|name| UnicodeWidthStr::width(*name))
            .max()
            .unwrap_or(0);

        for (idx, cell) in days.iter().enumerate() {
            let name = pad(labels.days_full[idx], name_width);
            let number = format!("{:>2}", cell.date.day());
            let (name, number) = if cell.is_today {
                (self.paint(&name, "1;34"), self.paint(&number, "7"))
            } else {
                (name, number)
            };
            if cell.has_notes {
                writeln!(
                    out,
                    "{name}  {number}  {} {}",
                    self.paint(NOTE_MARKER, "33"),
                    labels.has_notes
                )?;
            } else {
                writeln!(out, "{name}  {number}")?;
            }
        }
        Ok(())
    }

    pub fn write_day<W: Write>(
        &self,
        out: &mut W,
        date: NaiveDate,
        notes: &[&Note],
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        let labels = self.labels();
        let weekday = labels.days_full[date.weekday().num_days_from_monday() as usize];
        let heading = format!(
            "{weekday}, {} {} {}",
            date.day(),
            labels.month(date.month()),
            date.year()
        );
        if date == today {
            writeln!(out, "{}", self.paint(&heading, "1;34"))?;
        } else {
            writeln!(out, "{heading}")?;
        }

        if notes.is_empty() {
            writeln!(out, "  {}", self.paint(labels.no_notes, "2"))?;
            return Ok(());
        }

        for note in notes {
            let swatch = self.paint(&format!("[{}]", note.color), "2");
            let short_id: String = note.id.chars().take(8).collect();
            let mut lines = note.content.lines();
            let first = lines.next().unwrap_or_default();
            writeln!(out, "  {swatch} {} {first}", self.paint(&short_id, "33"))?;
            for line in lines {
                writeln!(out, "{:>21}{line}", "")?;
            }
        }
        Ok(())
    }

    pub fn write_settings<W: Write>(
        &self,
        out: &mut W,
        version: &str,
        data_dir: &str,
    ) -> anyhow::Result<()> {
        let labels = self.labels();
        writeln!(out, "{}", self.paint(labels.settings, "1"))?;
        let rows = vec![
            vec![labels.language.to_string(), labels.language_name.to_string()],
            vec!["Data".to_string(), data_dir.to_string()],
            vec![labels.app_version.to_string(), version.to_string()],
            vec![labels.privacy_policy.to_string(), PRIVACY_POLICY_URL.to_string()],
            vec![labels.terms.to_string(), TERMS_OF_SERVICE_URL.to_string()],
        ];
        write_rows(out, rows)
    }

    pub fn write_onboarding<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        let labels = self.labels();
        for (idx, (title, description)) in labels.onboarding.iter().enumerate() {
            writeln!(out, "{}. {}", idx + 1, self.paint(title, "1"))?;
            writeln!(out, "   {description}")?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn month_cell(&self, cell: &DayCell) -> String {
        let number = format!("{:>2}", cell.date.day());
        let number = if cell.is_today {
            self.paint(&number, "7")
        } else if !cell.is_current_month {
            self.paint(&number, "2")
        } else {
            number
        };
        let marker = if cell.has_notes {
            self.paint(NOTE_MARKER, "33")
        } else {
            " ".to_string()
        };
        format!("{number}{marker}")
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_rows<W: Write>(out: &mut W, rows: Vec<Vec<String>>) -> anyhow::Result<()> {
    let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; column_count];
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for row in rows {
        let line = row
            .iter()
            .enumerate()
            .map(|(idx, cell)| pad(cell, widths[idx]))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(out, "  {}", line.trim_end())?;
    }
    Ok(())
}

fn pad(text: &str, width: usize) -> String {
    let visible = UnicodeWidthStr::width(strip_ansi(text).as_str());
    format!("{text}{}", " ".repeat(width.saturating_sub(visible)))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
