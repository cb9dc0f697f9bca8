//! Day grids for the year, month and week views.
//!
//! Month grids are always six full Monday-first weeks (42 cells) so the
//! layout never changes height; days borrowed from the neighbouring months
//! are kept and flagged with `is_current_month = false`. `today` is passed
//! in by the caller, which keeps every builder a pure function of its
//! arguments.

use chrono::{Datelike, Month, NaiveDate};
use serde::Serialize;

use crate::datemath::{add_days, first_day_of_month, start_of_week, week_number};
use crate::note_index::NoteIndex;

pub const MONTH_GRID_CELLS: usize = 42;
pub const WEEK_GRID_CELLS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    pub has_notes: bool,
}

impl DayCell {
    fn new(date: NaiveDate, is_current_month: bool, index: &NoteIndex, today: NaiveDate) -> Self {
        Self {
            date,
            is_current_month,
            is_today: date == today,
            has_notes: index.has_notes_on(date),
        }
    }
}

pub type MonthCells = [DayCell; MONTH_GRID_CELLS];
pub type WeekCells = [DayCell; WEEK_GRID_CELLS];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: Month,
    pub days: MonthCells,
}

/// One row of a month grid together with the ISO week number of its Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRow<'a> {
    pub week_number: u32,
    pub days: &'a [DayCell],
}

pub fn build_month_grid(year: i32, month: Month, index: &NoteIndex, today: NaiveDate) -> MonthCells {
    let month_number = month.number_from_month();
    let first_day = first_day_of_month(year, month_number);
    let grid_start = start_of_week(first_day);

    std::array::from_fn(|offset| {
        let date = add_days(grid_start, offset as i64);
        let is_current_month = date.year() == year && date.month() == month_number;
        DayCell::new(date, is_current_month, index, today)
    })
}

pub fn build_week_grid(date: NaiveDate, index: &NoteIndex, today: NaiveDate) -> WeekCells {
    let monday = start_of_week(date);
    std::array::from_fn(|offset| DayCell::new(add_days(monday, offset as i64), true, index, today))
}

/// Twelve independent month grids, January first.
#[tracing::instrument(skip(index, today))]
pub fn build_year_grid(year: i32, index: &NoteIndex, today: NaiveDate) -> Vec<MonthGrid> {
    (1..=12_u8)
        .filter_map(|number| Month::try_from(number).ok())
        .map(|month| MonthGrid {
            year,
            month,
            days: build_month_grid(year, month, index, today),
        })
        .collect()
}

pub fn week_rows(days: &MonthCells) -> Vec<WeekRow<'_>> {
    days.chunks(WEEK_GRID_CELLS)
        .map(|row| WeekRow {
            week_number: week_number(row[0].date),
            days: row,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::*;
    use crate::date_key::DateKey;
    use crate::note::Note;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn month(number: u8) -> Month {
        Month::try_from(number).expect("valid month")
    }

    fn note_on(date: &str) -> Note {
        Note {
            id: date.to_string(),
            date: date.to_string(),
            content: "note".to_string(),
            color: "#FFFFFF".to_string(),
            created_at: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn every_month_grid_is_full_contiguous_and_contains_the_first() {
        let index = NoteIndex::default();
        let today = ymd(2025, 6, 1);
        for year in [1999, 2000, 2023, 2024, 2025, 2026, 2100] {
            for number in 1..=12_u8 {
                let grid = build_month_grid(year, month(number), &index, today);
                assert_eq!(grid.len(), MONTH_GRID_CELLS);
                assert_eq!(grid[0].date.weekday(), Weekday::Mon);
                assert_eq!(grid[41].date.weekday(), Weekday::Sun);

                let first = DateKey::new(ymd(year, u32::from(number), 1));
                assert!(grid.iter().any(|cell| DateKey::new(cell.date) == first));

                for pair in grid.windows(2) {
                    assert_eq!(pair[1].date, add_days(pair[0].date, 1));
                }
            }
        }
    }

    #[test]
    fn month_starting_on_monday_still_pads_with_next_month() {
        // September 2025 starts on a Monday and has 30 days
        let grid = build_month_grid(2025, Month::September, &NoteIndex::default(), ymd(2025, 1, 1));
        assert_eq!(grid[0].date, ymd(2025, 9, 1));
        assert!(grid[0].is_current_month);
        assert_eq!(grid[29].date, ymd(2025, 9, 30));
        assert!(!grid[30].is_current_month);
        assert_eq!(grid[41].date, ymd(2025, 10, 12));
    }

    #[test]
    fn leading_padding_comes_from_previous_month() {
        // March 2025 starts on a Saturday
        let grid = build_month_grid(2025, Month::March, &NoteIndex::default(), ymd(2025, 1, 1));
        assert_eq!(grid[0].date, ymd(2025, 2, 24));
        assert!(grid[..5].iter().all(|cell| !cell.is_current_month));
        assert!(grid[5].is_current_month);
        assert_eq!(grid[5].date, ymd(2025, 3, 1));
    }

    #[test]
    fn january_padding_is_not_current_month_across_years() {
        // January 2026 starts on Thursday; padding days are December 2025
        let grid = build_month_grid(2026, Month::January, &NoteIndex::default(), ymd(2026, 1, 1));
        assert_eq!(grid[0].date, ymd(2025, 12, 29));
        assert!(!grid[0].is_current_month);
        assert!(grid[3].is_current_month);
    }

    #[test]
    fn flags_today_and_notes() {
        let index = NoteIndex::build(&[note_on("2025-03-15"), note_on("2025-02-24")]);
        let today = ymd(2025, 3, 10);
        let grid = build_month_grid(2025, Month::March, &index, today);

        let todays: Vec<_> = grid.iter().filter(|cell| cell.is_today).collect();
        assert_eq!(todays.len(), 1);
        assert_eq!(todays[0].date, today);

        let noted: Vec<_> = grid
            .iter()
            .filter(|cell| cell.has_notes)
            .map(|cell| cell.date)
            .collect();
        assert_eq!(noted, vec![ymd(2025, 2, 24), ymd(2025, 3, 15)]);
    }

    #[test]
    fn rebuilding_with_same_index_is_identical() {
        let index = NoteIndex::build(&[note_on("2025-03-15")]);
        let today = ymd(2025, 3, 10);
        let first = build_month_grid(2025, Month::March, &index, today);
        let second = build_month_grid(2025, Month::March, &index, today);
        assert_eq!(first, second);
    }

    #[test]
    fn week_grid_runs_monday_to_sunday() {
        let index = NoteIndex::build(&[note_on("2025-03-16")]);
        // Sunday
        let week = build_week_grid(ymd(2025, 3, 16), &index, ymd(2025, 3, 12));
        assert_eq!(week[0].date, ymd(2025, 3, 10));
        assert_eq!(week[6].date, ymd(2025, 3, 16));
        assert!(week.iter().all(|cell| cell.is_current_month));
        assert!(week[6].has_notes);
        assert!(week[2].is_today);
        assert_eq!(week.iter().filter(|cell| cell.is_today).count(), 1);
    }

    #[test]
    fn week_grid_spanning_months_keeps_current_month_flag() {
        let week = build_week_grid(ymd(2025, 3, 1), &NoteIndex::default(), ymd(2025, 1, 1));
        assert_eq!(week[0].date, ymd(2025, 2, 24));
        assert!(week.iter().all(|cell| cell.is_current_month));
    }

    #[test]
    fn year_grid_has_twelve_independent_months() {
        let index = NoteIndex::build(&[note_on("2025-02-24")]);
        let today = ymd(2025, 7, 4);
        let year = build_year_grid(2025, &index, today);
        assert_eq!(year.len(), 12);
        assert_eq!(year[0].month, Month::January);
        assert_eq!(year[11].month, Month::December);

        for grid in &year {
            assert_eq!(grid.days, build_month_grid(2025, grid.month, &index, today));
        }

        // 2025-02-24 shows in February proper and as padding in March
        assert!(year[1].days.iter().any(|c| c.has_notes && c.is_current_month));
        assert!(year[2].days.iter().any(|c| c.has_notes && !c.is_current_month));
    }

    #[test]
    fn week_rows_carry_iso_numbers() {
        let grid = build_month_grid(2025, Month::December, &NoteIndex::default(), ymd(2025, 1, 1));
        let rows = week_rows(&grid);
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|row| row.days.len() == 7));
        let numbers: Vec<u32> = rows.iter().map(|row| row.week_number).collect();
        assert_eq!(numbers, vec![49, 50, 51, 52, 1, 2]);
    }
}
