//! Calendar-day arithmetic.
//!
//! Everything here works on [`NaiveDate`], i.e. a local calendar day with
//! no time-of-day and no zone attached. Two values are equal iff they name
//! the same local day, which is exactly the identity notes are keyed by.
//!
//! Month and year steps clamp to the last valid day of the target month:
//! Jan 31 + 1 month is Feb 28 (Feb 29 in a leap year), never a day in
//! March. Results outside chrono's range leave the input unchanged.

use chrono::{
  Datelike,
  Duration,
  Month,
  NaiveDate,
  Weekday
};

#[must_use]
pub fn add_days(
  date: NaiveDate,
  days: i64
) -> NaiveDate {
  date
    .checked_add_signed(Duration::days(
      days
    ))
    .unwrap_or(date)
}

#[must_use]
pub fn add_months(
  date: NaiveDate,
  months: i32
) -> NaiveDate {
  let Some(total) = date
    .year()
    .checked_mul(12)
    .and_then(|base| {
      base.checked_add(
        date.month0() as i32
      )
    })
    .and_then(|base| {
      base.checked_add(months)
    })
  else {
    return date;
  };

  let year = total.div_euclid(12);
  let month =
    total.rem_euclid(12) as u32 + 1;
  clamp_day(year, month, date.day())
    .unwrap_or(date)
}

#[must_use]
pub fn add_years(
  date: NaiveDate,
  years: i32
) -> NaiveDate {
  let Some(year) =
    date.year().checked_add(years)
  else {
    return date;
  };
  clamp_day(
    year,
    date.month(),
    date.day()
  )
  .unwrap_or(date)
}

/// Monday of the week containing
/// `date`. Sunday belongs to the end of
/// its week, so it rolls back six days.
#[must_use]
pub fn start_of_week(
  date: NaiveDate
) -> NaiveDate {
  let diff = match date.weekday() {
    | Weekday::Sun => -6,
    | other => {
      -(other.num_days_from_monday()
        as i64)
    }
  };
  add_days(date, diff)
}

#[must_use]
pub fn end_of_week(
  date: NaiveDate
) -> NaiveDate {
  add_days(start_of_week(date), 6)
}

/// ISO-8601 week number.
///
/// Moves to the Thursday of `date`'s
/// week and counts whole weeks from
/// January 1st of the Thursday's year,
/// so late-December days can land in
/// week 1 of the next year and early
/// January days in week 52/53 of the
/// previous one.
#[must_use]
pub fn week_number(
  date: NaiveDate
) -> u32 {
  let thursday = add_days(
    date,
    3 - date
      .weekday()
      .num_days_from_monday()
      as i64
  );
  let year_start = first_day_of_month(
    thursday.year(),
    1
  );
  let elapsed = thursday
    .signed_duration_since(year_start)
    .num_days();

  // ceil((elapsed + 1) / 7) for
  // non-negative elapsed
  (elapsed / 7 + 1) as u32
}

#[must_use]
pub fn first_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  NaiveDate::from_ymd_opt(
    year, month, 1
  )
  .unwrap_or(NaiveDate::MIN)
}

#[must_use]
pub fn days_in_month(
  year: i32,
  month: u32
) -> u32 {
  let (next_year, next_month) =
    if month >= 12 {
      (year.saturating_add(1), 1_u32)
    } else {
      (year, month + 1)
    };
  NaiveDate::from_ymd_opt(
    next_year, next_month, 1
  )
  .and_then(|first| first.pred_opt())
  .map(|last| last.day())
  .unwrap_or(31)
}

#[must_use]
pub fn month_of(
  date: NaiveDate
) -> Month {
  u8::try_from(date.month())
    .ok()
    .and_then(|number| {
      Month::try_from(number).ok()
    })
    .unwrap_or(Month::January)
}

fn clamp_day(
  year: i32,
  month: u32,
  desired_day: u32
) -> Option<NaiveDate> {
  let day = desired_day
    .min(days_in_month(year, month));
  NaiveDate::from_ymd_opt(
    year, month, day
  )
}
