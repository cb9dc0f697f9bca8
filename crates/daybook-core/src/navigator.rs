use chrono::{
  Datelike,
  Month,
  NaiveDate
};
use serde::{
  Deserialize,
  Serialize
};

use crate::clock::Clock;
use crate::datemath::{
  add_days,
  add_months,
  add_years,
  first_day_of_month
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
  Year,
  Month,
  Week,
  Day
}

impl ViewType {
  pub fn all() -> [Self; 4] {
    [
      Self::Year,
      Self::Month,
      Self::Week,
      Self::Day
    ]
  }

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Year => "year",
      | Self::Month => "month",
      | Self::Week => "week",
      | Self::Day => "day"
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "year" => Some(Self::Year),
      | "month" => Some(Self::Month),
      | "week" => Some(Self::Week),
      | "day" => Some(Self::Day),
      | _ => None
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Direction {
  Previous,
  Next
}

impl Direction {
  fn sign(self) -> i32 {
    match self {
      | Self::Previous => -1,
      | Self::Next => 1
    }
  }
}

pub fn step(
  date: NaiveDate,
  view: ViewType,
  direction: Direction
) -> NaiveDate {
  let sign = direction.sign();
  match view {
    | ViewType::Year => {
      add_years(date, sign)
    }
    | ViewType::Month => {
      add_months(date, sign)
    }
    | ViewType::Week => {
      add_days(date, i64::from(sign) * 7)
    }
    | ViewType::Day => {
      add_days(date, i64::from(sign))
    }
  }
}

#[must_use]
pub fn previous(
  date: NaiveDate,
  view: ViewType
) -> NaiveDate {
  step(date, view, Direction::Previous)
}

#[must_use]
pub fn next(
  date: NaiveDate,
  view: ViewType
) -> NaiveDate {
  step(date, view, Direction::Next)
}

/// Steps using a view name as received
/// from outside. Unknown names leave the
/// cursor where it is.
pub fn step_keyed(
  date: NaiveDate,
  raw_view: &str,
  direction: Direction
) -> NaiveDate {
  match ViewType::from_key(raw_view) {
    | Some(view) => {
      step(date, view, direction)
    }
    | None => {
      tracing::warn!(
        view = %raw_view,
        "unknown view type; cursor unchanged"
      );
      date
    }
  }
}

pub fn today(clock: &Clock) -> NaiveDate {
  clock.today()
}

/// Whether the header should offer a
/// jump back to today.
pub fn show_today_button(
  cursor: NaiveDate,
  view: ViewType,
  today: NaiveDate
) -> bool {
  match view {
    | ViewType::Day | ViewType::Week => {
      cursor != today
    }
    | ViewType::Month => {
      (cursor.year(), cursor.month())
        != (today.year(), today.month())
    }
    | ViewType::Year => {
      cursor.year() != today.year()
    }
  }
}

/// The date under navigation plus the
/// active granularity.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct Cursor {
  pub date: NaiveDate,
  pub view: ViewType
}

impl Cursor {
  pub fn new(
    date: NaiveDate,
    view: ViewType
  ) -> Self {
    Self { date, view }
  }

  #[must_use]
  pub fn previous(self) -> Self {
    Self {
      date: previous(
        self.date, self.view
      ),
      ..self
    }
  }

  #[must_use]
  pub fn next(self) -> Self {
    Self {
      date: next(self.date, self.view),
      ..self
    }
  }

  #[must_use]
  pub fn today(
    self,
    clock: &Clock
  ) -> Self {
    Self {
      date: today(clock),
      ..self
    }
  }

  /// Changes granularity only; the date
  /// is carried over untouched.
  #[must_use]
  pub fn switch_view(
    self,
    view: ViewType
  ) -> Self {
    Self { view, ..self }
  }

  #[must_use]
  pub fn select_day(
    date: NaiveDate
  ) -> Self {
    Self::new(date, ViewType::Day)
  }

  #[must_use]
  pub fn select_week(
    date: NaiveDate
  ) -> Self {
    Self::new(date, ViewType::Week)
  }

  #[must_use]
  pub fn select_month(
    year: i32,
    month: Month
  ) -> Self {
    Self::new(
      first_day_of_month(
        year,
        month.number_from_month()
      ),
      ViewType::Month
    )
  }

  pub fn show_today_button(
    self,
    today: NaiveDate
  ) -> bool {
    show_today_button(
      self.date, self.view, today
    )
  }
}
