use chrono::{
  Local,
  NaiveDate,
  Utc
};
use chrono_tz::Tz;

use crate::config::Config;

const TIMEZONE_ENV_VAR: &str =
  "DAYBOOK_TIMEZONE";

/// Source of "today". Notes are keyed by
/// local calendar day, so the day is
/// always read in a concrete zone rather
/// than from UTC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clock {
  SystemLocal,
  Zoned(Tz),
  Fixed(NaiveDate)
}

impl Clock {
  #[tracing::instrument(skip(cfg))]
  pub fn from_config(cfg: &Config) -> Self {
    if let Ok(raw) =
      std::env::var(TIMEZONE_ENV_VAR)
      && let Some(tz) = parse_timezone(
        &raw,
        TIMEZONE_ENV_VAR
      )
    {
      return Self::Zoned(tz);
    }

    if let Some(tz) = cfg.timezone() {
      return Self::Zoned(tz);
    }

    tracing::debug!(
      "no timezone configured; using \
       system local time"
    );
    Self::SystemLocal
  }

  pub fn fixed(date: NaiveDate) -> Self {
    Self::Fixed(date)
  }

  pub fn today(&self) -> NaiveDate {
    match self {
      | Self::SystemLocal => {
        Local::now().date_naive()
      }
      | Self::Zoned(tz) => {
        Utc::now()
          .with_timezone(tz)
          .date_naive()
      }
      | Self::Fixed(date) => *date
    }
  }
}

pub(crate) fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    tracing::warn!(
      source,
      "timezone source was empty"
    );
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      tracing::info!(
        source,
        timezone = %trimmed,
        "configured timezone"
      );
      Some(tz)
    }
    | Err(err) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %err,
        "failed to parse timezone id"
      );
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fixed_clock_reports_its_date() {
    let date =
      NaiveDate::from_ymd_opt(2025, 3, 15)
        .expect("valid date");
    assert_eq!(
      Clock::fixed(date).today(),
      date
    );
  }

  #[test]
  fn parses_known_zone_and_rejects_garbage()
  {
    assert_eq!(
      parse_timezone(
        " Europe/Istanbul ",
        "test"
      ),
      Some(chrono_tz::Europe::Istanbul)
    );
    assert_eq!(
      parse_timezone("Mars/Olympus", "test"),
      None
    );
    assert_eq!(
      parse_timezone("  ", "test"),
      None
    );
  }

  #[test]
  fn zoned_today_matches_zone_date() {
    let tz = chrono_tz::Pacific::Kiritimati;
    let before =
      Utc::now().with_timezone(&tz).date_naive();
    let today = Clock::Zoned(tz).today();
    let after =
      Utc::now().with_timezone(&tz).date_naive();
    assert!(before <= today && today <= after);
  }
}
