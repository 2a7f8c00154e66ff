use std::fmt;
use std::str::FromStr;

use chrono::{
  DateTime,
  Datelike,
  NaiveDate,
  NaiveDateTime,
  NaiveTime,
  Timelike
};
use thiserror::Error;

use crate::api::DATE_FORMAT;

const UK_WEEKDAYS: [&str; 7] = [
  "Неділя",
  "Понеділок",
  "Вівторок",
  "Середа",
  "Четвер",
  "П'ятниця",
  "Субота"
];

// genitive, as in "5 травня"
const UK_MONTHS: [&str; 12] = [
  "січня",
  "лютого",
  "березня",
  "квітня",
  "травня",
  "червня",
  "липня",
  "серпня",
  "вересня",
  "жовтня",
  "листопада",
  "грудня"
];

const UK_MONTHS_NOMINATIVE: [&str; 12] = [
  "Січень",
  "Лютий",
  "Березень",
  "Квітень",
  "Травень",
  "Червень",
  "Липень",
  "Серпень",
  "Вересень",
  "Жовтень",
  "Листопад",
  "Грудень"
];

// Monday first, as the month grid is laid out
const UK_WEEKDAYS_SHORT: [&str; 7] = [
  "Пн", "Вт", "Ср", "Чт", "Пт", "Сб",
  "Нд"
];

const EN_WEEKDAYS_SHORT: [&str; 7] = [
  "Mo", "Tu", "We", "Th", "Fr", "Sa",
  "Su"
];

const EN_WEEKDAYS: [&str; 7] = [
  "Sunday",
  "Monday",
  "Tuesday",
  "Wednesday",
  "Thursday",
  "Friday",
  "Saturday"
];

const EN_MONTHS: [&str; 12] = [
  "January",
  "February",
  "March",
  "April",
  "May",
  "June",
  "July",
  "August",
  "September",
  "October",
  "November",
  "December"
];

#[derive(
  Debug, Clone, PartialEq, Eq, Error,
)]
pub enum DateError {
  #[error("invalid date: {0}")]
  Date(String),
  #[error("invalid time: {0}")]
  Time(String)
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum Locale {
  #[default]
  Uk,
  En
}

impl FromStr for Locale {
  type Err = String;

  fn from_str(
    raw: &str
  ) -> Result<Self, Self::Err> {
    match raw
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "uk" | "uk-ua" | "ua" => {
        Ok(Self::Uk)
      }
      | "en" | "en-us" | "en-gb" => {
        Ok(Self::En)
      }
      | other => {
        Err(format!(
          "unsupported locale: {other}"
        ))
      }
    }
  }
}

impl fmt::Display for Locale {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self {
      | Self::Uk => f.write_str("uk"),
      | Self::En => f.write_str("en")
    }
  }
}

/// Accepts `YYYY-MM-DD` or a date/time value (`YYYY-MM-DDTHH:MM[:SS]`,
/// RFC 3339) and keeps only the calendar day.
pub fn parse_date(
  input: &str
) -> Result<NaiveDate, DateError> {
  let raw = input.trim();
  if let Ok(date) =
    NaiveDate::parse_from_str(
      raw,
      DATE_FORMAT
    )
  {
    return Ok(date);
  }
  if let Ok(dt) =
    DateTime::parse_from_rfc3339(raw)
  {
    return Ok(dt.date_naive());
  }
  for fmt in [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S"
  ] {
    if let Ok(dt) =
      NaiveDateTime::parse_from_str(
        raw, fmt
      )
    {
      return Ok(dt.date());
    }
  }
  Err(DateError::Date(raw.to_string()))
}

/// Same as [`parse_date`] but returns the wire form.
pub fn normalize_date(
  input: &str
) -> Result<String, DateError> {
  parse_date(input).map(|date| {
    date
      .format(DATE_FORMAT)
      .to_string()
  })
}

/// Normalizes a task time label to `HH:MM`. Blank input stays blank.
pub fn normalize_time_label(
  input: &str
) -> Result<String, DateError> {
  let raw = input.trim();
  if raw.is_empty() {
    return Ok(String::new());
  }
  NaiveTime::parse_from_str(raw, "%H:%M")
    .or_else(|_| {
      NaiveTime::parse_from_str(
        raw, "%H:%M:%S"
      )
    })
    .map(|time| {
      time.format("%H:%M").to_string()
    })
    .map_err(|_| {
      DateError::Time(raw.to_string())
    })
}

#[must_use]
pub fn format_clock(
  time: NaiveTime
) -> String {
  format!(
    "{:02}:{:02}:{:02}",
    time.hour(),
    time.minute(),
    time.second()
  )
}

#[derive(
  Debug, Clone, Copy, Default,
)]
pub struct DateFormatter {
  locale: Locale
}

impl DateFormatter {
  pub fn new(locale: Locale) -> Self {
    Self {
      locale
    }
  }

  pub fn locale(&self) -> Locale {
    self.locale
  }

  /// Title of the day panel: `Неділя, 5 травня` / `Sunday, May 5`.
  #[must_use]
  pub fn panel_title(
    &self,
    date: NaiveDate
  ) -> String {
    let weekday = date
      .weekday()
      .num_days_from_sunday()
      as usize;
    let month = date.month0() as usize;
    match self.locale {
      | Locale::Uk => {
        format!(
          "{}, {} {}",
          UK_WEEKDAYS[weekday],
          date.day(),
          UK_MONTHS[month]
        )
      }
      | Locale::En => {
        format!(
          "{}, {} {}",
          EN_WEEKDAYS[weekday],
          EN_MONTHS[month],
          date.day()
        )
      }
    }
  }

  /// Heading of a month grid: `Травень 2024` / `May 2024`.
  #[must_use]
  pub fn month_title(
    &self,
    date: NaiveDate
  ) -> String {
    let month = date.month0() as usize;
    let name = match self.locale {
      | Locale::Uk => {
        UK_MONTHS_NOMINATIVE[month]
      }
      | Locale::En => EN_MONTHS[month]
    };
    format!("{name} {}", date.year())
  }

  pub fn weekday_labels(
    &self
  ) -> [&'static str; 7] {
    match self.locale {
      | Locale::Uk => UK_WEEKDAYS_SHORT,
      | Locale::En => EN_WEEKDAYS_SHORT
    }
  }

  /// Panel title followed by the year.
  #[must_use]
  pub fn long_date(
    &self,
    date: NaiveDate
  ) -> String {
    format!(
      "{} {}",
      self.panel_title(date),
      date.year()
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(raw: &str) -> NaiveDate {
    parse_date(raw).expect("valid date")
  }

  #[test]
  fn parses_plain_and_datetime_inputs()
  {
    assert_eq!(
      normalize_date(" 2024-05-01 "),
      Ok("2024-05-01".to_string())
    );
    assert_eq!(
      normalize_date("2024-05-01T23:10"),
      Ok("2024-05-01".to_string())
    );
    assert_eq!(
      normalize_date(
        "2024-05-01T08:00:00+03:00"
      ),
      Ok("2024-05-01".to_string())
    );
    assert!(
      normalize_date("01/05/2024").is_err()
    );
  }

  #[test]
  fn ukrainian_panel_title() {
    let fmt =
      DateFormatter::new(Locale::Uk);
    assert_eq!(
      fmt.panel_title(day("2024-05-05")),
      "Неділя, 5 травня"
    );
    assert_eq!(
      fmt.panel_title(day("2024-01-12")),
      "П'ятниця, 12 січня"
    );
  }

  #[test]
  fn english_long_date() {
    let fmt =
      DateFormatter::new(Locale::En);
    assert_eq!(
      fmt.long_date(day("2024-05-01")),
      "Wednesday, May 1 2024"
    );
  }

  #[test]
  fn month_headings() {
    let date = day("2024-05-17");
    assert_eq!(
      DateFormatter::new(Locale::Uk)
        .month_title(date),
      "Травень 2024"
    );
    assert_eq!(
      DateFormatter::new(Locale::En)
        .weekday_labels()[0],
      "Mo"
    );
  }

  #[test]
  fn parses_locale_names() {
    assert_eq!(
      "uk-UA".parse::<Locale>(),
      Ok(Locale::Uk)
    );
    assert_eq!(
      "EN".parse::<Locale>(),
      Ok(Locale::En)
    );
    assert!("fr".parse::<Locale>().is_err());
  }

  #[test]
  fn clock_and_time_labels() {
    let time =
      NaiveTime::from_hms_opt(7, 5, 9)
        .expect("valid time");
    assert_eq!(
      format_clock(time),
      "07:05:09"
    );
    assert_eq!(
      normalize_time_label("9:30"),
      Ok("09:30".to_string())
    );
    assert_eq!(
      normalize_time_label("  "),
      Ok(String::new())
    );
    assert!(
      normalize_time_label("25:00").is_err()
    );
  }
}
