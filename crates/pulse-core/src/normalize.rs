//! Field normaliser: turns a [`RawRecord`] into a [`NormalizedRecord`].
//!
//! Pure functions only. The age column is coerced here but an absent age is
//! not an error at this layer; exclusion is the validator's job.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::{
  error::{Error, Result},
  record::{Field, NormalizedRecord, RawRecord},
};

/// Date-time layouts accepted for the timestamp column, tried in order after
/// RFC 3339. Month-first precedes day-first, so `"8/7/2020"` is 7 August and
/// `"18/7/2020"` falls through to 18 July.
pub const TIMESTAMP_LAYOUTS: &[&str] = &[
  "%Y-%m-%d %H:%M:%S",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%dT%H:%M:%S",
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%d %H:%M",
  "%Y-%m-%dT%H:%M",
  "%m/%d/%Y %H:%M:%S",
  "%m/%d/%Y %H:%M",
  "%d/%m/%Y %H:%M:%S",
  "%d/%m/%Y %H:%M",
];

/// Date-only layouts; the time is taken as midnight.
pub const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

static DIGITS: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\d+").expect("static regex"));

// ─── Field parsers ───────────────────────────────────────────────────────────

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
  let value = value.trim();
  if value.is_empty() {
    return Err(Error::MissingField(Field::Timestamp));
  }

  if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
    return Ok(dt.naive_utc());
  }
  for layout in TIMESTAMP_LAYOUTS {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, layout) {
      return Ok(dt);
    }
  }
  for layout in DATE_LAYOUTS {
    if let Ok(d) = NaiveDate::parse_from_str(value, layout) {
      return Ok(d.and_time(NaiveTime::MIN));
    }
  }

  Err(Error::Parse {
    field: Field::Timestamp,
    value: value.to_owned(),
  })
}

/// `"Yes"` → `true`, `"No"` → `false`. Case-sensitive, no trimming.
pub fn parse_indicator(field: Field, value: &str) -> Result<bool> {
  match value {
    "Yes" => Ok(true),
    "No" => Ok(false),
    other => Err(Error::InvalidIndicator {
      field,
      value: other.to_owned(),
    }),
  }
}

/// First run of digits in the text: `"year 2"` → 2, `"Year 10"` → 10.
pub fn extract_year(value: &str) -> Result<u32> {
  let parse_err = || Error::Parse {
    field: Field::YearOfStudy,
    value: value.to_owned(),
  };
  let digits = DIGITS.find(value).ok_or_else(parse_err)?;
  digits.as_str().parse().map_err(|_| parse_err())
}

/// Positive integer age, or `None` when the cell is empty or unusable.
///
/// Integral float renderings such as `"19.0"` are accepted.
pub fn parse_age(value: &str) -> Option<u32> {
  let value = value.trim();
  if value.is_empty() {
    return None;
  }
  let age = match value.parse::<u32>() {
    Ok(n) => n,
    Err(_) => {
      let f = value.parse::<f64>().ok()?;
      if !f.is_finite() || f.fract() != 0.0 || f < 0.0 || f > f64::from(u32::MAX) {
        return None;
      }
      f as u32
    }
  };
  (age > 0).then_some(age)
}

// ─── Record ──────────────────────────────────────────────────────────────────

pub fn normalize(raw: &RawRecord) -> Result<NormalizedRecord> {
  let timestamp = parse_timestamp(&raw.timestamp)?;
  let year_of_study = extract_year(&raw.year_of_study)?;

  let mut flags = [false; 4];
  for (flag, field) in flags.iter_mut().zip(Field::INDICATORS) {
    *flag = parse_indicator(field, raw.get(field))?;
  }
  let [depression, anxiety, panic_attack, sought_treatment] = flags;

  Ok(NormalizedRecord {
    timestamp,
    gender: raw.gender.clone(),
    age: parse_age(&raw.age),
    course: raw.course.clone(),
    year_of_study,
    cgpa_range: raw.cgpa_range.clone(),
    marital_status: raw.marital_status.clone(),
    depression,
    anxiety,
    panic_attack,
    sought_treatment,
  })
}
