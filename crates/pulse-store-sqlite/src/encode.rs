//! Encoding and decoding helpers between Pulse domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as `YYYY-MM-DD HH:MM:SS` text, indicators as 0/1
//! integers, and UUIDs as hyphenated lowercase strings.

use chrono::NaiveDateTime;
use pulse_core::{
  aggregate::Grouping,
  record::{Demographic, SurveyResponse},
};
use uuid::Uuid;

use crate::{Error, Result};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Uuid::parse_str(s).map_err(|e| Error::Decode(format!("student id {s:?}: {e}")))
}

// ─── NaiveDateTime ────────────────────────────────────────────────────────────

pub fn encode_timestamp(dt: NaiveDateTime) -> String {
  dt.format(TIMESTAMP_FORMAT).to_string()
}

pub fn decode_timestamp(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
    .map_err(|e| Error::Decode(format!("survey date {s:?}: {e}")))
}

// ─── Indicators ───────────────────────────────────────────────────────────────

pub fn encode_flag(flag: bool) -> i64 { i64::from(flag) }

pub fn decode_flag(n: i64) -> Result<bool> {
  match n {
    0 => Ok(false),
    1 => Ok(true),
    other => Err(Error::Decode(format!("indicator score {other}"))),
  }
}

// ─── Grouping ─────────────────────────────────────────────────────────────────

/// SQL expression over the `surveys` alias `su` that yields the group key.
pub fn grouping_expr(grouping: Grouping) -> &'static str {
  match grouping {
    Grouping::YearOfStudy => "su.year_of_study",
    Grouping::LengthOfStay => "su.year_of_study - 1",
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `demographics` row.
pub struct RawDemographic {
  pub student_id:       String,
  pub age:              u32,
  pub gender:           String,
  pub program_of_study: String,
}

impl RawDemographic {
  pub fn into_demographic(self) -> Result<Demographic> {
    Ok(Demographic {
      student_id:       decode_uuid(&self.student_id)?,
      age:              self.age,
      gender:           self.gender,
      program_of_study: self.program_of_study,
    })
  }
}

/// Raw values read directly from a `surveys` row.
pub struct RawSurvey {
  pub student_id:         String,
  pub survey_date:        String,
  pub year_of_study:      u32,
  pub cgpa_range:         String,
  pub marital_status:     String,
  pub anxiety_score:      i64,
  pub depression_score:   i64,
  pub panic_attack_score: i64,
  pub sought_treatment:   i64,
}

impl RawSurvey {
  pub fn into_survey(self) -> Result<SurveyResponse> {
    Ok(SurveyResponse {
      student_id:       decode_uuid(&self.student_id)?,
      survey_date:      decode_timestamp(&self.survey_date)?,
      year_of_study:    self.year_of_study,
      cgpa_range:       self.cgpa_range,
      marital_status:   self.marital_status,
      anxiety:          decode_flag(self.anxiety_score)?,
      depression:       decode_flag(self.depression_score)?,
      panic_attack:     decode_flag(self.panic_attack_score)?,
      sought_treatment: decode_flag(self.sought_treatment)?,
    })
  }
}
