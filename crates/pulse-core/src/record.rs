//! Record shapes at each stage of the pipeline, and the rows they become.
//!
//! A [`RawRecord`] is one untyped input row. Normalisation turns it into a
//! [`NormalizedRecord`]; the validator then guarantees an age and produces a
//! [`ValidRecord`]. Once a student id has been allocated, a valid record
//! splits into one [`Demographic`] and one [`SurveyResponse`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Field names ─────────────────────────────────────────────────────────────

/// Canonical names of the eleven input columns.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumIter,
  strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Field {
  Timestamp,
  Gender,
  Age,
  Course,
  YearOfStudy,
  CgpaRange,
  MaritalStatus,
  Depression,
  Anxiety,
  PanicAttack,
  SoughtTreatment,
}

impl Field {
  /// The Yes/No indicator columns, in the order they appear in the source.
  pub const INDICATORS: [Field; 4] = [
    Field::Depression,
    Field::Anxiety,
    Field::PanicAttack,
    Field::SoughtTreatment,
  ];
}

// ─── Pipeline stages ─────────────────────────────────────────────────────────

/// One input row, exactly as read. Every field is free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
  pub timestamp:        String,
  pub gender:           String,
  pub age:              String,
  pub course:           String,
  pub year_of_study:    String,
  pub cgpa_range:       String,
  pub marital_status:   String,
  pub depression:       String,
  pub anxiety:          String,
  pub panic_attack:     String,
  pub sought_treatment: String,
}

impl RawRecord {
  pub fn get(&self, field: Field) -> &str {
    match field {
      Field::Timestamp => &self.timestamp,
      Field::Gender => &self.gender,
      Field::Age => &self.age,
      Field::Course => &self.course,
      Field::YearOfStudy => &self.year_of_study,
      Field::CgpaRange => &self.cgpa_range,
      Field::MaritalStatus => &self.marital_status,
      Field::Depression => &self.depression,
      Field::Anxiety => &self.anxiety,
      Field::PanicAttack => &self.panic_attack,
      Field::SoughtTreatment => &self.sought_treatment,
    }
  }

  pub(crate) fn slot(&mut self, field: Field) -> &mut String {
    match field {
      Field::Timestamp => &mut self.timestamp,
      Field::Gender => &mut self.gender,
      Field::Age => &mut self.age,
      Field::Course => &mut self.course,
      Field::YearOfStudy => &mut self.year_of_study,
      Field::CgpaRange => &mut self.cgpa_range,
      Field::MaritalStatus => &mut self.marital_status,
      Field::Depression => &mut self.depression,
      Field::Anxiety => &mut self.anxiety,
      Field::PanicAttack => &mut self.panic_attack,
      Field::SoughtTreatment => &mut self.sought_treatment,
    }
  }
}

/// Typed projection of a [`RawRecord`]. Age may still be absent here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
  pub timestamp:        NaiveDateTime,
  pub gender:           String,
  pub age:              Option<u32>,
  pub course:           String,
  pub year_of_study:    u32,
  pub cgpa_range:       String,
  pub marital_status:   String,
  pub depression:       bool,
  pub anxiety:          bool,
  pub panic_attack:     bool,
  pub sought_treatment: bool,
}

/// A record that passed validation and may be handed to the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidRecord {
  pub timestamp:        NaiveDateTime,
  pub gender:           String,
  /// Always positive.
  pub age:              u32,
  pub course:           String,
  pub year_of_study:    u32,
  pub cgpa_range:       String,
  pub marital_status:   String,
  pub depression:       bool,
  pub anxiety:          bool,
  pub panic_attack:     bool,
  pub sought_treatment: bool,
}

impl ValidRecord {
  pub(crate) fn from_normalized(n: NormalizedRecord, age: u32) -> Self {
    Self {
      timestamp: n.timestamp,
      gender: n.gender,
      age,
      course: n.course,
      year_of_study: n.year_of_study,
      cgpa_range: n.cgpa_range,
      marital_status: n.marital_status,
      depression: n.depression,
      anxiety: n.anxiety,
      panic_attack: n.panic_attack,
      sought_treatment: n.sought_treatment,
    }
  }

  pub fn demographic(&self, student_id: Uuid) -> Demographic {
    Demographic {
      student_id,
      age: self.age,
      gender: self.gender.clone(),
      program_of_study: self.course.clone(),
    }
  }

  pub fn survey(&self, student_id: Uuid) -> SurveyResponse {
    SurveyResponse {
      student_id,
      survey_date: self.timestamp,
      year_of_study: self.year_of_study,
      cgpa_range: self.cgpa_range.clone(),
      marital_status: self.marital_status.clone(),
      anxiety: self.anxiety,
      depression: self.depression,
      panic_attack: self.panic_attack,
      sought_treatment: self.sought_treatment,
    }
  }
}

// ─── Persisted rows ──────────────────────────────────────────────────────────

/// The single current demographic row for a student; upserted by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographic {
  pub student_id:       Uuid,
  pub age:              u32,
  pub gender:           String,
  pub program_of_study: String,
}

/// One survey submission. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResponse {
  pub student_id:       Uuid,
  pub survey_date:      NaiveDateTime,
  pub year_of_study:    u32,
  pub cgpa_range:       String,
  pub marital_status:   String,
  pub anxiety:          bool,
  pub depression:       bool,
  pub panic_attack:     bool,
  pub sought_treatment: bool,
}
