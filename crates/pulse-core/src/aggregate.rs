//! Read-side aggregate shapes consumed by reporting.

use serde::{Deserialize, Serialize};

/// What survey rows are grouped by.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Grouping {
  #[default]
  YearOfStudy,
  /// Completed years at the institution: `year_of_study - 1`.
  LengthOfStay,
}

/// Counts and averages for one group. Scores are 0/1 so averages are
/// proportions. Conditional averages are `None` when no row matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
  pub group:                            i64,
  pub students:                         u64,
  pub avg_anxiety:                      f64,
  pub avg_depression:                   f64,
  pub avg_panic_attack:                 f64,
  pub avg_anxiety_male:                 Option<f64>,
  pub avg_anxiety_female:               Option<f64>,
  pub avg_anxiety_sought_treatment:     Option<f64>,
  pub avg_anxiety_not_sought_treatment: Option<f64>,
}
