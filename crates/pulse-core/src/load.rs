//! Relational loader: writes validated records as students, demographics and
//! surveys, in that order, inside one integrity window.
//!
//! Student allocation failures and session-level errors are fatal. A write
//! the backend rejects for a single row is logged against the student id,
//! recorded in the report, and the load continues.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::{
  error::{Error, RejectReason, Result},
  record::ValidRecord,
  store::{IntegrityWindow, StoreError, SurveyStore},
};

/// Which relation a write targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Table {
  Students,
  Demographics,
  Surveys,
}

/// A single write the backend refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
  pub line:       u64,
  pub student_id: Uuid,
  pub table:      Table,
  pub message:    String,
}

/// What happened to one input row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum RowOutcome {
  Loaded,
  Skipped(RejectReason),
  Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
  pub students_created:      usize,
  pub demographics_upserted: usize,
  pub surveys_inserted:      usize,
  pub failures:              Vec<RowFailure>,
  /// References left unresolved once enforcement was restored.
  pub dangling_references:   usize,
  /// One entry per loaded record, keyed by input line.
  #[serde(skip)]
  pub outcomes:              Vec<(u64, RowOutcome)>,
}

impl LoadReport {
  fn reject(&mut self, line: u64, student_id: Uuid, table: Table, message: String) {
    tracing::warn!(%student_id, line, %table, "write rejected: {message}");
    self.failures.push(RowFailure {
      line,
      student_id,
      table,
      message,
    });
  }

  /// Rows whose writes were refused by the backend.
  pub fn failed(&self) -> usize {
    self.outcomes.iter().filter(|(_, o)| *o != RowOutcome::Loaded).count()
  }
}

fn fatal<E: StoreError>(e: E) -> Error { Error::Store(Box::new(e)) }

/// Persist `records` (paired with their input lines).
pub fn load<S: SurveyStore>(
  store: &mut S,
  records: &[(u64, ValidRecord)],
) -> Result<LoadReport> {
  let mut report = LoadReport::default();
  let mut window = IntegrityWindow::enter(store).map_err(fatal)?;

  // Students: one fresh id per record, all before any dependent row.
  let mut ids = Vec::with_capacity(records.len());
  for _ in records {
    ids.push(window.allocate_student().map_err(fatal)?);
  }
  report.students_created = ids.len();
  tracing::info!(count = ids.len(), "allocated students");

  // Demographics: exactly one upsert per student id.
  let mut seen: HashSet<Uuid> = HashSet::new();
  for ((line, record), &id) in records.iter().zip(&ids) {
    if !seen.insert(id) {
      continue;
    }
    match window.upsert_demographic(&record.demographic(id)) {
      Ok(()) => report.demographics_upserted += 1,
      Err(e) if e.is_row_rejection() => {
        report.reject(*line, id, Table::Demographics, e.to_string())
      }
      Err(e) => return Err(fatal(e)),
    }
  }
  tracing::info!(count = report.demographics_upserted, "upserted demographics");

  // Surveys: one row per record, no deduplication.
  for ((line, record), &id) in records.iter().zip(&ids) {
    tracing::debug!(%id, line, "inserting survey");
    match window.insert_survey(&record.survey(id)) {
      Ok(()) => report.surveys_inserted += 1,
      Err(e) if e.is_row_rejection() => {
        report.reject(*line, id, Table::Surveys, e.to_string())
      }
      Err(e) => return Err(fatal(e)),
    }
  }
  tracing::info!(count = report.surveys_inserted, "inserted surveys");

  window.close().map_err(fatal)?;

  report.dangling_references = store.dangling_references().map_err(fatal)?;
  if report.dangling_references > 0 {
    tracing::warn!(
      count = report.dangling_references,
      "rows reference missing students"
    );
  }

  report.outcomes = records
    .iter()
    .zip(&ids)
    .map(|((line, _), id)| {
      let outcome = match report.failures.iter().find(|f| f.student_id == *id) {
        Some(f) => RowOutcome::Failed(format!("{}: {}", f.table, f.message)),
        None => RowOutcome::Loaded,
      };
      (*line, outcome)
    })
    .collect();
  Ok(report)
}
