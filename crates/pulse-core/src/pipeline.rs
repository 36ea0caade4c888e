//! End-to-end run: ingest, validate, load.

use std::io::Read;

use crate::{
  error::Result,
  ingest::{IngestOptions, read_records},
  load::{RowOutcome, load},
  store::SurveyStore,
  summary::{RowReport, RunSummary},
  validate::{RejectCounts, validate},
};

/// Run the whole pipeline against `store`.
///
/// `Ok` carries the per-row accounting even when some rows were skipped;
/// `Err` means the run was aborted.
pub fn run<R, S>(reader: R, options: &IngestOptions, store: &mut S) -> Result<RunSummary>
where
  R: Read,
  S: SurveyStore,
{
  let rows = read_records(reader, options)?;
  let rows_read = rows.len();

  let validated = validate(rows)?;
  let rejected = RejectCounts(validated.rejected_by_reason());

  let report = load(store, &validated.records)?;

  let mut row_reports: Vec<RowReport> = validated
    .rejections
    .iter()
    .map(|r| RowReport {
      line:    r.line,
      outcome: RowOutcome::Skipped(r.reason),
    })
    .chain(report.outcomes.iter().map(|(line, outcome)| RowReport {
      line:    *line,
      outcome: outcome.clone(),
    }))
    .collect();
  row_reports.sort_by_key(|r| r.line);

  let summary = RunSummary {
    rows_read,
    rejected,
    load: report,
    rows: row_reports,
  };

  tracing::info!(
    read = summary.rows_read,
    loaded = summary.loaded(),
    skipped = summary.skipped(),
    "run complete"
  );
  Ok(summary)
}
