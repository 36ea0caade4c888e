//! Run summary: what happened to every input row.

use serde::Serialize;

use crate::{
  error::RejectReason,
  load::{LoadReport, RowOutcome},
  validate::RejectCounts,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
  pub rows_read: usize,
  pub rejected:  RejectCounts,
  pub load:      LoadReport,
  /// Every input row in line order.
  pub rows:      Vec<RowReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowReport {
  pub line:    u64,
  #[serde(flatten)]
  pub outcome: RowOutcome,
}

impl RunSummary {
  pub fn loaded(&self) -> usize {
    self
      .rows
      .iter()
      .filter(|r| r.outcome == RowOutcome::Loaded)
      .count()
  }

  /// Rows dropped before loading.
  pub fn rejected(&self, reason: RejectReason) -> usize { self.rejected.get(reason) }

  /// Rejected rows plus rows with a refused write.
  pub fn skipped(&self) -> usize { self.rejected.total() + self.load.failed() }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use super::*;

  #[test]
  fn serialises_rows_with_outcome_tags() {
    let summary = RunSummary {
      rows_read: 2,
      rejected: RejectCounts(BTreeMap::from([(RejectReason::MissingAge, 1)])),
      load: LoadReport {
        students_created: 1,
        demographics_upserted: 1,
        surveys_inserted: 1,
        outcomes: vec![(3, RowOutcome::Loaded)],
        ..LoadReport::default()
      },
      rows: vec![
        RowReport {
          line:    2,
          outcome: RowOutcome::Skipped(RejectReason::MissingAge),
        },
        RowReport {
          line:    3,
          outcome: RowOutcome::Loaded,
        },
      ],
    };

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["rejected"]["MissingAge"], 1);
    assert_eq!(json["load"]["surveys_inserted"], 1);
    assert_eq!(json["rows"][0]["outcome"], "skipped");
    assert_eq!(json["rows"][0]["detail"], "MissingAge");
    assert_eq!(json["rows"][1]["outcome"], "loaded");
    assert!(json["load"].get("outcomes").is_none());

    assert_eq!(summary.loaded(), 1);
    assert_eq!(summary.skipped(), 1);
  }
}
