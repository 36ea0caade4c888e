//! Record validator: keeps rows with a usable age and fully parseable typed
//! fields, and accounts for every row it drops.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
  error::{Error, RejectReason, Result},
  normalize::{normalize, parse_age},
  record::{Field, RawRecord, ValidRecord},
};

/// A dropped row, with the input line it came from.
#[derive(Debug)]
pub struct Rejection {
  pub line:   u64,
  pub reason: RejectReason,
  pub error:  Error,
}

/// Validator output: surviving records in input order, plus the rejects.
#[derive(Debug, Default)]
pub struct Validated {
  pub records:    Vec<(u64, ValidRecord)>,
  pub rejections: Vec<Rejection>,
}

impl Validated {
  pub fn rejected_by_reason(&self) -> BTreeMap<RejectReason, usize> {
    let mut counts = BTreeMap::new();
    for r in &self.rejections {
      *counts.entry(r.reason).or_insert(0) += 1;
    }
    counts
  }
}

/// Count of rejections keyed by reason, serialised with reason names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RejectCounts(pub BTreeMap<RejectReason, usize>);

impl RejectCounts {
  pub fn get(&self, reason: RejectReason) -> usize {
    self.0.get(&reason).copied().unwrap_or(0)
  }

  pub fn total(&self) -> usize { self.0.values().sum() }
}

/// Validate a single row. A missing age takes precedence over every other
/// problem in the row.
pub fn validate_one(raw: &RawRecord) -> Result<ValidRecord> {
  let Some(age) = parse_age(&raw.age) else {
    return Err(Error::MissingField(Field::Age));
  };
  let normalized = normalize(raw)?;
  Ok(ValidRecord::from_normalized(normalized, age))
}

/// Validate every ingested row. Row-level failures become [`Rejection`]s;
/// any other error is returned as-is.
pub fn validate<I>(rows: I) -> Result<Validated>
where
  I: IntoIterator<Item = (u64, Result<RawRecord>)>,
{
  let mut out = Validated::default();

  for (line, row) in rows {
    match row.and_then(|raw| validate_one(&raw)) {
      Ok(record) => out.records.push((line, record)),
      Err(error) => {
        let Some(reason) = error.reject_reason() else {
          return Err(error);
        };
        tracing::warn!(line, %reason, "rejected row: {error}");
        out.rejections.push(Rejection { line, reason, error });
      }
    }
  }

  tracing::info!(
    valid = out.records.len(),
    rejected = out.rejections.len(),
    "validation finished"
  );
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn raw() -> RawRecord {
    RawRecord {
      timestamp:        "2023-01-05".into(),
      gender:           "Male".into(),
      age:              "21".into(),
      course:           "BCS".into(),
      year_of_study:    "Year 3".into(),
      cgpa_range:       "3.50 - 4.00".into(),
      marital_status:   "No".into(),
      depression:       "Yes".into(),
      anxiety:          "Yes".into(),
      panic_attack:     "Yes".into(),
      sought_treatment: "Yes".into(),
    }
  }

  #[test]
  fn valid_row_passes() {
    let record = validate_one(&raw()).unwrap();
    assert_eq!(record.age, 21);
    assert_eq!(record.year_of_study, 3);
    assert!(record.anxiety && record.sought_treatment);
  }

  #[test]
  fn missing_age_wins_over_other_problems() {
    let row = RawRecord {
      age: "".into(),
      timestamp: "garbage".into(),
      ..raw()
    };
    let err = validate_one(&row).unwrap_err();
    assert_eq!(err.reject_reason(), Some(RejectReason::MissingAge));
  }

  #[test]
  fn rows_are_bucketed_by_reason() {
    let rows = vec![
      (2, Ok(raw())),
      (3, Ok(RawRecord { age: " ".into(), ..raw() })),
      (4, Ok(RawRecord { anxiety: "maybe".into(), ..raw() })),
      (5, Ok(RawRecord { year_of_study: "yr".into(), ..raw() })),
      (6, Ok(RawRecord { timestamp: "soon".into(), ..raw() })),
      (7, Err(Error::ColumnCount { expected: 11, found: 3 })),
      (8, Ok(raw())),
    ];

    let validated = validate(rows).unwrap();
    assert_eq!(validated.records.len(), 2);
    assert_eq!(validated.records[0].0, 2);
    assert_eq!(validated.records[1].0, 8);

    let counts = RejectCounts(validated.rejected_by_reason());
    assert_eq!(counts.get(RejectReason::MissingAge), 1);
    assert_eq!(counts.get(RejectReason::InvalidIndicator), 1);
    assert_eq!(counts.get(RejectReason::UnparseableYear), 1);
    assert_eq!(counts.get(RejectReason::UnparseableDate), 1);
    assert_eq!(counts.get(RejectReason::MalformedRow), 1);
    assert_eq!(counts.total(), 5);

    let lines: Vec<u64> = validated.rejections.iter().map(|r| r.line).collect();
    assert_eq!(lines, vec![3, 4, 5, 6, 7]);
  }

  #[test]
  fn fatal_errors_are_not_swallowed() {
    let rows = vec![(
      2,
      Err(Error::Store("connection reset".to_string().into())),
    )];
    assert!(matches!(validate(rows), Err(Error::Store(_))));
  }
}
