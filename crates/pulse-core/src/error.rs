//! Error types for `pulse-core`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::Field;

#[derive(Debug, Error)]
pub enum Error {
  /// A field that must carry structured data (date, year) could not be read.
  #[error("cannot parse {field} from {value:?}")]
  Parse { field: Field, value: String },

  #[error("invalid value {value:?} for {field}: expected \"Yes\" or \"No\"")]
  InvalidIndicator { field: Field, value: String },

  #[error("missing required field {0}")]
  MissingField(Field),

  #[error("row has {found} columns, the column map needs {expected}")]
  ColumnCount { expected: usize, found: usize },

  #[error("unreadable row: {0}")]
  MalformedRow(String),

  #[error("column map assigns position {position} to both {first} and {second}")]
  DuplicatePosition { position: usize, first: Field, second: Field },

  #[error("unknown column name {0:?}")]
  UnknownColumn(String),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  /// A storage failure that ends the run.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// The rejection bucket for a row-level error, or `None` if the error is
  /// not attributable to a single input row.
  pub fn reject_reason(&self) -> Option<RejectReason> {
    match self {
      Error::MissingField(Field::Age) => Some(RejectReason::MissingAge),
      Error::Parse { field: Field::Timestamp, .. }
      | Error::MissingField(Field::Timestamp) => {
        Some(RejectReason::UnparseableDate)
      }
      Error::Parse { field: Field::YearOfStudy, .. }
      | Error::MissingField(Field::YearOfStudy) => {
        Some(RejectReason::UnparseableYear)
      }
      Error::InvalidIndicator { .. } => Some(RejectReason::InvalidIndicator),
      Error::ColumnCount { .. } | Error::MalformedRow(_) => {
        Some(RejectReason::MalformedRow)
      }
      _ => None,
    }
  }
}

/// Why an input row never reached the loader.
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
)]
pub enum RejectReason {
  MissingAge,
  UnparseableDate,
  InvalidIndicator,
  UnparseableYear,
  /// Wrong column count or undecodable bytes.
  MalformedRow,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
