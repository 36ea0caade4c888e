//! The explicit column map: which input position feeds which field, and how
//! that field is parsed.
//!
//! Input files are matched by position, not by header name, so the map is
//! the single place where column order is declared.

use std::collections::HashMap;

use csv::StringRecord;
use serde::Serialize;
use strum::IntoEnumIterator as _;

use crate::{
  error::{Error, Result},
  record::{Field, RawRecord},
};

/// How the normaliser interprets a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ParserKind {
  /// Kept verbatim.
  Text,
  /// Positive integer; absent or invalid means the row is excluded.
  Integer,
  /// One of the layouts in [`crate::normalize::TIMESTAMP_LAYOUTS`].
  Timestamp,
  /// Exactly `"Yes"` or `"No"`.
  Indicator,
  /// First run of digits in free text (`"year 2"`).
  YearOfStudy,
}

impl ParserKind {
  pub fn for_field(field: Field) -> Self {
    match field {
      Field::Timestamp => ParserKind::Timestamp,
      Field::Age => ParserKind::Integer,
      Field::YearOfStudy => ParserKind::YearOfStudy,
      Field::Depression
      | Field::Anxiety
      | Field::PanicAttack
      | Field::SoughtTreatment => ParserKind::Indicator,
      Field::Gender | Field::Course | Field::CgpaRange | Field::MaritalStatus => {
        ParserKind::Text
      }
    }
  }
}

/// One entry of the column map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
  pub field:    Field,
  /// Zero-based index into the input row.
  pub position: usize,
  pub parser:   ParserKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
  columns: Vec<ColumnSpec>,
}

impl Default for ColumnMap {
  /// The source layout: fields in declaration order of [`Field`].
  fn default() -> Self {
    let columns = Field::iter()
      .enumerate()
      .map(|(position, field)| ColumnSpec {
        field,
        position,
        parser: ParserKind::for_field(field),
      })
      .collect();
    Self { columns }
  }
}

impl ColumnMap {
  /// Start from the default layout and move the named fields to new
  /// positions. Names are the snake_case field names.
  pub fn with_overrides(overrides: &HashMap<String, usize>) -> Result<Self> {
    let mut map = Self::default();
    for (name, &position) in overrides {
      let field: Field = name
        .trim()
        .parse()
        .map_err(|_| Error::UnknownColumn(name.clone()))?;
      if let Some(spec) = map.columns.iter_mut().find(|c| c.field == field) {
        spec.position = position;
      }
    }
    map.check_unique()?;
    Ok(map)
  }

  fn check_unique(&self) -> Result<()> {
    let mut seen: HashMap<usize, Field> = HashMap::new();
    for spec in &self.columns {
      if let Some(&first) = seen.get(&spec.position) {
        return Err(Error::DuplicatePosition {
          position: spec.position,
          first,
          second: spec.field,
        });
      }
      seen.insert(spec.position, spec.field);
    }
    Ok(())
  }

  pub fn iter(&self) -> impl Iterator<Item = &ColumnSpec> { self.columns.iter() }

  pub fn position(&self, field: Field) -> Option<usize> {
    self
      .columns
      .iter()
      .find(|c| c.field == field)
      .map(|c| c.position)
  }

  /// Minimum number of columns a row must have.
  pub fn width(&self) -> usize {
    self
      .columns
      .iter()
      .map(|c| c.position + 1)
      .max()
      .unwrap_or(0)
  }

  /// Pick the mapped columns out of a CSV row.
  ///
  /// Extra trailing columns are ignored with a warning; a wider row usually
  /// means the export's layout has shifted.
  pub fn extract(&self, row: &StringRecord) -> Result<RawRecord> {
    let width = self.width();
    if row.len() < width {
      return Err(Error::ColumnCount {
        expected: width,
        found:    row.len(),
      });
    }
    if row.len() > width {
      tracing::warn!(
        expected = width,
        found = row.len(),
        "row has more columns than the column map; extra columns ignored"
      );
    }

    let mut raw = RawRecord::default();
    for spec in &self.columns {
      let value = row.get(spec.position).unwrap_or_default();
      *raw.slot(spec.field) = value.to_owned();
    }
    Ok(raw)
  }
}
