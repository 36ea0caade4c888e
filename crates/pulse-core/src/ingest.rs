//! CSV ingest: reads delimited text and picks fields out by position.

use std::io::Read;

use crate::{
  columns::ColumnMap,
  error::{Error, Result},
  record::RawRecord,
};

pub const DEFAULT_DELIMITER: u8 = b',';

/// How to read an input file.
#[derive(Debug, Clone)]
pub struct IngestOptions {
  pub delimiter:   u8,
  pub has_headers: bool,
  pub columns:     ColumnMap,
}

impl Default for IngestOptions {
  fn default() -> Self {
    Self {
      delimiter:   DEFAULT_DELIMITER,
      has_headers: true,
      columns:     ColumnMap::default(),
    }
  }
}

/// Read every data row. Rows that cannot be decoded or are too short come
/// back as row-level errors next to their line number; I/O failures end the
/// read.
pub fn read_records<R: Read>(
  reader: R,
  options: &IngestOptions,
) -> Result<Vec<(u64, Result<RawRecord>)>> {
  let mut csv = csv::ReaderBuilder::new()
    .delimiter(options.delimiter)
    .has_headers(options.has_headers)
    .flexible(true)
    .from_reader(reader);

  let mut rows = Vec::new();
  for (index, result) in csv.records().enumerate() {
    let fallback_line = index as u64 + if options.has_headers { 2 } else { 1 };
    match result {
      Ok(record) => {
        let line = record.position().map_or(fallback_line, |p| p.line());
        rows.push((line, options.columns.extract(&record)));
      }
      Err(e) if e.is_io_error() => return Err(Error::Csv(e)),
      Err(e) => {
        let line = e.position().map_or(fallback_line, |p| p.line());
        rows.push((line, Err(Error::MalformedRow(e.to_string()))));
      }
    }
  }

  tracing::info!(rows = rows.len(), "read input rows");
  Ok(rows)
}

#[cfg(test)]
mod tests {
  use super::*;

  const HEADER: &str = "Timestamp,Choose your gender,Age,What is your course?,\
                        Your current year of Study,What is your CGPA?,\
                        Marital status,Do you have Depression?,\
                        Do you have Anxiety?,Do you have Panic attack?,\
                        Did you seek any specialist for a treatment?\n";

  #[test]
  fn reads_rows_with_line_numbers() {
    let input = format!(
      "{HEADER}8/7/2020 12:02,Female,18,Engineering,year 1,3.00 - 3.49,No,Yes,No,Yes,No\n\
       8/7/2020 12:04,Male,21,Islamic education,year 2,3.00 - 3.49,No,No,Yes,No,No\n"
    );
    let rows = read_records(input.as_bytes(), &IngestOptions::default()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0, 2);
    assert_eq!(rows[1].0, 3);
    let second = rows[1].1.as_ref().unwrap();
    assert_eq!(second.gender, "Male");
    assert_eq!(second.course, "Islamic education");
  }

  #[test]
  fn short_rows_are_row_errors() {
    let input = format!("{HEADER}8/7/2020 12:02,Female,18\n");
    let rows = read_records(input.as_bytes(), &IngestOptions::default()).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(matches!(rows[0].1, Err(Error::ColumnCount { found: 3, .. })));
  }

  #[test]
  fn honours_delimiter_and_headerless_input() {
    let input = "2023-01-05;Male;20;Law;Year 3;3.50 - 4.00;Yes;No;No;No;No\n";
    let options = IngestOptions {
      delimiter: b';',
      has_headers: false,
      ..IngestOptions::default()
    };
    let rows = read_records(input.as_bytes(), &options).unwrap();
    assert_eq!(rows[0].0, 1);
    assert_eq!(rows[0].1.as_ref().unwrap().year_of_study, "Year 3");
  }
}
