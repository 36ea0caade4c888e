//! Plain-text rendering of run summaries and aggregate tables.

use std::fmt::Write as _;

use pulse_core::{
  aggregate::{GroupSummary, Grouping},
  columns::ColumnMap,
  load::RowOutcome,
  summary::RunSummary,
};

pub fn summary(s: &RunSummary) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "rows read              {:>6}", s.rows_read);
  let _ = writeln!(out, "loaded                 {:>6}", s.loaded());
  let _ = writeln!(out, "skipped                {:>6}", s.skipped());
  for (reason, count) in &s.rejected.0 {
    let _ = writeln!(out, "  {:<20} {count:>6}", reason.to_string());
  }
  let _ = writeln!(out, "students created       {:>6}", s.load.students_created);
  let _ = writeln!(out, "demographics upserted  {:>6}", s.load.demographics_upserted);
  let _ = writeln!(out, "surveys inserted       {:>6}", s.load.surveys_inserted);
  let _ = writeln!(out, "write failures         {:>6}", s.load.failures.len());

  for row in &s.rows {
    if let RowOutcome::Failed(message) = &row.outcome {
      let _ = writeln!(out, "  line {}: {message}", row.line);
    }
  }
  if s.load.dangling_references > 0 {
    let _ = writeln!(
      out,
      "warning: {} rows reference missing students",
      s.load.dangling_references
    );
  }
  out
}

fn cell(v: Option<f64>) -> String {
  v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

pub fn groups(grouping: Grouping, rows: &[GroupSummary]) -> String {
  let label = match grouping {
    Grouping::YearOfStudy => "year",
    Grouping::LengthOfStay => "stay",
  };

  let mut out = String::new();
  let _ = writeln!(
    out,
    "{label:>5} {:>8} {:>8} {:>10} {:>6} {:>8} {:>8} {:>8} {:>10}",
    "students", "anxiety", "depression", "panic", "anx(M)", "anx(F)", "treated", "untreated"
  );
  for g in rows {
    let _ = writeln!(
      out,
      "{:>5} {:>8} {:>8.2} {:>10.2} {:>6.2} {:>8} {:>8} {:>8} {:>10}",
      g.group,
      g.students,
      g.avg_anxiety,
      g.avg_depression,
      g.avg_panic_attack,
      cell(g.avg_anxiety_male),
      cell(g.avg_anxiety_female),
      cell(g.avg_anxiety_sought_treatment),
      cell(g.avg_anxiety_not_sought_treatment),
    );
  }
  out
}

pub fn columns(map: &ColumnMap) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{:>8}  {:<18} {}", "position", "field", "parser");
  let mut specs: Vec<_> = map.iter().collect();
  specs.sort_by_key(|c| c.position);
  for c in specs {
    let _ = writeln!(
      out,
      "{:>8}  {:<18} {}",
      c.position,
      c.field.to_string(),
      c.parser
    );
  }
  out
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use pulse_core::{
    RejectReason,
    load::LoadReport,
    summary::RowReport,
    validate::RejectCounts,
  };

  use super::*;

  #[test]
  fn summary_lists_reasons_and_failures() {
    let s = RunSummary {
      rows_read: 3,
      rejected:  RejectCounts(BTreeMap::from([(RejectReason::MissingAge, 1)])),
      load:      LoadReport {
        students_created: 2,
        demographics_upserted: 2,
        surveys_inserted: 1,
        outcomes: vec![
          (3, RowOutcome::Loaded),
          (4, RowOutcome::Failed("surveys: CHECK constraint failed".into())),
        ],
        ..LoadReport::default()
      },
      rows:      vec![
        RowReport { line: 2, outcome: RowOutcome::Skipped(RejectReason::MissingAge) },
        RowReport { line: 3, outcome: RowOutcome::Loaded },
        RowReport {
          line:    4,
          outcome: RowOutcome::Failed("surveys: CHECK constraint failed".into()),
        },
      ],
    };

    let text = summary(&s);
    assert!(text.contains("MissingAge"));
    assert!(text.contains("line 4: surveys: CHECK constraint failed"));
    assert!(text.lines().any(|l| l.starts_with("skipped") && l.ends_with(" 2")));
  }

  #[test]
  fn groups_render_missing_averages_as_dash() {
    let rows = vec![GroupSummary {
      group:                            2,
      students:                         1,
      avg_anxiety:                      1.0,
      avg_depression:                   0.0,
      avg_panic_attack:                 0.0,
      avg_anxiety_male:                 None,
      avg_anxiety_female:               Some(1.0),
      avg_anxiety_sought_treatment:     None,
      avg_anxiety_not_sought_treatment: Some(1.0),
    }];
    let text = groups(Grouping::YearOfStudy, &rows);
    let line = text.lines().nth(1).unwrap();
    assert!(line.contains(" - "));
    assert!(line.contains("1.00"));
  }

  #[test]
  fn columns_are_listed_by_position() {
    let text = columns(&ColumnMap::default());
    let second = text.lines().nth(1).unwrap();
    assert!(second.contains("timestamp"));
    assert!(text.contains("year_of_study"));
  }
}
