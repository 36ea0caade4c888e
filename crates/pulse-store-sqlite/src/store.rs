//! [`SqliteStore`] — the SQLite implementation of [`SurveyStore`].

use std::path::Path;

use rusqlite::{Connection, OpenFlags, OptionalExtension as _};
use uuid::Uuid;

use pulse_core::{
  aggregate::{GroupSummary, Grouping},
  record::{Demographic, SurveyResponse},
  store::SurveyStore,
};

use crate::{
  ConfigurationError,
  encode::{
    RawDemographic, RawSurvey, encode_flag, encode_timestamp, encode_uuid,
    grouping_expr,
  },
  schema::{SCHEMA, TABLES},
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Row counts for the three tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableCounts {
  pub students:     usize,
  pub demographics: usize,
  pub surveys:      usize,
}

/// A Pulse survey store backed by a single SQLite file.
///
/// The connection is owned; dropping the store closes it.
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  /// Open an existing, already provisioned database.
  ///
  /// Fails with [`ConfigurationError::MissingDatabase`] if the file does not
  /// exist and [`ConfigurationError::MissingSchema`] if any table is absent.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if !path.exists() {
      return Err(ConfigurationError::MissingDatabase(path.to_path_buf()).into());
    }

    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
      | OpenFlags::SQLITE_OPEN_URI
      | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(path, flags).map_err(|e| {
      match e.sqlite_error_code() {
        Some(rusqlite::ErrorCode::CannotOpen) => Error::Configuration(
          ConfigurationError::AccessDenied(format!("{}: {e}", path.display())),
        ),
        _ => Error::from(e),
      }
    })?;

    let store = Self { conn };
    store.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    store.verify_schema()?;
    tracing::debug!(path = %path.display(), "opened database");
    Ok(store)
  }

  /// Create (or reopen) a database at `path` and provision the schema.
  pub fn create(path: impl AsRef<Path>) -> Result<Self> {
    let conn = Connection::open(path)?;
    let store = Self { conn };
    store.init_schema()?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()?;
    let store = Self { conn };
    store.init_schema()?;
    Ok(store)
  }

  /// Close the connection, surfacing any error from the final flush.
  pub fn close(self) -> Result<()> {
    self.conn.close().map_err(|(_, e)| Error::from(e))?;
    tracing::debug!("database connection closed");
    Ok(())
  }

  fn init_schema(&self) -> Result<()> {
    self.conn.execute_batch(SCHEMA)?;
    Ok(())
  }

  fn verify_schema(&self) -> Result<()> {
    for table in TABLES {
      let found = self
        .conn
        .query_row(
          "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
          rusqlite::params![table],
          |_| Ok(()),
        )
        .optional()?;
      if found.is_none() {
        return Err(ConfigurationError::MissingSchema(table).into());
      }
    }
    Ok(())
  }

  // ── Inspection ────────────────────────────────────────────────────────────

  pub fn table_counts(&self) -> Result<TableCounts> {
    let count = |table: &str| -> Result<usize> {
      let n: i64 = self.conn.query_row(
        &format!("SELECT COUNT(*) FROM {table}"),
        [],
        |r| r.get(0),
      )?;
      Ok(n as usize)
    };
    Ok(TableCounts {
      students:     count("students")?,
      demographics: count("demographics")?,
      surveys:      count("surveys")?,
    })
  }

  pub fn demographic(&self, student_id: Uuid) -> Result<Option<Demographic>> {
    let raw: Option<RawDemographic> = self
      .conn
      .query_row(
        "SELECT student_id, age, gender, program_of_study
         FROM demographics WHERE student_id = ?1",
        rusqlite::params![encode_uuid(student_id)],
        |row| {
          Ok(RawDemographic {
            student_id:       row.get(0)?,
            age:              row.get(1)?,
            gender:           row.get(2)?,
            program_of_study: row.get(3)?,
          })
        },
      )
      .optional()?;

    raw.map(RawDemographic::into_demographic).transpose()
  }

  /// Every survey row in insertion order.
  pub fn surveys(&self) -> Result<Vec<SurveyResponse>> {
    let mut stmt = self.conn.prepare(
      "SELECT student_id, survey_date, year_of_study, cgpa_range,
              marital_status, anxiety_score, depression_score,
              panic_attack_score, sought_treatment
       FROM surveys ORDER BY survey_id",
    )?;
    let raws = stmt
      .query_map([], |row| {
        Ok(RawSurvey {
          student_id:         row.get(0)?,
          survey_date:        row.get(1)?,
          year_of_study:      row.get(2)?,
          cgpa_range:         row.get(3)?,
          marital_status:     row.get(4)?,
          anxiety_score:      row.get(5)?,
          depression_score:   row.get(6)?,
          panic_attack_score: row.get(7)?,
          sought_treatment:   row.get(8)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    raws.into_iter().map(RawSurvey::into_survey).collect()
  }
}

// ─── SurveyStore impl ────────────────────────────────────────────────────────

impl SurveyStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  fn allocate_student(&mut self) -> Result<Uuid> {
    let id = Uuid::new_v4();
    self.conn.execute(
      "INSERT INTO students (student_id) VALUES (?1)",
      rusqlite::params![encode_uuid(id)],
    )?;
    Ok(id)
  }

  fn upsert_demographic(&mut self, row: &Demographic) -> Result<()> {
    self.conn.execute(
      "INSERT INTO demographics (student_id, age, gender, program_of_study)
       VALUES (?1, ?2, ?3, ?4)
       ON CONFLICT (student_id) DO UPDATE SET
         age              = excluded.age,
         gender           = excluded.gender,
         program_of_study = excluded.program_of_study",
      rusqlite::params![
        encode_uuid(row.student_id),
        row.age,
        row.gender,
        row.program_of_study,
      ],
    )?;
    Ok(())
  }

  fn insert_survey(&mut self, row: &SurveyResponse) -> Result<()> {
    self.conn.execute(
      "INSERT INTO surveys (
         student_id, survey_date, year_of_study, cgpa_range, marital_status,
         anxiety_score, depression_score, panic_attack_score, sought_treatment
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
      rusqlite::params![
        encode_uuid(row.student_id),
        encode_timestamp(row.survey_date),
        row.year_of_study,
        row.cgpa_range,
        row.marital_status,
        encode_flag(row.anxiety),
        encode_flag(row.depression),
        encode_flag(row.panic_attack),
        encode_flag(row.sought_treatment),
      ],
    )?;
    Ok(())
  }

  // ── Session state ─────────────────────────────────────────────────────────

  fn set_integrity_checks(&mut self, enabled: bool) -> Result<()> {
    // No effect inside an open transaction; the loader never opens one.
    let pragma = if enabled {
      "PRAGMA foreign_keys = ON;"
    } else {
      "PRAGMA foreign_keys = OFF;"
    };
    self.conn.execute_batch(pragma)?;
    Ok(())
  }

  fn dangling_references(&mut self) -> Result<usize> {
    let mut stmt = self.conn.prepare("PRAGMA foreign_key_check")?;
    let violations = stmt
      .query_map([], |_| Ok(()))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(violations.len())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  fn summarize(&mut self, grouping: Grouping) -> Result<Vec<GroupSummary>> {
    let sql = format!(
      "SELECT
         {expr} AS grp,
         COUNT(DISTINCT s.student_id),
         AVG(su.anxiety_score),
         AVG(su.depression_score),
         AVG(su.panic_attack_score),
         AVG(CASE WHEN d.gender = 'Male'   THEN su.anxiety_score END),
         AVG(CASE WHEN d.gender = 'Female' THEN su.anxiety_score END),
         AVG(CASE WHEN su.sought_treatment = 1 THEN su.anxiety_score END),
         AVG(CASE WHEN su.sought_treatment = 0 THEN su.anxiety_score END)
       FROM students s
       JOIN demographics d ON d.student_id  = s.student_id
       JOIN surveys     su ON su.student_id = s.student_id
       GROUP BY grp
       ORDER BY grp",
      expr = grouping_expr(grouping),
    );

    let mut stmt = self.conn.prepare(&sql)?;
    let rows = stmt
      .query_map([], |row| {
        let students: i64 = row.get(1)?;
        Ok(GroupSummary {
          group:                            row.get(0)?,
          students:                         students as u64,
          avg_anxiety:                      row.get(2)?,
          avg_depression:                   row.get(3)?,
          avg_panic_attack:                 row.get(4)?,
          avg_anxiety_male:                 row.get(5)?,
          avg_anxiety_female:               row.get(6)?,
          avg_anxiety_sought_treatment:     row.get(7)?,
          avg_anxiety_not_sought_treatment: row.get(8)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
  }
}
