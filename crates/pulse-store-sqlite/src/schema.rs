//! SQL schema for the Pulse SQLite store.
//!
//! Executed by `SqliteStore::create` and for in-memory stores. Opening an
//! existing database never runs it; the tables must already be there.

/// Tables the loader writes to; checked when a store is opened.
pub const TABLES: [&str; 3] = ["students", "demographics", "surveys"];

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Surrogate identities. No other attributes.
CREATE TABLE IF NOT EXISTS students (
    student_id  TEXT PRIMARY KEY
);

-- One current row per student; upserted on student_id.
CREATE TABLE IF NOT EXISTS demographics (
    student_id        TEXT PRIMARY KEY REFERENCES students(student_id),
    age               INTEGER NOT NULL CHECK (age > 0),
    gender            TEXT NOT NULL,
    program_of_study  TEXT NOT NULL
);

-- Append-only; one row per loaded input record.
CREATE TABLE IF NOT EXISTS surveys (
    survey_id           INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id          TEXT NOT NULL REFERENCES students(student_id),
    survey_date         TEXT NOT NULL,   -- 'YYYY-MM-DD HH:MM:SS'
    year_of_study       INTEGER NOT NULL CHECK (year_of_study >= 1),
    cgpa_range          TEXT NOT NULL,
    marital_status      TEXT NOT NULL,
    anxiety_score       INTEGER NOT NULL CHECK (anxiety_score IN (0, 1)),
    depression_score    INTEGER NOT NULL CHECK (depression_score IN (0, 1)),
    panic_attack_score  INTEGER NOT NULL CHECK (panic_attack_score IN (0, 1)),
    sought_treatment    INTEGER NOT NULL CHECK (sought_treatment IN (0, 1))
);

CREATE INDEX IF NOT EXISTS surveys_student_idx ON surveys(student_id);
CREATE INDEX IF NOT EXISTS surveys_year_idx    ON surveys(year_of_study);
";
