//! Error type for `pulse-store-sqlite`.

use std::path::PathBuf;

use rusqlite::ErrorCode;
use thiserror::Error;

/// The backend is reachable in principle but not set up for this run.
#[derive(Debug, Error)]
pub enum ConfigurationError {
  #[error("access to the database was denied ({0}); check file permissions")]
  AccessDenied(String),

  #[error("database {0:?} does not exist; run `pulse init` to create it")]
  MissingDatabase(PathBuf),

  #[error("configured path is not a SQLite database ({0})")]
  NotADatabase(String),

  #[error("database has no `{0}` table; run `pulse init` to create the schema")]
  MissingSchema(&'static str),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("cannot reach the database: {0}")]
  Connectivity(#[source] rusqlite::Error),

  #[error(transparent)]
  Configuration(#[from] ConfigurationError),

  /// A single row was refused; the connection is still usable.
  #[error("row rejected: {0}")]
  Constraint(#[source] rusqlite::Error),

  #[error("database error: {0}")]
  Database(#[source] rusqlite::Error),

  #[error("stored value is malformed: {0}")]
  Decode(String),
}

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self {
    let Some(code) = e.sqlite_error_code() else {
      return Error::Database(e);
    };
    match code {
      ErrorCode::ConstraintViolation => Error::Constraint(e),
      ErrorCode::PermissionDenied
      | ErrorCode::ReadOnly
      | ErrorCode::AuthorizationForStatementDenied => {
        Error::Configuration(ConfigurationError::AccessDenied(e.to_string()))
      }
      ErrorCode::NotADatabase => {
        Error::Configuration(ConfigurationError::NotADatabase(e.to_string()))
      }
      ErrorCode::CannotOpen
      | ErrorCode::DatabaseBusy
      | ErrorCode::DatabaseLocked
      | ErrorCode::SystemIoFailure
      | ErrorCode::DiskFull
      | ErrorCode::FileLockingProtocolFailed => Error::Connectivity(e),
      _ => Error::Database(e),
    }
  }
}

impl pulse_core::store::StoreError for Error {
  fn is_row_rejection(&self) -> bool { matches!(self, Error::Constraint(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
