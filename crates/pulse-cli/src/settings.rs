//! Layered settings: optional TOML file, then `PULSE_*` environment
//! variables, then command-line flags.

use std::{
  collections::HashMap,
  path::{Path, PathBuf},
};

use anyhow::{Context as _, bail};
use pulse_core::{columns::ColumnMap, ingest::IngestOptions};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  #[serde(default = "default_database_path")]
  pub database_path: PathBuf,

  /// Single ASCII character, or `tab`.
  #[serde(default = "default_delimiter")]
  pub delimiter: String,

  #[serde(default = "default_has_headers")]
  pub has_headers: bool,

  /// Field name → zero-based position, overriding the default layout.
  #[serde(default)]
  pub columns: HashMap<String, usize>,
}

fn default_database_path() -> PathBuf { PathBuf::from("pulse.db") }

fn default_delimiter() -> String { ",".to_string() }

fn default_has_headers() -> bool { true }

impl Settings {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("PULSE"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise Settings")
  }

  pub fn delimiter_byte(&self) -> anyhow::Result<u8> {
    match self.delimiter.as_str() {
      "tab" | "\\t" | "\t" => Ok(b'\t'),
      s if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
      other => bail!("delimiter must be a single ASCII character, got {other:?}"),
    }
  }

  pub fn ingest_options(&self) -> anyhow::Result<IngestOptions> {
    let columns = ColumnMap::with_overrides(&self.columns)
      .context("invalid `columns` table in configuration")?;
    Ok(IngestOptions {
      delimiter: self.delimiter_byte()?,
      has_headers: self.has_headers,
      columns,
    })
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use pulse_core::record::Field;

  use super::*;

  fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("pulse.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path
  }

  #[test]
  fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(settings.delimiter_byte().unwrap(), b',');
    assert!(settings.has_headers);
    assert!(settings.columns.is_empty());
  }

  #[test]
  fn file_overrides_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
      dir.path(),
      r#"
database_path = "surveys.db"
delimiter = "tab"
has_headers = false

[columns]
gender = 2
age = 1
"#,
    );

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.database_path, PathBuf::from("surveys.db"));

    let options = settings.ingest_options().unwrap();
    assert_eq!(options.delimiter, b'\t');
    assert!(!options.has_headers);
    assert_eq!(options.columns.position(Field::Gender), Some(2));
    assert_eq!(options.columns.position(Field::Age), Some(1));
  }

  #[test]
  fn bad_delimiter_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "delimiter = \";;\"\n");
    let settings = Settings::load(&path).unwrap();
    assert!(settings.ingest_options().is_err());
  }
}
