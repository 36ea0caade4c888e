//! SQLite backend for the Pulse survey store.
//!
//! One synchronous [`rusqlite::Connection`] per store. Every call is a
//! blocking round trip; the connection is closed when the store is dropped
//! or explicitly via [`SqliteStore::close`].

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{ConfigurationError, Error, Result};
pub use store::{SqliteStore, TableCounts};
