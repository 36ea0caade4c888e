//! Core types and the ingest-and-load pipeline for Pulse survey datasets.
//!
//! This crate is deliberately free of database dependencies. Storage backends
//! (e.g. `pulse-store-sqlite`) implement [`store::SurveyStore`]; the binary
//! wires a backend to [`pipeline::run`].
//!
//! Data flows one way:
//!
//! ```text
//! csv rows ─ ingest ─▶ RawRecord ─ validate/normalize ─▶ ValidRecord
//!          ─ load ─▶ students ─▶ demographics ─▶ surveys
//! ```

pub mod aggregate;
pub mod columns;
pub mod error;
pub mod ingest;
pub mod load;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod store;
pub mod summary;
pub mod validate;

pub use error::{Error, RejectReason, Result};
