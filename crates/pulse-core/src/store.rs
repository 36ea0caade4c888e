//! The `SurveyStore` trait and the integrity-window session guard.
//!
//! The trait is implemented by storage backends (e.g. `pulse-store-sqlite`).
//! The loader and the binary depend on this abstraction, not on any concrete
//! backend.

use std::ops::{Deref, DerefMut};

use uuid::Uuid;

use crate::{
  aggregate::{GroupSummary, Grouping},
  record::{Demographic, SurveyResponse},
};

// ─── Error classification ────────────────────────────────────────────────────

/// Errors raised by a [`SurveyStore`] must say whether they are confined to
/// one row.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` when the backend rejected a single write (e.g. a constraint
  /// violation) and the session remains usable.
  fn is_row_rejection(&self) -> bool;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the three-table survey schema.
///
/// All calls are blocking round trips on one session. Implementations must
/// not be shared between concurrent writers while integrity checks are
/// relaxed.
pub trait SurveyStore {
  type Error: StoreError;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Allocate and persist a fresh student identity. Ids are never reused,
  /// within a run or across runs.
  fn allocate_student(&mut self) -> Result<Uuid, Self::Error>;

  /// Insert the demographic row for a student, or overwrite it if one
  /// already exists.
  fn upsert_demographic(&mut self, row: &Demographic) -> Result<(), Self::Error>;

  /// Append one survey row.
  fn insert_survey(&mut self, row: &SurveyResponse) -> Result<(), Self::Error>;

  // ── Session state ─────────────────────────────────────────────────────

  /// Turn referential-integrity enforcement on or off for this session.
  fn set_integrity_checks(&mut self, enabled: bool) -> Result<(), Self::Error>;

  /// Number of demographic or survey rows whose student reference does not
  /// resolve.
  fn dangling_references(&mut self) -> Result<usize, Self::Error>;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Per-group counts and indicator averages over the joined tables.
  fn summarize(
    &mut self,
    grouping: Grouping,
  ) -> Result<Vec<GroupSummary>, Self::Error>;
}

// ─── Integrity window ────────────────────────────────────────────────────────

/// A span of writes during which integrity checks are relaxed.
///
/// Entering disables enforcement; [`IntegrityWindow::close`] re-enables it
/// and reports failure. If the window is dropped without being closed (an
/// early `?` return, a panic), enforcement is restored on drop and any
/// failure to do so is logged.
pub struct IntegrityWindow<'s, S: SurveyStore> {
  store: &'s mut S,
  open:  bool,
}

impl<'s, S: SurveyStore> IntegrityWindow<'s, S> {
  pub fn enter(store: &'s mut S) -> Result<Self, S::Error> {
    store.set_integrity_checks(false)?;
    tracing::debug!("integrity checks relaxed");
    Ok(Self { store, open: true })
  }

  pub fn close(mut self) -> Result<(), S::Error> {
    self.open = false;
    self.store.set_integrity_checks(true)?;
    tracing::debug!("integrity checks restored");
    Ok(())
  }
}

impl<S: SurveyStore> Deref for IntegrityWindow<'_, S> {
  type Target = S;

  fn deref(&self) -> &S { &*self.store }
}

impl<S: SurveyStore> DerefMut for IntegrityWindow<'_, S> {
  fn deref_mut(&mut self) -> &mut S { &mut *self.store }
}

impl<S: SurveyStore> Drop for IntegrityWindow<'_, S> {
  fn drop(&mut self) {
    if !self.open {
      return;
    }
    match self.store.set_integrity_checks(true) {
      Ok(()) => tracing::debug!("integrity checks restored on early exit"),
      Err(e) => tracing::error!("failed to restore integrity checks: {e}"),
    }
  }
}
