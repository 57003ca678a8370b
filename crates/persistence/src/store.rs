//! Storage contracts.
//!
//! The reconciliation engine only talks to these traits. `SqliteLedger`
//! is the one backend shipped; another backend must keep the same
//! guarantees: dedup key enforced by the store itself, and the projection
//! refreshed in the same unit of work as the insert that changed it.
//! A filing's assignee is read from its company row when the row is written.

use sentinel_kernel::{Company, CompanyId, Filing, LatestFiling, NewFiling};
use serde::Serialize;

use crate::error::Result;
use crate::seed::{self, CompanyRecord};
use std::path::Path;

/// Outcome of an insert-if-absent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Recorded {
    pub filing: Filing,
    /// `false` when the dedup key already existed; `filing` is then the
    /// stored row, not the request.
    pub inserted: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SeedOutcome {
    Seeded { companies: usize },
    Skipped { existing: u64 },
}

pub trait CompanyRegistry {
    fn company_count(&self) -> Result<u64>;

    /// Insert every record in one transaction, but only if no company
    /// exists yet. Safe to call concurrently; at most one caller seeds.
    fn seed_if_empty(&self, records: &[CompanyRecord]) -> Result<SeedOutcome>;

    /// Seed from a reference file unless companies already exist. The
    /// file is not even opened when the table is populated.
    fn seed_from_file(&self, path: &Path) -> Result<SeedOutcome> {
        let existing = self.company_count()?;
        if existing > 0 {
            return Ok(SeedOutcome::Skipped { existing });
        }
        let records = seed::read_reference_file(path)?;
        self.seed_if_empty(&records)
    }

    fn list_companies(&self) -> Result<Vec<Company>>;

    fn get_company(&self, id: &CompanyId) -> Result<Option<Company>>;
}

pub trait EventStore {
    /// The stored assignee is the company's at insert time, whatever
    /// `filing.assigned_to` says.
    fn insert_if_absent(&self, filing: &NewFiling) -> Result<Recorded>;

    /// Insert-if-absent plus projection refresh, committed together.
    fn record(&self, filing: &NewFiling) -> Result<Recorded>;

    /// Newest first (date, then id).
    fn list_for_entity(&self, id: &CompanyId) -> Result<Vec<Filing>>;

    fn most_recent_overall(&self) -> Result<Option<Filing>>;
}

pub trait EntityProjection {
    /// Recompute the cached latest-filing columns. Returns the new value.
    fn refresh(&self, id: &CompanyId) -> Result<Option<LatestFiling>>;

    /// Back-fill the denormalized assignee on every filing of `id`.
    /// Returns the number of filings touched.
    fn assignee_changed(&self, id: &CompanyId, assignee: Option<&str>) -> Result<usize>;

    /// Change the company's own assignee and back-fill its filings in one
    /// unit of work.
    fn reassign(&self, id: &CompanyId, assignee: Option<&str>) -> Result<usize>;
}
