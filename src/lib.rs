// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! sentinel-kernel: domain model for incremental filing reconciliation.
//!
//! Everything in this crate is pure: no I/O, no clocks. Callers pass
//! `today` explicitly so window math stays reproducible in tests.

pub mod config;
pub mod error;
pub mod types;
pub mod dedup;
pub mod classify;
pub mod window;

#[cfg(test)]
pub mod tests;

pub use classify::{ClassificationFilter, FormPolicy};
pub use dedup::{DedupKey, Fingerprint};
pub use error::{KernelError, KernelResult};
pub use types::filing::{CandidateFiling, Company, Filing, LatestFiling, NewFiling};
pub use types::id::{Cik, CompanyId, FilingId};
pub use window::Window;
