// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event source adapters.

pub mod client;
pub mod submissions;

use chrono::NaiveDate;
use sentinel_kernel::{CandidateFiling, Cik, Window};
use std::future::Future;

use crate::errors::EngineError;

pub use client::SubmissionsClient;

/// Anything that can list candidate filings for a company.
///
/// Implementations filter by `window` themselves. A failed fetch is
/// reported as `EngineError::Transport`; the engine treats it as "nothing
/// new, possibly incomplete" for that company and relies on the next run's
/// overlapping window.
pub trait FilingSource: Send + Sync {
    fn fetch(
        &self,
        cik: &Cik,
        window: Window,
        today: NaiveDate,
    ) -> impl Future<Output = Result<Vec<CandidateFiling>, EngineError>> + Send;
}
