#![allow(dead_code)]

use chrono::NaiveDate;
use sentinel_kernel::{CandidateFiling, Cik, ClassificationFilter, Window};
use sentinel_node::engine::{Reconciler, RunSettings};
use sentinel_node::errors::EngineError;
use sentinel_node::network::FilingSource;
use sentinel_persistence::SqliteLedger;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn candidate(date: NaiveDate, form: &str, link: &str) -> CandidateFiling {
    CandidateFiling { date, form: form.to_string(), link: link.to_string() }
}

/// In-memory source keyed by padded CIK. Honors the window the same way
/// the HTTP adapter does.
#[derive(Default)]
pub struct FakeSource {
    filings: HashMap<String, Vec<CandidateFiling>>,
    failing: Vec<String>,
    delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl FakeSource {
    pub fn with(mut self, cik: &str, filings: Vec<CandidateFiling>) -> Self {
        let cik = Cik::parse(cik).unwrap();
        self.filings.insert(cik.padded().to_string(), filings);
        self
    }

    pub fn failing(mut self, cik: &str) -> Self {
        self.failing.push(Cik::parse(cik).unwrap().padded().to_string());
        self
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl FilingSource for FakeSource {
    async fn fetch(
        &self,
        cik: &Cik,
        window: Window,
        today: NaiveDate,
    ) -> Result<Vec<CandidateFiling>, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.iter().any(|c| c == cik.padded()) {
            return Err(EngineError::Transport(format!("CIK{}: HTTP 503", cik.padded())));
        }
        Ok(self
            .filings
            .get(cik.padded())
            .map(|all| all.iter().filter(|c| window.contains(today, c.date)).cloned().collect())
            .unwrap_or_default())
    }
}

pub fn settings(csv: &Path) -> RunSettings {
    RunSettings {
        companies_csv: csv.to_path_buf(),
        concurrency: 4,
        bootstrap_window_days: 365,
        overlap_days: 1,
        start_offset_days: 0,
    }
}

/// Unseeded ledger plus the reference CSV the engine will seed from.
pub fn reconciler<S: FilingSource>(dir: &Path, source: S) -> Reconciler<S, SqliteLedger> {
    let csv = sentinel_persistence::fixtures::write_reference_csv(dir).unwrap();
    let ledger = SqliteLedger::open(dir.join("ledger.db")).unwrap();
    Reconciler::new(source, ledger, ClassificationFilter::default(), settings(&csv))
}
