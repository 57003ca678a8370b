// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Reconciliation engine.
//!
//! One run is `seed → window → per-company (fetch → filter → persist)`.
//! Companies are independent: a failure is logged, counted and the run
//! moves on. Storage calls go through `spawn_blocking` because the ledger
//! is synchronous SQLite.

use chrono::{Local, NaiveDate};
use futures::stream::{FuturesUnordered, StreamExt};
use rustc_hash::FxHashSet;
use sentinel_kernel::{ClassificationFilter, Company, CompanyId, Fingerprint, NewFiling, Window};
use sentinel_persistence::{CompanyRegistry, EventStore, PersistenceError, SeedOutcome, SqliteLedger};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::NodeConfig;
use crate::errors::EngineError;
use crate::network::{FilingSource, SubmissionsClient};

/// Knobs of a single run, lifted out of `NodeConfig`.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub companies_csv: PathBuf,
    pub concurrency: usize,
    pub bootstrap_window_days: i64,
    pub overlap_days: i64,
    pub start_offset_days: i64,
}

impl RunSettings {
    pub fn from_config(cfg: &NodeConfig) -> Self {
        Self {
            companies_csv: cfg.companies_csv.clone(),
            concurrency: cfg.concurrency.max(1),
            bootstrap_window_days: cfg.bootstrap_window_days,
            overlap_days: cfg.overlap_days,
            start_offset_days: cfg.start_offset_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityFailure {
    pub company_id: CompanyId,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub today: NaiveDate,
    pub window: Window,
    /// Far edge of the fetch window in days, overlap included.
    pub window_days: i64,
    pub seeded: Option<usize>,
    pub entities_total: usize,
    /// Companies whose fetch and persist both completed.
    pub entities_processed: usize,
    pub entities_errored: usize,
    /// Never launched because the run was cancelled.
    pub entities_skipped: usize,
    pub events_persisted: usize,
    pub events_already_known: usize,
    pub events_filtered: usize,
    pub errored_ids: Vec<EntityFailure>,
    pub cancelled: bool,
    pub duration_ms: u64,
}

impl RunSummary {
    fn new(today: NaiveDate, window: Window, seeded: Option<usize>, entities_total: usize) -> Self {
        Self {
            today,
            window,
            window_days: window.end_offset_days,
            seeded,
            entities_total,
            entities_processed: 0,
            entities_errored: 0,
            entities_skipped: 0,
            events_persisted: 0,
            events_already_known: 0,
            events_filtered: 0,
            errored_ids: Vec::new(),
            cancelled: false,
            duration_ms: 0,
        }
    }

    fn absorb(&mut self, report: CompanyReport) {
        self.events_persisted += report.tally.persisted;
        self.events_already_known += report.tally.already_known;
        self.events_filtered += report.tally.filtered;
        match report.error {
            None => self.entities_processed += 1,
            Some(e) => {
                self.entities_errored += 1;
                self.errored_ids.push(EntityFailure {
                    company_id: report.company_id,
                    error: e.to_string(),
                });
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct CompanyTally {
    persisted: usize,
    already_known: usize,
    filtered: usize,
}

struct CompanyReport {
    company_id: CompanyId,
    tally: CompanyTally,
    error: Option<EngineError>,
}

pub struct Reconciler<S, L> {
    source: S,
    ledger: L,
    filter: ClassificationFilter,
    settings: RunSettings,
}

impl<S, L> Reconciler<S, L>
where
    S: FilingSource,
    L: CompanyRegistry + EventStore + Clone + Send + Sync + 'static,
{
    pub fn new(source: S, ledger: L, filter: ClassificationFilter, settings: RunSettings) -> Self {
        Self { source, ledger, filter, settings }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub async fn run(&self, cancel: &CancellationToken) -> Result<RunSummary, EngineError> {
        self.run_at(Local::now().date_naive(), cancel).await
    }

    /// A run pinned to `today`. Errors returned here are fatal for the
    /// whole run (configuration, or the ledger being unreadable); company
    /// level errors end up in the summary instead.
    pub async fn run_at(&self, today: NaiveDate, cancel: &CancellationToken) -> Result<RunSummary, EngineError> {
        let started = Instant::now();

        let csv = self.settings.companies_csv.clone();
        let seeded = match self.blocking(move |l| l.seed_from_file(&csv)).await? {
            SeedOutcome::Seeded { companies } => Some(companies),
            SeedOutcome::Skipped { .. } => None,
        };

        let window = self.compute_window(today).await?;
        let companies = self.blocking(|l| l.list_companies()).await?;
        let mut summary = RunSummary::new(today, window, seeded, companies.len());

        info!(
            %today,
            window_days = window.end_offset_days,
            companies = companies.len(),
            "reconciliation run started"
        );

        // At most `concurrency` companies in flight; nothing new is
        // launched once the token fires.
        let mut pending = companies.into_iter();
        let mut in_flight = FuturesUnordered::new();
        loop {
            while in_flight.len() < self.settings.concurrency && !cancel.is_cancelled() {
                match pending.next() {
                    Some(company) => in_flight.push(self.reconcile_company(company, window, today)),
                    None => break,
                }
            }
            match in_flight.next().await {
                Some(report) => summary.absorb(report),
                None => break,
            }
        }

        summary.cancelled = cancel.is_cancelled();
        summary.entities_skipped =
            summary.entities_total - summary.entities_processed - summary.entities_errored;
        summary.duration_ms = started.elapsed().as_millis() as u64;

        metrics::counter!("sentinel_runs_total", 1);
        metrics::counter!("sentinel_entity_errors_total", summary.entities_errored as u64);
        metrics::histogram!("sentinel_run_duration_seconds", started.elapsed().as_secs_f64());

        info!(
            processed = summary.entities_processed,
            errored = summary.entities_errored,
            skipped = summary.entities_skipped,
            persisted = summary.events_persisted,
            already_known = summary.events_already_known,
            filtered = summary.events_filtered,
            cancelled = summary.cancelled,
            duration_ms = summary.duration_ms,
            "reconciliation run finished"
        );
        Ok(summary)
    }

    /// Catch-up window from the newest stored filing, widened by the
    /// configured overlap.
    pub async fn compute_window(&self, today: NaiveDate) -> Result<Window, EngineError> {
        let most_recent = self.blocking(|l| l.most_recent_overall()).await?;
        Ok(Window::catch_up(
            today,
            most_recent.map(|f| f.date),
            self.settings.bootstrap_window_days,
        )
        .widened(self.settings.overlap_days)
        .with_start_offset(self.settings.start_offset_days))
    }

    async fn reconcile_company(&self, company: Company, window: Window, today: NaiveDate) -> CompanyReport {
        let company_id = company.id.clone();
        let mut tally = CompanyTally::default();
        let error = self.try_reconcile(company, window, today, &mut tally).await.err();

        if let Some(e) = &error {
            warn!(company_id = %company_id, "company skipped: {e}");
        }
        metrics::counter!("sentinel_filings_persisted_total", tally.persisted as u64);
        metrics::counter!("sentinel_filings_duplicate_total", tally.already_known as u64);
        metrics::counter!("sentinel_filings_filtered_total", tally.filtered as u64);

        CompanyReport { company_id, tally, error }
    }

    async fn try_reconcile(
        &self,
        company: Company,
        window: Window,
        today: NaiveDate,
        tally: &mut CompanyTally,
    ) -> Result<(), EngineError> {
        let candidates = self.source.fetch(&company.cik, window, today).await?;

        let mut seen = FxHashSet::default();
        let mut batch = Vec::new();
        for candidate in candidates {
            if !self.filter.is_eligible(&candidate.form) {
                tally.filtered += 1;
                continue;
            }
            let filing = candidate.into_new(&company);
            let fingerprint = filing
                .dedup_key()
                .fingerprint()
                .map_err(|e| EngineError::Internal(e.to_string()))?;
            if !seen.insert(fingerprint) {
                tally.already_known += 1;
                debug!(company_id = %company.id, %fingerprint, "repeated within batch");
                continue;
            }
            batch.push((fingerprint, filing));
        }

        if batch.is_empty() {
            return Ok(());
        }

        let ledger = self.ledger.clone();
        let (persisted, already_known, failure) =
            tokio::task::spawn_blocking(move || persist_batch(&ledger, batch)).await?;
        tally.persisted += persisted;
        tally.already_known += already_known;

        match failure {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&L) -> Result<T, PersistenceError> + Send + 'static,
        T: Send + 'static,
    {
        let ledger = self.ledger.clone();
        Ok(tokio::task::spawn_blocking(move || f(&ledger)).await??)
    }
}

impl Reconciler<SubmissionsClient, SqliteLedger> {
    /// Production wiring: SQLite ledger at `db_path` and the HTTP adapter.
    pub fn from_config(cfg: &NodeConfig) -> Result<Self, EngineError> {
        cfg.validate()?;
        let ledger = SqliteLedger::open_with_timeout(&cfg.db_path, cfg.busy_timeout)?;
        let source = SubmissionsClient::new(cfg)?;
        let filter = ClassificationFilter::new(cfg.form_policy);
        Ok(Self::new(source, ledger, filter, RunSettings::from_config(cfg)))
    }
}

/// Record filings one at a time; each insert commits with its projection
/// refresh. Stops at the first storage error, keeping what was committed.
fn persist_batch<L: EventStore>(
    ledger: &L,
    batch: Vec<(Fingerprint, NewFiling)>,
) -> (usize, usize, Option<PersistenceError>) {
    let mut persisted = 0;
    let mut already_known = 0;
    for (fingerprint, filing) in &batch {
        match ledger.record(filing) {
            Ok(recorded) if recorded.inserted => {
                persisted += 1;
                debug!(
                    company_id = %recorded.filing.company_id,
                    filing_id = %recorded.filing.id,
                    form = %recorded.filing.form,
                    date = %recorded.filing.date,
                    %fingerprint,
                    "filing persisted"
                );
            }
            Ok(recorded) => {
                already_known += 1;
                debug!(
                    company_id = %recorded.filing.company_id,
                    filing_id = %recorded.filing.id,
                    %fingerprint,
                    "filing already stored"
                );
            }
            Err(e) => return (persisted, already_known, Some(e)),
        }
    }
    (persisted, already_known, None)
}
