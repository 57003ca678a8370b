// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use sentinel_kernel::{Company, CompanyId};
use sentinel_persistence::{
    CompanyRegistry, EntityProjection, EventStore, FilingFilter, FilingView, FilterOptions,
    PersistenceError, SqliteLedger,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::*;
use crate::engine::{Reconciler, RunSummary};
use crate::errors::EngineError;
use crate::network::FilingSource;

pub type SharedReconciler<S> = Arc<Reconciler<S, SqliteLedger>>;

pub struct AppState<S> {
    pub reconciler: SharedReconciler<S>,
    /// Cancelled on shutdown; runs started over HTTP stop launching
    /// companies when it fires.
    pub shutdown: CancellationToken,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            reconciler: self.reconciler.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<S: FilingSource + 'static> AppState<S> {
    pub fn new(reconciler: SharedReconciler<S>, shutdown: CancellationToken) -> Self {
        Self { reconciler, shutdown }
    }

    /// Run a ledger call on the blocking pool.
    async fn query<T, F>(&self, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&SqliteLedger) -> Result<T, PersistenceError> + Send + 'static,
        T: Send + 'static,
    {
        let ledger = self.reconciler.ledger().clone();
        Ok(tokio::task::spawn_blocking(move || f(&ledger)).await??)
    }
}

pub fn build_router<S: FilingSource + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/v1/filings", get(list_filings::<S>))
        .route("/v1/filings/filters", get(filter_options::<S>))
        .route("/v1/companies", get(list_companies::<S>))
        .route("/v1/companies/:id", get(get_company::<S>))
        .route("/v1/companies/:id/filings", get(company_filings::<S>))
        .route("/v1/companies/:id/assignee", put(reassign::<S>))
        .route("/v1/reconcile", post(reconcile::<S>))
        // Observability
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn list_filings<S: FilingSource + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<FilingsQuery>,
) -> Result<Json<Vec<FilingView>>, EngineError> {
    let filter = FilingFilter::from(params);
    let rows = state.query(move |l| l.list_filings(&filter)).await?;
    Ok(Json(rows))
}

async fn filter_options<S: FilingSource + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<FilterOptions>, EngineError> {
    Ok(Json(state.query(|l| l.filter_options()).await?))
}

async fn list_companies<S: FilingSource + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Company>>, EngineError> {
    Ok(Json(state.query(|l| l.list_companies()).await?))
}

async fn find_company<S: FilingSource + 'static>(
    state: &AppState<S>,
    id: CompanyId,
) -> Result<Company, EngineError> {
    let lookup = id.clone();
    state
        .query(move |l| l.get_company(&lookup))
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("company {id}")))
}

async fn get_company<S: FilingSource + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Company>, EngineError> {
    Ok(Json(find_company(&state, CompanyId(id)).await?))
}

async fn company_filings<S: FilingSource + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<CompanyFilingsResponse>, EngineError> {
    let company = find_company(&state, CompanyId(id)).await?;
    let lookup = company.id.clone();
    let filings = state.query(move |l| l.list_for_entity(&lookup)).await?;
    Ok(Json(CompanyFilingsResponse { company, filings }))
}

async fn reassign<S: FilingSource + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(req): Json<AssigneeRequest>,
) -> Result<Json<AssigneeResponse>, EngineError> {
    let company_id = CompanyId(id);
    let assigned_to = req.assigned_to.map(|a| a.trim().to_string()).filter(|a| !a.is_empty());

    let (target, assignee) = (company_id.clone(), assigned_to.clone());
    let filings_updated = state
        .query(move |l| l.reassign(&target, assignee.as_deref()))
        .await?;

    tracing::info!(company_id = %company_id, assignee = ?assigned_to, filings_updated, "company reassigned");
    Ok(Json(AssigneeResponse { company_id, assigned_to, filings_updated }))
}

async fn reconcile<S: FilingSource + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<RunSummary>, EngineError> {
    let summary = state.reconciler.run(&state.shutdown).await?;
    Ok(Json(summary))
}

async fn health<S: FilingSource + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<HealthResponse>, EngineError> {
    let companies = state.query(|l| l.company_count()).await?;
    Ok(Json(HealthResponse { status: "ok".to_string(), companies }))
}

async fn metrics_handler() -> String {
    crate::telemetry::get_metrics()
}
