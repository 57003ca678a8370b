// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use sentinel_node::config::NodeConfig;
use sentinel_node::engine::Reconciler;
use sentinel_node::scheduler;
use sentinel_node::server::{build_router, AppState};
use sentinel_node::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    telemetry::init_telemetry();

    let cfg = match NodeConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(2);
        }
    };
    tracing::info!("Initializing Sentinel Node with config: {:?}", cfg);

    let reconciler = match Reconciler::from_config(&cfg) {
        Ok(r) => Arc::new(r),
        Err(e) => {
            tracing::error!("startup failed: {e}");
            std::process::exit(2);
        }
    };

    let shutdown = CancellationToken::new();

    if let Some(period) = cfg.poll_interval {
        tracing::info!("Scheduled reconciliation every {:?}", period);
        tokio::spawn(scheduler::run_periodically(reconciler.clone(), period, shutdown.clone()));
    } else {
        tracing::info!("No poll interval configured; runs are triggered via POST /v1/reconcile");
    }

    let app = build_router(AppState::new(reconciler, shutdown.clone()));

    let listener = match TcpListener::bind(cfg.bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("failed to bind {}: {e}", cfg.bind_addr);
            std::process::exit(1);
        }
    };
    tracing::info!("Listening on {}", cfg.bind_addr);

    let signal = shutdown.clone();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for ctrl-c: {e}");
            }
            tracing::info!("Shutdown requested");
            signal.cancel();
        })
        .await;

    if let Err(e) = served {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
