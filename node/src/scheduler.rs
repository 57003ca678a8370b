//! Periodic reconciliation.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::engine::Reconciler;
use crate::network::FilingSource;
use sentinel_persistence::{CompanyRegistry, EventStore};

/// Run once immediately, then every `period`, until `shutdown` fires.
/// A failed run is logged and the loop keeps going; only configuration
/// errors stop it, since retrying them cannot succeed.
pub async fn run_periodically<S, L>(
    reconciler: Arc<Reconciler<S, L>>,
    period: Duration,
    shutdown: CancellationToken,
) where
    S: FilingSource,
    L: CompanyRegistry + EventStore + Clone + Send + Sync + 'static,
{
    let mut interval = tokio::time::interval(period);
    // A slow run should not trigger a burst of catch-up runs.
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = interval.tick() => {}
        }

        match reconciler.run(&shutdown).await {
            Ok(summary) => tracing::debug!(cancelled = summary.cancelled, "scheduled run done"),
            Err(e) if e.is_fatal() => {
                tracing::error!("scheduled reconciliation stopped: {e}");
                break;
            }
            Err(e) => tracing::warn!("scheduled run failed: {e}"),
        }
    }
    tracing::info!("scheduler stopped");
}
