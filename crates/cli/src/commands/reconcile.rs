use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use sentinel_node::config::NodeConfig;
use sentinel_node::engine::{Reconciler, RunSummary};
use tokio_util::sync::CancellationToken;

pub fn table(summary: &RunSummary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value"]);

    let rows: Vec<(&str, String)> = vec![
        ("Today", summary.today.to_string()),
        ("Window (days)", summary.window_days.to_string()),
        ("Seeded", summary.seeded.map(|n| n.to_string()).unwrap_or_else(|| "-".into())),
        ("Companies", summary.entities_total.to_string()),
        ("Processed", summary.entities_processed.to_string()),
        ("Errored", summary.entities_errored.to_string()),
        ("Skipped", summary.entities_skipped.to_string()),
        ("Persisted", summary.events_persisted.to_string()),
        ("Already known", summary.events_already_known.to_string()),
        ("Filtered", summary.events_filtered.to_string()),
        ("Cancelled", summary.cancelled.to_string()),
        ("Duration (ms)", summary.duration_ms.to_string()),
    ];
    for (name, value) in rows {
        table.add_row(vec![name.to_string(), value]);
    }
    table
}

/// One reconciliation run against the configured source. Ctrl-C stops
/// launching new companies; in-flight ones finish.
pub fn run(cfg: &NodeConfig, json: bool) -> anyhow::Result<RunSummary> {
    let reconciler = Reconciler::from_config(cfg)?;
    let runtime = tokio::runtime::Runtime::new()?;

    let summary = runtime.block_on(async {
        let cancel = CancellationToken::new();
        let on_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Interrupted; finishing in-flight companies...");
                on_signal.cancel();
            }
        });
        reconciler.run(&cancel).await
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(summary);
    }

    println!("\nReconciliation Run\n");
    println!("{}\n", table(&summary));
    if !summary.errored_ids.is_empty() {
        println!("Errors:");
        for failure in &summary.errored_ids {
            println!("  {}: {}", failure.company_id, failure.error);
        }
        println!();
    }
    Ok(summary)
}
