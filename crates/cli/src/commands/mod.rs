pub mod companies;
pub mod filings;
pub mod filters;
pub mod reassign;
pub mod reconcile;
pub mod seed;

use anyhow::Context;
use sentinel_persistence::SqliteLedger;
use std::path::Path;

/// Open the ledger, creating the schema if needed.
pub fn open_ledger(db: &Path) -> anyhow::Result<SqliteLedger> {
    SqliteLedger::open(db).with_context(|| format!("opening ledger at {}", db.display()))
}

pub(crate) fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}
