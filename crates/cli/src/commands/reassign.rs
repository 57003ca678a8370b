use sentinel_kernel::CompanyId;
use sentinel_persistence::EntityProjection;
use std::path::Path;

use super::open_ledger;

/// Change a company's assignee and back-fill its filings. `None` clears it.
pub fn run(db: &Path, company_id: &str, assignee: Option<&str>) -> anyhow::Result<usize> {
    let ledger = open_ledger(db)?;
    let assignee = assignee.map(str::trim).filter(|a| !a.is_empty());
    let touched = ledger.reassign(&CompanyId::from(company_id), assignee)?;

    println!(
        "\n{company_id} now assigned to {}; {touched} filings updated.\n",
        assignee.unwrap_or("nobody")
    );
    Ok(touched)
}
