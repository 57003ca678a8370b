use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use sentinel_kernel::Company;
use sentinel_persistence::CompanyRegistry;
use std::path::Path;

use super::{open_ledger, or_dash};

pub fn table(companies: &[Company]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Name", "Ticker", "CIK", "Assigned", "Latest"]);

    for c in companies {
        let latest = c
            .latest
            .as_ref()
            .map(|l| format!("{} {}", l.date, l.form))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            c.id.to_string(),
            c.name.clone(),
            or_dash(c.ticker.as_deref()),
            c.cik.padded().to_string(),
            or_dash(c.assigned_to.as_deref()),
            latest,
        ]);
    }
    table
}

pub fn run(db: &Path) -> anyhow::Result<()> {
    let companies = open_ledger(db)?.list_companies()?;
    println!("\nCompanies ({})\n", companies.len());
    println!("{}\n", table(&companies));
    Ok(())
}
