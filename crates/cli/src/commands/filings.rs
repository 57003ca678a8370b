use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use sentinel_persistence::{FilingFilter, FilingView};
use std::path::Path;

use super::{open_ledger, or_dash};

pub fn table(rows: &[FilingView]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Date", "Company", "Form", "Assigned", "Link"]);

    for row in rows {
        let f = &row.filing;
        table.add_row(vec![
            f.id.to_string(),
            f.date.to_string(),
            row.company_name.clone(),
            f.form.clone(),
            or_dash(f.assigned_to.as_deref()),
            f.link.clone(),
        ]);
    }
    table
}

pub fn run(db: &Path, filter: &FilingFilter, json: bool) -> anyhow::Result<Vec<FilingView>> {
    let rows = open_ledger(db)?.list_filings(filter)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("\nFilings ({})\n", rows.len());
        println!("{}\n", table(&rows));
    }
    Ok(rows)
}
