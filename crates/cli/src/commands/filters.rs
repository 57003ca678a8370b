use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use sentinel_persistence::{FilterColumn, FilterOptions};
use std::path::Path;

use super::open_ledger;

/// Distinct values usable with `sentinel filings`. With `column`, only
/// that column is listed.
pub fn run(db: &Path, column: Option<&str>) -> anyhow::Result<FilterOptions> {
    let ledger = open_ledger(db)?;

    if let Some(name) = column {
        let column: FilterColumn = name.parse()?;
        let values = ledger.distinct_values(column)?;
        println!("\n{}:", column.name());
        for v in &values {
            println!("  {v}");
        }
        println!();
        let mut options = FilterOptions::default();
        match column {
            FilterColumn::CompanyName => options.company_names = values,
            FilterColumn::AssignedTo => options.assignees = values,
            FilterColumn::Form => options.forms = values,
        }
        return Ok(options);
    }

    let options = ledger.filter_options()?;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Filter", "Values"]);
    table.add_row(vec!["company_name".to_string(), options.company_names.join(", ")]);
    table.add_row(vec!["assigned_to".to_string(), options.assignees.join(", ")]);
    table.add_row(vec!["form".to_string(), options.forms.join(", ")]);

    println!("\n{table}\n");
    Ok(options)
}
