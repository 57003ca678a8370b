//! Test scenarios shared by this crate, the node and the CLI.

use crate::error::Result;
use crate::ledger::SqliteLedger;
use crate::store::CompanyRegistry;

use std::fs;
use std::path::{Path, PathBuf};

/// Two companies: `A1` (Acme, CIK 1, dana) and `A2` (Globex, CIK 2, lee).
pub const REFERENCE_CSV: &str = "\
company_id,company_name,company_ticker,company_cik,assigned_to
A1,Acme Corp,ACME,0000000001,dana
A2,Globex,GLBX,2,lee
";

pub fn write_reference_csv(dir: &Path) -> Result<PathBuf> {
    write_csv(dir, "company_list.csv", REFERENCE_CSV)
}

pub fn write_csv(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// Fresh ledger at `dir/ledger.db` seeded with [`REFERENCE_CSV`].
pub fn seeded_ledger(dir: &Path) -> Result<SqliteLedger> {
    let csv = write_reference_csv(dir)?;
    let ledger = SqliteLedger::open(dir.join("ledger.db"))?;
    ledger.seed_from_file(&csv)?;
    Ok(ledger)
}
