//! Reference-list import.
//!
//! The whole file is parsed and validated before anything is written, so
//! a bad row can never leave a half-seeded company table behind.

use serde::Deserialize;
use sentinel_kernel::{Cik, CompanyId};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::error::{PersistenceError, Result};

pub const REQUIRED_COLUMNS: [&str; 5] = [
    "company_id",
    "company_name",
    "company_ticker",
    "company_cik",
    "assigned_to",
];

/// One validated row of the reference list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompanyRecord {
    pub id: CompanyId,
    pub name: String,
    pub ticker: Option<String>,
    pub cik: Cik,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    company_id: Option<String>,
    company_name: Option<String>,
    company_ticker: Option<String>,
    company_cik: Option<String>,
    assigned_to: Option<String>,
}

pub fn read_reference_file(path: impl AsRef<Path>) -> Result<Vec<CompanyRecord>> {
    let file = std::fs::File::open(path)?;
    parse_reference(file)
}

pub fn parse_reference<R: Read>(reader: R) -> Result<Vec<CompanyRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PersistenceError::MissingColumns(missing));
    }

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    for result in rdr.records() {
        let row = result?;
        // Line the record starts on; quoted fields may span several.
        let line = row.position().map_or(0, |p| p.line());
        let raw: RawRow = row.deserialize(Some(&headers))?;
        let record = validate(raw, line)?;
        if !seen.insert(record.id.clone()) {
            return Err(PersistenceError::MalformedRow {
                line,
                reason: format!("duplicate company_id {}", record.id),
            });
        }
        records.push(record);
    }
    Ok(records)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn validate(raw: RawRow, line: u64) -> Result<CompanyRecord> {
    let malformed = |reason: String| PersistenceError::MalformedRow { line, reason };

    let id = non_empty(raw.company_id).ok_or_else(|| malformed("empty company_id".into()))?;
    let name = non_empty(raw.company_name).ok_or_else(|| malformed("empty company_name".into()))?;
    let raw_cik = non_empty(raw.company_cik).ok_or_else(|| malformed("empty company_cik".into()))?;
    let cik = Cik::parse(&raw_cik).map_err(|e| malformed(e.to_string()))?;

    Ok(CompanyRecord {
        id: CompanyId(id),
        name,
        ticker: non_empty(raw.company_ticker),
        cik,
        assigned_to: non_empty(raw.assigned_to),
    })
}
