//! Company registry: seeding and lookups.

use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};
use sentinel_kernel::types::parse_date;
use sentinel_kernel::{Cik, Company, CompanyId, LatestFiling};
use tracing::info;

use crate::error::Result;
use crate::ledger::SqliteLedger;
use crate::seed::CompanyRecord;
use crate::store::{CompanyRegistry, SeedOutcome};

const COMPANY_COLUMNS: &str = "company_id, company_name, company_ticker, company_cik, assigned_to,
     most_recent_date, most_recent_form, most_recent_link, most_recent_summary";

fn conversion(idx: usize, e: sentinel_kernel::KernelError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn company_from_row(row: &Row<'_>) -> rusqlite::Result<Company> {
    let raw_cik: String = row.get(3)?;
    let cik = Cik::parse(&raw_cik).map_err(|e| conversion(3, e))?;

    let date: Option<String> = row.get(5)?;
    let form: Option<String> = row.get(6)?;
    let link: Option<String> = row.get(7)?;
    let latest = match (date, form, link) {
        (Some(date), Some(form), Some(link)) => Some(LatestFiling {
            date: parse_date(&date).map_err(|e| conversion(5, e))?,
            form,
            link,
            summary: row.get(8)?,
        }),
        _ => None,
    };

    Ok(Company {
        id: CompanyId(row.get(0)?),
        name: row.get(1)?,
        ticker: row.get(2)?,
        cik,
        assigned_to: row.get(4)?,
        latest,
    })
}

impl CompanyRegistry for SqliteLedger {
    fn company_count(&self) -> Result<u64> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM companies", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn seed_if_empty(&self, records: &[CompanyRecord]) -> Result<SeedOutcome> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: i64 = tx.query_row("SELECT COUNT(*) FROM companies", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(SeedOutcome::Skipped { existing: existing as u64 });
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO companies (company_id, company_name, company_ticker, company_cik, assigned_to)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.id.as_str(),
                    record.name,
                    record.ticker,
                    record.cik.padded(),
                    record.assigned_to,
                ])?;
            }
        }
        tx.commit()?;

        info!(companies = records.len(), "company table seeded");
        Ok(SeedOutcome::Seeded { companies: records.len() })
    }

    fn list_companies(&self) -> Result<Vec<Company>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies ORDER BY company_name, company_id"
        ))?;
        let rows = stmt.query_map([], company_from_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn get_company(&self, id: &CompanyId) -> Result<Option<Company>> {
        let conn = self.connect()?;
        let company = conn
            .query_row(
                &format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE company_id = ?1"),
                params![id.as_str()],
                company_from_row,
            )
            .optional()?;
        Ok(company)
    }
}
