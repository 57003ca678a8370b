//! Latest-filing projection on the companies table.
//!
//! The cached columns always mirror the filing with the greatest date for
//! the company, ties going to the highest surrogate id.

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use sentinel_kernel::types::{format_date, parse_date};
use sentinel_kernel::{CompanyId, LatestFiling};
use tracing::{debug, info};

use crate::error::{PersistenceError, Result};
use crate::ledger::SqliteLedger;
use crate::store::EntityProjection;

pub(crate) fn latest_in(conn: &Connection, id: &CompanyId) -> Result<Option<LatestFiling>> {
    let latest = conn
        .query_row(
            "SELECT date, form, link, summary FROM filings
             WHERE company_id = ?1
             ORDER BY date DESC, id DESC
             LIMIT 1",
            params![id.as_str()],
            |row| {
                let raw: String = row.get(0)?;
                let date = parse_date(&raw).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
                })?;
                Ok(LatestFiling {
                    date,
                    form: row.get(1)?,
                    link: row.get(2)?,
                    summary: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(latest)
}

pub(crate) fn refresh_in(conn: &Connection, id: &CompanyId) -> Result<Option<LatestFiling>> {
    let latest = latest_in(conn, id)?;
    let updated = conn.execute(
        "UPDATE companies SET
             most_recent_date = ?2,
             most_recent_form = ?3,
             most_recent_link = ?4,
             most_recent_summary = ?5
         WHERE company_id = ?1",
        params![
            id.as_str(),
            latest.as_ref().map(|l| format_date(l.date)),
            latest.as_ref().map(|l| l.form.as_str()),
            latest.as_ref().map(|l| l.link.as_str()),
            latest.as_ref().and_then(|l| l.summary.as_deref()),
        ],
    )?;
    if updated == 0 {
        return Err(PersistenceError::UnknownCompany(id.clone()));
    }
    debug!(company_id = %id, date = ?latest.as_ref().map(|l| l.date), "projection refreshed");
    Ok(latest)
}

fn backfill_in(conn: &Connection, id: &CompanyId, assignee: Option<&str>) -> Result<usize> {
    let touched = conn.execute(
        "UPDATE filings SET assigned_to = ?2 WHERE company_id = ?1",
        params![id.as_str(), assignee],
    )?;
    Ok(touched)
}

impl SqliteLedger {
    /// Cached projection as currently stored (no recomputation).
    pub fn get_latest(&self, id: &CompanyId) -> Result<Option<LatestFiling>> {
        let conn = self.connect()?;
        let row = conn
            .query_row(
                "SELECT most_recent_date, most_recent_form, most_recent_link, most_recent_summary
                 FROM companies WHERE company_id = ?1",
                params![id.as_str()],
                |row| {
                    Ok((
                        row.get::<_, Option<String>>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                },
            )
            .optional()?;

        match row {
            None => Err(PersistenceError::UnknownCompany(id.clone())),
            Some((Some(date), Some(form), Some(link), summary)) => Ok(Some(LatestFiling {
                date: parse_date(&date)?,
                form,
                link,
                summary,
            })),
            Some(_) => Ok(None),
        }
    }
}

impl EntityProjection for SqliteLedger {
    fn refresh(&self, id: &CompanyId) -> Result<Option<LatestFiling>> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let latest = refresh_in(&tx, id)?;
        tx.commit()?;
        Ok(latest)
    }

    fn assignee_changed(&self, id: &CompanyId, assignee: Option<&str>) -> Result<usize> {
        let conn = self.connect()?;
        let touched = backfill_in(&conn, id, assignee)?;
        info!(company_id = %id, touched, "assignee back-filled");
        Ok(touched)
    }

    /// Company row and back-fill commit together, so no insert can land
    /// between them with the old assignee.
    fn reassign(&self, id: &CompanyId, assignee: Option<&str>) -> Result<usize> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let updated = tx.execute(
            "UPDATE companies SET assigned_to = ?2 WHERE company_id = ?1",
            params![id.as_str(), assignee],
        )?;
        if updated == 0 {
            return Err(PersistenceError::UnknownCompany(id.clone()));
        }
        let touched = backfill_in(&tx, id, assignee)?;
        tx.commit()?;
        info!(company_id = %id, touched, "assignee back-filled");
        Ok(touched)
    }
}
