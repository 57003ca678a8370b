//! Event store over SQLite.
//!
//! Every operation opens its own connection. Concurrent writers (two
//! overlapping reconciliation runs, the API, the CLI) are serialized by
//! SQLite's own locking plus `busy_timeout`, never by a lock in this
//! process. Writes use IMMEDIATE transactions so the write lock is taken
//! up front instead of being upgraded mid-transaction.

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use sentinel_kernel::types::{format_date, parse_date};
use sentinel_kernel::{CompanyId, Filing, FilingId, NewFiling};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{PersistenceError, Result};
use crate::projection;
use crate::schema;
use crate::store::{EventStore, Recorded};

pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

pub(crate) const FILING_COLUMNS: &str =
    "f.id, f.date, f.company_id, f.form, f.link, f.summary, f.assigned_to";

/// Handle to a ledger file. Cheap to clone; holds no open connection.
#[derive(Debug, Clone)]
pub struct SqliteLedger {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteLedger {
    /// Open or create the ledger at `path` and make sure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT)
    }

    pub fn open_with_timeout(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let ledger = Self { path, busy_timeout };
        let conn = ledger.connect()?;
        schema::init(&conn)?;
        debug!(path = %ledger.path.display(), "ledger schema ready");
        Ok(ledger)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn connect(&self) -> Result<Connection> {
        schema::connect(&self.path, self.busy_timeout)
    }
}

/// Map a foreign-key failure on insert to `UnknownCompany`.
fn map_insert_error(err: rusqlite::Error, company_id: &CompanyId) -> PersistenceError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            PersistenceError::UnknownCompany(company_id.clone())
        }
        _ => PersistenceError::Sqlite(err),
    }
}

/// The stored `assigned_to` is read from the company row in the same
/// statement; `filing.assigned_to` is ignored so a reassignment committed
/// after the caller built the filing still wins.
pub(crate) fn insert_if_absent_in(conn: &Connection, filing: &NewFiling) -> Result<Recorded> {
    let date = format_date(filing.date);
    let changed = conn
        .execute(
            "INSERT INTO filings (date, company_id, form, link, summary, assigned_to)
             VALUES (?1, ?2, ?3, ?4, ?5,
                     (SELECT assigned_to FROM companies WHERE company_id = ?2))
             ON CONFLICT (company_id, date, form, link) DO NOTHING",
            params![date, filing.company_id.as_str(), filing.form, filing.link, filing.summary],
        )
        .map_err(|e| map_insert_error(e, &filing.company_id))?;

    let stored = conn.query_row(
        &format!(
            "SELECT {FILING_COLUMNS} FROM filings f
             WHERE f.company_id = ?1 AND f.date = ?2 AND f.form = ?3 AND f.link = ?4"
        ),
        params![filing.company_id.as_str(), date, filing.form, filing.link],
        filing_from_row,
    )?;

    Ok(Recorded { filing: stored, inserted: changed == 1 })
}

pub(crate) fn filing_from_row(row: &Row<'_>) -> rusqlite::Result<Filing> {
    let raw_date: String = row.get(1)?;
    let date = parse_date(&raw_date)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    Ok(Filing {
        id: FilingId(row.get(0)?),
        date,
        company_id: CompanyId(row.get(2)?),
        form: row.get(3)?,
        link: row.get(4)?,
        summary: row.get(5)?,
        assigned_to: row.get(6)?,
    })
}

impl EventStore for SqliteLedger {
    fn insert_if_absent(&self, filing: &NewFiling) -> Result<Recorded> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let recorded = insert_if_absent_in(&tx, filing)?;
        tx.commit()?;
        Ok(recorded)
    }

    fn record(&self, filing: &NewFiling) -> Result<Recorded> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let recorded = insert_if_absent_in(&tx, filing)?;
        if recorded.inserted {
            projection::refresh_in(&tx, &filing.company_id)?;
        }
        tx.commit()?;
        Ok(recorded)
    }

    fn list_for_entity(&self, id: &CompanyId) -> Result<Vec<Filing>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {FILING_COLUMNS} FROM filings f
             WHERE f.company_id = ?1
             ORDER BY f.date DESC, f.id DESC"
        ))?;
        let rows = stmt.query_map(params![id.as_str()], filing_from_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn most_recent_overall(&self) -> Result<Option<Filing>> {
        let conn = self.connect()?;
        let filing = conn
            .query_row(
                &format!(
                    "SELECT {FILING_COLUMNS} FROM filings f
                     ORDER BY f.date DESC, f.id DESC LIMIT 1"
                ),
                [],
                filing_from_row,
            )
            .optional()?;
        Ok(filing)
    }
}
