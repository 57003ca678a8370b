//! Table layout and per-connection setup.
//!
//! ```text
//! companies(company_id PK, ..., most_recent_*)   <- projection columns
//! filings(id AUTOINCREMENT, company_id FK, date, form, link, ...)
//!         UNIQUE(company_id, date, form, link)   <- dedup key
//! ```
//!
//! Dates are stored as `YYYY-MM-DD` text so lexical order is date order.

use rusqlite::Connection;
use std::time::Duration;

use crate::error::Result;

pub const SCHEMA: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;

CREATE TABLE IF NOT EXISTS companies (
    company_id          TEXT PRIMARY KEY,
    company_name        TEXT NOT NULL,
    company_ticker      TEXT,
    company_cik         TEXT NOT NULL,
    assigned_to         TEXT,
    most_recent_date    TEXT,
    most_recent_form    TEXT,
    most_recent_link    TEXT,
    most_recent_summary TEXT
);

CREATE TABLE IF NOT EXISTS filings (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    date        TEXT NOT NULL,
    company_id  TEXT NOT NULL REFERENCES companies (company_id),
    form        TEXT NOT NULL,
    link        TEXT NOT NULL,
    summary     TEXT,
    assigned_to TEXT,
    UNIQUE (company_id, date, form, link)
);

CREATE INDEX IF NOT EXISTS idx_filings_company_date
    ON filings (company_id, date DESC, id DESC);
CREATE INDEX IF NOT EXISTS idx_filings_date
    ON filings (date DESC, id DESC);
"#;

/// Open a connection with the settings every unit of work relies on.
/// `foreign_keys` is per-connection in SQLite, so it is set here and not
/// in [`SCHEMA`].
pub fn connect(path: &std::path::Path, busy_timeout: Duration) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(busy_timeout)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

pub fn init(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}
