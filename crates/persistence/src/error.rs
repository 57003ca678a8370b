use sentinel_kernel::{CompanyId, KernelError};
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Reference file is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Malformed reference row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },
    #[error("Unknown company {0}")]
    UnknownCompany(CompanyId),
    #[error("Unknown filter column {0:?}")]
    UnknownFilterColumn(String),
    #[error("Invalid stored value: {0}")]
    Kernel(#[from] KernelError),
}

impl PersistenceError {
    /// Errors caused by the reference dataset rather than by storage.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PersistenceError::MissingColumns(_)
                | PersistenceError::MalformedRow { .. }
                | PersistenceError::Csv(_)
                | PersistenceError::IoError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
