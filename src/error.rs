//! Error types.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// Lookup code is not 1..=10 ASCII digits.
    #[error("invalid CIK {0:?}")]
    InvalidCik(String),
    /// Date string not in `YYYY-MM-DD` form.
    #[error("invalid date {0:?}")]
    InvalidDate(String),
    /// Unknown form policy name.
    #[error("unknown form policy {0:?} (expected `deny` or `substantive`)")]
    UnknownPolicy(String),
    #[error("encoding error: {0}")]
    Encoding(String),
}

pub type KernelResult<T> = core::result::Result<T, KernelError>;
