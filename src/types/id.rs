//! Identity types.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::config::CIK_WIDTH;
use crate::error::{KernelError, KernelResult};

/// Stable company identifier from the reference list. Never rewritten.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub String);

impl CompanyId {
    pub fn new(id: impl Into<String>) -> Self {
        CompanyId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CompanyId {
    fn from(s: &str) -> Self {
        CompanyId(s.to_string())
    }
}

/// Surrogate filing id, assigned by storage in insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct FilingId(pub i64);

impl fmt::Display for FilingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Central Index Key, always held zero-padded to ten digits.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cik(String);

impl Cik {
    /// Accepts `320193`, `0000320193` or ` 320193 `. Anything that is not
    /// 1..=10 digits after trimming is rejected.
    pub fn parse(raw: &str) -> KernelResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.len() > CIK_WIDTH
            || !trimmed.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(KernelError::InvalidCik(raw.to_string()));
        }
        Ok(Cik(format!("{:0>width$}", trimmed, width = CIK_WIDTH)))
    }

    /// Ten-digit form used in `CIK##########.json`.
    pub fn padded(&self) -> &str {
        &self.0
    }

    /// Numeric form used in archive paths.
    pub fn unpadded(&self) -> &str {
        let stripped = self.0.trim_start_matches('0');
        if stripped.is_empty() {
            "0"
        } else {
            stripped
        }
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Cik {
    type Error = KernelError;

    fn try_from(value: String) -> KernelResult<Self> {
        Cik::parse(&value)
    }
}

impl From<Cik> for String {
    fn from(cik: Cik) -> Self {
        cik.0
    }
}
