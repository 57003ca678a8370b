// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Natural dedup key for filings.
//!
//! A filing is identified by `(company_id, date, form, link)`. Storage
//! enforces the key with a UNIQUE constraint; the fingerprint is the same
//! key hashed so in-memory sets and log lines stay small.

use core::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{KernelError, KernelResult};
use crate::types::id::CompanyId;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub company_id: CompanyId,
    pub date: NaiveDate,
    pub form: String,
    pub link: String,
}

/// Canonical encoding input. The date goes in as a day number so the
/// bytes never depend on a string format.
#[derive(Serialize)]
struct KeyRepr<'a> {
    company_id: &'a str,
    day: i32,
    form: &'a str,
    link: &'a str,
}

impl DedupKey {
    pub fn new(company_id: &CompanyId, date: NaiveDate, form: &str, link: &str) -> Self {
        Self {
            company_id: company_id.clone(),
            date,
            form: form.to_string(),
            link: link.to_string(),
        }
    }

    pub fn fingerprint(&self) -> KernelResult<Fingerprint> {
        let repr = KeyRepr {
            company_id: self.company_id.as_str(),
            day: self.date.num_days_from_ce(),
            form: &self.form,
            link: &self.link,
        };
        let bytes = bincode::serde::encode_to_vec(&repr, bincode::config::standard())
            .map_err(|e| KernelError::Encoding(e.to_string()))?;
        Ok(Fingerprint(blake3::hash(&bytes)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(blake3::Hash);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 12 hex chars is plenty for log correlation.
        let hex = self.0.to_hex();
        f.write_str(&hex.as_str()[..12])
    }
}
