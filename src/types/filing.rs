// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Company and filing records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dedup::DedupKey;
use crate::types::id::{Cik, CompanyId, FilingId};

/// Cached "most recent filing" fields carried on a company row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestFiling {
    pub date: NaiveDate,
    pub form: String,
    pub link: String,
    pub summary: Option<String>,
}

/// A tracked organization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub ticker: Option<String>,
    pub cik: Cik,
    pub assigned_to: Option<String>,
    pub latest: Option<LatestFiling>,
}

/// One persisted filing. Immutable apart from `assigned_to`, which
/// mirrors the owning company's assignee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filing {
    pub id: FilingId,
    pub date: NaiveDate,
    pub company_id: CompanyId,
    pub form: String,
    pub link: String,
    pub summary: Option<String>,
    pub assigned_to: Option<String>,
}

/// What the source reports before anything is persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFiling {
    pub date: NaiveDate,
    pub form: String,
    pub link: String,
}

impl CandidateFiling {
    /// Bind a candidate to its company. The assignee copied here is only
    /// the snapshot's; the store re-reads it when the row is written.
    pub fn into_new(self, company: &Company) -> NewFiling {
        NewFiling {
            company_id: company.id.clone(),
            date: self.date,
            form: self.form,
            link: self.link,
            summary: None,
            assigned_to: company.assigned_to.clone(),
        }
    }
}

/// Insert request for the event store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewFiling {
    pub company_id: CompanyId,
    pub date: NaiveDate,
    pub form: String,
    pub link: String,
    pub summary: Option<String>,
    pub assigned_to: Option<String>,
}

impl NewFiling {
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(&self.company_id, self.date, &self.form, &self.link)
    }
}
