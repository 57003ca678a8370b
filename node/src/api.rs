// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use sentinel_kernel::{Company, CompanyId, Filing};
use sentinel_persistence::FilingFilter;
use serde::{Deserialize, Serialize};

/// Query string of `GET /v1/filings`. Blank values mean "any".
#[derive(Debug, Default, Deserialize)]
pub struct FilingsQuery {
    pub company_name: Option<String>,
    pub assigned_to: Option<String>,
    pub form: Option<String>,
}

impl From<FilingsQuery> for FilingFilter {
    fn from(q: FilingsQuery) -> Self {
        FilingFilter {
            company_name: q.company_name,
            assigned_to: q.assigned_to,
            form: q.form,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AssigneeRequest {
    /// `null` clears the assignee.
    pub assigned_to: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssigneeResponse {
    pub company_id: CompanyId,
    pub assigned_to: Option<String>,
    pub filings_updated: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyFilingsResponse {
    pub company: Company,
    pub filings: Vec<Filing>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub companies: u64,
}
