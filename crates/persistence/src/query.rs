//! Read side for the presentation layer: filtered filing lists and the
//! distinct values that populate its selectors.

use rusqlite::params_from_iter;
use sentinel_kernel::Filing;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{PersistenceError, Result};
use crate::ledger::{filing_from_row, SqliteLedger, FILING_COLUMNS};

/// Exact-match filters; `None` (or an empty string) means "any".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingFilter {
    pub company_name: Option<String>,
    pub assigned_to: Option<String>,
    pub form: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingView {
    #[serde(flatten)]
    pub filing: Filing,
    pub company_name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterColumn {
    CompanyName,
    AssignedTo,
    Form,
}

impl FilterColumn {
    pub const ALL: [FilterColumn; 3] =
        [FilterColumn::CompanyName, FilterColumn::AssignedTo, FilterColumn::Form];

    fn sql(self) -> &'static str {
        match self {
            FilterColumn::CompanyName => "c.company_name",
            FilterColumn::AssignedTo => "f.assigned_to",
            FilterColumn::Form => "f.form",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FilterColumn::CompanyName => "company_name",
            FilterColumn::AssignedTo => "assigned_to",
            FilterColumn::Form => "form",
        }
    }
}

impl FromStr for FilterColumn {
    type Err = PersistenceError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        FilterColumn::ALL
            .into_iter()
            .find(|c| c.name() == s.trim())
            .ok_or_else(|| PersistenceError::UnknownFilterColumn(s.to_string()))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub company_names: Vec<String>,
    pub assignees: Vec<String>,
    pub forms: Vec<String>,
}

impl SqliteLedger {
    pub fn list_filings(&self, filter: &FilingFilter) -> Result<Vec<FilingView>> {
        let mut clauses = Vec::new();
        let mut values: Vec<&str> = Vec::new();
        let wanted = [
            (FilterColumn::CompanyName, filter.company_name.as_deref()),
            (FilterColumn::AssignedTo, filter.assigned_to.as_deref()),
            (FilterColumn::Form, filter.form.as_deref()),
        ];
        for (column, value) in wanted {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                values.push(value);
                clauses.push(format!("{} = ?{}", column.sql(), values.len()));
            }
        }
        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {FILING_COLUMNS}, c.company_name
             FROM filings f JOIN companies c ON c.company_id = f.company_id
             {where_sql}
             ORDER BY f.date DESC, f.id DESC"
        ))?;
        let rows = stmt.query_map(params_from_iter(values), |row| {
            Ok(FilingView { filing: filing_from_row(row)?, company_name: row.get(7)? })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Distinct non-null values of `column` across stored filings, ascending.
    pub fn distinct_values(&self, column: FilterColumn) -> Result<Vec<String>> {
        let conn = self.connect()?;
        let col = column.sql();
        let mut stmt = conn.prepare(&format!(
            "SELECT DISTINCT {col}
             FROM filings f JOIN companies c ON c.company_id = f.company_id
             WHERE {col} IS NOT NULL
             ORDER BY {col}"
        ))?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    pub fn filter_options(&self) -> Result<FilterOptions> {
        Ok(FilterOptions {
            company_names: self.distinct_values(FilterColumn::CompanyName)?,
            assignees: self.distinct_values(FilterColumn::AssignedTo)?,
            forms: self.distinct_values(FilterColumn::Form)?,
        })
    }
}
