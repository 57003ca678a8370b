//! Submissions JSON as returned by `CIK##########.json`.
//!
//! Only `filings.recent` is read. Its fields are parallel arrays; rows are
//! zipped to the shortest array and anything missing counts as empty.

use chrono::NaiveDate;
use sentinel_kernel::types::parse_date;
use sentinel_kernel::{CandidateFiling, Cik, Window};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Submissions {
    #[serde(default)]
    pub filings: FilingsSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct FilingsSection {
    #[serde(default)]
    pub recent: RecentFilings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFilings {
    #[serde(default)]
    pub filing_date: Vec<String>,
    #[serde(default)]
    pub accession_number: Vec<String>,
    #[serde(default)]
    pub form: Vec<String>,
    #[serde(default)]
    pub primary_document: Vec<String>,
}

impl RecentFilings {
    /// Lazily yields rows inside `window`, in source order.
    pub fn candidates<'a>(
        &'a self,
        cik: &'a Cik,
        archive_base: &'a str,
        window: Window,
        today: NaiveDate,
    ) -> impl Iterator<Item = CandidateFiling> + 'a {
        self.filing_date
            .iter()
            .zip(&self.accession_number)
            .zip(&self.form)
            .zip(&self.primary_document)
            .filter_map(move |(((date, accession), form), document)| {
                let date = match parse_date(date) {
                    Ok(d) => d,
                    Err(e) => {
                        tracing::debug!(cik = %cik, "skipping row: {e}");
                        return None;
                    }
                };
                if !window.contains(today, date) {
                    return None;
                }
                Some(CandidateFiling {
                    date,
                    form: form.trim().to_string(),
                    link: document_link(archive_base, cik, accession, document),
                })
            })
    }
}

/// `{archive_base}/{cik}/{accession without dashes}/{primary document}`.
pub fn document_link(archive_base: &str, cik: &Cik, accession: &str, document: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        archive_base.trim_end_matches('/'),
        cik.unpadded(),
        accession.replace('-', ""),
        document.trim()
    )
}
