use crate::config::NodeConfig;
use crate::errors::EngineError;
use crate::network::submissions::Submissions;
use crate::network::FilingSource;
use chrono::NaiveDate;
use reqwest::Client;
use sentinel_kernel::{CandidateFiling, Cik, Window};

/// HTTP adapter for the submissions endpoint. Built once and shared; the
/// inner `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct SubmissionsClient {
    submissions_base: String,
    archive_base: String,
    client: Client,
}

impl SubmissionsClient {
    pub fn new(cfg: &NodeConfig) -> Result<Self, EngineError> {
        let user_agent = cfg.require_user_agent()?;
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(cfg.request_timeout)
            .build()
            .map_err(|e| EngineError::Configuration(format!("http client: {e}")))?;

        Ok(Self {
            submissions_base: cfg.submissions_base.trim_end_matches('/').to_string(),
            archive_base: cfg.archive_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn submissions_url(&self, cik: &Cik) -> String {
        format!("{}/CIK{}.json", self.submissions_base, cik.padded())
    }

    async fn get_submissions(&self, cik: &Cik) -> Result<Submissions, EngineError> {
        let url = self.submissions_url(cik);
        let resp = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!(cik = %cik, "submissions request failed: {e}");
            EngineError::Transport(format!("{url}: {e}"))
        })?;

        if !resp.status().is_success() {
            tracing::warn!(cik = %cik, status = %resp.status(), "submissions request rejected");
            return Err(EngineError::Transport(format!("{url}: HTTP {}", resp.status())));
        }

        resp.json().await.map_err(|e| {
            tracing::warn!(cik = %cik, "submissions body unreadable: {e}");
            EngineError::Transport(format!("{url}: {e}"))
        })
    }
}

impl FilingSource for SubmissionsClient {
    async fn fetch(
        &self,
        cik: &Cik,
        window: Window,
        today: NaiveDate,
    ) -> Result<Vec<CandidateFiling>, EngineError> {
        let submissions = self.get_submissions(cik).await?;
        let candidates: Vec<CandidateFiling> = submissions
            .filings
            .recent
            .candidates(cik, &self.archive_base, window, today)
            .collect();
        tracing::debug!(cik = %cik, count = candidates.len(), "candidates in window");
        Ok(candidates)
    }
}
