// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use sentinel_kernel::config::DEFAULT_BOOTSTRAP_WINDOW_DAYS;
use sentinel_kernel::FormPolicy;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::EngineError;

pub const DEFAULT_SUBMISSIONS_BASE: &str = "https://data.sec.gov/submissions";
pub const DEFAULT_ARCHIVE_BASE: &str = "https://www.sec.gov/Archives/edgar/data";

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub db_path: PathBuf,
    pub companies_csv: PathBuf,
    /// Sent as `User-Agent`; the source rejects anonymous clients.
    pub user_agent: String,
    pub submissions_base: String,
    pub archive_base: String,
    pub request_timeout: Duration,
    pub busy_timeout: Duration,
    /// Companies fetched in parallel during a run.
    pub concurrency: usize,
    pub bootstrap_window_days: i64,
    /// Extra days re-scanned past the most recent stored filing.
    pub overlap_days: i64,
    pub start_offset_days: i64,
    pub form_policy: FormPolicy,
    pub bind_addr: SocketAddr,
    /// Scheduled runs are off when `None`.
    pub poll_interval: Option<Duration>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/sentinel.db"),
            companies_csv: PathBuf::from("data/company_list.csv"),
            user_agent: String::new(),
            submissions_base: DEFAULT_SUBMISSIONS_BASE.to_string(),
            archive_base: DEFAULT_ARCHIVE_BASE.to_string(),
            request_timeout: Duration::from_secs(10),
            busy_timeout: Duration::from_millis(5000),
            concurrency: 4,
            bootstrap_window_days: DEFAULT_BOOTSTRAP_WINDOW_DAYS,
            overlap_days: 1,
            start_offset_days: 0,
            form_policy: FormPolicy::Deny,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            poll_interval: None,
        }
    }
}

impl NodeConfig {
    /// Defaults overridden by `SENTINEL_*` environment variables.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`NodeConfig::from_env`] over an arbitrary lookup, so tests
    /// never touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Self::default();

        if let Some(v) = get("SENTINEL_DB_PATH") {
            cfg.db_path = PathBuf::from(v);
        }
        if let Some(v) = get("SENTINEL_COMPANIES_CSV") {
            cfg.companies_csv = PathBuf::from(v);
        }
        if let Some(v) = get("SENTINEL_USER_AGENT") {
            cfg.user_agent = v;
        }
        if let Some(v) = get("SENTINEL_SUBMISSIONS_BASE") {
            cfg.submissions_base = v;
        }
        if let Some(v) = get("SENTINEL_ARCHIVE_BASE") {
            cfg.archive_base = v;
        }
        if let Some(v) = get("SENTINEL_REQUEST_TIMEOUT_SECS") {
            cfg.request_timeout = Duration::from_secs(parse("SENTINEL_REQUEST_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = get("SENTINEL_BUSY_TIMEOUT_MS") {
            cfg.busy_timeout = Duration::from_millis(parse("SENTINEL_BUSY_TIMEOUT_MS", &v)?);
        }
        if let Some(v) = get("SENTINEL_CONCURRENCY") {
            cfg.concurrency = parse("SENTINEL_CONCURRENCY", &v)?;
        }
        if let Some(v) = get("SENTINEL_BOOTSTRAP_WINDOW_DAYS") {
            cfg.bootstrap_window_days = parse("SENTINEL_BOOTSTRAP_WINDOW_DAYS", &v)?;
        }
        if let Some(v) = get("SENTINEL_OVERLAP_DAYS") {
            cfg.overlap_days = parse("SENTINEL_OVERLAP_DAYS", &v)?;
        }
        if let Some(v) = get("SENTINEL_START_OFFSET_DAYS") {
            cfg.start_offset_days = parse("SENTINEL_START_OFFSET_DAYS", &v)?;
        }
        if let Some(v) = get("SENTINEL_FORM_POLICY") {
            cfg.form_policy = v
                .parse()
                .map_err(|e| EngineError::Configuration(format!("SENTINEL_FORM_POLICY: {e}")))?;
        }
        if let Some(v) = get("SENTINEL_BIND_ADDR") {
            cfg.bind_addr = parse("SENTINEL_BIND_ADDR", &v)?;
        }
        if let Some(v) = get("SENTINEL_POLL_INTERVAL_SECS") {
            cfg.poll_interval = Some(Duration::from_secs(parse("SENTINEL_POLL_INTERVAL_SECS", &v)?));
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.concurrency == 0 {
            return Err(EngineError::Configuration("concurrency must be at least 1".into()));
        }
        if self.bootstrap_window_days <= 0 {
            return Err(EngineError::Configuration("bootstrap window must be positive".into()));
        }
        if self.overlap_days < 0 || self.start_offset_days < 0 {
            return Err(EngineError::Configuration("day offsets cannot be negative".into()));
        }
        if self.poll_interval.is_some_and(|d| d.is_zero()) {
            return Err(EngineError::Configuration("poll interval must be positive".into()));
        }
        Ok(())
    }

    /// Network runs need an identifying user agent.
    pub fn require_user_agent(&self) -> Result<&str, EngineError> {
        if self.user_agent.trim().is_empty() {
            return Err(EngineError::Configuration(
                "SENTINEL_USER_AGENT must identify the caller (e.g. `Org Name admin@example.com`)".into(),
            ));
        }
        Ok(&self.user_agent)
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, EngineError>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| EngineError::Configuration(format!("{key}={value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_survive_empty_environment() {
        let cfg = NodeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.bootstrap_window_days, 365);
        assert_eq!(cfg.concurrency, 4);
        assert_eq!(cfg.form_policy, FormPolicy::Deny);
        assert!(cfg.poll_interval.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = NodeConfig::from_lookup(lookup(&[
            ("SENTINEL_CONCURRENCY", "8"),
            ("SENTINEL_FORM_POLICY", "substantive"),
            ("SENTINEL_POLL_INTERVAL_SECS", "3600"),
            ("SENTINEL_USER_AGENT", "Example Org ops@example.com"),
        ]))
        .unwrap();
        assert_eq!(cfg.concurrency, 8);
        assert_eq!(cfg.form_policy, FormPolicy::Substantive);
        assert_eq!(cfg.poll_interval, Some(Duration::from_secs(3600)));
        assert!(cfg.require_user_agent().is_ok());
    }

    #[test]
    fn bad_values_are_configuration_errors() {
        for (key, value) in [
            ("SENTINEL_CONCURRENCY", "many"),
            ("SENTINEL_CONCURRENCY", "0"),
            ("SENTINEL_FORM_POLICY", "everything"),
            ("SENTINEL_BIND_ADDR", "localhost"),
        ] {
            let err = NodeConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
            assert!(matches!(err, EngineError::Configuration(_)), "{key}={value}");
        }
    }

    #[test]
    fn blank_user_agent_is_rejected() {
        let cfg = NodeConfig::default();
        assert!(matches!(cfg.require_user_agent(), Err(EngineError::Configuration(_))));
    }
}
