// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Classification filter.
//!
//! Decides whether a form type may be persisted. Runs before the store is
//! touched so rejected forms never occupy dedup-key space or surrogate ids.

use core::str::FromStr;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_DENYLIST, SUBSTANTIVE_FORMS};
use crate::error::KernelError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormPolicy {
    /// Everything except the denylist.
    #[default]
    Deny,
    /// Only the substantive periodic/current report forms.
    Substantive,
}

impl FromStr for FormPolicy {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deny" => Ok(FormPolicy::Deny),
            "substantive" => Ok(FormPolicy::Substantive),
            _ => Err(KernelError::UnknownPolicy(s.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClassificationFilter {
    deny: FxHashSet<String>,
    allow: Option<FxHashSet<String>>,
}

impl ClassificationFilter {
    pub fn new(policy: FormPolicy) -> Self {
        let filter = Self::with_denylist(DEFAULT_DENYLIST.iter().copied());
        match policy {
            FormPolicy::Deny => filter,
            FormPolicy::Substantive => filter.restrict_to(SUBSTANTIVE_FORMS.iter().copied()),
        }
    }

    /// Filter with an explicit denylist and no allowlist.
    pub fn with_denylist<I, S>(forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            deny: forms.into_iter().map(|f| f.as_ref().trim().to_string()).collect(),
            allow: None,
        }
    }

    /// Additionally require membership in `forms`.
    pub fn restrict_to<I, S>(mut self, forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allow = Some(forms.into_iter().map(|f| f.as_ref().trim().to_string()).collect());
        self
    }

    pub fn is_eligible(&self, form: &str) -> bool {
        let form = form.trim();
        if form.is_empty() || self.deny.contains(form) {
            return false;
        }
        match &self.allow {
            Some(allow) => allow.contains(form),
            None => true,
        }
    }
}

impl Default for ClassificationFilter {
    fn default() -> Self {
        Self::new(FormPolicy::Deny)
    }
}
