// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants.

/// Width of a zero-padded CIK as used by the submissions endpoint.
pub const CIK_WIDTH: usize = 10;

/// Lookback used when the ledger holds no filings at all.
pub const DEFAULT_BOOTSTRAP_WINDOW_DAYS: i64 = 365;

/// Administrative / prospectus forms excluded under every policy.
pub const DEFAULT_DENYLIST: &[&str] = &["424B2", "424B5", "FWP"];

/// Forms accepted by the `Substantive` policy.
pub const SUBSTANTIVE_FORMS: &[&str] = &[
    "10-K", "10-Q", "8-K", "10-K/A", "10-Q/A", "8-K/A", "6-K", "6-K/A", "ARS", "20-F", "20-F/A",
    "40-F", "40-F/A",
];

/// Calendar date format used by the source and by storage.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
