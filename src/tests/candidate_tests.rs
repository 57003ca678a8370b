//! Candidate selection as the engine composes it: window, then filter,
//! then in-batch fingerprint dedup.

use chrono::NaiveDate;
use rustc_hash::FxHashSet;

use crate::types::filing::{CandidateFiling, Company};
use crate::types::id::{Cik, CompanyId};
use crate::{ClassificationFilter, Window};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn candidate(date: NaiveDate, form: &str, link: &str) -> CandidateFiling {
    CandidateFiling { date, form: form.into(), link: link.into() }
}

fn company() -> Company {
    Company {
        id: CompanyId::from("A1"),
        name: "Acme".into(),
        ticker: Some("ACME".into()),
        cik: Cik::parse("0000000001").unwrap(),
        assigned_to: None,
        latest: None,
    }
}

#[test]
fn window_filter_and_batch_dedup_compose() {
    let today = day(2024, 6, 20);
    let window = Window::catch_up(today, Some(day(2024, 6, 16)), 365).widened(1);
    let filter = ClassificationFilter::default();
    let owner = company();

    let feed = vec![
        candidate(day(2024, 6, 19), "10-K", "https://x/1"),
        candidate(day(2024, 6, 19), "10-K", "https://x/1"),
        candidate(day(2024, 6, 19), "424B5", "https://x/2"),
        candidate(day(2024, 6, 16), "8-K", "https://x/3"),
        candidate(day(2024, 6, 15), "8-K", "https://x/4"),
    ];

    let mut seen = FxHashSet::default();
    let kept: Vec<_> = feed
        .into_iter()
        .filter(|c| window.contains(today, c.date))
        .filter(|c| filter.is_eligible(&c.form))
        .map(|c| c.into_new(&owner))
        .filter(|n| seen.insert(n.dedup_key().fingerprint().unwrap()))
        .collect();

    let links: Vec<&str> = kept.iter().map(|n| n.link.as_str()).collect();
    // 06-16 is inside only because of the one-day overlap.
    assert_eq!(links, vec!["https://x/1", "https://x/3"]);
}
