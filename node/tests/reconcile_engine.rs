mod common;

use common::{candidate, day, reconciler, FakeSource};
use sentinel_kernel::CompanyId;
use sentinel_node::errors::EngineError;
use sentinel_persistence::{CompanyRegistry, EntityProjection, EventStore};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn single_company_end_to_end() {
    let dir = tempdir().unwrap();
    let today = day(2024, 6, 20);
    let yesterday = day(2024, 6, 19);
    let source = FakeSource::default().with(
        "0000000001",
        vec![
            candidate(yesterday, "10-K", "https://archive/1/a/10k.htm"),
            candidate(yesterday, "424B5", "https://archive/1/b/prospectus.htm"),
        ],
    );
    let engine = reconciler(dir.path(), source);

    let summary = engine.run_at(today, &CancellationToken::new()).await.unwrap();

    assert_eq!(summary.seeded, Some(2));
    assert_eq!(summary.window_days, 366);
    assert_eq!(summary.entities_processed, 2);
    assert_eq!(summary.entities_errored, 0);
    assert_eq!(summary.events_persisted, 1);
    assert_eq!(summary.events_filtered, 1);
    assert!(!summary.cancelled);

    let a1 = CompanyId::from("A1");
    let filings = engine.ledger().list_for_entity(&a1).unwrap();
    assert_eq!(filings.len(), 1);
    assert_eq!(filings[0].form, "10-K");
    assert_eq!(filings[0].assigned_to.as_deref(), Some("dana"));

    let company = engine.ledger().get_company(&a1).unwrap().unwrap();
    let latest = company.latest.unwrap();
    assert_eq!(latest.form, "10-K");
    assert_eq!(latest.date, yesterday);
}

#[tokio::test]
async fn second_run_finds_nothing_new() {
    let dir = tempdir().unwrap();
    let today = day(2024, 6, 20);
    let source = FakeSource::default()
        .with("1", vec![candidate(day(2024, 6, 19), "8-K", "https://archive/1/c/8k.htm")]);
    let engine = reconciler(dir.path(), source);
    let token = CancellationToken::new();

    engine.run_at(today, &token).await.unwrap();
    let again = engine.run_at(today, &token).await.unwrap();

    assert_eq!(again.seeded, None);
    // One day since the newest filing plus one day of overlap.
    assert_eq!(again.window_days, 2);
    assert_eq!(again.events_persisted, 0);
    assert_eq!(again.events_already_known, 1);
    assert_eq!(engine.ledger().list_for_entity(&CompanyId::from("A1")).unwrap().len(), 1);
}

#[tokio::test]
async fn window_tracks_newest_stored_filing() {
    let dir = tempdir().unwrap();
    let source = FakeSource::default()
        .with("2", vec![candidate(day(2024, 6, 10), "10-Q", "https://archive/2/d/10q.htm")]);
    let engine = reconciler(dir.path(), source);

    let before = engine.compute_window(day(2024, 6, 20)).await.unwrap();
    assert_eq!(before.end_offset_days, 366);

    engine.run_at(day(2024, 6, 20), &CancellationToken::new()).await.unwrap();

    let after = engine.compute_window(day(2024, 6, 20)).await.unwrap();
    assert_eq!(after.end_offset_days, 11);
    assert_eq!(after.start_offset_days, 0);
}

#[tokio::test]
async fn filing_dated_after_today_is_persisted() {
    let dir = tempdir().unwrap();
    // Friday run; an after-hours submission already carries Monday's date.
    let friday = day(2024, 6, 21);
    let source = FakeSource::default()
        .with("2", vec![candidate(day(2024, 6, 24), "8-K", "https://archive/2/k/8k.htm")]);
    let engine = reconciler(dir.path(), source);

    let summary = engine.run_at(friday, &CancellationToken::new()).await.unwrap();

    assert_eq!(summary.events_persisted, 1);
    let latest = engine.ledger().get_company(&CompanyId::from("A2")).unwrap().unwrap().latest.unwrap();
    assert_eq!(latest.date, day(2024, 6, 24));
}

#[tokio::test]
async fn failing_company_does_not_stop_the_run() {
    let dir = tempdir().unwrap();
    let source = FakeSource::default()
        .failing("1")
        .with("2", vec![candidate(day(2024, 6, 19), "10-K", "https://archive/2/e/10k.htm")]);
    let engine = reconciler(dir.path(), source);

    let summary = engine.run_at(day(2024, 6, 20), &CancellationToken::new()).await.unwrap();

    assert_eq!(summary.entities_errored, 1);
    assert_eq!(summary.entities_processed, 1);
    assert_eq!(summary.errored_ids.len(), 1);
    assert_eq!(summary.errored_ids[0].company_id, CompanyId::from("A1"));
    assert!(summary.errored_ids[0].error.contains("503"));

    assert_eq!(engine.ledger().list_for_entity(&CompanyId::from("A2")).unwrap().len(), 1);
    assert!(engine.ledger().list_for_entity(&CompanyId::from("A1")).unwrap().is_empty());
}

#[tokio::test]
async fn repeated_candidates_in_one_batch_are_stored_once() {
    let dir = tempdir().unwrap();
    let filing = candidate(day(2024, 6, 18), "8-K", "https://archive/1/f/8k.htm");
    let source = FakeSource::default().with("1", vec![filing.clone(), filing]);
    let engine = reconciler(dir.path(), source);

    let summary = engine.run_at(day(2024, 6, 20), &CancellationToken::new()).await.unwrap();

    assert_eq!(summary.events_persisted, 1);
    assert_eq!(summary.events_already_known, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_runs_store_each_filing_once() {
    let dir = tempdir().unwrap();
    let today = day(2024, 6, 20);
    let filings_a = vec![
        candidate(day(2024, 6, 17), "10-Q", "https://archive/1/g/10q.htm"),
        candidate(day(2024, 6, 19), "8-K", "https://archive/1/h/8k.htm"),
    ];
    let filings_b = vec![candidate(day(2024, 6, 18), "10-K", "https://archive/2/i/10k.htm")];

    let first = Arc::new(reconciler(
        dir.path(),
        FakeSource::default().with("1", filings_a.clone()).with("2", filings_b.clone()),
    ));
    let second = Arc::new(reconciler(
        dir.path(),
        FakeSource::default().with("1", filings_a).with("2", filings_b),
    ));

    let token = CancellationToken::new();
    let (a, b) = tokio::join!(first.run_at(today, &token), second.run_at(today, &token));
    let (a, b) = (a.unwrap(), b.unwrap());

    // The later run may compute a narrower window, so only the insert
    // total is fixed.
    assert_eq!(a.events_persisted + b.events_persisted, 3);
    assert!(a.events_already_known + b.events_already_known <= 3);

    let ledger = first.ledger();
    assert_eq!(ledger.company_count().unwrap(), 2);
    assert_eq!(ledger.list_for_entity(&CompanyId::from("A1")).unwrap().len(), 2);
    assert_eq!(ledger.list_for_entity(&CompanyId::from("A2")).unwrap().len(), 1);

    let latest = ledger.get_company(&CompanyId::from("A1")).unwrap().unwrap().latest.unwrap();
    assert_eq!(latest.date, day(2024, 6, 19));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn reassignment_during_a_run_reaches_new_filings() {
    let dir = tempdir().unwrap();
    let source = FakeSource::default()
        .with("1", vec![candidate(day(2024, 6, 19), "8-K", "https://archive/1/j/8k.htm")])
        .slow(Duration::from_millis(300));
    let engine = reconciler(dir.path(), source);
    let ledger = engine.ledger().clone();
    let a1 = CompanyId::from("A1");

    let reassign = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let id = a1.clone();
        tokio::task::spawn_blocking(move || ledger.reassign(&id, Some("morgan")))
            .await
            .unwrap()
            .unwrap()
    };
    let token = CancellationToken::new();
    let (summary, touched) = tokio::join!(engine.run_at(day(2024, 6, 20), &token), reassign);

    assert_eq!(summary.unwrap().events_persisted, 1);
    assert_eq!(touched, 0);
    let company = engine.ledger().get_company(&a1).unwrap().unwrap();
    let stored = engine.ledger().list_for_entity(&a1).unwrap();
    assert_eq!(company.assigned_to.as_deref(), Some("morgan"));
    assert_eq!(stored[0].assigned_to, company.assigned_to);
}

#[tokio::test]
async fn cancelled_run_launches_nothing() {
    let dir = tempdir().unwrap();
    let engine = reconciler(dir.path(), FakeSource::default().slow(Duration::from_millis(10)));
    let token = CancellationToken::new();
    token.cancel();

    let summary = engine.run_at(day(2024, 6, 20), &token).await.unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.entities_skipped, 2);
    assert_eq!(summary.entities_processed, 0);
    assert_eq!(engine_calls(&engine), 0);
}

fn engine_calls(
    engine: &sentinel_node::engine::Reconciler<FakeSource, sentinel_persistence::SqliteLedger>,
) -> usize {
    engine.source().calls.load(Ordering::SeqCst)
}

#[tokio::test]
async fn missing_reference_file_is_fatal() {
    let dir = tempdir().unwrap();
    let ledger = sentinel_persistence::SqliteLedger::open(dir.path().join("ledger.db")).unwrap();
    let engine = sentinel_node::engine::Reconciler::new(
        FakeSource::default(),
        ledger,
        Default::default(),
        common::settings(&dir.path().join("absent.csv")),
    );

    let err = engine.run_at(day(2024, 6, 20), &CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, EngineError::Configuration(_)));
    assert!(err.is_fatal());
}
