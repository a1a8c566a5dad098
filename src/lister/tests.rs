//! Tests for the lister module

use super::*;
use crate::error::Error;
use crate::retry::{RetryConfig, RetryPolicy, RetryableErrorClassifier};
use crate::source::{ChaosPageSource, Page, PagingResponse, Scenario, DEFAULT_RETRIABLE_MESSAGE};
use crate::types::BackoffType;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_test::assert_err;

fn instant_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy::with_messages(
        RetryConfig::builder()
            .max_retries(max_retries)
            .no_backoff()
            .build(),
        [DEFAULT_RETRIABLE_MESSAGE],
    )
}

fn small_scenario() -> Scenario {
    Scenario::bug_cache_sum().with_page_size(10)
}

/// Source recording every page index it is asked for
struct RecordingSource {
    inner: ChaosPageSource,
    requests: Mutex<Vec<i64>>,
}

impl RecordingSource {
    fn new(scenario: Scenario) -> Self {
        Self {
            inner: ChaosPageSource::new(scenario),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<i64> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for RecordingSource {
    async fn fetch_page(&self, page: i64) -> crate::error::Result<Page> {
        self.requests.lock().unwrap().push(page);
        self.inner.page(page)
    }
}

// ============================================================================
// ListStats Tests
// ============================================================================

#[test]
fn test_list_stats_default() {
    let stats = ListStats::default();
    assert_eq!(stats.pages_fetched, 0);
    assert_eq!(stats.records_emitted, 0);
    assert_eq!(stats.attempts, 0);
    assert_eq!(stats.retries, 0);
}

#[test]
fn test_list_stats_attempts() {
    let mut stats = ListStats::new();
    stats.add_attempts(1);
    stats.add_attempts(6);
    assert_eq!(stats.attempts, 7);
    assert_eq!(stats.retries, 5);
}

// ============================================================================
// Sink Tests
// ============================================================================

#[test]
fn test_counting_sink() {
    let mut sink = CountingSink::new();
    sink.emit(Item::synthesize(0, 0)).unwrap();
    sink.emit(Item::synthesize(1, 0)).unwrap();
    assert_eq!(sink.records, 2);
    assert!((sink.amount_sum - 20.0).abs() < f64::EPSILON);
}

#[test]
fn test_json_lines_sink() {
    let mut sink = JsonLinesSink::new(Vec::new());
    sink.emit(Item::synthesize(0, 1)).unwrap();
    sink.emit(Item::synthesize(2, 0)).unwrap();

    let written = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], r#"{"id":"0_1","amount":5.0,"page":0}"#);
    assert_eq!(lines[1], r#"{"id":"2_0","amount":25.0,"page":2}"#);
}

/// Writer that accepts bytes but cannot flush them
struct UnflushableWriter;

impl std::io::Write for UnflushableWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed"))
    }
}

#[test]
fn test_json_lines_finish_returns_run_outcome() {
    let mut sink = JsonLinesSink::new(Vec::new());
    sink.emit(Item::synthesize(0, 0)).unwrap();
    assert_eq!(sink.finish(Ok(7)).unwrap(), 7);
}

#[test]
fn test_json_lines_finish_reports_flush_failure() {
    let sink = JsonLinesSink::new(UnflushableWriter);
    let err = sink.finish(Ok(())).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_json_lines_finish_keeps_run_error_over_flush_failure() {
    let sink = JsonLinesSink::new(UnflushableWriter);
    let err = sink
        .finish::<()>(Err(Error::retriable(DEFAULT_RETRIABLE_MESSAGE)))
        .unwrap_err();
    assert!(matches!(err, Error::Retriable { .. }));
    assert_eq!(err.to_string(), DEFAULT_RETRIABLE_MESSAGE);
}

#[test]
fn test_channel_sink_closed_receiver() {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let mut sink = ChannelSink::new(tx);
    drop(rx);
    let err = sink.emit(Item::synthesize(0, 0)).unwrap_err();
    assert!(matches!(err, Error::Sink { .. }));
}

// ============================================================================
// Lister Tests
// ============================================================================

#[tokio::test]
async fn test_list_complete_run() {
    let mut lister =
        PaginatingLister::new(ChaosPageSource::new(small_scenario())).with_retry(instant_policy(5));

    let items = lister.list_all().await.unwrap();

    assert_eq!(items.len(), 40);
    assert_eq!(items[0].id, "0_0");
    assert_eq!(items[39].id, "3_9");

    let stats = lister.stats();
    assert_eq!(stats.pages_fetched, 4);
    assert_eq!(stats.records_emitted, 40);
    assert_eq!(stats.attempts, 9);
    assert_eq!(stats.retries, 5);
}

#[tokio::test]
async fn test_list_emits_in_page_order() {
    let mut lister =
        PaginatingLister::new(ChaosPageSource::new(small_scenario())).with_retry(instant_policy(5));

    let items = lister.list_all().await.unwrap();
    let pages: Vec<i64> = items.iter().map(Item::page).collect();
    let mut sorted = pages.clone();
    sorted.sort_unstable();
    assert_eq!(pages, sorted);

    for chunk in items.chunks(10) {
        for (index, item) in chunk.iter().enumerate() {
            assert_eq!(item.id, format!("{}_{index}", item.page));
        }
    }
}

#[tokio::test]
async fn test_list_returns_retriable_after_budget() {
    let source = RecordingSource::new(small_scenario());
    let mut lister = PaginatingLister::new(source).with_retry(instant_policy(3));
    let mut sink = CountingSink::new();

    let err = assert_err!(lister.list(&mut sink).await);

    assert!(matches!(err, Error::Retriable { ref message } if message == DEFAULT_RETRIABLE_MESSAGE));
    assert_eq!(sink.records, 30);
    assert_eq!(lister.source().requests(), vec![0, 1, 2, 3, 3, 3, 3]);
    assert_eq!(lister.stats().records_emitted, 30);
    assert_eq!(lister.stats().pages_fetched, 3);
}

#[tokio::test]
async fn test_list_invalid_page_is_fatal() {
    // Source claims a next page that is past the range
    struct Overrunning;

    #[async_trait]
    impl PageSource for Overrunning {
        async fn fetch_page(&self, page: i64) -> crate::error::Result<Page> {
            if page >= 2 {
                return Err(Error::invalid_page(page));
            }
            Ok(Page {
                items: vec![Item::synthesize(page, 0)],
                response: PagingResponse::next(page + 1),
            })
        }
    }

    let policy = RetryPolicy::new(
        RetryConfig::builder().max_retries(5).no_backoff().build(),
        RetryableErrorClassifier,
    );
    let mut lister = PaginatingLister::new(Overrunning).with_retry(policy);
    let mut items = Vec::new();

    let err = assert_err!(lister.list(&mut items).await);
    assert!(matches!(err, Error::InvalidPage { page: 2 }));
    assert_eq!(items.len(), 2);
    assert_eq!(lister.stats().attempts, 3);
}

#[tokio::test]
async fn test_list_without_failures() {
    let scenario = small_scenario().with_failures(3, 0);
    let mut lister = PaginatingLister::new(ChaosPageSource::new(scenario))
        .with_retry(RetryPolicy::no_retry());

    let stats = lister.list(&mut CountingSink::new()).await.unwrap();
    assert_eq!(stats.records_emitted, 40);
    assert_eq!(stats.retries, 0);
}

#[tokio::test]
async fn test_list_single_page() {
    let scenario = small_scenario().with_max_pages(1).with_failures(-1, 0);
    let mut lister = PaginatingLister::new(ChaosPageSource::new(scenario));

    let items = lister.list_all().await.unwrap();
    assert_eq!(items.len(), 10);
    assert_eq!(lister.stats().pages_fetched, 1);
}

#[tokio::test]
async fn test_list_stops_on_sink_error() {
    let source = RecordingSource::new(small_scenario());
    let mut lister = PaginatingLister::new(source).with_retry(instant_policy(5));

    let mut seen = 0;
    let mut sink = FnSink::new(|_item: Item| {
        seen += 1;
        if seen == 15 {
            return Err(Error::sink("full"));
        }
        Ok(())
    });

    let err = assert_err!(lister.list(&mut sink).await);
    assert!(matches!(err, Error::Sink { .. }));
    assert_eq!(lister.source().requests(), vec![0, 1]);
    assert_eq!(lister.stats().records_emitted, 14);
}

#[tokio::test]
async fn test_list_surfaces_caller_error_from_sink() {
    let mut lister =
        PaginatingLister::new(ChaosPageSource::new(small_scenario())).with_retry(instant_policy(5));

    let mut sink = FnSink::new(|item: Item| {
        if item.page == 2 {
            return Err(anyhow::anyhow!("disk full on page {}", item.page).into());
        }
        Ok(())
    });

    let err = assert_err!(lister.list(&mut sink).await);
    assert!(matches!(err, Error::Anyhow(_)));
    assert_eq!(err.to_string(), "disk full on page 2");
    assert!(!err.is_retryable());
    assert_eq!(lister.stats().records_emitted, 20);
}

#[tokio::test]
async fn test_list_into_channel() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut lister =
        PaginatingLister::new(ChaosPageSource::new(small_scenario())).with_retry(instant_policy(5));

    lister.list(&mut ChannelSink::new(tx)).await.unwrap();

    let mut received = 0;
    while let Ok(item) = rx.try_recv() {
        assert_eq!(item.page, (received / 10) as i64);
        received += 1;
    }
    assert_eq!(received, 40);
}

#[tokio::test]
async fn test_list_resets_stats_between_runs() {
    let mut lister =
        PaginatingLister::new(ChaosPageSource::new(small_scenario())).with_retry(instant_policy(5));

    lister.list_all().await.unwrap();
    // Failure budget is spent, so the second run sees no retries
    let second = lister.list(&mut CountingSink::new()).await.unwrap();
    assert_eq!(second.records_emitted, 40);
    assert_eq!(second.attempts, 4);
    assert_eq!(second.retries, 0);
}

// ============================================================================
// Cancellation Tests
// ============================================================================

#[tokio::test]
async fn test_list_cancelled_before_start() {
    let cancel = CancelToken::new();
    cancel.cancel();

    let source = RecordingSource::new(small_scenario());
    let mut lister = PaginatingLister::new(source).with_cancel(cancel);

    let err = assert_err!(lister.list_all().await);
    assert!(err.is_cancelled());
    assert!(lister.source().requests().is_empty());
}

#[tokio::test]
async fn test_list_cancelled_between_pages() {
    let cancel = CancelToken::new();
    let source = RecordingSource::new(small_scenario());
    let mut lister = PaginatingLister::new(source)
        .with_retry(instant_policy(5))
        .with_cancel(cancel.clone());

    let mut seen = 0;
    let mut sink = FnSink::new(|_item: Item| {
        seen += 1;
        if seen == 10 {
            cancel.cancel();
        }
        Ok(())
    });

    let err = assert_err!(lister.list(&mut sink).await);
    assert!(err.is_cancelled());
    assert_eq!(lister.source().requests(), vec![0]);
    assert_eq!(lister.stats().records_emitted, 10);
}

#[tokio::test]
async fn test_list_cancelled_during_retry_wait() {
    let cancel = CancelToken::new();
    let policy = RetryPolicy::with_messages(
        RetryConfig::builder()
            .max_retries(5)
            .backoff(
                BackoffType::Constant,
                Duration::from_secs(60),
                Duration::from_secs(60),
            )
            .build(),
        [DEFAULT_RETRIABLE_MESSAGE],
    );
    let source = Arc::new(RecordingSource::new(small_scenario()));
    let mut lister = PaginatingLister::new(Arc::clone(&source))
        .with_retry(policy)
        .with_cancel(cancel.clone());

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    });

    let mut sink = CountingSink::new();
    let err = tokio::time::timeout(Duration::from_secs(10), lister.list(&mut sink))
        .await
        .expect("cancellation should end the backoff sleep")
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(sink.records, 30);
    assert_eq!(source.requests(), vec![0, 1, 2, 3]);
}
