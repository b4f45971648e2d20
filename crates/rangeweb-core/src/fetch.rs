//! Transaction fetching: skip rules, window filtering, wire conversion

use crate::error::CoreResult;
use crate::models::{DateRange, TransactionRecord};
use rangeweb_client::{Event, TransactionSource};
use std::sync::Arc;

/// Shared handle to the remote source
pub type SourceRef = Arc<dyn TransactionSource>;

/// Outcome of a fetch attempt
#[derive(Debug)]
pub enum FetchOutcome {
    /// No call was made; existing state must be left untouched
    Skipped,
    /// Records filtered to the requested window and timezone
    Fetched(Vec<TransactionRecord>),
}

/// Fetches events for a range and remembers the last range it fetched for,
/// so identical consecutive requests skip the network entirely.
pub struct TransactionFetcher {
    source: SourceRef,
    last_range: Option<DateRange>,
}

impl TransactionFetcher {
    /// Create a fetcher over the given source
    pub fn new(source: SourceRef) -> Self {
        Self { source, last_range: None }
    }

    /// Forget the last fetched range, forcing the next fetch through
    pub fn reset(&mut self) {
        self.last_range = None;
    }

    /// Fetch and filter records for a range
    ///
    /// Skips when the range is incomplete or identical to the most
    /// recently fetched one. The memo is only advanced on success, so a
    /// failed attempt is retried on the next call.
    pub async fn fetch(&mut self, range: &DateRange) -> CoreResult<FetchOutcome> {
        if !range.is_complete() {
            log::debug!("Missing date parameters, skipping fetch");
            return Ok(FetchOutcome::Skipped);
        }
        if self.last_range.as_ref() == Some(range) {
            log::debug!("Parameters unchanged, skipping fetch");
            return Ok(FetchOutcome::Skipped);
        }

        let events = self.source.fetch_events().await?;
        let total = events.len();
        let records = filter_events(events, range);
        log::debug!(
            "Retained {} of {} event(s) for {} to {} in {}",
            records.len(),
            total,
            range.start_date,
            range.end_date,
            range.time_zone
        );

        self.last_range = Some(range.clone());
        Ok(FetchOutcome::Fetched(records))
    }
}

/// Retain events whose calendar date lies in the inclusive window and whose
/// timezone exactly matches the requested zone id. Events with unparseable
/// dates are excluded.
pub fn filter_events(events: Vec<Event>, range: &DateRange) -> Vec<TransactionRecord> {
    let (Some(start), Some(end)) = (range.start_date_naive(), range.end_date_naive()) else {
        return Vec::new();
    };

    events
        .into_iter()
        .filter_map(|event| {
            let record = TransactionRecord::from(event);
            let date = record.date_naive()?;
            let in_window = date >= start && date <= end;
            let zone_match = record.timezone == range.time_zone;
            (in_window && zone_match).then_some(record)
        })
        .collect()
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ErrorCode};
    use async_trait::async_trait;
    use rangeweb_client::ClientError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn event(id: u64, date: &str, timezone: &str) -> Event {
        Event {
            id,
            name: format!("Event {}", id),
            date: date.to_string(),
            amount: id as f64 * 10.0,
            status: "completed".to_string(),
            timezone: timezone.to_string(),
            extra: serde_json::Map::new(),
        }
    }

    fn moscow_range() -> DateRange {
        DateRange {
            start_date: "2025-04-01 00:00:00 +03:00".to_string(),
            end_date: "2025-04-08 23:59:59 +03:00".to_string(),
            time_zone: "Europe/Moscow".to_string(),
        }
    }

    struct CountingSource {
        calls: AtomicUsize,
        events: Vec<Event>,
        fail: bool,
    }

    impl CountingSource {
        fn new(events: Vec<Event>) -> Self {
            Self { calls: AtomicUsize::new(0), events, fail: false }
        }

        fn failing() -> Self {
            Self { calls: AtomicUsize::new(0), events: Vec::new(), fail: true }
        }
    }

    #[async_trait]
    impl TransactionSource for CountingSource {
        async fn fetch_events(&self) -> Result<Vec<Event>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ClientError::HttpStatus { status: 500 });
            }
            Ok(self.events.clone())
        }
    }

    #[test]
    fn test_filter_retains_window_and_zone_matches() {
        // Five events; three inside the window with the requested zone.
        let events = vec![
            event(1, "2025-04-02", "Europe/Moscow"),
            event(2, "2025-04-05", "Europe/Moscow"),
            event(3, "2025-04-08", "Europe/Moscow"),
            event(4, "2025-04-12", "Europe/Moscow"),
            event(5, "2025-04-03", "Asia/Tokyo"),
        ];

        let records = filter_events(events, &moscow_range());
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_filter_window_is_inclusive() {
        let events = vec![
            event(1, "2025-04-01", "Europe/Moscow"),
            event(2, "2025-04-08", "Europe/Moscow"),
            event(3, "2025-03-31", "Europe/Moscow"),
            event(4, "2025-04-09", "Europe/Moscow"),
        ];

        let records = filter_events(events, &moscow_range());
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_filter_excludes_unparseable_dates() {
        let events = vec![
            event(1, "not-a-date", "Europe/Moscow"),
            event(2, "2025-04-05", "Europe/Moscow"),
        ];

        let records = filter_events(events, &moscow_range());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 2);
    }

    #[tokio::test]
    async fn test_incomplete_range_skips_without_calling() {
        let source = Arc::new(CountingSource::new(vec![]));
        let mut fetcher = TransactionFetcher::new(source.clone());

        let incomplete = DateRange {
            time_zone: "Europe/Moscow".to_string(),
            ..DateRange::default()
        };
        let outcome = fetcher.fetch(&incomplete).await.unwrap();
        assert!(matches!(outcome, FetchOutcome::Skipped));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_identical_range_skips_second_call() {
        let source = Arc::new(CountingSource::new(vec![event(1, "2025-04-02", "Europe/Moscow")]));
        let mut fetcher = TransactionFetcher::new(source.clone());

        let range = moscow_range();
        assert!(matches!(fetcher.fetch(&range).await.unwrap(), FetchOutcome::Fetched(_)));
        assert!(matches!(fetcher.fetch(&range).await.unwrap(), FetchOutcome::Skipped));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        // A different timezone over the same dates is a different range.
        let mut other = range.clone();
        other.time_zone = "Asia/Tokyo".to_string();
        assert!(matches!(fetcher.fetch(&other).await.unwrap(), FetchOutcome::Fetched(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reset_forces_refetch() {
        let source = Arc::new(CountingSource::new(vec![]));
        let mut fetcher = TransactionFetcher::new(source.clone());

        let range = moscow_range();
        fetcher.fetch(&range).await.unwrap();
        fetcher.reset();
        fetcher.fetch(&range).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_retried() {
        let source = Arc::new(CountingSource::failing());
        let mut fetcher = TransactionFetcher::new(source.clone());

        let range = moscow_range();
        let err = fetcher.fetch(&range).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::FetchFailed);
        assert!(matches!(err, CoreError::FetchFailed));

        // The memo was not advanced, so the same range fetches again.
        assert!(fetcher.fetch(&range).await.is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
