//! Core session engine: range selection, fetching, and table state
//!
//! The [`Session`] wires the collaborators together: an accepted range or
//! timezone change produces exactly one refresh, a refresh drives the
//! fetcher, and accepted results replace the table contents.

pub mod error;
pub mod fetch;
pub mod models;
pub mod range;
pub mod table;
pub mod timezone;

use chrono::NaiveDate;
use rangeweb_config::Config;
use serde::{Deserialize, Serialize};

pub use error::{CoreError, CoreResult, ErrorCode};
pub use fetch::{FetchOutcome, SourceRef, TransactionFetcher};
pub use models::{
    CellValue, DateRange, SearchConfig, SortConfig, SortDirection, TimezoneOption,
    TransactionRecord, TransactionStatus,
};
pub use range::{DayInfo, RangeSelector, DATE_RANGE_FORMAT};
pub use table::TableEngine;
pub use timezone::{MockTimezoneProvider, TimezoneProvider, TimezoneState};

/// Fixed user-facing message shown when a fetch attempt fails
pub const FETCH_FAILURE_MESSAGE: &str = "Failed to fetch data. Please try again.";

/// One user session: selection state, fetcher, and table
pub struct Session {
    selector: RangeSelector,
    timezones: TimezoneState,
    fetcher: TransactionFetcher,
    table: TableEngine,
    advisory: Option<String>,
    error: Option<String>,
}

impl Session {
    /// Build a session from configuration and a transaction source
    pub fn new(config: &Config, source: SourceRef) -> CoreResult<Self> {
        Ok(Self {
            selector: RangeSelector::new(&config.calendar, &config.defaults)?,
            timezones: TimezoneState::new(&config.defaults.timezone),
            fetcher: TransactionFetcher::new(source),
            table: TableEngine::new(config.table.columns.clone()),
            advisory: None,
            error: None,
        })
    }

    /// The current formatted range
    pub fn range(&self) -> DateRange {
        self.selector.range()
    }

    /// Range selector (read access for calendar rendering)
    pub fn selector(&self) -> &RangeSelector {
        &self.selector
    }

    /// Timezone list and selection
    pub fn timezones(&self) -> &TimezoneState {
        &self.timezones
    }

    /// Table state
    pub fn table(&self) -> &TableEngine {
        &self.table
    }

    /// Transient advisory raised by a rejected selection, if any
    pub fn advisory(&self) -> Option<&str> {
        self.advisory.as_deref()
    }

    /// Current fetch-failure message, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Per-day metadata for a single date
    pub fn day_info(&self, date: NaiveDate) -> DayInfo {
        self.selector.day_info(date)
    }

    /// Replace the timezone option list from a provider
    ///
    /// A provider failure is logged and leaves the current list active.
    pub async fn load_timezones(&mut self, provider: &dyn TimezoneProvider) {
        match provider.fetch_timezones().await {
            Ok(zones) => self.timezones.replace_options(zones),
            Err(e) => log::warn!("Failed to fetch timezones: {}", e),
        }
    }

    /// Apply a calendar selection
    ///
    /// A rejected selection leaves the prior range in effect and records
    /// the advisory; an accepted one clears the advisory and refreshes.
    pub async fn select_range(&mut self, start: NaiveDate, end: NaiveDate) -> CoreResult<()> {
        match self.selector.try_select(start, end) {
            Ok(_) => {
                self.advisory = None;
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                self.advisory = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Switch the selected timezone
    ///
    /// The calendar dates are unchanged; the range is reformatted in the
    /// new zone and refreshed like any other accepted change.
    pub async fn set_timezone(&mut self, zone: &str) -> CoreResult<()> {
        self.timezones.select(zone)?;
        self.selector.set_timezone(zone)?;
        self.advisory = None;
        self.refresh().await;
        Ok(())
    }

    /// Fetch for the current range and load accepted results
    ///
    /// The error string is cleared at the start of every attempt. A failed
    /// fetch sets the fixed failure message and leaves the table contents
    /// untouched. A response that resolves after the selector has moved on
    /// is discarded rather than applied.
    pub async fn refresh(&mut self) {
        self.error = None;
        let requested = self.selector.range();
        match self.fetcher.fetch(&requested).await {
            Ok(FetchOutcome::Fetched(records)) => {
                if self.selector.range() == requested {
                    self.table.load(records);
                } else {
                    log::debug!(
                        "Discarding stale response for {} to {}",
                        requested.start_date,
                        requested.end_date
                    );
                }
            }
            Ok(FetchOutcome::Skipped) => {}
            Err(e) => {
                log::error!("Fetch failed: {}", e);
                self.error = Some(FETCH_FAILURE_MESSAGE.to_string());
            }
        }
    }

    /// Forget the fetch memo and refetch the current range
    pub async fn reload(&mut self) {
        self.fetcher.reset();
        self.refresh().await;
    }

    /// Sort the table view by a column; no-op for non-sortable columns
    pub fn sort_by_column(&mut self, column_id: &str) -> bool {
        self.table.sort_by_column(column_id)
    }

    /// Update the table search query
    pub fn set_query(&mut self, query: &str) {
        self.table.set_query(query);
    }

    /// Switch the table search column
    pub fn set_search_column(&mut self, column_id: &str) {
        self.table.set_search_column(column_id);
    }

    /// Summary for the dashboard and health endpoints
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            total_records: self.table.data().len(),
            visible_records: self.table.view().len(),
            range: self.selector.range(),
            selected_timezone: self.timezones.selected().to_string(),
            error: self.error.clone(),
        }
    }

    /// Table payload for the transactions API
    pub fn transactions_view(&self) -> TransactionsView {
        TransactionsView {
            records: self.table.view().to_vec(),
            total_count: self.table.data().len(),
            sort: self.table.sort_config().clone(),
            search: self.table.search_config().clone(),
            range: self.selector.range(),
            error: self.error.clone(),
        }
    }
}

/// Session summary
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_records: usize,
    pub visible_records: usize,
    pub range: DateRange,
    pub selected_timezone: String,
    pub error: Option<String>,
}

/// Current table view as returned by the transactions API
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionsView {
    pub records: Vec<TransactionRecord>,
    pub total_count: usize,
    pub sort: SortConfig,
    pub search: SearchConfig,
    pub range: DateRange,
    pub error: Option<String>,
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use rangeweb_client::{ClientError, Event, TransactionSource};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ScriptedSource {
        calls: AtomicUsize,
        fail: AtomicBool,
        events: Vec<Event>,
    }

    impl ScriptedSource {
        fn new(events: Vec<Event>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
                events,
            })
        }
    }

    #[async_trait]
    impl TransactionSource for ScriptedSource {
        async fn fetch_events(&self) -> Result<Vec<Event>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(ClientError::RequestFailed { message: "connection refused".to_string() });
            }
            Ok(self.events.clone())
        }
    }

    fn today() -> chrono::NaiveDate {
        Utc::now().with_timezone(&chrono_tz::Europe::Moscow).date_naive()
    }

    fn event_on(id: u64, date: chrono::NaiveDate, timezone: &str) -> Event {
        Event {
            id,
            name: format!("Event {}", id),
            date: date.format("%Y-%m-%d").to_string(),
            amount: 10.0 * id as f64,
            status: "completed".to_string(),
            timezone: timezone.to_string(),
            extra: serde_json::Map::new(),
        }
    }

    fn session_with(source: Arc<ScriptedSource>) -> Session {
        Session::new(&Config::default(), source).unwrap()
    }

    #[tokio::test]
    async fn test_initial_refresh_loads_matching_records() {
        let source = ScriptedSource::new(vec![
            event_on(1, today() - Duration::days(1), "Europe/Moscow"),
            event_on(2, today() - Duration::days(3), "Europe/Moscow"),
            event_on(3, today() - Duration::days(1), "Asia/Tokyo"),
            event_on(4, today() - Duration::days(30), "Europe/Moscow"),
        ]);
        let mut session = session_with(source);

        session.refresh().await;
        assert!(session.error().is_none());
        let ids: Vec<u64> = session.table().view().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_rejected_selection_sets_advisory_and_keeps_range() {
        let source = ScriptedSource::new(vec![]);
        let mut session = session_with(source.clone());
        session.refresh().await;
        let before = session.range();

        let result = session
            .select_range(today() - Duration::days(15), today())
            .await;
        assert!(result.is_err());
        assert_eq!(session.advisory(), Some("Maximum 10 days allowed for selection"));
        assert_eq!(session.range(), before);

        // No additional fetch was issued for the rejected change.
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_accepted_selection_clears_advisory() {
        let source = ScriptedSource::new(vec![]);
        let mut session = session_with(source);

        let _ = session.select_range(today() - Duration::days(15), today()).await;
        assert!(session.advisory().is_some());

        session
            .select_range(today() - Duration::days(3), today())
            .await
            .unwrap();
        assert!(session.advisory().is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_sets_message_and_keeps_table() {
        let source = ScriptedSource::new(vec![
            event_on(1, today() - Duration::days(1), "Europe/Moscow"),
        ]);
        let mut session = session_with(source.clone());

        session.refresh().await;
        assert_eq!(session.table().data().len(), 1);

        source.fail.store(true, Ordering::SeqCst);
        session
            .select_range(today() - Duration::days(2), today())
            .await
            .unwrap();

        assert_eq!(session.error(), Some(FETCH_FAILURE_MESSAGE));
        // Previously displayed data is untouched.
        assert_eq!(session.table().data().len(), 1);
        assert_eq!(session.table().view().len(), 1);

        // The next successful attempt clears the message.
        source.fail.store(false, Ordering::SeqCst);
        session.reload().await;
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_timezone_change_triggers_refetch() {
        let source = ScriptedSource::new(vec![
            event_on(1, today() - Duration::days(1), "Asia/Tokyo"),
        ]);
        let mut session = session_with(source.clone());

        session.refresh().await;
        assert_eq!(session.table().view().len(), 0);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        // Same calendar dates, new zone: a distinct range, so it fetches.
        let provider = MockTimezoneProvider::default();
        session.load_timezones(&provider).await;
        session.set_timezone("Asia/Tokyo").await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(session.table().view().len(), 1);
        assert_eq!(session.range().time_zone, "Asia/Tokyo");
    }

    #[tokio::test]
    async fn test_set_timezone_rejects_zone_outside_list() {
        let source = ScriptedSource::new(vec![]);
        let mut session = session_with(source);

        // Only the seeded default is available before the provider resolves.
        let err = session.set_timezone("Asia/Tokyo").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownTimezone);
        assert_eq!(session.timezones().selected(), "Europe/Moscow");
    }

    #[tokio::test]
    async fn test_identical_range_refresh_skips_fetch() {
        let source = ScriptedSource::new(vec![]);
        let mut session = session_with(source.clone());

        session.refresh().await;
        session.refresh().await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_summary_reflects_state() {
        let source = ScriptedSource::new(vec![
            event_on(1, today() - Duration::days(1), "Europe/Moscow"),
        ]);
        let mut session = session_with(source);
        session.refresh().await;

        let summary = session.summary();
        assert_eq!(summary.total_records, 1);
        assert_eq!(summary.visible_records, 1);
        assert_eq!(summary.selected_timezone, "Europe/Moscow");
        assert!(summary.error.is_none());
    }
}
