//! Core data models for the range and table engine

use chrono::NaiveDate;
use rangeweb_client::Event;
use serde::{Deserialize, Serialize};

/// A formatted date range in a selected timezone
///
/// Both dates carry second precision and a numeric UTC-offset suffix
/// (`yyyy-MM-dd HH:mm:ss +HH:MM`). Replaced wholesale on every accepted
/// calendar or timezone change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
    pub time_zone: String,
}

impl DateRange {
    /// Whether both endpoints have been set
    pub fn is_complete(&self) -> bool {
        !self.start_date.is_empty() && !self.end_date.is_empty()
    }

    /// Calendar-date portion of the start, ignoring time-of-day
    pub fn start_date_naive(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.start_date)
    }

    /// Calendar-date portion of the end, ignoring time-of-day
    pub fn end_date_naive(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.end_date)
    }
}

/// Parse the leading `YYYY-MM-DD` portion of a formatted date string
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let token = value.split_whitespace().next()?;
    let date_part = token.get(..10).unwrap_or(token);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// One transaction record owned by the table engine
///
/// Immutable once fetched; the whole list is replaced on the next
/// successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Record identifier
    pub id: u64,
    /// Display name
    pub name: String,
    /// Record date string as delivered by the source
    pub date: String,
    /// Amount
    pub amount: f64,
    /// Status string; classified via [`TransactionStatus`] for styling
    pub status: String,
    /// IANA zone id the record belongs to
    pub timezone: String,
    /// Additional source fields, addressable as columns
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TransactionRecord {
    /// Get the record date as NaiveDate, if parseable
    pub fn date_naive(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }

    /// Classify the status string, if it is one of the known values
    pub fn status_kind(&self) -> Option<TransactionStatus> {
        self.status.parse().ok()
    }

    /// Raw cell value for a column, mirroring the field's JSON type
    pub fn cell(&self, column: &str) -> CellValue {
        match column {
            "id" => CellValue::Number(self.id as f64),
            "name" => CellValue::Text(self.name.clone()),
            "date" => CellValue::Text(self.date.clone()),
            "amount" => CellValue::Number(self.amount),
            "status" => CellValue::Text(self.status.clone()),
            "timezone" => CellValue::Text(self.timezone.clone()),
            other => match self.extra.get(other) {
                Some(serde_json::Value::Number(n)) => {
                    CellValue::Number(n.as_f64().unwrap_or(0.0))
                }
                Some(serde_json::Value::String(s)) => CellValue::Text(s.clone()),
                Some(value) => CellValue::Text(value.to_string()),
                None => CellValue::Text(String::new()),
            },
        }
    }

    /// Stringified cell value, as used for search matching and display
    pub fn column_text(&self, column: &str) -> String {
        self.cell(column).into_text()
    }
}

impl From<Event> for TransactionRecord {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            date: event.date,
            amount: event.amount,
            status: event.status,
            timezone: event.timezone,
            extra: event.extra,
        }
    }
}

/// Raw cell value used for comparison and search
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Convert to the display/search string form
    pub fn into_text(self) -> String {
        match self {
            CellValue::Number(n) => format!("{}", n),
            CellValue::Text(t) => t,
        }
    }
}

/// Transaction status classification used for badge styling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Settled successfully
    Completed,
    /// Awaiting settlement
    Pending,
    /// Settlement failed
    Failed,
    /// Settlement in progress
    Processing,
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "completed" => Ok(TransactionStatus::Completed),
            "pending" => Ok(TransactionStatus::Pending),
            "failed" => Ok(TransactionStatus::Failed),
            "processing" => Ok(TransactionStatus::Processing),
            _ => Err(format!("Invalid transaction status: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Completed => write!(f, "completed"),
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Failed => write!(f, "failed"),
            TransactionStatus::Processing => write!(f, "processing"),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Asc
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Current sort column and direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortConfig {
    /// Column identifier
    pub key: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: "date".to_string(),
            direction: SortDirection::Asc,
        }
    }
}

/// Current search column and query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Column identifier searched against
    pub column: String,
    /// Current query; empty means no filtering
    pub query: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            column: "name".to_string(),
            query: String::new(),
        }
    }
}

/// One selectable timezone entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimezoneOption {
    /// IANA zone id
    pub value: String,
    /// Display label
    pub label: String,
}

// ==================== Tests ====================
