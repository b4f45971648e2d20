//! Calendar API endpoints - JSON API
//!
//! Endpoints:
//! - api_range: Current date range (JSON)
//! - api_set_range: Apply a calendar selection
//! - api_set_timezone: Switch the selected timezone
//! - api_timezones: Timezone option list
//! - api_calendar_days: Per-day metadata for a month
//! - api_reload: Force a refetch of the current range

use crate::routes::param;
use crate::AppState;
use axum::extract::Query;
use chrono::{Datelike, NaiveDate, Utc};
use std::collections::HashMap;

/// Get the current date range (JSON API)
pub async fn api_range(state: axum::extract::State<AppState>) -> String {
    let session = state.session.read().await;
    serde_json::to_string(&session.range()).unwrap_or_default()
}

/// Apply a calendar selection (POST) - supports query params and form body
pub async fn api_set_range(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
    body: String,
) -> String {
    let start = param(&query.0, &body, "start")
        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok());
    let end = param(&query.0, &body, "end")
        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok());

    let (Some(start), Some(end)) = (start, end) else {
        return r#"{"success": false, "message": "Invalid or missing date parameter"}"#.to_string();
    };

    log::debug!("api_set_range called with {} to {}", start, end);

    let mut session = state.session.write().await;
    match session.select_range(start, end).await {
        Ok(()) => r#"{"success": true, "message": "Date range updated"}"#.to_string(),
        Err(e) => serde_json::to_string(&serde_json::json!({
            "success": false,
            "message": e.to_string(),
        }))
        .unwrap_or_default(),
    }
}

/// Switch the selected timezone (POST)
pub async fn api_set_timezone(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
    body: String,
) -> String {
    let Some(zone) = param(&query.0, &body, "zone") else {
        return r#"{"success": false, "message": "Missing zone parameter"}"#.to_string();
    };

    log::debug!("api_set_timezone called with {}", zone);

    let mut session = state.session.write().await;
    match session.set_timezone(&zone).await {
        Ok(()) => r#"{"success": true, "message": "Timezone updated"}"#.to_string(),
        Err(e) => serde_json::to_string(&serde_json::json!({
            "success": false,
            "message": e.to_string(),
        }))
        .unwrap_or_default(),
    }
}

/// Get the timezone option list and current selection (JSON API)
pub async fn api_timezones(state: axum::extract::State<AppState>) -> String {
    let session = state.session.read().await;
    let timezones = session.timezones();
    serde_json::to_string(&serde_json::json!({
        "options": timezones.options(),
        "selected": timezones.selected(),
    }))
    .unwrap_or_default()
}

/// Get per-day metadata for a month (JSON API)
pub async fn api_calendar_days(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> String {
    let today = Utc::now().date_naive();
    let year = params.get("year").and_then(|s| s.parse().ok()).unwrap_or(today.year());
    let month = params.get("month").and_then(|s| s.parse().ok()).unwrap_or(today.month());

    let session = state.session.read().await;
    let days = session.selector().month_days(year, month);
    serde_json::to_string(&days).unwrap_or_default()
}

/// Force a refetch of the current range (POST)
pub async fn api_reload(state: axum::extract::State<AppState>) -> String {
    let mut session = state.session.write().await;
    session.reload().await;
    match session.error() {
        None => r#"{"success": true, "message": "Data reloaded"}"#.to_string(),
        Some(message) => serde_json::to_string(&serde_json::json!({
            "success": false,
            "message": message,
        }))
        .unwrap_or_default(),
    }
}
