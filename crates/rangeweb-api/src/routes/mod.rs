//! Route modules for the API server
//!
//! All routes are organized into modules:
//! - calendar: Range selection, timezone control, month grid
//! - transactions: Table view, sort, search
//! - settings: Settings page
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints
//! - page.rs: HTMX page rendering

pub mod calendar;
pub mod settings;
pub mod transactions;

use std::collections::HashMap;

/// Extract a named parameter from query params or a form-encoded body
pub(crate) fn param(query: &HashMap<String, String>, body: &str, key: &str) -> Option<String> {
    if let Some(value) = query.get(key) {
        return Some(value.clone());
    }
    for pair in body.split('&') {
        let parts: Vec<&str> = pair.splitn(2, '=').collect();
        if parts.len() == 2 && parts[0] == key {
            return Some(urlencoding::decode(parts[1]).unwrap_or_default().into_owned());
        }
    }
    None
}

/// Escape text for inclusion in an HTML attribute or body
pub(crate) fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ==================== Tests ====================
