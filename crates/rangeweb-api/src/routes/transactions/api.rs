//! Transactions API endpoints - JSON API and HTMX partial responses
//!
//! Endpoints:
//! - api_transactions: Current table view (JSON)
//! - api_sort: Sort the view by a column
//! - api_search: Update the search query
//! - api_search_column: Switch the search column
//! - htmx_transactions_list: Table (HTML fragment)

use crate::routes::{escape_html, param};
use crate::AppState;
use axum::extract::Query;
use rangeweb_core::SortDirection;
use std::collections::HashMap;

/// Get the current table view (JSON API)
pub async fn api_transactions(state: axum::extract::State<AppState>) -> String {
    let session = state.session.read().await;
    serde_json::to_string(&session.transactions_view()).unwrap_or_default()
}

/// Sort the view by a column (POST)
///
/// Repeated sorts on the same column toggle the direction; non-sortable
/// columns are a no-op.
pub async fn api_sort(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
    body: String,
) -> String {
    let Some(column) = param(&query.0, &body, "column") else {
        return r#"{"success": false, "message": "Missing column parameter"}"#.to_string();
    };

    let mut session = state.session.write().await;
    if session.sort_by_column(&column) {
        r#"{"success": true, "message": "Sorted"}"#.to_string()
    } else {
        serde_json::to_string(&serde_json::json!({
            "success": false,
            "message": format!("Column is not sortable: {}", column),
        }))
        .unwrap_or_default()
    }
}

/// Update the search query (POST)
pub async fn api_search(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
    body: String,
) -> String {
    let value = param(&query.0, &body, "query").unwrap_or_default();

    let mut session = state.session.write().await;
    session.set_query(&value);
    r#"{"success": true, "message": "Search updated"}"#.to_string()
}

/// Switch the search column, clearing the query (POST)
pub async fn api_search_column(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
    body: String,
) -> String {
    let Some(column) = param(&query.0, &body, "column") else {
        return r#"{"success": false, "message": "Missing column parameter"}"#.to_string();
    };

    let mut session = state.session.write().await;
    session.set_search_column(&column);
    r#"{"success": true, "message": "Search column updated"}"#.to_string()
}

/// HTMX: Transaction table - Partial page update
///
/// A fetch failure replaces the table area with the fixed failure message
/// until the next successful fetch.
pub async fn htmx_transactions_list(state: axum::extract::State<AppState>) -> String {
    let session = state.session.read().await;

    if let Some(message) = session.error() {
        return format!(
            r#"<div class='bg-red-50 border border-red-200 rounded-lg p-6 text-center'>
                <p class='text-red-600 font-medium'>{}</p>
            </div>"#,
            escape_html(message)
        );
    }

    let table = session.table();
    let sort = table.sort_config();
    let records = table.view();

    let mut html = String::from(
        "<div class='overflow-x-auto'><table class='min-w-full bg-white rounded-lg'><thead><tr class='border-b text-left text-sm text-gray-500'>",
    );

    for column in table.columns() {
        if column.sortable {
            let indicator = if sort.key == column.id {
                match sort.direction {
                    SortDirection::Asc => " &#9650;",
                    SortDirection::Desc => " &#9660;",
                }
            } else {
                ""
            };
            html.push_str(&format!(
                r#"<th class='px-4 py-3 cursor-pointer hover:text-indigo-600' onclick='sortBy("{}")'>{}{}</th>"#,
                escape_html(&column.id),
                escape_html(&column.label),
                indicator
            ));
        } else {
            html.push_str(&format!(
                r#"<th class='px-4 py-3'>{}</th>"#,
                escape_html(&column.label)
            ));
        }
    }
    html.push_str("</tr></thead><tbody>");

    if records.is_empty() {
        html.push_str(&format!(
            r#"<tr><td colspan='{}' class='px-4 py-8 text-center text-gray-500'>No data found</td></tr>"#,
            table.columns().len()
        ));
    } else {
        for record in records {
            html.push_str("<tr class='border-b last:border-0 hover:bg-gray-50'>");
            for column in table.columns() {
                if column.id == "status" {
                    let style_class = state
                        .config
                        .table
                        .status_styles
                        .get(&record.status.to_lowercase())
                        .map(|s| s.as_str())
                        .unwrap_or("");
                    html.push_str(&format!(
                        r#"<td class='px-4 py-3'><span class='px-2 py-1 rounded text-xs font-medium {}'>{}</span></td>"#,
                        style_class,
                        escape_html(&record.status)
                    ));
                } else {
                    html.push_str(&format!(
                        r#"<td class='px-4 py-3'>{}</td>"#,
                        escape_html(&record.column_text(&column.id))
                    ));
                }
            }
            html.push_str("</tr>");
        }
    }

    html.push_str("</tbody></table></div>");
    html.push_str(&format!(
        r#"<div class='mt-3 text-sm text-gray-500'>{} of {} record(s) shown</div>"#,
        records.len(),
        table.data().len()
    ));

    html
}
