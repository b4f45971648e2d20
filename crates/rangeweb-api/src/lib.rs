//! HTTP API server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::calendar: Range selection, timezone control, month grid
//! - routes::transactions: Table view, sort, search
//! - routes::settings: Configuration display

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use rangeweb_config::Config;
use rangeweb_core::Session;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<Session>>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::calendar::{
        api_calendar_days, api_range, api_reload, api_set_range, api_set_timezone,
        api_timezones, htmx_calendar_grid, page_calendar,
    };
    use routes::settings::{api_settings, page_settings};
    use routes::transactions::{
        api_search, api_search_column, api_sort, api_transactions,
        htmx_transactions_list, page_transactions,
    };

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/summary", get(api_summary))
        .route("/api/range", get(api_range))
        .route("/api/range", post(api_set_range))
        .route("/api/timezone", post(api_set_timezone))
        .route("/api/timezones", get(api_timezones))
        .route("/api/calendar/days", get(api_calendar_days))
        .route("/api/transactions", get(api_transactions))
        .route("/api/sort", post(api_sort))
        .route("/api/search", post(api_search))
        .route("/api/search-column", post(api_search_column))
        .route("/api/reload", post(api_reload))
        .route("/api/settings", get(api_settings))
        // HTMX page routes
        .route("/", get(index_page))
        .route("/calendar", get(page_calendar))
        .route("/transactions", get(page_transactions))
        .route("/settings", get(page_settings))
        // HTMX partial routes
        .route("/calendar/grid", get(htmx_calendar_grid))
        .route("/transactions/list", get(htmx_transactions_list))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Get session summary (JSON API)
async fn api_summary(state: axum::extract::State<AppState>) -> String {
    let session = state.session.read().await;
    let summary = session.summary();
    serde_json::to_string(&summary).unwrap_or_default()
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Rangeweb</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .status-completed {{ background: #d1fae5; color: #047857; }}
        .status-pending {{ background: #fef3c7; color: #b45309; }}
        .status-failed {{ background: #fee2e2; color: #b91c1c; }}
        .status-processing {{ background: #dbeafe; color: #1d4ed8; }}
        .calendar-day.disabled {{ background: #f3f4f6; color: #d1d5db; cursor: not-allowed; }}
        .calendar-day.has-message {{ box-shadow: inset 0 -2px 0 #f59e0b; }}
        .calendar-day.in-range {{ background: #e0e7ff; }}
        #range-tooltip {{ position: fixed; z-index: 50; display: none; white-space: pre-line; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        title, content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let links = [
        ("/", "Dashboard", "dashboard"),
        ("/calendar", "Calendar", "calendar"),
        ("/transactions", "Transactions", "transactions"),
        ("/settings", "Settings", "settings"),
    ];

    let mut nav = String::from("<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>Rangeweb</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>");

    for (path, label, id) in &links {
        let is_active = if *path == "/" {
            current_path == "/"
        } else {
            current_path.starts_with(path)
        };
        let active_class = if is_active { "bg-indigo-50 text-indigo-600" } else { "text-gray-600 hover:bg-gray-50" };
        let icon = match *id {
            "dashboard" => "📊",
            "calendar" => "📅",
            "transactions" => "📋",
            "settings" => "⚙️",
            _ => "📄",
        };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'>{}<span>{}</span></a></li>"#,
            path, active_class, icon, label
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

/// Check if request is from HTMX (partial page update)
fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &axum::http::HeaderMap, title: &str, current_path: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        format!(r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
            inner_content)
    } else {
        base_html(title, &format!(r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
            nav_sidebar(current_path), inner_content))
    }
}

/// Index page with summary cards
async fn index_page(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let session = state.session.read().await;
    let summary = session.summary();

    let range_display = format!(
        "{} to {}",
        summary.range.start_date.split(' ').next().unwrap_or("-"),
        summary.range.end_date.split(' ').next().unwrap_or("-")
    );
    let status_line = match &summary.error {
        Some(message) => format!("<p class='text-sm text-red-600'>{}</p>", message),
        None => "<p class='text-sm text-green-600'>Data up to date</p>".to_string(),
    };

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Dashboard</h2></div>
        <div class='grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-4 mb-6'>
            <div class='bg-indigo-50 p-4 rounded-lg border border-indigo-200'><p class='text-sm text-indigo-600'>Records fetched</p><p class='text-2xl font-bold text-indigo-700'>{}</p></div>
            <div class='bg-green-50 p-4 rounded-lg border border-green-200'><p class='text-sm text-green-600'>Records shown</p><p class='text-2xl font-bold text-green-700'>{}</p></div>
            <div class='bg-blue-50 p-4 rounded-lg border border-blue-200'><p class='text-sm text-blue-600'>Selected range</p><p class='text-sm font-medium text-blue-700'>{}</p></div>
            <div class='bg-yellow-50 p-4 rounded-lg border border-yellow-200'><p class='text-sm text-yellow-600'>Time zone</p><p class='text-sm font-medium text-yellow-700'>{}</p></div>
        </div>
        <div class='grid grid-cols-1 lg:grid-cols-2 gap-6'>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold mb-2'>Select Date Range</h3>
                <p class='text-sm text-gray-500 mb-4'>Pick a bounded window and timezone to fetch matching transactions.</p>
                <a href='/calendar' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Open calendar</a>
            </div>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold mb-2'>Transaction Data</h3>
                {}
                <a href='/transactions' class='mt-4 inline-block px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Open table</a>
            </div>
        </div>"#,
        summary.total_records,
        summary.visible_records,
        range_display,
        summary.selected_timezone,
        status_line
    );

    axum::response::Html(page_response(&headers, "Dashboard", "/", &inner_content))
}

/// Start the HTTP server
///
/// This is the main entry point for the Rangeweb server.
/// It creates the router, binds to the address, and starts listening for requests.
///
/// # Arguments
///
/// * `config` - The application configuration
/// * `session` - The shared session state
pub async fn start_server(config: Config, session: Arc<RwLock<Session>>) {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { session, config };

    let router = create_router(state);

    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("[ERROR] Failed to bind {}: {}", addr, e);
            return;
        }
    };
    eprintln!("[INFO] Starting Rangeweb server on http://{}", addr);
    eprintln!("[INFO] Available routes:");
    eprintln!("[INFO]   - / (Dashboard)");
    eprintln!("[INFO]   - /calendar (Date range selection)");
    eprintln!("[INFO]   - /transactions (Transaction table)");
    eprintln!("[INFO]   - /settings (Configuration)");
    eprintln!("[INFO]   - /api/* (JSON API endpoints)");

    match axum::serve(listener, router).await {
        Ok(_) => eprintln!("[INFO] Server stopped gracefully"),
        Err(e) => eprintln!("[ERROR] Server error: {}", e),
    }
}
