//! Transaction routes - Table view, sort, and search
//!
//! Features:
//! - Current filtered/sorted view as JSON
//! - Column sort with direction toggling
//! - Per-column substring search
//! - HTMX partial page updates
//!
//! Structure:
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{
    api_search,
    api_search_column,
    api_sort,
    api_transactions,
    htmx_transactions_list,
};

pub use page::page_transactions;
