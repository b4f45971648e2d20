//! Calendar routes - Range selection, timezone control, month grid
//!
//! Structure:
//! - api.rs: JSON API endpoints
//! - page.rs: Full page and grid partial rendering

pub mod api;
pub mod page;

pub use api::{
    api_calendar_days,
    api_range,
    api_reload,
    api_set_range,
    api_set_timezone,
    api_timezones,
};

pub use page::{htmx_calendar_grid, page_calendar};
