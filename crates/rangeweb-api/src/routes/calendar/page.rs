//! Calendar page rendering - Full page and month grid partial
//!
//! The grid is an HTMX partial reloaded on every month change, timezone
//! change, or accepted selection. Range picking is two clicks: the first
//! marks a pending start, the second posts the pair to /api/range. A
//! rejected selection surfaces the advisory as a transient tooltip and
//! leaves the displayed range unchanged.

use crate::routes::escape_html;
use crate::AppState;
use axum::extract::Query;
use chrono::{Datelike, Utc};
use std::collections::HashMap;

/// Calendar page - Timezone selector, month navigation, and grid
pub async fn page_calendar(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let session = state.session.read().await;
    let timezones = session.timezones();
    let selected = timezones.selected();

    let mut zone_options = String::new();
    for option in timezones.options() {
        let selected_attr = if option.value == selected { "selected" } else { "" };
        zone_options.push_str(&format!(
            r#"<option value='{}' {}>{}</option>"#,
            escape_html(&option.value),
            selected_attr,
            escape_html(&option.label)
        ));
    }

    let end = session.selector().end();
    let (grid_year, grid_month) = (end.year(), end.month());
    drop(session);

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Select Date Range</h2></div>
        <div class='bg-white rounded-xl shadow-sm p-6 max-w-2xl'>
            <div class='flex items-center gap-3 mb-4'>
                <label class='text-sm font-medium text-gray-600'>Time Zone:</label>
                <select id='tz-select' class='flex-1 px-3 py-2 border rounded-lg bg-white' onchange='changeTimezone()'>
                    {}
                </select>
            </div>
            <div class='flex items-center justify-between mb-4'>
                <button onclick='shiftMonth(-1)' class='px-3 py-1.5 border rounded-lg hover:bg-gray-50'>&larr;</button>
                <span id='month-label' class='font-medium'></span>
                <button onclick='shiftMonth(1)' class='px-3 py-1.5 border rounded-lg hover:bg-gray-50'>&rarr;</button>
            </div>
            <div id='calendar-grid' hx-get='/calendar/grid?year={}&month={}' hx-trigger='load'>
                <p class='text-gray-500 text-center py-8'>Loading calendar...</p>
            </div>
            <div class='mt-4 pt-4 border-t'>
                <h4 class='text-sm font-medium text-gray-600 mb-2'>Calendar Legend</h4>
                <div class='flex items-center gap-2 text-sm text-gray-500'>
                    <span class='w-4 h-4 rounded calendar-day disabled inline-block'></span>
                    <span>Disabled Date (Holiday or Maintenance)</span>
                </div>
            </div>
        </div>
        <div id='range-tooltip' class='bg-gray-900 text-white text-sm rounded-lg px-3 py-2 shadow-lg'></div>
        <script>
        let gridYear = {};
        let gridMonth = {};
        let pendingStart = null;
        let tooltipTimer = null;

        function refreshGrid() {{
            htmx.ajax('GET', '/calendar/grid?year=' + gridYear + '&month=' + gridMonth,
                {{target: '#calendar-grid'}});
        }}

        function shiftMonth(delta) {{
            gridMonth += delta;
            if (gridMonth < 1) {{ gridMonth = 12; gridYear -= 1; }}
            if (gridMonth > 12) {{ gridMonth = 1; gridYear += 1; }}
            refreshGrid();
        }}

        function changeTimezone() {{
            const zone = document.getElementById('tz-select').value;
            fetch('/api/timezone?zone=' + encodeURIComponent(zone), {{method: 'POST'}})
                .then(r => r.json())
                .then(data => {{
                    if (!data.success) {{ showTooltipText(data.message); }}
                    refreshGrid();
                }})
                .catch(err => console.error('Failed to set timezone:', err));
        }}

        function pickDay(date, event) {{
            hideTooltip();
            if (pendingStart === null) {{
                pendingStart = date;
                event.currentTarget.classList.add('in-range');
                return;
            }}
            let start = pendingStart;
            let end = date;
            if (end < start) {{ const tmp = start; start = end; end = tmp; }}
            pendingStart = null;
            fetch('/api/range?start=' + start + '&end=' + end, {{method: 'POST'}})
                .then(r => r.json())
                .then(data => {{
                    if (!data.success) {{ showTooltipText(data.message); }}
                    refreshGrid();
                }})
                .catch(err => console.error('Failed to set range:', err));
        }}

        function showDayTooltip(event) {{
            const message = event.currentTarget.getAttribute('data-message');
            if (message) {{
                showTooltipAt(message, event.clientX, event.clientY);
            }}
        }}

        function showTooltipText(message) {{
            showTooltipAt(message, window.innerWidth / 2, 80);
        }}

        function showTooltipAt(message, x, y) {{
            const tooltip = document.getElementById('range-tooltip');
            tooltip.textContent = message;
            tooltip.style.left = (x + 10) + 'px';
            tooltip.style.top = (y + 10) + 'px';
            tooltip.style.display = 'block';
            if (tooltipTimer) {{ clearTimeout(tooltipTimer); }}
            tooltipTimer = setTimeout(hideTooltip, 4000);
        }}

        function hideTooltip() {{
            document.getElementById('range-tooltip').style.display = 'none';
        }}

        document.body.addEventListener('htmx:afterSwap', function(e) {{
            if (e.target.id !== 'calendar-grid') return;
            const label = document.getElementById('grid-month-label');
            if (label) {{
                document.getElementById('month-label').textContent = label.textContent;
            }}
        }});
        </script>"#,
        zone_options, grid_year, grid_month, grid_year, grid_month
    );

    axum::response::Html(crate::page_response(&headers, "Calendar", "/calendar", &inner_content))
}

/// HTMX: Month grid - Partial page update
pub async fn htmx_calendar_grid(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> String {
    let today = Utc::now().date_naive();
    let year = params.get("year").and_then(|s| s.parse().ok()).unwrap_or(today.year());
    let month = params.get("month").and_then(|s| s.parse().ok()).unwrap_or(today.month());

    let session = state.session.read().await;
    let selector = session.selector();
    let days = selector.month_days(year, month);

    if days.is_empty() {
        return r#"<div class='text-center py-8 text-gray-500'><p>Invalid month</p></div>"#.to_string();
    }

    let month_label = days[0].date.format("%B %Y").to_string();
    let offset = days[0].date.weekday().num_days_from_monday() as usize;
    let range_start = selector.start();
    let range_end = selector.end();

    let mut html = format!(
        r#"<span id='grid-month-label' class='hidden'>{}</span>
        <div class='grid grid-cols-7 gap-1 text-center text-xs text-gray-400 mb-1'>
            <span>Mo</span><span>Tu</span><span>We</span><span>Th</span><span>Fr</span><span>Sa</span><span>Su</span>
        </div>
        <div class='grid grid-cols-7 gap-1'>"#,
        month_label
    );

    for _ in 0..offset {
        html.push_str("<span></span>");
    }

    for day in &days {
        let mut classes = vec!["calendar-day", "rounded", "py-2", "text-sm", "text-center"];
        if day.disabled {
            classes.push("disabled");
        } else {
            classes.push("cursor-pointer");
            classes.push("hover:bg-indigo-50");
        }
        if day.message.is_some() {
            classes.push("has-message");
        }
        if day.date >= range_start && day.date <= range_end {
            classes.push("in-range");
        }

        // Hover text combines the override message with an availability
        // indicator, mirroring the per-day metadata contract.
        let hover_attrs = match &day.message {
            Some(message) => {
                let indicator = if day.disabled { "🚫 Date Disabled" } else { "✓ Date Available" };
                format!(
                    r#" data-message='{}' onmouseover='showDayTooltip(event)' onmouseout='hideTooltip()'"#,
                    escape_html(&format!("{}\n{}", message, indicator))
                )
            }
            None => String::new(),
        };

        let click_attr = if day.disabled {
            String::new()
        } else {
            format!(r#" onclick='pickDay("{}", event)'"#, day.date)
        };

        html.push_str(&format!(
            r#"<span class='{}' data-date='{}'{}{}>{}</span>"#,
            classes.join(" "),
            day.date,
            hover_attrs,
            click_attr,
            day.date.day()
        ));
    }

    html.push_str("</div>");

    let range = session.range();
    html.push_str(&format!(
        r#"<div class='mt-4 text-sm text-gray-600'>Selected Range: {} to {} ({})</div>"#,
        range.start_date.split(' ').next().unwrap_or("-"),
        range.end_date.split(' ').next().unwrap_or("-"),
        escape_html(&range.time_zone)
    ));

    html
}
