//! Settings page rendering - Full page endpoints

use crate::AppState;

pub async fn page_settings(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let config = &state.config;

    let override_rows: Vec<String> = config
        .calendar
        .overrides
        .iter()
        .map(|(date, entry)| {
            format!(
                "<div class='flex justify-between py-2 border-b last:border-0'><span>{}</span><span class='text-gray-500'>{}{}</span></div>",
                date,
                entry.message.as_deref().unwrap_or("-"),
                if entry.disabled { " (disabled)" } else { "" }
            )
        })
        .collect();

    let column_rows: Vec<String> = config
        .table
        .columns
        .iter()
        .map(|column| {
            format!(
                "<div class='flex justify-between py-2 border-b last:border-0'><span>{} ({})</span><span class='text-gray-500'>{}</span></div>",
                column.label,
                column.id,
                if column.sortable { "sortable" } else { "not sortable" }
            )
        })
        .collect();

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Settings</h2></div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Server</h3>
            <div class='grid grid-cols-2 gap-4'>
                <div><p class='text-sm text-gray-500'>Host</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Port</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Defaults</h3>
            <div class='grid grid-cols-2 gap-4'>
                <div><p class='text-sm text-gray-500'>Time zone</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Look-back</p><p class='font-medium'>{} days</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Calendar Constraints</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div><p class='text-sm text-gray-500'>Maximum span</p><p class='font-medium'>{} days</p></div>
                <div><p class='text-sm text-gray-500'>Maximum look-back</p><p class='font-medium'>{} days</p></div>
            </div>
            <h4 class='text-sm font-medium text-gray-600 mb-2'>Date overrides</h4>
            <div class='text-sm'>{}</div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Table Columns</h3>
            <div class='text-sm'>{}</div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-4'>Remote Source</h3>
            <div><p class='text-sm text-gray-500'>Endpoint</p><p class='font-medium break-all'>{}</p></div>
        </div>"#,
        config.server.host,
        config.server.port,
        config.defaults.timezone,
        config.defaults.lookback_days,
        config.calendar.max_span_days,
        config.calendar.max_past_days,
        if override_rows.is_empty() { "<p class='text-gray-400'>None configured</p>".to_string() } else { override_rows.join("") },
        column_rows.join(""),
        config.source.endpoint_url
    );

    axum::response::Html(crate::page_response(&headers, "Settings", "/settings", &inner_content))
}
