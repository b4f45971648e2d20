//! Transactions page rendering - Full page endpoint
//!
//! The search controls live on the page; the table itself is an HTMX
//! partial refreshed after every sort/search mutation.

use crate::routes::escape_html;
use crate::AppState;

/// Transactions page - Table with search controls
pub async fn page_transactions(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let session = state.session.read().await;
    let range = session.range();
    let table = session.table();
    let search = table.search_config();

    let range_info = if range.is_complete() {
        format!(
            r#"<p class='text-sm text-gray-500 mb-4'>Showing data from {} to {} ({})</p>"#,
            range.start_date.split(' ').next().unwrap_or("-"),
            range.end_date.split(' ').next().unwrap_or("-"),
            escape_html(&range.time_zone)
        )
    } else {
        String::new()
    };

    let mut column_buttons = String::new();
    for column in table.columns() {
        let active = if search.column == column.id {
            "bg-indigo-600 text-white"
        } else {
            "border text-gray-600 hover:bg-gray-50"
        };
        column_buttons.push_str(&format!(
            r#"<button id='search-col-{}' data-column='{}' onclick='setSearchColumn("{}")'
                class='search-column-button px-3 py-1.5 text-sm rounded-lg {}'>{}</button>"#,
            escape_html(&column.id),
            escape_html(&column.id),
            escape_html(&column.id),
            active,
            escape_html(&column.label)
        ));
    }

    let search_placeholder = table
        .columns()
        .iter()
        .find(|c| c.id == search.column)
        .map(|c| format!("Search by {}", c.label))
        .unwrap_or_else(|| "Search".to_string());

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Transaction Data</h2></div>
        {}
        <div class='bg-white rounded-xl shadow-sm p-4 mb-4'>
            <div class='flex items-center gap-2 flex-wrap mb-3'>
                <span class='text-sm text-gray-600'>Search by:</span>
                {}
            </div>
            <input type='text' id='search-input' value='{}' placeholder='{}'
                oninput='onSearchInput()' class='w-full md:w-96 px-4 py-2 border rounded-lg'>
        </div>
        <div id='transactions-content' hx-get='/transactions/list' hx-trigger='load' class='bg-white rounded-xl shadow-sm p-6'>
            <p class='text-gray-500 text-center'>Loading data...</p>
        </div>
        <script>
        let searchTimer = null;

        function refreshList() {{
            htmx.ajax('GET', '/transactions/list', {{target: '#transactions-content'}});
        }}

        function sortBy(column) {{
            fetch('/api/sort?column=' + encodeURIComponent(column), {{method: 'POST'}})
                .then(() => refreshList())
                .catch(err => console.error('Failed to sort:', err));
        }}

        function onSearchInput() {{
            if (searchTimer) {{ clearTimeout(searchTimer); }}
            searchTimer = setTimeout(() => {{
                const query = document.getElementById('search-input').value;
                fetch('/api/search?query=' + encodeURIComponent(query), {{method: 'POST'}})
                    .then(() => refreshList())
                    .catch(err => console.error('Failed to search:', err));
            }}, 400);
        }}

        function setSearchColumn(column) {{
            fetch('/api/search-column?column=' + encodeURIComponent(column), {{method: 'POST'}})
                .then(() => {{
                    const input = document.getElementById('search-input');
                    input.value = '';
                    input.placeholder = 'Search by ' + column;
                    document.querySelectorAll('.search-column-button').forEach(btn => {{
                        const isActive = btn.dataset.column === column;
                        btn.className = 'search-column-button px-3 py-1.5 text-sm rounded-lg ' +
                            (isActive ? 'bg-indigo-600 text-white' : 'border text-gray-600 hover:bg-gray-50');
                    }});
                    refreshList();
                }})
                .catch(err => console.error('Failed to switch search column:', err));
        }}
        </script>"#,
        range_info,
        column_buttons,
        escape_html(&search.query),
        escape_html(&search_placeholder)
    );

    axum::response::Html(crate::page_response(&headers, "Transactions", "/transactions", &inner_content))
}
