//! Table state: raw data, derived view, sort and search semantics
//!
//! Sort and search compose sequentially, in the order the user performed
//! them: sorting reorders the current view, while a query change rebuilds
//! the view from the full data set. That ordering is part of the contract
//! and is covered by the tests below.

use crate::models::{CellValue, SearchConfig, SortConfig, SortDirection, TransactionRecord};
use rangeweb_config::ColumnSpec;
use std::cmp::Ordering;

/// Holds the fetched record list and derives the displayed view
#[derive(Debug, Clone)]
pub struct TableEngine {
    columns: Vec<ColumnSpec>,
    data: Vec<TransactionRecord>,
    filtered: Vec<TransactionRecord>,
    sort: SortConfig,
    search: SearchConfig,
}

impl TableEngine {
    /// Create an empty engine over the configured columns
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self {
            columns,
            data: Vec::new(),
            filtered: Vec::new(),
            sort: SortConfig::default(),
            search: SearchConfig::default(),
        }
    }

    /// Full record list from the last successful fetch
    pub fn data(&self) -> &[TransactionRecord] {
        &self.data
    }

    /// Currently displayed view
    pub fn view(&self) -> &[TransactionRecord] {
        &self.filtered
    }

    /// Column definitions, in display order
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Current sort configuration
    pub fn sort_config(&self) -> &SortConfig {
        &self.sort
    }

    /// Current search configuration
    pub fn search_config(&self) -> &SearchConfig {
        &self.search
    }

    /// Replace the record list with freshly fetched data
    ///
    /// Sort and search settings survive the reload but are not reapplied;
    /// the new list is shown as delivered until the user interacts again.
    pub fn load(&mut self, records: Vec<TransactionRecord>) {
        self.filtered = records.clone();
        self.data = records;
    }

    /// Sort the current view by a column, toggling direction
    ///
    /// Ascending on first use or on switching columns; descending when
    /// re-sorting an already-ascending column. Returns false for unknown
    /// or non-sortable columns (no-op).
    pub fn sort_by_column(&mut self, column_id: &str) -> bool {
        let Some(column) = self.columns.iter().find(|c| c.id == column_id) else {
            return false;
        };
        if !column.sortable {
            return false;
        }

        let direction = if self.sort.key == column_id && self.sort.direction == SortDirection::Asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };

        self.filtered.sort_by(|a, b| {
            let ordering = compare_cells(a, b, column_id);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        self.sort = SortConfig {
            key: column_id.to_string(),
            direction,
        };
        true
    }

    /// Update the search query and rebuild the view
    ///
    /// An empty query restores the full data set; otherwise the view is
    /// the subset of the full data whose search-column text contains the
    /// lower-cased query.
    pub fn set_query(&mut self, query: &str) {
        self.search.query = query.to_string();

        if query.trim().is_empty() {
            self.filtered = self.data.clone();
            return;
        }

        let needle = query.to_lowercase();
        let column = self.search.column.clone();
        self.filtered = self
            .data
            .iter()
            .filter(|r| r.column_text(&column).to_lowercase().contains(&needle))
            .cloned()
            .collect();
    }

    /// Switch the search column, clearing the query and the view filter
    pub fn set_search_column(&mut self, column_id: &str) {
        self.search = SearchConfig {
            column: column_id.to_string(),
            query: String::new(),
        };
        self.filtered = self.data.clone();
    }
}

/// Compare two records on a column's raw value: numeric for number cells,
/// lexicographic otherwise. Stable for equal keys via the caller's sort.
fn compare_cells(a: &TransactionRecord, b: &TransactionRecord, column: &str) -> Ordering {
    match (a.cell(column), b.cell(column)) {
        (CellValue::Number(x), CellValue::Number(y)) => {
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (x, y) => x.into_text().cmp(&y.into_text()),
    }
}

// ==================== Tests ====================
