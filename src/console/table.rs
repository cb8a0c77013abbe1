use std::cmp::Ordering;
use std::collections::BTreeSet;

use time::PrimitiveDateTime;

use super::UserInputError;
use crate::model::{
    ExperimentId, ExperimentRow, ExperimentTable, FilterPredicate, SortSpec, TableColumn,
};
use crate::store::TablePrefs;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TablePhase {
    Unloaded,
    Loading,
    Loaded,
}

/// The rows of the last load that resolved, and the state that lives and
/// dies with them: row selection (in selection order) and expanded detail
/// panels.
#[derive(Clone, Debug)]
pub struct LoadedTable {
    pub filter: FilterPredicate,
    pub table: ExperimentTable,
    selection: Vec<ExperimentId>,
    expanded: BTreeSet<ExperimentId>,
}

#[derive(Debug)]
pub struct TableController {
    loaded: Option<LoadedTable>,
    in_flight: usize,
    prefs: TablePrefs,
    search: String,
    cursor: usize,
    page_size: usize,
}

impl TableController {
    pub fn new(page_size: usize) -> Self {
        Self {
            loaded: None,
            in_flight: 0,
            prefs: TablePrefs::default(),
            search: String::new(),
            cursor: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn phase(&self) -> TablePhase {
        if self.in_flight > 0 {
            TablePhase::Loading
        } else if self.loaded.is_some() {
            TablePhase::Loaded
        } else {
            TablePhase::Unloaded
        }
    }

    pub(super) fn begin_load(&mut self) {
        self.in_flight += 1;
    }

    /// Apply one finished load. Loads are neither deduplicated nor cancelled:
    /// whichever resolves last is what the table shows. A failed load
    /// (`None`) keeps the previous rows.
    pub(super) fn finish_load(&mut self, filter: FilterPredicate, table: Option<ExperimentTable>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if let Some(table) = table {
            self.loaded = Some(LoadedTable {
                filter,
                table,
                selection: Vec::new(),
                expanded: BTreeSet::new(),
            });
            self.cursor = 0;
        }
    }

    pub fn loaded(&self) -> Option<&LoadedTable> {
        self.loaded.as_ref()
    }

    pub fn rows(&self) -> &[ExperimentRow] {
        self.loaded
            .as_ref()
            .map(|l| l.table.rows.as_slice())
            .unwrap_or(&[])
    }

    fn loaded_mut(&mut self) -> Result<&mut LoadedTable, UserInputError> {
        self.loaded.as_mut().ok_or(UserInputError::TableNotLoaded)
    }

    fn require_row(&mut self, id: &ExperimentId) -> Result<&mut LoadedTable, UserInputError> {
        let loaded = self.loaded_mut()?;
        if !loaded.table.contains(id) {
            return Err(UserInputError::UnknownExperiment(id.clone()));
        }
        Ok(loaded)
    }

    // -- selection --------------------------------------------------------

    /// Selected ids in the order they were selected. Read from the loaded
    /// table itself, so a reload always empties it.
    pub fn selected(&self) -> Vec<ExperimentId> {
        self.loaded
            .as_ref()
            .map(|l| l.selection.clone())
            .unwrap_or_default()
    }

    pub fn is_selected(&self, id: &ExperimentId) -> bool {
        self.loaded
            .as_ref()
            .is_some_and(|l| l.selection.contains(id))
    }

    /// Returns whether the row is selected afterwards.
    pub fn toggle_selected(&mut self, id: &ExperimentId) -> Result<bool, UserInputError> {
        let loaded = self.require_row(id)?;
        if let Some(pos) = loaded.selection.iter().position(|s| s == id) {
            loaded.selection.remove(pos);
            Ok(false)
        } else {
            loaded.selection.push(id.clone());
            Ok(true)
        }
    }

    pub fn select(&mut self, id: &ExperimentId) -> Result<(), UserInputError> {
        let loaded = self.require_row(id)?;
        if !loaded.selection.contains(id) {
            loaded.selection.push(id.clone());
        }
        Ok(())
    }

    /// Clear a non-empty selection, otherwise select every visible row.
    pub fn toggle_all(&mut self) {
        let visible: Vec<ExperimentId> =
            self.visible_rows().into_iter().map(|r| r.id.clone()).collect();
        if let Some(loaded) = self.loaded.as_mut() {
            if loaded.selection.is_empty() {
                loaded.selection = visible;
            } else {
                loaded.selection.clear();
            }
        }
    }

    pub fn clear_selection(&mut self) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.selection.clear();
        }
    }

    // -- inline details ---------------------------------------------------

    pub fn toggle_details(&mut self, id: &ExperimentId) -> Result<bool, UserInputError> {
        let loaded = self.require_row(id)?;
        if loaded.expanded.remove(id) {
            Ok(false)
        } else {
            loaded.expanded.insert(id.clone());
            Ok(true)
        }
    }

    pub fn is_expanded(&self, id: &ExperimentId) -> bool {
        self.loaded
            .as_ref()
            .is_some_and(|l| l.expanded.contains(id))
    }

    // -- sort, search, columns --------------------------------------------

    pub fn prefs(&self) -> &TablePrefs {
        &self.prefs
    }

    pub(super) fn set_prefs(&mut self, prefs: TablePrefs) {
        self.prefs = prefs;
    }

    pub fn sort(&self) -> SortSpec {
        self.prefs.sort
    }

    /// Returns false (and changes nothing) for columns that cannot be sorted.
    pub fn sort_by(&mut self, column: TableColumn, descending: bool) -> bool {
        if !column.is_sortable() {
            return false;
        }
        self.prefs.sort = SortSpec { column, descending };
        self.cursor = 0;
        true
    }

    pub fn is_hidden(&self, column: TableColumn) -> bool {
        self.prefs.hidden_columns.contains(&column)
    }

    /// The id column always stays visible. Returns whether anything changed.
    pub fn toggle_column(&mut self, column: TableColumn) -> bool {
        if column == TableColumn::Id {
            return false;
        }
        if !self.prefs.hidden_columns.remove(&column) {
            self.prefs.hidden_columns.insert(column);
        }
        true
    }

    pub fn visible_columns(&self) -> Vec<TableColumn> {
        TableColumn::ALL
            .into_iter()
            .filter(|c| !self.is_hidden(*c))
            .collect()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = text.trim().to_lowercase();
        self.cursor = 0;
    }

    /// Rows matching the quick search, in sort order.
    pub fn visible_rows(&self) -> Vec<&ExperimentRow> {
        let sort = self.prefs.sort;
        let mut keyed: Vec<(Option<SortKey>, &ExperimentRow)> = self
            .rows()
            .iter()
            .filter(|r| r.matches_search(&self.search))
            .map(|r| (sort_key(r, sort.column), r))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| match (a, b) {
            (Some(a), Some(b)) => {
                let o = a.cmp(b);
                if sort.descending { o.reverse() } else { o }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        keyed.into_iter().map(|(_, r)| r).collect()
    }

    // -- cursor and pages -------------------------------------------------

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_row(&self) -> Option<&ExperimentRow> {
        self.visible_rows().get(self.cursor).copied()
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor.saturating_add_signed(delta);
        self.cursor = next.min(len - 1);
    }

    pub fn page(&self) -> usize {
        self.cursor / self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.visible_rows().len().div_ceil(self.page_size).max(1)
    }

    pub fn page_rows(&self) -> Vec<&ExperimentRow> {
        self.visible_rows()
            .into_iter()
            .skip(self.page() * self.page_size)
            .take(self.page_size)
            .collect()
    }

    pub fn next_page(&mut self) {
        if self.page() + 1 < self.page_count() {
            self.cursor = (self.page() + 1) * self.page_size;
        }
    }

    pub fn prev_page(&mut self) {
        let page = self.page();
        if page > 0 {
            self.cursor = (page - 1) * self.page_size;
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Time(PrimitiveDateTime),
    Seconds(u64),
    Text(String),
}

fn sort_key(row: &ExperimentRow, column: TableColumn) -> Option<SortKey> {
    match column {
        TableColumn::Id => Some(SortKey::Text(row.id.as_str().to_string())),
        TableColumn::Start => row
            .start_time()
            .map(SortKey::Time)
            .or_else(|| row.start.clone().map(SortKey::Text)),
        TableColumn::End => row
            .end_time()
            .map(SortKey::Time)
            .or_else(|| row.end.clone().map(SortKey::Text)),
        TableColumn::Duration => {
            let text = row.duration.as_deref()?;
            Some(
                duration_seconds(text)
                    .map(SortKey::Seconds)
                    .unwrap_or_else(|| SortKey::Text(text.to_string())),
            )
        }
        other => row.column(other).map(|s| SortKey::Text(s.to_lowercase())),
    }
}

/// `H:MM:SS` or `N day(s), H:MM:SS`.
fn duration_seconds(text: &str) -> Option<u64> {
    let (days, clock) = match text.split_once(", ") {
        Some((days, clock)) => {
            let n = days.split_whitespace().next()?.parse::<u64>().ok()?;
            (n, clock)
        }
        None => (0, text),
    };
    let mut parts = clock.trim().split(':');
    let h: u64 = parts.next()?.parse().ok()?;
    let m: u64 = parts.next()?.parse().ok()?;
    let s: u64 = parts.next()?.split('.').next()?.parse().ok()?;
    Some(days * 86_400 + h * 3_600 + m * 60 + s)
}

#[cfg(test)]
#[path = "../tests/console/table_tests.rs"]
mod tests;
