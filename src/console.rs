//! The console: one explicit state object for everything the dashboard
//! shows, with a transition function per user action.
//!
//! Network work runs on worker threads and comes back as [`Completion`]s.
//! Only the owner of the [`Console`] mutates it, and completions are applied
//! in arrival order by [`Console::pump`] or [`Console::wait_idle`].

use std::collections::VecDeque;
use std::sync::Arc;

use time::OffsetDateTime;

use crate::diff::DiffLayout;
use crate::model::{
    ExperimentId, FilterPredicate, SortSpec, TableColumn, TagList, TextField,
};
use crate::remote::Backend;
use crate::store::{LocalStore, TablePrefs};

mod bulk;
mod compare;
mod detail;
mod errors;
mod notice;
mod table;
mod tag_index;
mod tasks;

pub use self::bulk::{BulkAction, BulkOutcome, BulkPlan, BulkReport};
pub use self::compare::{ComparePlan, ComparisonView, DiffPanel};
pub use self::detail::DetailView;
pub use self::errors::UserInputError;
pub use self::notice::{Notice, NoticeLevel};
pub use self::table::{LoadedTable, TableController, TablePhase};
pub use self::tag_index::TagIndex;
pub use self::tasks::Completion;

use self::detail::restore_prompt;
use self::tasks::TaskQueue;

#[derive(Clone, Debug)]
pub enum View {
    Table,
    Detail(DetailView),
    Comparison(ComparisonView),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Work was sent to the background.
    Started,
    /// Waiting on [`Console::confirm`] or [`Console::decline`].
    NeedsConfirmation,
    /// Nothing was sent; the reason was also queued as a notice.
    Rejected(UserInputError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingAction {
    Bulk(BulkPlan),
    Restore(ExperimentId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub prompt: String,
    pub action: PendingAction,
}

/// Where table preferences are saved, if anywhere.
pub struct PrefsBinding {
    pub store: LocalStore,
    pub key: String,
    pub retention_days: u64,
}

pub struct Console {
    backend: Arc<dyn Backend>,
    prefs: Option<PrefsBinding>,
    filter: FilterPredicate,
    table: TableController,
    tags: TagIndex,
    view: View,
    layout: DiffLayout,
    pending: Option<PendingConfirmation>,
    notices: VecDeque<Notice>,
    status: Option<String>,
    last_bulk: Option<BulkReport>,
    tasks: TaskQueue,
}

impl Console {
    pub fn new(backend: Arc<dyn Backend>, page_size: usize) -> Self {
        Self {
            backend,
            prefs: None,
            filter: FilterPredicate::inbox(),
            table: TableController::new(page_size),
            tags: TagIndex::default(),
            view: View::Table,
            layout: DiffLayout::default(),
            pending: None,
            notices: VecDeque::new(),
            status: None,
            last_bulk: None,
            tasks: TaskQueue::new(),
        }
    }

    /// Restore saved sort order and column visibility, and save changes
    /// back to the same place.
    pub fn with_table_prefs(mut self, binding: PrefsBinding) -> Self {
        let saved = binding.store.load_table_prefs(
            &binding.key,
            binding.retention_days,
            OffsetDateTime::now_utc(),
        );
        self.table.set_prefs(saved.unwrap_or_default());
        self.prefs = Some(binding);
        self
    }

    // -- state ------------------------------------------------------------

    pub fn filter(&self) -> &FilterPredicate {
        &self.filter
    }

    pub fn table(&self) -> &TableController {
        &self.table
    }

    pub fn tags(&self) -> &TagIndex {
        &self.tags
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn diff_layout(&self) -> DiffLayout {
        self.layout
    }

    pub fn pending(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn last_bulk_report(&self) -> Option<&BulkReport> {
        self.last_bulk.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.tasks.in_flight() > 0
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    /// Selection Manager: ids marked in the loaded table, in selection order.
    pub fn selected(&self) -> Vec<ExperimentId> {
        self.table.selected()
    }

    // -- loading ----------------------------------------------------------

    /// Initial load: tag shortcuts and the inbox.
    pub fn start(&mut self) {
        self.refresh_tags();
        self.show_inbox();
    }

    pub fn refresh_tags(&mut self) {
        let backend = Arc::clone(&self.backend);
        self.tasks
            .spawn("tags", move || Completion::TagsLoaded(backend.all_tags()));
    }

    pub fn show_inbox(&mut self) {
        self.load(FilterPredicate::inbox());
    }

    pub fn show_archive(&mut self) {
        self.load(FilterPredicate::archive());
    }

    pub fn show_tag(&mut self, tag: &str) {
        self.load(TagIndex::shortcut(tag));
    }

    /// Navigate to a filtered table: the filter is replaced, never merged.
    /// Earlier loads still in flight are not cancelled.
    pub fn load(&mut self, filter: FilterPredicate) {
        self.view = View::Table;
        self.filter = filter;
        self.spawn_load();
    }

    /// Reload with the last filter, staying in the current view.
    pub fn reload(&mut self) {
        self.spawn_load();
    }

    fn spawn_load(&mut self) {
        let filter = self.filter.clone();
        tracing::info!(filter = %filter.label(), "loading experiment table");
        self.table.begin_load();
        let backend = Arc::clone(&self.backend);
        self.tasks.spawn("table", move || {
            let result = backend.experiment_table(&filter);
            Completion::TableLoaded { filter, result }
        });
    }

    // -- selection and table operations -----------------------------------

    pub fn toggle_row(&mut self, id: &ExperimentId) -> Result<bool, UserInputError> {
        self.table.toggle_selected(id)
    }

    pub fn select(&mut self, id: &ExperimentId) -> Result<(), UserInputError> {
        self.table.select(id)
    }

    pub fn toggle_all(&mut self) {
        self.table.toggle_all();
    }

    pub fn toggle_details(&mut self, id: &ExperimentId) -> Result<bool, UserInputError> {
        self.table.toggle_details(id)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        self.table.move_cursor(delta);
    }

    pub fn next_page(&mut self) {
        self.table.next_page();
    }

    pub fn prev_page(&mut self) {
        self.table.prev_page();
    }

    pub fn search(&mut self, text: &str) {
        self.table.set_search(text);
    }

    pub fn sort_by(&mut self, column: TableColumn, descending: bool) -> bool {
        let changed = self.table.sort_by(column, descending);
        if changed {
            self.save_prefs();
        }
        changed
    }

    /// Step through the sortable columns; a second press on the same column
    /// flips the direction.
    pub fn cycle_sort(&mut self) {
        let SortSpec { column, descending } = self.table.sort();
        let sortable: Vec<TableColumn> = TableColumn::ALL
            .into_iter()
            .filter(|c| c.is_sortable())
            .collect();
        let (next, desc) = if !descending {
            let pos = sortable.iter().position(|c| *c == column).unwrap_or(0);
            (sortable[(pos + 1) % sortable.len()], true)
        } else {
            (column, false)
        };
        self.sort_by(next, desc);
    }

    pub fn toggle_column(&mut self, column: TableColumn) -> bool {
        let changed = self.table.toggle_column(column);
        if changed {
            self.save_prefs();
        }
        changed
    }

    fn save_prefs(&self) {
        let Some(binding) = &self.prefs else {
            return;
        };
        let prefs: &TablePrefs = self.table.prefs();
        if let Err(err) =
            binding
                .store
                .save_table_prefs(&binding.key, prefs, OffsetDateTime::now_utc())
        {
            tracing::warn!(error = %format!("{:#}", err), "failed to save table preferences");
        }
    }

    // -- bulk actions -----------------------------------------------------

    pub fn add_tags(&mut self, text: &str) -> ActionOutcome {
        match TagList::parse(text) {
            Ok(tags) => self.request_bulk(BulkAction::AddTags(tags)),
            Err(err) => self.reject(err.into()),
        }
    }

    pub fn remove_tags(&mut self, text: &str) -> ActionOutcome {
        match TagList::parse(text) {
            Ok(tags) => self.request_bulk(BulkAction::RemoveTags(tags)),
            Err(err) => self.reject(err.into()),
        }
    }

    pub fn archive(&mut self) -> ActionOutcome {
        self.request_bulk(BulkAction::Archive)
    }

    pub fn delete_experiments(&mut self) -> ActionOutcome {
        self.request_bulk(BulkAction::Delete)
    }

    pub fn delete_files(&mut self) -> ActionOutcome {
        self.request_bulk(BulkAction::DeleteFiles)
    }

    pub fn request_bulk(&mut self, action: BulkAction) -> ActionOutcome {
        let ids = self.selected();
        if ids.is_empty() {
            return self.reject(UserInputError::NoSelection);
        }
        let plan = BulkPlan { action, ids };
        if plan.action.needs_confirmation() {
            self.pending = Some(PendingConfirmation {
                prompt: plan.action.confirmation_prompt(plan.ids.len()),
                action: PendingAction::Bulk(plan),
            });
            return ActionOutcome::NeedsConfirmation;
        }
        self.dispatch_bulk(plan);
        ActionOutcome::Started
    }

    fn dispatch_bulk(&mut self, plan: BulkPlan) {
        self.status = Some(format!("{} ({})...", plan.action, plan.ids.len()));
        let backend = Arc::clone(&self.backend);
        self.tasks
            .spawn("bulk", move || Completion::BulkFinished(plan.run(backend.as_ref())));
    }

    // -- confirmation -----------------------------------------------------

    pub fn confirm(&mut self) -> ActionOutcome {
        let Some(pending) = self.pending.take() else {
            return ActionOutcome::Started;
        };
        match pending.action {
            PendingAction::Bulk(plan) => self.dispatch_bulk(plan),
            PendingAction::Restore(id) => {
                tracing::info!(%id, "restoring source code");
                let backend = Arc::clone(&self.backend);
                self.tasks.spawn("restore", move || {
                    let result = backend.restore_source_code(&id);
                    Completion::Restored { id, result }
                });
            }
        }
        ActionOutcome::Started
    }

    /// Declining is silent and leaves everything as it was.
    pub fn decline(&mut self) {
        if let Some(pending) = self.pending.take() {
            tracing::debug!(prompt = %pending.prompt, "confirmation declined");
        }
    }

    // -- comparison -------------------------------------------------------

    pub fn compare(&mut self) -> ActionOutcome {
        let plan = match ComparePlan::from_selection(&self.selected()) {
            Ok(plan) => plan,
            Err(err) => return self.reject(err),
        };
        tracing::info!(plan = %plan.label(), "comparing");
        self.status = Some(format!("comparing {}...", plan.label()));
        let backend = Arc::clone(&self.backend);
        self.tasks.spawn("compare", move || {
            let result = match &plan {
                ComparePlan::WithLocal(id) => backend.compare_with_local(id),
                ComparePlan::Experiments(a, b) => backend.compare_experiments(a, b),
            };
            Completion::Compared { plan, result }
        });
        ActionOutcome::Started
    }

    pub fn toggle_diff_layout(&mut self) {
        self.layout = self.layout.toggled();
        if let View::Comparison(cmp) = &mut self.view {
            cmp.layout = self.layout;
            cmp.scroll = 0;
        }
    }

    // -- detail view ------------------------------------------------------

    pub fn open_detail(&mut self, id: &ExperimentId) -> ActionOutcome {
        if !self.table.rows().iter().any(|r| &r.id == id) {
            return self.reject(UserInputError::UnknownExperiment(id.clone()));
        }
        self.view = View::Detail(DetailView::loading(id.clone()));
        self.fetch_detail(id.clone());
        ActionOutcome::Started
    }

    fn fetch_detail(&mut self, id: ExperimentId) {
        let backend = Arc::clone(&self.backend);
        self.tasks.spawn("detail", move || {
            let result = backend.experiment_detail(&id);
            Completion::DetailLoaded { id, result }
        });
    }

    pub fn restore_source_code(&mut self, id: &ExperimentId) -> ActionOutcome {
        self.pending = Some(PendingConfirmation {
            prompt: restore_prompt(id),
            action: PendingAction::Restore(id.clone()),
        });
        ActionOutcome::NeedsConfirmation
    }

    /// Restore the experiment shown in the detail view.
    pub fn restore_open_experiment(&mut self) -> ActionOutcome {
        match &self.view {
            View::Detail(detail) => {
                let id = detail.id.clone();
                self.restore_source_code(&id)
            }
            _ => self.reject(UserInputError::NoOpenExperiment),
        }
    }

    pub fn save_text(&mut self, id: &ExperimentId, field: TextField, text: &str) -> ActionOutcome {
        tracing::info!(%id, field = field.as_str(), "saving text");
        let backend = Arc::clone(&self.backend);
        let id = id.clone();
        let text = text.to_string();
        self.tasks.spawn("save-text", move || {
            let result = backend.save_text(&id, field, &text);
            Completion::TextSaved { id, field, result }
        });
        ActionOutcome::Started
    }

    /// Back to the table as it was last loaded. Leaving an experiment clears
    /// the selection; leaving a comparison only drops the comparison.
    pub fn go_back(&mut self) {
        match std::mem::replace(&mut self.view, View::Table) {
            View::Detail(_) => self.table.clear_selection(),
            View::Comparison(_) | View::Table => {}
        }
    }

    // -- completions ------------------------------------------------------

    /// Apply every completion that has already arrived.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(c) = self.tasks.try_next() {
            self.apply(c);
            applied += 1;
        }
        applied
    }

    /// Block until nothing is in flight, including follow-up work such as
    /// the reload after a bulk action.
    pub fn wait_idle(&mut self) {
        while let Some(c) = self.tasks.next_blocking() {
            self.apply(c);
        }
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::TableLoaded { filter, result } => match result {
                Ok(table) => {
                    tracing::info!(filter = %filter.label(), rows = table.rows.len(), "experiment table loaded");
                    self.table.finish_load(filter, Some(table));
                }
                Err(err) => {
                    tracing::warn!(error = %format!("{:#}", err), "experiment table load failed");
                    self.table.finish_load(filter, None);
                    self.notices
                        .push_back(Notice::error(format!("Loading experiments failed: {:#}", err)));
                }
            },
            Completion::TagsLoaded(result) => match result {
                Ok(tags) => self.tags.replace(tags),
                Err(err) => {
                    tracing::warn!(error = %format!("{:#}", err), "tag list unavailable");
                }
            },
            Completion::BulkFinished(report) => {
                let summary = report.summary();
                tracing::info!(%summary, "bulk action finished");
                self.status = Some(summary);
                if report.action.touches_tags() {
                    self.refresh_tags();
                }
                self.last_bulk = Some(report);
                self.reload();
            }
            Completion::Compared { plan, result } => match result {
                Ok(result) => {
                    self.status = None;
                    self.view = View::Comparison(ComparisonView::new(plan, &result, self.layout));
                }
                Err(err) => {
                    self.status = None;
                    tracing::warn!(plan = %plan.label(), error = %format!("{:#}", err), "compare failed");
                    self.notices
                        .push_back(Notice::error(format!("Comparison failed: {:#}", err)));
                }
            },
            Completion::DetailLoaded { id, result } => {
                let View::Detail(detail) = &mut self.view else {
                    return;
                };
                if detail.id != id {
                    return;
                }
                match result {
                    Ok(html) => detail.fill(&html),
                    Err(err) => {
                        self.view = View::Table;
                        self.notices.push_back(Notice::error(format!(
                            "Loading experiment {} failed: {:#}",
                            id, err
                        )));
                    }
                }
            }
            Completion::Restored { id, result } => match result {
                Ok(()) => self.notices.push_back(Notice::info(format!("{} restored", id))),
                Err(err) => self
                    .notices
                    .push_back(Notice::error(format!("Restoring {} failed: {:#}", id, err))),
            },
            Completion::TextSaved { id, field, result } => match result {
                Ok(()) => {
                    self.status = Some(format!("{} of {} saved", field.as_str(), id.short()));
                    if matches!(&self.view, View::Detail(d) if d.id == id) {
                        self.fetch_detail(id);
                    }
                }
                Err(err) => self.notices.push_back(Notice::error(format!(
                    "Saving {} failed: {:#}",
                    field.as_str(),
                    err
                ))),
            },
            Completion::Panicked { label } => {
                tracing::warn!(task = label, "background task panicked");
                if label == "table" {
                    self.table.finish_load(self.filter.clone(), None);
                }
                self.notices
                    .push_back(Notice::error(format!("Background task '{}' crashed", label)));
            }
        }
    }

    fn reject(&mut self, err: UserInputError) -> ActionOutcome {
        tracing::debug!(error = %err, "rejected user input");
        self.notices.push_back(Notice::warning(err.to_string()));
        ActionOutcome::Rejected(err)
    }
}

#[cfg(test)]
#[path = "tests/console/console_tests.rs"]
mod tests;
