//! Endpoint calls, grouped by what they touch.

use anyhow::{Context, Result};

use super::{Backend, RemoteClient, path_segment, with_retries};
use crate::html::parse_experiment_table;
use crate::model::{
    ComparisonResult, ExperimentId, ExperimentTable, FilterPredicate, TagList, TextField,
};

mod compare;
mod listing;
mod mutations;

impl Backend for RemoteClient {
    fn experiment_table(&self, filter: &FilterPredicate) -> Result<ExperimentTable> {
        RemoteClient::experiment_table(self, filter)
    }

    fn all_tags(&self) -> Result<Vec<String>> {
        RemoteClient::all_tags(self)
    }

    fn add_tags(&self, id: &ExperimentId, tags: &TagList) -> Result<()> {
        self.post_tags("/add_tags", id, tags)
    }

    fn remove_tags(&self, id: &ExperimentId, tags: &TagList) -> Result<()> {
        self.post_tags("/remove_tags", id, tags)
    }

    fn delete_experiment(&self, id: &ExperimentId) -> Result<()> {
        RemoteClient::delete_experiment(self, id)
    }

    fn delete_files(&self, id: &ExperimentId) -> Result<()> {
        RemoteClient::delete_files(self, id)
    }

    fn compare_with_local(&self, id: &ExperimentId) -> Result<ComparisonResult> {
        RemoteClient::compare_with_local(self, id)
    }

    fn compare_experiments(
        &self,
        left: &ExperimentId,
        right: &ExperimentId,
    ) -> Result<ComparisonResult> {
        RemoteClient::compare_experiments(self, left, right)
    }

    fn experiment_detail(&self, id: &ExperimentId) -> Result<String> {
        RemoteClient::experiment_detail(self, id)
    }

    fn restore_source_code(&self, id: &ExperimentId) -> Result<()> {
        RemoteClient::restore_source_code(self, id)
    }

    fn save_text(&self, id: &ExperimentId, field: TextField, text: &str) -> Result<()> {
        RemoteClient::save_text(self, id, field, text)
    }
}
