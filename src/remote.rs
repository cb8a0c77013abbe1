//! HTTP client for the experiment recorder dashboard backend.

use anyhow::{Context, Result};

use crate::model::{ComparisonResult, ExperimentId, ExperimentTable, FilterPredicate, TagList, TextField};

mod http_client;
use self::http_client::{path_segment, with_retries};

mod operations;

/// Everything the console asks of the backend.
///
/// `RemoteClient` is the real implementation; tests substitute in-memory
/// backends behind the same trait.
pub trait Backend: Send + Sync {
    /// `POST /experiment-table`
    fn experiment_table(&self, filter: &FilterPredicate) -> Result<ExperimentTable>;
    /// `GET /alltags`
    fn all_tags(&self) -> Result<Vec<String>>;
    /// `POST /add_tags/{id}`
    fn add_tags(&self, id: &ExperimentId, tags: &TagList) -> Result<()>;
    /// `POST /remove_tags/{id}`
    fn remove_tags(&self, id: &ExperimentId, tags: &TagList) -> Result<()>;
    /// `DELETE /experiment/{id}`
    fn delete_experiment(&self, id: &ExperimentId) -> Result<()>;
    /// `GET /deletefiles/{id}`
    fn delete_files(&self, id: &ExperimentId) -> Result<()>;
    /// `GET /compare-with-local/{id}`
    fn compare_with_local(&self, id: &ExperimentId) -> Result<ComparisonResult>;
    /// `POST /compare-experiments`
    fn compare_experiments(
        &self,
        left: &ExperimentId,
        right: &ExperimentId,
    ) -> Result<ComparisonResult>;
    /// `GET /experiment/{id}`
    fn experiment_detail(&self, id: &ExperimentId) -> Result<String>;
    /// `GET /restore-source-code/{id}`
    fn restore_source_code(&self, id: &ExperimentId) -> Result<()>;
    /// `POST /save-text/{id}/{field}`
    fn save_text(&self, id: &ExperimentId, field: TextField, text: &str) -> Result<()>;
}

pub struct RemoteClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl RemoteClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("exprec")
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
