use std::fmt;

use crate::model::{ExperimentId, TagList};
use crate::remote::Backend;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BulkAction {
    AddTags(TagList),
    RemoveTags(TagList),
    /// Add-tags with the single tag `archive`.
    Archive,
    Delete,
    DeleteFiles,
}

impl BulkAction {
    pub fn needs_confirmation(&self) -> bool {
        matches!(
            self,
            BulkAction::Archive | BulkAction::Delete | BulkAction::DeleteFiles
        )
    }

    /// Whether the action can change the set of known tags.
    pub fn touches_tags(&self) -> bool {
        matches!(
            self,
            BulkAction::AddTags(_) | BulkAction::RemoveTags(_) | BulkAction::Archive
        )
    }

    pub fn confirmation_prompt(&self, count: usize) -> String {
        let marked = if count == 1 {
            "the marked experiment".to_string()
        } else {
            format!("all {} marked experiments", count)
        };
        match self {
            BulkAction::Archive => format!("Do you want to archive {}?", marked),
            BulkAction::Delete => format!("Do you want to delete {}?", marked),
            BulkAction::DeleteFiles => {
                format!("Do you want to delete all files associated with {}?", marked)
            }
            BulkAction::AddTags(tags) => format!("Add tags [{}] to {}?", tags.joined(), marked),
            BulkAction::RemoveTags(tags) => {
                format!("Remove tags [{}] from {}?", tags.joined(), marked)
            }
        }
    }

    fn apply(&self, backend: &dyn Backend, id: &ExperimentId) -> anyhow::Result<()> {
        match self {
            BulkAction::AddTags(tags) => backend.add_tags(id, tags),
            BulkAction::RemoveTags(tags) => backend.remove_tags(id, tags),
            BulkAction::Archive => backend.add_tags(id, &TagList::archive()),
            BulkAction::Delete => backend.delete_experiment(id),
            BulkAction::DeleteFiles => backend.delete_files(id),
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BulkAction::AddTags(tags) => write!(f, "add tags [{}]", tags.joined()),
            BulkAction::RemoveTags(tags) => write!(f, "remove tags [{}]", tags.joined()),
            BulkAction::Archive => f.write_str("archive"),
            BulkAction::Delete => f.write_str("delete"),
            BulkAction::DeleteFiles => f.write_str("delete files"),
        }
    }
}

/// An action bound to the ids that were selected when it was requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkPlan {
    pub action: BulkAction,
    pub ids: Vec<ExperimentId>,
}

#[derive(Clone, Debug)]
pub struct BulkOutcome {
    pub id: ExperimentId,
    pub error: Option<String>,
}

#[derive(Clone, Debug)]
pub struct BulkReport {
    pub action: BulkAction,
    pub outcomes: Vec<BulkOutcome>,
}

impl BulkReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_none()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &BulkOutcome> {
        self.outcomes.iter().filter(|o| o.error.is_some())
    }

    pub fn summary(&self) -> String {
        let failed = self.failed().count();
        if failed == 0 {
            format!("{}: {} succeeded", self.action, self.succeeded())
        } else {
            format!(
                "{}: {} succeeded, {} failed",
                self.action,
                self.succeeded(),
                failed
            )
        }
    }
}

impl BulkPlan {
    /// Send one request per id, all at once, and wait for every one of them.
    /// A failing request never stops the others.
    pub fn run(&self, backend: &dyn Backend) -> BulkReport {
        tracing::info!(action = %self.action, count = self.ids.len(), "bulk action started");
        let outcomes = std::thread::scope(|scope| {
            let handles: Vec<_> = self
                .ids
                .iter()
                .map(|id| (id, scope.spawn(move || self.action.apply(backend, id))))
                .collect();
            handles
                .into_iter()
                .map(|(id, handle)| {
                    let error = match handle.join() {
                        Ok(Ok(())) => None,
                        Ok(Err(err)) => Some(format!("{:#}", err)),
                        Err(_) => Some("request thread panicked".to_string()),
                    };
                    if let Some(error) = &error {
                        tracing::warn!(%id, action = %self.action, %error, "bulk request failed");
                    }
                    BulkOutcome {
                        id: id.clone(),
                        error,
                    }
                })
                .collect()
        });
        BulkReport {
            action: self.action.clone(),
            outcomes,
        }
    }
}
