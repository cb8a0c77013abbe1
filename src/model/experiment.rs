use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;
use time::macros::format_description;

use super::columns::TableColumn;
use super::ids::ExperimentId;

/// One row of the experiment table, addressed by field name.
///
/// The long-form fields (`description`, `conclusion`, `arguments`,
/// `exception`) arrive with the table load so the inline details panel never
/// needs a round trip.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentRow {
    pub id: ExperimentId,
    pub title: Option<String>,
    pub filename: Option<String>,
    pub duration: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub tags: Vec<String>,
    pub name: Option<String>,
    pub file_space: Option<String>,
    pub git_commit: Option<String>,
    pub description: Option<String>,
    pub conclusion: Option<String>,
    pub arguments: Option<String>,
    pub exception: Option<String>,

    /// Scalar and parameter columns, keyed by header.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl ExperimentRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ExperimentId::new(id),
            ..Self::default()
        }
    }

    pub fn start_time(&self) -> Option<PrimitiveDateTime> {
        parse_table_time(self.start.as_deref()?)
    }

    pub fn end_time(&self) -> Option<PrimitiveDateTime> {
        parse_table_time(self.end.as_deref()?)
    }

    pub fn column(&self, column: TableColumn) -> Option<String> {
        match column {
            TableColumn::Id => Some(self.id.short()),
            TableColumn::Title => self.title.clone(),
            TableColumn::Filename => self.filename.clone(),
            TableColumn::Duration => self.duration.clone(),
            TableColumn::Start => self.start.clone(),
            TableColumn::End => self.end.clone(),
            TableColumn::Tags => {
                if self.tags.is_empty() {
                    None
                } else {
                    Some(self.tags.join(" "))
                }
            }
            TableColumn::Name => self.name.clone(),
            TableColumn::FileSpace => self.file_space.clone(),
            TableColumn::GitCommit => self.git_commit.clone(),
        }
    }

    /// Fields shown by the inline details panel, in display order.
    pub fn detail_fields(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("Title", self.title.as_deref()),
            ("Description", self.description.as_deref()),
            ("Conclusion", self.conclusion.as_deref()),
            ("Arguments", self.arguments.as_deref()),
            ("Exception", self.exception.as_deref()),
        ]
    }

    /// Case-insensitive quick search over id, title, filename and tags.
    /// `needle` must already be lowercase.
    pub fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let hit = |s: &str| s.to_lowercase().contains(needle);
        hit(self.id.as_str())
            || self.title.as_deref().is_some_and(hit)
            || self.filename.as_deref().is_some_and(hit)
            || self.name.as_deref().is_some_and(hit)
            || self.tags.iter().any(|t| hit(t.as_str()))
    }
}

/// Parsed `/experiment-table` response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentTable {
    /// "Updated at" stamp rendered by the backend above the table.
    pub updated_at: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<ExperimentRow>,
}

impl ExperimentTable {
    pub fn contains(&self, id: &ExperimentId) -> bool {
        self.rows.iter().any(|r| &r.id == id)
    }

    pub fn row(&self, id: &ExperimentId) -> Option<&ExperimentRow> {
        self.rows.iter().find(|r| &r.id == id)
    }
}

/// Free-text fields of an experiment that `/save-text` accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextField {
    Title,
    Description,
    Conclusion,
}

impl TextField {
    pub const ALL: [TextField; 3] = [
        TextField::Title,
        TextField::Description,
        TextField::Conclusion,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TextField::Title => "title",
            TextField::Description => "description",
            TextField::Conclusion => "conclusion",
        }
    }

    pub fn current<'a>(self, row: &'a ExperimentRow) -> Option<&'a str> {
        match self {
            TextField::Title => row.title.as_deref(),
            TextField::Description => row.description.as_deref(),
            TextField::Conclusion => row.conclusion.as_deref(),
        }
    }
}

impl std::str::FromStr for TextField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown field {:?} (expected title, description or conclusion)",
                    s
                )
            })
    }
}

fn parse_table_time(s: &str) -> Option<PrimitiveDateTime> {
    let fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    PrimitiveDateTime::parse(s.trim(), &fmt).ok()
}
