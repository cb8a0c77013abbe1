use serde::{Deserialize, Serialize};

/// Columns of the experiment table that the console knows by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableColumn {
    Id,
    Title,
    Filename,
    Duration,
    Start,
    End,
    Tags,
    Name,
    FileSpace,
    GitCommit,
}

impl TableColumn {
    pub const ALL: [TableColumn; 10] = [
        TableColumn::Id,
        TableColumn::Title,
        TableColumn::Filename,
        TableColumn::Duration,
        TableColumn::Start,
        TableColumn::End,
        TableColumn::Tags,
        TableColumn::Name,
        TableColumn::FileSpace,
        TableColumn::GitCommit,
    ];

    /// Header text as rendered by the backend.
    pub fn header(self) -> &'static str {
        match self {
            TableColumn::Id => "ID",
            TableColumn::Title => "Title",
            TableColumn::Filename => "Filename",
            TableColumn::Duration => "Duration",
            TableColumn::Start => "Start",
            TableColumn::End => "End",
            TableColumn::Tags => "Tags",
            TableColumn::Name => "Name",
            TableColumn::FileSpace => "File space",
            TableColumn::GitCommit => "Git commit",
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.header() == header)
    }

    pub fn is_sortable(self) -> bool {
        matches!(
            self,
            TableColumn::Id
                | TableColumn::Title
                | TableColumn::Filename
                | TableColumn::Duration
                | TableColumn::Start
                | TableColumn::End
                | TableColumn::Tags
        )
    }

    pub fn hidden_by_default(self) -> bool {
        matches!(self, TableColumn::End | TableColumn::Name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: TableColumn,
    pub descending: bool,
}

impl Default for SortSpec {
    /// Most recent experiments first.
    fn default() -> Self {
        Self {
            column: TableColumn::Start,
            descending: true,
        }
    }
}
