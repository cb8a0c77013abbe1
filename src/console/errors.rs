use crate::model::{ExperimentId, TagParseError};

/// Problems with what the user asked for, caught before any request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserInputError {
    #[error("select at least one experiment")]
    NoSelection,

    #[error("select one or two experiments to compare ({count} selected)")]
    CompareSelection { count: usize },

    #[error(transparent)]
    Tags(#[from] TagParseError),

    #[error("experiment {0} is not in the loaded table")]
    UnknownExperiment(ExperimentId),

    #[error("the experiment table has not been loaded yet")]
    TableNotLoaded,

    #[error("no experiment is open")]
    NoOpenExperiment,
}
