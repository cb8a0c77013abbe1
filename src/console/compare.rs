use super::UserInputError;
use crate::diff::{DiffLayout, UnifiedDiff, highlight_diff, parse_unified_diff};
use crate::html::fragment_lines;
use crate::model::{ComparisonResult, ExperimentId};

/// Which compare endpoint a selection maps to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComparePlan {
    /// One experiment against the local working copy.
    WithLocal(ExperimentId),
    /// Two experiments, in selection order.
    Experiments(ExperimentId, ExperimentId),
}

impl ComparePlan {
    pub fn from_selection(selected: &[ExperimentId]) -> Result<Self, UserInputError> {
        match selected {
            [one] => Ok(ComparePlan::WithLocal(one.clone())),
            [left, right] => Ok(ComparePlan::Experiments(left.clone(), right.clone())),
            _ => Err(UserInputError::CompareSelection {
                count: selected.len(),
            }),
        }
    }

    pub fn label(&self) -> String {
        match self {
            ComparePlan::WithLocal(id) => format!("local <-> {}", id.short()),
            ComparePlan::Experiments(a, b) => format!("{} <-> {}", a.short(), b.short()),
        }
    }
}

/// The diff part of a comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffPanel {
    /// The backend sent no diff string; nothing to render.
    Absent,
    Parsed(UnifiedDiff),
    /// The diff string could not be parsed; the summary is still shown.
    Failed(String),
}

impl DiffPanel {
    pub fn from_diff_string(diff: Option<&str>) -> Self {
        match diff {
            None => DiffPanel::Absent,
            Some(text) => match parse_unified_diff(text) {
                Ok(mut diff) => {
                    highlight_diff(&mut diff);
                    DiffPanel::Parsed(diff)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "diff rendering failed");
                    DiffPanel::Failed(err.to_string())
                }
            },
        }
    }
}

/// Content of the comparison view. Dropped entirely on "go back".
#[derive(Clone, Debug)]
pub struct ComparisonView {
    pub plan: ComparePlan,
    pub summary: Vec<String>,
    pub diff: DiffPanel,
    pub layout: DiffLayout,
    pub scroll: usize,
    /// Index of the file the view is positioned at.
    pub file: usize,
}

impl ComparisonView {
    pub fn new(plan: ComparePlan, result: &ComparisonResult, layout: DiffLayout) -> Self {
        Self {
            plan,
            summary: fragment_lines(&result.html),
            diff: DiffPanel::from_diff_string(result.diff_string.as_deref()),
            layout,
            scroll: 0,
            file: 0,
        }
    }

    pub fn file_count(&self) -> usize {
        match &self.diff {
            DiffPanel::Parsed(diff) => diff.files.len(),
            _ => 0,
        }
    }

    pub fn next_file(&mut self) {
        if self.file + 1 < self.file_count() {
            self.file += 1;
            self.scroll = 0;
        }
    }

    pub fn prev_file(&mut self) {
        if self.file > 0 {
            self.file -= 1;
            self.scroll = 0;
        }
    }
}
