use crate::html::fragment_lines;
use crate::model::ExperimentId;

/// The single-experiment view.
#[derive(Clone, Debug)]
pub struct DetailView {
    pub id: ExperimentId,
    pub lines: Vec<String>,
    pub loading: bool,
    pub scroll: usize,
}

impl DetailView {
    pub(super) fn loading(id: ExperimentId) -> Self {
        Self {
            id,
            lines: Vec::new(),
            loading: true,
            scroll: 0,
        }
    }

    pub(super) fn fill(&mut self, html: &str) {
        self.lines = fragment_lines(html);
        self.loading = false;
        self.scroll = self.scroll.min(self.lines.len().saturating_sub(1));
    }
}

pub fn restore_prompt(id: &ExperimentId) -> String {
    format!(
        "Do you want to restore the source code from experiment {}?\nThis will overwrite all local code.",
        id
    )
}
