use crate::model::FilterPredicate;

/// Known tags, shown as filter shortcuts.
///
/// Loading is best effort: a failed fetch leaves the list as it was and is
/// only logged.
#[derive(Clone, Debug, Default)]
pub struct TagIndex {
    tags: Vec<String>,
    loaded: bool,
}

impl TagIndex {
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub(super) fn replace(&mut self, mut tags: Vec<String>) {
        tags.retain(|t| !t.trim().is_empty());
        tags.sort();
        tags.dedup();
        self.tags = tags;
        self.loaded = true;
    }

    /// The load a shortcut click issues.
    pub fn shortcut(tag: &str) -> FilterPredicate {
        FilterPredicate::tag_shortcut(tag)
    }
}
