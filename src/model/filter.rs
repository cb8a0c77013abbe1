use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::tags::ARCHIVE_TAG;

/// Tag-based inclusion/exclusion predicate sent with every table load.
///
/// An experiment passes when it carries none of the blacklisted tags and,
/// if the whitelist is non-empty, at least one whitelisted tag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPredicate {
    pub whitelist: BTreeSet<String>,
    pub blacklist: BTreeSet<String>,
}

impl FilterPredicate {
    pub fn new<W, B>(whitelist: W, blacklist: B) -> Self
    where
        W: IntoIterator,
        W::Item: Into<String>,
        B: IntoIterator,
        B::Item: Into<String>,
    {
        Self {
            whitelist: whitelist.into_iter().map(Into::into).collect(),
            blacklist: blacklist.into_iter().map(Into::into).collect(),
        }
    }

    /// Default listing: everything that is not archived.
    pub fn inbox() -> Self {
        Self {
            whitelist: BTreeSet::new(),
            blacklist: BTreeSet::from([ARCHIVE_TAG.to_string()]),
        }
    }

    pub fn archive() -> Self {
        Self {
            whitelist: BTreeSet::from([ARCHIVE_TAG.to_string()]),
            blacklist: BTreeSet::new(),
        }
    }

    /// Tag shortcuts never surface archived experiments.
    pub fn tag_shortcut(tag: &str) -> Self {
        Self {
            whitelist: BTreeSet::from([tag.to_string()]),
            blacklist: BTreeSet::from([ARCHIVE_TAG.to_string()]),
        }
    }

    pub fn matches<'a>(&self, tags: impl IntoIterator<Item = &'a str> + Clone) -> bool {
        if tags.clone().into_iter().any(|t| self.blacklist.contains(t)) {
            return false;
        }
        if self.whitelist.is_empty() {
            return true;
        }
        tags.into_iter().any(|t| self.whitelist.contains(t))
    }

    pub fn label(&self) -> String {
        if *self == Self::inbox() {
            return "inbox".to_string();
        }
        if *self == Self::archive() {
            return "archive".to_string();
        }
        if self.whitelist.len() == 1 && *self == Self::tag_shortcut(self.first_whitelisted()) {
            return format!("tag:{}", self.first_whitelisted());
        }
        let join = |s: &BTreeSet<String>| s.iter().cloned().collect::<Vec<_>>().join(",");
        format!(
            "whitelist=[{}] blacklist=[{}]",
            join(&self.whitelist),
            join(&self.blacklist)
        )
    }

    fn first_whitelisted(&self) -> &str {
        self.whitelist.iter().next().map(String::as_str).unwrap_or("")
    }
}
