use serde::Serialize;

/// Reserved tag: experiments carrying it only show up in the archive view.
pub const ARCHIVE_TAG: &str = "archive";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagParseError {
    #[error("enter at least one tag")]
    Empty,

    #[error("invalid tag {0:?}: tags cannot contain '/' or control characters")]
    InvalidToken(String),
}

/// A validated, non-empty list of tag names.
///
/// Parsed from free text: tokens are separated by whitespace, duplicates
/// collapse onto their first occurrence. Serializes as a plain JSON array,
/// which is the body shape `/add_tags` and `/remove_tags` expect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagList(Vec<String>);

impl TagList {
    pub fn parse(text: &str) -> Result<Self, TagParseError> {
        let mut tags: Vec<String> = Vec::new();
        for token in text.split_whitespace() {
            if !is_valid_tag(token) {
                return Err(TagParseError::InvalidToken(token.to_string()));
            }
            if !tags.iter().any(|t| t == token) {
                tags.push(token.to_string());
            }
        }
        if tags.is_empty() {
            return Err(TagParseError::Empty);
        }
        Ok(Self(tags))
    }

    pub fn archive() -> Self {
        Self(vec![ARCHIVE_TAG.to_string()])
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn joined(&self) -> String {
        self.0.join(" ")
    }
}

fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty() && !tag.chars().any(|c| c.is_control() || c == '/')
}
