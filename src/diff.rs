//! Structured view of the unified diffs returned by the compare endpoints.
//!
//! The backend runs `diff -u <left> <right>` over two source snapshots, so
//! besides ordinary file sections the text can carry `Only in ...`,
//! `Binary files ... differ` and `Common subdirectories: ...` notes.

mod highlight;
mod layout;
mod parse;

pub use self::highlight::{HighlightSpan, Language, Token, TokenKind, highlight_diff};
pub use self::layout::{DiffLayout, DiffRow, SideBySideCell, diff_rows, file_rows};
pub use self::parse::{DiffParseError, parse_unified_diff};

use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UnifiedDiff {
    pub files: Vec<FileDiff>,
}

impl UnifiedDiff {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn totals(&self) -> (usize, usize) {
        self.files
            .iter()
            .fold((0, 0), |(a, r), f| (a + f.added(), r + f.removed()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileChange {
    Modified,
    /// Present on one side only (`Only in <dir>: <name>`).
    OnlyIn { dir: String, name: String },
    Binary,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileDiff {
    pub old_path: String,
    pub new_path: String,
    pub change: FileChange,
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    pub fn display_name(&self) -> String {
        match &self.change {
            FileChange::OnlyIn { dir, name } => format!("{}/{}", dir.trim_end_matches('/'), name),
            _ if self.old_path == self.new_path || self.old_path.is_empty() => {
                self.new_path.clone()
            }
            _ if self.new_path.is_empty() => self.old_path.clone(),
            _ => format!("{} -> {}", self.old_path, self.new_path),
        }
    }

    /// Path used to pick a highlighter.
    pub fn language_path(&self) -> &str {
        match &self.change {
            FileChange::OnlyIn { name, .. } => name,
            _ => &self.new_path,
        }
    }

    pub fn added(&self) -> usize {
        self.count(LineKind::Added)
    }

    pub fn removed(&self) -> usize {
        self.count(LineKind::Removed)
    }

    fn count(&self, kind: LineKind) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| l.kind == kind)
            .count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Hunk {
    pub old_start: u32,
    pub old_len: u32,
    pub new_start: u32,
    pub new_len: u32,
    /// Text after the closing `@@`, usually an enclosing function.
    pub section: Option<String>,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    pub fn header(&self) -> String {
        let mut s = format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_len, self.new_start, self.new_len
        );
        if let Some(section) = &self.section {
            s.push(' ');
            s.push_str(section);
        }
        s
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Context,
    Added,
    Removed,
}

impl LineKind {
    pub fn marker(self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Added => '+',
            LineKind::Removed => '-',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub kind: LineKind,
    pub old_no: Option<u32>,
    pub new_no: Option<u32>,
    pub text: String,
    pub no_newline_at_eof: bool,
    /// Filled in by [`highlight_diff`].
    #[serde(skip)]
    pub highlights: Vec<HighlightSpan>,
}
