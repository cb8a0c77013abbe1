use super::{DiffLine, FileChange, FileDiff, Hunk, LineKind, UnifiedDiff};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffParseError {
    #[error("line {line}: malformed hunk header {text:?}")]
    HunkHeader { line: usize, text: String },

    #[error("line {line}: hunk appears before any file header")]
    OrphanHunk { line: usize },

    #[error("line {line}: unexpected {text:?}")]
    Unexpected { line: usize, text: String },

    #[error("diff ends inside a hunk ({old} old and {new} new lines missing)")]
    Truncated { old: u32, new: u32 },
}

/// Parse `diff -u` output. An empty string yields an empty diff.
pub fn parse_unified_diff(text: &str) -> Result<UnifiedDiff, DiffParseError> {
    let mut parser = Parser::default();
    for (i, line) in text.lines().enumerate() {
        parser.feed(i + 1, line)?;
    }
    parser.finish()
}

#[derive(Default)]
struct Parser {
    files: Vec<FileDiff>,
    file: Option<FileDiff>,
    hunk: Option<OpenHunk>,
}

struct OpenHunk {
    hunk: Hunk,
    old_left: u32,
    new_left: u32,
    old_no: u32,
    new_no: u32,
}

impl OpenHunk {
    fn is_open(&self) -> bool {
        self.old_left > 0 || self.new_left > 0
    }
}

impl Parser {
    fn feed(&mut self, n: usize, line: &str) -> Result<(), DiffParseError> {
        if let Some(open) = self.hunk.as_mut() {
            if open.is_open() {
                return Self::hunk_line(open, n, line);
            }
            if line.starts_with('\\') {
                mark_no_newline(&mut open.hunk);
                return Ok(());
            }
        }

        if let Some(rest) = line.strip_prefix("diff ") {
            self.close_file();
            let (old_path, new_path) = command_paths(rest);
            self.file = Some(FileDiff {
                old_path,
                new_path,
                change: FileChange::Modified,
                hunks: Vec::new(),
            });
        } else if let Some(rest) = line.strip_prefix("Only in ") {
            self.close_file();
            let (dir, name) = rest.split_once(": ").ok_or_else(|| unexpected(n, line))?;
            self.files.push(FileDiff {
                old_path: String::new(),
                new_path: String::new(),
                change: FileChange::OnlyIn {
                    dir: dir.to_string(),
                    name: name.to_string(),
                },
                hunks: Vec::new(),
            });
        } else if let Some(rest) = line.strip_prefix("Binary files ") {
            self.close_file();
            let rest = rest.strip_suffix(" differ").ok_or_else(|| unexpected(n, line))?;
            let (old, new) = rest.split_once(" and ").ok_or_else(|| unexpected(n, line))?;
            self.files.push(FileDiff {
                old_path: old.to_string(),
                new_path: new.to_string(),
                change: FileChange::Binary,
                hunks: Vec::new(),
            });
        } else if line.starts_with("Common subdirectories: ") {
            self.close_file();
        } else if let Some(rest) = line.strip_prefix("--- ") {
            self.close_hunk();
            let starts_new = self.file.as_ref().is_none_or(|f| !f.hunks.is_empty());
            if starts_new {
                self.close_file();
                self.file = Some(FileDiff {
                    old_path: String::new(),
                    new_path: String::new(),
                    change: FileChange::Modified,
                    hunks: Vec::new(),
                });
            }
            if let Some(file) = self.file.as_mut() {
                file.old_path = header_path(rest);
            }
        } else if let Some(rest) = line.strip_prefix("+++ ") {
            let file = self.file.as_mut().ok_or_else(|| unexpected(n, line))?;
            file.new_path = header_path(rest);
        } else if line.starts_with("@@") {
            if self.file.is_none() {
                return Err(DiffParseError::OrphanHunk { line: n });
            }
            self.close_hunk();
            let hunk = parse_hunk_header(line).ok_or_else(|| DiffParseError::HunkHeader {
                line: n,
                text: line.to_string(),
            })?;
            self.hunk = Some(OpenHunk {
                old_left: hunk.old_len,
                new_left: hunk.new_len,
                old_no: hunk.old_start,
                new_no: hunk.new_start,
                hunk,
            });
        } else if !line.trim().is_empty() && !is_extended_header(line) {
            return Err(unexpected(n, line));
        }
        Ok(())
    }

    fn hunk_line(open: &mut OpenHunk, n: usize, line: &str) -> Result<(), DiffParseError> {
        if line.starts_with('\\') {
            mark_no_newline(&mut open.hunk);
            return Ok(());
        }

        // Some tools strip the lone space of empty context lines.
        let (marker, text) = match line.chars().next() {
            Some(c) => (c, &line[c.len_utf8()..]),
            None => (' ', ""),
        };
        let kind = match marker {
            ' ' => LineKind::Context,
            '+' => LineKind::Added,
            '-' => LineKind::Removed,
            _ => return Err(unexpected(n, line)),
        };

        let (old_no, new_no) = match kind {
            LineKind::Context => (Some(open.old_no), Some(open.new_no)),
            LineKind::Added => (None, Some(open.new_no)),
            LineKind::Removed => (Some(open.old_no), None),
        };
        let takes_old = kind != LineKind::Added;
        let takes_new = kind != LineKind::Removed;
        if (takes_old && open.old_left == 0) || (takes_new && open.new_left == 0) {
            return Err(unexpected(n, line));
        }
        if takes_old {
            open.old_left -= 1;
            open.old_no += 1;
        }
        if takes_new {
            open.new_left -= 1;
            open.new_no += 1;
        }

        open.hunk.lines.push(DiffLine {
            kind,
            old_no,
            new_no,
            text: text.to_string(),
            no_newline_at_eof: false,
            highlights: Vec::new(),
        });
        Ok(())
    }

    fn close_hunk(&mut self) {
        if let Some(open) = self.hunk.take()
            && let Some(file) = self.file.as_mut()
        {
            file.hunks.push(open.hunk);
        }
    }

    fn close_file(&mut self) {
        self.close_hunk();
        if let Some(file) = self.file.take() {
            self.files.push(file);
        }
    }

    fn finish(mut self) -> Result<UnifiedDiff, DiffParseError> {
        if let Some(open) = &self.hunk
            && open.is_open()
        {
            return Err(DiffParseError::Truncated {
                old: open.old_left,
                new: open.new_left,
            });
        }
        self.close_file();
        Ok(UnifiedDiff { files: self.files })
    }
}

fn unexpected(line: usize, text: &str) -> DiffParseError {
    DiffParseError::Unexpected {
        line,
        text: text.to_string(),
    }
}

fn mark_no_newline(hunk: &mut Hunk) {
    if let Some(last) = hunk.lines.last_mut() {
        last.no_newline_at_eof = true;
    }
}

fn is_extended_header(line: &str) -> bool {
    const PREFIXES: &[&str] = &[
        "index ",
        "new file mode",
        "deleted file mode",
        "old mode",
        "new mode",
        "similarity index",
        "dissimilarity index",
        "rename from",
        "rename to",
        "copy from",
        "copy to",
    ];
    PREFIXES.iter().any(|p| line.starts_with(p))
}

/// `diff -u a/x b/x` or `diff --git a/x b/x`: the last two operands.
fn command_paths(rest: &str) -> (String, String) {
    let operands: Vec<&str> = rest
        .split_whitespace()
        .filter(|t| !t.starts_with('-'))
        .collect();
    match operands.as_slice() {
        [.., old, new] => (old.to_string(), new.to_string()),
        [only] => (only.to_string(), only.to_string()),
        [] => (String::new(), String::new()),
    }
}

/// `--- path\t2019-03-04 10:11:12.000000000 +0100` minus the timestamp.
fn header_path(rest: &str) -> String {
    rest.split('\t').next().unwrap_or(rest).trim_end().to_string()
}

/// `@@ -l[,s] +l[,s] @@[ section]`
fn parse_hunk_header(line: &str) -> Option<Hunk> {
    let rest = line.strip_prefix("@@ ")?;
    let (ranges, tail) = rest.split_once(" @@")?;
    let (old, new) = ranges.split_once(' ')?;
    let (old_start, old_len) = parse_range(old.strip_prefix('-')?)?;
    let (new_start, new_len) = parse_range(new.strip_prefix('+')?)?;
    // Line numbers are counted up to start + len.
    old_start.checked_add(old_len)?;
    new_start.checked_add(new_len)?;
    let section = tail.trim();
    Some(Hunk {
        old_start,
        old_len,
        new_start,
        new_len,
        section: (!section.is_empty()).then(|| section.to_string()),
        lines: Vec::new(),
    })
}

fn parse_range(range: &str) -> Option<(u32, u32)> {
    match range.split_once(',') {
        Some((start, len)) => Some((start.parse().ok()?, len.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

#[cfg(test)]
#[path = "../tests/diff/parse_tests.rs"]
mod tests;
