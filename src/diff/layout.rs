use super::{DiffLine, FileDiff, Hunk, LineKind, UnifiedDiff};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiffLayout {
    #[default]
    Inline,
    SideBySide,
}

impl DiffLayout {
    pub fn toggled(self) -> Self {
        match self {
            DiffLayout::Inline => DiffLayout::SideBySide,
            DiffLayout::SideBySide => DiffLayout::Inline,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DiffLayout::Inline => "inline",
            DiffLayout::SideBySide => "side-by-side",
        }
    }
}

/// One half of a side-by-side row; `None` is a filler cell.
pub type SideBySideCell<'a> = Option<&'a DiffLine>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffRow<'a> {
    File(&'a FileDiff),
    Hunk(&'a Hunk),
    Line(&'a DiffLine),
    Pair {
        left: SideBySideCell<'a>,
        right: SideBySideCell<'a>,
    },
}

/// Flatten a diff into display rows.
///
/// Side by side, a run of removed lines is paired line by line with the run
/// of added lines that follows it; the shorter side is padded.
pub fn diff_rows(diff: &UnifiedDiff, layout: DiffLayout) -> Vec<DiffRow<'_>> {
    let mut rows = Vec::new();
    for file in &diff.files {
        rows.push(DiffRow::File(file));
        push_hunks(file, layout, &mut rows);
    }
    rows
}

/// Rows of a single file, without the leading file row.
pub fn file_rows(file: &FileDiff, layout: DiffLayout) -> Vec<DiffRow<'_>> {
    let mut rows = Vec::new();
    push_hunks(file, layout, &mut rows);
    rows
}

fn push_hunks<'a>(file: &'a FileDiff, layout: DiffLayout, rows: &mut Vec<DiffRow<'a>>) {
    for hunk in &file.hunks {
        rows.push(DiffRow::Hunk(hunk));
        match layout {
            DiffLayout::Inline => rows.extend(hunk.lines.iter().map(DiffRow::Line)),
            DiffLayout::SideBySide => pair_lines(&hunk.lines, rows),
        }
    }
}

fn pair_lines<'a>(lines: &'a [DiffLine], rows: &mut Vec<DiffRow<'a>>) {
    let mut removed: Vec<&DiffLine> = Vec::new();
    let mut added: Vec<&DiffLine> = Vec::new();

    for line in lines {
        match line.kind {
            LineKind::Removed => {
                if !added.is_empty() {
                    flush(&mut removed, &mut added, rows);
                }
                removed.push(line);
            }
            LineKind::Added => added.push(line),
            LineKind::Context => {
                flush(&mut removed, &mut added, rows);
                rows.push(DiffRow::Pair {
                    left: Some(line),
                    right: Some(line),
                });
            }
        }
    }
    flush(&mut removed, &mut added, rows);
}

fn flush<'a>(
    removed: &mut Vec<&'a DiffLine>,
    added: &mut Vec<&'a DiffLine>,
    rows: &mut Vec<DiffRow<'a>>,
) {
    let n = removed.len().max(added.len());
    for i in 0..n {
        rows.push(DiffRow::Pair {
            left: removed.get(i).copied(),
            right: added.get(i).copied(),
        });
    }
    removed.clear();
    added.clear();
}
