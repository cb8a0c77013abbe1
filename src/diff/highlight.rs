use std::path::Path;

use tree_sitter::{Node, Parser};

use super::{DiffLine, LineKind, UnifiedDiff};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
    Python,
    Rust,
    TypeScript,
    Tsx,
    Go,
}

impl Language {
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = Path::new(path).extension()?.to_str()?;
        match ext {
            "py" | "pyw" | "pyi" => Some(Language::Python),
            "rs" => Some(Language::Rust),
            "ts" | "js" | "mjs" | "cjs" => Some(Language::TypeScript),
            "tsx" | "jsx" => Some(Language::Tsx),
            "go" => Some(Language::Go),
            _ => None,
        }
    }

    fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Language::Go => tree_sitter_go::LANGUAGE.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Plain,
    Keyword,
    String,
    Number,
    Comment,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// A highlighted byte range of [`DiffLine::text`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighlightSpan {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

#[derive(Clone, Copy)]
enum Side {
    Old,
    New,
}

impl Side {
    /// Lines that make up this side's text.
    fn includes(self, kind: LineKind) -> bool {
        match self {
            Side::Old => kind != LineKind::Added,
            Side::New => kind != LineKind::Removed,
        }
    }

    /// Lines whose highlights come from this side. Context lines take the
    /// new side.
    fn owns(self, kind: LineKind) -> bool {
        match self {
            Side::Old => kind == LineKind::Removed,
            Side::New => kind != LineKind::Removed,
        }
    }
}

/// Fill in [`DiffLine::highlights`] for every file with a known grammar.
///
/// Each hunk is parsed twice, once as the old text and once as the new, so
/// strings and comments spanning several lines are classified as a whole.
pub fn highlight_diff(diff: &mut UnifiedDiff) {
    for file in &mut diff.files {
        let Some(language) = Language::from_path(file.language_path()) else {
            continue;
        };
        let mut parser = Parser::new();
        if let Err(err) = parser.set_language(&language.tree_sitter_language()) {
            tracing::warn!(?language, error = %err, "highlighter unavailable");
            continue;
        }
        for hunk in &mut file.hunks {
            highlight_side(&mut parser, &mut hunk.lines, Side::Old);
            highlight_side(&mut parser, &mut hunk.lines, Side::New);
        }
    }
}

fn highlight_side(parser: &mut Parser, lines: &mut [DiffLine], side: Side) {
    let members: Vec<usize> = (0..lines.len())
        .filter(|&i| side.includes(lines[i].kind))
        .collect();
    if !members.iter().any(|&i| side.owns(lines[i].kind)) {
        return;
    }

    let mut source = String::new();
    let mut starts = Vec::with_capacity(members.len());
    for &i in &members {
        starts.push(source.len());
        source.push_str(&lines[i].text);
        source.push('\n');
    }
    let Some(tree) = parser.parse(&source, None) else {
        return;
    };
    let mut spans = Vec::new();
    collect_spans(tree.root_node(), &mut spans);

    for (&i, &start) in members.iter().zip(&starts) {
        let line = &mut lines[i];
        if !side.owns(line.kind) {
            continue;
        }
        let end = start + line.text.len();
        line.highlights = spans
            .iter()
            .filter_map(|span| {
                let s = span.start.max(start);
                let e = span.end.min(end);
                (s < e).then(|| HighlightSpan {
                    kind: span.kind,
                    start: s - start,
                    end: e - start,
                })
            })
            .collect();
    }
}

/// Classified nodes in document order. Nothing below a classified node is
/// visited, so the spans never overlap.
fn collect_spans(root: Node<'_>, out: &mut Vec<HighlightSpan>) {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        let kind = classify(node);
        if kind.is_none() && cursor.goto_first_child() {
            continue;
        }
        if let Some(kind) = kind
            && node.start_byte() < node.end_byte()
        {
            out.push(HighlightSpan {
                kind,
                start: node.start_byte(),
                end: node.end_byte(),
            });
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

fn classify(node: Node<'_>) -> Option<TokenKind> {
    let kind = node.kind();
    match kind {
        "comment" | "line_comment" | "block_comment" => Some(TokenKind::Comment),
        "string" | "string_literal" | "raw_string_literal" | "char_literal"
        | "template_string" | "interpreted_string_literal" | "rune_literal" => {
            Some(TokenKind::String)
        }
        "integer" | "float" | "integer_literal" | "float_literal" | "number" | "int_literal"
        | "imaginary_literal" => Some(TokenKind::Number),
        "true" | "false" | "none" | "self" | "null" | "undefined" | "nil" | "iota" => {
            Some(TokenKind::Keyword)
        }
        // Anonymous word tokens are the grammar's keywords.
        _ if !node.is_named()
            && node.child_count() == 0
            && !kind.is_empty()
            && kind.chars().all(|c| c.is_ascii_lowercase() || c == '_') =>
        {
            Some(TokenKind::Keyword)
        }
        _ => None,
    }
}

impl DiffLine {
    /// The line's text split at its highlight spans; gaps are plain.
    pub fn tokens(&self) -> Vec<Token<'_>> {
        let mut out = Vec::new();
        let mut at = 0;
        for span in &self.highlights {
            let (Some(gap), Some(text)) = (
                self.text.get(at..span.start),
                self.text.get(span.start..span.end),
            ) else {
                continue;
            };
            if !gap.is_empty() {
                out.push(Token {
                    kind: TokenKind::Plain,
                    text: gap,
                });
            }
            out.push(Token {
                kind: span.kind,
                text,
            });
            at = span.end;
        }
        if let Some(rest) = self.text.get(at..)
            && !rest.is_empty()
        {
            out.push(Token {
                kind: TokenKind::Plain,
                text: rest,
            });
        }
        out
    }
}
