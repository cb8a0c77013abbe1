use scraper::{ElementRef, Html};

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "blockquote", "div", "dl", "dt", "dd", "fieldset", "figure", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p",
    "pre", "section", "table", "tbody", "thead", "tr", "ul",
];

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "button", "template", "noscript"];

/// Render an HTML fragment as plain text lines.
///
/// Block elements start new lines, `<pre>` keeps its own line breaks, table
/// cells are separated by two spaces. Buttons, scripts and styles are dropped.
pub fn fragment_lines(html: &str) -> Vec<String> {
    let doc = Html::parse_fragment(html);
    let mut sink = LineSink::default();
    walk(doc.root_element(), false, &mut sink);
    sink.finish()
}

/// Collapsed text of a single element, used for table cells.
pub(super) fn element_text(el: ElementRef<'_>) -> String {
    let mut sink = LineSink::default();
    walk(el, false, &mut sink);
    sink.finish().join("\n")
}

#[derive(Default)]
struct LineSink {
    lines: Vec<String>,
    current: String,
    pending_space: bool,
}

impl LineSink {
    fn push_text(&mut self, text: &str, preformatted: bool) {
        if preformatted {
            let mut parts = text.split('\n');
            if let Some(first) = parts.next() {
                self.current.push_str(first);
            }
            for part in parts {
                self.break_line_keep_empty();
                self.current.push_str(part);
            }
            self.pending_space = false;
            return;
        }

        for (i, word) in text.split_whitespace().enumerate() {
            let starts_with_space = i > 0 || text.starts_with(char::is_whitespace);
            if !self.current.is_empty() && (self.pending_space || starts_with_space) {
                self.current.push(' ');
            }
            self.current.push_str(word);
            self.pending_space = false;
        }
        if text.ends_with(char::is_whitespace) && !self.current.is_empty() {
            self.pending_space = true;
        }
    }

    fn separate_cell(&mut self) {
        if !self.current.is_empty() {
            self.current.push_str("  ");
        }
        self.pending_space = false;
    }

    fn break_line(&mut self) {
        if !self.current.trim().is_empty() {
            let line = std::mem::take(&mut self.current);
            self.lines.push(line.trim_end().to_string());
        } else {
            self.current.clear();
        }
        self.pending_space = false;
    }

    fn break_line_keep_empty(&mut self) {
        let line = std::mem::take(&mut self.current);
        self.lines.push(line.trim_end().to_string());
        self.pending_space = false;
    }

    fn finish(mut self) -> Vec<String> {
        self.break_line();
        while self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

fn walk(el: ElementRef<'_>, preformatted: bool, sink: &mut LineSink) {
    let name = el.value().name();
    if SKIPPED_ELEMENTS.contains(&name) {
        return;
    }
    if name == "br" {
        sink.break_line_keep_empty();
        return;
    }

    let block = BLOCK_ELEMENTS.contains(&name);
    let pre = preformatted || name == "pre";
    if block {
        sink.break_line();
    }
    if name == "td" || name == "th" {
        sink.separate_cell();
    }

    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            walk(child_el, pre, sink);
        } else if let Some(text) = child.value().as_text() {
            sink.push_text(text, pre);
        }
    }

    if block {
        sink.break_line();
    }
}
