use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::console::{ComparisonView, DiffPanel};
use crate::diff::{DiffLayout, DiffLine, DiffRow, FileDiff, LineKind, TokenKind, file_rows};

use super::super::{RenderCtx, View, render_view_chrome};

pub(in crate::tui_shell) struct ComparisonPane<'a> {
    pub(in crate::tui_shell) view: &'a ComparisonView,
}

fn token_style(kind: TokenKind) -> Style {
    match kind {
        TokenKind::Plain => Style::default(),
        TokenKind::Keyword => Style::default().fg(Color::Magenta),
        TokenKind::String => Style::default().fg(Color::Green),
        TokenKind::Number => Style::default().fg(Color::Cyan),
        TokenKind::Comment => Style::default().fg(Color::DarkGray),
    }
}

fn line_bg(kind: LineKind) -> Style {
    match kind {
        LineKind::Context => Style::default(),
        LineKind::Added => Style::default().bg(Color::Rgb(0, 50, 0)),
        LineKind::Removed => Style::default().bg(Color::Rgb(60, 0, 0)),
    }
}

fn line_no(no: Option<u32>) -> String {
    no.map_or_else(|| "    ".to_string(), |n| format!("{:>4}", n))
}

/// Gutter, marker and highlighted text of one diff line.
fn line_spans(line: &DiffLine, width: Option<usize>) -> Vec<Span<'_>> {
    let bg = line_bg(line.kind);
    let mut spans = vec![
        Span::styled(
            format!("{} {} ", line_no(line.old_no), line_no(line.new_no)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(line.kind.marker().to_string(), bg),
    ];
    let mut used = 0;
    for token in line.tokens() {
        let text = match width {
            Some(w) => {
                let room = w.saturating_sub(used);
                if room == 0 {
                    break;
                }
                let part: String = token.text.chars().take(room).collect();
                used += part.chars().count();
                part
            }
            None => token.text.to_string(),
        };
        spans.push(Span::styled(text, token_style(token.kind).patch(bg)));
    }
    if let Some(w) = width
        && used < w
    {
        spans.push(Span::styled(" ".repeat(w - used), bg));
    }
    if line.no_newline_at_eof {
        spans.push(Span::styled(
            " \\ no newline at end of file",
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans
}

fn file_lines<'a>(file: &'a FileDiff, layout: DiffLayout, half: usize) -> Vec<Line<'a>> {
    file_rows(file, layout)
        .into_iter()
        .map(|row| match row {
            DiffRow::File(f) => Line::styled(
                f.display_name(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            DiffRow::Hunk(h) => Line::styled(h.header(), Style::default().fg(Color::Cyan)),
            DiffRow::Line(l) => Line::from(line_spans(l, None)),
            DiffRow::Pair { left, right } => {
                let mut spans = match left {
                    Some(l) => line_spans(l, Some(half)),
                    None => vec![Span::raw(" ".repeat(half + 11))],
                };
                spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
                if let Some(r) = right {
                    spans.extend(line_spans(r, Some(half)));
                }
                Line::from(spans)
            }
        })
        .collect()
}

impl ComparisonPane<'_> {
    fn render_diff(&self, frame: &mut ratatui::Frame, area: Rect) {
        let diff = match &self.view.diff {
            DiffPanel::Absent => return,
            DiffPanel::Failed(err) => {
                frame.render_widget(
                    Paragraph::new(Line::styled(
                        format!("Could not render the diff: {}", err),
                        Style::default().fg(Color::Red),
                    ))
                    .wrap(Wrap { trim: false }),
                    area,
                );
                return;
            }
            DiffPanel::Parsed(diff) => diff,
        };
        if diff.files.is_empty() {
            frame.render_widget(Paragraph::new("no differences"), area);
            return;
        }

        let parts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(28), Constraint::Min(0)])
            .split(area);

        let files: Vec<Line> = diff
            .files
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let text = format!("+{} -{} {}", f.added(), f.removed(), f.display_name());
                if i == self.view.file {
                    Line::styled(text, Style::default().fg(Color::Black).bg(Color::Cyan))
                } else {
                    Line::from(text)
                }
            })
            .collect();
        frame.render_widget(
            Paragraph::new(files).block(Block::default().borders(Borders::RIGHT)),
            parts[0],
        );

        let Some(file) = diff.files.get(self.view.file) else {
            return;
        };
        // Two halves, each with an 11-column gutter, around a 3-column divider.
        let half = (parts[1].width as usize).saturating_sub(3) / 2;
        let half = half.saturating_sub(11);
        let lines = file_lines(file, self.view.layout, half);
        let header = Line::styled(
            format!("{}  ({})", file.display_name(), self.view.layout.label()),
            Style::default().add_modifier(Modifier::BOLD),
        );
        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(parts[1]);
        frame.render_widget(Paragraph::new(header), body[0]);
        frame.render_widget(
            Paragraph::new(lines).scroll((self.view.scroll as u16, 0)),
            body[1],
        );
    }
}

impl View for ComparisonPane<'_> {
    fn title(&self, _ctx: &RenderCtx<'_>) -> String {
        format!("Compare {}", self.view.plan.label())
    }

    fn render(&self, frame: &mut ratatui::Frame, area: Rect, ctx: &RenderCtx<'_>) {
        let inner = render_view_chrome(frame, &self.title(ctx), None, true, area);

        let summary_height = (self.view.summary.len() as u16).clamp(1, 8);
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(summary_height + 1), Constraint::Min(0)])
            .split(inner);

        let summary: Vec<Line> = self
            .view
            .summary
            .iter()
            .map(|s| Line::from(s.as_str()))
            .collect();
        frame.render_widget(
            Paragraph::new(summary)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::BOTTOM)),
            parts[0],
        );

        self.render_diff(frame, parts[1]);
    }
}
