use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

use crate::console::TablePhase;
use crate::model::{ExperimentRow, TableColumn};

use super::super::{Focus, RenderCtx, View, render_view_chrome};

/// The experiment table of the current filter, one page at a time.
pub(in crate::tui_shell) struct TablePane;

fn column_width(column: TableColumn) -> usize {
    match column {
        TableColumn::Id => 10,
        TableColumn::Title => 28,
        TableColumn::Filename => 20,
        TableColumn::Duration => 10,
        TableColumn::Start | TableColumn::End => 19,
        TableColumn::Tags => 22,
        TableColumn::Name => 16,
        TableColumn::FileSpace => 10,
        TableColumn::GitCommit => 10,
    }
}

fn fit(text: &str, width: usize) -> String {
    let flat = text.replace(['\n', '\r'], " ");
    let len = flat.chars().count();
    if len > width {
        let mut out: String = flat.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    } else {
        format!("{}{}", flat, " ".repeat(width - len))
    }
}

fn row_item<'a>(
    row: &ExperimentRow,
    columns: &[TableColumn],
    selected: bool,
    expanded: bool,
) -> ListItem<'a> {
    let mark = if selected { "[x] " } else { "[ ] " };
    let mut text = mark.to_string();
    for c in columns {
        text.push_str(&fit(&row.column(*c).unwrap_or_default(), column_width(*c)));
        text.push(' ');
    }

    let style = if row.exception.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let mut lines = vec![Line::styled(text, style)];
    if expanded {
        for (label, value) in row.detail_fields() {
            if let Some(value) = value {
                for (i, part) in value.lines().enumerate() {
                    let head = if i == 0 { format!("{}:", label) } else { String::new() };
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("    {:<13}", head),
                            Style::default().fg(Color::Gray),
                        ),
                        Span::raw(part.to_string()),
                    ]));
                }
            }
        }
        for (key, value) in &row.extra {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("    {:<13}", format!("{}:", key)),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw(value.clone()),
            ]));
        }
    }
    ListItem::new(lines)
}

impl View for TablePane {
    fn title(&self, ctx: &RenderCtx<'_>) -> String {
        let table = ctx.console.table();
        let mut title = format!(
            "Experiments ({}) | {} selected | page {}/{}",
            table.visible_rows().len(),
            table.selected().len(),
            table.page() + 1,
            table.page_count()
        );
        if !table.search().is_empty() {
            title.push_str(&format!(" | search: {}", table.search()));
        }
        title
    }

    fn updated_at(&self, ctx: &RenderCtx<'_>) -> Option<String> {
        let loaded = ctx.console.table().loaded()?;
        loaded.table.updated_at.clone()
    }

    fn render(&self, frame: &mut ratatui::Frame, area: ratatui::layout::Rect, ctx: &RenderCtx<'_>) {
        let updated_at = self.updated_at(ctx);
        let inner = render_view_chrome(
            frame,
            &self.title(ctx),
            updated_at.as_deref(),
            ctx.focus == Focus::Table,
            area,
        );

        let table = ctx.console.table();
        if table.loaded().is_none() {
            let msg = match table.phase() {
                TablePhase::Loading => "loading experiments...",
                _ => "no experiments loaded (r to retry)",
            };
            frame.render_widget(
                Paragraph::new(Line::styled(msg, Style::default().fg(Color::Gray))),
                inner,
            );
            return;
        }

        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let columns = table.visible_columns();
        let sort = table.sort();
        let mut header = "    ".to_string();
        for c in &columns {
            let mut label = c.header().to_string();
            if *c == sort.column {
                label.push(if sort.descending { '▼' } else { '▲' });
            }
            header.push_str(&fit(&label, column_width(*c)));
            header.push(' ');
        }
        frame.render_widget(
            Paragraph::new(Line::styled(
                header,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            parts[0],
        );

        let rows = table.page_rows();
        if rows.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::styled(
                    "no experiments match",
                    Style::default().fg(Color::Gray),
                )),
                parts[1],
            );
            return;
        }

        let items: Vec<ListItem> = rows
            .iter()
            .map(|r| {
                row_item(
                    r,
                    &columns,
                    table.is_selected(&r.id),
                    table.is_expanded(&r.id),
                )
            })
            .collect();
        let mut state = ListState::default();
        let offset = table.cursor().saturating_sub(table.page() * table.page_size());
        state.select(Some(offset.min(rows.len() - 1)));
        let list = List::new(items).highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_stateful_widget(list, parts[1], &mut state);
    }
}
