use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders};

use crate::console::Console;

#[derive(Clone, Copy)]
pub(super) struct RenderCtx<'a> {
    pub(super) console: &'a Console,
    pub(super) focus: super::Focus,
}

pub(super) trait View {
    fn title(&self, ctx: &RenderCtx<'_>) -> String;

    /// Right-hand part of the frame title, e.g. a data timestamp.
    fn updated_at(&self, _ctx: &RenderCtx<'_>) -> Option<String> {
        None
    }

    fn render(&self, frame: &mut ratatui::Frame, area: Rect, ctx: &RenderCtx<'_>);
}

pub(super) fn render_view_chrome(
    frame: &mut ratatui::Frame,
    title: &str,
    updated_at: Option<&str>,
    focused: bool,
    area: Rect,
) -> Rect {
    let mut spans = vec![Span::styled(
        title.to_string(),
        Style::default().fg(Color::Yellow),
    )];
    if let Some(updated_at) = updated_at {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            updated_at.to_string(),
            Style::default().fg(Color::Gray),
        ));
    }
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Line::from(spans));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);
    inner
}
