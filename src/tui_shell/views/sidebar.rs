use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{List, ListItem, ListState};

use super::super::{Focus, RenderCtx, View, render_view_chrome};

/// Inbox, archive and one shortcut per known tag.
pub(in crate::tui_shell) struct TagSidebar {
    pub(in crate::tui_shell) entries: Vec<String>,
    pub(in crate::tui_shell) cursor: usize,
}

impl View for TagSidebar {
    fn title(&self, _ctx: &RenderCtx<'_>) -> String {
        "Views".to_string()
    }

    fn render(&self, frame: &mut ratatui::Frame, area: ratatui::layout::Rect, ctx: &RenderCtx<'_>) {
        let focused = ctx.focus == Focus::Tags;
        let inner = render_view_chrome(frame, &self.title(ctx), None, focused, area);

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|e| ListItem::new(e.as_str()))
            .collect();
        let mut state = ListState::default();
        if focused && !self.entries.is_empty() {
            state.select(Some(self.cursor.min(self.entries.len() - 1)));
        }
        let list = List::new(items).highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_stateful_widget(list, inner, &mut state);
    }
}
