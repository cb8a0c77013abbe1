use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};

use crate::console::DetailView;

use super::super::{RenderCtx, View, render_view_chrome};

pub(in crate::tui_shell) struct DetailPane<'a> {
    pub(in crate::tui_shell) view: &'a DetailView,
}

impl View for DetailPane<'_> {
    fn title(&self, _ctx: &RenderCtx<'_>) -> String {
        format!("Experiment {}", self.view.id.short())
    }

    fn render(&self, frame: &mut ratatui::Frame, area: ratatui::layout::Rect, ctx: &RenderCtx<'_>) {
        let inner = render_view_chrome(frame, &self.title(ctx), None, true, area);

        if self.view.loading {
            frame.render_widget(
                Paragraph::new(Line::styled("loading...", Style::default().fg(Color::Gray))),
                inner,
            );
            return;
        }

        let lines: Vec<Line> = self.view.lines.iter().map(|s| Line::from(s.as_str())).collect();
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((self.view.scroll as u16, 0)),
            inner,
        );
    }
}
