use super::*;

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);

    let ctx = RenderCtx {
        console: &app.console,
        focus: app.focus,
    };
    match app.console.view() {
        ConsoleView::Table => {
            let parts = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(22), Constraint::Min(0)])
                .split(chunks[1]);
            let sidebar = TagSidebar {
                entries: app.shortcuts().iter().map(|s| s.label()).collect(),
                cursor: app.tag_cursor,
            };
            sidebar.render(frame, parts[0], &ctx);
            TablePane.render(frame, parts[1], &ctx);
        }
        ConsoleView::Detail(detail) => DetailPane { view: detail }.render(frame, chunks[1], &ctx),
        ConsoleView::Comparison(cmp) => {
            ComparisonPane { view: cmp }.render(frame, chunks[1], &ctx)
        }
    }

    draw_status(frame, app, chunks[2]);

    if let Some(m) = &app.modal {
        dim_frame(frame);
        modal::draw_modal(frame, m);
    }
}

fn draw_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let mut spans = vec![
        Span::styled(
            "exprec",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(app.base_url.clone(), Style::default().fg(Color::Gray)),
        Span::raw("  view: "),
        Span::styled(
            app.console.filter().label(),
            Style::default().fg(Color::Cyan),
        ),
    ];
    if app.console.table().phase() == TablePhase::Loading || app.console.is_busy() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("loading...", Style::default().fg(Color::Magenta)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_status(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let hints = match app.console.view() {
        ConsoleView::Table => match app.focus {
            Focus::Table => {
                "space select  t/T tags  x archive  D delete  c compare  / search  ? keys  q quit"
            }
            Focus::Tags => "j/k move  Enter open  Tab back to table",
        },
        ConsoleView::Detail(_) => "t/d/c edit  r restore  j/k scroll  Esc back",
        ConsoleView::Comparison(_) => "n/p file  l layout  j/k scroll  Esc back",
    };

    let status = app.console.status().unwrap_or("");
    let lines = vec![
        Line::from(Span::raw(status.to_string())),
        Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::TOP)),
        area,
    );
}

fn dim_frame(frame: &mut ratatui::Frame) {
    let area = frame.area();
    let buf = frame.buffer_mut();
    for y in area.y..area.y.saturating_add(area.height) {
        for x in area.x..area.x.saturating_add(area.width) {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.modifier |= Modifier::DIM;
            }
        }
    }
}
