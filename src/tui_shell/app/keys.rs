use crate::console::{DiffPanel, UserInputError};
use crate::diff::file_rows;

use super::*;

#[derive(Clone, Copy)]
enum Screen {
    Table,
    Detail,
    Comparison,
}

const PAGE: usize = 10;

pub(in crate::tui_shell) fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit = true;
        return;
    }
    if app.modal.is_some() {
        modal::handle_modal_key(app, key);
        return;
    }

    let screen = match app.console.view() {
        ConsoleView::Table => Screen::Table,
        ConsoleView::Detail(_) => Screen::Detail,
        ConsoleView::Comparison(_) => Screen::Comparison,
    };
    match (screen, app.focus) {
        (Screen::Table, Focus::Table) => table_key(app, key),
        (Screen::Table, Focus::Tags) => sidebar_key(app, key),
        (Screen::Detail, _) => detail_key(app, key),
        (Screen::Comparison, _) => comparison_key(app, key),
    }
}

fn table_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit = true,
        KeyCode::Tab => app.focus = Focus::Tags,
        KeyCode::Down | KeyCode::Char('j') => app.console.move_cursor(1),
        KeyCode::Up | KeyCode::Char('k') => app.console.move_cursor(-1),
        KeyCode::PageDown | KeyCode::Char('n') => app.console.next_page(),
        KeyCode::PageUp | KeyCode::Char('p') => app.console.prev_page(),

        KeyCode::Char(' ') => {
            if let Some(id) = app.cursor_id() {
                app.console.toggle_row(&id).ok();
                app.console.move_cursor(1);
            }
        }
        KeyCode::Char('A') => app.console.toggle_all(),
        KeyCode::Char('i') => {
            if let Some(id) = app.cursor_id() {
                app.console.toggle_details(&id).ok();
            }
        }
        KeyCode::Enter => {
            if let Some(id) = app.cursor_id() {
                app.console.open_detail(&id);
            }
        }

        KeyCode::Char('t') => open_tag_input(app, TextInputAction::AddTags, "Add tags"),
        KeyCode::Char('T') => open_tag_input(app, TextInputAction::RemoveTags, "Remove tags"),
        KeyCode::Char('x') => {
            app.console.archive();
        }
        KeyCode::Char('D') => {
            app.console.delete_experiments();
        }
        KeyCode::Char('F') => {
            app.console.delete_files();
        }
        KeyCode::Char('c') => {
            app.console.compare();
        }

        KeyCode::Char('/') => {
            let current = app.console.table().search().to_string();
            app.open_text_input(
                TextInputAction::Search,
                "Search",
                vec!["Filter rows by id, title, filename or tag.".to_string()],
                "search: ",
                &current,
            );
        }
        KeyCode::Esc => {
            if !app.console.table().search().is_empty() {
                app.console.search("");
            }
        }
        KeyCode::Char('s') => app.console.cycle_sort(),
        KeyCode::Char('h') => {
            let mut lines = app.column_lines();
            lines.push(String::new());
            lines.push("Comma-separated headers to show/hide.".to_string());
            app.open_text_input(TextInputAction::ToggleColumns, "Columns", lines, "toggle: ", "");
        }

        KeyCode::Char('r') => {
            app.console.reload();
            app.console.refresh_tags();
        }
        KeyCode::Char('I') => app.console.show_inbox(),
        KeyCode::Char('a') => app.console.show_archive(),
        KeyCode::Char('?') => app.open_modal("Keys", help_lines()),
        _ => {}
    }
}

fn open_tag_input(app: &mut App, action: TextInputAction, title: &str) {
    let selected = app.console.selected();
    if selected.is_empty() {
        app.open_modal("Warning", vec![UserInputError::NoSelection.to_string()]);
        return;
    }
    let lines = vec![
        format!("{} experiment(s) selected.", selected.len()),
        "Separate tags with spaces.".to_string(),
    ];
    app.open_text_input(action, title, lines, "tags: ", "");
}

fn sidebar_key(app: &mut App, key: KeyEvent) {
    let count = app.shortcuts().len();
    match key.code {
        KeyCode::Char('q') => app.quit = true,
        KeyCode::Tab | KeyCode::Esc => app.focus = Focus::Table,
        KeyCode::Down | KeyCode::Char('j') => {
            app.tag_cursor = (app.tag_cursor + 1).min(count.saturating_sub(1));
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.tag_cursor = app.tag_cursor.saturating_sub(1);
        }
        KeyCode::Enter => {
            if let Some(shortcut) = app.shortcuts().get(app.tag_cursor) {
                app.console.load(shortcut.filter());
                app.focus = Focus::Table;
            }
        }
        _ => {}
    }
}

fn detail_key(app: &mut App, key: KeyEvent) {
    let field = match key.code {
        KeyCode::Esc | KeyCode::Char('b') => {
            app.console.go_back();
            return;
        }
        KeyCode::Char('q') => {
            app.quit = true;
            return;
        }
        KeyCode::Char('r') => {
            app.console.restore_open_experiment();
            return;
        }
        KeyCode::Char('t') => TextField::Title,
        KeyCode::Char('d') => TextField::Description,
        KeyCode::Char('c') => TextField::Conclusion,
        code => {
            if let ConsoleView::Detail(detail) = app.console.view_mut() {
                let max = detail.lines.len().saturating_sub(1);
                detail.scroll = scrolled(detail.scroll, code, max);
            }
            return;
        }
    };

    let ConsoleView::Detail(detail) = app.console.view() else {
        return;
    };
    let id = detail.id.clone();
    let current = app
        .console
        .table()
        .rows()
        .iter()
        .find(|r| r.id == id)
        .and_then(|r| field.current(r))
        .unwrap_or_default()
        .to_string();
    app.open_text_input(
        TextInputAction::EditField { id: id.clone(), field },
        format!("Edit {}", field.as_str()),
        vec![format!("Experiment {}", id)],
        &format!("{}: ", field.as_str()),
        &current,
    );
}

fn comparison_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('b') => app.console.go_back(),
        KeyCode::Char('q') => app.quit = true,
        KeyCode::Char('l') => app.console.toggle_diff_layout(),
        code => {
            let ConsoleView::Comparison(cmp) = app.console.view_mut() else {
                return;
            };
            match code {
                KeyCode::Char('n') | KeyCode::Char(']') => cmp.next_file(),
                KeyCode::Char('p') | KeyCode::Char('[') => cmp.prev_file(),
                code => {
                    let rows = match &cmp.diff {
                        DiffPanel::Parsed(diff) => diff
                            .files
                            .get(cmp.file)
                            .map_or(0, |f| file_rows(f, cmp.layout).len()),
                        _ => 0,
                    };
                    cmp.scroll = scrolled(cmp.scroll, code, rows.saturating_sub(1));
                }
            }
        }
    }
}

fn scrolled(scroll: usize, code: KeyCode, max: usize) -> usize {
    match code {
        KeyCode::Down | KeyCode::Char('j') => (scroll + 1).min(max),
        KeyCode::Up | KeyCode::Char('k') => scroll.saturating_sub(1),
        KeyCode::PageDown => (scroll + PAGE).min(max),
        KeyCode::PageUp => scroll.saturating_sub(PAGE),
        KeyCode::Home => 0,
        KeyCode::End => max,
        _ => scroll,
    }
}

fn help_lines() -> Vec<String> {
    [
        "Table",
        "  j/k        move        n/p      page",
        "  space      select      A        select all",
        "  i          details     Enter    open experiment",
        "  t / T      add / remove tags",
        "  x          archive     D        delete",
        "  F          delete files",
        "  c          compare one (with local) or two experiments",
        "  /          search      Esc      clear search",
        "  s          cycle sort  h        columns",
        "  I / a      inbox / archive view",
        "  r          reload      Tab      tag sidebar",
        "",
        "Experiment",
        "  t/d/c      edit title / description / conclusion",
        "  r          restore source code    Esc  back",
        "",
        "Comparison",
        "  n/p        next/previous file     l    inline/side-by-side",
        "  j/k        scroll                 Esc  back",
        "",
        "q or Ctrl-C quits.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
