use ratatui::backend::TestBackend;

use super::*;
use crate::test_support::MemoryBackend;

fn app_with(backend: &Arc<MemoryBackend>) -> App {
    let dyn_backend: Arc<dyn crate::remote::Backend> = backend.clone();
    let mut console = Console::new(dyn_backend, 25);
    console.start();
    console.wait_idle();
    App::new(console, "http://test".to_string())
}

fn standard() -> Arc<MemoryBackend> {
    Arc::new(MemoryBackend::with_rows(&[
        ("a", &["cnn"]),
        ("b", &["archive"]),
        ("c", &[]),
    ]))
}

fn press(app: &mut App, code: KeyCode) {
    super::keys::handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn screen(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
    terminal.draw(|f| super::render::draw(f, app)).unwrap();
    terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|c| c.symbol())
        .collect()
}

#[test]
fn add_tags_goes_through_the_text_input() {
    let backend = standard();
    let mut app = app_with(&backend);

    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Char('t'));
    assert!(matches!(
        app.modal.as_ref().map(|m| &m.kind),
        Some(ModalKind::TextInput {
            action: TextInputAction::AddTags,
            ..
        })
    ));
    type_text(&mut app, "foo bar");
    press(&mut app, KeyCode::Enter);
    app.console.wait_idle();

    assert!(
        backend
            .calls()
            .contains(&"POST /add_tags/a [\"foo\", \"bar\"]".to_string())
    );
    assert_eq!(backend.count("POST /add_tags/"), 1);
}

#[test]
fn tag_input_without_selection_shows_a_warning() {
    let backend = standard();
    let mut app = app_with(&backend);

    press(&mut app, KeyCode::Char('t'));
    let modal = app.modal.as_ref().unwrap();
    assert_eq!(modal.title, "Warning");
    assert!(matches!(modal.kind, ModalKind::Viewer));
    press(&mut app, KeyCode::Esc);
    assert!(app.modal.is_none());
}

#[test]
fn declining_delete_sends_nothing() {
    let backend = standard();
    let mut app = app_with(&backend);

    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Char('D'));
    app.tick();
    assert!(matches!(
        app.modal.as_ref().map(|m| &m.kind),
        Some(ModalKind::ConfirmAction)
    ));

    press(&mut app, KeyCode::Char('n'));
    app.console.wait_idle();
    app.tick();
    assert!(app.modal.is_none());
    assert!(app.console.pending().is_none());
    assert_eq!(backend.count("DELETE "), 0);
    assert_eq!(app.console.selected(), vec![ExperimentId::new("a")]);
}

#[test]
fn confirming_archive_reloads_the_inbox() {
    let backend = standard();
    let mut app = app_with(&backend);

    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Char('x'));
    app.tick();
    press(&mut app, KeyCode::Enter);
    app.console.wait_idle();

    assert_eq!(backend.count("POST /add_tags/a"), 1);
    let ids: Vec<&str> = app
        .console
        .table()
        .rows()
        .iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(ids, vec!["c"]);
}

#[test]
fn compare_without_selection_opens_a_warning() {
    let backend = standard();
    let mut app = app_with(&backend);

    press(&mut app, KeyCode::Char('c'));
    app.tick();
    let modal = app.modal.as_ref().unwrap();
    assert_eq!(modal.title, "Warning");
    assert!(modal.lines[0].contains("0 selected"));
    assert_eq!(backend.count("GET /compare"), 0);
}

#[test]
fn sidebar_switches_to_the_archive() {
    let backend = standard();
    let mut app = app_with(&backend);

    press(&mut app, KeyCode::Tab);
    assert_eq!(app.focus, Focus::Tags);
    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Enter);
    app.console.wait_idle();

    assert_eq!(app.focus, Focus::Table);
    assert_eq!(app.console.filter(), &FilterPredicate::archive());
    let ids: Vec<&str> = app
        .console
        .table()
        .rows()
        .iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(ids, vec!["b"]);
}

#[test]
fn sidebar_lists_tags_but_not_archive() {
    let backend = standard();
    let app = app_with(&backend);
    let labels: Vec<String> = app.shortcuts().iter().map(|s| s.label()).collect();
    assert_eq!(labels, vec!["Inbox", "Archive", "# cnn"]);
}

#[test]
fn editing_a_title_from_the_detail_view() {
    let backend = standard();
    let mut app = app_with(&backend);

    press(&mut app, KeyCode::Enter);
    app.console.wait_idle();
    assert!(matches!(app.console.view(), ConsoleView::Detail(_)));

    press(&mut app, KeyCode::Char('t'));
    type_text(&mut app, "baseline");
    press(&mut app, KeyCode::Enter);
    app.console.wait_idle();
    assert_eq!(backend.count("POST /save-text/a/title"), 1);

    press(&mut app, KeyCode::Esc);
    assert!(matches!(app.console.view(), ConsoleView::Table));
}

#[test]
fn column_toggle_accepts_any_case_and_flags_unknown_names() {
    let backend = standard();
    let mut app = app_with(&backend);
    assert!(app.console.table().is_hidden(TableColumn::Name));

    press(&mut app, KeyCode::Char('h'));
    type_text(&mut app, "NAME, bogus");
    press(&mut app, KeyCode::Enter);

    assert!(!app.console.table().is_hidden(TableColumn::Name));
    let modal = app.modal.as_ref().unwrap();
    assert_eq!(modal.lines, vec!["unknown column(s): bogus".to_string()]);
}

#[test]
fn table_screen_renders_rows_and_modal() {
    let backend = standard();
    let mut app = app_with(&backend);

    let text = screen(&app);
    assert!(text.contains("Experiments (2)"));
    assert!(text.contains("[ ] a"));
    assert!(text.contains("# cnn"));

    press(&mut app, KeyCode::Char('?'));
    let text = screen(&app);
    assert!(text.contains("Keys"));
}
