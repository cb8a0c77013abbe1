use std::collections::BTreeSet;

use super::*;
use crate::test_support::MemoryBackend;

fn id(s: &str) -> ExperimentId {
    ExperimentId::new(s)
}

fn started(backend: &Arc<MemoryBackend>) -> Console {
    let dyn_backend: Arc<dyn Backend> = backend.clone();
    let mut console = Console::new(dyn_backend, 25);
    console.start();
    console.wait_idle();
    console
}

fn standard() -> Arc<MemoryBackend> {
    Arc::new(MemoryBackend::with_rows(&[
        ("a", &["cnn"]),
        ("b", &["cnn", "archive"]),
        ("c", &[]),
        ("d", &["archive"]),
    ]))
}

fn row_ids(console: &Console) -> Vec<String> {
    let mut ids: Vec<String> = console
        .table()
        .rows()
        .iter()
        .map(|r| r.id.as_str().to_string())
        .collect();
    ids.sort();
    ids
}

#[test]
fn start_loads_inbox_and_tags() {
    let backend = standard();
    let console = started(&backend);
    assert_eq!(row_ids(&console), vec!["a", "c"]);
    assert_eq!(console.tags().tags().to_vec(), vec!["archive".to_string(), "cnn".to_string()]);
    assert_eq!(console.table().phase(), TablePhase::Loaded);
    assert!(!console.is_busy());
}

#[test]
fn archive_view_shows_only_archived() {
    let backend = standard();
    let mut console = started(&backend);
    console.show_archive();
    console.wait_idle();
    assert_eq!(row_ids(&console), vec!["b", "d"]);
    assert_eq!(console.filter(), &FilterPredicate::archive());
}

#[test]
fn tag_shortcut_loads_whitelist_and_excludes_archive() {
    let backend = standard();
    let mut console = started(&backend);
    console.show_tag("cnn");
    console.wait_idle();
    assert_eq!(
        backend.calls().last().unwrap(),
        "POST /experiment-table tag:cnn"
    );
    assert_eq!(row_ids(&console), vec!["a"]);
}

#[test]
fn reload_empties_selection() {
    let backend = standard();
    let mut console = started(&backend);
    console.toggle_row(&id("a")).unwrap();
    console.toggle_row(&id("c")).unwrap();
    assert_eq!(console.selected().len(), 2);
    console.reload();
    console.wait_idle();
    assert!(console.selected().is_empty());
}

#[test]
fn compare_with_nothing_selected_makes_no_call() {
    let backend = standard();
    let mut console = started(&backend);
    let before = backend.calls().len();
    assert_eq!(
        console.compare(),
        ActionOutcome::Rejected(UserInputError::CompareSelection { count: 0 })
    );
    console.wait_idle();
    assert_eq!(backend.calls().len(), before);
    let notice = console.take_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert!(notice.message.starts_with("select one or two experiments to compare"));
}

#[test]
fn compare_one_uses_local_and_two_keep_selection_order() {
    let backend = standard();
    let mut console = started(&backend);

    console.toggle_row(&id("c")).unwrap();
    assert_eq!(console.compare(), ActionOutcome::Started);
    console.wait_idle();
    assert_eq!(backend.calls().last().unwrap(), "GET /compare-with-local/c");
    assert!(matches!(console.view(), View::Comparison(_)));

    console.go_back();
    assert!(matches!(console.view(), View::Table));
    console.toggle_row(&id("a")).unwrap();
    assert_eq!(console.selected(), vec![id("c"), id("a")]);
    console.compare();
    console.wait_idle();
    assert_eq!(
        backend.calls().last().unwrap(),
        "POST /compare-experiments [c, a]"
    );
}

#[test]
fn null_diff_still_shows_summary() {
    let backend = standard();
    let mut console = started(&backend);
    console.toggle_row(&id("a")).unwrap();
    console.compare();
    console.wait_idle();
    let View::Comparison(view) = console.view() else {
        panic!("expected comparison view");
    };
    assert_eq!(view.diff, DiffPanel::Absent);
    assert_eq!(view.summary, vec!["local a".to_string()]);
}

#[test]
fn unparseable_diff_is_reported_in_the_panel() {
    let backend = Arc::new(MemoryBackend {
        diff: Some("garbage".to_string()),
        ..MemoryBackend::with_rows(&[("a", &[])])
    });
    let mut console = started(&backend);
    console.toggle_row(&id("a")).unwrap();
    console.compare();
    console.wait_idle();
    let View::Comparison(view) = console.view() else {
        panic!("expected comparison view");
    };
    assert!(matches!(view.diff, DiffPanel::Failed(_)));
    assert!(!view.summary.is_empty());
}

#[test]
fn overflowing_hunk_header_fails_the_panel_not_the_console() {
    let backend = Arc::new(MemoryBackend {
        diff: Some("--- a.py\n+++ b.py\n@@ -4294967295,2 +1,2 @@\n a\n b\n".to_string()),
        ..MemoryBackend::with_rows(&[("a", &[])])
    });
    let mut console = started(&backend);
    console.toggle_row(&id("a")).unwrap();
    console.compare();
    console.wait_idle();
    let View::Comparison(view) = console.view() else {
        panic!("expected comparison view");
    };
    let DiffPanel::Failed(err) = &view.diff else {
        panic!("expected a failed diff panel");
    };
    assert!(err.contains("malformed hunk header"));
}

#[test]
fn add_tags_sends_one_request_per_id_then_one_reload() {
    let backend = standard();
    let mut console = started(&backend);
    console.toggle_row(&id("a")).unwrap();
    console.toggle_row(&id("c")).unwrap();
    let loads_before = backend.count("POST /experiment-table");

    assert_eq!(console.add_tags("foo bar"), ActionOutcome::Started);
    console.wait_idle();

    let mut adds: Vec<String> = backend
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("POST /add_tags"))
        .collect();
    adds.sort();
    assert_eq!(
        adds,
        vec![
            r#"POST /add_tags/a ["foo", "bar"]"#.to_string(),
            r#"POST /add_tags/c ["foo", "bar"]"#.to_string(),
        ]
    );
    assert_eq!(backend.count("POST /experiment-table"), loads_before + 1);
    assert!(console.selected().is_empty());
    assert!(console.tags().tags().contains(&"foo".to_string()));
    assert_eq!(console.status(), Some("add tags [foo bar]: 2 succeeded"));
}

#[test]
fn blank_tag_input_sends_nothing() {
    let backend = standard();
    let mut console = started(&backend);
    console.toggle_row(&id("a")).unwrap();
    let before = backend.calls().len();
    assert_eq!(
        console.add_tags("   "),
        ActionOutcome::Rejected(UserInputError::Tags(crate::model::TagParseError::Empty))
    );
    console.wait_idle();
    assert_eq!(backend.calls().len(), before);
    assert_eq!(console.take_notice().unwrap().message, "enter at least one tag");
}

#[test]
fn bulk_without_selection_is_rejected() {
    let backend = standard();
    let mut console = started(&backend);
    let before = backend.calls().len();
    assert_eq!(
        console.delete_experiments(),
        ActionOutcome::Rejected(UserInputError::NoSelection)
    );
    assert!(console.pending().is_none());
    assert_eq!(backend.calls().len(), before);
}

#[test]
fn declined_delete_changes_nothing() {
    let backend = standard();
    let mut console = started(&backend);
    console.toggle_row(&id("a")).unwrap();
    let before = backend.calls().len();

    assert_eq!(console.delete_experiments(), ActionOutcome::NeedsConfirmation);
    assert_eq!(
        console.pending().unwrap().prompt,
        "Do you want to delete the marked experiment?"
    );
    console.decline();
    console.wait_idle();

    assert_eq!(backend.count("DELETE"), 0);
    assert_eq!(backend.calls().len(), before);
    assert_eq!(console.selected(), vec![id("a")]);
    assert_eq!(row_ids(&console), vec!["a", "c"]);
    assert!(console.take_notice().is_none());
}

#[test]
fn confirmed_archive_moves_rows_out_of_inbox() {
    let backend = standard();
    let mut console = started(&backend);
    console.toggle_row(&id("a")).unwrap();
    assert_eq!(console.archive(), ActionOutcome::NeedsConfirmation);
    assert_eq!(console.confirm(), ActionOutcome::Started);
    console.wait_idle();
    assert_eq!(backend.count(r#"POST /add_tags/a ["archive"]"#), 1);
    assert_eq!(row_ids(&console), vec!["c"]);
}

#[test]
fn partial_failure_still_reloads_once() {
    let backend = Arc::new(MemoryBackend {
        failing_ids: BTreeSet::from(["a".to_string()]),
        ..MemoryBackend::with_rows(&[("a", &[]), ("b", &[]), ("c", &[])])
    });
    let mut console = started(&backend);
    console.toggle_all();
    assert_eq!(console.selected().len(), 3);
    let loads_before = backend.count("POST /experiment-table");

    console.delete_experiments();
    console.confirm();
    console.wait_idle();

    assert_eq!(backend.count("DELETE /experiment/"), 3);
    assert_eq!(backend.count("POST /experiment-table"), loads_before + 1);
    assert_eq!(row_ids(&console), vec!["a"]);
    let report = console.last_bulk_report().unwrap();
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed().next().unwrap().id, id("a"));
    assert_eq!(console.status(), Some("delete: 2 succeeded, 1 failed"));
}

#[test]
fn failed_load_keeps_previous_rows() {
    let backend = standard();
    let mut console = started(&backend);
    *backend.table_down.lock().unwrap() = true;
    console.show_archive();
    console.wait_idle();
    assert_eq!(row_ids(&console), vec!["a", "c"]);
    assert_eq!(console.table().phase(), TablePhase::Loaded);
    let notice = console.take_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.contains("503"));
}

#[test]
fn first_load_failing_leaves_table_unloaded() {
    let backend = standard();
    *backend.table_down.lock().unwrap() = true;
    let console = started(&backend);
    assert_eq!(console.table().phase(), TablePhase::Unloaded);
}

#[test]
fn tag_index_failure_is_silent() {
    let backend = Arc::new(MemoryBackend {
        tags_down: true,
        ..MemoryBackend::with_rows(&[("a", &["x"])])
    });
    let mut console = started(&backend);
    assert!(console.tags().tags().is_empty());
    assert!(console.take_notice().is_none());
    assert_eq!(row_ids(&console), vec!["a"]);
}

#[test]
fn detail_round_trip_clears_selection() {
    let backend = standard();
    let mut console = started(&backend);
    console.toggle_row(&id("a")).unwrap();
    assert_eq!(console.open_detail(&id("c")), ActionOutcome::Started);
    console.wait_idle();
    let View::Detail(detail) = console.view() else {
        panic!("expected detail view");
    };
    assert_eq!(detail.lines, vec!["Experiment c".to_string()]);
    assert!(!detail.loading);

    let loads = backend.count("POST /experiment-table");
    console.go_back();
    console.wait_idle();
    assert!(matches!(console.view(), View::Table));
    assert!(console.selected().is_empty());
    assert_eq!(row_ids(&console), vec!["a", "c"]);
    assert_eq!(backend.count("POST /experiment-table"), loads);
}

#[test]
fn restore_requires_confirmation() {
    let backend = standard();
    let mut console = started(&backend);
    console.open_detail(&id("a"));
    console.wait_idle();

    assert_eq!(
        console.restore_open_experiment(),
        ActionOutcome::NeedsConfirmation
    );
    assert!(console.pending().unwrap().prompt.contains("overwrite all local code"));
    console.decline();
    assert_eq!(backend.count("GET /restore-source-code"), 0);

    console.restore_open_experiment();
    console.confirm();
    console.wait_idle();
    assert_eq!(backend.count("GET /restore-source-code/a"), 1);
    assert_eq!(console.take_notice().unwrap().message, "a restored");
}

#[test]
fn saving_text_refetches_the_open_experiment() {
    let backend = standard();
    let mut console = started(&backend);
    console.open_detail(&id("a"));
    console.wait_idle();
    let fetches = backend.count("GET /experiment/a");

    console.save_text(&id("a"), TextField::Conclusion, "lr too high");
    console.wait_idle();
    assert_eq!(
        backend.count(r#"POST /save-text/a/conclusion "lr too high""#),
        1
    );
    assert_eq!(backend.count("GET /experiment/a"), fetches + 1);
}

#[test]
fn failed_detail_returns_to_table_with_notice() {
    let backend = Arc::new(MemoryBackend {
        failing_ids: BTreeSet::from(["a".to_string()]),
        ..MemoryBackend::with_rows(&[("a", &[])])
    });
    let mut console = started(&backend);
    console.open_detail(&id("a"));
    console.wait_idle();
    assert!(matches!(console.view(), View::Table));
    assert_eq!(console.take_notice().unwrap().level, NoticeLevel::Error);
}

#[test]
fn table_prefs_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let binding = || PrefsBinding {
        store: LocalStore::open(dir.path()).unwrap(),
        key: crate::store::table_key("http://test"),
        retention_days: 7,
    };
    let backend: Arc<dyn Backend> = standard();

    let mut console = Console::new(Arc::clone(&backend), 25).with_table_prefs(binding());
    assert!(console.sort_by(TableColumn::Title, false));
    assert!(console.toggle_column(TableColumn::Tags));

    let console = Console::new(backend, 25).with_table_prefs(binding());
    assert_eq!(console.table().sort().column, TableColumn::Title);
    assert!(console.table().is_hidden(TableColumn::Tags));
}
