use super::*;

fn row(id: &str, start: Option<&str>, title: Option<&str>) -> ExperimentRow {
    let mut r = ExperimentRow::new(id);
    r.start = start.map(str::to_string);
    r.title = title.map(str::to_string);
    r
}

fn loaded(rows: Vec<ExperimentRow>) -> TableController {
    let mut t = TableController::new(2);
    t.begin_load();
    t.finish_load(
        FilterPredicate::inbox(),
        Some(ExperimentTable {
            rows,
            ..ExperimentTable::default()
        }),
    );
    t
}

fn ids(rows: &[&ExperimentRow]) -> Vec<String> {
    rows.iter().map(|r| r.id.as_str().to_string()).collect()
}

fn id(s: &str) -> ExperimentId {
    ExperimentId::new(s)
}

#[test]
fn phases_follow_in_flight_loads() {
    let mut t = TableController::new(25);
    assert_eq!(t.phase(), TablePhase::Unloaded);
    t.begin_load();
    assert_eq!(t.phase(), TablePhase::Loading);
    t.finish_load(FilterPredicate::inbox(), None);
    assert_eq!(t.phase(), TablePhase::Unloaded);

    t.begin_load();
    t.begin_load();
    t.finish_load(FilterPredicate::inbox(), Some(ExperimentTable::default()));
    assert_eq!(t.phase(), TablePhase::Loading);
    t.finish_load(FilterPredicate::archive(), None);
    assert_eq!(t.phase(), TablePhase::Loaded);
    assert_eq!(t.loaded().unwrap().filter, FilterPredicate::inbox());
}

#[test]
fn reload_clears_selection_and_expansion() {
    let mut t = loaded(vec![row("a", None, None), row("b", None, None)]);
    t.toggle_selected(&id("b")).unwrap();
    t.toggle_selected(&id("a")).unwrap();
    t.toggle_details(&id("a")).unwrap();
    assert_eq!(t.selected(), vec![id("b"), id("a")]);
    assert!(t.is_expanded(&id("a")));

    t.begin_load();
    t.finish_load(
        FilterPredicate::inbox(),
        Some(ExperimentTable {
            rows: vec![row("a", None, None)],
            ..ExperimentTable::default()
        }),
    );
    assert!(t.selected().is_empty());
    assert!(!t.is_expanded(&id("a")));
}

#[test]
fn failed_reload_keeps_rows_and_selection() {
    let mut t = loaded(vec![row("a", None, None)]);
    t.toggle_selected(&id("a")).unwrap();
    t.begin_load();
    t.finish_load(FilterPredicate::archive(), None);
    assert_eq!(t.rows().len(), 1);
    assert_eq!(t.selected(), vec![id("a")]);
}

#[test]
fn unknown_rows_cannot_be_selected() {
    let mut t = TableController::new(25);
    assert_eq!(
        t.toggle_selected(&id("a")),
        Err(UserInputError::TableNotLoaded)
    );
    let mut t = loaded(vec![row("a", None, None)]);
    assert_eq!(
        t.toggle_selected(&id("zzz")),
        Err(UserInputError::UnknownExperiment(id("zzz")))
    );
}

#[test]
fn toggle_all_is_a_pure_function_of_selection() {
    let mut t = loaded(vec![
        row("a", None, Some("alpha")),
        row("b", None, Some("beta")),
        row("c", None, Some("alpine")),
    ]);
    t.set_search("alp");
    t.toggle_all();
    let mut sel = t.selected();
    sel.sort();
    assert_eq!(sel, vec![id("a"), id("c")]);

    t.toggle_all();
    assert!(t.selected().is_empty());

    t.set_search("");
    t.toggle_selected(&id("b")).unwrap();
    t.toggle_all();
    assert!(t.selected().is_empty());
}

#[test]
fn default_sort_is_newest_first_with_missing_last() {
    let t = loaded(vec![
        row("old", Some("2019-01-01 00:00:00"), None),
        row("none", None, None),
        row("new", Some("2019-02-01 00:00:00"), None),
    ]);
    assert_eq!(ids(&t.visible_rows()), vec!["new", "old", "none"]);
}

#[test]
fn sort_by_title_ascending_keeps_missing_last() {
    let mut t = loaded(vec![
        row("1", None, Some("beta")),
        row("2", None, None),
        row("3", None, Some("Alpha")),
    ]);
    assert!(t.sort_by(TableColumn::Title, false));
    assert_eq!(ids(&t.visible_rows()), vec!["3", "1", "2"]);
    assert!(!t.sort_by(TableColumn::GitCommit, false));
    assert_eq!(t.sort().column, TableColumn::Title);
}

#[test]
fn durations_sort_numerically() {
    let mut a = ExperimentRow::new("a");
    a.duration = Some("1 day, 0:00:01".to_string());
    let mut b = ExperimentRow::new("b");
    b.duration = Some("9:59:59".to_string());
    let mut c = ExperimentRow::new("c");
    c.duration = Some("10:00:00".to_string());
    let mut t = loaded(vec![a, b, c]);
    t.sort_by(TableColumn::Duration, true);
    assert_eq!(ids(&t.visible_rows()), vec!["a", "c", "b"]);
    assert_eq!(duration_seconds("0:01:05.5"), Some(65));
}

#[test]
fn pagination_moves_the_cursor() {
    let mut t = loaded(vec![
        row("1", Some("2019-01-05 00:00:00"), None),
        row("2", Some("2019-01-04 00:00:00"), None),
        row("3", Some("2019-01-03 00:00:00"), None),
        row("4", Some("2019-01-02 00:00:00"), None),
        row("5", Some("2019-01-01 00:00:00"), None),
    ]);
    assert_eq!(t.page_count(), 3);
    assert_eq!(ids(&t.page_rows()), vec!["1", "2"]);
    t.next_page();
    assert_eq!(t.cursor(), 2);
    assert_eq!(ids(&t.page_rows()), vec!["3", "4"]);
    t.next_page();
    t.next_page();
    assert_eq!(ids(&t.page_rows()), vec!["5"]);
    t.prev_page();
    assert_eq!(t.cursor(), 2);
    t.move_cursor(-10);
    assert_eq!(t.cursor(), 0);
    t.move_cursor(10);
    assert_eq!(t.cursor_row().unwrap().id, id("5"));
}

#[test]
fn id_column_cannot_be_hidden() {
    let mut t = TableController::new(25);
    assert!(!t.toggle_column(TableColumn::Id));
    assert!(t.toggle_column(TableColumn::Title));
    assert!(t.is_hidden(TableColumn::Title));
    assert!(!t.visible_columns().contains(&TableColumn::Title));
    assert!(t.toggle_column(TableColumn::Title));
    assert!(!t.is_hidden(TableColumn::Title));
}
