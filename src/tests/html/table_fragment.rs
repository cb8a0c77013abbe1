use super::*;

const FRAGMENT: &str = r#"<div style="text-align: right"><small>Updated at 2019-03-05 09:30:00</small></div>
<small>
    <table class="table display" id=experiment-table>
        <thead>
            <tr>
                <th colspan=20></th>
                <th colspan=1>Scalars</th>
                <th colspan=1>Parameters</th>
            </tr>
            <tr>
                <th scope="col" class="hidden-column">UUID</th>
                <th scope="col" class="select-checkbox hidden-title">select-row</th>
                <th scope="col" class="hidden-title details-control">DetailsControl</th>
                <th scope="col" class="hidden-title">Show</th>
                <th scope="col" class="toggle">ID</th>
                <th scope="col" class="toggle">Title</th>
                <th scope="col" class="toggle">Filename</th>
                <th scope="col" class="toggle">Start</th>
                <th scope="col" class="toggle">Tags</th>
                <th scope="col" class="hidden-column">Description</th>
                <th scope="col" class="hidden-column">Exception</th>
                <th scope="col" class="toggle hidden-column">loss</th>
                <th scope="col" class="toggle hidden-column">lr</th>
            </tr>
        </thead>
        <tbody>
            <tr>
                <td>0f3a9c2e-aaaa-bbbb-cccc-000000000001</td>
                <td></td>
                <td></td>
                <td><button class='btn btn-primary btn-xs experiment-button'>Show</button></td>
                <td><div style="white-space: nowrap"><i class='fas fa-circle'></i> 0f3a9c2e</div></td>
                <td>ResNet &amp; friends</td>
                <td><div style="white-space: nowrap"><i class='fas fa-circle'></i> train.py</div></td>
                <td>2019-03-04 10:11:12</td>
                <td><span class='badge badge-primary'>resnet</span> <span class='badge badge-primary'>cifar</span></td>
                <td><p>First try.</p><p>Uses <em>batch</em> norm.</p></td>
                <td><pre></pre></td>
                <td>0.1234</td>
                <td><div style="color: #B2B2B2;">N/A</div></td>
            </tr>
            <tr>
                <td>7c11d0aa-aaaa-bbbb-cccc-000000000002</td>
                <td></td>
                <td></td>
                <td></td>
                <td>7c11d0aa</td>
                <td><div style="color: #B2B2B2;">N/A</div></td>
                <td>eval.py</td>
                <td>2019-03-03 08:00:00</td>
                <td><span class='badge badge-primary'>archive</span></td>
                <td></td>
                <td><pre>ValueError: bad shape</pre></td>
                <td><div style="color: #B2B2B2;">N/A</div></td>
                <td>0.01</td>
            </tr>
        </tbody>
    </table>
</small>"#;

#[test]
fn rows_are_keyed_by_header_name() {
    let table = parse_experiment_table(FRAGMENT).unwrap();
    assert_eq!(table.rows.len(), 2);

    let first = &table.rows[0];
    assert_eq!(first.id.as_str(), "0f3a9c2e-aaaa-bbbb-cccc-000000000001");
    assert_eq!(first.title.as_deref(), Some("ResNet & friends"));
    assert_eq!(first.filename.as_deref(), Some("train.py"));
    assert_eq!(first.start.as_deref(), Some("2019-03-04 10:11:12"));
    assert_eq!(first.tags, vec!["cifar".to_string(), "resnet".to_string()]);
    assert_eq!(
        first.description.as_deref(),
        Some("First try.\nUses batch norm.")
    );
    assert_eq!(first.exception, None);
    assert_eq!(first.extra.get("loss").map(String::as_str), Some("0.1234"));
    assert!(!first.extra.contains_key("lr"));

    let second = &table.rows[1];
    assert_eq!(second.title, None);
    assert_eq!(second.tags, vec!["archive".to_string()]);
    assert_eq!(
        second.exception.as_deref(),
        Some("ValueError: bad shape")
    );
    assert_eq!(second.extra.get("lr").map(String::as_str), Some("0.01"));
}

#[test]
fn widget_columns_are_not_reported() {
    let table = parse_experiment_table(FRAGMENT).unwrap();
    assert_eq!(
        table.columns,
        vec![
            "Title",
            "Filename",
            "Start",
            "Tags",
            "Description",
            "Exception",
            "loss",
            "lr"
        ]
    );
    assert_eq!(table.updated_at.as_deref(), Some("2019-03-05 09:30:00"));
}

#[test]
fn column_order_does_not_matter() {
    let html = r#"<table id="experiment-table">
        <thead><tr><th>Title</th><th>Tags</th><th>UUID</th></tr></thead>
        <tbody><tr><td>swapped</td><td>a b</td><td>abc</td></tr></tbody>
    </table>"#;
    let table = parse_experiment_table(html).unwrap();
    assert_eq!(table.rows[0].id.as_str(), "abc");
    assert_eq!(table.rows[0].title.as_deref(), Some("swapped"));
    assert_eq!(table.rows[0].tags, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn empty_table_is_fine() {
    let html = r#"<table id="experiment-table">
        <thead><tr><th>UUID</th><th>Title</th></tr></thead>
        <tbody></tbody>
    </table>"#;
    let table = parse_experiment_table(html).unwrap();
    assert!(table.rows.is_empty());
    assert_eq!(table.updated_at, None);
}

#[test]
fn missing_uuid_column_is_an_error() {
    let html = "<table><thead><tr><th>Title</th></tr></thead><tbody></tbody></table>";
    assert!(matches!(
        parse_experiment_table(html),
        Err(TableParseError::MissingIdColumn)
    ));
    assert!(matches!(
        parse_experiment_table("<p>Internal Server Error</p>"),
        Err(TableParseError::NoTable)
    ));
}
