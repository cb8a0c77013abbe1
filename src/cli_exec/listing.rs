use exprec_console::model::{ExperimentRow, TableColumn};

use super::*;

const MAX_CELL: usize = 40;

pub(super) fn handle_list_command(
    session: &Session,
    view: &ViewArgs,
    search: Option<String>,
    json: bool,
) -> Result<()> {
    let mut console = connect(session)?;
    load_view(&mut console, view)?;
    if let Some(text) = search {
        console.search(&text);
    }

    let table = console.table();
    let rows = table.visible_rows();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).context("serialize experiments json")?
        );
        return Ok(());
    }

    if rows.is_empty() {
        println!("No experiments ({})", console.filter().label());
        return Ok(());
    }
    for line in render_rows(&table.visible_columns(), &rows) {
        println!("{}", line);
    }
    Ok(())
}

pub(super) fn handle_tags_command(session: &Session, json: bool) -> Result<()> {
    let mut console = connect(session)?;
    console.refresh_tags();
    settle(&mut console)?;
    if !console.tags().is_loaded() {
        anyhow::bail!("tag list unavailable from {}", session.base_url);
    }
    let tags = console.tags().tags();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(tags).context("serialize tags json")?
        );
    } else if tags.is_empty() {
        println!("No tags");
    } else {
        for tag in tags {
            println!("{}", tag);
        }
    }
    Ok(())
}

/// Aligned plain-text table, header first.
fn render_rows(columns: &[TableColumn], rows: &[&ExperimentRow]) -> Vec<String> {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| clip(&r.column(*c).unwrap_or_default()))
                .collect()
        })
        .collect();
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(c.header().chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<&str>| {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    let mut out = vec![line(columns.iter().map(|c| c.header()).collect())];
    out.extend(
        cells
            .iter()
            .map(|row| line(row.iter().map(String::as_str).collect())),
    );
    out
}

fn clip(text: &str) -> String {
    let flat = text.replace(['\n', '\r'], " ");
    if flat.chars().count() <= MAX_CELL {
        return flat;
    }
    let mut out: String = flat.chars().take(MAX_CELL - 1).collect();
    out.push('…');
    out
}
