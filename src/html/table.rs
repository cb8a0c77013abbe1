use scraper::{ElementRef, Html};

use super::selector;
use super::text::element_text;
use crate::model::{ExperimentId, ExperimentRow, ExperimentTable};

/// Placeholder the backend renders for missing values.
const NOT_AVAILABLE: &str = "N/A";

/// Columns that only carry widgets (checkbox, expand arrow, buttons, icons).
const WIDGET_COLUMNS: &[&str] = &["select-row", "DetailsControl", "Show", "Icons", "PID", "ID"];

#[derive(Debug, thiserror::Error)]
pub enum TableParseError {
    #[error("invalid selector {css:?}: {message}")]
    Selector { css: &'static str, message: String },

    #[error("response does not contain an experiment table")]
    NoTable,

    #[error("experiment table has no UUID column")]
    MissingIdColumn,

    #[error("row {row} has an empty UUID cell")]
    EmptyId { row: usize },
}

/// Parse the `/experiment-table` fragment into named-field rows.
///
/// Cells are matched to fields through the header text of the last header
/// row, so column order and the set of scalar/parameter columns may change
/// between loads without breaking anything.
pub fn parse_experiment_table(html: &str) -> Result<ExperimentTable, TableParseError> {
    let doc = Html::parse_fragment(html);

    let by_id = selector("table#experiment-table")?;
    let any_table = selector("table")?;
    let table = doc
        .select(&by_id)
        .next()
        .or_else(|| doc.select(&any_table).next())
        .ok_or(TableParseError::NoTable)?;

    let header_row = table
        .select(&selector("thead tr")?)
        .last()
        .ok_or(TableParseError::NoTable)?;
    let th = selector("th")?;
    let columns: Vec<String> = header_row
        .select(&th)
        .map(|cell| collapse(&element_text(cell)))
        .collect();

    if !columns.iter().any(|c| c == "UUID") {
        return Err(TableParseError::MissingIdColumn);
    }

    let td = selector("td")?;
    let badge = selector("span.badge")?;
    let mut rows = Vec::new();
    for (index, tr) in table.select(&selector("tbody tr")?).enumerate() {
        let cells: Vec<ElementRef<'_>> = tr.select(&td).collect();
        let mut row = ExperimentRow::default();
        for (header, cell) in columns.iter().zip(cells) {
            if header == "Tags" {
                row.tags = cell_tags(cell, &badge);
                continue;
            }
            if WIDGET_COLUMNS.contains(&header.as_str()) {
                continue;
            }
            let value = cell_value(cell);
            assign(&mut row, header, value);
        }
        if row.id.as_str().is_empty() {
            return Err(TableParseError::EmptyId { row: index });
        }
        rows.push(row);
    }

    Ok(ExperimentTable {
        updated_at: updated_at(&doc)?,
        columns: columns
            .into_iter()
            .filter(|c| !c.is_empty() && !WIDGET_COLUMNS.contains(&c.as_str()) && c != "UUID")
            .collect(),
        rows,
    })
}

fn assign(row: &mut ExperimentRow, header: &str, value: Option<String>) {
    match header {
        "UUID" => row.id = ExperimentId::new(value.unwrap_or_default()),
        "Title" => row.title = value,
        "Filename" => row.filename = value,
        "Duration" => row.duration = value,
        "Start" => row.start = value,
        "End" => row.end = value,
        "Name" => row.name = value,
        "File space" => row.file_space = value,
        "Git commit" => row.git_commit = value,
        "Description" => row.description = value,
        "Conclusion" => row.conclusion = value,
        "Arguments" => row.arguments = value,
        "Exception" => row.exception = value,
        "" => {}
        other => {
            if let Some(value) = value {
                row.extra.insert(other.to_string(), value);
            }
        }
    }
}

fn cell_value(cell: ElementRef<'_>) -> Option<String> {
    let text = element_text(cell);
    let text = text.trim();
    if text.is_empty() || text == NOT_AVAILABLE {
        None
    } else {
        Some(text.to_string())
    }
}

fn cell_tags(cell: ElementRef<'_>, badge: &scraper::Selector) -> Vec<String> {
    let mut tags: Vec<String> = cell
        .select(badge)
        .map(|b| collapse(&element_text(b)))
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty()
        && let Some(text) = cell_value(cell)
    {
        tags = text.split_whitespace().map(str::to_string).collect();
    }
    tags.sort();
    tags.dedup();
    tags
}

fn updated_at(doc: &Html) -> Result<Option<String>, TableParseError> {
    let small = selector("small")?;
    let stamp = doc.select(&small).find_map(|el| {
        let text = collapse(&el.text().collect::<String>());
        text.strip_prefix("Updated at ").map(str::to_string)
    });
    Ok(stamp)
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "../tests/html/table_fragment.rs"]
mod tests;
