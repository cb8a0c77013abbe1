use serde::Serialize;

use exprec_console::console::{ComparisonView, DiffPanel};
use exprec_console::diff::{DiffLine, DiffRow, FileChange, UnifiedDiff, diff_rows};

use crate::cli_commands::experiments::CompareArgs;

use super::*;

const SIDE_WIDTH: usize = 60;

#[derive(Serialize)]
struct ComparisonJson<'a> {
    plan: String,
    summary: &'a [String],
    diff: Option<&'a UnifiedDiff>,
    diff_error: Option<&'a str>,
}

pub(super) fn handle_compare_command(session: &Session, args: CompareArgs) -> Result<()> {
    let mut console = connect(session)?;
    load_view(&mut console, &args.view)?;
    select_ids(&mut console, &args.ids)?;
    if args.side_by_side {
        console.toggle_diff_layout();
    }
    let outcome = console.compare();
    run_action(&mut console, outcome, false)?;
    settle(&mut console)?;

    let View::Comparison(view) = console.view() else {
        anyhow::bail!("comparison did not complete");
    };
    if args.json {
        let out = ComparisonJson {
            plan: view.plan.label(),
            summary: &view.summary,
            diff: match &view.diff {
                DiffPanel::Parsed(diff) => Some(diff),
                _ => None,
            },
            diff_error: match &view.diff {
                DiffPanel::Failed(err) => Some(err.as_str()),
                _ => None,
            },
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("serialize comparison json")?
        );
    } else {
        for line in comparison_lines(view) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn comparison_lines(view: &ComparisonView) -> Vec<String> {
    let mut out = view.summary.clone();
    match &view.diff {
        DiffPanel::Absent => {}
        DiffPanel::Failed(err) => out.push(format!("(diff could not be rendered: {})", err)),
        DiffPanel::Parsed(diff) if diff.is_empty() => out.push("(no differences)".to_string()),
        DiffPanel::Parsed(diff) => {
            for row in diff_rows(diff, view.layout) {
                match row {
                    DiffRow::File(file) => {
                        out.push(String::new());
                        out.push(format!(
                            "=== {} (+{} -{})",
                            file.display_name(),
                            file.added(),
                            file.removed()
                        ));
                        match &file.change {
                            FileChange::Binary => out.push("    binary files differ".to_string()),
                            FileChange::OnlyIn { dir, .. } => {
                                out.push(format!("    only in {}", dir))
                            }
                            FileChange::Modified => {}
                        }
                    }
                    DiffRow::Hunk(hunk) => out.push(hunk.header()),
                    DiffRow::Line(line) => out.push(format!("{}{}", line.kind.marker(), line.text)),
                    DiffRow::Pair { left, right } => {
                        let pair = format!("{} | {}", side_cell(left), side_cell(right));
                        out.push(pair.trim_end().to_string());
                    }
                }
            }
        }
    }
    out
}

fn side_cell(line: Option<&DiffLine>) -> String {
    let text = line
        .map(|l| format!("{}{}", l.kind.marker(), l.text))
        .unwrap_or_default();
    let clipped: String = text.chars().take(SIDE_WIDTH).collect();
    format!("{:<width$}", clipped, width = SIDE_WIDTH)
}
