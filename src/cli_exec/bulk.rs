use exprec_console::console::BulkAction;

use crate::cli_commands::experiments::BulkArgs;

use super::*;

pub(super) fn handle_tag_command(session: &Session, command: TagCommands) -> Result<()> {
    let (args, add) = match command {
        TagCommands::Add(args) => (args, true),
        TagCommands::Remove(args) => (args, false),
    };
    let mut console = connect(session)?;
    load_view(&mut console, &args.view)?;
    select_ids(&mut console, &args.ids)?;
    let outcome = if add {
        console.add_tags(&args.tags)
    } else {
        console.remove_tags(&args.tags)
    };
    finish_bulk(&mut console, outcome, true)
}

pub(super) fn handle_bulk_command(
    session: &Session,
    args: BulkArgs,
    action: BulkAction,
) -> Result<()> {
    let mut console = connect(session)?;
    load_view(&mut console, &args.view)?;
    select_ids(&mut console, &args.ids)?;
    let outcome = console.request_bulk(action);
    finish_bulk(&mut console, outcome, args.yes)
}

fn finish_bulk(console: &mut Console, outcome: ActionOutcome, yes: bool) -> Result<()> {
    if !run_action(console, outcome, yes)? {
        return Ok(());
    }
    console.wait_idle();

    let Some(report) = console.last_bulk_report() else {
        anyhow::bail!("bulk action did not report back");
    };
    println!("{}", report.summary());
    let failed: Vec<_> = report.failed().collect();
    for outcome in &failed {
        eprintln!(
            "  {}: {}",
            outcome.id,
            outcome.error.as_deref().unwrap_or("failed")
        );
    }
    let (failed, total) = (failed.len(), report.outcomes.len());

    settle(console)?;
    if failed > 0 {
        anyhow::bail!("{} of {} requests failed", failed, total);
    }
    Ok(())
}
