use exprec_console::model::TextField;

use crate::cli_commands::experiments::SaveTextArgs;

use super::*;

pub(super) fn handle_show_command(session: &Session, view: &ViewArgs, id: &str) -> Result<()> {
    let mut console = connect(session)?;
    load_view(&mut console, view)?;
    let id = resolve_id(&console, id)?;
    let outcome = console.open_detail(&id);
    run_action(&mut console, outcome, false)?;
    settle(&mut console)?;

    let View::Detail(detail) = console.view() else {
        anyhow::bail!("experiment {} could not be shown", id);
    };
    for line in &detail.lines {
        println!("{}", line);
    }
    Ok(())
}

pub(super) fn handle_restore_command(
    session: &Session,
    view: &ViewArgs,
    id: &str,
    yes: bool,
) -> Result<()> {
    let mut console = connect(session)?;
    load_view(&mut console, view)?;
    let id = resolve_id(&console, id)?;
    let outcome = console.restore_source_code(&id);
    if run_action(&mut console, outcome, yes)? {
        settle(&mut console)?;
    }
    Ok(())
}

pub(super) fn handle_save_text_command(session: &Session, args: SaveTextArgs) -> Result<()> {
    let field: TextField = args.field.parse()?;
    let mut console = connect(session)?;
    load_view(&mut console, &args.view)?;
    let id = resolve_id(&console, &args.id)?;
    let outcome = console.save_text(&id, field, &args.text);
    run_action(&mut console, outcome, false)?;
    settle(&mut console)?;
    if let Some(status) = console.status() {
        println!("{}", status);
    }
    Ok(())
}
