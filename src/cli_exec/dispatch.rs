use exprec_console::console::BulkAction;

use super::bulk::{handle_bulk_command, handle_tag_command};
use super::compare::handle_compare_command;
use super::config::handle_config_command;
use super::detail::{handle_restore_command, handle_save_text_command, handle_show_command};
use super::listing::{handle_list_command, handle_tags_command};
use super::*;

pub(super) fn handle_command(session: &Session, command: Commands) -> Result<()> {
    match command {
        Commands::List(args) => handle_list_command(session, &args.view, args.search, args.json)?,
        Commands::Tags(args) => handle_tags_command(session, args.json)?,
        Commands::Tag { command } => handle_tag_command(session, command)?,
        Commands::Archive(args) => handle_bulk_command(session, args, BulkAction::Archive)?,
        Commands::Delete(args) => handle_bulk_command(session, args, BulkAction::Delete)?,
        Commands::DeleteFiles(args) => {
            handle_bulk_command(session, args, BulkAction::DeleteFiles)?
        }
        Commands::Compare(args) => handle_compare_command(session, args)?,
        Commands::Show(args) => handle_show_command(session, &args.view, &args.id)?,
        Commands::Restore(args) => handle_restore_command(session, &args.view, &args.id, args.yes)?,
        Commands::SaveText(args) => handle_save_text_command(session, args)?,
        Commands::Config { command } => handle_config_command(session, command)?,
    }
    Ok(())
}
