use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use exprec_console::console::{
    ActionOutcome, Console, NoticeLevel, PrefsBinding, TablePhase, UserInputError, View,
};
use exprec_console::model::{ExperimentId, FilterPredicate};
use exprec_console::remote::RemoteClient;
use exprec_console::store::table_key;

use crate::cli_commands::experiments::ViewArgs;
use crate::cli_runtime::Session;
use crate::{Commands, ConfigCommands, TagCommands};

mod bulk;
mod compare;
mod config;
mod detail;
mod dispatch;
mod listing;

pub(crate) fn handle_command(session: &Session, command: Commands) -> Result<()> {
    dispatch::handle_command(session, command)
}

fn connect(session: &Session) -> Result<Console> {
    let client = RemoteClient::new(&session.base_url)?;
    let binding = PrefsBinding {
        store: session.store.clone(),
        key: table_key(&session.base_url),
        retention_days: session.config.table_state_retention_days,
    };
    Ok(Console::new(Arc::new(client), session.config.page_size).with_table_prefs(binding))
}

fn view_filter(view: &ViewArgs) -> FilterPredicate {
    match (&view.tag, view.archive) {
        (Some(tag), _) => FilterPredicate::tag_shortcut(tag),
        (None, true) => FilterPredicate::archive(),
        (None, false) => FilterPredicate::inbox(),
    }
}

/// Load the table the ids will be looked up in.
fn load_view(console: &mut Console, view: &ViewArgs) -> Result<()> {
    console.load(view_filter(view));
    settle(console)?;
    if console.table().phase() != TablePhase::Loaded {
        anyhow::bail!("experiment table could not be loaded");
    }
    Ok(())
}

/// Wait for background work, then report what it left behind. Error notices
/// become the command's error.
fn settle(console: &mut Console) -> Result<()> {
    console.wait_idle();
    let mut failures = Vec::new();
    while let Some(notice) = console.take_notice() {
        match notice.level {
            NoticeLevel::Info => println!("{}", notice.message),
            NoticeLevel::Warning => eprintln!("warning: {}", notice.message),
            NoticeLevel::Error => failures.push(notice.message),
        }
    }
    if !failures.is_empty() {
        anyhow::bail!("{}", failures.join("\n"));
    }
    Ok(())
}

/// Exact id, or a prefix matching exactly one loaded row.
fn resolve_id(console: &Console, text: &str) -> Result<ExperimentId> {
    let rows = console.table().rows();
    if let Some(row) = rows.iter().find(|r| r.id.as_str() == text) {
        return Ok(row.id.clone());
    }
    let matches: Vec<&ExperimentId> = rows
        .iter()
        .map(|r| &r.id)
        .filter(|id| id.as_str().starts_with(text))
        .collect();
    match matches.as_slice() {
        [id] => Ok((*id).clone()),
        [] => Err(UserInputError::UnknownExperiment(ExperimentId::new(text)))
            .with_context(|| format!("not in the {} view", console.filter().label())),
        many => anyhow::bail!("id prefix {:?} is ambiguous ({} matches)", text, many.len()),
    }
}

fn select_ids(console: &mut Console, ids: &[String]) -> Result<Vec<ExperimentId>> {
    let mut selected = Vec::with_capacity(ids.len());
    for text in ids {
        let id = resolve_id(console, text)?;
        console.select(&id)?;
        selected.push(id);
    }
    Ok(selected)
}

fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        anyhow::bail!("{}\n(pass --yes to confirm without a terminal)", prompt);
    }
    print!("{} [y/N] ", prompt);
    io::stdout().flush().context("flush stdout")?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("read confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Returns false when the user declined.
fn run_action(console: &mut Console, outcome: ActionOutcome, yes: bool) -> Result<bool> {
    match outcome {
        ActionOutcome::Started => Ok(true),
        ActionOutcome::Rejected(err) => Err(err.into()),
        ActionOutcome::NeedsConfirmation => {
            let prompt = console
                .pending()
                .map(|p| p.prompt.clone())
                .unwrap_or_default();
            if confirm(&prompt, yes)? {
                console.confirm();
                Ok(true)
            } else {
                console.decline();
                println!("Aborted");
                Ok(false)
            }
        }
    }
}
