use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use exprec_console::logging;
use exprec_console::model::ConsoleConfig;
use exprec_console::store::{LocalStore, STATE_DIR};

use crate::Commands;

#[derive(Parser)]
#[command(name = "exprec")]
#[command(about = "Browse, tag and compare recorded experiments", long_about = None)]
pub(crate) struct Cli {
    /// Dashboard backend URL (overrides the config file)
    #[arg(long, env = "EXPREC_URL", global = true)]
    url: Option<String>,

    /// Directory for config, saved table state and the TUI log
    #[arg(long, env = "EXPREC_STATE_DIR", value_name = "PATH", global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Resolved global settings shared by every subcommand.
pub(crate) struct Session {
    pub(crate) store: LocalStore,
    pub(crate) config: ConsoleConfig,
    pub(crate) base_url: String,
}

impl Session {
    fn open(url: Option<&str>, state_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match state_dir {
            Some(dir) => dir,
            None => std::env::current_dir()
                .context("get current dir")?
                .join(STATE_DIR),
        };
        let store = LocalStore::open(&dir)?;
        let config = store.read_config()?;
        let base_url = config.resolve_base_url(url);
        Ok(Self {
            store,
            config,
            base_url,
        })
    }
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    let session = Session::open(cli.url.as_deref(), cli.state_dir)?;

    match cli.command {
        None => {
            logging::init_file(&session.store.log_path())?;
            exprec_console::tui::run_with_options(exprec_console::tui::TuiRunOptions {
                base_url: session.base_url.clone(),
                state_dir: session.store.root().to_path_buf(),
            })?;
        }
        Some(command) => {
            logging::init_stderr();
            crate::cli_exec::handle_command(&session, command)?
        }
    }

    Ok(())
}
