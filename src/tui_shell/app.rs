use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::console::{Console, PrefsBinding, TablePhase, View as ConsoleView};
use crate::model::{ARCHIVE_TAG, ExperimentId, FilterPredicate, TableColumn, TextField};
use crate::remote::RemoteClient;
use crate::store::{LocalStore, table_key};

use super::input::Input;
use super::modal;
use super::view::{RenderCtx, View};
use super::views::{ComparisonPane, DetailPane, TablePane, TagSidebar};

mod event_loop;
mod keys;
mod render;

pub(super) fn run(opts: crate::tui::TuiRunOptions) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("TUI requires an interactive terminal (TTY)");
    }
    let mut app = App::connect(&opts)?;

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let res = event_loop::run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Focus {
    Table,
    Tags,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum TextInputAction {
    AddTags,
    RemoveTags,
    Search,
    ToggleColumns,
    EditField { id: ExperimentId, field: TextField },
}

#[derive(Debug)]
pub(super) enum ModalKind {
    Viewer,
    /// Answers the console's pending confirmation.
    ConfirmAction,
    TextInput {
        action: TextInputAction,
        prompt: String,
    },
}

#[derive(Debug)]
pub(super) struct Modal {
    pub(super) title: String,
    pub(super) lines: Vec<String>,
    pub(super) scroll: usize,

    pub(super) kind: ModalKind,
    pub(super) input: Input,
}

/// One entry of the tag sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Shortcut {
    Inbox,
    Archive,
    Tag(String),
}

impl Shortcut {
    pub(super) fn label(&self) -> String {
        match self {
            Shortcut::Inbox => "Inbox".to_string(),
            Shortcut::Archive => "Archive".to_string(),
            Shortcut::Tag(tag) => format!("# {}", tag),
        }
    }

    pub(super) fn filter(&self) -> FilterPredicate {
        match self {
            Shortcut::Inbox => FilterPredicate::inbox(),
            Shortcut::Archive => FilterPredicate::archive(),
            Shortcut::Tag(tag) => FilterPredicate::tag_shortcut(tag),
        }
    }
}

pub(super) struct App {
    pub(super) console: Console,
    pub(super) base_url: String,
    pub(super) focus: Focus,
    pub(super) tag_cursor: usize,
    pub(super) modal: Option<Modal>,
    pub(super) quit: bool,
}

impl App {
    pub(super) fn new(console: Console, base_url: String) -> Self {
        Self {
            console,
            base_url,
            focus: Focus::Table,
            tag_cursor: 0,
            modal: None,
            quit: false,
        }
    }

    fn connect(opts: &crate::tui::TuiRunOptions) -> Result<Self> {
        let store = LocalStore::open(&opts.state_dir)?;
        let cfg = store.read_config()?;
        let client = RemoteClient::new(&opts.base_url)?;
        let binding = PrefsBinding {
            store,
            key: table_key(&opts.base_url),
            retention_days: cfg.table_state_retention_days,
        };
        let mut console =
            Console::new(Arc::new(client), cfg.page_size).with_table_prefs(binding);
        console.start();
        tracing::info!(url = %opts.base_url, "console started");
        Ok(Self::new(console, opts.base_url.clone()))
    }

    /// Apply finished background work, then surface whatever needs the
    /// user: a pending confirmation first, otherwise the next notice.
    pub(super) fn tick(&mut self) {
        self.console.pump();
        if self.modal.is_some() {
            return;
        }
        if let Some(pending) = self.console.pending() {
            let mut lines: Vec<String> = pending.prompt.lines().map(str::to_string).collect();
            lines.push(String::new());
            lines.push("Enter/y: confirm    Esc/n: cancel".to_string());
            self.modal = Some(Modal {
                title: "Confirm".to_string(),
                lines,
                scroll: 0,
                kind: ModalKind::ConfirmAction,
                input: Input::default(),
            });
        } else if let Some(notice) = self.console.take_notice() {
            self.open_modal(notice.title(), notice.message.lines().map(str::to_string).collect());
        }
    }

    pub(super) fn open_modal(&mut self, title: impl Into<String>, lines: Vec<String>) {
        self.modal = Some(Modal {
            title: title.into(),
            lines,
            scroll: 0,
            kind: ModalKind::Viewer,
            input: Input::default(),
        });
    }

    pub(super) fn open_text_input(
        &mut self,
        action: TextInputAction,
        title: impl Into<String>,
        lines: Vec<String>,
        prompt: &str,
        initial: &str,
    ) {
        self.modal = Some(Modal {
            title: title.into(),
            lines,
            scroll: 0,
            kind: ModalKind::TextInput {
                action,
                prompt: prompt.to_string(),
            },
            input: Input::with_text(initial),
        });
    }

    pub(super) fn close_modal(&mut self) {
        self.modal = None;
    }

    pub(super) fn shortcuts(&self) -> Vec<Shortcut> {
        let mut out = vec![Shortcut::Inbox, Shortcut::Archive];
        out.extend(
            self.console
                .tags()
                .tags()
                .iter()
                .filter(|t| t.as_str() != ARCHIVE_TAG)
                .map(|t| Shortcut::Tag(t.clone())),
        );
        out
    }

    pub(super) fn cursor_id(&self) -> Option<ExperimentId> {
        self.console.table().cursor_row().map(|r| r.id.clone())
    }

    pub(super) fn submit_text_input(&mut self, action: TextInputAction, value: String) {
        match action {
            TextInputAction::AddTags => {
                self.console.add_tags(&value);
            }
            TextInputAction::RemoveTags => {
                self.console.remove_tags(&value);
            }
            TextInputAction::Search => self.console.search(&value),
            TextInputAction::ToggleColumns => self.toggle_columns(&value),
            TextInputAction::EditField { id, field } => {
                self.console.save_text(&id, field, &value);
            }
        }
    }

    /// Comma-separated column headers, matched case-insensitively.
    fn toggle_columns(&mut self, value: &str) {
        let mut unknown = Vec::new();
        for name in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let column = TableColumn::ALL
                .into_iter()
                .find(|c| c.header().eq_ignore_ascii_case(name));
            match column {
                Some(column) => {
                    self.console.toggle_column(column);
                }
                None => unknown.push(name.to_string()),
            }
        }
        if !unknown.is_empty() {
            self.open_modal(
                "Warning",
                vec![format!("unknown column(s): {}", unknown.join(", "))],
            );
        }
    }

    pub(super) fn column_lines(&self) -> Vec<String> {
        let table = self.console.table();
        TableColumn::ALL
            .into_iter()
            .filter(|c| *c != TableColumn::Id)
            .map(|c| {
                let mark = if table.is_hidden(c) { "[ ]" } else { "[x]" };
                format!("{} {}", mark, c.header())
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/app_tests.rs"]
mod tests;
