use anyhow::Result;

mod app;
mod input;
mod modal;
mod view;
mod views;

// Make core TUI types available to submodules via `super::...`.
use app::{App, Focus, Modal, ModalKind, TextInputAction};
use view::{RenderCtx, View, render_view_chrome};

pub fn run_with_options(opts: crate::tui::TuiRunOptions) -> Result<()> {
    app::run(opts)
}
