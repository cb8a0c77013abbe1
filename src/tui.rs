use std::path::PathBuf;

use anyhow::Result;

#[derive(Clone, Debug)]
pub struct TuiRunOptions {
    /// Dashboard backend, already resolved from flag, env and config.
    pub base_url: String,
    pub state_dir: PathBuf,
}

pub fn run_with_options(opts: TuiRunOptions) -> Result<()> {
    crate::tui_shell::run_with_options(opts)
}
