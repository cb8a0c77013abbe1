use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show the effective configuration
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Change the stored configuration
    Set {
        /// Dashboard backend URL
        #[arg(long = "backend-url", value_name = "URL")]
        backend_url: Option<String>,
        /// Days saved column and sort settings stay valid
        #[arg(long)]
        retention_days: Option<u64>,
        /// Rows per table page in the TUI
        #[arg(long)]
        page_size: Option<usize>,
    },
}
