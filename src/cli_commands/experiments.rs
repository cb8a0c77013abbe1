use clap::{Args, Subcommand};

/// Which table view to load before acting on ids.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct ViewArgs {
    /// Use the archive view
    #[arg(long, conflicts_with = "tag")]
    pub(crate) archive: bool,
    /// Use the view of one tag (archived experiments excluded)
    #[arg(long)]
    pub(crate) tag: Option<String>,
}

#[derive(Args)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    pub(crate) view: ViewArgs,
    /// Only rows matching this text (id, title, filename, tags)
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct TagsArgs {
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct TagArgs {
    /// Experiment ids (unique prefixes are accepted)
    #[arg(required = true)]
    pub(crate) ids: Vec<String>,
    /// Whitespace-separated tag names
    #[arg(long)]
    pub(crate) tags: String,
    #[command(flatten)]
    pub(crate) view: ViewArgs,
}

#[derive(Subcommand)]
pub(crate) enum TagCommands {
    /// Add tags to experiments
    Add(TagArgs),
    /// Remove tags from experiments
    Remove(TagArgs),
}

#[derive(Args)]
pub(crate) struct BulkArgs {
    /// Experiment ids (unique prefixes are accepted)
    #[arg(required = true)]
    pub(crate) ids: Vec<String>,
    /// Do not ask for confirmation
    #[arg(short = 'y', long)]
    pub(crate) yes: bool,
    #[command(flatten)]
    pub(crate) view: ViewArgs,
}

#[derive(Args)]
pub(crate) struct CompareArgs {
    /// One id compares against the local code; two ids compare each other
    #[arg(required = true, num_args = 1..=2)]
    pub(crate) ids: Vec<String>,
    /// Print the diff in two columns
    #[arg(long)]
    pub(crate) side_by_side: bool,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) view: ViewArgs,
}

#[derive(Args)]
pub(crate) struct ShowArgs {
    pub(crate) id: String,
    #[command(flatten)]
    pub(crate) view: ViewArgs,
}

#[derive(Args)]
pub(crate) struct RestoreArgs {
    pub(crate) id: String,
    /// Do not ask for confirmation
    #[arg(short = 'y', long)]
    pub(crate) yes: bool,
    #[command(flatten)]
    pub(crate) view: ViewArgs,
}

#[derive(Args)]
pub(crate) struct SaveTextArgs {
    pub(crate) id: String,
    /// title, description or conclusion
    pub(crate) field: String,
    pub(crate) text: String,
    #[command(flatten)]
    pub(crate) view: ViewArgs,
}
