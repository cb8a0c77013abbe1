use clap::Subcommand;

pub(crate) mod config;
pub(crate) mod experiments;

pub(crate) use self::config::ConfigCommands;
pub(crate) use self::experiments::TagCommands;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List experiments (inbox by default)
    List(experiments::ListArgs),

    /// List every tag known to the backend
    Tags(experiments::TagsArgs),

    /// Add or remove tags on experiments
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },

    /// Move experiments to the archive
    Archive(experiments::BulkArgs),

    /// Delete experiment records
    Delete(experiments::BulkArgs),

    /// Delete the files recorded with experiments
    #[command(name = "delete-files")]
    DeleteFiles(experiments::BulkArgs),

    /// Compare an experiment with the local code, or two experiments
    Compare(experiments::CompareArgs),

    /// Show one experiment
    Show(experiments::ShowArgs),

    /// Restore an experiment's source code into the local working copy
    Restore(experiments::RestoreArgs),

    /// Save the title, description or conclusion of an experiment
    #[command(name = "save-text")]
    SaveText(experiments::SaveTextArgs),

    /// Show or change the client configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}
