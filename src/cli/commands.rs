use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "starlist", about = concat!("[*] starlist v", env!("CARGO_PKG_VERSION"), " - one list, favorites first"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use this prefs file instead of the configured one
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Read configuration from this file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks, favorites first
    List,
    /// Add a task at the end of the list
    Add(AddArgs),
    /// Replace the text of a task
    Edit(EditArgs),
    /// Delete a task
    Rm(IndexArgs),
    /// Toggle a task's favorite mark
    Star(IndexArgs),
    /// Show or change configuration
    Config(ConfigCmd),
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text (words are joined with spaces)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task index (1-based)
    pub index: usize,
    /// New text (may be empty)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct IndexArgs {
    /// Task index (1-based)
    pub index: usize,
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Set a value: store.path, store.key, store.autosave, notify.bell
    Set { key: String, value: String },
}

// ---------------------------------------------------------------------------
// Shell grammar
// ---------------------------------------------------------------------------

/// One line typed into the interactive shell
#[derive(Parser)]
#[command(name = "shell", no_binary_name = true, disable_help_flag = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand)]
pub enum ShellCommand {
    /// List tasks
    #[command(alias = "ls")]
    List,
    /// Add a task
    Add(AddArgs),
    /// Replace the text of a task
    Edit(EditArgs),
    /// Delete a task
    #[command(alias = "del")]
    Rm(IndexArgs),
    /// Toggle a task's favorite mark
    Star(IndexArgs),
    /// Write the list to the store now
    Save,
    /// Save and leave
    #[command(alias = "exit")]
    Quit,
}
