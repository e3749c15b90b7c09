mod shell;
pub use shell::{run_shell, run_shell_and_save};

use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, ConfigError};
use crate::io::store::FileStore;
use crate::model::config::AppConfig;
use crate::ops::list_ops::{ListChange, ListError};
use crate::session::notify::{self, Notifier};
use crate::session::{Command, Session, SessionError};

type CliSession = Session<FileStore, Box<dyn Notifier>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let store = cli.store;
    let config_path = cli.config.unwrap_or_else(config_io::config_path);

    match cli.command {
        Some(Commands::Config(cmd)) => cmd_config(cmd, &config_path),
        None => cmd_shell(&load_context(store, &config_path)?, json),
        Some(Commands::List) => cmd_list(&load_context(store, &config_path)?, json),
        Some(Commands::Add(args)) => cmd_mutate(
            &load_context(store, &config_path)?,
            Command::Add {
                text: args.text.join(" "),
            },
            json,
        ),
        Some(Commands::Edit(args)) => cmd_mutate(
            &load_context(store, &config_path)?,
            Command::Edit {
                position: to_position(args.index)?,
                text: args.text.join(" "),
            },
            json,
        ),
        Some(Commands::Rm(args)) => cmd_mutate(
            &load_context(store, &config_path)?,
            Command::Delete {
                position: to_position(args.index)?,
            },
            json,
        ),
        Some(Commands::Star(args)) => cmd_mutate(
            &load_context(store, &config_path)?,
            Command::ToggleFavorite {
                position: to_position(args.index)?,
            },
            json,
        ),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Effective configuration for commands that touch the task list
struct Context {
    config: AppConfig,
    store_path: PathBuf,
}

fn load_context(store_flag: Option<PathBuf>, config_path: &Path) -> Result<Context, ConfigError> {
    let config = config_io::read_config(config_path)?;
    let store_path = resolve_store_path(store_flag, &config);
    Ok(Context { config, store_path })
}

/// `--store` wins over `store.path`, which wins over the data-dir default
fn resolve_store_path(flag: Option<PathBuf>, config: &AppConfig) -> PathBuf {
    flag.or_else(|| config.store.path.clone())
        .unwrap_or_else(config_io::default_store_path)
}

fn open_session(ctx: &Context, autosave: bool) -> Result<CliSession, SessionError> {
    let store = FileStore::new(ctx.store_path.clone(), ctx.config.store.key.clone());
    Session::open(store, notify::from_config(ctx.config.notify.bell), autosave)
}

/// Convert a 1-based index typed by the user into a list position
pub(crate) fn to_position(index: usize) -> Result<usize, String> {
    index
        .checked_sub(1)
        .ok_or_else(|| "task indices start at 1".to_string())
}

/// Restate list errors with the 1-based indices the user typed
pub(crate) fn user_error(err: SessionError) -> Box<dyn std::error::Error> {
    match err {
        SessionError::List(ListError::IndexOutOfRange { position, len }) => {
            format!("no task {} (list has {} tasks)", position + 1, len).into()
        }
        SessionError::List(ListError::EmptyText) => "nothing to add: task text is empty".into(),
        other => other.into(),
    }
}

fn print_list(session: &CliSession, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&list_to_json(session.tasks()))?);
    } else {
        for line in format_list(session.tasks()) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn print_change(
    session: &CliSession,
    change: ListChange,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&change_to_json(change))?);
    } else {
        println!("{}", format_change(change, session.tasks()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_shell(ctx: &Context, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(ctx, ctx.config.store.autosave)?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run_shell_and_save(&mut session, stdin.lock(), &mut stdout, json)
}

fn cmd_list(ctx: &Context, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let session = open_session(ctx, false)?;
    print_list(&session, json)
}

/// One-shot mutation: load, apply, save, report
fn cmd_mutate(ctx: &Context, command: Command, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(ctx, true)?;
    let change = session.dispatch(command).map_err(user_error)?;
    print_change(&session, change, json)
}

fn cmd_config(cmd: ConfigCmd, config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match cmd.action {
        ConfigAction::Show => {
            let config = config_io::read_config(config_path)?;
            print!("{}", config_io::render_config(&config)?);
        }
        ConfigAction::Set { key, value } => {
            config_io::update_config_file(config_path, &key, &value)?;
            println!("{} = {}", key, value);
        }
    }
    Ok(())
}
