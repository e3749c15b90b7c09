use std::io::{BufRead, Write};

use clap::Parser;

use super::{to_position, user_error};
use crate::cli::commands::{ShellCommand, ShellLine};
use crate::cli::output::{change_to_json, format_change, format_list, list_to_json};
use crate::io::store::TaskStore;
use crate::ops::list_ops::ListChange;
use crate::session::{Command, Notifier, Session};

/// Run the shell, then save the session however the loop ended.
///
/// An error from the loop itself is reported ahead of a failed save.
pub fn run_shell_and_save<S, N, R, W>(
    session: &mut Session<S, N>,
    input: R,
    out: &mut W,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: TaskStore,
    N: Notifier,
    R: BufRead,
    W: Write,
{
    let ran = run_shell(session, input, out, json);
    let saved = session.save();
    ran?;
    saved.map_err(user_error)
}

/// Read commands line by line until `quit` or end of input.
///
/// Bad input and failed commands are reported on `out` and the loop keeps
/// going. The caller saves the session afterwards.
pub fn run_shell<S, N, R, W>(
    session: &mut Session<S, N>,
    input: R,
    out: &mut W,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: TaskStore,
    N: Notifier,
    R: BufRead,
    W: Write,
{
    write_list(session, out, json)?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let parsed = match ShellLine::try_parse_from(words.iter().copied()) {
            Ok(parsed) => parsed,
            Err(e) => {
                writeln!(out, "{}", e.to_string().trim_end())?;
                continue;
            }
        };

        let command = match parsed.command {
            ShellCommand::List => {
                write_list(session, out, json)?;
                continue;
            }
            ShellCommand::Save => {
                match session.save() {
                    Ok(()) => writeln!(out, "saved")?,
                    Err(e) => writeln!(out, "error: {}", user_error(e))?,
                }
                continue;
            }
            ShellCommand::Quit => break,
            ShellCommand::Add(_) => Ok(Command::Add {
                text: text_after(&line, 1).to_string(),
            }),
            ShellCommand::Edit(args) => to_position(args.index).map(|position| Command::Edit {
                position,
                text: text_after(&line, 2).to_string(),
            }),
            ShellCommand::Rm(args) => {
                to_position(args.index).map(|position| Command::Delete { position })
            }
            ShellCommand::Star(args) => {
                to_position(args.index).map(|position| Command::ToggleFavorite { position })
            }
        };

        let command = match command {
            Ok(command) => command,
            Err(msg) => {
                writeln!(out, "error: {}", msg)?;
                continue;
            }
        };

        match session.dispatch(command) {
            Ok(change) => write_change(session, change, out, json)?,
            Err(e) if e.is_rejection() => writeln!(out, "{}", user_error(e))?,
            Err(e) => {
                if let Some(change) = e.applied_change() {
                    write_change(session, change, out, json)?;
                }
                writeln!(out, "error: {}", user_error(e))?;
            }
        }
    }
    Ok(())
}

/// The rest of `line` after its first `words` words, spacing kept as typed
fn text_after(line: &str, words: usize) -> &str {
    let mut rest = line.trim_start();
    for _ in 0..words {
        rest = match rest.split_once(char::is_whitespace) {
            Some((_, tail)) => tail.trim_start(),
            None => "",
        };
    }
    rest
}

fn write_change<S, N, W>(
    session: &Session<S, N>,
    change: ListChange,
    out: &mut W,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: TaskStore,
    N: Notifier,
    W: Write,
{
    if json {
        writeln!(out, "{}", serde_json::to_string(&change_to_json(change))?)?;
    } else {
        writeln!(out, "{}", format_change(change, session.tasks()))?;
        write_list(session, out, json)?;
    }
    Ok(())
}

fn write_list<S, N, W>(
    session: &Session<S, N>,
    out: &mut W,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: TaskStore,
    N: Notifier,
    W: Write,
{
    if json {
        writeln!(out, "{}", serde_json::to_string(&list_to_json(session.tasks()))?)?;
    } else {
        for line in format_list(session.tasks()) {
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}
