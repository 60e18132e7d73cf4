//
// src/shell.rs
//
// Implementation of beagle-git shell: an interactive session that keeps one
// repository open across commands
//
// (C) 2020 Taras Zakharko
//
// This code is licensed under GPL 3.0

use anyhow::{Result, bail};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::controller::Readiness;
use crate::engine::VersionControlEngine;
use crate::session::{LogLevel, Session};

const HELP : &str = concat!(
    "Commands:\n",
    "  open PATH         open the repository at PATH and show its status\n",
    "  init [PATH]       create a repository (default: the current path)\n",
    "  status            show the status of the current path\n",
    "  add FILE          stage FILE\n",
    "  add-all           stage every change in the working tree\n",
    "  commit [MESSAGE]  commit the staging area\n",
    "  push [USERNAME]   push to GitHub\n",
    "  help              show this text\n",
    "  quit              leave the shell"
);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Open(PathBuf),
    Init(Option<PathBuf>),
    Status,
    Add(PathBuf),
    AddAll,
    Commit(String),
    Push(Option<String>),
    Help,
    Quit
}

impl ShellCommand {
    /// Parse one input line, `None` for a blank line
    ///
    /// Everything after `commit ` is the message, verbatim
    pub fn parse(line: &str) -> Result<Option<ShellCommand>> {
        let line = line.trim_end_matches(|c| c == '\n' || c == '\r');
        let trimmed = line.trim_start();

        if trimmed.trim().is_empty() {
            return Ok( None );
        }

        // split off the command word and the single separator after it
        let (word, rest) = match trimmed.find(char::is_whitespace) {
            Some(at) => {
                let (word, rest) = trimmed.split_at(at);
                let separator = rest.chars().next().map_or(0, char::len_utf8);

                (word, &rest[separator..])
            },
            None => (trimmed, "")
        };
        let argument = rest.trim();

        let command = match word {
            "open" if !argument.is_empty() => ShellCommand::Open(PathBuf::from(argument)),
            "open"                         => bail!("usage: open PATH"),
            "init" if argument.is_empty()  => ShellCommand::Init(None),
            "init"                         => ShellCommand::Init(Some(PathBuf::from(argument))),
            "status"                       => ShellCommand::Status,
            "add" if !argument.is_empty()  => ShellCommand::Add(PathBuf::from(argument)),
            "add"                          => bail!("usage: add FILE (or add-all)"),
            "add-all"                      => ShellCommand::AddAll,
            "commit"                       => ShellCommand::Commit(rest.to_owned()),
            "push" if argument.is_empty()  => ShellCommand::Push(None),
            "push"                         => ShellCommand::Push(Some(argument.to_owned())),
            "help"                         => ShellCommand::Help,
            "quit" | "exit"                => ShellCommand::Quit,
            other                          => bail!("unknown command '{}' (try 'help')", other)
        };

        Ok( Some(command) )
    }
}

/// Run the shell until `quit` or the end of the input
///
/// The repository at `start` is opened first. Prompts go to `prompt`,
/// everything else to the session log.
pub fn run<E, R, W>(
    session: &mut Session<E>,
    input: R,
    prompt: &mut W,
    start: PathBuf,
    default_username: Option<String>
) -> Result<()>
where
    E: VersionControlEngine,
    R: BufRead,
    W: Write
{
    let mut path = start;
    session.refresh_status(&path);

    let mut lines = input.lines();

    loop {
        let marker = match session.readiness() {
            Readiness::Ready => "ready",
            Readiness::Empty => "no repository"
        };
        write!(prompt, "beagle-git [{}]> ", marker)?;
        prompt.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None       => break
        };

        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None)          => continue,
            Err(err)          => {
                session.note(LogLevel::Error, err.to_string());
                continue;
            }
        };

        match command {
            ShellCommand::Open(new_path) => {
                path = new_path;
                session.refresh_status(&path);
            },
            ShellCommand::Init(new_path) => {
                if let Some(new_path) = new_path {
                    path = new_path;
                }
                session.initialize(&path);
            },
            ShellCommand::Status => {
                session.refresh_status(&path);
            },
            ShellCommand::Add(file) => {
                session.stage_file(&file);
            },
            ShellCommand::AddAll => {
                session.stage_all();
            },
            ShellCommand::Commit(message) => {
                session.commit(&message);
            },
            ShellCommand::Push(username) => {
                match username.or_else(|| default_username.clone()) {
                    Some(username) => session.push(&username),
                    None => session.note(LogLevel::Error, "usage: push USERNAME (or set `username` in the configuration)")
                }
            },
            ShellCommand::Help => {
                session.note(LogLevel::Info, HELP);
            },
            ShellCommand::Quit => {
                break;
            }
        }
    }

    writeln!(prompt)?;

    Ok( () )
}
