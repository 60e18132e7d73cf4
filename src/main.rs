//
// beagle-git
//
// A minimal git front-end: initialize, stage, commit and push to GitHub
//
// (C) 2020 Taras Zakharko
//
// This code is licensed under GPL 3.0


// Errors
#[macro_use] mod error_macros;
mod error;

// CLI interface
#[macro_use] extern crate clap;
#[macro_use] mod cli_app;

// Various internal frameworks and utilities
mod config;
mod util;
mod status;
mod engine;
mod repository;

// Repository lifecycle and the user session around it
mod controller;
mod session;

// beagle-git shell
mod shell;

#[cfg(test)]
mod testing;

use anyhow::{Result, anyhow};
use std::path::Path;

use cli_app::{Command, Invocation};
use config::Config;
use controller::{Readiness, RepositoryController};
use repository::GitEngine;
use session::{LogEntry, LogLevel, OutputLog, Session};

/// Print log entries as they are appended
fn print_entry(entry: &LogEntry) {
    use cli_app::style;

    match entry.level {
        LogLevel::Info    => stdout!("{}", entry),
        LogLevel::Success => stdout!("{}", style(entry).green()),
        LogLevel::Error   => stderr!("{}", style(entry).red())
    }
}

/// Open `repo` quietly; false if the session has nothing to work on
fn open_for_update(session: &mut Session<GitEngine>, repo: &Path) -> bool {
    session.open(repo);

    session.readiness() == Readiness::Ready
}

fn run(invocation: Invocation) -> Result<bool> {
    let config = Config::load(invocation.config.as_deref())?;

    let engine = GitEngine::new(config.engine_settings());
    let controller = RepositoryController::new(engine, config.push_settings());
    let mut session = Session::new(controller, OutputLog::with_listener(print_entry));

    match invocation.command {
        Command::Init { path } => {
            session.initialize(&path);
        },
        Command::Status { path } => {
            session.refresh_status(&path);
        },
        Command::Add { repo, file } => {
            if open_for_update(&mut session, &repo) {
                session.stage_file(&file);
            }
        },
        Command::AddAll { repo } => {
            if open_for_update(&mut session, &repo) {
                session.stage_all();
            }
        },
        Command::Commit { repo, message } => {
            if open_for_update(&mut session, &repo) {
                session.commit(&message);
            }
        },
        Command::Push { repo, username } => {
            let username = username.or_else(|| config.username.clone()).ok_or_else(|| {
                anyhow!("no GitHub user name (give USERNAME or set `username` in the configuration)")
            })?;

            if open_for_update(&mut session, &repo) {
                session.push(&username);
            }
        },
        Command::Shell { path } => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();

            shell::run(&mut session, stdin.lock(), &mut stdout.lock(), path, config.username.clone())?;
        }
    }

    Ok( !session.log().has_errors() )
}

// Program's entry point
fn main() {
    // fetch the command from CLI, clap reports its own errors (and --help)
    let invocation = match Invocation::from_cli() {
        Ok(invocation) => invocation,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                clap_err.exit();
            }
            stderr!("{}", err);
            std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if invocation.verbose { "info" } else { "warn" })
    ).init();

    // run the command, display the error and die if there was one
    match run(invocation) {
        Ok(true) => {},
        Ok(false) => std::process::exit(1),
        Err(err) => {
            stderr!("{:#}", err);
            std::process::exit(1);
        }
    }
}
