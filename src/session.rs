//
// src/session.rs
//
// A user session: runs controller operations on behalf of the user interface
// and turns every result, good or bad, into a line of the output log. Nothing
// that happens inside an operation escapes it.
//
// (C) 2020 Taras Zakharko
//
// This code is licensed under GPL 3.0

use std::fmt;
use std::path::Path;

use crate::controller::{PushOutcome, Readiness, RepositoryController, RepositoryStatus};
use crate::engine::VersionControlEngine;
use crate::error;

const NOT_INITIALIZED : &str = "Repository is not initialized.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Error
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub level : LogLevel,
    pub text  : String
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Append-only record of everything a session reported
#[derive(Default)]
pub struct OutputLog {
    entries  : Vec<LogEntry>,
    listener : Option<Box<dyn FnMut(&LogEntry)>>
}

impl OutputLog {
    /// A log that also hands every new entry to `listener`
    pub fn with_listener<F: FnMut(&LogEntry) + 'static>(listener: F) -> Self {
        OutputLog {
            entries  : vec![],
            listener : Some(Box::new(listener))
        }
    }

    pub fn append<S: Into<String>>(&mut self, level: LogLevel, text: S) {
        let entry = LogEntry { level, text: text.into() };

        if let Some(listener) = self.listener.as_mut() {
            listener(&entry);
        }

        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|entry| entry.level == LogLevel::Error)
    }
}

pub struct Session<E: VersionControlEngine> {
    controller : RepositoryController<E>,
    log        : OutputLog
}

impl<E: VersionControlEngine> Session<E> {
    pub fn new(controller: RepositoryController<E>, log: OutputLog) -> Self {
        Session { controller, log }
    }

    pub fn log(&self) -> &OutputLog {
        &self.log
    }

    /// What the user interface should offer: initialization when `Empty`,
    /// staging and committing when `Ready`
    pub fn readiness(&self) -> Readiness {
        self.controller.readiness()
    }

    /// Add a line that is not the result of an operation
    pub fn note<S: Into<String>>(&mut self, level: LogLevel, text: S) {
        self.log.append(level, text);
    }

    pub fn initialize(&mut self, path: &Path) {
        match self.controller.initialize(path) {
            Ok(()) => {
                let path = self.controller.repository_path().unwrap_or(path).display().to_string();
                self.log.append(LogLevel::Success, format!("Initialized empty Git repository in {}", path));
            },
            Err(err) => self.report(err)
        }
    }

    pub fn stage_file(&mut self, file: &Path) {
        match self.controller.stage_file(file) {
            Ok(()) => self.log.append(
                LogLevel::Success,
                format!("Added {} to the staging area.", file.display())
            ),
            Err(err) => self.report(err)
        }
    }

    pub fn stage_all(&mut self) {
        match self.controller.stage_all() {
            Ok(()) => self.log.append(LogLevel::Success, "Added all files to the staging area."),
            Err(err) => self.report(err)
        }
    }

    pub fn commit(&mut self, message: &str) {
        match self.controller.commit(message) {
            Ok(id) => self.log.append(
                LogLevel::Success,
                format!("[{}] Committed with message: {}", short_id(&id), message)
            ),
            Err(err) => self.report(err)
        }
    }

    pub fn push(&mut self, username: &str) {
        if self.controller.readiness() == Readiness::Empty {
            self.log.append(LogLevel::Error, NOT_INITIALIZED);
            return;
        }

        self.log.append(LogLevel::Info, "Trying to push");

        match self.controller.push(username) {
            Ok(PushOutcome { remote_url, used_fallback }) => {
                if used_fallback {
                    self.log.append(LogLevel::Info, "The branch had no upstream, it was pushed with --set-upstream.");
                }
                self.log.append(
                    LogLevel::Success,
                    format!("Pushed successfully to {}! Now available on GitHub.", remote_url)
                );
            },
            Err(err) => self.report(err)
        }
    }

    /// Open the repository at `path` and show its status
    pub fn refresh_status(&mut self, path: &Path) {
        match self.controller.refresh_status(path) {
            Ok(RepositoryStatus::Opened(status)) => self.log.append(LogLevel::Info, status.to_string()),
            Ok(RepositoryStatus::NotARepository) => self.report_not_a_repository(path),
            Err(err) => self.report(err)
        }
    }

    /// Open the repository at `path` without showing its status
    ///
    /// Only a failure is logged
    pub fn open(&mut self, path: &Path) {
        match self.controller.refresh_status(path) {
            Ok(RepositoryStatus::Opened(_)) => {},
            Ok(RepositoryStatus::NotARepository) => self.report_not_a_repository(path),
            Err(err) => self.report(err)
        }
    }

    /// With a repository still open the path is named, otherwise there is
    /// nothing to work on yet
    fn report_not_a_repository(&mut self, path: &Path) {
        match self.controller.readiness() {
            Readiness::Empty => self.log.append(LogLevel::Error, NOT_INITIALIZED),
            Readiness::Ready => self.report(error::InvalidRepository { path: path.to_path_buf() }.into())
        }
    }

    fn report(&mut self, err: anyhow::Error) {
        if err.downcast_ref::<error::NotInitialized>().is_some() {
            self.log.append(LogLevel::Error, NOT_INITIALIZED);
        } else {
            self.log.append(LogLevel::Error, format!("{:#}", err));
        }
    }
}

fn short_id(id: &str) -> &str {
    id.get(..7).unwrap_or(id)
}
