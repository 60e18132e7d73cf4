//
// src/status.rs
//
// Working tree status summary and its `git status`-like rendering
//
// (C) 2020 Taras Zakharko
//
// This code is licensed under GPL 3.0

use std::fmt;
use itertools::Itertools;
use crate::cli_app::style;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    NewFile,
    Modified,
    Deleted,
    Renamed,
    TypeChange
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            ChangeKind::NewFile    => "new file:",
            ChangeKind::Modified   => "modified:",
            ChangeKind::Deleted    => "deleted:",
            ChangeKind::Renamed    => "renamed:",
            ChangeKind::TypeChange => "typechange:",
        }
    }
}

/// A single changed path, relative to the working directory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileChange {
    pub kind : ChangeKind,
    pub path : String
}

impl FileChange {
    pub fn new<S: Into<String>>(kind: ChangeKind, path: S) -> Self {
        FileChange { kind, path: path.into() }
    }
}

/// Status of a repository as reported by the engine
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub branch      : String,
    pub has_commits : bool,
    pub staged      : Vec<FileChange>,
    pub unstaged    : Vec<FileChange>,
    pub untracked   : Vec<String>
}

impl StatusSummary {
    /// Nothing staged, nothing modified, nothing untracked
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.unstaged.is_empty() && self.untracked.is_empty()
    }
}

fn display_changes(changes: &[FileChange], color: console::Color) -> String {
    changes.iter()
        .map(|change| {
            format!("        {:<12}{}",
                change.kind.label(),
                change.path
            )
        })
        .map(|line| style(line).fg(color).to_string())
        .join("\n")
}

impl fmt::Display for StatusSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use console::Color;

        write!(f, "On branch {}", self.branch)?;

        if !self.has_commits {
            write!(f, "\n\nNo commits yet")?;
        }

        if !self.staged.is_empty() {
            write!(f, "\n\nChanges to be committed:\n{}", display_changes(&self.staged, Color::Green))?;
        }

        if !self.unstaged.is_empty() {
            write!(f, "\n\nChanges not staged for commit:\n{}", display_changes(&self.unstaged, Color::Red))?;
        }

        if !self.untracked.is_empty() {
            let untracked = self.untracked.iter()
                .map(|path| style(format!("        {}", path)).red().to_string())
                .join("\n");

            write!(f, "\n\nUntracked files:\n{}", untracked)?;
        }

        if self.is_clean() {
            if self.has_commits {
                write!(f, "\n\nnothing to commit, working tree clean")?;
            } else {
                write!(f, "\n\nnothing to commit (create/copy files and use \"add\" to track)")?;
            }
        } else if self.staged.is_empty() {
            write!(f, "\n\nno changes added to commit")?;
        }

        Ok( () )
    }
}
