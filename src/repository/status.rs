//
// src/repository/status.rs
//
// Working tree status
//
// (C) 2020 Taras Zakharko
//
// This code is licensed under GPL 3.0

use super::Repository;

use anyhow::Result;
use crate::error;
use crate::status::{ChangeKind, FileChange, StatusSummary};

impl Repository {
    pub fn summarize_status(&self) -> Result<StatusSummary> {
        use git2::StatusOptions;

        let mut summary = StatusSummary {
            branch      : self.head_branch_name()?,
            has_commits : self.has_commits()?,
            ..StatusSummary::default()
        };

        // get the list of changes
        let statuses = {
            let mut status_options = StatusOptions::new();
            status_options
                .include_untracked(true)
                .recurse_untracked_dirs(true)
                .include_ignored(false)
                .renames_head_to_index(true);

            self.repository.statuses(Some(&mut status_options)).map_err(error::OtherGitError::from)?
        };

        for entry in statuses.iter() {
            let path = String::from_utf8_lossy(entry.path_bytes()).into_owned();
            let status = entry.status();

            if let Some(kind) = staged_change(status) {
                summary.staged.push(FileChange::new(kind, path.clone()));
            }
            if let Some(kind) = unstaged_change(status) {
                summary.unstaged.push(FileChange::new(kind, path.clone()));
            }
            if status.is_wt_new() {
                summary.untracked.push(path);
            }
        }

        Ok( summary )
    }
}

fn staged_change(status: git2::Status) -> Option<ChangeKind> {
    match status {
        st if st.is_index_new()        => Some( ChangeKind::NewFile ),
        st if st.is_index_modified()   => Some( ChangeKind::Modified ),
        st if st.is_index_deleted()    => Some( ChangeKind::Deleted ),
        st if st.is_index_renamed()    => Some( ChangeKind::Renamed ),
        st if st.is_index_typechange() => Some( ChangeKind::TypeChange ),
        _                              => None
    }
}

fn unstaged_change(status: git2::Status) -> Option<ChangeKind> {
    match status {
        st if st.is_wt_modified()   => Some( ChangeKind::Modified ),
        st if st.is_wt_deleted()    => Some( ChangeKind::Deleted ),
        st if st.is_wt_renamed()    => Some( ChangeKind::Renamed ),
        st if st.is_wt_typechange() => Some( ChangeKind::TypeChange ),
        _                           => None
    }
}
