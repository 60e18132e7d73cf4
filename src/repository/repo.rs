//
// src/repository/repo.rs
//
// Opening and creating repositories
//
// (C) 2020 Taras Zakharko
//
// This code is licensed under GPL 3.0

use anyhow::Result;
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::config::EngineSettings;
use crate::engine::VersionControlEngine;
use crate::error;
use crate::util::absolute_path;

/// The libgit2-backed engine
pub struct GitEngine {
    settings : EngineSettings
}

/// An open local repository
pub struct Repository {
    pub(super) repository : git2::Repository,
    pub(super) path       : PathBuf,
    pub(super) settings   : EngineSettings
}

impl GitEngine {
    pub fn new(settings: EngineSettings) -> Self {
        GitEngine { settings }
    }
}

impl VersionControlEngine for GitEngine {
    type Repository = Repository;

    fn init_repo(&self, path: &Path) -> Result<Repository> {
        let path = absolute_path(path);

        let repository = git2::Repository::init(&path).map_err(error::OtherGitError::from)?;
        info!("Initialized {:?}", path);

        Ok(
            Repository { repository, path, settings: self.settings.clone() }
        )
    }

    fn open_repo(&self, path: &Path) -> Result<Repository> {
        let path = absolute_path(path);

        let repository = git2::Repository::open(&path)
            // process errors
            .map_err(|err| -> anyhow::Error {
                use git2::ErrorCode;

                match err.code() {
                    ErrorCode::NotFound => error::InvalidRepository { path: path.clone() }.into(),
                    _                   => error::OtherGitError::from(err).into()
                }
            })?;

        // a bare repository has nothing to stage
        if repository.is_bare() {
            return Err( error::InvalidRepository { path }.into() );
        }

        debug!("Opened {:?}", path);

        Ok(
            Repository { repository, path, settings: self.settings.clone() }
        )
    }
}

impl Repository {
    pub fn workdir(&self) -> Result<&Path> {
        self.repository.workdir().ok_or_else(|| {
            error::OtherGitError {
                msg: "unable to retrieve the working directory".to_owned()
            }.into()
        })
    }

    /// Name of the branch HEAD points to
    ///
    /// For a repository without commits this is the branch the first commit
    /// will create. A detached HEAD is reported as `HEAD`.
    pub fn head_branch_name(&self) -> Result<String> {
        use git2::ErrorCode;

        match self.repository.head() {
            Ok(head) if head.is_branch() => {
                Ok( String::from_utf8_lossy(head.shorthand_bytes()).into_owned() )
            },
            Ok(_) => {
                Ok( "HEAD".to_owned() )
            },
            Err(err) if err.code() == ErrorCode::UnbornBranch => {
                let head = self.repository.find_reference("HEAD")
                    .map_err(error::OtherGitError::from)?;
                let target = head.symbolic_target().unwrap_or("HEAD");

                Ok( target.trim_start_matches("refs/heads/").to_owned() )
            },
            Err(err) => {
                Err( error::OtherGitError::from(err).into() )
            }
        }
    }

    /// Whether HEAD resolves to a commit
    pub fn has_commits(&self) -> Result<bool> {
        use git2::ErrorCode;

        match self.repository.head() {
            Ok(_) => Ok( true ),
            Err(err) if err.code() == ErrorCode::UnbornBranch || err.code() == ErrorCode::NotFound => {
                Ok( false )
            },
            Err(err) => Err( error::OtherGitError::from(err).into() )
        }
    }
}
