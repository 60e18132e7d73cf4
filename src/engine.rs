//
// src/engine.rs
//
// The version control engine seam. The controller only talks to these traits;
// `repository::GitEngine` implements them on top of libgit2 and the git binary.
//
// (C) 2020 Taras Zakharko
//
// This code is licensed under GPL 3.0

use anyhow::Result;
use std::path::Path;

use crate::status::StatusSummary;

/// What a push sends to the remote
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PushTarget {
    /// Push the current branch to its configured upstream
    Upstream,
    /// Push an explicit refspec, optionally recording it as the upstream
    Refspec {
        refspec      : String,
        set_upstream : bool
    }
}

/// Opens and creates repositories
pub trait VersionControlEngine {
    type Repository: EngineRepository;

    /// Create a new repository at `path`, creating the directory if needed
    fn init_repo(&self, path: &Path) -> Result<Self::Repository>;

    /// Open the repository at `path`
    ///
    /// Fails with `error::InvalidRepository` if `path` is not a repository
    fn open_repo(&self, path: &Path) -> Result<Self::Repository>;
}

/// An open repository handle
pub trait EngineRepository {
    /// The path the repository was opened or created with
    fn path(&self) -> &Path;

    /// Name of the branch HEAD points to, even if it has no commits yet
    fn current_branch(&self) -> Result<String>;

    /// Add paths to the in-memory index
    fn index_add(&mut self, paths: &[&Path]) -> Result<()>;

    /// Add every new, modified and deleted path to the in-memory index
    fn index_add_all(&mut self) -> Result<()>;

    /// Persist the index to disk
    fn index_write(&mut self) -> Result<()>;

    /// Commit the index, returning the new commit id
    fn commit(&mut self, message: &str) -> Result<String>;

    fn list_remotes(&self) -> Result<Vec<String>>;

    /// The URL configured for the named remote, `None` if there is no such remote
    fn remote_url(&self, name: &str) -> Result<Option<String>>;

    fn create_remote(&mut self, name: &str, url: &str) -> Result<()>;

    fn set_remote_url(&mut self, name: &str, url: &str) -> Result<()>;

    /// Push to the named remote
    ///
    /// A push refused because the current branch has no upstream fails with
    /// `error::NoUpstreamBranch`; any other failure with `error::PushFailed`
    fn push(&mut self, remote: &str, target: &PushTarget) -> Result<()>;

    fn status(&self) -> Result<StatusSummary>;
}
