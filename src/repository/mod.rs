//
// src/repository
//
// Repository management.
//
// Implements the version control engine on top of libgit2. Everything runs
// in-process except the push, which is delegated to the git binary so that
// git's own transports and credential helpers apply.
//
// (C) 2020 Taras Zakharko
//
// This code is licensed under GPL 3.0


// basic git wrapper and the engine entry point
mod repo;
// abstraction over git index manipulation and commits
mod staging_area;
// remote configuration
mod remotes;
// pushing through the git binary
mod push;
// working tree status
mod status;


pub use repo::{GitEngine, Repository};

use anyhow::Result;
use std::path::Path;

use crate::engine::{EngineRepository, PushTarget};
use crate::status::StatusSummary;

impl EngineRepository for Repository {
    fn path(&self) -> &Path {
        &self.path
    }

    fn current_branch(&self) -> Result<String> {
        self.head_branch_name()
    }

    fn index_add(&mut self, paths: &[&Path]) -> Result<()> {
        self.get_staging_area()?.add_paths(paths)
    }

    fn index_add_all(&mut self) -> Result<()> {
        self.get_staging_area()?.add_all()
    }

    fn index_write(&mut self) -> Result<()> {
        self.get_staging_area()?.write()
    }

    fn commit(&mut self, message: &str) -> Result<String> {
        self.commit_index(message)
    }

    fn list_remotes(&self) -> Result<Vec<String>> {
        self.remote_names()
    }

    fn remote_url(&self, name: &str) -> Result<Option<String>> {
        self.find_remote_url(name)
    }

    fn create_remote(&mut self, name: &str, url: &str) -> Result<()> {
        self.add_remote(name, url)
    }

    fn set_remote_url(&mut self, name: &str, url: &str) -> Result<()> {
        self.update_remote_url(name, url)
    }

    fn push(&mut self, remote: &str, target: &PushTarget) -> Result<()> {
        self.push_with_git(remote, target)
    }

    fn status(&self) -> Result<StatusSummary> {
        self.summarize_status()
    }
}
