//
// src/repository/staging_area.rs
//
// Git index mutation (aka staging area) and commits
//
// (C) 2020 Taras Zakharko
//
// This code is licensed under GPL 3.0


use super::Repository;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::debug;
use crate::error;

/// A repository updater
///
/// libgit2 hands out the same index object for every call to `index()`, so
/// changes made through one staging area are visible to the next one until
/// they are written.
pub struct StagingArea<'repo> {
    repo    : PhantomData<&'repo mut Repository>,
    index   : git2::Index,
    root    : &'repo Path,
    workdir : &'repo Path
}


impl Repository {
    /// Get a staging area object for updating the repository
    pub fn get_staging_area(&mut self) -> Result<StagingArea<'_>> {
        let index = self.repository.index().map_err(error::OtherGitError::from)?;
        let workdir = self.repository.workdir().ok_or_else(|| {
            error::OtherGitError {
                msg: "unable to retrieve the working directory".to_owned()
            }
        })?;

        Ok(
            StagingArea {
                repo    : PhantomData,
                index,
                root    : &self.path,
                workdir
            }
        )
    }

    /// Commit the current index on top of HEAD
    ///
    /// On an unborn branch the commit has no parents
    pub fn commit_index(&mut self, message: &str) -> Result<String> {
        use git2::ErrorCode;

        let repo = &self.repository;

        let tree = repo.index()
            .and_then(|mut index| index.write_tree())
            .and_then(|oid| repo.find_tree(oid))
            .map_err(error::OtherGitError::from)?;

        let parent = match repo.head() {
            Ok(head) => Some( head.peel_to_commit().map_err(error::OtherGitError::from)? ),
            Err(err) if err.code() == ErrorCode::UnbornBranch || err.code() == ErrorCode::NotFound => None,
            Err(err) => return Err( error::OtherGitError::from(err).into() )
        };
        let parents : Vec<&git2::Commit> = parent.iter().collect();

        let signature = self.signature()?;

        let oid = repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .map_err(error::OtherGitError::from)?;

        debug!("Committed {} with {} parent(s)", oid, parents.len());

        Ok( oid.to_string() )
    }

    /// The configured author, or git's `user.name`/`user.email`
    fn signature(&self) -> Result<git2::Signature<'static>> {
        use git2::ErrorCode;

        if let Some(author) = &self.settings.author {
            return git2::Signature::now(&author.name, &author.email)
                .map_err(|err| error::OtherGitError::from(err).into());
        }

        self.repository.signature().map_err(|err| {
            match err.code() {
                ErrorCode::NotFound => error::MissingSignature.into(),
                _                   => error::OtherGitError::from(err).into()
            }
        })
    }
}

/// Represents the git staging area for the repository
///
/// The changes are only persisted once the staging area is written
impl<'repo> StagingArea<'repo> {
    /// Stage individual paths
    ///
    /// Absolute paths must lie within the repository, relative paths are taken
    /// relative to the working directory
    pub fn add_paths(&mut self, paths: &[&Path]) -> Result<()> {
        for path in paths {
            let relative = self.relative_path(path)?;

            debug!("Staging {:?}", relative);
            self.index.add_path(&relative).map_err(error::OtherGitError::from)?;
        }

        Ok( () )
    }

    /// Stage every change in the working tree, deletions included
    pub fn add_all(&mut self) -> Result<()> {
        use git2::IndexAddOption;
        use std::iter::once;

        self.index.add_all(once("*"), IndexAddOption::DEFAULT, None)
            .map_err(error::OtherGitError::from)?;
        // add_all() does not notice files removed from the working tree
        self.index.update_all(once("*"), None)
            .map_err(error::OtherGitError::from)?;

        debug!("Staged all changes, index has {} entries", self.index.len());

        Ok( () )
    }

    /// Write the git index, confirming any changes made to the staging area
    pub fn write(mut self) -> Result<()> {
        self.index.write().map_err(error::OtherGitError::from)?;

        Ok( () )
    }

    fn relative_path(&self, path: &Path) -> Result<PathBuf> {
        use crate::util::path_relative_to_root;

        path_relative_to_root(path, self.root)
            .or_else(|| path_relative_to_root(path, self.workdir))
            .ok_or_else(|| {
                error::PathNotInRepository {
                    path : path.to_owned()
                }.into()
            })
    }
}
