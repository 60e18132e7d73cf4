//
// src/repository/remotes.rs
//
// Remote configuration
//
// (C) 2020 Taras Zakharko
//
// This code is licensed under GPL 3.0

use super::Repository;

use anyhow::Result;
use log::info;
use crate::error;

impl Repository {
    pub fn remote_names(&self) -> Result<Vec<String>> {
        let remotes = self.repository.remotes().map_err(error::OtherGitError::from)?;

        Ok( remotes.iter().flatten().map(str::to_owned).collect() )
    }

    pub fn find_remote_url(&self, name: &str) -> Result<Option<String>> {
        use git2::ErrorCode;

        match self.repository.find_remote(name) {
            Ok(remote) => Ok( remote.url().map(str::to_owned) ),
            Err(err) if err.code() == ErrorCode::NotFound => Ok( None ),
            Err(err) => Err( error::OtherGitError::from(err).into() )
        }
    }

    pub fn add_remote(&mut self, name: &str, url: &str) -> Result<()> {
        self.repository.remote(name, url).map_err(error::OtherGitError::from)?;
        info!("Added remote {} -> {}", name, url);

        Ok( () )
    }

    pub fn update_remote_url(&mut self, name: &str, url: &str) -> Result<()> {
        self.repository.remote_set_url(name, url).map_err(error::OtherGitError::from)?;
        info!("Set url of remote {} to {}", name, url);

        Ok( () )
    }
}
