//
// src/config.rs
//
// beagle-git configuration representation and TOML parsing
//
// (C) 2020 Taras Zakharko
//
// This code is licensed under GPL 3.0


/// Name of the configuration file looked up in the current directory
pub const CONFIG_FILE : &str = "beagle-git.toml";


use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Commit author used instead of the git `user.name`/`user.email` settings
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AuthorConfig {
    pub name : String,
    pub email: String,
}

#[derive(Deserialize, Debug, Clone, smart_default::SmartDefault)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Host the remote URL is built on, `<remote-host>/<user>/<repo>.git`
    #[default = "https://github.com"]
    pub remote_host: String,
    #[default = "origin"]
    pub remote_name: String,
    /// Branch the upstream fallback pushes `HEAD` to
    #[default = "master"]
    pub fallback_branch: String,
    #[default = "git"]
    pub git_binary: String,
    /// Let git prompt for credentials on the terminal
    #[default = true]
    pub interactive_credentials: bool,
    /// User name pushed to when none is given on the command line
    pub username: Option<String>,
    pub author: Option<AuthorConfig>,
}

/// The part of the configuration the repository controller needs
#[derive(Debug, Clone, PartialEq, Eq, smart_default::SmartDefault)]
pub struct PushSettings {
    #[default = "https://github.com"]
    pub remote_host: String,
    #[default = "origin"]
    pub remote_name: String,
    #[default = "master"]
    pub fallback_branch: String,
}

/// The part of the configuration the git engine needs
#[derive(Debug, Clone, PartialEq, Eq, smart_default::SmartDefault)]
pub struct EngineSettings {
    #[default = "git"]
    pub git_binary: String,
    #[default = true]
    pub interactive_credentials: bool,
    pub author: Option<AuthorConfig>,
}


//
// ####                    ###
//  ##                      ##
//  ##                      ##
//  ##  ## ##  ##   ## ##   ##
//  ##  ### ### ##  ### ##  ##
//  ##  ##  ##  ##  ##  ##  ##
//  ##  ##  ##  ##  ##  ##  ##
// #### ##  ##  ##  #####  ####
//                  ##
//                 ####

use anyhow::Result;
use crate::error;

impl Config {
    /// Load the configuration
    ///
    /// An explicitly requested file must exist. Otherwise `beagle-git.toml` in
    /// the current directory is used if present, and the defaults if not.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None       => PathBuf::from(CONFIG_FILE)
        };

        match try_read_file(&path)? {
            Some(blob) => {
                log::debug!("Loading configuration from {:?}", path);
                Config::parse(&path, &blob)
            },
            None if explicit.is_none() => {
                Ok( Config::default() )
            },
            None => {
                Err(
                    error::FileReadError {
                        path,
                        msg : "file not found".to_owned()
                    }.into()
                )
            }
        }
    }

    /// Parse the TOML configuration text read from `path`
    pub fn parse(path: &Path, blob: &[u8]) -> Result<Config> {
        // convert the blob into utf-8 encoded text
        let text = std::str::from_utf8(blob).map_err(|err| {
            error::ConfigurationError {
                path : path.to_path_buf(),
                text : String::new(),
                at   : None,
                msg  : err.to_string()
            }
        })?;

        // parse the toml file
        toml::from_str(text).map_err(|err| {
            error::ConfigurationError {
                path : path.to_path_buf(),
                text : text.to_owned(),
                at   : err.line_col(),
                msg  : err.to_string()
            }
            .into()
        })
    }

    pub fn push_settings(&self) -> PushSettings {
        PushSettings {
            remote_host     : self.remote_host.clone(),
            remote_name     : self.remote_name.clone(),
            fallback_branch : self.fallback_branch.clone(),
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            git_binary              : self.git_binary.clone(),
            interactive_credentials : self.interactive_credentials,
            author                  : self.author.clone(),
        }
    }
}


/// Read a file that may not exist
fn try_read_file(path: &Path) -> Result<Option<Vec<u8>>> {
    std::fs::read(path)
        .map(Some)
        // remap not found error to None
        .or_else(|err| {
            match err.kind() {
                std::io::ErrorKind::NotFound => Ok( None ),
                _                            => Err( err )
            }
        })
        .map_err(|err| {
            error::FileReadError {
                path : path.to_path_buf(),
                msg  : err.to_string()
            }
            .into()
        })
}
