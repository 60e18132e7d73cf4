//
// src/cli_app.rs
//
// CLI interfacing, command-line argument parsing, standard output macros.
//
// (C) 2020 Taras Zakharko
//
// This code is licensed under GPL 3.0

use clap::App;
use std::path::PathBuf;

/// CLI command parser using Clap
fn clap_app_spec<'a, 'b>() -> App<'a, 'b> {
    clap_app!( ("beagle-git") =>
        (version: crate_version!())
        (author: "Taras Zakharko <taras.zakharko@uzh.ch>")
        (about: "Initialize, stage, commit and push to GitHub")
        (@arg verbose: -v --verbose "Verbose output")
        (@arg config: --config +takes_value
            "configuration file to use (default: ./beagle-git.toml if present)"
        )
        (@setting SubcommandRequired)
        (@subcommand init =>
            (about: "creates a new repository")
            (@arg PATH: "the repository directory (default: current directory)")
        )
        (@subcommand status =>
            (about: "shows the status of a repository")
            (@arg PATH: "the repository directory (default: current directory)")
        )
        (@subcommand add =>
            (about: "adds a file, or all changes, to the staging area")
            (@arg repo: -C +takes_value "the repository directory (default: current directory)")
            (@arg all: -A --all conflicts_with[FILE] "stage every change in the working tree")
            (@arg FILE: "the file to stage")
        )
        (@subcommand commit =>
            (about: "commits the staging area")
            (@arg repo: -C +takes_value "the repository directory (default: current directory)")
            (@arg message: -m --message +takes_value +required "the commit message")
        )
        (@subcommand push =>
            (about: "pushes to https://github.com/<USERNAME>/<repository directory name>.git")
            (@arg repo: -C +takes_value "the repository directory (default: current directory)")
            (@arg USERNAME: "GitHub user name (default: `username` from the configuration)")
        )
        (@subcommand shell =>
            (about: "runs an interactive session on a repository")
            (@arg PATH: "the repository directory to start with (default: current directory)")
        )
    )
}


/// Command line invocation
#[derive(Clone, Debug)]
pub struct Invocation {
    pub verbose : bool,
    pub config  : Option<PathBuf>,
    pub command : Command
}

/// beagle-git command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// beagle-git init
    Init {
        path : PathBuf
    },
    /// beagle-git status
    Status {
        path : PathBuf
    },
    /// beagle-git add FILE
    Add {
        repo : PathBuf,
        file : PathBuf
    },
    /// beagle-git add --all
    AddAll {
        repo : PathBuf
    },
    /// beagle-git commit
    Commit {
        repo    : PathBuf,
        message : String
    },
    /// beagle-git push
    Push {
        repo     : PathBuf,
        username : Option<String>
    },
    /// beagle-git shell
    Shell {
        path : PathBuf
    }
}

/// ANSI-terminal styling wrapper
pub fn style<D: std::fmt::Display>(obj: D) -> console::StyledObject<D> {
    console::Style::new().force_styling(true).apply_to(obj)
}


macro_rules! stdout {
    ($fmt:expr) => {
        stdout!("{}", $fmt);
    };
    ($fmt:expr, $($arg:tt)*) => {{
        if ::console::colors_enabled() {
            println!($fmt, $($arg)*);
        } else {
            println!("{}", ::console::strip_ansi_codes(&format!($fmt, $($arg)*)));
        }
    }}
}

macro_rules! stderr {
    ($fmt:expr) => {
        stderr!("{}", $fmt);
    };
    ($fmt:expr, $($arg:tt)*) => {{
        if ::console::colors_enabled() {
            eprintln!($fmt, $($arg)*);
        } else {
            eprintln!("{}", ::console::strip_ansi_codes(&format!($fmt, $($arg)*)));
        }
    }}
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

use anyhow::{Result, anyhow};

impl Invocation {
    pub fn from_cli() -> Result<Self> {
        Invocation::from_args(std::env::args_os())
    }

    pub fn from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone
    {
        let args = clap_app_spec().get_matches_from_safe(args)?;

        let path_or_current = |cmd: &clap::ArgMatches, name: &str| -> PathBuf {
            cmd.value_of_os(name).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."))
        };

        let command = match args.subcommand() {
            ("init", Some(cmd)) => {
                Command::Init {
                    path : path_or_current(cmd, "PATH")
                }
            },
            ("status", Some(cmd)) => {
                Command::Status {
                    path : path_or_current(cmd, "PATH")
                }
            },
            ("add", Some(cmd)) if cmd.is_present("all") => {
                Command::AddAll {
                    repo : path_or_current(cmd, "repo")
                }
            },
            ("add", Some(cmd)) => {
                Command::Add {
                    repo : path_or_current(cmd, "repo"),
                    file : cmd.value_of_os("FILE").map(PathBuf::from).ok_or_else(|| {
                        anyhow!("nothing to add (give a FILE or use --all)")
                    })?
                }
            },
            ("commit", Some(cmd)) => {
                Command::Commit {
                    repo    : path_or_current(cmd, "repo"),
                    message : cmd.value_of_lossy("message").unwrap_or_default().into_owned()
                }
            },
            ("push", Some(cmd)) => {
                Command::Push {
                    repo     : path_or_current(cmd, "repo"),
                    username : cmd.value_of_lossy("USERNAME").map(|name| name.into_owned())
                }
            },
            ("shell", Some(cmd)) => {
                Command::Shell {
                    path : path_or_current(cmd, "PATH")
                }
            },
            (name, _) => {
                return Err( anyhow!("unknown command {}", name) );
            }
        };

        Ok(
            Invocation {
                verbose : args.is_present("verbose"),
                config  : args.value_of_os("config").map(PathBuf::from),
                command
            }
        )
    }
}
