//
// src/repository/push.rs
//
// Pushing through the git binary
//
// libgit2 is built without network transports, and the git binary brings the
// user's credential helpers along. The outcome of `git push` is classified
// here so that callers never have to inspect the text.
//
// (C) 2020 Taras Zakharko
//
// This code is licensed under GPL 3.0

use super::Repository;

use anyhow::Result;
use log::{debug, info};
use std::process::{Command, Stdio};

use crate::engine::PushTarget;
use crate::error;
use crate::util::summarize_git_output;

/// git exits with this code when it refuses to run a command
const FATAL_EXIT_CODE : i32 = 128;

/// What git prints when the current branch has nowhere to be pushed to
const NO_UPSTREAM_MARKER : &str = "has no upstream branch";

impl Repository {
    pub fn push_with_git(&mut self, remote: &str, target: &PushTarget) -> Result<()> {
        let workdir = self.workdir()?;

        let mut command = Command::new(&self.settings.git_binary);
        command.arg("-C").arg(workdir).arg("push");

        match target {
            PushTarget::Upstream => {
                command.arg(remote);
            },
            PushTarget::Refspec { refspec, set_upstream } => {
                if *set_upstream {
                    command.arg("--set-upstream");
                }
                command.arg(remote).arg(refspec);
            }
        }

        if self.settings.interactive_credentials {
            command.stdin(Stdio::inherit());
        } else {
            command.env("GIT_TERMINAL_PROMPT", "0");
        }

        debug!("Running {:?}", command);

        let output = command.output().map_err(|err| -> anyhow::Error {
            match err.kind() {
                std::io::ErrorKind::NotFound => error::GitNotFound {
                    binary : self.settings.git_binary.clone()
                }.into(),
                _ => error::OtherGitError {
                    msg : format!("failed to run git push: {}", err)
                }.into()
            }
        })?;

        let combined = String::from_utf8_lossy(&output.stdout).into_owned()
            + &String::from_utf8_lossy(&output.stderr);

        if output.status.success() {
            info!("Pushed to {} {}", remote, combined.trim());
            return Ok( () );
        }

        Err( classify_push_failure(remote, output.status.code(), &combined) )
    }
}

/// Turn a failed `git push` into a tagged error
///
/// Only a fatal exit whose output mentions the missing upstream is a
/// `NoUpstreamBranch`; everything else is a `PushFailed`
pub fn classify_push_failure(remote: &str, code: Option<i32>, output: &str) -> anyhow::Error {
    let msg = summarize_git_output(output);

    if code == Some(FATAL_EXIT_CODE) && output.contains(NO_UPSTREAM_MARKER) {
        error::NoUpstreamBranch {
            remote : remote.to_owned(),
            msg
        }.into()
    } else {
        error::PushFailed {
            remote : remote.to_owned(),
            code,
            msg
        }.into()
    }
}
