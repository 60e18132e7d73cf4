//
// src/testing.rs
//
// An in-memory engine for exercising the controller and the session without
// touching the filesystem or the network. Every call is recorded.
//
// (C) 2020 Taras Zakharko
//
// This code is licensed under GPL 3.0

use anyhow::Result;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::engine::{EngineRepository, PushTarget, VersionControlEngine};
use crate::error;
use crate::status::StatusSummary;

/// What the next push does
#[derive(Clone, Debug)]
pub enum ScriptedPush {
    Succeed,
    NoUpstream,
    Fail(String)
}

#[derive(Debug)]
struct ScriptState {
    calls          : Vec<String>,
    repositories   : BTreeSet<PathBuf>,
    init_failure   : Option<String>,
    remotes        : BTreeMap<String, String>,
    pushes         : Vec<(String, PushTarget)>,
    scripted       : VecDeque<ScriptedPush>,
    branch         : String,
    commits        : usize
}

impl Default for ScriptState {
    fn default() -> Self {
        ScriptState {
            calls        : vec![],
            repositories : BTreeSet::new(),
            init_failure : None,
            remotes      : BTreeMap::new(),
            pushes       : vec![],
            scripted     : VecDeque::new(),
            branch       : "master".to_owned(),
            commits      : 0
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ScriptedEngine {
    state : Rc<RefCell<ScriptState>>
}

pub struct ScriptedRepository {
    path  : PathBuf,
    state : Rc<RefCell<ScriptState>>
}

impl ScriptedEngine {
    pub fn add_repository<P: Into<PathBuf>>(&self, path: P) {
        self.state.borrow_mut().repositories.insert(path.into());
    }

    pub fn add_remote(&self, name: &str, url: &str) {
        self.state.borrow_mut().remotes.insert(name.to_owned(), url.to_owned());
    }

    pub fn fail_init(&self, msg: &str) {
        self.state.borrow_mut().init_failure = Some(msg.to_owned());
    }

    pub fn set_branch(&self, branch: &str) {
        self.state.borrow_mut().branch = branch.to_owned();
    }

    pub fn script_pushes(&self, pushes: Vec<ScriptedPush>) {
        self.state.borrow_mut().scripted.extend(pushes);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn pushes(&self) -> Vec<(String, PushTarget)> {
        self.state.borrow().pushes.clone()
    }

    pub fn remote_url(&self, name: &str) -> Option<String> {
        self.state.borrow().remotes.get(name).cloned()
    }

    fn record(&self, call: String) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl VersionControlEngine for ScriptedEngine {
    type Repository = ScriptedRepository;

    fn init_repo(&self, path: &Path) -> Result<ScriptedRepository> {
        self.record(format!("init {}", path.display()));

        if let Some(msg) = self.state.borrow().init_failure.clone() {
            return Err( error::OtherGitError { msg }.into() );
        }

        self.add_repository(path);

        Ok( ScriptedRepository { path: path.to_path_buf(), state: self.state.clone() } )
    }

    fn open_repo(&self, path: &Path) -> Result<ScriptedRepository> {
        if !self.state.borrow().repositories.contains(path) {
            return Err( error::InvalidRepository { path: path.to_path_buf() }.into() );
        }

        Ok( ScriptedRepository { path: path.to_path_buf(), state: self.state.clone() } )
    }
}

impl ScriptedRepository {
    fn record(&self, call: String) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl EngineRepository for ScriptedRepository {
    fn path(&self) -> &Path {
        &self.path
    }

    fn current_branch(&self) -> Result<String> {
        Ok( self.state.borrow().branch.clone() )
    }

    fn index_add(&mut self, paths: &[&Path]) -> Result<()> {
        let paths : Vec<_> = paths.iter().map(|path| path.display().to_string()).collect();
        self.record(format!("index_add {}", paths.join(" ")));

        Ok( () )
    }

    fn index_add_all(&mut self) -> Result<()> {
        self.record("index_add_all".to_owned());

        Ok( () )
    }

    fn index_write(&mut self) -> Result<()> {
        self.record("index_write".to_owned());

        Ok( () )
    }

    fn commit(&mut self, message: &str) -> Result<String> {
        self.record(format!("commit '{}'", message));

        let mut state = self.state.borrow_mut();
        state.commits += 1;

        Ok( format!("{:040x}", state.commits) )
    }

    fn list_remotes(&self) -> Result<Vec<String>> {
        self.record("list_remotes".to_owned());

        Ok( self.state.borrow().remotes.keys().cloned().collect() )
    }

    fn remote_url(&self, name: &str) -> Result<Option<String>> {
        Ok( self.state.borrow().remotes.get(name).cloned() )
    }

    fn create_remote(&mut self, name: &str, url: &str) -> Result<()> {
        self.record(format!("create_remote {} {}", name, url));

        let mut state = self.state.borrow_mut();
        if state.remotes.contains_key(name) {
            return Err( error::OtherGitError { msg: format!("remote '{}' already exists", name) }.into() );
        }
        state.remotes.insert(name.to_owned(), url.to_owned());

        Ok( () )
    }

    fn set_remote_url(&mut self, name: &str, url: &str) -> Result<()> {
        self.record(format!("set_remote_url {} {}", name, url));

        let mut state = self.state.borrow_mut();
        match state.remotes.get_mut(name) {
            Some(current) => {
                *current = url.to_owned();
                Ok( () )
            },
            None => Err( error::OtherGitError { msg: format!("remote '{}' does not exist", name) }.into() )
        }
    }

    fn push(&mut self, remote: &str, target: &PushTarget) -> Result<()> {
        match target {
            PushTarget::Upstream => {
                self.record(format!("push {}", remote));
            },
            PushTarget::Refspec { refspec, set_upstream } => {
                let flag = if *set_upstream { " --set-upstream" } else { "" };
                self.record(format!("push {} {}{}", remote, refspec, flag));
            }
        }

        let mut state = self.state.borrow_mut();
        state.pushes.push((remote.to_owned(), target.clone()));

        match state.scripted.pop_front().unwrap_or(ScriptedPush::Succeed) {
            ScriptedPush::Succeed => Ok( () ),
            ScriptedPush::NoUpstream => Err(
                error::NoUpstreamBranch {
                    remote : remote.to_owned(),
                    msg    : format!("fatal: The current branch {} has no upstream branch.", state.branch)
                }.into()
            ),
            ScriptedPush::Fail(msg) => Err(
                error::PushFailed {
                    remote : remote.to_owned(),
                    code   : Some(128),
                    msg
                }.into()
            )
        }
    }

    fn status(&self) -> Result<StatusSummary> {
        let state = self.state.borrow();

        Ok(
            StatusSummary {
                branch      : state.branch.clone(),
                has_commits : state.commits > 0,
                ..StatusSummary::default()
            }
        )
    }
}
