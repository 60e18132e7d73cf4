//
// src/controller.rs
//
// The repository controller: owns at most one open repository and runs the
// user-facing operations against it, including the push with its upstream
// fallback.
//
// (C) 2020 Taras Zakharko
//
// This code is licensed under GPL 3.0

use anyhow::Result;
use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::config::PushSettings;
use crate::engine::{EngineRepository, PushTarget, VersionControlEngine};
use crate::error;
use crate::status::StatusSummary;
use crate::util::last_path_component;

/// Whether the controller holds a repository
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    /// Only initialization and status refresh are possible
    Empty,
    /// Staging, committing and pushing are possible
    Ready
}

/// Outcome of a status refresh
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RepositoryStatus {
    /// The path is not a repository. Any previously opened repository is kept.
    NotARepository,
    /// The repository was opened and is now the current one
    Opened(StatusSummary)
}

/// Outcome of a successful push
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushOutcome {
    pub remote_url    : String,
    /// The first push had no upstream and `HEAD` was pushed to the fallback branch
    pub used_fallback : bool
}

pub struct RepositoryController<E: VersionControlEngine> {
    engine     : E,
    settings   : PushSettings,
    repository : Option<E::Repository>
}

impl<E: VersionControlEngine> RepositoryController<E> {
    pub fn new(engine: E, settings: PushSettings) -> Self {
        RepositoryController {
            engine,
            settings,
            repository : None
        }
    }

    pub fn readiness(&self) -> Readiness {
        if self.repository.is_some() { Readiness::Ready } else { Readiness::Empty }
    }

    /// Path of the current repository
    pub fn repository_path(&self) -> Option<&Path> {
        self.repository.as_ref().map(|repo| repo.path())
    }

    /// Create a repository at `path` and make it the current one
    pub fn initialize(&mut self, path: &Path) -> Result<()> {
        let repo = self.engine.init_repo(path)?;
        self.repository = Some(repo);

        Ok( () )
    }

    /// Add a single file to the index and write it
    pub fn stage_file(&mut self, file: &Path) -> Result<()> {
        let repo = self.current_repository()?;

        repo.index_add(&[file])?;
        repo.index_write()
    }

    /// Add every change in the working tree to the index and write it
    pub fn stage_all(&mut self) -> Result<()> {
        let repo = self.current_repository()?;

        repo.index_add_all()?;
        repo.index_write()
    }

    /// Commit the index, returning the new commit id
    ///
    /// The message is passed to the engine as it is, empty or not
    pub fn commit(&mut self, message: &str) -> Result<String> {
        self.current_repository()?.commit(message)
    }

    /// Push to `<remote-host>/<username>/<repository directory name>.git`
    ///
    /// The remote is created on first use and its URL overwritten afterwards.
    /// A push refused for lack of an upstream branch is retried once as
    /// `HEAD:refs/heads/<fallback-branch>` with the upstream set.
    pub fn push(&mut self, username: &str) -> Result<PushOutcome> {
        let settings = &self.settings;
        let repo = self.repository.as_mut().ok_or(error::NotInitialized)?;

        let remote_url = remote_url_for(settings, username, repo.path())?;
        let remote = settings.remote_name.as_str();

        if repo.list_remotes()?.iter().any(|name| name == remote) {
            repo.set_remote_url(remote, &remote_url)?;
        } else {
            repo.create_remote(remote, &remote_url)?;
        }

        let used_fallback = match repo.push(remote, &PushTarget::Upstream) {
            Ok(()) => false,
            Err(err) if err.downcast_ref::<error::NoUpstreamBranch>().is_some() => {
                info!("No upstream branch, pushing HEAD to {}", settings.fallback_branch);

                // the fallback ignores the current branch name
                if let Ok(branch) = repo.current_branch() {
                    if branch != settings.fallback_branch {
                        warn!(
                            "Current branch {} is pushed to {} on {}",
                            branch, settings.fallback_branch, remote
                        );
                    }
                }

                repo.push(remote, &PushTarget::Refspec {
                    refspec      : format!("HEAD:refs/heads/{}", settings.fallback_branch),
                    set_upstream : true
                })?;

                true
            },
            Err(err) => return Err( err )
        };

        // report what the remote is configured with after the push
        let remote_url = repo.remote_url(remote)?.unwrap_or(remote_url);

        Ok(
            PushOutcome { remote_url, used_fallback }
        )
    }

    /// Open the repository at `path` and report its status
    ///
    /// A path that is not a repository is not an error
    pub fn refresh_status(&mut self, path: &Path) -> Result<RepositoryStatus> {
        let repo = match self.engine.open_repo(path) {
            Ok(repo) => repo,
            Err(err) if err.downcast_ref::<error::InvalidRepository>().is_some() => {
                info!("{:?} is not a repository", path);
                return Ok( RepositoryStatus::NotARepository );
            },
            Err(err) => return Err( err )
        };

        let repo = self.repository.insert(repo);

        Ok( RepositoryStatus::Opened(repo.status()?) )
    }

    fn current_repository(&mut self) -> Result<&mut E::Repository> {
        self.repository.as_mut().ok_or_else(|| error::NotInitialized.into())
    }
}

/// Build the URL of the remote repository
fn remote_url_for(settings: &PushSettings, username: &str, path: &Path) -> Result<String> {
    let name = last_path_component(path).ok_or_else(|| {
        error::InvalidRemoteName { path: PathBuf::from(path) }
    })?;

    Ok(
        format!("{}/{}/{}.git", settings.remote_host.trim_end_matches('/'), username, name)
    )
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedEngine, ScriptedPush};

    fn controller(engine: &ScriptedEngine) -> RepositoryController<ScriptedEngine> {
        RepositoryController::new(engine.clone(), PushSettings::default())
    }

    fn ready_controller(engine: &ScriptedEngine) -> RepositoryController<ScriptedEngine> {
        let mut controller = controller(engine);
        controller.initialize(Path::new("/work/proj")).unwrap();
        controller
    }

    fn is_not_initialized(err: &anyhow::Error) -> bool {
        err.downcast_ref::<error::NotInitialized>().is_some()
    }

    #[test]
    fn operations_need_a_repository() {
        let engine = ScriptedEngine::default();
        let mut controller = controller(&engine);

        assert!(is_not_initialized(&controller.stage_file(Path::new("a.txt")).unwrap_err()));
        assert!(is_not_initialized(&controller.stage_all().unwrap_err()));
        assert!(is_not_initialized(&controller.commit("msg").unwrap_err()));
        assert!(is_not_initialized(&controller.push("octocat").unwrap_err()));

        assert_eq!(controller.readiness(), Readiness::Empty);
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn initialize_makes_the_controller_ready() {
        let engine = ScriptedEngine::default();
        let mut controller = controller(&engine);

        controller.initialize(Path::new("/work/proj")).unwrap();

        assert_eq!(controller.readiness(), Readiness::Ready);
        assert_eq!(controller.repository_path(), Some(Path::new("/work/proj")));
    }

    #[test]
    fn failed_initialize_stays_empty() {
        let engine = ScriptedEngine::default();
        engine.fail_init("permission denied");
        let mut controller = controller(&engine);

        assert!(controller.initialize(Path::new("/root/proj")).is_err());
        assert_eq!(controller.readiness(), Readiness::Empty);
    }

    #[test]
    fn stage_file_adds_and_writes() {
        let engine = ScriptedEngine::default();
        let mut controller = ready_controller(&engine);

        controller.stage_file(Path::new("src/main.rs")).unwrap();

        assert_eq!(engine.calls(), vec![
            "init /work/proj",
            "index_add src/main.rs",
            "index_write"
        ]);
    }

    #[test]
    fn stage_all_adds_everything_and_writes() {
        let engine = ScriptedEngine::default();
        let mut controller = ready_controller(&engine);

        controller.stage_all().unwrap();

        assert_eq!(engine.calls(), vec!["init /work/proj", "index_add_all", "index_write"]);
    }

    #[test]
    fn empty_commit_messages_are_passed_through() {
        let engine = ScriptedEngine::default();
        let mut controller = ready_controller(&engine);

        let id = controller.commit("").unwrap();

        assert!(!id.is_empty());
        assert_eq!(engine.calls().last().map(String::as_str), Some("commit ''"));
    }

    #[test]
    fn first_push_creates_origin() {
        let engine = ScriptedEngine::default();
        let mut controller = ready_controller(&engine);

        let outcome = controller.push("octocat").unwrap();

        assert_eq!(outcome, PushOutcome {
            remote_url    : "https://github.com/octocat/proj.git".to_owned(),
            used_fallback : false
        });
        assert_eq!(engine.calls(), vec![
            "init /work/proj",
            "list_remotes",
            "create_remote origin https://github.com/octocat/proj.git",
            "push origin"
        ]);
    }

    #[test]
    fn push_reports_the_configured_url() {
        let engine = ScriptedEngine::default();
        let mut controller = ready_controller(&engine);

        let outcome = controller.push("octocat").unwrap();

        assert_eq!(Some(outcome.remote_url), engine.remote_url("origin"));
    }

    #[test]
    fn repeated_push_converges_the_remote_url() {
        let engine = ScriptedEngine::default();
        let mut controller = ready_controller(&engine);

        controller.push("octocat").unwrap();
        let first = engine.remote_url("origin");
        controller.push("octocat").unwrap();
        let second = engine.remote_url("origin");

        assert_eq!(first, second);
        assert_eq!(second.as_deref(), Some("https://github.com/octocat/proj.git"));
        assert!(engine.calls().contains(
            &"set_remote_url origin https://github.com/octocat/proj.git".to_owned()
        ));
    }

    #[test]
    fn push_overwrites_a_foreign_origin() {
        let engine = ScriptedEngine::default();
        engine.add_remote("origin", "git@example.org:someone/else.git");
        let mut controller = ready_controller(&engine);

        controller.push("octocat").unwrap();

        assert_eq!(engine.remote_url("origin").as_deref(), Some("https://github.com/octocat/proj.git"));
    }

    #[test]
    fn missing_upstream_falls_back_to_master() {
        let engine = ScriptedEngine::default();
        engine.script_pushes(vec![ScriptedPush::NoUpstream, ScriptedPush::Succeed]);
        let mut controller = ready_controller(&engine);

        let outcome = controller.push("octocat").unwrap();

        assert!(outcome.used_fallback);
        assert_eq!(engine.pushes(), vec![
            ("origin".to_owned(), PushTarget::Upstream),
            ("origin".to_owned(), PushTarget::Refspec {
                refspec      : "HEAD:refs/heads/master".to_owned(),
                set_upstream : true
            })
        ]);
    }

    #[test]
    fn fallback_ignores_the_current_branch() {
        let engine = ScriptedEngine::default();
        engine.set_branch("main");
        engine.script_pushes(vec![ScriptedPush::NoUpstream, ScriptedPush::Succeed]);
        let mut controller = ready_controller(&engine);

        controller.push("octocat").unwrap();

        assert_eq!(engine.pushes()[1].1, PushTarget::Refspec {
            refspec      : "HEAD:refs/heads/master".to_owned(),
            set_upstream : true
        });
    }

    #[test]
    fn other_push_failures_are_not_retried() {
        let engine = ScriptedEngine::default();
        engine.script_pushes(vec![ScriptedPush::Fail("fatal: Authentication failed".to_owned())]);
        let mut controller = ready_controller(&engine);

        let err = controller.push("octocat").unwrap_err();

        let err = err.downcast_ref::<error::PushFailed>().expect("push failure");
        assert_eq!(err.msg, "fatal: Authentication failed");
        assert_eq!(engine.pushes().len(), 1);
    }

    #[test]
    fn failing_fallback_is_reported() {
        let engine = ScriptedEngine::default();
        engine.script_pushes(vec![
            ScriptedPush::NoUpstream,
            ScriptedPush::Fail("error: src refspec HEAD does not match any".to_owned())
        ]);
        let mut controller = ready_controller(&engine);

        let err = controller.push("octocat").unwrap_err();

        assert!(err.downcast_ref::<error::PushFailed>().is_some());
        assert_eq!(engine.pushes().len(), 2);
    }

    #[test]
    fn second_missing_upstream_is_not_retried_again() {
        let engine = ScriptedEngine::default();
        engine.script_pushes(vec![ScriptedPush::NoUpstream, ScriptedPush::NoUpstream]);
        let mut controller = ready_controller(&engine);

        let err = controller.push("octocat").unwrap_err();

        assert!(err.downcast_ref::<error::NoUpstreamBranch>().is_some());
        assert_eq!(engine.pushes().len(), 2);
    }

    #[test]
    fn remote_name_follows_the_repository_directory() {
        let engine = ScriptedEngine::default();
        let mut controller = controller(&engine);
        controller.initialize(Path::new("/work/my-project/")).unwrap();

        let outcome = controller.push("octocat").unwrap();

        assert_eq!(outcome.remote_url, "https://github.com/octocat/my-project.git");
    }

    #[test]
    fn remote_host_is_configurable() {
        let settings = PushSettings {
            remote_host : "https://git.example.org/".to_owned(),
            ..PushSettings::default()
        };

        let url = remote_url_for(&settings, "octocat", Path::new("/work/proj")).unwrap();

        assert_eq!(url, "https://git.example.org/octocat/proj.git");
    }

    #[test]
    fn root_directory_has_no_remote_name() {
        let err = remote_url_for(&PushSettings::default(), "octocat", Path::new("/")).unwrap_err();

        assert!(err.downcast_ref::<error::InvalidRemoteName>().is_some());
    }

    #[test]
    fn refresh_status_opens_a_repository() {
        let engine = ScriptedEngine::default();
        engine.add_repository("/work/proj");
        let mut controller = controller(&engine);

        let status = controller.refresh_status(Path::new("/work/proj")).unwrap();

        assert!(matches!(status, RepositoryStatus::Opened(_)));
        assert_eq!(controller.readiness(), Readiness::Ready);
    }

    #[test]
    fn refresh_status_on_a_plain_directory_stays_empty() {
        let engine = ScriptedEngine::default();
        let mut controller = controller(&engine);

        let status = controller.refresh_status(Path::new("/work/plain")).unwrap();

        assert_eq!(status, RepositoryStatus::NotARepository);
        assert_eq!(controller.readiness(), Readiness::Empty);

        controller.initialize(Path::new("/work/plain")).unwrap();
        assert_eq!(controller.readiness(), Readiness::Ready);
    }

    #[test]
    fn refresh_status_on_a_plain_directory_keeps_the_repository() {
        let engine = ScriptedEngine::default();
        let mut controller = ready_controller(&engine);

        let status = controller.refresh_status(Path::new("/work/plain")).unwrap();

        assert_eq!(status, RepositoryStatus::NotARepository);
        assert_eq!(controller.readiness(), Readiness::Ready);
        assert_eq!(controller.repository_path(), Some(Path::new("/work/proj")));
    }

    #[test]
    fn initialize_then_refresh_is_ready() {
        let engine = ScriptedEngine::default();
        let mut controller = ready_controller(&engine);

        let status = controller.refresh_status(Path::new("/work/proj")).unwrap();

        assert!(matches!(status, RepositoryStatus::Opened(_)));
        assert_eq!(controller.readiness(), Readiness::Ready);
    }

    #[test]
    fn first_commit_leaves_a_clean_tree() {
        use crate::config::{AuthorConfig, EngineSettings};
        use crate::repository::GitEngine;

        let dir = tempfile::tempdir().unwrap();
        let engine = GitEngine::new(EngineSettings {
            author : Some(AuthorConfig { name: "T".to_owned(), email: "t@example.org".to_owned() }),
            ..EngineSettings::default()
        });
        let mut controller = RepositoryController::new(engine, PushSettings::default());

        controller.initialize(dir.path()).unwrap();
        std::fs::write(dir.path().join("README.md"), "hello").unwrap();
        controller.stage_all().unwrap();
        let id = controller.commit("first commit").unwrap();

        assert_eq!(id.len(), 40);
        match controller.refresh_status(dir.path()).unwrap() {
            RepositoryStatus::Opened(status) => {
                assert!(status.is_clean(), "{:?}", status);
                assert!(status.has_commits);
            },
            other => panic!("unexpected status {:?}", other)
        }
    }
}
