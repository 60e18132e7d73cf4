//
// src/error.rs
//
// The global error catalogue. All errors are defined here.
// In addition, common error styling routines are here as well.
//
//
// (C) 2020 Taras Zakharko
//
// This code is licensed under GPL 3.0

use std::path::PathBuf;
use crate::util::get_relative_path;

define_error!(
    NotInitialized
    @display(self) {
        (@err "repository is not initialized")
        (@hint "(use {init} to create one or {status} to open an existing one)"
            [
                init   = style::command("init"),
                status = style::command("status"),
            ])
    }
);

define_error!(
    InvalidRepository {
        pub path: PathBuf
    }
    @display(self) {
        (@err "{path} is not a git repository"
            [
                path = style::path(&self.path.display())
            ])
    }
);

define_error!(
    PathNotInRepository {
        pub path: PathBuf
    }
    @display(self) {
        (@err "{path} is not within the repository"
            [
                path = style::path(&self.path.display())
            ]
        )
    }
);

define_error!(
    InvalidRemoteName {
        pub path: PathBuf
    }
    @display(self) {
        (@err "unable to derive a remote repository name from {path}"
            [
                path = style::path(&self.path.display())
            ]
        )
    }
);

define_error!(
    NoUpstreamBranch {
        pub remote : String,
        pub msg    : String
    }
    @display(self) {
        (@err "the current branch has no upstream branch on {remote} {msg}"
            [
                remote = style::value(&self.remote),
                msg    = style::comment(&self.msg)
            ]
        )
    }
);

define_error!(
    PushFailed {
        pub remote : String,
        pub code   : Option<i32>,
        pub msg    : String
    }
    @display(self) {
        (@err "push to {remote} failed with {code}"
            [
                remote = style::value(&self.remote),
                code   = self.code
                    .map(|code| format!("exit code {}", code))
                    .unwrap_or_else(|| "no exit code".to_owned())
            ]
        )
        (@div "{msg}" [ msg = &self.msg ])
    }
);

define_error!(
    GitNotFound {
        pub binary: String
    }
    @display(self) {
        (@err "unable to run {binary}"
            [
                binary = style::command(&self.binary)
            ]
        )
        (@hint "(install git or set {key} in the configuration file)"
            [
                key = style::value("git-binary")
            ]
        )
    }
);

define_error!(
    MissingSignature
    @display(self) {
        (@err "no commit author is configured")
        (@hint "(set {keys} in git or add an {section} section to {file})"
            [
                keys    = style::value("user.name/user.email"),
                section = style::value("[author]"),
                file    = crate::config::CONFIG_FILE
            ]
        )
    }
);

define_error!(
    OtherGitError {
        pub msg : String
    }
    @display(self) {
        (@err "git error {msg}" [
                msg  = style::comment(&self.msg)
            ]
        )
    }
);

impl From<git2::Error> for OtherGitError {
    fn from(error: git2::Error) -> Self {
        OtherGitError { msg : error.message().to_owned() }
    }
}

define_error!(
    FileReadError {
        pub path : PathBuf,
        pub msg  : String,
    }
    @display(self) {
        (@err "unable to read {path} {msg}"
            [
                path = style::path(get_relative_path(&self.path).display()),
                msg  = style::comment(&self.msg)
            ]
        )
    }
);

define_error!(
    ConfigurationError {
        pub path : PathBuf,
        pub text : String,
        pub at   : Option<(usize, usize)>,
        pub msg  : String
    }
    @display(self) {
        (@err "malformed configuration file {path}"
            [
                path = style::path(get_relative_path(&self.path).display())
            ]
        )
        (@div "{body}"
            [
                body = style::config_excerpt(&self.text, self.at, &self.msg)
            ]
        )
    }
);


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


mod style {
    use std::fmt::Display;
    use console::Style;

    fn basic_style() -> Style {
        Style::new().force_styling(true)
    }

    pub fn value<D: Display>(obj: D) -> impl Display {
        basic_style().cyan().apply_to(obj)
    }

    pub fn comment<D: Display>(obj: D) -> impl Display {
        let msg = obj.to_string();
        let msg = msg.trim();
        let msg = if msg.is_empty() {
            "".to_owned()
        } else {
            format!("({})", lowercase_first(msg))
        };

        basic_style().italic().apply_to(msg)
    }

    pub fn path<D: Display>(obj: D) -> impl Display {
        basic_style().italic().apply_to(format!("'{}'", obj))
    }

    pub fn command<D: Display>(obj: D) -> impl Display {
        basic_style().bold().apply_to(format!("`{}`", obj))
    }

    /// Render the offending configuration line with a marker under the column
    ///
    /// Line and column are zero-based, as reported by the TOML parser
    pub fn config_excerpt(text: &str, at: Option<(usize, usize)>, msg: &str) -> String {
        let (row, col) = match at {
            Some(at) => at,
            None     => return format!("  {}", msg)
        };

        let line = text.lines().nth(row).unwrap_or("");
        let number = (row + 1).to_string();

        format!("  {number} | {line}\n  {pad} | {offset}^\n  {pad} |   {msg}",
            number = number,
            line   = line,
            pad    = " ".repeat(number.len()),
            offset = " ".repeat(col),
            msg    = basic_style().yellow().apply_to(msg)
        )
    }

    fn lowercase_first(s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            None => String::new(),
            Some(ch) => ch.to_lowercase().chain(chars).collect(),
        }
    }
}
