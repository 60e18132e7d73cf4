//
// src/util.rs
//
// Path utilities and git output helpers
//
// (C) 2020 Taras Zakharko
//
// This code is licensed under GPL 3.0

use std::path::{Path, PathBuf};

/// Obtain the path relative to the current directory
pub fn get_relative_path<P: AsRef<Path>>(path: P) -> PathBuf {
    use pathdiff::diff_paths;

    std::env::current_dir().map_or_else(
        // if current dir cannot be retrieved, just return the original
        |_| path.as_ref().into(),
        |current| diff_paths(path.as_ref(), current).unwrap_or_else(|| path.as_ref().into())
    )
}

/// Obtain the absolute, lexically normalized path
///
/// Relative paths are resolved against the current directory. If that cannot be
/// determined, the path is only cleaned.
pub fn absolute_path<P: AsRef<Path>>(path: P) -> PathBuf {
    use path_clean::PathClean;

    let path = path.as_ref();

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|current| current.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    absolute.clean()
}

/// The last component of the normalized path
///
/// Trailing separators and `.` components do not count, so `/work/proj/` and
/// `/work/proj/.` both yield `proj`
pub fn last_path_component<P: AsRef<Path>>(path: P) -> Option<String> {
    absolute_path(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Translate the path to one relative to `root`
///
/// Relative paths are assumed to be relative to `root` already and are
/// returned unchanged. `None` if an absolute path lies outside `root`.
pub fn path_relative_to_root<P, R>(path: P, root: R) -> Option<PathBuf>
where
    P: AsRef<Path>,
    R: AsRef<Path>
{
    use path_clean::PathClean;

    let path = path.as_ref();

    if !path.is_absolute() {
        return Some( path.to_path_buf() );
    }

    let path = path.to_path_buf().clean();
    let root = root.as_ref().to_path_buf().clean();

    path.strip_prefix(&root).ok().map(Path::to_path_buf)
}


lazy_static::lazy_static! {
    static ref GIT_DIAGNOSTIC_LINE : regex::Regex = regex::Regex::new(
        r"(?m)^(?:fatal|error|remote|hint):.*$"
    ).expect("fatal: invalid regex");
}

/// Condense the output of a git subprocess to its diagnostic lines
///
/// Lines starting with `fatal:`, `error:`, `remote:` or `hint:` are kept; if
/// there are none, the whole trimmed output is returned
pub fn summarize_git_output(output: &str) -> String {
    use itertools::Itertools;

    let lines = GIT_DIAGNOSTIC_LINE.find_iter(output)
        .map(|m| m.as_str().trim_end())
        .join("\n");

    if lines.is_empty() {
        output.trim().to_owned()
    } else {
        lines
    }
}
