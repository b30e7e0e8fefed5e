use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Matches `<path>:<line>:<rest>` engine diagnostics, splitting at the first
/// `:digits:` boundary.
static DIAGNOSTIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^:]*)(:\d+:.*)$").expect("diagnostic pattern"));

/// Rewrites one engine stderr line.
///
/// The engine runs with its working directory set to the source file's own
/// directory, so a relative path in a diagnostic is relative to `file_dir`,
/// not to the directory the user invoked the build from. The path part is
/// resolved against `file_dir` and re-expressed relative to `invoked_from`.
/// Lines that do not carry a `path:line:` prefix pass through unchanged.
pub(crate) fn rewrite_line(line: &str, file_dir: &Path, invoked_from: &Path) -> String {
    let Some(captures) = DIAGNOSTIC.captures(line) else {
        return line.to_string();
    };

    let absolute = resolve_relative_to(file_dir, Path::new(&captures[1]));
    let shown = pathdiff::diff_paths(&absolute, invoked_from).unwrap_or(absolute);

    format!("{}{}", shown.display(), &captures[2])
}

/// Resolves `path` against `base` to canonical absolute form.
///
/// Purely functional: the process working directory is never touched.
/// Symlinks are resolved through the filesystem when the target exists;
/// otherwise `.`/`..` segments are folded lexically.
pub(crate) fn resolve_relative_to(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    fs::canonicalize(&joined).unwrap_or_else(|_| normalize(&joined))
}

/// Folds `.` and `..` components without consulting the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(Component::ParentDir.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_non_diagnostic_passthrough() {
        let cwd = Path::new("/anywhere");
        assert_eq!(rewrite_line("plain text", cwd, cwd), "plain text");
        assert_eq!(
            rewrite_line("warning: something odd", cwd, cwd),
            "warning: something odd"
        );
    }

    #[test]
    fn test_rewrites_relative_to_invoking_directory() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a/b/x.mcs").write_str("").unwrap();
        let root = temp.path().canonicalize().unwrap();
        let file_dir = root.join("a/b");

        let rewritten = rewrite_line("x.mcs:3:1: missing macro", &file_dir, &root);
        assert_eq!(rewritten, "a/b/x.mcs:3:1: missing macro");
    }

    #[test]
    fn test_rewrites_parent_relative_path() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a/common.mcs").write_str("").unwrap();
        temp.child("a/b/.keep").write_str("").unwrap();
        let root = temp.path().canonicalize().unwrap();
        let file_dir = root.join("a/b");

        let rewritten = rewrite_line("../common.mcs:7:2: bad include", &file_dir, &root);
        assert_eq!(rewritten, "a/common.mcs:7:2: bad include");
    }

    #[test]
    fn test_nonexistent_path_normalized_lexically() {
        let temp = assert_fs::TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        let file_dir = root.join("a/b");

        let rewritten = rewrite_line("./ghost.mcs:1:1: gone", &file_dir, &root);
        assert_eq!(rewritten, "a/b/ghost.mcs:1:1: gone");
    }

    #[test]
    fn test_resolve_absolute_path_untouched_by_base() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("x.mcs").write_str("").unwrap();
        let root = temp.path().canonicalize().unwrap();
        let file = root.join("x.mcs");

        assert_eq!(resolve_relative_to(Path::new("/elsewhere"), &file), file);
    }

    #[test]
    fn test_normalize_folds_dots() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(normalize(Path::new("a/./b/..")), PathBuf::from("a"));
        assert_eq!(normalize(Path::new("../x")), PathBuf::from("../x"));
    }
}
