use crate::config::{Config, SOURCE_EXT};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// One source file discovered under the working directory.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Absolute path to the source.
    pub path: PathBuf,

    /// Path shown to the user, relative to the invoking directory.
    pub display_path: PathBuf,

    /// Directory the engine runs in for this file; its own relative
    /// includes resolve from here.
    pub invoke_dir: PathBuf,
}

/// Walks the configured directories and collects files.
pub(crate) struct Scanner {
    workpath: PathBuf,
    include: Option<PathBuf>,
    invoked_from: PathBuf,
}

impl Scanner {
    /// Creates a scanner; `invoked_from` anchors the display paths.
    pub(crate) fn new(config: &Config, invoked_from: impl Into<PathBuf>) -> Self {
        Self {
            workpath: config.workpath.clone(),
            include: config.include.clone(),
            invoked_from: invoked_from.into(),
        }
    }

    /// Collects every source file under the working directory.
    ///
    /// The result is sorted by path so a run processes files in a
    /// deterministic order.
    pub(crate) fn sources(&self) -> Vec<SourceFile> {
        let mut files = Vec::new();

        for entry in walk(&self.workpath) {
            let path = entry.path();
            if !entry.file_type().is_file() || !file_name_ends_with(path, SOURCE_EXT) {
                continue;
            }

            let invoke_dir = path.parent().unwrap_or(&self.workpath).to_path_buf();
            let display_path = pathdiff::diff_paths(path, &self.invoked_from)
                .unwrap_or_else(|| path.to_path_buf());

            files.push(SourceFile {
                path: path.to_path_buf(),
                display_path,
                invoke_dir,
            });
        }

        // Sort for deterministic ordering
        files.sort_by(|a, b| a.path.cmp(&b.path));

        debug!(
            "discovered {} source files under {}",
            files.len(),
            self.workpath.display()
        );
        files
    }

    /// Collects every regular file under the include directory. These are
    /// attached identically to every invocation.
    pub(crate) fn includes(&self) -> Vec<PathBuf> {
        let Some(include) = &self.include else {
            return Vec::new();
        };

        let mut files: Vec<PathBuf> = walk(include)
            .filter(|entry| entry.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .collect();
        files.sort();

        debug!("collected {} include files under {}", files.len(), include.display());
        files
    }
}

/// Recursive traversal that logs and skips unreadable entries.
fn walk(root: &Path) -> impl Iterator<Item = walkdir::DirEntry> + '_ {
    WalkDir::new(root).into_iter().filter_map(move |result| match result {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!("walk error under {}: {}", root.display(), e);
            None
        }
    })
}

/// True when the file name (not the whole path) ends with `suffix`.
pub(crate) fn file_name_ends_with(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn scanner_for(root: &Path, include: Option<PathBuf>) -> Scanner {
        let config = Config {
            workpath: root.to_path_buf(),
            result: ".out".to_string(),
            include,
        };
        Scanner::new(&config, root)
    }

    #[test]
    fn test_finds_nested_sources_sorted() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("b/second.mcs").write_str("").unwrap();
        temp.child("a/first.mcs").write_str("").unwrap();
        temp.child("a/readme.txt").write_str("").unwrap();

        let root = temp.path().canonicalize().unwrap();
        let files = scanner_for(&root, None).sources();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].display_path, PathBuf::from("a/first.mcs"));
        assert_eq!(files[1].display_path, PathBuf::from("b/second.mcs"));
    }

    #[test]
    fn test_invoke_dir_is_containing_directory() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a/b/x.mcs").write_str("").unwrap();

        let root = temp.path().canonicalize().unwrap();
        let files = scanner_for(&root, None).sources();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].invoke_dir, root.join("a/b"));
        assert_eq!(files[0].path, root.join("a/b/x.mcs"));
    }

    #[test]
    fn test_extension_matched_against_name_only() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("dir.mcs/inner.txt").write_str("").unwrap();
        temp.child("x.mcsx").write_str("").unwrap();
        temp.child("ok.mcs").write_str("").unwrap();

        let root = temp.path().canonicalize().unwrap();
        let files = scanner_for(&root, None).sources();

        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("ok.mcs"));
    }

    #[test]
    fn test_empty_tree_yields_no_sources() {
        let temp = assert_fs::TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        assert!(scanner_for(&root, None).sources().is_empty());
    }

    #[test]
    fn test_includes_collect_every_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("inc/macros.mcs").write_str("").unwrap();
        temp.child("inc/deep/extra.txt").write_str("").unwrap();

        let root = temp.path().canonicalize().unwrap();
        let include = root.join("inc");
        let files = scanner_for(&root, Some(include.clone())).includes();

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.starts_with(&include)));
    }

    #[test]
    fn test_no_include_directory_configured() {
        let temp = assert_fs::TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        assert!(scanner_for(&root, None).includes().is_empty());
    }
}
