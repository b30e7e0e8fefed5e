use crate::directive::{self, DirectiveValues};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension identifying source files under the working directory.
pub const SOURCE_EXT: &str = ".mcs";

/// Name of the directive file looked up in the invoking directory.
pub const DIRECTIVE_FILE: &str = ".mcs";

/// Configuration resolved from the directive file.
///
/// Built once at startup and never mutated afterward.
#[derive(Debug, Clone)]
pub struct Config {
    /// Canonical working directory scanned for source files.
    pub workpath: PathBuf,

    /// Suffix appended to a source path to name its generated file.
    /// Used verbatim, never path-expanded.
    pub result: String,

    /// Canonical include directory, when configured.
    pub include: Option<PathBuf>,
}

impl Config {
    /// Loads and resolves the directive file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - A line fails the directive grammar
    /// - A mandatory directive is unset after the whole file is consumed
    /// - A path-valued directive cannot be canonicalized
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::directive_file(path, e))?;
        Self::from_directives(&text)
    }

    /// Resolves configuration from directive file contents.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Config::load`], minus the file read.
    pub fn from_directives(text: &str) -> Result<Self> {
        let values = directive::parse(text)?;
        directive::check_mandatory(&values)?;

        let workpath = canonical_path(mandatory(&values, "workpath")?)?;
        if !workpath.is_dir() {
            return Err(Error::config(format!(
                "workpath is not a directory: {}",
                workpath.display()
            )));
        }

        let result = mandatory(&values, "result")?.to_string();

        let include = match values.get("include") {
            Some(value) => Some(canonical_path(value)?),
            None => None,
        };

        Ok(Self {
            workpath,
            result,
            include,
        })
    }

    /// Suffix identifying generated artifacts under the working directory,
    /// `<source extension><result>`.
    #[must_use]
    pub fn artifact_suffix(&self) -> String {
        format!("{SOURCE_EXT}{}", self.result)
    }
}

fn mandatory<'a>(values: &'a DirectiveValues, name: &'static str) -> Result<&'a str> {
    values
        .get(name)
        .map(String::as_str)
        .ok_or(Error::MissingDirective { name })
}

/// Expands a path-valued directive: trimmed, then canonicalized to absolute
/// form with `.`/`..` segments and symlinks resolved.
fn canonical_path(value: &str) -> Result<PathBuf> {
    let trimmed = value.trim();
    fs::canonicalize(trimmed).map_err(|e| Error::io(trimmed, e))
}
