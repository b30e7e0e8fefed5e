use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for directive parsing, configuration, and orchestration.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// The directive file could not be opened or read.
    #[error("cannot read directive file '{path}': {message}")]
    DirectiveFile {
        /// Path of the directive file
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// A directive line names a directive missing from the registry.
    #[error("unknown directive ~{name} at line {line}")]
    UnknownDirective {
        /// The unrecognized directive name
        name: String,
        /// 1-indexed line number
        line: usize,
    },

    /// A non-empty line matched neither the directive nor the comment form.
    #[error("unexpected line {line}: {text}")]
    UnexpectedLine {
        /// 1-indexed line number
        line: usize,
        /// The offending line, trimmed
        text: String,
    },

    /// A mandatory directive was still unset after the whole file was read.
    #[error("~{name} is not defined")]
    MissingDirective {
        /// Name of the unset directive
        name: &'static str,
    },

    /// Configuration validation error.
    #[error("invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// The external engine binary could not be launched.
    #[error("failed to launch '{program}': {message}")]
    EngineSpawn {
        /// Program name that failed to start
        program: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a directive-file read error.
    #[must_use]
    pub fn directive_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectiveFile {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates an engine launch error.
    #[must_use]
    pub fn engine_spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::EngineSpawn {
            program: program.into(),
            message: source.to_string(),
        }
    }

    /// Returns true when the report for this error should carry the full
    /// help text. Only the two directive syntax errors qualify; an
    /// unreadable directive file cannot be explained by its own grammar.
    #[must_use]
    pub const fn wants_help(&self) -> bool {
        matches!(
            self,
            Self::UnknownDirective { .. } | Self::UnexpectedLine { .. }
        )
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}
