//! # mcs-prep
//!
//! Build-orchestration front end for the `gpp` macro-preprocessing step.
//!
//! ## Features
//!
//! - Directive mini-language configuration with self-documenting help
//! - Recursive source discovery with deterministic ordering
//! - Per-file engine invocation from the source's own directory
//! - Diagnostic path rewriting relative to the invoking location
//! - Clear mode removing previously generated artifacts
//!
//! ## Quick Start
//!
//! ```no_run
//! use mcs_prep::{Config, Pipeline, DIRECTIVE_FILE};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::load(DIRECTIVE_FILE)?;
//! let stats = Pipeline::new(config)?.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library follows a pipeline architecture:
//! 1. **Registry**: static table of recognized directives
//! 2. **Parser**: resolves the directive file into a configuration
//! 3. **Scanner**: discovers source and include files
//! 4. **Pipeline**: invokes the engine and rewrites its diagnostics

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod diagnostic;
mod directive;
mod error;
mod invocation;
mod pipeline;
mod registry;
mod scanner;

pub use config::{Config, DIRECTIVE_FILE, SOURCE_EXT};
pub use error::{Error, Result};
pub use invocation::InvocationPlan;
pub use pipeline::{Pipeline, RunStats};
pub use registry::{DirectiveSpec, render_help};
pub use scanner::SourceFile;

/// Runs process mode with the given configuration.
///
/// This is the main entry point for the library.
///
/// # Errors
///
/// Returns an error if:
/// - The current directory cannot be determined
/// - The engine binary cannot be launched
pub fn run(config: Config) -> Result<RunStats> {
    Pipeline::new(config)?.run()
}

/// Runs clear mode, returning the number of artifacts removed.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined or a
/// matching artifact cannot be deleted.
pub fn clear(config: Config) -> Result<usize> {
    Pipeline::new(config)?.clear()
}
