use crate::config::Config;
use crate::diagnostic;
use crate::error::{Error, Result};
use crate::invocation::{CommandBuilder, ENGINE};
use crate::scanner::{Scanner, file_name_ends_with};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Statistics collected during a process-mode run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Source files processed
    pub files_processed: usize,

    /// Diagnostic lines printed
    pub diagnostics: usize,

    /// Engine invocations that exited non-zero
    pub engine_failures: usize,

    /// Total execution time
    pub duration: Duration,
}

/// Orchestrates engine invocations over the discovered sources.
///
/// Strictly sequential: each invocation is a blocking call waited on to
/// completion before the next file is touched.
pub struct Pipeline {
    config: Config,
    invoked_from: PathBuf,
    engine: String,
}

impl Pipeline {
    /// Creates a pipeline anchored at the process's current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn new(config: Config) -> Result<Self> {
        let invoked_from = env::current_dir().map_err(|e| Error::io(".", e))?;
        Ok(Self {
            config,
            invoked_from,
            engine: ENGINE.to_string(),
        })
    }

    /// Replaces the engine binary invoked per source file.
    #[must_use]
    pub fn with_engine(mut self, program: impl Into<String>) -> Self {
        self.engine = program.into();
        self
    }

    /// Process mode: runs the engine over every source file in discovery
    /// order, rewriting its stderr diagnostics and forwarding its stdout.
    ///
    /// A non-zero engine exit status is observed and counted, never fatal;
    /// the run continues so diagnostics from every file surface in one pass.
    ///
    /// # Errors
    ///
    /// Returns an error only if the engine binary cannot be launched.
    pub fn run(self) -> Result<RunStats> {
        let start = Instant::now();

        let scanner = Scanner::new(&self.config, &self.invoked_from);
        let includes = scanner.includes();
        let builder = CommandBuilder::new(&self.config, &includes).with_program(&self.engine);
        let sources = scanner.sources();

        info!(
            "processing {} source files with {} includes",
            sources.len(),
            includes.len()
        );

        println!("--- processing...");
        let mut stats = RunStats::default();

        for file in &sources {
            println!("--- file: {}", file.display_path.display());

            let plan = builder.plan(file);
            debug!(
                "running {} in {}",
                builder.program(),
                plan.workdir.display()
            );

            let output = Command::new(builder.program())
                .args(&plan.args)
                .current_dir(&plan.workdir)
                .output()
                .map_err(|e| Error::engine_spawn(builder.program(), e))?;

            // every engine stderr line is a diagnostic, whatever its severity
            let stderr = String::from_utf8_lossy(&output.stderr);
            for line in stderr.lines() {
                if line.trim().is_empty() {
                    continue;
                }
                println!(
                    "{}",
                    diagnostic::rewrite_line(line, &file.invoke_dir, &self.invoked_from)
                );
                stats.diagnostics += 1;
            }

            print!("{}", String::from_utf8_lossy(&output.stdout));

            if !output.status.success() {
                // observed, not fatal; the exit code of the run is unaffected
                warn!(
                    "{} exited with {} for {}",
                    builder.program(),
                    output.status,
                    file.display_path.display()
                );
                stats.engine_failures += 1;
            }
            stats.files_processed += 1;
        }

        println!("--- done.");
        stats.duration = start.elapsed();
        Ok(stats)
    }

    /// Clear mode: deletes every generated artifact under the working
    /// directory, identified by the `<source extension><result>` suffix.
    /// Returns the number of files removed. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if a matching file cannot be deleted.
    pub fn clear(self) -> Result<usize> {
        let suffix = self.config.artifact_suffix();
        let mut removed = 0;

        for result in WalkDir::new(&self.config.workpath) {
            match result {
                Ok(entry)
                    if entry.file_type().is_file()
                        && file_name_ends_with(entry.path(), &suffix) =>
                {
                    fs::remove_file(entry.path()).map_err(|e| Error::io(entry.path(), e))?;
                    removed += 1;
                }
                Err(e) => warn!("walk error during clear: {e}"),
                _ => {}
            }
        }

        info!(
            "removed {} generated files under {}",
            removed,
            self.config.workpath.display()
        );
        Ok(removed)
    }
}
