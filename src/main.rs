use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use mcs_prep::{Config, DIRECTIVE_FILE, Pipeline, render_help};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const USAGE: &str = "mcs-prep allows only the -c | --clear argument to remove generated files";

#[derive(Parser, Debug)]
#[command(
    name = "mcs-prep",
    version,
    about = "Run the gpp macro engine over every .mcs source",
    long_about = "Run the gpp macro engine over every .mcs source found under the configured \
    working directory.\n\n\
    Configuration is read from the .mcs directive file in the current directory; write \
    \"--- help\" inside it to see the directive reference. Each source file x.mcs produces \
    x.mcs<result> next to it, and engine diagnostics are reported with paths relative to \
    the invoking directory."
)]
struct Cli {
    /// Remove generated files instead of processing sources
    #[arg(short = 'c', long)]
    clear: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            // the usage contract: anything beyond the clear flag is refused
            println!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    setup_tracing();

    match execute(cli.clear) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<mcs_prep::Error>() {
                Some(lib_err) if lib_err.wants_help() => {
                    println!("{lib_err}\n{}", render_help());
                }
                _ => println!("{err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn execute(clear: bool) -> anyhow::Result<()> {
    let config = Config::load(DIRECTIVE_FILE)?;
    let pipeline = Pipeline::new(config)?;

    if clear {
        pipeline
            .clear()
            .context("failed to remove generated files")?;
    } else {
        pipeline.run().context("processing failed")?;
    }
    Ok(())
}

/// Routes library logs to stderr so the build output contract on stdout
/// stays intact. Verbosity is controlled through `RUST_LOG`.
fn setup_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mcs_prep=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
