//! tsforge - scaffold TypeScript backend projects
//!
//! The binary is a thin shell over [`tsforge_codegen`]: it parses flags,
//! merges them with an optional answers file, runs the generator and renders
//! the report (or error) as text or JSON envelopes.

// CLI output goes to stdout/stderr on purpose
#![allow(clippy::print_stdout, clippy::print_stderr)]

/// Answers files and flag overrides.
pub mod answers;
/// CLI argument parsing and exit codes.
pub mod cli;
/// Command implementations.
pub mod commands;
/// Tracing setup.
pub mod tracing;

pub use cli::{CliError, EXIT_CLI, EXIT_GENERATION, EXIT_OK};

/// Run a parsed command line and return the process exit code.
#[must_use]
pub fn run(cli: cli::Cli) -> i32 {
    let tracing_config = tracing::TracingConfig {
        format: if cli.json {
            tracing::TracingFormat::Json
        } else {
            cli.log_format
        },
        level: cli.level.into(),
        ..Default::default()
    };
    // Already initialized when embedded in tests
    let _ = tracing::init_tracing(tracing_config);

    match commands::execute(cli.command, cli.json) {
        Ok(()) => EXIT_OK,
        Err(err) => {
            cli::render_error(&err, cli.json);
            cli::exit_code_for(&err)
        }
    }
}
