use clap::{Parser, Subcommand};
use miette::{Diagnostic, Report};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;
use tsforge_codegen::CodegenError;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// CLI, validation or answers-file error exit code
pub const EXIT_CLI: i32 = 2;
/// Generation (filesystem) error exit code
pub const EXIT_GENERATION: i32 = 3;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// CLI or configuration error (exit code 2)
    #[error("Configuration error: {message}")]
    #[diagnostic(code(tsforge::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Error while writing the project (exit code 3)
    #[error("Generation error: {message}")]
    #[diagnostic(code(tsforge::cli::generation))]
    Generation {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new generation error with help text
    #[must_use]
    pub fn generation_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

/// Convert `tsforge_codegen::CodegenError` to the matching `CliError` variant.
///
/// Rejected input (validation, unknown kinds, missing names) is a
/// configuration error; anything that failed while touching the filesystem
/// is a generation error.
impl From<CodegenError> for CliError {
    fn from(err: CodegenError) -> Self {
        match err.root_cause() {
            CodegenError::UnsupportedKind { .. } => {
                Self::config_with_help(err.to_string(), "Run 'tsforge kinds' to list writer kinds")
            }
            CodegenError::MissingEntityName { .. } => Self::config_with_help(
                err.to_string(),
                "Pass the entity name as the second argument, e.g. 'tsforge add controller User'",
            ),
            CodegenError::Validation { .. } => Self::config(err.to_string()),
            CodegenError::InvalidPath { .. } | CodegenError::Json(_) => Self::Generation {
                message: err.to_string(),
                help: None,
            },
            CodegenError::Io { .. } | CodegenError::Permission { .. } => Self::generation_with_help(
                err.to_string(),
                "Check file permissions and ensure the output directory is writable",
            ),
            // root_cause never returns the wrapper itself
            CodegenError::Artifact { .. } => Self::Generation {
                message: err.to_string(),
                help: None,
            },
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Generation { .. } => EXIT_GENERATION,
    }
}

/// Render error appropriately based on JSON flag
pub fn render_error(err: &CliError, json_mode: bool) {
    if json_mode {
        let error_envelope = ErrorEnvelope::new(serde_json::json!({
            "code": match err {
                CliError::Config { .. } => "config",
                CliError::Generation { .. } => "generation",
            },
            "message": err.to_string()
        }));

        match serde_json::to_string(&error_envelope) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("Error serializing error response"),
        }
    } else {
        let report = Report::new(err.clone());
        eprintln!("{report:?}");
        let _ = io::stderr().flush();
    }
}

/// Success response envelope for JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkEnvelope<T> {
    /// Status indicator - always "ok" for success
    pub status: &'static str,
    /// The actual data payload
    pub data: T,
}

impl<T> OkEnvelope<T> {
    /// Create a new success envelope
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { status: "ok", data }
    }
}

/// Error response envelope for JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope<E> {
    /// Status indicator - always "error" for failures
    pub status: &'static str,
    /// The error details
    pub error: E,
}

impl<E> ErrorEnvelope<E> {
    /// Create a new error envelope
    #[must_use]
    pub const fn new(error: E) -> Self {
        Self {
            status: "error",
            error,
        }
    }
}

/// Scaffold TypeScript backend projects.
#[derive(Parser, Debug)]
#[command(name = "tsforge")]
#[command(about = "Scaffold TypeScript backend projects from a few answers")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: crate::tracing::LogLevel,

    /// Emit JSON envelopes on stdout.
    #[arg(long, global = true, help = "Emit JSON envelopes on stdout")]
    pub json: bool,

    /// Log output format.
    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "pretty",
        value_enum
    )]
    pub log_format: crate::tracing::TracingFormat,
}

/// Flags shared by commands that build a project context.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct StackArgs {
    /// Database engine.
    #[arg(long = "db", help = "Database engine (MySQL, PostgreSQL, MongoDB, MSSQL)")]
    pub db: Option<String>,

    /// ORM.
    #[arg(long, help = "ORM (TypeORM, Sequelize, Mongoose, Prisma)")]
    pub orm: Option<String>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new project.
    #[command(about = "Generate a new project")]
    New {
        /// Project name, also the directory created under --output-dir.
        #[arg(value_name = "NAME", help = "Project name (may come from --answers)")]
        name: Option<String>,

        #[command(flatten)]
        stack: StackArgs,

        /// Entities to scaffold.
        #[arg(long = "entity", value_name = "NAME", help = "Entity to scaffold (repeatable)")]
        entities: Vec<String>,

        /// Project description.
        #[arg(long, help = "One-line project description")]
        description: Option<String>,

        /// Author.
        #[arg(long, help = "Author for package.json and LICENSE")]
        author: Option<String>,

        /// License identifier.
        #[arg(long, help = "SPDX license identifier (default MIT)")]
        license: Option<String>,

        /// HTTP port.
        #[arg(long, help = "HTTP port of the generated server (default 3000)")]
        port: Option<u16>,

        /// Answers file.
        #[arg(
            long,
            value_name = "FILE",
            env = "TSFORGE_ANSWERS",
            help = "Answers file (.toml or .json); flags override its values"
        )]
        answers: Option<PathBuf>,

        /// Output directory.
        #[arg(
            long,
            short = 'o',
            value_name = "DIR",
            default_value = ".",
            help = "Directory the project is created in"
        )]
        output_dir: PathBuf,

        /// Dry run.
        #[arg(long, help = "Report what would change without writing")]
        dry_run: bool,
    },

    /// Emit one artifact into an existing project.
    #[command(about = "Emit one artifact into an existing project")]
    Add {
        /// Writer kind tag.
        #[arg(value_name = "KIND", help = "Writer kind (see 'tsforge kinds')")]
        kind: String,

        /// Entity name.
        #[arg(value_name = "NAME", help = "Entity name for entity kinds")]
        name: Option<String>,

        /// Project root.
        #[arg(
            long,
            value_name = "DIR",
            default_value = ".",
            help = "Root of the existing project"
        )]
        project_root: PathBuf,

        #[command(flatten)]
        stack: StackArgs,
    },

    /// List supported writer kinds.
    #[command(about = "List supported writer kinds")]
    Kinds,
}

impl Commands {
    /// Subcommand name for spans and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::New { .. } => "new",
            Self::Add { .. } => "add",
            Self::Kinds => "kinds",
        }
    }
}

/// Parse command line arguments into CLI structure
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
