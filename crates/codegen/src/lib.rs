//! # tsforge-codegen
//!
//! File generation engine behind `tsforge new` and `tsforge add`.
//!
//! This crate turns a validated answers record into a tree of TypeScript
//! backend boilerplate:
//! - [`FileWriter`] fixes how one artifact is emitted under a project root
//! - [`WriterFactory`] resolves a kind tag (plus entity name) to a writer
//! - [`ProjectConfigBuilder`] accumulates root config sections (package.json,
//!   tsconfig, lint rules, editor settings, ignore file, ...)
//! - [`CommandInvoker`] records every write so the latest one can be undone
//! - [`ChainValidator`] rejects bad answers before any file is touched
//! - [`ProjectGenerator`] drives the whole run
//!
//! ## Example
//!
//! ```no_run
//! use tsforge_codegen::{Answers, GenerateOptions, ProjectGenerator};
//!
//! let answers = Answers::new("demo", "PostgreSQL").with_entity("User");
//! let mut generator = ProjectGenerator::new(GenerateOptions::default());
//! let report = generator.generate(&answers)?;
//! println!("{} files under {}", report.files.len(), report.project_root.display());
//! # Ok::<(), tsforge_codegen::CodegenError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod command;
pub mod config;
pub mod context;
pub mod factory;
pub mod formatter;
pub mod fs;
pub mod generator;
pub mod kinds;
pub mod templates;
pub mod validation;
pub mod writer;

pub use command::{Command, CommandInvoker, FnCommand, UndoOutcome, WriteArtifactCommand};
pub use config::{ConfigSection, ProjectConfig, ProjectConfigBuilder};
pub use context::{Answers, DatabaseKind, EntityName, OrmKind, ProjectContext};
pub use factory::{WriterFactory, WriterSpec};
pub use fs::{DirectoryEnsurer, FileEmitter, FileStatus};
pub use generator::{GenerateOptions, GenerationReport, ProjectGenerator};
pub use kinds::WriterKind;
pub use validation::{ChainValidator, Rule, ValidationLink};
pub use writer::{ArtifactDescriptor, FileWriter, GeneratedFile};

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during code generation
#[derive(Error, Debug, Diagnostic)]
pub enum CodegenError {
    /// The factory was asked for a writer kind outside the closed set
    #[error("Unsupported writer kind '{kind}' (expected one of: {supported})")]
    #[diagnostic(
        code(tsforge_codegen::factory::unsupported_kind),
        help("Run `tsforge kinds` to list the supported writer kinds")
    )]
    UnsupportedKind {
        /// The rejected kind tag
        kind: String,
        /// Comma separated list of supported tags
        supported: String,
    },

    /// An entity-parameterized writer was requested without a name
    #[error("Writer kind '{kind}' requires an entity name")]
    #[diagnostic(code(tsforge_codegen::factory::missing_name))]
    MissingEntityName {
        /// The kind that needs a name
        kind: String,
    },

    /// An answers record broke a validation rule
    #[error("Validation failed ({rule}): {message}")]
    #[diagnostic(code(tsforge_codegen::validation::failed))]
    Validation {
        /// Name of the violated rule
        rule: &'static str,
        /// Which constraint was not met
        message: String,
    },

    /// A writer produced a path outside the project root
    #[error("Invalid artifact path '{}': {reason}", .path.display())]
    #[diagnostic(code(tsforge_codegen::writer::invalid_path))]
    InvalidPath {
        /// The offending path
        path: PathBuf,
        /// Why it was rejected
        reason: &'static str,
    },

    /// I/O error with path context
    #[error("I/O error during {operation} on {}: {source}", .path.display())]
    #[diagnostic(
        code(tsforge_codegen::io::error),
        help("Check file permissions and ensure the path exists")
    )]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// The path where the error occurred
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
    },

    /// The target file could not be opened for writing
    #[error("Permission denied writing {}", .path.display())]
    #[diagnostic(code(tsforge_codegen::io::permission))]
    Permission {
        /// The file that could not be opened
        path: PathBuf,
    },

    /// A specific artifact failed during a generation run
    #[error("Failed to generate {artifact}: {source}")]
    #[diagnostic(code(tsforge_codegen::generator::artifact))]
    Artifact {
        /// Label of the failing artifact (e.g. `controller:User`)
        artifact: String,
        /// The underlying failure
        #[source]
        source: Box<CodegenError>,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    #[diagnostic(code(tsforge_codegen::json))]
    Json(#[from] serde_json::Error),
}

impl CodegenError {
    /// Create an I/O error with context
    pub fn io(source: std::io::Error, path: impl AsRef<Path>, operation: &'static str) -> Self {
        Self::Io {
            source,
            path: path.as_ref().to_path_buf(),
            operation,
        }
    }

    /// Create a validation error for `rule`
    pub fn validation(rule: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            rule,
            message: message.into(),
        }
    }

    /// Wrap `source` with the label of the artifact that failed
    #[must_use]
    pub fn artifact(artifact: impl Into<String>, source: Self) -> Self {
        Self::Artifact {
            artifact: artifact.into(),
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through [`CodegenError::Artifact`] wrappers
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Artifact { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type for codegen operations
pub type Result<T> = std::result::Result<T, CodegenError>;
