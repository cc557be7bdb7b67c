//! Orchestration of a full generation run.

use crate::command::{CommandInvoker, UndoOutcome, WriteArtifactCommand};
use crate::config::ProjectConfigBuilder;
use crate::context::{Answers, ProjectContext};
use crate::factory::WriterFactory;
use crate::fs::FileStatus;
use crate::kinds::WriterKind;
use crate::validation::ChainValidator;
use crate::writer::{FileWriter, GeneratedFile};
use crate::{CodegenError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tsforge_events::{emit_artifact_failed, emit_artifact_written, emit_generation_completed, emit_generation_started};

/// Project-wide kinds, written first and in this order.
const PROJECT_KINDS: [WriterKind; 5] = [
    WriterKind::AppConfig,
    WriterKind::DbConfig,
    WriterKind::OrmConfig,
    WriterKind::Server,
    WriterKind::EnvExample,
];

/// Kinds written once per entity.
const ENTITY_KINDS: [WriterKind; 6] = [
    WriterKind::Model,
    WriterKind::Repository,
    WriterKind::Service,
    WriterKind::Controller,
    WriterKind::Route,
    WriterKind::Validation,
];

/// Middleware every project gets.
const SHARED_MIDDLEWARE: [&str; 1] = ["logger"];

/// Options for a generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory the project root is created in
    pub output_dir: PathBuf,
    /// Report what would change without writing
    pub dry_run: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            dry_run: false,
        }
    }
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    /// Project name
    pub project_name: String,
    /// `<output_dir>/<project_name>`
    pub project_root: PathBuf,
    /// Every artifact in write order
    pub files: Vec<GeneratedFile>,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Wall time of the run
    pub duration_ms: u64,
}

impl GenerationReport {
    /// Number of files with `status`.
    #[must_use]
    pub fn count(&self, status: FileStatus) -> usize {
        self.files.iter().filter(|f| f.status == status).count()
    }

    /// Files that were created or updated (or would be, in a dry run).
    #[must_use]
    pub fn changed(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.status != FileStatus::Unchanged)
            .count()
    }
}

/// Drives validation, writer resolution and emission.
#[derive(Debug)]
pub struct ProjectGenerator {
    options: GenerateOptions,
    validator: ChainValidator,
    invoker: CommandInvoker,
}

impl ProjectGenerator {
    /// Generator with the standard validation chain.
    #[must_use]
    pub fn new(options: GenerateOptions) -> Self {
        Self::with_validator(options, ChainValidator::standard())
    }

    /// Generator with a custom validation chain.
    #[must_use]
    pub fn with_validator(options: GenerateOptions, validator: ChainValidator) -> Self {
        Self {
            options,
            validator,
            invoker: CommandInvoker::new(),
        }
    }

    /// Run options.
    #[must_use]
    pub const fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// History of writes performed so far.
    #[must_use]
    pub const fn invoker(&self) -> &CommandInvoker {
        &self.invoker
    }

    /// Generate a full project from `answers`.
    ///
    /// Answers are validated before anything touches the filesystem. Undo
    /// history starts empty for each run, so [`undo_last`](Self::undo_last)
    /// only reaches this run's writes. On an artifact failure the run stops;
    /// files already written stay in place and can be reverted.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Validation`] for rejected answers and
    /// [`CodegenError::Artifact`] naming the artifact that failed.
    pub fn generate(&mut self, answers: &Answers) -> Result<GenerationReport> {
        let started = Instant::now();
        self.validator.validate(answers)?;

        let context = Arc::new(ProjectContext::from_answers(answers)?);
        let project_root = self.options.output_dir.join(&context.project_name);
        self.invoker.clear();
        emit_generation_started!(context.project_name, project_root.display());

        let writers = Self::plan(&context)?;
        let mut files = Vec::with_capacity(writers.len());
        for writer in writers {
            files.push(self.run_writer(writer, &project_root)?);
        }

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        emit_generation_completed!(context.project_name, files.len(), duration_ms);

        Ok(GenerationReport {
            project_name: context.project_name.clone(),
            project_root,
            files,
            dry_run: self.options.dry_run,
            duration_ms,
        })
    }

    /// Emit one artifact into an existing project at `project_root`.
    ///
    /// The write joins the current undo history.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::UnsupportedKind`] or
    /// [`CodegenError::MissingEntityName`] before any I/O, and
    /// [`CodegenError::Artifact`] if the write fails.
    pub fn generate_single(
        &mut self,
        kind: &str,
        name: Option<&str>,
        answers: &Answers,
        project_root: &Path,
    ) -> Result<GeneratedFile> {
        let context = Arc::new(ProjectContext::from_answers(answers)?);
        let writer = WriterFactory::new(context).create(kind, name)?;
        self.run_writer(writer, project_root)
    }

    /// Revert the most recent write.
    ///
    /// # Errors
    ///
    /// Returns the filesystem error if the revert fails.
    pub fn undo_last(&mut self) -> Result<UndoOutcome> {
        self.invoker.undo()
    }

    /// Writers for `context` in write order.
    ///
    /// One factory (and so one notifier) serves the whole plan, and the ORM
    /// config writer is created before the database config writer emits.
    fn plan(context: &Arc<ProjectContext>) -> Result<Vec<Box<dyn FileWriter>>> {
        let factory = WriterFactory::new(Arc::clone(context));
        let mut writers = Vec::new();

        for kind in PROJECT_KINDS {
            writers.push(factory.create_kind(kind, None)?);
        }
        for entity in &context.entities {
            for kind in ENTITY_KINDS {
                writers.push(factory.create_kind(kind, Some(entity.pascal()))?);
            }
        }
        for name in SHARED_MIDDLEWARE {
            writers.push(factory.create_kind(WriterKind::Middleware, Some(name))?);
        }
        writers.extend(ProjectConfigBuilder::defaults_for(context).build().writers()?);

        tracing::debug!(count = writers.len(), "Planned writers");
        Ok(writers)
    }

    fn run_writer(&mut self, writer: Box<dyn FileWriter>, project_root: &Path) -> Result<GeneratedFile> {
        let label = writer.label();

        let outcome = if self.options.dry_run {
            writer.preview(project_root)
        } else {
            let mut command = WriteArtifactCommand::new(writer, project_root);
            let written = command.write();
            if written.is_ok() {
                self.invoker.record(Box::new(command));
            }
            written
        };

        match outcome {
            Ok(file) => {
                emit_artifact_written!(file.artifact, file.path.display(), file.status);
                Ok(file)
            }
            Err(error) => {
                emit_artifact_failed!(label, error);
                Err(CodegenError::artifact(label, error))
            }
        }
    }
}
