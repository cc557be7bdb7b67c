//! Undoable actions and their history.

use crate::writer::{FileWriter, GeneratedFile};
use crate::{CodegenError, Result};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tsforge_events::emit_command_undone;

/// An action that can be executed once and later reverted.
pub trait Command: Send {
    /// Human readable description used in logs and undo reports.
    fn describe(&self) -> String;

    /// Perform the action.
    ///
    /// # Errors
    ///
    /// Returns the failure of the underlying action.
    fn execute(&mut self) -> Result<()>;

    /// Revert a successful [`execute`](Self::execute).
    ///
    /// # Errors
    ///
    /// Returns the failure of the revert.
    fn undo(&mut self) -> Result<()>;

    /// File written by the last execution, if this command writes one.
    fn produced(&self) -> Option<&GeneratedFile> {
        None
    }
}

type Action = Box<dyn FnMut() -> Result<()> + Send>;

/// A command built from two closures.
pub struct FnCommand {
    description: String,
    execute: Action,
    undo: Action,
}

impl FnCommand {
    /// Create a command from an execute and an undo closure.
    pub fn new<E, U>(description: impl Into<String>, execute: E, undo: U) -> Self
    where
        E: FnMut() -> Result<()> + Send + 'static,
        U: FnMut() -> Result<()> + Send + 'static,
    {
        Self {
            description: description.into(),
            execute: Box::new(execute),
            undo: Box::new(undo),
        }
    }
}

impl fmt::Debug for FnCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCommand")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl Command for FnCommand {
    fn describe(&self) -> String {
        self.description.clone()
    }

    fn execute(&mut self) -> Result<()> {
        (self.execute)()
    }

    fn undo(&mut self) -> Result<()> {
        (self.undo)()
    }
}

/// What was at the target path before a write.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Previous {
    Absent,
    Content(Vec<u8>),
    Unreadable,
}

/// Emits one writer's artifact and remembers what was on disk before.
///
/// Undo restores the previous bytes, or removes the file when the write
/// created it. Directories created along the way are left in place. A file
/// that existed but could not be read is left as written.
#[derive(Debug)]
pub struct WriteArtifactCommand {
    writer: Box<dyn FileWriter>,
    project_root: PathBuf,
    previous: Previous,
    produced: Option<GeneratedFile>,
}

impl WriteArtifactCommand {
    /// Wrap `writer` for emission under `project_root`.
    #[must_use]
    pub fn new(writer: Box<dyn FileWriter>, project_root: impl Into<PathBuf>) -> Self {
        Self {
            writer,
            project_root: project_root.into(),
            previous: Previous::Absent,
            produced: None,
        }
    }

    /// Label of the wrapped writer.
    #[must_use]
    pub fn label(&self) -> String {
        self.writer.label()
    }

    /// Emit the artifact and return the written file.
    ///
    /// # Errors
    ///
    /// Returns the writer's path or I/O failure.
    pub fn write(&mut self) -> Result<GeneratedFile> {
        let target = self.writer.target_path(&self.project_root);
        let previous = read_existing(&target);
        let generated = self.writer.emit(&self.project_root)?;
        self.previous = previous;
        self.produced = Some(generated.clone());
        Ok(generated)
    }
}

impl Command for WriteArtifactCommand {
    fn describe(&self) -> String {
        format!("write {}", self.writer.label())
    }

    fn execute(&mut self) -> Result<()> {
        self.write().map(|_| ())
    }

    fn undo(&mut self) -> Result<()> {
        let Some(generated) = self.produced.take() else {
            return Ok(());
        };

        match std::mem::replace(&mut self.previous, Previous::Absent) {
            Previous::Content(bytes) => std::fs::write(&generated.path, bytes)
                .map_err(|e| CodegenError::io(e, &generated.path, "restore file")),
            Previous::Absent => match std::fs::remove_file(&generated.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(CodegenError::io(e, &generated.path, "remove file")),
            },
            Previous::Unreadable => {
                tracing::warn!(
                    path = %generated.path.display(),
                    "Previous content was unreadable; leaving file as written"
                );
                Ok(())
            }
        }
    }

    fn produced(&self) -> Option<&GeneratedFile> {
        self.produced.as_ref()
    }
}

fn read_existing(path: &Path) -> Previous {
    match std::fs::read(path) {
        Ok(bytes) => Previous::Content(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => Previous::Absent,
        // Directories and other non-files are rejected by the emit itself.
        Err(_) if !path.is_file() => Previous::Absent,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Cannot read previous content");
            Previous::Unreadable
        }
    }
}

/// Result of [`CommandInvoker::undo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    /// The described command was reverted
    Reverted(String),
    /// History was empty
    NothingToUndo,
}

/// Executes commands and keeps a LIFO history of the successful ones.
#[derive(Default)]
pub struct CommandInvoker {
    history: Vec<Box<dyn Command>>,
}

impl CommandInvoker {
    /// Empty invoker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute `command` and record it on success.
    ///
    /// # Errors
    ///
    /// Returns the command's failure; failed commands are not recorded.
    pub fn execute_command(&mut self, mut command: Box<dyn Command>) -> Result<()> {
        tracing::debug!(command = %command.describe(), "Executing command");
        command.execute()?;
        self.history.push(command);
        Ok(())
    }

    /// Record a command the caller already executed successfully.
    pub fn record(&mut self, command: Box<dyn Command>) {
        tracing::debug!(command = %command.describe(), "Recorded command");
        self.history.push(command);
    }

    /// Forget every recorded command without reverting it.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Revert the most recent command.
    ///
    /// # Errors
    ///
    /// Returns the revert failure. The command then stays in history.
    pub fn undo(&mut self) -> Result<UndoOutcome> {
        let Some(mut command) = self.history.pop() else {
            tracing::debug!("Nothing to undo");
            return Ok(UndoOutcome::NothingToUndo);
        };

        let description = command.describe();
        if let Err(error) = command.undo() {
            self.history.push(command);
            return Err(error);
        }

        emit_command_undone!(description);
        Ok(UndoOutcome::Reverted(description))
    }

    /// Revert every recorded command, newest first. Returns how many were reverted.
    ///
    /// # Errors
    ///
    /// Stops at the first revert failure.
    pub fn undo_all(&mut self) -> Result<usize> {
        let mut reverted = 0;
        while let UndoOutcome::Reverted(_) = self.undo()? {
            reverted += 1;
        }
        Ok(reverted)
    }

    /// Number of recorded commands.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// File produced by the most recent command, if it wrote one.
    #[must_use]
    pub fn last_produced(&self) -> Option<&GeneratedFile> {
        self.history.last().and_then(|command| command.produced())
    }
}

impl fmt::Debug for CommandInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let history: Vec<String> = self.history.iter().map(|c| c.describe()).collect();
        f.debug_struct("CommandInvoker")
            .field("history", &history)
            .finish()
    }
}
