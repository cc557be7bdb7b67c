//! The `FileWriter` capability.
//!
//! A writer answers three pure queries (directory, file name, content) and
//! inherits one fixed assembly step, [`FileWriter::emit`], that joins them
//! under a project root and hands the result to [`FileEmitter`].

use crate::fs::{FileEmitter, FileStatus};
use crate::{CodegenError, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Directory, name and content of one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactDescriptor {
    relative_directory: PathBuf,
    file_name: String,
    content: String,
}

impl ArtifactDescriptor {
    /// Create a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::InvalidPath`] if the directory is absolute or
    /// climbs out of the project root, or if the file name is not a single
    /// path segment.
    pub fn new(
        relative_directory: impl Into<PathBuf>,
        file_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self> {
        let relative_directory = relative_directory.into();
        let file_name = file_name.into();

        for component in relative_directory.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(CodegenError::InvalidPath {
                        path: relative_directory,
                        reason: "directory must not leave the project root",
                    });
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(CodegenError::InvalidPath {
                        path: relative_directory,
                        reason: "directory must be relative to the project root",
                    });
                }
            }
        }

        if file_name.is_empty()
            || file_name == "."
            || file_name == ".."
            || file_name.contains(['/', '\\'])
        {
            return Err(CodegenError::InvalidPath {
                path: relative_directory.join(&file_name),
                reason: "file name must be a single path segment",
            });
        }

        Ok(Self {
            relative_directory,
            file_name,
            content: content.into(),
        })
    }

    /// Project-relative directory.
    #[must_use]
    pub fn relative_directory(&self) -> &Path {
        &self.relative_directory
    }

    /// File name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// File content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Project-relative file path.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        self.relative_directory.join(&self.file_name)
    }

    /// Absolute target under `project_root`.
    #[must_use]
    pub fn resolve(&self, project_root: &Path) -> PathBuf {
        project_root.join(self.relative_path())
    }
}

/// One file produced (or previewed) by a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    /// Artifact label, e.g. `controller:User`
    pub artifact: String,
    /// Absolute path written
    pub path: PathBuf,
    /// What happened on disk
    pub status: FileStatus,
    /// Size of the content in bytes
    pub bytes: usize,
}

/// A producer of one artifact.
pub trait FileWriter: fmt::Debug + Send + Sync {
    /// Short label naming the artifact in reports and errors.
    fn label(&self) -> String;

    /// Directory relative to the project root.
    fn directory(&self) -> PathBuf;

    /// File name inside [`directory`](Self::directory).
    fn file_name(&self) -> String;

    /// Generated file content.
    fn content(&self) -> String;

    /// Absolute target path under `project_root`.
    fn target_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(self.directory()).join(self.file_name())
    }

    /// Snapshot the three queries into a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::InvalidPath`] for directories that are not
    /// project-relative.
    fn descriptor(&self) -> Result<ArtifactDescriptor> {
        ArtifactDescriptor::new(self.directory(), self.file_name(), self.content())
    }

    /// Write the artifact under `project_root`.
    ///
    /// `content` is evaluated exactly once per call.
    ///
    /// # Errors
    ///
    /// Propagates path and I/O failures from [`FileEmitter::emit`].
    fn emit(&self, project_root: &Path) -> Result<GeneratedFile> {
        let descriptor = self.descriptor()?;
        let path = descriptor.resolve(project_root);
        let status = FileEmitter::emit(&path, descriptor.content())?;
        Ok(GeneratedFile {
            artifact: self.label(),
            path,
            status,
            bytes: descriptor.content().len(),
        })
    }

    /// Report what [`emit`](Self::emit) would do, without writing.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::InvalidPath`] for directories that are not
    /// project-relative.
    fn preview(&self, project_root: &Path) -> Result<GeneratedFile> {
        let descriptor = self.descriptor()?;
        let path = descriptor.resolve(project_root);
        let status = FileEmitter::preview(&path, descriptor.content());
        Ok(GeneratedFile {
            artifact: self.label(),
            path,
            status,
            bytes: descriptor.content().len(),
        })
    }
}
