//! Filesystem leaves used by every writer.
//!
//! [`DirectoryEnsurer`] creates directory chains idempotently and
//! [`FileEmitter`] persists one file with overwrite semantics.

use crate::{CodegenError, Result};
use serde::Serialize;
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Outcome of emitting (or previewing) one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
    /// File was newly created.
    Created,
    /// File existed and was overwritten with different content.
    Updated,
    /// File existed with identical content.
    Unchanged,
    /// Would be created (dry-run mode).
    WouldCreate,
    /// Would be updated (dry-run mode).
    WouldUpdate,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Updated => write!(f, "Updated"),
            Self::Unchanged => write!(f, "Unchanged"),
            Self::WouldCreate => write!(f, "Would create"),
            Self::WouldUpdate => write!(f, "Would update"),
        }
    }
}

/// Ensures directory chains exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryEnsurer;

impl DirectoryEnsurer {
    /// Create every missing segment of `path`.
    ///
    /// Succeeds whether the directory was just created or already existed.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Io`] if the filesystem refuses the creation.
    pub fn ensure(path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .map_err(|e| CodegenError::io(e, path, "create directory"))?;
        tracing::trace!(path = %path.display(), "Directory ensured");
        Ok(())
    }
}

/// Persists generated content.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileEmitter;

impl FileEmitter {
    /// Ensure the parent of `path` exists, then replace the file with `content`.
    ///
    /// The file is always rewritten; the returned status only reports what was
    /// on disk beforehand.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Permission`] when the file cannot be opened for
    /// writing because of permissions, and [`CodegenError::Io`] for any other
    /// directory or write failure.
    pub fn emit(path: &Path, content: &str) -> Result<FileStatus> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            DirectoryEnsurer::ensure(parent)?;
        }

        let status = match std::fs::read(path) {
            Ok(existing) if existing == content.as_bytes() => FileStatus::Unchanged,
            Err(e) if e.kind() == ErrorKind::NotFound => FileStatus::Created,
            _ => FileStatus::Updated,
        };

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| {
                if e.kind() == ErrorKind::PermissionDenied {
                    CodegenError::Permission {
                        path: path.to_path_buf(),
                    }
                } else {
                    CodegenError::io(e, path, "open file")
                }
            })?;

        file.write_all(content.as_bytes())
            .map_err(|e| CodegenError::io(e, path, "write file"))?;

        tracing::debug!(path = %path.display(), status = %status, "Emitted file");
        Ok(status)
    }

    /// Report what [`emit`](Self::emit) would do without touching the disk.
    #[must_use]
    pub fn preview(path: &Path, content: &str) -> FileStatus {
        match std::fs::read(path) {
            Ok(existing) if existing == content.as_bytes() => FileStatus::Unchanged,
            Err(e) if e.kind() == ErrorKind::NotFound => FileStatus::WouldCreate,
            _ => FileStatus::WouldUpdate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_creates_nested_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a/b/c");

        DirectoryEnsurer::ensure(&path).unwrap();
        assert!(path.is_dir());
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("src/config");

        DirectoryEnsurer::ensure(&path).unwrap();
        DirectoryEnsurer::ensure(&path).unwrap();
        assert!(path.is_dir());
    }

    #[test]
    fn test_ensure_fails_when_segment_is_a_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = DirectoryEnsurer::ensure(&blocker.join("child"));
        assert!(matches!(result, Err(CodegenError::Io { .. })));
    }

    #[test]
    fn test_emit_creates_parent_and_reports_created() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("deep/nested/file.ts");

        let status = FileEmitter::emit(&path, "export {};\n").unwrap();

        assert_eq!(status, FileStatus::Created);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "export {};\n");
    }

    #[test]
    fn test_emit_overwrites_existing_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("file.ts");
        std::fs::write(&path, "a much longer original body that must disappear").unwrap();

        let status = FileEmitter::emit(&path, "short").unwrap();

        assert_eq!(status, FileStatus::Updated);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn test_emit_same_content_reports_unchanged() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("file.ts");

        FileEmitter::emit(&path, "same").unwrap();
        let status = FileEmitter::emit(&path, "same").unwrap();

        assert_eq!(status, FileStatus::Unchanged);
    }

    #[test]
    fn test_emit_into_directory_path_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dir");
        std::fs::create_dir(&path).unwrap();

        assert!(FileEmitter::emit(&path, "content").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_emit_readonly_file_is_permission_failure() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("locked.ts");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o444)).unwrap();

        // Root ignores mode bits; only assert when the write is actually refused.
        if let Err(error) = FileEmitter::emit(&path, "new") {
            assert!(matches!(error, CodegenError::Permission { .. }));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_emit_over_unreadable_file_reports_updated() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("write-only.ts");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o200)).unwrap();

        // Root reads regardless of mode bits.
        if std::fs::read(&path).is_ok() {
            return;
        }

        assert_eq!(FileEmitter::preview(&path, "new"), FileStatus::WouldUpdate);
        assert_eq!(FileEmitter::emit(&path, "new").unwrap(), FileStatus::Updated);
    }

    #[test]
    fn test_preview_does_not_write() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("src/file.ts");

        assert_eq!(FileEmitter::preview(&path, "x"), FileStatus::WouldCreate);
        assert!(!path.exists());
        assert!(!temp.path().join("src").exists());

        FileEmitter::emit(&path, "x").unwrap();
        assert_eq!(FileEmitter::preview(&path, "x"), FileStatus::Unchanged);
        assert_eq!(FileEmitter::preview(&path, "y"), FileStatus::WouldUpdate);
    }

    #[test]
    fn test_file_status_display() {
        assert_eq!(FileStatus::Created.to_string(), "Created");
        assert_eq!(FileStatus::WouldUpdate.to_string(), "Would update");
    }
}
