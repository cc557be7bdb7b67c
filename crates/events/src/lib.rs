//! Structured event plumbing for tsforge.
//!
//! Two things live here:
//!
//! - [`Notifier`], a synchronous publish/subscribe channel that lets one
//!   artifact writer hand freshly generated content to another writer without
//!   either holding a reference to the other.
//! - `emit_*!` macros that record generation progress as structured tracing
//!   events under the `tsforge::codegen` target.
//!
//! # Usage
//!
//! ```rust
//! use tsforge_events::Notifier;
//! use std::sync::{Arc, Mutex};
//!
//! let notifier: Notifier = Notifier::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&seen);
//! notifier.subscribe(move |payload: &String| {
//!     if let Ok(mut guard) = sink.lock() {
//!         guard.push(payload.clone());
//!     }
//! });
//!
//! notifier.notify(&"mysql://localhost:3306/demo".to_string());
//! assert_eq!(seen.lock().map(|g| g.len()).unwrap_or(0), 1);
//! ```

pub mod notifier;

pub use notifier::Notifier;

/// Tracing target shared by every generation event.
pub const CODEGEN_TARGET: &str = "tsforge::codegen";

// ============================================================================
// Emit Macros
// ============================================================================

/// Emit a generation started event.
///
/// # Example
/// ```rust,ignore
/// emit_generation_started!("demo", "/tmp/demo");
/// ```
#[macro_export]
macro_rules! emit_generation_started {
    ($project:expr, $root:expr) => {
        ::tracing::info!(
            target: "tsforge::codegen",
            event_type = "generation.started",
            project = %$project,
            root = %$root,
        )
    };
}

/// Emit an artifact written event.
///
/// # Example
/// ```rust,ignore
/// emit_artifact_written!("controller:User", "/tmp/demo/src/controllers/UserController.ts", "Created");
/// ```
#[macro_export]
macro_rules! emit_artifact_written {
    ($artifact:expr, $path:expr, $status:expr) => {
        ::tracing::info!(
            target: "tsforge::codegen",
            event_type = "artifact.written",
            artifact = %$artifact,
            path = %$path,
            status = %$status,
        )
    };
}

/// Emit an artifact failure event.
#[macro_export]
macro_rules! emit_artifact_failed {
    ($artifact:expr, $error:expr) => {
        ::tracing::error!(
            target: "tsforge::codegen",
            event_type = "artifact.failed",
            artifact = %$artifact,
            error = %$error,
        )
    };
}

/// Emit a generation completed event.
///
/// # Example
/// ```rust,ignore
/// emit_generation_completed!("demo", 24_usize, 12_u64);
/// ```
#[macro_export]
macro_rules! emit_generation_completed {
    ($project:expr, $files:expr, $duration_ms:expr) => {
        ::tracing::info!(
            target: "tsforge::codegen",
            event_type = "generation.completed",
            project = %$project,
            files = $files,
            duration_ms = $duration_ms,
        )
    };
}

/// Emit a command undone event.
#[macro_export]
macro_rules! emit_command_undone {
    ($description:expr) => {
        ::tracing::info!(
            target: "tsforge::codegen",
            event_type = "command.undone",
            command = %$description,
        )
    };
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::layer::SubscriberExt;

    fn with_test_subscriber(f: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(tracing_subscriber::fmt::layer());
        tracing::subscriber::with_default(subscriber, f);
    }

    #[test]
    fn test_generation_macros_compile() {
        with_test_subscriber(|| {
            emit_generation_started!("demo", "/tmp/demo");
            emit_artifact_written!("controller:User", "/tmp/demo/x.ts", "Created");
            emit_artifact_failed!("model:User", "permission denied");
            emit_generation_completed!("demo", 3_usize, 10_u64);
            emit_command_undone!("write src/index.ts");
        });
    }

    #[test]
    fn test_codegen_target_constant() {
        assert_eq!(super::CODEGEN_TARGET, "tsforge::codegen");
    }
}
