//! Tracing setup for the tsforge CLI
//!
//! Diagnostics go to stderr so stdout stays free for command output and JSON
//! envelopes.

use std::io;
pub use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Tracing output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TracingFormat {
    /// Pretty-printed human-readable format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
    /// Structured JSON format
    Json,
}

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Show all logs (trace level)
    Trace,
    /// Show debug and above
    Debug,
    /// Show info and above
    Info,
    /// Show warnings and above (default)
    Warn,
    /// Show errors only
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

impl std::str::FromStr for TracingFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown tracing format: {s}")),
        }
    }
}

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Output format
    pub format: TracingFormat,
    /// Level applied to the tsforge crates
    pub level: Level,
    /// Explicit filter directive, overriding `level` and `RUST_LOG`
    pub filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            format: TracingFormat::Pretty,
            level: Level::WARN,
            filter: None,
        }
    }
}

static CORRELATION_ID: std::sync::OnceLock<Uuid> = std::sync::OnceLock::new();

/// Get or create the correlation ID for this process
pub fn correlation_id() -> Uuid {
    *CORRELATION_ID.get_or_init(Uuid::new_v4)
}

fn default_directives(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    format!("tsforge={level},tsforge_codegen={level},tsforge_events={level}")
}

/// Initialize tracing with the given configuration
///
/// # Errors
///
/// Fails if the filter directive is invalid or a global subscriber is already
/// installed.
pub fn init_tracing(config: TracingConfig) -> miette::Result<()> {
    let correlation_id = correlation_id();

    let env_filter = if let Some(filter) = config.filter {
        EnvFilter::try_new(filter)
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_directives(config.level)))
    }
    .map_err(|e| miette::miette!("Failed to create tracing filter: {e}"))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match config.format {
        TracingFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(io::stderr)
                    .with_target(true),
            )
            .try_init(),
        TracingFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(io::stderr)
                    .with_target(false),
            )
            .try_init(),
        TracingFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init(),
    };
    installed.map_err(|e| miette::miette!("Failed to install tracing subscriber: {e}"))?;

    tracing::info!(
        correlation_id = %correlation_id,
        version = env!("CARGO_PKG_VERSION"),
        format = ?config.format,
        "Tracing initialized for tsforge CLI"
    );

    Ok(())
}

/// Create a span for one CLI command
#[macro_export]
macro_rules! command_span {
    ($command:expr) => {
        ::tracing::info_span!(
            "command",
            command = %$command,
            correlation_id = %$crate::tracing::correlation_id(),
            start_time = %::chrono::Utc::now().to_rfc3339(),
        )
    };
}
