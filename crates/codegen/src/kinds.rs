//! The closed set of artifact kinds and their layout table.
//!
//! Every kind maps to one row: tag, target directory, file name pattern and
//! whether it is parameterized by an entity name. File name patterns use
//! `{Name}` (PascalCase) and `{name}` (camelCase) placeholders.

use crate::context::EntityName;
use crate::{CodegenError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Symbolic writer kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriterKind {
    /// REST controller for an entity
    Controller,
    /// Business service for an entity
    Service,
    /// Persistence model for an entity
    Model,
    /// Data access repository for an entity
    Repository,
    /// Express middleware
    Middleware,
    /// Request payload validation for an entity
    Validation,
    /// Express router for an entity
    Route,
    /// Application settings (`port`, environment)
    AppConfig,
    /// Database connection settings
    DbConfig,
    /// ORM data source settings
    OrmConfig,
    /// Server entry point
    Server,
    /// Example environment file
    EnvExample,
}

struct KindRow {
    tag: &'static str,
    directory: &'static str,
    file_name: &'static str,
    needs_entity: bool,
}

impl WriterKind {
    /// Every kind, in generation order.
    pub const ALL: [Self; 12] = [
        Self::AppConfig,
        Self::DbConfig,
        Self::OrmConfig,
        Self::Server,
        Self::EnvExample,
        Self::Model,
        Self::Repository,
        Self::Service,
        Self::Controller,
        Self::Route,
        Self::Validation,
        Self::Middleware,
    ];

    const fn row(self) -> KindRow {
        let (tag, directory, file_name, needs_entity) = match self {
            Self::Controller => ("controller", "src/controllers", "{Name}Controller.ts", true),
            Self::Service => ("service", "src/services", "{Name}Service.ts", true),
            Self::Model => ("model", "src/models", "{Name}.ts", true),
            Self::Repository => ("repository", "src/repositories", "{Name}Repository.ts", true),
            Self::Middleware => ("middleware", "src/middleware", "{name}Middleware.ts", true),
            Self::Validation => ("validation", "src/validation", "{name}Validation.ts", true),
            Self::Route => ("route", "src/routes", "{name}Routes.ts", true),
            Self::AppConfig => ("app-config", "src/config", "appConfig.ts", false),
            Self::DbConfig => ("db-config", "src/config", "databaseConfig.ts", false),
            Self::OrmConfig => ("orm-config", "src/config", "ormConfig.ts", false),
            Self::Server => ("server", "src", "index.ts", false),
            Self::EnvExample => ("env-example", "", ".env.example", false),
        };
        KindRow {
            tag,
            directory,
            file_name,
            needs_entity,
        }
    }

    /// Kind tag as accepted by [`FromStr`].
    #[must_use]
    pub const fn tag(self) -> &'static str {
        self.row().tag
    }

    /// Project-relative directory (empty for the project root).
    #[must_use]
    pub const fn directory(self) -> &'static str {
        self.row().directory
    }

    /// Whether the kind is parameterized by an entity name.
    #[must_use]
    pub const fn needs_entity(self) -> bool {
        self.row().needs_entity
    }

    /// File name for this kind, substituting the entity when present.
    #[must_use]
    pub fn file_name(self, entity: Option<&EntityName>) -> String {
        let pattern = self.row().file_name;
        match entity {
            Some(entity) => pattern
                .replace("{Name}", entity.pascal())
                .replace("{name}", entity.camel()),
            None => pattern.to_string(),
        }
    }

    /// Comma separated list of every tag.
    #[must_use]
    pub fn supported_list() -> String {
        Self::ALL.map(Self::tag).join(", ")
    }
}

impl fmt::Display for WriterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for WriterKind {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == normalized)
            .ok_or_else(|| CodegenError::UnsupportedKind {
                kind: s.to_string(),
                supported: Self::supported_list(),
            })
    }
}
