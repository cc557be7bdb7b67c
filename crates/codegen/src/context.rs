//! Answers and the typed project context derived from them.
//!
//! [`Answers`] is the raw record gathered by the CLI (flags or an answers
//! file). Once the validation chain accepts it, [`ProjectContext::from_answers`]
//! turns it into the typed form every writer reads.

use crate::{CodegenError, Result};
use chrono::Datelike;
use heck::{ToKebabCase, ToLowerCamelCase, ToUpperCamelCase};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Port used when the answers do not name one.
pub const DEFAULT_PORT: u16 = 3000;

/// License used when the answers do not name one.
pub const DEFAULT_LICENSE: &str = "MIT";

/// Raw answers for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Answers {
    /// Project (and root directory) name
    pub project_name: String,
    /// Database engine, e.g. `MySQL`
    pub db_type: String,
    /// ORM, e.g. `TypeORM`; defaults per database when absent
    pub orm: Option<String>,
    /// Entity names to scaffold controllers/services/models for
    pub entities: Vec<String>,
    /// One-line project description
    pub description: Option<String>,
    /// Author recorded in package.json and LICENSE
    pub author: Option<String>,
    /// SPDX license identifier
    pub license: Option<String>,
    /// HTTP port for the generated server
    pub port: Option<u16>,
}

impl Answers {
    /// Create answers with a project name and database type.
    #[must_use]
    pub fn new(project_name: impl Into<String>, db_type: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            db_type: db_type.into(),
            ..Self::default()
        }
    }

    /// Add an entity.
    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entities.push(entity.into());
        self
    }

    /// Set the ORM.
    #[must_use]
    pub fn with_orm(mut self, orm: impl Into<String>) -> Self {
        self.orm = Some(orm.into());
        self
    }

    /// Set the HTTP port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Overlay every value present in `other` onto `self`.
    ///
    /// Used to let command-line flags override an answers file.
    #[must_use]
    pub fn merged_with(mut self, other: Self) -> Self {
        if !other.project_name.is_empty() {
            self.project_name = other.project_name;
        }
        if !other.db_type.is_empty() {
            self.db_type = other.db_type;
        }
        if !other.entities.is_empty() {
            self.entities = other.entities;
        }
        self.orm = other.orm.or(self.orm);
        self.description = other.description.or(self.description);
        self.author = other.author.or(self.author);
        self.license = other.license.or(self.license);
        self.port = other.port.or(self.port);
        self
    }
}

/// Supported database engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DatabaseKind {
    /// MySQL
    MySql,
    /// PostgreSQL
    PostgreSql,
    /// MongoDB
    MongoDb,
    /// Microsoft SQL Server
    MsSql,
}

impl DatabaseKind {
    /// Every supported engine, in display order.
    pub const ALL: [Self; 4] = [Self::MySql, Self::PostgreSql, Self::MongoDb, Self::MsSql];

    /// Parse a database name, ignoring case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mysql" => Some(Self::MySql),
            "postgresql" => Some(Self::PostgreSql),
            "mongodb" => Some(Self::MongoDb),
            "mssql" => Some(Self::MsSql),
            _ => None,
        }
    }

    /// Canonical display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MySql => "MySQL",
            Self::PostgreSql => "PostgreSQL",
            Self::MongoDb => "MongoDB",
            Self::MsSql => "MSSQL",
        }
    }

    /// Default server port.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::MySql => 3306,
            Self::PostgreSql => 5432,
            Self::MongoDb => 27017,
            Self::MsSql => 1433,
        }
    }

    /// Connection URL scheme.
    #[must_use]
    pub const fn scheme(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::PostgreSql => "postgres",
            Self::MongoDb => "mongodb",
            Self::MsSql => "mssql",
        }
    }

    /// npm driver package.
    #[must_use]
    pub const fn driver_package(self) -> (&'static str, &'static str) {
        match self {
            Self::MySql => ("mysql2", "^3.9.0"),
            Self::PostgreSql => ("pg", "^8.11.0"),
            Self::MongoDb => ("mongodb", "^6.5.0"),
            Self::MsSql => ("mssql", "^10.0.0"),
        }
    }

    /// The ORM picked when the answers leave it open.
    #[must_use]
    pub const fn default_orm(self) -> OrmKind {
        match self {
            Self::MongoDb => OrmKind::Mongoose,
            _ => OrmKind::TypeOrm,
        }
    }

    /// Connection string for a local development database named `database`.
    #[must_use]
    pub fn connection_url(self, database: &str) -> String {
        let credentials = match self {
            Self::MySql => "root:password@",
            Self::PostgreSql => "postgres:password@",
            Self::MsSql => "sa:Password123@",
            Self::MongoDb => "",
        };
        format!(
            "{}://{credentials}localhost:{}/{database}",
            self.scheme(),
            self.default_port()
        )
    }

    /// Comma separated list of every supported display name.
    #[must_use]
    pub fn supported_list() -> String {
        Self::ALL.map(Self::name).join(", ")
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Supported ORMs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OrmKind {
    /// TypeORM
    TypeOrm,
    /// Sequelize
    Sequelize,
    /// Mongoose
    Mongoose,
    /// Prisma
    Prisma,
}

impl OrmKind {
    /// Every supported ORM, in display order.
    pub const ALL: [Self; 4] = [Self::TypeOrm, Self::Sequelize, Self::Mongoose, Self::Prisma];

    /// Parse an ORM name, ignoring case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "typeorm" => Some(Self::TypeOrm),
            "sequelize" => Some(Self::Sequelize),
            "mongoose" => Some(Self::Mongoose),
            "prisma" => Some(Self::Prisma),
            _ => None,
        }
    }

    /// Canonical display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TypeOrm => "TypeORM",
            Self::Sequelize => "Sequelize",
            Self::Mongoose => "Mongoose",
            Self::Prisma => "Prisma",
        }
    }

    /// npm packages the generated project depends on.
    #[must_use]
    pub const fn packages(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::TypeOrm => &[("typeorm", "^0.3.20"), ("reflect-metadata", "^0.2.1")],
            Self::Sequelize => &[("sequelize", "^6.37.0")],
            Self::Mongoose => &[("mongoose", "^8.2.0")],
            Self::Prisma => &[("@prisma/client", "^5.11.0")],
        }
    }

    /// Whether this ORM can talk to `database`.
    #[must_use]
    pub const fn supports(self, database: DatabaseKind) -> bool {
        match self {
            Self::Mongoose => matches!(database, DatabaseKind::MongoDb),
            Self::Sequelize => !matches!(database, DatabaseKind::MongoDb),
            Self::TypeOrm | Self::Prisma => true,
        }
    }

    /// Comma separated list of every supported display name.
    #[must_use]
    pub fn supported_list() -> String {
        Self::ALL.map(Self::name).join(", ")
    }
}

impl fmt::Display for OrmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An entity name in the casings templates need.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EntityName {
    pascal: String,
    camel: String,
    kebab: String,
}

impl EntityName {
    /// Derive every casing from `raw` (`user_profile`, `UserProfile`, ...).
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Validation`] when `raw` is not an identifier.
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let valid = trimmed
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CodegenError::validation(
                "entity-names",
                format!(
                    "entity name '{raw}' must start with a letter and contain only letters, digits, '-' or '_'"
                ),
            ));
        }

        Ok(Self {
            pascal: trimmed.to_upper_camel_case(),
            camel: trimmed.to_lower_camel_case(),
            kebab: trimmed.to_kebab_case(),
        })
    }

    /// `UserProfile`
    #[must_use]
    pub fn pascal(&self) -> &str {
        &self.pascal
    }

    /// `userProfile`
    #[must_use]
    pub fn camel(&self) -> &str {
        &self.camel
    }

    /// `user-profile`
    #[must_use]
    pub fn kebab(&self) -> &str {
        &self.kebab
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pascal)
    }
}

/// Validated, typed view of [`Answers`] shared read-only by writers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectContext {
    /// Project name (also the root directory name)
    pub project_name: String,
    /// One-line description
    pub description: String,
    /// Database engine
    pub database: DatabaseKind,
    /// ORM
    pub orm: OrmKind,
    /// Entities to scaffold
    pub entities: Vec<EntityName>,
    /// HTTP port
    pub port: u16,
    /// Author
    pub author: String,
    /// SPDX license identifier
    pub license: String,
    /// Copyright year
    pub year: i32,
}

impl ProjectContext {
    /// Build a context from answers.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Validation`] if the database, ORM or an entity
    /// name cannot be interpreted. Run the validation chain first for the full
    /// set of checks.
    pub fn from_answers(answers: &Answers) -> Result<Self> {
        let database = DatabaseKind::parse(&answers.db_type).ok_or_else(|| {
            CodegenError::validation(
                "database-type",
                format!(
                    "database type must be one of {{{}}}, got '{}'",
                    DatabaseKind::supported_list(),
                    answers.db_type
                ),
            )
        })?;

        let orm = match answers.orm.as_deref() {
            Some(raw) => OrmKind::parse(raw).ok_or_else(|| {
                CodegenError::validation(
                    "orm",
                    format!(
                        "orm must be one of {{{}}}, got '{raw}'",
                        OrmKind::supported_list()
                    ),
                )
            })?,
            None => database.default_orm(),
        };

        let entities = answers
            .entities
            .iter()
            .map(|raw| EntityName::new(raw))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            project_name: answers.project_name.trim().to_string(),
            description: answers
                .description
                .clone()
                .unwrap_or_else(|| format!("{} API server", answers.project_name.trim())),
            database,
            orm,
            entities,
            port: answers.port.unwrap_or(DEFAULT_PORT),
            author: answers.author.clone().unwrap_or_default(),
            license: answers
                .license
                .clone()
                .unwrap_or_else(|| DEFAULT_LICENSE.to_string()),
            year: chrono::Utc::now().year(),
        })
    }

    /// Fix the copyright year (keeps output reproducible in tests).
    #[must_use]
    pub const fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Database name used in connection strings (`my-app` becomes `my_app`).
    #[must_use]
    pub fn database_name(&self) -> String {
        self.project_name.replace('-', "_")
    }
}
