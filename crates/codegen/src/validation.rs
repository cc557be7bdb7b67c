//! Answer validation as a chain of single-rule links.
//!
//! Each [`ValidationLink`] owns one [`Rule`] and optionally a successor.
//! Validation stops at the first violated rule; later links never run.

use crate::context::{Answers, DatabaseKind, EntityName, OrmKind};
use crate::{CodegenError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

/// One validation rule.
pub trait Rule: Send + Sync {
    /// Stable rule name reported in [`CodegenError::Validation`].
    fn name(&self) -> &'static str;

    /// Check `answers`, returning the violated constraint on failure.
    ///
    /// # Errors
    ///
    /// Returns a message naming the constraint that was not met.
    fn check(&self, answers: &Answers) -> std::result::Result<(), String>;
}

/// A rule plus an optional successor.
pub struct ValidationLink {
    rule: Box<dyn Rule>,
    next: Option<Box<ValidationLink>>,
}

impl ValidationLink {
    /// Link wrapping `rule`.
    pub fn new(rule: impl Rule + 'static) -> Self {
        Self {
            rule: Box::new(rule),
            next: None,
        }
    }

    /// Attach `next` as successor, replacing any existing one, and return it
    /// so chains can be built link by link.
    pub fn set_next(&mut self, next: Self) -> &mut Self {
        self.next.insert(Box::new(next))
    }

    /// Run this rule, then delegate to the successor.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Validation`] for the first violated rule.
    pub fn validate(&self, answers: &Answers) -> Result<()> {
        self.rule
            .check(answers)
            .map_err(|message| CodegenError::validation(self.rule.name(), message))?;
        tracing::trace!(rule = self.rule.name(), "Validation rule passed");

        match &self.next {
            Some(next) => next.validate(answers),
            None => Ok(()),
        }
    }

    /// Rule names from this link to the tail.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&'static str> {
        let mut names = vec![self.rule.name()];
        let mut current = self.next.as_deref();
        while let Some(link) = current {
            names.push(link.rule.name());
            current = link.next.as_deref();
        }
        names
    }
}

impl fmt::Debug for ValidationLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationLink")
            .field("rules", &self.rule_names())
            .finish()
    }
}

/// Head of a validation chain.
#[derive(Debug)]
pub struct ChainValidator {
    head: ValidationLink,
}

impl ChainValidator {
    /// Chain starting at `head`.
    #[must_use]
    pub const fn new(head: ValidationLink) -> Self {
        Self { head }
    }

    /// Project name, then database type, then ORM, then entity names.
    #[must_use]
    pub fn standard() -> Self {
        let mut head = ValidationLink::new(ProjectNameRule);
        head.set_next(ValidationLink::new(DatabaseTypeRule))
            .set_next(ValidationLink::new(OrmRule))
            .set_next(ValidationLink::new(EntityNamesRule));
        Self::new(head)
    }

    /// Mutable access to the first link, for extending the chain.
    pub fn head_mut(&mut self) -> &mut ValidationLink {
        &mut self.head
    }

    /// Validate `answers` against every link in order.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Validation`] for the first violated rule.
    pub fn validate(&self, answers: &Answers) -> Result<()> {
        self.head.validate(answers)
    }
}

impl Default for ChainValidator {
    fn default() -> Self {
        Self::standard()
    }
}

static PROJECT_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").ok());

/// At least 3 characters, starts with a letter, then letters, digits, `-`, `_`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectNameRule;

impl Rule for ProjectNameRule {
    fn name(&self) -> &'static str {
        "project-name"
    }

    fn check(&self, answers: &Answers) -> std::result::Result<(), String> {
        let name = answers.project_name.trim();
        if name.chars().count() < 3 {
            return Err(format!(
                "project name must be at least 3 characters, got '{name}'"
            ));
        }
        let matches = PROJECT_NAME.as_ref().is_some_and(|re| re.is_match(name));
        if !matches {
            return Err(format!(
                "project name '{name}' must start with a letter and contain only letters, digits, '-' or '_'"
            ));
        }
        Ok(())
    }
}

/// Database type is one of the supported engines.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatabaseTypeRule;

impl Rule for DatabaseTypeRule {
    fn name(&self) -> &'static str {
        "database-type"
    }

    fn check(&self, answers: &Answers) -> std::result::Result<(), String> {
        if DatabaseKind::parse(&answers.db_type).is_some() {
            Ok(())
        } else {
            Err(format!(
                "database type must be one of {{{}}}, got '{}'",
                DatabaseKind::supported_list(),
                answers.db_type
            ))
        }
    }
}

/// ORM, when given, is supported and compatible with the database.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrmRule;

impl Rule for OrmRule {
    fn name(&self) -> &'static str {
        "orm"
    }

    fn check(&self, answers: &Answers) -> std::result::Result<(), String> {
        let Some(raw) = answers.orm.as_deref() else {
            return Ok(());
        };
        let orm = OrmKind::parse(raw).ok_or_else(|| {
            format!(
                "orm must be one of {{{}}}, got '{raw}'",
                OrmKind::supported_list()
            )
        })?;

        match DatabaseKind::parse(&answers.db_type) {
            Some(database) if !orm.supports(database) => Err(format!(
                "{} cannot be used with {}",
                orm.name(),
                database.name()
            )),
            _ => Ok(()),
        }
    }
}

/// Entity names are identifiers and unique (ignoring case style).
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityNamesRule;

impl Rule for EntityNamesRule {
    fn name(&self) -> &'static str {
        "entity-names"
    }

    fn check(&self, answers: &Answers) -> std::result::Result<(), String> {
        let mut seen = HashSet::new();
        for raw in &answers.entities {
            let entity = EntityName::new(raw).map_err(|e| match e {
                CodegenError::Validation { message, .. } => message,
                other => other.to_string(),
            })?;
            if !seen.insert(entity.pascal().to_string()) {
                return Err(format!("entity '{}' is listed more than once", entity));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting {
        name: &'static str,
        calls: Arc<AtomicUsize>,
        inner: Box<dyn Rule>,
    }

    impl Rule for Counting {
        fn name(&self) -> &'static str {
            self.name
        }

        fn check(&self, answers: &Answers) -> std::result::Result<(), String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.check(answers)
        }
    }

    fn rule_of(result: Result<()>) -> &'static str {
        match result {
            Err(CodegenError::Validation { rule, .. }) => rule,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_short_name_fails_before_database_rule_runs() {
        let database_calls = Arc::new(AtomicUsize::new(0));
        let mut head = ValidationLink::new(ProjectNameRule);
        head.set_next(ValidationLink::new(Counting {
            name: "database-type",
            calls: Arc::clone(&database_calls),
            inner: Box::new(DatabaseTypeRule),
        }));
        let validator = ChainValidator::new(head);

        let result = validator.validate(&Answers::new("ab", "MySQL"));

        assert_eq!(rule_of(result), "project-name");
        assert_eq!(database_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unknown_database_fails_database_rule() {
        let result = ChainValidator::standard().validate(&Answers::new("app", "Oracle"));
        assert_eq!(rule_of(result), "database-type");
    }

    #[test]
    fn test_database_short_forms_are_rejected() {
        for db in ["postgres", "mongo", "sqlserver"] {
            let result = ChainValidator::standard().validate(&Answers::new("app", db));
            assert_eq!(rule_of(result), "database-type", "{db}");
        }
    }

    #[test]
    fn test_valid_answers_pass() {
        assert!(ChainValidator::standard().validate(&Answers::new("app", "MySQL")).is_ok());
    }

    #[test]
    fn test_project_name_rules() {
        let rule = ProjectNameRule;
        assert!(rule.check(&Answers::new("my-app_2", "MySQL")).is_ok());
        assert!(rule.check(&Answers::new("2app", "MySQL")).is_err());
        assert!(rule.check(&Answers::new("my app", "MySQL")).is_err());
        assert!(rule.check(&Answers::new("app!", "MySQL")).is_err());
    }

    #[test]
    fn test_orm_compatibility() {
        let validator = ChainValidator::standard();
        let mongoose_on_mysql = Answers::new("app", "MySQL").with_orm("Mongoose");
        assert_eq!(rule_of(validator.validate(&mongoose_on_mysql)), "orm");

        let sequelize_on_mongo = Answers::new("app", "MongoDB").with_orm("Sequelize");
        assert_eq!(rule_of(validator.validate(&sequelize_on_mongo)), "orm");

        let unknown = Answers::new("app", "MySQL").with_orm("Hibernate");
        assert_eq!(rule_of(validator.validate(&unknown)), "orm");

        let mongoose_on_mongo = Answers::new("app", "mongodb").with_orm("mongoose");
        assert!(validator.validate(&mongoose_on_mongo).is_ok());
    }

    #[test]
    fn test_entity_names_rule() {
        let validator = ChainValidator::standard();
        let duplicate = Answers::new("app", "MySQL")
            .with_entity("User")
            .with_entity("user");
        assert_eq!(rule_of(validator.validate(&duplicate)), "entity-names");

        let invalid = Answers::new("app", "MySQL").with_entity("1User");
        assert_eq!(rule_of(validator.validate(&invalid)), "entity-names");
    }

    #[test]
    fn test_set_next_returns_successor() {
        let mut head = ValidationLink::new(ProjectNameRule);
        head.set_next(ValidationLink::new(DatabaseTypeRule))
            .set_next(ValidationLink::new(OrmRule));
        assert_eq!(head.rule_names(), vec!["project-name", "database-type", "orm"]);
    }

    #[test]
    fn test_standard_chain_order() {
        let mut validator = ChainValidator::standard();
        assert_eq!(
            validator.head_mut().rule_names(),
            vec!["project-name", "database-type", "orm", "entity-names"]
        );
    }
}
