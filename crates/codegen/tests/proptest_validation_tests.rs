//! Property-based tests for answer validation.
//!
//! - Well-formed answers always pass the standard chain
//! - Short names always fail on the project name rule, whatever else is wrong
//! - Unsupported database types fail on the database rule

use proptest::prelude::*;
use tsforge_codegen::{Answers, ChainValidator, CodegenError, EntityName, WriterKind};

// =============================================================================
// Strategies
// =============================================================================

fn project_name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_-]{2,20}".prop_map(String::from)
}

fn database_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("MySQL"),
        Just("mysql"),
        Just("PostgreSQL"),
        Just("MongoDB"),
        Just("mssql"),
    ]
}

fn entity_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[A-Z][a-z]{1,8}", 0..4).prop_map(|names| {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            if !unique.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
                unique.push(name);
            }
        }
        unique
    })
}

fn failed_rule(answers: &Answers) -> Option<&'static str> {
    match ChainValidator::standard().validate(answers) {
        Ok(()) => None,
        Err(CodegenError::Validation { rule, .. }) => Some(rule),
        Err(_) => Some("unexpected"),
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_well_formed_answers_pass(
        name in project_name_strategy(),
        db in database_strategy(),
        entities in entity_strategy(),
    ) {
        let mut answers = Answers::new(name, db);
        answers.entities = entities;
        prop_assert_eq!(failed_rule(&answers), None);
    }

    #[test]
    fn prop_short_name_fails_first(
        name in "[A-Za-z0-9]{0,2}",
        db in "[A-Za-z]{0,10}",
    ) {
        let answers = Answers::new(name, db);
        prop_assert_eq!(failed_rule(&answers), Some("project-name"));
    }

    #[test]
    fn prop_unknown_database_fails_database_rule(
        name in project_name_strategy(),
        db in "[A-Za-z]{1,12}",
    ) {
        let known = ["mysql", "postgresql", "mongodb", "mssql"];
        prop_assume!(!known.contains(&db.to_lowercase().as_str()));

        let answers = Answers::new(name, db);
        prop_assert_eq!(failed_rule(&answers), Some("database-type"));
    }

    #[test]
    fn prop_database_names_outside_closed_set_fail(
        name in project_name_strategy(),
        db in prop_oneof![
            Just("postgres"),
            Just("Postgres"),
            Just("mongo"),
            Just("sqlserver"),
            Just("mariadb"),
            Just("sqlite"),
        ],
    ) {
        let answers = Answers::new(name, db);
        prop_assert_eq!(failed_rule(&answers), Some("database-type"));
    }

    #[test]
    fn prop_entity_file_names_use_pascal_case(raw in "[a-z][a-z0-9_]{0,12}") {
        let entity = EntityName::new(&raw).unwrap();
        let file = WriterKind::Controller.file_name(Some(&entity));
        prop_assert!(file.ends_with("Controller.ts"));
        prop_assert!(file.chars().next().is_some_and(|c| c.is_ascii_uppercase()));
        prop_assert!(!file.contains('_'));
    }
}
