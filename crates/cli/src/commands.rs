//! Subcommand implementations.

use crate::answers;
use crate::cli::{CliError, Commands, OkEnvelope, StackArgs};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tsforge_codegen::validation::ProjectNameRule;
use tsforge_codegen::{
    Answers, DatabaseKind, FileStatus, GenerateOptions, GeneratedFile, GenerationReport, OrmKind,
    ProjectGenerator, Rule, WriterKind,
};

/// Run one subcommand, printing its result to stdout.
///
/// # Errors
///
/// Returns the [`CliError`] to render and map to an exit code.
pub fn execute(command: Commands, json: bool) -> Result<(), CliError> {
    let _span = crate::command_span!(command.name()).entered();

    match command {
        Commands::New {
            name,
            stack,
            entities,
            description,
            author,
            license,
            port,
            answers: answers_file,
            output_dir,
            dry_run,
        } => {
            let flags = Answers {
                project_name: name.unwrap_or_default(),
                db_type: stack.db.unwrap_or_default(),
                orm: stack.orm,
                entities,
                description,
                author,
                license,
                port,
            };
            let answers = answers::resolve(answers_file.as_deref(), flags)?;
            let report = new_project(&answers, output_dir, dry_run)?;
            print_report(&report, json)
        }
        Commands::Add {
            kind,
            name,
            project_root,
            stack,
        } => {
            let file = add_artifact(&kind, name.as_deref(), &project_root, stack)?;
            print_files(std::slice::from_ref(&file), json)
        }
        Commands::Kinds => list_kinds(json),
    }
}

/// Generate a whole project.
///
/// # Errors
///
/// Returns a [`CliError`] mapped from the generation failure.
pub fn new_project(
    answers: &Answers,
    output_dir: PathBuf,
    dry_run: bool,
) -> Result<GenerationReport, CliError> {
    if answers.project_name.trim().is_empty() {
        return Err(CliError::config_with_help(
            "No project name given",
            "Pass NAME to 'tsforge new' or set projectName in the answers file",
        ));
    }

    let mut generator = ProjectGenerator::new(GenerateOptions {
        output_dir,
        dry_run,
    });
    Ok(generator.generate(answers)?)
}

/// Emit one artifact into the project at `project_root`.
///
/// Flags win; otherwise the database and ORM are detected from the
/// dependencies in the project's `package.json`.
///
/// # Errors
///
/// Returns a [`CliError`] mapped from the generation failure.
pub fn add_artifact(
    kind: &str,
    name: Option<&str>,
    project_root: &Path,
    stack: StackArgs,
) -> Result<GeneratedFile, CliError> {
    let package = read_package(project_root);
    let (detected_db, detected_orm) = package
        .as_ref()
        .map_or((None, None), detect_stack);

    let flags = Answers {
        project_name: project_name_at(project_root, package.as_ref()),
        db_type: stack
            .db
            .or_else(|| detected_db.map(|db| db.name().to_string()))
            .unwrap_or_default(),
        orm: stack.orm.or_else(|| detected_orm.map(|orm| orm.name().to_string())),
        ..Answers::default()
    };
    let answers = answers::resolve(None, flags)?;
    tracing::debug!(
        project = %answers.project_name,
        db = %answers.db_type,
        orm = ?answers.orm,
        "Resolved existing project stack"
    );

    let mut generator = ProjectGenerator::new(GenerateOptions::default());
    Ok(generator.generate_single(kind, name, &answers, project_root)?)
}

fn read_package(project_root: &Path) -> Option<serde_json::Value> {
    let text = std::fs::read_to_string(project_root.join("package.json")).ok()?;
    serde_json::from_str(&text).ok()
}

/// Database and ORM whose npm packages appear in `dependencies`.
fn detect_stack(package: &serde_json::Value) -> (Option<DatabaseKind>, Option<OrmKind>) {
    let Some(dependencies) = package.get("dependencies").and_then(|d| d.as_object()) else {
        return (None, None);
    };

    let database = DatabaseKind::ALL
        .into_iter()
        .find(|db| dependencies.contains_key(db.driver_package().0));
    let orm = OrmKind::ALL.into_iter().find(|orm| {
        orm.packages()
            .iter()
            .all(|(name, _)| dependencies.contains_key(*name))
    });
    (database, orm)
}

/// Name recorded in `package.json`, falling back to the directory name.
///
/// Candidates that break the project name rule are skipped.
fn project_name_at(project_root: &Path, package: Option<&serde_json::Value>) -> String {
    let from_package = package
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .map(str::to_string);
    let from_directory = project_root
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()));

    [from_package, from_directory]
        .into_iter()
        .flatten()
        .find(|candidate| {
            ProjectNameRule
                .check(&Answers::new(candidate.as_str(), ""))
                .is_ok()
        })
        .unwrap_or_else(|| "app".to_string())
}

#[derive(Debug, Serialize)]
struct KindRow {
    kind: &'static str,
    directory: &'static str,
    file: String,
    needs_entity: bool,
}

fn list_kinds(json: bool) -> Result<(), CliError> {
    let rows: Vec<KindRow> = WriterKind::ALL
        .into_iter()
        .map(|kind| KindRow {
            kind: kind.tag(),
            directory: kind.directory(),
            file: kind.file_name(None),
            needs_entity: kind.needs_entity(),
        })
        .collect();

    if json {
        return print_json(&OkEnvelope::new(rows));
    }

    for row in rows {
        let directory = if row.directory.is_empty() { "." } else { row.directory };
        let marker = if row.needs_entity { " <NAME>" } else { "" };
        println!("{:<12} {}/{}{marker}", row.kind, directory, row.file);
    }
    Ok(())
}

fn print_report(report: &GenerationReport, json: bool) -> Result<(), CliError> {
    if json {
        return print_json(&OkEnvelope::new(report));
    }

    print_files(&report.files, false)?;
    let verb = if report.dry_run { "would change" } else { "changed" };
    println!(
        "{}: {} files, {} {verb} ({} ms)",
        report.project_root.display(),
        report.files.len(),
        report.changed(),
        report.duration_ms
    );
    Ok(())
}

fn print_files(files: &[GeneratedFile], json: bool) -> Result<(), CliError> {
    if json {
        return print_json(&OkEnvelope::new(files));
    }

    for file in files {
        let symbol = match file.status {
            FileStatus::Created | FileStatus::WouldCreate => '+',
            FileStatus::Updated | FileStatus::WouldUpdate => '~',
            FileStatus::Unchanged => '=',
        };
        println!("{symbol} {} ({})", file.path.display(), file.status);
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string(value)
        .map_err(|e| CliError::config(format!("Failed to serialize output: {e}")))?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_project_requires_name() {
        let temp = TempDir::new().unwrap();
        let result = new_project(&Answers::new("", "MySQL"), temp.path().to_path_buf(), false);
        assert!(matches!(result, Err(CliError::Config { .. })));
    }

    #[test]
    fn test_add_artifact_uses_package_name() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("package.json"), r#"{"name": "shop"}"#).unwrap();
        let package = read_package(temp.path());
        assert_eq!(project_name_at(temp.path(), package.as_ref()), "shop");

        let file = add_artifact("app-config", None, temp.path(), StackArgs::default()).unwrap();
        let content = std::fs::read_to_string(file.path).unwrap();
        assert!(content.contains("name: \"shop\""));
    }

    #[test]
    fn test_add_artifact_skips_package_name_breaking_name_rule() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("fallback-app");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(
            root.join("package.json"),
            r#"{"name": "evil\", x: \"{{port}}"}"#,
        )
        .unwrap();

        let file = add_artifact("app-config", None, &root, StackArgs::default()).unwrap();
        let content = std::fs::read_to_string(file.path).unwrap();
        assert!(content.contains("name: \"fallback-app\""), "{content}");
        assert!(!content.contains("evil"));
    }

    #[test]
    fn test_add_model_into_mongodb_project_keeps_mongoose() {
        let temp = TempDir::new().unwrap();
        let answers = Answers::new("shop", "MongoDB").with_entity("Order");
        let report = new_project(&answers, temp.path().to_path_buf(), false).unwrap();
        let root = report.project_root;

        let model = add_artifact("model", Some("Invoice"), &root, StackArgs::default()).unwrap();
        let text = std::fs::read_to_string(&model.path).unwrap();
        assert!(text.contains("mongoose"), "{text}");
        assert!(!text.contains("typeorm"), "{text}");

        let orm = add_artifact("orm-config", None, &root, StackArgs::default()).unwrap();
        let text = std::fs::read_to_string(&orm.path).unwrap();
        assert!(text.contains("mongoose"), "{text}");
        assert!(!text.contains("typeorm"), "{text}");
    }

    #[test]
    fn test_stack_flags_override_detected_stack() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("package.json"),
            r#"{"name": "shop", "dependencies": {"mongodb": "^6.5.0", "mongoose": "^8.2.0"}}"#,
        )
        .unwrap();

        let stack = StackArgs {
            db: Some("PostgreSQL".to_string()),
            orm: Some("Prisma".to_string()),
        };
        let file = add_artifact("db-config", None, temp.path(), stack).unwrap();
        let content = std::fs::read_to_string(file.path).unwrap();
        assert!(content.contains("postgres://"), "{content}");
    }

    #[test]
    fn test_detect_stack_from_dependencies() {
        let package = serde_json::json!({
            "dependencies": {"pg": "^8.11.0", "typeorm": "^0.3.20", "reflect-metadata": "^0.2.1"}
        });
        assert_eq!(
            detect_stack(&package),
            (Some(DatabaseKind::PostgreSql), Some(OrmKind::TypeOrm))
        );
        assert_eq!(detect_stack(&serde_json::json!({"name": "x"})), (None, None));
    }

    #[test]
    fn test_add_unknown_kind_is_config_error() {
        let temp = TempDir::new().unwrap();
        let result = add_artifact("bogus", Some("x"), temp.path(), StackArgs::default());
        assert!(matches!(result, Err(CliError::Config { .. })));
    }
}
