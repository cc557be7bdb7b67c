//! Answers files and flag overrides.

use crate::cli::CliError;
use std::path::Path;
use tsforge_codegen::Answers;

/// Database used when neither the file nor the flags name one.
pub const DEFAULT_DATABASE: &str = "MySQL";

/// Read an answers file, picking the parser from the extension.
///
/// # Errors
///
/// Returns [`CliError::Config`] if the file cannot be read, has an
/// unsupported extension, or does not parse.
pub fn load(path: &Path) -> Result<Answers, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::config_with_help(
            format!("Cannot read answers file {}: {e}", path.display()),
            "Pass an existing .toml or .json file to --answers",
        )
    })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let answers = match extension.as_deref() {
        Some("toml") => toml::from_str::<Answers>(&text).map_err(|e| {
            CliError::config(format!("Invalid TOML in {}: {e}", path.display()))
        })?,
        Some("json") => serde_json::from_str::<Answers>(&text).map_err(|e| {
            CliError::config(format!("Invalid JSON in {}: {e}", path.display()))
        })?,
        _ => {
            return Err(CliError::config_with_help(
                format!("Unsupported answers file {}", path.display()),
                "Answers files must end in .toml or .json",
            ));
        }
    };

    tracing::debug!(path = %path.display(), project = %answers.project_name, "Loaded answers file");
    Ok(answers)
}

/// Overlay `flags` on the answers file (if any) and fill remaining defaults.
///
/// # Errors
///
/// Propagates [`load`] failures.
pub fn resolve(file: Option<&Path>, flags: Answers) -> Result<Answers, CliError> {
    let base = match file {
        Some(path) => load(path)?,
        None => Answers::default(),
    };

    let mut answers = base.merged_with(flags);
    if answers.db_type.trim().is_empty() {
        answers.db_type = DEFAULT_DATABASE.to_string();
    }
    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("answers.toml");
        std::fs::write(
            &path,
            "projectName = \"shop\"\ndbType = \"PostgreSQL\"\nentities = [\"Order\"]\nport = 8080\n",
        )
        .unwrap();

        let answers = load(&path).unwrap();
        assert_eq!(answers.project_name, "shop");
        assert_eq!(answers.db_type, "PostgreSQL");
        assert_eq!(answers.entities, vec!["Order"]);
        assert_eq!(answers.port, Some(8080));
    }

    #[test]
    fn test_load_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("answers.json");
        std::fs::write(&path, r#"{"projectName": "shop", "orm": "Prisma"}"#).unwrap();

        let answers = load(&path).unwrap();
        assert_eq!(answers.orm.as_deref(), Some("Prisma"));
    }

    #[test]
    fn test_unknown_extension_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("answers.yaml");
        std::fs::write(&path, "projectName: shop").unwrap();
        assert!(matches!(load(&path), Err(CliError::Config { .. })));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = load(Path::new("/nonexistent/answers.toml"));
        assert!(matches!(result, Err(CliError::Config { .. })));
    }

    #[test]
    fn test_flags_override_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("answers.toml");
        std::fs::write(&path, "projectName = \"shop\"\ndbType = \"MongoDB\"\nport = 8080\n").unwrap();

        let flags = Answers::new("", "PostgreSQL").with_port(9000);
        let answers = resolve(Some(&path), flags).unwrap();
        assert_eq!(answers.project_name, "shop");
        assert_eq!(answers.db_type, "PostgreSQL");
        assert_eq!(answers.port, Some(9000));
    }

    #[test]
    fn test_default_database() {
        let answers = resolve(None, Answers::new("demo", "")).unwrap();
        assert_eq!(answers.db_type, DEFAULT_DATABASE);
    }
}
