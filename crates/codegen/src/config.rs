//! Root configuration files built section by section.

use crate::context::ProjectContext;
use crate::formatter::{Format, Formatter};
use crate::writer::FileWriter;
use crate::Result;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// One root configuration file.
///
/// Ordering follows declaration order, which is also the order files are
/// written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigSection {
    /// `package.json`
    PackageDescriptor,
    /// `tsconfig.json`
    CompilerOptions,
    /// `.eslintrc.json`
    LintConfig,
    /// `.prettierrc`
    FormatterConfig,
    /// `.editorconfig`
    EditorSettings,
    /// `.gitignore`
    IgnoreFile,
    /// `ecosystem.config.js`
    ProcessManager,
    /// `README.md`
    Readme,
    /// `LICENSE`
    License,
}

impl ConfigSection {
    /// Every section in write order.
    pub const ALL: [Self; 9] = [
        Self::PackageDescriptor,
        Self::CompilerOptions,
        Self::LintConfig,
        Self::FormatterConfig,
        Self::EditorSettings,
        Self::IgnoreFile,
        Self::ProcessManager,
        Self::Readme,
        Self::License,
    ];

    /// Key used in [`ProjectConfig::to_json`].
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::PackageDescriptor => "packageDescriptor",
            Self::CompilerOptions => "compilerOptions",
            Self::LintConfig => "lintConfig",
            Self::FormatterConfig => "formatterConfig",
            Self::EditorSettings => "editorSettings",
            Self::IgnoreFile => "ignoreFile",
            Self::ProcessManager => "processManager",
            Self::Readme => "readme",
            Self::License => "license",
        }
    }

    /// File written at the project root.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::PackageDescriptor => "package.json",
            Self::CompilerOptions => "tsconfig.json",
            Self::LintConfig => ".eslintrc.json",
            Self::FormatterConfig => ".prettierrc",
            Self::EditorSettings => ".editorconfig",
            Self::IgnoreFile => ".gitignore",
            Self::ProcessManager => "ecosystem.config.js",
            Self::Readme => "README.md",
            Self::License => "LICENSE",
        }
    }

    /// How the section value is rendered.
    #[must_use]
    pub const fn format(self) -> Format {
        match self {
            Self::PackageDescriptor
            | Self::CompilerOptions
            | Self::LintConfig
            | Self::FormatterConfig => Format::Json,
            Self::EditorSettings => Format::EditorConfig,
            Self::IgnoreFile => Format::IgnoreLines,
            Self::ProcessManager => Format::ModuleExports,
            Self::Readme | Self::License => Format::Text,
        }
    }
}

impl fmt::Display for ConfigSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Snapshot of the sections accumulated by a [`ProjectConfigBuilder`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectConfig {
    sections: BTreeMap<ConfigSection, Value>,
}

impl ProjectConfig {
    /// Value of `section`, if set.
    #[must_use]
    pub fn get(&self, section: ConfigSection) -> Option<&Value> {
        self.sections.get(&section)
    }

    /// Sections present, in write order.
    pub fn sections(&self) -> impl Iterator<Item = (ConfigSection, &Value)> {
        self.sections.iter().map(|(section, value)| (*section, value))
    }

    /// Number of sections present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True when no section was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// All sections as one JSON object keyed by [`ConfigSection::key`].
    #[must_use]
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .sections
            .iter()
            .map(|(section, value)| (section.key().to_string(), value.clone()))
            .collect();
        Value::Object(map)
    }

    /// One writer per section, each rendering its root file.
    ///
    /// # Errors
    ///
    /// Returns an error if a section value cannot be rendered in its format.
    pub fn writers(&self) -> Result<Vec<Box<dyn FileWriter>>> {
        let formatter = Formatter::new();
        self.sections
            .iter()
            .map(|(section, value)| -> Result<Box<dyn FileWriter>> {
                let content = formatter.format(value, section.format())?;
                Ok(Box::new(SectionWriter {
                    section: *section,
                    content,
                }))
            })
            .collect()
    }
}

/// Writes one pre-rendered section at the project root.
#[derive(Debug)]
struct SectionWriter {
    section: ConfigSection,
    content: String,
}

impl FileWriter for SectionWriter {
    fn label(&self) -> String {
        format!("config:{}", self.section.file_name())
    }

    fn directory(&self) -> PathBuf {
        PathBuf::new()
    }

    fn file_name(&self) -> String {
        self.section.file_name().to_string()
    }

    fn content(&self) -> String {
        self.content.clone()
    }
}

/// Accumulates configuration sections.
///
/// Each `add_*` call sets exactly one section, overwriting an earlier value
/// for the same section.
///
/// ```
/// use serde_json::json;
/// use tsforge_codegen::{ConfigSection, ProjectConfigBuilder};
///
/// let config = ProjectConfigBuilder::new()
///     .add_package_descriptor(json!({"name": "demo"}))
///     .add_compiler_options(json!({"compilerOptions": {"strict": true}}))
///     .build();
///
/// assert_eq!(config.len(), 2);
/// assert!(config.get(ConfigSection::Readme).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProjectConfigBuilder {
    sections: BTreeMap<ConfigSection, Value>,
}

impl ProjectConfigBuilder {
    /// Empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set any section.
    #[must_use]
    pub fn add_section(mut self, section: ConfigSection, value: Value) -> Self {
        self.sections.insert(section, value);
        self
    }

    /// `package.json`
    #[must_use]
    pub fn add_package_descriptor(self, value: Value) -> Self {
        self.add_section(ConfigSection::PackageDescriptor, value)
    }

    /// `tsconfig.json`
    #[must_use]
    pub fn add_compiler_options(self, value: Value) -> Self {
        self.add_section(ConfigSection::CompilerOptions, value)
    }

    /// `.eslintrc.json`
    #[must_use]
    pub fn add_lint_config(self, value: Value) -> Self {
        self.add_section(ConfigSection::LintConfig, value)
    }

    /// `.prettierrc`
    #[must_use]
    pub fn add_formatter_config(self, value: Value) -> Self {
        self.add_section(ConfigSection::FormatterConfig, value)
    }

    /// `.editorconfig`, shaped `{"root": bool, "sections": {pattern: {key: value}}}`
    #[must_use]
    pub fn add_editor_settings(self, value: Value) -> Self {
        self.add_section(ConfigSection::EditorSettings, value)
    }

    /// `.gitignore`, shaped `{"header": str, "patterns": [str]}` or `[str]`
    #[must_use]
    pub fn add_ignore_file(self, value: Value) -> Self {
        self.add_section(ConfigSection::IgnoreFile, value)
    }

    /// `ecosystem.config.js`
    #[must_use]
    pub fn add_process_manager(self, value: Value) -> Self {
        self.add_section(ConfigSection::ProcessManager, value)
    }

    /// `README.md` text
    #[must_use]
    pub fn add_readme(self, text: impl Into<String>) -> Self {
        self.add_section(ConfigSection::Readme, Value::String(text.into()))
    }

    /// `LICENSE` text
    #[must_use]
    pub fn add_license(self, text: impl Into<String>) -> Self {
        self.add_section(ConfigSection::License, Value::String(text.into()))
    }

    /// Snapshot the accumulated sections.
    #[must_use]
    pub fn build(&self) -> ProjectConfig {
        ProjectConfig {
            sections: self.sections.clone(),
        }
    }

    /// Builder prefilled with every section for `context`.
    #[must_use]
    pub fn defaults_for(context: &ProjectContext) -> Self {
        Self::new()
            .add_package_descriptor(package_descriptor(context))
            .add_compiler_options(json!({
                "compilerOptions": {
                    "target": "ES2021",
                    "module": "commonjs",
                    "lib": ["ES2021"],
                    "outDir": "./dist",
                    "rootDir": "./src",
                    "strict": true,
                    "esModuleInterop": true,
                    "skipLibCheck": true,
                    "forceConsistentCasingInFileNames": true,
                    "resolveJsonModule": true,
                    "experimentalDecorators": true,
                    "emitDecoratorMetadata": true
                },
                "include": ["src/**/*"],
                "exclude": ["node_modules", "dist"]
            }))
            .add_lint_config(json!({
                "root": true,
                "parser": "@typescript-eslint/parser",
                "plugins": ["@typescript-eslint"],
                "extends": [
                    "eslint:recommended",
                    "plugin:@typescript-eslint/recommended",
                    "prettier"
                ],
                "env": {"node": true, "es2021": true},
                "rules": {
                    "@typescript-eslint/no-unused-vars": ["error", {"argsIgnorePattern": "^_"}]
                }
            }))
            .add_formatter_config(json!({
                "semi": true,
                "singleQuote": true,
                "trailingComma": "all",
                "printWidth": 100,
                "tabWidth": 2
            }))
            .add_editor_settings(json!({
                "root": true,
                "sections": {
                    "*": {
                        "charset": "utf-8",
                        "end_of_line": "lf",
                        "indent_size": 2,
                        "indent_style": "space",
                        "insert_final_newline": true,
                        "trim_trailing_whitespace": true
                    },
                    "*.md": {"trim_trailing_whitespace": false}
                }
            }))
            .add_ignore_file(json!({
                "header": "Generated by tsforge",
                "patterns": [
                    "node_modules/",
                    "dist/",
                    "coverage/",
                    ".env",
                    "*.log",
                    ".DS_Store"
                ]
            }))
            .add_process_manager(json!({
                "apps": [{
                    "name": context.project_name,
                    "script": "dist/index.js",
                    "instances": 1,
                    "autorestart": true,
                    "watch": false,
                    "env": {"NODE_ENV": "production", "PORT": context.port}
                }]
            }))
            .add_readme(readme(context))
            .add_license(license(context))
    }
}

fn package_descriptor(context: &ProjectContext) -> Value {
    let mut dependencies = Map::new();
    dependencies.insert("cors".into(), json!("^2.8.5"));
    dependencies.insert("dotenv".into(), json!("^16.4.5"));
    dependencies.insert("express".into(), json!("^4.19.2"));
    dependencies.insert("helmet".into(), json!("^7.1.0"));
    let (driver, driver_version) = context.database.driver_package();
    dependencies.insert(driver.into(), json!(driver_version));
    for (package, version) in context.orm.packages() {
        dependencies.insert((*package).into(), json!(version));
    }

    json!({
        "name": context.project_name,
        "version": "0.1.0",
        "description": context.description,
        "main": "dist/index.js",
        "license": context.license,
        "author": context.author,
        "scripts": {
            "build": "tsc",
            "start": "node dist/index.js",
            "dev": "ts-node-dev --respawn --transpile-only src/index.ts",
            "lint": "eslint 'src/**/*.ts'",
            "format": "prettier --write 'src/**/*.ts'"
        },
        "dependencies": dependencies,
        "devDependencies": {
            "@types/cors": "^2.8.17",
            "@types/express": "^4.17.21",
            "@types/node": "^20.11.30",
            "@typescript-eslint/eslint-plugin": "^7.4.0",
            "@typescript-eslint/parser": "^7.4.0",
            "eslint": "^8.57.0",
            "eslint-config-prettier": "^9.1.0",
            "prettier": "^3.2.5",
            "ts-node-dev": "^2.0.0",
            "typescript": "^5.4.3"
        }
    })
}

fn readme(context: &ProjectContext) -> String {
    let entities = if context.entities.is_empty() {
        "_none yet; add one with `tsforge add model <Name>`_\n".to_string()
    } else {
        context
            .entities
            .iter()
            .map(|entity| format!("- `{entity}` at `/api/{}`\n", entity.kebab()))
            .collect()
    };

    format!(
        "# {name}\n\n{description}\n\n\
         ## Stack\n\n\
         - Express + TypeScript\n\
         - {database} via {orm}\n\n\
         ## Getting started\n\n\
         ```sh\n\
         cp .env.example .env\n\
         npm install\n\
         npm run dev\n\
         ```\n\n\
         The server listens on port {port}.\n\n\
         ## Resources\n\n{entities}",
        name = context.project_name,
        description = context.description,
        database = context.database.name(),
        orm = context.orm.name(),
        port = context.port,
    )
}

fn license(context: &ProjectContext) -> String {
    let holder = if context.author.is_empty() {
        context.project_name.as_str()
    } else {
        context.author.as_str()
    };

    if context.license.eq_ignore_ascii_case("MIT") {
        format!(
            "MIT License\n\n\
             Copyright (c) {year} {holder}\n\n\
             Permission is hereby granted, free of charge, to any person obtaining a copy\n\
             of this software and associated documentation files (the \"Software\"), to deal\n\
             in the Software without restriction, including without limitation the rights\n\
             to use, copy, modify, merge, publish, distribute, sublicense, and/or sell\n\
             copies of the Software, and to permit persons to whom the Software is\n\
             furnished to do so, subject to the following conditions:\n\n\
             The above copyright notice and this permission notice shall be included in all\n\
             copies or substantial portions of the Software.\n\n\
             THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR\n\
             IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,\n\
             FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE\n\
             AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER\n\
             LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,\n\
             OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE\n\
             SOFTWARE.\n",
            year = context.year,
        )
    } else {
        format!(
            "Copyright (c) {year} {holder}\n\n\
             Licensed under {license}. See https://spdx.org/licenses/{license}.html\n",
            year = context.year,
            license = context.license,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Answers;

    fn context() -> ProjectContext {
        let answers = Answers::new("demo", "PostgreSQL")
            .with_entity("User")
            .with_author("Ada");
        ProjectContext::from_answers(&answers).unwrap().with_year(2024)
    }

    #[test]
    fn test_empty_builder_builds_empty_config() {
        let config = ProjectConfigBuilder::new().build();
        assert!(config.is_empty());
        assert!(config.writers().unwrap().is_empty());
    }

    #[test]
    fn test_later_call_overwrites_section() {
        let config = ProjectConfigBuilder::new()
            .add_readme("first")
            .add_readme("second")
            .build();
        assert_eq!(config.len(), 1);
        assert_eq!(config.get(ConfigSection::Readme), Some(&json!("second")));
    }

    #[test]
    fn test_unrelated_sections_commute() {
        let a = ProjectConfigBuilder::new()
            .add_readme("r")
            .add_license("l")
            .build();
        let b = ProjectConfigBuilder::new()
            .add_license("l")
            .add_readme("r")
            .build();
        assert_eq!(a, b);
    }

    #[test]
    fn test_to_json_uses_section_keys() {
        let config = ProjectConfigBuilder::new()
            .add_package_descriptor(json!({"name": "demo"}))
            .build();
        assert_eq!(
            config.to_json(),
            json!({"packageDescriptor": {"name": "demo"}})
        );
    }

    #[test]
    fn test_defaults_cover_every_section() {
        let config = ProjectConfigBuilder::defaults_for(&context()).build();
        for section in ConfigSection::ALL {
            assert!(config.get(section).is_some(), "{section} missing");
        }
    }

    #[test]
    fn test_package_descriptor_has_driver_and_orm() {
        let config = ProjectConfigBuilder::defaults_for(&context()).build();
        let package = config.get(ConfigSection::PackageDescriptor).unwrap();
        assert_eq!(package["name"], "demo");
        assert!(package["dependencies"].get("pg").is_some());
        assert!(package["dependencies"].get("typeorm").is_some());
    }

    #[test]
    fn test_writers_render_root_files() {
        let config = ProjectConfigBuilder::defaults_for(&context()).build();
        let writers = config.writers().unwrap();
        let names: Vec<_> = writers.iter().map(|w| w.file_name()).collect();
        assert_eq!(
            names,
            ConfigSection::ALL.map(|s| s.file_name().to_string()).to_vec()
        );

        for writer in &writers {
            assert_eq!(writer.directory(), PathBuf::new());
            assert!(writer.content().ends_with('\n'), "{}", writer.label());
        }

        let editor = writers
            .iter()
            .find(|w| w.file_name() == ".editorconfig")
            .unwrap();
        assert!(editor.content().starts_with("root = true\n"));

        let license = writers.iter().find(|w| w.file_name() == "LICENSE").unwrap();
        assert!(license.content().contains("Copyright (c) 2024 Ada"));
    }

    #[test]
    fn test_writer_rejects_malformed_section() {
        let config = ProjectConfigBuilder::new()
            .add_editor_settings(json!("not an object"))
            .build();
        assert!(config.writers().is_err());
    }
}
