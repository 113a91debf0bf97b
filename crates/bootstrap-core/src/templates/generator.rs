//! Project generation from a template bundle
//!
//! Generation is split in two steps:
//! - [`ProjectGenerator::generate`] resolves the bundle and renders every
//!   file in memory; it never touches the output directory.
//! - [`commit_files`] writes the rendered files under a target directory.
//!
//! The commit is not transactional: if a write fails, files written before
//! the failure stay on disk.

use super::bundle::is_contained_path;
use super::store::TemplateStore;
use super::substitution::substitute_project;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

/// Per-request project values fed to the substitution engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Display name, as typed by the caller
    pub project_name: String,

    /// Identifier derived from the display name
    pub kebab_case_name: String,

    /// What the project is for
    pub domain: String,

    /// Capability names, in caller order
    pub tools: Vec<String>,
}

impl ProjectConfig {
    /// Build a config from raw caller input (`tools` is a comma-separated list)
    pub fn new(project_name: &str, domain: &str, tools: &str) -> Self {
        Self {
            project_name: project_name.to_string(),
            kebab_case_name: to_kebab_case(project_name),
            domain: domain.to_string(),
            tools: parse_tools(tools),
        }
    }
}

/// Split a comma-separated tool list, trimming each entry
///
/// Empty entries and duplicates are kept.
pub fn parse_tools(tools: &str) -> Vec<String> {
    tools.split(',').map(|t| t.trim().to_string()).collect()
}

/// Lower-case, collapse every run of non `[a-z0-9]` characters into a single
/// hyphen, then drop a leading and a trailing hyphen
pub fn to_kebab_case(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut kebab = String::with_capacity(lower.len());

    for c in lower.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            kebab.push(c);
        } else if !kebab.ends_with('-') {
            kebab.push('-');
        }
    }

    let trimmed = kebab.strip_prefix('-').unwrap_or(&kebab);
    let trimmed = trimmed.strip_suffix('-').unwrap_or(trimmed);
    trimmed.to_string()
}

/// Outcome of rendering a bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub success: bool,

    /// Relative output path -> rendered content
    pub files: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResult {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            files: BTreeMap::new(),
            error: Some(message),
        }
    }

    /// Number of rendered files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Renders bundles from a template store
#[derive(Debug, Clone)]
pub struct ProjectGenerator {
    store: TemplateStore,
}

impl ProjectGenerator {
    pub fn new(store: TemplateStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Render every usable file of a bundle for the given project
    ///
    /// Never fails: a missing or unreadable bundle yields `success = false`
    /// with an empty file map. Entries that are neither a string nor an
    /// object with `content`, or whose path would escape the output root,
    /// are skipped with a warning.
    pub async fn generate(&self, template_name: &str, config: &ProjectConfig) -> GenerationResult {
        let bundle = match self.store.get(template_name).await {
            Ok(bundle) => bundle,
            Err(e) => {
                error!(template = %template_name, error = %e, "Cannot generate project");
                return GenerationResult::failure(format!(
                    "Template '{}' not found",
                    template_name
                ));
            }
        };

        let mut files = BTreeMap::new();
        for (path, entry) in &bundle.files {
            let Some(content) = entry.content() else {
                warn!(file = %path, template = %template_name, "Skipping file: invalid format");
                continue;
            };
            if !is_contained_path(path) {
                warn!(file = %path, template = %template_name, "Skipping file: path escapes project root");
                continue;
            }
            files.insert(path.clone(), substitute_project(content, config));
        }

        info!(
            count = files.len(),
            template = %template_name,
            "Generated files from template"
        );

        GenerationResult {
            success: true,
            files,
            error: None,
        }
    }
}

/// Write rendered files under `target_dir`
///
/// Creates the target and any intermediate directories, overwrites existing
/// files, and stops at the first I/O failure. Returns the written paths.
pub async fn commit_files(
    target_dir: &Path,
    files: &BTreeMap<String, String>,
) -> Result<Vec<PathBuf>> {
    // Ensure target directory exists
    fs::create_dir_all(target_dir)
        .await
        .with_context(|| format!("Failed to create directory: {}", target_dir.display()))?;
    info!(path = %target_dir.display(), "Created project directory");

    let mut written = Vec::with_capacity(files.len());
    for (relative_path, content) in files {
        if !is_contained_path(relative_path) {
            anyhow::bail!("Refusing to write outside project root: {}", relative_path);
        }

        let target_path = target_dir.join(relative_path);
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&target_path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", target_path.display()))?;
        info!(path = %target_path.display(), "Written file");

        written.push(target_path);
    }

    info!(
        count = written.len(),
        path = %target_dir.display(),
        "Successfully written files"
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;

    fn store_with(json: &str) -> (tempfile::TempDir, ProjectGenerator) {
        let dir = tempfile::tempdir().unwrap();
        let bundle_dir = dir.path().join("templates").join("sample");
        stdfs::create_dir_all(&bundle_dir).unwrap();
        stdfs::write(bundle_dir.join("template.json"), json).unwrap();
        let generator = ProjectGenerator::new(TemplateStore::new(dir.path().join("templates")));
        (dir, generator)
    }

    #[test]
    fn test_kebab_case_examples() {
        assert_eq!(to_kebab_case("My Cool Project"), "my-cool-project");
        assert_eq!(to_kebab_case("  Weather__API  v2!"), "weather-api-v2");
        assert_eq!(to_kebab_case("already-kebab"), "already-kebab");
        assert_eq!(to_kebab_case("ÜberTool"), "bertool");
        assert_eq!(to_kebab_case("---"), "");
        assert_eq!(to_kebab_case(""), "");
    }

    #[test]
    fn test_kebab_case_is_idempotent_and_well_formed() {
        let inputs = [
            "Hello World",
            "-leading and trailing-",
            "MiXeD_case.with.dots",
            "emoji 🚀 rocket",
            "tabs\tand\nnewlines",
            "123 numbers 456",
            "a--b",
            "!!!",
        ];
        for input in inputs {
            let once = to_kebab_case(input);
            assert_eq!(to_kebab_case(&once), once, "not idempotent for {input:?}");
            let well_formed = once.is_empty()
                || (!once.starts_with('-')
                    && !once.ends_with('-')
                    && !once.contains("--")
                    && once
                        .chars()
                        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            assert!(well_formed, "bad kebab output {once:?} for {input:?}");
        }
    }

    #[test]
    fn test_parse_tools_keeps_duplicates_and_empties() {
        assert_eq!(parse_tools(" a, b ,a,,"), vec!["a", "b", "a", "", ""]);
    }

    #[test]
    fn test_project_config_derives_kebab_name() {
        let config = ProjectConfig::new("Weather Bot", "weather", "forecast, alerts");
        assert_eq!(config.kebab_case_name, "weather-bot");
        assert_eq!(config.tools, vec!["forecast", "alerts"]);
    }

    #[tokio::test]
    async fn test_generate_mixed_entries() {
        let (_dir, generator) = store_with(
            r#"{"name": "sample", "files": {
                "a.txt": "hi {{PROJECT_NAME}}",
                "b.txt": {"content": "{{DOMAIN}}"},
                "c.txt": 42
            }}"#,
        );
        let config = ProjectConfig {
            project_name: "Foo".to_string(),
            kebab_case_name: "foo".to_string(),
            domain: "Bar".to_string(),
            tools: Vec::new(),
        };

        let result = generator.generate("sample", &config).await;
        assert!(result.success);
        assert_eq!(result.file_count(), 2);
        assert_eq!(result.files["a.txt"], "hi Foo");
        assert_eq!(result.files["b.txt"], "Bar");
        assert!(!result.files.contains_key("c.txt"));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_generate_skips_escaping_paths() {
        let (_dir, generator) = store_with(
            r#"{"files": {"../evil.txt": "x", "/abs.txt": "y", "ok/file.txt": "z"}}"#,
        );
        let result = generator
            .generate("sample", &ProjectConfig::new("P", "d", "t"))
            .await;
        assert!(result.success);
        assert_eq!(result.files.keys().collect::<Vec<_>>(), vec!["ok/file.txt"]);
    }

    #[tokio::test]
    async fn test_generate_missing_bundle_fails_without_side_effects() {
        let (dir, generator) = store_with("{}");
        let result = generator
            .generate("does-not-exist", &ProjectConfig::new("P", "d", "t"))
            .await;
        assert!(!result.success);
        assert!(result.files.is_empty());
        assert!(result.error.as_deref().is_some_and(|e| !e.is_empty()));
        assert!(!dir.path().join("p").exists());
    }

    #[tokio::test]
    async fn test_commit_writes_nested_files_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("my-project");
        stdfs::create_dir_all(&target).unwrap();
        stdfs::write(target.join("README.md"), "old").unwrap();

        let mut files = BTreeMap::new();
        files.insert("README.md".to_string(), "new".to_string());
        files.insert("src/tools/index.ts".to_string(), "export {}".to_string());

        let written = commit_files(&target, &files).await.unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(stdfs::read_to_string(target.join("README.md")).unwrap(), "new");
        assert_eq!(
            stdfs::read_to_string(target.join("src/tools/index.ts")).unwrap(),
            "export {}"
        );
    }

    #[tokio::test]
    async fn test_commit_failure_keeps_earlier_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("proj");
        stdfs::create_dir_all(&target).unwrap();
        // A regular file where a directory is needed makes the second write fail
        stdfs::write(target.join("blocker"), "file").unwrap();

        let mut files = BTreeMap::new();
        files.insert("a.txt".to_string(), "first".to_string());
        files.insert("blocker/b.txt".to_string(), "second".to_string());

        let result = commit_files(&target, &files).await;
        assert!(result.is_err());
        assert_eq!(stdfs::read_to_string(target.join("a.txt")).unwrap(), "first");
    }
}
