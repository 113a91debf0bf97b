//! Template bundle loading from a directory-per-bundle layout
//!
//! ```text
//! templates/
//! ├── basic-mcp/
//! │   └── template.json
//! └── http-mcp/
//!     └── template.json
//! ```
//!
//! Bundles are read fresh on every lookup; the store holds no cache.

use super::bundle::{RawBundle, TemplateBundle, TemplateSummary};
use crate::config::Settings;
use crate::error::TemplateError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, warn};

/// Metadata file names, in lookup order
const METADATA_FILES: &[(&str, MetadataFormat)] = &[
    ("template.json", MetadataFormat::Json),
    ("template.yaml", MetadataFormat::Yaml),
    ("template.yml", MetadataFormat::Yaml),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetadataFormat {
    Json,
    Yaml,
}

/// Template store rooted at a templates directory
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    /// Create a store over the given root directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a store from process settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.templates_dir.clone())
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load a bundle by identifier
    pub async fn get(&self, name: &str) -> Result<TemplateBundle, TemplateError> {
        if !is_valid_identifier(name) {
            warn!(template = %name, "Rejected invalid template identifier");
            return Err(TemplateError::NotFound(name.to_string()));
        }

        let bundle_dir = self.root.join(name);
        let Some((metadata_path, format)) = find_metadata(&bundle_dir).await else {
            error!(path = %bundle_dir.display(), "Template not found");
            return Err(TemplateError::NotFound(name.to_string()));
        };

        let content = fs::read_to_string(&metadata_path).await.map_err(|source| {
            error!(template = %name, error = %source, "Error loading template");
            TemplateError::Io {
                name: name.to_string(),
                source,
            }
        })?;

        let parsed: Result<RawBundle, String> = match format {
            MetadataFormat::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
            MetadataFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
        };

        match parsed {
            Ok(raw) => {
                debug!(template = %name, path = %metadata_path.display(), "Loaded template");
                Ok(raw.into_bundle(name))
            }
            Err(reason) => {
                error!(template = %name, error = %reason, "Error loading template");
                Err(TemplateError::Malformed {
                    name: name.to_string(),
                    reason,
                })
            }
        }
    }

    /// Identifiers of every bundle directory under the root, sorted
    pub async fn list(&self) -> Vec<String> {
        if fs::metadata(&self.root).await.is_err() {
            warn!(path = %self.root.display(), "Templates directory not found");
            return Vec::new();
        }

        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = %e, "Error listing templates");
                return Vec::new();
            }
        };

        let mut names = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let is_dir = fs::metadata(entry.path())
                        .await
                        .map(|m| m.is_dir())
                        .unwrap_or(false);
                    if is_dir {
                        names.push(entry.file_name().to_string_lossy().into_owned());
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, "Error listing templates");
                    break;
                }
            }
        }

        names.sort();
        names
    }

    /// Display fields for every listed bundle
    ///
    /// Bundles that fail to load still get a placeholder record, so the
    /// result always has one entry per identifier from [`list`](Self::list).
    pub async fn list_with_info(&self) -> Vec<TemplateSummary> {
        let mut summaries = Vec::new();
        for name in self.list().await {
            match self.get(&name).await {
                Ok(bundle) => summaries.push(bundle.summary()),
                Err(_) => summaries.push(TemplateSummary::placeholder(&name)),
            }
        }
        summaries
    }
}

/// A bundle identifier must name a single directory below the root
fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

async fn find_metadata(bundle_dir: &Path) -> Option<(PathBuf, MetadataFormat)> {
    for (file_name, format) in METADATA_FILES {
        let path = bundle_dir.join(file_name);
        if fs::metadata(&path).await.map(|m| m.is_file()).unwrap_or(false) {
            return Some((path, *format));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::bundle::PLACEHOLDER_DESCRIPTION;
    use std::fs as stdfs;

    fn write_bundle(root: &Path, name: &str, file: &str, content: &str) {
        let dir = root.join(name);
        stdfs::create_dir_all(&dir).unwrap();
        stdfs::write(dir.join(file), content).unwrap();
    }

    #[tokio::test]
    async fn test_get_loads_json_bundle() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(
            dir.path(),
            "basic-mcp",
            "template.json",
            r##"{"name": "basic-mcp", "description": "Basic", "category": "mcp",
                "tags": ["stdio"], "files": {"README.md": "# {{PROJECT_NAME}}"}}"##,
        );

        let store = TemplateStore::new(dir.path());
        let bundle = store.get("basic-mcp").await.unwrap();
        assert_eq!(bundle.name, "basic-mcp");
        assert_eq!(bundle.category, "mcp");
        assert_eq!(bundle.tags, vec!["stdio"]);
        assert_eq!(bundle.files.len(), 1);
    }

    #[tokio::test]
    async fn test_get_falls_back_to_yaml_metadata() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(
            dir.path(),
            "yaml-bundle",
            "template.yaml",
            "name: yaml-bundle\ndescription: From YAML\nfiles:\n  a.txt: hi\n",
        );

        let store = TemplateStore::new(dir.path());
        let bundle = store.get("yaml-bundle").await.unwrap();
        assert_eq!(bundle.description, "From YAML");
    }

    #[tokio::test]
    async fn test_get_missing_bundle_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = TemplateStore::new(dir.path());
        assert!(matches!(
            store.get("nope").await,
            Err(TemplateError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_malformed_metadata() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path(), "broken", "template.json", "{ not json");
        let store = TemplateStore::new(dir.path());
        assert!(matches!(
            store.get("broken").await,
            Err(TemplateError::Malformed { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_rejects_traversal_identifiers() {
        let dir = tempfile::tempdir().unwrap();
        let store = TemplateStore::new(dir.path().join("templates"));
        write_bundle(dir.path(), "templates/ok", "template.json", "{}");
        write_bundle(dir.path(), "secret", "template.json", "{}");

        assert!(store.get("ok").await.is_ok());
        assert!(store.get("../secret").await.is_err());
        assert!(store.get("..").await.is_err());
        assert!(store.get("").await.is_err());
    }

    #[tokio::test]
    async fn test_list_only_directories() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path(), "b-bundle", "template.json", "{}");
        write_bundle(dir.path(), "a-bundle", "template.json", "{}");
        stdfs::write(dir.path().join("stray.txt"), "x").unwrap();

        let store = TemplateStore::new(dir.path());
        assert_eq!(store.list().await, vec!["a-bundle", "b-bundle"]);
    }

    #[tokio::test]
    async fn test_list_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TemplateStore::new(dir.path().join("missing"));
        assert!(store.list().await.is_empty());
        assert!(store.list_with_info().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_with_info_keeps_broken_bundles() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(
            dir.path(),
            "good",
            "template.json",
            r#"{"name": "good", "description": "Works", "category": "mcp", "tags": ["x"]}"#,
        );
        write_bundle(dir.path(), "malformed", "template.json", "][");
        stdfs::create_dir_all(dir.path().join("empty-dir")).unwrap();

        let store = TemplateStore::new(dir.path());
        let infos = store.list_with_info().await;
        assert_eq!(infos.len(), 3);

        let good = infos.iter().find(|i| i.name == "good").unwrap();
        assert_eq!(good.description, "Works");

        let broken = infos.iter().find(|i| i.name == "malformed").unwrap();
        assert_eq!(broken.description, PLACEHOLDER_DESCRIPTION);
        assert_eq!(broken.category, "unknown");
        assert!(broken.tags.is_empty());

        let empty = infos.iter().find(|i| i.name == "empty-dir").unwrap();
        assert_eq!(empty.description, PLACEHOLDER_DESCRIPTION);
    }
}
