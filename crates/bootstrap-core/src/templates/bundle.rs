//! Template bundle types and parsing

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Description shown for bundles whose metadata cannot be loaded
pub const PLACEHOLDER_DESCRIPTION: &str = "Template without description";

/// Category shown for bundles whose metadata cannot be loaded
pub const PLACEHOLDER_CATEGORY: &str = "unknown";

/// Object form of a file entry (`{"content": "...", "description": "..."}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredFile {
    /// Template text for the file
    pub content: String,

    /// What the file is for (display only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One value of a bundle's `files` map
///
/// Anything that is neither a string nor an object with a string `content`
/// lands in `Unsupported` so that one bad entry never fails the whole bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileEntry {
    /// Legacy format: the value is the content itself
    Legacy(String),

    /// Structured format: an object carrying `content`
    Structured(StructuredFile),

    /// Any other shape; skipped during generation
    Unsupported(serde_json::Value),
}

impl FileEntry {
    /// Template text of the entry, if it has a usable shape
    pub fn content(&self) -> Option<&str> {
        match self {
            FileEntry::Legacy(content) => Some(content),
            FileEntry::Structured(file) => Some(&file.content),
            FileEntry::Unsupported(_) => None,
        }
    }

    /// Per-file description (structured entries only)
    pub fn description(&self) -> Option<&str> {
        match self {
            FileEntry::Structured(file) => file.description.as_deref(),
            _ => None,
        }
    }
}

/// Metadata file as written on disk; every field is optional
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawBundle {
    name: Option<String>,
    description: Option<String>,
    category: Option<String>,
    tags: Option<Vec<String>>,
    files: Option<BTreeMap<String, FileEntry>>,
}

impl RawBundle {
    /// Fill defaults, using the directory identifier when `name` is missing
    pub(crate) fn into_bundle(self, identifier: &str) -> TemplateBundle {
        TemplateBundle {
            name: self
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| identifier.to_string()),
            description: self.description.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            files: self.files.unwrap_or_default(),
        }
    }
}

/// A named collection of output file templates plus display metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateBundle {
    /// Bundle identifier
    pub name: String,

    /// Human-readable summary
    pub description: String,

    /// Free-text classification tag
    pub category: String,

    /// Display/filter labels
    pub tags: Vec<String>,

    /// Relative output path -> file entry, ordered by path
    pub files: BTreeMap<String, FileEntry>,
}

impl TemplateBundle {
    /// Display fields of this bundle
    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// The four display fields emitted by template listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSummary {
    pub name: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
}

impl TemplateSummary {
    /// Stand-in record for a bundle whose metadata could not be loaded
    pub fn placeholder(identifier: &str) -> Self {
        Self {
            name: identifier.to_string(),
            description: PLACEHOLDER_DESCRIPTION.to_string(),
            category: PLACEHOLDER_CATEGORY.to_string(),
            tags: Vec::new(),
        }
    }
}

/// Check that a bundle path stays inside the output root once joined
///
/// Rejects empty paths, absolute paths, drive prefixes, and any `..` segment.
pub fn is_contained_path(path: &str) -> bool {
    if path.is_empty() || path.starts_with(['/', '\\']) || path.ends_with(['/', '\\']) {
        return false;
    }
    // Windows drive prefix such as "C:"
    if path.len() >= 2 && path.as_bytes()[1] == b':' {
        return false;
    }

    let mut has_file_segment = false;
    for segment in path.split(['/', '\\']) {
        match segment {
            ".." => return false,
            "" | "." => {}
            _ => has_file_segment = true,
        }
    }
    has_file_segment
}
