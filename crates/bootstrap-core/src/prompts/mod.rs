//! Prompt fragments loaded from a directory of Markdown documents.
//!
//! Each `<name>.md` file in the prompts directory becomes a prompt named
//! `<name>`. A leading front-matter section delimited by `---` lines is
//! dropped; the remaining body is trimmed and kept as the prompt content.
//!
//! Prompts are loaded once when the store is built and kept for its
//! lifetime.

use crate::config::Settings;
use crate::error::PromptError;
use crate::templates::substitution::substitute_args;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

/// Prompt used by the conversational (agent) mode
pub const ASSISTANT_PROMPT: &str = "bootstrap_assistant";

/// Implementation brief appended after a successful elicitation
pub const INTERACTIVE_PROMPT: &str = "bootstrap_interactive";

/// Front-matter delimiter line
const FRONT_MATTER_DELIMITER: &str = "---\n";

/// A named reusable text fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// File stem of the source document
    pub name: String,

    /// Body after front matter, trimmed
    pub content: String,
}

impl Prompt {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Name-keyed collection of prompt fragments
#[derive(Debug, Clone, Default)]
pub struct PromptStore {
    dir: PathBuf,
    prompts: HashMap<String, Prompt>,
}

impl PromptStore {
    /// Load every `*.md` file directly inside `dir`
    ///
    /// A missing directory or an unreadable file is logged and skipped; the
    /// store is still usable.
    pub fn load(dir: &Path) -> Self {
        let mut store = Self {
            dir: dir.to_path_buf(),
            prompts: HashMap::new(),
        };

        if !dir.is_dir() {
            warn!(path = %dir.display(), "Prompts directory not found");
            return store;
        }

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    error!(error = %e, "Error loading prompts");
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("md")
            {
                continue;
            }

            match load_prompt_file(path) {
                Ok(prompt) => {
                    debug!(prompt = %prompt.name, "Loaded prompt");
                    store.prompts.insert(prompt.name.clone(), prompt);
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Error loading prompt");
                }
            }
        }

        store
    }

    /// Load from the configured prompts directory
    pub fn from_settings(settings: &Settings) -> Self {
        Self::load(&settings.prompts_dir)
    }

    /// Register a prompt directly (replaces any prompt with the same name)
    pub fn insert(&mut self, prompt: Prompt) {
        self.prompts.insert(prompt.name.clone(), prompt);
    }

    /// Directory the store was loaded from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn get(&self, name: &str) -> Option<&Prompt> {
        self.prompts.get(name)
    }

    /// Prompt names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.prompts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Render a prompt with `{{key}}` arguments, `{{#each tools}}` blocks,
    /// and `ne` conditionals
    pub fn render(&self, name: &str, args: &BTreeMap<String, String>) -> Result<String, PromptError> {
        let prompt = self
            .get(name)
            .ok_or_else(|| PromptError::NotFound(name.to_string()))?;
        Ok(substitute_args(&prompt.content, args))
    }
}

fn load_prompt_file(path: &Path) -> Result<Prompt, PromptError> {
    let content = std::fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Prompt::new(name, strip_front_matter(&content)))
}

/// Drop a leading `---` ... `---` section and trim the rest
///
/// Documents without a complete front-matter section are kept whole.
pub fn strip_front_matter(content: &str) -> String {
    let normalized = content.replace("\r\n", "\n");
    if let Some(rest) = normalized.strip_prefix(FRONT_MATTER_DELIMITER) {
        if let Some((_, body)) = rest.split_once(FRONT_MATTER_DELIMITER) {
            return body.trim().to_string();
        }
    }
    normalized.trim().to_string()
}
