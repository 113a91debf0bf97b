//! Process configuration
//!
//! Settings are read from the environment (and an optional `.env` file in
//! the working directory) once at startup and then handed to the stores and
//! the operation surface. Nothing below this module looks at environment
//! variables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Dotenv file read from the working directory
pub const DOTENV_FILE: &str = ".env";

/// Default base directory for stack resources
pub const DEFAULT_RESOURCES_DIR: &str = "./stacks/mcp";

/// Default tracing filter
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default bounded wait for structured elicitation (2 seconds)
pub const DEFAULT_ELICITATION_TIMEOUT: Duration = Duration::from_millis(2000);

/// Environment variable names
pub const RESOURCES_DIR_ENV: &str = "RESOURCES_DIR";
pub const TEMPLATES_DIR_ENV: &str = "TEMPLATES_DIR";
pub const PROMPTS_DIR_ENV: &str = "PROMPTS_DIR";
pub const OUTPUT_DIR_ENV: &str = "OUTPUT_DIR";
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
pub const ELICITATION_TIMEOUT_ENV: &str = "ELICITATION_TIMEOUT_MS";

/// Runtime settings shared by every component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base directory for stack resources
    pub resources_dir: PathBuf,

    /// Root directory holding one subdirectory per template bundle
    pub templates_dir: PathBuf,

    /// Directory holding `*.md` prompt fragments
    pub prompts_dir: PathBuf,

    /// Directory under which generated projects are created
    pub output_dir: PathBuf,

    /// Tracing filter directive (e.g. "info", "debug")
    pub log_level: String,

    /// How long to wait for a structured elicitation response
    pub elicitation_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_resources_dir(PathBuf::from(DEFAULT_RESOURCES_DIR))
    }
}

/// Optional overrides applied on top of environment-derived settings
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub templates_dir: Option<PathBuf>,
    pub prompts_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Settings {
    /// Settings rooted at a resources directory, with every other value defaulted
    pub fn with_resources_dir(resources_dir: PathBuf) -> Self {
        Self {
            templates_dir: resources_dir.join("templates"),
            prompts_dir: resources_dir.join("prompts"),
            resources_dir,
            output_dir: PathBuf::from("."),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            elicitation_timeout: DEFAULT_ELICITATION_TIMEOUT,
        }
    }

    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings from the process environment, filling gaps from `./.env`
    pub fn load() -> Self {
        let dotenv = Path::new(DOTENV_FILE);
        if !dotenv.is_file() {
            return Self::from_env();
        }
        match Self::from_env_file(dotenv, |key| std::env::var(key).ok()) {
            Ok(settings) => settings,
            Err(e) => {
                // Logging is not initialized yet, so this goes straight to stderr
                eprintln!("Warning: ignoring {}: {}", dotenv.display(), e);
                Self::from_env()
            }
        }
    }

    /// Settings from a dotenv file, with `lookup` taking precedence over it
    pub fn from_env_file<F>(path: &Path, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: HashMap<String, String> =
            dotenvy::from_path_iter(path)?.collect::<Result<_, _>>()?;
        Ok(Self::from_lookup(|key| {
            lookup(key).or_else(|| file.get(key).cloned())
        }))
    }

    /// Build settings from an arbitrary key lookup (empty values count as unset)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let resources_dir = get(RESOURCES_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCES_DIR));
        let mut settings = Self::with_resources_dir(resources_dir);

        if let Some(dir) = get(TEMPLATES_DIR_ENV) {
            settings.templates_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get(PROMPTS_DIR_ENV) {
            settings.prompts_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get(OUTPUT_DIR_ENV) {
            settings.output_dir = PathBuf::from(dir);
        }
        if let Some(level) = get(LOG_LEVEL_ENV) {
            settings.log_level = level;
        }
        if let Some(raw) = get(ELICITATION_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => settings.elicitation_timeout = Duration::from_millis(ms),
                // Logging is not initialized yet, so this goes straight to stderr
                Err(_) => eprintln!(
                    "Warning: invalid {}='{}', using {}ms",
                    ELICITATION_TIMEOUT_ENV,
                    raw,
                    DEFAULT_ELICITATION_TIMEOUT.as_millis()
                ),
            }
        }

        settings
    }

    /// Apply CLI overrides
    pub fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        if let Some(dir) = overrides.templates_dir {
            self.templates_dir = dir;
        }
        if let Some(dir) = overrides.prompts_dir {
            self.prompts_dir = dir;
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        self
    }

    /// Directory a project with the given kebab-case name is written to
    pub fn project_dir(&self, kebab_case_name: &str) -> PathBuf {
        self.output_dir.join(kebab_case_name)
    }
}
