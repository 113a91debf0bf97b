//! Bootstrap Core - project bootstrapping from template bundles
//!
//! This library holds everything behind the `bootstrap-mcp` server: the
//! template store, the substitution engine, template selection, project
//! generation, the prompt store, and the operation surface that ties them
//! together. The MCP transport lives in the binary crate.
//!
//! # Architecture
//!
//! - **Stores** - [`templates::TemplateStore`] and [`prompts::PromptStore`] read bundles and prompt fragments from disk
//! - **Generation** - [`templates::ProjectGenerator`] renders a bundle in memory, [`templates::commit_files`] writes it
//! - **Operations** - [`BootstrapService`] exposes `create_project`, `start_from_templates`,
//!   `execute_create_project`, `list_templates` and `list_stacks`
//! - **CLI/TUI** - Optional cliclack-based prompts for local use (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage
//!
//! ```ignore
//! use bootstrap_core::{BootstrapService, ProjectRequest, Settings};
//!
//! let service = BootstrapService::new(Settings::from_env());
//! let output = service
//!     .start_from_templates(&ProjectRequest::new("Weather Bot", "weather", "forecast, alerts"))
//!     .await;
//! println!("{}", output.text);
//! ```

pub mod config;
pub mod elicitation;
pub mod error;
pub mod logging;
pub mod operations;
pub mod prompts;
pub mod stacks;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{Settings, SettingsOverrides};
pub use elicitation::{ElicitationRequest, ElicitationResponse, ElicitedProject, Elicitor};
pub use error::{ElicitationError, PromptError, TemplateError};
pub use operations::{BootstrapService, CreationMode, ProjectPlan, ProjectRequest, ToolOutput};
pub use prompts::PromptStore;
pub use templates::{ProjectConfig, ProjectGenerator, TemplateKind, TemplateStore};

#[cfg(feature = "tui")]
pub use tui::run;

/// Server name reported to MCP clients
pub const SERVER_NAME: &str = "bootstrap-project-mcp";

/// Library version, reported as the server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
