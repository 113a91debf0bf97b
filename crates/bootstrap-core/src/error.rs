//! Error types for template, prompt, and elicitation operations.

use thiserror::Error;

/// Failure to resolve a template bundle.
///
/// Callers of the operation surface treat every variant as "not found";
/// the variant only decides what gets logged.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Template '{name}' has malformed metadata: {reason}")]
    Malformed { name: String, reason: String },

    #[error("Failed to read template '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to resolve or load a prompt fragment.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt '{0}' not found")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a structured elicitation round-trip.
///
/// Every variant is recovered by switching to the conversational mode.
#[derive(Debug, Error)]
pub enum ElicitationError {
    #[error("Client does not support elicitation")]
    Unsupported,

    #[error("Elicitation timeout - UI not available")]
    Timeout,

    #[error("Elicitation was {0} by the user")]
    Declined(String),

    #[error("Invalid elicitation response: {0}")]
    InvalidResponse(String),

    #[error("Elicitation transport error: {0}")]
    Transport(String),
}
