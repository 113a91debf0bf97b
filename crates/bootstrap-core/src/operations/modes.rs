//! Creation modes accepted by `create_project`

use serde::Serialize;
use std::fmt;

/// How `create_project` gathers project details
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CreationMode {
    /// Conversational: hand the agent an assistant prompt
    Agent,
    /// Structured form with full descriptions
    #[default]
    Interactive,
    /// Structured form with the essentials only
    Quick,
}

const MODE_ALIASES: &[(&str, CreationMode)] = &[
    ("agent", CreationMode::Agent),
    ("agente", CreationMode::Agent),
    ("assistant", CreationMode::Agent),
    ("asistente", CreationMode::Agent),
    ("interactive", CreationMode::Interactive),
    ("interactivo", CreationMode::Interactive),
    ("preguntas", CreationMode::Interactive),
    ("quick", CreationMode::Quick),
    ("fast", CreationMode::Quick),
    ("rapido", CreationMode::Quick),
    ("rápido", CreationMode::Quick),
];

impl CreationMode {
    pub const ALL: [CreationMode; 3] = [
        CreationMode::Agent,
        CreationMode::Interactive,
        CreationMode::Quick,
    ];

    /// Map free text onto a mode; unknown input selects [`CreationMode::Interactive`]
    pub fn normalize(input: &str) -> Self {
        let wanted = input.trim().to_lowercase();
        MODE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == wanted)
            .map(|(_, mode)| *mode)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CreationMode::Agent => "agent",
            CreationMode::Interactive => "interactive",
            CreationMode::Quick => "quick",
        }
    }

    /// Whether this mode asks the client for structured input
    pub fn uses_elicitation(&self) -> bool {
        !matches!(self, CreationMode::Agent)
    }
}

impl fmt::Display for CreationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_synonyms() {
        assert_eq!(CreationMode::normalize("Agente"), CreationMode::Agent);
        assert_eq!(CreationMode::normalize(" assistant "), CreationMode::Agent);
        assert_eq!(CreationMode::normalize("PREGUNTAS"), CreationMode::Interactive);
        assert_eq!(CreationMode::normalize("fast"), CreationMode::Quick);
        assert_eq!(CreationMode::normalize("Rápido"), CreationMode::Quick);
    }

    #[test]
    fn test_unknown_mode_defaults_to_interactive() {
        assert_eq!(CreationMode::normalize("wizard"), CreationMode::Interactive);
        assert_eq!(CreationMode::normalize(""), CreationMode::Interactive);
    }

    #[test]
    fn test_every_mode_normalizes_to_itself() {
        for mode in CreationMode::ALL {
            assert_eq!(CreationMode::normalize(mode.as_str()), mode);
        }
    }

    #[test]
    fn test_only_agent_mode_skips_elicitation() {
        assert_eq!(CreationMode::default(), CreationMode::Interactive);
        assert!(!CreationMode::Agent.uses_elicitation());
        assert!(CreationMode::Interactive.uses_elicitation());
        assert!(CreationMode::Quick.uses_elicitation());
    }
}
