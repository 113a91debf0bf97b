//! Template selection from coarse project requirements

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The shipped template bundles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateKind {
    #[serde(rename = "basic-mcp")]
    Basic,
    #[serde(rename = "api-integration-mcp")]
    ApiIntegration,
    #[serde(rename = "http-mcp")]
    Http,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [
        TemplateKind::Basic,
        TemplateKind::ApiIntegration,
        TemplateKind::Http,
    ];

    /// Bundle identifier in the template store
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Basic => "basic-mcp",
            TemplateKind::ApiIntegration => "api-integration-mcp",
            TemplateKind::Http => "http-mcp",
        }
    }

    /// Whether generated projects talk to external APIs
    pub fn is_api(&self) -> bool {
        matches!(self, TemplateKind::ApiIntegration)
    }

    /// Whether generated projects serve over HTTP
    pub fn is_http(&self) -> bool {
        matches!(self, TemplateKind::Http)
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| {
                let available: Vec<&str> = TemplateKind::ALL.iter().map(|k| k.as_str()).collect();
                format!(
                    "Template '{}' is not supported. Available templates: {}",
                    s,
                    available.join(", ")
                )
            })
    }
}

/// Coarse requirement flags derived from free-text caller input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequirementFlags {
    pub api_integration: bool,
    pub http_server: bool,
    /// Accepted but never changes the outcome; always set by callers
    pub basic: bool,
}

impl RequirementFlags {
    /// Derive flags by case-insensitive substring checks
    ///
    /// - API: tools or domain mention "api"
    /// - HTTP: tools or domain mention "http", or the domain mentions "web"
    pub fn from_text(tools: &str, domain: &str) -> Self {
        let tools = tools.to_lowercase();
        let domain = domain.to_lowercase();
        Self {
            api_integration: tools.contains("api") || domain.contains("api"),
            http_server: tools.contains("http")
                || domain.contains("http")
                || domain.contains("web"),
            basic: true,
        }
    }
}

/// Pick a bundle: API integration wins over HTTP, HTTP over basic
pub fn select_template(flags: RequirementFlags) -> TemplateKind {
    if flags.api_integration {
        TemplateKind::ApiIntegration
    } else if flags.http_server {
        TemplateKind::Http
    } else {
        TemplateKind::Basic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_takes_precedence_over_http() {
        let flags = RequirementFlags {
            api_integration: true,
            http_server: true,
            basic: true,
        };
        assert_eq!(select_template(flags), TemplateKind::ApiIntegration);
    }

    #[test]
    fn test_http_when_no_api() {
        let flags = RequirementFlags {
            http_server: true,
            ..Default::default()
        };
        assert_eq!(select_template(flags), TemplateKind::Http);
    }

    #[test]
    fn test_basic_flag_does_not_change_outcome() {
        let with_basic = RequirementFlags {
            basic: true,
            ..Default::default()
        };
        assert_eq!(select_template(with_basic), TemplateKind::Basic);
        assert_eq!(select_template(RequirementFlags::default()), TemplateKind::Basic);
    }

    #[test]
    fn test_flags_from_text() {
        let flags = RequirementFlags::from_text("fetch_API_data", "weather");
        assert!(flags.api_integration);
        assert!(!flags.http_server);

        let flags = RequirementFlags::from_text("search", "Web dashboard");
        assert!(flags.http_server);
        assert!(!flags.api_integration);

        let flags = RequirementFlags::from_text("HTTP_get", "notes");
        assert!(flags.http_server);

        // "web" only counts in the domain
        let flags = RequirementFlags::from_text("webhooks", "notes");
        assert!(!flags.http_server);
        assert!(flags.basic);
    }

    #[test]
    fn test_from_text_feeds_selection() {
        assert_eq!(
            select_template(RequirementFlags::from_text("search", "notes")),
            TemplateKind::Basic
        );
        // "rapid" contains "api"
        assert_eq!(
            select_template(RequirementFlags::from_text("rapid", "notes")),
            TemplateKind::ApiIntegration
        );
    }

    #[test]
    fn test_template_kind_round_trip_names() {
        for kind in TemplateKind::ALL {
            assert_eq!(kind.as_str().parse::<TemplateKind>().unwrap(), kind);
        }
        assert!("basic".parse::<TemplateKind>().is_err());
    }
}
