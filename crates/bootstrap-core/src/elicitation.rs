//! Structured elicitation contract
//!
//! The operation surface asks a remote party for the project fields through
//! an [`Elicitor`]. The transport decides how the request travels; this
//! module only defines the request, the validated response, and the trait.

use crate::error::ElicitationError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::future::Future;

/// Field names requested from the user
pub const PROJECT_NAME_FIELD: &str = "project_name";
pub const DOMAIN_FIELD: &str = "domain";
pub const TOOLS_FIELD: &str = "tools";

/// A request for structured input
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElicitationRequest {
    pub message: String,
    /// JSON schema of the requested object
    pub requested_schema: Value,
}

impl ElicitationRequest {
    /// Ask for the three project fields with the given titles and descriptions
    pub fn project_details(message: &str, fields: [(&str, &str); 3]) -> Self {
        let names = [PROJECT_NAME_FIELD, DOMAIN_FIELD, TOOLS_FIELD];
        let mut properties = Map::new();
        for (name, (title, description)) in names.into_iter().zip(fields) {
            properties.insert(
                name.to_string(),
                json!({ "type": "string", "title": title, "description": description }),
            );
        }

        Self {
            message: message.to_string(),
            requested_schema: json!({
                "type": "object",
                "properties": properties,
                "required": names,
            }),
        }
    }
}

/// What the user did with the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElicitationAction {
    Accept,
    Decline,
    Cancel,
}

/// Raw elicitation result as sent by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElicitationResponse {
    pub action: ElicitationAction,
    #[serde(default)]
    pub content: Option<Map<String, Value>>,
}

impl ElicitationResponse {
    /// Parse a client result payload
    pub fn from_value(value: Value) -> Result<Self, ElicitationError> {
        serde_json::from_value(value).map_err(|e| ElicitationError::InvalidResponse(e.to_string()))
    }
}

/// Project fields supplied through elicitation, all non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElicitedProject {
    pub project_name: String,
    pub domain: String,
    pub tools: String,
}

impl TryFrom<ElicitationResponse> for ElicitedProject {
    type Error = ElicitationError;

    fn try_from(response: ElicitationResponse) -> Result<Self, Self::Error> {
        match response.action {
            ElicitationAction::Accept => {}
            ElicitationAction::Decline => return Err(ElicitationError::Declined("declined".into())),
            ElicitationAction::Cancel => return Err(ElicitationError::Declined("cancelled".into())),
        }

        let content = response
            .content
            .ok_or_else(|| ElicitationError::InvalidResponse("missing content".to_string()))?;

        let field = |name: &str| -> Result<String, ElicitationError> {
            content
                .get(name)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    ElicitationError::InvalidResponse(format!("missing or empty field '{}'", name))
                })
        };

        Ok(Self {
            project_name: field(PROJECT_NAME_FIELD)?,
            domain: field(DOMAIN_FIELD)?,
            tools: field(TOOLS_FIELD)?,
        })
    }
}

/// Something that can ask a remote party for structured input
pub trait Elicitor: Send + Sync {
    fn elicit(
        &self,
        request: ElicitationRequest,
    ) -> impl Future<Output = Result<ElicitationResponse, ElicitationError>> + Send;
}

/// Elicitor for contexts without a remote party (always unsupported)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoElicitation;

impl Elicitor for NoElicitation {
    async fn elicit(
        &self,
        _request: ElicitationRequest,
    ) -> Result<ElicitationResponse, ElicitationError> {
        Err(ElicitationError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted(content: Value) -> ElicitationResponse {
        ElicitationResponse::from_value(json!({ "action": "accept", "content": content })).unwrap()
    }

    #[test]
    fn test_request_schema_requires_all_fields() {
        let request = ElicitationRequest::project_details(
            "Configure",
            [("Name", "n"), ("Domain", "d"), ("Tools", "t")],
        );
        assert_eq!(request.requested_schema["required"], json!(["project_name", "domain", "tools"]));
        assert_eq!(request.requested_schema["properties"]["domain"]["title"], "Domain");

        let wire = serde_json::to_value(&request).unwrap();
        assert!(wire.get("requestedSchema").is_some());
    }

    #[test]
    fn test_accepted_response_becomes_project() {
        let project = ElicitedProject::try_from(accepted(json!({
            "project_name": "weather-bot",
            "domain": " weather ",
            "tools": "forecast, alerts"
        })))
        .unwrap();
        assert_eq!(project.project_name, "weather-bot");
        assert_eq!(project.domain, "weather");
        assert_eq!(project.tools, "forecast, alerts");
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let err = ElicitedProject::try_from(accepted(json!({
            "project_name": "x",
            "domain": "y"
        })))
        .unwrap_err();
        assert!(matches!(err, ElicitationError::InvalidResponse(_)));
    }

    #[test]
    fn test_non_string_field_is_rejected() {
        let err = ElicitedProject::try_from(accepted(json!({
            "project_name": 7,
            "domain": "y",
            "tools": "z"
        })))
        .unwrap_err();
        assert!(matches!(err, ElicitationError::InvalidResponse(_)));
    }

    #[test]
    fn test_declined_response_is_rejected() {
        let response = ElicitationResponse::from_value(json!({ "action": "decline" })).unwrap();
        assert!(matches!(
            ElicitedProject::try_from(response),
            Err(ElicitationError::Declined(_))
        ));
    }

    #[test]
    fn test_unknown_action_is_invalid() {
        assert!(matches!(
            ElicitationResponse::from_value(json!({ "action": "maybe" })),
            Err(ElicitationError::InvalidResponse(_))
        ));
    }
}
