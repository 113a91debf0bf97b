//! Tool and prompt descriptors advertised to MCP clients

use bootstrap_core::stacks;
use bootstrap_core::{CreationMode, TemplateKind};
use serde_json::{json, Value};

pub const CREATE_PROJECT: &str = "create_project";
pub const START_FROM_TEMPLATES: &str = "start_from_templates";
pub const EXECUTE_CREATE_PROJECT: &str = "execute_create_project";
pub const LIST_TEMPLATES: &str = "list_templates";
pub const LIST_STACKS: &str = "list_stacks";

pub const GENERATE_PROMPT_PROJECT: &str = "generate_prompt_project";

fn stack_names() -> Vec<&'static str> {
    stacks::available_stacks().iter().map(|s| s.name).collect()
}

fn mode_names() -> Vec<&'static str> {
    CreationMode::ALL.iter().map(|m| m.as_str()).collect()
}

fn template_names() -> Vec<&'static str> {
    TemplateKind::ALL.iter().map(|k| k.as_str()).collect()
}

fn project_input_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "stack": {
                "type": "string",
                "enum": stack_names(),
                "default": stacks::default_stack().name,
            },
            "project_name": {
                "type": "string",
                "minLength": 1,
                "description": "Project name (kebab-case)",
            },
            "domain": {
                "type": "string",
                "minLength": 1,
                "description": "Description of the project domain",
            },
            "tools": {
                "type": "string",
                "minLength": 1,
                "description": "Comma-separated tool names",
            },
            "template_type": {
                "type": "string",
                "enum": template_names(),
                "description": "Template to use (auto-selected when omitted)",
            },
        },
        "required": ["project_name", "domain", "tools"],
    })
}

fn detailed_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "detailed": {
                "type": "boolean",
                "default": true,
                "description": description,
            },
        },
    })
}

/// Result payload of `tools/list`
pub fn tool_list() -> Value {
    json!({
        "tools": [
            {
                "name": CREATE_PROJECT,
                "title": "🚀 Create MCP Project",
                "description": "Start creating an MCP project in the selected mode",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "stack": {
                            "type": "string",
                            "enum": stack_names(),
                            "default": stacks::default_stack().name,
                            "description": "Project stack (only MCP is available)",
                        },
                        "mode": {
                            "type": "string",
                            "enum": mode_names(),
                            "default": CreationMode::default().as_str(),
                            "description": "Creation mode: agent (conversational), interactive (forms), quick (fast)",
                        },
                    },
                },
            },
            {
                "name": START_FROM_TEMPLATES,
                "title": "📁 Generate Base Files",
                "description": "Generate the base files of the project from the selected template",
                "inputSchema": project_input_schema(),
            },
            {
                "name": EXECUTE_CREATE_PROJECT,
                "title": "🚀 Create Complete MCP Project",
                "description": "Generate a project prompt for building the complete MCP project",
                "inputSchema": project_input_schema(),
            },
            {
                "name": LIST_TEMPLATES,
                "title": "📋 List MCP Templates",
                "description": "List every available MCP template with details",
                "inputSchema": detailed_schema("Show detailed information for each template"),
            },
            {
                "name": LIST_STACKS,
                "title": "📚 List Available Stacks",
                "description": "List every stack available for project generation",
                "inputSchema": detailed_schema("Show detailed information for each stack"),
            },
        ]
    })
}

/// Result payload of `prompts/list`
pub fn prompt_list() -> Value {
    json!({
        "prompts": [
            {
                "name": GENERATE_PROMPT_PROJECT,
                "title": "🚀 MCP Project Generator",
                "description": "Start the full project creation flow with the assistant",
                "arguments": [
                    {
                        "name": "stack",
                        "description": "Project stack (only MCP is available)",
                        "required": true,
                    },
                    {
                        "name": "mode",
                        "description": "Creation mode: agent (conversational), interactive (forms), quick (fast)",
                        "required": true,
                    },
                ],
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_list_names() {
        let list = tool_list();
        let names: Vec<&str> = list["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                CREATE_PROJECT,
                START_FROM_TEMPLATES,
                EXECUTE_CREATE_PROJECT,
                LIST_TEMPLATES,
                LIST_STACKS
            ]
        );
    }

    #[test]
    fn test_project_schema_requires_fields_and_enumerates_templates() {
        let schema = project_input_schema();
        assert_eq!(schema["required"], json!(["project_name", "domain", "tools"]));
        assert_eq!(
            schema["properties"]["template_type"]["enum"],
            json!(["basic-mcp", "api-integration-mcp", "http-mcp"])
        );
    }

    #[test]
    fn test_create_project_defaults() {
        let list = tool_list();
        let props = &list["tools"][0]["inputSchema"]["properties"];
        assert_eq!(props["mode"]["default"], "interactive");
        assert_eq!(props["stack"]["enum"], json!(["mcp"]));
    }
}
