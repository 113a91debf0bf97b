//! Stack catalog
//!
//! A stack is a family of templates for one kind of project. Only the MCP
//! stack exists today.

use serde::Serialize;

/// One entry of the stack catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StackInfo {
    /// Identifier accepted by `create_project`
    pub name: &'static str,

    /// Availability shown to users
    pub status: &'static str,

    pub description: &'static str,

    /// Template bundles belonging to this stack
    pub templates: &'static [&'static str],

    /// Number of operations exposed for this stack
    pub tools: usize,
}

const STACKS: &[StackInfo] = &[
    StackInfo {
        name: "mcp",
        status: "Fully functional",
        description: "Model Context Protocol - MCP servers for Claude and other AI agents",
        templates: &["basic-mcp", "api-integration-mcp", "http-mcp"],
        tools: 4,
    },
    // Reserved for later: react (react-basic, react-vite, next-js),
    // astro (astro-blog, astro-portfolio, astro-ecommerce),
    // nestjs (nestjs-rest, nestjs-graphql, nestjs-microservices).
];

/// Every available stack
pub fn available_stacks() -> &'static [StackInfo] {
    STACKS
}

/// Look up a stack by name (trimmed, case-insensitive)
pub fn find_stack(name: &str) -> Option<&'static StackInfo> {
    let wanted = name.trim();
    STACKS.iter().find(|s| s.name.eq_ignore_ascii_case(wanted))
}

/// Default stack used when a caller does not pass one
pub fn default_stack() -> &'static StackInfo {
    &STACKS[0]
}

/// Validate a stack name, returning user-facing guidance when unsupported
pub fn validate_stack(name: &str) -> Result<&'static StackInfo, String> {
    find_stack(name).ok_or_else(|| unsupported_stack_message(name))
}

fn unsupported_stack_message(name: &str) -> String {
    let stacks = STACKS
        .iter()
        .map(|s| {
            format!(
                "- **{}**: {} ({})",
                s.name.to_uppercase(),
                s.description,
                s.status
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "❌ **Stack \"{name}\" is not available**\n\n\
         Bootstrap Project MCP currently supports only the **MCP** stack.\n\n\
         ## Available Stacks\n\n\
         {stacks}\n\n\
         ## How to fix\n\n\
         Call `create_project` without a stack (it defaults to MCP) or pass it explicitly:\n\n\
         ```\n\
         create_project({{\n  stack: \"mcp\",\n  mode: \"agent\" // or \"interactive\" or \"quick\"\n}})\n\
         ```\n\n\
         Other stacks (React, Astro, NestJS) are planned for future versions. \
         Until then, projects for other stacks have to be created manually."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_single_mcp_entry() {
        let stacks = available_stacks();
        assert_eq!(stacks.len(), 1);
        assert_eq!(stacks[0].name, "mcp");
        assert_eq!(stacks[0].templates.len(), 3);
        assert_eq!(default_stack().name, "mcp");
    }

    #[test]
    fn test_find_stack_ignores_case_and_whitespace() {
        assert!(find_stack(" MCP ").is_some());
        assert!(find_stack("react").is_none());
    }

    #[test]
    fn test_validate_stack_message_lists_available() {
        let message = validate_stack("react").unwrap_err();
        assert!(message.contains("\"react\""));
        assert!(message.contains("**MCP**"));
        assert!(message.contains("create_project({"));
    }
}
