//! Placeholder substitution
//!
//! Two flavours share this module:
//!
//! - [`substitute_project`] renders bundle files with the fixed project
//!   placeholders (`{{PROJECT_NAME}}`, `{{KEBAB_CASE_NAME}}`, `{{DOMAIN}}`,
//!   `{{TOOLS_PLACEHOLDER}}`), then turns literal `\n` / `\t` sequences into
//!   real newlines and tabs.
//! - [`substitute_args`] renders prompt fragments with arbitrary `{{key}}`
//!   arguments, one `{{#each tools}}...{{/each}}` block form and one
//!   `{{#if (ne VAR "literal")}}...{{/if}}` conditional form.
//!
//! Each rule is a single left-to-right pass and rules run in a fixed order.
//! Unknown placeholders are left in the output untouched.

use super::generator::ProjectConfig;
use regex::{NoExpand, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const PROJECT_NAME_PLACEHOLDER: &str = "{{PROJECT_NAME}}";
pub const KEBAB_CASE_NAME_PLACEHOLDER: &str = "{{KEBAB_CASE_NAME}}";
pub const DOMAIN_PLACEHOLDER: &str = "{{DOMAIN}}";
pub const TOOLS_PLACEHOLDER: &str = "{{TOOLS_PLACEHOLDER}}";

/// Argument name that drives `{{#each tools}}` expansion
pub const TOOLS_ARG: &str = "tools";

/// Fallback wording when no `domain` argument is supplied
const DEFAULT_DOMAIN_WORDING: &str = "the project";

static EACH_TOOLS_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{#each tools\}\}[\s\S]*?\{\{/each\}\}").expect("Invalid each-block regex")
});

static NE_CONDITIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{#if \(ne (\w+) "([^"]+)"\)\}\}([\s\S]*?)\{\{/if\}\}"#)
        .expect("Invalid conditional regex")
});

/// Render one bundle file for a project
///
/// Order: scalar placeholders, tool list expansion, escape normalization.
/// The escape pass runs over the whole result, so a substituted value that
/// contains a literal `\n` also becomes a newline.
pub fn substitute_project(content: &str, config: &ProjectConfig) -> String {
    let processed = content
        .replace(PROJECT_NAME_PLACEHOLDER, &config.project_name)
        .replace(KEBAB_CASE_NAME_PLACEHOLDER, &config.kebab_case_name)
        .replace(DOMAIN_PLACEHOLDER, &config.domain);

    let processed = expand_tools_placeholder(&processed, &config.tools, &config.domain);

    normalize_escapes(&processed)
}

/// Replace `{{TOOLS_PLACEHOLDER}}` with one line per tool
///
/// No-op when the tool list is empty or the placeholder is absent.
pub fn expand_tools_placeholder(content: &str, tools: &[String], domain: &str) -> String {
    if tools.is_empty() || !content.contains(TOOLS_PLACEHOLDER) {
        return content.to_string();
    }

    let section = tools
        .iter()
        .map(|tool| render_tool_definition(tool, domain))
        .collect::<Vec<_>>()
        .join("\n");

    content.replace(TOOLS_PLACEHOLDER, &section)
}

/// One tool definition line for the generated tool registry
pub fn render_tool_definition(tool: &str, domain: &str) -> String {
    format!(
        "\t{{ name: '{tool}', description: 'Tool for {tool} in the context of {domain}', \
         inputSchema: {{ type: 'object', properties: {{}} }} }},"
    )
}

/// Convert literal backslash-n / backslash-t pairs into newline / tab
pub fn normalize_escapes(content: &str) -> String {
    content.replace("\\n", "\n").replace("\\t", "\t")
}

/// Render a prompt fragment with caller-supplied arguments
///
/// Order: `{{key}}` replacement, `{{#each tools}}` expansion (only when a
/// non-empty `tools` argument is present), then `ne` conditionals.
pub fn substitute_args(content: &str, args: &BTreeMap<String, String>) -> String {
    let mut processed = content.to_string();

    for (key, value) in args {
        processed = processed.replace(&format!("{{{{{key}}}}}"), value);
    }

    if let Some(tools) = args.get(TOOLS_ARG).filter(|t| !t.is_empty()) {
        let domain = args
            .get("domain")
            .filter(|d| !d.is_empty())
            .map(String::as_str)
            .unwrap_or(DEFAULT_DOMAIN_WORDING);
        let section = render_tool_bullets(tools, domain);
        processed = EACH_TOOLS_BLOCK
            .replace_all(&processed, NoExpand(&section))
            .into_owned();
    }

    apply_ne_conditionals(&processed, args)
}

/// Bullet list describing each comma-separated tool, one line per tool
pub fn render_tool_bullets(tools: &str, domain: &str) -> String {
    tools
        .split(',')
        .map(str::trim)
        .map(|tool| format!("- `{tool}`: Implement functionality for {tool} in the context of {domain}\n"))
        .collect()
}

/// Keep the body of `{{#if (ne VAR "x")}}...{{/if}}` when VAR is set, non-empty
/// and differs from `x`; otherwise drop the whole block.
fn apply_ne_conditionals(content: &str, args: &BTreeMap<String, String>) -> String {
    NE_CONDITIONAL
        .replace_all(content, |caps: &regex::Captures| {
            let keep = args
                .get(&caps[1])
                .is_some_and(|value| !value.is_empty() && value != &caps[2]);
            if keep {
                caps[3].to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}
