//! Markdown result texts returned by the operations

use super::modes::CreationMode;
use super::ProjectPlan;
use crate::elicitation::ElicitedProject;
use crate::stacks::StackInfo;
use crate::templates::substitution::render_tool_bullets;
use crate::templates::{TemplateKind, TemplateSummary};
use std::collections::BTreeMap;
use std::path::Path;

/// Files shown in the generation preview, in display order
const PREVIEW_FILES: [&str; 3] = ["package.json", "src/index.ts", "README.md"];

/// Preview length in characters
const PREVIEW_LIMIT: usize = 500;

fn fence_language(path: &str) -> &'static str {
    if path.ends_with(".json") {
        "json"
    } else if path.ends_with(".md") {
        "markdown"
    } else {
        "typescript"
    }
}

fn preview(content: &str) -> String {
    if content.chars().count() > PREVIEW_LIMIT {
        let head: String = content.chars().take(PREVIEW_LIMIT).collect();
        format!("{head}...")
    } else {
        content.to_string()
    }
}

/// Report for a committed project
pub fn generation_report(plan: &ProjectPlan, project_dir: &Path, files: &BTreeMap<String, String>) -> String {
    let config = &plan.config;
    let file_list = files
        .keys()
        .map(|path| format!("- `{path}`"))
        .collect::<Vec<_>>()
        .join("\n");

    let previews = PREVIEW_FILES
        .iter()
        .filter_map(|name| files.get(*name).map(|content| (*name, content)))
        .map(|(name, content)| {
            format!(
                "### `{name}`\n```{}\n{}\n```",
                fence_language(name),
                preview(content)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "✅ **MCP Project Created Successfully**\n\n\
         📦 **Project**: {name}\n\
         🏷️ **Template**: {template}\n\
         📁 **Generated files**: {count}\n\
         🗂️ **Location**: `{dir}`\n\n\
         ## 📋 Created Files\n\n\
         {file_list}\n\n\
         ## 🔍 Preview of Key Files\n\n\
         {previews}\n\n\
         ---\n\n\
         ## 🚀 Next Steps\n\n\
         1. **Go to the project directory**:\n   ```bash\n   cd {dir}\n   ```\n\n\
         2. **Install dependencies**:\n   ```bash\n   pnpm install\n   ```\n\n\
         3. **Build the project**:\n   ```bash\n   pnpm run build\n   ```\n\n\
         4. **Try the MCP server**:\n   ```bash\n   pnpm run inspector\n   ```\n\n\
         **💡 Tip**: The project is ready to use. Customize the tools in `src/mcp-tools.ts` \
         and `src/tool-handlers.ts` for the \"{domain}\" domain.",
        name = config.project_name,
        template = plan.template,
        count = files.len(),
        dir = project_dir.display(),
        domain = config.domain,
    )
}

/// Instruction document handed to the agent by `execute_create_project`
pub fn instruction_document(plan: &ProjectPlan) -> String {
    let config = &plan.config;
    let domain = &config.domain;
    let stack = plan.stack.name;
    let template = plan.template;
    let tool_lines = render_tool_bullets(&plan.tools_text, domain);

    let mut env_vars = String::from(
        "- `LOG_LEVEL`: Logging level (info, debug, error)\n\
         - `CACHE_DURATION`: Cache duration in minutes\n",
    );
    if template.is_api() {
        env_vars.push_str(
            "- `API_KEY`: API key for external integrations\n\
             - `API_BASE_URL`: Base URL for external APIs\n",
        );
    }
    if template.is_http() {
        env_vars.push_str(
            "- `MCP_PORT`: Port for the HTTP server\n\
             - `MCP_BEARER`: Bearer authentication token\n",
        );
    }

    let mut integrations = String::from("- **Database**: SQLite for local data\n");
    integrations.push_str("- **Transport**: STDIO for Claude Desktop");
    if template.is_http() {
        integrations.push_str(" + HTTP/SSE for web access");
    }
    integrations.push('\n');
    if template.is_api() {
        integrations.push_str("- **External APIs**: Integration with third-party services\n");
    }
    integrations.push_str(
        "- **Error handling** that is robust with detailed logging\n\
         - **Local in-memory cache** to improve performance\n\
         - **Data validation** of inputs and outputs",
    );

    let prompt = format!(
        "# 🚀 Create MCP Project: {domain}\n\n\
         ## 🎯 PROJECT DESCRIPTION\n\n\
         I need a complete, professional MCP (Model Context Protocol) project for **{domain}**.\n\n\
         **Project name**: {name}\n\n\
         ## 🛠️ REQUIRED MCP TOOLS\n\n\
         {tool_lines}\n\
         ## 🔧 SPECIFIC CONFIGURATION\n\n\
         ### Stack and Template\n\
         - **Stack**: {stack_upper}\n\
         - **Template**: {template}\n\
         - **Package manager**: pnpm\n\n\
         ### Additional Environment Variables\n\
         {env_vars}\n\
         ### Required Integrations\n\
         {integrations}\n\n\
         ## 📋 MANDATORY INSTRUCTIONS\n\n\
         ⚠️ **IMPORTANT**: Before creating the project you MUST run the `start_from_templates` tool with these parameters:\n\n\
         ```\n\
         start_from_templates({{\n  \
         stack: \"{stack}\",\n  \
         project_name: \"{name}\",\n  \
         domain: \"{domain}\",\n  \
         tools: \"{tools}\",\n  \
         template_type: \"{template}\"\n\
         }})\n\
         ```\n\n\
         That tool generates every base file of the project (package.json, tsconfig.json, src/index.ts, ...) \
         from the \"{template}\" template.\n\n\
         ## 📚 REFERENCE\n\n\
         Use \"MCP_BEST_PRACTICES_GUIDE.md\" as the basis for architecture, best practices and technical configuration.\n\n\
         ## 📋 IMPLEMENTATION REQUIREMENTS\n\n\
         1. **Run start_from_templates FIRST** - Generates the base structure\n\
         2. **Customize tools** - Implement each tool for {domain}\n\
         3. **Clean architecture** - Separate tools, services, utils and config\n\
         4. **Robust validation** - Validate inputs and outputs with Zod\n\
         5. **Error handling** - Detailed logging and exception handling\n\
         6. **Documentation** - Complete README with installation and usage\n\
         7. **Configuration** - .env.example with every required variable\n\n\
         ## ✅ DELIVERABLES\n\n\
         - **Organized file structure** (generated by start_from_templates)\n\
         - **Well-typed TypeScript code** with tools specific to {domain}\n\
         - **Development configuration** (tsconfig.json, package.json)\n\
         - **Complete documentation** with usage examples\n\
         - **Basic tests** to validate behaviour\n\
         - **Environment variables** configured correctly\n\n\
         The project must be ready to use right after `pnpm install`.\n\n\
         ## 🎯 WORKFLOW\n\n\
         1. **RUN start_from_templates** → Generates base files\n\
         2. **Customize tools** → Implement the {domain} logic\n\
         3. **Validate and test** → Make sure everything works\n\
         4. **Document** → Complete README and examples",
        name = config.project_name,
        stack_upper = stack.to_uppercase(),
        tools = plan.tools_text,
    );

    format!(
        "🚀 **Project Prompt Generated**\n\n\
         {prompt}\n\n\
         ---\n\n\
         ## 📋 Configuration Summary\n\n\
         - **Project**: {name}\n\
         - **Domain**: {domain}\n\
         - **Stack**: {stack_upper}\n\
         - **Template**: {template}\n\
         - **Tools**: {tool_count} tools defined\n\n\
         ## ⚡ Mandatory Next Step\n\n\
         The prompt above tells you to run `start_from_templates` first. It generates the base \
         structure of the project from the \"{template}\" template.\n\n\
         **💡 Tip**: Use the full prompt together with MCP_BEST_PRACTICES_GUIDE.md to build your MCP project.",
        name = config.project_name,
        stack_upper = stack.to_uppercase(),
        tool_count = config.tools.len(),
    )
}

/// Detailed bundle listing
pub fn template_listing(summaries: &[TemplateSummary]) -> String {
    let entries = summaries
        .iter()
        .map(|t| {
            let tags = if t.tags.is_empty() {
                "none".to_string()
            } else {
                t.tags.join(", ")
            };
            format!(
                "## 📦 {}\n**Description**: {}\n**Category**: {}\n**Tags**: {}",
                t.name, t.description, t.category, tags
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let example = summaries
        .first()
        .map(|t| t.name.as_str())
        .unwrap_or(TemplateKind::Basic.as_str());

    format!(
        "📋 **Available MCP Templates**\n\n\
         Found **{count}** templates:\n\n\
         {entries}\n\n\
         ## 🚀 Usage\n\n\
         Pass the template name as `template_type` to `start_from_templates` or `execute_create_project`:\n\n\
         ```\n\
         start_from_templates({{\n  \
         project_name: \"my-project\",\n  \
         domain: \"My domain\",\n  \
         tools: \"tool1, tool2\",\n  \
         template_type: \"{example}\"\n\
         }})\n\
         ```",
        count = summaries.len(),
    )
}

/// Bare bundle name listing
pub fn template_names(names: &[String]) -> String {
    let entries = names
        .iter()
        .map(|name| format!("- `{name}`"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "📋 **Available Templates**\n\n{entries}\n\nTotal: **{}** templates",
        names.len()
    )
}

/// Stack catalog listing
pub fn stack_listing(stacks: &[StackInfo], detailed: bool) -> String {
    if !detailed {
        let entries = stacks
            .iter()
            .map(|s| format!("- `{}` ({})", s.name, s.status))
            .collect::<Vec<_>>()
            .join("\n");
        return format!(
            "📚 **Available Stacks**\n\n{entries}\n\nTotal: **{}** stacks",
            stacks.len()
        );
    }

    let entries = stacks
        .iter()
        .map(|s| {
            format!(
                "## 🎮 {}\n**Status**: {}\n**Description**: {}\n**Templates**: {}\n**Tools**: {} tools available",
                s.name.to_uppercase(),
                s.status,
                s.description,
                s.templates.join(", "),
                s.tools
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let example = stacks.first().map(|s| s.name).unwrap_or("mcp");

    format!(
        "📚 **Available Stacks**\n\n\
         Found **{count}** stacks:\n\n\
         {entries}\n\n\
         ## 🚀 Usage\n\n\
         To create a project, call:\n\n\
         ```\n\
         create_project({{\n  \
         stack: \"{example}\",\n  \
         mode: \"agent\" // or \"interactive\" or \"quick\"\n\
         }})\n\
         ```",
        count = stacks.len(),
    )
}

/// Agent-mode banner around the rendered assistant prompt
pub fn agent_banner(stack: &str, prompt: &str) -> String {
    format!(
        "🤖 **Agent Mode Enabled**\n\n\
         You picked agent mode to create a {} project.\n\n\
         {prompt}\n\n\
         Tell me what kind of project you want to build and I will help you configure it step by step.",
        stack.to_uppercase()
    )
}

/// Guidance after a successful elicitation
pub fn elicited_guidance(
    mode: CreationMode,
    stack: &str,
    project: &ElicitedProject,
    template: TemplateKind,
) -> String {
    let (title, domain_label, tools_label) = match mode {
        CreationMode::Quick => ("⚡ **Quick Mode - Express Setup**", "Project", "Features"),
        _ => ("📋 **Interactive Mode - Setup Complete**", "Domain", "Tools"),
    };

    format!(
        "{title}\n\n\
         Your MCP project is configured:\n\n\
         🎯 **Name**: {name}\n\
         🎯 **{domain_label}**: {domain}\n\
         🛠️ **{tools_label}**: {tools}\n\n\
         Now call `execute_create_project` with these parameters:\n\n\
         - stack: \"{stack}\"\n\
         - project_name: \"{name}\"\n\
         - domain: \"{domain}\"\n\
         - tools: \"{tools}\"\n\
         - template_type: \"{template}\"\n\n\
         It generates a project prompt that includes instructions to run `start_from_templates` first.",
        name = project.project_name,
        domain = project.domain,
        tools = project.tools,
    )
}

/// User message of the `generate_prompt_project` prompt
pub fn project_prompt_message(stack: &str, mode: &str) -> String {
    format!(
        "Create a {} project in {mode} mode. Use the create_project tool with stack=\"{stack}\" \
         and mode=\"{mode}\" to start the creation process.",
        stack.to_uppercase()
    )
}
