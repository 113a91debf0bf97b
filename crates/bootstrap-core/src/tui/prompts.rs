//! Charm-style CLI prompts using cliclack

use crate::operations::{BootstrapService, CommittedProject, ProjectPlan, ProjectRequest};
use crate::templates::bundle::PLACEHOLDER_DESCRIPTION;
use crate::templates::{TemplateKind, TemplateStore, TemplateSummary};
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// Value used in the template picker for "let the selector decide"
const AUTO_TEMPLATE: &str = "auto";

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project display name
    pub project_name: Option<String>,

    /// What the project is for
    pub domain: Option<String>,

    /// Comma-separated tool names
    pub tools: Option<String>,

    /// Template identifier; auto-selected when absent
    pub template: Option<String>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Create a project locally with interactive prompts
pub async fn run(service: &BootstrapService, args: CreateArgs) -> Result<()> {
    cliclack::intro("Bootstrap MCP")?;

    let project_name = ask_field(
        args.project_name,
        "Project name",
        "weather-assistant",
        args.yes,
    )?;
    let domain = ask_field(args.domain, "Project domain", "Weather forecasts", args.yes)?;
    let tools = ask_field(args.tools, "Tools (comma-separated)", "get_forecast, get_alerts", args.yes)?;

    let template = select_template(service.templates(), args.template, args.yes).await?;

    let mut request = ProjectRequest::new(&project_name, &domain, &tools);
    request.template_type = template;
    let plan = ProjectPlan::from_request(&request)?;
    cliclack::log::info(format!("Using template: {}", plan.template))?;

    confirm_directory(&service.settings().project_dir(&plan.config.kebab_case_name), args.yes)?;

    let project = create_project(service, &plan).await?;
    print_next_steps(&project)?;

    Ok(())
}

fn ask_field(value: Option<String>, prompt: &str, placeholder: &str, yes: bool) -> Result<String> {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        cliclack::log::info(format!("{}: {}", prompt, value))?;
        return Ok(value);
    }

    if yes {
        anyhow::bail!("{} is required in --yes mode", prompt);
    }

    let input: String = cliclack::input(prompt)
        .placeholder(placeholder)
        .validate(|input: &String| {
            if input.trim().is_empty() {
                Err("Please enter a value")
            } else {
                Ok(())
            }
        })
        .interact()?;
    Ok(input)
}

async fn select_template(
    store: &TemplateStore,
    specified: Option<String>,
    yes: bool,
) -> Result<Option<String>> {
    if let Some(name) = specified {
        // Fail early with the list of supported identifiers
        name.parse::<TemplateKind>().map_err(anyhow::Error::msg)?;
        return Ok(Some(name));
    }
    if yes {
        return Ok(None);
    }

    let spinner = cliclack::spinner();
    spinner.start("Loading templates...");
    let summaries = store.list_with_info().await;
    spinner.stop("Templates loaded");

    let mut select = cliclack::select("Select a template").item(
        AUTO_TEMPLATE.to_string(),
        "Automatic",
        "Pick from the domain and tools",
    );
    for summary in selectable(&summaries) {
        select = select.item(summary.name.clone(), &summary.name, &summary.description);
    }

    let selected: String = select.interact()?;
    Ok((selected != AUTO_TEMPLATE).then_some(selected))
}

/// Bundles that loaded cleanly and that generation accepts
fn selectable(summaries: &[TemplateSummary]) -> impl Iterator<Item = &TemplateSummary> {
    summaries.iter().filter(|summary| {
        summary.description != PLACEHOLDER_DESCRIPTION
            && summary.name.parse::<TemplateKind>().is_ok()
    })
}

fn confirm_directory(path: &Path, yes: bool) -> Result<()> {
    if !path.is_dir() {
        return Ok(());
    }

    let count = std::fs::read_dir(path).map(|entries| entries.count()).unwrap_or(0);
    if count == 0 {
        return Ok(());
    }

    cliclack::log::warning(format!(
        "{} already has {} items; generated files will overwrite existing ones",
        path.display(),
        count
    ))?;

    let confirm = if yes {
        true
    } else {
        cliclack::confirm("Continue anyway?")
            .initial_value(true)
            .interact()?
    };

    if !confirm {
        anyhow::bail!("Setup cancelled.");
    }
    Ok(())
}

async fn create_project(service: &BootstrapService, plan: &ProjectPlan) -> Result<CommittedProject> {
    println!();
    println!("  {}", "Creating project...".dimmed());

    let project = service.materialize(plan).await?;
    for path in project.files.keys() {
        println!("    {} {}", "└".dimmed(), path);
    }

    println!();
    println!(
        "  {} {} {}",
        "◆".blue().bold(),
        "Project created".bold(),
        format!("({} files in {})", project.files.len(), project.dir.display()).dimmed()
    );

    Ok(project)
}

/// Shell commands suggested after generation
fn next_steps(project: &CommittedProject) -> Vec<String> {
    let mut steps = Vec::new();

    // cd to directory if not current
    let current = std::env::current_dir().ok();
    if current.as_deref() != Some(project.dir.as_path()) {
        steps.push(format!("cd {}", project.dir.display()));
    }

    steps.push("pnpm install".to_string());
    steps.push("pnpm run build".to_string());
    steps.push("pnpm run inspector".to_string());
    steps
}

fn print_next_steps(project: &CommittedProject) -> Result<()> {
    println!();
    println!("  {}", "Next steps".bold());
    println!();

    for (i, step) in next_steps(project).iter().enumerate() {
        println!("  {}  {}", format!("{}.", i + 1).dimmed(), step);
    }

    println!();
    cliclack::outro("Happy coding!")?;
    Ok(())
}

/// Print every bundle with its display metadata
pub async fn print_templates(store: &TemplateStore) -> Result<()> {
    let summaries = store.list_with_info().await;
    if summaries.is_empty() {
        anyhow::bail!("No templates found in {}", store.root().display());
    }

    println!();
    println!("  {}  {}", "◆".blue().bold(), "Available templates".bold());
    println!();

    for summary in &summaries {
        println!(
            "  {} {} {}",
            "●".blue(),
            summary.name.bold(),
            format!("- {}", summary.description).dimmed()
        );
        let tags = if summary.tags.is_empty() {
            "none".to_string()
        } else {
            summary.tags.join(", ")
        };
        println!(
            "    {} category: {}, tags: {}",
            "└".dimmed(),
            summary.category.cyan(),
            tags
        );
    }
    println!();

    Ok(())
}
