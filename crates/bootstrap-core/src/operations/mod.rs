//! Operation surface
//!
//! Every operation returns a [`ToolOutput`]: either the Markdown payload or
//! a user-facing error text with `is_error` set. Errors raised by inner
//! components are caught here and never reach the transport.

pub mod documents;
pub mod modes;

pub use modes::CreationMode;

use crate::config::Settings;
use crate::elicitation::{ElicitationRequest, ElicitedProject, Elicitor};
use crate::error::ElicitationError;
use crate::prompts::{PromptStore, ASSISTANT_PROMPT, INTERACTIVE_PROMPT};
use crate::stacks::{self, StackInfo};
use crate::templates::{
    commit_files, select_template, ProjectConfig, ProjectGenerator, RequirementFlags,
    TemplateKind, TemplateStore,
};
use anyhow::{anyhow, bail, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Result of an operation, as shown to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Arguments of `start_from_templates` and `execute_create_project`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectRequest {
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub tools: Option<String>,
    #[serde(default)]
    pub template_type: Option<String>,
}

impl ProjectRequest {
    pub fn new(project_name: &str, domain: &str, tools: &str) -> Self {
        Self {
            project_name: Some(project_name.to_string()),
            domain: Some(domain.to_string()),
            tools: Some(tools.to_string()),
            ..Default::default()
        }
    }

    pub fn with_template(mut self, template: TemplateKind) -> Self {
        self.template_type = Some(template.as_str().to_string());
        self
    }
}

/// A validated request, ready for generation
#[derive(Debug, Clone)]
pub struct ProjectPlan {
    pub stack: &'static StackInfo,

    /// Tool list exactly as the caller typed it
    pub tools_text: String,

    pub config: ProjectConfig,

    /// Explicit choice or the selector's pick
    pub template: TemplateKind,
}

impl ProjectPlan {
    /// Check arguments before anything touches disk
    pub fn from_request(request: &ProjectRequest) -> Result<Self> {
        let stack = match request.stack.as_deref() {
            Some(name) => stacks::find_stack(name).ok_or_else(|| {
                let available: Vec<&str> =
                    stacks::available_stacks().iter().map(|s| s.name).collect();
                anyhow!(
                    "Stack '{}' is not available. Available stacks: {}",
                    name,
                    available.join(", ")
                )
            })?,
            None => stacks::default_stack(),
        };

        // Blank values are missing; non-blank values pass through untouched
        let required = |value: &Option<String>| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
        };
        let (Some(project_name), Some(domain), Some(tools)) = (
            required(&request.project_name),
            required(&request.domain),
            required(&request.tools),
        ) else {
            bail!("Missing required parameters: project_name, domain, tools");
        };

        let config = ProjectConfig::new(&project_name, &domain, &tools);
        if config.kebab_case_name.is_empty() {
            bail!(
                "Project name '{}' has no letters or digits to build a directory name from",
                project_name
            );
        }

        let template = match request.template_type.as_deref() {
            Some(explicit) => explicit.parse::<TemplateKind>().map_err(|e| anyhow!(e))?,
            None => select_template(RequirementFlags::from_text(&tools, &domain)),
        };

        Ok(Self {
            stack,
            tools_text: tools,
            config,
            template,
        })
    }
}

/// A project written to disk
#[derive(Debug, Clone)]
pub struct CommittedProject {
    pub dir: PathBuf,

    /// Relative path -> written content
    pub files: BTreeMap<String, String>,
}

/// The five project-bootstrapping operations plus the project prompt
#[derive(Debug, Clone)]
pub struct BootstrapService {
    settings: Settings,
    generator: ProjectGenerator,
    prompts: PromptStore,
}

impl BootstrapService {
    /// Build stores from the configured directories
    pub fn new(settings: Settings) -> Self {
        let templates = TemplateStore::from_settings(&settings);
        let prompts = PromptStore::from_settings(&settings);
        Self::with_stores(settings, templates, prompts)
    }

    pub fn with_stores(settings: Settings, templates: TemplateStore, prompts: PromptStore) -> Self {
        info!(
            templates = %templates.root().display(),
            prompts = prompts.len(),
            "Bootstrap service ready"
        );
        Self {
            settings,
            generator: ProjectGenerator::new(templates),
            prompts,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn templates(&self) -> &TemplateStore {
        self.generator.store()
    }

    pub fn prompts(&self) -> &PromptStore {
        &self.prompts
    }

    /// Start project creation in the requested mode
    ///
    /// Structured modes fall back to agent mode when elicitation fails for
    /// any reason, including the configured timeout.
    pub async fn create_project<E: Elicitor>(
        &self,
        stack: Option<&str>,
        mode: Option<&str>,
        elicitor: &E,
    ) -> ToolOutput {
        let stack = stack.unwrap_or(stacks::default_stack().name);
        debug!(stack = %stack, mode = ?mode, "create_project called");

        let stack = match stacks::validate_stack(stack) {
            Ok(info) => info.name,
            Err(message) => return ToolOutput::error(message),
        };

        let mode = mode.map(CreationMode::normalize).unwrap_or_default();
        debug!(mode = %mode, "Normalized mode");

        let result = if mode.uses_elicitation() {
            self.elicitation_mode(mode, stack, elicitor).await
        } else {
            self.agent_mode(stack)
        };

        result.map(ToolOutput::success).unwrap_or_else(|e| {
            error!(error = %e, "Error in create_project");
            ToolOutput::error(format!("❌ Error creating project: {e}"))
        })
    }

    fn agent_mode(&self, stack: &str) -> Result<String> {
        debug!("Activating agent mode");
        let args = BTreeMap::from([("stack".to_string(), stack.to_string())]);
        let prompt = self.prompts.render(ASSISTANT_PROMPT, &args)?;
        Ok(documents::agent_banner(stack, &prompt))
    }

    async fn elicitation_mode<E: Elicitor>(
        &self,
        mode: CreationMode,
        stack: &str,
        elicitor: &E,
    ) -> Result<String> {
        debug!(mode = %mode, "Activating structured mode");
        match self.elicit_project(mode, elicitor).await {
            Ok(project) => {
                debug!(project = ?project, "Elicited project details");
                let template = select_template(RequirementFlags::from_text(
                    &project.tools,
                    &project.domain,
                ));
                let mut text = documents::elicited_guidance(mode, stack, &project, template);
                if let Some(brief) = self.interactive_brief(&project, template) {
                    text.push_str("\n\n---\n\n");
                    text.push_str(&brief);
                }
                Ok(text)
            }
            Err(e) => {
                warn!(error = %e, "Elicitation failed, switching to agent mode");
                self.agent_mode(stack)
            }
        }
    }

    /// Implementation brief from the interactive prompt fragment, when installed
    fn interactive_brief(&self, project: &ElicitedProject, template: TemplateKind) -> Option<String> {
        self.prompts.get(INTERACTIVE_PROMPT)?;
        let args = BTreeMap::from([
            ("project_name".to_string(), project.project_name.clone()),
            ("domain".to_string(), project.domain.clone()),
            ("tools".to_string(), project.tools.clone()),
            ("template_type".to_string(), template.as_str().to_string()),
        ]);
        self.prompts.render(INTERACTIVE_PROMPT, &args).ok()
    }

    async fn elicit_project<E: Elicitor>(
        &self,
        mode: CreationMode,
        elicitor: &E,
    ) -> Result<ElicitedProject, ElicitationError> {
        let request = match mode {
            CreationMode::Quick => ElicitationRequest::project_details(
                "Quick setup - just the essentials:",
                [
                    ("Project Name", "Project name (no spaces)"),
                    ("Project Type", "Briefly describe your project"),
                    ("Basic Features", "Main features, comma-separated"),
                ],
            ),
            _ => ElicitationRequest::project_details(
                "Configure the details of your MCP project:",
                [
                    ("Project Name", "Project name (no spaces, use kebab-case)"),
                    ("Project Domain", "Describe what kind of project you want to build"),
                    ("Tools", "List the features, comma-separated"),
                ],
            ),
        };

        let timeout = self.settings.elicitation_timeout;
        let response = tokio::time::timeout(timeout, elicitor.elicit(request))
            .await
            .map_err(|_| ElicitationError::Timeout)??;
        ElicitedProject::try_from(response)
    }

    /// Render the selected bundle and write it under the output directory
    pub async fn start_from_templates(&self, request: &ProjectRequest) -> ToolOutput {
        debug!(request = ?request, "start_from_templates called");
        match self.generate_and_commit(request).await {
            Ok(text) => ToolOutput::success(text),
            Err(e) => {
                error!(error = %e, "Error in start_from_templates");
                ToolOutput::error(format!("❌ Error generating base files: {e:#}"))
            }
        }
    }

    async fn generate_and_commit(&self, request: &ProjectRequest) -> Result<String> {
        let plan = ProjectPlan::from_request(request)?;
        let project = self.materialize(&plan).await?;
        Ok(documents::generation_report(&plan, &project.dir, &project.files))
    }

    /// Generate the planned bundle and commit it under the output directory
    pub async fn materialize(&self, plan: &ProjectPlan) -> Result<CommittedProject> {
        info!(template = %plan.template, "Using template");

        let result = self
            .generator
            .generate(plan.template.as_str(), &plan.config)
            .await;
        if !result.success {
            bail!(result
                .error
                .unwrap_or_else(|| "Failed to generate project".to_string()));
        }

        let dir = self.settings.project_dir(&plan.config.kebab_case_name);
        info!(path = %dir.display(), "Creating project directory");
        commit_files(&dir, &result.files)
            .await
            .map_err(|e| anyhow!("Error writing files: {e:#}"))?;

        Ok(CommittedProject {
            dir,
            files: result.files,
        })
    }

    /// Compose the instruction document for the agent
    pub async fn execute_create_project(&self, request: &ProjectRequest) -> ToolOutput {
        debug!(request = ?request, "execute_create_project called");
        match self.plan_document(request).await {
            Ok(text) => ToolOutput::success(text),
            Err(e) => {
                error!(error = %e, "Error in execute_create_project");
                ToolOutput::error(format!("❌ Error generating project prompt: {e:#}"))
            }
        }
    }

    async fn plan_document(&self, request: &ProjectRequest) -> Result<String> {
        let plan = ProjectPlan::from_request(request)?;
        self.templates()
            .get(plan.template.as_str())
            .await
            .map_err(|_| anyhow!("Template '{}' not found", plan.template))?;
        Ok(documents::instruction_document(&plan))
    }

    /// List bundles, with display metadata when `detailed`
    pub async fn list_templates(&self, detailed: bool) -> ToolOutput {
        debug!(detailed, "list_templates called");
        let text = if detailed {
            let summaries = self.templates().list_with_info().await;
            if summaries.is_empty() {
                None
            } else {
                Some(documents::template_listing(&summaries))
            }
        } else {
            let names = self.templates().list().await;
            if names.is_empty() {
                None
            } else {
                Some(documents::template_names(&names))
            }
        };

        text.map(ToolOutput::success)
            .unwrap_or_else(|| ToolOutput::error("❌ No templates found."))
    }

    /// Describe the stack catalog
    pub fn list_stacks(&self, detailed: bool) -> ToolOutput {
        debug!(detailed, "list_stacks called");
        ToolOutput::success(documents::stack_listing(stacks::available_stacks(), detailed))
    }

    /// User message for the `generate_prompt_project` prompt
    pub fn generate_prompt_project(&self, stack: Option<&str>, mode: Option<&str>) -> String {
        let stack = stack.unwrap_or(stacks::default_stack().name);
        let mode = mode.unwrap_or(CreationMode::default().as_str());
        documents::project_prompt_message(stack, mode)
    }
}
