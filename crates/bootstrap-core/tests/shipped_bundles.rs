//! Generation against the bundles and prompts shipped in `stacks/mcp`

use bootstrap_core::elicitation::{
    ElicitationAction, ElicitationRequest, ElicitationResponse, Elicitor, NoElicitation,
};
use bootstrap_core::{
    BootstrapService, ElicitationError, ProjectRequest, Settings, TemplateKind, TemplateStore,
};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

fn resources_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../stacks/mcp")
}

fn service(output: &Path) -> BootstrapService {
    let mut settings = Settings::with_resources_dir(resources_dir());
    settings.output_dir = output.to_path_buf();
    BootstrapService::new(settings)
}

struct Answers;

impl Elicitor for Answers {
    async fn elicit(
        &self,
        _request: ElicitationRequest,
    ) -> Result<ElicitationResponse, ElicitationError> {
        Ok(ElicitationResponse {
            action: ElicitationAction::Accept,
            content: json!({
                "project_name": "Repo Stats",
                "domain": "GitHub API statistics",
                "tools": "list_repos, get_stars"
            })
            .as_object()
            .cloned(),
        })
    }
}

#[tokio::test]
async fn test_every_shipped_template_loads() {
    let store = TemplateStore::new(resources_dir().join("templates"));
    let names = store.list().await;
    for kind in TemplateKind::ALL {
        assert!(names.iter().any(|n| n == kind.as_str()), "missing {kind}");
        let bundle = store.get(kind.as_str()).await.unwrap();
        assert_eq!(bundle.name, kind.as_str());
        assert!(!bundle.description.is_empty());
        assert!(bundle.files.contains_key("src/index.ts"));
        assert!(bundle.files.values().all(|entry| entry.content().is_some()));
    }
}

#[tokio::test]
async fn test_basic_project_has_no_placeholders_left() {
    let out = tempfile::tempdir().unwrap();
    let service = service(out.path());

    let output = service
        .start_from_templates(&ProjectRequest::new(
            "Notes Keeper",
            "personal notes",
            "add_note, search_notes",
        ))
        .await;
    assert!(!output.is_error, "{}", output.text);
    assert!(output.text.contains("### `package.json`"));

    let project = out.path().join("notes-keeper");
    for entry in walkdir(&project) {
        let content = fs::read_to_string(&entry).unwrap();
        assert!(!content.contains("{{"), "placeholder left in {}", entry.display());
    }

    let package: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(project.join("package.json")).unwrap()).unwrap();
    assert_eq!(package["name"], "notes-keeper");

    let tools = fs::read_to_string(project.join("src/mcp-tools.ts")).unwrap();
    assert_eq!(tools.matches("inputSchema").count(), 2);
    assert!(tools.contains("\t{ name: 'search_notes'"));
}

#[tokio::test]
async fn test_api_template_adds_client_files() {
    let out = tempfile::tempdir().unwrap();
    let output = service(out.path())
        .start_from_templates(&ProjectRequest::new("Weather", "weather api", "forecast"))
        .await;
    assert!(!output.is_error, "{}", output.text);
    assert!(output.text.contains("api-integration-mcp"));

    let project = out.path().join("weather");
    assert!(project.join("src/api-client.ts").is_file());
    let env = fs::read_to_string(project.join(".env.example")).unwrap();
    assert!(env.contains("API_KEY="));
}

#[tokio::test]
async fn test_http_document_lists_http_settings() {
    let out = tempfile::tempdir().unwrap();
    let output = service(out.path())
        .execute_create_project(
            &ProjectRequest::new("Dashboard", "web dashboard", "get_metrics")
                .with_template(TemplateKind::Http),
        )
        .await;
    assert!(!output.is_error, "{}", output.text);
    assert!(output.text.contains("`MCP_PORT`"));
    assert!(output.text.contains("`MCP_BEARER`"));
    assert!(output.text.contains("HTTP/SSE"));
}

#[tokio::test]
async fn test_agent_mode_uses_shipped_assistant_prompt() {
    let out = tempfile::tempdir().unwrap();
    let output = service(out.path())
        .create_project(Some("mcp"), Some("agent"), &NoElicitation)
        .await;
    assert!(!output.is_error, "{}", output.text);
    assert!(output.text.contains("new **mcp** project"));
    assert!(!output.text.contains("not available yet"));
    assert!(!output.text.contains("---\nname:"));
}

#[tokio::test]
async fn test_interactive_mode_appends_brief() {
    let out = tempfile::tempdir().unwrap();
    let output = service(out.path())
        .create_project(None, Some("interactivo"), &Answers)
        .await;
    assert!(!output.is_error, "{}", output.text);
    assert!(output.text.contains("template_type: \"api-integration-mcp\""));
    assert!(output.text.contains("# Repo Stats"));
    assert!(output.text.contains(
        "- `get_stars`: Implement functionality for get_stars in the context of GitHub API statistics"
    ));
    assert!(output.text.contains("extra settings the **api-integration-mcp** template"));
    // Nothing is generated until start_from_templates runs
    assert!(!out.path().join("repo-stats").exists());
}

fn walkdir(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in fs::read_dir(&current).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files
}
