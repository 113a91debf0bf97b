//! MCP server over newline-delimited JSON-RPC
//!
//! The read loop owns the input stream. Requests run on their own tasks so
//! a tool call waiting for an elicitation answer does not block the loop
//! that delivers that answer. Every outgoing message goes through a single
//! writer task.

use crate::jsonrpc::{self, Incoming, RpcError, PARSE_ERROR};
use crate::peer::Peer;
use crate::schema::{
    self, CREATE_PROJECT, EXECUTE_CREATE_PROJECT, GENERATE_PROMPT_PROJECT, LIST_STACKS,
    LIST_TEMPLATES, START_FROM_TEMPLATES,
};
use anyhow::{Context, Result};
use bootstrap_core::{BootstrapService, ProjectRequest, ToolOutput, SERVER_NAME, VERSION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Protocol version answered when the client does not send one
pub const LATEST_PROTOCOL_VERSION: &str = "2025-06-18";

#[derive(Debug, Deserialize)]
struct ToolCall {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct CreateProjectArgs {
    #[serde(default)]
    stack: Option<String>,
    #[serde(default)]
    mode: Option<String>,
}

fn default_detailed() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ListArgs {
    #[serde(default = "default_detailed")]
    detailed: bool,
}

#[derive(Debug, Deserialize)]
struct PromptGet {
    name: String,
    #[serde(default)]
    arguments: HashMap<String, String>,
}

fn parse_params<T: DeserializeOwned>(value: Option<Value>) -> Result<T, RpcError> {
    let value = match value {
        None | Some(Value::Null) => json!({}),
        Some(value) => value,
    };
    serde_json::from_value(value).map_err(|e| RpcError::invalid_params(format!("Invalid params: {e}")))
}

fn tool_result(output: ToolOutput) -> Value {
    json!({
        "content": [{ "type": "text", "text": output.text }],
        "isError": output.is_error,
    })
}

/// Request dispatcher shared by all request tasks
pub struct McpServer {
    service: BootstrapService,
    peer: Peer,
}

impl McpServer {
    pub fn new(service: BootstrapService, peer: Peer) -> Self {
        Self { service, peer }
    }

    /// Dispatch one request to its handler
    pub async fn handle_request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(self.initialize(&params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(schema::tool_list()),
            "tools/call" => self.call_tool(params).await,
            "prompts/list" => Ok(schema::prompt_list()),
            "prompts/get" => self.get_prompt(params),
            other => Err(RpcError::method_not_found(other)),
        }
    }

    fn handle_notification(&self, method: &str) {
        match method {
            "notifications/initialized" => info!("Client ready"),
            "notifications/cancelled" => debug!("Ignoring cancellation"),
            other => debug!(method = %other, "Ignoring notification"),
        }
    }

    fn initialize(&self, params: &Value) -> Value {
        let elicitation = params
            .pointer("/capabilities/elicitation")
            .is_some_and(|v| !v.is_null());
        self.peer.set_elicitation_supported(elicitation);

        let version = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(LATEST_PROTOCOL_VERSION);
        let client = params
            .pointer("/clientInfo/name")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        info!(client, protocol = version, elicitation, "Client connected");

        json!({
            "protocolVersion": version,
            "capabilities": {
                "tools": { "listChanged": false },
                "prompts": { "listChanged": false },
            },
            "serverInfo": { "name": SERVER_NAME, "version": VERSION },
        })
    }

    async fn call_tool(&self, params: Value) -> Result<Value, RpcError> {
        let call: ToolCall = parse_params(Some(params))?;
        debug!(tool = %call.name, arguments = ?call.arguments, "Tool called");

        let output = match call.name.as_str() {
            CREATE_PROJECT => {
                let args: CreateProjectArgs = parse_params(call.arguments)?;
                self.service
                    .create_project(args.stack.as_deref(), args.mode.as_deref(), &self.peer)
                    .await
            }
            START_FROM_TEMPLATES => {
                let request: ProjectRequest = parse_params(call.arguments)?;
                self.service.start_from_templates(&request).await
            }
            EXECUTE_CREATE_PROJECT => {
                let request: ProjectRequest = parse_params(call.arguments)?;
                self.service.execute_create_project(&request).await
            }
            LIST_TEMPLATES => {
                let args: ListArgs = parse_params(call.arguments)?;
                self.service.list_templates(args.detailed).await
            }
            LIST_STACKS => {
                let args: ListArgs = parse_params(call.arguments)?;
                self.service.list_stacks(args.detailed)
            }
            other => return Err(RpcError::invalid_params(format!("Unknown tool: {other}"))),
        };

        Ok(tool_result(output))
    }

    fn get_prompt(&self, params: Value) -> Result<Value, RpcError> {
        let get: PromptGet = parse_params(Some(params))?;
        if get.name != GENERATE_PROMPT_PROJECT {
            return Err(RpcError::invalid_params(format!("Unknown prompt: {}", get.name)));
        }

        let text = self.service.generate_prompt_project(
            get.arguments.get("stack").map(String::as_str),
            get.arguments.get("mode").map(String::as_str),
        );
        Ok(json!({
            "description": "Start the full project creation flow with the assistant",
            "messages": [
                { "role": "user", "content": { "type": "text", "text": text } }
            ],
        }))
    }

    async fn respond(&self, id: Value, method: &str, params: Value) {
        let message = match self.handle_request(method, params).await {
            Ok(result) => jsonrpc::build_response(id, result),
            Err(e) => {
                warn!(method, error = %e, "Request failed");
                jsonrpc::build_error_response(id, e.code, &e.message)
            }
        };
        if let Err(e) = self.peer.send(message) {
            error!(method, error = %e, "Failed to queue response");
        }
    }
}

async fn write_loop<W>(mut writer: W, mut outgoing: mpsc::UnboundedReceiver<Value>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = outgoing.recv().await {
        let mut line = serde_json::to_string(&message)?;
        line.push('\n');
        writer
            .write_all(line.as_bytes())
            .await
            .context("Failed to write message")?;
        writer.flush().await.context("Failed to flush output")?;
    }
    Ok(())
}

/// Serve MCP requests until the input stream closes
pub async fn serve<R, W>(service: BootstrapService, reader: R, writer: W) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let writer_task = tokio::spawn(write_loop(writer, rx));
    let server = Arc::new(McpServer::new(service, Peer::new(tx)));
    let mut tasks = JoinSet::new();

    info!(name = SERVER_NAME, version = VERSION, "MCP server listening on stdio");

    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Unparsable message");
                server
                    .peer
                    .send(jsonrpc::build_error_response(Value::Null, PARSE_ERROR, "Parse error"))?;
                continue;
            }
        };

        match jsonrpc::classify(message) {
            Ok(Incoming::Request { id, method, params }) => {
                let server = Arc::clone(&server);
                tasks.spawn(async move { server.respond(id, &method, params).await });
            }
            Ok(Incoming::Notification { method }) => server.handle_notification(&method),
            Ok(Incoming::Response { id: Some(id), message }) => {
                server.peer.resolve(id, message);
            }
            Ok(Incoming::Response { id: None, .. }) => {
                warn!("Response with a non-numeric id");
            }
            Err(e) => {
                server
                    .peer
                    .send(jsonrpc::build_error_response(Value::Null, e.code, &e.message))?;
            }
        }

        while let Some(finished) = tasks.try_join_next() {
            if let Err(e) = finished {
                error!(error = %e, "Request task failed");
            }
        }
    }

    info!("Input closed, finishing in-flight requests");
    while let Some(finished) = tasks.join_next().await {
        if let Err(e) = finished {
            error!(error = %e, "Request task failed");
        }
    }

    // Dropping the last sender stops the writer
    drop(server);
    writer_task.await.context("Writer task failed")??;
    Ok(())
}
