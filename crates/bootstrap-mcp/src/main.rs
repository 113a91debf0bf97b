//! Bootstrap MCP - project bootstrapping server for MCP clients

mod jsonrpc;
mod peer;
mod schema;
mod server;

use anyhow::Result;
use bootstrap_core::tui::CreateArgs;
use bootstrap_core::{BootstrapService, Settings, SettingsOverrides};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// Log filter for the terminal commands, which print their own output
const TERMINAL_LOG_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[command(name = "bootstrap-mcp")]
#[command(about = "MCP server that bootstraps new MCP projects from template bundles")]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(ClapArgs, Debug, Default)]
pub struct GlobalArgs {
    /// Directory holding one subdirectory per template bundle
    #[arg(long = "templates-dir", global = true)]
    pub templates_dir: Option<PathBuf>,

    /// Directory holding prompt fragments (*.md)
    #[arg(long = "prompts-dir", global = true)]
    pub prompts_dir: Option<PathBuf>,

    /// Directory under which projects are generated
    #[arg(long = "output-dir", global = true)]
    pub output_dir: Option<PathBuf>,

    /// Tracing filter (e.g. info, debug, bootstrap_core=trace)
    #[arg(long = "log-level", global = true)]
    pub log_level: Option<String>,
}

impl From<GlobalArgs> for SettingsOverrides {
    fn from(args: GlobalArgs) -> Self {
        SettingsOverrides {
            templates_dir: args.templates_dir,
            prompts_dir: args.prompts_dir,
            output_dir: args.output_dir,
            log_level: args.log_level,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve MCP over stdio (default)
    Serve,
    /// Create a project locally with interactive prompts
    Create(CliCreateArgs),
    /// List the available template bundles
    Templates,
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Project name
    #[arg(short = 'n', long = "name")]
    pub project_name: Option<String>,

    /// What the project is for
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Comma-separated tool names
    #[arg(long)]
    pub tools: Option<String>,

    /// Template to use (basic-mcp, api-integration-mcp, http-mcp)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            project_name: args.project_name,
            domain: args.domain,
            tools: args.tools,
            template: args.template,
            yes: args.yes,
        }
    }
}

async fn run_server(settings: Settings) -> Result<()> {
    bootstrap_core::logging::init(&settings.log_level)?;

    ctrlc::set_handler(move || {
        info!("Shutting down");
        std::process::exit(0);
    })
    .ok();

    let service = BootstrapService::new(settings);
    server::serve(service, tokio::io::stdin(), tokio::io::stdout()).await
}

fn init_terminal(log_level: Option<&str>) -> Result<()> {
    bootstrap_core::logging::init(log_level.unwrap_or(TERMINAL_LOG_LEVEL))?;

    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = args.global.log_level.clone();
    let settings = Settings::load().with_overrides(args.global.into());

    match args.command {
        None | Some(Command::Serve) => run_server(settings).await,
        Some(Command::Create(create_args)) => {
            init_terminal(log_level.as_deref())?;
            let service = BootstrapService::new(settings);
            let result = bootstrap_core::run(&service, create_args.into()).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
        Some(Command::Templates) => {
            init_terminal(log_level.as_deref())?;
            let service = BootstrapService::new(settings);
            bootstrap_core::tui::print_templates(service.templates()).await
        }
    }
}
