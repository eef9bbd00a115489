//! openclaw-tools-mcp: MCP stdio bridge to the OpenClaw gateway.
//!
//! Usage:
//!   openclaw-tools-mcp                 Serve MCP over stdin/stdout
//!   openclaw-tools-mcp tools           Print the tool catalog
//!   openclaw-tools-mcp call NAME ARGS  Run one tool call and print the result
//!   openclaw-tools-mcp config          Show the resolved configuration
//!   openclaw-tools-mcp init-config     Write a default config file

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use openclaw_tools_mcp::config::{self, BridgeConfig};
use openclaw_tools_mcp::gateway::GatewayClient;
use openclaw_tools_mcp::mcp::McpServer;
use openclaw_tools_mcp::tools::ToolRegistry;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "openclaw-tools-mcp")]
#[command(version)]
#[command(about = "MCP server exposing OpenClaw gateway tools (cron, memory)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the TOML config file.
    #[arg(long)]
    config: Option<String>,

    /// Gateway base URL (overrides config and OPENCLAW_GATEWAY_URL).
    #[arg(long)]
    gateway_url: Option<String>,

    /// Gateway bearer token (overrides config and OPENCLAW_GATEWAY_TOKEN).
    #[arg(long)]
    token: Option<String>,

    /// Gateway request timeout in seconds (at least 1).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Log level (debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve MCP over stdin/stdout (default).
    Serve,

    /// Print the tool catalog as JSON.
    Tools,

    /// Run a single tool call through the gateway.
    Call {
        /// Tool name (cron, memory_search, memory_get).
        name: String,

        /// Arguments as a JSON object.
        #[arg(default_value = "{}")]
        args: String,
    },

    /// Show the resolved configuration.
    Config,

    /// Write a default config file to the config path.
    InitConfig,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    config::load_dotenv();
    let config_path = cli
        .config
        .as_deref()
        .map(config::expand_path)
        .unwrap_or_else(config::default_config_path);
    let cfg = resolve_config(&cli, &config_path)?;

    // Initialize logging (stderr: stdout carries the protocol)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cmd_serve(&cfg).await,
        Commands::Tools => cmd_tools(&cfg),
        Commands::Call { name, args } => cmd_call(&cfg, &name, &args).await,
        Commands::Config => cmd_config(&cfg, &config_path),
        Commands::InitConfig => cmd_init_config(&config_path),
    }
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

async fn cmd_serve(cfg: &BridgeConfig) -> Result<()> {
    let gateway = Arc::new(GatewayClient::from_config(cfg));
    let mut server = McpServer::new(ToolRegistry::new(gateway.clone()));

    info!("Serving OpenClaw tools over stdio (gateway: {})", cfg.gateway_url);

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        info!("Shutdown signal received");
        signal_cancel.cancel();
    });

    let result = server
        .serve(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            cancel,
        )
        .await;

    gateway.close().await;
    info!("MCP session ended after {} messages", server.handled());
    result
}

fn cmd_tools(cfg: &BridgeConfig) -> Result<()> {
    let registry = ToolRegistry::new(Arc::new(GatewayClient::from_config(cfg)));
    let catalog = serde_json::to_string_pretty(&registry.list_tools())
        .context("Failed to serialize tool catalog")?;
    println!("{catalog}");
    Ok(())
}

async fn cmd_call(cfg: &BridgeConfig, name: &str, args: &str) -> Result<()> {
    let arguments: Map<String, Value> = match serde_json::from_str(args)
        .with_context(|| format!("Arguments are not valid JSON: {args}"))?
    {
        Value::Object(map) => map,
        other => bail!("Arguments must be a JSON object, got: {other}"),
    };

    let gateway = Arc::new(GatewayClient::from_config(cfg));
    let server = McpServer::new(ToolRegistry::new(gateway.clone()));
    let result = server.call_tool(name, arguments).await;
    gateway.close().await;

    let text = result["content"][0]["text"].as_str().unwrap_or_default();
    if result["isError"].as_bool().unwrap_or(false) {
        eprintln!("{}", text.red());
        std::process::exit(1);
    }
    println!("{text}");
    Ok(())
}

fn cmd_config(cfg: &BridgeConfig, config_path: &Path) -> Result<()> {
    let file_state = if config_path.exists() {
        "loaded".green()
    } else {
        "not found, using defaults".yellow()
    };

    println!();
    println!("{}", "=== OpenClaw Tools MCP Config ===".bold());
    println!();
    println!("  {}:  {} ({})", "File".bold(), config_path.display(), file_state);
    println!();
    println!("  {}:", "Gateway".bold());
    println!("    URL:      {}", cfg.gateway_url);
    println!("    Token:    {}", cfg.masked_token());
    println!("    Timeout:  {}s", cfg.timeout_secs);
    println!();
    println!("  {}:  {}", "Log level".bold(), cfg.log_level);
    println!();
    Ok(())
}

fn cmd_init_config(config_path: &Path) -> Result<()> {
    config::save_config(&BridgeConfig::default(), config_path)?;
    println!(
        "{} Wrote config to {}",
        ">>>".green().bold(),
        config_path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Defaults, then the config file, then the environment, then CLI flags.
fn resolve_config(cli: &Cli, config_path: &Path) -> Result<BridgeConfig> {
    let mut cfg = config::load_config(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    config::apply_env(&mut cfg)?;

    if let Some(url) = &cli.gateway_url {
        cfg.gateway_url = url.clone();
    }
    if let Some(token) = &cli.token {
        cfg.gateway_token = token.clone();
    }
    if let Some(timeout) = cli.timeout {
        cfg.timeout_secs = timeout;
    }
    if let Some(level) = &cli.log_level {
        cfg.log_level = level.clone();
    }
    Ok(cfg)
}
