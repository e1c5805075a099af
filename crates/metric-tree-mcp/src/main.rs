//! Metric Trees MCP Server
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration (stdio transport)
//! metric-tree-mcp
//!
//! # Run with custom config
//! metric-tree-mcp --config /path/to/config.toml
//!
//! # Run with TCP transport on custom port
//! metric-tree-mcp --transport tcp --port 4000
//!
//! # Environment variable override (used if CLI not specified)
//! METRIC_TREES_TRANSPORT=tcp metric-tree-mcp
//!
//! # Run in debug mode
//! RUST_LOG=debug metric-tree-mcp
//! ```
//!
//! CLI arguments > Environment variables > Config file > Defaults

use std::env;
use std::io;
use std::path::PathBuf;

use anyhow::Result;
use metric_tree_core::config::LoggingConfig;
use metric_tree_core::Config;
use metric_tree_mcp::{McpServer, TransportMode};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const ENV_TRANSPORT: &str = "METRIC_TREES_TRANSPORT";
const ENV_TCP_PORT: &str = "METRIC_TREES_TCP_PORT";
const ENV_BIND_ADDRESS: &str = "METRIC_TREES_BIND_ADDRESS";

// ============================================================================
// CLI Argument Parsing
// ============================================================================

#[derive(Debug, Default)]
struct CliArgs {
    config_path: Option<PathBuf>,
    transport: Option<String>,
    port: Option<u16>,
    bind_address: Option<String>,
    help: bool,
}

impl CliArgs {
    /// Supports: --config, --transport, --port, --bind, --help, -h
    fn parse() -> Result<Self> {
        Self::parse_from(env::args().skip(1))
    }

    fn parse_from(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut cli = CliArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| anyhow::anyhow!("{} requires a value", flag))
            };
            match arg.as_str() {
                "--help" | "-h" => cli.help = true,
                "--config" => cli.config_path = Some(PathBuf::from(value("--config")?)),
                "--transport" => cli.transport = Some(value("--transport")?),
                "--port" => {
                    let raw = value("--port")?;
                    let port = raw
                        .parse::<u16>()
                        .map_err(|e| anyhow::anyhow!("Invalid --port '{}': {}", raw, e))?;
                    cli.port = Some(port);
                }
                "--bind" => cli.bind_address = Some(value("--bind")?),
                other => return Err(anyhow::anyhow!("Unknown argument '{}'", other)),
            }
        }
        Ok(cli)
    }
}

fn print_help() {
    eprintln!(
        r#"Metric Trees MCP Server

USAGE:
    metric-tree-mcp [OPTIONS]

OPTIONS:
    --config <PATH>      Path to configuration file
    --transport <MODE>   Transport mode: stdio (default) or tcp
    --port <PORT>        TCP port (only used with --transport tcp)
    --bind <ADDRESS>     TCP bind address (default: 127.0.0.1)
    --help, -h           Show this help message

ENVIRONMENT VARIABLES:
    METRIC_TREES_TRANSPORT      Transport mode (stdio|tcp)
    METRIC_TREES_TCP_PORT       TCP port number
    METRIC_TREES_BIND_ADDRESS   TCP bind address
    METRIC_TREES_ENV            Config profile loaded after config/default.toml
    METRIC_TREES__<SECTION>__<KEY>  Any config value, e.g. METRIC_TREES__RETRIEVAL__PROVIDER=qdrant
    QDRANT_URL, QDRANT_API_KEY, QDRANT_COLLECTION
    RUST_LOG                    Log filter (overrides logging.level)

PRIORITY:
    CLI arguments > Environment variables > Config file > Defaults
"#
    );
}

fn apply_overrides(config: &mut Config, cli: &CliArgs) -> Result<()> {
    if let Some(port) = cli.port {
        info!("CLI override: tcp_port = {}", port);
        config.mcp.tcp_port = port;
    } else if let Ok(raw) = env::var(ENV_TCP_PORT) {
        config.mcp.tcp_port = raw
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("Invalid {}='{}': {}", ENV_TCP_PORT, raw, e))?;
        info!("ENV override: tcp_port = {}", config.mcp.tcp_port);
    }

    if let Some(ref bind) = cli.bind_address {
        info!("CLI override: bind_address = {}", bind);
        config.mcp.bind_address = bind.clone();
    } else if let Ok(bind) = env::var(ENV_BIND_ADDRESS) {
        info!("ENV override: bind_address = {}", bind);
        config.mcp.bind_address = bind;
    }

    if let Some(ref transport) = cli.transport {
        info!("CLI override: transport = {}", transport);
        config.mcp.transport = transport.clone();
    } else if let Ok(transport) = env::var(ENV_TRANSPORT) {
        info!("ENV override: transport = {}", transport);
        config.mcp.transport = transport;
    }
    Ok(())
}

/// Logs go to stderr; stdout carries JSON-RPC only.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let builder = fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_file(logging.include_location)
        .with_line_number(logging.include_location);

    match logging.format.as_str() {
        "json" => builder.json().init(),
        "compact" => builder.compact().init(),
        _ => builder.pretty().init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliArgs::parse()?;
    if cli.help {
        print_help();
        return Ok(());
    }

    let mut config = match cli.config_path {
        Some(ref path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    init_logging(&config.logging);
    info!("Metric Trees MCP Server starting...");
    if let Some(ref path) = cli.config_path {
        info!("Configuration loaded from: {:?}", path);
    }

    apply_overrides(&mut config, &cli)?;
    config.validate()?;

    let transport: TransportMode = config.mcp.transport.parse()?;
    let server = McpServer::new(config)?;

    match transport {
        TransportMode::Stdio => server.run().await,
        TransportMode::Tcp => server.run_tcp().await,
    }
}
