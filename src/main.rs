//! GNOSIS - Gnoseological Analysis Server
//!
//! Entry point for the MCP server (stdio or HTTP/SSE) and a few offline
//! commands for inspecting the diagnosticators.

use clap::{Parser, Subcommand};
use gnosis_core::{
    api::{ApiServer, ApiServerConfig},
    error::Result,
    ontology::glossary,
    pathology::DiagnosticatorResult,
    CulturalPathologist, GnosisConfig, GnosisError, McpServer, ToolHandler,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, Level};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(name = "gnosis")]
#[command(about = "Gnoseological analysis and cultural pathology MCP server", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Configuration file (overrides GNOSIS_CONFIG)
    #[arg(short, long, env = "GNOSIS_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server (stdio mode)
    Serve {
        /// Also start the HTTP/SSE server
        #[arg(long)]
        with_http: bool,

        /// HTTP address (overrides the configured one)
        #[arg(long)]
        addr: Option<String>,
    },

    /// Start MCP server over HTTP/SSE
    Http {
        /// Server address (overrides the configured one)
        #[arg(long)]
        addr: Option<String>,
    },

    /// Diagnose a text with the registered diagnosticators
    Diagnose {
        /// Text to analyse
        text: String,

        /// Only run one layer (group number)
        #[arg(short, long, conflicts_with = "author")]
        layer: Option<u8>,

        /// Only run the diagnosticator whose name contains this
        #[arg(short, long)]
        author: Option<String>,

        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List registered diagnosticators
    Tables,

    /// Look up a glossary term, or list them all
    Glossary {
        /// Term to look up
        term: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let level = level.as_str().to_lowercase();
    let filter = EnvFilter::new(format!(
        "gnosis={},gnosis_core={},tower_http={}",
        level, level, level
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // stdout carries the MCP stream
        .init();

    debug!("GNOSIS v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = GnosisConfig::load(cli.config.as_deref())?;
    let pathologist = Arc::new(CulturalPathologist::from_config(&config.pathology)?);
    debug!("{} diagnosticators registered", pathologist.len());

    match cli.command {
        None => start_mcp_server(pathologist).await,
        Some(Commands::Serve { with_http, addr }) => {
            if with_http {
                let http = http_config(&config, addr)?;
                let api = ApiServer::new(http, pathologist.clone());
                tokio::spawn(async move {
                    if let Err(e) = api.serve().await {
                        error!("HTTP server error: {}", e);
                    }
                });
            }
            start_mcp_server(pathologist).await
        }
        Some(Commands::Http { addr }) => {
            let http = http_config(&config, addr)?;
            ApiServer::new(http, pathologist).serve().await?;
            Ok(())
        }
        Some(Commands::Diagnose {
            text,
            layer,
            author,
            format,
        }) => diagnose(&pathologist, &text, layer, author.as_deref(), &format),
        Some(Commands::Tables) => {
            for info in pathologist.diagnosticators() {
                println!(
                    "[{}] {} ({}) - {}",
                    info.group, info.name, info.id, info.group_name
                );
                println!("    {}", info.pathologies.join(", "));
            }
            Ok(())
        }
        Some(Commands::Glossary { term }) => match term {
            Some(term) => {
                let entry = glossary::lookup(&term)
                    .ok_or_else(|| GnosisError::InvalidInput(format!("term not found: {}", term)))?;
                println!("{}", entry.term);
                println!("  {}", entry.definition);
                println!("  e.g. {}", entry.example);
                if !entry.see_also.is_empty() {
                    println!("  see also: {}", entry.see_also.join(", "));
                }
                Ok(())
            }
            None => {
                for (category, terms) in glossary::CATEGORIES {
                    println!("{}: {}", category, terms.join(", "));
                }
                Ok(())
            }
        },
    }
}

async fn start_mcp_server(pathologist: Arc<CulturalPathologist>) -> Result<()> {
    info!("Starting GNOSIS MCP server (stdio)");
    let server = McpServer::new(ToolHandler::new(pathologist));
    server.run().await
}

fn http_config(config: &GnosisConfig, addr: Option<String>) -> Result<ApiServerConfig> {
    let mut http = ApiServerConfig::from(config.http.clone());
    if let Some(addr) = addr {
        http.addr = addr
            .parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("Invalid address '{}': {}", addr, e))?;
    }
    Ok(http)
}

fn diagnose(
    pathologist: &CulturalPathologist,
    text: &str,
    layer: Option<u8>,
    author: Option<&str>,
    format: &str,
) -> Result<()> {
    let results: Vec<DiagnosticatorResult> = match (layer, author) {
        (Some(layer), _) => pathologist.run_by_group(layer, text)?,
        (None, Some(author)) => vec![pathologist.run_author(author, text)?],
        (None, None) => pathologist.run_all(text).diagnoses,
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for result in &results {
        let d = &result.diagnosis;
        let marker = if d.is_critical() { "!" } else { " " };
        println!(
            "{} {:<24} {:<36} {:>5.2}",
            marker, result.diagnosticator, d.pathology, d.confidence
        );
        if d.is_detected() {
            println!("    {}", d.recommendation);
        }
    }
    Ok(())
}
