//! CommuGraph MCP Server: entry point.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use commugraph::{ParserRegistry, TemporalGraph};
use commugraph_mcp::config::ServerConfig;
use commugraph_mcp::protocol::ProtocolHandler;
use commugraph_mcp::session::{spawn_cleanup_task, GraphSessionManager};
use commugraph_mcp::tools::ToolRegistry;
use commugraph_mcp::transport::StdioTransport;

/// How often idle sessions are swept.
const CLEANUP_PERIOD: std::time::Duration = std::time::Duration::from_secs(600);

#[derive(Parser)]
#[command(
    name = "commugraph-mcp",
    about = "MCP server for CommuGraph: explore multi-agent conversations as temporal graphs",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Settings shared by both server modes.
#[derive(Args, Default)]
struct ServeArgs {
    /// Largest accepted upload in bytes.
    /// Also reads from COMMUGRAPH_MAX_UPLOAD_BYTES.
    #[arg(long)]
    max_upload_bytes: Option<usize>,

    /// Hours an idle session is kept.
    /// Also reads from COMMUGRAPH_SESSION_EXPIRY_HOURS.
    #[arg(long)]
    session_expiry_hours: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve {
        #[command(flatten)]
        settings: ServeArgs,
    },

    /// Start MCP server over HTTP.
    #[cfg(feature = "sse")]
    ServeHttp {
        /// Listen address (host:port).
        #[arg(long, default_value = "127.0.0.1:3100")]
        addr: String,

        #[command(flatten)]
        settings: ServeArgs,

        /// Bearer token for authentication.
        /// Also reads from COMMUGRAPH_TOKEN.
        #[arg(long)]
        token: Option<String>,

        /// Allowed browser origin; repeat for several. Any origin when omitted.
        #[arg(long = "cors-origin")]
        cors_origins: Vec<String>,
    },

    /// Parse a log file and print its graph summary, snapshot, or metrics.
    Inspect {
        /// Log file to parse.
        file: PathBuf,

        /// Log framework.
        #[arg(short, long, default_value = "autogen")]
        framework: String,

        /// Only include interactions up to this step.
        #[arg(short, long)]
        step: Option<u64>,

        /// Print the full snapshot JSON.
        #[arg(long, conflicts_with = "metrics")]
        snapshot: bool,

        /// Print metrics JSON.
        #[arg(long)]
        metrics: bool,
    },

    /// List supported log frameworks.
    Frameworks,

    /// Print server capabilities as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   commugraph-mcp completions bash > ~/.local/share/bash-completion/completions/commugraph-mcp
    ///   commugraph-mcp completions zsh > ~/.zfunc/_commugraph-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
}

fn open_sessions(config: &ServerConfig) -> Arc<Mutex<GraphSessionManager>> {
    let sessions = Arc::new(Mutex::new(GraphSessionManager::from_config(config)));
    spawn_cleanup_task(sessions.clone(), CLEANUP_PERIOD);
    sessions
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve {
        settings: ServeArgs::default(),
    }) {
        Commands::Serve { settings } => {
            let config = ServerConfig::resolve(
                settings.max_upload_bytes,
                settings.session_expiry_hours,
                None,
            );
            let handler = ProtocolHandler::new(open_sessions(&config), config);
            StdioTransport::new(handler).run().await?;
        }

        #[cfg(feature = "sse")]
        Commands::ServeHttp {
            addr,
            settings,
            token,
            cors_origins,
        } => {
            use commugraph_mcp::transport::SseTransport;

            let config = ServerConfig::resolve(
                settings.max_upload_bytes,
                settings.session_expiry_hours,
                token,
            );
            tracing::info!("CommuGraph MCP server");
            if config.token.is_some() {
                tracing::info!("Auth: bearer token required");
            }

            let token = config.token.clone();
            let handler = ProtocolHandler::new(open_sessions(&config), config);
            SseTransport::new(handler, token)
                .with_cors_origins(cors_origins)
                .run(&addr)
                .await?;
        }

        Commands::Inspect {
            file,
            framework,
            step,
            snapshot,
            metrics,
        } => {
            let parser = ParserRegistry::get(&framework)?;
            let started = Instant::now();
            let graph = TemporalGraph::build(parser.parse_file(&file)?)?;
            tracing::debug!("Built {} in {:?}", file.display(), started.elapsed());

            if snapshot {
                println!("{}", serde_json::to_string_pretty(&graph.to_snapshot(step))?);
            } else if metrics {
                println!("{}", serde_json::to_string_pretty(&graph.metrics(step))?);
            } else {
                let view = graph.view(step);
                println!("Log: {}", file.display());
                println!("  Framework: {}", parser.framework());
                println!("  Messages:  {}", view.message_count());
                println!("  Agents:    {}", view.node_count());
                println!("  Edges:     {}", view.edge_count());
                println!("  Steps:     0..={}", graph.total_steps());
                for edge in view.edges() {
                    println!(
                        "    {} -> {} (weight {})",
                        edge.source(),
                        edge.target(),
                        edge.weight()
                    );
                }
            }
        }

        Commands::Frameworks => {
            for name in ParserRegistry::available() {
                println!("{name}");
            }
        }

        Commands::Info => {
            let capabilities = commugraph_mcp::types::InitializeResult::default_result();
            let tools = ToolRegistry::list_tools();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
                "frameworks": ParserRegistry::available(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "commugraph-mcp", &mut std::io::stdout());
        }

        Commands::Repl => {
            commugraph_mcp::repl::run()?;
        }
    }

    Ok(())
}
