//! Interactive REPL for exploring conversation graphs.
//!
//! Launch with `commugraph-mcp repl` to enter interactive mode.
//! Type `/help` for available commands, Tab for completion.

use std::path::Path;

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};

use commugraph::{GraphView, ParserRegistry, TemporalGraph};

use crate::config::ServerConfig;
use crate::session::GraphSessionManager;
use crate::tools::ToolRegistry;

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/load", "Load a log file: /load <file> [framework]"),
    ("/sessions", "List loaded graphs"),
    ("/use", "Switch to a loaded graph: /use <id>"),
    ("/step", "Show the graph up to a step: /step <n>"),
    ("/full", "Show the full graph"),
    ("/metrics", "Density and centrality: /metrics [step]"),
    ("/frameworks", "List supported log frameworks"),
    ("/tools", "List available MCP tools"),
    ("/info", "Show server capabilities"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

const LOG_EXTENSIONS: &[&str] = &["json", "jsonl"];

/// REPL helper for tab completion.
#[derive(Default)]
struct GraphHelper;

impl Completer for GraphHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
        if cmd != "/load" || args.contains(' ') {
            return Ok((pos, Vec::new()));
        }

        let mut files: Vec<String> = std::fs::read_dir(".")
            .map(|entries| {
                entries
                    .flatten()
                    .map(|entry| entry.path())
                    .filter(|path| {
                        path.extension()
                            .and_then(|e| e.to_str())
                            .is_some_and(|e| LOG_EXTENSIONS.contains(&e))
                    })
                    .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        files.sort();

        let prefix_start = input.len() - args.len();
        let matches = files
            .into_iter()
            .filter(|f| f.starts_with(args))
            .map(|f| Pair {
                display: f.clone(),
                replacement: format!("{f} "),
            })
            .collect();
        Ok((prefix_start, matches))
    }
}

impl Hinter for GraphHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || !line.starts_with('/') || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|(cmd, _)| cmd.starts_with(line) && *cmd != line)
            .map(|(cmd, _)| cmd[line.len()..].to_string())
    }
}

impl Highlighter for GraphHelper {}
impl Validator for GraphHelper {}
impl Helper for GraphHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// Loaded graphs and the one commands apply to.
struct ReplState {
    sessions: GraphSessionManager,
    current: Option<String>,
}

impl ReplState {
    fn current_graph(&mut self) -> Option<std::sync::Arc<TemporalGraph>> {
        let Some(id) = self.current.clone() else {
            eprintln!("  No graph loaded. Use /load <file> first.");
            return None;
        };
        match self.sessions.get(&id) {
            Ok(graph) => Some(graph),
            Err(e) => {
                eprintln!("  {e}");
                self.current = None;
                None
            }
        }
    }
}

/// Run the interactive REPL.
pub fn run() -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1mcommugraph-mcp v{}\x1b[0m \x1b[90m: multi-agent communication graphs\x1b[0m",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
    eprintln!(
        "    Press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<GraphHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(GraphHelper));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = Path::new(&home).join(".commugraph_mcp_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let settings = ServerConfig::resolve(None, None, None);
    let mut state = ReplState {
        sessions: GraphSessionManager::from_config(&settings),
        current: None,
    };
    let prompt = " \x1b[36mgraph>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let input = line.strip_prefix('/').unwrap_or(line);
                if input.is_empty() {
                    cmd_help();
                    continue;
                }

                let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
                let args = args.trim();

                match cmd {
                    "exit" | "quit" => {
                        eprintln!("  Goodbye!");
                        break;
                    }
                    "help" | "h" | "?" => cmd_help(),
                    "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                    "info" => cmd_info(),
                    "tools" => cmd_tools(),
                    "frameworks" => cmd_frameworks(),
                    "load" => cmd_load(args, &mut state, settings.max_upload_bytes),
                    "sessions" => cmd_sessions(&state),
                    "use" => cmd_use(args, &mut state),
                    "step" => cmd_step(args, &mut state),
                    "full" => cmd_view(None, &mut state),
                    "metrics" => cmd_metrics(args, &mut state),
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);

    Ok(())
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Tip: Tab completion works for commands and .json/.jsonl files.");
    eprintln!();
}

fn cmd_info() {
    let capabilities = crate::types::InitializeResult::default_result();
    let tools = ToolRegistry::list_tools();
    eprintln!();
    eprintln!(
        "  Server:   {} v{}",
        capabilities.server_info.name, capabilities.server_info.version
    );
    eprintln!("  Protocol: {}", capabilities.protocol_version);
    eprintln!("  Tools:    {}", tools.len());
    eprintln!();
}

fn cmd_tools() {
    let tools = ToolRegistry::list_tools();
    eprintln!();
    eprintln!("  {} MCP tools available:", tools.len());
    eprintln!();
    for tool in &tools {
        eprintln!(
            "    {:<20} {}",
            tool.name,
            tool.description.as_deref().unwrap_or("")
        );
    }
    eprintln!();
}

fn cmd_frameworks() {
    eprintln!("  Frameworks: {}", ParserRegistry::available().join(", "));
}

fn cmd_load(args: &str, state: &mut ReplState, max_bytes: usize) {
    let mut parts = args.split_whitespace();
    let Some(path) = parts.next() else {
        eprintln!("  Usage: /load <file> [framework]");
        return;
    };
    let framework = parts.next().unwrap_or("autogen");

    match load_graph(Path::new(path), framework, max_bytes) {
        Ok(graph) => {
            eprintln!(
                "  Loaded: {path} ({} messages, {} agents, {} edges, steps 0..={})",
                graph.message_count(),
                graph.node_count(),
                graph.edge_count(),
                graph.total_steps()
            );
            let id = state.sessions.create(graph, framework);
            eprintln!("  Graph id: {id}");
            state.current = Some(id);
        }
        Err(e) => eprintln!("  Failed to load: {e}"),
    }
}

fn load_graph(path: &Path, framework: &str, max_bytes: usize) -> anyhow::Result<TemporalGraph> {
    let size = std::fs::metadata(path)?.len();
    if size > max_bytes as u64 {
        anyhow::bail!("{} is {size} bytes; the limit is {max_bytes}", path.display());
    }
    let parser = ParserRegistry::get(framework)?;
    Ok(TemporalGraph::build(parser.parse_file(path)?)?)
}

fn cmd_sessions(state: &ReplState) {
    let sessions = state.sessions.list();
    if sessions.is_empty() {
        eprintln!("  No graphs loaded.");
        return;
    }
    eprintln!();
    for info in sessions {
        let marker = if state.current.as_deref() == Some(info.graph_id.as_str()) {
            "*"
        } else {
            " "
        };
        eprintln!(
            "  {marker} {}  {:<8} {:>5} msgs {:>4} agents  created {}",
            info.graph_id,
            info.framework,
            info.message_count,
            info.node_count,
            info.created_at.format("%H:%M:%S")
        );
    }
    eprintln!();
}

fn cmd_use(args: &str, state: &mut ReplState) {
    if args.is_empty() {
        eprintln!("  Usage: /use <id>");
        return;
    }
    match state.sessions.get(args) {
        Ok(_) => {
            state.current = Some(args.to_string());
            eprintln!("  Using graph {args}");
        }
        Err(e) => eprintln!("  {e}"),
    }
}

fn parse_step(args: &str) -> Option<Option<u64>> {
    if args.is_empty() {
        return Some(None);
    }
    match args.parse::<u64>() {
        Ok(step) => Some(Some(step)),
        Err(_) => {
            eprintln!("  Step must be a non-negative integer, got '{args}'");
            None
        }
    }
}

fn cmd_step(args: &str, state: &mut ReplState) {
    match parse_step(args) {
        Some(Some(step)) => cmd_view(Some(step), state),
        Some(None) => eprintln!("  Usage: /step <n>"),
        None => {}
    }
}

fn cmd_view(step: Option<u64>, state: &mut ReplState) {
    let Some(graph) = state.current_graph() else {
        return;
    };
    print_view(&graph.view(step));
}

fn print_view(view: &GraphView<'_>) {
    let bound = match view.max_step() {
        Some(step) => format!("step {step} of {}", view.graph().total_steps()),
        None => "full graph".to_string(),
    };
    eprintln!();
    eprintln!(
        "  {bound}: {} messages, {} agents, {} edges",
        view.message_count(),
        view.node_count(),
        view.edge_count()
    );
    for edge in view.edges() {
        eprintln!(
            "    {:<16} -> {:<16} weight {}",
            edge.source(),
            edge.target(),
            edge.weight()
        );
    }
    eprintln!();
}

fn cmd_metrics(args: &str, state: &mut ReplState) {
    let Some(step) = parse_step(args) else {
        return;
    };
    let Some(graph) = state.current_graph() else {
        return;
    };
    let metrics = graph.metrics(step);
    eprintln!();
    eprintln!("  Agents:  {}", metrics.node_count);
    eprintln!("  Edges:   {}", metrics.edge_count);
    eprintln!("  Density: {:.3}", metrics.density);
    for (agent, score) in metrics.top_central(5) {
        eprintln!("    {agent:<16} {score:.3}");
    }
    eprintln!();
}
