use crate::cli::{Cli, Commands, OutputFormat};
use crate::errors::{NexusError, QueryError};
use crate::graph::{KnowledgeGraph, LoadOptions, LoadReport, DEFAULT_BUCKETS};
use crate::query::{
    CompleteOutcome, Mindmap, NeighborsOutcome, PathOutcome, Topic, DEFAULT_COMPLETE_LIMIT,
    DEFAULT_MINDMAP_DEPTH,
};
use crate::utils::config::{self, Config};
use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use serde_json::{json, Value};
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, warn};

/// Effective settings after merging CLI flags, config file and built-in defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub format: OutputFormat,
    pub mindmap_depth: usize,
    pub complete_limit: usize,
    pub load: LoadOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            mindmap_depth: DEFAULT_MINDMAP_DEPTH,
            complete_limit: DEFAULT_COMPLETE_LIMIT,
            load: LoadOptions::default(),
        }
    }
}

impl Settings {
    /// Explicit CLI flag > config file > default. Per-command flags (`--depth`,
    /// `--limit`) are applied at dispatch.
    #[must_use]
    pub fn resolve(cli: &Cli, cfg: Option<&Config>) -> Self {
        let mut s = Self::default();
        if let Some(cfg) = cfg {
            let q = cfg.query();
            match q.default_format.as_deref() {
                Some("json") => s.format = OutputFormat::Json,
                Some("text") | None => {}
                Some(other) => warn!(value = other, "unknown query.default_format in config, using text"),
            }
            s.mindmap_depth = q.mindmap_depth.unwrap_or(s.mindmap_depth);
            s.complete_limit = q.complete_limit.unwrap_or(s.complete_limit);
            let l = cfg.load();
            s.load.resolve_forward_refs = l.resolve_forward_refs.unwrap_or(false);
            s.load.buckets = l.buckets.unwrap_or(DEFAULT_BUCKETS);
        }
        if let Some(f) = cli.format {
            s.format = f;
        }
        if cli.resolve_forward {
            s.load.resolve_forward_refs = true;
        }
        s
    }
}

/// Run the CLI logic in-process, printing results to stdout.
///
/// Returns an exit code (0 = success).
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_writer(cli, &mut out)
}

/// Same as [`run_cli`] but writes results to `out`. Diagnostics still go to stderr.
pub fn run_with_writer<W: Write>(cli: Cli, out: &mut W) -> i32 {
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, env!("CARGO_PKG_NAME"), out);
        return 0;
    }

    let Some(file) = cli.file.clone() else {
        eprintln!("Missing graph file. Provide --file <path> or set NEXUS_FILE.");
        return 2;
    };
    let cfg = match cli.config.as_deref() {
        Some(p) => config::load_config_at(p),
        None => config::load_config_near(&file),
    };
    let settings = Settings::resolve(&cli, cfg.as_ref());
    debug!(?settings, "effective settings");

    let graph = match load(&file, settings.load) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Load graph failed: {e}");
            return 1;
        }
    };

    match execute(&graph, cli.command, &settings, out) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{e}");
            1
        }
    }
}

fn load(file: &Path, opts: LoadOptions) -> Result<KnowledgeGraph, NexusError> {
    let started = Instant::now();
    let graph = KnowledgeGraph::load_from_path(file, opts)?;
    debug!(elapsed_us = started.elapsed().as_micros() as u64, "load finished");
    Ok(graph)
}

/// Run one query against a loaded graph and write the rendered result.
///
/// # Errors
/// `NexusError::Encode` if JSON serialization fails, `NexusError::Io` if writing fails,
/// `NexusError::InvalidArgument` for commands that do not query a graph.
pub fn execute<W: Write>(
    graph: &KnowledgeGraph,
    command: Commands,
    settings: &Settings,
    out: &mut W,
) -> Result<(), NexusError> {
    let started = Instant::now();
    let (kind, rendered) = match command {
        Commands::Path { start, end } => ("path", render_path(graph.shortest_path(&start, &end), settings.format)?),
        Commands::Topics => ("topics", render_topics(&graph.topics(), settings.format)?),
        Commands::Mindmap { start, depth } => {
            let depth = depth.unwrap_or(settings.mindmap_depth);
            ("mindmap", render_mindmap(graph.mindmap(&start, depth), settings.format)?)
        }
        Commands::Qa { node } => ("qa", render_neighbors(graph.neighbors(&node), settings.format)?),
        Commands::Complete { prefix, limit } => {
            let limit = limit.unwrap_or(settings.complete_limit);
            ("complete", render_complete(&graph.complete(&prefix, limit), settings.format)?)
        }
        Commands::Nodes => ("nodes", render_nodes(&graph.node_names(), settings.format)?),
        Commands::Stats => ("stats", render_stats(graph.report(), settings.format)?),
        Commands::Completions { .. } => {
            return Err(NexusError::InvalidArgument("completions do not query a graph".into()));
        }
    };
    debug!(query = kind, elapsed_us = started.elapsed().as_micros() as u64, "query finished");
    // An empty graph has no topics; print nothing rather than a blank line.
    if !rendered.is_empty() {
        writeln!(out, "{rendered}")?;
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, NexusError> {
    Ok(serde_json::to_string_pretty(value)?)
}

// Serialize `value` and add an "outcome" tag to the resulting object.
fn tagged<T: Serialize>(outcome: &str, value: &T) -> Result<String, NexusError> {
    let mut v = serde_json::to_value(value)?;
    if let Value::Object(map) = &mut v {
        map.insert("outcome".into(), Value::String(outcome.into()));
    }
    to_json(&v)
}

fn unknown_node(err: &QueryError, format: OutputFormat) -> Result<String, NexusError> {
    match format {
        OutputFormat::Text => Ok("ERROR: Node not found".to_string()),
        OutputFormat::Json => {
            let QueryError::UnknownNode(node) = err;
            to_json(&json!({ "outcome": "unknown_node", "node": node }))
        }
    }
}

fn render_path(res: Result<PathOutcome, QueryError>, format: OutputFormat) -> Result<String, NexusError> {
    let outcome = match res {
        Ok(o) => o,
        Err(e) => return unknown_node(&e, format),
    };
    if format == OutputFormat::Json {
        return to_json(&outcome);
    }
    Ok(match outcome {
        PathOutcome::NoPath => "NO_PATH".to_string(),
        PathOutcome::Found { steps } => {
            let mut s = String::from("PATH: ");
            for step in &steps {
                if let Some(rel) = &step.via {
                    s.push_str(&format!(" -[{rel}]-> "));
                }
                s.push_str(&step.node);
            }
            s
        }
    })
}

fn render_topics(topics: &[Topic], format: OutputFormat) -> Result<String, NexusError> {
    if format == OutputFormat::Json {
        return to_json(&json!({ "outcome": "topics", "topics": topics }));
    }
    Ok(topics
        .iter()
        .map(|t| format!("TOPIC_{}: {}", t.id, t.members.join(", ")))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn render_mindmap(res: Result<Mindmap, QueryError>, format: OutputFormat) -> Result<String, NexusError> {
    let map = match res {
        Ok(m) => m,
        Err(e) => return unknown_node(&e, format),
    };
    if format == OutputFormat::Json {
        return tagged("mindmap", &map);
    }
    let mut s = String::from("MINDMAP_DATA:");
    for r in &map.records {
        s.push('\n');
        s.push_str(&format!("{}|{}|{}", r.source, r.relation, r.dest));
    }
    Ok(s)
}

fn render_neighbors(
    res: Result<NeighborsOutcome, QueryError>,
    format: OutputFormat,
) -> Result<String, NexusError> {
    let outcome = match res {
        Ok(o) => o,
        Err(e) => return unknown_node(&e, format),
    };
    if format == OutputFormat::Json {
        return to_json(&outcome);
    }
    Ok(match outcome {
        NeighborsOutcome::NoRelationships { node } => {
            format!("ANSWER: {node} is related to: No relationships found")
        }
        NeighborsOutcome::Related { node, neighbors } => {
            let list: Vec<String> = neighbors.iter().map(|n| format!("{} ({})", n.name, n.relation)).collect();
            format!("ANSWER: {node} is related to: {}", list.join(", "))
        }
    })
}

fn render_complete(outcome: &CompleteOutcome, format: OutputFormat) -> Result<String, NexusError> {
    if format == OutputFormat::Json {
        return to_json(outcome);
    }
    Ok(match outcome {
        CompleteOutcome::NoSuggestions { .. } => "NO_SUGGESTIONS".to_string(),
        CompleteOutcome::Suggestions { suggestions, .. } => format!("SUGGESTIONS: {}", suggestions.join(", ")),
    })
}

fn render_nodes(names: &[String], format: OutputFormat) -> Result<String, NexusError> {
    if format == OutputFormat::Json {
        return to_json(&json!({ "outcome": "nodes", "nodes": names }));
    }
    let rows: Vec<Vec<String>> =
        names.iter().enumerate().map(|(i, n)| vec![format!("{}", i + 1), n.clone()]).collect();
    Ok(crate::utils::table::render(&["#", "Name"], &rows))
}

fn render_stats(report: &LoadReport, format: OutputFormat) -> Result<String, NexusError> {
    if format == OutputFormat::Json {
        return tagged("stats", report);
    }
    let rows = vec![
        vec!["lines".to_string(), report.lines.to_string()],
        vec!["nodes".to_string(), report.nodes.to_string()],
        vec!["edges".to_string(), report.edges.to_string()],
        vec!["dropped_edges".to_string(), report.dropped_edges.to_string()],
        vec!["malformed_lines".to_string(), report.malformed_lines.to_string()],
        vec!["ignored_lines".to_string(), report.ignored_lines.to_string()],
    ];
    Ok(crate::utils::table::render(&["Metric", "Value"], &rows))
}
