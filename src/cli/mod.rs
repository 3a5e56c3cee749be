use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "nexus-engine",
    version,
    about = "In-memory knowledge graph query engine",
    long_about = "Load a NODE:/EDGE: text file into a directed labeled graph and run one query against it: shortest path, topic clusters, mind map, neighbors or autocomplete. Results go to stdout; diagnostics go to stderr (filter with NEXUS_LOG)."
)]
pub struct Cli {
    /// Graph data file (NODE:/EDGE: lines)
    #[arg(short, long, global = true, env = "NEXUS_FILE")]
    pub file: Option<PathBuf>,
    /// Path to a TOML configuration file (default: nexus-engine.toml next to the data file)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Output format; overrides the config file's query.default_format
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,
    /// Collect all NODE: lines before adding edges, so edges may name nodes declared later
    #[arg(long, global = true, default_value_t = false)]
    pub resolve_forward: bool,
    /// Only log errors
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Line-oriented text (PATH:, TOPIC_n:, ANSWER: ...)
    Text,
    /// One JSON object tagged by "outcome"
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Shortest relation path between two nodes
    Path {
        /// Start node name
        start: String,
        /// End node name
        end: String,
    },
    /// Group nodes into topics by directed reachability
    Topics,
    /// Dump edges reachable from a node, level by level
    Mindmap {
        /// Start node name
        start: String,
        /// Maximum number of levels to expand (default: config query.mindmap_depth, else 5)
        #[arg(long)]
        depth: Option<usize>,
    },
    /// List a node's outgoing relations
    Qa {
        /// Node name
        node: String,
    },
    /// Autocomplete node names by prefix
    Complete {
        /// Name prefix (case-sensitive; empty lists every name)
        prefix: String,
        /// Maximum number of suggestions (default: config query.complete_limit, else 50)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List every node name, sorted
    Nodes,
    /// Show load statistics
    Stats,
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
