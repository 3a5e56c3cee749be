//! Graph model and loader.
//!
//! [`KnowledgeGraph`] owns the node store (names, adjacency) and the prefix
//! index used for autocomplete. It is populated once from `NODE:`/`EDGE:` text
//! and is read-only afterwards; every query takes `&self`, so one loaded graph
//! can serve any number of queries, including from several threads.
//!
//! You typically construct a graph via [`KnowledgeGraph::load_from_path`] and
//! then pass it to queries in `crate::query`.
use crate::errors::{NexusError, ParseError, QueryError};
use crate::parser::{LineParser, Record};
use crate::query::{
    CompleteOutcome, CompleteQuery, Mindmap, MindmapQuery, NeighborsOutcome, NeighborsQuery,
    NodesQuery, PathOutcome, Query, ShortestPathQuery, Topic, TopicsQuery,
};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

pub mod store;
pub mod trie;

pub use store::{Edge, Mark, Node, NodeId, NodeStore, TraversalState, DEFAULT_BUCKETS};
pub use trie::PrefixIndex;

/// How input text is turned into a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Collect every `NODE:` line before inserting edges, so an edge may name a
    /// node declared further down. Off by default: such edges are dropped.
    pub resolve_forward_refs: bool,
    /// Hash bucket count for the node store.
    pub buckets: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { resolve_forward_refs: false, buckets: DEFAULT_BUCKETS }
    }
}

/// Counters gathered while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub lines: usize,
    pub nodes: usize,
    pub edges: usize,
    /// Edges naming a node that was not declared (yet).
    pub dropped_edges: usize,
    pub malformed_lines: usize,
    pub ignored_lines: usize,
}

#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    nodes: NodeStore,
    index: PrefixIndex,
    report: LoadReport,
}

impl KnowledgeGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_buckets(buckets: usize) -> Self {
        Self { nodes: NodeStore::with_buckets(buckets), ..Self::default() }
    }

    /// Load a graph file.
    ///
    /// # Errors
    /// Returns `NexusError::SourceUnavailable` if the file cannot be opened and
    /// `NexusError::Io` if reading fails midway. No partial graph is returned.
    pub fn load_from_path(path: &Path, opts: LoadOptions) -> Result<Self, NexusError> {
        let file = File::open(path)
            .map_err(|source| NexusError::SourceUnavailable { path: path.to_path_buf(), source })?;
        let graph = Self::load_from_reader(BufReader::new(file), opts)?;
        info!(
            path = %path.display(),
            nodes = graph.report.nodes,
            edges = graph.report.edges,
            dropped_edges = graph.report.dropped_edges,
            malformed_lines = graph.report.malformed_lines,
            "graph loaded"
        );
        Ok(graph)
    }

    /// Load a graph from any buffered reader. Names are kept byte-exact, so a line
    /// that is not valid UTF-8 is counted as malformed and skipped.
    ///
    /// # Errors
    /// Returns `NexusError::Io` if the reader fails.
    pub fn load_from_reader<R: BufRead>(reader: R, opts: LoadOptions) -> Result<Self, NexusError> {
        let parser = LineParser::new();
        let mut graph = Self::with_buckets(opts.buckets);
        let mut pending: Vec<(String, String, String)> = Vec::new();

        for (idx, chunk) in reader.split(b'\n').enumerate() {
            let bytes = chunk?;
            graph.report.lines += 1;
            let parsed = std::str::from_utf8(&bytes)
                .map_err(|e| ParseError::InvalidUtf8 { offset: e.valid_up_to() })
                .and_then(|line| parser.parse_line(line));
            match parsed {
                Ok(Some(Record::Node(name))) => {
                    graph.add_node(name);
                }
                Ok(Some(Record::Edge { source, relation, dest })) => {
                    if opts.resolve_forward_refs {
                        pending.push((source.to_string(), relation.to_string(), dest.to_string()));
                    } else {
                        graph.add_edge(source, relation, dest);
                    }
                }
                Ok(None) => graph.report.ignored_lines += 1,
                Err(e) => {
                    warn!(line = idx + 1, error = %e, "skipping malformed line");
                    graph.report.malformed_lines += 1;
                }
            }
        }

        for (source, relation, dest) in &pending {
            graph.add_edge(source, relation, dest);
        }
        Ok(graph)
    }

    /// Declare a node (idempotent) and index its name for autocomplete.
    pub fn add_node(&mut self, name: &str) -> NodeId {
        let id = self.nodes.insert(name);
        self.index.insert(name);
        self.report.nodes = self.nodes.len();
        id
    }

    /// Add `source -[relation]-> dest` if both endpoints are declared.
    ///
    /// Returns `false` (and counts a dropped edge) otherwise; neither endpoint is
    /// touched in that case.
    pub fn add_edge(&mut self, source: &str, relation: &str, dest: &str) -> bool {
        let (Some(from), Some(to)) = (self.nodes.find(source), self.nodes.find(dest)) else {
            debug!(source, relation, dest, "dropping edge with undeclared endpoint");
            self.report.dropped_edges += 1;
            return false;
        };
        let added = self.nodes.add_edge(from, to, relation);
        if added {
            self.report.edges += 1;
        }
        added
    }

    #[must_use]
    pub fn nodes(&self) -> &NodeStore {
        &self.nodes
    }

    #[must_use]
    pub fn prefix_index(&self) -> &PrefixIndex {
        &self.index
    }

    #[must_use]
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.edge_count()
    }

    /// Shortest hop path from `start` to `end`.
    ///
    /// # Errors
    /// `QueryError::UnknownNode` if either endpoint is absent.
    pub fn shortest_path(&self, start: &str, end: &str) -> Result<PathOutcome, QueryError> {
        ShortestPathQuery::new(start, end).run(self)
    }

    /// Directed-reachability clusters, numbered from 1.
    #[must_use]
    pub fn topics(&self) -> Vec<Topic> {
        TopicsQuery.run(self)
    }

    /// Edge records reachable from `start` within `max_depth` levels.
    ///
    /// # Errors
    /// `QueryError::UnknownNode` if `start` is absent.
    pub fn mindmap(&self, start: &str, max_depth: usize) -> Result<Mindmap, QueryError> {
        MindmapQuery::new(start, max_depth).run(self)
    }

    /// Outgoing relations of `node`.
    ///
    /// # Errors
    /// `QueryError::UnknownNode` if `node` is absent.
    pub fn neighbors(&self, node: &str) -> Result<NeighborsOutcome, QueryError> {
        NeighborsQuery::new(node).run(self)
    }

    /// Autocomplete `prefix` against node names.
    #[must_use]
    pub fn complete(&self, prefix: &str, limit: usize) -> CompleteOutcome {
        CompleteQuery::new(prefix, limit).run(self)
    }

    /// All node names, sorted.
    #[must_use]
    pub fn node_names(&self) -> Vec<String> {
        NodesQuery.run(self)
    }
}
