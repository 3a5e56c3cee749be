use serde::Serialize;

use crate::errors::QueryError;
use crate::graph::{KnowledgeGraph, NodeId, NodeStore};

pub mod traversal;

/// Default level limit for [`MindmapQuery`].
pub const DEFAULT_MINDMAP_DEPTH: usize = 5;
/// Default result cap for [`CompleteQuery`].
pub const DEFAULT_COMPLETE_LIMIT: usize = 50;

/// Query trait implemented by all query types.
///
/// Given an immutable reference to a `KnowledgeGraph`, returns a result of type `R`.
pub trait Query<R> {
    fn run(&self, graph: &KnowledgeGraph) -> R;
}

fn resolve(store: &NodeStore, name: &str) -> Result<NodeId, QueryError> {
    store.find(name).ok_or_else(|| QueryError::UnknownNode(name.to_string()))
}

/// One node on a path, with the relation of the edge that led to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathStep {
    pub node: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PathOutcome {
    Found { steps: Vec<PathStep> },
    NoPath,
}

/// Shortest hop path between two named nodes over directed edges.
pub struct ShortestPathQuery {
    pub start: String,
    pub end: String,
}

impl ShortestPathQuery {
    #[must_use]
    pub fn new(start: &str, end: &str) -> Self {
        Self { start: start.to_string(), end: end.to_string() }
    }
}

impl Query<Result<PathOutcome, QueryError>> for ShortestPathQuery {
    fn run(&self, graph: &KnowledgeGraph) -> Result<PathOutcome, QueryError> {
        let store = graph.nodes();
        let start = resolve(store, &self.start)?;
        let end = resolve(store, &self.end)?;
        let Some(path) = traversal::shortest_path(store, start, end) else {
            return Ok(PathOutcome::NoPath);
        };

        let mut steps = Vec::with_capacity(path.len());
        let mut prev: Option<NodeId> = None;
        for id in path {
            // Label comes from the first matching edge in the predecessor's list.
            let via = prev.and_then(|p| store[p].edge_to(id)).map(|e| e.relation.clone());
            steps.push(PathStep { node: store[id].name().to_string(), via });
            prev = Some(id);
        }
        Ok(PathOutcome::Found { steps })
    }
}

/// A directed-reachability cluster ("topic").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub id: u32,
    pub members: Vec<String>,
}

/// Group all nodes into topics. See [`traversal::components`] for ordering.
pub struct TopicsQuery;

impl Query<Vec<Topic>> for TopicsQuery {
    fn run(&self, graph: &KnowledgeGraph) -> Vec<Topic> {
        let store = graph.nodes();
        traversal::components(store)
            .into_iter()
            .map(|(id, members)| Topic {
                id,
                members: members.into_iter().map(|m| store[m].name().to_string()).collect(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MindmapRecord {
    pub source: String,
    pub relation: String,
    pub dest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mindmap {
    pub start: String,
    pub max_depth: usize,
    pub records: Vec<MindmapRecord>,
}

/// Depth-limited edge dump rooted at one node.
pub struct MindmapQuery {
    pub start: String,
    pub max_depth: usize,
}

impl MindmapQuery {
    #[must_use]
    pub fn new(start: &str, max_depth: usize) -> Self {
        Self { start: start.to_string(), max_depth }
    }
}

impl Query<Result<Mindmap, QueryError>> for MindmapQuery {
    fn run(&self, graph: &KnowledgeGraph) -> Result<Mindmap, QueryError> {
        let store = graph.nodes();
        let start = resolve(store, &self.start)?;
        let records = traversal::bounded_dfs(store, start, self.max_depth)
            .into_iter()
            .map(|(src, edge)| MindmapRecord {
                source: store[src].name().to_string(),
                relation: edge.relation.clone(),
                dest: store[edge.dest].name().to_string(),
            })
            .collect();
        Ok(Mindmap { start: self.start.clone(), max_depth: self.max_depth, records })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighbor {
    pub name: String,
    pub relation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NeighborsOutcome {
    Related { node: String, neighbors: Vec<Neighbor> },
    NoRelationships { node: String },
}

/// Immediate outgoing relations of one node.
pub struct NeighborsQuery {
    pub node: String,
}

impl NeighborsQuery {
    #[must_use]
    pub fn new(node: &str) -> Self {
        Self { node: node.to_string() }
    }
}

impl Query<Result<NeighborsOutcome, QueryError>> for NeighborsQuery {
    fn run(&self, graph: &KnowledgeGraph) -> Result<NeighborsOutcome, QueryError> {
        let store = graph.nodes();
        let id = resolve(store, &self.node)?;
        let neighbors: Vec<Neighbor> = store[id]
            .edges()
            .map(|e| Neighbor { name: store[e.dest].name().to_string(), relation: e.relation.clone() })
            .collect();
        if neighbors.is_empty() {
            return Ok(NeighborsOutcome::NoRelationships { node: self.node.clone() });
        }
        Ok(NeighborsOutcome::Related { node: self.node.clone(), neighbors })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CompleteOutcome {
    Suggestions { prefix: String, suggestions: Vec<String> },
    NoSuggestions { prefix: String },
}

/// Prefix autocomplete over node names.
pub struct CompleteQuery {
    pub prefix: String,
    pub limit: usize,
}

impl CompleteQuery {
    #[must_use]
    pub fn new(prefix: &str, limit: usize) -> Self {
        Self { prefix: prefix.to_string(), limit }
    }
}

impl Query<CompleteOutcome> for CompleteQuery {
    fn run(&self, graph: &KnowledgeGraph) -> CompleteOutcome {
        let suggestions = graph.prefix_index().search(&self.prefix, self.limit);
        if suggestions.is_empty() {
            CompleteOutcome::NoSuggestions { prefix: self.prefix.clone() }
        } else {
            CompleteOutcome::Suggestions { prefix: self.prefix.clone(), suggestions }
        }
    }
}

/// Every node name, sorted ascending.
pub struct NodesQuery;

impl Query<Vec<String>> for NodesQuery {
    fn run(&self, graph: &KnowledgeGraph) -> Vec<String> {
        let mut names: Vec<String> = graph.nodes().iter().map(|(_, n)| n.name().to_string()).collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LoadOptions;

    fn graph(text: &str) -> KnowledgeGraph {
        KnowledgeGraph::load_from_reader(std::io::Cursor::new(text.as_bytes()), LoadOptions::default())
            .unwrap()
    }

    const SAMPLE: &str = "\
NODE: A
NODE: B
NODE: C
NODE: Z
EDGE: A|uses|B
EDGE: B|extends|C
EDGE: A|cites|C
";

    #[test]
    fn path_labels_come_from_connecting_edges() {
        let g = graph(SAMPLE);
        let out = ShortestPathQuery::new("A", "C").run(&g).unwrap();
        assert_eq!(
            out,
            PathOutcome::Found {
                steps: vec![
                    PathStep { node: "A".into(), via: None },
                    PathStep { node: "C".into(), via: Some("cites".into()) },
                ]
            }
        );
    }

    #[test]
    fn newest_parallel_edge_labels_the_path() {
        let g = graph("NODE: A\nNODE: B\nEDGE: A|old|B\nEDGE: A|new|B\n");
        let Ok(PathOutcome::Found { steps }) = ShortestPathQuery::new("A", "B").run(&g) else {
            panic!("expected a path");
        };
        assert_eq!(steps[1].via.as_deref(), Some("new"));
    }

    #[test]
    fn unknown_node_and_no_path_are_distinct() {
        let g = graph(SAMPLE);
        assert_eq!(
            ShortestPathQuery::new("X", "A").run(&g),
            Err(QueryError::UnknownNode("X".into()))
        );
        assert_eq!(
            ShortestPathQuery::new("A", "Y").run(&g),
            Err(QueryError::UnknownNode("Y".into()))
        );
        assert_eq!(ShortestPathQuery::new("A", "Z").run(&g), Ok(PathOutcome::NoPath));
    }

    #[test]
    fn repeated_queries_do_not_share_marks() {
        let g = graph(SAMPLE);
        let first = g.shortest_path("A", "C");
        let topics = g.topics();
        let second = g.shortest_path("A", "C");
        assert_eq!(first, second);
        assert_eq!(topics, g.topics());
        assert_eq!(g.mindmap("A", 5), g.mindmap("A", 5));
    }

    #[test]
    fn topics_number_from_one() {
        let g = graph(SAMPLE);
        let topics = TopicsQuery.run(&g);
        assert_eq!(
            topics,
            vec![
                Topic { id: 1, members: vec!["A".into(), "B".into(), "C".into()] },
                Topic { id: 2, members: vec!["Z".into()] },
            ]
        );
    }

    #[test]
    fn mindmap_records_and_unknown_start() {
        let g = graph(SAMPLE);
        let m = MindmapQuery::new("A", DEFAULT_MINDMAP_DEPTH).run(&g).unwrap();
        let triples: Vec<(&str, &str, &str)> = m
            .records
            .iter()
            .map(|r| (r.source.as_str(), r.relation.as_str(), r.dest.as_str()))
            .collect();
        // A's list is [cites C, uses B]; C is entered first, B then reports B -> C
        assert_eq!(triples, vec![("A", "cites", "C"), ("A", "uses", "B"), ("B", "extends", "C")]);
        assert_eq!(
            MindmapQuery::new("Nope", 5).run(&g),
            Err(QueryError::UnknownNode("Nope".into()))
        );
    }

    #[test]
    fn neighbors_distinguish_empty_from_unknown() {
        let g = graph(SAMPLE);
        assert_eq!(
            NeighborsQuery::new("A").run(&g),
            Ok(NeighborsOutcome::Related {
                node: "A".into(),
                neighbors: vec![
                    Neighbor { name: "C".into(), relation: "cites".into() },
                    Neighbor { name: "B".into(), relation: "uses".into() },
                ],
            })
        );
        assert_eq!(
            NeighborsQuery::new("Z").run(&g),
            Ok(NeighborsOutcome::NoRelationships { node: "Z".into() })
        );
        assert_eq!(NeighborsQuery::new("Q").run(&g), Err(QueryError::UnknownNode("Q".into())));
    }

    #[test]
    fn complete_outcomes() {
        let g = graph("NODE: Convolution\nNODE: Convex\nNODE: Kernel\n");
        assert_eq!(
            CompleteQuery::new("Conv", 10).run(&g),
            CompleteOutcome::Suggestions {
                prefix: "Conv".into(),
                suggestions: vec!["Convex".into(), "Convolution".into()],
            }
        );
        assert_eq!(
            CompleteQuery::new("Zzz", 10).run(&g),
            CompleteOutcome::NoSuggestions { prefix: "Zzz".into() }
        );
        assert_eq!(
            CompleteQuery::new("Conv", 1).run(&g),
            CompleteOutcome::Suggestions { prefix: "Conv".into(), suggestions: vec!["Convex".into()] }
        );
    }

    #[test]
    fn nodes_are_sorted() {
        let g = graph("NODE: b\nNODE: C\nNODE: a\n");
        assert_eq!(NodesQuery.run(&g), vec!["C", "a", "b"]);
    }

    #[test]
    fn outcomes_serialize_with_tags() {
        let json = serde_json::to_value(PathOutcome::NoPath).unwrap();
        assert_eq!(json["outcome"], "no_path");
        let json = serde_json::to_value(NeighborsOutcome::NoRelationships { node: "Z".into() }).unwrap();
        assert_eq!(json["outcome"], "no_relationships");
        assert_eq!(json["node"], "Z");
    }
}
