//! nexus-engine: in-memory knowledge graph query engine
//!
//! Load a line-oriented `NODE:` / `EDGE:` file into a directed labeled graph and
//! query it.
//!
//! # Features
//! - Hash-bucketed node store with stable, reproducible enumeration order
//! - Prefix trie over node names for autocomplete
//! - Queries: shortest path, topic clusters, depth-limited mind map, neighbors, autocomplete
//! - Text and JSON output; every query takes `&KnowledgeGraph`, so one graph serves many threads
//!
//! # Quickstart (Library)
//! ```
//! use nexus_engine::graph::{KnowledgeGraph, LoadOptions};
//! use nexus_engine::query::PathOutcome;
//!
//! let text = "NODE: BERT\nNODE: Transformer\nEDGE: BERT|is a|Transformer\n";
//! let graph = KnowledgeGraph::load_from_reader(text.as_bytes(), LoadOptions::default())
//!     .expect("load graph");
//! let path = graph.shortest_path("BERT", "Transformer").expect("both nodes exist");
//! assert!(matches!(path, PathOutcome::Found { .. }));
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! nexus-engine --file graph.txt path BERT Transformer
//! nexus-engine --file graph.txt complete Conv --limit 10 --format json
//! ```
pub mod app;
pub mod cli;
pub mod errors;
pub mod graph;
pub mod parser;
pub mod query;
pub mod utils;
