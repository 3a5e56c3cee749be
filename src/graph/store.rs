//! Node storage for the knowledge graph.
//!
//! Nodes live in an arena (`Vec<Node>`) and are addressed by [`NodeId`]. Names are
//! indexed by a fixed array of hash buckets whose chains hold node ids. The bucket
//! count is chosen at construction and never changes, which keeps enumeration
//! order ([`NodeStore::iter`]) stable for a loaded graph: bucket index ascending,
//! then most recently inserted first inside a bucket.
//!
//! Traversal bookkeeping is deliberately not stored on nodes. Each query asks for
//! a fresh [`TraversalState`] sized to the store, so two queries never observe
//! each other's marks.
use serde::Serialize;
use std::collections::VecDeque;
use std::ops::Index;

/// Bucket count used when no explicit capacity is configured.
///
/// Chains grow without bound, so lookups degrade to linear scans once the node
/// count is far above the bucket count. Raise it via [`NodeStore::with_buckets`]
/// for large inputs; doing so changes the enumeration order.
pub const DEFAULT_BUCKETS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

/// A directed, labeled edge. The source is the node that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub relation: String,
    pub dest: NodeId,
}

#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    // Front is the most recently inserted edge.
    edges: VecDeque<Edge>,
}

impl Node {
    fn new(name: &str) -> Self {
        Self { name: name.to_string(), edges: VecDeque::new() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Outgoing edges in list order (most recently inserted first).
    pub fn edges(&self) -> impl DoubleEndedIterator<Item = &Edge> + ExactSizeIterator {
        self.edges.iter()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The `i`-th edge in list order.
    #[must_use]
    pub fn edge(&self, i: usize) -> Option<&Edge> {
        self.edges.get(i)
    }

    /// First edge in list order that points at `dest`.
    #[must_use]
    pub fn edge_to(&self, dest: NodeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.dest == dest)
    }
}

/// Rolling `h * 33 + byte` hash reduced to a bucket index.
///
/// Bytes are sign-extended before mixing and arithmetic wraps at 32 bits, so
/// bucket placement (and therefore enumeration order) is identical for every
/// build of the engine.
#[must_use]
pub fn bucket_hash(name: &str, buckets: usize) -> usize {
    let mut h: u32 = 0;
    for &b in name.as_bytes() {
        #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
        let v = i32::from(b as i8) as u32;
        h = (h << 5).wrapping_add(h).wrapping_add(v);
    }
    h as usize % buckets.max(1)
}

#[derive(Debug, Clone)]
pub struct NodeStore {
    nodes: Vec<Node>,
    buckets: Vec<Vec<NodeId>>,
    edge_count: usize,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }
}

impl NodeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with an explicit bucket count (minimum 1).
    #[must_use]
    pub fn with_buckets(buckets: usize) -> Self {
        Self { nodes: Vec::new(), buckets: vec![Vec::new(); buckets.max(1)], edge_count: 0 }
    }

    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Get-or-create the node called `name`.
    pub fn insert(&mut self, name: &str) -> NodeId {
        let bucket = bucket_hash(name, self.buckets.len());
        if let Some(id) = self.find_in_bucket(bucket, name) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(name));
        self.buckets[bucket].push(id);
        id
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.find_in_bucket(bucket_hash(name, self.buckets.len()), name)
    }

    fn find_in_bucket(&self, bucket: usize, name: &str) -> Option<NodeId> {
        self.buckets[bucket].iter().rev().copied().find(|id| self.nodes[id.0].name == name)
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Prepend an edge `source -[relation]-> dest`.
    ///
    /// Returns `false` and leaves the store untouched when either id does not
    /// belong to this store.
    pub fn add_edge(&mut self, source: NodeId, dest: NodeId, relation: &str) -> bool {
        if dest.0 >= self.nodes.len() {
            return false;
        }
        let Some(node) = self.nodes.get_mut(source.0) else {
            return false;
        };
        node.edges.push_front(Edge { relation: relation.to_string(), dest });
        self.edge_count += 1;
        true
    }

    /// All nodes in store order: bucket index ascending, newest first within a bucket.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.buckets
            .iter()
            .flat_map(|chain| chain.iter().rev())
            .map(move |&id| (id, &self.nodes[id.0]))
    }

    /// Cleared traversal state sized to this store.
    #[must_use]
    pub fn traversal_state(&self) -> TraversalState {
        TraversalState::new(self.nodes.len())
    }
}

impl Index<NodeId> for NodeStore {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

/// Per-node mark. Each algorithm uses only the variants it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mark {
    #[default]
    Unvisited,
    Visited,
    Component(u32),
}

/// Marks and BFS parent links for one query run.
#[derive(Debug, Clone)]
pub struct TraversalState {
    marks: Vec<Mark>,
    parents: Vec<Option<NodeId>>,
}

impl TraversalState {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { marks: vec![Mark::Unvisited; len], parents: vec![None; len] }
    }

    /// Clear every mark and parent link.
    pub fn reset(&mut self) {
        self.marks.fill(Mark::Unvisited);
        self.parents.fill(None);
    }

    #[must_use]
    pub fn mark(&self, id: NodeId) -> Mark {
        self.marks[id.0]
    }

    #[must_use]
    pub fn is_unvisited(&self, id: NodeId) -> bool {
        self.marks[id.0] == Mark::Unvisited
    }

    pub fn set_mark(&mut self, id: NodeId, mark: Mark) {
        self.marks[id.0] = mark;
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents[id.0]
    }

    pub fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        self.parents[id.0] = Some(parent);
    }
}
