//! Traversal algorithms over a [`NodeStore`].
//!
//! Every function allocates its own [`TraversalState`](crate::graph::TraversalState),
//! so calls are independent of one another and of any concurrent caller. Edges
//! are always read in list order (most recently inserted first); the orderings
//! documented below follow from that and are stable for a given input file.
use std::collections::VecDeque;

use crate::graph::{Edge, Mark, NodeId, NodeStore};

/// Breadth-first search from `start` to `end` over outgoing edges.
///
/// Returns the node sequence `start ..= end`, or `None` when `end` is not
/// reachable. Each node keeps the parent that discovered it first, so among
/// equally short paths the one through earlier-listed edges wins.
#[must_use]
pub fn shortest_path(store: &NodeStore, start: NodeId, end: NodeId) -> Option<Vec<NodeId>> {
    let mut state = store.traversal_state();
    let mut queue = VecDeque::new();
    state.set_mark(start, Mark::Visited);
    queue.push_back(start);

    let mut found = false;
    while let Some(cur) = queue.pop_front() {
        if cur == end {
            found = true;
            break;
        }
        for edge in store[cur].edges() {
            if state.is_unvisited(edge.dest) {
                state.set_mark(edge.dest, Mark::Visited);
                state.set_parent(edge.dest, cur);
                queue.push_back(edge.dest);
            }
        }
    }
    if !found {
        return None;
    }

    let mut path = vec![end];
    let mut cur = end;
    while let Some(parent) = state.parent(cur) {
        path.push(parent);
        cur = parent;
    }
    path.reverse();
    Some(path)
}

/// Label every node with a component id by directed reachability.
///
/// Roots are taken in store order. From each unclaimed root an iterative DFS
/// claims every unclaimed node reachable over outgoing edges; nodes already
/// claimed by an earlier component stay there. Returns `(id, members)` with ids
/// counting from 1 and members in visitation order: unclaimed destinations are
/// pushed in edge-list order, so the last one pushed is expanded first.
#[must_use]
pub fn components(store: &NodeStore) -> Vec<(u32, Vec<NodeId>)> {
    let mut state = store.traversal_state();
    let mut out = Vec::new();
    let mut stack: Vec<NodeId> = Vec::new();
    let mut next_id: u32 = 1;

    for (root, _) in store.iter() {
        if !state.is_unvisited(root) {
            continue;
        }
        let mut members = Vec::new();
        stack.push(root);
        while let Some(cur) = stack.pop() {
            if !state.is_unvisited(cur) {
                continue;
            }
            state.set_mark(cur, Mark::Component(next_id));
            members.push(cur);
            for edge in store[cur].edges() {
                if state.is_unvisited(edge.dest) {
                    stack.push(edge.dest);
                }
            }
        }
        out.push((next_id, members));
        next_id += 1;
    }
    out
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: NodeId,
    depth: usize,
    next_edge: usize,
}

/// Depth-limited pre-order walk from `start`, returning every traversed edge as
/// `(source, edge)`.
///
/// `start` sits at depth 0. A node at depth `d < max_depth` reports all of its
/// outgoing edges in list order, each one before the walk descends into it. A
/// destination is entered only if it has not been entered in this walk and
/// `d + 1 < max_depth`; edges into already-entered nodes are still reported.
#[must_use]
pub fn bounded_dfs(store: &NodeStore, start: NodeId, max_depth: usize) -> Vec<(NodeId, &Edge)> {
    let mut records = Vec::new();
    if max_depth == 0 {
        return records;
    }
    let mut state = store.traversal_state();
    state.set_mark(start, Mark::Visited);
    let mut stack = vec![Frame { node: start, depth: 0, next_edge: 0 }];

    while let Some(top) = stack.len().checked_sub(1) {
        let Frame { node, depth, next_edge } = stack[top];
        let Some(edge) = store[node].edge(next_edge) else {
            stack.pop();
            continue;
        };
        stack[top].next_edge += 1;
        records.push((node, edge));
        if depth + 1 < max_depth && state.is_unvisited(edge.dest) {
            state.set_mark(edge.dest, Mark::Visited);
            stack.push(Frame { node: edge.dest, depth: depth + 1, next_edge: 0 });
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(nodes: &[&str], edges: &[(&str, &str, &str)]) -> NodeStore {
        let mut s = NodeStore::new();
        for n in nodes {
            s.insert(n);
        }
        for (from, rel, to) in edges {
            let (f, t) = (s.find(from).unwrap(), s.find(to).unwrap());
            s.add_edge(f, t, rel);
        }
        s
    }

    fn names(s: &NodeStore, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|&id| s[id].name().to_string()).collect()
    }

    #[test]
    fn bfs_prefers_fewest_hops() {
        let s = store(&["A", "B", "C"], &[("A", "r", "B"), ("B", "r", "C"), ("A", "r", "C")]);
        let p = shortest_path(&s, s.find("A").unwrap(), s.find("C").unwrap()).unwrap();
        assert_eq!(names(&s, &p), vec!["A", "C"]);
    }

    #[test]
    fn bfs_tie_breaks_by_edge_list_order() {
        // Two 2-hop routes; A's newest edge (to C) is explored first
        let s = store(
            &["A", "B", "C", "D"],
            &[("A", "r", "B"), ("A", "r", "C"), ("B", "r", "D"), ("C", "r", "D")],
        );
        let p = shortest_path(&s, s.find("A").unwrap(), s.find("D").unwrap()).unwrap();
        assert_eq!(names(&s, &p), vec!["A", "C", "D"]);
    }

    #[test]
    fn bfs_same_node_and_unreachable() {
        let s = store(&["A", "B"], &[("B", "r", "A")]);
        let a = s.find("A").unwrap();
        let b = s.find("B").unwrap();
        assert_eq!(shortest_path(&s, a, a), Some(vec![a]));
        assert_eq!(shortest_path(&s, a, b), None);
    }

    #[test]
    fn components_follow_outgoing_edges_only() {
        let s = store(&["A", "B", "C"], &[("A", "r", "B")]);
        let comps: Vec<(u32, Vec<String>)> =
            components(&s).into_iter().map(|(id, m)| (id, names(&s, &m))).collect();
        assert_eq!(comps, vec![(1, vec!["A".into(), "B".into()]), (2, vec!["C".into()])]);
    }

    #[test]
    fn components_do_not_reclaim_earlier_nodes() {
        // B -> A, but A comes first in store order and claims only itself
        let s = store(&["A", "B"], &[("B", "r", "A")]);
        let comps: Vec<Vec<String>> = components(&s).into_iter().map(|(_, m)| names(&s, &m)).collect();
        assert_eq!(comps, vec![vec!["A".to_string()], vec!["B".to_string()]]);
    }

    #[test]
    fn components_visit_last_pushed_first() {
        // A's list is [C, B]; B is pushed last and expanded first
        let s = store(&["A", "B", "C", "D"], &[("A", "r", "B"), ("A", "r", "C"), ("C", "r", "D")]);
        let comps = components(&s);
        assert_eq!(comps.len(), 1);
        assert_eq!(names(&s, &comps[0].1), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn bounded_dfs_terminates_on_cycles() {
        let s = store(&["A", "B"], &[("A", "to", "B"), ("B", "back", "A")]);
        let recs = bounded_dfs(&s, s.find("A").unwrap(), 3);
        let got: Vec<(&str, &str, &str)> =
            recs.iter().map(|(src, e)| (s[*src].name(), e.relation.as_str(), s[e.dest].name())).collect();
        assert_eq!(got, vec![("A", "to", "B"), ("B", "back", "A")]);
    }

    #[test]
    fn bounded_dfs_stops_at_depth() {
        let s = store(
            &["A", "B", "C", "D"],
            &[("A", "r", "B"), ("B", "r", "C"), ("C", "r", "D")],
        );
        let a = s.find("A").unwrap();
        assert!(bounded_dfs(&s, a, 0).is_empty());
        assert_eq!(bounded_dfs(&s, a, 1).len(), 1);
        let two: Vec<&str> = bounded_dfs(&s, a, 2).iter().map(|(_, e)| s[e.dest].name()).collect();
        assert_eq!(two, vec!["B", "C"]);
        assert_eq!(bounded_dfs(&s, a, 10).len(), 3);
    }

    #[test]
    fn bounded_dfs_is_pre_order_in_list_order() {
        // A's list is [C, B]: C's subtree is reported before the A -> B edge
        let s = store(
            &["A", "B", "C", "D"],
            &[("A", "r", "B"), ("A", "r", "C"), ("C", "r", "D")],
        );
        let got: Vec<(&str, &str)> = bounded_dfs(&s, s.find("A").unwrap(), 5)
            .iter()
            .map(|(src, e)| (s[*src].name(), s[e.dest].name()))
            .collect();
        assert_eq!(got, vec![("A", "C"), ("C", "D"), ("A", "B")]);
    }
}
