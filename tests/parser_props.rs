use nexus_engine::graph::{KnowledgeGraph, LoadOptions};
use nexus_engine::parser::LineParser;
use proptest::prelude::*;
use std::io::Cursor;

// A line generator biased towards the record prefixes so the interesting
// branches are hit often.
fn line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Ea-e ]{0,4}".prop_map(|n| format!("NODE: {n}")),
        "[A-E|]{0,4}\\|[a-z|]{0,3}\\|[A-E|]{0,4}".prop_map(|e| format!("EDGE: {e}")),
        "EDGE:[^\n]{0,8}",
        "[^\n]{0,12}",
    ]
}

proptest! {
    // The line parser should never panic on arbitrary input
    #[test]
    fn parser_never_panics_on_arbitrary_input(s in ".*") {
        let parser = LineParser::new();
        let _ = parser.parse_line(&s);
    }

    // The loader never panics on arbitrary bytes, and every line is accounted for
    #[test]
    fn loader_accounts_for_every_line(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let g = KnowledgeGraph::load_from_reader(Cursor::new(bytes), LoadOptions::default()).unwrap();
        let r = g.report();
        prop_assert!(r.malformed_lines + r.ignored_lines + r.edges + r.dropped_edges <= r.lines);
        prop_assert!(r.nodes <= r.lines);
        prop_assert_eq!(g.node_count(), r.nodes);
        prop_assert_eq!(g.edge_count(), r.edges);
    }

    // Every stored edge points at a node that exists, whichever load mode is used
    #[test]
    fn no_dangling_edges(lines in proptest::collection::vec(line(), 0..40), two_pass in any::<bool>()) {
        let text = lines.join("\n");
        let opts = LoadOptions { resolve_forward_refs: two_pass, ..LoadOptions::default() };
        let g = KnowledgeGraph::load_from_reader(Cursor::new(text.as_bytes()), opts).unwrap();
        let store = g.nodes();
        let mut total = 0;
        for (_, node) in store.iter() {
            for edge in node.edges() {
                prop_assert!(store.get(edge.dest).is_some());
                total += 1;
            }
        }
        prop_assert_eq!(total, g.edge_count());
        prop_assert_eq!(store.iter().count(), g.node_count());
    }

    // Every autocomplete suggestion is a node name carrying the prefix, in ascending order
    #[test]
    fn suggestions_are_sorted_prefixed_names(lines in proptest::collection::vec(line(), 0..40), prefix in "[A-E]{0,2}") {
        let text = lines.join("\n");
        let g = KnowledgeGraph::load_from_reader(Cursor::new(text.as_bytes()), LoadOptions::default()).unwrap();
        let found = g.prefix_index().search(&prefix, usize::MAX);
        for w in found.windows(2) {
            prop_assert!(w[0].as_bytes() < w[1].as_bytes());
        }
        for name in &found {
            prop_assert!(name.starts_with(prefix.as_str()));
            prop_assert!(g.nodes().find(name).is_some());
        }
    }
}
