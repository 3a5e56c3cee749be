use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nexus_engine::graph::{KnowledgeGraph, LoadOptions};
use std::fmt::Write as _;
use std::io::Cursor;

// Synthetic input: `n` nodes, each with three outgoing edges.
fn synthetic(n: usize) -> String {
    let mut text = String::new();
    for i in 0..n {
        let _ = writeln!(text, "NODE: concept-{i}");
    }
    for i in 0..n {
        for k in [1, 7, 31] {
            let _ = writeln!(text, "EDGE: concept-{i}|rel-{k}|concept-{}", (i + k) % n);
        }
    }
    text
}

fn bench_build_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");

    for n in [1_000usize, 10_000] {
        let text = synthetic(n);
        group.throughput(Throughput::Bytes(text.len() as u64));
        for (label, opts) in [
            ("single_pass", LoadOptions::default()),
            ("two_pass", LoadOptions { resolve_forward_refs: true, ..LoadOptions::default() }),
            ("buckets_16k", LoadOptions { buckets: 16_384, ..LoadOptions::default() }),
        ] {
            group.bench_with_input(BenchmarkId::new(label, n), &text, |b, text| {
                b.iter(|| {
                    let graph = KnowledgeGraph::load_from_reader(Cursor::new(black_box(text.as_bytes())), opts)
                        .expect("load graph");
                    // prevent optimizer from discarding
                    black_box(graph.edge_count())
                })
            });
        }
    }

    group.finish();
}

criterion_group!(name = benches; config = Criterion::default(); targets = bench_build_graph);
criterion_main!(benches);
