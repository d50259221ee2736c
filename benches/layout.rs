// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use toposcope::geom::Bounds;
use toposcope::layout::{ForceLayout, IndentedLayout};
use toposcope::model::fixtures::{process_tree, server_graph};
use toposcope::model::{GraphEdge, GraphModel, GraphNode, NodeId, TreeModel, TreeNode};

// Benchmark identity (keep stable):
// - Group names in this file: `layout.force`, `layout.indented`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time (e.g. `demo`, `ring_64`, `wide_tree`).

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

/// A ring of `n` hosts, each linked to the next.
fn ring_graph(n: usize) -> GraphModel {
    let nodes = (0..n)
        .map(|i| {
            (
                nid(&format!("host{i}")),
                GraphNode::new_with(format!("host-{i}.example.com"), Some("bench".to_owned())),
            )
        })
        .collect();
    let edges = (0..n)
        .map(|i| GraphEdge::new(nid(&format!("host{i}")), nid(&format!("host{}", (i + 1) % n))))
        .collect();

    GraphModel::from_parts(nodes, edges).expect("ring graph")
}

/// A tree with `breadth` children per node down to `depth` levels.
fn wide_tree(depth: usize, breadth: usize) -> TreeModel {
    fn grow(prefix: &str, depth: usize, breadth: usize) -> TreeNode {
        let mut node = TreeNode::new(nid(prefix), format!("proc-{prefix}"));
        if depth > 0 {
            for i in 0..breadth {
                node.push_child(grow(&format!("{prefix}x{i}"), depth - 1, breadth));
            }
        }
        node
    }

    TreeModel::new(grow("p", depth, breadth)).expect("wide tree")
}

fn benches_layout(c: &mut Criterion) {
    let bounds = Bounds::new(1280.0, 800.0);

    {
        let mut group = c.benchmark_group("layout.force");

        for (case_id, model) in [
            ("demo", server_graph()),
            ("ring_64", ring_graph(64)),
            ("ring_256", ring_graph(256)),
        ] {
            let engine = ForceLayout::default().with_iterations(100);
            let nodes = model.nodes().len() as u64;

            group.throughput(Throughput::Elements(nodes));
            group.bench_function(case_id, move |b| {
                b.iter(|| {
                    let result = engine
                        .compute(black_box(&model), bounds, None)
                        .expect("layout");
                    black_box(result.positions().len())
                })
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("layout.indented");

        for (case_id, model) in [
            ("demo", process_tree()),
            ("wide_tree", wide_tree(4, 4)),
            ("deep_tree", wide_tree(9, 2)),
        ] {
            let engine = IndentedLayout::default();
            let nodes = model.visible_nodes().len() as u64;

            group.throughput(Throughput::Elements(nodes));
            group.bench_function(case_id, move |b| {
                b.iter(|| {
                    let result = engine.compute(black_box(&model), bounds).expect("layout");
                    black_box(result.positions().len().wrapping_add(result.routes().len()))
                })
            });
        }

        group.finish();
    }
}

criterion_group!(benches, benches_layout);
criterion_main!(benches);
