// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use proptest::collection::vec;
use proptest::prelude::*;

use crate::graph::{EmbedFlags, Graph};
use crate::io::WriteMode;
use crate::unit_tests::fixtures::graph_from_edges;

// A simple graph on up to `max_n` vertices as a deduplicated edge list.
fn arb_graph(max_n: usize) -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (2..=max_n).prop_flat_map(|n| {
        let edge = (0..n, 0..n).prop_filter_map("self-loop", |(u, v)| {
            if u == v {
                None
            } else {
                Some((u.min(v), u.max(v)))
            }
        });
        vec(edge, 0..=(n * (n - 1) / 2)).prop_map(move |mut edges| {
            edges.sort_unstable();
            edges.dedup();
            (n, edges)
        })
    })
}

proptest! {
    // Every embedding or obstruction must verify against the original.
    #[test]
    fn embed_results_pass_integrity((n, edges) in arb_graph(10)) {
        for flags in [EmbedFlags::Planar, EmbedFlags::Outerplanar] {
            let mut g = graph_from_edges(n, &edges);
            let orig = g.dup_graph();
            let result = g.embed(flags).unwrap();
            prop_assert!(
                g.check_embed_result_integrity(&orig).unwrap(),
                "integrity failed for {:?} -> {:?} on n={} edges={:?}",
                flags, result, n, edges
            );
        }
    }

    // Sorting by DFI twice restores the original graph.
    #[test]
    fn sort_vertices_involution((n, edges) in arb_graph(12)) {
        let mut g = graph_from_edges(n, &edges);
        let before = g.write_string(WriteMode::AdjacencyList).unwrap();
        g.sort_vertices().unwrap();
        g.sort_vertices().unwrap();
        prop_assert_eq!(g.write_string(WriteMode::AdjacencyList).unwrap(), before);
    }

    // Adjacency list output parses back to the same graph.
    #[test]
    fn adjacency_list_round_trip((n, edges) in arb_graph(12)) {
        let g = graph_from_edges(n, &edges);
        let text = g.write_string(WriteMode::AdjacencyList).unwrap();

        let mut back = Graph::new();
        back.read_str(&text).unwrap();
        prop_assert_eq!(back.write_string(WriteMode::AdjacencyList).unwrap(), text);
    }

    // Hiding a vertex and restoring it is the identity.
    #[test]
    fn hide_restore_identity((n, edges) in arb_graph(10), pick in 0usize..10) {
        let mut g = graph_from_edges(n, &edges);
        let v = pick % n;
        let before = g.write_string(WriteMode::AdjacencyList).unwrap();

        g.hide_vertex(v).unwrap();
        g.restore_vertex().unwrap();
        prop_assert_eq!(g.write_string(WriteMode::AdjacencyList).unwrap(), before);
    }
}
