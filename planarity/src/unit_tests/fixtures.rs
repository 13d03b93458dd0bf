// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared graphs for the unit tests.

use once_cell::sync::Lazy;

use crate::graph::Graph;

pub(super) fn graph_from_edges(n: usize, edges: &[(usize, usize)]) -> Graph {
    let mut g = Graph::new();
    if edges.len() * 2 > 6 * n {
        g.ensure_arc_capacity(edges.len() * 2).unwrap();
    }
    g.init_graph(n).unwrap();
    for &(u, v) in edges {
        g.add_edge(u, 0, v, 0).unwrap();
    }
    g
}

pub(super) fn complete_graph(n: usize) -> Graph {
    let edges: Vec<(usize, usize)> = (0..n)
        .flat_map(|u| ((u + 1)..n).map(move |v| (u, v)))
        .collect();
    graph_from_edges(n, &edges)
}

pub(super) fn complete_bipartite(a: usize, b: usize) -> Graph {
    let edges: Vec<(usize, usize)> = (0..a)
        .flat_map(|u| (a..a + b).map(move |v| (u, v)))
        .collect();
    graph_from_edges(a + b, &edges)
}

pub(super) fn path_graph(n: usize) -> Graph {
    let edges: Vec<(usize, usize)> = (1..n).map(|v| (v - 1, v)).collect();
    graph_from_edges(n, &edges)
}

pub(super) fn cycle_graph(n: usize) -> Graph {
    let mut edges: Vec<(usize, usize)> = (1..n).map(|v| (v - 1, v)).collect();
    edges.push((n - 1, 0));
    graph_from_edges(n, &edges)
}

// The 5-vertex maximal planar graph from the classic sample set:
// 9 edges, 6 faces.
pub(super) static MAX_PLANAR5_EDGES: &[(usize, usize)] = &[
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
    (1, 2),
    (1, 4),
    (2, 3),
    (2, 4),
    (3, 4),
];

pub(super) fn max_planar5() -> Graph {
    graph_from_edges(5, MAX_PLANAR5_EDGES)
}

// The Petersen graph: 10 vertices, 15 edges, 3-regular, non-planar, and
// a homeomorph container for K2,3, K3,3 and K4 alike.
pub(super) static PETERSEN_EDGES: Lazy<Vec<(usize, usize)>> = Lazy::new(|| {
    let mut edges = Vec::with_capacity(15);
    for v in 0..5 {
        // Outer cycle, spoke, inner pentagram.
        edges.push((v, (v + 1) % 5));
        edges.push((v, v + 5));
        edges.push((v + 5, (v + 2) % 5 + 5));
    }
    edges
});

pub(super) fn petersen() -> Graph {
    graph_from_edges(10, &PETERSEN_EDGES)
}

// A fixed 15-vertex "random" tree used where any tree will do.
pub(super) fn sample_tree() -> Graph {
    let edges: Vec<(usize, usize)> = vec![
        (0, 1),
        (0, 2),
        (1, 3),
        (1, 4),
        (2, 5),
        (2, 6),
        (4, 7),
        (4, 8),
        (5, 9),
        (6, 10),
        (6, 11),
        (8, 12),
        (9, 13),
        (11, 14),
    ];
    graph_from_edges(15, &edges)
}
