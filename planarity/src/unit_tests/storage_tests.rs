// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use pretty_assertions::assert_eq;

use crate::errors::Error;
use crate::graph::Graph;
use crate::io::WriteMode;
use crate::unit_tests::fixtures::{complete_graph, cycle_graph, graph_from_edges, max_planar5};

fn snapshot(g: &Graph) -> String {
    g.write_string(WriteMode::AdjacencyList).unwrap()
}

#[test]
fn add_and_delete_edges() {
    let mut g = Graph::new();
    g.init_graph(4).unwrap();

    g.add_edge(0, 0, 1, 0).unwrap();
    g.add_edge(1, 0, 2, 0).unwrap();
    g.add_edge(2, 0, 3, 0).unwrap();
    assert_eq!(g.edge_count(), 3);
    assert!(g.is_neighbor(1, 2));
    assert_eq!(g.vertex_degree(1), 2);

    // Deleting the middle edge leaves an edge hole that the next
    // addition reuses.
    let e = {
        let mut e = g.first_arc(1);
        while g.neighbor(e) != 2 {
            e = g.next_arc(e);
        }
        e
    };
    g.delete_edge(e, 0);
    assert_eq!(g.edge_count(), 2);
    assert!(!g.is_neighbor(1, 2));

    g.add_edge(0, 0, 3, 0).unwrap();
    assert_eq!(g.edge_count(), 3);
    assert_eq!(g.occupied_edge_bound(), 6);
}

#[test]
fn edge_capacity_is_enforced() {
    let mut g = Graph::new();
    g.ensure_arc_capacity(4).unwrap();
    g.init_graph(4).unwrap();

    g.add_edge(0, 0, 1, 0).unwrap();
    g.add_edge(1, 0, 2, 0).unwrap();
    match g.add_edge(2, 0, 3, 0) {
        Err(Error::TooManyEdges) => {}
        other => panic!("expected TooManyEdges, got {:?}", other.map(|_| ())),
    }

    // Raising the capacity afterwards unblocks the addition.
    g.ensure_arc_capacity(8).unwrap();
    g.add_edge(2, 0, 3, 0).unwrap();
    assert_eq!(g.edge_count(), 3);
}

#[test]
fn hide_and_restore_edges_in_reverse_order() {
    let mut g = max_planar5();
    let before = snapshot(&g);

    let e1 = g.first_arc(0);
    let e2 = g.first_arc(2);
    g.hide_edge(e1);
    g.hide_edge(e2);
    assert_ne!(snapshot(&g), before);

    g.restore_edge(e2);
    g.restore_edge(e1);
    assert_eq!(snapshot(&g), before);
}

#[test]
fn hide_and_restore_vertex() {
    let mut g = complete_graph(5);
    let before = snapshot(&g);

    g.hide_vertex(3).unwrap();
    assert_eq!(g.vertex_degree(3), 0);
    assert!(!g.is_neighbor(3, 0));

    g.restore_vertex().unwrap();
    assert_eq!(snapshot(&g), before);
}

#[test]
fn identify_and_restore_vertices() {
    // 0 and 2 share the neighbor 1, so identification must hide the
    // duplicate edge (2, 1) and restore it afterwards.
    let mut g = graph_from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (0, 4)]);
    let before = snapshot(&g);

    g.identify_vertices(0, 2, crate::graph::NIL).unwrap();
    assert_eq!(g.vertex_degree(2), 0);
    // 0 has taken over 2's adjacency to 3.
    assert!(g.is_neighbor(0, 3));

    g.restore_vertex().unwrap();
    assert_eq!(snapshot(&g), before);
}

#[test]
fn contract_edge_and_restore() {
    let mut g = cycle_graph(5);
    let before = snapshot(&g);

    let e = g.first_arc(0);
    let other = g.neighbor(e);
    g.contract_edge(e).unwrap();

    // Hidden arcs stay in storage, but the contracted endpoint is empty
    // and its other adjacency has moved to 0.
    assert_eq!(g.vertex_degree(other), 0);
    assert_eq!(g.vertex_degree(0), 2);

    g.restore_vertex().unwrap();
    assert_eq!(snapshot(&g), before);
}

#[test]
fn nested_identifications_restore_in_reverse() {
    let mut g = complete_graph(4);
    let before = snapshot(&g);

    g.identify_vertices(0, 1, crate::graph::NIL).unwrap();
    g.identify_vertices(0, 2, crate::graph::NIL).unwrap();
    assert_eq!(g.vertex_degree(1), 0);
    assert_eq!(g.vertex_degree(2), 0);

    g.restore_vertices().unwrap();
    assert_eq!(snapshot(&g), before);
}

#[test]
fn sort_vertices_is_an_involution() {
    // An adjacency pattern whose DFS order differs from the input order.
    let mut g = graph_from_edges(6, &[(0, 3), (3, 1), (1, 5), (5, 2), (2, 4), (4, 0), (3, 5)]);
    let before = snapshot(&g);

    g.sort_vertices().unwrap();
    g.sort_vertices().unwrap();
    assert_eq!(snapshot(&g), before);
}

#[test]
fn reinitialize_restores_the_post_init_state() {
    let mut g = max_planar5();
    g.embed(crate::graph::EmbedFlags::Planar).unwrap();

    g.reinitialize();
    assert_eq!(g.edge_count(), 0);
    assert_eq!(g.vertex_count(), 5);

    // The graph is usable again from scratch.
    g.add_edge(0, 0, 1, 0).unwrap();
    assert_eq!(g.edge_count(), 1);
}

#[test]
fn lowpoint_utility_matches_the_structure() {
    // A triangle with a pendant path: the triangle members reach the
    // root, the pendant path does not reach above its own subtree.
    let mut g = graph_from_edges(5, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4)]);
    g.lowpoint_and_least_ancestor().unwrap();

    // Sorted by DFI, vertex 0 is the root and the triangle closes with a
    // back edge to it.
    assert_eq!(g.lowpoint(0), 0);
    assert_eq!(g.lowpoint(1), 0);
    assert_eq!(g.lowpoint(2), 0);

    // The pendant chain hangs off DFI 3 and 4 in one order or another;
    // neither reaches an ancestor by a back edge.
    assert!(g.lowpoint(4) >= 3);
}

#[test]
fn dup_graph_is_deep() {
    let mut g = max_planar5();
    let dup = g.dup_graph();
    assert_eq!(snapshot(&g), snapshot(&dup));

    let e = g.first_arc(0);
    g.delete_edge(e, 0);
    assert_eq!(dup.edge_count(), 9);
    assert_eq!(g.edge_count(), 8);
}
