// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use pretty_assertions::assert_eq;

use crate::errors::Error;
use crate::graph::Graph;
use crate::io::{ReadVerdict, WriteMode};
use crate::unit_tests::fixtures::max_planar5;

#[test]
fn adjacency_list_round_trip() {
    let g = max_planar5();
    let text = g.write_string(WriteMode::AdjacencyList).unwrap();

    let mut back = Graph::new();
    assert_eq!(back.read_str(&text).unwrap(), ReadVerdict::Complete);
    assert_eq!(back.vertex_count(), 5);
    assert_eq!(back.edge_count(), 9);

    assert_eq!(back.write_string(WriteMode::AdjacencyList).unwrap(), text);
}

#[test]
fn one_based_adjacency_list_parses() {
    let text = "N=3\n1: 2 3 0\n2: 1 3 0\n3: 1 2 0\n";
    let mut g = Graph::new();
    assert_eq!(g.read_str(text).unwrap(), ReadVerdict::Complete);
    assert_eq!(g.vertex_count(), 3);
    assert_eq!(g.edge_count(), 3);
    assert!(g.is_neighbor(0, 1));
    assert!(g.is_neighbor(1, 2));
    assert!(g.is_neighbor(0, 2));
    assert!(!g.has_directed_edges());
}

#[test]
fn zero_based_adjacency_list_is_detected_and_preserved() {
    let text = "N=4\n0: 1 3 -1\n1: 0 2 -1\n2: 1 3 -1\n3: 0 2 -1\n";
    let mut g = Graph::new();
    assert_eq!(g.read_str(text).unwrap(), ReadVerdict::Complete);
    assert_eq!(g.edge_count(), 4);

    let out = g.write_string(WriteMode::AdjacencyList).unwrap();
    assert!(out.lines().nth(1).unwrap().starts_with("0:"));
    assert!(out.lines().nth(1).unwrap().ends_with("-1"));
}

#[test]
fn one_sided_adjacency_becomes_directed() {
    // Vertex 1 claims the edge to 2 but 2 never claims it back, so the
    // edge is directed 1 -> 2; likewise 3 claims 2 for a directed 3 -> 2.
    let text = "N=3\n1: 2 0\n2: 0\n3: 2 0\n";
    let mut g = Graph::new();
    assert_eq!(g.read_str(text).unwrap(), ReadVerdict::Complete);
    assert_eq!(g.edge_count(), 2);
    assert!(g.has_directed_edges());
    assert!(g.is_neighbor(0, 1));
    assert!(!g.is_neighbor(1, 0));
    assert!(g.is_neighbor(2, 1));
    assert!(!g.is_neighbor(1, 2));

    let out = g.write_string(WriteMode::AdjacencyList).unwrap();
    let mut back = Graph::new();
    back.read_str(&out).unwrap();
    assert!(back.has_directed_edges());
    assert_eq!(back.write_string(WriteMode::AdjacencyList).unwrap(), out);
}

#[test]
fn out_of_order_vertices_are_rejected() {
    let text = "N=3\n1: 2 0\n3: 0\n2: 1 0\n";
    let mut g = Graph::new();
    match g.read_str(text) {
        Err(Error::MalformedInput(_)) => {}
        other => panic!("expected MalformedInput, got {:?}", other),
    }
}

#[test]
fn self_loops_are_rejected() {
    let text = "N=2\n1: 1 0\n2: 0\n";
    let mut g = Graph::new();
    assert!(matches!(g.read_str(text), Err(Error::MalformedInput(_))));
}

#[test]
fn adjacency_matrix_round_trip() {
    let g = max_planar5();
    let text = g.write_string(WriteMode::AdjacencyMatrix).unwrap();

    let mut back = Graph::new();
    assert_eq!(back.read_str(&text).unwrap(), ReadVerdict::Complete);
    assert_eq!(back.edge_count(), 9);
    assert_eq!(back.write_string(WriteMode::AdjacencyMatrix).unwrap(), text);
}

#[test]
fn adjacency_matrix_tolerates_whitespace() {
    let text = "3\n1 1\n 1\n";
    let mut g = Graph::new();
    assert_eq!(g.read_str(text).unwrap(), ReadVerdict::Complete);
    assert_eq!(g.edge_count(), 3);
}

#[test]
fn directed_graphs_cannot_be_written_as_matrix() {
    let text = "N=3\n1: 2 0\n2: 1 3 0\n3: 2 0\n";
    let mut g = Graph::new();
    g.read_str(text).unwrap();
    assert!(matches!(
        g.write_string(WriteMode::AdjacencyMatrix),
        Err(Error::DirectedEdgesUnsupported)
    ));
}

#[test]
fn leda_format_parses_ignoring_loops_and_parallels() {
    let text = "LEDA.GRAPH\nstring\nint\n4\na\nb\nc\nd\n5\n1 2\n2 3\n3 4\n2 3\n1 1\n";
    let mut g = Graph::new();
    assert_eq!(g.read_str(text).unwrap(), ReadVerdict::Complete);
    assert_eq!(g.vertex_count(), 4);
    assert_eq!(g.edge_count(), 3);
}

#[test]
fn capacity_overflow_reports_partial_read() {
    // Capacity for two edges only; the triangle's third edge is dropped.
    let text = "N=3\n1: 2 3 0\n2: 1 3 0\n3: 1 2 0\n";
    let mut g = Graph::new();
    g.ensure_arc_capacity(4).unwrap();
    assert_eq!(g.read_str(text).unwrap(), ReadVerdict::TooManyEdges);
    assert_eq!(g.edge_count(), 2);
}
