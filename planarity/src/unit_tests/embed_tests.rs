// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use pretty_assertions::assert_eq;

use crate::graph::{EmbedFlags, EmbedResult, Graph, ObstructionKind};
use crate::unit_tests::fixtures::{
    complete_bipartite, complete_graph, cycle_graph, graph_from_edges, max_planar5, path_graph,
    petersen, sample_tree,
};

fn embed_checked(mut g: Graph, flags: EmbedFlags) -> (Graph, EmbedResult) {
    let orig = g.dup_graph();
    let result = g.embed(flags).unwrap();
    assert!(
        g.check_embed_result_integrity(&orig).unwrap(),
        "integrity check failed for {:?} -> {:?}",
        flags,
        result
    );
    (g, result)
}

#[test]
fn k5_is_nonplanar_with_k5_witness() {
    let (g, result) = embed_checked(complete_graph(5), EmbedFlags::Planar);
    assert_eq!(result, EmbedResult::NonEmbeddable);
    assert!(g.obstruction_found());
    assert_eq!(g.edge_count(), 10);
    assert!(g.is_obstruction_subdivision(ObstructionKind::K5));
}

#[test]
fn k33_is_nonplanar_with_k33_witness() {
    let (g, result) = embed_checked(complete_bipartite(3, 3), EmbedFlags::Planar);
    assert_eq!(result, EmbedResult::NonEmbeddable);
    assert_eq!(g.edge_count(), 9);
    assert!(g.is_obstruction_subdivision(ObstructionKind::K33));
}

#[test]
fn k4_is_planar_but_not_outerplanar() {
    let (mut g, result) = embed_checked(complete_graph(4), EmbedFlags::Planar);
    assert_eq!(result, EmbedResult::Embedded);
    // 4 - 6 + f = 2 for the connected planar embedding.
    assert_eq!(g.face_count(), 4);

    let (g, result) = embed_checked(complete_graph(4), EmbedFlags::Outerplanar);
    assert_eq!(result, EmbedResult::NonEmbeddable);
    assert!(g.is_obstruction_subdivision(ObstructionKind::K4));
}

#[test]
fn petersen_graph_is_nonplanar() {
    let (g, result) = embed_checked(petersen(), EmbedFlags::Planar);
    assert_eq!(result, EmbedResult::NonEmbeddable);
    assert!(
        g.is_obstruction_subdivision(ObstructionKind::K33)
            || g.is_obstruction_subdivision(ObstructionKind::K5)
    );
}

#[test]
fn max_planar5_embeds_with_six_faces() {
    let (mut g, result) = embed_checked(max_planar5(), EmbedFlags::Planar);
    assert_eq!(result, EmbedResult::Embedded);
    assert_eq!(g.edge_count(), 9);
    assert_eq!(g.face_count(), 6);
}

#[test]
fn k6_and_k7_are_nonplanar() {
    for n in [6, 7] {
        let (g, result) = embed_checked(complete_graph(n), EmbedFlags::Planar);
        assert_eq!(result, EmbedResult::NonEmbeddable);
        assert!(
            g.is_obstruction_subdivision(ObstructionKind::K33)
                || g.is_obstruction_subdivision(ObstructionKind::K5)
        );
    }
}

#[test]
fn trees_embed_with_one_face() {
    let (mut g, result) = embed_checked(sample_tree(), EmbedFlags::Planar);
    assert_eq!(result, EmbedResult::Embedded);
    assert_eq!(g.face_count(), 1);

    let (_, result) = embed_checked(path_graph(8), EmbedFlags::Planar);
    assert_eq!(result, EmbedResult::Embedded);
}

#[test]
fn cycles_are_outerplanar() {
    for n in [3, 5, 8] {
        let (_, result) = embed_checked(cycle_graph(n), EmbedFlags::Outerplanar);
        assert_eq!(result, EmbedResult::Embedded);
    }
}

#[test]
fn k23_is_planar_but_not_outerplanar() {
    let (_, result) = embed_checked(complete_bipartite(2, 3), EmbedFlags::Planar);
    assert_eq!(result, EmbedResult::Embedded);

    let (g, result) = embed_checked(complete_bipartite(2, 3), EmbedFlags::Outerplanar);
    assert_eq!(result, EmbedResult::NonEmbeddable);
    assert!(g.is_obstruction_subdivision(ObstructionKind::K23));
}

#[test]
fn disconnected_graph_embeds() {
    // Two triangles and an isolated vertex.
    let g = graph_from_edges(7, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
    let (_, result) = embed_checked(g, EmbedFlags::Planar);
    assert_eq!(result, EmbedResult::Embedded);
}

#[test]
fn sorting_back_restores_original_labels() {
    let mut g = max_planar5();
    let before = g.write_string(crate::io::WriteMode::AdjacencyMatrix).unwrap();

    let result = g.embed(EmbedFlags::Planar).unwrap();
    assert_eq!(result, EmbedResult::Embedded);

    // The embedding leaves the graph in DFI order; sorting once restores
    // the input numbering, and the edge set is unchanged.
    g.sort_vertices().unwrap();
    let after = g.write_string(crate::io::WriteMode::AdjacencyMatrix).unwrap();
    assert_eq!(before, after);
}

#[test]
fn wheel_graph_is_planar_and_not_outerplanar() {
    // A hub joined to every rim vertex of a 6-cycle.
    let mut edges: Vec<(usize, usize)> = (1..=6).map(|v| (0, v)).collect();
    for v in 1..=6 {
        edges.push((v, if v == 6 { 1 } else { v + 1 }));
    }

    let (_, result) = embed_checked(graph_from_edges(7, &edges), EmbedFlags::Planar);
    assert_eq!(result, EmbedResult::Embedded);

    let (g, result) = embed_checked(graph_from_edges(7, &edges), EmbedFlags::Outerplanar);
    assert_eq!(result, EmbedResult::NonEmbeddable);
    assert!(
        g.is_obstruction_subdivision(ObstructionKind::K23)
            || g.is_obstruction_subdivision(ObstructionKind::K4)
    );
}
