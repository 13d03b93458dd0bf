// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use pretty_assertions::assert_eq;

use crate::extensions::{
    attach_k23_search, attach_k33_search, attach_k4_search, detach_k23_search, detach_k33_search,
    detach_k4_search, has_extension,
};
use crate::graph::{EmbedFlags, EmbedResult, Graph, ObstructionKind};
use crate::io::WriteMode;
use crate::unit_tests::fixtures::{
    complete_bipartite, complete_graph, cycle_graph, graph_from_edges, max_planar5, petersen,
    sample_tree,
};

fn search_checked(mut g: Graph, flags: EmbedFlags) -> (Graph, EmbedResult) {
    let orig = g.dup_graph();
    match flags {
        EmbedFlags::SearchForK23 => attach_k23_search(&mut g).unwrap(),
        EmbedFlags::SearchForK33 => attach_k33_search(&mut g).unwrap(),
        EmbedFlags::SearchForK4 => attach_k4_search(&mut g).unwrap(),
        _ => panic!("not a search flag"),
    }

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
fn petersen_contains_k33_homeomorph() {
    let (g, result) = search_checked(petersen(), EmbedFlags::SearchForK33);
    assert_eq!(result, EmbedResult::NonEmbeddable);
    assert!(g.is_obstruction_subdivision(ObstructionKind::K33));
}

#[test]
fn petersen_contains_k4_homeomorph() {
    let (g, result) = search_checked(petersen(), EmbedFlags::SearchForK4);
    assert_eq!(result, EmbedResult::NonEmbeddable);
    assert!(g.is_obstruction_subdivision(ObstructionKind::K4));
}

#[test]
fn petersen_contains_k23_homeomorph() {
    let (g, result) = search_checked(petersen(), EmbedFlags::SearchForK23);
    assert_eq!(result, EmbedResult::NonEmbeddable);
    assert!(g.is_obstruction_subdivision(ObstructionKind::K23));
}

#[test]
fn triangle_contains_no_homeomorphs() {
    for flags in [
        EmbedFlags::SearchForK23,
        EmbedFlags::SearchForK33,
        EmbedFlags::SearchForK4,
    ] {
        let (_, result) = search_checked(cycle_graph(3), flags);
        assert_eq!(result, EmbedResult::Embedded, "triangle vs {:?}", flags);
    }
}

#[test]
fn k6_contains_k33_homeomorph() {
    let (g, result) = search_checked(complete_graph(6), EmbedFlags::SearchForK33);
    assert_eq!(result, EmbedResult::NonEmbeddable);
    assert!(g.is_obstruction_subdivision(ObstructionKind::K33));
}

#[test]
fn k4_search_finds_k4_in_k4() {
    let (g, result) = search_checked(complete_graph(4), EmbedFlags::SearchForK4);
    assert_eq!(result, EmbedResult::NonEmbeddable);
    assert!(g.is_obstruction_subdivision(ObstructionKind::K4));
}

#[test]
fn subdivided_k4_is_found() {
    // K4 on {0, 1, 2, 3} with every edge subdivided through 4..=9.
    let g = graph_from_edges(
        10,
        &[
            (0, 4),
            (4, 1),
            (0, 5),
            (5, 2),
            (0, 6),
            (6, 3),
            (1, 7),
            (7, 2),
            (1, 8),
            (8, 3),
            (2, 9),
            (9, 3),
        ],
    );
    let (g, result) = search_checked(g, EmbedFlags::SearchForK4);
    assert_eq!(result, EmbedResult::NonEmbeddable);
    assert!(g.is_obstruction_subdivision(ObstructionKind::K4));
}

#[test]
fn k23_search_finds_k23_but_no_k4_in_k23() {
    let (g, result) = search_checked(complete_bipartite(2, 3), EmbedFlags::SearchForK23);
    assert_eq!(result, EmbedResult::NonEmbeddable);
    assert!(g.is_obstruction_subdivision(ObstructionKind::K23));

    let (_, result) = search_checked(complete_bipartite(2, 3), EmbedFlags::SearchForK4);
    assert_eq!(result, EmbedResult::Embedded);
}

#[test]
fn k4_search_ignores_clean_k4_free_planar_graphs() {
    let (_, result) = search_checked(sample_tree(), EmbedFlags::SearchForK4);
    assert_eq!(result, EmbedResult::Embedded);

    let (_, result) = search_checked(cycle_graph(8), EmbedFlags::SearchForK23);
    assert_eq!(result, EmbedResult::Embedded);
}

#[test]
fn k33_search_tolerates_k5() {
    // A K3,3 subdivision needs six branch vertices, so K5 contains none:
    // the search must reduce the blocked bicomp and finish clean.
    let (_, result) = search_checked(complete_graph(5), EmbedFlags::SearchForK33);
    assert_eq!(result, EmbedResult::Embedded);

    // Likewise with extra planar structure hanging off the K5.
    let mut edges: Vec<(usize, usize)> = (0..5)
        .flat_map(|u| ((u + 1)..5).map(move |v| (u, v)))
        .collect();
    edges.extend([(0, 5), (5, 6), (6, 0)]);
    let (_, result) = search_checked(graph_from_edges(7, &edges), EmbedFlags::SearchForK33);
    assert_eq!(result, EmbedResult::Embedded);
}

#[test]
fn searches_attach_and_detach_cleanly() {
    let mut g = max_planar5();
    let before = g.write_string(WriteMode::AdjacencyList).unwrap();

    attach_k33_search(&mut g).unwrap();
    assert!(has_extension(&g, "K33Search"));
    attach_k4_search(&mut g).unwrap();
    attach_k23_search(&mut g).unwrap();

    // Attach is idempotent.
    attach_k33_search(&mut g).unwrap();

    detach_k4_search(&mut g).unwrap();
    detach_k33_search(&mut g).unwrap();
    detach_k23_search(&mut g).unwrap();
    assert!(!has_extension(&g, "K33Search"));

    assert_eq!(g.write_string(WriteMode::AdjacencyList).unwrap(), before);

    // The graph still embeds normally afterwards.
    let result = g.embed(EmbedFlags::Planar).unwrap();
    assert_eq!(result, EmbedResult::Embedded);
}

#[test]
fn stacked_searches_compose() {
    // With all three searches attached, each flag still selects its own
    // behavior through the overload chain.
    let mut g = petersen();
    attach_k23_search(&mut g).unwrap();
    attach_k33_search(&mut g).unwrap();
    attach_k4_search(&mut g).unwrap();

    let result = g.embed(EmbedFlags::SearchForK33).unwrap();
    assert_eq!(result, EmbedResult::NonEmbeddable);
    assert!(g.is_obstruction_subdivision(ObstructionKind::K33));
}
