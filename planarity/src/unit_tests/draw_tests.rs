// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use pretty_assertions::assert_eq;

use crate::errors::Error;
use crate::extensions::{attach_draw_planar, visibility_representation, VisibilityRepresentation};
use crate::graph::{EmbedFlags, EmbedResult, Graph};
use crate::unit_tests::fixtures::{complete_graph, cycle_graph, max_planar5, path_graph};

fn draw(mut g: Graph) -> Result<VisibilityRepresentation, Error> {
    attach_draw_planar(&mut g)?;
    let result = g.embed(EmbedFlags::DrawPlanar)?;
    assert_eq!(result, EmbedResult::Embedded);
    visibility_representation(&g)
}

// Structural validity of a visibility representation: every edge segment
// touches exactly its two endpoint rows, sits inside both endpoint
// segments' column ranges, rows are unique per vertex, and segments in a
// shared column only meet at a common endpoint's row.
fn verify(rep: &VisibilityRepresentation, n: usize, m: usize) {
    assert_eq!(rep.edge_segments().len(), m);

    let mut rows_seen = vec![false; rep.rows()];
    for v in 0..n {
        let row = rep.vertex_row(v);
        assert!(!rows_seen[row], "two vertices on row {}", row);
        rows_seen[row] = true;

        let (c0, c1) = rep.vertex_cols(v);
        assert!(c0 <= c1 && c1 < rep.cols());
    }

    for seg in rep.edge_segments() {
        assert_eq!(seg.rows.0, rep.vertex_row(seg.lower));
        assert_eq!(seg.rows.1, rep.vertex_row(seg.upper));
        assert!(seg.rows.0 < seg.rows.1);

        for &end in &[seg.lower, seg.upper] {
            let (c0, c1) = rep.vertex_cols(end);
            assert!(
                seg.col >= c0 && seg.col <= c1,
                "edge column {} outside vertex {} range {}..={}",
                seg.col,
                end,
                c0,
                c1
            );
        }
    }

    // A vertex segment may only cross an edge column at an endpoint row.
    for v in 0..n {
        let row = rep.vertex_row(v);
        let (c0, c1) = rep.vertex_cols(v);
        for seg in rep.edge_segments() {
            if seg.col >= c0 && seg.col <= c1 && seg.rows.0 < row && row < seg.rows.1 {
                panic!("edge ({}, {}) crosses vertex {}", seg.lower, seg.upper, v);
            }
        }
    }

    // Segments sharing a column must not overlap except at a shared
    // vertex row.
    let segs = rep.edge_segments();
    for (i, a) in segs.iter().enumerate() {
        for b in segs.iter().skip(i + 1) {
            if a.col != b.col {
                continue;
            }
            let lo = a.rows.0.max(b.rows.0);
            let hi = a.rows.1.min(b.rows.1);
            assert!(
                hi <= lo,
                "edge segments overlap in column {}: {:?} and {:?}",
                a.col,
                a.rows,
                b.rows
            );
        }
    }
}

#[test]
fn draws_a_single_edge() {
    let rep = draw(path_graph(2)).unwrap();
    verify(&rep, 2, 1);
}

#[test]
fn draws_a_cycle() {
    let rep = draw(cycle_graph(5)).unwrap();
    verify(&rep, 5, 5);
    assert_eq!(rep.rows(), 5);
}

#[test]
fn draws_k4() {
    let rep = draw(complete_graph(4)).unwrap();
    verify(&rep, 4, 6);
}

#[test]
fn draws_max_planar5() {
    let rep = draw(max_planar5()).unwrap();
    verify(&rep, 5, 9);

    let text = rep.render();
    assert!(text.contains('|'));
    assert!(text.contains('-'));
}

#[test]
fn separable_graphs_are_not_drawable() {
    let mut g = path_graph(4);
    attach_draw_planar(&mut g).unwrap();
    match g.embed(EmbedFlags::DrawPlanar) {
        Err(Error::NotDrawable(_)) => {}
        other => panic!("expected NotDrawable, got {:?}", other),
    }
}

#[test]
fn nonplanar_input_reports_the_obstruction() {
    let mut g = complete_graph(5);
    attach_draw_planar(&mut g).unwrap();
    let result = g.embed(EmbedFlags::DrawPlanar).unwrap();
    assert_eq!(result, EmbedResult::NonEmbeddable);
    assert!(matches!(
        visibility_representation(&g),
        Err(Error::NotDrawable(_))
    ));
}
