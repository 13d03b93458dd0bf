// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search for a subgraph homeomorphic to K2,3.
//!
//! Runs the outerplanarity embedder and takes over when a bicomp blocks.
//! Outerplanar minors A and B directly yield the K2,3 witness. Minor E is
//! a K4; additional tests look for a K2,3 entangled with it, and when none
//! exists the bicomp is restored and the embedding continues.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::Error;
use crate::extensions::{self, FunctionTable, SharedContext, K23_SEARCH_ID};
use crate::graph::embed_core::{join_bicomps, orient_vertices_in_bicomp};
use crate::graph::isolator::{
    add_and_mark_edge, delete_unmarked_vertices_and_edges, find_unembedded_edge_to_ancestor,
    find_unembedded_edge_to_cur_vertex, find_unembedded_edge_to_subtree,
    mark_path_along_bicomp_ext_face,
};
use crate::graph::nonplanar::{
    choose_type_of_nonouterplanarity_minor, get_neighbor_on_ext_face, mark_highest_xy_path,
};
use crate::graph::outerplanar::{isolate_obstruction_a, isolate_obstruction_b};
use crate::graph::{EmbedFlags, EmbedResult, Graph, MinorFlags};

// The K2,3 search needs no parallel arrays; the context only anchors the
// extension record.
struct K23SearchContext;

/// Attaches the K2,3 search feature to the graph. A no-op if it is
/// already attached.
pub fn attach_k23_search(g: &mut Graph) -> Result<(), Error> {
    if extensions::has_extension(g, K23_SEARCH_ID) {
        return Ok(());
    }

    let context: SharedContext = Rc::new(RefCell::new(K23SearchContext));
    extensions::add_extension(g, K23_SEARCH_ID, context, dup_context, overload);
    Ok(())
}

/// Detaches the K2,3 search feature.
pub fn detach_k23_search(g: &mut Graph) -> Result<(), Error> {
    extensions::remove_extension(g, K23_SEARCH_ID)
}

fn dup_context(_context: &dyn Any, _g: &Graph) -> SharedContext {
    Rc::new(RefCell::new(K23SearchContext))
}

fn overload(table: &mut FunctionTable) {
    table.handle_blocked_bicomp = handle_blocked_bicomp;
    table.embed_postprocess = embed_postprocess;
    table.check_embedding_integrity = check_embedding_integrity;
}

fn handle_blocked_bicomp(
    g: &mut Graph,
    v: usize,
    root_vertex: usize,
    r: usize,
) -> Result<EmbedResult, Error> {
    if g.embed_flags != Some(EmbedFlags::SearchForK23) {
        let saved = extensions::saved_functions(g, K23_SEARCH_ID)?;
        return (saved.handle_blocked_bicomp)(g, v, root_vertex, r);
    }

    // A descendant bicomp root on the stack corresponds to minor A, which
    // is a K2,3, so the "proceed elsewhere" result cannot occur for it and
    // the pushed pair never needs to be popped back off.
    if r != root_vertex {
        g.stack.push2(r, 0);
    }

    search_for_k23_in_bicomp(g, v, r)
}

fn embed_postprocess(
    g: &mut Graph,
    v: usize,
    edge_embedding_result: EmbedResult,
) -> Result<EmbedResult, Error> {
    // In search mode the result is already known; the embedding itself is
    // not consolidated.
    if g.embed_flags == Some(EmbedFlags::SearchForK23) {
        return Ok(edge_embedding_result);
    }

    let saved = extensions::saved_functions(g, K23_SEARCH_ID)?;
    (saved.embed_postprocess)(g, v, edge_embedding_result)
}

fn check_embedding_integrity(g: &mut Graph, orig: &Graph) -> Result<bool, Error> {
    if g.embed_flags == Some(EmbedFlags::SearchForK23) {
        return Ok(true);
    }

    let saved = extensions::saved_functions(g, K23_SEARCH_ID)?;
    (saved.check_embedding_integrity)(g, orig)
}

fn search_for_k23_in_bicomp(g: &mut Graph, v: usize, r: usize) -> Result<EmbedResult, Error> {
    choose_type_of_nonouterplanarity_minor(g, v, r)?;

    // Minors A and B are the desired K2,3 homeomorph.
    if g.ic.minor_type.intersects(MinorFlags::A) || g.ic.minor_type.intersects(MinorFlags::B) {
        g.clear_all_visited_flags();

        if g.ic.minor_type.intersects(MinorFlags::A) {
            g.ic.dw = find_unembedded_edge_to_cur_vertex(g, g.ic.w)
                .ok_or(Error::Internal("W lost its connection to v"))?;
            isolate_obstruction_a(g)?;
        } else {
            let subtree_root = g.last_pertinent_root_child(g.ic.w);
            g.ic.dw = find_unembedded_edge_to_subtree(g, g.ic.v, subtree_root)
                .ok_or(Error::Internal("minor B subtree lost its v connection"))?;
            isolate_obstruction_b(g)?;
        }

        delete_unmarked_vertices_and_edges(g)?;
        return Ok(EmbedResult::NonEmbeddable);
    }

    // Minor E is a K4. Any vertex other than R, X, Y and W along the
    // external face yields a K2,3 by pattern E1 or E2.
    let x = g.ic.x;
    let y = g.ic.y;
    let (wx, _) = get_neighbor_on_ext_face(g, x, 1);
    let (wy, _) = get_neighbor_on_ext_face(g, y, 0);
    if g.ic.w != wx || g.ic.w != wy {
        g.clear_all_visited_flags();
        isolate_obstruction_e1_or_e2(g)?;
        delete_unmarked_vertices_and_edges(g)?;
        return Ok(EmbedResult::NonEmbeddable);
    }

    // A connection from X, Y or W to an ancestor of the current vertex,
    // direct or through a separated child bicomp, yields a K2,3 by
    // pattern E3 or E4. This is the planarity notion of external activity.
    g.update_future_pertinent_child(x, v);
    g.update_future_pertinent_child(y, v);
    let w = g.ic.w;
    g.update_future_pertinent_child(w, v);
    if g.future_pertinent(x, v) || g.future_pertinent(y, v) || g.future_pertinent(w, v) {
        g.clear_all_visited_flags();
        isolate_obstruction_e3_or_e4(g)?;
        delete_unmarked_vertices_and_edges(g)?;
        return Ok(EmbedResult::NonEmbeddable);
    }

    // The bicomp is a separable K4 with no entangled K2,3. Restore its
    // original orientation and let the outerplanarity embedder continue.
    orient_vertices_in_bicomp(g, r, true)?;

    Ok(EmbedResult::Embedded)
}

fn isolate_obstruction_e1_or_e2(g: &mut Graph) -> Result<(), Error> {
    if !mark_highest_xy_path(g)? {
        return Err(Error::Internal("no X-Y path for K2,3 pattern E1/E2"));
    }

    // E1: a point of attachment below its stopping vertex.
    if g.ic.px != g.ic.x {
        mark_path_along_bicomp_ext_face(g, g.ic.r, g.ic.w)?;
        mark_path_along_bicomp_ext_face(g, g.ic.py, g.ic.r)?;
    } else if g.ic.py != g.ic.y {
        mark_path_along_bicomp_ext_face(g, g.ic.r, g.ic.x)?;
        mark_path_along_bicomp_ext_face(g, g.ic.w, g.ic.r)?;
    } else {
        // E2: an extra vertex on the lower external face path.
        let (next_after_x, _) = get_neighbor_on_ext_face(g, g.ic.x, 1);
        if g.ic.w != next_after_x {
            mark_path_along_bicomp_ext_face(g, g.ic.r, g.ic.y)?;
        } else {
            mark_path_along_bicomp_ext_face(g, g.ic.x, g.ic.r)?;
        }
    }

    g.ic.dw = find_unembedded_edge_to_cur_vertex(g, g.ic.w)
        .ok_or(Error::Internal("W lost its connection to v"))?;
    (g.functions.mark_dfs_path)(g, g.ic.w, g.ic.dw)?;
    join_bicomps(g)?;
    add_and_mark_edge(g, g.ic.v, g.ic.dw)
}

fn isolate_obstruction_e3_or_e4(g: &mut Graph) -> Result<(), Error> {
    let v = g.ic.v;

    // E3: X or Y is future pertinent; the ancestor connection plus the
    // X-Y path give the K2,3.
    let x = g.ic.x;
    let y = g.ic.y;
    g.update_future_pertinent_child(x, v);
    g.update_future_pertinent_child(y, v);
    if g.future_pertinent(x, v) || g.future_pertinent(y, v) {
        if !mark_highest_xy_path(g)? {
            return Err(Error::Internal("no X-Y path for K2,3 pattern E3"));
        }

        g.update_future_pertinent_child(x, v);
        let x_or_y = if g.future_pertinent(x, v) { x } else { y };

        // The two cases differ only in which external face segments are
        // marked, because the marking direction matters.
        if x_or_y == x {
            mark_path_along_bicomp_ext_face(g, g.ic.x, g.ic.w)?;
            mark_path_along_bicomp_ext_face(g, g.ic.y, g.ic.r)?;
        } else {
            mark_path_along_bicomp_ext_face(g, g.ic.r, g.ic.x)?;
            mark_path_along_bicomp_ext_face(g, g.ic.w, g.ic.y)?;
        }

        g.ic.dw = find_unembedded_edge_to_cur_vertex(g, g.ic.w)
            .ok_or(Error::Internal("W lost its connection to v"))?;

        let (u, d) = find_unembedded_edge_to_ancestor(g, x_or_y)
            .ok_or(Error::Internal("no ancestor connection for K2,3 pattern E3"))?;

        (g.functions.mark_dfs_path)(g, u, g.ic.v)?;
        (g.functions.mark_dfs_path)(g, x_or_y, d)?;
        (g.functions.mark_dfs_path)(g, g.ic.w, g.ic.dw)?;
        join_bicomps(g)?;
        add_and_mark_edge(g, u, d)?;
        add_and_mark_edge(g, g.ic.v, g.ic.dw)?;

        return Ok(());
    }

    // Otherwise W is future pertinent: E4 reduces to minor A with the
    // ancestor as the apex.
    let w = g.ic.w;
    let (u, d) = find_unembedded_edge_to_ancestor(g, w)
        .ok_or(Error::Internal("no ancestor connection for K2,3 pattern E4"))?;

    g.ic.v = u;
    g.ic.dw = d;
    isolate_obstruction_a(g)
}
