// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search for a subgraph homeomorphic to K4.
//!
//! Runs the outerplanarity embedder; when a bicomp blocks, the
//! outerplanar minor is classified without orienting the whole bicomp.
//! Minor A yields a K4 through a second active vertex (A1) or an internal
//! X-Y path (A2), otherwise the bicomp is reduced to the tree edge (R, W).
//! Minor B yields a K4 when both first-active vertices are future
//! pertinent (B1) or a separating internal edge exists (B2), otherwise
//! each side's path component is reduced to a single edge. Minor E is a K4
//! outright. Reduced edges carry path connectors so the original paths can
//! be restored in constant time when a witness is finally assembled.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::Error;
use crate::extensions::{self, FunctionTable, SharedContext, K4_SEARCH_ID};
use crate::graph::embed_core::{
    orient_external_face_path, orient_vertices_in_bicomp, orient_vertices_in_embedding,
};
use crate::graph::isolator::{
    add_and_mark_edge, delete_unmarked_vertices_and_edges, find_unembedded_edge_to_ancestor,
    find_unembedded_edge_to_cur_vertex, get_least_ancestor_connection,
    mark_path_along_bicomp_ext_face,
};
use crate::graph::nonplanar::{
    get_neighbor_on_ext_face, mark_highest_xy_path, set_vertex_types_for_marking_xy_path,
};
use crate::graph::outerplanar::{isolate_obstruction_a, isolate_obstruction_e};
use crate::graph::{EdgeType, EmbedFlags, EmbedResult, Graph, MinorFlags, ObstructionType, NIL};

// Parallel per-arc data: the path connector of a reduction edge holds the
// internal path endpoint adjacent to the arc's owner. Reduced subgraphs
// are separable by a 2-cut, so one connector per arc suffices.
struct K4SearchContext {
    e: Vec<usize>,
    // Converts the tail recursion between Walkdown and the blocked-bicomp
    // handler into a loop.
    handling_blocked_bicomp: bool,
}

impl K4SearchContext {
    fn init_edge_rec(&mut self, e: usize) {
        self.e[e] = NIL;
    }
}

/// Attaches the K4 search feature to the graph. A no-op if it is already
/// attached.
pub fn attach_k4_search(g: &mut Graph) -> Result<(), Error> {
    if extensions::has_extension(g, K4_SEARCH_ID) {
        return Ok(());
    }

    let context = K4SearchContext {
        e: vec![NIL; g.e.len()],
        handling_blocked_bicomp: false,
    };
    let context: SharedContext = Rc::new(RefCell::new(context));
    extensions::add_extension(g, K4_SEARCH_ID, context, dup_context, overload);
    Ok(())
}

/// Detaches the K4 search feature.
pub fn detach_k4_search(g: &mut Graph) -> Result<(), Error> {
    extensions::remove_extension(g, K4_SEARCH_ID)
}

fn dup_context(context: &dyn Any, _g: &Graph) -> SharedContext {
    let context = context
        .downcast_ref::<K4SearchContext>()
        .expect("K4 search context type");
    Rc::new(RefCell::new(K4SearchContext {
        e: context.e.clone(),
        handling_blocked_bicomp: context.handling_blocked_bicomp,
    }))
}

fn overload(table: &mut FunctionTable) {
    table.handle_blocked_bicomp = handle_blocked_bicomp;
    table.embed_postprocess = embed_postprocess;
    table.check_embedding_integrity = check_embedding_integrity;
    table.init_graph = init_graph;
    table.reinitialize_graph = reinitialize_graph;
    table.ensure_arc_capacity = ensure_arc_capacity;
}

fn context_cell(g: &Graph) -> Result<SharedContext, Error> {
    extensions::find_context(g, K4_SEARCH_ID).ok_or(Error::ExtensionMissing(K4_SEARCH_ID))
}

fn init_graph(g: &mut Graph, n: usize) -> Result<(), Error> {
    let cell = context_cell(g)?;
    let saved = extensions::saved_functions(g, K4_SEARCH_ID)?;
    (saved.init_graph)(g, n)?;

    let mut guard = cell.borrow_mut();
    let context = guard
        .downcast_mut::<K4SearchContext>()
        .ok_or(Error::Internal("K4 search context type"))?;
    context.e = vec![NIL; g.e.len()];
    context.handling_blocked_bicomp = false;
    Ok(())
}

fn reinitialize_graph(g: &mut Graph) {
    if let Ok(cell) = context_cell(g) {
        if let Ok(saved) = extensions::saved_functions(g, K4_SEARCH_ID) {
            (saved.reinitialize_graph)(g);
        }
        let mut guard = cell.borrow_mut();
        if let Some(context) = guard.downcast_mut::<K4SearchContext>() {
            for slot in context.e.iter_mut() {
                *slot = NIL;
            }
            context.handling_blocked_bicomp = false;
        }
    }
}

fn ensure_arc_capacity(g: &mut Graph, required_arc_capacity: usize) -> Result<(), Error> {
    let cell = context_cell(g)?;
    let saved = extensions::saved_functions(g, K4_SEARCH_ID)?;
    (saved.ensure_arc_capacity)(g, required_arc_capacity)?;

    let mut guard = cell.borrow_mut();
    let context = guard
        .downcast_mut::<K4SearchContext>()
        .ok_or(Error::Internal("K4 search context type"))?;
    context.e.resize(g.e.len(), NIL);
    Ok(())
}

fn embed_postprocess(
    g: &mut Graph,
    v: usize,
    edge_embedding_result: EmbedResult,
) -> Result<EmbedResult, Error> {
    if g.embed_flags == Some(EmbedFlags::SearchForK4) {
        return Ok(edge_embedding_result);
    }

    let saved = extensions::saved_functions(g, K4_SEARCH_ID)?;
    (saved.embed_postprocess)(g, v, edge_embedding_result)
}

fn check_embedding_integrity(g: &mut Graph, orig: &Graph) -> Result<bool, Error> {
    if g.embed_flags == Some(EmbedFlags::SearchForK4) {
        return Ok(true);
    }

    let saved = extensions::saved_functions(g, K4_SEARCH_ID)?;
    (saved.check_embedding_integrity)(g, orig)
}

fn handle_blocked_bicomp(
    g: &mut Graph,
    v: usize,
    root_vertex: usize,
    r: usize,
) -> Result<EmbedResult, Error> {
    if g.embed_flags != Some(EmbedFlags::SearchForK4) {
        let saved = extensions::saved_functions(g, K4_SEARCH_ID)?;
        return (saved.handle_blocked_bicomp)(g, v, root_vertex, r);
    }

    let cell = context_cell(g)?;

    // On a descendant bicomp the root is pushed and one search suffices:
    // not finding a K4 also clears the blockage so the Walkdown can try
    // descending again.
    if r != root_vertex {
        g.stack.push2(r, 0);

        let ret = {
            let mut guard = cell.borrow_mut();
            let context = guard
                .downcast_mut::<K4SearchContext>()
                .ok_or(Error::Internal("K4 search context type"))?;
            search_for_k4_in_bicomp(g, context, v, r)?
        };

        if ret == EmbedResult::Embedded {
            // Take the descendant root back off so the Walkdown can
            // descend to it again, and clear the reduced minor A marker.
            g.stack.pop2();
            g.ic.minor_type.clear();
        }
        return Ok(ret);
    }

    // On a child bicomp rooted by a virtual copy of v, a cleared blockage
    // means the Walkdown must be relaunched on the bicomp, and each
    // reblocking comes back here; the flag keeps the recursion flat.
    {
        let guard = cell.borrow();
        let context = guard
            .downcast_ref::<K4SearchContext>()
            .ok_or(Error::Internal("K4 search context type"))?;
        if context.handling_blocked_bicomp {
            return Ok(EmbedResult::NonEmbeddable);
        }
    }

    {
        let mut guard = cell.borrow_mut();
        let context = guard
            .downcast_mut::<K4SearchContext>()
            .ok_or(Error::Internal("K4 search context type"))?;
        context.handling_blocked_bicomp = true;
    }

    let mut ret;
    loop {
        ret = {
            let mut guard = cell.borrow_mut();
            let context = guard
                .downcast_mut::<K4SearchContext>()
                .ok_or(Error::Internal("K4 search context type"))?;
            search_for_k4_in_bicomp(g, context, v, root_vertex)?
        };

        // NonEmbeddable here means the desired K4 was found.
        if ret != EmbedResult::Embedded {
            break;
        }

        // The blockage was cleared; Walkdown again to embed more edges. A
        // re-blocked bicomp produces NonEmbeddable through the flag guard
        // above, which reiterates the search; a K4 found entangled with a
        // descendant bicomp shows up as minor A and ends the loop.
        g.ic.minor_type.clear();
        ret = (g.functions.walk_down)(g, v, root_vertex)?;

        if g.ic.minor_type.intersects(MinorFlags::A) {
            break;
        }
        if ret != EmbedResult::NonEmbeddable {
            break;
        }
    }

    {
        let mut guard = cell.borrow_mut();
        let context = guard
            .downcast_mut::<K4SearchContext>()
            .ok_or(Error::Internal("K4 search context type"))?;
        context.handling_blocked_bicomp = false;
    }

    Ok(ret)
}

fn search_for_k4_in_bicomp(
    g: &mut Graph,
    context: &mut K4SearchContext,
    v: usize,
    r: usize,
) -> Result<EmbedResult, Error> {
    choose_type_of_nonouterplanarity_minor(g, v, r)?;

    if g.ic.minor_type.intersects(MinorFlags::A) {
        // Minor A indicates K2,3 homeomorphs; look for an entangled K4 or
        // reduce the bicomp so the Walkdown can resolve pertinence.
        // Orienting is affordable now because one of those two always
        // happens. The merge stack contents above this bicomp are
        // preserved throughout.
        orient_vertices_in_bicomp(g, r, true)?;

        // Case A1: an active vertex other than W along the external face
        // path [X, ..., W, ..., Y].
        if find_second_active_vertex_on_low_ext_face_path(g) {
            g.stack.clear();

            orient_vertices_in_bicomp(g, r, true)?;
            orient_vertices_in_embedding(g)?;
            restore_and_orient_reduced_paths(g, context)?;

            g.clear_all_visited_flags();

            g.ic.dw = find_unembedded_edge_to_cur_vertex(g, g.ic.w)
                .ok_or(Error::Internal("W lost its connection to v"))?;

            if g.ic.uz < g.ic.v {
                let (uz, dz) = find_unembedded_edge_to_ancestor(g, g.ic.z)
                    .ok_or(Error::Internal("Z lost its ancestor connection"))?;
                g.ic.uz = uz;
                g.ic.dz = dz;
            } else {
                g.ic.dz = find_unembedded_edge_to_cur_vertex(g, g.ic.z)
                    .ok_or(Error::Internal("Z lost its connection to v"))?;
            }

            isolate_minor_a1(g)?;
            delete_unmarked_vertices_and_edges(g)?;
            return Ok(EmbedResult::NonEmbeddable);
        }

        // Case A2: the bicomp has an X-Y path.
        set_vertex_types_for_marking_xy_path(g)?;
        g.clear_visited_flags_in_bicomp(r);

        if mark_highest_xy_path(g)? {
            g.stack.clear();

            orient_vertices_in_bicomp(g, r, true)?;
            orient_vertices_in_embedding(g)?;
            restore_and_orient_reduced_paths(g, context)?;

            g.clear_all_visited_flags();

            g.ic.dw = find_unembedded_edge_to_cur_vertex(g, g.ic.w)
                .ok_or(Error::Internal("W lost its connection to v"))?;

            if !mark_highest_xy_path(g)? {
                return Err(Error::Internal("X-Y path vanished after restoration"));
            }
            isolate_minor_a2(g)?;
            delete_unmarked_vertices_and_edges(g)?;
            return Ok(EmbedResult::NonEmbeddable);
        }

        // Neither found: restore the obstruction typing and reduce the
        // bicomp to the tree edge (R, W).
        g.clear_obstruction_type_in_bicomp(r);

        reduce_bicomp_to_edge(g, context, r, g.ic.w)?;

        return Ok(EmbedResult::Embedded);
    } else if g.ic.minor_type.intersects(MinorFlags::B) {
        if !g.stack.is_empty() {
            return Err(Error::Internal("merge stack not empty for minor B"));
        }

        // The first active vertices along the two external face paths.
        let a_x = find_planarity_active_vertex(g, v, r, 1)?;
        let a_y = find_planarity_active_vertex(g, v, r, 0)?;

        // Case B1: both distinct and future pertinent.
        g.update_future_pertinent_child(a_x, v);
        g.update_future_pertinent_child(a_y, v);
        if a_x != a_y && g.future_pertinent(a_x, v) && g.future_pertinent(a_y, v) {
            orient_vertices_in_embedding(g)?;
            restore_and_orient_reduced_paths(g, context)?;

            g.clear_all_visited_flags();

            g.ic.x = a_x;
            g.ic.y = a_y;

            let (ux, dx) = find_unembedded_edge_to_ancestor(g, g.ic.x)
                .ok_or(Error::Internal("a_x lost its ancestor connection"))?;
            let (uy, dy) = find_unembedded_edge_to_ancestor(g, g.ic.y)
                .ok_or(Error::Internal("a_y lost its ancestor connection"))?;
            g.ic.ux = ux;
            g.ic.dx = dx;
            g.ic.uy = uy;
            g.ic.dy = dy;

            isolate_minor_b1(g)?;
            delete_unmarked_vertices_and_edges(g)?;
            return Ok(EmbedResult::NonEmbeddable);
        }

        // The bicomp is pertinent and a_x is the only active external
        // face vertex, so it must be the pertinent one.
        if a_x == a_y && !g.pertinent(a_x) {
            return Err(Error::Internal("sole active vertex not pertinent"));
        }

        // Case B2: a separating internal edge on either side.
        let found = if let Some((w, x, y)) = find_separating_internal_edge(g, r, 1, a_x) {
            g.ic.w = w;
            g.ic.px = x;
            g.ic.py = y;
            true
        } else if let Some((w, y, x)) = find_separating_internal_edge(g, r, 0, a_y) {
            g.ic.w = w;
            g.ic.py = y;
            g.ic.px = x;
            true
        } else {
            false
        };

        if found {
            orient_vertices_in_embedding(g)?;
            restore_and_orient_reduced_paths(g, context)?;

            g.clear_all_visited_flags();

            if g.pertinent(g.ic.w) {
                g.ic.dw = find_unembedded_edge_to_cur_vertex(g, g.ic.w)
                    .ok_or(Error::Internal("W lost its connection to v"))?;
            } else {
                g.ic.z = g.ic.w;
                let (uz, dz) = find_unembedded_edge_to_ancestor(g, g.ic.z)
                    .ok_or(Error::Internal("Z lost its ancestor connection"))?;
                g.ic.uz = uz;
                g.ic.dz = dz;
            }

            // The X-Y path used need not be the one associated with the
            // separating internal edge.
            set_vertex_types_for_marking_xy_path(g)?;
            if !mark_highest_xy_path(g)? {
                return Err(Error::Internal("no X-Y path for minor B2"));
            }

            isolate_minor_b2(g)?;
            delete_unmarked_vertices_and_edges(g)?;
            return Ok(EmbedResult::NonEmbeddable);
        }

        // No K4: reduce along the a_x and a_y paths. When both paths lead
        // to the same vertex, reducing the whole bicomp to a single edge
        // avoids reversed-orientation issues between root and vertex.
        if a_x == a_y {
            reduce_bicomp_to_edge(g, context, r, a_x)?;
        } else {
            reduce_path_component(g, context, r, 1, a_x)?;
            reduce_path_component(g, context, r, 0, a_y)?;
        }

        return Ok(EmbedResult::Embedded);
    } else if g.ic.minor_type.intersects(MinorFlags::E) {
        if !g.stack.is_empty() {
            return Err(Error::Internal("merge stack not empty for minor E"));
        }

        orient_vertices_in_embedding(g)?;
        restore_and_orient_reduced_paths(g, context)?;

        g.clear_all_visited_flags();

        g.ic.dw = find_unembedded_edge_to_cur_vertex(g, g.ic.w)
            .ok_or(Error::Internal("W lost its connection to v"))?;

        set_vertex_types_for_marking_xy_path(g)?;
        if !mark_highest_xy_path(g)? {
            return Err(Error::Internal("no X-Y path for minor E"));
        }

        isolate_obstruction_e(g)?;
        delete_unmarked_vertices_and_edges(g)?;
        return Ok(EmbedResult::NonEmbeddable);
    }

    Err(Error::Internal("no outerplanar minor matched"))
}

// Minor classification that avoids touching the whole bicomp, because the
// minor B reductions must not spend more than amortized constant work on
// parts of the bicomp that are not reduced. The bicomp is purposely not
// oriented; W is found by parallel traversal from both sides.
fn choose_type_of_nonouterplanarity_minor(g: &mut Graph, v: usize, r: usize) -> Result<(), Error> {
    g.init_isolator_context();

    g.ic.v = v;
    g.ic.r = r;

    if !g.virtual_vertex_in_use(r) {
        return Err(Error::Internal("blocked bicomp root not in use"));
    }

    // For outerplanarity the first vertices along both paths are the
    // active ones; no vertex is inactive.
    let (x, x_prev_link) = get_neighbor_on_ext_face(g, r, 1);
    let (y, y_prev_link) = get_neighbor_on_ext_face(g, r, 0);
    g.ic.x = x;
    g.ic.y = y;

    // Parallel traversal toward the pertinent vertex W, costing at most
    // twice the work of resolving W's pertinence.
    let mut wx = x;
    let mut wx_prev_link = x_prev_link;
    let mut wy = y;
    let mut wy_prev_link = y_prev_link;
    g.ic.w = NIL;

    while wx != y {
        let (nx, nxl) = get_neighbor_on_ext_face(g, wx, wx_prev_link);
        wx = nx;
        wx_prev_link = nxl;
        if g.pertinent(wx) {
            g.ic.w = wx;
            break;
        }

        let (ny, nyl) = get_neighbor_on_ext_face(g, wy, wy_prev_link);
        wy = ny;
        wy_prev_link = nyl;
        if g.pertinent(wy) {
            g.ic.w = wy;
            break;
        }
    }

    if !Graph::is_vertex(g.ic.w) {
        return Err(Error::Internal("blocked bicomp has no pertinent vertex"));
    }

    if g.primary_vertex_from_root(r) != v {
        g.ic.minor_type.insert(MinorFlags::A);
    } else if Graph::is_vertex(g.pertinent_roots(g.ic.w)) {
        // Unlike planarity, minor B needs no future pertinence here.
        g.ic.minor_type.insert(MinorFlags::B);
    } else {
        g.ic.minor_type.insert(MinorFlags::E);
    }

    Ok(())
}

// Tests for an active vertex Z other than W along the oriented external
// face path [X, ..., W, ..., Y]; fills z and uz on success.
fn find_second_active_vertex_on_low_ext_face_path(g: &mut Graph) -> bool {
    let v = g.ic.v;

    // X is tested for future pertinence only; were it pertinent, the
    // Walkdown would not have blocked on this bicomp.
    let (mut z, mut z_prev_link) = get_neighbor_on_ext_face(g, g.ic.r, 1);
    g.update_future_pertinent_child(z, v);
    if g.future_pertinent(z, v) {
        g.ic.z = z;
        g.ic.uz = get_least_ancestor_connection(g, z);
        return true;
    }

    let (nz, nl) = get_neighbor_on_ext_face(g, z, z_prev_link);
    z = nz;
    z_prev_link = nl;

    while z != g.ic.y {
        if z != g.ic.w {
            g.update_future_pertinent_child(z, v);
            if g.future_pertinent(z, v) {
                g.ic.z = z;
                g.ic.uz = get_least_ancestor_connection(g, z);
                return true;
            } else if g.pertinent(z) {
                g.ic.z = z;
                g.ic.uz = g.ic.v;
                return true;
            }
        }

        let (nz, nl) = get_neighbor_on_ext_face(g, z, z_prev_link);
        z = nz;
        z_prev_link = nl;
    }

    // Y, like X, can only be future pertinent.
    g.update_future_pertinent_child(z, v);
    if g.future_pertinent(z, v) {
        g.ic.z = z;
        g.ic.uz = get_least_ancestor_connection(g, z);
        return true;
    }

    false
}

// Finds the first pertinent or future pertinent vertex from R heading
// away from the given prev link.
fn find_planarity_active_vertex(g: &mut Graph, v: usize, r: usize, prev_link: usize) -> Result<usize, Error> {
    let (mut w, mut w_prev_link) = get_neighbor_on_ext_face(g, r, prev_link);

    while w != r {
        if g.pertinent(w) {
            return Ok(w);
        }
        g.update_future_pertinent_child(w, v);
        if g.future_pertinent(w, v) {
            return Ok(w);
        }

        let (nw, nl) = get_neighbor_on_ext_face(g, w, w_prev_link);
        w = nw;
        w_prev_link = nl;
    }

    Err(Error::Internal("no active vertex on external face path"))
}

// Looks for an internal edge that separates R from A. The bicomp is
// outerplanar so far, so it suffices to inspect the edges of the vertices
// strictly inside the path (R ... A) for one that leaves the path, which
// is detected with transient obstruction-type marks.
fn find_separating_internal_edge(
    g: &mut Graph,
    r: usize,
    prev_link: usize,
    a: usize,
) -> Option<(usize, usize, usize)> {
    mark_obstruction_type_on_external_face_path(g, r, prev_link, a);

    let mut result = None;
    let (mut z, mut z_prev_link) = get_neighbor_on_ext_face(g, r, prev_link);
    while z != a {
        // External face edges land on marked vertices and are skipped
        // implicitly.
        let mut e = g.first_arc(z);
        while Graph::is_arc(e) {
            let neighbor = g.neighbor(e);
            if g.obstruction_type(neighbor) == ObstructionType::Unknown {
                result = Some((a, z, neighbor));
                break;
            }
            e = g.next_arc(e);
        }

        if result.is_some() {
            break;
        }

        let (nz, nl) = get_neighbor_on_ext_face(g, z, z_prev_link);
        z = nz;
        z_prev_link = nl;
    }

    unmark_obstruction_type_on_external_face_path(g, r, prev_link, a);

    result
}

fn mark_obstruction_type_on_external_face_path(g: &mut Graph, r: usize, prev_link: usize, a: usize) {
    g.set_obstruction_type(r, ObstructionType::Marked);
    let mut z = r;
    let mut z_prev_link = prev_link;
    while z != a {
        let (nz, nl) = get_neighbor_on_ext_face(g, z, z_prev_link);
        z = nz;
        z_prev_link = nl;
        g.set_obstruction_type(z, ObstructionType::Marked);
    }
}

fn unmark_obstruction_type_on_external_face_path(g: &mut Graph, r: usize, prev_link: usize, a: usize) {
    g.clear_obstruction_type(r);
    let mut z = r;
    let mut z_prev_link = prev_link;
    while z != a {
        let (nz, nl) = get_neighbor_on_ext_face(g, z, z_prev_link);
        z = nz;
        z_prev_link = nl;
        g.clear_obstruction_type(z);
    }
}

// ---
// K4 isolators
// ---

// Outerplanarity minor A plus the extra connection from Z: either through
// a descendant to an ancestor of the current vertex, or to v itself.
fn isolate_minor_a1(g: &mut Graph) -> Result<(), Error> {
    if g.ic.uz < g.ic.v {
        (g.functions.mark_dfs_path)(g, g.ic.uz, g.ic.v)?;
    }

    (g.functions.mark_dfs_path)(g, g.ic.z, g.ic.dz)?;

    isolate_obstruction_a(g)?;

    add_and_mark_edge(g, g.ic.uz, g.ic.dz)
}

// Outerplanarity minor A plus an X-Y path, which in an outerplanar bicomp
// is just an edge and is assumed already marked.
fn isolate_minor_a2(g: &mut Graph) -> Result<(), Error> {
    if !g.vertex_visited(g.ic.px) || !g.vertex_visited(g.ic.py) {
        return Err(Error::Internal("A2 invoked without a marked X-Y path"));
    }

    isolate_obstruction_a(g)
}

// The lower external face path between a_x and a_y doubles as their
// connection, which tolerates a_x or a_y coinciding with W; the other two
// connections go to v and to the ancestors.
fn isolate_minor_b1(g: &mut Graph) -> Result<(), Error> {
    (g.functions.mark_dfs_path)(g, g.ic.x, g.ic.dx)?;
    (g.functions.mark_dfs_path)(g, g.ic.y, g.ic.dy)?;

    // The path up to min(ux, uy) carries both the image connection from v
    // and the one through min to the opposite side.
    let anc = g.ic.ux.min(g.ic.uy);
    (g.functions.mark_dfs_path)(g, anc, g.ic.r)?;

    mark_path_along_bicomp_ext_face(g, g.ic.r, g.ic.r)?;

    crate::graph::embed_core::join_bicomps(g)?;

    add_and_mark_edge(g, g.ic.ux, g.ic.dx)?;
    add_and_mark_edge(g, g.ic.uy, g.ic.dy)
}

// The first subcase reduces to outerplanarity obstruction E; the second
// reduces to A2 with the ancestor as the apex.
fn isolate_minor_b2(g: &mut Graph) -> Result<(), Error> {
    if g.pertinent(g.ic.w) {
        if !g.vertex_visited(g.ic.px) || !g.vertex_visited(g.ic.py) {
            return Err(Error::Internal("B2 invoked without a marked X-Y path"));
        }

        return isolate_obstruction_e(g);
    }

    if g.future_pertinent(g.ic.w, g.ic.v) {
        g.ic.v = g.ic.uz;
        g.ic.dw = g.ic.dz;

        return isolate_minor_a2(g);
    }

    Ok(())
}

// ---
// Reductions
// ---

// Edge deletion during a reduction clears the parallel per-arc data; once
// a K4 is found and marked, plain deletion suffices.
fn k4_delete_edge(g: &mut Graph, context: &mut K4SearchContext, e: usize, next_link: usize) -> usize {
    context.init_edge_rec(e);
    context.init_edge_rec(Graph::twin_arc(e));

    g.delete_edge(e, next_link)
}

fn k4_delete_unmarked_edges_in_bicomp(
    g: &mut Graph,
    context: &mut K4SearchContext,
    bicomp_root: usize,
) {
    let stack_bottom = g.stack.len();
    g.stack.push(bicomp_root);
    while g.stack.len() > stack_bottom {
        let vertex = g.stack.pop();

        let mut e = g.first_arc(vertex);
        while Graph::is_arc(e) {
            if g.edge_type(e) == EdgeType::TreeChild {
                g.stack.push(g.neighbor(e));
            }

            e = if g.edge_visited(e) {
                g.next_arc(e)
            } else {
                k4_delete_edge(g, context, e, 0)
            };
        }
    }
}

// Reduces the bicomp rooted at R to the single tree edge (R, W): only the
// DFS tree path between them is retained, then collapsed.
fn reduce_bicomp_to_edge(
    g: &mut Graph,
    context: &mut K4SearchContext,
    r: usize,
    w: usize,
) -> Result<(), Error> {
    orient_vertices_in_bicomp(g, r, false)?;
    g.clear_visited_flags_in_bicomp(r);
    (g.functions.mark_dfs_path)(g, r, w)?;
    k4_delete_unmarked_edges_in_bicomp(g, context, r);

    let e_r = g.first_arc(r);
    let e_w = g.first_arc(w);
    let new_edge = reduce_path_to_edge(g, context, EdgeType::TreeParent, r, e_r, w, e_w)?;
    if !Graph::is_arc(new_edge) {
        return Err(Error::Internal("bicomp reduction produced no edge"));
    }

    // W's visited info must look untouched to future Walkups.
    g.set_visited_info(w, g.n);

    Ok(())
}

// Reduces the path component separable by the 2-cut (R, A) to the single
// edge (R, A), retaining the DFS tree structure needed to restore it.
//
// Case 1: the DFS tree path from A to R lies inside the component; it is
// retained and collapsed to a tree edge, preserving the cumulative
// orientation. Case 2: the external face edge from R reaches a descendant
// D of A; the back edge (R, D) plus the tree path (D --> A) are retained
// and collapsed to a back edge.
fn reduce_path_component(
    g: &mut Graph,
    context: &mut K4SearchContext,
    r: usize,
    prev_link: usize,
    a: usize,
) -> Result<(), Error> {
    // Nothing to do when the path is already just an edge.
    let e_r = g.arc(r, 1 ^ prev_link);
    if g.neighbor(e_r) == a {
        return Ok(());
    }

    let edge_type;
    let mut inverted_flag = false;

    if test_path_component_for_ancestor(g, r, prev_link, a) {
        clear_visited_in_path_component(g, r, prev_link, a);
        (g.functions.mark_dfs_path)(g, r, a)?;
        edge_type = EdgeType::TreeParent;

        inverted_flag = get_cumulative_orientation_on_dfs_path(g, r, a)?;
    } else {
        clear_visited_in_path_component(g, r, prev_link, a);
        let z = g.neighbor(e_r);
        g.set_edge_visited(e_r);
        g.set_edge_visited(Graph::twin_arc(e_r));
        (g.functions.mark_dfs_path)(g, a, z)?;
        edge_type = EdgeType::Back;
    }

    delete_unmarked_edges_in_path_component(g, context, r, prev_link, a)?;

    // Only R and A survive into the embedding; the leftover marks are
    // cleared and A's visited info reset for future Walkups.
    clear_visited_in_path_component(g, r, prev_link, a);
    g.set_visited_info(a, g.n);

    // The component's remaining arcs incident to A and R.
    let mut z = r;
    let mut z_prev_link = prev_link;
    while z != a {
        let (nz, nl) = get_neighbor_on_ext_face(g, z, z_prev_link);
        z = nz;
        z_prev_link = nl;
    }
    let e_a = g.arc(a, z_prev_link);
    let e_r = g.arc(r, 1 ^ prev_link);

    let e_r = reduce_path_to_edge(g, context, edge_type, r, e_r, a, e_a)?;
    if !Graph::is_arc(e_r) {
        return Err(Error::Internal("path component reduction produced no edge"));
    }

    // A tree edge keeps the net orientation of the collapsed DFS path.
    if g.edge_type(e_r) == EdgeType::TreeChild && inverted_flag {
        g.set_edge_inverted(e_r);
    }

    Ok(())
}

// XORs the inverted flags of the tree-child arcs along the DFS path.
fn get_cumulative_orientation_on_dfs_path(
    g: &mut Graph,
    ancestor: usize,
    mut descendant: usize,
) -> Result<bool, Error> {
    if g.is_virtual(descendant) {
        descendant = g.primary_vertex_from_root(descendant);
    }

    let mut inverted_flag = false;

    while descendant != ancestor {
        if !Graph::is_vertex(descendant) {
            return Err(Error::Internal("DFS path ran off the tree"));
        }

        if g.is_virtual(descendant) {
            descendant = g.primary_vertex_from_root(descendant);
        } else {
            let mut parent = NIL;
            let mut e = g.first_arc(descendant);
            while Graph::is_arc(e) {
                if g.edge_type(e) == EdgeType::TreeParent {
                    parent = g.neighbor(e);
                    break;
                }
                e = g.next_arc(e);
            }

            if !Graph::is_vertex(parent) {
                return Err(Error::Internal("vertex has no tree-parent arc"));
            }

            let child_arc = Graph::twin_arc(e);
            if g.edge_type(child_arc) != EdgeType::TreeChild || g.neighbor(child_arc) != descendant {
                return Err(Error::Internal("tree arc pair inconsistent"));
            }
            inverted_flag ^= g.edge_inverted(child_arc);

            descendant = parent;
        }
    }

    Ok(inverted_flag)
}

// Tests the external face path between R and A for a DFS ancestor of A.
fn test_path_component_for_ancestor(g: &Graph, r: usize, prev_link: usize, a: usize) -> bool {
    let mut z = r;
    let mut z_prev_link = prev_link;
    while z != a {
        let (nz, nl) = get_neighbor_on_ext_face(g, z, z_prev_link);
        z = nz;
        z_prev_link = nl;
        if z < a {
            return true;
        }
    }
    false
}

// Clears the visited flags of everything in the component separable by
// the 2-cut (R, A); its vertices only touch each other and R and A.
fn clear_visited_in_path_component(g: &mut Graph, r: usize, prev_link: usize, a: usize) {
    let (mut z, mut z_prev_link) = get_neighbor_on_ext_face(g, r, prev_link);
    while z != a {
        g.clear_vertex_visited(z);
        let mut e = g.first_arc(z);
        while Graph::is_arc(e) {
            g.clear_edge_visited(e);
            g.clear_edge_visited(Graph::twin_arc(e));
            let nb = g.neighbor(e);
            g.clear_vertex_visited(nb);

            e = g.next_arc(e);
        }

        let (nz, nl) = get_neighbor_on_ext_face(g, z, z_prev_link);
        z = nz;
        z_prev_link = nl;
    }
}

// Deletes the unvisited edges of the path component. This invalidates the
// external face short-circuits, which are repaired when the reduction
// completes.
fn delete_unmarked_edges_in_path_component(
    g: &mut Graph,
    context: &mut K4SearchContext,
    r: usize,
    prev_link: usize,
    a: usize,
) -> Result<(), Error> {
    if !g.stack.is_empty() {
        return Err(Error::Internal("stack not empty for path component deletion"));
    }

    let (mut z, mut z_prev_link) = get_neighbor_on_ext_face(g, r, prev_link);
    while z != a {
        let mut e = g.first_arc(z);
        while Graph::is_arc(e) {
            // Comparing e to its twin prevents double-pushing edges whose
            // endpoints are both internal to the path.
            if !g.edge_visited(e)
                && (e < Graph::twin_arc(e) || g.neighbor(e) == r || g.neighbor(e) == a)
            {
                g.stack.push(e);
            }

            e = g.next_arc(e);
        }

        let (nz, nl) = get_neighbor_on_ext_face(g, z, z_prev_link);
        z = nz;
        z_prev_link = nl;
    }

    while !g.stack.is_empty() {
        let e = g.stack.pop();
        k4_delete_edge(g, context, e, 0);
    }

    Ok(())
}

// Replaces the marked path between R and A by a single edge carrying path
// connectors, restoring any reduction edges at the two boundary positions
// first. Returns an arc of the created (or kept) edge in R's list.
fn reduce_path_to_edge(
    g: &mut Graph,
    context: &mut K4SearchContext,
    edge_type: EdgeType,
    r: usize,
    mut e_r: usize,
    a: usize,
    mut e_a: usize,
) -> Result<usize, Error> {
    let r_link = if g.first_arc(r) == e_r { 0 } else { 1 };
    let a_link = if g.first_arc(a) == e_a { 0 } else { 1 };

    // Even a single-edge path still needs its external face links redone,
    // since edges connecting it to the face have been deleted.
    if g.neighbor(e_r) != a {
        if Graph::is_vertex(context.e[e_r]) {
            restore_reduced_path(g, context, e_r)?;
            e_r = g.arc(r, r_link);
        }

        if Graph::is_vertex(context.e[e_a]) {
            restore_reduced_path(g, context, e_a)?;
            e_a = g.arc(a, a_link);
        }

        let v_r = g.neighbor(e_r);
        let v_a = g.neighbor(e_a);

        k4_delete_edge(g, context, e_r, 0);
        k4_delete_edge(g, context, e_a, 0);

        // The new arc goes where e_r sat in R's list, and likewise for A.
        let anchor_r = g.arc(r, r_link);
        let anchor_a = g.arc(a, a_link);
        g.insert_edge(r, anchor_r, 1 ^ r_link, a, anchor_a, 1 ^ a_link)?;

        let e_r_new = g.arc(r, r_link);
        context.e[e_r_new] = v_r;

        let e_a_new = g.arc(a, a_link);
        context.e[e_a_new] = v_a;

        let ty = g.compute_arc_type(r, a, edge_type);
        g.set_edge_type(e_r_new, ty);
        let ty = g.compute_arc_type(a, r, edge_type);
        g.set_edge_type(e_a_new, ty);
    }

    g.set_ext_face_vertex(r, r_link, a);
    g.set_ext_face_vertex(a, a_link, r);

    // An edge that is a whole bicomp needs both sides linked.
    if g.first_arc(r) == g.last_arc(r) {
        g.set_ext_face_vertex(r, 1 ^ r_link, a);
        g.set_ext_face_vertex(a, 1 ^ a_link, r);
    }

    Ok(g.arc(r, r_link))
}

// Restores, in constant time, the path a reduction edge represents. The
// interior may hold further reduction edges; those are expanded lazily by
// later iterations of the restoration sweep.
fn restore_reduced_path(g: &mut Graph, context: &mut K4SearchContext, e: usize) -> Result<(), Error> {
    if !Graph::is_vertex(context.e[e]) {
        return Ok(());
    }

    let e_twin = Graph::twin_arc(e);

    let u = g.neighbor(e_twin);
    let v = context.e[e];
    let w = context.e[e_twin];
    let x = g.neighbor(e);

    let e0 = g.next_arc(e);
    let e1 = g.prev_arc(e);
    let e_twin0 = g.next_arc(e_twin);
    let e_twin1 = g.prev_arc(e_twin);

    // Delete the reduction edge before inserting so the arc capacity is
    // never exceeded.
    k4_delete_edge(g, context, e, 0);

    if Graph::is_arc(e0) {
        g.insert_edge(u, e0, 1, v, NIL, 0)?;
    } else {
        g.insert_edge(u, e1, 0, v, NIL, 0)?;
    }

    if Graph::is_arc(e_twin0) {
        g.insert_edge(x, e_twin0, 1, w, NIL, 0)?;
    } else {
        g.insert_edge(x, e_twin1, 0, w, NIL, 0)?;
    }

    // The interior endpoints have degree 2, so typing the new edges from
    // the degree-2 side is constant time.
    g.set_edge_type_of_pair(v, u)?;
    g.set_edge_type_of_pair(w, x)?;

    Ok(())
}

// Expands every reduction edge back into its path. Newly exposed interior
// reduction edges are expanded as the sweep passes over them again. Paths
// that lie on the external face are oriented consistently with their
// endpoints, and the visited mark of a replaced edge carries to its path.
fn restore_and_orient_reduced_paths(g: &mut Graph, context: &mut K4SearchContext) -> Result<(), Error> {
    let mut e = 0;
    while e < g.occupied_edge_bound() {
        if Graph::is_vertex(context.e[e]) {
            let visited = g.edge_visited(e);

            let e_twin = Graph::twin_arc(e);
            let u = g.neighbor(e_twin);
            let v = context.e[e];
            let w = context.e[e_twin];
            let x = g.neighbor(e);

            restore_reduced_path(g, context, e)?;

            if g.neighbor(g.first_arc(u)) == v || g.neighbor(g.last_arc(u)) == v {
                // The path may lie on the external face; it must then be
                // attached at both endpoints.
                if g.neighbor(g.first_arc(x)) != w && g.neighbor(g.last_arc(x)) != w {
                    return Err(Error::Internal("restored path external on one side only"));
                }

                orient_external_face_path(g, u, v, w, x)?;
            }

            if visited {
                g.set_visited_flags_on_path(u, v, w, x)?;
            } else {
                g.clear_visited_flags_on_path(u, v, w, x)?;
            }
        } else {
            e += 2;
        }
    }

    Ok(())
}
