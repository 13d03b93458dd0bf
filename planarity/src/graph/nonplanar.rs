// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification of a blocked bicomp into one of the non-planarity
//! minors, including location of the stopping vertices, the pertinent
//! vertex, the highest X-Y path and the Z-to-R path.

use crate::errors::Error;
use crate::graph::embed_core;
use crate::graph::{Graph, MinorFlags, ObstructionType, NIL};

// Determines which non-planarity minor the blocked bicomp exhibits and
// fills the isolator context accordingly.
pub(crate) fn choose_type_of_nonplanarity_minor(
    g: &mut Graph,
    v: usize,
    r: usize,
) -> Result<(), Error> {
    initialize_nonplanarity_context(g, v, r)?;

    let r = g.ic.r;
    let w = g.ic.w;

    // A root copy of a vertex other than v means the Walkdown terminated
    // on a descendant bicomp: minor A.
    if g.primary_vertex_from_root(r) != v {
        g.ic.minor_type.insert(MinorFlags::A);
        return Ok(());
    }

    // A pertinent child bicomp of W that is also future pertinent: minor B.
    if Graph::is_vertex(g.pertinent_roots(w)) {
        let last_child = g.last_pertinent_root_child(w);
        if g.lowpoint(last_child) < v {
            g.ic.minor_type.insert(MinorFlags::B);
            return Ok(());
        }
    }

    // Otherwise the highest X-Y path obstructs W from R.
    if !mark_highest_xy_path(g)? {
        return Err(Error::Internal("no X-Y path in blocked bicomp"));
    }

    // A 'high' point of attachment (closer to R than X or Y): minor C.
    if g.obstruction_type(g.ic.px) == ObstructionType::HighRxw
        || g.obstruction_type(g.ic.py) == ObstructionType::HighRyw
    {
        g.ic.minor_type.insert(MinorFlags::C);
        return Ok(());
    }

    // A path from an internal vertex Z of the X-Y path up to R: minor D.
    mark_z_to_r_path(g)?;
    if Graph::is_vertex(g.ic.z) {
        g.ic.minor_type.insert(MinorFlags::D);
        return Ok(());
    }

    // Otherwise a future pertinent vertex below the X-Y path: minor E.
    let z = find_future_pertinence_below_xy_path(g);
    if Graph::is_vertex(z) {
        g.ic.z = z;
        g.ic.minor_type.insert(MinorFlags::E);
        return Ok(());
    }

    Err(Error::Internal("no non-planarity minor matched"))
}

// Finds the stopping vertices X and Y and the pertinent vertex W of the
// bicomp rooted by R, which is taken from the top of the merge stack when
// one is there (the minor A case). The bicomp is consistently oriented
// with edge signs preserved, and its external face vertices classified.
pub(crate) fn initialize_nonplanarity_context(
    g: &mut Graph,
    v: usize,
    mut r: usize,
) -> Result<(), Error> {
    g.init_isolator_context();
    g.ic.v = v;

    // For minor A the central bicomp of the minor is at the top of the
    // Walkdown's merge stack.
    if !g.stack.is_empty() {
        let (popped_r, _) = g.stack.pop2();
        r = popped_r;
    }

    g.ic.r = r;

    embed_core::orient_vertices_in_bicomp(g, r, true)?;
    g.clear_visited_flags_in_bicomp(r);

    let (x, y) = find_active_vertices(g, r);
    g.ic.x = x;
    g.ic.y = y;

    g.ic.w = find_pertinent_vertex(g);

    set_vertex_types_for_marking_xy_path(g)?;

    Ok(())
}

// Walks to the next vertex along the real external face (ignoring the
// short-circuit links). `prev_link` is the link by which `cur` was
// entered; returns the next vertex and its entry link.
pub(crate) fn get_neighbor_on_ext_face(g: &Graph, cur: usize, prev_link: usize) -> (usize, usize) {
    let arc = g.arc(cur, 1 ^ prev_link);
    let next = g.neighbor(arc);

    // In a singleton bicomp both links lead back, and leaving the entry
    // link unchanged makes the two arcs act like a cycle.
    if g.first_arc(next) != g.last_arc(next) {
        let link = if Graph::twin_arc(arc) == g.first_arc(next) { 0 } else { 1 };
        (next, link)
    } else {
        (next, prev_link)
    }
}

// Descends both external face paths from R to the first active vertex on
// each side. Outerplanarity has no inactive vertices to skip.
pub(crate) fn find_active_vertices(g: &mut Graph, r: usize) -> (usize, usize) {
    let v = g.ic.v;

    let (mut x, mut x_prev_link) = get_neighbor_on_ext_face(g, r, 1);
    let (mut y, mut y_prev_link) = get_neighbor_on_ext_face(g, r, 0);

    let outerplanar_based = g
        .embed_flags
        .map(|f| f.is_outerplanar_based())
        .unwrap_or(false);

    if !outerplanar_based {
        g.update_future_pertinent_child(x, v);
        while g.inactive(x, v) {
            let (nx, nl) = get_neighbor_on_ext_face(g, x, x_prev_link);
            x = nx;
            x_prev_link = nl;
            g.update_future_pertinent_child(x, v);
        }

        g.update_future_pertinent_child(y, v);
        while g.inactive(y, v) {
            let (ny, nl) = get_neighbor_on_ext_face(g, y, y_prev_link);
            y = ny;
            y_prev_link = nl;
            g.update_future_pertinent_child(y, v);
        }
    }

    (x, y)
}

// Finds the pertinent vertex on the lower external face path strictly
// between X and Y.
pub(crate) fn find_pertinent_vertex(g: &Graph) -> usize {
    let (mut w, mut w_prev_link) = get_neighbor_on_ext_face(g, g.ic.x, 1);

    while w != g.ic.y {
        if g.pertinent(w) {
            return w;
        }
        let (nw, nl) = get_neighbor_on_ext_face(g, w, w_prev_link);
        w = nw;
        w_prev_link = nl;
    }

    NIL
}

// Labels the external face vertices of the bicomp as high/low RXW or RYW,
// depending on whether they fall between R and X, X and W, R and Y, or Y
// and W.
pub(crate) fn set_vertex_types_for_marking_xy_path(g: &mut Graph) -> Result<(), Error> {
    let r = g.ic.r;
    let x = g.ic.x;
    let y = g.ic.y;
    let w = g.ic.w;

    if !Graph::is_vertex(r) || !Graph::is_vertex(x) || !Graph::is_vertex(y) || !Graph::is_vertex(w)
    {
        return Err(Error::Internal("incomplete context for obstruction typing"));
    }

    g.clear_obstruction_type_in_bicomp(r);

    let (mut z, mut z_prev_link) = get_neighbor_on_ext_face(g, r, 1);
    let mut z_type = ObstructionType::HighRxw;
    while z != w {
        if z == x {
            z_type = ObstructionType::LowRxw;
        }
        g.set_obstruction_type(z, z_type);
        let (nz, nl) = get_neighbor_on_ext_face(g, z, z_prev_link);
        z = nz;
        z_prev_link = nl;
    }

    let (mut z, mut z_prev_link) = get_neighbor_on_ext_face(g, r, 0);
    let mut z_type = ObstructionType::HighRyw;
    while z != w {
        if z == y {
            z_type = ObstructionType::LowRyw;
        }
        g.set_obstruction_type(z, z_type);
        let (nz, nl) = get_neighbor_on_ext_face(g, z, z_prev_link);
        z = nz;
        z_prev_link = nl;
    }

    Ok(())
}

// Pops vertex/edge pairs from the stack down to the terminating vertex Z
// (or to `stack_bottom` when Z is NIL), clearing their visited marks.
pub(crate) fn pop_and_unmark_vertices_and_edges(g: &mut Graph, z: usize, stack_bottom: usize) {
    while g.stack.len() > stack_bottom {
        let vertex = g.stack.pop();

        if vertex == z {
            g.stack.push(vertex);
            break;
        }

        let e = g.stack.pop();
        g.clear_vertex_visited(vertex);
        g.clear_edge_visited(e);
        g.clear_edge_visited(Graph::twin_arc(e));
    }
}

// Marks the X-Y path with the highest points of attachment to the
// external face.
//
// The internal edges incident to R are hidden, making R a corner of a
// single proper face whose boundary includes the desired path; walking
// that face by predecessor arcs and discarding parallel sub-paths when a
// second RXW vertex appears leaves exactly the highest X-Y path marked.
// Returns false when no obstructing X-Y path exists (only possible when
// the routine is used as an existence test).
pub(crate) fn mark_highest_xy_path(g: &mut Graph) -> Result<bool, Error> {
    let r = g.ic.r;
    let w = g.ic.w;
    g.ic.px = NIL;
    g.ic.py = NIL;

    let stack_bottom1 = g.stack.len();
    g.hide_internal_edges(r);
    let stack_bottom2 = g.stack.len();

    let mut z = r;
    // The arc equivalent of entering with prev-link 1; e is always the arc
    // used to enter Z.
    let mut e = g.last_arc(r);

    while g.obstruction_type(z) != ObstructionType::HighRyw
        && g.obstruction_type(z) != ObstructionType::LowRyw
    {
        // Advance along the proper face containing R.
        e = g.prev_arc_circular(e);
        z = g.neighbor(e);
        e = Graph::twin_arc(e);

        if g.vertex_visited(z) {
            // A revisit means everything since the prior visit belongs to
            // a separable component hanging off the face.
            pop_and_unmark_vertices_and_edges(g, z, stack_bottom2);
        } else {
            if z == w {
                // No obstructing X-Y path exists.
                pop_and_unmark_vertices_and_edges(g, NIL, stack_bottom2);
                break;
            }

            if g.obstruction_type(z) == ObstructionType::HighRxw
                || g.obstruction_type(z) == ObstructionType::LowRxw
            {
                // Everything marked so far was a parallel path that does
                // not obstruct W from R.
                g.ic.px = z;
                pop_and_unmark_vertices_and_edges(g, NIL, stack_bottom2);
            }

            g.stack.push(e);
            g.stack.push(z);

            g.set_vertex_visited(z);
            if z != g.ic.px {
                g.set_edge_visited(e);
                g.set_edge_visited(Graph::twin_arc(e));
            }

            if g.obstruction_type(z) == ObstructionType::HighRyw
                || g.obstruction_type(z) == ObstructionType::LowRyw
            {
                g.ic.py = z;
                break;
            }
        }
    }

    g.stack.truncate(stack_bottom2);
    g.restore_internal_edges(stack_bottom1)?;

    Ok(Graph::is_vertex(g.ic.py))
}

// Looks for a path from an internal vertex Z of the marked X-Y path up to
// the bicomp root R; if one exists it is marked and recorded in the
// context. Assumes `mark_highest_xy_path` has run.
pub(crate) fn mark_z_to_r_path(g: &mut Graph) -> Result<(), Error> {
    let r = g.ic.r;
    let px = g.ic.px;
    let py = g.ic.py;
    g.ic.z = NIL;

    // Find the edge at Px leading to the first internal vertex of the
    // X-Y path.
    let z = px;
    let mut z_next_arc = g.last_arc(z);
    while z_next_arc != g.first_arc(z) {
        if g.edge_visited(z_next_arc) {
            break;
        }
        z_next_arc = g.prev_arc(z_next_arc);
    }

    if !g.edge_visited(z_next_arc) {
        return Err(Error::Internal("lost the X-Y path at Px"));
    }

    // Run along the X-Y path; at each internal vertex the predecessor arc
    // of the entry arc is either on the path (continue) or starts an
    // internal path toward R.
    while g.edge_visited(z_next_arc) {
        let z_prev_arc = Graph::twin_arc(z_next_arc);
        z_next_arc = g.prev_arc_circular(z_prev_arc);
    }

    let z_prev_arc = Graph::twin_arc(z_next_arc);
    let z = g.neighbor(z_prev_arc);

    // Reaching Py means no internal vertex offered a path toward R.
    if z == py {
        return Ok(());
    }

    g.ic.z = z;

    let mut z = z;
    let mut z_next_arc = z_next_arc;
    let mut z_prev_arc = z_prev_arc;
    while z != r {
        if g.obstruction_type(z) != ObstructionType::Unknown {
            return Err(Error::Internal("Z-R path left the bicomp interior"));
        }

        z = g.neighbor(z_next_arc);

        g.set_edge_visited(z_next_arc);
        g.set_edge_visited(z_prev_arc);
        g.set_vertex_visited(z);

        z_next_arc = g.prev_arc_circular(z_prev_arc);
        z_prev_arc = Graph::twin_arc(z_next_arc);
    }

    Ok(())
}

// Finds a future pertinent vertex on the lower external face path between
// the points of attachment of a low X-Y path.
pub(crate) fn find_future_pertinence_below_xy_path(g: &mut Graph) -> usize {
    let py = g.ic.py;
    let v = g.ic.v;

    let (mut z, mut z_prev_link) = get_neighbor_on_ext_face(g, g.ic.px, 1);

    while z != py {
        g.update_future_pertinent_child(z, v);
        if g.future_pertinent(z, v) {
            return z;
        }

        let (nz, nl) = get_neighbor_on_ext_face(g, z, z_prev_link);
        z = nz;
        z_prev_link = nl;
    }

    NIL
}

// Outerplanarity reuses the same context initialization but classifies
// only minors A, B and E; unlike planarity, minor B needs no future
// pertinence on the pertinent child bicomp.
pub(crate) fn choose_type_of_nonouterplanarity_minor(
    g: &mut Graph,
    v: usize,
    r: usize,
) -> Result<(), Error> {
    initialize_nonplanarity_context(g, v, r)?;

    let r = g.ic.r;
    let w = g.ic.w;

    if g.primary_vertex_from_root(r) != v {
        g.ic.minor_type.insert(MinorFlags::A);
        return Ok(());
    }

    if Graph::is_vertex(g.pertinent_roots(w)) {
        g.ic.minor_type.insert(MinorFlags::B);
        return Ok(());
    }

    g.ic.minor_type.insert(MinorFlags::E);
    Ok(())
}
