// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Isolation of a subgraph homeomorphic to K5 or K3,3 once the Walkdown
//! has been blocked.
//!
//! The visited flags select the witness: everything is cleared, the
//! characteristic paths of the selected minor are marked, the relevant
//! unembedded back edges are re-attached and marked, and finally all
//! unmarked edges are deleted. Degree-0 vertices simply remain isolated.

use crate::errors::Error;
use crate::graph::embed_core::join_bicomps;
use crate::graph::nonplanar::{self, get_neighbor_on_ext_face};
use crate::graph::{EdgeType, Graph, MinorFlags, ObstructionType, NIL};

pub(crate) fn isolate_kuratowski_subgraph(g: &mut Graph, v: usize, r: usize) -> Result<(), Error> {
    g.clear_all_visited_flags();

    nonplanar::choose_type_of_nonplanarity_minor(g, v, r)?;

    initialize_isolator_context(g)?;

    let minor = g.ic.minor_type;
    if minor.intersects(MinorFlags::A) {
        isolate_minor_a(g)?;
    } else if minor.intersects(MinorFlags::B) {
        isolate_minor_b(g)?;
    } else if minor.intersects(MinorFlags::C) {
        isolate_minor_c(g)?;
    } else if minor.intersects(MinorFlags::D) {
        isolate_minor_d(g)?;
    } else if minor.intersects(MinorFlags::E) {
        isolate_minor_e(g)?;
    } else {
        return Err(Error::Internal("no minor selected for isolation"));
    }

    delete_unmarked_vertices_and_edges(g)
}

// Obtains the unembedded edges that connect the characteristic vertices to
// v and to ancestors of v.
pub(crate) fn initialize_isolator_context(g: &mut Graph) -> Result<(), Error> {
    let (ux, dx) = find_unembedded_edge_to_ancestor(g, g.ic.x)
        .ok_or(Error::Internal("X has no ancestor connection"))?;
    let (uy, dy) = find_unembedded_edge_to_ancestor(g, g.ic.y)
        .ok_or(Error::Internal("Y has no ancestor connection"))?;
    g.ic.ux = ux;
    g.ic.dx = dx;
    g.ic.uy = uy;
    g.ic.dy = dy;

    if g.ic.minor_type.intersects(MinorFlags::B) {
        // For minor B the last pertinent child bicomp of W is also future
        // pertinent; its DFS child roots the subtree carrying both the
        // connection to v and the one to an ancestor of v.
        let subtree_root = g.last_pertinent_root_child(g.ic.w);
        g.ic.uz = g.lowpoint(subtree_root);

        g.ic.dw = find_unembedded_edge_to_subtree(g, g.ic.v, subtree_root)
            .ok_or(Error::Internal("minor B subtree lost its v connection"))?;
        g.ic.dz = find_unembedded_edge_to_subtree(g, g.ic.uz, subtree_root)
            .ok_or(Error::Internal("minor B subtree lost its ancestor connection"))?;
    } else {
        g.ic.dw = find_unembedded_edge_to_cur_vertex(g, g.ic.w)
            .ok_or(Error::Internal("W lost its connection to v"))?;

        if g.ic.minor_type.intersects(MinorFlags::E) {
            let (uz, dz) = find_unembedded_edge_to_ancestor(g, g.ic.z)
                .ok_or(Error::Internal("Z has no ancestor connection"))?;
            g.ic.uz = uz;
            g.ic.dz = dz;
        }
    }

    Ok(())
}

// ---
// The five minor isolators (A-D and plain E give a K3,3; E gives a K5
// unless one of the E1-E4 sub-patterns yields a K3,3 instead).
// ---

pub(crate) fn isolate_minor_a(g: &mut Graph) -> Result<(), Error> {
    mark_path_along_bicomp_ext_face(g, g.ic.r, g.ic.r)?;
    let anc = g.ic.ux.min(g.ic.uy);
    (g.functions.mark_dfs_path)(g, anc, g.ic.r)?;
    mark_dfs_paths_to_descendants(g)?;
    join_bicomps(g)?;
    add_and_mark_unembedded_edges(g)
}

pub(crate) fn isolate_minor_b(g: &mut Graph) -> Result<(), Error> {
    mark_path_along_bicomp_ext_face(g, g.ic.r, g.ic.r)?;
    let min3 = g.ic.ux.min(g.ic.uy).min(g.ic.uz);
    let max3 = g.ic.ux.max(g.ic.uy).max(g.ic.uz);
    (g.functions.mark_dfs_path)(g, min3, max3)?;
    mark_dfs_paths_to_descendants(g)?;
    join_bicomps(g)?;
    add_and_mark_unembedded_edges(g)
}

pub(crate) fn isolate_minor_c(g: &mut Graph) -> Result<(), Error> {
    // The X-Y path is already marked from minor classification.
    if g.obstruction_type(g.ic.px) == ObstructionType::HighRxw {
        let high_y = if g.obstruction_type(g.ic.py) == ObstructionType::HighRyw {
            g.ic.py
        } else {
            g.ic.y
        };
        mark_path_along_bicomp_ext_face(g, g.ic.r, high_y)?;
    } else {
        mark_path_along_bicomp_ext_face(g, g.ic.x, g.ic.r)?;
    }

    mark_dfs_paths_to_descendants(g)?;
    let anc = g.ic.ux.min(g.ic.uy);
    (g.functions.mark_dfs_path)(g, anc, g.ic.r)?;
    join_bicomps(g)?;
    add_and_mark_unembedded_edges(g)
}

pub(crate) fn isolate_minor_d(g: &mut Graph) -> Result<(), Error> {
    // The X-Y and Z-R paths are already marked from minor classification.
    mark_path_along_bicomp_ext_face(g, g.ic.x, g.ic.y)?;
    let anc = g.ic.ux.min(g.ic.uy);
    (g.functions.mark_dfs_path)(g, anc, g.ic.r)?;
    mark_dfs_paths_to_descendants(g)?;
    join_bicomps(g)?;
    add_and_mark_unembedded_edges(g)
}

pub(crate) fn isolate_minor_e(g: &mut Graph) -> Result<(), Error> {
    // E1: the future pertinence below the X-Y path is at a vertex other
    // than W.
    if g.ic.z != g.ic.w {
        return isolate_minor_e1(g);
    }

    // E2: the ancestor connection of Z is above both of X's and Y's.
    if g.ic.uz > g.ic.ux.max(g.ic.uy) {
        return isolate_minor_e2(g);
    }

    // E3: Z's connection is below one of them, and X's and Y's differ.
    if g.ic.uz < g.ic.ux.max(g.ic.uy) && g.ic.ux != g.ic.uy {
        return isolate_minor_e3(g);
    }

    // E4: a point of attachment of the X-Y path is below its stopping
    // vertex.
    if g.ic.x != g.ic.px || g.ic.y != g.ic.py {
        return isolate_minor_e4(g);
    }

    // Plain E: the K5 homeomorph. The X-Y path is already marked.
    mark_path_along_bicomp_ext_face(g, g.ic.r, g.ic.r)?;
    let min3 = g.ic.ux.min(g.ic.uy).min(g.ic.uz);
    (g.functions.mark_dfs_path)(g, min3, g.ic.r)?;
    mark_dfs_paths_to_descendants(g)?;
    join_bicomps(g)?;
    add_and_mark_unembedded_edges(g)
}

// E1 reduces to minor C once the roles of Z and the nearer stopping
// vertex are exchanged.
pub(crate) fn isolate_minor_e1(g: &mut Graph) -> Result<(), Error> {
    if g.obstruction_type(g.ic.z) == ObstructionType::LowRxw {
        g.set_obstruction_type(g.ic.px, ObstructionType::HighRxw);
        g.ic.x = g.ic.z;
        g.ic.ux = g.ic.uz;
        g.ic.dx = g.ic.dz;
    } else if g.obstruction_type(g.ic.z) == ObstructionType::LowRyw {
        g.set_obstruction_type(g.ic.py, ObstructionType::HighRyw);
        g.ic.y = g.ic.z;
        g.ic.uy = g.ic.uz;
        g.ic.dy = g.ic.dz;
    } else {
        return Err(Error::Internal("E1 vertex Z not on the lower face"));
    }

    // The marked X-Y path carries over to minor C unchanged.
    g.ic.z = NIL;
    g.ic.uz = NIL;
    g.ic.dz = NIL;
    g.ic.minor_type.remove(MinorFlags::E);
    g.ic.minor_type.insert(MinorFlags::C);
    g.ic.minor_type.insert(MinorFlags::E1);
    isolate_minor_c(g)
}

// E2 reduces to minor A at the ancestor level uz, where the bicomp will
// appear as a descendant blockage.
pub(crate) fn isolate_minor_e2(g: &mut Graph) -> Result<(), Error> {
    // Minor A does not include the X-Y path, so drop all marks.
    g.clear_all_visited_flags();

    g.ic.v = g.ic.uz;
    g.ic.dw = g.ic.dz;
    g.ic.z = NIL;
    g.ic.uz = NIL;
    g.ic.dz = NIL;

    g.ic.minor_type.remove(MinorFlags::E);
    g.ic.minor_type.insert(MinorFlags::A);
    g.ic.minor_type.insert(MinorFlags::E2);
    isolate_minor_a(g)
}

pub(crate) fn isolate_minor_e3(g: &mut Graph) -> Result<(), Error> {
    if g.ic.ux < g.ic.uy {
        mark_path_along_bicomp_ext_face(g, g.ic.r, g.ic.px)?;
        mark_path_along_bicomp_ext_face(g, g.ic.w, g.ic.y)?;
    } else {
        mark_path_along_bicomp_ext_face(g, g.ic.x, g.ic.w)?;
        mark_path_along_bicomp_ext_face(g, g.ic.py, g.ic.r)?;
    }

    // The X-Y path is already marked.
    let min3 = g.ic.ux.min(g.ic.uy).min(g.ic.uz);
    (g.functions.mark_dfs_path)(g, min3, g.ic.r)?;
    mark_dfs_paths_to_descendants(g)?;
    join_bicomps(g)?;
    add_and_mark_unembedded_edges(g)?;

    g.ic.minor_type.insert(MinorFlags::E3);
    Ok(())
}

pub(crate) fn isolate_minor_e4(g: &mut Graph) -> Result<(), Error> {
    if g.ic.px != g.ic.x {
        mark_path_along_bicomp_ext_face(g, g.ic.r, g.ic.w)?;
        mark_path_along_bicomp_ext_face(g, g.ic.py, g.ic.r)?;
    } else {
        mark_path_along_bicomp_ext_face(g, g.ic.r, g.ic.px)?;
        mark_path_along_bicomp_ext_face(g, g.ic.w, g.ic.r)?;
    }

    // The X-Y path is already marked.
    let min3 = g.ic.ux.min(g.ic.uy).min(g.ic.uz);
    let max3 = g.ic.ux.max(g.ic.uy).max(g.ic.uz);
    (g.functions.mark_dfs_path)(g, min3, max3)?;
    mark_dfs_paths_to_descendants(g)?;
    join_bicomps(g)?;
    add_and_mark_unembedded_edges(g)?;

    g.ic.minor_type.insert(MinorFlags::E4);
    Ok(())
}

// ---
// Unembedded edge discovery
// ---

// The least ancestor of v connected by an unembedded back edge to the cut
// vertex or a descendant in one of its separated bicomps.
pub(crate) fn get_least_ancestor_connection(g: &Graph, cut_vertex: usize) -> usize {
    let mut ancestor = g.least_ancestor(cut_vertex);

    let mut child = g.future_pertinent_child(cut_vertex);
    while Graph::is_vertex(child) {
        if g.is_separated_dfs_child(child) && g.lowpoint(child) < ancestor {
            ancestor = g.lowpoint(child);
        }
        child = g.next_dfs_child(cut_vertex, child);
    }

    ancestor
}

// Finds the minimum ancestor connection of a future pertinent cut vertex,
// returning the ancestor and the descendant endpoint of the connecting
// unembedded edge.
pub(crate) fn find_unembedded_edge_to_ancestor(g: &Graph, cut_vertex: usize) -> Option<(usize, usize)> {
    let mut ancestor = g.least_ancestor(cut_vertex);
    let mut found_child = NIL;

    let mut child = g.future_pertinent_child(cut_vertex);
    while Graph::is_vertex(child) {
        if g.is_separated_dfs_child(child) && g.lowpoint(child) < ancestor {
            ancestor = g.lowpoint(child);
            found_child = child;
        }
        child = g.next_dfs_child(cut_vertex, child);
    }

    // A direct connection keeps the cut vertex as the descendant.
    if ancestor == g.least_ancestor(cut_vertex) {
        return Some((ancestor, cut_vertex));
    }

    find_unembedded_edge_to_subtree(g, ancestor, found_child).map(|d| (ancestor, d))
}

// Finds the descendant endpoint of an unembedded edge from v to the
// pertinent vertex or into the subtree of its first pertinent child
// bicomp.
pub(crate) fn find_unembedded_edge_to_cur_vertex(g: &Graph, cut_vertex: usize) -> Option<usize> {
    if Graph::is_arc(g.pertinent_edge(cut_vertex)) {
        Some(cut_vertex)
    } else {
        let subtree_root = g.first_pertinent_root_child(cut_vertex);
        find_unembedded_edge_to_subtree(g, g.ic.v, subtree_root)
    }
}

// Finds the least descendant in the given subtree adjacent to the
// ancestor by an unembedded cycle edge.
pub(crate) fn find_unembedded_edge_to_subtree(
    g: &Graph,
    ancestor: usize,
    subtree_root: usize,
) -> Option<usize> {
    let subtree_root = if g.is_virtual(subtree_root) {
        g.dfs_child_from_root(subtree_root)
    } else {
        subtree_root
    };

    let mut descendant = NIL;
    let head = g.fwd_arc_list(ancestor);
    let mut e = head;
    while Graph::is_arc(e) {
        let nb = g.neighbor(e);
        if nb >= subtree_root && (descendant == NIL || nb < descendant) {
            descendant = nb;
        }
        e = g.next_arc(e);
        if e == head {
            break;
        }
    }

    if !Graph::is_vertex(descendant) {
        return None;
    }

    // Confirm the endpoint actually descends from the subtree root.
    let mut z = descendant;
    while z != subtree_root {
        let parent = g.parent(z);
        if !Graph::is_vertex(parent) || parent == z {
            return None;
        }
        z = parent;
    }

    Some(descendant)
}

// ---
// Marking
// ---

// Marks the external face vertices and edges of a bicomp from start to
// end, inclusive, following each vertex's first arc.
pub(crate) fn mark_path_along_bicomp_ext_face(
    g: &mut Graph,
    start_vert: usize,
    end_vert: usize,
) -> Result<(), Error> {
    g.set_vertex_visited(start_vert);

    let mut z = start_vert;
    let mut z_prev_link = 1;
    loop {
        let (nz, nl) = get_neighbor_on_ext_face(g, z, z_prev_link);
        z = nz;
        z_prev_link = nl;

        let z_prev_arc = g.arc(z, z_prev_link);
        g.set_edge_visited(z_prev_arc);
        g.set_edge_visited(Graph::twin_arc(z_prev_arc));
        g.set_vertex_visited(z);

        if z == end_vert {
            break;
        }
    }

    Ok(())
}

// Marks the DFS tree path from descendant up to ancestor, hopping from
// each root copy to its parent copy. The parent is found through the arc
// typed tree-parent rather than the parent member, because extensions may
// reduce tree paths so that the typed arc leads to a farther ancestor.
// This is the function-table default for `mark_dfs_path`.
pub(crate) fn mark_dfs_path(g: &mut Graph, ancestor: usize, mut descendant: usize) -> Result<(), Error> {
    if g.is_virtual(descendant) {
        descendant = g.primary_vertex_from_root(descendant);
    }

    g.set_vertex_visited(descendant);

    while descendant != ancestor {
        if !Graph::is_vertex(descendant) {
            return Err(Error::Internal("DFS path ran off the tree"));
        }

        let parent;
        if g.is_virtual(descendant) {
            parent = g.primary_vertex_from_root(descendant);
        } else {
            let mut found = NIL;
            let mut e = g.first_arc(descendant);
            while Graph::is_arc(e) {
                if g.edge_type(e) == EdgeType::TreeParent {
                    found = g.neighbor(e);
                    break;
                }
                e = g.next_arc(e);
            }

            if !Graph::is_vertex(found) {
                return Err(Error::Internal("vertex has no tree-parent arc"));
            }

            g.set_edge_visited(e);
            g.set_edge_visited(Graph::twin_arc(e));
            parent = found;
        }

        g.set_vertex_visited(parent);
        descendant = parent;
    }

    Ok(())
}

// Marks the tree paths from X, Y (and W, Z when set) down to the
// descendant endpoints of their unembedded connections.
pub(crate) fn mark_dfs_paths_to_descendants(g: &mut Graph) -> Result<(), Error> {
    (g.functions.mark_dfs_path)(g, g.ic.x, g.ic.dx)?;
    (g.functions.mark_dfs_path)(g, g.ic.y, g.ic.dy)?;

    if Graph::is_vertex(g.ic.dw) {
        (g.functions.mark_dfs_path)(g, g.ic.w, g.ic.dw)?;
    }
    if Graph::is_vertex(g.ic.dz) {
        (g.functions.mark_dfs_path)(g, g.ic.w, g.ic.dz)?;
    }

    Ok(())
}

// ---
// Re-attachment of unembedded edges
// ---

pub(crate) fn add_and_mark_unembedded_edges(g: &mut Graph) -> Result<(), Error> {
    add_and_mark_edge(g, g.ic.ux, g.ic.dx)?;
    add_and_mark_edge(g, g.ic.uy, g.ic.dy)?;

    if Graph::is_vertex(g.ic.dw) {
        add_and_mark_edge(g, g.ic.v, g.ic.dw)?;
    }
    if Graph::is_vertex(g.ic.dz) {
        add_and_mark_edge(g, g.ic.uz, g.ic.dz)?;
    }

    Ok(())
}

// Moves the unembedded edge (ancestor, descendant) from the forward arc
// list back into both adjacency lists and marks it.
pub(crate) fn add_and_mark_edge(g: &mut Graph, ancestor: usize, descendant: usize) -> Result<(), Error> {
    add_back_edge(g, ancestor, descendant);

    g.set_vertex_visited(ancestor);
    let ea = g.first_arc(ancestor);
    g.set_edge_visited(ea);
    let ed = g.first_arc(descendant);
    g.set_edge_visited(ed);
    g.set_vertex_visited(descendant);

    Ok(())
}

pub(crate) fn add_back_edge(g: &mut Graph, ancestor: usize, descendant: usize) {
    // Locate the forward arc in the ancestor's forward-arc list.
    let head = g.fwd_arc_list(ancestor);
    let mut fwd_arc = head;
    while Graph::is_arc(fwd_arc) {
        if g.neighbor(fwd_arc) == descendant {
            break;
        }
        fwd_arc = g.next_arc(fwd_arc);
        if fwd_arc == head {
            fwd_arc = NIL;
        }
    }

    if !Graph::is_arc(fwd_arc) {
        return;
    }

    let back_arc = Graph::twin_arc(fwd_arc);

    if g.fwd_arc_list(ancestor) == fwd_arc {
        if g.next_arc(fwd_arc) == fwd_arc {
            g.set_fwd_arc_list(ancestor, NIL);
        } else {
            let next = g.next_arc(fwd_arc);
            g.set_fwd_arc_list(ancestor, next);
        }
    }

    let prev = g.prev_arc(fwd_arc);
    let next = g.next_arc(fwd_arc);
    g.set_next_arc(prev, next);
    g.set_prev_arc(next, prev);

    // Attach the forward arc at the head of the ancestor's list.
    g.set_prev_arc(fwd_arc, NIL);
    let first = g.first_arc(ancestor);
    g.set_next_arc(fwd_arc, first);
    g.set_prev_arc(first, fwd_arc);
    g.set_first_arc(ancestor, fwd_arc);

    // And the back arc at the head of the descendant's list.
    g.set_prev_arc(back_arc, NIL);
    let first = g.first_arc(descendant);
    g.set_next_arc(back_arc, first);
    g.set_prev_arc(first, back_arc);
    g.set_first_arc(descendant, back_arc);

    g.set_neighbor(back_arc, ancestor);
}

// ---
// Final sweep
// ---

// Re-attaches all remaining unembedded cycle edges (unmarked) so they can
// be deleted uniformly, then deletes every unmarked edge. Vertices outside
// the witness become isolated rather than deleted.
pub(crate) fn delete_unmarked_vertices_and_edges(g: &mut Graph) -> Result<(), Error> {
    for v in 0..g.n {
        while Graph::is_arc(g.fwd_arc_list(v)) {
            let descendant = g.neighbor(g.fwd_arc_list(v));
            add_back_edge(g, v, descendant);
        }
    }

    for v in 0..g.n {
        let mut e = g.first_arc(v);
        while Graph::is_arc(e) {
            e = if g.edge_visited(e) {
                g.next_arc(e)
            } else {
                g.delete_edge(e, 0)
            };
        }
    }

    Ok(())
}
