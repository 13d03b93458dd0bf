// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Isolation of a subgraph homeomorphic to K2,3 or K4 when an
//! outerplanarity-based embedding is blocked.
//!
//! The classification is a simplified version of the planar one: minor A
//! (blocked descendant bicomp) and minor B (pertinent child bicomp at W)
//! give K2,3 witnesses, and everything else is minor E, a K4 whose X-Y
//! path is located before marking.

use crate::errors::Error;
use crate::graph::isolator::{
    add_and_mark_edge, delete_unmarked_vertices_and_edges, find_unembedded_edge_to_cur_vertex,
    find_unembedded_edge_to_subtree, mark_path_along_bicomp_ext_face,
};
use crate::graph::nonplanar::{choose_type_of_nonouterplanarity_minor, mark_highest_xy_path};
use crate::graph::embed_core::join_bicomps;
use crate::graph::{Graph, MinorFlags};

pub(crate) fn isolate_outerplanar_obstruction(g: &mut Graph, v: usize, r: usize) -> Result<(), Error> {
    g.clear_all_visited_flags();

    choose_type_of_nonouterplanarity_minor(g, v, r)?;

    // Find the unembedded edge connecting the pertinent vertex W to v.
    if g.ic.minor_type.intersects(MinorFlags::B) {
        let subtree_root = g.last_pertinent_root_child(g.ic.w);
        g.ic.dw = find_unembedded_edge_to_subtree(g, g.ic.v, subtree_root)
            .ok_or(Error::Internal("minor B subtree lost its v connection"))?;
    } else {
        g.ic.dw = find_unembedded_edge_to_cur_vertex(g, g.ic.w)
            .ok_or(Error::Internal("W lost its connection to v"))?;
    }

    // Minor E needs the obstructing X-Y path marked.
    if g.ic.minor_type.intersects(MinorFlags::E) && !mark_highest_xy_path(g)? {
        return Err(Error::Internal("no X-Y path for outerplanar minor E"));
    }

    let minor = g.ic.minor_type;
    if minor.intersects(MinorFlags::A) {
        isolate_obstruction_a(g)?;
    } else if minor.intersects(MinorFlags::B) {
        isolate_obstruction_b(g)?;
    } else if minor.intersects(MinorFlags::E) {
        isolate_obstruction_e(g)?;
    } else {
        return Err(Error::Internal("no outerplanar minor selected"));
    }

    delete_unmarked_vertices_and_edges(g)
}

// Minor A: a K2,3 with image vertices v and w, connected around the
// blocked descendant bicomp and through the tree path from v down to r.
pub(crate) fn isolate_obstruction_a(g: &mut Graph) -> Result<(), Error> {
    mark_path_along_bicomp_ext_face(g, g.ic.r, g.ic.r)?;
    (g.functions.mark_dfs_path)(g, g.ic.v, g.ic.r)?;
    (g.functions.mark_dfs_path)(g, g.ic.w, g.ic.dw)?;
    join_bicomps(g)?;
    add_and_mark_edge(g, g.ic.v, g.ic.dw)
}

// Minor B: a K2,3 through the pertinent child bicomp of W.
pub(crate) fn isolate_obstruction_b(g: &mut Graph) -> Result<(), Error> {
    mark_path_along_bicomp_ext_face(g, g.ic.r, g.ic.r)?;
    (g.functions.mark_dfs_path)(g, g.ic.w, g.ic.dw)?;
    join_bicomps(g)?;
    add_and_mark_edge(g, g.ic.v, g.ic.dw)
}

// Minor E: a K4 on r, x, y and w, using the external face cycle, the
// marked X-Y path, and the connection from W back up to v.
pub(crate) fn isolate_obstruction_e(g: &mut Graph) -> Result<(), Error> {
    mark_path_along_bicomp_ext_face(g, g.ic.r, g.ic.r)?;
    (g.functions.mark_dfs_path)(g, g.ic.w, g.ic.dw)?;
    join_bicomps(g)?;
    add_and_mark_edge(g, g.ic.v, g.ic.dw)
}
