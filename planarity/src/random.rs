// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random graph generation: arbitrary connected graphs, and maximal
//! planar graphs with optional extra edges.

use rand::Rng;

use crate::errors::Error;
use crate::graph::{EdgeType, Graph, NIL};

/// Fills the initialized graph with a random spanning tree plus a random
/// number of additional edges (up to the arc capacity).
pub fn random_graph<R: Rng + ?Sized>(g: &mut Graph, rng: &mut R) -> Result<(), Error> {
    let n = g.vertex_count();
    if n == 0 {
        return Err(Error::NotInitialized);
    }

    // A random tree guarantees the result is connected.
    for v in 1..n {
        let u = rng.gen_range(0..v);
        g.add_edge(u, 0, v, 0)?;
    }

    if n < 2 {
        return Ok(());
    }

    // A random number of additional edges, leaving a small chance that
    // none are added.
    let lo = 7 * n / 8;
    let hi = (g.arc_capacity() / 2).max(lo);
    let target = rng.gen_range(lo..=hi).min(n * (n - 1) / 2);

    while g.edge_count() < target {
        let u = rng.gen_range(0..n - 1);
        let v = rng.gen_range(u + 1..n);

        if !g.is_neighbor(u, v) {
            g.add_edge(u, 0, v, 0)?;
        }
    }

    Ok(())
}

/// Fills the initialized graph with `num_edges` edges such that the first
/// `min(num_edges, 3n - 6)` form a (maximal, if saturated) planar graph;
/// any further edges are added at random and may break planarity.
pub fn random_planar_graph<R: Rng + ?Sized>(
    g: &mut Graph,
    rng: &mut R,
    num_edges: usize,
) -> Result<(), Error> {
    let n = g.vertex_count();
    if n == 0 {
        return Err(Error::NotInitialized);
    }

    let num_edges = num_edges.min(g.arc_capacity() / 2);

    // A random tree, typed so the maximal planar pass below can tell the
    // unprocessed tree arcs apart from the edges it adds.
    for v in 1..n {
        let u = rng.gen_range(0..v);
        g.add_edge(u, 0, v, 0)?;

        let arc = 2 * (g.edge_count() - 1);
        g.set_edge_type(arc, EdgeType::RandomTree);
        g.set_edge_type(Graph::twin_arc(arc), EdgeType::RandomTree);
        g.clear_edge_visited(arc);
        g.clear_edge_visited(Graph::twin_arc(arc));
    }

    // Grow a maximal planar graph around the tree: each newly processed
    // child is stitched to the previously processed vertex and to the
    // root, keeping everything on a common face boundary.
    let planar_target = if n >= 3 {
        num_edges.min(3 * n - 6)
    } else {
        num_edges.min(n.saturating_sub(1))
    };

    if n >= 2 {
        let root = 0;
        let first = get_unprocessed_child(g, root);
        let mut v = first;
        let mut last = first;

        while Graph::is_vertex(v) && v != root && g.edge_count() < planar_target {
            let c = get_unprocessed_child(g, v);

            if Graph::is_vertex(c) {
                if last != v {
                    g.add_edge(last, 1, c, 1)?;
                }
                g.add_edge(root, 1, c, 1)?;
                v = c;
                last = c;
            } else {
                let mut p = g.parent(v);
                let mut c = NIL;

                while Graph::is_vertex(p) {
                    c = get_unprocessed_child(g, p);
                    if Graph::is_vertex(c) {
                        break;
                    }
                    v = p;
                    p = g.parent(v);
                    if Graph::is_vertex(p) && p != root {
                        g.add_edge(last, 1, p, 1)?;
                    }
                }

                if Graph::is_vertex(p) {
                    if p == root {
                        g.add_edge(v, 1, c, 1)?;
                        if v != last {
                            g.add_edge(last, 1, c, 1)?;
                        }
                    } else {
                        g.add_edge(last, 1, c, 1)?;
                        g.add_edge(root, 1, c, 1)?;
                        last = c;
                    }
                    v = c;
                } else {
                    v = root;
                }
            }
        }
    }

    // Extra random edges beyond the planar bound, if requested.
    while g.edge_count() < num_edges {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);

        if u != v && !g.is_neighbor(u, v) {
            g.add_edge(u, 0, v, 0)?;
        }
    }

    // Clear the generation scaffolding.
    let bound = g.occupied_edge_bound();
    for e in 0..bound {
        g.set_edge_type(e, EdgeType::Unset);
        g.clear_edge_visited(e);
    }
    for v in 0..n {
        g.set_parent(v, NIL);
    }

    Ok(())
}

// Returns an unprocessed child of the vertex in the random tree, or NIL.
// Tree arcs sit at the front of the adjacency list until processed; each
// processed arc pair is marked and moved to the back of both lists.
fn get_unprocessed_child(g: &mut Graph, parent: usize) -> usize {
    let e = g.first_arc(parent);
    if !Graph::is_arc(e) {
        return NIL;
    }

    let e_twin = Graph::twin_arc(e);
    let child = g.neighbor(e);

    if g.edge_type(e) != EdgeType::RandomTree || g.edge_visited(e) {
        return NIL;
    }

    g.set_edge_visited(e);
    g.set_edge_visited(e_twin);

    g.move_arc_to_last(parent, e);
    g.move_arc_to_last(child, e_twin);

    g.set_parent(child, parent);

    child
}
