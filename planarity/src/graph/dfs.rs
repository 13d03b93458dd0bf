// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The depth-first preprocessor.
//!
//! One iterative DFS assigns DFIs, parents and least-ancestor values, types
//! every arc, builds the sorted DFS child and forward-arc lists, and stores
//! the tree arc of each child in its future bicomp root. Afterwards the
//! vertices are sorted into DFI order (an involution), lowpoints are
//! computed, and every tree edge is embedded as a singleton bicomp.

use crate::errors::Error;
use crate::graph::{EdgeType, Graph, InternalFlags, NIL};

// The embedding initialization performed ahead of the vertex loop of
// `embed`. This is the function-table default for `embedding_initialize`.
pub(crate) fn embedding_initialize(g: &mut Graph) -> Result<(), Error> {
    let n = g.n;

    // At most two integers are pushed per arc, plus a sentinel pair per
    // component, all within the stack sized at allocation.
    if g.stack.capacity() < 2 * g.arc_capacity {
        return Err(Error::StackCapacityExceeded);
    }
    g.stack.clear();
    g.clear_vertex_visited_flags(false);

    // Each connected component of a disconnected graph gets its own DFS
    // tree root; DFI reaches n when the last component is done.
    let mut dfi = 0;
    let mut v = 0;
    while dfi < n {
        // Vertices already numbered (or roots of components already done)
        // advance the scan to the next DFS tree root.
        if Graph::is_vertex(g.parent(v)) || g.vertex_visited(v) {
            v += 1;
            continue;
        }

        g.stack.push2(NIL, NIL);
        while !g.stack.is_empty() {
            let (uparent, e) = g.stack.pop2();

            // A NIL uparent is the false edge to this component's root.
            let u = if Graph::is_vertex(uparent) {
                g.neighbor(e)
            } else {
                v
            };

            if g.vertex_visited(u) {
                continue;
            }

            g.set_vertex_visited(u);
            g.set_vertex_index(u, dfi);
            g.set_parent(u, uparent);
            dfi += 1;

            if Graph::is_arc(e) {
                g.set_edge_type(e, EdgeType::TreeChild);
                g.set_edge_type(Graph::twin_arc(e), EdgeType::TreeParent);

                // Children are discovered in DFI order, so the list ends up
                // sorted by child DFI.
                let child_dfi = g.vertex_index(u);
                g.append_dfs_child(uparent, child_dfi);

                // Stash the tree arc in the child's future bicomp root; the
                // singleton bicomps are built after the sort below.
                let root = g.root_from_dfs_child(child_dfi);
                g.set_first_arc(root, e);
                g.set_last_arc(root, e);
            }

            g.set_least_ancestor(u, g.vertex_index(u));

            let mut e = g.first_arc(u);
            while Graph::is_arc(e) {
                let nb = g.neighbor(e);
                if !g.vertex_visited(nb) {
                    g.stack.push2(u, e);
                } else if g.edge_type(e) != EdgeType::TreeParent {
                    g.set_edge_type(e, EdgeType::Back);
                    let e_twin = Graph::twin_arc(e);
                    g.set_edge_type(e_twin, EdgeType::Forward);

                    // Move the forward twin out of the ancestor's adjacency
                    // list into its circular forward-arc list. Edges are
                    // scanned in adjacency order, so the list ends up
                    // sorted ascending by descendant DFI.
                    let e_prev = g.prev_arc(e_twin);
                    let e_next = g.next_arc(e_twin);

                    if Graph::is_arc(e_prev) {
                        g.set_next_arc(e_prev, e_next);
                    } else {
                        g.set_first_arc(nb, e_next);
                    }
                    if Graph::is_arc(e_next) {
                        g.set_prev_arc(e_next, e_prev);
                    } else {
                        g.set_last_arc(nb, e_prev);
                    }

                    let head = g.fwd_arc_list(nb);
                    if Graph::is_arc(head) {
                        let tail = g.prev_arc(head);
                        g.set_prev_arc(e_twin, tail);
                        g.set_next_arc(e_twin, head);
                        g.set_prev_arc(head, e_twin);
                        g.set_next_arc(tail, e_twin);
                    } else {
                        g.set_fwd_arc_list(nb, e_twin);
                        g.set_prev_arc(e_twin, e_twin);
                        g.set_next_arc(e_twin, e_twin);
                    }

                    let ancestor_dfi = g.vertex_index(nb);
                    if ancestor_dfi < g.least_ancestor(u) {
                        g.set_least_ancestor(u, ancestor_dfi);
                    }
                }

                e = g.next_arc(e);
            }
        }
    }

    g.set_internal_flag(InternalFlags::DFS_NUMBERED);

    g.sort_vertices()?;

    // Descending order guarantees every child's lowpoint is final before
    // its parent's is computed.
    for v in (0..n).rev() {
        g.set_visited_info(v, n);

        let child = g.sorted_dfs_child_list(v);
        g.set_future_pertinent_child(v, child);

        let mut least_value = g.least_ancestor(v);
        let mut c = child;
        while Graph::is_vertex(c) {
            if g.lowpoint(c) < least_value {
                least_value = g.lowpoint(c);
            }
            c = g.next_dfs_child(v, c);
        }
        g.set_lowpoint(v, least_value);

        // Embed each tree edge as a singleton bicomp between the child v
        // and the root copy of its parent.
        if g.is_dfs_tree_root(v) {
            g.set_first_arc(v, NIL);
            g.set_last_arc(v, NIL);
        } else {
            let root = g.root_from_dfs_child(v);

            let e = g.first_arc(root);
            g.set_prev_arc(e, NIL);
            g.set_next_arc(e, NIL);

            let e_twin = Graph::twin_arc(e);
            g.set_neighbor(e_twin, root);

            g.set_first_arc(v, e_twin);
            g.set_last_arc(v, e_twin);
            g.set_prev_arc(e_twin, NIL);
            g.set_next_arc(e_twin, NIL);

            g.set_ext_face_vertex(root, 0, v);
            g.set_ext_face_vertex(root, 1, v);
            g.set_ext_face_vertex(v, 0, root);
            g.set_ext_face_vertex(v, 1, root);
        }
    }

    Ok(())
}

impl Graph {
    /// Assigns a DFI to each vertex and types every edge, without the rest
    /// of the embedding initialization. A no-op success when the graph is
    /// already DFS numbered.
    pub fn create_dfs_tree(&mut self) -> Result<(), Error> {
        if self.internal_flags.contains(InternalFlags::DFS_NUMBERED) {
            return Ok(());
        }

        if self.stack.capacity() < 2 * self.arc_capacity {
            return Err(Error::StackCapacityExceeded);
        }
        self.stack.clear();
        self.clear_vertex_visited_flags(false);

        let n = self.n;
        let mut dfi = 0;
        let mut v = 0;
        while dfi < n {
            if !self.is_dfs_tree_root(v) || self.vertex_visited(v) {
                v += 1;
                continue;
            }

            self.stack.push2(NIL, NIL);
            while !self.stack.is_empty() {
                let (uparent, e) = self.stack.pop2();
                let u = if Graph::is_vertex(uparent) {
                    self.neighbor(e)
                } else {
                    v
                };

                if !self.vertex_visited(u) {
                    self.set_vertex_visited(u);
                    self.set_vertex_index(u, dfi);
                    self.set_parent(u, uparent);
                    dfi += 1;

                    if Graph::is_arc(e) {
                        self.set_edge_type(e, EdgeType::TreeChild);
                        self.set_edge_type(Graph::twin_arc(e), EdgeType::TreeParent);
                    }

                    let mut e = self.first_arc(u);
                    while Graph::is_arc(e) {
                        if !self.vertex_visited(self.neighbor(e)) {
                            self.stack.push2(u, e);
                        }
                        e = self.next_arc(e);
                    }
                } else if Graph::is_arc(e) {
                    // An edge popped to a visited vertex is the forward arc
                    // of a back edge.
                    self.set_edge_type(e, EdgeType::Forward);
                    self.set_edge_type(Graph::twin_arc(e), EdgeType::Back);
                }
            }
        }

        self.set_internal_flag(InternalFlags::DFS_NUMBERED);
        Ok(())
    }
}

// The function-table default for `sort_vertices`.
//
// After DFS numbering, the index slot of each vertex holds its DFI; this
// reorders the vertex records into DFI positions in linear time by
// cycle-following swaps, leaving the original position in the index slot.
// A second call therefore restores the original order.
pub(crate) fn sort_vertices(g: &mut Graph) -> Result<(), Error> {
    if !g.internal_flags.contains(InternalFlags::DFS_NUMBERED) {
        g.create_dfs_tree()?;
    }

    // Relabel arc neighbor fields through the position-to-index map.
    let bound = g.occupied_edge_bound();
    let mut e = 0;
    while e < bound {
        if g.edge_in_use(e) {
            let nb0 = g.neighbor(e);
            g.set_neighbor(e, g.vertex_index(nb0));
            let nb1 = g.neighbor(e + 1);
            g.set_neighbor(e + 1, g.vertex_index(nb1));
        }
        e += 2;
    }

    // Relabel the DFS parents the same way.
    for v in 0..g.n {
        if !g.is_dfs_tree_root(v) {
            let p = g.parent(v);
            g.set_parent(v, g.vertex_index(p));
        }
    }

    // The visited flags mark settled positions; the index slot of a moved
    // vertex records where its record came from.
    g.clear_vertex_visited_flags(false);

    for v in 0..g.n {
        let mut src_pos = v;
        while !g.vertex_visited(v) {
            let dst_pos = g.vertex_index(v);

            g.v.swap(dst_pos, v);
            let (a, b) = (dst_pos, v);
            g.vi.swap(a, b);

            g.set_vertex_visited(dst_pos);
            g.set_vertex_index(dst_pos, src_pos);

            src_pos = dst_pos;
        }
    }

    g.internal_flags.toggle(InternalFlags::SORTED_BY_DFI);
    Ok(())
}

impl Graph {
    /// Computes the least ancestor and lowpoint of each vertex by a
    /// post-order traversal of the DFS tree.
    ///
    /// A general-purpose utility; the embedder computes both values during
    /// its own initialization pass.
    pub fn lowpoint_and_least_ancestor(&mut self) -> Result<(), Error> {
        if !self.internal_flags.contains(InternalFlags::DFS_NUMBERED) {
            self.create_dfs_tree()?;
        }
        if !self.internal_flags.contains(InternalFlags::SORTED_BY_DFI) {
            self.sort_vertices()?;
        }

        if self.stack.capacity() < self.n {
            return Err(Error::StackCapacityExceeded);
        }
        self.stack.clear();
        self.clear_vertex_visited_flags(false);

        let mut v = 0;
        while v < self.n {
            if self.vertex_visited(v) {
                v += 1;
                continue;
            }

            self.stack.push(v);
            while !self.stack.is_empty() {
                let u = self.stack.pop();

                if !self.vertex_visited(u) {
                    // Pre-order visit: re-push u, then its DFS children.
                    self.set_vertex_visited(u);
                    v += 1;
                    self.stack.push(u);

                    let mut e = self.first_arc(u);
                    while Graph::is_arc(e) {
                        if self.edge_type(e) == EdgeType::TreeChild {
                            self.stack.push(self.neighbor(e));
                        }
                        e = self.next_arc(e);
                    }
                } else {
                    // Post-order visit: all children are done.
                    let mut least_ancestor = u;
                    let mut low = u;

                    let mut e = self.first_arc(u);
                    while Graph::is_arc(e) {
                        let nb = self.neighbor(e);
                        match self.edge_type(e) {
                            EdgeType::TreeChild => {
                                if self.lowpoint(nb) < low {
                                    low = self.lowpoint(nb);
                                }
                            }
                            EdgeType::Back => {
                                if nb < least_ancestor {
                                    least_ancestor = nb;
                                }
                            }
                            _ => {}
                        }
                        e = self.next_arc(e);
                    }

                    self.set_least_ancestor(u, least_ancestor);
                    self.set_lowpoint(u, least_ancestor.min(low));
                }
            }
        }

        Ok(())
    }
}
