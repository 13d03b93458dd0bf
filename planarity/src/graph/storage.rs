// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Arena storage and O(1) structural mutation primitives.
//!
//! Arcs are attached to and detached from adjacency lists; whole edges are
//! added, inserted, deleted, hidden and restored. Hidden arcs keep their
//! link fields so restoration is O(1) in strict reverse order; callers push
//! hidden arcs on the work stack. Vertex identification and edge
//! contraction push a fixed-size stack segment so a single
//! [`Graph::restore_vertex`] undoes them exactly.

use crate::errors::Error;
use crate::graph::{
    ArcDir, EdgeRec, EdgeType, ExtFaceLink, Graph, InternalFlags, IsolatorContext, ListColl,
    ObstructionType, VertexInfo, VertexRec, WorkStack, DEFAULT_EDGE_LIMIT, NIL,
};

// ---
// Initialization (the function-table defaults)
// ---

pub(crate) fn init_graph(g: &mut Graph, n: usize) -> Result<(), Error> {
    g.n = n;
    g.nv = n;
    if g.arc_capacity == 0 {
        g.arc_capacity = 2 * DEFAULT_EDGE_LIMIT * n;
    }

    let v_size = 2 * n;
    // Two integers per arc, or six per vertex when the arc capacity is small.
    let stack_size = (2 * g.arc_capacity).max(6 * n);

    g.v = vec![VertexRec::empty(); v_size].into();
    g.vi = vec![VertexInfo::empty(); n].into();
    g.e = vec![EdgeRec::empty(); g.arc_capacity].into();
    g.ext_face = vec![ExtFaceLink::empty(); v_size].into();
    g.bicomp_root_lists = ListColl::new(v_size);
    g.sorted_dfs_child_lists = ListColl::new(v_size);
    g.stack = WorkStack::new(stack_size);
    g.edge_holes = Vec::with_capacity(g.arc_capacity / 2);
    g.m = 0;
    g.ic = IsolatorContext::empty();
    Ok(())
}

pub(crate) fn reinitialize_graph(g: &mut Graph) {
    g.m = 0;
    g.internal_flags.clear();
    g.embed_flags = None;

    for rec in g.v.iter_mut() {
        *rec = VertexRec::empty();
    }
    for info in g.vi.iter_mut() {
        *info = VertexInfo::empty();
    }
    for rec in g.e.iter_mut() {
        *rec = EdgeRec::empty();
    }
    for link in g.ext_face.iter_mut() {
        *link = ExtFaceLink::empty();
    }
    g.ic = IsolatorContext::empty();
    g.bicomp_root_lists.reset();
    g.sorted_dfs_child_lists.reset();
    g.stack.clear();
    g.edge_holes.clear();
}

pub(crate) fn ensure_arc_capacity(g: &mut Graph, required_arc_capacity: usize) -> Result<(), Error> {
    if required_arc_capacity <= g.arc_capacity {
        return Ok(());
    }

    let stack_size = (2 * required_arc_capacity).max(6 * g.n);
    g.stack.grow_to(stack_size);
    g.edge_holes.reserve(required_arc_capacity / 2);

    // New arc records are initialized empty; existing edges and edge holes
    // stay at their current locations.
    g.e.resize(required_arc_capacity, EdgeRec::empty());
    g.arc_capacity = required_arc_capacity;
    Ok(())
}

impl Graph {
    // ---
    // Arc attachment primitives
    // ---

    // Attaches `new_arc` into `v`'s adjacency list on the `link` side of
    // arc `e`, or as the first/last arc of `v` when `e` is not an arc.
    // Arcs are only attached and detached; whole edges are added/deleted.
    pub(crate) fn attach_arc(&mut self, v: usize, e: usize, link: usize, new_arc: usize) {
        if Self::is_arc(e) {
            let e2 = self.adjacent_arc(e, link);

            self.set_adjacent_arc(e, link, new_arc);
            self.set_adjacent_arc(new_arc, 1 ^ link, e);
            self.set_adjacent_arc(new_arc, link, e2);

            if Self::is_arc(e2) {
                self.set_adjacent_arc(e2, 1 ^ link, new_arc);
            } else {
                self.set_arc(v, 1 ^ link, new_arc);
            }
        } else {
            let e2 = self.arc(v, link);

            self.set_arc(v, link, new_arc);
            self.set_adjacent_arc(new_arc, 1 ^ link, NIL);
            self.set_adjacent_arc(new_arc, link, e2);

            if Self::is_arc(e2) {
                self.set_adjacent_arc(e2, 1 ^ link, new_arc);
            } else {
                self.set_arc(v, 1 ^ link, new_arc);
            }
        }
    }

    // Detaches an arc from its adjacency list without deleting it. The
    // arc's own links are retained so `restore_arc` can reinsert it, in
    // exact reverse order of detachment.
    pub(crate) fn detach_arc(&mut self, arc: usize) {
        let next = self.next_arc(arc);
        let prev = self.prev_arc(arc);
        let owner = self.neighbor(Self::twin_arc(arc));

        if Self::is_arc(next) {
            self.set_prev_arc(next, prev);
        } else {
            self.set_last_arc(owner, prev);
        }

        if Self::is_arc(prev) {
            self.set_next_arc(prev, next);
        } else {
            self.set_first_arc(owner, next);
        }
    }

    pub(crate) fn restore_arc(&mut self, arc: usize) {
        let next = self.next_arc(arc);
        let prev = self.prev_arc(arc);
        let owner = self.neighbor(Self::twin_arc(arc));

        if Self::is_arc(next) {
            self.set_prev_arc(next, arc);
        } else {
            self.set_last_arc(owner, arc);
        }

        if Self::is_arc(prev) {
            self.set_next_arc(prev, arc);
        } else {
            self.set_first_arc(owner, arc);
        }
    }

    // Binds `arc` as the new first arc of `v`; the old first arc must be
    // cross-linked separately.
    pub(crate) fn bind_first_arc(&mut self, v: usize, arc: usize) {
        self.set_prev_arc(arc, NIL);
        self.set_first_arc(v, arc);
    }

    pub(crate) fn bind_last_arc(&mut self, v: usize, arc: usize) {
        self.set_next_arc(arc, NIL);
        self.set_last_arc(v, arc);
    }

    // Attaches `arc` between `v` and its current first arc.
    pub(crate) fn attach_first_arc(&mut self, v: usize, arc: usize) {
        let first = self.first_arc(v);
        if Self::is_arc(first) {
            self.set_next_arc(arc, first);
            self.set_prev_arc(first, arc);
        } else {
            self.bind_last_arc(v, arc);
        }
        self.bind_first_arc(v, arc);
    }

    // Moves an arc already in `v`'s adjacency list to the end of the list.
    pub(crate) fn move_arc_to_last(&mut self, v: usize, arc: usize) {
        if arc == self.last_arc(v) {
            return;
        }

        if arc == self.first_arc(v) {
            let next = self.next_arc(arc);
            self.set_prev_arc(next, NIL);
            self.set_first_arc(v, next);
        } else {
            let prev = self.prev_arc(arc);
            let next = self.next_arc(arc);
            self.set_next_arc(prev, next);
            self.set_prev_arc(next, prev);
        }

        let last = self.last_arc(v);
        self.set_prev_arc(arc, last);
        self.set_next_arc(last, arc);
        self.bind_last_arc(v, arc);
    }

    // ---
    // Whole-edge operations
    // ---

    fn take_edge_slot(&mut self) -> usize {
        match self.edge_holes.pop() {
            Some(slot) => slot,
            None => self.occupied_edge_bound(),
        }
    }

    /// Adds the undirected edge (u, v), attaching the new arc in `u`'s list
    /// at the first (`ulink` 0) or last (`ulink` 1) position, and
    /// symmetrically for `v`.
    ///
    /// Virtual vertices are legal endpoints during embedding. Fails with
    /// [`Error::TooManyEdges`] when the arc capacity is exhausted.
    pub fn add_edge(&mut self, u: usize, ulink: usize, v: usize, vlink: usize) -> Result<(), Error> {
        if u >= 2 * self.n {
            return Err(Error::InvalidVertex(u));
        }
        if v >= 2 * self.n {
            return Err(Error::InvalidVertex(v));
        }

        if self.m >= self.arc_capacity / 2 {
            return Err(Error::TooManyEdges);
        }

        let vpos = self.take_edge_slot();
        let upos = Self::twin_arc(vpos);

        self.set_neighbor(upos, v);
        self.attach_arc(u, NIL, ulink, upos);
        self.set_neighbor(vpos, u);
        self.attach_arc(v, NIL, vlink, vpos);

        self.m += 1;
        Ok(())
    }

    /// Adds the edge (u, v) so that the new arc in `u`'s list sits on the
    /// `e_ulink` side of the existing arc `e_u`, and symmetrically for `v`.
    /// A `NIL` anchor arc prepends or appends per the link value.
    pub fn insert_edge(
        &mut self,
        u: usize,
        e_u: usize,
        e_ulink: usize,
        v: usize,
        e_v: usize,
        e_vlink: usize,
    ) -> Result<(), Error> {
        if u >= 2 * self.n {
            return Err(Error::InvalidVertex(u));
        }
        if v >= 2 * self.n {
            return Err(Error::InvalidVertex(v));
        }
        if e_ulink > 1 || e_vlink > 1 {
            return Err(Error::InvalidArc(NIL));
        }

        if self.m >= self.arc_capacity / 2 {
            return Err(Error::TooManyEdges);
        }

        let vpos = self.take_edge_slot();
        let upos = Self::twin_arc(vpos);

        self.set_neighbor(upos, v);
        self.attach_arc(u, e_u, e_ulink, upos);
        self.set_neighbor(vpos, u);
        self.attach_arc(v, e_v, e_vlink, vpos);

        self.m += 1;
        Ok(())
    }

    /// Deletes the edge containing arc `e`, returning the arc that was
    /// adjacent to `e` via `next_link` before the deletion, so that loop
    /// iteration over an adjacency list remains natural.
    pub fn delete_edge(&mut self, e: usize, next_link: usize) -> usize {
        let next_arc = self.adjacent_arc(e, next_link);

        self.detach_arc(e);
        self.detach_arc(Self::twin_arc(e));

        let pair = e & !1;
        self.e[pair] = EdgeRec::empty();
        self.e[pair + 1] = EdgeRec::empty();

        self.m -= 1;

        // A pair deleted from the tail retracts the in-use bound instead of
        // leaving a hole.
        if e < self.occupied_edge_bound() {
            self.edge_holes.push(e);
        }

        next_arc
    }

    /// Detaches both arcs of an edge, leaving their link fields intact so
    /// [`Graph::restore_edge`] can reinsert them in reverse order.
    pub fn hide_edge(&mut self, e: usize) {
        self.detach_arc(e);
        self.detach_arc(Self::twin_arc(e));
    }

    /// Reinserts both arcs of an edge hidden by [`Graph::hide_edge`].
    /// Edges must be restored in exact reverse order of hiding.
    pub fn restore_edge(&mut self, e: usize) {
        self.restore_arc(Self::twin_arc(e));
        self.restore_arc(e);
    }

    // Pushes and hides every arc of the vertex except the first and last,
    // which hold an external-face vertex onto the face cycle.
    pub(crate) fn hide_internal_edges(&mut self, vertex: usize) {
        let mut e = self.first_arc(vertex);
        if e == self.last_arc(vertex) {
            return;
        }

        e = self.next_arc(e);
        while e != self.last_arc(vertex) {
            self.stack.push(e);
            self.hide_edge(e);
            e = self.next_arc(e);
        }
    }

    pub(crate) fn restore_internal_edges(&mut self, stack_bottom: usize) -> Result<(), Error> {
        self.restore_hidden_edges(stack_bottom)
    }

    // Each stack entry down to `stack_bottom` is an arc hidden in concert
    // with a push; restore in exact reverse order.
    pub(crate) fn restore_hidden_edges(&mut self, stack_bottom: usize) -> Result<(), Error> {
        while self.stack.len() > stack_bottom {
            let e = self.stack.pop();
            if !Self::is_arc(e) {
                return Err(Error::Internal("non-arc on hidden edge stack"));
            }
            self.restore_edge(e);
        }
        Ok(())
    }

    /// Hides all arcs of `vertex` and pushes a restoration segment so that
    /// [`Graph::restore_vertex`] can undo the operation.
    pub fn hide_vertex(&mut self, vertex: usize) -> Result<(), Error> {
        if !Self::is_vertex(vertex) {
            return Err(Error::InvalidVertex(vertex));
        }

        let hidden_edge_stack_bottom = self.stack.len();
        let mut e = self.first_arc(vertex);
        while Self::is_arc(e) {
            self.stack.push(e);
            self.hide_edge(e);
            e = self.next_arc(e);
        }

        self.stack.push(hidden_edge_stack_bottom);
        self.stack.push(NIL);
        self.stack.push(NIL);
        self.stack.push(NIL);
        self.stack.push(NIL);
        self.stack.push(NIL);
        self.stack.push(vertex);
        Ok(())
    }

    /// Contracts the edge `e` by hiding it and identifying its endpoints.
    /// Reversible by a single [`Graph::restore_vertex`] call.
    pub fn contract_edge(&mut self, e: usize) -> Result<(), Error> {
        if !Self::is_arc(e) {
            return Err(Error::InvalidArc(e));
        }

        let u = self.neighbor(Self::twin_arc(e));
        let v = self.neighbor(e);

        let e_before = self.next_arc(e);
        self.stack.push(e);
        self.hide_edge(e);

        self.identify_vertices(u, v, e_before)
    }

    /// Identifies vertex `v` with vertex `u`: duplicate adjacencies are
    /// hidden, then `v`'s remaining arcs are spliced into `u`'s list before
    /// the arc `e_before` (append when `e_before` is NIL), with twin
    /// neighbor fields rewritten to point at `u`.
    ///
    /// Pushes one stack segment; [`Graph::restore_vertex`] undoes it.
    pub fn identify_vertices(&mut self, u: usize, v: usize, e_before: usize) -> Result<(), Error> {
        let e = self.neighbor_edge_record(u, v);

        // Adjacent endpoints make this an edge contraction plus fixup: the
        // contraction pushes one hidden edge before recursing here, so the
        // recorded hidden-edge stack bottom must be decremented to cover it.
        if Self::is_arc(e) {
            self.contract_edge(e)?;

            let index = self.stack.len() - 7;
            let bottom = self.stack.get(index);
            self.stack.set(index, bottom - 1);
            return Ok(());
        }

        let hidden_edge_stack_bottom = self.stack.len();

        // Mark the neighbors of u visited, then hide each edge of v leading
        // to a visited vertex (it would duplicate an adjacency of u).
        let mut e = self.first_arc(u);
        while Self::is_arc(e) {
            let nb = self.neighbor(e);
            if self.vertex_visited(nb) {
                return Err(Error::Internal("visited flags not clear in identify_vertices"));
            }
            self.set_vertex_visited(nb);
            e = self.next_arc(e);
        }

        let mut e = self.first_arc(v);
        while Self::is_arc(e) {
            if self.vertex_visited(self.neighbor(e)) {
                self.stack.push(e);
                self.hide_edge(e);
            }
            e = self.next_arc(e);
        }

        let mut e = self.first_arc(u);
        while Self::is_arc(e) {
            let nb = self.neighbor(e);
            self.clear_vertex_visited(nb);
            e = self.next_arc(e);
        }

        self.stack.push(hidden_edge_stack_bottom);

        let e_before_pred = if Self::is_arc(e_before) {
            self.prev_arc(e_before)
        } else {
            self.last_arc(u)
        };

        self.stack.push(e_before);
        self.stack.push(self.last_arc(v));
        self.stack.push(self.first_arc(v));
        self.stack.push(e_before_pred);
        self.stack.push(u);
        self.stack.push(v);

        // Redirect the twins of v's remaining arcs to indicate u.
        let mut e = self.first_arc(v);
        while Self::is_arc(e) {
            self.set_neighbor(Self::twin_arc(e), u);
            e = self.next_arc(e);
        }

        // Splice v's list into u between e_before_pred and e_before.
        if Self::is_arc(self.first_arc(v)) {
            if Self::is_arc(e_before_pred) {
                let first_v = self.first_arc(v);
                self.set_next_arc(e_before_pred, first_v);
                self.set_prev_arc(first_v, e_before_pred);
            } else {
                let first_v = self.first_arc(v);
                self.set_first_arc(u, first_v);
            }

            if Self::is_arc(e_before) {
                let last_v = self.last_arc(v);
                self.set_next_arc(last_v, e_before);
                self.set_prev_arc(e_before, last_v);
            } else {
                let last_v = self.last_arc(v);
                self.set_last_arc(u, last_v);
            }

            self.set_first_arc(v, NIL);
            self.set_last_arc(v, NIL);
        }

        Ok(())
    }

    /// Undoes the topmost hide-vertex / identify-vertices / contract-edge
    /// segment on the work stack.
    pub fn restore_vertex(&mut self) -> Result<(), Error> {
        if self.stack.len() < 7 {
            return Err(Error::Internal("restore_vertex: no segment on stack"));
        }

        let v = self.stack.pop();
        let u = self.stack.pop();
        let e_u_pred = self.stack.pop();
        let e_v_first = self.stack.pop();
        let e_v_last = self.stack.pop();
        let e_u_succ = self.stack.pop();

        // A NIL u means v was simply hidden, so only the hidden edges need
        // restoring.
        if Self::is_vertex(u) {
            // Remove v's arcs from u, accounting for the degree 0 case.
            if Self::is_arc(e_u_pred) {
                self.set_next_arc(e_u_pred, e_u_succ);
                if Self::is_arc(e_u_succ) {
                    self.set_prev_arc(e_u_succ, e_u_pred);
                } else {
                    self.set_last_arc(u, e_u_pred);
                }
            } else if Self::is_arc(e_u_succ) {
                self.set_prev_arc(e_u_succ, NIL);
                self.set_first_arc(u, e_u_succ);
            } else {
                self.set_first_arc(u, NIL);
                self.set_last_arc(u, NIL);
            }

            // Place the arcs back into v.
            self.set_first_arc(v, e_v_first);
            self.set_last_arc(v, e_v_last);
            if Self::is_arc(e_v_first) {
                self.set_prev_arc(e_v_first, NIL);
            }
            if Self::is_arc(e_v_last) {
                self.set_next_arc(e_v_last, NIL);
            }

            let mut e = e_v_first;
            while Self::is_arc(e) {
                self.set_neighbor(Self::twin_arc(e), v);
                e = if e == e_v_last { NIL } else { self.next_arc(e) };
            }
        }

        let hesb = self.stack.pop();
        self.restore_hidden_edges(hesb)
    }

    /// Unwinds every identification or contraction segment on the stack.
    pub fn restore_vertices(&mut self) -> Result<(), Error> {
        while !self.stack.is_empty() {
            self.restore_vertex()?;
        }
        Ok(())
    }

    // ---
    // Queries
    // ---

    /// True if the arc u -> v exists (an IN_ONLY record in `u`'s list
    /// represents only v -> u and is ignored).
    pub fn is_neighbor(&self, u: usize, v: usize) -> bool {
        let mut e = self.first_arc(u);
        while Self::is_arc(e) {
            if self.neighbor(e) == v && self.direction(e) != ArcDir::InOnly {
                return true;
            }
            e = self.next_arc(e);
        }
        false
    }

    // Returns the arc in u's adjacency list indicating v, or NIL.
    pub(crate) fn neighbor_edge_record(&self, u: usize, v: usize) -> usize {
        let mut e = self.first_arc(u);
        while Self::is_arc(e) {
            if self.neighbor(e) == v {
                return e;
            }
            e = self.next_arc(e);
        }
        NIL
    }

    /// The number of arcs in `v`'s adjacency list.
    pub fn vertex_degree(&self, v: usize) -> usize {
        let mut degree = 0;
        let mut e = self.first_arc(v);
        while Self::is_arc(e) {
            degree += 1;
            e = self.next_arc(e);
        }
        degree
    }

    // ---
    // Visited-flag sweeps
    // ---

    pub(crate) fn clear_all_visited_flags(&mut self) {
        self.clear_vertex_visited_flags(true);
        self.clear_edge_visited_flags();
    }

    pub(crate) fn clear_vertex_visited_flags(&mut self, include_virtual: bool) {
        let bound = if include_virtual { 2 * self.n } else { self.n };
        for v in 0..bound {
            self.clear_vertex_visited(v);
        }
    }

    pub(crate) fn clear_edge_visited_flags(&mut self) {
        let bound = self.occupied_edge_bound();
        for e in 0..bound {
            self.clear_edge_visited(e);
        }
    }

    // Clears visited flags of the vertices and edges in one bicomp.
    // Uses the stack but preserves prior content.
    pub(crate) fn clear_visited_flags_in_bicomp(&mut self, bicomp_root: usize) {
        let stack_bottom = self.stack.len();
        self.stack.push(bicomp_root);
        while self.stack.len() > stack_bottom {
            let v = self.stack.pop();
            self.clear_vertex_visited(v);

            let mut e = self.first_arc(v);
            while Self::is_arc(e) {
                self.clear_edge_visited(e);
                if self.edge_type(e) == EdgeType::TreeChild {
                    self.stack.push(self.neighbor(e));
                }
                e = self.next_arc(e);
            }
        }
    }

    // Clears visited flags in all bicomps other than the one given.
    pub(crate) fn clear_visited_flags_in_other_bicomps(&mut self, bicomp_root: usize) {
        for r in self.n..self.n + self.nv {
            if r != bicomp_root && self.virtual_vertex_in_use(r) {
                self.clear_visited_flags_in_bicomp(r);
            }
        }
    }

    pub(crate) fn clear_visited_flags_in_unembedded_edges(&mut self) {
        for v in 0..self.n {
            let head = self.fwd_arc_list(v);
            let mut e = head;
            while Self::is_arc(e) {
                self.clear_edge_visited(e);
                self.clear_edge_visited(Self::twin_arc(e));
                e = self.next_arc(e);
                if e == head {
                    break;
                }
            }
        }
    }

    // Clears the visited flags along the path (u, v, ..., w, x) whose
    // internal vertices all have degree 2, doing constant work at the
    // endpoints.
    pub(crate) fn clear_visited_flags_on_path(
        &mut self,
        u: usize,
        v: usize,
        _w: usize,
        x: usize,
    ) -> Result<(), Error> {
        self.for_each_on_path(u, v, x, false)
    }

    pub(crate) fn set_visited_flags_on_path(
        &mut self,
        u: usize,
        v: usize,
        _w: usize,
        x: usize,
    ) -> Result<(), Error> {
        self.for_each_on_path(u, v, x, true)
    }

    fn for_each_on_path(&mut self, u: usize, v: usize, x: usize, mark: bool) -> Result<(), Error> {
        // The twin is looked up from the degree-2 side to avoid work
        // proportional to the degree of u.
        let mut e_twin = self.neighbor_edge_record(v, u);
        if !Self::is_arc(e_twin) {
            return Err(Error::Internal("path endpoints not adjacent"));
        }
        let mut e = Self::twin_arc(e_twin);

        let mut at = u;
        loop {
            if mark {
                self.set_vertex_visited(at);
                self.set_edge_visited(e);
                self.set_edge_visited(e_twin);
            } else {
                self.clear_vertex_visited(at);
                self.clear_edge_visited(e);
                self.clear_edge_visited(e_twin);
            }

            at = self.neighbor(e);
            if at == x {
                break;
            }
            e = self.next_arc_circular(e_twin);
            e_twin = Self::twin_arc(e);
        }

        if mark {
            self.set_vertex_visited(x);
        } else {
            self.clear_vertex_visited(x);
        }
        Ok(())
    }

    // Fills the visited-info of the non-virtual vertices in a bicomp.
    pub(crate) fn fill_visited_info_in_bicomp(&mut self, bicomp_root: usize, fill_value: usize) {
        let stack_bottom = self.stack.len();
        self.stack.push(bicomp_root);
        while self.stack.len() > stack_bottom {
            let v = self.stack.pop();
            if !self.is_virtual(v) {
                self.set_visited_info(v, fill_value);
            }

            let mut e = self.first_arc(v);
            while Self::is_arc(e) {
                if self.edge_type(e) == EdgeType::TreeChild {
                    self.stack.push(self.neighbor(e));
                }
                e = self.next_arc(e);
            }
        }
    }

    pub(crate) fn clear_obstruction_type_in_bicomp(&mut self, bicomp_root: usize) {
        let stack_bottom = self.stack.len();
        self.stack.push(bicomp_root);
        while self.stack.len() > stack_bottom {
            let v = self.stack.pop();
            self.set_obstruction_type(v, ObstructionType::Unknown);

            let mut e = self.first_arc(v);
            while Self::is_arc(e) {
                if self.edge_type(e) == EdgeType::TreeChild {
                    self.stack.push(self.neighbor(e));
                }
                e = self.next_arc(e);
            }
        }
    }

    pub(crate) fn clear_inverted_flags_in_bicomp(&mut self, bicomp_root: usize) {
        let stack_bottom = self.stack.len();
        self.stack.push(bicomp_root);
        while self.stack.len() > stack_bottom {
            let v = self.stack.pop();

            let mut e = self.first_arc(v);
            while Self::is_arc(e) {
                if self.edge_type(e) == EdgeType::TreeChild {
                    self.stack.push(self.neighbor(e));
                    self.clear_edge_inverted(e);
                }
                e = self.next_arc(e);
            }
        }
    }

    // ---
    // Edge re-typing
    // ---

    // An arc being added to `a`'s list indicating `b` gets the child/parent
    // or forward/back orientation of the given type class, per DFI order.
    pub(crate) fn compute_arc_type(&self, a: usize, b: usize, edge_type: EdgeType) -> EdgeType {
        let a = if self.is_virtual(a) {
            self.primary_vertex_from_root(a)
        } else {
            a
        };
        let b = if self.is_virtual(b) {
            self.primary_vertex_from_root(b)
        } else {
            b
        };

        let tree = matches!(edge_type, EdgeType::TreeParent | EdgeType::TreeChild);
        if a < b {
            if tree {
                EdgeType::TreeChild
            } else {
                EdgeType::Forward
            }
        } else if tree {
            EdgeType::TreeParent
        } else {
            EdgeType::Back
        }
    }

    // Deduces and sets the type of the restored edge (u, v) from the DFS
    // parentage. Constant time plus the degree of u.
    pub(crate) fn set_edge_type_of_pair(&mut self, u: usize, v: usize) -> Result<(), Error> {
        let u_orig = if self.is_virtual(u) {
            self.primary_vertex_from_root(u)
        } else {
            u
        };
        let v_orig = if self.is_virtual(v) {
            self.primary_vertex_from_root(v)
        } else {
            v
        };

        let e = self.neighbor_edge_record(u, v);
        if !Self::is_arc(e) {
            return Err(Error::Internal("set_edge_type_of_pair: vertices not adjacent"));
        }
        let e_twin = Self::twin_arc(e);

        if self.parent(v_orig) == u_orig || self.parent(u_orig) == v_orig {
            if u_orig > v_orig {
                self.set_edge_type(e, EdgeType::TreeParent);
                self.set_edge_type(e_twin, EdgeType::TreeChild);
            } else {
                self.set_edge_type(e_twin, EdgeType::TreeParent);
                self.set_edge_type(e, EdgeType::TreeChild);
            }
        } else if u_orig > v_orig {
            self.set_edge_type(e, EdgeType::Back);
            self.set_edge_type(e_twin, EdgeType::Forward);
        } else {
            self.set_edge_type(e_twin, EdgeType::Back);
            self.set_edge_type(e, EdgeType::Forward);
        }

        Ok(())
    }

    pub(crate) fn init_isolator_context(&mut self) {
        self.ic = IsolatorContext::empty();
    }

    pub(crate) fn set_internal_flag(&mut self, flag: InternalFlags) {
        self.internal_flags.insert(flag);
    }
}
