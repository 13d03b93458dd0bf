// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Visibility drawing of a planar embedding.
//!
//! Hooks the embedding postprocess: once a planar embedding has been
//! oriented and joined, a visibility representation is computed from it.
//! Every vertex maps to a horizontal segment on its own row and every
//! edge to a vertical segment in its own column (columns are shared only
//! by edges meeting at their common vertex's row), such that each edge
//! segment touches exactly the segments of its two endpoints.
//!
//! The representation is built by st-numbering the embedded graph,
//! orienting every edge upward, and layering the faces of the resulting
//! bipolar orientation: the column of an edge is the layer of the face on
//! its left, and a vertex segment spans the columns of its incident
//! edges. The input must be biconnected (a single vertex is drawn
//! trivially); separable graphs are reported as not drawable.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::errors::Error;
use crate::extensions::{self, FunctionTable, SharedContext, DRAW_PLANAR_ID};
use crate::graph::{EmbedFlags, EmbedResult, Graph, InternalFlags, NIL};

/// A planar visibility drawing: one horizontal segment per vertex and one
/// vertical segment per edge, indexed by the original vertex labels.
#[derive(Clone, Debug)]
pub struct VisibilityRepresentation {
    rows: usize,
    cols: usize,
    // Per vertex label: row, then the inclusive column range.
    vertex_row: Vec<usize>,
    vertex_cols: Vec<(usize, usize)>,
    // Per edge: endpoint labels, column, inclusive row range.
    edge_segments: Vec<EdgeSegment>,
}

/// The vertical segment drawn for one edge.
#[derive(Clone, Copy, Debug)]
pub struct EdgeSegment {
    /// The lower endpoint's vertex label.
    pub lower: usize,
    /// The upper endpoint's vertex label.
    pub upper: usize,
    /// The column the segment occupies.
    pub col: usize,
    /// The inclusive row span, from the lower endpoint's row to the upper's.
    pub rows: (usize, usize),
}

impl VisibilityRepresentation {
    /// The number of rows in the drawing.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The number of columns in the drawing.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The row of the given vertex's horizontal segment.
    pub fn vertex_row(&self, v: usize) -> usize {
        self.vertex_row[v]
    }

    /// The inclusive column range of the given vertex's segment.
    pub fn vertex_cols(&self, v: usize) -> (usize, usize) {
        self.vertex_cols[v]
    }

    /// The edge segments of the drawing.
    pub fn edge_segments(&self) -> &[EdgeSegment] {
        &self.edge_segments
    }

    /// Renders the drawing as text, one character cell per row/column
    /// pair: vertex segments as dashes carrying the vertex label, edge
    /// segments as vertical bars.
    pub fn render(&self) -> String {
        let width = 2 * self.cols.max(1);
        let mut cells = vec![vec![' '; width]; self.rows];

        for seg in &self.edge_segments {
            for row in seg.rows.0..=seg.rows.1 {
                cells[row][2 * seg.col] = '|';
            }
        }

        for (v, &row) in self.vertex_row.iter().enumerate() {
            let (c0, c1) = self.vertex_cols[v];
            for cell in cells[row].iter_mut().take(2 * c1 + 1).skip(2 * c0) {
                *cell = '-';
            }
            let label = v.to_string();
            for (k, ch) in label.chars().enumerate() {
                if 2 * c0 + k < width {
                    cells[row][2 * c0 + k] = ch;
                }
            }
        }

        // Row 0 is the bottom of the drawing.
        let mut out = String::new();
        for row in cells.iter().rev() {
            let line: String = row.iter().collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

struct DrawPlanarContext {
    representation: Option<VisibilityRepresentation>,
}

/// Attaches the planar drawing feature to the graph. A no-op if it is
/// already attached.
pub fn attach_draw_planar(g: &mut Graph) -> Result<(), Error> {
    if extensions::has_extension(g, DRAW_PLANAR_ID) {
        return Ok(());
    }

    let context: SharedContext = Rc::new(RefCell::new(DrawPlanarContext { representation: None }));
    extensions::add_extension(g, DRAW_PLANAR_ID, context, dup_context, overload);
    Ok(())
}

/// Detaches the planar drawing feature.
pub fn detach_draw_planar(g: &mut Graph) -> Result<(), Error> {
    extensions::remove_extension(g, DRAW_PLANAR_ID)
}

/// Returns the visibility representation computed by the last
/// [`Graph::embed`] run with [`EmbedFlags::DrawPlanar`].
pub fn visibility_representation(g: &Graph) -> Result<VisibilityRepresentation, Error> {
    let cell = extensions::find_context(g, DRAW_PLANAR_ID)
        .ok_or(Error::ExtensionMissing(DRAW_PLANAR_ID))?;
    let guard = cell.borrow();
    let context = guard
        .downcast_ref::<DrawPlanarContext>()
        .ok_or(Error::Internal("draw planar context type"))?;
    context
        .representation
        .clone()
        .ok_or(Error::NotDrawable("no drawing computed yet".to_string()))
}

fn dup_context(context: &dyn Any, _g: &Graph) -> SharedContext {
    let context = context
        .downcast_ref::<DrawPlanarContext>()
        .expect("draw planar context type");
    Rc::new(RefCell::new(DrawPlanarContext {
        representation: context.representation.clone(),
    }))
}

fn overload(table: &mut FunctionTable) {
    table.embed_postprocess = embed_postprocess;
}

fn embed_postprocess(
    g: &mut Graph,
    v: usize,
    edge_embedding_result: EmbedResult,
) -> Result<EmbedResult, Error> {
    let saved = extensions::saved_functions(g, DRAW_PLANAR_ID)?;
    let result = (saved.embed_postprocess)(g, v, edge_embedding_result)?;

    if g.embed_flags == Some(EmbedFlags::DrawPlanar) && result == EmbedResult::Embedded {
        let representation = compute_visibility_representation(g)?;

        let cell = extensions::find_context(g, DRAW_PLANAR_ID)
            .ok_or(Error::ExtensionMissing(DRAW_PLANAR_ID))?;
        let mut guard = cell.borrow_mut();
        let context = guard
            .downcast_mut::<DrawPlanarContext>()
            .ok_or(Error::Internal("draw planar context type"))?;
        context.representation = Some(representation);
    }

    Ok(result)
}

// The original-order label of an embedded vertex position.
fn label_of(g: &Graph, v: usize) -> usize {
    if g.internal_flags.contains(InternalFlags::SORTED_BY_DFI) {
        g.vertex_index(v)
    } else {
        v
    }
}

fn compute_visibility_representation(g: &Graph) -> Result<VisibilityRepresentation, Error> {
    let n = g.n;

    if n == 1 {
        return Ok(VisibilityRepresentation {
            rows: 1,
            cols: 1,
            vertex_row: vec![0],
            vertex_cols: vec![(0, 0)],
            edge_segments: Vec::new(),
        });
    }

    if !is_biconnected(g) {
        return Err(Error::NotDrawable(
            "visibility drawing requires a biconnected graph".to_string(),
        ));
    }

    // The poles: the first vertex and a neighbor on its external face.
    let s = 0;
    let t = g.neighbor(g.first_arc(s));

    let st = st_number(g, s, t)?;

    // Faces of the rotation system: each arc lies on exactly one face,
    // found by taking the predecessor arc at each corner.
    let bound = g.occupied_edge_bound();
    let mut face_of_arc = vec![NIL; bound];
    let mut face_count = 0;
    for start in 0..bound {
        if !g.edge_in_use(start) || face_of_arc[start] != NIL {
            continue;
        }
        let mut e = start;
        loop {
            face_of_arc[e] = face_count;
            e = g.prev_arc_circular(Graph::twin_arc(e));
            if e == start {
                break;
            }
        }
        face_count += 1;
    }

    // Orient each edge from the lower to the higher st-number. The face
    // on the left of the upward direction feeds the face on the right in
    // the dual; layering that DAG by longest path from the face left of
    // (s, t) yields the edge columns.
    let up_arc = |e: usize| -> usize {
        // The arc whose owner is the lower endpoint.
        let u = g.neighbor(Graph::twin_arc(e));
        let w = g.neighbor(e);
        if st[u] < st[w] {
            e
        } else {
            Graph::twin_arc(e)
        }
    };

    // The face left of the pole edge becomes the outer face. It is split
    // into two dual nodes, one for each side of the drawing, or the dual
    // of any cycle through it would not be acyclic.
    let st_arc = {
        let mut found = NIL;
        let mut e = g.first_arc(s);
        while Graph::is_arc(e) {
            if g.neighbor(e) == t {
                found = e;
                break;
            }
            e = g.next_arc(e);
        }
        found
    };
    if !Graph::is_arc(st_arc) {
        return Err(Error::Internal("pole edge lost from embedding"));
    }
    let outer = face_of_arc[up_arc(st_arc)];
    let s_star = face_count;
    let t_star = face_count + 1;
    let node_count = face_count + 2;

    let left_node = |f: usize| if f == outer { s_star } else { f };
    let right_node = |f: usize| if f == outer { t_star } else { f };

    // Dual adjacency: left(e) -> right(e) per edge.
    let mut dual: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new(); node_count];
    let mut indegree = vec![0usize; node_count];
    let mut e = 0;
    while e < bound {
        if g.edge_in_use(e) {
            let up = up_arc(e);
            let left = left_node(face_of_arc[up]);
            let right = right_node(face_of_arc[Graph::twin_arc(up)]);
            if left != right {
                dual[left].push(right);
                indegree[right] += 1;
            }
        }
        e += 2;
    }

    // Longest-path layering of the dual.
    let mut layer = vec![0usize; node_count];
    let mut queue: Vec<usize> = (0..node_count).filter(|&f| indegree[f] == 0).collect();
    let mut processed = 0;
    while let Some(f) = queue.pop() {
        processed += 1;
        for i in 0..dual[f].len() {
            let to = dual[f][i];
            if layer[f] + 1 > layer[to] {
                layer[to] = layer[f] + 1;
            }
            indegree[to] -= 1;
            if indegree[to] == 0 {
                queue.push(to);
            }
        }
    }
    if processed != node_count {
        return Err(Error::Internal("face layering found a dual cycle"));
    }

    // Assemble the segments in original labels: vertex rows from the
    // st-numbers, edge columns from the left-face layers.
    let mut vertex_row = vec![0usize; n];
    let mut vertex_cols = vec![(usize::MAX, 0usize); n];
    for v in 0..n {
        vertex_row[label_of(g, v)] = st[v] - 1;
    }

    let mut edge_segments = Vec::with_capacity(g.m);
    let mut cols = 1;
    let mut e = 0;
    while e < bound {
        if g.edge_in_use(e) {
            let up = up_arc(e);
            let lo = g.neighbor(Graph::twin_arc(up));
            let hi = g.neighbor(up);
            let col = layer[left_node(face_of_arc[up])];

            let lo_label = label_of(g, lo);
            let hi_label = label_of(g, hi);

            edge_segments.push(EdgeSegment {
                lower: lo_label,
                upper: hi_label,
                col,
                rows: (st[lo] - 1, st[hi] - 1),
            });

            for &label in &[lo_label, hi_label] {
                let range = &mut vertex_cols[label];
                range.0 = range.0.min(col);
                range.1 = range.1.max(col);
            }
            cols = cols.max(col + 1);
        }
        e += 2;
    }

    for range in vertex_cols.iter_mut() {
        if range.0 == usize::MAX {
            range.0 = 0;
        }
    }

    Ok(VisibilityRepresentation {
        rows: n,
        cols,
        vertex_row,
        vertex_cols,
        edge_segments,
    })
}

// Connectivity plus absence of articulation points, by DFS lowpoints.
fn is_biconnected(g: &Graph) -> bool {
    let n = g.n;
    if n < 2 {
        return n == 1;
    }

    let mut pre = vec![NIL; n];
    let mut low = vec![0usize; n];
    let mut parent = vec![NIL; n];
    let mut counter = 0;

    // Iterative DFS carrying (vertex, resume arc).
    let mut stack: Vec<(usize, usize)> = vec![(0, g.first_arc(0))];
    pre[0] = counter;
    low[0] = counter;
    counter += 1;
    let mut root_children = 0;

    while let Some((v, e)) = stack.pop() {
        if Graph::is_arc(e) {
            stack.push((v, g.next_arc(e)));
            let w = g.neighbor(e);
            if pre[w] == NIL {
                if v == 0 {
                    root_children += 1;
                }
                parent[w] = v;
                pre[w] = counter;
                low[w] = counter;
                counter += 1;
                stack.push((w, g.first_arc(w)));
            } else if w != parent[v] && pre[w] < low[v] {
                low[v] = pre[w];
            }
        } else if Graph::is_vertex(parent[v]) {
            // v is finished; propagate its lowpoint and test the
            // articulation condition at its parent.
            let p = parent[v];
            if low[v] < low[p] {
                low[p] = low[v];
            }
            if p != 0 && low[v] >= pre[p] {
                return false;
            }
        }
    }

    counter == n && root_children <= 1
}

// Computes an st-numbering of the biconnected graph: a numbering from 1
// to n in which s gets 1, t gets n, and every other vertex has both a
// lower and a higher numbered neighbor.
//
// A DFS rooted at s that explores t first supplies the tree, preorder and
// lowpoint values; the pathfinder then consumes the graph path by path,
// each path running from the popped vertex through new edges to an old
// vertex.
fn st_number(g: &Graph, s: usize, t: usize) -> Result<Vec<usize>, Error> {
    let n = g.n;
    let bound = g.occupied_edge_bound();

    let mut pre = vec![NIL; n];
    let mut low = vec![0usize; n];
    let mut parent = vec![NIL; n];
    let mut counter = 0;

    // DFS from s forced to take the edge (s, t) first.
    let mut stack: Vec<(usize, usize)> = Vec::new();
    pre[s] = counter;
    low[s] = counter;
    counter += 1;

    let first = {
        let mut e = g.first_arc(s);
        while Graph::is_arc(e) && g.neighbor(e) != t {
            e = g.next_arc(e);
        }
        e
    };
    if !Graph::is_arc(first) {
        return Err(Error::Internal("poles not adjacent"));
    }

    parent[t] = s;
    pre[t] = counter;
    low[t] = counter;
    counter += 1;
    stack.push((s, first));
    stack.push((t, g.first_arc(t)));

    while let Some((v, e)) = stack.pop() {
        if Graph::is_arc(e) {
            stack.push((v, g.next_arc(e)));
            let w = g.neighbor(e);
            if pre[w] == NIL {
                parent[w] = v;
                pre[w] = counter;
                low[w] = counter;
                counter += 1;
                stack.push((w, g.first_arc(w)));
            } else if w != parent[v] && pre[w] < low[v] {
                low[v] = pre[w];
            }
        } else if Graph::is_vertex(parent[v]) {
            let p = parent[v];
            if low[v] < low[p] {
                low[p] = low[v];
            }
        }
    }

    // Pathfinder state: old vertices and edges, and the signal that the
    // edge (s, t) is consumed from the start.
    let mut old_vertex = vec![false; n];
    let mut old_edge = vec![false; bound / 2];
    old_vertex[s] = true;
    old_vertex[t] = true;
    old_edge[first >> 1] = true;

    let mut st = vec![0usize; n];
    let mut next_number = 0;

    let mut work: Vec<usize> = vec![t, s];

    while let Some(v) = work.pop() {
        let path = pathfinder(g, v, &pre, &parent, &low, &mut old_vertex, &mut old_edge);

        match path {
            None => {
                next_number += 1;
                st[v] = next_number;
            }
            Some(path) => {
                // Re-stack the path so v comes back first and the old
                // terminal vertex is excluded.
                for &u in path.iter().rev().skip(1) {
                    work.push(u);
                }
            }
        }
    }

    if next_number != n {
        return Err(Error::Internal("st-numbering did not cover the graph"));
    }

    Ok(st)
}

// Finds a path of new edges from v to an old vertex, marking everything
// on it old, or reports that v has no new incident edges.
fn pathfinder(
    g: &Graph,
    v: usize,
    pre: &[usize],
    parent: &[usize],
    low: &[usize],
    old_vertex: &mut [bool],
    old_edge: &mut [bool],
) -> Option<Vec<usize>> {
    let mut back_to_ancestor = NIL;
    let mut tree_child = NIL;
    let mut back_from_descendant = NIL;

    let mut e = g.first_arc(v);
    while Graph::is_arc(e) {
        if !old_edge[e >> 1] {
            let w = g.neighbor(e);
            if parent[w] == v && !old_vertex[w] {
                tree_child = e;
            } else if pre[w] < pre[v] && w != parent[v] {
                back_to_ancestor = e;
            } else if pre[w] > pre[v] {
                back_from_descendant = e;
            }
        }
        e = g.next_arc(e);
    }

    // A new back edge to an ancestor: the whole path is that edge.
    if Graph::is_arc(back_to_ancestor) {
        old_edge[back_to_ancestor >> 1] = true;
        return Some(vec![v, g.neighbor(back_to_ancestor)]);
    }

    // A new tree edge: descend along the lowpoint chain until an old
    // vertex is reached (the chain's final back edge leads to an old
    // ancestor).
    if Graph::is_arc(tree_child) {
        let mut path = vec![v];
        old_edge[tree_child >> 1] = true;

        let mut x = g.neighbor(tree_child);
        loop {
            path.push(x);
            if old_vertex[x] {
                break;
            }
            old_vertex[x] = true;

            // The edge achieving low(x): a back edge to the ancestor
            // numbered low(x), or the tree edge to the child whose
            // subtree reaches it. A new vertex always has its low edge
            // new, because consuming it would have passed through x.
            let mut back = NIL;
            let mut child = NIL;
            let mut e = g.first_arc(x);
            while Graph::is_arc(e) {
                if !old_edge[e >> 1] {
                    let w = g.neighbor(e);
                    if pre[w] < pre[x] && w != parent[x] && pre[w] == low[x] {
                        back = e;
                    } else if parent[w] == x && low[w] == low[x] {
                        child = e;
                    }
                }
                e = g.next_arc(e);
            }

            let step = if Graph::is_arc(back) { back } else { child };
            if !Graph::is_arc(step) {
                // Unreachable on a biconnected input.
                return None;
            }
            old_edge[step >> 1] = true;
            x = g.neighbor(step);
        }

        return Some(path);
    }

    // A new back edge from a descendant into v: climb the tree from the
    // descendant to an old vertex.
    if Graph::is_arc(back_from_descendant) {
        old_edge[back_from_descendant >> 1] = true;
        let mut path = vec![v];
        let mut x = g.neighbor(back_from_descendant);
        while !old_vertex[x] {
            path.push(x);
            old_vertex[x] = true;

            // The tree edge to the parent is necessarily new here.
            let mut e = g.first_arc(x);
            while Graph::is_arc(e) {
                if g.neighbor(e) == parent[x] && !old_edge[e >> 1] {
                    break;
                }
                e = g.next_arc(e);
            }
            if Graph::is_arc(e) {
                old_edge[e >> 1] = true;
            }
            x = parent[x];
        }
        path.push(x);
        return Some(path);
    }

    None
}
