// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The arena-backed half-edge graph and the planar embedding entry points.
//!
//! The main entry point is [`Graph`]. A graph is created with [`Graph::new`],
//! sized with [`Graph::init_graph`], populated through [`Graph::add_edge`] or
//! one of the readers in [`crate::io`], and then embedded with
//! [`Graph::embed`]. On a [`EmbedResult::NonEmbeddable`] verdict the graph
//! contains an obstruction witness instead of an embedding.

use debug_ignore::DebugIgnore;
use static_assertions::const_assert;

use crate::errors::Error;
use crate::extensions::{ExtensionRecord, FunctionTable};

pub(crate) mod dfs;
pub(crate) mod embed_core;
pub(crate) mod integrity;
pub(crate) mod isolator;
pub(crate) mod list_coll;
pub(crate) mod nonplanar;
pub(crate) mod outerplanar;
pub(crate) mod stack;
pub(crate) mod storage;

pub(crate) use list_coll::ListColl;
pub(crate) use stack::WorkStack;

pub use integrity::ObstructionKind;

// Arena indices are used as pointers throughout; NIL is the bad pointer.
pub(crate) const NIL: usize = usize::MAX;

// The visited-info mark used by searches that need a value distinct from
// NIL and from every step number.
pub(crate) const VISITED_INFO_MARK: usize = usize::MAX - 1;

// The default arc capacity is 2 * 3N arcs, enough for 3N edges.
pub(crate) const DEFAULT_EDGE_LIMIT: usize = 3;

const_assert!(std::mem::size_of::<usize>() >= 4);

/// The algorithmic verdict of an embedding or search operation.
///
/// Structural failures travel separately as [`Error`]; this verdict only
/// distinguishes "the graph was embedded" from "a topological obstruction
/// was isolated in the graph". The subgraph searches reuse the vocabulary:
/// `Embedded` means no homeomorph of the target was found, `NonEmbeddable`
/// means one was isolated.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EmbedResult {
    /// The graph contains an embedding (or the searched homeomorph is absent).
    Embedded,
    /// An obstruction witness was isolated in the graph.
    NonEmbeddable,
}

/// Selects the algorithm run by [`Graph::embed`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EmbedFlags {
    /// Planar embedding; isolates a K5 or K3,3 homeomorph on failure.
    Planar,
    /// Outerplanar embedding; isolates a K2,3 or K4 homeomorph on failure.
    Outerplanar,
    /// Search for a subgraph homeomorphic to K2,3.
    SearchForK23,
    /// Search for a subgraph homeomorphic to K3,3.
    SearchForK33,
    /// Search for a subgraph homeomorphic to K4.
    SearchForK4,
    /// Planar embedding plus visibility drawing data.
    DrawPlanar,
}

impl EmbedFlags {
    /// Returns true for the algorithms whose embedding constraint is
    /// outerplanarity (every vertex stays on the external face).
    pub fn is_outerplanar_based(self) -> bool {
        matches!(
            self,
            EmbedFlags::Outerplanar | EmbedFlags::SearchForK23 | EmbedFlags::SearchForK4
        )
    }
}

/// DFS classification of an arc.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EdgeType {
    /// Not yet typed by a DFS.
    Unset,
    /// Arc to a DFS child.
    TreeChild,
    /// Arc to the DFS parent.
    TreeParent,
    /// Arc to a DFS ancestor that is not the parent.
    Back,
    /// Arc to a DFS descendant that is not a child.
    Forward,
    /// Arc of a randomly generated spanning tree.
    RandomTree,
}

/// Directedness of an arc; both arcs of an undirected edge are `None`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ArcDir {
    None,
    InOnly,
    OutOnly,
}

/// External-face classification of a vertex during obstruction isolation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ObstructionType {
    Unknown,
    HighRxw,
    LowRxw,
    HighRyw,
    LowRyw,
    // Transient mark used by path-component scans.
    Marked,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct EdgeRec {
    pub link: [usize; 2],
    pub neighbor: usize,
    pub ty: EdgeType,
    pub visited: bool,
    pub inverted: bool,
    pub dir: ArcDir,
}

impl EdgeRec {
    pub(crate) fn empty() -> Self {
        EdgeRec {
            link: [NIL, NIL],
            neighbor: NIL,
            ty: EdgeType::Unset,
            visited: false,
            inverted: false,
            dir: ArcDir::None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct VertexRec {
    pub link: [usize; 2],
    pub index: usize,
    pub visited: bool,
    pub obstruction_type: ObstructionType,
}

impl VertexRec {
    pub(crate) fn empty() -> Self {
        VertexRec {
            link: [NIL, NIL],
            index: NIL,
            visited: false,
            obstruction_type: ObstructionType::Unknown,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct VertexInfo {
    pub parent: usize,
    pub least_ancestor: usize,
    pub lowpoint: usize,
    pub visited_info: usize,
    pub pertinent_edge: usize,
    pub pertinent_roots: usize,
    pub future_pertinent_child: usize,
    pub sorted_dfs_child_list: usize,
    pub fwd_arc_list: usize,
}

impl VertexInfo {
    pub(crate) fn empty() -> Self {
        VertexInfo {
            parent: NIL,
            least_ancestor: NIL,
            lowpoint: NIL,
            visited_info: NIL,
            pertinent_edge: NIL,
            pertinent_roots: NIL,
            future_pertinent_child: NIL,
            sorted_dfs_child_list: NIL,
            fwd_arc_list: NIL,
        }
    }
}

/// A pair of short-circuit links giving the two external-face neighbors of
/// a vertex, skipping interior-inactive chains.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ExtFaceLink {
    pub link: [usize; 2],
}

impl ExtFaceLink {
    pub(crate) fn empty() -> Self {
        ExtFaceLink { link: [NIL, NIL] }
    }
}

/// Bitmask of the non-planarity minor types detected for the current
/// obstruction candidate.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct MinorFlags(u16);

impl MinorFlags {
    pub const A: MinorFlags = MinorFlags(1);
    pub const B: MinorFlags = MinorFlags(2);
    pub const C: MinorFlags = MinorFlags(4);
    pub const D: MinorFlags = MinorFlags(8);
    pub const E: MinorFlags = MinorFlags(16);
    pub const E1: MinorFlags = MinorFlags(32);
    pub const E2: MinorFlags = MinorFlags(64);
    pub const E3: MinorFlags = MinorFlags(128);
    pub const E4: MinorFlags = MinorFlags(256);
    pub const E5: MinorFlags = MinorFlags(512);
    pub const E6: MinorFlags = MinorFlags(1024);
    pub const E7: MinorFlags = MinorFlags(2048);

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn insert(&mut self, other: MinorFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: MinorFlags) {
        self.0 &= !other.0;
    }

    pub fn intersects(self, other: MinorFlags) -> bool {
        self.0 & other.0 != 0
    }
}

/// Named vertices describing the current obstruction candidate.
#[derive(Clone, Copy, Debug)]
pub(crate) struct IsolatorContext {
    pub minor_type: MinorFlags,
    pub v: usize,
    pub r: usize,
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub px: usize,
    pub py: usize,
    pub z: usize,
    pub ux: usize,
    pub dx: usize,
    pub uy: usize,
    pub dy: usize,
    pub dw: usize,
    pub uz: usize,
    pub dz: usize,
}

impl IsolatorContext {
    pub(crate) fn empty() -> Self {
        IsolatorContext {
            minor_type: MinorFlags::default(),
            v: NIL,
            r: NIL,
            x: NIL,
            y: NIL,
            w: NIL,
            px: NIL,
            py: NIL,
            z: NIL,
            ux: NIL,
            dx: NIL,
            uy: NIL,
            dy: NIL,
            dw: NIL,
            uz: NIL,
            dz: NIL,
        }
    }
}

// Internal state flags of the graph.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct InternalFlags(u8);

impl InternalFlags {
    pub const DFS_NUMBERED: InternalFlags = InternalFlags(1);
    pub const SORTED_BY_DFI: InternalFlags = InternalFlags(2);
    pub const OBSTRUCTION_FOUND: InternalFlags = InternalFlags(4);
    pub const ZERO_BASED_IO: InternalFlags = InternalFlags(8);

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn insert(&mut self, other: InternalFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: InternalFlags) {
        self.0 &= !other.0;
    }

    pub fn toggle(&mut self, other: InternalFlags) {
        self.0 ^= other.0;
    }

    pub fn contains(self, other: InternalFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

/// A simple undirected graph held in a fixed-capacity arena, supporting
/// planar embedding, obstruction isolation, and subgraph homeomorphism
/// searches.
///
/// Vertices `0..n` are primary; `n..2n` are virtual vertices (bicomp root
/// copies) used during embedding. Each undirected edge occupies a pair of
/// arcs at consecutive even/odd indices, so the twin of arc `e` is `e ^ 1`.
#[derive(Debug)]
pub struct Graph {
    pub(crate) v: DebugIgnore<Vec<VertexRec>>,
    pub(crate) vi: DebugIgnore<Vec<VertexInfo>>,
    pub(crate) n: usize,
    pub(crate) nv: usize,

    pub(crate) e: DebugIgnore<Vec<EdgeRec>>,
    pub(crate) m: usize,
    pub(crate) arc_capacity: usize,
    pub(crate) edge_holes: Vec<usize>,

    pub(crate) stack: WorkStack,
    pub(crate) internal_flags: InternalFlags,
    pub(crate) embed_flags: Option<EmbedFlags>,

    pub(crate) ic: IsolatorContext,
    pub(crate) bicomp_root_lists: ListColl,
    pub(crate) sorted_dfs_child_lists: ListColl,
    pub(crate) ext_face: DebugIgnore<Vec<ExtFaceLink>>,

    pub(crate) extensions: Vec<ExtensionRecord>,
    pub(crate) functions: FunctionTable,
}

impl Default for Graph {
    fn default() -> Self {
        Graph::new()
    }
}

impl Graph {
    /// Creates an empty graph. Call [`Graph::init_graph`] before use.
    pub fn new() -> Self {
        Graph {
            v: DebugIgnore(Vec::new()),
            vi: DebugIgnore(Vec::new()),
            n: 0,
            nv: 0,
            e: DebugIgnore(Vec::new()),
            m: 0,
            arc_capacity: 0,
            edge_holes: Vec::new(),
            stack: WorkStack::new(0),
            internal_flags: InternalFlags::default(),
            embed_flags: None,
            ic: IsolatorContext::empty(),
            bicomp_root_lists: ListColl::new(0),
            sorted_dfs_child_lists: ListColl::new(0),
            ext_face: DebugIgnore(Vec::new()),
            extensions: Vec::new(),
            functions: FunctionTable::base(),
        }
    }

    /// Allocates the vertex, vertex-info and arc arrays for `n` vertices.
    ///
    /// The arc capacity defaults to `6n` (room for `3n` edges) unless
    /// [`Graph::ensure_arc_capacity`] raised it beforehand.
    pub fn init_graph(&mut self, n: usize) -> Result<(), Error> {
        if n == 0 || self.n != 0 {
            return Err(Error::NotInitialized);
        }
        (self.functions.init_graph)(self, n)
    }

    /// Restores the graph to the state it was in immediately after
    /// [`Graph::init_graph`].
    pub fn reinitialize(&mut self) {
        if self.n == 0 {
            return;
        }
        (self.functions.reinitialize_graph)(self);
    }

    /// Ensures the graph can hold at least `required_arc_capacity` arcs
    /// (two per edge).
    ///
    /// Most efficient before [`Graph::init_graph`]; afterwards the arc
    /// array is reallocated and attached extensions must grow their
    /// parallel arrays in lockstep. An extension may refuse, in which case
    /// post-init expansion fails.
    pub fn ensure_arc_capacity(&mut self, required_arc_capacity: usize) -> Result<(), Error> {
        if required_arc_capacity == 0 || required_arc_capacity % 2 != 0 {
            return Err(Error::InvalidArc(required_arc_capacity));
        }
        if self.arc_capacity >= required_arc_capacity {
            return Ok(());
        }
        if self.n == 0 {
            self.arc_capacity = required_arc_capacity;
            return Ok(());
        }
        (self.functions.ensure_arc_capacity)(self, required_arc_capacity)
    }

    /// The number of primary vertices.
    pub fn vertex_count(&self) -> usize {
        self.n
    }

    /// The number of edges currently in the graph.
    pub fn edge_count(&self) -> usize {
        self.m
    }

    /// The number of arcs the graph can hold.
    pub fn arc_capacity(&self) -> usize {
        self.arc_capacity
    }

    /// True if the obstruction isolator ran on the last embedding.
    pub fn obstruction_found(&self) -> bool {
        self.internal_flags.contains(InternalFlags::OBSTRUCTION_FOUND)
    }

    /// Either creates an embedding in the graph or isolates an obstruction.
    ///
    /// On return the graph remains sorted by DFI; the original vertex
    /// numbers are in the index slots and [`Graph::sort_vertices`] restores
    /// the input order. For the search variants, `Embedded` means "no
    /// homeomorph of the target found" and `NonEmbeddable` means "a
    /// homeomorph was isolated in the graph".
    pub fn embed(&mut self, flags: EmbedFlags) -> Result<EmbedResult, Error> {
        embed_core::embed(self, flags)
    }

    /// Reorders the vertices by DFI, or back to the original order.
    ///
    /// This is an involution: calling it twice restores the prior order.
    /// If the graph has not been DFS numbered yet, a DFS runs first.
    pub fn sort_vertices(&mut self) -> Result<(), Error> {
        (self.functions.sort_vertices)(self)
    }

    /// Checks an embedding or obstruction produced by [`Graph::embed`]
    /// against the pre-embedding original.
    pub fn check_embed_result_integrity(&mut self, orig: &Graph) -> Result<bool, Error> {
        if self.obstruction_found() {
            (self.functions.check_obstruction_integrity)(self, orig)
        } else {
            (self.functions.check_embedding_integrity)(self, orig)
        }
    }

    /// Creates a deep copy of the graph, including extension contexts.
    pub fn dup_graph(&self) -> Graph {
        let mut dst = Graph {
            v: DebugIgnore(self.v.0.clone()),
            vi: DebugIgnore(self.vi.0.clone()),
            n: self.n,
            nv: self.nv,
            e: DebugIgnore(self.e.0.clone()),
            m: self.m,
            arc_capacity: self.arc_capacity,
            edge_holes: self.edge_holes.clone(),
            stack: self.stack.duplicate(),
            internal_flags: self.internal_flags,
            embed_flags: self.embed_flags,
            ic: self.ic,
            bicomp_root_lists: self.bicomp_root_lists.clone(),
            sorted_dfs_child_lists: self.sorted_dfs_child_lists.clone(),
            ext_face: DebugIgnore(self.ext_face.0.clone()),
            extensions: Vec::new(),
            functions: self.functions,
        };
        dst.extensions = self.extensions.iter().map(|ext| ext.dup(self)).collect();
        dst
    }

    // ---
    // Index conversions
    // ---

    #[inline]
    pub(crate) fn is_vertex(x: usize) -> bool {
        x != NIL
    }

    #[inline]
    pub(crate) fn is_arc(x: usize) -> bool {
        x != NIL
    }

    #[inline]
    pub(crate) fn twin_arc(e: usize) -> usize {
        e ^ 1
    }

    #[inline]
    pub(crate) fn is_virtual(&self, v: usize) -> bool {
        v != NIL && v >= self.n
    }

    #[inline]
    pub(crate) fn root_from_dfs_child(&self, c: usize) -> usize {
        c + self.n
    }

    #[inline]
    pub(crate) fn dfs_child_from_root(&self, r: usize) -> usize {
        r - self.n
    }

    #[inline]
    pub(crate) fn primary_vertex_from_root(&self, r: usize) -> usize {
        self.parent(self.dfs_child_from_root(r))
    }

    #[inline]
    pub(crate) fn virtual_vertex_in_use(&self, r: usize) -> bool {
        Self::is_arc(self.first_arc(r))
    }

    #[inline]
    pub(crate) fn is_separated_dfs_child(&self, c: usize) -> bool {
        self.virtual_vertex_in_use(self.root_from_dfs_child(c))
    }

    #[inline]
    pub(crate) fn is_dfs_tree_root(&self, v: usize) -> bool {
        !Self::is_vertex(self.parent(v))
    }

    // The bound below which every even arc index is either in use or an
    // edge hole.
    #[inline]
    pub(crate) fn occupied_edge_bound(&self) -> usize {
        2 * (self.m + self.edge_holes.len())
    }

    #[inline]
    pub(crate) fn edge_in_use(&self, e: usize) -> bool {
        Self::is_vertex(self.e[e].neighbor)
    }

    // ---
    // Adjacency-list accessors
    // ---

    #[inline]
    pub(crate) fn first_arc(&self, v: usize) -> usize {
        self.v[v].link[0]
    }

    #[inline]
    pub(crate) fn last_arc(&self, v: usize) -> usize {
        self.v[v].link[1]
    }

    #[inline]
    pub(crate) fn arc(&self, v: usize, link: usize) -> usize {
        self.v[v].link[link]
    }

    #[inline]
    pub(crate) fn set_first_arc(&mut self, v: usize, e: usize) {
        self.v[v].link[0] = e;
    }

    #[inline]
    pub(crate) fn set_last_arc(&mut self, v: usize, e: usize) {
        self.v[v].link[1] = e;
    }

    #[inline]
    pub(crate) fn set_arc(&mut self, v: usize, link: usize, e: usize) {
        self.v[v].link[link] = e;
    }

    #[inline]
    pub(crate) fn next_arc(&self, e: usize) -> usize {
        self.e[e].link[0]
    }

    #[inline]
    pub(crate) fn prev_arc(&self, e: usize) -> usize {
        self.e[e].link[1]
    }

    #[inline]
    pub(crate) fn adjacent_arc(&self, e: usize, link: usize) -> usize {
        self.e[e].link[link]
    }

    #[inline]
    pub(crate) fn set_next_arc(&mut self, e: usize, next: usize) {
        self.e[e].link[0] = next;
    }

    #[inline]
    pub(crate) fn set_prev_arc(&mut self, e: usize, prev: usize) {
        self.e[e].link[1] = prev;
    }

    #[inline]
    pub(crate) fn set_adjacent_arc(&mut self, e: usize, link: usize, arc: usize) {
        self.e[e].link[link] = arc;
    }

    #[inline]
    pub(crate) fn neighbor(&self, e: usize) -> usize {
        self.e[e].neighbor
    }

    #[inline]
    pub(crate) fn set_neighbor(&mut self, e: usize, v: usize) {
        self.e[e].neighbor = v;
    }

    // Next arc as if the adjacency list were circular.
    #[inline]
    pub(crate) fn next_arc_circular(&self, e: usize) -> usize {
        let next = self.next_arc(e);
        if Self::is_arc(next) {
            next
        } else {
            self.first_arc(self.neighbor(Self::twin_arc(e)))
        }
    }

    #[inline]
    pub(crate) fn prev_arc_circular(&self, e: usize) -> usize {
        let prev = self.prev_arc(e);
        if Self::is_arc(prev) {
            prev
        } else {
            self.last_arc(self.neighbor(Self::twin_arc(e)))
        }
    }

    // ---
    // Edge flag accessors
    // ---

    #[inline]
    pub(crate) fn edge_type(&self, e: usize) -> EdgeType {
        self.e[e].ty
    }

    #[inline]
    pub(crate) fn set_edge_type(&mut self, e: usize, ty: EdgeType) {
        self.e[e].ty = ty;
    }

    #[inline]
    pub(crate) fn edge_visited(&self, e: usize) -> bool {
        self.e[e].visited
    }

    #[inline]
    pub(crate) fn set_edge_visited(&mut self, e: usize) {
        self.e[e].visited = true;
    }

    #[inline]
    pub(crate) fn clear_edge_visited(&mut self, e: usize) {
        self.e[e].visited = false;
    }

    #[inline]
    pub(crate) fn edge_inverted(&self, e: usize) -> bool {
        self.e[e].inverted
    }

    #[inline]
    pub(crate) fn set_edge_inverted(&mut self, e: usize) {
        self.e[e].inverted = true;
    }

    #[inline]
    pub(crate) fn clear_edge_inverted(&mut self, e: usize) {
        self.e[e].inverted = false;
    }

    #[inline]
    pub(crate) fn xor_edge_inverted(&mut self, e: usize) {
        self.e[e].inverted = !self.e[e].inverted;
    }

    #[inline]
    pub(crate) fn direction(&self, e: usize) -> ArcDir {
        self.e[e].dir
    }

    // A direction of `None` clears directedness on both arcs; otherwise the
    // twin arc receives the opposing setting.
    pub(crate) fn set_direction(&mut self, e: usize, dir: ArcDir) {
        let twin = Self::twin_arc(e);
        match dir {
            ArcDir::InOnly => {
                self.e[e].dir = ArcDir::InOnly;
                self.e[twin].dir = ArcDir::OutOnly;
            }
            ArcDir::OutOnly => {
                self.e[e].dir = ArcDir::OutOnly;
                self.e[twin].dir = ArcDir::InOnly;
            }
            ArcDir::None => {
                self.e[e].dir = ArcDir::None;
                self.e[twin].dir = ArcDir::None;
            }
        }
    }

    // ---
    // Vertex accessors
    // ---

    #[inline]
    pub(crate) fn vertex_index(&self, v: usize) -> usize {
        self.v[v].index
    }

    #[inline]
    pub(crate) fn set_vertex_index(&mut self, v: usize, index: usize) {
        self.v[v].index = index;
    }

    #[inline]
    pub(crate) fn vertex_visited(&self, v: usize) -> bool {
        self.v[v].visited
    }

    #[inline]
    pub(crate) fn set_vertex_visited(&mut self, v: usize) {
        self.v[v].visited = true;
    }

    #[inline]
    pub(crate) fn clear_vertex_visited(&mut self, v: usize) {
        self.v[v].visited = false;
    }

    #[inline]
    pub(crate) fn obstruction_type(&self, v: usize) -> ObstructionType {
        self.v[v].obstruction_type
    }

    #[inline]
    pub(crate) fn set_obstruction_type(&mut self, v: usize, ty: ObstructionType) {
        self.v[v].obstruction_type = ty;
    }

    #[inline]
    pub(crate) fn clear_obstruction_type(&mut self, v: usize) {
        self.v[v].obstruction_type = ObstructionType::Unknown;
    }

    // ---
    // Vertex-info accessors
    // ---

    #[inline]
    pub(crate) fn parent(&self, v: usize) -> usize {
        self.vi[v].parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, v: usize, parent: usize) {
        self.vi[v].parent = parent;
    }

    #[inline]
    pub(crate) fn least_ancestor(&self, v: usize) -> usize {
        self.vi[v].least_ancestor
    }

    #[inline]
    pub(crate) fn set_least_ancestor(&mut self, v: usize, a: usize) {
        self.vi[v].least_ancestor = a;
    }

    #[inline]
    pub(crate) fn lowpoint(&self, v: usize) -> usize {
        self.vi[v].lowpoint
    }

    #[inline]
    pub(crate) fn set_lowpoint(&mut self, v: usize, l: usize) {
        self.vi[v].lowpoint = l;
    }

    #[inline]
    pub(crate) fn visited_info(&self, v: usize) -> usize {
        self.vi[v].visited_info
    }

    #[inline]
    pub(crate) fn set_visited_info(&mut self, v: usize, info: usize) {
        self.vi[v].visited_info = info;
    }

    #[inline]
    pub(crate) fn pertinent_edge(&self, v: usize) -> usize {
        self.vi[v].pertinent_edge
    }

    #[inline]
    pub(crate) fn set_pertinent_edge(&mut self, v: usize, e: usize) {
        self.vi[v].pertinent_edge = e;
    }

    #[inline]
    pub(crate) fn pertinent_roots(&self, v: usize) -> usize {
        self.vi[v].pertinent_roots
    }

    #[inline]
    pub(crate) fn set_pertinent_roots(&mut self, v: usize, head: usize) {
        self.vi[v].pertinent_roots = head;
    }

    #[inline]
    pub(crate) fn first_pertinent_root(&self, v: usize) -> usize {
        self.root_from_dfs_child(self.vi[v].pertinent_roots)
    }

    #[inline]
    pub(crate) fn first_pertinent_root_child(&self, v: usize) -> usize {
        self.vi[v].pertinent_roots
    }

    #[inline]
    pub(crate) fn last_pertinent_root_child(&self, v: usize) -> usize {
        self.bicomp_root_lists
            .get_prev(self.vi[v].pertinent_roots, NIL)
    }

    pub(crate) fn delete_pertinent_root(&mut self, v: usize, root: usize) {
        let child = self.dfs_child_from_root(root);
        let head = self.vi[v].pertinent_roots;
        self.vi[v].pertinent_roots = self.bicomp_root_lists.delete(head, child);
    }

    pub(crate) fn prepend_pertinent_root(&mut self, v: usize, root: usize) {
        let child = self.dfs_child_from_root(root);
        let head = self.vi[v].pertinent_roots;
        self.vi[v].pertinent_roots = self.bicomp_root_lists.prepend(head, child);
    }

    pub(crate) fn append_pertinent_root(&mut self, v: usize, root: usize) {
        let child = self.dfs_child_from_root(root);
        let head = self.vi[v].pertinent_roots;
        self.vi[v].pertinent_roots = self.bicomp_root_lists.append(head, child);
    }

    #[inline]
    pub(crate) fn future_pertinent_child(&self, v: usize) -> usize {
        self.vi[v].future_pertinent_child
    }

    #[inline]
    pub(crate) fn set_future_pertinent_child(&mut self, v: usize, c: usize) {
        self.vi[v].future_pertinent_child = c;
    }

    #[inline]
    pub(crate) fn sorted_dfs_child_list(&self, v: usize) -> usize {
        self.vi[v].sorted_dfs_child_list
    }

    #[inline]
    pub(crate) fn set_sorted_dfs_child_list(&mut self, v: usize, head: usize) {
        self.vi[v].sorted_dfs_child_list = head;
    }

    #[inline]
    pub(crate) fn next_dfs_child(&self, v: usize, c: usize) -> usize {
        self.sorted_dfs_child_lists
            .get_next(self.vi[v].sorted_dfs_child_list, c)
    }

    pub(crate) fn append_dfs_child(&mut self, v: usize, c: usize) {
        let head = self.vi[v].sorted_dfs_child_list;
        self.vi[v].sorted_dfs_child_list = self.sorted_dfs_child_lists.append(head, c);
    }

    #[inline]
    pub(crate) fn fwd_arc_list(&self, v: usize) -> usize {
        self.vi[v].fwd_arc_list
    }

    #[inline]
    pub(crate) fn set_fwd_arc_list(&mut self, v: usize, head: usize) {
        self.vi[v].fwd_arc_list = head;
    }

    // ---
    // External face accessors
    // ---

    #[inline]
    pub(crate) fn ext_face_vertex(&self, v: usize, link: usize) -> usize {
        self.ext_face[v].link[link]
    }

    #[inline]
    pub(crate) fn set_ext_face_vertex(&mut self, v: usize, link: usize, vertex: usize) {
        self.ext_face[v].link[link] = vertex;
    }

    // ---
    // Pertinence and future pertinence
    // ---

    // A vertex is pertinent while it has a pending back edge to the current
    // step vertex, directly or through a pertinent child bicomp.
    #[inline]
    pub(crate) fn pertinent(&self, vertex: usize) -> bool {
        Self::is_arc(self.vi[vertex].pertinent_edge)
            || Self::is_vertex(self.vi[vertex].pertinent_roots)
    }

    // A vertex is future pertinent while it connects by an unembedded back
    // edge to an ancestor of the current step vertex `v`.
    // `update_future_pertinent_child` must run first.
    #[inline]
    pub(crate) fn future_pertinent(&self, vertex: usize, v: usize) -> bool {
        self.vi[vertex].least_ancestor < v
            || (Self::is_vertex(self.vi[vertex].future_pertinent_child)
                && self.vi[self.vi[vertex].future_pertinent_child].lowpoint < v)
    }

    #[inline]
    pub(crate) fn inactive(&self, vertex: usize, v: usize) -> bool {
        !self.pertinent(vertex) && !self.future_pertinent(vertex, v)
    }

    // Advances the future-pertinent-child cursor of `w` past children that
    // are no longer future pertinent in step `v` or have been merged into
    // the bicomp containing `w`.
    pub(crate) fn update_future_pertinent_child(&mut self, w: usize, v: usize) {
        while Self::is_vertex(self.vi[w].future_pertinent_child) {
            let child = self.vi[w].future_pertinent_child;
            if self.lowpoint(child) >= v || !self.is_separated_dfs_child(child) {
                self.vi[w].future_pertinent_child = self.next_dfs_child(w, child);
            } else {
                break;
            }
        }
    }
}
