// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The extension mechanism: a typed registry of per-graph contexts and a
//! table of overloadable functions through which the core embedder runs
//! its decision points.
//!
//! Each attached extension owns a context (parallel arrays and state) and
//! installs overloads into the graph's active function table. The table
//! saved at attach time acts as the "superclass": an overload that wants
//! the default behavior calls through the table its record captured.
//! Attaching and detaching an extension leaves the graph's observable
//! state unchanged, and non-conflicting overloads compose in any order.
//!
//! The search and drawing algorithms are attached with
//! [`attach_k23_search`](k23_search::attach_k23_search),
//! [`attach_k33_search`](k33_search::attach_k33_search),
//! [`attach_k4_search`](k4_search::attach_k4_search) and
//! [`attach_draw_planar`](draw_planar::attach_draw_planar) before calling
//! [`Graph::embed`] with the matching flag.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::errors::Error;
use crate::graph::{dfs, embed_core, integrity, isolator, storage};
use crate::graph::{EmbedResult, Graph};

pub mod draw_planar;
pub mod k23_search;
pub mod k33_search;
pub mod k4_search;

pub use draw_planar::{
    attach_draw_planar, detach_draw_planar, visibility_representation, EdgeSegment,
    VisibilityRepresentation,
};
pub use k23_search::{attach_k23_search, detach_k23_search};
pub use k33_search::{attach_k33_search, detach_k33_search};
pub use k4_search::{attach_k4_search, detach_k4_search};

/// Identifier of an extension module attached to a graph.
pub type ExtensionId = &'static str;

pub(crate) const K23_SEARCH_ID: ExtensionId = "K23Search";
pub(crate) const K33_SEARCH_ID: ExtensionId = "K33Search";
pub(crate) const K4_SEARCH_ID: ExtensionId = "K4Search";
pub(crate) const DRAW_PLANAR_ID: ExtensionId = "DrawPlanar";

// The overloadable functions. Extensions overload decision points; the
// remaining public-API behaviors (initialization, sorting, capacity) are
// also routed through here so extensions can grow parallel arrays in
// lockstep or refuse expansion.
#[derive(Clone, Copy)]
pub(crate) struct FunctionTable {
    pub embedding_initialize: fn(&mut Graph) -> Result<(), Error>,
    pub embed_back_edge: fn(&mut Graph, usize, usize, usize, usize) -> Result<(), Error>,
    pub walk_up: fn(&mut Graph, usize, usize),
    pub walk_down: fn(&mut Graph, usize, usize) -> Result<EmbedResult, Error>,
    pub merge_bicomps: fn(&mut Graph, usize, usize, usize, usize) -> Result<EmbedResult, Error>,
    pub merge_vertex: fn(&mut Graph, usize, usize, usize) -> Result<(), Error>,
    pub handle_blocked_bicomp: fn(&mut Graph, usize, usize, usize) -> Result<EmbedResult, Error>,
    pub handle_inactive_vertex: fn(&mut Graph, usize, &mut usize, &mut usize) -> Result<(), Error>,
    pub embed_postprocess: fn(&mut Graph, usize, EmbedResult) -> Result<EmbedResult, Error>,
    pub mark_dfs_path: fn(&mut Graph, usize, usize) -> Result<(), Error>,

    pub check_embedding_integrity: fn(&mut Graph, &Graph) -> Result<bool, Error>,
    pub check_obstruction_integrity: fn(&mut Graph, &Graph) -> Result<bool, Error>,

    pub init_graph: fn(&mut Graph, usize) -> Result<(), Error>,
    pub reinitialize_graph: fn(&mut Graph),
    pub ensure_arc_capacity: fn(&mut Graph, usize) -> Result<(), Error>,
    pub sort_vertices: fn(&mut Graph) -> Result<(), Error>,
}

impl FunctionTable {
    pub(crate) fn base() -> Self {
        FunctionTable {
            embedding_initialize: dfs::embedding_initialize,
            embed_back_edge: embed_core::embed_back_edge,
            walk_up: embed_core::walk_up,
            walk_down: embed_core::walk_down,
            merge_bicomps: embed_core::merge_bicomps,
            merge_vertex: embed_core::merge_vertex,
            handle_blocked_bicomp: embed_core::handle_blocked_bicomp,
            handle_inactive_vertex: embed_core::handle_inactive_vertex,
            embed_postprocess: embed_core::embed_postprocess,
            mark_dfs_path: isolator::mark_dfs_path,
            check_embedding_integrity: integrity::check_embedding_integrity,
            check_obstruction_integrity: integrity::check_obstruction_integrity,
            init_graph: storage::init_graph,
            reinitialize_graph: storage::reinitialize_graph,
            ensure_arc_capacity: storage::ensure_arc_capacity,
            sort_vertices: dfs::sort_vertices,
        }
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FunctionTable { .. }")
    }
}

pub(crate) type SharedContext = Rc<RefCell<dyn Any>>;
pub(crate) type DupContextFn = fn(&dyn Any, &Graph) -> SharedContext;

// One attached extension: identifier, shared mutable context, context
// duplication behavior, the function table that was active when it
// attached (its superclass), and the overloads it installs.
pub(crate) struct ExtensionRecord {
    pub id: ExtensionId,
    pub context: SharedContext,
    pub dup_context: DupContextFn,
    pub functions: FunctionTable,
    pub overload: fn(&mut FunctionTable),
}

impl ExtensionRecord {
    pub(crate) fn dup(&self, g: &Graph) -> ExtensionRecord {
        ExtensionRecord {
            id: self.id,
            context: (self.dup_context)(&*self.context.borrow(), g),
            dup_context: self.dup_context,
            functions: self.functions,
            overload: self.overload,
        }
    }
}

impl fmt::Debug for ExtensionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRecord").field("id", &self.id).finish()
    }
}

/// True if an extension with the given identifier is attached.
pub fn has_extension(g: &Graph, id: ExtensionId) -> bool {
    g.extensions.iter().any(|record| record.id == id)
}

// Attaches an extension: the record captures the active table as its
// superclass, then the overloads are installed on top.
pub(crate) fn add_extension(
    g: &mut Graph,
    id: ExtensionId,
    context: SharedContext,
    dup_context: DupContextFn,
    overload: fn(&mut FunctionTable),
) {
    let saved = g.functions;
    let mut table = saved;
    overload(&mut table);
    g.functions = table;

    g.extensions.push(ExtensionRecord {
        id,
        context,
        dup_context,
        functions: saved,
        overload,
    });
}

// Detaches an extension and recomposes the active table from the base
// through the remaining overloads, refreshing each record's superclass.
pub(crate) fn remove_extension(g: &mut Graph, id: ExtensionId) -> Result<(), Error> {
    let position = g
        .extensions
        .iter()
        .position(|record| record.id == id)
        .ok_or(Error::ExtensionMissing(id))?;
    g.extensions.remove(position);

    let mut table = FunctionTable::base();
    for record in &mut g.extensions {
        record.functions = table;
        (record.overload)(&mut table);
    }
    g.functions = table;

    Ok(())
}

// Returns the shared context of an attached extension.
pub(crate) fn find_context(g: &Graph, id: ExtensionId) -> Option<SharedContext> {
    g.extensions
        .iter()
        .find(|record| record.id == id)
        .map(|record| Rc::clone(&record.context))
}

// Returns the function table that was active when the extension attached,
// through which its overloads reach the superclass behavior.
pub(crate) fn saved_functions(g: &Graph, id: ExtensionId) -> Result<FunctionTable, Error> {
    g.extensions
        .iter()
        .find(|record| record.id == id)
        .map(|record| record.functions)
        .ok_or(Error::ExtensionMissing(id))
}
