// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Planarity testing, embedding and obstruction isolation for simple
//! undirected graphs.
//!
//! `planarity` implements the edge-addition planar embedding algorithm over
//! an arena-backed half-edge graph. Embedding a graph either produces a
//! combinatorial planar embedding (a rotation system) or isolates a minimal
//! subgraph homeomorphic to `K5` or `K3,3`. The same core, driven through
//! extension hooks, answers outerplanarity (`K2,3`/`K4` obstructions) and
//! the subgraph homeomorphism questions for `K2,3`, `K3,3` and `K4`, and
//! feeds the planar visibility drawing module.
//!
//! # Optional features
//!
//! * `proptest1`: property-based tests of the structural invariants using
//!   the [`proptest`](https://docs.rs/proptest) framework.
//!
//! # Examples
//!
//! Test a complete graph for planarity:
//!
//! ```
//! use planarity::graph::{EmbedFlags, EmbedResult, Graph};
//!
//! // K5: the complete graph on five vertices.
//! let mut graph = Graph::new();
//! graph.init_graph(5).unwrap();
//! for u in 0..5 {
//!     for v in (u + 1)..5 {
//!         graph.add_edge(u, 0, v, 0).unwrap();
//!     }
//! }
//!
//! let result = graph.embed(EmbedFlags::Planar).unwrap();
//! assert_eq!(result, EmbedResult::NonEmbeddable);
//!
//! // The graph now holds the obstruction witness: K5 itself.
//! assert_eq!(graph.edge_count(), 10);
//! ```

#![warn(missing_docs)]

pub mod errors;
pub mod extensions;
pub mod graph;
pub mod io;
pub mod random;
#[cfg(test)]
mod unit_tests;

pub use errors::Error;
pub use graph::{EmbedFlags, EmbedResult, Graph};
pub use io::{ReadVerdict, WriteMode};
