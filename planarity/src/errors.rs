// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contains types that describe errors the `planarity` methods can return.

use std::error;
use std::fmt;
use std::io;

use Error::*;

/// Error type describing the sorts of structural failures `planarity` can
/// return.
///
/// Structural failures are distinct from the algorithmic verdict
/// ([`EmbedResult`](crate::graph::EmbedResult)): they unwind to the caller
/// without producing an embedding or an obstruction witness.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Adding an edge would exceed the graph's arc capacity.
    TooManyEdges,
    /// The built-in work stack is too small for the requested operation.
    StackCapacityExceeded,
    /// A vertex identifier was out of range for this graph.
    InvalidVertex(usize),
    /// An arc identifier was out of range or referred to an unused slot.
    InvalidArc(usize),
    /// The graph was used before `init_graph`, or initialized twice.
    NotInitialized,
    /// An operation required an extension that is not attached.
    ExtensionMissing(&'static str),
    /// An attached extension refused the requested capacity expansion.
    ExtensionRefusedCapacity(&'static str),
    /// An error occurred while parsing a graph from text.
    MalformedInput(String),
    /// An error occurred while reading from or writing to a stream.
    IoError(io::Error),
    /// The requested operation is not defined for directed edges.
    DirectedEdgesUnsupported,
    /// The drawing module could not process this input.
    NotDrawable(String),
    /// An internal invariant of the embedder was violated.
    Internal(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TooManyEdges => write!(f, "arc capacity exceeded while adding an edge"),
            StackCapacityExceeded => write!(f, "work stack capacity too small for operation"),
            InvalidVertex(v) => write!(f, "vertex identifier out of range: {}", v),
            InvalidArc(e) => write!(f, "arc identifier invalid: {}", e),
            NotInitialized => write!(f, "graph not initialized (or initialized twice)"),
            ExtensionMissing(name) => write!(f, "required extension not attached: {}", name),
            ExtensionRefusedCapacity(name) => {
                write!(f, "extension '{}' refused arc capacity expansion", name)
            }
            MalformedInput(msg) => write!(f, "error while parsing graph input: {}", msg),
            IoError(err) => write!(f, "I/O error: {}", err),
            DirectedEdgesUnsupported => {
                write!(f, "operation does not support directed edges")
            }
            NotDrawable(msg) => write!(f, "cannot produce visibility drawing: {}", msg),
            Internal(msg) => write!(f, "internal error in embedder: {}", msg),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        IoError(err)
    }
}
