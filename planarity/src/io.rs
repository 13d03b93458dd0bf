// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text input and output of graphs in adjacency list, adjacency matrix
//! and LEDA formats.
//!
//! The adjacency list format preserves directedness: an edge mentioned
//! only by its higher-numbered endpoint is recorded as a directed arc
//! into that endpoint. The matrix format is undirected only. Reads either
//! succeed, stop early with [`ReadVerdict::TooManyEdges`] when the arc
//! capacity fills (leaving the loaded prefix usable), or fail with
//! [`Error::MalformedInput`]. Writes render to a string first, so a
//! failed write leaves no partial output behind.

use std::fs;
use std::path::Path;

use itertools::Itertools;

use crate::errors::Error;
use crate::graph::{ArcDir, Graph, InternalFlags, NIL};

/// Outcome of a successful read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReadVerdict {
    /// The whole input was loaded.
    Complete,
    /// The arc capacity filled before all edges were loaded; the graph
    /// holds the prefix that fit.
    TooManyEdges,
}

/// Selects the output format of [`Graph::write_string`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteMode {
    /// The `N=<count>` adjacency list format.
    AdjacencyList,
    /// The upper triangular adjacency matrix format.
    AdjacencyMatrix,
}

fn malformed(msg: impl Into<String>) -> Error {
    Error::MalformedInput(msg.into())
}

impl Graph {
    /// Reads a graph from text, detecting the format from the first
    /// character: `N` for adjacency list, `L` for LEDA, a digit for
    /// adjacency matrix.
    pub fn read_str(&mut self, input: &str) -> Result<ReadVerdict, Error> {
        match input.trim_start().chars().next() {
            Some('N') => self.read_adjacency_list(input),
            Some('L') => self.read_leda(input),
            Some(c) if c.is_ascii_digit() => self.read_adjacency_matrix(input),
            _ => Err(malformed("unrecognized graph format")),
        }
    }

    /// Reads a graph from the file at `path`, detecting the format as in
    /// [`Graph::read_str`].
    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<ReadVerdict, Error> {
        let input = fs::read_to_string(path)?;
        self.read_str(&input)
    }

    /// Reads the `N=<count>` adjacency list format.
    ///
    /// Vertex lines must appear in ascending order. 0-based indexing is
    /// detected from the first vertex line; a neighbor below the base
    /// value terminates each list. An adjacency mentioned only from the
    /// higher-numbered side becomes a directed arc.
    pub fn read_adjacency_list(&mut self, input: &str) -> Result<ReadVerdict, Error> {
        let mut lines = input.lines();

        let header = lines.next().ok_or_else(|| malformed("empty input"))?;
        let header = header.trim();
        let n: usize = header
            .strip_prefix("N=")
            .map(str::trim)
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| malformed("expected N=<count> header"))?;

        self.init_graph(n)?;

        // The visited-info slots double as an index from neighbor to
        // pending arc during the read.
        for v in 0..n {
            self.set_visited_info(v, NIL);
        }

        let mut zero_based = false;

        for v in 0..n {
            let line = lines
                .next()
                .ok_or_else(|| malformed(format!("missing adjacency line for vertex {}", v)))?;

            let (index_part, rest) = line
                .split_once(':')
                .ok_or_else(|| malformed("expected <index>: <neighbors>"))?;

            let index_value: i64 = index_part
                .trim()
                .parse()
                .map_err(|_| malformed("bad vertex index"))?;

            if v == 0 && index_value == 0 {
                zero_based = true;
            }
            let base: i64 = if zero_based { 0 } else { 1 };

            // The vertex number is documentation, but it must match the
            // line position.
            if index_value - base != v as i64 {
                return Err(malformed(format!(
                    "vertex {} out of order in adjacency list",
                    index_value
                )));
            }

            // Adjacencies recorded while processing earlier vertices are
            // pulled aside; matches are reclaimed below, and leftovers
            // become incoming directed arcs.
            let mut pending = self.first_arc(v);
            if Graph::is_arc(pending) {
                let mut e = pending;
                while Graph::is_arc(e) {
                    let nb = self.neighbor(e);
                    self.set_visited_info(nb, e);
                    e = self.next_arc(e);
                }

                let last = self.last_arc(v);
                self.set_prev_arc(pending, last);
                self.set_next_arc(last, pending);

                self.set_first_arc(v, NIL);
                self.set_last_arc(v, NIL);
            }

            for token in rest.split_whitespace() {
                let raw: i64 = token.parse().map_err(|_| malformed("bad neighbor value"))?;
                let w = raw - base;

                if w < 0 {
                    break;
                }
                let w = w as usize;

                if w >= n {
                    return Err(malformed(format!("neighbor {} out of range", raw)));
                }
                if w == v {
                    return Err(malformed(format!("self-loop at vertex {}", raw)));
                }

                if v < w {
                    // An adjacency to a later vertex is provisionally
                    // undirected.
                    match self.add_edge(v, 0, w, 0) {
                        Ok(()) => {}
                        Err(Error::TooManyEdges) => return Ok(ReadVerdict::TooManyEdges),
                        Err(err) => return Err(err),
                    }
                } else if Graph::is_arc(self.visited_info(w)) {
                    // The lower-numbered side already recorded this edge;
                    // reclaim the pending arc.
                    let e = self.visited_info(w);
                    self.set_visited_info(w, NIL);

                    if pending == e {
                        pending = self.next_arc(e);
                        if pending == e {
                            pending = NIL;
                        }
                    }
                    let next = self.next_arc(e);
                    let prev = self.prev_arc(e);
                    self.set_prev_arc(next, prev);
                    self.set_next_arc(prev, next);

                    self.attach_first_arc(v, e);
                } else {
                    // Mentioned only here: a directed arc from v to w.
                    match self.add_edge(v, 0, w, 0) {
                        Ok(()) => {}
                        Err(Error::TooManyEdges) => return Ok(ReadVerdict::TooManyEdges),
                        Err(err) => return Err(err),
                    }
                    let arc_at_w = self.first_arc(w);
                    self.set_direction(arc_at_w, ArcDir::InOnly);
                }
            }

            // Whatever was not re-mentioned is an incoming directed arc.
            while Graph::is_arc(pending) {
                let e = pending;

                let nb = self.neighbor(e);
                self.set_visited_info(nb, NIL);

                pending = self.next_arc(e);
                if pending == e {
                    pending = NIL;
                }

                let next = self.next_arc(e);
                let prev = self.prev_arc(e);
                self.set_prev_arc(next, prev);
                self.set_next_arc(prev, next);

                self.attach_first_arc(v, e);
                self.set_direction(e, ArcDir::InOnly);
            }
        }

        for v in 0..self.n {
            self.set_visited_info(v, NIL);
        }

        if zero_based {
            self.set_internal_flag(InternalFlags::ZERO_BASED_IO);
        }

        Ok(ReadVerdict::Complete)
    }

    /// Reads the upper triangular adjacency matrix format.
    pub fn read_adjacency_matrix(&mut self, input: &str) -> Result<ReadVerdict, Error> {
        let mut tokens = input.split_whitespace();
        let n: usize = tokens
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| malformed("expected vertex count"))?;

        self.init_graph(n)?;

        // Whitespace between the 0/1 flags is tolerated, so the rows are
        // consumed flag by flag rather than line by line.
        let mut flags = tokens.flat_map(|token| token.chars());
        for v in 0..n {
            for w in (v + 1)..n {
                let flag = flags
                    .next()
                    .ok_or_else(|| malformed("truncated adjacency matrix"))?;
                match flag {
                    '1' => match self.add_edge(v, 0, w, 0) {
                        Ok(()) => {}
                        Err(Error::TooManyEdges) => return Ok(ReadVerdict::TooManyEdges),
                        Err(err) => return Err(err),
                    },
                    '0' => {}
                    other => {
                        return Err(malformed(format!("bad matrix entry '{}'", other)));
                    }
                }
            }
        }

        Ok(ReadVerdict::Complete)
    }

    /// Reads the LEDA graph format, ignoring vertex labels, self-loops
    /// and parallel edges.
    pub fn read_leda(&mut self, input: &str) -> Result<ReadVerdict, Error> {
        let mut lines = input.lines();

        // The fixed three-line header: LEDA.GRAPH plus node and edge
        // type lines.
        for _ in 0..3 {
            lines.next().ok_or_else(|| malformed("truncated LEDA header"))?;
        }

        let n: usize = lines
            .next()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| malformed("expected LEDA vertex count"))?;

        self.init_graph(n)?;

        for _ in 0..n {
            lines.next().ok_or_else(|| malformed("truncated LEDA vertex list"))?;
        }

        let m: usize = lines
            .next()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| malformed("expected LEDA edge count"))?;

        for _ in 0..m {
            let line = lines.next().ok_or_else(|| malformed("truncated LEDA edge list"))?;
            let (u, v) = line
                .split_whitespace()
                .take(2)
                .filter_map(|s| s.parse::<usize>().ok())
                .collect_tuple()
                .ok_or_else(|| malformed("bad LEDA edge line"))?;

            if u == 0 || v == 0 || u > n || v > n {
                return Err(malformed("LEDA edge endpoint out of range"));
            }

            let (u, v) = (u - 1, v - 1);
            if u != v && !self.is_neighbor(u, v) {
                match self.add_edge(u, 0, v, 0) {
                    Ok(()) => {}
                    Err(Error::TooManyEdges) => return Ok(ReadVerdict::TooManyEdges),
                    Err(err) => return Err(err),
                }
            }
        }

        Ok(ReadVerdict::Complete)
    }

    /// Renders the graph in the given format. Directed arcs are only
    /// representable in the adjacency list format.
    pub fn write_string(&self, mode: WriteMode) -> Result<String, Error> {
        match mode {
            WriteMode::AdjacencyList => Ok(self.write_adjacency_list()),
            WriteMode::AdjacencyMatrix => self.write_adjacency_matrix(),
        }
    }

    /// Writes the graph to the file at `path`; nothing is written when
    /// rendering fails.
    pub fn write_file(&self, path: impl AsRef<Path>, mode: WriteMode) -> Result<(), Error> {
        let out = self.write_string(mode)?;
        fs::write(path, out)?;
        Ok(())
    }

    fn write_adjacency_list(&self) -> String {
        let zero_based = self.internal_flags.contains(InternalFlags::ZERO_BASED_IO);
        let base = usize::from(!zero_based);
        let terminator: i64 = if zero_based { -1 } else { 0 };

        let mut out = format!("N={}\n", self.n);
        for v in 0..self.n {
            out.push_str(&format!("{}:", v + base));

            // Neighbors are written from the last arc backwards so that a
            // read/write cycle preserves the embedding order.
            let mut e = self.last_arc(v);
            while Graph::is_arc(e) {
                if self.direction(e) != ArcDir::InOnly {
                    out.push_str(&format!(" {}", self.neighbor(e) + base));
                }
                e = self.prev_arc(e);
            }

            out.push_str(&format!(" {}\n", terminator));
        }
        out
    }

    fn write_adjacency_matrix(&self) -> Result<String, Error> {
        if self.has_directed_edges() {
            return Err(Error::DirectedEdgesUnsupported);
        }

        let mut out = format!("{}\n", self.n);
        for v in 0..self.n.saturating_sub(1) {
            let mut row = vec!['0'; self.n - v - 1];

            let mut e = self.first_arc(v);
            while Graph::is_arc(e) {
                let w = self.neighbor(e);
                if w > v && w < self.n {
                    row[w - v - 1] = '1';
                }
                e = self.next_arc(e);
            }

            let row: String = row.iter().collect();
            out.push_str(&row);
            out.push('\n');
        }
        Ok(out)
    }
}
