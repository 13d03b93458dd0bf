// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A command-line frontend for the `planarity` graph algorithms.
//!
//! # Commands
//!
//! * `-s <cmd> <infile> <outfile> [<outfile2>]`: run a graph command on a
//!   specific graph file
//! * `-r <cmd> <K> <N>`: run a graph command on K random graphs of N
//!   vertices
//! * `-rm <N> <outfile> [<outfile2>]`: generate a random maximal planar
//!   graph
//! * `-rn <N> <outfile> [<outfile2>]`: the same plus one extra edge
//! * `-test [samples_dir]`: regression over the bundled sample graphs
//!
//! Graph commands: `-p` planarity, `-o` outerplanarity, `-d` planar
//! drawing, `-2` K2,3 search, `-3` K3,3 search, `-4` K4 search.

pub mod samples;

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;
use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use rand::Rng;

use planarity::extensions::{
    attach_draw_planar, attach_k23_search, attach_k33_search, attach_k4_search,
    visibility_representation,
};
use planarity::graph::{EmbedFlags, EmbedResult, Graph};
use planarity::io::{ReadVerdict, WriteMode};
use planarity::random::{random_graph, random_planar_graph};

/// Process exit status of a command: OK, NONEMBEDDABLE, or an error
/// (reported separately through the error channel).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitStatus {
    /// The graph was embedded, or no target homeomorph was found.
    Ok,
    /// An obstruction or target homeomorph was isolated.
    NonEmbeddable,
}

impl ExitStatus {
    /// The process exit code for this status.
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Ok => 0,
            ExitStatus::NonEmbeddable => 1,
        }
    }
}

/// One of the graph algorithm selectors (`-p`, `-o`, `-d`, `-2`, `-3`,
/// `-4`).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GraphCommand {
    /// `-p`: planar embedding / Kuratowski obstruction.
    Planarity,
    /// `-o`: outerplanar embedding / K2,3 or K4 obstruction.
    Outerplanarity,
    /// `-d`: planar embedding plus visibility drawing.
    DrawPlanar,
    /// `-2`: search for a K2,3 homeomorph.
    SearchK23,
    /// `-3`: search for a K3,3 homeomorph.
    SearchK33,
    /// `-4`: search for a K4 homeomorph.
    SearchK4,
}

impl FromStr for GraphCommand {
    type Err = color_eyre::eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "-p" | "p" => Ok(GraphCommand::Planarity),
            "-o" | "o" => Ok(GraphCommand::Outerplanarity),
            "-d" | "d" => Ok(GraphCommand::DrawPlanar),
            "-2" | "2" => Ok(GraphCommand::SearchK23),
            "-3" | "3" => Ok(GraphCommand::SearchK33),
            "-4" | "4" => Ok(GraphCommand::SearchK4),
            other => Err(eyre!("unknown graph command '{}'", other)),
        }
    }
}

impl fmt::Display for GraphCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GraphCommand::Planarity => "-p",
            GraphCommand::Outerplanarity => "-o",
            GraphCommand::DrawPlanar => "-d",
            GraphCommand::SearchK23 => "-2",
            GraphCommand::SearchK33 => "-3",
            GraphCommand::SearchK4 => "-4",
        };
        f.write_str(s)
    }
}

impl GraphCommand {
    fn embed_flags(self) -> EmbedFlags {
        match self {
            GraphCommand::Planarity => EmbedFlags::Planar,
            GraphCommand::Outerplanarity => EmbedFlags::Outerplanar,
            GraphCommand::DrawPlanar => EmbedFlags::DrawPlanar,
            GraphCommand::SearchK23 => EmbedFlags::SearchForK23,
            GraphCommand::SearchK33 => EmbedFlags::SearchForK33,
            GraphCommand::SearchK4 => EmbedFlags::SearchForK4,
        }
    }

    fn attach_extension(self, g: &mut Graph) -> Result<()> {
        match self {
            GraphCommand::Planarity | GraphCommand::Outerplanarity => Ok(()),
            GraphCommand::DrawPlanar => attach_draw_planar(g),
            GraphCommand::SearchK23 => attach_k23_search(g),
            GraphCommand::SearchK33 => attach_k33_search(g),
            GraphCommand::SearchK4 => attach_k4_search(g),
        }
        .map_err(|err| eyre!("attaching extension failed: {}", err))
    }

    fn describe(self, result: ExitStatus) -> &'static str {
        match (self, result) {
            (GraphCommand::Planarity, ExitStatus::Ok) => "the graph is planar",
            (GraphCommand::Planarity, ExitStatus::NonEmbeddable) => "the graph is not planar",
            (GraphCommand::Outerplanarity, ExitStatus::Ok) => "the graph is outerplanar",
            (GraphCommand::Outerplanarity, ExitStatus::NonEmbeddable) => {
                "the graph is not outerplanar"
            }
            (GraphCommand::DrawPlanar, ExitStatus::Ok) => "the graph is planar and was drawn",
            (GraphCommand::DrawPlanar, ExitStatus::NonEmbeddable) => "the graph is not planar",
            (GraphCommand::SearchK23, ExitStatus::Ok) => "no subgraph homeomorphic to K2,3",
            (GraphCommand::SearchK23, ExitStatus::NonEmbeddable) => {
                "a subgraph homeomorphic to K2,3 was found"
            }
            (GraphCommand::SearchK33, ExitStatus::Ok) => "no subgraph homeomorphic to K3,3",
            (GraphCommand::SearchK33, ExitStatus::NonEmbeddable) => {
                "a subgraph homeomorphic to K3,3 was found"
            }
            (GraphCommand::SearchK4, ExitStatus::Ok) => "no subgraph homeomorphic to K4",
            (GraphCommand::SearchK4, ExitStatus::NonEmbeddable) => {
                "a subgraph homeomorphic to K4 was found"
            }
        }
    }
}

// Runs a graph command on an already-loaded graph, verifying the result
// against a pre-embedding copy.
fn run_algorithm(g: &mut Graph, command: GraphCommand) -> Result<ExitStatus> {
    command.attach_extension(g)?;

    let orig = g.dup_graph();
    let result = g
        .embed(command.embed_flags())
        .map_err(|err| eyre!("embedding failed: {}", err))?;

    if !g
        .check_embed_result_integrity(&orig)
        .map_err(|err| eyre!("integrity check failed to run: {}", err))?
    {
        bail!("result of {} failed the integrity check", command);
    }

    Ok(match result {
        EmbedResult::Embedded => ExitStatus::Ok,
        EmbedResult::NonEmbeddable => ExitStatus::NonEmbeddable,
    })
}

/// Options for running a command on a specific graph file (`-s`).
#[derive(Debug, Args)]
pub struct SpecificGraphOptions {
    /// Suppress progress output
    #[clap(short, long)]
    pub quiet: bool,

    /// Graph command: -p, -o, -d, -2, -3 or -4
    #[clap(allow_hyphen_values = true)]
    pub command: GraphCommandArg,

    /// Input graph file (adjacency list, matrix or LEDA format)
    pub infile: PathBuf,

    /// Output file for the embedding or obstruction
    pub outfile: PathBuf,

    /// Second output file (the rendered drawing for -d)
    pub outfile2: Option<PathBuf>,
}

// Wrapper so clap can parse the hyphenated command values.
#[derive(Clone, Copy, Debug)]
pub struct GraphCommandArg(pub GraphCommand);

impl FromStr for GraphCommandArg {
    type Err = color_eyre::eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        GraphCommand::from_str(s).map(GraphCommandArg)
    }
}

impl SpecificGraphOptions {
    /// Runs the command and writes the results.
    pub fn exec(&self) -> Result<ExitStatus> {
        let command = self.command.0;
        let mut g = Graph::new();

        let verdict = g
            .read_file(&self.infile)
            .map_err(|err| eyre!("reading {} failed: {}", self.infile.display(), err))?;
        if verdict == ReadVerdict::TooManyEdges && !self.quiet {
            println!("warning: arc capacity filled; the graph was truncated");
        }

        let status = run_algorithm(&mut g, command)?;

        // The embedding and obstruction outputs are written in the input
        // numbering. The primary file receives the embedding for the
        // embedding commands and the found homeomorph for the searches;
        // the embedding commands put an obstruction in the second file.
        let searching = matches!(
            command,
            GraphCommand::SearchK23 | GraphCommand::SearchK33 | GraphCommand::SearchK4
        );

        let write_primary = if searching {
            status == ExitStatus::NonEmbeddable
        } else {
            status == ExitStatus::Ok
        };

        if write_primary {
            g.sort_vertices()
                .map_err(|err| eyre!("restoring vertex order failed: {}", err))?;
            g.write_file(&self.outfile, WriteMode::AdjacencyList)
                .map_err(|err| eyre!("writing {} failed: {}", self.outfile.display(), err))?;
        }

        if let Some(outfile2) = &self.outfile2 {
            if command == GraphCommand::DrawPlanar && status == ExitStatus::Ok {
                let rep = visibility_representation(&g)
                    .map_err(|err| eyre!("no drawing available: {}", err))?;
                fs::write(outfile2, rep.render())
                    .wrap_err_with(|| format!("writing {} failed", outfile2.display()))?;
            } else if !searching && status == ExitStatus::NonEmbeddable {
                g.sort_vertices()
                    .map_err(|err| eyre!("restoring vertex order failed: {}", err))?;
                g.write_file(outfile2, WriteMode::AdjacencyList)
                    .map_err(|err| eyre!("writing {} failed: {}", outfile2.display(), err))?;
            }
        }

        if !self.quiet {
            println!("{}: {}", self.infile.display(), command.describe(status));
        }

        Ok(status)
    }
}

/// Options for running a command on random graphs (`-r`).
#[derive(Debug, Args)]
pub struct RandomGraphsOptions {
    /// Suppress progress output
    #[clap(short, long)]
    pub quiet: bool,

    /// Graph command: -p, -o, -d, -2, -3 or -4
    #[clap(allow_hyphen_values = true)]
    pub command: GraphCommandArg,

    /// How many random graphs to process
    pub count: usize,

    /// Number of vertices per graph
    pub vertices: usize,
}

impl RandomGraphsOptions {
    /// Generates and processes the random graphs, reporting a tally.
    pub fn exec(&self, rng: &mut impl Rng) -> Result<ExitStatus> {
        let command = self.command.0;
        if self.vertices == 0 {
            bail!("random graphs need at least one vertex");
        }

        let mut embeddable = 0usize;
        let mut obstructed = 0usize;

        for i in 0..self.count {
            let mut g = Graph::new();
            g.init_graph(self.vertices)
                .map_err(|err| eyre!("graph init failed: {}", err))?;
            random_graph(&mut g, rng).map_err(|err| eyre!("generation failed: {}", err))?;

            let status = run_algorithm(&mut g, command)
                .wrap_err_with(|| format!("random graph {} of {}", i + 1, self.count))?;
            match status {
                ExitStatus::Ok => embeddable += 1,
                ExitStatus::NonEmbeddable => obstructed += 1,
            }
        }

        if !self.quiet {
            println!(
                "{} random graphs on {} vertices with {}: {} OK, {} NONEMBEDDABLE",
                self.count, self.vertices, command, embeddable, obstructed
            );
        }

        Ok(ExitStatus::Ok)
    }
}

/// Options for generating a random maximal planar graph (`-rm`), or the
/// same plus one extra edge (`-rn`).
#[derive(Debug, Args)]
pub struct RandomMaxPlanarOptions {
    /// Suppress progress output
    #[clap(short, long)]
    pub quiet: bool,

    /// Number of vertices
    pub vertices: usize,

    /// Output file for the generated graph
    pub outfile: PathBuf,

    /// Output file for its planar embedding (or obstruction)
    pub outfile2: Option<PathBuf>,
}

impl RandomMaxPlanarOptions {
    /// Generates the graph; with `extra_edge`, one more edge than the
    /// maximal planar bound is added.
    pub fn exec(&self, rng: &mut impl Rng, extra_edge: bool) -> Result<ExitStatus> {
        let n = self.vertices;
        if n < 3 {
            bail!("maximal planar generation needs at least three vertices");
        }

        let target = if extra_edge { 3 * n - 5 } else { 3 * n - 6 };

        let mut g = Graph::new();
        if 2 * target > 6 * n {
            g.ensure_arc_capacity(2 * target)
                .map_err(|err| eyre!("capacity setup failed: {}", err))?;
        }
        g.init_graph(n).map_err(|err| eyre!("graph init failed: {}", err))?;
        random_planar_graph(&mut g, rng, target)
            .map_err(|err| eyre!("generation failed: {}", err))?;

        g.write_file(&self.outfile, WriteMode::AdjacencyList)
            .map_err(|err| eyre!("writing {} failed: {}", self.outfile.display(), err))?;

        let status = run_algorithm(&mut g, GraphCommand::Planarity)?;
        if extra_edge && status == ExitStatus::Ok && !self.quiet {
            println!("note: the extra edge landed in a planar position");
        }

        if let Some(outfile2) = &self.outfile2 {
            g.sort_vertices()
                .map_err(|err| eyre!("restoring vertex order failed: {}", err))?;
            g.write_file(outfile2, WriteMode::AdjacencyList)
                .map_err(|err| eyre!("writing {} failed: {}", outfile2.display(), err))?;
        }

        if !self.quiet {
            println!(
                "generated {} vertices, {} edges: {}",
                n,
                target,
                GraphCommand::Planarity.describe(status)
            );
        }

        Ok(ExitStatus::Ok)
    }
}

/// Options for the built-in regression tests (`-test`).
#[derive(Debug, Args)]
pub struct TestOptions {
    /// Suppress progress output
    #[clap(short, long)]
    pub quiet: bool,

    /// Directory with the sample graphs; the bundled copies are used
    /// when absent
    pub samples_dir: Option<PathBuf>,
}

impl TestOptions {
    /// Runs the fixed regression sequence over the samples.
    pub fn exec(&self) -> Result<ExitStatus> {
        let load = |name: &str| -> Result<String> {
            if let Some(dir) = &self.samples_dir {
                let path = dir.join(name);
                if path.exists() {
                    return fs::read_to_string(&path)
                        .wrap_err_with(|| format!("reading {} failed", path.display()));
                }
            }
            samples::ALL
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, text)| (*text).to_string())
                .ok_or_else(|| eyre!("no bundled sample named {}", name))
        };

        let cases: &[(&str, GraphCommand, ExitStatus)] = &[
            ("maxPlanar5.txt", GraphCommand::Planarity, ExitStatus::Ok),
            ("maxPlanar5.txt", GraphCommand::DrawPlanar, ExitStatus::Ok),
            ("drawExample.txt", GraphCommand::DrawPlanar, ExitStatus::Ok),
            ("Petersen.txt", GraphCommand::Planarity, ExitStatus::NonEmbeddable),
            ("Petersen.txt", GraphCommand::Outerplanarity, ExitStatus::NonEmbeddable),
            ("Petersen.txt", GraphCommand::SearchK23, ExitStatus::NonEmbeddable),
            ("Petersen.txt", GraphCommand::SearchK33, ExitStatus::NonEmbeddable),
            ("Petersen.txt", GraphCommand::SearchK4, ExitStatus::NonEmbeddable),
            ("K5.txt", GraphCommand::Planarity, ExitStatus::NonEmbeddable),
            ("K5.txt", GraphCommand::SearchK33, ExitStatus::Ok),
            ("K33.txt", GraphCommand::Planarity, ExitStatus::NonEmbeddable),
            ("K33.txt", GraphCommand::SearchK33, ExitStatus::NonEmbeddable),
            ("maxPlanar5.0-based.txt", GraphCommand::Planarity, ExitStatus::Ok),
            ("Petersen.0-based.txt", GraphCommand::Planarity, ExitStatus::NonEmbeddable),
            ("Petersen.0-based.txt", GraphCommand::Outerplanarity, ExitStatus::NonEmbeddable),
        ];

        let mut failures = 0usize;
        for (name, command, expected) in cases {
            let text = load(name)?;
            let mut g = Graph::new();
            g.read_str(&text)
                .map_err(|err| eyre!("sample {} failed to parse: {}", name, err))?;

            let outcome = run_algorithm(&mut g, *command);
            let passed = matches!(&outcome, Ok(status) if status == expected);

            if !passed {
                failures += 1;
            }
            if !self.quiet {
                match outcome {
                    Ok(status) => println!(
                        "{} {} {}: got {:?}, expected {:?}",
                        if passed { "PASS" } else { "FAIL" },
                        command,
                        name,
                        status,
                        expected
                    ),
                    Err(err) => println!("FAIL {} {}: {:#}", command, name, err),
                }
            }
        }

        if failures > 0 {
            bail!("{} regression case(s) failed", failures);
        }
        if !self.quiet {
            println!("all {} regression cases passed", cases.len());
        }
        Ok(ExitStatus::Ok)
    }
}
