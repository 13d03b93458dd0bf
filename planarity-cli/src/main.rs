// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::{Parser, Subcommand};
use color_eyre::Result;

use planarity_cli::{
    ExitStatus, RandomGraphsOptions, RandomMaxPlanarOptions, SpecificGraphOptions, TestOptions,
};

#[derive(Debug, Parser)]
#[clap(name = "planarity", about = "Planar graph embedding and obstruction isolation")]
struct Args {
    #[clap(subcommand)]
    cmd: Command,
}

// Ensure this list is kept up to date with the doc comment in lib.rs.
#[derive(Debug, Subcommand)]
enum Command {
    /// Run the built-in regression tests over the sample graphs
    #[clap(name = "test")]
    Test(TestOptions),
    /// Run a graph command on a specific graph file
    #[clap(name = "s")]
    Specific(SpecificGraphOptions),
    /// Run a graph command on K random graphs of N vertices
    #[clap(name = "r")]
    Random(RandomGraphsOptions),
    /// Generate a random maximal planar graph
    #[clap(name = "rm")]
    RandomMaxPlanar(RandomMaxPlanarOptions),
    /// Generate a random maximal planar graph plus one extra edge
    #[clap(name = "rn")]
    RandomNonplanar(RandomMaxPlanarOptions),
}

// The command words keep their historical single-dash spellings
// (-s, -r, -rm, -rn, -test, -h), which clap cannot parse as subcommand
// names, so they are normalized before parsing.
fn args() -> Vec<String> {
    let mut args: Vec<String> = std::env::args().collect();

    if args.len() >= 2 {
        let replacement = match args[1].as_str() {
            "-test" => Some("test"),
            "-s" => Some("s"),
            "-r" => Some("r"),
            "-rm" => Some("rm"),
            "-rn" => Some("rn"),
            "-h" | "-help" | "-i" | "-info" => Some("help"),
            _ => None,
        };
        if let Some(replacement) = replacement {
            args[1] = replacement.to_string();
        }

        // The help variations (-h -menu, -h -i) all print the same menu.
        if args[1] == "help" {
            args.truncate(2);
        }
    }

    args
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse_from(args());
    let mut rng = rand::thread_rng();

    let status = match args.cmd {
        Command::Test(opts) => opts.exec()?,
        Command::Specific(opts) => opts.exec()?,
        Command::Random(opts) => opts.exec(&mut rng)?,
        Command::RandomMaxPlanar(opts) => opts.exec(&mut rng, false)?,
        Command::RandomNonplanar(opts) => opts.exec(&mut rng, true)?,
    };

    // 0 for OK, 1 for NONEMBEDDABLE; errors unwind through eyre and exit
    // nonzero on their own.
    if status == ExitStatus::NonEmbeddable {
        std::process::exit(ExitStatus::NonEmbeddable.code());
    }
    Ok(())
}
