//! # xlfrag
//!
//! Command-line front end for the fragment-mass index.
//!
//! ## Usage
//!
//! ```bash
//! # Build an index and print its statistics
//! xlfrag build --config search.toml --peptides peptides.tsv
//!
//! # Rank candidates for a batch of spectra
//! xlfrag search --config search.toml --peptides peptides.tsv --spectra spectra.json > candidates.tsv
//!
//! # Run the built-in two-peptide example
//! xlfrag demo
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
