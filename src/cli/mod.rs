use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use xlfrag::tolerance::Tolerance;

mod build;
mod config;
mod demo;
mod peptides;
mod search;

pub use config::SettingsOverrides;

/// xlfrag - fragment-mass index for cross-linked peptide search
#[derive(Parser)]
#[command(name = "xlfrag")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Settings shared by every command that builds an index.
#[derive(Args, Debug, Clone)]
pub struct IndexArgs {
    /// Peptide table (CSV, or TSV for .tsv/.txt files) with a `sequence` column
    #[arg(long, value_name = "FILE")]
    peptides: PathBuf,

    /// Load search settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fragment tolerance, e.g. "20ppm" or "0.02da" (overrides the config file)
    #[arg(short = 'f', long)]
    fragment_tolerance: Option<Tolerance>,

    /// Precursor tolerance (overrides the config file)
    #[arg(short = 'p', long)]
    precursor_tolerance: Option<Tolerance>,

    /// Worker threads for the build (0 = all cores)
    #[arg(short = 't', long)]
    threads: Option<usize>,

    // === Advanced tuning flags (hidden from --help) ===
    /// Number of peptide-mass partitions
    #[arg(long, hide = true)]
    partitions: Option<usize>,

    /// Fixed-point scale of stored fragment masses
    #[arg(long, hide = true)]
    quantization_scale: Option<f64>,

    /// Peptides between two progress reports
    #[arg(long, hide = true)]
    progress_interval: Option<usize>,
}

impl IndexArgs {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            fragment_tolerance: self.fragment_tolerance,
            precursor_tolerance: self.precursor_tolerance,
            threads: self.threads,
            partitions: self.partitions,
            quantization_scale: self.quantization_scale,
            progress_interval: self.progress_interval,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build a fragment index and print its statistics
    Build {
        #[command(flatten)]
        index: IndexArgs,

        /// Write the sorted (mass, peptide id) pairs as TSV
        #[arg(long, value_name = "FILE")]
        dump: Option<PathBuf>,
    },

    /// Rank alpha candidates and crosslinked pairs for a set of spectra
    Search {
        #[command(flatten)]
        index: IndexArgs,

        /// Spectra as a JSON array
        #[arg(long, value_name = "FILE")]
        spectra: PathBuf,

        /// Keep only the best N distinct ranks per spectrum
        #[arg(short = 'n', long, default_value = "10")]
        top: usize,
    },

    /// Run a small built-in example
    Demo,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Build { index, dump } => build::run(index, dump),
        Commands::Search { index, spectra, top } => search::run(index, spectra, top),
        Commands::Demo => demo::run(),
    }
}
