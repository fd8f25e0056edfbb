//! # xlfrag - Fragment-Mass Index for Cross-Linked Peptide Search
//!
//! `xlfrag` answers the question at the heart of cross-link identification:
//! *which peptides could have produced this fragment peak?* It precomputes
//! the primary fragment masses of every candidate peptide, stores them in a
//! sorted, quantized index and answers tolerance-window queries with two
//! binary searches.
//!
//! ## Key Features
//!
//! - **Tolerance Model**: ppm or absolute Da windows, optionally sized by a
//!   reference mass other than the probed one.
//!
//! - **Compact Index**: `(mass key, peptide id)` pairs in flat `u32` arrays,
//!   sorted once and then shared read-only between searches.
//!
//! - **Parallel Build**: peptides are split into mass-contiguous partitions
//!   that are fragmented on a dedicated rayon pool, with progress reporting
//!   and cooperative cancellation.
//!
//! - **Candidate Ranking**: occurrence scores favour peptides explained by
//!   rare fragment masses; crosslinked alpha/beta pairs are completed from
//!   the precursor mass.
//!
//! ## Quick Start
//!
//! ```rust
//! use xlfrag::prelude::*;
//!
//! let residues = ResidueTable::standard();
//! let peptides = PeptideTable::from_peptides(vec![
//!     Peptide::parse("PEPTIDEK", &residues)?,
//!     Peptide::parse("ELVISK", &residues)?,
//! ]);
//!
//! let config = SearchConfig::new(Tolerance::ppm(20.0))
//!     .with_crosslinker(Crosslinker::new("BS3", 138.06808, ['K']));
//! let (index, report) = IndexBuilder::new(&config)
//!     .with_status(&NullStatus)
//!     .build(&peptides)?;
//!
//! assert_eq!(report.peptides_indexed, 2);
//! assert!(index.is_frozen());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`tolerance`]: mass error model and query windows
//! - [`chemistry`]: residue masses and physical constants
//! - [`peptide`]: parsed peptides and the id-owning [`peptide::PeptideTable`]
//! - [`crosslinker`]: crosslinker reagents and their linkable residues
//! - [`fragment`]: primary fragment generation
//! - [`index`]: the fragment-mass index and its parallel builder
//! - [`scoring`]: occurrence scoring and candidate ranking
//! - [`spectrum`]: the peak list consumed by the ranker
//! - [`status`]: progress sinks and the cancellation flag
//! - [`config`]: TOML-backed search settings

#![warn(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![allow(clippy::too_many_arguments)]

pub mod chemistry;
pub mod config;
pub mod crosslinker;
pub mod fragment;
pub mod index;
pub mod peptide;
pub mod scoring;
pub mod spectrum;
pub mod status;
pub mod tolerance;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::chemistry::{Residue, ResidueTable, PROTON_MASS, WATER_MASS};
    pub use crate::config::{ConfigError, ModificationConfig, SearchConfig};
    pub use crate::crosslinker::Crosslinker;
    pub use crate::fragment::{Fragment, FragmentKind, FragmentProducer, IonType, PrimaryFragments};
    pub use crate::index::{BuildError, BuildReport, FragmentMassIndex, IndexBuilder, IndexStats};
    pub use crate::peptide::{Peptide, PeptideId, PeptideTable, SequenceError};
    pub use crate::scoring::{
        CandidatePair, CandidateRanker, OccurrenceScores, RankedCandidate, ScoredCandidate,
        NEVER_MATCHED,
    };
    pub use crate::spectrum::{Peak, Spectrum, SpectrumBuilder};
    pub use crate::status::{AbortFlag, ChannelStatus, LogStatus, NullStatus, StatusSink};
    pub use crate::tolerance::{MassRange, Tolerance, ToleranceError};
}
