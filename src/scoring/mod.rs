//! # Candidate Scoring
//!
//! For every peak of a spectrum the index is asked which peptides have a
//! fragment at that mass. The fraction of all indexed fragments that fall
//! into the peak's window is the probability of a random match; multiplying
//! these probabilities over all peaks a peptide explains gives its
//! occurrence score. Lower scores are better.
//!
//! ```rust
//! use xlfrag::prelude::*;
//!
//! let residues = ResidueTable::standard();
//! let peptides = PeptideTable::from_peptides(
//!     ["KKKKKKKK", "KKKYYKKK"]
//!         .iter()
//!         .map(|s| Peptide::parse(s, &residues))
//!         .collect::<Result<Vec<_>, _>>()?,
//! );
//! let config = SearchConfig::new(Tolerance::ppm(20.0)).with_parallelism(1, None);
//! let (index, _) = IndexBuilder::new(&config).with_status(&NullStatus).build(&peptides)?;
//!
//! let y2 = 2.0 * 128.094963 + WATER_MASS + PROTON_MASS;
//! let spectrum = Spectrum::builder("scan=1").add_peak(y2, 100.0).build();
//!
//! let ranker = CandidateRanker::new(&index, &peptides, &config);
//! let candidates = ranker.alpha_candidates(&spectrum, f64::MAX);
//! assert_eq!(candidates.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod occurrence;
mod ranker;


pub use occurrence::OccurrenceScores;
pub use ranker::{CandidatePair, CandidateRanker, RankedCandidate, ScoredCandidate, NEVER_MATCHED};
