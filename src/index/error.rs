use crate::config::ConfigError;
use crate::fragment::FragmentError;
use crate::peptide::PeptideId;

/// Errors that abort an index build.
///
/// A failed build never yields a partial index.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The configuration handed to the builder is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A peptide could not be fragmented
    #[error("Failed to fragment peptide {peptide}: {source}")]
    Fragment {
        /// Offending peptide
        peptide: PeptideId,
        /// Underlying failure
        #[source]
        source: FragmentError,
    },

    /// A peptide id handed to the builder is not in the peptide table
    #[error("Peptide {0} is not in the peptide table")]
    UnknownPeptide(PeptideId),

    /// Memory for fragment storage could not be reserved
    #[error("Out of memory reserving {requested} fragment slots after {peptides_processed} peptides")]
    OutOfMemory {
        /// Peptides fully processed before the failure
        peptides_processed: usize,
        /// Number of slots that were requested
        requested: usize,
    },

    /// The abort flag was raised
    #[error("Index build cancelled after {peptides_processed} peptides")]
    Cancelled {
        /// Peptides fully processed before the build stopped
        peptides_processed: usize,
    },

    /// The worker thread pool could not be created
    #[error("Failed to create build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A partition worker panicked
    #[error("Build worker for partition {partition} panicked")]
    WorkerPanicked {
        /// Partition the worker was responsible for
        partition: usize,
    },
}
