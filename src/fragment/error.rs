use crate::peptide::PeptideId;

/// Errors that can occur while fragmenting a peptide
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FragmentError {
    /// The peptide has no residues
    #[error("Peptide {0} has no residues")]
    EmptyPeptide(PeptideId),

    /// A computed fragment mass is NaN or infinite
    #[error("Non-finite {kind} fragment mass for peptide {peptide}")]
    NonFiniteMass {
        /// Peptide that was fragmented
        peptide: PeptideId,
        /// Ion type of the broken fragment
        kind: super::FragmentKind,
    },
}
