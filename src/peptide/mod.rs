//! # Peptides
//!
//! Peptides are produced by an external digestion step and handed to the
//! index as a [`PeptideTable`]. The index itself only stores the compact
//! [`PeptideId`] and resolves it against the table when callers ask for
//! peptide objects.
//!
//! Sequences use the one-letter code with modifications written as a
//! lower-case suffix of the modified residue, e.g. `PEPMoxK`.

mod error;
mod table;

#[cfg(test)]
mod tests;

use std::fmt;

use crate::chemistry::{Residue, ResidueTable, WATER_MASS};

pub use error::SequenceError;
pub use table::PeptideTable;

/// Stable identifier of a peptide inside a [`PeptideTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PeptideId(pub u32);

impl PeptideId {
    /// Position of the peptide in its table
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PeptideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered sequence of residues with its derived neutral mass.
#[derive(Debug, Clone, PartialEq)]
pub struct Peptide {
    id: PeptideId,
    residues: Vec<Residue>,
    mass: f64,
    decoy: bool,
}

impl Peptide {
    /// Parse a sequence such as `KMoxLR` against `table`.
    ///
    /// The returned peptide has id `0` until it is added to a [`PeptideTable`].
    pub fn parse(sequence: &str, table: &ResidueTable) -> Result<Self, SequenceError> {
        let mut residues = Vec::with_capacity(sequence.len());
        let mut chars = sequence.trim().char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            if !c.is_ascii_uppercase() {
                return Err(SequenceError::InvalidCharacter {
                    character: c,
                    offset,
                });
            }
            let mut symbol = String::from(c);
            while let Some(&(_, next)) = chars.peek() {
                if next.is_ascii_lowercase() || next.is_ascii_digit() {
                    symbol.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            let residue = table.get(&symbol).ok_or_else(|| SequenceError::UnknownResidue {
                symbol: symbol.clone(),
                position: residues.len(),
            })?;
            residues.push(residue.clone());
        }

        Self::from_residues(residues)
    }

    /// Build a peptide from already resolved residues
    pub fn from_residues(residues: Vec<Residue>) -> Result<Self, SequenceError> {
        if residues.is_empty() {
            return Err(SequenceError::Empty);
        }
        let mass = residues.iter().map(|r| r.mass).sum::<f64>() + WATER_MASS;
        Ok(Self {
            id: PeptideId::default(),
            residues,
            mass,
            decoy: false,
        })
    }

    /// Mark the peptide as decoy (or target)
    pub fn with_decoy(mut self, decoy: bool) -> Self {
        self.decoy = decoy;
        self
    }

    pub(crate) fn set_id(&mut self, id: PeptideId) {
        self.id = id;
    }

    /// Identifier assigned by the owning [`PeptideTable`]
    pub fn id(&self) -> PeptideId {
        self.id
    }

    /// Neutral monoisotopic mass (residues + water)
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Residues in N- to C-terminal order
    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    /// Number of residues
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    /// Always false for parsed peptides
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Whether this peptide stems from a decoy sequence
    pub fn is_decoy(&self) -> bool {
        self.decoy
    }

    /// One-letter sequence without modifications
    pub fn base_sequence(&self) -> String {
        self.residues.iter().map(|r| r.base).collect()
    }

    /// Returns true if any residue carries a modification
    pub fn is_modified(&self) -> bool {
        self.residues.iter().any(Residue::is_modified)
    }
}

impl fmt::Display for Peptide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for residue in &self.residues {
            write!(f, "{}", residue)?;
        }
        Ok(())
    }
}
