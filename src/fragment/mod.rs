//! # Fragment Generation
//!
//! Fragments are transient: they are produced per peptide during the index
//! build, their masses are inserted as `(mass, peptide id)` pairs and the
//! fragment objects are discarded.
//!
//! All fragment masses are singly protonated:
//!
//! - b ions cover residues `0..i` for `i` in `1..n`
//! - y ions cover residues `i..n` for `i` in `1..n` and carry a water
//! - the precursor ion covers the whole peptide plus water
//!
//! For every configured [`Crosslinker`] each primary fragment containing a
//! linkable residue additionally yields a crosslinker-modified fragment
//! (primary mass plus the crosslinked mass).

mod error;

#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chemistry::{PROTON_MASS, WATER_MASS};
use crate::crosslinker::Crosslinker;
use crate::peptide::Peptide;

pub use error::FragmentError;

/// The ion type a fragment was produced as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentKind {
    /// N-terminal fragment
    B,
    /// C-terminal fragment
    Y,
    /// The whole peptide
    Precursor,
    /// A primary fragment carrying the crosslinker
    CrosslinkerModified,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FragmentKind::B => "b",
            FragmentKind::Y => "y",
            FragmentKind::Precursor => "precursor",
            FragmentKind::CrosslinkerModified => "crosslinker-modified",
        };
        f.write_str(name)
    }
}

/// Ion types that can be selected for fragmentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IonType {
    /// b ions
    B,
    /// y ions
    Y,
    /// precursor ion
    Precursor,
}

impl IonType {
    /// All supported ion types
    pub const ALL: [IonType; 3] = [IonType::B, IonType::Y, IonType::Precursor];
}

impl FromStr for IonType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "b" => Ok(IonType::B),
            "y" => Ok(IonType::Y),
            "precursor" | "p" => Ok(IonType::Precursor),
            other => Err(other.to_string()),
        }
    }
}

/// A single theoretical fragment ion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    /// Singly protonated mass
    pub mass: f64,
    /// Ion type
    pub kind: FragmentKind,
    /// Index of the first residue covered
    pub start: usize,
    /// Number of residues covered
    pub length: usize,
}

impl Fragment {
    /// Index one past the last residue covered
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Produces the fragments inserted into the index for a peptide.
///
/// Implementations are shared between build workers.
pub trait FragmentProducer: Send + Sync {
    /// All fragments of `peptide`
    fn fragments(&self, peptide: &Peptide) -> Result<Vec<Fragment>, FragmentError>;
}

/// The default producer: b, y and precursor ions plus crosslinker-modified
/// variants.
#[derive(Debug, Clone)]
pub struct PrimaryFragments {
    ion_types: Vec<IonType>,
    crosslinkers: Vec<Crosslinker>,
}

impl Default for PrimaryFragments {
    fn default() -> Self {
        Self::new(IonType::ALL, Vec::new())
    }
}

impl PrimaryFragments {
    /// Create a producer for the given ion types and crosslinkers
    pub fn new(ion_types: impl IntoIterator<Item = IonType>, crosslinkers: Vec<Crosslinker>) -> Self {
        let mut unique = Vec::new();
        for ion in ion_types {
            if !unique.contains(&ion) {
                unique.push(ion);
            }
        }
        let ion_types = unique;
        Self {
            ion_types,
            crosslinkers,
        }
    }

    /// Configured ion types
    pub fn ion_types(&self) -> &[IonType] {
        &self.ion_types
    }

    /// Configured crosslinkers
    pub fn crosslinkers(&self) -> &[Crosslinker] {
        &self.crosslinkers
    }

    fn wants(&self, ion: IonType) -> bool {
        self.ion_types.contains(&ion)
    }

    fn primary(&self, peptide: &Peptide) -> Vec<Fragment> {
        let residues = peptide.residues();
        let n = residues.len();
        let mut out = Vec::with_capacity(2 * n + 1);

        if self.wants(IonType::B) {
            let mut mass = PROTON_MASS;
            for (i, residue) in residues.iter().enumerate().take(n.saturating_sub(1)) {
                mass += residue.mass;
                out.push(Fragment {
                    mass,
                    kind: FragmentKind::B,
                    start: 0,
                    length: i + 1,
                });
            }
        }

        if self.wants(IonType::Y) {
            let mut mass = PROTON_MASS + WATER_MASS;
            for i in (1..n).rev() {
                mass += residues[i].mass;
                out.push(Fragment {
                    mass,
                    kind: FragmentKind::Y,
                    start: i,
                    length: n - i,
                });
            }
        }

        if self.wants(IonType::Precursor) {
            out.push(Fragment {
                mass: peptide.mass() + PROTON_MASS,
                kind: FragmentKind::Precursor,
                start: 0,
                length: n,
            });
        }

        out
    }
}

impl FragmentProducer for PrimaryFragments {
    fn fragments(&self, peptide: &Peptide) -> Result<Vec<Fragment>, FragmentError> {
        if peptide.is_empty() {
            return Err(FragmentError::EmptyPeptide(peptide.id()));
        }

        let mut fragments = self.primary(peptide);
        let primary_count = fragments.len();
        let residues = peptide.residues();

        for crosslinker in &self.crosslinkers {
            for i in 0..primary_count {
                let f = fragments[i];
                if crosslinker.links_any(&residues[f.start..f.end()]) {
                    fragments.push(Fragment {
                        mass: f.mass + crosslinker.crosslinked_mass(),
                        kind: FragmentKind::CrosslinkerModified,
                        ..f
                    });
                }
            }
        }

        if let Some(bad) = fragments.iter().find(|f| !f.mass.is_finite()) {
            return Err(FragmentError::NonFiniteMass {
                peptide: peptide.id(),
                kind: bad.kind,
            });
        }

        Ok(fragments)
    }
}
