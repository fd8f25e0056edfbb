//! Masses of the building blocks used to compute peptide and fragment masses.
//!
//! All values are monoisotopic and in Dalton. Residue masses live in a
//! [`ResidueTable`] that the caller constructs (usually from the search
//! configuration) and passes to whatever needs to resolve sequences.

mod residues;

pub use residues::{Residue, ResidueTable, STANDARD_RESIDUES};

/// Mass of a single proton (H+)
pub const PROTON_MASS: f64 = 1.00727646677;

/// Mass of H2O
pub const WATER_MASS: f64 = 18.01056027;

/// Mass of a hydrogen atom
pub const HYDROGEN_MASS: f64 = 1.007825035;

/// Mass of NH3
pub const AMMONIA_MASS: f64 = 17.02654493;

/// Mass of an oxygen atom
pub const OXYGEN_MASS: f64 = 15.99491;

/// Mass difference between C13 and C12
pub const C13_MASS_DIFFERENCE: f64 = 1.00335;

/// One part per million
pub const ONE_PPM: f64 = 0.000001;

/// Smallest standard residue mass (glycine); lighter gaps can not hold a peptide
pub const MINIMUM_RESIDUE_MASS: f64 = 57.021464;
