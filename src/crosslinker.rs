//! Crosslinker definitions.

use std::fmt;

use crate::chemistry::Residue;
use crate::peptide::Peptide;

/// A chemical crosslinker joining two peptides at specific residues.
#[derive(Debug, Clone, PartialEq)]
pub struct Crosslinker {
    name: String,
    crosslinked_mass: f64,
    linked_residues: Vec<char>,
}

impl Crosslinker {
    /// Create a crosslinker that links the given residue codes (e.g. `['K']`).
    pub fn new(name: impl Into<String>, crosslinked_mass: f64, linked_residues: impl IntoIterator<Item = char>) -> Self {
        let mut linked_residues: Vec<char> = linked_residues.into_iter().collect();
        linked_residues.sort_unstable();
        linked_residues.dedup();
        Self {
            name: name.into(),
            crosslinked_mass,
            linked_residues,
        }
    }

    /// Name of the crosslinker, e.g. `BS3`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mass added to the precursor by the crosslink
    pub fn crosslinked_mass(&self) -> f64 {
        self.crosslinked_mass
    }

    /// One-letter codes of the residues this crosslinker reacts with
    pub fn linked_residues(&self) -> &[char] {
        &self.linked_residues
    }

    /// Whether the crosslinker can attach to `residue` (modifications ignored)
    pub fn can_link(&self, residue: &Residue) -> bool {
        self.linked_residues.binary_search(&residue.base).is_ok()
    }

    /// Whether `peptide` contains at least one linkable residue
    pub fn links(&self, peptide: &Peptide) -> bool {
        self.links_any(peptide.residues())
    }

    /// Whether any residue of `residues` is linkable
    pub fn links_any(&self, residues: &[Residue]) -> bool {
        residues.iter().any(|r| self.can_link(r))
    }
}

impl fmt::Display for Crosslinker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:+.6} Da, ", self.name, self.crosslinked_mass)?;
        for (i, residue) in self.linked_residues.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", residue)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::ResidueTable;

    #[test]
    fn test_can_link() {
        let table = ResidueTable::standard();
        let bs3 = Crosslinker::new("BS3", 138.06808, ['K', 'S', 'K']);
        assert_eq!(bs3.linked_residues(), &['K', 'S']);
        assert!(bs3.links(&Peptide::parse("PEPKR", &table).unwrap()));
        assert!(!bs3.links(&Peptide::parse("PEPR", &table).unwrap()));
    }

    #[test]
    fn test_modified_residue_still_links() {
        let mut table = ResidueTable::standard();
        table.add_modification("me", 'K', 14.01565);
        let bs3 = Crosslinker::new("BS3", 138.06808, ['K']);
        assert!(bs3.links(&Peptide::parse("PEKmeR", &table).unwrap()));
    }

    #[test]
    fn test_display() {
        let bs3 = Crosslinker::new("BS3", 138.06808, ['K', 'S']);
        assert_eq!(bs3.to_string(), "BS3 (+138.068080 Da, K,S)");
    }
}
