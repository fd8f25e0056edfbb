use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Monoisotopic residue masses of the standard amino acids (plus selenocysteine
/// and pyrrolysine).
pub const STANDARD_RESIDUES: [(char, f64); 22] = [
    ('A', 71.037114),
    ('C', 103.009184),
    ('D', 115.026943),
    ('E', 129.042593),
    ('F', 147.068414),
    ('G', 57.021464),
    ('H', 137.058912),
    ('I', 113.084064),
    ('K', 128.094963),
    ('L', 113.084064),
    ('M', 131.040485),
    ('N', 114.042927),
    ('P', 97.052764),
    ('Q', 128.058578),
    ('R', 156.101111),
    ('S', 87.032028),
    ('T', 101.047678),
    ('V', 99.068414),
    ('W', 186.079313),
    ('Y', 163.063329),
    ('U', 168.053),
    ('O', 255.31),
];

/// A single (possibly modified) residue of a peptide.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    /// One-letter code of the unmodified amino acid
    pub base: char,
    /// Name of the modification, e.g. `ox` for `Mox`
    pub modification: Option<Arc<str>>,
    /// Residue mass including the modification
    pub mass: f64,
}

impl Residue {
    /// An unmodified residue
    pub fn new(base: char, mass: f64) -> Self {
        Self {
            base,
            modification: None,
            mass,
        }
    }

    /// Returns true if the residue carries a modification
    pub fn is_modified(&self) -> bool {
        self.modification.is_some()
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.modification {
            Some(m) => write!(f, "{}{}", self.base, m),
            None => write!(f, "{}", self.base),
        }
    }
}

/// Lookup from residue symbol (`K`, `Mox`, ...) to [`Residue`].
///
/// There is no process-wide registry: every search builds its own table and
/// hands it to the sequence parser.
#[derive(Debug, Clone)]
pub struct ResidueTable {
    residues: HashMap<String, Residue>,
}

impl Default for ResidueTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ResidueTable {
    /// A table without any residues
    pub fn empty() -> Self {
        Self {
            residues: HashMap::new(),
        }
    }

    /// The standard amino acids
    pub fn standard() -> Self {
        let residues = STANDARD_RESIDUES
            .iter()
            .map(|&(code, mass)| (code.to_string(), Residue::new(code, mass)))
            .collect();
        Self { residues }
    }

    /// Register a modified residue named `<base><name>` (e.g. `Mox`) whose
    /// mass is the base residue's mass plus `mass_delta`.
    ///
    /// Returns `None` if `base` is not a known unmodified residue.
    pub fn add_modification(&mut self, name: &str, base: char, mass_delta: f64) -> Option<&Residue> {
        let base_mass = self.residues.get(base.to_string().as_str())?.mass;
        let residue = Residue {
            base,
            modification: Some(Arc::from(name)),
            mass: base_mass + mass_delta,
        };
        let symbol = residue.to_string();
        self.residues.insert(symbol.clone(), residue);
        self.residues.get(&symbol)
    }

    /// Register an unmodified residue, replacing any residue with the same code
    pub fn insert(&mut self, base: char, mass: f64) {
        self.residues.insert(base.to_string(), Residue::new(base, mass));
    }

    /// Resolve a symbol such as `K` or `Mox`
    pub fn get(&self, symbol: &str) -> Option<&Residue> {
        self.residues.get(symbol)
    }

    /// Number of known residues (modified variants included)
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    /// Returns true if no residues are known
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Smallest residue mass in the table
    pub fn minimum_mass(&self) -> Option<f64> {
        self.residues
            .values()
            .map(|r| r.mass)
            .min_by(|a, b| a.total_cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let table = ResidueTable::standard();
        assert_eq!(table.len(), 22);
        assert_eq!(table.get("K").map(|r| r.mass), Some(128.094963));
        assert_eq!(table.minimum_mass(), Some(57.021464));
    }

    #[test]
    fn test_add_modification() {
        let mut table = ResidueTable::standard();
        let mox = table.add_modification("ox", 'M', 15.99491).cloned().unwrap();
        assert_eq!(mox.to_string(), "Mox");
        assert!(mox.is_modified());
        assert!((mox.mass - (131.040485 + 15.99491)).abs() < 1e-9);
        assert_eq!(table.get("Mox"), Some(&mox));
    }

    #[test]
    fn test_add_modification_unknown_base() {
        let mut table = ResidueTable::standard();
        assert!(table.add_modification("ox", 'J', 15.99491).is_none());
    }
}
