use crate::tolerance::{MassRange, Tolerance};

use super::{Peptide, PeptideId};

/// Owns all peptides of a search and resolves [`PeptideId`]s.
///
/// Ids are dense, assigned in insertion order and never reused. A second,
/// mass-sorted id list serves precursor-mass lookups (beta candidates).
#[derive(Debug, Clone, Default)]
pub struct PeptideTable {
    peptides: Vec<Peptide>,
    by_mass: Vec<PeptideId>,
}

impl PeptideTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from peptides, assigning ids in iteration order
    pub fn from_peptides<I: IntoIterator<Item = Peptide>>(peptides: I) -> Self {
        let mut table = Self::new();
        table.extend(peptides);
        table
    }

    /// Add a single peptide and return its new id
    pub fn push(&mut self, mut peptide: Peptide) -> PeptideId {
        let id = PeptideId(self.peptides.len() as u32);
        peptide.set_id(id);
        let mass = peptide.mass();
        let pos = self
            .by_mass
            .partition_point(|p| self.peptides[p.index()].mass() <= mass);
        self.peptides.push(peptide);
        self.by_mass.insert(pos, id);
        id
    }

    /// Add many peptides; the mass order is rebuilt once at the end
    pub fn extend<I: IntoIterator<Item = Peptide>>(&mut self, peptides: I) {
        for mut peptide in peptides {
            let id = PeptideId(self.peptides.len() as u32);
            peptide.set_id(id);
            self.peptides.push(peptide);
            self.by_mass.push(id);
        }
        let peptides = &self.peptides;
        self.by_mass
            .sort_by(|a, b| peptides[a.index()].mass().total_cmp(&peptides[b.index()].mass()));
    }

    /// Resolve an id
    #[inline]
    pub fn get(&self, id: PeptideId) -> Option<&Peptide> {
        self.peptides.get(id.index())
    }

    /// Number of peptides
    pub fn len(&self) -> usize {
        self.peptides.len()
    }

    /// Returns true if the table holds no peptides
    pub fn is_empty(&self) -> bool {
        self.peptides.is_empty()
    }

    /// Peptides in id order
    pub fn iter(&self) -> std::slice::Iter<'_, Peptide> {
        self.peptides.iter()
    }

    /// Peptide ids sorted ascending by mass
    pub fn ids_by_mass(&self) -> &[PeptideId] {
        &self.by_mass
    }

    /// Largest peptide mass, `None` for an empty table
    pub fn max_mass(&self) -> Option<f64> {
        self.by_mass.last().map(|id| self.peptides[id.index()].mass())
    }

    /// Smallest peptide mass, `None` for an empty table
    pub fn min_mass(&self) -> Option<f64> {
        self.by_mass.first().map(|id| self.peptides[id.index()].mass())
    }

    /// Ids of all peptides whose mass lies in `range` (bounds inclusive),
    /// ascending by mass.
    pub fn ids_in_mass_range(&self, range: MassRange) -> &[PeptideId] {
        if range.is_empty() {
            return &[];
        }
        let mass_of = |id: &PeptideId| self.peptides[id.index()].mass();
        let start = self.by_mass.partition_point(|id| mass_of(id) < range.min);
        let end = self.by_mass.partition_point(|id| mass_of(id) <= range.max);
        if start >= end {
            return &[];
        }
        &self.by_mass[start..end]
    }

    /// Peptides whose mass lies in `range`, ascending by mass
    pub fn peptides_in_mass_range(&self, range: MassRange) -> impl Iterator<Item = &Peptide> + '_ {
        self.ids_in_mass_range(range)
            .iter()
            .map(move |id| &self.peptides[id.index()])
    }

    /// Peptides matching `mass` under `tolerance`, the window width derived
    /// from `reference`.
    pub fn peptides_for_mass<'a>(
        &'a self,
        mass: f64,
        reference: f64,
        tolerance: &Tolerance,
    ) -> impl Iterator<Item = &'a Peptide> + 'a {
        self.ids_in_mass_range(tolerance.range_with_reference(mass, reference))
            .iter()
            .map(move |id| &self.peptides[id.index()])
    }
}

impl<'a> IntoIterator for &'a PeptideTable {
    type Item = &'a Peptide;
    type IntoIter = std::slice::Iter<'a, Peptide>;

    fn into_iter(self) -> Self::IntoIter {
        self.peptides.iter()
    }
}
