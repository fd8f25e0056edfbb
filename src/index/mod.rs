//! # Fragment Mass Index
//!
//! The index maps theoretical fragment masses to the peptides that produce
//! them. It is built once per search by [`IndexBuilder`], frozen, and then
//! queried read-only (typically once per spectrum peak) from any number of
//! threads.
//!
//! ## Storage
//!
//! Fragments are stored as `(mass, peptide id)` pairs in a set of partitions,
//! one per peptide-mass bucket of the build. Every partition is a
//! [`QuantizedStore`]: masses are kept as fixed-point `u32` keys. Duplicate
//! pairs are preserved, because the number of peptides sharing a fragment
//! mass is the scoring signal.
//!
//! ## Queries
//!
//! All query windows are closed intervals computed by the index's fragment
//! [`Tolerance`]. Query masses that are zero, negative or not finite yield
//! empty results. For every valid input
//! `count_in_range(m, r) == query_range(m, r).len()`.
//!
//! ```rust
//! use xlfrag::index::FragmentMassIndex;
//! use xlfrag::peptide::PeptideId;
//! use xlfrag::tolerance::Tolerance;
//!
//! let index = FragmentMassIndex::from_pairs(
//!     [(500.0, PeptideId(1)), (500.004, PeptideId(2)), (800.0, PeptideId(3))],
//!     Tolerance::ppm(10.0),
//!     100_000.0,
//! );
//! assert_eq!(index.fragment_count(), 3);
//! assert_eq!(index.query_range(500.0, 500.0), vec![PeptideId(1), PeptideId(2)]);
//! assert_eq!(index.count_in_range(800.0, 800.0), 1);
//! ```

mod builder;
mod error;
mod stats;
mod store;


use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::config::SearchConfig;
use crate::peptide::{Peptide, PeptideId, PeptideTable};
use crate::tolerance::{MassRange, Tolerance};

pub use builder::IndexBuilder;
pub use error::BuildError;
pub use stats::{BuildReport, IndexStats};
pub use store::{FragmentStore, QuantizedStore};

/// Tolerance-aware lookup from fragment mass to peptide ids.
#[derive(Debug, Clone)]
pub struct FragmentMassIndex {
    partitions: Vec<QuantizedStore>,
    tolerance: Tolerance,
    scale: f64,
    fragment_count: usize,
    dropped: usize,
}

impl FragmentMassIndex {
    /// An empty, unfrozen index with `partitions` partitions
    pub fn new(tolerance: Tolerance, scale: f64, partitions: usize) -> Self {
        Self {
            partitions: (0..partitions.max(1)).map(|_| QuantizedStore::new(scale)).collect(),
            tolerance,
            scale,
            fragment_count: 0,
            dropped: 0,
        }
    }

    /// An empty index using the tolerance and scale of `config`, single partition
    pub fn for_config(config: &SearchConfig) -> Self {
        Self::new(config.fragment_tolerance, config.quantization_scale, 1)
    }

    /// Build a frozen single-partition index from raw `(mass, id)` pairs
    pub fn from_pairs<I>(pairs: I, tolerance: Tolerance, scale: f64) -> Self
    where
        I: IntoIterator<Item = (f64, PeptideId)>,
    {
        let mut index = Self::new(tolerance, scale, 1);
        for (mass, id) in pairs {
            index.insert(mass, id);
        }
        index.freeze();
        index
    }

    /// Assemble an index from partitions that were filled independently
    pub(crate) fn from_partitions(
        partitions: Vec<QuantizedStore>,
        tolerance: Tolerance,
        scale: f64,
        dropped: usize,
    ) -> Self {
        let fragment_count = partitions.iter().map(|p| p.len()).sum();
        let mut index = Self {
            partitions,
            tolerance,
            scale,
            fragment_count,
            dropped,
        };
        if index.partitions.is_empty() {
            index.partitions.push(QuantizedStore::new(scale));
        }
        index
    }

    /// Append a pair to the first partition.
    ///
    /// Masses that are not positive, not finite or above
    /// [`max_representable_mass`](Self::max_representable_mass) are dropped
    /// and `false` is returned. Inserting unfreezes the index.
    pub fn insert(&mut self, mass: f64, id: PeptideId) -> bool {
        self.insert_into(0, mass, id)
    }

    /// Append a pair to a specific partition.
    ///
    /// `partition` must be below `partitions().len()`. Debug builds panic on
    /// an out-of-range index; release builds clamp it to the last partition.
    pub fn insert_into(&mut self, partition: usize, mass: f64, id: PeptideId) -> bool {
        let last = self.partitions.len() - 1;
        debug_assert!(
            partition <= last,
            "partition {} out of range ({} partitions)",
            partition,
            self.partitions.len()
        );
        let inserted = self.partitions[partition.min(last)].insert(mass, id);
        if inserted {
            self.fragment_count += 1;
        } else {
            self.dropped += 1;
        }
        inserted
    }

    /// Sort every partition and release slack capacity. Idempotent.
    pub fn freeze(&mut self) {
        for partition in &mut self.partitions {
            partition.freeze();
        }
    }

    /// Whether all partitions are frozen
    pub fn is_frozen(&self) -> bool {
        self.partitions.iter().all(|p| p.is_frozen())
    }

    /// Number of stored (mass, id) pairs; the scoring denominator
    #[inline]
    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }

    /// Number of fragments rejected on insertion
    pub fn dropped_fragments(&self) -> usize {
        self.dropped
    }

    /// Returns true if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.fragment_count == 0
    }

    /// Tolerance used for all mass queries
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Fixed-point scale of the stored masses
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Largest fragment mass the index can hold
    pub fn max_representable_mass(&self) -> f64 {
        u32::MAX as f64 / self.scale
    }

    /// The partitions of the index
    pub fn partitions(&self) -> &[QuantizedStore] {
        &self.partitions
    }

    /// The mass a fragment of `mass` is stored as, `None` if it would be dropped
    pub fn stored_mass(&self, mass: f64) -> Option<f64> {
        let store = &self.partitions[0];
        store.quantize(mass).map(|k| store.dequantize(k))
    }

    fn window(&self, mass: f64, reference: f64) -> Option<MassRange> {
        if !(mass.is_finite() && mass > 0.0) {
            return None;
        }
        let range = self.tolerance.range_with_reference(mass, reference);
        if range.is_empty() {
            None
        } else {
            Some(range)
        }
    }

    /// Ids of all pairs whose stored mass lies in `range` (bounds inclusive)
    pub fn ids_in_window(&self, range: MassRange) -> Vec<PeptideId> {
        let mut ids = Vec::new();
        for partition in &self.partitions {
            partition.for_each_in_range(range, |_, id| ids.push(id));
        }
        ids
    }

    /// Number of pairs whose stored mass lies in `range`
    pub fn count_in_window(&self, range: MassRange) -> usize {
        self.partitions
            .iter()
            .map(|p| p.count_in_range(range))
            .sum()
    }

    /// Ids of all fragments matching `mass`, the tolerance window sized by
    /// `reference`. One id per matching pair.
    pub fn query_range(&self, mass: f64, reference: f64) -> Vec<PeptideId> {
        match self.window(mass, reference) {
            Some(range) => self.ids_in_window(range),
            None => Vec::new(),
        }
    }

    /// Number of fragments matching `mass`; always equals
    /// `query_range(mass, reference).len()`
    pub fn count_in_range(&self, mass: f64, reference: f64) -> usize {
        match self.window(mass, reference) {
            Some(range) => self.count_in_window(range),
            None => 0,
        }
    }

    /// Peptides with a fragment matching `mass` whose total mass does not
    /// exceed `max_peptide_mass`
    pub fn peptides_in_range<'p>(
        &self,
        mass: f64,
        reference: f64,
        max_peptide_mass: f64,
        peptides: &'p PeptideTable,
    ) -> Vec<&'p Peptide> {
        self.query_range(mass, reference)
            .into_iter()
            .filter_map(|id| peptides.get(id))
            .filter(|p| p.mass() <= max_peptide_mass)
            .collect()
    }

    /// Like [`peptides_in_range`](Self::peptides_in_range), but a peak
    /// matching more than `max_candidates` fragments (before the mass filter)
    /// yields no peptides at all.
    pub fn capped_peptides_in_range<'p>(
        &self,
        mass: f64,
        reference: f64,
        max_peptide_mass: f64,
        max_candidates: Option<usize>,
        peptides: &'p PeptideTable,
    ) -> Vec<&'p Peptide> {
        if let Some(cap) = max_candidates {
            if self.count_in_range(mass, reference) > cap {
                return Vec::new();
            }
        }
        self.peptides_in_range(mass, reference, max_peptide_mass, peptides)
    }

    /// Ids matching `mass` with the window sized by `mass` itself
    pub fn peptide_ids_for_mass(&self, mass: f64) -> Vec<PeptideId> {
        self.query_range(mass, mass)
    }

    /// Number of fragments matching `mass` with the window sized by `mass` itself
    pub fn count_peptides(&self, mass: f64) -> usize {
        self.count_in_range(mass, mass)
    }

    /// Ids stored under exactly the quantized `mass`, ignoring the tolerance
    pub fn exact_peptide_ids(&self, mass: f64) -> Vec<PeptideId> {
        let Some(key) = self.partitions[0].quantize(mass) else {
            return Vec::new();
        };
        self.partitions
            .iter()
            .flat_map(|p| p.ids_for_key(key))
            .collect()
    }

    /// All stored keys and ids sorted by key, then id
    fn sorted_pairs(&self) -> Vec<(u32, u32)> {
        let mut pairs: Vec<(u32, u32)> = Vec::with_capacity(self.fragment_count);
        for partition in &self.partitions {
            pairs.extend(partition.raw_pairs());
        }
        pairs.sort_unstable();
        pairs
    }

    /// Summary statistics of the stored pairs
    pub fn stats(&self) -> IndexStats {
        let pairs = self.sorted_pairs();
        let mut distinct_masses = 0;
        let mut min_per_mass = usize::MAX;
        let mut max_per_mass = 0;

        let mut i = 0;
        while i < pairs.len() {
            let key = pairs[i].0;
            let run = pairs[i..].iter().take_while(|(k, _)| *k == key).count();
            distinct_masses += 1;
            min_per_mass = min_per_mass.min(run);
            max_per_mass = max_per_mass.max(run);
            i += run;
        }

        IndexStats {
            fragments: self.fragment_count,
            distinct_masses,
            min_peptides_per_mass: if distinct_masses == 0 { 0 } else { min_per_mass },
            max_peptides_per_mass: max_per_mass,
            partition_sizes: self.partitions.iter().map(|p| p.len()).collect(),
            dropped_fragments: self.dropped,
            scale: self.scale,
        }
    }

    /// Write every pair as `mass<TAB>peptide id`, one per line, sorted by
    /// mass and then by peptide id
    pub fn dump<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let decimals = self.scale.log10().ceil().max(0.0) as usize;
        for (key, id) in self.sorted_pairs() {
            writeln!(writer, "{:.*}\t{}", decimals, key as f64 / self.scale, id)?;
        }
        writer.flush()
    }

    /// [`dump`](Self::dump) into a file
    pub fn dump_to_path(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.dump(&mut writer)
    }
}
