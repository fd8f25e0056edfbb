//! Storage backends for fragment masses.

use std::collections::TryReserveError;

use crate::peptide::PeptideId;
use crate::tolerance::MassRange;

/// A single partition of (fragment mass, peptide id) pairs.
///
/// Stores are append-only until [`freeze`](FragmentStore::freeze) is called;
/// range queries return the same pairs before and after freezing.
pub trait FragmentStore: Send + Sync {
    /// Append a pair; returns `false` if the mass can not be represented and
    /// was dropped.
    fn insert(&mut self, mass: f64, id: PeptideId) -> bool;

    /// Make room for `additional` more pairs
    fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError>;

    /// Sort for binary search and release unused capacity
    fn freeze(&mut self);

    /// Whether [`freeze`](FragmentStore::freeze) has been called
    fn is_frozen(&self) -> bool;

    /// Number of stored pairs
    fn len(&self) -> usize;

    /// Returns true if no pairs are stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call `f` for every pair whose stored mass lies in `range`
    fn for_each_in_range<F: FnMut(f64, PeptideId)>(&self, range: MassRange, f: F);

    /// Number of pairs whose stored mass lies in `range`
    fn count_in_range(&self, range: MassRange) -> usize;
}

/// Fixed-point store: masses are kept as `round(mass * scale)` in a `u32`
/// next to the `u32` peptide id, in one vector of `(key, id)` pairs that is
/// sorted in place on freeze.
///
/// The stored mass of a pair is `key / scale`. With the default scale of
/// 100 000 this gives a resolution of 1e-5 Da and a largest representable
/// mass of `u32::MAX / scale` (about 42 949 Da); heavier fragments are
/// dropped on insertion.
#[derive(Debug, Clone)]
pub struct QuantizedStore {
    scale: f64,
    pairs: Vec<(u32, u32)>,
    frozen: bool,
}

impl QuantizedStore {
    /// An empty store with the given fixed-point scale
    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            pairs: Vec::new(),
            frozen: false,
        }
    }

    /// Fixed-point scale
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Largest mass that can be stored
    pub fn max_representable_mass(&self) -> f64 {
        u32::MAX as f64 / self.scale
    }

    /// The key a mass is stored under, `None` if it can not be represented
    #[inline]
    pub fn quantize(&self, mass: f64) -> Option<u32> {
        if !(mass.is_finite() && mass > 0.0) {
            return None;
        }
        let key = (mass * self.scale).round();
        if key > u32::MAX as f64 {
            None
        } else {
            Some(key as u32)
        }
    }

    /// The mass a key represents
    #[inline]
    pub fn dequantize(&self, key: u32) -> f64 {
        key as f64 / self.scale
    }

    /// Stored pairs as `(mass, id)`, in storage order
    pub fn iter(&self) -> impl Iterator<Item = (f64, PeptideId)> + '_ {
        self.pairs
            .iter()
            .map(move |&(k, id)| (self.dequantize(k), PeptideId(id)))
    }

    /// Raw `(key, id)` pairs in storage order
    pub fn raw_pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.pairs.iter().copied()
    }

    /// Ids stored under exactly `key`
    pub fn ids_for_key(&self, key: u32) -> Vec<PeptideId> {
        if self.frozen {
            let start = self.pairs.partition_point(|&(k, _)| k < key);
            let end = self.pairs.partition_point(|&(k, _)| k <= key);
            self.pairs[start..end].iter().map(|&(_, id)| PeptideId(id)).collect()
        } else {
            self.pairs
                .iter()
                .filter(|&&(k, _)| k == key)
                .map(|&(_, id)| PeptideId(id))
                .collect()
        }
    }

    /// Index bounds of the pairs inside `range` in a frozen store
    fn bounds(&self, range: MassRange) -> (usize, usize) {
        let start = self
            .pairs
            .partition_point(|&(k, _)| self.dequantize(k) < range.min);
        let end = self
            .pairs
            .partition_point(|&(k, _)| self.dequantize(k) <= range.max);
        (start, end.max(start))
    }
}

impl FragmentStore for QuantizedStore {
    #[inline]
    fn insert(&mut self, mass: f64, id: PeptideId) -> bool {
        match self.quantize(mass) {
            Some(key) => {
                self.pairs.push((key, id.0));
                self.frozen = false;
                true
            }
            None => false,
        }
    }

    fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.pairs.try_reserve(additional)
    }

    fn freeze(&mut self) {
        if self.frozen {
            return;
        }
        self.pairs.sort_unstable();
        self.pairs.shrink_to_fit();
        self.frozen = true;
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn len(&self) -> usize {
        self.pairs.len()
    }

    fn for_each_in_range<F: FnMut(f64, PeptideId)>(&self, range: MassRange, mut f: F) {
        if range.is_empty() {
            return;
        }
        if self.frozen {
            let (start, end) = self.bounds(range);
            for &(k, id) in &self.pairs[start..end] {
                f(self.dequantize(k), PeptideId(id));
            }
        } else {
            for (mass, id) in self.iter() {
                if range.contains(mass) {
                    f(mass, id);
                }
            }
        }
    }

    fn count_in_range(&self, range: MassRange) -> usize {
        if range.is_empty() {
            return 0;
        }
        if self.frozen {
            let (start, end) = self.bounds(range);
            end - start
        } else {
            self.pairs
                .iter()
                .filter(|&&(k, _)| range.contains(self.dequantize(k)))
                .count()
        }
    }
}
