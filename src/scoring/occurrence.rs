use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Copy)]
struct Entry {
    score: f64,
    count: usize,
}

/// Scores accumulated per key by repeated multiplication or addition.
///
/// A key that was never seen has no score; the first `multiply` or `add`
/// stores the given value as is (an implicit 1.0 or 0.0 start respectively).
#[derive(Debug, Clone)]
pub struct OccurrenceScores<K> {
    entries: HashMap<K, Entry>,
}

impl<K> Default for OccurrenceScores<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Ord + Clone> OccurrenceScores<K> {
    /// An empty score table
    pub fn new() -> Self {
        Self::default()
    }

    /// Multiply the score of `key` by `factor`; returns the new score
    pub fn multiply(&mut self, key: K, factor: f64) -> f64 {
        let entry = self
            .entries
            .entry(key)
            .and_modify(|e| e.score *= factor)
            .or_insert(Entry {
                score: factor,
                count: 0,
            });
        entry.count += 1;
        entry.score
    }

    /// Add `value` to the score of `key`; returns the new score
    pub fn add(&mut self, key: K, value: f64) -> f64 {
        let entry = self
            .entries
            .entry(key)
            .and_modify(|e| e.score += value)
            .or_insert(Entry {
                score: value,
                count: 0,
            });
        entry.count += 1;
        entry.score
    }

    /// Score of `key`, or `default` if it was never seen
    pub fn score(&self, key: &K, default: f64) -> f64 {
        self.entries.get(key).map_or(default, |e| e.score)
    }

    /// How often `key` was scored
    pub fn count(&self, key: &K) -> usize {
        self.entries.get(key).map_or(0, |e| e.count)
    }

    /// Whether `key` was scored at least once
    pub fn seen(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of scored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was scored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scored keys in arbitrary order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// All `(key, score)` pairs ascending by score, ties by key
    pub fn sorted(&self) -> Vec<(K, f64)> {
        let mut out: Vec<(K, f64)> = self
            .entries
            .iter()
            .map(|(k, e)| (k.clone(), e.score))
            .collect();
        out.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        out
    }

    /// Keys holding the `ranks` lowest distinct scores, ascending.
    ///
    /// Whole score groups are added while the total stays within `max_total`
    /// (`None` = no limit); the first group that would exceed it stops the
    /// collection.
    pub fn lowest_n_entries(&self, ranks: usize, max_total: Option<usize>) -> Vec<K> {
        Self::take_groups(self.sorted(), ranks, max_total)
    }

    /// Keys holding the `ranks` highest distinct scores, descending
    pub fn highest_n_entries(&self, ranks: usize, max_total: Option<usize>) -> Vec<K> {
        let mut sorted = self.sorted();
        sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Self::take_groups(sorted, ranks, max_total)
    }

    fn take_groups(sorted: Vec<(K, f64)>, ranks: usize, max_total: Option<usize>) -> Vec<K> {
        let mut out = Vec::new();
        let mut groups = 0;
        let mut i = 0;
        while i < sorted.len() && groups < ranks {
            let score = sorted[i].1;
            let len = sorted[i..]
                .iter()
                .take_while(|(_, s)| s.total_cmp(&score).is_eq())
                .count();
            if max_total.is_some_and(|max| out.len() + len > max) {
                break;
            }
            out.extend(sorted[i..i + len].iter().map(|(k, _)| k.clone()));
            groups += 1;
            i += len;
        }
        out
    }
}
