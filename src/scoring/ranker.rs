use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::chemistry::MINIMUM_RESIDUE_MASS;
use crate::config::SearchConfig;
use crate::crosslinker::Crosslinker;
use crate::index::FragmentMassIndex;
use crate::peptide::{Peptide, PeptideId, PeptideTable};
use crate::spectrum::Spectrum;

use super::OccurrenceScores;

/// Score of a peptide that contributed no evidence
pub const NEVER_MATCHED: f64 = 1.0;

/// A peptide with its accumulated occurrence score (lower is better)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate<'a> {
    /// The candidate peptide
    pub peptide: &'a Peptide,
    /// Product of the peak scores of all matched peaks
    pub score: f64,
}

/// A scored candidate with its rank; modification variants of one base
/// sequence share a rank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCandidate<'a> {
    /// The candidate peptide
    pub peptide: &'a Peptide,
    /// Accumulated occurrence score
    pub score: f64,
    /// 1-based rank
    pub rank: usize,
}

/// An alpha/beta peptide pair joined by a crosslinker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidatePair<'a> {
    /// Peptide found through fragment matches
    pub alpha: &'a Peptide,
    /// Peptide found through the remaining precursor mass
    pub beta: &'a Peptide,
    /// Crosslinker joining the two
    pub crosslinker: &'a Crosslinker,
    /// Occurrence score of the alpha candidate
    pub alpha_score: f64,
    /// Rank of the alpha candidate
    pub alpha_rank: usize,
    /// Number of beta peptides found for this alpha and crosslinker
    pub beta_count: usize,
}

/// Turns spectrum peaks into ranked candidate peptides using a frozen
/// [`FragmentMassIndex`].
///
/// The ranker only reads shared data and can be used from several threads
/// at once.
#[derive(Debug, Clone, Copy)]
pub struct CandidateRanker<'a> {
    index: &'a FragmentMassIndex,
    peptides: &'a PeptideTable,
    config: &'a SearchConfig,
}

impl<'a> CandidateRanker<'a> {
    /// Create a ranker over `index`, resolving ids against `peptides`
    pub fn new(index: &'a FragmentMassIndex, peptides: &'a PeptideTable, config: &'a SearchConfig) -> Self {
        Self {
            index,
            peptides,
            config,
        }
    }

    /// Multiply the peak score of every matched peak into each matching
    /// peptide's score.
    ///
    /// Each peak collects the peptides matching the peak itself (subject to
    /// `max_candidates_per_peak`) plus those matching `peak.mz - delta` for
    /// every configured delta mass, with the window sized by the observed
    /// peak. Delta matches are not capped. The peak score is the size of the
    /// combined list divided by the total number of fragments in the index,
    /// and is multiplied into every entry of that list.
    pub fn alpha_scores(&self, spectrum: &Spectrum, max_peptide_mass: f64) -> OccurrenceScores<PeptideId> {
        let mut scores = OccurrenceScores::new();
        let fragment_count = self.index.fragment_count();
        if fragment_count == 0 || spectrum.is_empty() {
            return scores;
        }
        let total = fragment_count as f64;
        let cap = self.config.max_candidates_per_peak;

        for peak in spectrum.peaks() {
            let mut matched =
                self.index
                    .capped_peptides_in_range(peak.mz, peak.mz, max_peptide_mass, cap, self.peptides);
            for &delta in &self.config.alpha_candidate_delta_masses {
                matched.extend(
                    self.index
                        .peptides_in_range(peak.mz - delta, peak.mz, max_peptide_mass, self.peptides),
                );
            }
            if matched.is_empty() {
                continue;
            }
            let peak_score = matched.len() as f64 / total;
            for peptide in matched {
                scores.multiply(peptide.id(), peak_score);
            }
        }
        scores
    }

    /// Candidates sorted ascending by score (best first).
    ///
    /// Peptides left at [`NEVER_MATCHED`] carry no signal and are dropped.
    pub fn alpha_candidates(&self, spectrum: &Spectrum, max_peptide_mass: f64) -> Vec<ScoredCandidate<'a>> {
        self.alpha_scores(spectrum, max_peptide_mass)
            .sorted()
            .into_iter()
            .filter(|&(_, score)| score < NEVER_MATCHED)
            .filter_map(|(id, score)| self.peptides.get(id).map(|peptide| ScoredCandidate { peptide, score }))
            .collect()
    }

    /// [`alpha_candidates`](Self::alpha_candidates) bounded by the upper end
    /// of the precursor tolerance window
    pub fn alpha_candidates_for_precursor(&self, spectrum: &Spectrum) -> Vec<ScoredCandidate<'a>> {
        let max_peptide_mass = self
            .config
            .precursor_tolerance
            .max_range(spectrum.precursor_mass());
        self.alpha_candidates(spectrum, max_peptide_mass)
    }

    /// Assign ranks to score-sorted candidates.
    ///
    /// A base sequence keeps the rank it was first seen with. A base sequence
    /// seen for the first time opens a new rank only if its score differs
    /// from the previous new one. Candidates ranked worse than `max_ranks`
    /// are left out.
    pub fn rank_alpha_candidates(
        &self,
        candidates: &[ScoredCandidate<'a>],
        max_ranks: Option<usize>,
    ) -> Vec<RankedCandidate<'a>> {
        let mut ranks_by_sequence: HashMap<String, usize> = HashMap::new();
        let mut last_score: Option<f64> = None;
        let mut rank_count = 0;
        let mut out = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let rank = *ranks_by_sequence
                .entry(candidate.peptide.base_sequence())
                .or_insert_with(|| {
                    if last_score != Some(candidate.score) {
                        rank_count += 1;
                        last_score = Some(candidate.score);
                    }
                    rank_count
                });
            if max_ranks.is_some_and(|max| rank > max) {
                continue;
            }
            out.push(RankedCandidate {
                peptide: candidate.peptide,
                score: candidate.score,
                rank,
            });
        }
        out
    }

    /// Whether `alpha` alone explains the precursor mass
    pub fn is_linear(&self, alpha: &Peptide, spectrum: &Spectrum) -> bool {
        self.config
            .precursor_tolerance
            .compare(alpha.mass(), spectrum.precursor_mass())
            == Ordering::Equal
    }

    /// Beta peptides completing `alpha` to the precursor mass through
    /// `crosslinker`; both peptides must be linkable.
    pub fn beta_candidates(
        &self,
        alpha: &Peptide,
        crosslinker: &Crosslinker,
        spectrum: &Spectrum,
    ) -> Vec<&'a Peptide> {
        let precursor = spectrum.precursor_mass();
        let beta_mass = precursor - alpha.mass() - crosslinker.crosslinked_mass();
        if beta_mass <= MINIMUM_RESIDUE_MASS || !crosslinker.links(alpha) {
            return Vec::new();
        }
        self.peptides
            .peptides_for_mass(beta_mass, precursor, &self.config.precursor_tolerance)
            .filter(|beta| crosslinker.links(beta))
            .collect()
    }

    /// Crosslinked pairs for every non-linear ranked alpha candidate.
    ///
    /// Each unordered pair of peptides is reported once per crosslinker, in
    /// the order the alpha candidates are given.
    pub fn candidate_pairs(&self, ranked: &[RankedCandidate<'a>], spectrum: &Spectrum) -> Vec<CandidatePair<'a>> {
        let mut seen: HashSet<(PeptideId, PeptideId, usize)> = HashSet::new();
        let mut pairs = Vec::new();

        for alpha in ranked {
            if self.is_linear(alpha.peptide, spectrum) {
                continue;
            }
            for (xl_index, crosslinker) in self.config.crosslinkers.iter().enumerate() {
                let betas = self.beta_candidates(alpha.peptide, crosslinker, spectrum);
                let beta_count = betas.len();
                for beta in betas {
                    let a = alpha.peptide.id();
                    let b = beta.id();
                    let key = if a <= b { (a, b, xl_index) } else { (b, a, xl_index) };
                    if !seen.insert(key) {
                        continue;
                    }
                    pairs.push(CandidatePair {
                        alpha: alpha.peptide,
                        beta,
                        crosslinker,
                        alpha_score: alpha.score,
                        alpha_rank: alpha.rank,
                        beta_count,
                    });
                }
            }
        }
        pairs
    }

    /// Peptides that match the precursor mass on their own
    pub fn linear_candidates(&self, spectrum: &Spectrum) -> Vec<&'a Peptide> {
        let precursor = spectrum.precursor_mass();
        self.peptides
            .peptides_for_mass(precursor, precursor, &self.config.precursor_tolerance)
            .collect()
    }
}
