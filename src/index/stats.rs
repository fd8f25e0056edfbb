use std::fmt;
use std::time::Duration;

/// Summary of the contents of a [`FragmentMassIndex`](super::FragmentMassIndex)
#[derive(Debug, Clone, PartialEq)]
pub struct IndexStats {
    /// Number of stored (mass, peptide) pairs
    pub fragments: usize,
    /// Number of distinct quantized masses
    pub distinct_masses: usize,
    /// Fewest peptide ids stored under one mass
    pub min_peptides_per_mass: usize,
    /// Most peptide ids stored under one mass
    pub max_peptides_per_mass: usize,
    /// Pairs per partition
    pub partition_sizes: Vec<usize>,
    /// Fragments rejected because their mass can not be represented
    pub dropped_fragments: usize,
    /// Fixed-point scale of the stored masses
    pub scale: f64,
}

impl IndexStats {
    /// Average number of peptide ids per distinct mass
    pub fn mean_peptides_per_mass(&self) -> f64 {
        if self.distinct_masses == 0 {
            0.0
        } else {
            self.fragments as f64 / self.distinct_masses as f64
        }
    }
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fragments:            {}", self.fragments)?;
        writeln!(f, "Distinct masses:      {}", self.distinct_masses)?;
        writeln!(
            f,
            "Peptides per mass:    min {} / mean {:.2} / max {}",
            self.min_peptides_per_mass,
            self.mean_peptides_per_mass(),
            self.max_peptides_per_mass
        )?;
        writeln!(f, "Partitions:           {}", self.partition_sizes.len())?;
        writeln!(f, "Dropped fragments:    {}", self.dropped_fragments)?;
        write!(f, "Mass resolution:      {} Da", 1.0 / self.scale)
    }
}

/// What happened during an index build
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// Peptides in the input table
    pub peptides_total: usize,
    /// Peptides that were fragmented and indexed
    pub peptides_indexed: usize,
    /// Peptides outside the configured peptide mass window
    pub peptides_skipped: usize,
    /// (mass, peptide) pairs stored
    pub fragments_inserted: usize,
    /// Fragments dropped because their mass can not be represented
    pub fragments_dropped: usize,
    /// Number of partitions built
    pub partitions: usize,
    /// Wall-clock build time
    pub elapsed: Duration,
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Indexed {} of {} peptides ({} fragments, {} dropped) in {} partitions in {:.2}s",
            self.peptides_indexed,
            self.peptides_total,
            self.fragments_inserted,
            self.fragments_dropped,
            self.partitions,
            self.elapsed.as_secs_f64()
        )
    }
}
