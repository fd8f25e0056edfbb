//! Parallel construction of a [`FragmentMassIndex`].
//!
//! Accepted peptides are sorted by mass and split into contiguous buckets.
//! Every bucket is fragmented by its own rayon task into its own
//! [`QuantizedStore`], which the task freezes before returning. The only
//! state shared between tasks is the abort flag, an atomic progress counter
//! and the status sink.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use log::{debug, error, info, warn};
use rayon::prelude::*;

use super::{BuildError, BuildReport, FragmentMassIndex, FragmentStore, QuantizedStore};
use crate::config::SearchConfig;
use crate::fragment::{FragmentProducer, PrimaryFragments};
use crate::peptide::{PeptideId, PeptideTable};
use crate::status::{AbortFlag, LogStatus, StatusSink};

/// Builds a frozen [`FragmentMassIndex`] from a [`PeptideTable`].
pub struct IndexBuilder<'a, P: FragmentProducer = PrimaryFragments> {
    config: &'a SearchConfig,
    producer: P,
    status: &'a dyn StatusSink,
    abort: AbortFlag,
}

/// Result of building one partition
struct PartitionOutput {
    store: QuantizedStore,
    peptides: usize,
    dropped: usize,
}

/// State shared by all partition workers
struct BuildContext<'a, P> {
    peptides: &'a PeptideTable,
    producer: &'a P,
    status: &'a dyn StatusSink,
    abort: &'a AbortFlag,
    progress: AtomicUsize,
    total: usize,
    scale: f64,
    interval: usize,
}

impl<'a> IndexBuilder<'a, PrimaryFragments> {
    /// A builder using the fragment producer described by `config`
    pub fn new(config: &'a SearchConfig) -> Self {
        Self {
            config,
            producer: config.fragment_producer(),
            status: &LogStatus,
            abort: AbortFlag::new(),
        }
    }
}

impl<'a, P: FragmentProducer> IndexBuilder<'a, P> {
    /// Replace the fragment producer
    pub fn with_producer<Q: FragmentProducer>(self, producer: Q) -> IndexBuilder<'a, Q> {
        IndexBuilder {
            config: self.config,
            producer,
            status: self.status,
            abort: self.abort,
        }
    }

    /// Report progress to `status` instead of the log
    pub fn with_status(mut self, status: &'a dyn StatusSink) -> Self {
        self.status = status;
        self
    }

    /// Use a shared abort flag
    pub fn with_abort_flag(mut self, abort: AbortFlag) -> Self {
        self.abort = abort;
        self
    }

    /// Handle that cancels this build when raised
    pub fn abort_flag(&self) -> AbortFlag {
        self.abort.clone()
    }

    /// Fragment every peptide inside the configured mass window and build a
    /// frozen index.
    ///
    /// Blocks until all partitions are finished. Any fragmentation failure,
    /// allocation failure, worker panic or cancellation aborts the whole
    /// build.
    pub fn build(&self, peptides: &PeptideTable) -> Result<(FragmentMassIndex, BuildReport), BuildError> {
        let start_time = Instant::now();
        self.config.validate()?;

        let selected: Vec<PeptideId> = peptides
            .ids_by_mass()
            .iter()
            .copied()
            .filter(|&id| {
                peptides.get(id).is_some_and(|p| {
                    p.mass() >= self.config.min_peptide_mass && p.mass() <= self.config.max_peptide_mass
                })
            })
            .collect();
        let skipped = peptides.len() - selected.len();
        if skipped > 0 {
            debug!("{} peptides outside the peptide mass window are not indexed", skipped);
        }

        let num_partitions = self.config.effective_partitions().min(selected.len()).max(1);
        let chunk_size = ((selected.len() + num_partitions - 1) / num_partitions).max(1);
        let threads = self.config.effective_threads();

        info!(
            "Building fragment index: {} peptides in {} partitions on {} threads",
            selected.len(),
            num_partitions,
            threads
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("xlfrag-build-{}", i))
            .build()?;

        let ctx = BuildContext {
            peptides,
            producer: &self.producer,
            status: self.status,
            abort: &self.abort,
            progress: AtomicUsize::new(0),
            total: selected.len(),
            scale: self.config.quantization_scale,
            interval: self.config.progress_interval.max(1),
        };

        let results: Vec<Result<PartitionOutput, BuildError>> = pool.install(|| {
            selected
                .par_chunks(chunk_size)
                .enumerate()
                .map(|(partition, bucket)| {
                    panic::catch_unwind(AssertUnwindSafe(|| ctx.build_partition(partition, bucket)))
                        .unwrap_or(Err(BuildError::WorkerPanicked { partition }))
                })
                .collect()
        });

        let processed = ctx.progress.load(Ordering::Acquire);
        let mut stores = Vec::with_capacity(results.len());
        let mut report = BuildReport {
            peptides_total: peptides.len(),
            peptides_skipped: skipped,
            partitions: results.len().max(1),
            ..BuildReport::default()
        };

        for result in results {
            match result {
                Ok(output) => {
                    report.peptides_indexed += output.peptides;
                    report.fragments_inserted += output.store.len();
                    report.fragments_dropped += output.dropped;
                    stores.push(output.store);
                }
                Err(e @ BuildError::Cancelled { .. }) => {
                    warn!("{}", e);
                    return Err(e);
                }
                Err(e) => {
                    error!(
                        "Fragment index build failed after {} of {} peptides: {}",
                        processed,
                        selected.len(),
                        e
                    );
                    return Err(e);
                }
            }
        }

        if self.abort.is_aborted() {
            warn!("Fragment index build cancelled after {} peptides", processed);
            return Err(BuildError::Cancelled {
                peptides_processed: processed,
            });
        }

        if report.fragments_dropped > 0 {
            warn!(
                "{} fragments outside the representable mass range (0, {:.1}] Da were dropped",
                report.fragments_dropped,
                u32::MAX as f64 / self.config.quantization_scale
            );
        }

        let index = FragmentMassIndex::from_partitions(
            stores,
            self.config.fragment_tolerance,
            self.config.quantization_scale,
            report.fragments_dropped,
        );
        report.elapsed = start_time.elapsed();

        self.status.set_status(&format!(
            "Fragment index built: {} fragments from {} peptides",
            report.fragments_inserted, report.peptides_indexed
        ));
        info!("{}", report);

        Ok((index, report))
    }
}

impl<P: FragmentProducer> BuildContext<'_, P> {
    fn build_partition(&self, partition: usize, bucket: &[PeptideId]) -> Result<PartitionOutput, BuildError> {
        let mut store = QuantizedStore::new(self.scale);
        let mut dropped = 0;

        for (n, &id) in bucket.iter().enumerate() {
            if n % self.interval == 0 && self.abort.is_aborted() {
                return Err(BuildError::Cancelled {
                    peptides_processed: self.progress.load(Ordering::Acquire),
                });
            }

            let peptide = self.peptides.get(id).ok_or(BuildError::UnknownPeptide(id))?;
            let fragments = self
                .producer
                .fragments(peptide)
                .map_err(|source| BuildError::Fragment { peptide: id, source })?;

            store
                .try_reserve(fragments.len())
                .map_err(|_| BuildError::OutOfMemory {
                    peptides_processed: self.progress.load(Ordering::Acquire),
                    requested: fragments.len(),
                })?;

            for fragment in &fragments {
                if !store.insert(fragment.mass, id) {
                    dropped += 1;
                }
            }

            let done = self.progress.fetch_add(1, Ordering::AcqRel) + 1;
            if done % self.interval == 0 {
                let pct = done as f64 / self.total.max(1) as f64 * 100.0;
                self.status
                    .set_status(&format!("Progress: {}/{} peptides ({:.1}%)", done, self.total, pct));
            }
        }

        store.freeze();
        debug!(
            "Partition {} finished: {} peptides, {} fragments",
            partition,
            bucket.len(),
            store.len()
        );

        Ok(PartitionOutput {
            store,
            peptides: bucket.len(),
            dropped,
        })
    }
}
