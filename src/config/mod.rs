//! # Search Configuration
//!
//! [`SearchConfig`] is constructed once by the caller and passed by reference
//! to every component. There are no process-wide registries: the residue
//! table, the fragment producer and the crosslinkers are all derived from it.
//!
//! ```toml
//! fragment_tolerance = "20ppm"
//! precursor_tolerance = "10ppm"
//! max_peptide_mass = 6000.0
//! max_candidates_per_peak = 1000
//! ion_types = ["b", "y", "precursor"]
//! threads = 8
//!
//! [[crosslinkers]]
//! name = "BS3"
//! mass = 138.06808
//! linked_residues = ["K", "S", "T", "Y"]
//!
//! [[modifications]]
//! name = "ox"
//! residue = "M"
//! mass_delta = 15.99491
//! ```

mod error;


use std::path::Path;

use serde::Deserialize;

use crate::chemistry::ResidueTable;
use crate::crosslinker::Crosslinker;
use crate::fragment::{IonType, PrimaryFragments};
use crate::tolerance::Tolerance;

pub use error::ConfigError;

/// Default precursor tolerance when none is configured
pub const DEFAULT_PRECURSOR_TOLERANCE: Tolerance = Tolerance::Ppm(10.0);

/// Default fixed-point scale of the index (1e-5 Da resolution)
pub const DEFAULT_QUANTIZATION_SCALE: f64 = 100_000.0;

/// Reference mass for checking the quantization scale; lighter than any
/// b or y ion (b1 of glycine is about 58 Da)
pub const QUANTIZATION_REFERENCE_MASS: f64 = 50.0;

/// Default number of peptides between progress reports
pub const DEFAULT_PROGRESS_INTERVAL: usize = 5_000;

/// A residue modification added to the residue table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModificationConfig {
    /// Suffix used in sequences, e.g. `ox` for `Mox`
    pub name: String,
    /// One-letter code of the modified residue
    pub residue: char,
    /// Mass added to the residue
    pub mass_delta: f64,
}

/// Everything the index build and the candidate ranker need to know.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Tolerance for matching peaks against fragment masses
    pub fragment_tolerance: Tolerance,
    /// Tolerance for matching precursor masses
    pub precursor_tolerance: Tolerance,
    /// Peptides lighter than this are not indexed
    pub min_peptide_mass: f64,
    /// Peptides heavier than this are not indexed
    pub max_peptide_mass: f64,
    /// Peaks matching more peptides than this contribute nothing; `None` = unlimited
    pub max_candidates_per_peak: Option<usize>,
    /// Neutral-loss offsets probed per peak in addition to the peak itself
    pub alpha_candidate_delta_masses: Vec<f64>,
    /// Ion types generated per peptide
    pub ion_types: Vec<IonType>,
    /// Configured crosslinkers
    pub crosslinkers: Vec<Crosslinker>,
    /// Modified residues added on top of the standard amino acids
    pub modifications: Vec<ModificationConfig>,
    /// Worker threads for the build; `0` = available parallelism
    pub threads: usize,
    /// Number of peptide-mass buckets; `None` = `threads * 4`
    pub partitions: Option<usize>,
    /// Fixed-point scale for quantized fragment masses
    pub quantization_scale: f64,
    /// Peptides between two progress reports and abort checks
    pub progress_interval: usize,
}

impl SearchConfig {
    /// A configuration with the given fragment tolerance and defaults for
    /// everything else.
    pub fn new(fragment_tolerance: Tolerance) -> Self {
        Self {
            fragment_tolerance,
            precursor_tolerance: DEFAULT_PRECURSOR_TOLERANCE,
            min_peptide_mass: 0.0,
            max_peptide_mass: f64::INFINITY,
            max_candidates_per_peak: None,
            alpha_candidate_delta_masses: Vec::new(),
            ion_types: IonType::ALL.to_vec(),
            crosslinkers: Vec::new(),
            modifications: Vec::new(),
            threads: 0,
            partitions: None,
            quantization_scale: DEFAULT_QUANTIZATION_SCALE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Set the precursor tolerance
    pub fn with_precursor_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.precursor_tolerance = tolerance;
        self
    }

    /// Add a crosslinker
    pub fn with_crosslinker(mut self, crosslinker: Crosslinker) -> Self {
        self.crosslinkers.push(crosslinker);
        self
    }

    /// Set the peptide mass window that gets indexed
    pub fn with_peptide_mass_range(mut self, min: f64, max: f64) -> Self {
        self.min_peptide_mass = min;
        self.max_peptide_mass = max;
        self
    }

    /// Set the per-peak candidate cap
    pub fn with_max_candidates_per_peak(mut self, cap: Option<usize>) -> Self {
        self.max_candidates_per_peak = cap;
        self
    }

    /// Set thread and partition counts
    pub fn with_parallelism(mut self, threads: usize, partitions: Option<usize>) -> Self {
        self.threads = threads;
        self.partitions = partitions;
        self
    }

    /// Load and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        raw.into_config()
    }

    /// Check value ranges and cross-field consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_peptide_mass >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "min_peptide_mass",
                reason: format!("{} must not be negative", self.min_peptide_mass),
            });
        }
        if !(self.max_peptide_mass >= self.min_peptide_mass) {
            return Err(ConfigError::InvalidValue {
                field: "max_peptide_mass",
                reason: format!(
                    "{} is smaller than min_peptide_mass {}",
                    self.max_peptide_mass, self.min_peptide_mass
                ),
            });
        }
        if !(self.quantization_scale.is_finite() && self.quantization_scale > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "quantization_scale",
                reason: format!("{} must be a positive number", self.quantization_scale),
            });
        }
        if self.progress_interval == 0 {
            return Err(ConfigError::InvalidValue {
                field: "progress_interval",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.partitions == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "partitions",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.ion_types.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "ion_types",
                reason: "at least one ion type is required".to_string(),
            });
        }
        if let Some(delta) = self.alpha_candidate_delta_masses.iter().find(|d| !d.is_finite()) {
            return Err(ConfigError::InvalidValue {
                field: "alpha_candidate_delta_masses",
                reason: format!("{} is not a finite mass", delta),
            });
        }
        for crosslinker in &self.crosslinkers {
            validate_crosslinker(crosslinker)?;
        }

        // rounding error must stay below the finest fragment window
        let rounding_error = 0.5 / self.quantization_scale;
        let finest = self.fragment_tolerance.absolute_error(QUANTIZATION_REFERENCE_MASS);
        if finest > 0.0 && rounding_error >= finest {
            return Err(ConfigError::InvalidValue {
                field: "quantization_scale",
                reason: format!(
                    "{} rounds masses by up to {} Da, not below the fragment tolerance at {} Da ({} Da)",
                    self.quantization_scale, rounding_error, QUANTIZATION_REFERENCE_MASS, finest
                ),
            });
        }
        Ok(())
    }

    /// The standard residues plus all configured modifications
    pub fn residue_table(&self) -> Result<ResidueTable, ConfigError> {
        let mut table = ResidueTable::standard();
        for m in &self.modifications {
            if !m.mass_delta.is_finite() {
                return Err(ConfigError::InvalidValue {
                    field: "modifications",
                    reason: format!("mass_delta of '{}' is not finite", m.name),
                });
            }
            if table.add_modification(&m.name, m.residue, m.mass_delta).is_none() {
                return Err(ConfigError::UnknownModificationResidue {
                    name: m.name.clone(),
                    residue: m.residue,
                });
            }
        }
        Ok(table)
    }

    /// The fragment producer matching the configured ions and crosslinkers
    pub fn fragment_producer(&self) -> PrimaryFragments {
        PrimaryFragments::new(self.ion_types.iter().copied(), self.crosslinkers.clone())
    }

    /// Worker thread count with `0` resolved to the available parallelism
    pub fn effective_threads(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }

    /// Number of mass buckets used for the build
    pub fn effective_partitions(&self) -> usize {
        self.partitions
            .unwrap_or_else(|| self.effective_threads() * 4)
            .max(1)
    }
}

fn validate_crosslinker(crosslinker: &Crosslinker) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidCrosslinker {
        name: crosslinker.name().to_string(),
        reason: reason.to_string(),
    };
    if crosslinker.name().trim().is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if !crosslinker.crosslinked_mass().is_finite() {
        return Err(invalid("mass is not finite"));
    }
    if crosslinker.linked_residues().is_empty() {
        return Err(invalid("no linked residues"));
    }
    if let Some(c) = crosslinker
        .linked_residues()
        .iter()
        .find(|c| !c.is_ascii_uppercase())
    {
        return Err(invalid(&format!("'{}' is not a residue code", c)));
    }
    Ok(())
}

/// String-typed mirror of the TOML document, converted by [`RawConfig::into_config`]
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    fragment_tolerance: Option<String>,
    precursor_tolerance: Option<String>,
    min_peptide_mass: Option<f64>,
    max_peptide_mass: Option<f64>,
    max_candidates_per_peak: Option<i64>,
    #[serde(default)]
    alpha_candidate_delta_masses: Vec<f64>,
    ion_types: Option<Vec<String>>,
    #[serde(default)]
    crosslinkers: Vec<RawCrosslinker>,
    #[serde(default)]
    modifications: Vec<ModificationConfig>,
    threads: Option<usize>,
    partitions: Option<usize>,
    quantization_scale: Option<f64>,
    progress_interval: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCrosslinker {
    name: String,
    mass: f64,
    linked_residues: Vec<char>,
}

impl RawConfig {
    fn into_config(self) -> Result<SearchConfig, ConfigError> {
        let fragment_tolerance = self
            .fragment_tolerance
            .ok_or(ConfigError::MissingFragmentTolerance)?
            .parse::<Tolerance>()
            .map_err(|source| ConfigError::Tolerance {
                field: "fragment_tolerance",
                source,
            })?;

        let mut config = SearchConfig::new(fragment_tolerance);

        if let Some(p) = self.precursor_tolerance {
            config.precursor_tolerance = p.parse::<Tolerance>().map_err(|source| ConfigError::Tolerance {
                field: "precursor_tolerance",
                source,
            })?;
        }
        if let Some(v) = self.min_peptide_mass {
            config.min_peptide_mass = v;
        }
        if let Some(v) = self.max_peptide_mass {
            config.max_peptide_mass = v;
        }
        config.max_candidates_per_peak = match self.max_candidates_per_peak {
            None | Some(-1) => None,
            Some(n) if n >= 0 => Some(n as usize),
            Some(n) => {
                return Err(ConfigError::InvalidValue {
                    field: "max_candidates_per_peak",
                    reason: format!("{} (use -1 for unlimited)", n),
                })
            }
        };
        config.alpha_candidate_delta_masses = self.alpha_candidate_delta_masses;
        if let Some(names) = self.ion_types {
            config.ion_types = names
                .iter()
                .map(|n| n.parse::<IonType>().map_err(ConfigError::UnknownIonType))
                .collect::<Result<_, _>>()?;
        }
        config.crosslinkers = self
            .crosslinkers
            .into_iter()
            .map(|c| Crosslinker::new(c.name, c.mass, c.linked_residues))
            .collect();
        config.modifications = self.modifications;
        if let Some(t) = self.threads {
            config.threads = t;
        }
        config.partitions = self.partitions;
        if let Some(s) = self.quantization_scale {
            config.quantization_scale = s;
        }
        if let Some(p) = self.progress_interval {
            config.progress_interval = p;
        }

        config.validate()?;
        // surface unknown modification residues at load time
        config.residue_table()?;
        Ok(config)
    }
}
