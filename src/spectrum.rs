//! MS2 spectra as seen by the candidate ranker.
//!
//! Preprocessing (deisotoping, denoising, charge reduction) happens before a
//! spectrum gets here; this module only holds the peaks and the precursor.

use serde::{Deserialize, Serialize};

use crate::chemistry::PROTON_MASS;

/// A single centroided peak
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Mass-to-charge ratio
    pub mz: f64,
    /// Peak intensity
    pub intensity: f64,
}

impl Peak {
    /// Create a peak
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }
}

/// A fragmentation spectrum with its precursor information.
///
/// Peaks are kept sorted ascending by m/z.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    id: String,
    precursor_mz: f64,
    precursor_charge: u8,
    precursor_mass: f64,
    peaks: Vec<Peak>,
}

impl Spectrum {
    /// Start building a spectrum
    pub fn builder(id: impl Into<String>) -> SpectrumBuilder {
        SpectrumBuilder::new(id)
    }

    /// Spectrum identifier (title or native id)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Precursor m/z
    pub fn precursor_mz(&self) -> f64 {
        self.precursor_mz
    }

    /// Precursor charge state
    pub fn precursor_charge(&self) -> u8 {
        self.precursor_charge
    }

    /// Neutral precursor mass
    pub fn precursor_mass(&self) -> f64 {
        self.precursor_mass
    }

    /// Peaks sorted by m/z
    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    /// Number of peaks
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    /// Returns true if the spectrum has no peaks
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }
}

/// Builder for [`Spectrum`]
#[derive(Debug, Clone)]
pub struct SpectrumBuilder {
    id: String,
    precursor_mz: f64,
    precursor_charge: u8,
    precursor_mass: Option<f64>,
    peaks: Vec<Peak>,
}

impl SpectrumBuilder {
    /// Create a builder for a spectrum without precursor and peaks
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            precursor_mz: 0.0,
            precursor_charge: 1,
            precursor_mass: None,
            peaks: Vec::new(),
        }
    }

    /// Set precursor m/z and charge
    pub fn precursor(mut self, mz: f64, charge: u8) -> Self {
        self.precursor_mz = mz;
        self.precursor_charge = charge.max(1);
        self
    }

    /// Set the neutral precursor mass directly instead of deriving it from m/z
    pub fn precursor_mass(mut self, mass: f64) -> Self {
        self.precursor_mass = Some(mass);
        self
    }

    /// Add a single peak
    pub fn add_peak(mut self, mz: f64, intensity: f64) -> Self {
        self.peaks.push(Peak::new(mz, intensity));
        self
    }

    /// Add many peaks
    pub fn peaks<I: IntoIterator<Item = Peak>>(mut self, peaks: I) -> Self {
        self.peaks.extend(peaks);
        self
    }

    /// Finish the spectrum; peaks with a non-finite m/z are discarded.
    pub fn build(self) -> Spectrum {
        let mut peaks = self.peaks;
        peaks.retain(|p| p.mz.is_finite());
        peaks.sort_by(|a, b| a.mz.total_cmp(&b.mz));

        let precursor_mass = self
            .precursor_mass
            .unwrap_or_else(|| (self.precursor_mz - PROTON_MASS) * f64::from(self.precursor_charge));

        Spectrum {
            id: self.id,
            precursor_mz: self.precursor_mz,
            precursor_charge: self.precursor_charge,
            precursor_mass,
            peaks,
        }
    }
}
