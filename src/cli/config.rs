//! Search settings for the command line.
//!
//! Settings come from an optional TOML file (see [`SearchConfig::from_file`])
//! and are then overridden by explicit flags:
//!
//! ```toml
//! # search.toml
//! fragment_tolerance = "20ppm"
//! precursor_tolerance = "10ppm"
//! max_candidates_per_peak = 1000
//!
//! [[crosslinkers]]
//! name = "BS3"
//! mass = 138.06808
//! linked_residues = ["K"]
//! ```

use anyhow::{bail, Context, Result};
use log::debug;
use std::path::Path;

use xlfrag::config::SearchConfig;
use xlfrag::tolerance::Tolerance;

/// Flag values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct SettingsOverrides {
    pub fragment_tolerance: Option<Tolerance>,
    pub precursor_tolerance: Option<Tolerance>,
    pub threads: Option<usize>,
    pub partitions: Option<usize>,
    pub quantization_scale: Option<f64>,
    pub progress_interval: Option<usize>,
}

/// Load the config file (if any), apply the overrides and validate the result.
pub fn load(path: Option<&Path>, overrides: &SettingsOverrides) -> Result<SearchConfig> {
    let mut config = match path {
        Some(path) => {
            debug!("Loading search settings from {}", path.display());
            SearchConfig::from_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?
        }
        None => match overrides.fragment_tolerance {
            Some(tolerance) => SearchConfig::new(tolerance),
            None => bail!("No fragment tolerance given: pass --fragment-tolerance or --config"),
        },
    };
    apply(&mut config, overrides);
    config.validate().context("Invalid search settings")?;
    Ok(config)
}

fn apply(config: &mut SearchConfig, overrides: &SettingsOverrides) {
    if let Some(tolerance) = overrides.fragment_tolerance {
        config.fragment_tolerance = tolerance;
    }
    if let Some(tolerance) = overrides.precursor_tolerance {
        config.precursor_tolerance = tolerance;
    }
    if let Some(threads) = overrides.threads {
        config.threads = threads;
    }
    if let Some(partitions) = overrides.partitions {
        config.partitions = Some(partitions);
    }
    if let Some(scale) = overrides.quantization_scale {
        config.quantization_scale = scale;
    }
    if let Some(interval) = overrides.progress_interval {
        config.progress_interval = interval;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_flags_without_config_file() {
        let overrides = SettingsOverrides {
            fragment_tolerance: Some(Tolerance::ppm(20.0)),
            threads: Some(2),
            ..Default::default()
        };
        let config = load(None, &overrides).unwrap();
        assert_eq!(config.fragment_tolerance, Tolerance::ppm(20.0));
        assert_eq!(config.threads, 2);
    }

    #[test]
    fn test_missing_fragment_tolerance() {
        assert!(load(None, &SettingsOverrides::default()).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fragment_tolerance = \"20ppm\"").unwrap();
        writeln!(file, "threads = 4").unwrap();

        let overrides = SettingsOverrides {
            fragment_tolerance: Some(Tolerance::da(0.02)),
            partitions: Some(3),
            ..Default::default()
        };
        let config = load(Some(file.path()), &overrides).unwrap();
        assert_eq!(config.fragment_tolerance, Tolerance::da(0.02));
        assert_eq!(config.threads, 4);
        assert_eq!(config.partitions, Some(3));
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let overrides = SettingsOverrides {
            fragment_tolerance: Some(Tolerance::ppm(20.0)),
            quantization_scale: Some(-1.0),
            ..Default::default()
        };
        assert!(load(None, &overrides).is_err());
    }
}
