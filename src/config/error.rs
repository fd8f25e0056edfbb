use std::path::PathBuf;

use crate::tolerance::ToleranceError;

/// Errors raised while loading or validating a [`SearchConfig`](super::SearchConfig)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The TOML document is malformed or has the wrong shape
    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// A tolerance string could not be parsed
    #[error("Invalid {field}: {source}")]
    Tolerance {
        /// Name of the setting
        field: &'static str,
        /// Parse failure
        #[source]
        source: ToleranceError,
    },

    /// No fragment tolerance was configured
    #[error("Missing required setting 'fragment_tolerance'")]
    MissingFragmentTolerance,

    /// An ion type name is not known
    #[error("Unknown ion type '{0}' (expected b, y or precursor)")]
    UnknownIonType(String),

    /// A crosslinker definition is inconsistent
    #[error("Invalid crosslinker '{name}': {reason}")]
    InvalidCrosslinker {
        /// Crosslinker name
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// A modification refers to a residue that does not exist
    #[error("Modification '{name}' refers to unknown residue '{residue}'")]
    UnknownModificationResidue {
        /// Modification name
        name: String,
        /// Residue code it was declared for
        residue: char,
    },

    /// A numeric setting is out of range
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Name of the setting
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}
