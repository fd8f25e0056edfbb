/// Errors that can occur while parsing a tolerance specification
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToleranceError {
    /// The tolerance string was empty or only whitespace
    #[error("Empty tolerance specification")]
    Empty,

    /// The numeric part could not be parsed
    #[error("Invalid tolerance value '{0}'")]
    InvalidValue(String),

    /// The unit is neither ppm nor an absolute (Da, m/z) unit
    #[error("Unknown tolerance unit '{0}' (expected ppm, da or m/z)")]
    UnknownUnit(String),

    /// Tolerances must be finite and non-negative
    #[error("Tolerance must be finite and non-negative, got {0}")]
    OutOfRange(f64),
}
