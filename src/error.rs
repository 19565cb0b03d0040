//! Error module for the stochastic release library.
use std::error::Error;
use std::fmt;

/// Error types for the library.
#[derive(Debug, PartialEq)]
pub enum ReleaseError {
    /// Error for invalid synapse parameters, e.g., a release probability outside (0, 1].
    /// A model cannot be built until the parameters are corrected.
    InvalidParameter(String),
    /// Error for invalid run inputs, e.g., an empty or decreasing spike train.
    /// The model remains usable and the call can be retried with corrected inputs.
    InvalidInput(String),
    /// Error while reading or writing a parameter file.
    IOError(String),
}

impl fmt::Display for ReleaseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReleaseError::InvalidParameter(e) => write!(f, "Invalid parameter: {}", e),
            ReleaseError::InvalidInput(e) => write!(f, "Invalid input: {}", e),
            ReleaseError::IOError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for ReleaseError {}
