//! Error types for the bundle manager tooling

use crate::codes::{self, ErrCode};
use thiserror::Error;

/// Core error type for bundle manager operations
#[derive(Error, Debug)]
pub enum BundleError {
    /// The service answered with a non-OK error code
    #[error("Service error {code}: {message}")]
    Service { code: ErrCode, message: String },

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Bundle not found
    #[error("Bundle not found: {0}")]
    BundleNotFound(String),

    /// Module not found in a bundle
    #[error("Module {module} not found in bundle {bundle}")]
    ModuleNotFound { bundle: String, module: String },

    /// Parsing errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Timeout errors
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for bundle manager operations
pub type Result<T> = std::result::Result<T, BundleError>;

impl BundleError {
    /// Build a service error from a code, with an empty message.
    pub fn code(code: ErrCode) -> Self {
        BundleError::Service {
            code,
            message: String::new(),
        }
    }

    /// The service error code this error maps to.
    ///
    /// Local failures that never reached the service map to the closest
    /// service code, so callers can always print an `errCode`.
    pub fn err_code(&self) -> ErrCode {
        match self {
            BundleError::Service { code, .. } => *code,
            BundleError::InvalidInput(_) | BundleError::Parse(_) => codes::ERR_INVALID_VALUE,
            BundleError::BundleNotFound(_) => codes::ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST,
            BundleError::ModuleNotFound { .. } => codes::ERR_BUNDLE_MANAGER_MODULE_NOT_EXIST,
            BundleError::Timeout(_) => codes::ERR_OPERATION_TIME_OUT,
            BundleError::Io(_) | BundleError::Serialization(_) | BundleError::Other(_) => {
                codes::ERR_BUNDLE_MANAGER_INTERNAL_ERROR
            }
        }
    }
}

impl From<serde_json::Error> for BundleError {
    fn from(err: serde_json::Error) -> Self {
        BundleError::Serialization(err.to_string())
    }
}
