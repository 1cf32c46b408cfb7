//! Errors returned by configuration and validation
//!
//! Every failure is returned to the caller; nothing is logged and swallowed.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapValidatorError {
    /// `ignore` was handed something other than a direct property of the destination shape
    #[error("Invalid property selector `{selector}` for {shape}: {reason}")]
    InvalidPropertySelector {
        selector: String,
        shape: String,
        reason: String,
    },

    /// `validate` was called for a source/destination pair that was never configured
    #[error(
        "No validation configuration registered for {source_shape} -> {destination_shape}. \
         Call configure::<{source_shape}, {destination_shape}>() first."
    )]
    ConfigurationMissing {
        source_shape: String,
        destination_shape: String,
    },

    /// Unexplained destination properties still hold their default values
    #[error("Required fields not set on {destination_shape}: {}", .unset.join(", "))]
    ValidationFailed {
        destination_shape: String,
        unset: Vec<String>,
    },
}

impl MapValidatorError {
    /// True for `ValidationFailed`, false for configuration and selector errors
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. })
    }

    /// Names reported by a `ValidationFailed` error, empty for the other kinds
    pub fn unset_properties(&self) -> &[String] {
        match self {
            Self::ValidationFailed { unset, .. } => unset,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, MapValidatorError>;
