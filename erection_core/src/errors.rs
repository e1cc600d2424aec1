//! # Error Types
//!
//! Structured error types for erection_core. Each variant carries enough
//! context for a caller to tell a configuration problem (missing price rows,
//! inconsistent crane data) apart from a genuinely impossible project (no
//! crane can lift a component).
//!
//! ## Example
//!
//! ```rust
//! use erection_core::errors::{ErectionError, ErectionResult};
//!
//! fn validate_hub_height(hub_height_m: f64) -> ErectionResult<()> {
//!     if hub_height_m <= 0.0 {
//!         return Err(ErectionError::InvalidInput {
//!             field: "hub_height_m".to_string(),
//!             value: hub_height_m.to_string(),
//!             reason: "Hub height must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for erection_core operations
pub type ErectionResult<T> = Result<T, ErectionError>;

/// Structured error type for the erection cost pipeline.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ErectionError {
    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field or table is missing or empty
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// No crane configuration can lift every component of an operation
    #[error("No feasible crane for {operation} operation ({candidates} candidates screened)")]
    NoFeasibleCrane { operation: String, candidates: usize },

    /// A join against a price or crew table found no row
    #[error("Missing price data in '{table}' for key {key}")]
    MissingPriceData { table: String, key: String },

    /// A join against a price table that must be unique matched several rows
    #[error("Ambiguous price data in '{table}' for key {key}: {matches} matching rows")]
    AmbiguousPriceData {
        table: String,
        key: String,
        matches: usize,
    },

    /// Rows of one crane configuration disagree on their crew type
    #[error("Inconsistent crew type for crane {crane}: found {first} and {other}")]
    InconsistentCrewType {
        crane: String,
        first: String,
        other: String,
    },

    /// Capacity envelope would be empty or ill-formed
    #[error("Degenerate capacity envelope for crane {crane}: {reason}")]
    DegenerateEnvelope { crane: String, reason: String },

    /// Weather window has no observations to integrate over
    #[error("Degenerate weather window: {reason}")]
    DegenerateWeatherWindow { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl ErectionError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ErectionError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        ErectionError::MissingField {
            field: field.into(),
        }
    }

    /// Create a NoFeasibleCrane error
    pub fn no_feasible_crane(operation: impl Into<String>, candidates: usize) -> Self {
        ErectionError::NoFeasibleCrane {
            operation: operation.into(),
            candidates,
        }
    }

    /// Create a MissingPriceData error
    pub fn missing_price_data(table: impl Into<String>, key: impl Into<String>) -> Self {
        ErectionError::MissingPriceData {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Create an AmbiguousPriceData error
    pub fn ambiguous_price_data(table: impl Into<String>, key: impl Into<String>, matches: usize) -> Self {
        ErectionError::AmbiguousPriceData {
            table: table.into(),
            key: key.into(),
            matches,
        }
    }

    /// Create a DegenerateEnvelope error
    pub fn degenerate_envelope(crane: impl Into<String>, reason: impl Into<String>) -> Self {
        ErectionError::DegenerateEnvelope {
            crane: crane.into(),
            reason: reason.into(),
        }
    }

    /// Create a DegenerateWeatherWindow error
    pub fn degenerate_weather_window(reason: impl Into<String>) -> Self {
        ErectionError::DegenerateWeatherWindow {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        ErectionError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True when the error points at bad reference data rather than an
    /// infeasible project; fixing the input tables makes the run succeed.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            ErectionError::MissingPriceData { .. }
                | ErectionError::AmbiguousPriceData { .. }
                | ErectionError::InconsistentCrewType { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ErectionError::InvalidInput { .. } => "INVALID_INPUT",
            ErectionError::MissingField { .. } => "MISSING_FIELD",
            ErectionError::NoFeasibleCrane { .. } => "NO_FEASIBLE_CRANE",
            ErectionError::MissingPriceData { .. } => "MISSING_PRICE_DATA",
            ErectionError::AmbiguousPriceData { .. } => "AMBIGUOUS_PRICE_DATA",
            ErectionError::InconsistentCrewType { .. } => "INCONSISTENT_CREW_TYPE",
            ErectionError::DegenerateEnvelope { .. } => "DEGENERATE_ENVELOPE",
            ErectionError::DegenerateWeatherWindow { .. } => "DEGENERATE_WEATHER_WINDOW",
            ErectionError::FileError { .. } => "FILE_ERROR",
            ErectionError::SerializationError { .. } => "SERIALIZATION_ERROR",
            ErectionError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

/// Reject NaN/inf and non-positive values for a named input.
pub(crate) fn require_positive(field: &str, value: f64) -> ErectionResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ErectionError::invalid_input(
            field,
            value.to_string(),
            "Value must be a positive, finite number",
        ));
    }
    Ok(value)
}

/// Reject NaN/inf and negative values for a named input.
pub(crate) fn require_non_negative(field: &str, value: f64) -> ErectionResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(ErectionError::invalid_input(
            field,
            value.to_string(),
            "Value must be a non-negative, finite number",
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = ErectionError::no_feasible_crane("Top", 3);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("NoFeasibleCrane"));
        let roundtrip: ErectionError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ErectionError::missing_field("cranes").error_code(), "MISSING_FIELD");
        assert_eq!(
            ErectionError::missing_price_data("equipment_prices", "LR1600 / 600 t").error_code(),
            "MISSING_PRICE_DATA"
        );
        assert_eq!(
            ErectionError::degenerate_weather_window("no records").error_code(),
            "DEGENERATE_WEATHER_WINDOW"
        );
    }

    #[test]
    fn test_data_errors_are_distinguished_from_infeasibility() {
        assert!(ErectionError::missing_price_data("crew_prices", "7").is_data_error());
        assert!(ErectionError::ambiguous_price_data("fuel", "Crawler", 2).is_data_error());
        assert!(!ErectionError::no_feasible_crane("Base", 1).is_data_error());
    }

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive("speed", 2.5).unwrap(), 2.5);
        assert!(require_positive("speed", 0.0).is_err());
        assert!(require_positive("speed", f64::NAN).is_err());
        assert!(require_non_negative("cost", 0.0).is_ok());
        assert!(require_non_negative("cost", -1.0).is_err());
    }
}
