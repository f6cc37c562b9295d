//! Error types for verimetric-core.
//!
//! This module defines the central error type [`VerifyError`] used throughout
//! the workspace, along with the [`VerifyResult<T>`] type alias.
//!
//! # Design Principles
//!
//! - **NO FALLBACKS**: a missing similarity score is an error, never a
//!   default-accept decision
//! - **FAIL FAST**: invalid thresholds, margins, and embeddings are rejected
//!   before any scoring happens
//! - **CONTEXTUAL**: every variant carries the values that violated the
//!   contract

use thiserror::Error;

/// Top-level error type for verification, calibration, and training
/// operations.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Enrollment received fewer samples than the policy floor allows.
    #[error("Insufficient samples: got {got}, enrollment requires at least {min}")]
    InsufficientSamples {
        /// Number of samples provided.
        got: usize,
        /// Minimum number required by policy.
        min: usize,
    },

    /// Aggregated mean vector collapsed to (near) zero and cannot be
    /// renormalized. Catching this here prevents NaN-containing templates.
    #[error("Degenerate template: mean vector norm {norm} is below tolerance")]
    DegenerateTemplate {
        /// Norm of the mean vector before renormalization.
        norm: f32,
    },

    /// An embedding violated its contract (non-finite component, zero
    /// length, or unit-norm deviation beyond tolerance).
    #[error("Invalid embedding: {reason}")]
    InvalidEmbedding {
        /// Description of the contract violation.
        reason: String,
    },

    /// Embedding vector dimension does not match the configured dimension D.
    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected embedding dimension.
        expected: usize,
        /// Actual embedding dimension provided.
        actual: usize,
    },

    /// Calibration requires at least one genuine and one impostor pair.
    #[error(
        "Insufficient calibration data: {genuine} genuine and {impostor} impostor pairs (need at least 1 of each)"
    )]
    InsufficientCalibrationData {
        /// Number of genuine pairs seen.
        genuine: usize,
        /// Number of impostor pairs seen.
        impostor: usize,
    },

    /// Decision threshold outside the cosine similarity range.
    #[error("Invalid threshold {value}: must be within [-1, 1]")]
    InvalidThreshold {
        /// The rejected threshold value.
        value: f32,
    },

    /// Escalation margin must be non-negative.
    #[error("Invalid escalation margin {value}: must be non-negative")]
    InvalidMargin {
        /// The rejected margin value.
        value: f32,
    },

    /// Loss computation received an empty batch.
    #[error("Empty training batch")]
    EmptyBatch,

    /// No template enrolled under the given identity.
    #[error("Identity not enrolled: {identity_id}")]
    NotFound {
        /// The identity that was looked up.
        identity_id: String,
    },

    /// Opaque failure from the external embedding provider.
    #[error("Embedding provider error: {message}")]
    Provider {
        /// Provider-supplied failure description.
        message: String,
    },

    /// Configuration value failed validation.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the invalid setting.
        message: String,
    },

    /// File I/O error (pair files, report artifacts).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed (report artifacts, stored
    /// embeddings).
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for verification operations.
pub type VerifyResult<T> = Result<T, VerifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_context() {
        let err = VerifyError::InsufficientSamples { got: 1, min: 2 };
        let msg = err.to_string();
        assert!(msg.contains("got 1"));
        assert!(msg.contains("at least 2"));
    }

    #[test]
    fn test_not_found_display() {
        let err = VerifyError::NotFound {
            identity_id: "alice".into(),
        };
        assert!(err.to_string().contains("alice"));
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = VerifyError::DimensionMismatch {
            expected: 512,
            actual: 128,
        };
        let msg = err.to_string();
        assert!(msg.contains("512"));
        assert!(msg.contains("128"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: VerifyError = io.into();
        assert!(matches!(err, VerifyError::Io(_)));
    }
}
