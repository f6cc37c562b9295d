//! The external embedding provider boundary.
//!
//! Feature extraction (audio loading, image decoding, keystroke/mouse
//! timing parsing) and the neural model itself live outside this core. A
//! provider maps a raw sample to a unit-length [`Embedding`] of its
//! declared dimension, deterministically for the same input and model
//! version.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::embedding::Embedding;
use crate::error::VerifyResult;

/// Biometric modality of a raw sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    /// Face image.
    Face,
    /// Voice audio.
    Voice,
    /// Keystroke timing sequence.
    Keystroke,
    /// Mouse movement trace.
    Mouse,
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Modality::Face => "face",
            Modality::Voice => "voice",
            Modality::Keystroke => "keystroke",
            Modality::Mouse => "mouse",
        };
        f.write_str(name)
    }
}

/// An unprocessed biometric sample handed to a provider.
///
/// The core never inspects the payload; it only routes it.
#[derive(Debug, Clone)]
pub enum RawSample {
    /// In-memory sample bytes (e.g. a decoded upload).
    Bytes {
        /// Sample modality.
        modality: Modality,
        /// Opaque payload.
        bytes: Vec<u8>,
    },
    /// Reference to a sample file the provider resolves itself.
    Path {
        /// Sample modality.
        modality: Modality,
        /// Filesystem location of the sample.
        path: PathBuf,
    },
}

impl RawSample {
    /// In-memory sample constructor.
    pub fn from_bytes(modality: Modality, bytes: Vec<u8>) -> Self {
        Self::Bytes { modality, bytes }
    }

    /// File-reference sample constructor.
    pub fn from_path(modality: Modality, path: impl Into<PathBuf>) -> Self {
        Self::Path {
            modality,
            path: path.into(),
        }
    }

    /// Modality of this sample.
    pub fn modality(&self) -> Modality {
        match self {
            Self::Bytes { modality, .. } | Self::Path { modality, .. } => *modality,
        }
    }

    /// Short description for logging (never the payload itself).
    pub fn describe(&self) -> String {
        match self {
            Self::Bytes { modality, bytes } => {
                format!("{modality} sample ({} bytes)", bytes.len())
            }
            Self::Path { modality, path } => format!("{modality} sample at {}", path.display()),
        }
    }
}

/// Maps raw samples to unit-length embeddings of a fixed dimension.
///
/// # Thread Safety
///
/// Requires `Send + Sync` so a single provider can serve concurrent
/// enrollment and verification calls.
///
/// # Error Handling
///
/// Failures surface as [`crate::error::VerifyError::Provider`] (or a more
/// specific variant when the provider can classify the failure). Providers
/// must never return a default embedding on failure.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Output dimension D of this provider's embeddings.
    fn dimension(&self) -> usize;

    /// Embed one raw sample.
    ///
    /// The returned embedding must be unit-length within tolerance and of
    /// dimension [`Self::dimension`]; callers re-validate both.
    async fn embed(&self, sample: &RawSample) -> VerifyResult<Embedding>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modality_display() {
        assert_eq!(Modality::Face.to_string(), "face");
        assert_eq!(Modality::Keystroke.to_string(), "keystroke");
    }

    #[test]
    fn test_sample_accessors() {
        let s = RawSample::from_bytes(Modality::Voice, vec![1, 2, 3]);
        assert_eq!(s.modality(), Modality::Voice);
        assert!(s.describe().contains("3 bytes"));

        let p = RawSample::from_path(Modality::Face, "/tmp/probe.json");
        assert_eq!(p.modality(), Modality::Face);
        assert!(p.describe().contains("probe.json"));
    }
}
