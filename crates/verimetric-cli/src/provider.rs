//! File-backed embedding provider for offline tooling.
//!
//! Real deployments embed through a model service; the CLI instead reads
//! embeddings that were exported ahead of time, one JSON `[f32, ...]` array
//! per sample file. Vectors are renormalized on load so exports with minor
//! rounding drift still satisfy the unit-norm contract.

use async_trait::async_trait;
use tracing::debug;

use verimetric_core::{Embedding, EmbeddingProvider, RawSample, VerifyError, VerifyResult};

/// Provider over pre-computed embedding files.
pub struct StoredEmbeddingProvider {
    dimension: usize,
}

impl StoredEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl EmbeddingProvider for StoredEmbeddingProvider {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, sample: &RawSample) -> VerifyResult<Embedding> {
        let RawSample::Path { path, .. } = sample else {
            return Err(VerifyError::Provider {
                message: "stored provider only accepts file references".into(),
            });
        };
        let text = std::fs::read_to_string(path).map_err(|e| VerifyError::Provider {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        let values: Vec<f32> = serde_json::from_str(&text).map_err(|e| VerifyError::Provider {
            message: format!("invalid embedding file {}: {e}", path.display()),
        })?;

        let embedding = Embedding::new(values)?;
        embedding.require_dim(self.dimension)?;
        debug!(path = %path.display(), dim = embedding.dim(), "embedding loaded");
        embedding.normalized()
    }
}
