//! Cosine similarity scoring between unit-length embeddings.

use crate::embedding::Embedding;
use crate::error::{VerifyError, VerifyResult};

/// Cosine similarity between two embeddings.
///
/// Inputs are unit-normalized by contract, so this reduces to a dot product.
/// Both vectors are re-checked: a dimension mismatch or a norm outside
/// tolerance fails with [`VerifyError::InvalidEmbedding`] rather than
/// producing a silently wrong score. Floating-point overshoot is clamped
/// to [-1, 1].
///
/// O(D), pure, no side effects.
pub fn cosine_similarity(a: &Embedding, b: &Embedding) -> VerifyResult<f32> {
    if a.dim() != b.dim() {
        return Err(VerifyError::DimensionMismatch {
            expected: a.dim(),
            actual: b.dim(),
        });
    }
    a.require_unit_norm()?;
    b.require_unit_norm()?;
    Ok(a.dot(b).clamp(-1.0, 1.0))
}
