//! The [`Embedding`] vector type shared by every modality.
//!
//! Embeddings are fixed-length real vectors produced by an external,
//! already-trained model. After any producing step inside this core their
//! L2 norm is 1.0 within [`UNIT_NORM_TOLERANCE`].

use serde::{Deserialize, Serialize};

use crate::error::{VerifyError, VerifyResult};

/// Tolerance for the unit-norm invariant check.
pub const UNIT_NORM_TOLERANCE: f32 = 1e-5;

/// Norm below which a vector is considered degenerate and cannot be
/// renormalized.
pub const DEGENERATE_NORM_EPSILON: f32 = 1e-6;

/// Fixed-length vector of finite f32 values representing a biometric sample
/// in a learned feature space.
///
/// # Example
///
/// ```
/// use verimetric_core::embedding::Embedding;
///
/// let e = Embedding::new(vec![3.0, 4.0]).unwrap().normalized().unwrap();
/// assert!((e.norm() - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    data: Vec<f32>,
}

impl Embedding {
    /// Create an embedding, validating that every component is finite and
    /// the vector is non-empty.
    pub fn new(data: Vec<f32>) -> VerifyResult<Self> {
        if data.is_empty() {
            return Err(VerifyError::InvalidEmbedding {
                reason: "zero-length vector".into(),
            });
        }
        if let Some(idx) = data.iter().position(|v| !v.is_finite()) {
            return Err(VerifyError::InvalidEmbedding {
                reason: format!("non-finite value {} at index {}", data[idx], idx),
            });
        }
        Ok(Self { data })
    }

    /// Number of dimensions.
    #[inline]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    /// Immutable access to the underlying data.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Dot product with another embedding of the same dimension.
    pub fn dot(&self, other: &Self) -> f32 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// L2 norm (Euclidean magnitude).
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Whether the vector satisfies the unit-norm invariant within
    /// [`UNIT_NORM_TOLERANCE`].
    pub fn is_unit_norm(&self) -> bool {
        (self.norm() - 1.0).abs() <= UNIT_NORM_TOLERANCE
    }

    /// Return a unit-length copy.
    ///
    /// Fails with [`VerifyError::DegenerateTemplate`] when the norm is below
    /// [`DEGENERATE_NORM_EPSILON`] — renormalizing a near-zero vector would
    /// produce NaN.
    pub fn normalized(&self) -> VerifyResult<Self> {
        let norm = self.norm();
        if norm < DEGENERATE_NORM_EPSILON {
            return Err(VerifyError::DegenerateTemplate { norm });
        }
        Ok(Self {
            data: self.data.iter().map(|x| x / norm).collect(),
        })
    }

    /// Validate the unit-norm invariant, failing with
    /// [`VerifyError::InvalidEmbedding`] when violated.
    pub fn require_unit_norm(&self) -> VerifyResult<()> {
        if self.is_unit_norm() {
            Ok(())
        } else {
            Err(VerifyError::InvalidEmbedding {
                reason: format!("norm {} deviates from 1.0 beyond tolerance", self.norm()),
            })
        }
    }

    /// Validate the dimension against an expected value.
    pub fn require_dim(&self, expected: usize) -> VerifyResult<()> {
        if self.dim() == expected {
            Ok(())
        } else {
            Err(VerifyError::DimensionMismatch {
                expected,
                actual: self.dim(),
            })
        }
    }
}
