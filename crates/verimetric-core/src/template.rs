//! Identity templates and the mean-embedding aggregator.
//!
//! A template is the enrolled reference embedding representing one identity,
//! built by averaging several sample embeddings and renormalizing to unit
//! length. Templates are replaced wholesale on re-enrollment, never merged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::embedding::{Embedding, DEGENERATE_NORM_EPSILON};
use crate::error::{VerifyError, VerifyResult};

/// Policy floor for enrollment sample count. Two samples is not a
/// mathematical minimum — the mean of one vector is well defined — but a
/// single-sample template is too noisy to trust.
pub const MIN_ENROLLMENT_SAMPLES: usize = 2;

/// Enrolled reference embedding for one identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Caller-supplied unique identity key.
    pub identity_id: String,
    /// Unit-length aggregate embedding.
    pub vector: Embedding,
    /// Number of samples the template was built from.
    pub sample_count: usize,
    /// When the template was first created.
    pub created_at: DateTime<Utc>,
    /// When the template was last rebuilt.
    pub updated_at: DateTime<Utc>,
}

/// Build a template from enrollment sample embeddings.
///
/// Computes the component-wise arithmetic mean and renormalizes to unit
/// length. Pure function over its inputs.
///
/// # Errors
///
/// - [`VerifyError::InsufficientSamples`] with fewer than
///   [`MIN_ENROLLMENT_SAMPLES`] embeddings
/// - [`VerifyError::DimensionMismatch`] when inputs disagree on dimension
/// - [`VerifyError::DegenerateTemplate`] when the mean vector's norm falls
///   below epsilon (inputs cancel out) — never silently produces NaN
pub fn aggregate_template(identity_id: &str, embeddings: &[Embedding]) -> VerifyResult<Template> {
    if embeddings.len() < MIN_ENROLLMENT_SAMPLES {
        return Err(VerifyError::InsufficientSamples {
            got: embeddings.len(),
            min: MIN_ENROLLMENT_SAMPLES,
        });
    }

    let dim = embeddings[0].dim();
    for e in embeddings {
        e.require_dim(dim)?;
    }

    let mut mean = vec![0.0f32; dim];
    for e in embeddings {
        for (acc, v) in mean.iter_mut().zip(e.data()) {
            *acc += v;
        }
    }
    let n = embeddings.len() as f32;
    for acc in &mut mean {
        *acc /= n;
    }

    let mean_norm = mean.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mean_norm < DEGENERATE_NORM_EPSILON {
        return Err(VerifyError::DegenerateTemplate { norm: mean_norm });
    }

    let vector = Embedding::new(mean)?.normalized()?;
    let now = Utc::now();
    Ok(Template {
        identity_id: identity_id.to_string(),
        vector,
        sample_count: embeddings.len(),
        created_at: now,
        updated_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(data: Vec<f32>) -> Embedding {
        Embedding::new(data).unwrap().normalized().unwrap()
    }

    #[test]
    fn test_aggregate_identical_vectors_is_identity() {
        let v = unit(vec![0.6, 0.8, 0.0]);
        let copies = vec![v.clone(), v.clone(), v.clone(), v.clone()];
        let template = aggregate_template("alice", &copies).unwrap();

        assert_eq!(template.sample_count, 4);
        assert_eq!(template.identity_id, "alice");
        for (got, want) in template.vector.data().iter().zip(v.data()) {
            assert!((got - want).abs() < 1e-6, "expected {want}, got {got}");
        }
    }

    #[test]
    fn test_aggregate_result_is_unit_norm() {
        let a = unit(vec![1.0, 0.0, 0.0]);
        let b = unit(vec![0.0, 1.0, 0.0]);
        let template = aggregate_template("bob", &[a, b]).unwrap();
        assert!(template.vector.is_unit_norm());
    }

    #[test]
    fn test_single_sample_fails() {
        let v = unit(vec![1.0, 0.0]);
        assert!(matches!(
            aggregate_template("alice", &[v]),
            Err(VerifyError::InsufficientSamples { got: 1, min: 2 })
        ));
    }

    #[test]
    fn test_empty_fails() {
        assert!(matches!(
            aggregate_template("alice", &[]),
            Err(VerifyError::InsufficientSamples { got: 0, .. })
        ));
    }

    #[test]
    fn test_cancelling_inputs_are_degenerate() {
        let a = unit(vec![1.0, 0.0]);
        let b = unit(vec![-1.0, 0.0]);
        assert!(matches!(
            aggregate_template("alice", &[a, b]),
            Err(VerifyError::DegenerateTemplate { .. })
        ));
    }

    #[test]
    fn test_mixed_dimensions_fail() {
        let a = unit(vec![1.0, 0.0]);
        let b = unit(vec![1.0, 0.0, 0.0]);
        assert!(matches!(
            aggregate_template("alice", &[a, b]),
            Err(VerifyError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_no_nan_in_output() {
        let a = unit(vec![0.9, 0.1, 0.0]);
        let b = unit(vec![0.8, 0.2, 0.0]);
        let template = aggregate_template("alice", &[a, b]).unwrap();
        assert!(template.vector.data().iter().all(|v| v.is_finite()));
    }
}
