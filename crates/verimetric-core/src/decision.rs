//! Threshold-based verification decisions with alert escalation.
//!
//! This is a pure classification, not a state machine: every call maps a
//! (similarity, threshold, margin) triple to exactly one [`Decision`].

use serde::{Deserialize, Serialize};

use crate::error::{VerifyError, VerifyResult};

/// Binary verification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Similarity met or exceeded the threshold.
    Verified,
    /// Similarity fell below the threshold.
    Rejected,
}

/// Result of applying a calibrated threshold to a similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Accept/reject classification.
    pub outcome: Outcome,
    /// True whenever the probe was rejected.
    pub alert: bool,
    /// True when similarity fell below `threshold - escalation_margin`.
    pub critical: bool,
    /// The similarity score that was classified.
    pub similarity: f32,
    /// The threshold in force for this decision.
    pub threshold: f32,
}

impl Decision {
    /// Convenience accessor for the accept case.
    pub fn is_verified(&self) -> bool {
        self.outcome == Outcome::Verified
    }
}

/// Classify a similarity score against a calibrated threshold.
///
/// The accept boundary is inclusive: `similarity == threshold` verifies.
/// `alert` is set on every rejection; `critical` additionally when the
/// score falls more than `escalation_margin` below the threshold.
///
/// Pure function of its three arguments — safe to call concurrently.
///
/// # Errors
///
/// - [`VerifyError::InvalidThreshold`] when the threshold is outside [-1, 1]
/// - [`VerifyError::InvalidMargin`] when the margin is negative or non-finite
pub fn decide(similarity: f32, threshold: f32, escalation_margin: f32) -> VerifyResult<Decision> {
    if !(-1.0..=1.0).contains(&threshold) || !threshold.is_finite() {
        return Err(VerifyError::InvalidThreshold { value: threshold });
    }
    if escalation_margin < 0.0 || !escalation_margin.is_finite() {
        return Err(VerifyError::InvalidMargin {
            value: escalation_margin,
        });
    }

    let verified = similarity >= threshold;
    let critical = similarity < threshold - escalation_margin;
    Ok(Decision {
        outcome: if verified {
            Outcome::Verified
        } else {
            Outcome::Rejected
        },
        alert: !verified,
        critical,
        similarity,
        threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_is_inclusive() {
        let d = decide(0.5, 0.5, 0.05).unwrap();
        assert_eq!(d.outcome, Outcome::Verified);
        assert!(!d.alert);
        assert!(!d.critical);
    }

    #[test]
    fn test_reject_sets_alert() {
        let d = decide(0.49, 0.5, 0.05).unwrap();
        assert_eq!(d.outcome, Outcome::Rejected);
        assert!(d.alert);
        assert!(!d.critical, "within margin should not escalate");
    }

    #[test]
    fn test_below_margin_is_critical() {
        let d = decide(0.5 - 0.05 - 1e-4, 0.5, 0.05).unwrap();
        assert_eq!(d.outcome, Outcome::Rejected);
        assert!(d.alert);
        assert!(d.critical);
    }

    #[test]
    fn test_zero_margin_escalates_any_rejection() {
        let d = decide(0.4999, 0.5, 0.0).unwrap();
        assert!(d.alert);
        assert!(d.critical);
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(matches!(
            decide(0.5, 1.5, 0.05),
            Err(VerifyError::InvalidThreshold { .. })
        ));
        assert!(matches!(
            decide(0.5, -1.01, 0.05),
            Err(VerifyError::InvalidThreshold { .. })
        ));
        assert!(decide(0.5, f32::NAN, 0.05).is_err());
    }

    #[test]
    fn test_invalid_margin() {
        assert!(matches!(
            decide(0.5, 0.5, -0.01),
            Err(VerifyError::InvalidMargin { .. })
        ));
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let a = decide(0.31, 0.3, 0.05).unwrap();
        let b = decide(0.31, 0.3, 0.05).unwrap();
        assert_eq!(a, b);
    }
}
