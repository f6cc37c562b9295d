//! Runtime configuration for the verification core.
//!
//! Supplied externally (file, flags, or environment — parsing belongs to
//! the caller); the core only validates. The similarity threshold is a
//! calibration output, not a constant: the defaults here make the type
//! usable, but a deployed threshold should come from
//! `verimetric-calibration`.

use serde::{Deserialize, Serialize};

use crate::error::{VerifyError, VerifyResult};

/// Configuration surface consumed by the verification core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Embedding dimension D produced by the external model.
    pub dimension: usize,
    /// Accept threshold on cosine similarity, within [-1, 1].
    pub threshold: f32,
    /// Non-negative margin below the threshold at which a rejection
    /// escalates to critical.
    pub escalation_margin: f32,
    /// Margin for the impostor side of the contrastive loss.
    pub loss_margin: f32,
    /// Whether the loss engine reweights hard examples.
    pub hard_mining: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            dimension: 512,
            threshold: 0.5,
            escalation_margin: 0.05,
            loss_margin: 0.2,
            hard_mining: true,
        }
    }
}

impl VerifierConfig {
    /// Validate every field against its contract.
    pub fn validate(&self) -> VerifyResult<()> {
        if self.dimension == 0 {
            return Err(VerifyError::Config {
                message: "dimension must be non-zero".into(),
            });
        }
        if !(-1.0..=1.0).contains(&self.threshold) || !self.threshold.is_finite() {
            return Err(VerifyError::InvalidThreshold {
                value: self.threshold,
            });
        }
        if self.escalation_margin < 0.0 || !self.escalation_margin.is_finite() {
            return Err(VerifyError::InvalidMargin {
                value: self.escalation_margin,
            });
        }
        if !self.loss_margin.is_finite() || !(-1.0..=1.0).contains(&self.loss_margin) {
            return Err(VerifyError::Config {
                message: format!("loss_margin {} must be within [-1, 1]", self.loss_margin),
            });
        }
        Ok(())
    }

    /// Copy of this config with a freshly calibrated threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }
}
