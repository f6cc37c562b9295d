//! Classification metrics at a fixed operating threshold.

use serde::{Deserialize, Serialize};

use crate::calibrator::VerificationPair;

/// Confusion matrix with genuine as the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// Genuine pairs accepted.
    pub true_positives: usize,
    /// Impostor pairs rejected.
    pub true_negatives: usize,
    /// Impostor pairs accepted.
    pub false_positives: usize,
    /// Genuine pairs rejected.
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    /// Tally scored pairs against a threshold; `score >= threshold` accepts.
    pub fn from_scores(pairs: &[VerificationPair], threshold: f32) -> Self {
        let mut m = Self::default();
        for p in pairs {
            let accepted = p.score >= threshold;
            match (p.genuine, accepted) {
                (true, true) => m.true_positives += 1,
                (true, false) => m.false_negatives += 1,
                (false, true) => m.false_positives += 1,
                (false, false) => m.true_negatives += 1,
            }
        }
        m
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }
}

/// Derived rates. Undefined ratios (zero denominator) report 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f32,
    pub precision: f32,
    pub recall: f32,
    pub f1: f32,
    /// False acceptance rate: accepted impostors over all impostors.
    pub far: f32,
    /// False rejection rate: rejected genuines over all genuines.
    pub frr: f32,
}

fn ratio(num: usize, den: usize) -> f32 {
    if den == 0 {
        0.0
    } else {
        num as f32 / den as f32
    }
}

impl ClassificationMetrics {
    pub fn from_confusion(m: &ConfusionMatrix) -> Self {
        let precision = ratio(m.true_positives, m.true_positives + m.false_positives);
        let recall = ratio(m.true_positives, m.true_positives + m.false_negatives);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        Self {
            accuracy: ratio(m.true_positives + m.true_negatives, m.total()),
            precision,
            recall,
            f1,
            far: ratio(m.false_positives, m.false_positives + m.true_negatives),
            frr: ratio(m.false_negatives, m.false_negatives + m.true_positives),
        }
    }
}
