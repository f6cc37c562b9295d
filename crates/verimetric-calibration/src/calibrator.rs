//! Equal-error-rate threshold calibration from labeled score sets.
//!
//! Calibration consumes similarity scores for pairs whose ground truth is
//! known and selects the operating threshold where false acceptances and
//! false rejections balance. Every distinct observed score is a candidate
//! threshold; nothing in between can change either error rate.

use serde::{Deserialize, Serialize};
use tracing::info;

use verimetric_core::{VerifyError, VerifyResult};

/// One scored pair with ground truth, input to calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerificationPair {
    /// Cosine similarity of the pair.
    pub score: f32,
    /// True when both samples come from the same identity.
    pub genuine: bool,
}

impl VerificationPair {
    pub fn new(score: f32, genuine: bool) -> Self {
        Self { score, genuine }
    }
}

/// One point on the ROC curve, evaluated at a candidate threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    /// Candidate threshold this point was evaluated at.
    pub threshold: f32,
    /// False positive rate: impostors accepted at this threshold.
    pub fpr: f32,
    /// True positive rate: genuines accepted at this threshold.
    pub tpr: f32,
}

/// Output of a calibration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationResult {
    /// Selected operating threshold.
    pub threshold: f32,
    /// Equal error rate: mean of FAR and FRR at the operating point.
    pub eer: f32,
    /// False acceptance rate at the operating point.
    pub far: f32,
    /// False rejection rate at the operating point.
    pub frr: f32,
    /// ROC curve, ordered by descending threshold.
    pub roc_points: Vec<RocPoint>,
    /// Area under the ROC curve (trapezoidal rule).
    pub auc: f32,
}

/// Error rates of a candidate threshold over the calibration set.
/// Acceptance is inclusive: `score >= threshold` accepts.
fn rates_at(pairs: &[VerificationPair], threshold: f32) -> (f32, f32) {
    let mut fp = 0usize;
    let mut fnr_count = 0usize;
    let mut genuine = 0usize;
    let mut impostor = 0usize;
    for p in pairs {
        if p.genuine {
            genuine += 1;
            if p.score < threshold {
                fnr_count += 1;
            }
        } else {
            impostor += 1;
            if p.score >= threshold {
                fp += 1;
            }
        }
    }
    let fpr = fp as f32 / impostor as f32;
    let fnr = fnr_count as f32 / genuine as f32;
    (fpr, fnr)
}

/// Select the EER threshold for a labeled score set.
///
/// Candidates are the distinct observed scores; the winner minimizes
/// `|FPR - FNR|`, ties resolved toward the lowest threshold. The reported
/// EER is the mean of FAR and FRR at the selected point, so a degenerate
/// set where every score is identical yields an honest 0.5 rather than a
/// spurious 0.
///
/// # Errors
///
/// - [`VerifyError::InsufficientCalibrationData`] unless both classes are
///   represented
/// - [`VerifyError::Config`] on non-finite scores
pub fn calibrate(pairs: &[VerificationPair]) -> VerifyResult<CalibrationResult> {
    let genuine = pairs.iter().filter(|p| p.genuine).count();
    let impostor = pairs.len() - genuine;
    if genuine == 0 || impostor == 0 {
        return Err(VerifyError::InsufficientCalibrationData { genuine, impostor });
    }
    if let Some(bad) = pairs.iter().find(|p| !p.score.is_finite()) {
        return Err(VerifyError::Config {
            message: format!("non-finite calibration score {}", bad.score),
        });
    }

    // Distinct scores, descending.
    let mut candidates: Vec<f32> = pairs.iter().map(|p| p.score).collect();
    candidates.sort_by(|a, b| b.total_cmp(a));
    candidates.dedup();

    let mut roc_points = Vec::with_capacity(candidates.len());
    let mut best_threshold = candidates[0];
    let mut best_rates = rates_at(pairs, best_threshold);
    let mut best_diff = (best_rates.0 - best_rates.1).abs();

    for &threshold in &candidates {
        let (fpr, fnr) = rates_at(pairs, threshold);
        roc_points.push(RocPoint {
            threshold,
            fpr,
            tpr: 1.0 - fnr,
        });
        // Descending iteration: on a tie the later (lower) threshold wins.
        let diff = (fpr - fnr).abs();
        if diff <= best_diff {
            best_diff = diff;
            best_threshold = threshold;
            best_rates = (fpr, fnr);
        }
    }

    let (far, frr) = best_rates;
    let result = CalibrationResult {
        threshold: best_threshold,
        eer: (far + frr) / 2.0,
        far,
        frr,
        auc: roc_auc(&roc_points),
        roc_points,
    };
    info!(
        threshold = result.threshold,
        eer = result.eer,
        pairs = pairs.len(),
        "calibration complete"
    );
    Ok(result)
}

/// Trapezoidal area under the ROC curve, anchored at (0,0) and (1,1).
///
/// Points arrive ordered by descending threshold, which is ascending FPR.
fn roc_auc(points: &[RocPoint]) -> f32 {
    let mut area = 0.0f32;
    let mut prev = (0.0f32, 0.0f32);
    for p in points {
        area += (p.fpr - prev.0) * (p.tpr + prev.1) / 2.0;
        prev = (p.fpr, p.tpr);
    }
    area += (1.0 - prev.0) * (1.0 + prev.1) / 2.0;
    area
}
