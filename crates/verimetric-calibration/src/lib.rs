//! Threshold calibration and offline evaluation for the verification core.
//!
//! Given similarity scores for pairs with known ground truth, this crate
//! selects the equal-error-rate operating threshold, traces the ROC curve,
//! and reports classification metrics at the chosen point. The
//! [`evaluation`] module ties it together: parse a pair list, score it
//! through an [`verimetric_core::EmbeddingProvider`], calibrate, report.

pub mod calibrator;
pub mod evaluation;
pub mod metrics;
pub mod pairfile;

pub use calibrator::{calibrate, CalibrationResult, RocPoint, VerificationPair};
pub use evaluation::{EvaluationReport, EvaluationRunner, ScoreSummary};
pub use metrics::{ClassificationMetrics, ConfusionMatrix};
pub use pairfile::{PairEntry, PairFile};
