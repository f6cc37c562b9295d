//! Offline evaluation: score a pair list through a provider, calibrate,
//! and report metrics at the resulting operating point.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use verimetric_core::{
    cosine_similarity, Embedding, EmbeddingProvider, Modality, RawSample, VerifyError,
    VerifyResult,
};

use crate::calibrator::{calibrate, CalibrationResult, VerificationPair};
use crate::metrics::{ClassificationMetrics, ConfusionMatrix};
use crate::pairfile::{PairEntry, PairFile};

/// Distribution summary of one score class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub count: usize,
    pub mean: f32,
    pub min: f32,
    pub max: f32,
}

impl ScoreSummary {
    fn from_scores(scores: &[f32]) -> Self {
        if scores.is_empty() {
            return Self {
                count: 0,
                mean: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0f32;
        for &s in scores {
            min = min.min(s);
            max = max.max(s);
            sum += s;
        }
        Self {
            count: scores.len(),
            mean: sum / scores.len() as f32,
            min,
            max,
        }
    }
}

/// Full evaluation output, serializable for downstream tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Pairs scored successfully.
    pub valid_pairs: usize,
    /// Pairs dropped because the provider failed on either side.
    pub failed_pairs: usize,
    /// Malformed pair-list lines dropped during parsing.
    pub skipped_lines: usize,
    /// Genuine score distribution.
    pub genuine_scores: ScoreSummary,
    /// Impostor score distribution.
    pub impostor_scores: ScoreSummary,
    /// Calibrated operating point and ROC curve.
    pub calibration: CalibrationResult,
    /// Confusion matrix at the calibrated threshold.
    pub confusion: ConfusionMatrix,
    /// Derived metrics at the calibrated threshold.
    pub metrics: ClassificationMetrics,
}

impl EvaluationReport {
    /// Serialize the report as pretty JSON to a file.
    pub fn write_json(&self, path: &Path) -> VerifyResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Drives a full offline evaluation through an embedding provider.
pub struct EvaluationRunner {
    provider: Arc<dyn EmbeddingProvider>,
    modality: Modality,
}

impl EvaluationRunner {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, modality: Modality) -> Self {
        Self { provider, modality }
    }

    async fn embed(&self, path: &Path) -> VerifyResult<Embedding> {
        let sample = RawSample::from_path(self.modality, path);
        let embedding = self.provider.embed(&sample).await?;
        embedding.require_dim(self.provider.dimension())?;
        embedding.require_unit_norm()?;
        Ok(embedding)
    }

    /// Score one entry; any failure on either side drops the pair.
    async fn score_entry(&self, entry: &PairEntry) -> VerifyResult<f32> {
        let a = self.embed(&entry.path_a).await?;
        let b = self.embed(&entry.path_b).await?;
        cosine_similarity(&a, &b)
    }

    /// Score every pair, calibrate on the survivors, and report.
    ///
    /// Provider failures are counted, not fatal; the run fails only when no
    /// valid pair remains or calibration lacks a class.
    pub async fn run(&self, pair_file: &PairFile) -> VerifyResult<EvaluationReport> {
        let mut scored = Vec::with_capacity(pair_file.len());
        let mut failed_pairs = 0usize;

        for entry in &pair_file.entries {
            match self.score_entry(entry).await {
                Ok(score) => scored.push(VerificationPair::new(score, entry.genuine)),
                Err(err) => {
                    warn!(
                        path_a = %entry.path_a.display(),
                        path_b = %entry.path_b.display(),
                        %err,
                        "pair dropped"
                    );
                    failed_pairs += 1;
                }
            }
        }

        if scored.is_empty() {
            return Err(VerifyError::InsufficientCalibrationData {
                genuine: 0,
                impostor: 0,
            });
        }
        info!(
            valid = scored.len(),
            failed = failed_pairs,
            "pair scoring complete"
        );

        let genuine: Vec<f32> = scored.iter().filter(|p| p.genuine).map(|p| p.score).collect();
        let impostor: Vec<f32> = scored.iter().filter(|p| !p.genuine).map(|p| p.score).collect();

        let calibration = calibrate(&scored)?;
        let confusion = ConfusionMatrix::from_scores(&scored, calibration.threshold);
        let metrics = ClassificationMetrics::from_confusion(&confusion);

        Ok(EvaluationReport {
            valid_pairs: scored.len(),
            failed_pairs,
            skipped_lines: pair_file.skipped_lines,
            genuine_scores: ScoreSummary::from_scores(&genuine),
            impostor_scores: ScoreSummary::from_scores(&impostor),
            calibration,
            confusion,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Maps each path stem to a fixed planar embedding; `bad` paths fail.
    struct PathProvider;

    #[async_trait]
    impl EmbeddingProvider for PathProvider {
        fn dimension(&self) -> usize {
            2
        }

        async fn embed(&self, sample: &RawSample) -> VerifyResult<Embedding> {
            let RawSample::Path { path, .. } = sample else {
                return Err(VerifyError::Provider {
                    message: "expected path sample".into(),
                });
            };
            let angle = match path.to_str() {
                Some(s) if s.contains("bad") => {
                    return Err(VerifyError::Provider {
                        message: format!("cannot read {}", path.display()),
                    })
                }
                Some(s) if s.contains("alice") => 0.0f32,
                Some(s) if s.contains("alia") => 0.1f32,
                _ => std::f32::consts::FRAC_PI_2,
            };
            Embedding::new(vec![angle.cos(), angle.sin()])
        }
    }

    fn runner() -> EvaluationRunner {
        EvaluationRunner::new(Arc::new(PathProvider), Modality::Voice)
    }

    #[tokio::test]
    async fn test_full_run() {
        let pairs = PairFile::parse(
            "1 alice1.wav alia1.wav\n\
             1 alice2.wav alice3.wav\n\
             0 alice4.wav bob1.wav\n\
             0 alia2.wav bob2.wav\n",
        );
        let report = runner().run(&pairs).await.unwrap();
        assert_eq!(report.valid_pairs, 4);
        assert_eq!(report.failed_pairs, 0);
        assert_eq!(report.genuine_scores.count, 2);
        assert_eq!(report.impostor_scores.count, 2);
        // Genuine scores near 1, impostor near 0: perfectly separable.
        assert!(report.calibration.eer.abs() < 1e-6);
        assert!((report.metrics.accuracy - 1.0).abs() < 1e-6);
        assert!(report.genuine_scores.mean > report.impostor_scores.mean);
    }

    #[tokio::test]
    async fn test_failed_pairs_counted_not_fatal() {
        let pairs = PairFile::parse(
            "1 alice1.wav alice2.wav\n\
             1 bad.wav alice3.wav\n\
             0 alice4.wav bob1.wav\n",
        );
        let report = runner().run(&pairs).await.unwrap();
        assert_eq!(report.valid_pairs, 2);
        assert_eq!(report.failed_pairs, 1);
    }

    #[tokio::test]
    async fn test_all_failed_is_error() {
        let pairs = PairFile::parse("1 bad1.wav bad2.wav\n");
        assert!(matches!(
            runner().run(&pairs).await,
            Err(VerifyError::InsufficientCalibrationData { .. })
        ));
    }

    #[tokio::test]
    async fn test_skipped_lines_propagated() {
        let pairs = PairFile::parse(
            "garbage\n\
             1 alice1.wav alice2.wav\n\
             0 alice3.wav bob1.wav\n",
        );
        let report = runner().run(&pairs).await.unwrap();
        assert_eq!(report.skipped_lines, 1);
    }

    #[tokio::test]
    async fn test_report_json_roundtrip() {
        let pairs = PairFile::parse("1 alice1.wav alice2.wav\n0 alice3.wav bob1.wav\n");
        let report = runner().run(&pairs).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.json");
        report.write_json(&out).unwrap();

        let back: EvaluationReport =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(back.valid_pairs, report.valid_pairs);
        assert_eq!(back.confusion, report.confusion);
    }

    #[test]
    fn test_score_summary_empty() {
        let s = ScoreSummary::from_scores(&[]);
        assert_eq!(s.count, 0);
        assert_eq!(s.mean, 0.0);
    }
}
