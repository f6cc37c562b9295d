//! Contrastive and triplet losses over finished embeddings.
//!
//! The engine scores embeddings the model has already produced; gradient
//! computation and parameter updates belong to the external training stack.
//! All similarities are cosine over unit-norm vectors, so the loss surface
//! matches exactly what verification measures at inference time.

use serde::{Deserialize, Serialize};
use tracing::debug;

use verimetric_core::{cosine_similarity, VerifyError, VerifyResult};

use crate::batch::{LabeledEmbedding, TrainingBatch};
use crate::miner::{mine_pairs, mine_triplets};

/// Which loss the engine computes over a labeled pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossMode {
    /// Pre-paired genuine/impostor pairs.
    Pairwise,
    /// Every unordered pair mined from a labeled pool.
    AllPairs,
    /// Anchor/positive/negative triplets mined from a labeled pool.
    Triplet,
}

/// Loss engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LossConfig {
    /// Impostor-side margin: impostor pairs with similarity at or below the
    /// margin contribute nothing. Also the separation margin for triplets.
    pub margin: f32,
    /// Reweight hard examples (low-similarity genuine, high-similarity
    /// impostor pairs).
    pub hard_mining: bool,
    /// Loss applied by [`ContrastiveLossEngine::labeled_loss`].
    pub mode: LossMode,
}

impl Default for LossConfig {
    fn default() -> Self {
        Self {
            margin: 0.2,
            hard_mining: true,
            mode: LossMode::Pairwise,
        }
    }
}

impl LossConfig {
    pub fn validate(&self) -> VerifyResult<()> {
        if !self.margin.is_finite() || !(-1.0..=1.0).contains(&self.margin) {
            return Err(VerifyError::Config {
                message: format!("loss margin {} must be within [-1, 1]", self.margin),
            });
        }
        Ok(())
    }
}

/// Computes batch losses for contrastive training of embedding models.
#[derive(Debug, Clone)]
pub struct ContrastiveLossEngine {
    config: LossConfig,
}

impl ContrastiveLossEngine {
    pub fn new(config: LossConfig) -> VerifyResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LossConfig {
        &self.config
    }

    /// Loss contribution of a single scored pair.
    ///
    /// Genuine: `(1 - s)^2`. Impostor: `max(0, s - margin)^2`. With hard
    /// mining enabled, genuine terms are weighted by `1 + (1 - s)` and
    /// impostor terms by `1 + s`, pushing the optimizer toward dissimilar
    /// genuine pairs and similar impostor pairs.
    pub fn pair_term(&self, similarity: f32, genuine: bool) -> f32 {
        let base = if genuine {
            (1.0 - similarity).powi(2)
        } else {
            (similarity - self.config.margin).max(0.0).powi(2)
        };
        if !self.config.hard_mining {
            return base;
        }
        let weight = if genuine {
            1.0 + (1.0 - similarity)
        } else {
            1.0 + similarity
        };
        base * weight
    }

    /// Mean pairwise loss over a batch of pre-paired examples.
    ///
    /// # Errors
    ///
    /// [`VerifyError::EmptyBatch`] on an empty batch; similarity errors
    /// (dimension mismatch, norm violation) propagate per pair.
    pub fn batch_loss(&self, batch: &TrainingBatch) -> VerifyResult<f32> {
        if batch.is_empty() {
            return Err(VerifyError::EmptyBatch);
        }
        let mut total = 0.0f32;
        for pair in &batch.pairs {
            let s = cosine_similarity(&pair.a, &pair.b)?;
            total += self.pair_term(s, pair.genuine);
        }
        let loss = total / batch.len() as f32;
        debug!(
            pairs = batch.len(),
            genuine = batch.genuine_count(),
            loss,
            "pairwise batch loss"
        );
        Ok(loss)
    }

    /// Mean pairwise loss over every unordered pair in a labeled pool.
    ///
    /// A single-sample pool has no pairs and contributes zero loss.
    pub fn all_pairs_loss(&self, samples: &[LabeledEmbedding]) -> VerifyResult<f32> {
        if samples.is_empty() {
            return Err(VerifyError::EmptyBatch);
        }
        let pairs = mine_pairs(samples);
        if pairs.is_empty() {
            return Ok(0.0);
        }
        let mut total = 0.0f32;
        for (i, j, genuine) in &pairs {
            let s = cosine_similarity(&samples[*i].embedding, &samples[*j].embedding)?;
            total += self.pair_term(s, *genuine);
        }
        Ok(total / pairs.len() as f32)
    }

    /// Mean triplet hinge loss over mined triplets:
    /// `max(0, margin - (sim(anchor, positive) - sim(anchor, negative)))`.
    ///
    /// Pools where no anchor has both a positive and a negative contribute
    /// zero loss.
    pub fn triplet_loss(&self, samples: &[LabeledEmbedding]) -> VerifyResult<f32> {
        if samples.is_empty() {
            return Err(VerifyError::EmptyBatch);
        }
        let triplets = mine_triplets(samples);
        if triplets.is_empty() {
            return Ok(0.0);
        }
        let mut total = 0.0f32;
        for t in &triplets {
            let sim_pos =
                cosine_similarity(&samples[t.anchor].embedding, &samples[t.positive].embedding)?;
            let sim_neg =
                cosine_similarity(&samples[t.anchor].embedding, &samples[t.negative].embedding)?;
            total += (self.config.margin - (sim_pos - sim_neg)).max(0.0);
        }
        Ok(total / triplets.len() as f32)
    }

    /// Dispatch on the configured mode for labeled-pool input. `Pairwise`
    /// over a labeled pool reduces to all mined pairs.
    pub fn labeled_loss(&self, samples: &[LabeledEmbedding]) -> VerifyResult<f32> {
        match self.config.mode {
            LossMode::Pairwise | LossMode::AllPairs => self.all_pairs_loss(samples),
            LossMode::Triplet => self.triplet_loss(samples),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::TrainingPair;
    use verimetric_core::Embedding;

    const TOL: f32 = 1e-6;

    fn engine(margin: f32, hard_mining: bool) -> ContrastiveLossEngine {
        ContrastiveLossEngine::new(LossConfig {
            margin,
            hard_mining,
            mode: LossMode::Pairwise,
        })
        .unwrap()
    }

    fn unit(dim: usize, axis: usize) -> Embedding {
        let mut v = vec![0.0f32; dim];
        v[axis] = 1.0;
        Embedding::new(v).unwrap()
    }

    /// Unit vector at `angle` radians from the x axis.
    fn planar(angle: f32) -> Embedding {
        Embedding::new(vec![angle.cos(), angle.sin()]).unwrap()
    }

    #[test]
    fn test_genuine_identical_pair_is_zero_loss() {
        let e = engine(0.2, false);
        let batch = TrainingBatch::new(vec![TrainingPair::new(unit(4, 0), unit(4, 0), true)]);
        assert!(e.batch_loss(&batch).unwrap().abs() < TOL);
    }

    #[test]
    fn test_impostor_at_half_similarity() {
        // s = 0.5, margin = 0.2: (0.5 - 0.2)^2 = 0.09
        let e = engine(0.2, false);
        let batch = TrainingBatch::new(vec![TrainingPair::new(
            planar(0.0),
            planar(std::f32::consts::FRAC_PI_3),
            false,
        )]);
        let loss = e.batch_loss(&batch).unwrap();
        assert!((loss - 0.09).abs() < 1e-4, "loss was {loss}");
    }

    #[test]
    fn test_impostor_below_margin_is_free() {
        let e = engine(0.2, false);
        let batch = TrainingBatch::new(vec![TrainingPair::new(unit(4, 0), unit(4, 1), false)]);
        assert!(e.batch_loss(&batch).unwrap().abs() < TOL);
    }

    #[test]
    fn test_hard_mining_upweights_hard_negative() {
        // s = 0.9 impostor: base (0.7)^2, weight 1.9
        let a = planar(0.0);
        let b = planar(0.9f32.acos());

        let plain = engine(0.2, false);
        let mined = engine(0.2, true);
        let batch = TrainingBatch::new(vec![TrainingPair::new(a, b, false)]);

        let base = plain.batch_loss(&batch).unwrap();
        let weighted = mined.batch_loss(&batch).unwrap();
        assert!(weighted > base);
        assert!((weighted - base * 1.9).abs() < 1e-4);
    }

    #[test]
    fn test_hard_mining_upweights_hard_positive() {
        // s = 0.3 genuine: base (0.7)^2, weight 1.7
        let batch = TrainingBatch::new(vec![TrainingPair::new(
            planar(0.0),
            planar(0.3f32.acos()),
            true,
        )]);
        let base = engine(0.2, false).batch_loss(&batch).unwrap();
        let weighted = engine(0.2, true).batch_loss(&batch).unwrap();
        assert!((weighted - base * 1.7).abs() < 1e-4);
    }

    #[test]
    fn test_batch_loss_is_mean() {
        let e = engine(0.2, false);
        let zero = TrainingPair::new(unit(4, 0), unit(4, 0), true);
        let hot = TrainingPair::new(planar(0.0), planar(std::f32::consts::FRAC_PI_3), false);
        let single = e
            .batch_loss(&TrainingBatch::new(vec![hot.clone()]))
            .unwrap();
        let mixed = e.batch_loss(&TrainingBatch::new(vec![zero, hot])).unwrap();
        assert!((mixed - single / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_batch_is_error() {
        let e = engine(0.2, true);
        assert!(matches!(
            e.batch_loss(&TrainingBatch::default()),
            Err(VerifyError::EmptyBatch)
        ));
        assert!(matches!(
            e.all_pairs_loss(&[]),
            Err(VerifyError::EmptyBatch)
        ));
        assert!(matches!(e.triplet_loss(&[]), Err(VerifyError::EmptyBatch)));
    }

    #[test]
    fn test_all_pairs_single_sample_is_zero() {
        let e = engine(0.2, true);
        let pool = vec![LabeledEmbedding::new(unit(4, 0), 1)];
        assert!(e.all_pairs_loss(&pool).unwrap().abs() < TOL);
    }

    #[test]
    fn test_all_pairs_mixed_pool() {
        // Two identical genuine samples and one orthogonal impostor:
        // (0,1) genuine s=1 -> 0; (0,2) and (1,2) impostor s=0 -> 0.
        let e = engine(0.2, false);
        let pool = vec![
            LabeledEmbedding::new(unit(4, 0), 1),
            LabeledEmbedding::new(unit(4, 0), 1),
            LabeledEmbedding::new(unit(4, 1), 2),
        ];
        assert!(e.all_pairs_loss(&pool).unwrap().abs() < TOL);
    }

    #[test]
    fn test_triplet_separated_pool_is_zero() {
        // positive sim 1.0, negative sim 0.0: margin 0.2 - 1.0 < 0
        let e = engine(0.2, false);
        let pool = vec![
            LabeledEmbedding::new(unit(4, 0), 1),
            LabeledEmbedding::new(unit(4, 0), 1),
            LabeledEmbedding::new(unit(4, 1), 2),
        ];
        assert!(e.triplet_loss(&pool).unwrap().abs() < TOL);
    }

    #[test]
    fn test_triplet_violating_pool() {
        // Anchor closer to the negative than the positive.
        let e = engine(0.2, false);
        let pool = vec![
            LabeledEmbedding::new(planar(0.0), 1),
            LabeledEmbedding::new(planar(std::f32::consts::FRAC_PI_2), 1),
            LabeledEmbedding::new(planar(0.1), 2),
        ];
        let loss = e.triplet_loss(&pool).unwrap();
        assert!(loss > 0.2, "violating triplets must pay the margin, got {loss}");
    }

    #[test]
    fn test_triplet_no_valid_triplets_is_zero() {
        let e = engine(0.2, false);
        let pool = vec![
            LabeledEmbedding::new(unit(4, 0), 1),
            LabeledEmbedding::new(unit(4, 1), 1),
        ];
        assert!(e.triplet_loss(&pool).unwrap().abs() < TOL);
    }

    #[test]
    fn test_labeled_dispatch() {
        let pool = vec![
            LabeledEmbedding::new(unit(4, 0), 1),
            LabeledEmbedding::new(unit(4, 0), 1),
            LabeledEmbedding::new(unit(4, 1), 2),
        ];
        let all_pairs = ContrastiveLossEngine::new(LossConfig {
            mode: LossMode::AllPairs,
            ..Default::default()
        })
        .unwrap();
        let triplet = ContrastiveLossEngine::new(LossConfig {
            mode: LossMode::Triplet,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            all_pairs.labeled_loss(&pool).unwrap(),
            all_pairs.all_pairs_loss(&pool).unwrap()
        );
        assert_eq!(
            triplet.labeled_loss(&pool).unwrap(),
            triplet.triplet_loss(&pool).unwrap()
        );
    }

    #[test]
    fn test_invalid_margin_rejected() {
        assert!(ContrastiveLossEngine::new(LossConfig {
            margin: 1.5,
            ..Default::default()
        })
        .is_err());
        assert!(ContrastiveLossEngine::new(LossConfig {
            margin: f32::NAN,
            ..Default::default()
        })
        .is_err());
    }
}
