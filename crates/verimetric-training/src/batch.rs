//! Training data containers and the epoch loader.
//!
//! Two shapes of training data exist: pre-paired samples with a
//! genuine/impostor label ([`TrainingPair`]), and flat pools of embeddings
//! labeled by identity ([`LabeledEmbedding`]) from which pairs or triplets
//! are mined at loss time.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use verimetric_core::Embedding;

/// One pre-paired training example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingPair {
    /// First embedding of the pair.
    pub a: Embedding,
    /// Second embedding of the pair.
    pub b: Embedding,
    /// True when both samples come from the same identity.
    pub genuine: bool,
}

impl TrainingPair {
    pub fn new(a: Embedding, b: Embedding, genuine: bool) -> Self {
        Self { a, b, genuine }
    }
}

/// A batch of pre-paired examples handed to the loss engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingBatch {
    /// Pairs in this batch.
    pub pairs: Vec<TrainingPair>,
}

impl TrainingBatch {
    pub fn new(pairs: Vec<TrainingPair>) -> Self {
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of genuine pairs in the batch.
    pub fn genuine_count(&self) -> usize {
        self.pairs.iter().filter(|p| p.genuine).count()
    }

    /// Number of impostor pairs in the batch.
    pub fn impostor_count(&self) -> usize {
        self.pairs.len() - self.genuine_count()
    }
}

/// An embedding tagged with the identity it was drawn from. Input to
/// mined-pair and triplet losses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledEmbedding {
    /// The embedding itself.
    pub embedding: Embedding,
    /// Opaque identity label; equality means same identity.
    pub label: u32,
}

impl LabeledEmbedding {
    pub fn new(embedding: Embedding, label: u32) -> Self {
        Self { embedding, label }
    }
}

/// Deterministic epoch loader over pre-paired data.
///
/// Shuffles with a seeded RNG so runs are reproducible, then yields
/// fixed-size batches; the final batch may be short.
pub struct PairLoader {
    pairs: Vec<TrainingPair>,
    batch_size: usize,
    rng: StdRng,
}

impl PairLoader {
    /// `batch_size` is clamped to at least 1.
    pub fn new(pairs: Vec<TrainingPair>, batch_size: usize, seed: u64) -> Self {
        Self {
            pairs,
            batch_size: batch_size.max(1),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Total number of pairs across all batches.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Shuffle and split into batches for one epoch.
    pub fn epoch(&mut self) -> Vec<TrainingBatch> {
        self.pairs.shuffle(&mut self.rng);
        let batches: Vec<TrainingBatch> = self
            .pairs
            .chunks(self.batch_size)
            .map(|chunk| TrainingBatch::new(chunk.to_vec()))
            .collect();
        debug!(
            pairs = self.pairs.len(),
            batches = batches.len(),
            "epoch prepared"
        );
        batches
    }
}
