//! Index-order mining over labeled embedding pools.
//!
//! Mining is deterministic: for a given anchor the positive is the first
//! other sample sharing its label and the negative is the first sample with
//! a different label, both by lowest index. Anchors missing either role are
//! skipped.

use crate::batch::LabeledEmbedding;

/// Indices of one mined (anchor, positive, negative) triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripletIndices {
    pub anchor: usize,
    pub positive: usize,
    pub negative: usize,
}

/// First other sample with the same label as the anchor, by lowest index.
pub fn first_positive(samples: &[LabeledEmbedding], anchor: usize) -> Option<usize> {
    let label = samples[anchor].label;
    samples
        .iter()
        .enumerate()
        .find(|(i, s)| *i != anchor && s.label == label)
        .map(|(i, _)| i)
}

/// First sample with a label different from the anchor's, by lowest index.
pub fn first_negative(samples: &[LabeledEmbedding], anchor: usize) -> Option<usize> {
    let label = samples[anchor].label;
    samples
        .iter()
        .enumerate()
        .find(|(_, s)| s.label != label)
        .map(|(i, _)| i)
}

/// Mine one triplet per anchor that has both a positive and a negative.
pub fn mine_triplets(samples: &[LabeledEmbedding]) -> Vec<TripletIndices> {
    let mut triplets = Vec::new();
    for anchor in 0..samples.len() {
        let (Some(positive), Some(negative)) = (
            first_positive(samples, anchor),
            first_negative(samples, anchor),
        ) else {
            continue;
        };
        triplets.push(TripletIndices {
            anchor,
            positive,
            negative,
        });
    }
    triplets
}

/// Every unordered pair (i, j) with i < j, tagged genuine when labels match.
pub fn mine_pairs(samples: &[LabeledEmbedding]) -> Vec<(usize, usize, bool)> {
    let mut pairs = Vec::new();
    for i in 0..samples.len() {
        for j in (i + 1)..samples.len() {
            pairs.push((i, j, samples[i].label == samples[j].label));
        }
    }
    pairs
}
