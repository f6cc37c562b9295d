//! Loss computation for contrastive training of biometric embedding models.
//!
//! The model itself (forward pass, gradients, optimization) lives outside
//! this workspace; these types score finished embeddings so an external
//! trainer can monitor separation quality, and so evaluation tooling can
//! report the same quantities the model was trained against.

pub mod batch;
pub mod loss;
pub mod miner;

pub use batch::{LabeledEmbedding, PairLoader, TrainingBatch, TrainingPair};
pub use loss::{ContrastiveLossEngine, LossConfig, LossMode};
pub use miner::{first_negative, first_positive, mine_pairs, mine_triplets, TripletIndices};
