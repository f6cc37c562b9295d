//! Core verification engine for embedding-based biometric authentication.
//!
//! This crate owns everything downstream of the embedding model: template
//! aggregation, cosine scoring, threshold decisions with alert escalation,
//! and the in-memory template store. Feature extraction and the neural
//! model live behind the [`EmbeddingProvider`] trait; threshold selection
//! lives in `verimetric-calibration`; loss computation for model training
//! lives in `verimetric-training`.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use verimetric_core::{TemplateStore, VerificationService, VerifierConfig};
//! # use verimetric_core::EmbeddingProvider;
//! # fn provider() -> Arc<dyn EmbeddingProvider> { unimplemented!() }
//!
//! # fn main() -> verimetric_core::VerifyResult<()> {
//! let service = VerificationService::new(
//!     provider(),
//!     Arc::new(TemplateStore::new()),
//!     VerifierConfig::default().with_threshold(0.37),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod decision;
pub mod embedding;
pub mod error;
pub mod provider;
pub mod service;
pub mod similarity;
pub mod store;
pub mod template;

pub use config::VerifierConfig;
pub use decision::{decide, Decision, Outcome};
pub use embedding::{Embedding, DEGENERATE_NORM_EPSILON, UNIT_NORM_TOLERANCE};
pub use error::{VerifyError, VerifyResult};
pub use provider::{EmbeddingProvider, Modality, RawSample};
pub use service::{ComparisonOutcome, EnrollmentOutcome, VerificationOutcome, VerificationService};
pub use similarity::cosine_similarity;
pub use store::TemplateStore;
pub use template::{aggregate_template, Template, MIN_ENROLLMENT_SAMPLES};
