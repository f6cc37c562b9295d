//! Enrollment, verification, and ad hoc comparison operations.
//!
//! [`VerificationService`] wires the external [`EmbeddingProvider`] to the
//! [`TemplateStore`] and the decision engine. All math is synchronous; the
//! only suspension points are provider calls.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::VerifierConfig;
use crate::decision::{decide, Decision};
use crate::embedding::Embedding;
use crate::error::VerifyResult;
use crate::provider::{EmbeddingProvider, RawSample};
use crate::similarity::cosine_similarity;
use crate::store::TemplateStore;
use crate::template::aggregate_template;

/// Successful enrollment summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentOutcome {
    /// Identity the template was stored under.
    pub identity_id: String,
    /// Number of samples aggregated into the template.
    pub sample_count: usize,
    /// Embedding dimension of the template.
    pub dimension: usize,
}

/// Result of verifying one probe against an enrolled template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationOutcome {
    /// Identity the probe was verified against.
    pub identity_id: String,
    /// Classification of the probe's similarity score.
    pub decision: Decision,
    /// Wall-clock time spent on this call, including the provider.
    pub latency_ms: f64,
    /// When the verification completed.
    pub timestamp: DateTime<Utc>,
}

/// Result of comparing two samples directly, without enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutcome {
    /// Cosine similarity between the two samples.
    pub similarity: f32,
    /// Whether similarity met the default threshold.
    pub verified: bool,
    /// Threshold used for the verified flag.
    pub threshold: f32,
    /// Wall-clock time spent on this call.
    pub latency_ms: f64,
    /// When the comparison completed.
    pub timestamp: DateTime<Utc>,
}

/// Orchestrates enroll/verify/compare over a provider and a shared store.
pub struct VerificationService {
    provider: Arc<dyn EmbeddingProvider>,
    store: Arc<TemplateStore>,
    config: VerifierConfig,
}

impl VerificationService {
    /// Create a service, validating the configuration up front.
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        store: Arc<TemplateStore>,
        config: VerifierConfig,
    ) -> VerifyResult<Self> {
        config.validate()?;
        Ok(Self {
            provider,
            store,
            config,
        })
    }

    /// The shared template store.
    pub fn store(&self) -> &Arc<TemplateStore> {
        &self.store
    }

    /// Active configuration.
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Enroll an identity from its sample sequence.
    ///
    /// Atomic: every sample must embed successfully before the store is
    /// touched; a provider failure on any sample leaves prior state intact.
    pub async fn enroll(
        &self,
        identity_id: &str,
        samples: &[RawSample],
    ) -> VerifyResult<EnrollmentOutcome> {
        info!(identity_id, samples = samples.len(), "enrollment request");

        let mut embeddings = Vec::with_capacity(samples.len());
        for sample in samples {
            embeddings.push(self.embed_checked(sample).await?);
        }

        let template = aggregate_template(identity_id, &embeddings)?;
        let sample_count = template.sample_count;
        let dimension = template.vector.dim();
        self.store.enroll(template);

        info!(identity_id, sample_count, "enrolled");
        Ok(EnrollmentOutcome {
            identity_id: identity_id.to_string(),
            sample_count,
            dimension,
        })
    }

    /// Verify a probe sample against an enrolled identity.
    ///
    /// Fails with [`crate::error::VerifyError::NotFound`] when the identity
    /// has no template — never a default-reject or default-accept decision.
    pub async fn verify(
        &self,
        identity_id: &str,
        probe: &RawSample,
    ) -> VerifyResult<VerificationOutcome> {
        let started = Instant::now();

        let template = self.store.get(identity_id)?;
        let embedding = self.embed_checked(probe).await?;
        let similarity = cosine_similarity(&embedding, &template.vector)?;
        let decision = decide(similarity, self.config.threshold, self.config.escalation_margin)?;

        if decision.critical {
            error!(
                identity_id,
                similarity,
                threshold = self.config.threshold,
                "critical verification failure"
            );
        } else if decision.alert {
            warn!(
                identity_id,
                similarity,
                threshold = self.config.threshold,
                "verification rejected"
            );
        }

        Ok(VerificationOutcome {
            identity_id: identity_id.to_string(),
            decision,
            latency_ms: started.elapsed().as_secs_f64() * 1000.0,
            timestamp: Utc::now(),
        })
    }

    /// Compare two arbitrary samples against the default threshold,
    /// without touching the store.
    pub async fn compare(&self, a: &RawSample, b: &RawSample) -> VerifyResult<ComparisonOutcome> {
        let started = Instant::now();

        let ea = self.embed_checked(a).await?;
        let eb = self.embed_checked(b).await?;
        let similarity = cosine_similarity(&ea, &eb)?;
        let verified = similarity >= self.config.threshold;

        info!(similarity, verified, "direct comparison");
        Ok(ComparisonOutcome {
            similarity,
            verified,
            threshold: self.config.threshold,
            latency_ms: started.elapsed().as_secs_f64() * 1000.0,
            timestamp: Utc::now(),
        })
    }

    /// Embed one sample and enforce the provider's contract on the result.
    async fn embed_checked(&self, sample: &RawSample) -> VerifyResult<Embedding> {
        let embedding = self.provider.embed(sample).await?;
        embedding.require_dim(self.config.dimension)?;
        embedding.require_unit_norm()?;
        Ok(embedding)
    }
}
