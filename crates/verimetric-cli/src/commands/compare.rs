//! `verimetric compare`: score two embedding files against a threshold.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::error;

use verimetric_core::{
    RawSample, TemplateStore, VerificationService, VerifierConfig,
};

use crate::provider::StoredEmbeddingProvider;
use crate::ModalityArg;

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// First embedding file
    pub sample_a: PathBuf,

    /// Second embedding file
    pub sample_b: PathBuf,

    /// Embedding dimension of the exported files
    #[arg(long, default_value_t = 512)]
    pub dimension: usize,

    /// Accept threshold on cosine similarity
    #[arg(long, default_value_t = 0.5)]
    pub threshold: f32,

    /// Modality tag recorded in logs
    #[arg(long, value_enum, default_value_t = ModalityArg::Voice)]
    pub modality: ModalityArg,
}

pub async fn handle_compare(args: CompareArgs) -> i32 {
    let config = VerifierConfig {
        dimension: args.dimension,
        ..Default::default()
    }
    .with_threshold(args.threshold);

    let service = match VerificationService::new(
        Arc::new(StoredEmbeddingProvider::new(args.dimension)),
        Arc::new(TemplateStore::new()),
        config,
    ) {
        Ok(s) => s,
        Err(e) => {
            error!(%e, "invalid configuration");
            return 1;
        }
    };

    let modality = args.modality.into();
    let a = RawSample::from_path(modality, &args.sample_a);
    let b = RawSample::from_path(modality, &args.sample_b);

    match service.compare(&a, &b).await {
        Ok(outcome) => match serde_json::to_string_pretty(&outcome) {
            Ok(json) => {
                println!("{json}");
                if outcome.verified {
                    0
                } else {
                    1
                }
            }
            Err(e) => {
                error!(%e, "cannot serialize outcome");
                1
            }
        },
        Err(e) => {
            error!(%e, "comparison failed");
            1
        }
    }
}
