//! `verimetric evaluate`: calibrate a threshold from a verification pair
//! list of pre-computed embedding files.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::{error, info};

use verimetric_calibration::{EvaluationRunner, PairFile};

use crate::provider::StoredEmbeddingProvider;
use crate::ModalityArg;

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Pair list file: `label path_a path_b` per line, label 1=genuine 0=impostor
    #[arg(long)]
    pub pairs: PathBuf,

    /// Embedding dimension of the exported files
    #[arg(long, default_value_t = 512)]
    pub dimension: usize,

    /// Modality tag recorded in logs and reports
    #[arg(long, value_enum, default_value_t = ModalityArg::Voice)]
    pub modality: ModalityArg,

    /// Write the full JSON report here
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub async fn handle_evaluate(args: EvaluateArgs) -> i32 {
    let pair_file = match PairFile::load(&args.pairs) {
        Ok(f) => f,
        Err(e) => {
            error!(path = %args.pairs.display(), %e, "cannot load pair list");
            return 1;
        }
    };
    info!(
        pairs = pair_file.len(),
        skipped = pair_file.skipped_lines,
        "pair list loaded"
    );

    let provider = Arc::new(StoredEmbeddingProvider::new(args.dimension));
    let runner = EvaluationRunner::new(provider, args.modality.into());

    let report = match runner.run(&pair_file).await {
        Ok(r) => r,
        Err(e) => {
            error!(%e, "evaluation failed");
            return 1;
        }
    };

    println!("pairs:      {} valid, {} failed, {} lines skipped",
        report.valid_pairs, report.failed_pairs, report.skipped_lines);
    println!("threshold:  {:.4}", report.calibration.threshold);
    println!("eer:        {:.2}%", report.calibration.eer * 100.0);
    println!("far/frr:    {:.2}% / {:.2}%",
        report.calibration.far * 100.0, report.calibration.frr * 100.0);
    println!("auc:        {:.4}", report.calibration.auc);
    println!("accuracy:   {:.2}%", report.metrics.accuracy * 100.0);
    println!("precision:  {:.2}%", report.metrics.precision * 100.0);
    println!("recall:     {:.2}%", report.metrics.recall * 100.0);
    println!("f1:         {:.2}%", report.metrics.f1 * 100.0);

    if let Some(output) = &args.output {
        if let Err(e) = report.write_json(output) {
            error!(path = %output.display(), %e, "cannot write report");
            return 1;
        }
        info!(path = %output.display(), "report written");
    }
    0
}
