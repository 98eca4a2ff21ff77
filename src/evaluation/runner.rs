//! Drives labeled cases through a retrieval strategy and records a run

use std::future::Future;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

use chrono::DateTime;
use chrono::Utc;
use serde_json::json;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::metrics;
use super::EvaluationCase;
use super::EvaluationRun;
use super::RetrievalResult;
use super::RunConfig;
use crate::errors::Result;
use crate::errors::SwaliError;

/// Microseconds since the epoch of the last issued run id
static LAST_RUN_MICROS: AtomicI64 = AtomicI64::new(0);

/// Wall-clock run id (`%Y%m%d_%H%M%S_%6f`), strictly increasing per process
pub fn next_run_id() -> (String, DateTime<Utc>) {
    let now = Utc::now().timestamp_micros();
    let mut last = LAST_RUN_MICROS.load(Ordering::Relaxed);
    let micros = loop {
        let candidate = now.max(last + 1);
        match LAST_RUN_MICROS.compare_exchange_weak(
            last,
            candidate,
            Ordering::SeqCst,
            Ordering::Relaxed,
        ) {
            Ok(_) => break candidate,
            Err(actual) => last = actual,
        }
    };

    let timestamp = DateTime::from_timestamp(
        micros.div_euclid(1_000_000),
        (micros.rem_euclid(1_000_000) * 1_000) as u32,
    )
    .unwrap_or_else(Utc::now);
    (timestamp.format("%Y%m%d_%H%M%S_%6f").to_string(), timestamp)
}

/// Batch evaluator for retrieval strategies.
///
/// A failing strategy aborts the whole batch: no partial run is returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluationRunner;

impl EvaluationRunner {
    pub const fn new() -> Self {
        Self
    }

    /// Evaluate a synchronous strategy `query -> ranked ids`
    pub fn evaluate<F>(&self, cases: &[EvaluationCase], retrieval_fn: F, k: usize) -> Result<EvaluationRun>
    where
        F: FnMut(&str) -> Result<Vec<String>>,
    {
        let (run_id, timestamp) = next_run_id();
        self.evaluate_with_id(run_id, timestamp, cases, retrieval_fn, k)
    }

    /// Same as [`Self::evaluate`] with a caller-chosen run id
    pub fn evaluate_with_id<F>(
        &self,
        run_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        cases: &[EvaluationCase],
        mut retrieval_fn: F,
        k: usize,
    ) -> Result<EvaluationRun>
    where
        F: FnMut(&str) -> Result<Vec<String>>,
    {
        let mut run = start_run(run_id.into(), timestamp, cases, k)?;

        for (idx, case) in cases.iter().enumerate() {
            let retrieved = retrieval_fn(&case.query).map_err(|e| abort(&run, idx, e))?;
            run.results.push(score_case(case, retrieved, k)?);
        }

        finish(&run);
        Ok(run)
    }

    /// Evaluate an async strategy; cases run sequentially in input order
    pub async fn evaluate_async<F, Fut>(
        &self,
        cases: &[EvaluationCase],
        mut retrieval_fn: F,
        k: usize,
    ) -> Result<EvaluationRun>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<Vec<String>>>,
    {
        let (run_id, timestamp) = next_run_id();
        let mut run = start_run(run_id, timestamp, cases, k)?;

        for (idx, case) in cases.iter().enumerate() {
            let retrieved = retrieval_fn(case.query.clone())
                .await
                .map_err(|e| abort(&run, idx, e))?;
            run.results.push(score_case(case, retrieved, k)?);
        }

        finish(&run);
        Ok(run)
    }
}

fn start_run(
    run_id: String,
    timestamp: DateTime<Utc>,
    cases: &[EvaluationCase],
    k: usize,
) -> Result<EvaluationRun> {
    if k == 0 {
        return Err(SwaliError::InvalidInput(
            "evaluation k must be positive".to_string(),
        ));
    }
    if let Some(case) = cases.iter().find(|c| c.expected_ids.is_empty()) {
        return Err(SwaliError::InvalidInput(format!(
            "case '{}' has no expected ids",
            case.query
        )));
    }
    info!("Starting evaluation run {} ({} cases, k={})", run_id, cases.len(), k);

    let mut config = RunConfig::new();
    config.insert("k".to_string(), json!(k));
    config.insert("num_cases".to_string(), json!(cases.len()));
    Ok(EvaluationRun::new(run_id, timestamp, config))
}

/// Metrics use the full ranking; only the stored ids are cut to `k`
fn score_case(case: &EvaluationCase, retrieved: Vec<String>, k: usize) -> Result<RetrievalResult> {
    let recall_at_k = metrics::recall_at_k(&retrieved, &case.expected_ids, k);
    let precision_at_k = metrics::precision_at_k(&retrieved, &case.expected_ids, k)?;
    let mrr = metrics::mrr(&retrieved, &case.expected_ids);

    debug!(
        "Case '{}': recall@{k}={recall_at_k:.3} precision@{k}={precision_at_k:.3} mrr={mrr:.3}",
        case.query
    );

    let mut retrieved_ids = retrieved;
    retrieved_ids.truncate(k);

    Ok(RetrievalResult {
        query: case.query.clone(),
        retrieved_ids,
        expected_ids: case.expected_ids.clone(),
        recall_at_k,
        precision_at_k,
        mrr,
        k,
    })
}

fn abort(run: &EvaluationRun, idx: usize, error: SwaliError) -> SwaliError {
    warn!(
        "Evaluation run {} aborted at case {}: {}",
        run.run_id, idx, error
    );
    error
}

fn finish(run: &EvaluationRun) {
    match run.summary() {
        Some(summary) => info!(
            "Run {} finished: recall={:.3} precision={:.3} mrr={:.3}",
            summary.run_id, summary.avg_recall, summary.avg_precision, summary.avg_mrr
        ),
        None => info!("Run {} finished with no cases", run.run_id),
    }
}
