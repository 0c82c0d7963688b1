use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

use futures_util::FutureExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info};

use crate::candidate::{Candidate, dedupe_names};
use crate::constants::{PROGRESS_CHANNEL_CAPACITY, RankWeights};
use crate::embedding::TextEmbedder;
use crate::fetcher::CandidateSource;
use crate::ranking::{RankingReport, rank_candidates};
use crate::scoring::{
    CompletionProvider, PolicyScorer, RawSignals, SemanticScorer, activity_score,
};

use super::error::PipelineError;
use super::progress::ProgressEvent;

/// Where progress events go. `Silent` never cancels.
struct Emitter {
    sender: Option<mpsc::Sender<ProgressEvent>>,
    last_progress: AtomicU8,
}

impl Emitter {
    fn silent() -> Self {
        Self {
            sender: None,
            last_progress: AtomicU8::new(0),
        }
    }

    fn channel(sender: mpsc::Sender<ProgressEvent>) -> Self {
        Self {
            sender: Some(sender),
            last_progress: AtomicU8::new(0),
        }
    }

    /// Returns `false` once the consumer has detached.
    async fn emit(&self, event: ProgressEvent) -> bool {
        self.last_progress.fetch_max(event.progress, Ordering::Relaxed);
        match &self.sender {
            Some(sender) => sender.send(event).await.is_ok(),
            None => true,
        }
    }

    fn last_progress(&self) -> u8 {
        self.last_progress.load(Ordering::Relaxed)
    }
}

/// Fetches, scores and ranks a batch of candidates against a product description.
///
/// All collaborators are injected. Candidates are processed one at a time in
/// input order; scores are never cached across runs.
pub struct RankingEngine {
    source: Arc<dyn CandidateSource>,
    semantic: SemanticScorer,
    policy: PolicyScorer,
    weights: RankWeights,
}

impl std::fmt::Debug for RankingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingEngine")
            .field("semantic", &self.semantic)
            .field("weights", &self.weights)
            .finish_non_exhaustive()
    }
}

impl RankingEngine {
    pub fn new(
        source: Arc<dyn CandidateSource>,
        embedder: Arc<dyn TextEmbedder>,
        completions: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            source,
            semantic: SemanticScorer::new(embedder),
            policy: PolicyScorer::new(completions),
            weights: RankWeights::DEFAULT,
        }
    }

    /// Replaces the default weights. Rejects weights that fail validation.
    pub fn with_weights(mut self, weights: RankWeights) -> Result<Self, PipelineError> {
        weights.validate()?;
        self.weights = weights;
        Ok(self)
    }

    pub fn weights(&self) -> &RankWeights {
        &self.weights
    }

    /// Ranks the batch to completion without progress events.
    pub async fn rank<I, S>(&self, names: I, product: &str) -> Result<RankingReport, PipelineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = dedupe_names(names);
        let report = self.execute(&names, product, &Emitter::silent()).await?;
        Ok(report.unwrap_or_default())
    }

    /// Ranks the batch on a spawned task, streaming progress events.
    ///
    /// The stream ends after exactly one terminal event (`done` or `error`).
    /// Dropping the stream stops the run before the next candidate's network calls.
    pub fn rank_stream<I, S>(
        self: Arc<Self>,
        names: I,
        product: impl Into<String>,
    ) -> ReceiverStream<ProgressEvent>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = dedupe_names(names);
        let product = product.into();
        let (tx, rx) = mpsc::channel(PROGRESS_CHANNEL_CAPACITY);

        tokio::spawn(async move {
            let emitter = Emitter::channel(tx.clone());
            let outcome = AssertUnwindSafe(self.execute(&names, &product, &emitter))
                .catch_unwind()
                .await;

            let terminal = match outcome {
                Ok(Ok(Some(report))) => ProgressEvent::done(report),
                Ok(Ok(None)) => return,
                Ok(Err(err)) => {
                    error!(error = %err, "Ranking run failed");
                    ProgressEvent::error(err.to_string(), emitter.last_progress())
                }
                Err(panic) => {
                    let err = PipelineError::TaskPanicked {
                        reason: panic_message(panic.as_ref()),
                    };
                    error!(error = %err, "Ranking run panicked");
                    ProgressEvent::error(err.to_string(), emitter.last_progress())
                }
            };

            if tx.send(terminal).await.is_err() {
                debug!("Consumer detached before the terminal event");
            }
        });

        ReceiverStream::new(rx)
    }

    /// Runs the pipeline. `Ok(None)` means the consumer detached.
    async fn execute(
        &self,
        names: &[String],
        product: &str,
        emitter: &Emitter,
    ) -> Result<Option<RankingReport>, PipelineError> {
        let total = names.len();
        if total == 0 {
            debug!("Empty candidate batch");
            return Ok(Some(RankingReport::default()));
        }

        let start = Instant::now();
        info!(candidates = total, "Ranking run started");

        let mut candidates: Vec<Candidate> = Vec::with_capacity(total);
        for (index, name) in names.iter().enumerate() {
            if !emitter.emit(ProgressEvent::scraping(name, index, total)).await {
                info!(candidate = %name, "Consumer detached, stopping before fetch");
                return Ok(None);
            }

            let fetch = self.source.fetch_candidate(name).await;
            candidates.push(fetch.candidate);
        }

        let product_embedding = self.semantic.embed_product(product)?;

        let mut scored: Vec<(Candidate, RawSignals)> = Vec::with_capacity(total);
        for (index, candidate) in candidates.into_iter().enumerate() {
            if !emitter
                .emit(ProgressEvent::scoring(&candidate.name, index, total))
                .await
            {
                info!(candidate = %candidate.name, "Consumer detached, stopping before scoring");
                return Ok(None);
            }

            let semantic = self.semantic.score(&product_embedding, &candidate)?;
            let tolerance = self.policy.score(&candidate).await.score();
            let activity = activity_score(&candidate);

            scored.push((candidate, RawSignals::new(semantic, tolerance, activity)));
        }

        let report = RankingReport::new(rank_candidates(scored, &self.weights));

        info!(
            candidates = report.total,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Ranking run complete"
        );

        Ok(Some(report))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
