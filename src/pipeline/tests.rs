use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_stream::StreamExt;

use super::*;
use crate::candidate::{Candidate, RecentItem};
use crate::constants::RankWeights;
use crate::embedding::{EmbeddingError, SentenceEmbedder, TextEmbedder};
use crate::fetcher::{AboutRecord, CandidateSource, Facet, FetchOutcome, StaticCandidateSource};
use crate::scoring::ScriptedCompletionProvider;

fn community(name: &str, description: &str, upvotes: &[u64]) -> Candidate {
    Candidate {
        name: name.to_string(),
        description: description.to_string(),
        subscribers: 1000,
        active_users: 25,
        rules: vec![format!("Rule 1: be nice in r/{name}")],
        recent_items: upvotes
            .iter()
            .enumerate()
            .map(|(i, &u)| RecentItem::new(format!("{name} thread {i}"), u, 2, ""))
            .collect(),
    }
}

fn fixture_source() -> StaticCandidateSource {
    StaticCandidateSource::new().with_candidates([
        community("fitness", "Workouts and training", &[120, 80, 300]),
        community("cooking", "Recipes and kitchen tips", &[15, 22, 9]),
        community("gadgets", "New hardware and devices", &[400, 1000, 250]),
    ])
}

fn fixture_completions() -> ScriptedCompletionProvider {
    ScriptedCompletionProvider::new()
        .with_score("fitness", 0.3)
        .with_score("cooking", 0.6)
        .with_reply("gadgets", "I would rather not say.")
}

fn engine_with(
    source: StaticCandidateSource,
    completions: ScriptedCompletionProvider,
) -> RankingEngine {
    RankingEngine::new(
        Arc::new(source),
        Arc::new(SentenceEmbedder::stub().unwrap()),
        Arc::new(completions),
    )
}

fn engine() -> RankingEngine {
    engine_with(fixture_source(), fixture_completions())
}

async fn collect(stream: tokio_stream::wrappers::ReceiverStream<ProgressEvent>) -> Vec<ProgressEvent> {
    stream.collect().await
}

struct FailingEmbedder;

impl TextEmbedder for FailingEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::InferenceFailed {
            reason: "device lost".to_string(),
        })
    }

    fn embedding_dim(&self) -> usize {
        384
    }
}

struct CountingEmbedder {
    inner: SentenceEmbedder,
    texts: Mutex<Vec<String>>,
}

impl CountingEmbedder {
    fn new() -> Self {
        Self {
            inner: SentenceEmbedder::stub().unwrap(),
            texts: Mutex::new(Vec::new()),
        }
    }

    fn texts(&self) -> Vec<String> {
        self.texts.lock().clone()
    }

    fn count_of(&self, text: &str) -> usize {
        self.texts.lock().iter().filter(|t| t.as_str() == text).count()
    }
}

impl TextEmbedder for CountingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.texts.lock().push(text.to_string());
        self.inner.embed(text)
    }

    fn embedding_dim(&self) -> usize {
        self.inner.embedding_dim()
    }
}

struct PanickingSource;

#[async_trait]
impl CandidateSource for PanickingSource {
    async fn fetch_about(&self, _name: &str) -> FetchOutcome<AboutRecord> {
        panic!("about endpoint exploded");
    }

    async fn fetch_rules(&self, _name: &str) -> FetchOutcome<Vec<String>> {
        FetchOutcome::Fetched(Vec::new())
    }

    async fn fetch_recent_items(&self, _name: &str) -> FetchOutcome<Vec<RecentItem>> {
        FetchOutcome::Fetched(Vec::new())
    }
}

mod progress_events {
    use super::*;

    #[test]
    fn test_scraping_percentages() {
        assert_eq!(scraping_progress(0, 3), 0);
        assert_eq!(scraping_progress(1, 3), 20);
        assert_eq!(scraping_progress(2, 3), 40);
        assert_eq!(scraping_progress(6, 7), 51);
    }

    #[test]
    fn test_scoring_percentages() {
        assert_eq!(scoring_progress(0, 3), 60);
        assert_eq!(scoring_progress(1, 3), 71);
        assert_eq!(scoring_progress(2, 3), 83);
    }

    #[test]
    fn test_messages() {
        let event = ProgressEvent::scraping("rust", 0, 2);
        assert_eq!(event.message, "Scraping r/rust... (1/2)");
        assert_eq!(event.subreddit.as_deref(), Some("rust"));

        let event = ProgressEvent::scoring("rust", 1, 2);
        assert_eq!(event.message, "Scoring r/rust... (2/2)");
    }

    #[test]
    fn test_wire_form_omits_absent_fields() {
        let json = serde_json::to_value(ProgressEvent::scraping("a", 0, 1)).unwrap();
        assert_eq!(json["phase"], "scraping");
        assert_eq!(json["progress"], 0);
        assert!(json.get("result").is_none());

        let json = serde_json::to_value(ProgressEvent::done(Default::default())).unwrap();
        assert_eq!(json["phase"], "done");
        assert_eq!(json["progress"], 100);
        assert_eq!(json["message"], "Analysis complete");
        assert!(json.get("subreddit").is_none());
        assert_eq!(json["result"]["total"], 0);
    }

    #[test]
    fn test_sse_frame() {
        let frame = ProgressEvent::error("boom", 20).to_sse_frame().unwrap();
        assert!(frame.starts_with("data: {"));
        assert!(frame.ends_with("}\n\n"));
        assert!(frame.contains("\"phase\":\"error\""));
    }
}

mod ranking_runs {
    use super::*;

    #[tokio::test]
    async fn test_rank_returns_every_candidate() {
        let report = engine()
            .rank(["fitness", "cooking", "gadgets"], "smart kitchen scale")
            .await
            .unwrap();

        assert_eq!(report.total, 3);
        assert_eq!(report.results.len(), 3);
        assert!(
            report
                .results
                .windows(2)
                .all(|w| w[0].final_score >= w[1].final_score)
        );
    }

    #[tokio::test]
    async fn test_unusable_policy_reply_scores_zero() {
        let report = engine()
            .rank(["fitness", "gadgets"], "smart kitchen scale")
            .await
            .unwrap();

        let gadgets = report.results.iter().find(|r| r.name == "gadgets").unwrap();
        assert_eq!(gadgets.breakdown.tolerance, 0.0);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let engine = engine();
        let report = engine.rank(Vec::<String>::new(), "anything").await.unwrap();
        assert!(report.is_empty());
        assert_eq!(report.total, 0);
    }

    #[tokio::test]
    async fn test_names_are_normalised_and_deduplicated() {
        let source = Arc::new(fixture_source());
        let engine = RankingEngine::new(
            source.clone(),
            Arc::new(SentenceEmbedder::stub().unwrap()),
            Arc::new(fixture_completions()),
        );

        let report = engine
            .rank(["r/fitness", "/r/cooking/", "Fitness", "  "], "protein bars")
            .await
            .unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(source.requested_names(), vec!["fitness", "cooking"]);
    }

    #[tokio::test]
    async fn test_unknown_candidate_degrades_not_fails() {
        let report = engine()
            .rank(["fitness", "doesnotexist"], "protein bars")
            .await
            .unwrap();

        let missing = report
            .results
            .iter()
            .find(|r| r.name == "doesnotexist")
            .unwrap();
        assert!(missing.description.is_empty());
        assert!(missing.recent_items.is_empty());
        assert_eq!(missing.subscribers, 0);
    }

    #[tokio::test]
    async fn test_fetch_order_is_input_order() {
        let source = Arc::new(fixture_source());
        let engine = RankingEngine::new(
            source.clone(),
            Arc::new(SentenceEmbedder::stub().unwrap()),
            Arc::new(fixture_completions()),
        );

        engine
            .rank(["gadgets", "fitness"], "phone case")
            .await
            .unwrap();

        let calls = source.calls();
        let expected = vec![
            ("gadgets".to_string(), Facet::About),
            ("gadgets".to_string(), Facet::Rules),
            ("gadgets".to_string(), Facet::RecentItems),
            ("fitness".to_string(), Facet::About),
            ("fitness".to_string(), Facet::Rules),
            ("fitness".to_string(), Facet::RecentItems),
        ];
        assert_eq!(calls, expected);
    }

    #[tokio::test]
    async fn test_identical_candidates_keep_input_order() {
        let twin = |name: &str| Candidate {
            name: name.to_string(),
            ..community("x", "Same text", &[10, 10])
        };
        let source = StaticCandidateSource::new().with_candidates([twin("beta"), twin("alpha")]);
        // Context excludes the name, so both score identically.
        let engine = engine_with(source, ScriptedCompletionProvider::new());

        let report = engine.rank(["beta", "alpha"], "widgets").await.unwrap();
        assert_eq!(report.names(), vec!["beta", "alpha"]);
        assert_eq!(report.results[0].final_score, report.results[1].final_score);
    }

    #[tokio::test]
    async fn test_embedding_failure_is_an_error() {
        let engine = RankingEngine::new(
            Arc::new(fixture_source()),
            Arc::new(FailingEmbedder),
            Arc::new(fixture_completions()),
        );

        let err = engine.rank(["fitness"], "protein bars").await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Embedding(EmbeddingError::Product { .. })
        ));
    }

    #[tokio::test]
    async fn test_product_embedded_once_per_run() {
        let embedder = Arc::new(CountingEmbedder::new());
        let engine = RankingEngine::new(
            Arc::new(fixture_source()),
            embedder.clone(),
            Arc::new(fixture_completions()),
        );

        let report = engine
            .rank(["fitness", "cooking", "gadgets"], "protein bars")
            .await
            .unwrap();

        assert_eq!(report.total, 3);
        assert_eq!(embedder.texts().len(), 4);
        assert_eq!(embedder.count_of("protein bars"), 1);
        assert_eq!(embedder.texts()[0], "protein bars");
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let result = engine().with_weights(RankWeights::new(0.5, 0.5, 0.5));
        assert!(matches!(result, Err(PipelineError::InvalidWeights(_))));
    }

    #[test]
    fn test_valid_weights_accepted() {
        let weights = RankWeights::new(0.4, 0.4, 0.2);
        let engine = engine().with_weights(weights).unwrap();
        assert_eq!(engine.weights(), &weights);
    }
}

mod streaming {
    use super::*;

    #[tokio::test]
    async fn test_event_sequence_for_three_candidates() {
        let engine = Arc::new(engine());
        let events = collect(engine.rank_stream(["fitness", "cooking", "gadgets"], "scale")).await;

        let phases: Vec<Phase> = events.iter().map(|e| e.phase).collect();
        assert_eq!(
            phases,
            vec![
                Phase::Scraping,
                Phase::Scraping,
                Phase::Scraping,
                Phase::Scoring,
                Phase::Scoring,
                Phase::Scoring,
                Phase::Done,
            ]
        );

        let progress: Vec<u8> = events.iter().map(|e| e.progress).collect();
        assert_eq!(progress, vec![0, 20, 40, 60, 71, 83, 100]);
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(events.iter().filter(|e| e.progress == 100).count(), 1);

        let last = events.last().unwrap();
        assert!(last.is_terminal());
        assert!(last.subreddit.is_none());
        assert_eq!(last.result.as_ref().unwrap().total, 3);
    }

    #[tokio::test]
    async fn test_only_terminal_event_carries_result() {
        let engine = Arc::new(engine());
        let events = collect(engine.rank_stream(["fitness", "cooking"], "scale")).await;

        let (terminal, rest) = events.split_last().unwrap();
        assert!(terminal.result.is_some());
        assert!(rest.iter().all(|e| e.result.is_none() && e.subreddit.is_some()));
    }

    #[tokio::test]
    async fn test_empty_batch_streams_single_done() {
        let engine = Arc::new(engine());
        let events = collect(engine.rank_stream(Vec::<String>::new(), "scale")).await;

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].phase, Phase::Done);
        assert_eq!(events[0].progress, 100);
        assert!(events[0].result.as_ref().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stream_matches_direct_rank() {
        let names = ["gadgets", "fitness", "cooking"];
        let product = "wireless earbuds for runners";

        let direct = engine().rank(names, product).await.unwrap();
        let events = collect(Arc::new(engine()).rank_stream(names, product)).await;
        let streamed = events.last().unwrap().result.clone().unwrap();

        assert_eq!(direct.names(), streamed.names());
        for (a, b) in direct.results.iter().zip(&streamed.results) {
            assert!((a.final_score - b.final_score).abs() <= 1e-9);
            assert_eq!(a.breakdown, b.breakdown);
        }
    }

    #[tokio::test]
    async fn test_embedding_failure_ends_with_error_event() {
        let engine = Arc::new(RankingEngine::new(
            Arc::new(fixture_source()),
            Arc::new(FailingEmbedder),
            Arc::new(fixture_completions()),
        ));

        let events = collect(engine.rank_stream(["fitness", "cooking"], "scale")).await;
        let last = events.last().unwrap();

        assert_eq!(last.phase, Phase::Error);
        assert!(last.result.is_none());
        assert!(last.message.contains("device lost"));
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
        assert!(events.windows(2).all(|w| w[0].progress <= w[1].progress));
    }

    #[tokio::test]
    async fn test_panic_becomes_error_event() {
        let engine = Arc::new(RankingEngine::new(
            Arc::new(PanickingSource),
            Arc::new(SentenceEmbedder::stub().unwrap()),
            Arc::new(ScriptedCompletionProvider::new()),
        ));

        let events = collect(engine.rank_stream(["boom"], "scale")).await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].phase, Phase::Scraping);
        assert_eq!(events[1].phase, Phase::Error);
        assert!(events[1].message.contains("about endpoint exploded"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_stream_stops_network_calls() {
        let source = Arc::new(fixture_source().with_latency(Duration::from_millis(200)));
        let completions = Arc::new(fixture_completions());
        let engine = Arc::new(RankingEngine::new(
            source.clone(),
            Arc::new(SentenceEmbedder::stub().unwrap()),
            completions.clone(),
        ));

        let mut stream = engine.rank_stream(["fitness", "cooking", "gadgets"], "scale");
        let first = stream.next().await.unwrap();
        assert_eq!(first.subreddit.as_deref(), Some("fitness"));
        drop(stream);

        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(source.requested_names(), vec!["fitness"]);
        assert_eq!(source.calls().len(), 3);
        assert_eq!(completions.call_count(), 0);
    }

    #[tokio::test]
    async fn test_stream_embeds_product_once() {
        let embedder = Arc::new(CountingEmbedder::new());
        let engine = Arc::new(RankingEngine::new(
            Arc::new(fixture_source()),
            embedder.clone(),
            Arc::new(fixture_completions()),
        ));

        let events =
            collect(engine.rank_stream(["fitness", "cooking", "gadgets"], "protein bars")).await;

        assert_eq!(events.last().unwrap().phase, Phase::Done);
        assert_eq!(embedder.texts().len(), 4);
        assert_eq!(embedder.count_of("protein bars"), 1);
    }
}
