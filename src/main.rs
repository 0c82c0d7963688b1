//! Scout command-line entrypoint.

use std::io::Write;
use std::sync::Arc;

use mimalloc::MiMalloc;
use tokio::signal;
use tokio_stream::StreamExt;

use scout::config::Config;
use scout::embedding::{EmbedderConfig, SentenceEmbedder};
use scout::fetcher::HttpCandidateSource;
use scout::pipeline::RankingEngine;
use scout::scoring::{CompletionProvider, GenaiCompletionProvider, NeutralCompletionProvider};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USAGE: &str = "usage: scout [--stream] \"<product description>\" <community>...\n       scout --health-check";

struct Invocation {
    stream: bool,
    product: String,
    names: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    let Some(invocation) = parse_args(args) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        source_url = %config.source_url,
        policy_model = %config.policy_model,
        candidates = invocation.names.len(),
        "Scout starting"
    );

    let engine = Arc::new(build_engine(&config)?);

    if invocation.stream {
        run_streaming(engine, invocation).await
    } else {
        let report = engine.rank(&invocation.names, &invocation.product).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

fn parse_args(args: Vec<String>) -> Option<Invocation> {
    let mut stream = false;
    let mut positional = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--stream" => stream = true,
            "-h" | "--help" => return None,
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let product = positional.next()?;
    Some(Invocation {
        stream,
        product,
        names: positional.collect(),
    })
}

fn build_engine(config: &Config) -> anyhow::Result<RankingEngine> {
    let source = HttpCandidateSource::new(config)?;

    let embedder_config = EmbedderConfig::from_model_dir(config.embedding_model_dir.clone());
    if embedder_config.testing_stub {
        tracing::warn!("No SCOUT_EMBEDDING_MODEL_DIR configured, running embedder in stub mode");
    }
    let embedder = SentenceEmbedder::load(embedder_config)?;

    let completions: Arc<dyn CompletionProvider> = if config.mock_provider {
        tracing::warn!("SCOUT_MOCK_PROVIDER set, policy scores are fixed at 0.5");
        Arc::new(NeutralCompletionProvider)
    } else {
        Arc::new(GenaiCompletionProvider::from_config(config))
    };

    Ok(RankingEngine::new(
        Arc::new(source),
        Arc::new(embedder),
        completions,
    ))
}

async fn run_streaming(engine: Arc<RankingEngine>, invocation: Invocation) -> anyhow::Result<()> {
    let mut events = engine.rank_stream(invocation.names, invocation.product);
    let mut stdout = std::io::stdout().lock();

    loop {
        tokio::select! {
            event = events.next() => {
                let Some(event) = event else { break };
                stdout.write_all(event.to_sse_frame()?.as_bytes())?;
                stdout.flush()?;
            }
            _ = signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, abandoning run");
                break;
            }
        }
    }

    Ok(())
}

fn run_health_check() -> i32 {
    match Config::from_env().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => {
            println!("ok: source {}", config.source_url);
            0
        }
        Err(e) => {
            eprintln!("config error: {}", e);
            1
        }
    }
}
