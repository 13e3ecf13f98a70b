//! Peersearch HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use peersearch::cache::SearchCache;
use peersearch::config::Config;
use peersearch::embedding::HashEmbedder;
use peersearch::gateway::{HandlerState, create_router_with_state};
use peersearch::metrics::MetricsRecorder;
use peersearch::rerank::HttpReranker;
use peersearch::search::SearchOrchestrator;
use peersearch::vectordb::QdrantSearchClient;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        qdrant_url = %config.qdrant_url,
        collection = %config.collection,
        "Peersearch starting"
    );

    let metrics = Arc::new(MetricsRecorder::new());
    let cache = Arc::new(SearchCache::new(
        config.cache_config(),
        Arc::clone(&metrics),
    ));

    let vector_store = Arc::new(QdrantSearchClient::new(&config.qdrant_url, &config.collection).await?);

    tracing::warn!("No embedding backend wired in, using deterministic stub embedder");
    let embedder = Arc::new(HashEmbedder::new());

    let reranker = match config.reranker_config() {
        Some(reranker_config) => {
            tracing::info!(
                base_url = %reranker_config.base_url,
                timeout_ms = reranker_config.timeout.as_millis() as u64,
                max_retries = reranker_config.max_retries,
                "Reranking enabled"
            );
            Some(Arc::new(HttpReranker::new(
                reranker_config,
                Arc::clone(&metrics),
            )?))
        }
        None => {
            tracing::warn!("No PEERSEARCH_RERANKER_URL configured, reranking disabled");
            None
        }
    };

    let orchestrator = Arc::new(SearchOrchestrator::new(
        vector_store,
        embedder,
        reranker,
        cache,
        metrics,
        config.searcher_config(),
    ));

    let state = HandlerState::new(orchestrator);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Peersearch shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("PEERSEARCH_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
