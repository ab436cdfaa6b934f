use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quizarena::{api, config::EngineConfig, corpus, state::QuestionBank, state::SessionRegistry, sweeper};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quizarena=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting quizarena...");

    let config = EngineConfig::from_env();

    let questions = corpus::load_questions(&config.corpus_path);
    if questions.is_empty() {
        tracing::warn!(
            "Question pool is empty; sessions cannot start until {} provides questions",
            config.corpus_path.display()
        );
    }
    let bank = QuestionBank::new(questions);

    let registry = Arc::new(
        SessionRegistry::new(bank, config.session.clone()).with_eviction_policy(config.eviction),
    );

    // Background task keeps the registry bounded
    sweeper::spawn_eviction_sweeper(registry.clone(), config.sweep_interval);

    let app = api::router(registry)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
