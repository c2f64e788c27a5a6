//! Challenge Judge - Application Entry Point
//!
//! This is the main entry point for the judging server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use bollard::Docker;
use chrono::Utc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use challenge_judge::{
    config::CONFIG,
    constants::API_BASE_PATH,
    handlers,
    judge::{pool::ExecutorPool, sandbox::DockerSandbox},
    models::{Challenge, TestCase},
    state::AppState,
    store::{InMemoryChallenges, InMemorySubmissions, TracingNotifier},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting judge server...");

    // Initialize Docker client
    tracing::info!("Connecting to Docker...");
    let docker = Docker::connect_with_socket(
        &CONFIG.docker.socket_path,
        120,
        bollard::API_DEFAULT_VERSION,
    )?;

    // Verify Docker connection
    let docker_info = docker.version().await?;
    tracing::info!(
        "Connected to Docker version: {}",
        docker_info.version.unwrap_or_default()
    );

    // Initialize storage and seed sample challenges
    let challenges = Arc::new(InMemoryChallenges::new());
    seed_challenges(&challenges).await;
    let submissions = Arc::new(InMemorySubmissions::new());

    // Start the executor pool
    let pool = ExecutorPool::start(
        Arc::new(DockerSandbox::new(docker)),
        submissions.clone(),
        Arc::new(TracingNotifier),
        CONFIG.judge.clone(),
    );
    tracing::info!(
        workers = CONFIG.judge.worker_count,
        queue_capacity = CONFIG.judge.queue_capacity,
        "Executor pool started"
    );

    // Create application state
    let state = AppState::new(challenges, submissions, pool, CONFIG.clone());

    // Build the router
    let app = Router::new()
        .nest(API_BASE_PATH, handlers::routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start the server
    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Seed the in-memory repository with a sample challenge so the service is
/// usable out of the box.
async fn seed_challenges(challenges: &InMemoryChallenges) {
    let challenge = Challenge {
        id: Uuid::new_v4(),
        title: "Reverse a string".to_string(),
        description: "Read a single line from stdin and print it reversed.".to_string(),
        language: "python".to_string(),
        test_cases: vec![
            TestCase {
                input: "hello".to_string(),
                expected_output: "olleh".to_string(),
                is_public: true,
            },
            TestCase {
                input: "abc".to_string(),
                expected_output: "cba".to_string(),
                is_public: true,
            },
            TestCase {
                input: "racecar".to_string(),
                expected_output: "racecar".to_string(),
                is_public: false,
            },
        ],
        time_limit_seconds: CONFIG.judge.default_time_limit_seconds,
        memory_limit_mb: CONFIG.judge.default_memory_limit_mb,
        solution: Some("print(input()[::-1])\n".to_string()),
        created_at: Utc::now(),
    };
    tracing::info!(challenge_id = %challenge.id, "Seeded sample challenge");
    challenges.insert(challenge).await;
}
