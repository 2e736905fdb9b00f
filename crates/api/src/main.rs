use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reupholster_api::config::ServerConfig;
use reupholster_api::router::build_app_router;
use reupholster_api::state::AppState;
use reupholster_api::uploads::UploadStore;
use reupholster_openai::api::OpenAIApi;
use reupholster_openai::config::OpenAIConfig;
use reupholster_pipeline::SimulationOrchestrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "reupholster_api=debug,reupholster_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let openai_config = OpenAIConfig::from_env().expect("Invalid provider configuration");
    tracing::info!(
        base_url = %openai_config.base_url,
        vision_model = %openai_config.vision_model,
        image_model = %openai_config.image_model,
        "Loaded provider configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = reupholster_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    reupholster_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    reupholster_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Uploads ---
    let uploads = UploadStore::new(config.upload_dir.clone());
    uploads
        .ensure_dir()
        .await
        .expect("Failed to create upload directory");
    tracing::info!(dir = %uploads.dir().display(), "Upload directory ready");

    // --- Simulation pipeline ---
    let orchestrator =
        SimulationOrchestrator::with_openai(OpenAIApi::new(openai_config), pool.clone());

    // --- App state ---
    let state = AppState {
        pool,
        orchestrator: Arc::new(orchestrator),
        uploads: Arc::new(uploads),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix). In-flight simulation
/// runs are allowed to finish before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
