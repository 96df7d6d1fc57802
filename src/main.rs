use clap::Parser;
use std::sync::Arc;
use story_paths::{
    api::{AppState, create_router},
    config::Settings,
    db::DbClient,
    generator::{SceneGenerator, ScriptedGenerator},
    repositories::{BranchRepository, NodeRepository, SessionRepository},
    services::{BranchService, ChoiceService, SessionService},
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Branching story session server
#[derive(Debug, Parser)]
#[command(name = "story-paths", version)]
struct Cli {
    /// Address to bind, overrides SERVER_HOST
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overrides SERVER_PORT
    #[arg(long)]
    port: Option<u16>,

    /// Steps after which the built-in story reaches an ending
    #[arg(long, default_value_t = 12)]
    ending_depth: i32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "story_paths=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut settings =
        Settings::from_env().map_err(|e| format!("Failed to load settings: {}", e))?;
    if let Some(host) = cli.host {
        settings.server.host = host;
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }

    tracing::info!("Starting story path service");
    tracing::info!("Connecting to ScyllaDB at: {:?}", settings.scylla.nodes);

    let db_client = DbClient::new(&settings.scylla)
        .await
        .map_err(|e| format!("Failed to connect to ScyllaDB: {}", e))?;

    let session_repo = SessionRepository::new(db_client.clone());
    let node_repo = NodeRepository::new(db_client.clone());
    let branch_repo = BranchRepository::new(db_client.clone());

    let generator: Arc<dyn SceneGenerator> = Arc::new(ScriptedGenerator {
        ending_depth: cli.ending_depth,
        ..ScriptedGenerator::default()
    });

    let session_service = Arc::new(SessionService::new(
        session_repo.clone(),
        node_repo.clone(),
        branch_repo.clone(),
        generator.clone(),
    ));

    let choice_service = Arc::new(ChoiceService::new(
        session_repo.clone(),
        node_repo.clone(),
        branch_repo.clone(),
        session_service.clone(),
        generator,
        settings.app.clone(),
    ));

    let branch_service = Arc::new(BranchService::new(
        session_repo,
        node_repo,
        branch_repo,
        session_service.clone(),
        settings.app.clone(),
    ));

    let app_state = AppState {
        session_service,
        choice_service,
        branch_service,
    };

    let app = create_router(app_state).layer(
        ServiceBuilder::new()
            .layer(CatchPanicLayer::new())
            .layer(CorsLayer::permissive()),
    );

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("API endpoints available at: http://{}/api/game/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut terminate_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => signal,
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                if let Err(err) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for Ctrl+C: {}", err);
                }
                return;
            }
        };

        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                if let Err(err) = res {
                    tracing::error!("Failed to listen for Ctrl+C: {}", err);
                }
            },
            _ = terminate_signal.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
        }
    }

    tracing::info!("Shutdown signal received, commencing graceful shutdown");
}
