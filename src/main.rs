use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdf2drive::config::Config;
use pdf2drive::drive::{DriveClient, ServiceAccountAuth};
use pdf2drive::models::AppState;
use pdf2drive::queue::{JobStore, Worker, QUEUE_DEPTH};
use pdf2drive::routes::create_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf2drive=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    // Authenticate the Drive client up front so a bad key path fails fast
    let auth = ServiceAccountAuth::from_file(&config.drive.credentials_path).await?;
    info!(
        "Drive uploads run as {} (share the parent folder with this address)",
        auth.client_email()
    );
    let drive = DriveClient::new(auth, &config.upload);

    // Shared job store and background upload worker
    let jobs = JobStore::new();
    let (queue_tx, queue_rx) = mpsc::channel(QUEUE_DEPTH);
    Worker::new(
        jobs.clone(),
        Arc::new(drive),
        config.drive.parent_folder_id.clone(),
    )
    .spawn(queue_rx);

    // Create shared state
    let state = AppState {
        config: config.clone(),
        jobs,
        queue_tx,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
