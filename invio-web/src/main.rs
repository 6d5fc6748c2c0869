//! invio-web - Invoice Intake Service
//!
//! Single-user web service: upload a PDF, let the extraction webhook
//! turn it into structured fields, review and confirm them, and keep the
//! saved records searchable locally.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use invio_common::config::ServiceConfig;
use invio_web::storage::RecordStore;
use invio_web::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "invio-web", version, about = "Invio invoice intake service")]
struct Args {
    /// Data root folder (overrides INVIO_ROOT_FOLDER and the TOML config)
    #[arg(long)]
    root_folder: Option<String>,

    /// HTTP bind port (overrides INVIO_PORT and the TOML config)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting invio-web (Invoice Intake) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve configuration and make sure the data folder exists
    let config = ServiceConfig::resolve(args.root_folder.as_deref(), args.port)?;
    std::fs::create_dir_all(&config.root_folder)?;
    info!("Root folder: {}", config.root_folder.display());
    info!("Extraction endpoint: {}", config.extraction_url);
    info!("Ingestion endpoint: {}", config.ingestion_url);

    // Open the durable record store
    let records = RecordStore::open(&config.root_folder);

    // Create application state
    let port = config.port;
    let state = AppState::new(config, records)?;

    // Build router
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("Listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
