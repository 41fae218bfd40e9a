mod archive;
mod config;
mod errors;
mod extract;
mod generation;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::TogetherClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting FastHire API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize S3 — optional; the service runs without archiving.
    let s3 = match &config.s3_bucket {
        Some(bucket) => {
            let client = build_s3_client(&config).await;
            info!("S3 client initialized (bucket: {bucket})");
            Some(client)
        }
        None => {
            warn!("S3_BUCKET not set — uploaded résumés will not be archived");
            None
        }
    };

    // Initialize LLM client
    let llm = Arc::new(TogetherClient::new(config.together_api_key.clone()));
    info!("LLM client initialized");

    let pacing = Duration::from_millis(config.stage_pacing_ms);

    // Build app state
    let state = AppState {
        llm,
        s3,
        config: config.clone(),
        pacing,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
/// Only called when `S3_BUCKET` is set, so the credentials are present.
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        config.aws_access_key_id.as_deref().unwrap_or_default(),
        config.aws_secret_access_key.as_deref().unwrap_or_default(),
        None,
        None,
        "fasthire-static",
    );

    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials);

    if let Some(endpoint) = &config.s3_endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    aws_sdk_s3::Client::new(&loader.load().await)
}
