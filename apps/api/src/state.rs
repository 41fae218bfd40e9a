use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::Client as S3Client;

use crate::config::Config;
use crate::llm_client::CompletionBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend behind the pipeline. Production: TogetherClient.
    pub llm: Arc<dyn CompletionBackend>,
    /// Present only when résumé archiving is configured.
    pub s3: Option<S3Client>,
    pub config: Config,
    /// Inter-stage pause applied to the progress stream.
    pub pacing: Duration,
}
