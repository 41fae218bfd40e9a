use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// The service refuses to start without an LLM API key; archiving is
/// optional and switched on by setting `S3_BUCKET`.
#[derive(Debug, Clone)]
pub struct Config {
    pub together_api_key: String,
    pub s3_bucket: Option<String>,
    pub s3_endpoint: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Pause between pipeline stages, in milliseconds. Zero disables pacing.
    pub stage_pacing_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3_bucket = std::env::var("S3_BUCKET").ok();
        // Credentials become required the moment a bucket is configured.
        let (aws_access_key_id, aws_secret_access_key) = match &s3_bucket {
            Some(_) => (
                Some(require_env("AWS_ACCESS_KEY_ID")?),
                Some(require_env("AWS_SECRET_ACCESS_KEY")?),
            ),
            None => (None, None),
        };

        Ok(Config {
            together_api_key: require_env("TOGETHER_API_KEY")?,
            s3_bucket,
            s3_endpoint: std::env::var("S3_ENDPOINT").ok(),
            aws_access_key_id,
            aws_secret_access_key,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            stage_pacing_ms: std::env::var("STAGE_PACING_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse::<u64>()
                .context("STAGE_PACING_MS must be a duration in milliseconds")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
