//! Fire-and-forget archiving of uploaded résumés to S3.
//!
//! Archiving is a side-channel: a failed upload is logged and forgotten.
//! The generation pipeline must never notice whether archiving worked,
//! or whether it is configured at all.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

/// Spawns a background upload of the raw résumé PDF.
///
/// Object keys are date-bucketed and UUID-stamped so repeated uploads of
/// the same filename never collide: `resumes/2026-08-05/<uuid>-<name>`.
pub fn archive_resume(s3: S3Client, bucket: String, filename: String, bytes: Bytes) {
    tokio::spawn(async move {
        let key = format!(
            "resumes/{}/{}-{}",
            Utc::now().format("%Y-%m-%d"),
            Uuid::new_v4(),
            sanitize_filename(&filename)
        );

        let result = s3
            .put_object()
            .bucket(&bucket)
            .key(&key)
            .content_type("application/pdf")
            .body(ByteStream::from(bytes))
            .send()
            .await;

        match result {
            Ok(_) => info!("Archived résumé to s3://{bucket}/{key}"),
            Err(e) => warn!("Résumé archive upload failed (ignored): {e}"),
        }
    });
}

/// Keeps object keys predictable: path separators and whitespace collapse
/// to underscores, everything else passes through.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_whitespace() {
                '_'
            } else {
                c
            }
        })
        .collect();
    if cleaned.is_empty() {
        "resume.pdf".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_replaces_separators_and_spaces() {
        assert_eq!(
            sanitize_filename("my resume/final v2.pdf"),
            "my_resume_final_v2.pdf"
        );
    }

    #[test]
    fn test_sanitize_filename_defaults_when_empty() {
        assert_eq!(sanitize_filename(""), "resume.pdf");
    }
}
