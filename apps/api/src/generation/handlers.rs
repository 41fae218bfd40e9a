//! Axum route handlers for the Generation API.

use std::convert::Infallible;

use axum::extract::{Multipart, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use bytes::Bytes;
use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tracing::info;

use crate::archive::archive_resume;
use crate::errors::AppError;
use crate::extract::text_from_pdf;
use crate::generation::orchestrator::{self, GenerationRequest};
use crate::generation::prompts::Language;
use crate::state::AppState;

// Slider defaults match the product form: 2 interviewers, 3 questions each.
const DEFAULT_INTERVIEWER_COUNT: u8 = 2;
const DEFAULT_QUESTIONS_PER_INTERVIEWER: u8 = 3;

#[derive(Debug, Default)]
struct GenerateForm {
    company: String,
    role: String,
    language: Language,
    interviewer_count: Option<u8>,
    questions_per_interviewer: Option<u8>,
    resume: Option<ResumeUpload>,
}

#[derive(Debug)]
struct ResumeUpload {
    filename: String,
    bytes: Bytes,
}

/// POST /api/v1/interviews/generate
///
/// Multipart intake: `company`, `role`, `language`, `interviewer_count`,
/// `questions_per_interviewer`, and a `resume` PDF. Responds with an SSE
/// stream of cumulative progress snapshots; the last event carries the
/// final result. Missing fields and extraction failures are reported
/// through the stream itself, so a consumer watching only the events has
/// complete failure visibility.
pub async fn handle_generate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let form = read_form(&mut multipart).await?;
    let set = form.language.prompt_set();

    let resume_text = match form.resume {
        Some(upload) => match text_from_pdf(&upload.bytes) {
            Ok(text) => {
                info!(
                    "Extracted {} chars from {} ({} bytes)",
                    text.len(),
                    upload.filename,
                    upload.bytes.len()
                );
                if let (Some(s3), Some(bucket)) = (&state.s3, &state.config.s3_bucket) {
                    archive_resume(s3.clone(), bucket.clone(), upload.filename, upload.bytes);
                }
                text
            }
            Err(e) => {
                let snapshot = format!("{}{}", set.extraction_failed_prefix, e);
                return Ok(sse_response(single_snapshot(snapshot)));
            }
        },
        // No file uploaded: let the pipeline reject it alongside the other
        // required inputs.
        None => String::new(),
    };

    let request = GenerationRequest {
        company: form.company,
        role: form.role,
        resume_text,
        interviewer_count: form.interviewer_count.unwrap_or(DEFAULT_INTERVIEWER_COUNT),
        questions_per_interviewer: form
            .questions_per_interviewer
            .unwrap_or(DEFAULT_QUESTIONS_PER_INTERVIEWER),
        language: form.language,
    };

    let stream = orchestrator::run(state.llm.clone(), request, state.pacing);
    Ok(sse_response(stream))
}

async fn read_form(multipart: &mut Multipart) -> Result<GenerateForm, AppError> {
    let mut form = GenerateForm::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "company" => form.company = field.text().await.map_err(bad_multipart)?.trim().to_string(),
            "role" => form.role = field.text().await.map_err(bad_multipart)?.trim().to_string(),
            "language" => {
                form.language = Language::from_form_value(&field.text().await.map_err(bad_multipart)?)
            }
            "interviewer_count" => {
                form.interviewer_count =
                    Some(parse_slider(&field.text().await.map_err(bad_multipart)?))
            }
            "questions_per_interviewer" => {
                form.questions_per_interviewer =
                    Some(parse_slider(&field.text().await.map_err(bad_multipart)?))
            }
            "resume" => {
                let filename = field
                    .file_name()
                    .unwrap_or("resume.pdf")
                    .to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                form.resume = Some(ResumeUpload { filename, bytes });
            }
            _ => {}
        }
    }

    Ok(form)
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Malformed multipart request: {e}"))
}

/// Parses a slider value, clamping to the form's 1..=5 range.
/// Unparseable input falls back to the range minimum.
fn parse_slider(value: &str) -> u8 {
    value.trim().parse::<u8>().unwrap_or(1).clamp(1, 5)
}

/// A stream that emits one snapshot and ends — used for faults that occur
/// before the pipeline can start (e.g. an unreadable PDF).
fn single_snapshot(snapshot: String) -> ReceiverStream<String> {
    let (tx, rx) = mpsc::channel(1);
    // Capacity 1 and exactly one send: this cannot fail.
    let _ = tx.try_send(snapshot);
    ReceiverStream::new(rx)
}

fn sse_response(
    stream: ReceiverStream<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = stream.map(|snapshot| {
        // SSE data lines must not contain carriage returns.
        Ok::<_, Infallible>(Event::default().data(snapshot.replace('\r', "")))
    });
    Sse::new(events).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slider_accepts_in_range_values() {
        assert_eq!(parse_slider("1"), 1);
        assert_eq!(parse_slider(" 3 "), 3);
        assert_eq!(parse_slider("5"), 5);
    }

    #[test]
    fn test_parse_slider_clamps_out_of_range_values() {
        assert_eq!(parse_slider("0"), 1);
        assert_eq!(parse_slider("9"), 5);
        assert_eq!(parse_slider("250"), 5);
    }

    #[test]
    fn test_parse_slider_defaults_on_junk() {
        assert_eq!(parse_slider("lots"), 1);
        assert_eq!(parse_slider(""), 1);
        assert_eq!(parse_slider("-2"), 1);
    }

    #[tokio::test]
    async fn test_single_snapshot_emits_exactly_once() {
        use tokio_stream::StreamExt;

        let stream = single_snapshot("only event".to_string());
        let items: Vec<String> = stream.collect().await;
        assert_eq!(items, vec!["only event".to_string()]);
    }
}
