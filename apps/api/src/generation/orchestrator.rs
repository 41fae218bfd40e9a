//! Pipeline orchestrator — runs the four-stage question generation sequence.
//!
//! Flow: validate → scenario synthesis → persona synthesis → question
//! synthesis → condensation → final result.
//!
//! Each stage appends its prompt and the model's reply to the run's
//! conversation history, then emits one cumulative progress snapshot.
//! Stages 1-3 abort the run on failure; stage 4 recovers with a fallback
//! body so the caller always receives the stage-3 output.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

use crate::generation::conversation::Conversation;
use crate::generation::prompts::{
    build_condense_prompt, build_personas_prompt, build_questions_prompt, build_scenario_prompt,
    stage_failed_line, Language, PromptSet,
};
use crate::llm_client::CompletionBackend;

/// Snapshots the pipeline can buffer ahead of a slow consumer. One run
/// emits at most six, so the channel never applies backpressure.
const SNAPSHOT_CHANNEL_CAPACITY: usize = 8;

/// One generation request, immutable once accepted.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub company: String,
    pub role: String,
    /// Plain text already extracted from the uploaded PDF.
    pub resume_text: String,
    pub interviewer_count: u8,
    pub questions_per_interviewer: u8,
    pub language: Language,
}

/// Terminal state of a run. Stage 4 cannot produce `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Required inputs were missing; one snapshot emitted, no LLM calls.
    Rejected,
    /// An LLM call for stage 1-3 failed; the run stopped there.
    Failed { stage: u8 },
    Completed,
}

enum StageOutcome {
    Reply(String),
    Failed,
    /// The consumer dropped the stream; stop without further side effects.
    Abandoned,
}

/// Starts a pipeline run and returns its progress snapshot stream.
///
/// Each item is the full log-to-date, never a delta; the final item is the
/// authoritative result. The run owns its history and request exclusively,
/// so concurrent runs share nothing.
pub fn run(
    backend: Arc<dyn CompletionBackend>,
    request: GenerationRequest,
    pacing: Duration,
) -> ReceiverStream<String> {
    let (tx, rx) = mpsc::channel(SNAPSHOT_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        info!(
            "Starting generation run: company={}, role={}, interviewers={}, questions={}",
            request.company, request.role, request.interviewer_count,
            request.questions_per_interviewer
        );
        match execute(backend.as_ref(), &request, pacing, &tx).await {
            Some(RunStatus::Completed) => info!("Generation run completed"),
            Some(RunStatus::Rejected) => warn!("Generation run rejected: missing inputs"),
            Some(RunStatus::Failed { stage }) => {
                warn!("Generation run failed at stage {stage}")
            }
            None => info!("Generation run abandoned: consumer disconnected"),
        }
    });

    ReceiverStream::new(rx)
}

/// Drives the full stage sequence, emitting snapshots into `tx`.
/// Returns `None` when the snapshot consumer went away mid-run.
async fn execute(
    backend: &dyn CompletionBackend,
    request: &GenerationRequest,
    pacing: Duration,
    tx: &mpsc::Sender<String>,
) -> Option<RunStatus> {
    let set = request.language.prompt_set();

    if request.company.trim().is_empty()
        || request.role.trim().is_empty()
        || request.resume_text.trim().is_empty()
    {
        let _ = tx.send(set.missing_input.to_string()).await;
        return Some(RunStatus::Rejected);
    }

    let mut history = Conversation::new();
    let mut log = String::new();

    // Stage 1 — interview scenario from company and role.
    let prompt = build_scenario_prompt(set, &request.company, &request.role);
    let scenario = match run_stage(backend, set, 1, prompt, &mut history, &mut log, tx).await {
        StageOutcome::Reply(text) => text,
        StageOutcome::Failed => return Some(RunStatus::Failed { stage: 1 }),
        StageOutcome::Abandoned => return None,
    };
    tokio::time::sleep(pacing).await;

    // Stage 2 — interviewer personas.
    let prompt =
        build_personas_prompt(set, &request.company, &request.role, request.interviewer_count);
    let personas = match run_stage(backend, set, 2, prompt, &mut history, &mut log, tx).await {
        StageOutcome::Reply(text) => text,
        StageOutcome::Failed => return Some(RunStatus::Failed { stage: 2 }),
        StageOutcome::Abandoned => return None,
    };
    tokio::time::sleep(pacing).await;

    // Stage 3 — tailored questions, grounded in every upstream value.
    let prompt = build_questions_prompt(
        set,
        &scenario,
        &personas,
        &request.resume_text,
        request.questions_per_interviewer,
    );
    let questions = match run_stage(backend, set, 3, prompt, &mut history, &mut log, tx).await {
        StageOutcome::Reply(text) => text,
        StageOutcome::Failed => return Some(RunStatus::Failed { stage: 3 }),
        StageOutcome::Abandoned => return None,
    };
    tokio::time::sleep(pacing).await;

    // Stage 4 — condensation. The one stage whose failure is non-fatal:
    // the caller still gets the raw stage-3 output, wrapped in a fallback
    // note, and the run ends Completed.
    history.push_user(build_condense_prompt(set, &personas, &questions));
    let body = match backend.complete(history.messages(), set.model).await {
        Ok(reply) => {
            history.push_assistant(reply.clone());
            log.push_str(set.stage_done[3]);
            log.push('\n');
            if tx.send(log.clone()).await.is_err() {
                return None;
            }
            reply
        }
        Err(e) => {
            warn!("Condensation failed, substituting raw results: {e}");
            format!(
                "{}\n\n{}\n\n{}\n\n---\n\n{}\n\n{}",
                set.fallback_note, set.profile_heading, personas, set.questions_heading, questions
            )
        }
    };

    // Finalization — the last snapshot carries the authoritative result.
    log.push('\n');
    log.push_str(set.completion_banner);
    log.push('\n');
    log.push_str(&body);
    if tx.send(log.clone()).await.is_err() {
        return None;
    }

    debug!(
        "History closed with {} entries ({} assistant)",
        history.len(),
        history.assistant_count()
    );
    Some(RunStatus::Completed)
}

/// One fatal-on-failure stage: append the prompt, call the model, append
/// the reply, emit one snapshot. The failure snapshot carries the stage
/// number and the adapter's error detail.
async fn run_stage(
    backend: &dyn CompletionBackend,
    set: &PromptSet,
    stage: u8,
    prompt: String,
    history: &mut Conversation,
    log: &mut String,
    tx: &mpsc::Sender<String>,
) -> StageOutcome {
    history.push_user(prompt);

    match backend.complete(history.messages(), set.model).await {
        Ok(reply) => {
            history.push_assistant(reply.clone());
            log.push_str(set.stage_done[usize::from(stage) - 1]);
            log.push('\n');
            debug!("Stage {stage} complete ({} chars)", reply.len());
            if tx.send(log.clone()).await.is_err() {
                return StageOutcome::Abandoned;
            }
            StageOutcome::Reply(reply)
        }
        Err(e) => {
            warn!("Stage {stage} LLM call failed: {e}");
            let mut failed_log = log.clone();
            failed_log.push_str(&stage_failed_line(set, stage, &e.to_string()));
            failed_log.push('\n');
            let _ = tx.send(failed_log).await;
            StageOutcome::Failed
        }
    }
}
