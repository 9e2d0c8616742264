use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::agents::{
    authorization, claims, evaluation, general, medical, routing, sentiment, soap_generator,
    urgency,
};
use crate::llm::TextGenerator;
use crate::models::{AgentMessage, AgentState, Disposition};
use crate::pipeline::sequential::{DocumentationResult, run_sequential_pipeline};
use crate::pipeline::{ProgressCallback, report_step, summarize};

/// Steps of the multi-agent state machine (routing, specialist, analysis,
/// SOAP generation).
const MULTI_AGENT_STEPS: usize = 4;

/// Steps of a full comparison run: the four above plus the sequential
/// pipeline and the evaluation.
const COMPARISON_STEPS: usize = 6;

const SUMMARY_CHARS: usize = 120;

/// A completed comparison run: the multi-agent state (with evaluation) plus
/// the sequential pipeline's result, kept for side-by-side reporting.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRun {
    pub state: AgentState,
    pub sequential: DocumentationResult,
}

/// Run the multi-agent pipeline on its own:
/// Routing -> Specialist -> {Urgency, Sentiment, Medical} -> SOAP generator.
pub async fn run_multi_agent(
    gateway: &impl TextGenerator,
    transcript: &str,
    progress: Option<&ProgressCallback<'_>>,
) -> Result<AgentState> {
    run_multi_agent_steps(gateway, transcript, progress, MULTI_AGENT_STEPS).await
}

/// Run both pipelines and the evaluation, returning the multi-agent state
/// with `evaluation` populated.
pub async fn process_and_evaluate(
    gateway: &impl TextGenerator,
    transcript: &str,
    progress: Option<&ProgressCallback<'_>>,
) -> Result<AgentState> {
    process_and_evaluate_detailed(gateway, transcript, progress)
        .await
        .map(|run| run.state)
}

/// As [`process_and_evaluate`], but also returns the sequential pipeline's
/// result for reporting.
pub async fn process_and_evaluate_detailed(
    gateway: &impl TextGenerator,
    transcript: &str,
    progress: Option<&ProgressCallback<'_>>,
) -> Result<ComparisonRun> {
    // The two pipelines are independent until evaluation; run them
    // concurrently and wait for both.
    let (multi, sequential) = tokio::join!(
        run_multi_agent_steps(gateway, transcript, progress, COMPARISON_STEPS),
        run_sequential_pipeline(gateway, transcript),
    );
    let mut state = multi?;
    let sequential = sequential.context("sequential pipeline failed")?;

    report_step(
        progress,
        &state,
        5,
        COMPARISON_STEPS,
        "sequential_pipeline",
        Some(summarize(transcript, SUMMARY_CHARS)),
        Some(format!(
            "disposition {}, sentiment {}",
            sequential.disposition, sequential.sentiment
        )),
    );

    let results = evaluation::compare(
        gateway,
        transcript,
        &state.soap_note,
        &sequential.soap_note,
    )
    .await
    .context("evaluation stage failed")?;

    state.messages.push(AgentMessage::broadcast(
        evaluation::AGENT,
        format!(
            "Evaluation complete: {} wins (multi-agent {:.1} vs sequential {:.1}).",
            results.winner,
            results.multi_agent.overall_quality,
            results.sequential.overall_quality,
        ),
    ));
    state.evaluation = Some(results);

    report_step(
        progress,
        &state,
        6,
        COMPARISON_STEPS,
        evaluation::AGENT,
        None,
        state
            .evaluation
            .as_ref()
            .map(|e| format!("winner: {}", e.winner)),
    );

    Ok(ComparisonRun { state, sequential })
}

async fn run_multi_agent_steps(
    gateway: &impl TextGenerator,
    transcript: &str,
    progress: Option<&ProgressCallback<'_>>,
    total_steps: usize,
) -> Result<AgentState> {
    let state = AgentState::new(transcript);
    let input_summary = summarize(transcript, SUMMARY_CHARS);

    // 1. Routing.
    let state = routing::process(gateway, state)
        .await
        .context("routing stage failed")?;
    report_step(
        progress,
        &state,
        1,
        total_steps,
        routing::AGENT,
        Some(input_summary.clone()),
        state.disposition.as_ref().map(|d| d.to_string()),
    );

    // 2. Specialist branch.
    let (state, specialist) = run_specialist(gateway, state)
        .await
        .context("specialist stage failed")?;
    report_step(
        progress,
        &state,
        2,
        total_steps,
        specialist,
        Some(input_summary.clone()),
        last_message_summary(&state),
    );

    // 3. Analysis fan-out.
    let state = run_analysis(gateway, state)
        .await
        .context("analysis stage failed")?;
    report_step(
        progress,
        &state,
        3,
        total_steps,
        "analysis",
        Some(input_summary.clone()),
        state.urgency.as_ref().map(|u| u.label().to_string()),
    );

    // 4. SOAP generation.
    let state = soap_generator::process(gateway, state)
        .await
        .context("SOAP generation stage failed")?;
    report_step(
        progress,
        &state,
        4,
        total_steps,
        soap_generator::AGENT,
        Some(input_summary),
        Some(summarize(&state.soap_note.plan, SUMMARY_CHARS)),
    );

    Ok(state)
}

/// Dispatch to the specialist selected by the disposition.
///
/// `authorization` and `claims_inquiry` have dedicated specialists; every
/// other disposition, including unrecognized ones, is handled by the general
/// specialist as the documented fallback branch.
async fn run_specialist(
    gateway: &impl TextGenerator,
    state: AgentState,
) -> Result<(AgentState, &'static str)> {
    match state.disposition {
        Some(Disposition::Authorization) => {
            let state = authorization::process(gateway, state).await?;
            Ok((state, authorization::AGENT))
        }
        Some(Disposition::ClaimsInquiry) => {
            let state = claims::process(gateway, state).await?;
            Ok((state, claims::AGENT))
        }
        _ => {
            let state = general::process(gateway, state).await?;
            Ok((state, general::AGENT))
        }
    }
}

/// Fan out the three analysis engines on independent snapshots and merge.
///
/// Join semantics: wait for all three, fail if any failed; no partial
/// results path.
async fn run_analysis(gateway: &impl TextGenerator, state: AgentState) -> Result<AgentState> {
    let (urgency_branch, sentiment_branch, medical_branch) = tokio::join!(
        urgency::process(gateway, state.clone()),
        sentiment::process(gateway, state.clone()),
        medical::process(gateway, state.clone()),
    );
    let merged = merge_analysis(state, urgency_branch?, sentiment_branch?, medical_branch?);
    info!(messages = merged.messages.len(), "analysis branches merged");
    Ok(merged)
}

/// Merge the three parallel analysis branches onto the pre-fork snapshot.
///
/// Each branch owns exactly one field, so there is no genuine conflict to
/// arbitrate: the merge takes the owned field from each branch and
/// concatenates branch messages onto the base log, de-duplicated by id.
/// Disjoint ownership is asserted rather than trusted by convention.
fn merge_analysis(
    mut base: AgentState,
    urgency_branch: AgentState,
    sentiment_branch: AgentState,
    medical_branch: AgentState,
) -> AgentState {
    debug_assert!(
        urgency_branch.sentiment.is_none() && urgency_branch.medical_info.is_none(),
        "urgency branch wrote outside its owned field"
    );
    debug_assert!(
        sentiment_branch.urgency.is_none() && sentiment_branch.medical_info.is_none(),
        "sentiment branch wrote outside its owned field"
    );
    debug_assert!(
        medical_branch.urgency.is_none() && medical_branch.sentiment.is_none(),
        "medical branch wrote outside its owned field"
    );

    base.urgency = urgency_branch.urgency;
    base.sentiment = sentiment_branch.sentiment;
    base.medical_info = medical_branch.medical_info;

    base.messages.extend_dedup(&urgency_branch.messages);
    base.messages.extend_dedup(&sentiment_branch.messages);
    base.messages.extend_dedup(&medical_branch.messages);
    base
}

fn last_message_summary(state: &AgentState) -> Option<String> {
    state
        .messages
        .iter()
        .last()
        .map(|m| summarize(&m.content, SUMMARY_CHARS))
}
