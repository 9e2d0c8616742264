use anyhow::{Context, Result};
use tracing::info;

use crate::llm::TextGenerator;
use crate::llm::prompts::{ROUTING_SYSTEM, transcript_prompt};
use crate::models::{AgentMessage, AgentState, Disposition};

pub const AGENT: &str = "routing";

/// Classify the transcript and set the disposition.
///
/// The response is taken verbatim (trimmed, lower-cased) when it is not one
/// of the known tags; specialist selection treats anything unrecognized as a
/// general inquiry.
pub async fn process(gateway: &impl TextGenerator, mut state: AgentState) -> Result<AgentState> {
    let response = gateway
        .generate(ROUTING_SYSTEM, &transcript_prompt(&state.transcript))
        .await
        .context("routing agent model call failed")?;

    let disposition = Disposition::from_model_response(&response);
    info!(disposition = %disposition, "call routed");

    state.messages.push(AgentMessage::broadcast(
        AGENT,
        format!("Call classified as {disposition}."),
    ));
    state.disposition = Some(disposition);
    Ok(state)
}
