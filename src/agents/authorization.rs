use anyhow::{Context, Result};
use tracing::warn;

use crate::agents::or_not_found;
use crate::llm::TextGenerator;
use crate::llm::prompts::{AUTHORIZATION_SYSTEM, transcript_prompt};
use crate::models::{AgentMessage, AgentState, AuthorizationDetails, Extraction};

pub const AGENT: &str = "authorization_specialist";

/// Extract prior-authorization details from the transcript.
///
/// A response that fails to decode is stored as raw text with an error
/// marker; the run continues either way.
pub async fn process(gateway: &impl TextGenerator, mut state: AgentState) -> Result<AgentState> {
    let response = gateway
        .generate(AUTHORIZATION_SYSTEM, &transcript_prompt(&state.transcript))
        .await
        .context("authorization specialist model call failed")?;

    let extraction = Extraction::<AuthorizationDetails>::decode(&response);
    let content = match &extraction {
        Extraction::Parsed(details) => format!(
            "Authorization request captured: procedure {}, provider {}, timeline {}, {} supporting document(s).",
            or_not_found(&details.procedure),
            or_not_found(&details.provider),
            or_not_found(&details.timeline),
            details.documentation.len(),
        ),
        Extraction::Unparsed { .. } => {
            warn!("authorization specialist returned undecodable JSON; keeping raw response");
            "Authorization details could not be parsed; raw response retained.".to_string()
        }
    };

    state.extracted_info.authorization = Some(extraction);
    state.messages.push(AgentMessage::broadcast(AGENT, content));
    Ok(state)
}
