use anyhow::{Context, Result};
use tracing::warn;

use crate::agents::or_not_found;
use crate::llm::TextGenerator;
use crate::llm::prompts::{GENERAL_SYSTEM, transcript_prompt};
use crate::models::{AgentMessage, AgentState, Extraction, GeneralInquiryDetails};

pub const AGENT: &str = "general_specialist";

/// Summarize a call that fits no specialist category. Catch-all branch of the
/// disposition routing, not an error case.
pub async fn process(gateway: &impl TextGenerator, mut state: AgentState) -> Result<AgentState> {
    let response = gateway
        .generate(GENERAL_SYSTEM, &transcript_prompt(&state.transcript))
        .await
        .context("general specialist model call failed")?;

    let extraction = Extraction::<GeneralInquiryDetails>::decode(&response);
    let content = match &extraction {
        Extraction::Parsed(details) => format!(
            "General inquiry captured: type {}, {} concern(s) noted, follow-up needed: {}.",
            or_not_found(&details.inquiry_type),
            details.member_concerns.len(),
            if details.follow_up_needed { "yes" } else { "no" },
        ),
        Extraction::Unparsed { .. } => {
            warn!("general specialist returned undecodable JSON; keeping raw response");
            "Inquiry details could not be parsed; raw response retained.".to_string()
        }
    };

    state.extracted_info.general = Some(extraction);
    state.messages.push(AgentMessage::broadcast(AGENT, content));
    Ok(state)
}
