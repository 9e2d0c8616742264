use anyhow::{Context, Result};
use tracing::warn;

use crate::agents::or_not_found;
use crate::llm::TextGenerator;
use crate::llm::prompts::{CLAIMS_SYSTEM, transcript_prompt};
use crate::models::{AgentMessage, AgentState, ClaimsDetails, Extraction};

pub const AGENT: &str = "claims_specialist";

/// Extract claim details from the transcript; undecodable responses degrade
/// to raw text without failing the run.
pub async fn process(gateway: &impl TextGenerator, mut state: AgentState) -> Result<AgentState> {
    let response = gateway
        .generate(CLAIMS_SYSTEM, &transcript_prompt(&state.transcript))
        .await
        .context("claims specialist model call failed")?;

    let extraction = Extraction::<ClaimsDetails>::decode(&response);
    let content = match &extraction {
        Extraction::Parsed(details) => format!(
            "Claims inquiry captured: claim {}, status {}, denial reason {}.",
            or_not_found(&details.claim_number),
            or_not_found(&details.status),
            or_not_found(&details.denial_reason),
        ),
        Extraction::Unparsed { .. } => {
            warn!("claims specialist returned undecodable JSON; keeping raw response");
            "Claim details could not be parsed; raw response retained.".to_string()
        }
    };

    state.extracted_info.claims = Some(extraction);
    state.messages.push(AgentMessage::broadcast(AGENT, content));
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::StubGateway;

    #[tokio::test]
    async fn test_claims_extraction_owns_only_its_slot() {
        let gateway =
            StubGateway::fixed(r#"{"claim_number": "CLM-4821", "status": "denied"}"#);
        let state = process(&gateway, AgentState::new("transcript"))
            .await
            .unwrap();

        let details = state
            .extracted_info
            .claims
            .as_ref()
            .unwrap()
            .as_parsed()
            .unwrap();
        assert_eq!(details.claim_number, "CLM-4821");
        assert!(state.extracted_info.authorization.is_none());
        assert_eq!(state.messages.len(), 1);
    }
}
