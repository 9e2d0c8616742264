use anyhow::{Context, Result};

use crate::llm::TextGenerator;
use crate::llm::prompts::{SOAP_SYSTEM, soap_generation_prompt};
use crate::models::{AgentMessage, AgentState, SoapNote};

pub const AGENT: &str = "soap_generator";

/// Synthesize the accumulated state into the final SOAP note.
///
/// The prompt embeds a JSON snapshot of everything gathered so far plus the
/// raw transcript; the response goes through the SOAP parser, which never
/// fails, so this step only errors on transport problems.
pub async fn process(gateway: &impl TextGenerator, mut state: AgentState) -> Result<AgentState> {
    let context = state.context_snapshot();
    let response = gateway
        .generate(SOAP_SYSTEM, &soap_generation_prompt(&state.transcript, &context))
        .await
        .context("SOAP generator model call failed")?;

    state.soap_note = SoapNote::parse(&response);

    let counts = state.soap_note.section_word_counts();
    let summary = counts
        .iter()
        .map(|(label, count)| format!("{} {} word(s)", label.to_lowercase(), count))
        .collect::<Vec<_>>()
        .join(", ");
    state.messages.push(AgentMessage::broadcast(
        AGENT,
        format!("SOAP note drafted: {summary}."),
    ));
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::StubGateway;

    #[tokio::test]
    async fn test_soap_generation_parses_sections() {
        let gateway = StubGateway::fixed(
            "SUBJECTIVE: Member reports knee pain for two weeks.\n\
             OBJECTIVE: Referral on file.\n\
             ASSESSMENT: Needs imaging.\n\
             PLAN: Approve MRI authorization.",
        );
        let state = process(&gateway, AgentState::new("transcript"))
            .await
            .unwrap();

        assert_eq!(state.soap_note.plan, "Approve MRI authorization.");
        let message = state.messages.iter().next().unwrap();
        assert!(message.content.contains("subjective 7 word(s)"));
    }

    #[tokio::test]
    async fn test_empty_section_counts_as_one_word() {
        let gateway = StubGateway::fixed("SUBJECTIVE: pain\nPLAN: rest");
        let state = process(&gateway, AgentState::new("transcript"))
            .await
            .unwrap();

        let message = state.messages.iter().next().unwrap();
        assert!(message.content.contains("objective 1 word(s)"));
        assert!(message.content.contains("assessment 1 word(s)"));
    }
}
