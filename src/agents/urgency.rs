use anyhow::{Context, Result};
use tracing::warn;

use crate::llm::TextGenerator;
use crate::llm::json::decode_json;
use crate::llm::prompts::{URGENCY_SYSTEM, transcript_prompt};
use crate::models::{AgentMessage, AgentState, UrgencyAssessment};

pub const AGENT: &str = "urgency";

/// Score how urgent the call is. An undecodable response defaults to level 0
/// rather than failing the run.
pub async fn process(gateway: &impl TextGenerator, mut state: AgentState) -> Result<AgentState> {
    let response = gateway
        .generate(URGENCY_SYSTEM, &transcript_prompt(&state.transcript))
        .await
        .context("urgency engine model call failed")?;

    let (assessment, content) = match decode_json::<UrgencyAssessment>(&response) {
        Some(assessment) => {
            let content = format!(
                "Urgency {}/10 ({}): medical {}, administrative {}, emotional {}.",
                assessment.level,
                assessment.label(),
                assessment.indicators.medical,
                assessment.indicators.administrative,
                assessment.indicators.emotional,
            );
            (assessment, content)
        }
        None => {
            warn!("urgency engine returned undecodable JSON; defaulting to level 0");
            (
                UrgencyAssessment::default(),
                "Urgency response could not be parsed; defaulting to level 0 (No urgency)."
                    .to_string(),
            )
        }
    };

    state.urgency = Some(assessment);
    state.messages.push(AgentMessage::broadcast(AGENT, content));
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::StubGateway;

    #[tokio::test]
    async fn test_urgency_decodes_level_and_indicators() {
        let gateway = StubGateway::fixed(
            r#"{"level": 7, "indicators": {"medical": 8, "administrative": 2, "emotional": 5}, "rationale": "chest pain mentioned"}"#,
        );
        let state = process(&gateway, AgentState::new("transcript"))
            .await
            .unwrap();

        let assessment = state.urgency.as_ref().unwrap();
        assert_eq!(assessment.level, 7);
        assert_eq!(assessment.label(), "Moderate");
        let message = state.messages.iter().next().unwrap();
        assert!(message.content.contains("7/10 (Moderate)"));
    }

    #[tokio::test]
    async fn test_urgency_defaults_to_level_zero_on_parse_failure() {
        let gateway = StubGateway::fixed("the call seemed urgent");
        let state = process(&gateway, AgentState::new("transcript"))
            .await
            .unwrap();

        let assessment = state.urgency.as_ref().unwrap();
        assert_eq!(assessment.level, 0);
        assert_eq!(assessment.label(), "No urgency");
        assert_eq!(state.messages.len(), 1);
    }
}
