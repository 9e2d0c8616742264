use anyhow::{Context, Result};
use tracing::warn;

use crate::llm::TextGenerator;
use crate::llm::json::decode_json;
use crate::llm::prompts::{SENTIMENT_SYSTEM, transcript_prompt};
use crate::models::{AgentMessage, AgentState, SentimentAssessment};

pub const AGENT: &str = "sentiment";

/// Score the member's sentiment. An undecodable response defaults to a
/// neutral score of 0 rather than failing the run.
pub async fn process(gateway: &impl TextGenerator, mut state: AgentState) -> Result<AgentState> {
    let response = gateway
        .generate(SENTIMENT_SYSTEM, &transcript_prompt(&state.transcript))
        .await
        .context("sentiment engine model call failed")?;

    let (assessment, content) = match decode_json::<SentimentAssessment>(&response) {
        Some(assessment) => {
            let content = format!(
                "Member sentiment: {} (score {:.1}).",
                assessment.label(),
                assessment.score,
            );
            (assessment, content)
        }
        None => {
            warn!("sentiment engine returned undecodable JSON; defaulting to neutral");
            (
                SentimentAssessment::default(),
                "Sentiment response could not be parsed; defaulting to neutral.".to_string(),
            )
        }
    };

    state.sentiment = Some(assessment);
    state.messages.push(AgentMessage::broadcast(AGENT, content));
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::StubGateway;
    use crate::models::SentimentLabel;

    #[tokio::test]
    async fn test_sentiment_decodes_and_labels() {
        let gateway = StubGateway::fixed(
            r#"{"score": -5, "emotions": ["frustrated"], "summary": "upset about denial"}"#,
        );
        let state = process(&gateway, AgentState::new("transcript"))
            .await
            .unwrap();

        let assessment = state.sentiment.as_ref().unwrap();
        assert_eq!(assessment.label(), SentimentLabel::Dissatisfied);
        let message = state.messages.iter().next().unwrap();
        assert!(message.content.contains("dissatisfied (score -5.0)"));
    }

    #[tokio::test]
    async fn test_sentiment_defaults_to_neutral_on_parse_failure() {
        let gateway = StubGateway::fixed("they sounded unhappy");
        let state = process(&gateway, AgentState::new("transcript"))
            .await
            .unwrap();

        let assessment = state.sentiment.as_ref().unwrap();
        assert_eq!(assessment.score, 0.0);
        assert_eq!(assessment.label(), SentimentLabel::Neutral);
    }
}
