use anyhow::{Context, Result};
use tracing::warn;

use crate::llm::TextGenerator;
use crate::llm::prompts::{MEDICAL_SYSTEM, transcript_prompt};
use crate::models::{AgentMessage, AgentState, Extraction, MedicalEntities};

pub const AGENT: &str = "medical_extractor";

/// Extract clinical entities from the transcript; undecodable responses
/// degrade to raw text without failing the run.
pub async fn process(gateway: &impl TextGenerator, mut state: AgentState) -> Result<AgentState> {
    let response = gateway
        .generate(MEDICAL_SYSTEM, &transcript_prompt(&state.transcript))
        .await
        .context("medical extractor model call failed")?;

    let extraction = Extraction::<MedicalEntities>::decode(&response);
    let content = match &extraction {
        Extraction::Parsed(entities) => format!(
            "Medical extraction: {} condition(s), {} medication(s), {} symptom(s), {} procedure(s), {} allergy(ies).",
            entities.conditions.len(),
            entities.medications.len(),
            entities.symptoms.len(),
            entities.procedures.len(),
            entities.allergies.len(),
        ),
        Extraction::Unparsed { .. } => {
            warn!("medical extractor returned undecodable JSON; keeping raw response");
            "Medical entities could not be parsed; raw response retained.".to_string()
        }
    };

    state.medical_info = Some(extraction);
    state.messages.push(AgentMessage::broadcast(AGENT, content));
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::StubGateway;

    #[tokio::test]
    async fn test_medical_extraction_counts_entities() {
        let gateway = StubGateway::fixed(
            r#"{"conditions": ["type 2 diabetes"], "medications": ["metformin", "lisinopril"], "symptoms": [], "procedures": [], "allergies": []}"#,
        );
        let state = process(&gateway, AgentState::new("transcript"))
            .await
            .unwrap();

        let entities = state
            .medical_info
            .as_ref()
            .unwrap()
            .as_parsed()
            .unwrap();
        assert_eq!(entities.entity_count(), 3);
        let message = state.messages.iter().next().unwrap();
        assert!(message.content.contains("2 medication(s)"));
    }
}
