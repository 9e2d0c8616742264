use anyhow::{Context, Result};
use tracing::warn;

use crate::llm::TextGenerator;
use crate::llm::json::decode_json;
use crate::llm::prompts::{EVALUATION_SYSTEM, evaluation_prompt};
use crate::models::{EvaluationResults, SoapNote};

pub const AGENT: &str = "evaluator";

/// Score the two notes against each other and declare a winner.
///
/// The model is instructed to return strict JSON; a response that cannot be
/// decoded degrades to the fixed neutral result (all scores 5, a tie) instead
/// of propagating an error. Overall qualities are always recomputed locally
/// from the dimension scores, overriding anything the model supplied.
pub async fn compare(
    gateway: &impl TextGenerator,
    transcript: &str,
    multi_agent_note: &SoapNote,
    sequential_note: &SoapNote,
) -> Result<EvaluationResults> {
    let prompt = evaluation_prompt(
        transcript,
        &render_note(multi_agent_note),
        &render_note(sequential_note),
    );
    let response = gateway
        .generate(EVALUATION_SYSTEM, &prompt)
        .await
        .context("evaluation model call failed")?;

    let mut results = match decode_json::<EvaluationResults>(&response) {
        Some(results) => results,
        None => {
            warn!("evaluation response could not be decoded; defaulting to a tie");
            EvaluationResults::neutral_fallback()
        }
    };
    results.finalize();
    Ok(results)
}

/// Flatten a note into labeled plain-text sections for the prompt.
fn render_note(note: &SoapNote) -> String {
    note.sections()
        .iter()
        .map(|(label, text)| format!("{label}: {text}"))
        .collect::<Vec<_>>()
        .join("\n")
}
