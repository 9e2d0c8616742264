use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{AgentState, EvaluationResults, SoapNote, SystemEvaluation};
use crate::pipeline::{ComparisonRun, DocumentationResult};

/// Write any serializable result as pretty-printed JSON.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, value).context("Failed to write JSON")?;
    Ok(())
}

/// Human-readable report for a multi-agent run.
pub fn render_state(state: &AgentState) -> String {
    let mut output = String::new();
    output.push_str("Multi-Agent Documentation\n");
    output.push_str("=========================\n");
    if let Some(disposition) = &state.disposition {
        output.push_str(&format!("Disposition: {disposition}\n"));
    }
    if let Some(urgency) = &state.urgency {
        output.push_str(&format!("Urgency: {}/10 ({})\n", urgency.level, urgency.label()));
    }
    if let Some(sentiment) = &state.sentiment {
        output.push_str(&format!(
            "Sentiment: {} (score {:.1})\n",
            sentiment.label(),
            sentiment.score
        ));
    }
    output.push('\n');
    output.push_str(&render_note(&state.soap_note));
    output.push_str(&render_message_log(state));
    output
}

/// Human-readable report for a sequential run.
pub fn render_sequential(result: &DocumentationResult) -> String {
    let mut output = String::new();
    output.push_str("Sequential Documentation\n");
    output.push_str("========================\n");
    output.push_str(&format!("Disposition: {}\n", result.disposition));
    output.push_str(&format!(
        "Sentiment: {} (score {:.1})\n",
        result.sentiment, result.sentiment_score
    ));
    if !result.topics.is_empty() {
        output.push_str("Topics:\n");
        for topic in &result.topics {
            output.push_str(&format!("  - {} ({:.2})\n", topic.label, topic.confidence));
        }
    }
    output.push('\n');
    output.push_str(&render_note(&result.soap_note));
    output
}

/// Human-readable comparison report: both notes, the score table, and the
/// grouped agent log.
pub fn render_comparison(run: &ComparisonRun) -> String {
    let mut output = String::new();
    output.push_str("Call Documentation Comparison\n");
    output.push_str("=============================\n\n");
    output.push_str(&render_state(&run.state));
    output.push('\n');
    output.push_str(&render_sequential(&run.sequential));
    if let Some(evaluation) = &run.state.evaluation {
        output.push('\n');
        output.push_str(&render_evaluation(evaluation));
    }
    output
}

fn render_note(note: &SoapNote) -> String {
    let mut output = String::new();
    for (label, text) in note.sections() {
        output.push_str(&format!("{label}:\n"));
        if text.is_empty() {
            output.push_str("  (empty)\n");
        } else {
            for line in text.lines() {
                output.push_str(&format!("  {line}\n"));
            }
        }
    }
    output
}

fn render_evaluation(evaluation: &EvaluationResults) -> String {
    let mut output = String::new();
    output.push_str("Evaluation\n");
    output.push_str("----------\n");
    output.push_str("dimension           multi-agent  sequential\n");
    for (label, multi, seq) in dimension_rows(&evaluation.multi_agent, &evaluation.sequential) {
        output.push_str(&format!("{label:<20}{multi:>11.1}{seq:>12.1}\n"));
    }
    output.push_str(&format!(
        "{:<20}{:>11.1}{:>12.1}\n",
        "overall quality",
        evaluation.multi_agent.overall_quality,
        evaluation.sequential.overall_quality
    ));
    output.push_str(&format!("\nWinner: {}\n", evaluation.winner));
    if !evaluation.reasoning.is_empty() {
        output.push_str(&format!("Reasoning: {}\n", evaluation.reasoning));
    }
    output
}

fn dimension_rows(
    multi: &SystemEvaluation,
    seq: &SystemEvaluation,
) -> [(&'static str, f64, f64); 4] {
    [
        ("completeness", multi.completeness.score, seq.completeness.score),
        ("accuracy", multi.accuracy.score, seq.accuracy.score),
        (
            "clinical relevance",
            multi.clinical_relevance.score,
            seq.clinical_relevance.score,
        ),
        (
            "actionability",
            multi.actionability.score,
            seq.actionability.score,
        ),
    ]
}

/// Agent log grouped by sender, using the log's read-time index.
fn render_message_log(state: &AgentState) -> String {
    if state.messages.is_empty() {
        return String::new();
    }
    let index = state.messages.by_sender();
    let mut senders: Vec<&str> = index.keys().copied().collect();
    senders.sort_unstable();

    let mut output = String::new();
    output.push_str("\nAgent Log\n");
    output.push_str("---------\n");
    for sender in senders {
        output.push_str(&format!("{sender}:\n"));
        for message in &index[sender] {
            output.push_str(&format!("  {}\n", message.content));
        }
    }
    output
}
