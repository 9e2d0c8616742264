pub mod orchestrator;
pub mod sequential;

pub use orchestrator::*;
pub use sequential::*;

use crate::models::AgentState;

/// One step boundary in a pipeline run, for progress reporting.
#[derive(Debug, Clone)]
pub struct StepInfo {
    /// 1-based step index.
    pub step: usize,
    pub total: usize,
    /// Label of the agent that just ran.
    pub agent: String,
    pub input_summary: Option<String>,
    pub output_summary: Option<String>,
}

/// Observational progress callback, invoked synchronously at step
/// boundaries. Optional everywhere; never required for correctness.
pub type ProgressCallback<'a> = dyn Fn(&AgentState, &StepInfo) + 'a;

pub(crate) fn report_step(
    progress: Option<&ProgressCallback<'_>>,
    state: &AgentState,
    step: usize,
    total: usize,
    agent: &str,
    input_summary: Option<String>,
    output_summary: Option<String>,
) {
    if let Some(callback) = progress {
        callback(
            state,
            &StepInfo {
                step,
                total,
                agent: agent.to_string(),
                input_summary,
                output_summary,
            },
        );
    }
}

/// Truncate free text to a display-sized summary.
pub(crate) fn summarize(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let truncated: String = flat.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_short_text_unchanged() {
        assert_eq!(summarize("short text", 40), "short text");
    }

    #[test]
    fn test_summarize_flattens_and_truncates() {
        let text = "line one\nline two\nline three";
        assert_eq!(summarize(text, 12), "line one lin...");
    }
}
