use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::llm::TextGenerator;
use crate::llm::json::extract_number;
use crate::llm::prompts::{
    SEQ_DISPOSITION_SYSTEM, SEQ_SENTIMENT_SYSTEM, SEQ_SOAP_SYSTEM, SEQ_TOPICS_SYSTEM,
    sequential_soap_prompt, transcript_prompt,
};
use crate::models::{CallDisposition, SentimentLabel, SoapNote, Topic};

/// Confidence assigned to a topic line without a parenthetical.
const DEFAULT_TOPIC_CONFIDENCE: f64 = 0.8;

/// Topics retained from the labeling step.
const MAX_TOPICS: usize = 3;

/// Output of the linear baseline pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentationResult {
    pub disposition: CallDisposition,
    pub soap_note: SoapNote,
    pub sentiment_score: f64,
    pub sentiment: SentimentLabel,
    pub topics: Vec<Topic>,
}

/// Run the legacy baseline: Disposition -> SOAP -> Sentiment -> Topics.
///
/// Four model calls, strictly in order, no shared state beyond the
/// transcript and the disposition string. Transport failure in any step
/// aborts the whole pipeline; disposition and sentiment parse failures
/// degrade to lenient defaults instead.
pub async fn run_sequential_pipeline(
    gateway: &impl TextGenerator,
    transcript: &str,
) -> Result<DocumentationResult> {
    let user_prompt = transcript_prompt(transcript);

    let response = gateway
        .generate(SEQ_DISPOSITION_SYSTEM, &user_prompt)
        .await
        .context("sequential pipeline: disposition step failed")?;
    let disposition = CallDisposition::from_model_response(&response);
    info!(disposition = %disposition, "sequential: call classified");

    let response = gateway
        .generate(
            SEQ_SOAP_SYSTEM,
            &sequential_soap_prompt(transcript, disposition),
        )
        .await
        .context("sequential pipeline: SOAP step failed")?;
    let soap_note = SoapNote::parse(&response);

    let response = gateway
        .generate(SEQ_SENTIMENT_SYSTEM, &user_prompt)
        .await
        .context("sequential pipeline: sentiment step failed")?;
    let sentiment_score = extract_number(&response).unwrap_or_else(|| {
        warn!("sequential: sentiment response had no numeric score; defaulting to 0");
        0.0
    });
    let sentiment = SentimentLabel::from_score(sentiment_score);

    let response = gateway
        .generate(SEQ_TOPICS_SYSTEM, &user_prompt)
        .await
        .context("sequential pipeline: topic step failed")?;
    let topics = parse_topics(&response);

    Ok(DocumentationResult {
        disposition,
        soap_note,
        sentiment_score,
        sentiment,
        topics,
    })
}

/// Parse a line-oriented topic list.
///
/// Each non-empty line is one topic; a trailing `(confidence)` parenthetical
/// is extracted when present. Only the first three lines are retained.
fn parse_topics(raw: &str) -> Vec<Topic> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_TOPICS)
        .map(parse_topic_line)
        .collect()
}

fn parse_topic_line(line: &str) -> Topic {
    if line.ends_with(')') {
        if let Some(open) = line.rfind('(') {
            let inner = &line[open + 1..line.len() - 1];
            if let Ok(confidence) = inner.trim().parse::<f64>() {
                return Topic {
                    label: line[..open].trim().to_string(),
                    confidence,
                };
            }
        }
    }
    Topic {
        label: line.to_string(),
        confidence: DEFAULT_TOPIC_CONFIDENCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::StubGateway;

    #[test]
    fn test_parse_topic_line_with_confidence() {
        let topic = parse_topic_line("Claim denial for imaging (0.9)");
        assert_eq!(topic.label, "Claim denial for imaging");
        assert_eq!(topic.confidence, 0.9);
    }

    #[test]
    fn test_parse_topic_line_without_confidence_defaults() {
        let topic = parse_topic_line("Benefit coverage question");
        assert_eq!(topic.label, "Benefit coverage question");
        assert_eq!(topic.confidence, DEFAULT_TOPIC_CONFIDENCE);
    }

    #[test]
    fn test_parse_topic_line_non_numeric_parenthetical_kept_in_label() {
        let topic = parse_topic_line("Appeal process (urgent)");
        assert_eq!(topic.label, "Appeal process (urgent)");
        assert_eq!(topic.confidence, DEFAULT_TOPIC_CONFIDENCE);
    }

    #[test]
    fn test_parse_topics_keeps_first_three_nonempty_lines() {
        let raw = "one (0.9)\n\ntwo\nthree (0.5)\nfour";
        let topics = parse_topics(raw);
        assert_eq!(topics.len(), 3);
        assert_eq!(topics[0].label, "one");
        assert_eq!(topics[1].label, "two");
        assert_eq!(topics[2].confidence, 0.5);
    }

    fn scripted_gateway() -> StubGateway {
        StubGateway::new(vec![
            (
                "Choose the single best matching disposition",
                "claims_inquiry",
            ),
            (
                "Base every statement on the transcript. Do not invent",
                "SUBJECTIVE: denial dispute\nOBJECTIVE: claim on file\nASSESSMENT: coding error\nPLAN: resubmit claim",
            ),
            ("Rate the member's overall sentiment", "-5"),
            (
                "List the main topics",
                "Claim denial (0.95)\nResubmission steps",
            ),
        ])
    }

    #[tokio::test]
    async fn test_sequential_pipeline_end_to_end() {
        let gateway = scripted_gateway();
        let result = run_sequential_pipeline(&gateway, "call text").await.unwrap();

        assert_eq!(result.disposition, CallDisposition::ClaimsInquiry);
        assert_eq!(result.soap_note.assessment, "coding error");
        assert_eq!(result.sentiment_score, -5.0);
        assert_eq!(result.sentiment, SentimentLabel::Dissatisfied);
        assert_eq!(result.topics.len(), 2);
        assert_eq!(result.topics[1].confidence, DEFAULT_TOPIC_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_sequential_disposition_falls_back_to_other() {
        let gateway = StubGateway::new(vec![
            (
                "Choose the single best matching disposition",
                "this matches nothing in the vocabulary",
            ),
            (
                "Base every statement on the transcript. Do not invent",
                "PLAN: none",
            ),
            ("Rate the member's overall sentiment", "no score given"),
            ("List the main topics", ""),
        ]);
        let result = run_sequential_pipeline(&gateway, "call text").await.unwrap();

        assert_eq!(result.disposition, CallDisposition::Other);
        assert_eq!(result.sentiment, SentimentLabel::Neutral);
        assert!(result.topics.is_empty());
    }

    #[tokio::test]
    async fn test_sequential_transport_failure_aborts() {
        // Stub only answers the disposition step; the SOAP step errors.
        let gateway = StubGateway::new(vec![(
            "Choose the single best matching disposition",
            "billing",
        )]);
        let error = run_sequential_pipeline(&gateway, "call text")
            .await
            .unwrap_err();
        assert!(error.to_string().contains("SOAP step failed"));
    }
}
