use crate::models::CallDisposition;

/// System prompt for the multi-agent routing step.
pub const ROUTING_SYSTEM: &str = r#"You are a call router for a healthcare contact center. Classify the call transcript into exactly one category.

Categories:
- authorization: prior authorization or approval requests
- claims_inquiry: claim status, denials, or payment disputes
- benefits: coverage and benefit questions
- grievance: complaints about care or service
- enrollment: plan enrollment or membership changes
- general: anything that does not fit the above

Respond with a single lowercase category word and nothing else."#;

/// System prompt for the authorization specialist.
pub const AUTHORIZATION_SYSTEM: &str = r#"You are an authorization specialist reviewing a healthcare call transcript. Extract the details of the authorization request.

Respond with valid JSON only, matching exactly this shape:
{
  "procedure": "requested procedure or service",
  "medical_necessity": "stated clinical justification",
  "provider": "requesting provider or facility",
  "timeline": "when the service is needed",
  "previous_attempts": "prior requests or denials mentioned",
  "documentation": ["supporting documents mentioned"]
}

Use an empty string or empty array for anything not discussed. Do not add commentary outside the JSON object."#;

/// System prompt for the claims specialist.
pub const CLAIMS_SYSTEM: &str = r#"You are a claims specialist reviewing a healthcare call transcript. Extract the details of the claim under discussion.

Respond with valid JSON only, matching exactly this shape:
{
  "claim_number": "claim or reference number",
  "service_date": "date of service",
  "billed_amount": "amount in dispute or billed",
  "denial_reason": "stated reason for denial, if any",
  "status": "current claim status as described",
  "next_steps": ["actions agreed on the call"]
}

Use an empty string or empty array for anything not discussed. Do not add commentary outside the JSON object."#;

/// System prompt for the general-inquiry specialist.
pub const GENERAL_SYSTEM: &str = r#"You are a member services specialist reviewing a healthcare call transcript that fits no specific category. Summarize the inquiry.

Respond with valid JSON only, matching exactly this shape:
{
  "inquiry_type": "short label for the inquiry",
  "member_concerns": ["distinct concerns raised"],
  "information_requested": "what the member asked for",
  "resolution": "what was resolved on the call",
  "follow_up_needed": true or false
}

Use an empty string, empty array, or false for anything not discussed. Do not add commentary outside the JSON object."#;

/// System prompt for the medical-entity extraction engine.
pub const MEDICAL_SYSTEM: &str = r#"You are a clinical coder reviewing a healthcare call transcript. Extract every clinical entity mentioned.

Respond with valid JSON only, matching exactly this shape:
{
  "conditions": ["diagnoses or conditions"],
  "medications": ["medications with dose if stated"],
  "symptoms": ["reported symptoms"],
  "procedures": ["procedures or services"],
  "allergies": ["stated allergies"]
}

Use empty arrays for categories with no mentions. Do not add commentary outside the JSON object."#;

/// System prompt for the urgency engine.
pub const URGENCY_SYSTEM: &str = r#"You are a triage analyst scoring how urgent a healthcare call is.

Respond with valid JSON only, matching exactly this shape:
{
  "level": 0,
  "indicators": {"medical": 0, "administrative": 0, "emotional": 0},
  "rationale": "one sentence"
}

All numbers are integers from 0 (no urgency) to 10 (emergency). Do not add commentary outside the JSON object."#;

/// System prompt for the sentiment engine.
pub const SENTIMENT_SYSTEM: &str = r#"You are an analyst scoring the member's sentiment on a healthcare call.

Respond with valid JSON only, matching exactly this shape:
{
  "score": 0,
  "emotions": ["distinct emotions expressed"],
  "summary": "one sentence"
}

The score is a number from -10 (extremely dissatisfied) to 10 (extremely satisfied). Do not add commentary outside the JSON object."#;

/// System prompt for the multi-agent SOAP generator.
pub const SOAP_SYSTEM: &str = r#"You are a clinical documentation specialist. Write a SOAP note for the healthcare call below, using the structured context gathered by prior analysis.

Rules:
1. Produce exactly four sections headed SUBJECTIVE:, OBJECTIVE:, ASSESSMENT:, PLAN:, in that order.
2. SUBJECTIVE covers what the member reported. OBJECTIVE covers verifiable facts on file or stated. ASSESSMENT is the clinical and administrative interpretation. PLAN lists concrete next steps.
3. Base every statement on the transcript or the provided context. Do not invent clinical facts.
4. Plain text only, no markdown."#;

/// System prompt for the evaluation engine comparing the two notes.
pub const EVALUATION_SYSTEM: &str = r#"You are a clinical documentation reviewer comparing two SOAP notes produced from the same healthcare call.

Score each note on four dimensions from 0 to 10: completeness, accuracy, clinical_relevance, actionability.

Respond with valid JSON only, matching exactly this shape:
{
  "multi_agent": {
    "completeness": {"score": 0, "comments": ""},
    "accuracy": {"score": 0, "comments": ""},
    "clinical_relevance": {"score": 0, "comments": ""},
    "actionability": {"score": 0, "comments": ""}
  },
  "sequential": {
    "completeness": {"score": 0, "comments": ""},
    "accuracy": {"score": 0, "comments": ""},
    "clinical_relevance": {"score": 0, "comments": ""},
    "actionability": {"score": 0, "comments": ""}
  },
  "winner": "multiagent" or "legacy" or "tie",
  "reasoning": "two or three sentences"
}

Do not add commentary outside the JSON object."#;

/// System prompt for the sequential pipeline's disposition step.
pub const SEQ_DISPOSITION_SYSTEM: &str = r#"You are classifying a healthcare contact center call. Choose the single best matching disposition from this list:

authorization, claims_inquiry, benefits, grievance, enrollment, billing, eligibility, pharmacy, referral, appeal, scheduling, provider_search, coverage_change, demographic_update, id_card_request, payment_issue, wellness_program, technical_support

Respond with one disposition name from the list and nothing else."#;

/// System prompt for the sequential pipeline's SOAP step.
pub const SEQ_SOAP_SYSTEM: &str = r#"You are a clinical documentation specialist. Write a SOAP note for the healthcare call below.

Rules:
1. Produce exactly four sections headed SUBJECTIVE:, OBJECTIVE:, ASSESSMENT:, PLAN:, in that order.
2. Base every statement on the transcript. Do not invent clinical facts.
3. Plain text only, no markdown."#;

/// System prompt for the sequential pipeline's sentiment step.
pub const SEQ_SENTIMENT_SYSTEM: &str = r#"Rate the member's overall sentiment on this healthcare call as a single number from -10 (extremely dissatisfied) to 10 (extremely satisfied).

Respond with the number and nothing else."#;

/// System prompt for the sequential pipeline's topic labeling step.
pub const SEQ_TOPICS_SYSTEM: &str = r#"List the main topics of this healthcare call, one topic per line, most important first. At most three topics. You may append a confidence between 0 and 1 in parentheses, for example:

Claim denial for imaging (0.9)

Respond with the topic lines and nothing else."#;

/// User prompt wrapping the raw transcript.
pub fn transcript_prompt(transcript: &str) -> String {
    format!("Call transcript:\n\n{transcript}")
}

/// User prompt for the multi-agent SOAP generator: accumulated context as a
/// JSON snapshot plus the raw transcript.
pub fn soap_generation_prompt(transcript: &str, context: &serde_json::Value) -> String {
    let context_json = serde_json::to_string_pretty(context)
        .unwrap_or_else(|_| "{}".to_string());
    format!(
        "Context gathered by prior analysis:\n{context_json}\n\nCall transcript:\n\n{transcript}"
    )
}

/// User prompt for the sequential pipeline's SOAP step.
pub fn sequential_soap_prompt(transcript: &str, disposition: CallDisposition) -> String {
    format!("Call disposition: {disposition}\n\nCall transcript:\n\n{transcript}")
}

/// User prompt for the evaluation engine: both notes, labeled A and B.
pub fn evaluation_prompt(
    transcript: &str,
    multi_agent_note: &str,
    sequential_note: &str,
) -> String {
    format!(
        "Call transcript:\n\n{transcript}\n\n\
         Note A (multi_agent):\n{multi_agent_note}\n\n\
         Note B (sequential):\n{sequential_note}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soap_generation_prompt_embeds_context() {
        let context = serde_json::json!({"disposition": "authorization"});
        let prompt = soap_generation_prompt("hello", &context);
        assert!(prompt.contains("\"disposition\": \"authorization\""));
        assert!(prompt.contains("Call transcript:\n\nhello"));
    }

    #[test]
    fn test_sequential_soap_prompt_carries_disposition() {
        let prompt = sequential_soap_prompt("hi", CallDisposition::Pharmacy);
        assert!(prompt.contains("Call disposition: pharmacy"));
    }

    #[test]
    fn test_seq_disposition_system_lists_full_vocabulary() {
        for disposition in CallDisposition::ALL {
            assert!(
                SEQ_DISPOSITION_SYSTEM.contains(disposition.as_str()),
                "missing {disposition}"
            );
        }
    }
}
