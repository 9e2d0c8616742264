use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::models::{
    AuthorizationDetails, ClaimsDetails, Disposition, EvaluationResults, Extraction,
    GeneralInquiryDetails, MedicalEntities, SentimentAssessment, SoapNote, UrgencyAssessment,
};

/// Marker for messages addressed to no specific agent.
pub const BROADCAST: &str = "all";

/// One entry in the audit log. Immutable once created; purely observational,
/// no control-flow decisions read it back.
#[derive(Debug, Clone, Serialize)]
pub struct AgentMessage {
    pub id: String,
    pub from: String,
    pub to: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl AgentMessage {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            from: from.into(),
            to: to.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn broadcast(from: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(from, BROADCAST, content)
    }
}

/// Append-only ordered log of agent messages.
///
/// Ordering is insertion order, not step number: concurrent steps may append
/// in nondeterministic relative order, and readers group by sender instead.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct MessageLog {
    messages: Vec<AgentMessage>,
}

impl MessageLog {
    pub fn push(&mut self, message: AgentMessage) {
        self.messages.push(message);
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.messages.iter().any(|m| m.id == id)
    }

    /// Append messages from another log, skipping ids already present.
    ///
    /// Guards against double-insertion when a parallel branch echoes messages
    /// from the snapshot it was handed. Returns the number appended.
    pub fn extend_dedup(&mut self, other: &MessageLog) -> usize {
        let seen: HashSet<&str> = self.messages.iter().map(|m| m.id.as_str()).collect();
        let fresh: Vec<AgentMessage> = other
            .messages
            .iter()
            .filter(|m| !seen.contains(m.id.as_str()))
            .cloned()
            .collect();
        let appended = fresh.len();
        self.messages.extend(fresh);
        appended
    }

    /// Secondary index keyed by sender, built once at read time.
    pub fn by_sender(&self) -> HashMap<&str, Vec<&AgentMessage>> {
        let mut index: HashMap<&str, Vec<&AgentMessage>> = HashMap::new();
        for message in &self.messages {
            index.entry(message.from.as_str()).or_default().push(message);
        }
        index
    }
}

/// Per-specialist extraction slots. Each specialist writes exactly one slot
/// and never another's.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractedInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization: Option<Extraction<AuthorizationDetails>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<Extraction<ClaimsDetails>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general: Option<Extraction<GeneralInquiryDetails>>,
}

impl ExtractedInfo {
    pub fn is_empty(&self) -> bool {
        self.authorization.is_none() && self.claims.is_none() && self.general.is_none()
    }
}

/// Shared state threaded through one multi-agent run.
///
/// Created fresh per submitted transcript, never persisted, discarded when
/// the caller starts a new run. Each step receives the state by value and
/// returns a modified copy; fields are written once by their owning step.
#[derive(Debug, Clone, Serialize)]
pub struct AgentState {
    pub transcript: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposition: Option<Disposition>,
    pub extracted_info: ExtractedInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<UrgencyAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_info: Option<Extraction<MedicalEntities>>,
    pub soap_note: SoapNote,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationResults>,
    pub messages: MessageLog,
}

impl AgentState {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            disposition: None,
            extracted_info: ExtractedInfo::default(),
            urgency: None,
            sentiment: None,
            medical_info: None,
            soap_note: SoapNote::default(),
            evaluation: None,
            messages: MessageLog::default(),
        }
    }

    /// JSON snapshot of the accumulated context, embedded in the SOAP
    /// generation prompt. Excludes the transcript and the message log.
    pub fn context_snapshot(&self) -> serde_json::Value {
        json!({
            "disposition": self.disposition,
            "extracted_info": self.extracted_info,
            "urgency": self.urgency,
            "sentiment": self.sentiment,
            "medical_info": self.medical_info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_log_preserves_insertion_order() {
        let mut log = MessageLog::default();
        log.push(AgentMessage::broadcast("a", "first"));
        log.push(AgentMessage::broadcast("b", "second"));
        let contents: Vec<&str> = log.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["first", "second"]);
    }

    #[test]
    fn test_extend_dedup_skips_known_ids() {
        let mut base = MessageLog::default();
        base.push(AgentMessage::broadcast("routing", "classified"));

        // Branch log starts from the same snapshot and adds one message.
        let mut branch = base.clone();
        branch.push(AgentMessage::broadcast("urgency", "level 4"));

        let appended = base.extend_dedup(&branch);
        assert_eq!(appended, 1);
        assert_eq!(base.len(), 2);

        // A second merge of the same branch adds nothing.
        assert_eq!(base.extend_dedup(&branch), 0);
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn test_by_sender_groups_messages() {
        let mut log = MessageLog::default();
        log.push(AgentMessage::broadcast("urgency", "one"));
        log.push(AgentMessage::broadcast("sentiment", "two"));
        log.push(AgentMessage::broadcast("urgency", "three"));

        let index = log.by_sender();
        assert_eq!(index["urgency"].len(), 2);
        assert_eq!(index["sentiment"].len(), 1);
        assert_eq!(index["urgency"][1].content, "three");
    }

    #[test]
    fn test_context_snapshot_shape() {
        let mut state = AgentState::new("Member called about an MRI.");
        state.disposition = Some(Disposition::Authorization);
        let snapshot = state.context_snapshot();
        assert_eq!(snapshot["disposition"], "authorization");
        assert!(snapshot.get("transcript").is_none());
    }
}
