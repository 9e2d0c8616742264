use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::llm::json::decode_json;

/// Error marker stored when a model response cannot be decoded.
pub const PARSE_ERROR: &str = "Failed to parse response";

/// Outcome of decoding a model response against an agent's schema.
///
/// Either a fully-typed value or the raw text with an error marker; never a
/// partially-typed object. A malformed model response must never abort a run,
/// so decode failures degrade to `Unparsed` and the pipeline continues.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Extraction<T> {
    Parsed(T),
    Unparsed { error: String, raw_response: String },
}

impl<T: DeserializeOwned> Extraction<T> {
    /// Decode a raw model response, degrading to `Unparsed` on failure.
    pub fn decode(raw: &str) -> Self {
        match decode_json(raw) {
            Some(value) => Self::Parsed(value),
            None => Self::Unparsed {
                error: PARSE_ERROR.to_string(),
                raw_response: raw.to_string(),
            },
        }
    }
}

impl<T> Extraction<T> {
    pub fn as_parsed(&self) -> Option<&T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::Unparsed { .. } => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }
}

/// Prior-authorization details extracted from a call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorizationDetails {
    /// Requested procedure or service.
    #[serde(default)]
    pub procedure: String,
    /// Stated clinical justification.
    #[serde(default)]
    pub medical_necessity: String,
    /// Requesting provider or facility.
    #[serde(default)]
    pub provider: String,
    /// When the service is needed.
    #[serde(default)]
    pub timeline: String,
    /// Prior requests or denials mentioned on the call.
    #[serde(default)]
    pub previous_attempts: String,
    /// Supporting documents mentioned.
    #[serde(default)]
    pub documentation: Vec<String>,
}

/// Claim details extracted from a call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimsDetails {
    #[serde(default)]
    pub claim_number: String,
    #[serde(default)]
    pub service_date: String,
    #[serde(default)]
    pub billed_amount: String,
    #[serde(default)]
    pub denial_reason: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

/// Details of a call that fits no specialist category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralInquiryDetails {
    #[serde(default)]
    pub inquiry_type: String,
    #[serde(default)]
    pub member_concerns: Vec<String>,
    #[serde(default)]
    pub information_requested: String,
    #[serde(default)]
    pub resolution: String,
    #[serde(default)]
    pub follow_up_needed: bool,
}

/// Clinical entities mentioned anywhere in the transcript.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicalEntities {
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub procedures: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

impl MedicalEntities {
    /// Total number of extracted entities across all categories.
    pub fn entity_count(&self) -> usize {
        self.conditions.len()
            + self.medications.len()
            + self.symptoms.len()
            + self.procedures.len()
            + self.allergies.len()
    }
}
