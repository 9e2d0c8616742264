use std::fmt;

use serde::{Serialize, Serializer};

/// Call-type category assigned by the routing agent.
///
/// The multi-agent pipeline uses this closed set plus an `Other` carrier: the
/// model is instructed to answer with a single bare word, and an unrecognized
/// answer is kept verbatim (trimmed, lower-cased) rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Authorization,
    ClaimsInquiry,
    Benefits,
    Grievance,
    Enrollment,
    General,
    /// Unrecognized category, kept verbatim.
    Other(String),
}

impl Disposition {
    /// Map a raw model response to a disposition.
    ///
    /// The response is trimmed and lower-cased; no membership validation is
    /// performed beyond matching the known tags.
    pub fn from_model_response(raw: &str) -> Self {
        let word = raw.trim().to_lowercase();
        match word.as_str() {
            "authorization" => Self::Authorization,
            "claims_inquiry" => Self::ClaimsInquiry,
            "benefits" => Self::Benefits,
            "grievance" => Self::Grievance,
            "enrollment" => Self::Enrollment,
            "general" => Self::General,
            _ => Self::Other(word),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Authorization => "authorization",
            Self::ClaimsInquiry => "claims_inquiry",
            Self::Benefits => "benefits",
            Self::Grievance => "grievance",
            Self::Enrollment => "enrollment",
            Self::General => "general",
            Self::Other(word) => word,
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Disposition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Disposition vocabulary of the sequential pipeline.
///
/// Intentionally independent of [`Disposition`]: the two pipelines are never
/// compared on dispositions, only on their SOAP outputs, and they keep their
/// own fallback policies. This one scans the raw response for the first
/// category name it contains and falls back to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallDisposition {
    Authorization,
    ClaimsInquiry,
    Benefits,
    Grievance,
    Enrollment,
    Billing,
    Eligibility,
    Pharmacy,
    Referral,
    Appeal,
    Scheduling,
    ProviderSearch,
    CoverageChange,
    DemographicUpdate,
    IdCardRequest,
    PaymentIssue,
    WellnessProgram,
    TechnicalSupport,
    Other,
}

impl CallDisposition {
    /// The fixed vocabulary scanned against model responses, in scan order.
    pub const ALL: [CallDisposition; 18] = [
        Self::Authorization,
        Self::ClaimsInquiry,
        Self::Benefits,
        Self::Grievance,
        Self::Enrollment,
        Self::Billing,
        Self::Eligibility,
        Self::Pharmacy,
        Self::Referral,
        Self::Appeal,
        Self::Scheduling,
        Self::ProviderSearch,
        Self::CoverageChange,
        Self::DemographicUpdate,
        Self::IdCardRequest,
        Self::PaymentIssue,
        Self::WellnessProgram,
        Self::TechnicalSupport,
    ];

    /// Substring-containment scan against the fixed vocabulary.
    ///
    /// Returns the first category whose name the lower-cased response
    /// contains, or `Other` when nothing matches.
    pub fn from_model_response(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|d| lowered.contains(d.as_str()))
            .unwrap_or(Self::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authorization => "authorization",
            Self::ClaimsInquiry => "claims_inquiry",
            Self::Benefits => "benefits",
            Self::Grievance => "grievance",
            Self::Enrollment => "enrollment",
            Self::Billing => "billing",
            Self::Eligibility => "eligibility",
            Self::Pharmacy => "pharmacy",
            Self::Referral => "referral",
            Self::Appeal => "appeal",
            Self::Scheduling => "scheduling",
            Self::ProviderSearch => "provider_search",
            Self::CoverageChange => "coverage_change",
            Self::DemographicUpdate => "demographic_update",
            Self::IdCardRequest => "id_card_request",
            Self::PaymentIssue => "payment_issue",
            Self::WellnessProgram => "wellness_program",
            Self::TechnicalSupport => "technical_support",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for CallDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CallDisposition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_disposition_known_word() {
        assert_eq!(
            Disposition::from_model_response("  Claims_Inquiry \n"),
            Disposition::ClaimsInquiry
        );
    }

    #[test]
    fn test_routing_disposition_unknown_word_kept_verbatim() {
        assert_eq!(
            Disposition::from_model_response("Telehealth"),
            Disposition::Other("telehealth".to_string())
        );
    }

    #[test]
    fn test_sequential_disposition_substring_scan() {
        assert_eq!(
            CallDisposition::from_model_response("This call is a claims_inquiry about a denial"),
            CallDisposition::ClaimsInquiry
        );
        assert_eq!(
            CallDisposition::from_model_response("PHARMACY"),
            CallDisposition::Pharmacy
        );
    }

    #[test]
    fn test_sequential_disposition_falls_back_to_other() {
        assert_eq!(
            CallDisposition::from_model_response("no recognizable category here"),
            CallDisposition::Other
        );
    }
}
