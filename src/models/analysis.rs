use std::fmt;

use serde::{Deserialize, Serialize};

/// Urgency indicator breakdown by category, each 0-10.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UrgencyIndicators {
    #[serde(default)]
    pub medical: u8,
    #[serde(default)]
    pub administrative: u8,
    #[serde(default)]
    pub emotional: u8,
}

/// Urgency assessment produced by the urgency engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UrgencyAssessment {
    /// Overall urgency level, 0-10. Defaults to 0 when the model response
    /// cannot be decoded.
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub indicators: UrgencyIndicators,
    #[serde(default)]
    pub rationale: String,
}

impl UrgencyAssessment {
    pub fn label(&self) -> &'static str {
        urgency_label(self.level)
    }
}

/// Fixed label bands for an urgency level.
pub fn urgency_label(level: u8) -> &'static str {
    if level >= 9 {
        "HIGH URGENCY"
    } else if level >= 6 {
        "Moderate"
    } else if level >= 3 {
        "Mild"
    } else {
        "No urgency"
    }
}

/// Tri-state sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Satisfied,
    Neutral,
    Dissatisfied,
}

impl SentimentLabel {
    /// Map a numeric score to a label with the fixed asymmetric threshold:
    /// scores of exactly 3 or -3 stay neutral.
    pub fn from_score(score: f64) -> Self {
        if score > 3.0 {
            Self::Satisfied
        } else if score < -3.0 {
            Self::Dissatisfied
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Satisfied => "satisfied",
            Self::Neutral => "neutral",
            Self::Dissatisfied => "dissatisfied",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentiment assessment produced by the sentiment engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentimentAssessment {
    /// Numeric sentiment score, -10 to 10. Defaults to 0 (neutral) when the
    /// model response cannot be decoded.
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub emotions: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

impl SentimentAssessment {
    pub fn label(&self) -> SentimentLabel {
        SentimentLabel::from_score(self.score)
    }
}

/// A labeled call topic from the sequential pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Topic {
    pub label: String,
    pub confidence: f64,
}
