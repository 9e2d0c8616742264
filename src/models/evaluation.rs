use std::fmt;

use serde::{Deserialize, Serialize};

/// One scored dimension of a generated note.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DimensionScore {
    /// Score 0-10.
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub comments: String,
}

impl DimensionScore {
    fn neutral() -> Self {
        Self {
            score: 5.0,
            comments: String::new(),
        }
    }
}

/// Per-system evaluation across the four fixed dimensions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemEvaluation {
    #[serde(default)]
    pub completeness: DimensionScore,
    #[serde(default)]
    pub accuracy: DimensionScore,
    #[serde(default)]
    pub clinical_relevance: DimensionScore,
    #[serde(default)]
    pub actionability: DimensionScore,
    /// Weighted overall quality. Always recomputed locally from the four
    /// dimension scores; a model-supplied value is overwritten.
    #[serde(default)]
    pub overall_quality: f64,
}

impl SystemEvaluation {
    /// Neutral evaluation used when the model response cannot be decoded.
    pub fn neutral() -> Self {
        let mut eval = Self {
            completeness: DimensionScore::neutral(),
            accuracy: DimensionScore::neutral(),
            clinical_relevance: DimensionScore::neutral(),
            actionability: DimensionScore::neutral(),
            overall_quality: 0.0,
        };
        eval.recompute_overall();
        eval
    }

    /// The fixed weighting:
    /// `0.3*completeness + 0.3*accuracy + 0.2*clinical_relevance + 0.2*actionability`.
    ///
    /// Computed as a scaled integer-weight sum so whole-number scores produce
    /// exact results (0.3 and 0.2 are not exact in binary).
    pub fn weighted_quality(&self) -> f64 {
        (3.0 * self.completeness.score
            + 3.0 * self.accuracy.score
            + 2.0 * self.clinical_relevance.score
            + 2.0 * self.actionability.score)
            / 10.0
    }

    pub fn recompute_overall(&mut self) {
        self.overall_quality = self.weighted_quality();
    }
}

/// Which system produced the better note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    #[serde(alias = "multi_agent", alias = "multi-agent")]
    Multiagent,
    #[serde(alias = "sequential")]
    Legacy,
    Tie,
}

impl Winner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Multiagent => "multiagent",
            Self::Legacy => "legacy",
            Self::Tie => "tie",
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full comparison output for one pair of notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResults {
    /// Mean of the two recomputed overall qualities.
    #[serde(default)]
    pub overall_score: f64,
    #[serde(default)]
    pub multi_agent: SystemEvaluation,
    #[serde(default)]
    pub sequential: SystemEvaluation,
    pub winner: Winner,
    #[serde(default)]
    pub reasoning: String,
}

impl EvaluationResults {
    /// Fixed neutral result used when the evaluation response cannot be
    /// decoded: all dimension scores 5, a tie, and reasoning that records the
    /// parsing error.
    pub fn neutral_fallback() -> Self {
        Self {
            overall_score: 0.0,
            multi_agent: SystemEvaluation::neutral(),
            sequential: SystemEvaluation::neutral(),
            winner: Winner::Tie,
            reasoning: "A parsing error occurred while reading the evaluation response; \
                        scores defaulted to a tie."
                .to_string(),
        }
    }

    /// Recompute both overall qualities and the combined score. Local
    /// recomputation takes precedence over any model-supplied values.
    pub fn finalize(&mut self) {
        self.multi_agent.recompute_overall();
        self.sequential.recompute_overall();
        self.overall_score =
            (self.multi_agent.overall_quality + self.sequential.overall_quality) / 2.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(completeness: f64, accuracy: f64, clinical: f64, actionability: f64) -> SystemEvaluation {
        SystemEvaluation {
            completeness: DimensionScore {
                score: completeness,
                comments: String::new(),
            },
            accuracy: DimensionScore {
                score: accuracy,
                comments: String::new(),
            },
            clinical_relevance: DimensionScore {
                score: clinical,
                comments: String::new(),
            },
            actionability: DimensionScore {
                score: actionability,
                comments: String::new(),
            },
            overall_quality: 0.0,
        }
    }

    #[test]
    fn test_weighted_quality_formula_exact() {
        let evaluation = eval(8.0, 6.0, 10.0, 4.0);
        assert_eq!(evaluation.weighted_quality(), 7.0);
    }

    #[test]
    fn test_recompute_overwrites_model_supplied_value() {
        let mut evaluation = eval(10.0, 10.0, 10.0, 10.0);
        evaluation.overall_quality = 1.0;
        evaluation.recompute_overall();
        assert_eq!(evaluation.overall_quality, 10.0);
    }

    #[test]
    fn test_neutral_fallback_is_tie_of_fives() {
        let fallback = EvaluationResults::neutral_fallback();
        assert_eq!(fallback.winner, Winner::Tie);
        assert_eq!(fallback.multi_agent.completeness.score, 5.0);
        assert_eq!(fallback.multi_agent.overall_quality, 5.0);
        assert!(fallback.reasoning.contains("parsing error"));
    }

    #[test]
    fn test_winner_aliases_decode() {
        assert_eq!(
            serde_json::from_str::<Winner>("\"multi_agent\"").unwrap(),
            Winner::Multiagent
        );
        assert_eq!(
            serde_json::from_str::<Winner>("\"sequential\"").unwrap(),
            Winner::Legacy
        );
        assert_eq!(
            serde_json::from_str::<Winner>("\"tie\"").unwrap(),
            Winner::Tie
        );
    }

    #[test]
    fn test_evaluation_results_decode_and_finalize() {
        let json = r#"{
            "multi_agent": {
                "completeness": {"score": 8, "comments": "thorough"},
                "accuracy": {"score": 6, "comments": ""},
                "clinical_relevance": {"score": 10, "comments": ""},
                "actionability": {"score": 4, "comments": ""},
                "overall_quality": 2.0
            },
            "sequential": {
                "completeness": {"score": 5, "comments": ""},
                "accuracy": {"score": 5, "comments": ""},
                "clinical_relevance": {"score": 5, "comments": ""},
                "actionability": {"score": 5, "comments": ""}
            },
            "winner": "multiagent",
            "reasoning": "More complete."
        }"#;
        let mut results: EvaluationResults = serde_json::from_str(json).unwrap();
        results.finalize();
        assert_eq!(results.multi_agent.overall_quality, 7.0);
        assert_eq!(results.sequential.overall_quality, 5.0);
        assert_eq!(results.overall_score, 6.0);
        assert_eq!(results.winner, Winner::Multiagent);
    }
}
