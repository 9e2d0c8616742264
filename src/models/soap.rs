use serde::{Deserialize, Serialize};

/// The four canonical section headers, in S-O-A-P order.
const HEADERS: [&str; 4] = ["subjective", "objective", "assessment", "plan"];

/// A four-section clinical note.
///
/// Partially populated notes (some sections empty) are valid and must render
/// and compare without error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoapNote {
    #[serde(default)]
    pub subjective: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub assessment: String,
    #[serde(default)]
    pub plan: String,
}

impl SoapNote {
    /// Parse free-form model text into a SOAP note.
    ///
    /// Scans for the case-insensitive section headers SUBJECTIVE, OBJECTIVE,
    /// ASSESSMENT and PLAN (each optionally followed by a colon). A section's
    /// content runs from its header to the first *present* header among the
    /// canonical headers that follow it, or to the end of text. A missing
    /// header yields an empty section. A following header that occurs earlier
    /// in the text than the section's own header also yields an empty section,
    /// so out-of-order headers absorb later sections into the earlier one.
    pub fn parse(raw: &str) -> Self {
        let positions: [Option<usize>; 4] = HEADERS.map(|h| find_ascii_ci(raw, h));

        let mut sections = [const { String::new() }; 4];
        for i in 0..4 {
            let Some(start) = positions[i] else { continue };
            let mut content_start = start + HEADERS[i].len();
            if raw.as_bytes().get(content_start) == Some(&b':') {
                content_start += 1;
            }

            let end = positions[i + 1..]
                .iter()
                .find_map(|p| *p)
                .unwrap_or(raw.len());

            if end > content_start {
                sections[i] = raw[content_start..end].trim().to_string();
            }
        }

        let [subjective, objective, assessment, plan] = sections;
        Self {
            subjective,
            objective,
            assessment,
            plan,
        }
    }

    /// All four sections are empty.
    pub fn is_empty(&self) -> bool {
        self.subjective.is_empty()
            && self.objective.is_empty()
            && self.assessment.is_empty()
            && self.plan.is_empty()
    }

    /// Sections paired with their display labels, in canonical order.
    pub fn sections(&self) -> [(&'static str, &str); 4] {
        [
            ("SUBJECTIVE", self.subjective.as_str()),
            ("OBJECTIVE", self.objective.as_str()),
            ("ASSESSMENT", self.assessment.as_str()),
            ("PLAN", self.plan.as_str()),
        ]
    }

    /// Word counts per section, in canonical order.
    pub fn section_word_counts(&self) -> [(&'static str, usize); 4] {
        self.sections().map(|(label, text)| (label, word_count(text)))
    }
}

/// Whitespace word count of the trimmed text.
///
/// An empty section counts as 1: splitting an empty string yields a single
/// empty token. Only used for display strings, never for decision logic.
pub fn word_count(text: &str) -> usize {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        1
    } else {
        trimmed.split_whitespace().count()
    }
}

/// First occurrence of an ASCII needle in the text, ignoring case.
fn find_ascii_ci(text: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    if needle.is_empty() || text.len() < needle.len() {
        return None;
    }
    text.as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_sections_in_order() {
        let raw = "SUBJECTIVE: Member reports knee pain.\n\
                   OBJECTIVE: Prior MRI on file.\n\
                   ASSESSMENT: Likely meniscal tear.\n\
                   PLAN: Approve orthopedic referral.";
        let note = SoapNote::parse(raw);
        assert_eq!(note.subjective, "Member reports knee pain.");
        assert_eq!(note.objective, "Prior MRI on file.");
        assert_eq!(note.assessment, "Likely meniscal tear.");
        assert_eq!(note.plan, "Approve orthopedic referral.");
    }

    #[test]
    fn test_parse_case_insensitive_without_colons() {
        let raw = "subjective member called\nobjective none\nassessment stable\nplan follow up";
        let note = SoapNote::parse(raw);
        assert_eq!(note.subjective, "member called");
        assert_eq!(note.objective, "none");
        assert_eq!(note.assessment, "stable");
        assert_eq!(note.plan, "follow up");
    }

    #[test]
    fn test_parse_no_headers_yields_empty_note() {
        let note = SoapNote::parse("The member called about a billing question.");
        assert!(note.is_empty());
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(SoapNote::parse("").is_empty());
    }

    #[test]
    fn test_parse_missing_section_is_empty_not_error() {
        let raw = "SUBJECTIVE: pain\nASSESSMENT: sprain\nPLAN: rest";
        let note = SoapNote::parse(raw);
        assert_eq!(note.subjective, "pain");
        assert_eq!(note.objective, "");
        assert_eq!(note.assessment, "sprain");
        assert_eq!(note.plan, "rest");
    }

    #[test]
    fn test_parse_out_of_order_plan_absorbs_assessment() {
        let note = SoapNote::parse("PLAN: x ASSESSMENT: y");
        assert_eq!(note.plan, "x ASSESSMENT: y");
        assert_eq!(note.assessment, "");
        assert_eq!(note.subjective, "");
        assert_eq!(note.objective, "");
    }

    #[test]
    fn test_word_count_empty_section_is_one() {
        assert_eq!(word_count(""), 1);
        assert_eq!(word_count("   "), 1);
    }

    #[test]
    fn test_word_count_splits_on_whitespace() {
        assert_eq!(word_count("approve the referral"), 3);
        assert_eq!(word_count("  one\ttwo\nthree  "), 3);
    }

    #[test]
    fn test_section_word_counts_order() {
        let note = SoapNote {
            subjective: "a b".to_string(),
            ..Default::default()
        };
        let counts = note.section_word_counts();
        assert_eq!(counts[0], ("SUBJECTIVE", 2));
        assert_eq!(counts[1], ("OBJECTIVE", 1));
    }
}
