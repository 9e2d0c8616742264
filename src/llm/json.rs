use serde::de::DeserializeOwned;

/// Locate the first balanced JSON object embedded in model output.
///
/// Models wrap JSON in prose or code fences often enough that a bare
/// `serde_json::from_str` on the whole response is unreliable. This scans for
/// the first `{`, then tracks brace depth while respecting string literals
/// and escapes, and returns the balanced slice.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Decode the first JSON object in a model response into `T`.
///
/// Returns `None` when no balanced object exists or it does not match the
/// expected shape; callers decide how to degrade.
pub fn decode_json<T: DeserializeOwned>(text: &str) -> Option<T> {
    let raw = extract_json_object(text)?;
    serde_json::from_str(raw).ok()
}

/// Pull the first numeric token out of free-form model text.
///
/// Used by steps that ask for a bare number but must tolerate surrounding
/// prose. Trailing punctuation is stripped before parsing.
pub fn extract_number(text: &str) -> Option<f64> {
    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_ascii_digit() && c != '-' && c != '.'))
        .find_map(|token| token.parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_extract_plain_object() {
        let text = r#"{"level": 7}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn test_extract_from_code_fence() {
        let text = "Here you go:\n```json\n{\"score\": -4}\n```\nLet me know.";
        assert_eq!(extract_json_object(text), Some("{\"score\": -4}"));
    }

    #[test]
    fn test_extract_nested_and_braces_in_strings() {
        let text = r#"prefix {"a": {"b": "close } brace"}, "c": 1} suffix"#;
        let raw = extract_json_object(text).unwrap();
        let value: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(value["a"]["b"], "close } brace");
        assert_eq!(value["c"], 1);
    }

    #[test]
    fn test_extract_unbalanced_returns_none() {
        assert_eq!(extract_json_object("{\"a\": 1"), None);
        assert_eq!(extract_json_object("no braces here"), None);
    }

    #[test]
    fn test_decode_mismatched_shape_is_none() {
        #[derive(serde::Deserialize)]
        struct Expected {
            #[allow(dead_code)]
            level: u8,
        }
        assert!(decode_json::<Expected>(r#"{"level": "very"}"#).is_none());
    }

    #[test]
    fn test_extract_number_from_prose() {
        assert_eq!(extract_number("The score is -5."), Some(-5.0));
        assert_eq!(extract_number("7"), Some(7.0));
        assert_eq!(extract_number("about 3.5 overall"), Some(3.5));
        assert_eq!(extract_number("no numbers"), None);
    }
}
