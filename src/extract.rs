//! Recovery of a single JSON object from free-form generator output.
//!
//! Model responses are expected to be bare JSON but routinely arrive wrapped
//! in markdown fences, surrounded by prose, or carrying trailing commas.
//! This module strips the noise, repairs the common defects, and decodes the
//! result, failing with [`ApiError::Extraction`] when no object can be
//! recovered.

use serde_json::Value;

use crate::error::{ApiError, Result};

/// Extract and decode the JSON object embedded in `raw`.
pub fn extract_json_object(raw: &str) -> Result<Value> {
    let stripped = strip_code_fences(raw);

    let span = balanced_object_span(&stripped).ok_or_else(|| ApiError::Extraction {
        reason: "no balanced {...} span found".to_string(),
        raw: raw.to_string(),
    })?;

    let repaired = strip_trailing_commas(span);

    serde_json::from_str(&repaired).map_err(|err| ApiError::Extraction {
        reason: format!("JSON decode failed after repair: {err}"),
        raw: raw.to_string(),
    })
}

/// Remove markdown code-fence markers (```json / ```), keeping the content.
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "")
}

/// Locate the first `{` and its balance-matched closing `}`.
///
/// Walks the text tracking brace depth, string literals, and escapes, so
/// braces inside string values never truncate the span. A naive
/// first-`{`-to-last-`}` match is not used: prose after the payload may
/// itself contain a stray `}`.
fn balanced_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Drop commas that directly precede a closing `}` or `]`, outside strings.
fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            out.push(ch);
            continue;
        }
        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '}' | ']' => {
                // Rewind over whitespace to see whether a comma dangles here.
                let tail = out.trim_end_matches(char::is_whitespace);
                if tail.ends_with(',') {
                    let cut = tail.len() - 1;
                    out.truncate(cut);
                }
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fenced_json_with_trailing_comma() {
        let raw = "prefix ```json {\"a\":1,} ``` suffix";
        let value = extract_json_object(raw).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn prose_around_bare_json() {
        let raw = "Here is your itinerary:\n{\"title\": \"Goa\", \"days\": []}\nEnjoy!";
        let value = extract_json_object(raw).unwrap();
        assert_eq!(value["title"], "Goa");
    }

    #[test]
    fn braces_inside_strings_do_not_truncate() {
        let raw = "{\"note\": \"use {curly} braces\", \"n\": 2} trailing }";
        let value = extract_json_object(raw).unwrap();
        assert_eq!(value["note"], "use {curly} braces");
        assert_eq!(value["n"], 2);
    }

    #[test]
    fn nested_trailing_commas_repaired() {
        let raw = "{\"days\": [{\"day\": 1,}, {\"day\": 2,},], \"totalCost\": 100,}";
        let value = extract_json_object(raw).unwrap();
        assert_eq!(value["days"].as_array().unwrap().len(), 2);
        assert_eq!(value["totalCost"], 100);
    }

    #[test]
    fn comma_inside_string_survives() {
        let raw = "{\"title\": \"beaches, food,\"}";
        let value = extract_json_object(raw).unwrap();
        assert_eq!(value["title"], "beaches, food,");
    }

    #[test]
    fn no_braces_is_extraction_failure() {
        let raw = "I'm sorry, I cannot plan that trip.";
        let err = extract_json_object(raw).unwrap_err();
        match err {
            ApiError::Extraction { raw: kept, .. } => assert_eq!(kept, raw),
            other => panic!("expected Extraction, got {other:?}"),
        }
    }

    #[test]
    fn unbalanced_object_is_extraction_failure() {
        let raw = "{\"title\": \"truncated";
        assert!(extract_json_object(raw).is_err());
    }

    #[test]
    fn escaped_quote_in_string_handled() {
        let raw = "{\"title\": \"the \\\"best\\\" trip\"}";
        let value = extract_json_object(raw).unwrap();
        assert_eq!(value["title"], "the \"best\" trip");
    }
}
