//! Solved-problem answers and normalization of raw model output.
//!
//! The solve relay asks the vision model for a JSON object with
//! `explanation` and `steps`. Models do not always comply: answers arrive
//! wrapped in markdown fences, with enumerated or bolded steps, with steps as
//! objects, or as plain prose. [`Solution::from_model_output`] folds all of
//! those into the one shape the rest of the system consumes.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Explanation used when the model answered in prose instead of JSON.
pub const FALLBACK_EXPLANATION: &str =
    "I can see a math problem in the image. Let me help you solve it step by step.";

/// Explanation used when the model's JSON had no usable explanation.
pub const DEFAULT_EXPLANATION: &str = "Here's how to solve this math problem:";

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s*").expect("valid regex"));
static OPEN_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```\s*").expect("valid regex"));
static CLOSE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\s*$").expect("valid regex"));
static ENUMERATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*").expect("valid regex"));
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));

/// A structured answer to one math problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// Steps, in order, as plain text
    pub steps: Vec<String>,
    /// What the problem asks and how it is approached
    pub explanation: String,
}

impl Solution {
    /// Create a solution from already-normalized parts.
    pub fn new(explanation: impl Into<String>, steps: Vec<String>) -> Self {
        Self {
            steps,
            explanation: explanation.into(),
        }
    }

    /// Normalize the raw text content of a model completion.
    ///
    /// Never fails: unparseable content becomes a single-step solution
    /// carrying the raw text.
    pub fn from_model_output(content: &str) -> Self {
        let cleaned = strip_code_fences(content);

        let (explanation, raw_steps) = match serde_json::from_str::<Value>(&cleaned) {
            Ok(parsed) => {
                let explanation = parsed
                    .get("explanation")
                    .filter(|v| is_truthy(v))
                    .map(value_text)
                    .unwrap_or_else(|| DEFAULT_EXPLANATION.to_string());
                let steps = match parsed.get("steps") {
                    Some(Value::Array(items)) => items.clone(),
                    _ => vec![Value::String(content.to_string())],
                };
                (explanation, steps)
            }
            Err(_) => (
                FALLBACK_EXPLANATION.to_string(),
                vec![Value::String(content.to_string())],
            ),
        };

        let steps = raw_steps.iter().map(normalize_step).collect();
        Self::new(explanation, steps)
    }

    /// Lower-cased explanation and lower-cased, space-joined steps.
    pub fn lowercase_parts(&self) -> (String, String) {
        (
            self.explanation.to_lowercase(),
            self.steps.join(" ").to_lowercase(),
        )
    }

    /// Case-insensitive substring search over explanation and steps.
    ///
    /// `needle` must already be lower-cased.
    pub fn mentions(&self, needle: &str) -> bool {
        self.explanation.to_lowercase().contains(needle)
            || self
                .steps
                .iter()
                .any(|step| step.to_lowercase().contains(needle))
    }
}

/// Remove a markdown code fence around the payload.
fn strip_code_fences(content: &str) -> String {
    if content.contains("```json") {
        let opened = JSON_FENCE.replace(content, "");
        CLOSE_FENCE.replace(&opened, "").into_owned()
    } else if content.contains("```") {
        let opened = OPEN_FENCE.replace(content, "");
        CLOSE_FENCE.replace(&opened, "").into_owned()
    } else {
        content.to_string()
    }
}

fn normalize_step(step: &Value) -> String {
    match step {
        Value::String(text) => clean_step_text(text),
        Value::Object(fields) => match fields.get("step").filter(|v| is_truthy(v)) {
            Some(headline) => {
                let mut formatted = value_text(headline);
                for key in ["calculation", "equation"] {
                    if let Some(extra) = fields.get(key).filter(|v| is_truthy(v)) {
                        formatted.push_str("\n📊 ");
                        formatted.push_str(&value_text(extra));
                    }
                }
                let reasoning = ["reasoning", "reason", "explanation"]
                    .iter()
                    .find_map(|key| fields.get(*key).filter(|v| is_truthy(v)));
                if let Some(reasoning) = reasoning {
                    formatted.push_str("\n💡 ");
                    formatted.push_str(&value_text(reasoning));
                }
                formatted
            }
            None => step.to_string(),
        },
        other => other.to_string(),
    }
}

/// Drop a leading `1. ` enumeration and `**bold**` markers.
fn clean_step_text(text: &str) -> String {
    let unnumbered = ENUMERATION.replace(text, "");
    BOLD.replace_all(&unnumbered, "$1").trim().to_string()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let solution = Solution::from_model_output(
            r#"{"explanation": "Solve for x.", "steps": ["x + 2 = 5", "x = 3"]}"#,
        );
        assert_eq!(solution.explanation, "Solve for x.");
        assert_eq!(solution.steps, vec!["x + 2 = 5", "x = 3"]);
    }

    #[test]
    fn test_json_fence_is_stripped() {
        let raw = "```json\n{\"explanation\": \"Fenced.\", \"steps\": [\"a\"]}\n```";
        let solution = Solution::from_model_output(raw);
        assert_eq!(solution.explanation, "Fenced.");
        assert_eq!(solution.steps, vec!["a"]);
    }

    #[test]
    fn test_bare_fence_is_stripped() {
        let raw = "```\n{\"explanation\": \"Bare.\", \"steps\": []}\n```  ";
        let solution = Solution::from_model_output(raw);
        assert_eq!(solution.explanation, "Bare.");
        assert!(solution.steps.is_empty());
    }

    #[test]
    fn test_prose_falls_back_to_single_step() {
        let solution = Solution::from_model_output("  The answer is 42.  ");
        assert_eq!(solution.explanation, FALLBACK_EXPLANATION);
        assert_eq!(solution.steps, vec!["The answer is 42."]);
    }

    #[test]
    fn test_missing_steps_and_explanation() {
        let raw = r#"{"answer": 7}"#;
        let solution = Solution::from_model_output(raw);
        assert_eq!(solution.explanation, DEFAULT_EXPLANATION);
        assert_eq!(solution.steps, vec![raw]);
    }

    #[test]
    fn test_empty_explanation_uses_default() {
        let solution = Solution::from_model_output(r#"{"explanation": "", "steps": ["x"]}"#);
        assert_eq!(solution.explanation, DEFAULT_EXPLANATION);
    }

    #[test]
    fn test_steps_not_array() {
        let raw = r#"{"explanation": "E.", "steps": "just one"}"#;
        let solution = Solution::from_model_output(raw);
        assert_eq!(solution.steps, vec![raw]);
    }

    #[test]
    fn test_string_steps_are_cleaned() {
        let raw = r#"{"explanation": "E.", "steps": ["1. **Factor** the left side ", "12.   Check **both** roots"]}"#;
        let solution = Solution::from_model_output(raw);
        assert_eq!(
            solution.steps,
            vec!["Factor the left side", "Check both roots"]
        );
    }

    #[test]
    fn test_object_steps_are_flattened() {
        let raw = r#"{
            "explanation": "E.",
            "steps": [
                {"step": "Move the constant", "calculation": "x = 5 - 2", "reasoning": "isolate x"},
                {"step": "Check", "equation": "3 + 2 = 5", "reason": "verify"},
                {"step": "Done"},
                {"note": "no headline"},
                4
            ]
        }"#;
        let solution = Solution::from_model_output(raw);
        assert_eq!(
            solution.steps[0],
            "Move the constant\n📊 x = 5 - 2\n💡 isolate x"
        );
        assert_eq!(solution.steps[1], "Check\n📊 3 + 2 = 5\n💡 verify");
        assert_eq!(solution.steps[2], "Done");
        assert_eq!(solution.steps[3], r#"{"note":"no headline"}"#);
        assert_eq!(solution.steps[4], "4");
    }

    #[test]
    fn test_reasoning_precedence() {
        let raw = r#"{"explanation": "E.", "steps": [{"step": "S", "reason": "second", "explanation": "third"}]}"#;
        let solution = Solution::from_model_output(raw);
        assert_eq!(solution.steps, vec!["S\n💡 second"]);
    }

    #[test]
    fn test_mentions_is_case_insensitive() {
        let solution = Solution::new("A Quadratic.", vec!["Use the FORMULA".to_string()]);
        assert!(solution.mentions("quadratic"));
        assert!(solution.mentions("formula"));
        assert!(!solution.mentions("integral"));
    }

    #[test]
    fn test_serialized_shape() {
        let solution = Solution::new("E.", vec!["s".to_string()]);
        let json = serde_json::to_value(&solution).unwrap();
        assert_eq!(json, serde_json::json!({"steps": ["s"], "explanation": "E."}));
    }
}
