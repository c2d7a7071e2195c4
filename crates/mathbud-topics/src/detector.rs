//! Keyword-based topic detection.
//!
//! Each rule pairs a topic label with the keywords that trigger it. The
//! explanation and the steps are checked against separate keyword lists
//! because step text is terser ("factor", "trig") than explanation prose
//! ("factoring", "trigonometry"). Rules are evaluated in a fixed priority
//! order, so the first label returned is the problem's primary topic.

use mathbud_types::Solution;
use tracing::debug;

/// Label assigned when no rule matches.
pub const GENERAL_MATH: &str = "General Math";

/// A topic label and the substrings that trigger it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    /// Topic label to emit
    pub label: &'static str,
    /// Substrings searched for in the lower-cased explanation
    pub explanation_keywords: &'static [&'static str],
    /// Substrings searched for in the lower-cased, space-joined steps
    pub step_keywords: &'static [&'static str],
}

impl KeywordRule {
    const fn new(
        label: &'static str,
        explanation_keywords: &'static [&'static str],
        step_keywords: &'static [&'static str],
    ) -> Self {
        Self {
            label,
            explanation_keywords,
            step_keywords,
        }
    }

    fn matches(&self, explanation: &str, steps: &str) -> bool {
        self.explanation_keywords
            .iter()
            .any(|kw| explanation.contains(kw))
            || self.step_keywords.iter().any(|kw| steps.contains(kw))
    }
}

/// Rules in priority order.
pub const DEFAULT_RULES: &[KeywordRule] = &[
    KeywordRule::new("Quadratic Equations", &["quadratic"], &["quadratic"]),
    KeywordRule::new("Linear Equations", &["linear"], &["linear"]),
    KeywordRule::new("Factoring", &["factoring"], &["factor"]),
    KeywordRule::new("Polynomials", &["polynomial"], &["polynomial"]),
    KeywordRule::new("Algebra", &["algebra"], &["algebra"]),
    KeywordRule::new("Geometry", &["geometry"], &["geometry"]),
    KeywordRule::new("Trigonometry", &["trigonometry"], &["trig"]),
    KeywordRule::new("Calculus", &["calculus"], &["derivative", "integral"]),
    KeywordRule::new("Fractions", &["fraction"], &["fraction"]),
    KeywordRule::new("Percentages", &["percentage"], &["percent"]),
    KeywordRule::new("Probability", &["probability"], &["probability"]),
    KeywordRule::new("Statistics", &["statistics"], &["statistics"]),
];

/// Assigns topic labels to solutions by substring matching.
#[derive(Debug, Clone)]
pub struct KeywordDetector {
    rules: &'static [KeywordRule],
}

impl Default for KeywordDetector {
    fn default() -> Self {
        Self::new(DEFAULT_RULES)
    }
}

impl KeywordDetector {
    /// Create a detector over the given rules, evaluated in order.
    pub fn new(rules: &'static [KeywordRule]) -> Self {
        Self { rules }
    }

    /// Detect topics for a solution.
    ///
    /// Always returns at least one label and never repeats one. Identical
    /// input always yields identical output.
    pub fn detect(&self, solution: &Solution) -> Vec<String> {
        let (explanation, steps) = solution.lowercase_parts();

        let mut topics: Vec<String> = Vec::new();
        for rule in self.rules {
            if rule.matches(&explanation, &steps) && !topics.iter().any(|t| t == rule.label) {
                topics.push(rule.label.to_string());
            }
        }

        if topics.is_empty() {
            topics.push(GENERAL_MATH.to_string());
        }

        debug!(?topics, "Detected topics");
        topics
    }
}

/// Detect topics with the default rules.
pub fn detect_topics(solution: &Solution) -> Vec<String> {
    KeywordDetector::default().detect(solution)
}
