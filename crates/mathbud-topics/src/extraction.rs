//! Candidate extraction from a solved problem.
//!
//! These heuristics decide what a solution contributes to a topic's notes.
//! Matching is loose: any step with an `=` counts as a formula.

use std::sync::LazyLock;

use mathbud_types::Solution;
use regex::Regex;

/// Letter, operator, letter (e.g. `a+b`, `x * y`).
static LETTER_OPERATOR_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]\s*[+\-*/]\s*[a-zA-Z]").expect("valid regex"));

/// Characters that mark a step as a formula on their own.
const FORMULA_MARKERS: [char; 4] = ['=', '^', '√', '±'];

/// Period-separated explanation fragments longer than `min_chars`.
pub fn extract_concepts(solution: &Solution, min_chars: usize) -> Vec<String> {
    solution
        .explanation
        .split('.')
        .map(str::trim)
        .filter(|fragment| fragment.chars().count() > min_chars)
        .map(str::to_string)
        .collect()
}

/// Steps longer than `min_chars`.
pub fn extract_examples(solution: &Solution, min_chars: usize) -> Vec<String> {
    solution
        .steps
        .iter()
        .filter(|step| step.chars().count() > min_chars)
        .cloned()
        .collect()
}

/// Steps that contain mathematical notation.
pub fn extract_formulas(solution: &Solution) -> Vec<String> {
    solution
        .steps
        .iter()
        .filter(|step| looks_like_formula(step))
        .cloned()
        .collect()
}

fn looks_like_formula(step: &str) -> bool {
    step.contains(&FORMULA_MARKERS[..]) || LETTER_OPERATOR_LETTER.is_match(step)
}

/// Append `candidates` to `existing`, drop repeats, and keep the first `cap`.
///
/// The first occurrence of a string wins, so entries already in the note
/// always stay ahead of new ones.
pub fn merge_capped(existing: &[String], candidates: &[String], cap: usize) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(cap.min(existing.len() + candidates.len()));
    for entry in existing.iter().chain(candidates) {
        if merged.len() == cap {
            break;
        }
        if !merged.contains(entry) {
            merged.push(entry.clone());
        }
    }
    merged
}
