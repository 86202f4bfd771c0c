//! Defensive parsing of model output
//!
//! Free-text completions are never trusted to match the requested shape:
//! the stance parser collapses anything outside the closed verdict set to
//! NEUTRAL, and the question parser accepts only well-formed list lines.

use crate::model::Stance;

const MIN_QUESTION_LEN: usize = 10;
const MAX_QUESTION_LEN: usize = 300;
const MAX_QUESTIONS: usize = 5;

/// Parse a one-word stance verdict.
///
/// Takes the first whitespace token, strips surrounding punctuation and
/// matches case-insensitively; anything outside {SUPPORTS, OPPOSES,
/// NEUTRAL} collapses to `Neutral`.
pub fn parse_stance(output: &str) -> Stance {
    let token = output
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_matches(|c: char| !c.is_ascii_alphabetic())
        .to_ascii_uppercase();

    match token.as_str() {
        "SUPPORTS" => Stance::Supports,
        "OPPOSES" => Stance::Opposes,
        _ => Stance::Neutral,
    }
}

/// Parse a line-based question list.
///
/// Accepts `- `, `* ` and `1. ` / `1) ` markers; lines without a marker are
/// treated as preamble and dropped. Questions outside the length bounds are
/// dropped; at most five survive. An output with no well-formed lines
/// parses to an empty list.
pub fn parse_questions(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(strip_list_marker)
        .filter(|q| is_valid_question(q))
        .take(MAX_QUESTIONS)
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> Option<&str> {
    let line = line.trim();

    if let Some(rest) = line.strip_prefix("- ") {
        return Some(rest.trim());
    }
    if let Some(rest) = line.strip_prefix("* ") {
        return Some(rest.trim());
    }

    // "3. question" / "3) question"
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return Some(rest.trim());
        }
    }

    None
}

fn is_valid_question(question: &str) -> bool {
    (MIN_QUESTION_LEN..=MAX_QUESTION_LEN).contains(&question.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stance_exact_words() {
        assert_eq!(parse_stance("SUPPORTS"), Stance::Supports);
        assert_eq!(parse_stance("OPPOSES"), Stance::Opposes);
        assert_eq!(parse_stance("NEUTRAL"), Stance::Neutral);
    }

    #[test]
    fn stance_tolerates_case_whitespace_and_punctuation() {
        assert_eq!(parse_stance("  supports.\n"), Stance::Supports);
        assert_eq!(parse_stance("**OPPOSES**"), Stance::Opposes);
        assert_eq!(parse_stance("Supports the claim strongly"), Stance::Supports);
    }

    #[test]
    fn stance_collapses_garbage_to_neutral() {
        assert_eq!(parse_stance(""), Stance::Neutral);
        assert_eq!(parse_stance("MAYBE"), Stance::Neutral);
        assert_eq!(parse_stance("I think it supports the claim"), Stance::Neutral);
        assert_eq!(parse_stance("42"), Stance::Neutral);
    }

    #[test]
    fn questions_dash_list() {
        let output = "- Does coffee intake raise colorectal cancer risk?\n\
                      - Is caffeine itself carcinogenic in humans?\n";
        let questions = parse_questions(output);
        assert_eq!(questions.len(), 2);
        assert_eq!(
            questions[0],
            "Does coffee intake raise colorectal cancer risk?"
        );
    }

    #[test]
    fn questions_accept_numbered_and_starred_markers() {
        let output = "1. Does red meat consumption increase cancer incidence?\n\
                      2) Does cooking method change the risk profile?\n\
                      * Is processed meat different from unprocessed meat?";
        assert_eq!(parse_questions(output).len(), 3);
    }

    #[test]
    fn questions_drop_preamble_and_short_lines() {
        let output = "Here are some questions:\n\
                      - Why?\n\
                      - Does red meat consumption increase cancer incidence?";
        let questions = parse_questions(output);
        assert_eq!(questions.len(), 1);
        assert_eq!(
            questions[0],
            "Does red meat consumption increase cancer incidence?"
        );
    }

    #[test]
    fn questions_capped_at_five() {
        let output = (1..=8)
            .map(|i| format!("- Question number {i} about the claim under analysis?"))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(parse_questions(&output).len(), 5);
    }

    #[test]
    fn questions_prose_parses_to_empty() {
        let output = "I cannot break this claim down into separate questions.";
        assert!(parse_questions(output).is_empty());
    }
}
