//! Survey question kinds, answer validation, and the question cursor.
//!
//! Answers arrive as untyped JSON from the client and are canonicalized to
//! the single string stored in the `survey_responses.answer` column:
//! sentiment/text/multiple-choice answers verbatim, ranked-choice answers as
//! a JSON-encoded ordered list.

use crate::error::CoreError;
use crate::flow::Sentiment;

// ---------------------------------------------------------------------------
// QuestionKind
// ---------------------------------------------------------------------------

/// The four supported question types, matching the `questions.kind` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Sentiment,
    Text,
    MultipleChoice,
    RankedChoice,
}

impl QuestionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Sentiment => "sentiment",
            QuestionKind::Text => "text",
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::RankedChoice => "ranked_choice",
        }
    }

    /// Parse a stored kind string.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "sentiment" => Ok(QuestionKind::Sentiment),
            "text" => Ok(QuestionKind::Text),
            "multiple_choice" => Ok(QuestionKind::MultipleChoice),
            "ranked_choice" => Ok(QuestionKind::RankedChoice),
            other => Err(CoreError::Validation(format!(
                "unknown question kind: {other}"
            ))),
        }
    }

    /// Whether this kind requires a declared options list.
    pub fn requires_options(self) -> bool {
        matches!(self, QuestionKind::MultipleChoice | QuestionKind::RankedChoice)
    }
}

// ---------------------------------------------------------------------------
// Answer validation
// ---------------------------------------------------------------------------

/// Validate a raw answer against the question's kind and declared options,
/// returning the canonical stored string.
///
/// Rules per kind:
/// - `sentiment`: one of `happy` / `neutral` / `sad`.
/// - `text`: a non-empty string after trimming.
/// - `multiple_choice`: exactly one of the declared options.
/// - `ranked_choice`: an array of strings that is a permutation of the
///   declared options; stored JSON-encoded (e.g. `["C","A","B"]`).
pub fn validate_answer(
    kind: QuestionKind,
    options: Option<&[String]>,
    answer: &serde_json::Value,
) -> Result<String, CoreError> {
    match kind {
        QuestionKind::Sentiment => {
            let value = expect_string(answer)?;
            Sentiment::parse(value)
                .map(|s| s.as_str().to_string())
                .ok_or_else(|| {
                    CoreError::Validation(format!("not a valid sentiment value: {value}"))
                })
        }
        QuestionKind::Text => {
            let value = expect_string(answer)?.trim();
            if value.is_empty() {
                return Err(CoreError::Validation("answer text is empty".into()));
            }
            Ok(value.to_string())
        }
        QuestionKind::MultipleChoice => {
            let declared = declared_options(kind, options)?;
            let value = expect_string(answer)?;
            if !declared.iter().any(|o| o == value) {
                return Err(CoreError::Validation(format!(
                    "answer is not one of the declared options: {value}"
                )));
            }
            Ok(value.to_string())
        }
        QuestionKind::RankedChoice => {
            let declared = declared_options(kind, options)?;
            let ranking = answer.as_array().ok_or_else(|| {
                CoreError::Validation("ranked-choice answer must be an array".into())
            })?;
            let mut ranked: Vec<&str> = Vec::with_capacity(ranking.len());
            for entry in ranking {
                ranked.push(entry.as_str().ok_or_else(|| {
                    CoreError::Validation("ranked-choice entries must be strings".into())
                })?);
            }
            if !is_permutation(&ranked, declared) {
                return Err(CoreError::Validation(
                    "ranking must contain each declared option exactly once".into(),
                ));
            }
            // Canonical storage form: JSON-encoded ordered list.
            Ok(serde_json::to_string(&ranked)
                .map_err(|e| CoreError::Internal(e.to_string()))?)
        }
    }
}

/// The sentiment the orchestrator is signalled when a question completes
/// the survey.
///
/// Only sentiment questions carry polarity; every other kind (including
/// ranked choice, whose ordering says nothing about mood) signals neutral.
pub fn completion_sentiment(kind: QuestionKind, stored_answer: &str) -> Sentiment {
    match kind {
        QuestionKind::Sentiment => {
            Sentiment::parse(stored_answer).unwrap_or(Sentiment::Neutral)
        }
        _ => Sentiment::Neutral,
    }
}

fn expect_string(answer: &serde_json::Value) -> Result<&str, CoreError> {
    answer
        .as_str()
        .ok_or_else(|| CoreError::Validation("answer must be a string".into()))
}

fn declared_options<'a>(
    kind: QuestionKind,
    options: Option<&'a [String]>,
) -> Result<&'a [String], CoreError> {
    match options {
        Some(opts) if !opts.is_empty() => Ok(opts),
        _ => Err(CoreError::Validation(format!(
            "{} questions require a declared options list",
            kind.as_str()
        ))),
    }
}

fn is_permutation(ranked: &[&str], declared: &[String]) -> bool {
    if ranked.len() != declared.len() {
        return false;
    }
    let mut remaining: Vec<&str> = declared.iter().map(String::as_str).collect();
    for entry in ranked {
        match remaining.iter().position(|o| o == entry) {
            Some(idx) => {
                remaining.swap_remove(idx);
            }
            None => return false,
        }
    }
    true
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Result of advancing the question cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorAdvance {
    /// Move to the question at this index.
    Next(usize),
    /// The last question was just answered; the survey is complete.
    Complete,
}

/// Index into the fetched question list held by the consuming flow.
#[derive(Debug, Clone, Copy)]
pub struct SurveyCursor {
    index: usize,
    total: usize,
}

impl SurveyCursor {
    /// A cursor over `total` questions, starting at the first.
    pub fn new(total: usize) -> Self {
        Self { index: 0, total }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether there is no question to show at all (terminal empty state,
    /// not an error).
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Advance past the current question.
    pub fn advance(&mut self) -> CursorAdvance {
        self.index += 1;
        if self.index >= self.total {
            CursorAdvance::Complete
        } else {
            CursorAdvance::Next(self.index)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn opts(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn sentiment_answers_must_match_the_fixed_scale() {
        let ok = validate_answer(QuestionKind::Sentiment, None, &json!("happy")).unwrap();
        assert_eq!(ok, "happy");
        assert_matches!(
            validate_answer(QuestionKind::Sentiment, None, &json!("ecstatic")),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn text_answers_are_trimmed_and_must_be_non_empty() {
        let ok = validate_answer(QuestionKind::Text, None, &json!("  great wifi  ")).unwrap();
        assert_eq!(ok, "great wifi");
        assert_matches!(
            validate_answer(QuestionKind::Text, None, &json!("   ")),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn multiple_choice_answers_must_be_a_declared_option() {
        let options = opts(&["coffee", "tea"]);
        let ok =
            validate_answer(QuestionKind::MultipleChoice, Some(&options), &json!("tea")).unwrap();
        assert_eq!(ok, "tea");
        assert_matches!(
            validate_answer(QuestionKind::MultipleChoice, Some(&options), &json!("juice")),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn ranked_choice_answers_are_stored_as_json_lists() {
        let options = opts(&["A", "B", "C"]);
        let stored = validate_answer(
            QuestionKind::RankedChoice,
            Some(&options),
            &json!(["C", "A", "B"]),
        )
        .unwrap();
        assert_eq!(stored, r#"["C","A","B"]"#);
    }

    #[test]
    fn ranked_choice_rejects_non_permutations() {
        let options = opts(&["A", "B", "C"]);
        for bad in [json!(["A", "B"]), json!(["A", "A", "B"]), json!(["A", "B", "D"])] {
            assert_matches!(
                validate_answer(QuestionKind::RankedChoice, Some(&options), &bad),
                Err(CoreError::Validation(_))
            );
        }
    }

    #[test]
    fn ranked_choice_completion_signals_neutral() {
        assert_eq!(
            completion_sentiment(QuestionKind::RankedChoice, r#"["C","A","B"]"#),
            Sentiment::Neutral
        );
        assert_eq!(
            completion_sentiment(QuestionKind::Sentiment, "sad"),
            Sentiment::Sad
        );
    }

    #[test]
    fn cursor_signals_complete_past_the_last_question() {
        let mut cursor = SurveyCursor::new(2);
        assert_eq!(cursor.advance(), CursorAdvance::Next(1));
        assert_eq!(cursor.advance(), CursorAdvance::Complete);

        let mut empty = SurveyCursor::new(0);
        assert!(empty.is_empty());
        assert_eq!(empty.advance(), CursorAdvance::Complete);
    }
}
