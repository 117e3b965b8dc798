//! Revive question pool
//!
//! Loaded once from `data/questions_isat.json`. Malformed entries are
//! dropped individually; if nothing usable arrives, every revive uses a
//! single built-in question whose answer is "1".

use rand::Rng;
use serde::Deserialize;
use serde_json::Value;

use crate::error::DataError;

/// Retries spent avoiding the previous question before giving up
const PICK_ATTEMPTS: u32 = 5;

/// How the player answers a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Free-text answer
    Short,
    /// Pick one of the listed choices
    MultipleChoice,
}

/// A revive challenge
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// Stable id for telemetry, kept as the JSON string or number it was
    /// written as (the built-in fallback has none)
    pub id: Option<Value>,
    pub prompt: String,
    pub answer: String,
    pub kind: QuestionKind,
    pub choices: Vec<String>,
    pub explanation: Option<String>,
}

impl Question {
    /// Used whenever the pool is empty
    pub fn fallback() -> Self {
        Self {
            id: None,
            prompt: "Answer to revive. (For now the answer is \"1\".)".to_string(),
            answer: "1".to_string(),
            kind: QuestionKind::Short,
            choices: Vec::new(),
            explanation: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.id.is_none() && self.answer == "1" && self.choices.is_empty()
    }

    /// Compare a submitted answer, ignoring case and surrounding whitespace
    pub fn is_correct(&self, submitted: &str) -> bool {
        normalize_answer(submitted) == normalize_answer(&self.answer)
    }

    /// Text revealed after a wrong answer
    pub fn solution_text(&self) -> String {
        let mut text = format!("Correct answer: {}", self.answer);
        if let Some(explanation) = self.explanation.as_deref().filter(|e| !e.is_empty()) {
            text.push_str("\n\nExplanation: ");
            text.push_str(explanation);
        }
        text
    }
}

/// Trim and lower-case an answer for comparison
pub fn normalize_answer(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Wire shape of a question entry. Only `prompt` and `answer` must be
/// strings; the optional fields accept anything and are coerced.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    id: Option<Value>,
    prompt: String,
    answer: String,
    #[serde(default, rename = "type")]
    kind: Option<Value>,
    #[serde(default)]
    choices: Option<Value>,
    #[serde(default)]
    explanation: Option<Value>,
}

/// Render a JSON scalar the way the question UI shows it
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl From<RawQuestion> for Question {
    fn from(raw: RawQuestion) -> Self {
        let id = raw.id.filter(|id| match id {
            Value::String(s) => !s.is_empty(),
            Value::Number(_) => true,
            _ => false,
        });
        // Anything but an array means no choices, so the question stays short
        let choices: Vec<String> = match raw.choices {
            Some(Value::Array(items)) => items.iter().map(value_text).collect(),
            _ => Vec::new(),
        };
        let is_mcq = raw
            .kind
            .as_ref()
            .and_then(Value::as_str)
            .is_some_and(|k| k.eq_ignore_ascii_case("mcq"));
        let kind = if is_mcq && !choices.is_empty() {
            QuestionKind::MultipleChoice
        } else {
            QuestionKind::Short
        };
        Self {
            id,
            prompt: raw.prompt,
            answer: raw.answer,
            kind,
            choices,
            explanation: raw
                .explanation
                .filter(|e| !e.is_null())
                .map(|e| value_text(&e))
                .filter(|e| !e.is_empty()),
        }
    }
}

/// Loaded questions plus the id asked last
#[derive(Debug, Clone, Default)]
pub struct QuestionPool {
    questions: Vec<Question>,
    last_id: Option<Value>,
}

impl QuestionPool {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            last_id: None,
        }
    }

    /// Parse `{ "questions": [...] }`, silently dropping unusable entries
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let root: Value = serde_json::from_str(json)?;
        let entries = root
            .get("questions")
            .and_then(Value::as_array)
            .ok_or(DataError::MissingQuestions)?;

        let questions: Vec<Question> = entries
            .iter()
            .filter_map(|entry| serde_json::from_value::<RawQuestion>(entry.clone()).ok())
            .map(Question::from)
            .collect();

        let dropped = entries.len() - questions.len();
        if dropped > 0 {
            log::warn!("Dropped {} malformed questions", dropped);
        }
        Ok(Self::new(questions))
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Draw a question, avoiding an immediate repeat when there is a choice.
    ///
    /// Best effort: after a few unlucky rolls any question is accepted.
    pub fn pick<R: Rng>(&mut self, rng: &mut R) -> Question {
        match self.questions.len() {
            0 => return Question::fallback(),
            1 => return self.questions[0].clone(),
            _ => {}
        }

        for _ in 0..PICK_ATTEMPTS {
            let candidate = &self.questions[rng.random_range(0..self.questions.len())];
            if candidate.id.is_some() && candidate.id == self.last_id {
                continue;
            }
            self.last_id = candidate.id.clone();
            return candidate.clone();
        }

        let candidate = self.questions[rng.random_range(0..self.questions.len())].clone();
        self.last_id = candidate.id.clone();
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const SAMPLE: &str = r#"{
        "questions": [
            {"id": "q1", "prompt": "2 + 2?", "answer": "4"},
            {"id": 7, "prompt": "Capital of France?", "answer": "Paris",
             "type": "MCQ", "choices": ["Paris", "Lyon", 3], "explanation": "It just is."},
            {"id": "bad", "prompt": 12, "answer": "x"},
            {"prompt": "No answer"},
            "not even an object"
        ]
    }"#;

    #[test]
    fn test_parse_filters_malformed() {
        let pool = QuestionPool::from_json(SAMPLE).unwrap();
        assert_eq!(pool.len(), 2);
        let mcq = &pool.questions[1];
        assert_eq!(mcq.id, Some(Value::from(7)));
        assert_eq!(mcq.kind, QuestionKind::MultipleChoice);
        assert_eq!(mcq.choices, vec!["Paris", "Lyon", "3"]);
        assert_eq!(pool.questions[0].kind, QuestionKind::Short);
    }

    #[test]
    fn test_loose_optional_fields_keep_question() {
        let json = r#"{"questions": [
            {"id": "e", "prompt": "p", "answer": "a", "explanation": 42},
            {"id": "c", "prompt": "p", "answer": "b", "choices": "x,y", "type": "mcq"},
            {"id": "", "prompt": "p", "answer": "c", "type": 3, "explanation": null}
        ]}"#;
        let pool = QuestionPool::from_json(json).unwrap();
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.questions[0].explanation.as_deref(), Some("42"));
        assert_eq!(pool.questions[1].kind, QuestionKind::Short);
        assert!(pool.questions[1].choices.is_empty());
        assert_eq!(pool.questions[2].id, None);
        assert_eq!(pool.questions[2].kind, QuestionKind::Short);
        assert_eq!(pool.questions[2].explanation, None);
    }

    #[test]
    fn test_mcq_without_choices_is_short() {
        let json = r#"{"questions": [{"id": "a", "prompt": "p", "answer": "x", "type": "mcq", "choices": []}]}"#;
        let pool = QuestionPool::from_json(json).unwrap();
        assert_eq!(pool.questions[0].kind, QuestionKind::Short);
    }

    #[test]
    fn test_missing_array_is_error() {
        assert!(matches!(
            QuestionPool::from_json(r#"{"items": []}"#),
            Err(DataError::MissingQuestions)
        ));
        assert!(matches!(
            QuestionPool::from_json("<html>"),
            Err(DataError::Json(_))
        ));
    }

    #[test]
    fn test_empty_pool_uses_fallback() {
        let mut pool = QuestionPool::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let q = pool.pick(&mut rng);
        assert!(q.is_fallback());
        assert!(q.is_correct(" 1 "));
    }

    #[test]
    fn test_no_immediate_repeat() {
        let questions = (0..5)
            .map(|i| Question {
                id: Some(Value::from(format!("q{i}"))),
                ..Question::fallback()
            })
            .collect();
        let mut pool = QuestionPool::new(questions);
        let mut rng = Pcg32::seed_from_u64(42);
        let mut last = pool.pick(&mut rng).id;
        let mut repeats = 0;
        for _ in 0..500 {
            let next = pool.pick(&mut rng).id;
            if next == last {
                repeats += 1;
            }
            last = next;
        }
        // Only possible when every retry lands on the previous id
        assert!(repeats <= 1, "repeats {repeats}");
    }

    #[test]
    fn test_single_question_always_returned() {
        let json = r#"{"questions": [{"id": "only", "prompt": "p", "answer": "a"}]}"#;
        let mut pool = QuestionPool::from_json(json).unwrap();
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..3 {
            assert_eq!(pool.pick(&mut rng).id, Some(Value::from("only")));
        }
    }

    #[test]
    fn test_solution_text() {
        let mut q = Question::fallback();
        assert_eq!(q.solution_text(), "Correct answer: 1");
        q.explanation = Some("Because.".to_string());
        assert_eq!(q.solution_text(), "Correct answer: 1\n\nExplanation: Because.");
    }

    proptest! {
        #[test]
        fn prop_answers_ignore_case_and_padding(
            answer in "[A-Za-z0-9 ]{1,12}",
            pad_left in " {0,3}",
            pad_right in "[ \t]{0,3}",
        ) {
            let q = Question {
                answer: answer.clone(),
                ..Question::fallback()
            };
            let submitted = format!("{pad_left}{}{pad_right}", answer.to_uppercase());
            prop_assert!(q.is_correct(&submitted));
        }
    }
}
