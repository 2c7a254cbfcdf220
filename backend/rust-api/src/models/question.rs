use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const HINTS_PER_QUESTION: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// One labeled choice, e.g. `A) Vitalik Buterin` is label `A`, text `Vitalik Buterin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AnswerOptionRepr")]
pub struct AnswerOption {
    pub label: String,
    pub text: String,
}

/// Question banks may spell options either way.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnswerOptionRepr {
    Display(String),
    Structured { label: String, text: String },
}

impl From<AnswerOptionRepr> for AnswerOption {
    fn from(repr: AnswerOptionRepr) -> Self {
        match repr {
            AnswerOptionRepr::Display(display) => AnswerOption::parse(&display),
            AnswerOptionRepr::Structured { label, text } => AnswerOption { label, text },
        }
    }
}

impl AnswerOption {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    /// Parses the `"A) text"` display form. Everything before the first `)` is the label.
    pub fn parse(display: &str) -> Self {
        match display.split_once(')') {
            Some((label, text)) => Self::new(label.trim(), text.trim()),
            None => Self::new(display.trim(), ""),
        }
    }

    pub fn display(&self) -> String {
        format!("{}) {}", self.label, self.text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub question: String,
    pub options: Vec<AnswerOption>,
    pub correct_answer: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub points: u32,
    pub time_limit: u32,
    pub hint1: String,
    pub hint2: String,
    pub hint3: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("question {id} has no options")]
    NoOptions { id: u32 },
    #[error("question {id} has duplicate option label {label:?}")]
    DuplicateLabel { id: u32, label: String },
    #[error("question {id}: correct answer {label:?} does not match any option")]
    UnknownCorrectAnswer { id: u32, label: String },
    #[error("question {id} has a non-positive time limit")]
    ZeroTimeLimit { id: u32 },
}

impl Question {
    /// Hint text for a 1-based hint number.
    pub fn hint(&self, number: usize) -> Option<&str> {
        match number {
            1 => Some(&self.hint1),
            2 => Some(&self.hint2),
            3 => Some(&self.hint3),
            _ => None,
        }
    }

    pub fn is_correct(&self, label: &str) -> bool {
        self.correct_answer == label
    }

    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions { id: self.id });
        }

        for (i, option) in self.options.iter().enumerate() {
            if self.options[..i].iter().any(|o| o.label == option.label) {
                return Err(QuestionError::DuplicateLabel {
                    id: self.id,
                    label: option.label.clone(),
                });
            }
        }

        if !self.options.iter().any(|o| o.label == self.correct_answer) {
            return Err(QuestionError::UnknownCorrectAnswer {
                id: self.id,
                label: self.correct_answer.clone(),
            });
        }

        if self.time_limit == 0 {
            return Err(QuestionError::ZeroTimeLimit { id: self.id });
        }

        Ok(())
    }
}

/// Question as shown while it is still being answered. The correct label is
/// only filled in once the answer is locked.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub difficulty: Difficulty,
    pub category: String,
    pub points: u32,
    pub time_limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

impl QuestionView {
    pub fn from_question(question: &Question, reveal_answer: bool) -> Self {
        Self {
            id: question.id,
            question: question.question.clone(),
            options: question.options.iter().map(AnswerOption::display).collect(),
            difficulty: question.difficulty,
            category: question.category.clone(),
            points: question.points,
            time_limit: question.time_limit,
            correct_answer: reveal_answer.then(|| question.correct_answer.clone()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::question;
    use super::*;

    #[test]
    fn parse_option_splits_on_first_paren() {
        let option = AnswerOption::parse("C) Staked (locked) tokens");
        assert_eq!(option.label, "C");
        assert_eq!(option.text, "Staked (locked) tokens");
        assert_eq!(option.display(), "C) Staked (locked) tokens");
    }

    #[test]
    fn hints_are_one_based() {
        let q = question(1, 100, 60);
        assert_eq!(q.hint(0), None);
        assert_eq!(q.hint(1), Some("vague"));
        assert_eq!(q.hint(3), Some("almost the answer"));
        assert_eq!(q.hint(4), None);
    }

    #[test]
    fn validate_rejects_unknown_correct_answer() {
        let mut q = question(7, 100, 60);
        q.correct_answer = "E".to_string();
        assert_eq!(
            q.validate(),
            Err(QuestionError::UnknownCorrectAnswer {
                id: 7,
                label: "E".to_string()
            })
        );
    }

    #[test]
    fn validate_rejects_duplicate_labels_and_zero_time() {
        let mut q = question(2, 100, 60);
        q.options.push(AnswerOption::new("A", "again"));
        assert!(matches!(
            q.validate(),
            Err(QuestionError::DuplicateLabel { .. })
        ));

        let q = question(3, 100, 0);
        assert_eq!(q.validate(), Err(QuestionError::ZeroTimeLimit { id: 3 }));
    }

    #[test]
    fn view_hides_answer_until_revealed() {
        let q = question(1, 100, 60);
        assert!(QuestionView::from_question(&q, false).correct_answer.is_none());
        assert_eq!(
            QuestionView::from_question(&q, true).correct_answer.as_deref(),
            Some("B")
        );
    }
}
