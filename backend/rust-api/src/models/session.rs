use serde::{Deserialize, Serialize};

use super::question::{Question, QuestionView, HINTS_PER_QUESTION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    #[default]
    Waiting,
    Playing,
    Paused,
    Finished,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub total_questions: usize,
    pub correct_answers: u32,
    pub total_points: u32,
    pub accuracy: f64,
}

impl GameStats {
    pub fn new(total_questions: usize) -> Self {
        Self {
            total_questions,
            ..Self::default()
        }
    }

    /// Recomputes accuracy against the number of questions answered so far,
    /// rounded to two decimals.
    pub fn recompute_accuracy(&mut self, answered: usize) {
        if answered == 0 {
            self.accuracy = 0.0;
            return;
        }
        let raw = f64::from(self.correct_answers) / answered as f64 * 100.0;
        self.accuracy = ((raw * 100.0).round() / 100.0).clamp(0.0, 100.0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceReason {
    Submitted,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeReason {
    Correct,
    WrongAnswer,
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub question_id: u32,
    pub selected: Option<String>,
    pub correct: bool,
    pub points_earned: u32,
    pub time_bonus: u32,
    pub hint_penalty: u32,
    pub reason: OutcomeReason,
}

/// One play-through. Owned exclusively by the quiz engine; hosts only see
/// [`GameSnapshot`]s.
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    pub state: GameState,
    pub questions: Vec<Question>,
    pub current_index: usize,
    pub selected_answer: Option<String>,
    pub is_submitted: bool,
    pub time_left: u32,
    pub hints_used: u8,
    pub score: u32,
    pub stats: GameStats,
    pub epoch: u64,
    pub pending_advance: Option<AdvanceReason>,
    pub last_outcome: Option<AnswerOutcome>,
    pub points_reported: bool,
}

impl GameSession {
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            GameState::Playing | GameState::Paused => self.questions.get(self.current_index),
            GameState::Waiting | GameState::Finished => None,
        }
    }

    pub fn revealed_hints(&self) -> Vec<String> {
        self.current_question()
            .map(|q| {
                (1..=usize::from(self.hints_used))
                    .filter_map(|n| q.hint(n).map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            state: self.state,
            current_index: self.current_index,
            total_questions: self.questions.len(),
            time_left: self.time_left,
            score: self.score,
            hints_used: self.hints_used,
            hints_remaining: (HINTS_PER_QUESTION as u8).saturating_sub(self.hints_used),
            selected_answer: self.selected_answer.clone(),
            is_submitted: self.is_submitted,
            stats: self.stats.clone(),
            question: self
                .current_question()
                .map(|q| QuestionView::from_question(q, self.is_submitted)),
            revealed_hints: self.revealed_hints(),
            last_outcome: self.last_outcome.clone(),
        }
    }
}

/// Read-only rendering view of a session.
#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub state: GameState,
    pub current_index: usize,
    pub total_questions: usize,
    pub time_left: u32,
    pub score: u32,
    pub hints_used: u8,
    pub hints_remaining: u8,
    pub selected_answer: Option<String>,
    pub is_submitted: bool,
    pub stats: GameStats,
    pub question: Option<QuestionView>,
    pub revealed_hints: Vec<String>,
    pub last_outcome: Option<AnswerOutcome>,
}
