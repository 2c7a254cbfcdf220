use tracing::{debug, info};

use crate::models::question::{Question, HINTS_PER_QUESTION};
use crate::models::session::{
    AdvanceReason, AnswerOutcome, GameSession, GameSnapshot, GameState, GameStats, OutcomeReason,
};

use super::scoring::correct_answer_award;

/// Side effects requested by an engine transition. The engine never touches
/// clocks or hosts itself; its runtime carries these out.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEffect {
    /// Start the one-second countdown for the active question.
    StartCountdown { epoch: u64 },
    /// Call [`QuizEngine::advance`] once the reveal delay for `reason` elapsed.
    ScheduleAdvance { epoch: u64, reason: AdvanceReason },
    /// Abort every outstanding timer.
    CancelTimers,
    /// Report the final points to the host. Emitted once per session.
    ReportPoints(u32),
    Notify(Notice),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Tick {
        question_index: usize,
        remaining: u32,
        total: u32,
    },
    Expired {
        question_index: usize,
    },
    Submitted {
        question_index: usize,
        outcome: AnswerOutcome,
        score: u32,
    },
    Advanced {
        question_index: usize,
        time_limit: u32,
    },
    HintRevealed {
        question_index: usize,
        number: u8,
        hint: String,
    },
    StateChanged(GameState),
    Finished(GameStats),
}

pub type Effects = Vec<EngineEffect>;

/// Timed multiple-choice state machine over a single [`GameSession`].
///
/// Every operation is a synchronous transition. Operations whose guard does not
/// hold are ignored and return no effects. Timer callbacks carry the epoch they
/// were scheduled under; a callback from an older epoch is a no-op.
#[derive(Debug, Default)]
pub struct QuizEngine {
    session: GameSession,
}

impl QuizEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.session.snapshot()
    }

    pub fn state(&self) -> GameState {
        self.session.state
    }

    pub fn epoch(&self) -> u64 {
        self.session.epoch
    }

    /// Begins a fresh session over `questions`, discarding whatever came before.
    /// Identity gating and question validation happen in the runtime.
    pub fn start_game(&mut self, questions: Vec<Question>) -> Effects {
        let epoch = self.session.epoch + 1;
        let total = questions.len();
        let first_limit = questions.first().map(|q| q.time_limit).unwrap_or(0);

        self.session = GameSession {
            state: GameState::Playing,
            questions,
            time_left: first_limit,
            stats: GameStats::new(total),
            epoch,
            ..GameSession::default()
        };

        info!(questions = total, epoch, "Game started");

        let mut effects = vec![
            EngineEffect::CancelTimers,
            EngineEffect::Notify(Notice::StateChanged(GameState::Playing)),
        ];

        if total == 0 {
            // Nothing to answer: the session is complete as soon as it begins.
            effects.extend(self.finish());
        } else {
            effects.push(EngineEffect::StartCountdown { epoch });
        }

        effects
    }

    pub fn select_answer(&mut self, label: &str) -> bool {
        if !self.accepts_input() {
            debug!(label, "Answer selection ignored");
            return false;
        }

        self.session.selected_answer = if label.is_empty() {
            None
        } else {
            Some(label.to_string())
        };
        true
    }

    pub fn submit_answer(&mut self) -> Effects {
        if !self.accepts_input() {
            debug!("Submit ignored: no active unsubmitted question");
            return Vec::new();
        }
        let Some(selected) = self.session.selected_answer.clone() else {
            debug!("Submit ignored: nothing selected");
            return Vec::new();
        };
        let Some(question) = self.session.questions.get(self.session.current_index) else {
            return Vec::new();
        };

        let outcome = if question.is_correct(&selected) {
            let award = correct_answer_award(
                question.points,
                self.session.time_left,
                question.time_limit,
                self.session.hints_used,
            );
            AnswerOutcome {
                question_id: question.id,
                selected: Some(selected),
                correct: true,
                points_earned: award.points,
                time_bonus: award.time_bonus,
                hint_penalty: award.hint_penalty,
                reason: OutcomeReason::Correct,
            }
        } else {
            AnswerOutcome {
                question_id: question.id,
                selected: Some(selected),
                correct: false,
                points_earned: 0,
                time_bonus: 0,
                hint_penalty: 0,
                reason: OutcomeReason::WrongAnswer,
            }
        };

        info!(
            question = self.session.current_index,
            correct = outcome.correct,
            points = outcome.points_earned,
            "Answer submitted"
        );

        self.lock_answer(outcome, AdvanceReason::Submitted)
    }

    /// Reveals the next hint and returns its text.
    pub fn request_hint(&mut self) -> Option<(String, Effects)> {
        if !self.accepts_input() || usize::from(self.session.hints_used) >= HINTS_PER_QUESTION {
            debug!(hints_used = self.session.hints_used, "Hint request ignored");
            return None;
        }

        let number = self.session.hints_used + 1;
        let hint = self
            .session
            .questions
            .get(self.session.current_index)?
            .hint(usize::from(number))?
            .to_string();
        self.session.hints_used = number;

        debug!(question = self.session.current_index, number, "Hint revealed");

        let effects = vec![EngineEffect::Notify(Notice::HintRevealed {
            question_index: self.session.current_index,
            number,
            hint: hint.clone(),
        })];
        Some((hint, effects))
    }

    /// One countdown second elapsed.
    pub fn tick(&mut self, epoch: u64) -> Effects {
        if epoch != self.session.epoch || !self.accepts_input() || self.session.time_left == 0 {
            return Vec::new();
        }

        self.session.time_left -= 1;
        let question_index = self.session.current_index;
        let total = self
            .session
            .questions
            .get(question_index)
            .map(|q| q.time_limit)
            .unwrap_or(0);

        let mut effects = vec![EngineEffect::Notify(Notice::Tick {
            question_index,
            remaining: self.session.time_left,
            total,
        })];

        if self.session.time_left == 0 {
            effects.extend(self.expire());
        }

        effects
    }

    fn expire(&mut self) -> Effects {
        let question_index = self.session.current_index;
        let question_id = self
            .session
            .questions
            .get(question_index)
            .map(|q| q.id)
            .unwrap_or_default();

        info!(question = question_index, "Question timed out");

        let outcome = AnswerOutcome {
            question_id,
            selected: self.session.selected_answer.clone(),
            correct: false,
            points_earned: 0,
            time_bonus: 0,
            hint_penalty: 0,
            reason: OutcomeReason::Timeout,
        };

        let mut effects = vec![EngineEffect::Notify(Notice::Expired { question_index })];
        effects.extend(self.lock_answer(outcome, AdvanceReason::TimedOut));
        effects
    }

    /// Locks the active question and schedules the advance. Only reachable
    /// while the question is unsubmitted, so a question is locked exactly once.
    fn lock_answer(&mut self, outcome: AnswerOutcome, reason: AdvanceReason) -> Effects {
        let session = &mut self.session;
        session.is_submitted = true;

        if outcome.correct {
            session.score = session.score.saturating_add(outcome.points_earned);
            session.stats.total_points = session
                .stats
                .total_points
                .saturating_add(outcome.points_earned);
            session.stats.correct_answers += 1;
        }
        session.stats.recompute_accuracy(session.current_index + 1);

        session.epoch += 1;
        session.pending_advance = Some(reason);
        session.last_outcome = Some(outcome.clone());

        vec![
            EngineEffect::CancelTimers,
            EngineEffect::Notify(Notice::Submitted {
                question_index: session.current_index,
                outcome,
                score: session.score,
            }),
            EngineEffect::ScheduleAdvance {
                epoch: session.epoch,
                reason,
            },
        ]
    }

    /// Delayed follow-up to a submit or timeout: next question or finish.
    pub fn advance(&mut self, epoch: u64) -> Effects {
        let session = &mut self.session;
        if epoch != session.epoch
            || session.state != GameState::Playing
            || !session.is_submitted
            || session.pending_advance.is_none()
        {
            return Vec::new();
        }

        session.pending_advance = None;
        session.epoch += 1;

        let next = session.current_index + 1;
        if next >= session.questions.len() {
            return self.finish();
        }

        let time_limit = session.questions[next].time_limit;
        session.current_index = next;
        session.selected_answer = None;
        session.is_submitted = false;
        session.hints_used = 0;
        session.time_left = time_limit;

        debug!(question = next, time_limit, "Advanced to next question");

        vec![
            EngineEffect::CancelTimers,
            EngineEffect::Notify(Notice::Advanced {
                question_index: next,
                time_limit,
            }),
            EngineEffect::StartCountdown {
                epoch: session.epoch,
            },
        ]
    }

    fn finish(&mut self) -> Effects {
        let session = &mut self.session;
        session.state = GameState::Finished;
        session.pending_advance = None;
        session.current_index = session.questions.len();

        info!(
            points = session.stats.total_points,
            correct = session.stats.correct_answers,
            total = session.stats.total_questions,
            accuracy = session.stats.accuracy,
            "Game finished"
        );

        let mut effects = vec![
            EngineEffect::CancelTimers,
            EngineEffect::Notify(Notice::StateChanged(GameState::Finished)),
            EngineEffect::Notify(Notice::Finished(session.stats.clone())),
        ];

        if !session.points_reported {
            session.points_reported = true;
            effects.push(EngineEffect::ReportPoints(session.stats.total_points));
        }

        effects
    }

    pub fn pause(&mut self) -> Effects {
        if self.session.state != GameState::Playing {
            return Vec::new();
        }

        self.session.state = GameState::Paused;
        self.session.epoch += 1;
        info!(question = self.session.current_index, "Game paused");

        vec![
            EngineEffect::CancelTimers,
            EngineEffect::Notify(Notice::StateChanged(GameState::Paused)),
        ]
    }

    pub fn resume(&mut self) -> Effects {
        if self.session.state != GameState::Paused {
            return Vec::new();
        }

        self.session.state = GameState::Playing;
        self.session.epoch += 1;
        let epoch = self.session.epoch;
        info!(question = self.session.current_index, "Game resumed");

        let follow_up = match self.session.pending_advance {
            Some(reason) => EngineEffect::ScheduleAdvance { epoch, reason },
            None => EngineEffect::StartCountdown { epoch },
        };

        vec![
            EngineEffect::Notify(Notice::StateChanged(GameState::Playing)),
            follow_up,
        ]
    }

    /// Back to waiting from any state. The epoch survives so callbacks from the
    /// discarded session stay stale.
    pub fn reset(&mut self) -> Effects {
        let epoch = self.session.epoch + 1;
        self.session = GameSession {
            epoch,
            ..GameSession::default()
        };
        info!("Game reset");

        vec![
            EngineEffect::CancelTimers,
            EngineEffect::Notify(Notice::StateChanged(GameState::Waiting)),
        ]
    }

    fn accepts_input(&self) -> bool {
        self.session.state == GameState::Playing
            && !self.session.is_submitted
            && self.session.current_index < self.session.questions.len()
    }
}
