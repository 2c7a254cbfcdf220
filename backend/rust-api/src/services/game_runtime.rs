use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, Mutex};
use tokio::time::Instant;
use uuid::Uuid;

use crate::config::GameConfig;
use crate::metrics::{
    track_game_transition, ANSWERS_SUBMITTED_TOTAL, ANSWERS_TIMED_OUT_TOTAL,
    HINTS_REQUESTED_TOTAL, POINTS_AWARDED_TOTAL,
};
use crate::models::session::{AnswerOutcome, GameSnapshot, GameState, OutcomeReason};
use crate::models::timer::{
    AnswerSubmitted, GameEvent, GameFinished, HintRevealed, QuestionAdvanced, StateChanged,
    TimeExpired, TimerTick,
};

use super::account_ledger::PointsReporter;
use super::identity::IdentityProvider;
use super::question_bank::{validate_sequence, QuestionBank, QuestionBankError};
use super::quiz_engine::{Effects, EngineEffect, Notice, QuizEngine};
use super::timer_service::TimerService;

const EVENT_BUFFER: usize = 64;

struct Shared {
    id: Uuid,
    settings: GameConfig,
    events: broadcast::Sender<GameEvent>,
}

struct Inner {
    engine: QuizEngine,
    timers: TimerService,
    reporter: Option<Arc<dyn PointsReporter>>,
    last_active: Instant,
}

/// One hosted game: a quiz engine plus the timers that drive it.
///
/// All engine mutations, whether from host commands or timer callbacks, go
/// through a single async mutex, so transitions never interleave.
pub struct GameRuntime {
    shared: Arc<Shared>,
    inner: Arc<Mutex<Inner>>,
    bank: Arc<dyn QuestionBank>,
}

impl GameRuntime {
    pub fn new(id: Uuid, bank: Arc<dyn QuestionBank>, settings: GameConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let timers = TimerService::new(settings.tick_interval());

        Self {
            shared: Arc::new(Shared {
                id,
                settings,
                events,
            }),
            inner: Arc::new(Mutex::new(Inner {
                engine: QuizEngine::new(),
                timers,
                reporter: None,
                last_active: Instant::now(),
            })),
            bank,
        }
    }

    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.shared.events.subscribe()
    }

    pub async fn snapshot(&self) -> GameSnapshot {
        self.inner.lock().await.engine.snapshot()
    }

    /// Starts a new session for a connected identity. Returns `Ok(false)` when
    /// the identity is not connected. The question bank is awaited before the
    /// engine is touched, so the game stays in its prior state until then.
    pub async fn start_game(
        &self,
        identity: &dyn IdentityProvider,
        reporter: Arc<dyn PointsReporter>,
    ) -> Result<bool, QuestionBankError> {
        if !identity.is_connected() {
            tracing::debug!(game = %self.shared.id, "Start ignored: wallet not connected");
            return Ok(false);
        }

        let questions = self.bank.get_progressive_questions().await?;
        if let Err(e) = validate_sequence(&questions) {
            tracing::warn!(game = %self.shared.id, error = %e, "Question bank rejected");
            return Err(e);
        }

        tracing::info!(
            game = %self.shared.id,
            address = identity.address().unwrap_or_default(),
            questions = questions.len(),
            "Starting game"
        );

        let mut inner = self.inner.lock().await;
        inner.reporter = Some(reporter);
        let before = inner.engine.state();
        let effects = inner.engine.start_game(questions);
        self.commit(&mut inner, before, effects);
        Ok(true)
    }

    pub async fn select_answer(&self, label: &str) -> bool {
        let mut inner = self.inner.lock().await;
        inner.last_active = Instant::now();
        inner.engine.select_answer(label)
    }

    /// Time since the last command or timer callback touched this game.
    pub async fn idle_for(&self) -> Duration {
        self.inner.lock().await.last_active.elapsed()
    }

    /// Locks in the selected answer. `None` when the submit was ignored.
    pub async fn submit_answer(&self) -> Option<AnswerOutcome> {
        let mut inner = self.inner.lock().await;
        let before = inner.engine.state();
        let effects = inner.engine.submit_answer();
        if effects.is_empty() {
            return None;
        }
        let outcome = inner.engine.session().last_outcome.clone();
        self.commit(&mut inner, before, effects);
        outcome
    }

    pub async fn request_hint(&self) -> Option<String> {
        let mut inner = self.inner.lock().await;
        let before = inner.engine.state();
        let (hint, effects) = inner.engine.request_hint()?;
        self.commit(&mut inner, before, effects);
        Some(hint)
    }

    pub async fn pause(&self) -> bool {
        self.run(QuizEngine::pause).await
    }

    pub async fn resume(&self) -> bool {
        self.run(QuizEngine::resume).await
    }

    pub async fn reset(&self) -> bool {
        self.run(QuizEngine::reset).await
    }

    async fn run(&self, op: fn(&mut QuizEngine) -> Effects) -> bool {
        let mut inner = self.inner.lock().await;
        let before = inner.engine.state();
        let effects = op(&mut inner.engine);
        let accepted = !effects.is_empty();
        self.commit(&mut inner, before, effects);
        accepted
    }

    fn commit(&self, inner: &mut Inner, before: GameState, effects: Effects) {
        let weak = Arc::downgrade(&self.inner);
        apply(&self.shared, &weak, inner, before, effects);
    }
}

impl Drop for GameRuntime {
    fn drop(&mut self) {
        if let Ok(inner) = self.inner.try_lock() {
            track_game_transition(inner.engine.state(), GameState::Waiting);
        }
    }
}

fn apply(
    shared: &Arc<Shared>,
    weak: &Weak<Mutex<Inner>>,
    inner: &mut Inner,
    before: GameState,
    effects: Effects,
) {
    inner.last_active = Instant::now();
    for effect in effects {
        match effect {
            EngineEffect::CancelTimers => inner.timers.cancel_all(),
            EngineEffect::StartCountdown { epoch } => {
                let shared = Arc::clone(shared);
                let weak = weak.clone();
                inner.timers.start_countdown(move || {
                    on_tick(Arc::clone(&shared), weak.clone(), epoch)
                });
            }
            EngineEffect::ScheduleAdvance { epoch, reason } => {
                let delay = shared.settings.reveal_delay(reason);
                inner.timers.schedule_once(
                    delay,
                    on_advance(Arc::clone(shared), weak.clone(), epoch),
                );
            }
            EngineEffect::ReportPoints(points) => {
                POINTS_AWARDED_TOTAL.inc_by(u64::from(points));
                match &inner.reporter {
                    Some(reporter) => reporter.on_points_earned(points),
                    None => tracing::warn!(game = %shared.id, points, "No points reporter bound"),
                }
            }
            EngineEffect::Notify(notice) => publish(shared, notice),
        }
    }

    track_game_transition(before, inner.engine.state());
}

async fn on_tick(shared: Arc<Shared>, weak: Weak<Mutex<Inner>>, epoch: u64) -> bool {
    let Some(inner) = weak.upgrade() else {
        return false;
    };
    let mut guard = inner.lock().await;
    let before = guard.engine.state();
    let effects = guard.engine.tick(epoch);
    if effects.is_empty() {
        return false;
    }
    let keep_running = guard.engine.epoch() == epoch;
    apply(&shared, &weak, &mut guard, before, effects);
    keep_running
}

async fn on_advance(shared: Arc<Shared>, weak: Weak<Mutex<Inner>>, epoch: u64) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let mut guard = inner.lock().await;
    let before = guard.engine.state();
    let effects = guard.engine.advance(epoch);
    apply(&shared, &weak, &mut guard, before, effects);
}

fn publish(shared: &Shared, notice: Notice) {
    let game_id = shared.id;
    let timestamp = Utc::now();

    let event = match notice {
        Notice::Tick {
            question_index,
            remaining,
            total,
        } => GameEvent::TimerTick(TimerTick {
            game_id,
            question_index,
            remaining_seconds: remaining,
            total_seconds: total,
            timestamp,
        }),
        Notice::Expired { question_index } => {
            ANSWERS_TIMED_OUT_TOTAL.inc();
            GameEvent::TimeExpired(TimeExpired {
                game_id,
                question_index,
                timestamp,
                message: "Time limit exceeded".to_string(),
            })
        }
        Notice::Submitted {
            question_index,
            outcome,
            score,
        } => {
            if outcome.reason != OutcomeReason::Timeout {
                let correct = if outcome.correct { "true" } else { "false" };
                ANSWERS_SUBMITTED_TOTAL.with_label_values(&[correct]).inc();
            }
            GameEvent::AnswerSubmitted(AnswerSubmitted {
                game_id,
                question_index,
                outcome,
                score,
                timestamp,
            })
        }
        Notice::Advanced {
            question_index,
            time_limit,
        } => GameEvent::QuestionAdvanced(QuestionAdvanced {
            game_id,
            question_index,
            time_limit,
            timestamp,
        }),
        Notice::HintRevealed {
            question_index,
            number,
            hint,
        } => {
            HINTS_REQUESTED_TOTAL
                .with_label_values(&[&number.to_string()])
                .inc();
            GameEvent::HintRevealed(HintRevealed {
                game_id,
                question_index,
                hint_number: number,
                hint,
                timestamp,
            })
        }
        Notice::StateChanged(state) => GameEvent::StateChanged(StateChanged {
            game_id,
            state,
            timestamp,
        }),
        Notice::Finished(stats) => GameEvent::GameFinished(GameFinished {
            game_id,
            stats,
            timestamp,
        }),
    };

    // No subscribers is fine
    let _ = shared.events.send(event);
}
