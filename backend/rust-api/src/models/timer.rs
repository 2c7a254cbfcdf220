use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::session::{AnswerOutcome, GameState, GameStats};

/// Events pushed to game subscribers (SSE stream).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GameEvent {
    TimerTick(TimerTick),
    TimeExpired(TimeExpired),
    AnswerSubmitted(AnswerSubmitted),
    QuestionAdvanced(QuestionAdvanced),
    HintRevealed(HintRevealed),
    StateChanged(StateChanged),
    GameFinished(GameFinished),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimerTick {
    pub game_id: Uuid,
    pub question_index: usize,
    pub remaining_seconds: u32,
    pub total_seconds: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimeExpired {
    pub game_id: Uuid,
    pub question_index: usize,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnswerSubmitted {
    pub game_id: Uuid,
    pub question_index: usize,
    pub outcome: AnswerOutcome,
    pub score: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QuestionAdvanced {
    pub game_id: Uuid,
    pub question_index: usize,
    pub time_limit: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HintRevealed {
    pub game_id: Uuid,
    pub question_index: usize,
    pub hint_number: u8,
    pub hint: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StateChanged {
    pub game_id: Uuid,
    pub state: GameState,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GameFinished {
    pub game_id: Uuid,
    pub stats: GameStats,
    pub timestamp: DateTime<Utc>,
}

impl GameEvent {
    pub fn to_sse_data(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            GameEvent::TimerTick(_) => "timer-tick",
            GameEvent::TimeExpired(_) => "time-expired",
            GameEvent::AnswerSubmitted(_) => "answer-submitted",
            GameEvent::QuestionAdvanced(_) => "question-advanced",
            GameEvent::HintRevealed(_) => "hint-revealed",
            GameEvent::StateChanged(_) => "state-changed",
            GameEvent::GameFinished(_) => "game-finished",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sse_payload_is_tagged_with_kebab_case_type() {
        let event = GameEvent::TimerTick(TimerTick {
            game_id: Uuid::nil(),
            question_index: 0,
            remaining_seconds: 59,
            total_seconds: 60,
            timestamp: Utc::now(),
        });

        let json: serde_json::Value = serde_json::from_str(&event.to_sse_data()).unwrap();
        assert_eq!(json["type"], "timer-tick");
        assert_eq!(json["remaining_seconds"], 59);
        assert_eq!(event.event_name(), "timer-tick");
    }
}
