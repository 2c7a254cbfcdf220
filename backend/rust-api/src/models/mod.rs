use serde::Serialize;
use uuid::Uuid;

pub mod account;
pub mod alert;
pub mod answer;
pub mod hint;
pub mod question;
pub mod session;
pub mod timer;

pub use question::{AnswerOption, Difficulty, Question};
pub use session::{GameSnapshot, GameState, GameStats};

#[derive(Debug, Serialize)]
pub struct CreateGameResponse {
    pub game_id: Uuid,
    pub game: GameSnapshot,
}
