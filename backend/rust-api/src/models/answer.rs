use serde::{Deserialize, Serialize};
use validator::Validate;

use super::session::{AnswerOutcome, GameSnapshot};

/// An empty label clears the current selection.
#[derive(Debug, Deserialize, Validate)]
pub struct SelectAnswerRequest {
    #[validate(length(max = 16, message = "Label must be at most 16 characters"))]
    pub label: String,
}

/// Response for any engine command. `accepted` is false when the engine
/// ignored the command because its guard did not hold.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub accepted: bool,
    pub game: GameSnapshot,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    pub accepted: bool,
    pub outcome: Option<AnswerOutcome>,
    pub game: GameSnapshot,
}
