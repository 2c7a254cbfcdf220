use serde::Serialize;

use super::session::GameSnapshot;

#[derive(Debug, Serialize)]
pub struct RequestHintResponse {
    pub accepted: bool,
    pub hint: Option<String>,
    pub hints_used: u8,
    pub hints_remaining: u8,
    pub cost: u32,
    pub game: GameSnapshot,
}
