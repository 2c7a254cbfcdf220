use serde::{Deserialize, Serialize};

pub const XP_PER_POINT: f64 = 1.2;
pub const XP_PER_LEVEL: f64 = 5000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    pub points: u64,
    pub xp: f64,
    pub level: u32,
    pub games_played: u32,
}

impl Account {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            points: 0,
            xp: 0.0,
            level: 1,
            games_played: 0,
        }
    }

    /// Credits a finished game: points, 1.2 XP per point, level every 5000 XP.
    pub fn credit(&mut self, points: u32) {
        self.points = self.points.saturating_add(u64::from(points));
        self.xp += f64::from(points) * XP_PER_POINT;
        self.level = (self.xp / XP_PER_LEVEL).floor() as u32 + 1;
        self.games_played = self.games_played.saturating_add(1);
    }
}
