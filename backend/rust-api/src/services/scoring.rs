/// Minimum reward for any correct answer.
pub const MIN_CORRECT_POINTS: u32 = 50;
/// Points lost per hint revealed on the question.
pub const HINT_PENALTY: u32 = 10;
/// Maximum time bonus, earned by answering with the full clock remaining.
pub const MAX_TIME_BONUS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Award {
    pub time_bonus: u32,
    pub hint_penalty: u32,
    pub points: u32,
}

/// Reward for a correct answer:
/// `max(50, base + floor(time_left / time_limit * 100) - hints * 10)`.
pub fn correct_answer_award(
    base_points: u32,
    time_left: u32,
    time_limit: u32,
    hints_used: u8,
) -> Award {
    let time_bonus = time_bonus(time_left, time_limit);
    let hint_penalty = u32::from(hints_used) * HINT_PENALTY;
    let raw = i64::from(base_points) + i64::from(time_bonus) - i64::from(hint_penalty);
    // Saturates instead of wrapping for very large base values
    let points = u32::try_from(raw.max(i64::from(MIN_CORRECT_POINTS))).unwrap_or(u32::MAX);

    Award {
        time_bonus,
        hint_penalty,
        points,
    }
}

fn time_bonus(time_left: u32, time_limit: u32) -> u32 {
    if time_limit == 0 {
        return 0;
    }
    let left = u64::from(time_left.min(time_limit));
    (left * u64::from(MAX_TIME_BONUS) / u64::from(time_limit)) as u32
}
