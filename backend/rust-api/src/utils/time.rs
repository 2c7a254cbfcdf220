use chrono::{DateTime, Utc};

/// Human label for how long ago `then` was, relative to `now`.
pub fn relative_label(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    match minutes {
        m if m < 1 => "Just now".to_string(),
        m if m < 60 => format!("{} min ago", m),
        m if m < 60 * 24 => format!("{} h ago", m / 60),
        m => format!("{} d ago", m / (60 * 24)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn labels_by_age() {
        let now = Utc::now();
        assert_eq!(relative_label(now, now), "Just now");
        assert_eq!(relative_label(now + Duration::seconds(5), now), "Just now");
        assert_eq!(relative_label(now - Duration::minutes(2), now), "2 min ago");
        assert_eq!(relative_label(now - Duration::minutes(150), now), "2 h ago");
        assert_eq!(relative_label(now - Duration::days(3), now), "3 d ago");
    }
}
