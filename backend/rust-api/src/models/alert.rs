use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::time::relative_label;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhaleAlert {
    pub id: String,
    pub whale: String,
    pub action: String,
    pub amount: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

/// Alert as rendered by the feed endpoint, with its age spelled out.
#[derive(Debug, Clone, Serialize)]
pub struct WhaleAlertView {
    #[serde(flatten)]
    pub alert: WhaleAlert,
    pub timestamp: String,
}

impl WhaleAlertView {
    pub fn at(alert: WhaleAlert, now: DateTime<Utc>) -> Self {
        let timestamp = relative_label(alert.created_at, now);
        Self { alert, timestamp }
    }
}
