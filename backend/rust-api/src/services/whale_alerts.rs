use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tokio::time::sleep;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::AlertConfig;
use crate::metrics::WHALE_ALERTS_TOTAL;
use crate::models::alert::{Severity, WhaleAlert, WhaleAlertView};

const WHALES: [&str; 4] = ["Beanie.eth", "Pranksy.eth", "GCR", "Ansem"];
const ACTIONS: [&str; 4] = [
    "Large ETH transfer",
    "NFT purchase",
    "DeFi interaction",
    "Token swap",
];

/// Source of decorative alerts. Never read by the quiz engine.
pub trait AlertProducer: Send {
    fn next_alert(&mut self) -> WhaleAlert;
}

pub struct RandomAlertProducer {
    rng: StdRng,
}

impl RandomAlertProducer {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAlertProducer {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertProducer for RandomAlertProducer {
    fn next_alert(&mut self) -> WhaleAlert {
        let whale = WHALES.choose(&mut self.rng).copied().unwrap_or("GCR");
        let action = ACTIONS.choose(&mut self.rng).copied().unwrap_or("Token swap");
        let severity = Severity::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Severity::Low);
        let amount_k: u32 = self.rng.random_range(50..550);

        WhaleAlert {
            id: Uuid::new_v4().to_string(),
            whale: whale.to_string(),
            action: action.to_string(),
            amount: format!("${}K", amount_k),
            severity,
            created_at: Utc::now(),
        }
    }
}

/// Bounded, newest-first list of recent alerts.
pub struct WhaleAlertFeed {
    capacity: usize,
    alerts: RwLock<VecDeque<WhaleAlert>>,
}

impl WhaleAlertFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            alerts: RwLock::new(VecDeque::new()),
        }
    }

    /// Feed pre-filled with the three launch alerts.
    pub fn seeded(capacity: usize, now: DateTime<Utc>) -> Self {
        let feed = Self::new(capacity);
        let seed = [
            ("Vitalik.eth", "Transferred 1,000 ETH", "$2.3M", Severity::Critical, 2),
            ("Punk6529", "Bought CryptoPunk #7804", "$850K", Severity::High, 5),
            ("WhaleShark", "Staked 500K WHALE tokens", "$125K", Severity::Medium, 12),
        ];
        for (i, (whale, action, amount, severity, minutes_ago)) in
            seed.into_iter().enumerate().rev()
        {
            feed.push(WhaleAlert {
                id: (i + 1).to_string(),
                whale: whale.to_string(),
                action: action.to_string(),
                amount: amount.to_string(),
                severity,
                created_at: now - chrono::Duration::minutes(minutes_ago),
            });
        }
        feed
    }

    pub fn push(&self, alert: WhaleAlert) {
        let mut alerts = match self.alerts.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        alerts.push_front(alert);
        alerts.truncate(self.capacity);
    }

    pub fn recent(&self) -> Vec<WhaleAlert> {
        let alerts = match self.alerts.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        alerts.iter().cloned().collect()
    }

    pub fn render(&self, now: DateTime<Utc>) -> Vec<WhaleAlertView> {
        self.recent()
            .into_iter()
            .map(|alert| WhaleAlertView::at(alert, now))
            .collect()
    }
}

/// Periodically appends a produced alert to the feed.
pub struct AlertWorker<P: AlertProducer> {
    producer: P,
    feed: Arc<WhaleAlertFeed>,
    interval: Duration,
}

impl<P: AlertProducer> AlertWorker<P> {
    pub fn new(producer: P, feed: Arc<WhaleAlertFeed>, config: &AlertConfig) -> Self {
        Self {
            producer,
            feed,
            interval: Duration::from_secs(config.interval_secs),
        }
    }

    pub fn run_once(&mut self) -> WhaleAlert {
        let alert = self.producer.next_alert();
        WHALE_ALERTS_TOTAL
            .with_label_values(&[alert.severity.as_str()])
            .inc();
        debug!(whale = %alert.whale, severity = alert.severity.as_str(), "Whale alert produced");
        self.feed.push(alert.clone());
        alert
    }

    pub async fn run(mut self) {
        info!(
            "Starting whale alert worker (interval {}s)",
            self.interval.as_secs()
        );

        loop {
            sleep(self.interval).await;
            self.run_once();
        }
    }
}
