use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Config;
use crate::metrics::GAMES_TOTAL;
use account_ledger::AccountLedger;
use game_runtime::GameRuntime;
use question_bank::{BuiltinQuestionBank, FileQuestionBank, QuestionBank};
use whale_alerts::WhaleAlertFeed;

pub struct AppState {
    pub config: Config,
    pub bank: Arc<dyn QuestionBank>,
    pub games: RwLock<HashMap<Uuid, Arc<GameRuntime>>>,
    pub alerts: Arc<WhaleAlertFeed>,
    pub ledger: Arc<AccountLedger>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let bank: Arc<dyn QuestionBank> = match &config.questions_path {
            Some(path) => {
                tracing::info!("Loading questions from {}", path);
                Arc::new(FileQuestionBank::new(path))
            }
            None => {
                tracing::info!("Using built-in question bank");
                Arc::new(BuiltinQuestionBank)
            }
        };

        Self::with_bank(config, bank)
    }

    pub fn with_bank(config: Config, bank: Arc<dyn QuestionBank>) -> Self {
        let alerts = Arc::new(WhaleAlertFeed::seeded(config.alerts.capacity, Utc::now()));

        Self {
            config,
            bank,
            games: RwLock::new(HashMap::new()),
            alerts,
            ledger: Arc::new(AccountLedger::default()),
        }
    }

    pub async fn create_game(&self) -> Arc<GameRuntime> {
        let id = Uuid::new_v4();
        let game = Arc::new(GameRuntime::new(
            id,
            Arc::clone(&self.bank),
            self.config.game.clone(),
        ));
        self.games.write().await.insert(id, Arc::clone(&game));
        tracing::debug!(game = %id, "Game created");
        game
    }

    pub async fn game(&self, id: Uuid) -> Option<Arc<GameRuntime>> {
        self.games.read().await.get(&id).cloned()
    }

    pub async fn remove_game(&self, id: Uuid) -> bool {
        self.games.write().await.remove(&id).is_some()
    }

    /// Drops every game that has been idle for at least `ttl`. Returns the
    /// number of games removed.
    pub async fn evict_idle_games(&self, ttl: Duration) -> usize {
        let games: Vec<_> = self
            .games
            .read()
            .await
            .iter()
            .map(|(id, game)| (*id, Arc::clone(game)))
            .collect();

        let mut idle = Vec::new();
        for (id, game) in games {
            if game.idle_for().await >= ttl {
                idle.push(id);
            }
        }
        if idle.is_empty() {
            return 0;
        }

        // Re-checked under the write lock: a command may have landed since the scan
        let mut registry = self.games.write().await;
        let mut evicted = 0;
        for id in idle {
            let Some(game) = registry.get(&id).cloned() else {
                continue;
            };
            if game.idle_for().await >= ttl {
                registry.remove(&id);
                evicted += 1;
                tracing::debug!(game = %id, "Idle game evicted");
            }
        }

        GAMES_TOTAL
            .with_label_values(&["evicted"])
            .inc_by(evicted as u64);
        evicted
    }
}

pub mod account_ledger;
pub mod game_runtime;
pub mod game_sweeper;
pub mod identity;
pub mod question_bank;
pub mod quiz_engine;
pub mod scoring;
pub mod timer_service;
pub mod whale_alerts;
