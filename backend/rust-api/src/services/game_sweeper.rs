use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::info;

use super::AppState;

/// Periodically removes games nobody has touched for the configured TTL.
pub struct GameSweeper {
    state: Arc<AppState>,
    interval: Duration,
    ttl: Duration,
}

impl GameSweeper {
    pub fn new(state: Arc<AppState>) -> Self {
        let interval = state.config.game.sweep_interval();
        let ttl = state.config.game.idle_ttl();
        Self {
            state,
            interval,
            ttl,
        }
    }

    pub async fn run_once(&self) -> usize {
        let evicted = self.state.evict_idle_games(self.ttl).await;
        if evicted > 0 {
            info!(evicted, "Swept idle games");
        }
        evicted
    }

    pub async fn run(self) {
        info!(
            "Starting game sweeper (interval {}s, idle ttl {}s)",
            self.interval.as_secs(),
            self.ttl.as_secs()
        );

        loop {
            sleep(self.interval).await;
            self.run_once().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AlertConfig, Config, GameConfig};
    use crate::models::question::fixtures::question;
    use crate::models::session::GameState;
    use crate::services::identity::WalletIdentity;
    use crate::services::question_bank::StaticQuestionBank;

    const WALLET: &str = "0x00000000000000000000000000000000000000aa";

    fn state(time_limit: u32) -> Arc<AppState> {
        let config = Config {
            bind_addr: "127.0.0.1:0".to_string(),
            game: GameConfig {
                idle_ttl_secs: 600,
                sweep_interval_secs: 60,
                ..GameConfig::default()
            },
            questions_path: None,
            alerts: AlertConfig::default(),
            metrics_auth: "metrics:secret".to_string(),
        };
        let bank = StaticQuestionBank::new(vec![question(1, 100, time_limit)]);
        Arc::new(AppState::with_bank(config, Arc::new(bank)))
    }

    #[tokio::test(start_paused = true)]
    async fn evicts_only_games_idle_past_ttl() {
        let state = state(60);
        let stale = state.create_game().await;
        let touched = state.create_game().await;
        let sweeper = GameSweeper::new(state.clone());

        sleep(Duration::from_secs(300)).await;
        touched.select_answer("A").await;
        assert_eq!(sweeper.run_once().await, 0);

        sleep(Duration::from_secs(301)).await;
        assert_eq!(sweeper.run_once().await, 1);
        assert!(state.game(stale.id()).await.is_none());
        assert!(state.game(touched.id()).await.is_some());

        sleep(Duration::from_secs(300)).await;
        assert_eq!(sweeper.run_once().await, 1);
        assert!(state.games.read().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn finished_games_are_swept_after_ttl() {
        let state = state(60);
        let game = state.create_game().await;
        game.start_game(
            &WalletIdentity::from_address(WALLET),
            state.ledger.reporter_for(WALLET),
        )
            .await
            .unwrap();

        // 60s timeout plus the 2s reveal
        sleep(Duration::from_secs(63)).await;
        assert_eq!(game.snapshot().await.state, GameState::Finished);

        sleep(Duration::from_secs(590)).await;
        assert_eq!(state.evict_idle_games(Duration::from_secs(600)).await, 0);

        sleep(Duration::from_secs(20)).await;
        assert_eq!(state.evict_idle_games(Duration::from_secs(600)).await, 1);
        assert!(state.game(game.id()).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn ticking_games_are_never_idle() {
        let state = state(3_600);
        let game = state.create_game().await;
        game.start_game(
            &WalletIdentity::from_address(WALLET),
            state.ledger.reporter_for(WALLET),
        )
            .await
            .unwrap();

        sleep(Duration::from_secs(1_200)).await;
        assert_eq!(state.evict_idle_games(Duration::from_secs(600)).await, 0);
        assert_eq!(game.snapshot().await.state, GameState::Playing);
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_runs_on_interval() {
        let state = state(60);
        state.create_game().await;
        let handle = tokio::spawn(GameSweeper::new(state.clone()).run());

        // Idle for 600s by the sweep at t=600
        sleep(Duration::from_secs(590)).await;
        assert_eq!(state.games.read().await.len(), 1);

        sleep(Duration::from_secs(20)).await;
        assert!(state.games.read().await.is_empty());
        handle.abort();
    }
}
