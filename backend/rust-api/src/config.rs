use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::models::session::AdvanceReason;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    pub game: GameConfig,
    pub questions_path: Option<String>,
    pub alerts: AlertConfig,
    pub metrics_auth: String,
}

/// Timing of the quiz clock and the answer reveal delays.
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub tick_interval_ms: u64,
    pub submit_reveal_ms: u64,
    pub timeout_reveal_ms: u64,
    /// Games untouched for this long are dropped from the registry.
    pub idle_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            submit_reveal_ms: 3000,
            timeout_reveal_ms: 2000,
            idle_ttl_secs: 600,
            sweep_interval_secs: 60,
        }
    }
}

impl GameConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn reveal_delay(&self, reason: AdvanceReason) -> Duration {
        match reason {
            AdvanceReason::Submitted => Duration::from_millis(self.submit_reveal_ms),
            AdvanceReason::TimedOut => Duration::from_millis(self.timeout_reveal_ms),
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    pub interval_secs: u64,
    pub capacity: usize,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            interval_secs: 15,
            capacity: 5,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Root .env first, then the local one
        let skip_root_env = env::var("SKIP_ROOT_ENV").is_ok();
        if skip_root_env {
            dotenvy::dotenv().ok();
        } else if dotenvy::from_path("../../.env").is_err() {
            dotenvy::dotenv().ok();
        }

        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // config/{env}.toml, overridden by APP__SECTION__KEY variables
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:8081".to_string());

        let game_defaults = GameConfig::default();
        let game = GameConfig {
            tick_interval_ms: read_positive(
                &settings,
                "game.tick_interval_ms",
                "GAME_TICK_INTERVAL_MS",
                game_defaults.tick_interval_ms,
            ),
            submit_reveal_ms: read_positive(
                &settings,
                "game.submit_reveal_ms",
                "GAME_SUBMIT_REVEAL_MS",
                game_defaults.submit_reveal_ms,
            ),
            timeout_reveal_ms: read_positive(
                &settings,
                "game.timeout_reveal_ms",
                "GAME_TIMEOUT_REVEAL_MS",
                game_defaults.timeout_reveal_ms,
            ),
            idle_ttl_secs: read_positive(
                &settings,
                "game.idle_ttl_secs",
                "GAME_IDLE_TTL_SECS",
                game_defaults.idle_ttl_secs,
            ),
            sweep_interval_secs: read_positive(
                &settings,
                "game.sweep_interval_secs",
                "GAME_SWEEP_INTERVAL_SECS",
                game_defaults.sweep_interval_secs,
            ),
        };

        let questions_path = settings
            .get_string("questions.path")
            .or_else(|_| env::var("QUESTIONS_PATH"))
            .ok()
            .filter(|p| !p.trim().is_empty());

        let alert_defaults = AlertConfig::default();
        let alerts = AlertConfig {
            interval_secs: read_positive(
                &settings,
                "alerts.interval_secs",
                "WHALE_ALERT_INTERVAL_SECS",
                alert_defaults.interval_secs,
            ),
            capacity: read_positive(
                &settings,
                "alerts.capacity",
                "WHALE_ALERT_CAPACITY",
                alert_defaults.capacity as u64,
            ) as usize,
        };

        let metrics_auth = settings
            .get_string("metrics.auth")
            .or_else(|_| env::var("METRICS_AUTH"))
            .unwrap_or_else(|_| {
                if env == "prod" {
                    eprintln!("WARNING: METRICS_AUTH not set, using default credentials");
                }
                "admin:changeme".to_string()
            });

        Ok(Config {
            bind_addr,
            game,
            questions_path,
            alerts,
            metrics_auth,
        })
    }
}

fn read_positive(settings: &config::Config, key: &str, env_key: &str, default: u64) -> u64 {
    settings
        .get_int(key)
        .ok()
        .or_else(|| env::var(env_key).ok().and_then(|v| v.parse::<i64>().ok()))
        .filter(|v| *v > 0)
        .map(|v| v as u64)
        .unwrap_or(default)
}
