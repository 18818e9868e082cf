//! Configuration
//!
//! Every constant the simulation depends on lives in [`GameConfig`]; the
//! host-side concerns (leaderboard backend, remote roster feed) sit next to
//! it in [`AppConfig`]. Defaults reproduce the reference tuning. A JSON file
//! named by `CLOSING_WALLS_CONFIG` overrides any subset of fields.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::game::input::Key;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV_VAR: &str = "CLOSING_WALLS_CONFIG";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Could not read the config file.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Config file is not valid JSON for [`AppConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values are individually valid but inconsistent.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// How the arena walls behave while playing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ShrinkPolicy {
    /// Walls stay where they spawned.
    Static,
    /// Every edge advances inward by `rate` pixels each Playing tick.
    PerTick {
        /// Pixels per tick.
        rate: f64,
    },
}

impl ShrinkPolicy {
    /// Per-tick shrink amount, if shrinking is enabled.
    pub fn rate(&self) -> Option<f64> {
        match self {
            ShrinkPolicy::Static => None,
            ShrinkPolicy::PerTick { rate } => Some(*rate),
        }
    }
}

/// Key that confirms the typed name and starts the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmKey {
    /// Enter confirms (default).
    Enter,
    /// Space confirms (reduced variant).
    Space,
}

impl ConfirmKey {
    /// Input key this choice listens for.
    pub fn key(self) -> Key {
        match self {
            ConfirmKey::Enter => Key::Enter,
            ConfirmKey::Space => Key::Space,
        }
    }
}

/// Simulation constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Screen width in pixels.
    pub screen_width: i32,
    /// Screen height in pixels.
    pub screen_height: i32,
    /// Actor sprite width (player, NPCs and remote players).
    pub player_width: i32,
    /// Actor sprite height.
    pub player_height: i32,
    /// Thickness of the left/right walls.
    pub wall_width: i32,
    /// Thickness of the top/bottom walls.
    pub wall_height: i32,
    /// Inset applied on every side of an NPC's box before collision tests.
    pub npc_collision_inset: i32,
    /// NPCs spawned per run.
    pub npc_count: u32,
    /// Player spawn point.
    pub player_spawn: (i32, i32),
    /// Pixels moved per directional key press.
    pub move_step: i32,
    /// NPC step at speed multiplier 1.0.
    pub npc_base_step: f64,
    /// Speed multiplier increase per Playing tick.
    pub speed_ramp: f64,
    /// Upper bound for the speed multiplier.
    pub max_speed_multiplier: f64,
    /// Ticks Backspace must be held before it repeats.
    pub backspace_repeat_delay: u32,
    /// Ticks between Backspace repeats.
    pub backspace_repeat_interval: u32,
    /// Newline-delimited segments kept in the name buffer.
    pub max_name_lines: usize,
    /// Simulation rate (Hz).
    pub tick_rate: u32,
    /// Wall behaviour during play.
    pub shrink: ShrinkPolicy,
    /// Key that leaves name entry.
    pub confirm_key: ConfirmKey,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 640,
            screen_height: 640,
            player_width: 100,
            player_height: 100,
            wall_width: 50,
            wall_height: 50,
            npc_collision_inset: 50,
            npc_count: 3,
            player_spawn: (100, 100),
            move_step: 25,
            npc_base_step: 5.0,
            speed_ramp: 0.001,
            max_speed_multiplier: 10.0,
            backspace_repeat_delay: 30,
            backspace_repeat_interval: 3,
            max_name_lines: 10,
            tick_rate: crate::TICK_RATE,
            // Walls close in by default; `Static` keeps them where they spawn
            shrink: ShrinkPolicy::PerTick { rate: 0.01 },
            confirm_key: ConfirmKey::Enter,
        }
    }
}

impl GameConfig {
    /// Seconds advanced per Playing tick.
    pub fn tick_seconds(&self) -> f64 {
        1.0 / self.tick_rate as f64
    }

    /// Check that the constants describe a playable game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.player_width <= 0 || self.player_height <= 0 {
            return invalid("player size must be positive".into());
        }
        if self.screen_width < 2 * self.player_width || self.screen_height < 2 * self.player_height {
            return invalid(format!(
                "screen {}x{} too small for actors {}x{}",
                self.screen_width, self.screen_height, self.player_width, self.player_height
            ));
        }
        if self.wall_width < 0 || self.wall_height < 0 {
            return invalid("wall thickness must not be negative".into());
        }
        // Arena::new must start with room for the player between the walls
        if self.wall_width + self.player_width > self.screen_width - self.wall_width
            || self.wall_height + self.player_height > self.screen_height - self.wall_height
        {
            return invalid(format!(
                "walls {}x{} leave no room for actors {}x{} on a {}x{} screen",
                self.wall_width,
                self.wall_height,
                self.player_width,
                self.player_height,
                self.screen_width,
                self.screen_height
            ));
        }
        if self.npc_collision_inset < 0 {
            return invalid("npc collision inset must not be negative".into());
        }
        if self.tick_rate == 0 {
            return invalid("tick rate must be positive".into());
        }
        if self.backspace_repeat_interval == 0 {
            return invalid("backspace repeat interval must be positive".into());
        }
        if self.max_name_lines == 0 {
            return invalid("name buffer must keep at least one line".into());
        }
        if !(self.max_speed_multiplier >= 1.0) {
            return invalid("max speed multiplier must be at least 1.0".into());
        }
        if !(self.speed_ramp >= 0.0) || !(self.npc_base_step >= 0.0) {
            return invalid("speed ramp and npc step must not be negative".into());
        }
        if let Some(rate) = self.shrink.rate() {
            if !(rate >= 0.0) {
                return invalid(format!("shrink rate {rate} must not be negative"));
            }
        }
        Ok(())
    }
}

/// Leaderboard backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// Fetch the leaderboard on game over.
    pub enabled: bool,
    /// Backend base URL.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: 3000,
        }
    }
}

impl LeaderboardConfig {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Remote roster feed settings. Disabled unless `url` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// WebSocket URL of the roster relay.
    pub url: Option<String>,
    /// Buffered roster snapshots before the reader applies backpressure.
    pub channel_capacity: usize,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            channel_capacity: 16,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Simulation constants.
    pub game: GameConfig,
    /// Leaderboard backend.
    pub leaderboard: LeaderboardConfig,
    /// Remote roster feed.
    pub remote: RemoteConfig,
    /// Fixed RNG seed; the host picks one when absent.
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Parse from a JSON document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from the file named by [`CONFIG_ENV_VAR`], or use defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => {
                debug!("{} not set, using default config", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate()?;
        if self.leaderboard.enabled && self.leaderboard.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("leaderboard base_url is empty".into()));
        }
        if self.remote.channel_capacity == 0 {
            return Err(ConfigError::Invalid("remote channel capacity must be positive".into()));
        }
        Ok(())
    }
}
