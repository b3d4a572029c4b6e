//! Data-driven game balance
//!
//! Every gameplay number that a designer might want to tweak lives in
//! [`GameConfig`]. The defaults reproduce the classic 60 second round.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest accepted round
const MAX_ROUND_SECS: u32 = 3600;
/// Longest accepted post-basket delay
const MAX_RESET_DELAY_MS: u32 = 60_000;

/// Tunable gameplay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Round length in seconds
    pub round_secs: u32,
    /// Downward acceleration applied to the ball (px/tick²)
    pub gravity: f64,
    /// Points awarded per basket
    pub score_award: u32,
    /// Ball radius (px)
    pub ball_radius: f64,
    /// Hoop rim width (px)
    pub hoop_width: f64,
    /// Hoop rim band height (px)
    pub hoop_height: f64,
    /// Fraction of horizontal speed kept after a side-wall bounce
    pub wall_restitution: f64,
    /// Delay between a basket and the ball returning to rest (ms)
    pub reset_delay_ms: u32,
    /// Particles spawned per basket
    pub burst_size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_secs: 60,
            gravity: 0.5,
            score_award: 2,
            ball_radius: 15.0,
            hoop_width: 80.0,
            hoop_height: 15.0,
            wall_restitution: 0.7,
            reset_delay_ms: 500,
            burst_size: 20,
        }
    }
}

/// Reasons a config document can be rejected
#[derive(Debug)]
pub enum ConfigError {
    /// Not valid JSON, or a field has the wrong type
    Parse(serde_json::Error),
    /// A field parsed but its value is unusable
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Invalid { field, reason } => {
                write!(f, "invalid config field `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl GameConfig {
    /// Parse a JSON document. Missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document, falling back to defaults on any error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(config) => {
                log::info!("Loaded game config: {config:?}");
                config
            }
            Err(e) => {
                log::warn!("{e}; using default game config");
                Self::default()
            }
        }
    }

    /// Reject values that would break the simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }

        if self.round_secs == 0 {
            return invalid("round_secs", "must be at least 1");
        }
        if self.round_secs > MAX_ROUND_SECS {
            return invalid("round_secs", "must be at most one hour");
        }
        if self.reset_delay_ms > MAX_RESET_DELAY_MS {
            return invalid("reset_delay_ms", "must be at most 60000");
        }
        if !(self.gravity.is_finite() && self.gravity >= 0.0) {
            return invalid("gravity", "must be a non-negative number");
        }
        if !(self.ball_radius.is_finite() && self.ball_radius > 0.0) {
            return invalid("ball_radius", "must be positive");
        }
        if !(self.hoop_width.is_finite() && self.hoop_width > 0.0) {
            return invalid("hoop_width", "must be positive");
        }
        if !(self.hoop_height.is_finite() && self.hoop_height > 0.0) {
            return invalid("hoop_height", "must be positive");
        }
        if !(0.0..=1.0).contains(&self.wall_restitution) {
            return invalid("wall_restitution", "must be within 0..=1");
        }
        Ok(())
    }
}
