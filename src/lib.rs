//! Hoop Shot - A drag-to-shoot basketball arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, scoring, particles, round clock)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance
//! - `settings`: Visual preferences

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{QualityPreset, Settings};
pub use tuning::{ConfigError, GameConfig};

/// Game configuration constants
pub mod consts {
    /// Simulation rate. Every per-tick constant in the game (gravity, particle
    /// fade, restitution) is expressed at this rate.
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f64 = 1.0 / SIM_HZ as f64;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Number of hoops on the court
    pub const HOOP_COUNT: usize = 3;
    /// Resting ball height above the bottom edge
    pub const BALL_REST_OFFSET: f64 = 50.0;
}

/// Convert a duration in milliseconds to whole simulation ticks (rounded up)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    (ms * consts::SIM_HZ).div_ceil(1000)
}
