//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod input;
pub mod particles;
pub mod state;
pub mod tick;

pub use clock::{Countdown, PendingReset};
pub use collision::{is_basket, scoring_hoop, wall_bounce};
pub use input::{AimPreview, AimSession, PointerEvent, aim_preview, handle_pointer, launch_velocity};
pub use state::{
    Ball, Color, GameEvent, GamePhase, GameState, HOOP_COLORS, Hoop, Particle, PhaseAction,
    PlayArea, layout_hoops,
};
pub use tick::{TickInput, tick};
