//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in [`GameState`].

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::{Countdown, PendingReset};
use super::input::AimSession;
use crate::consts::*;
use crate::tuning::GameConfig;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Start screen shown, nothing simulated
    Start,
    /// Round in progress
    Playing,
    /// Countdown expired, world frozen
    GameOver,
}

/// Actions that trigger phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseAction {
    Start,
    TimeUp,
    Restart,
}

impl GamePhase {
    /// Phase reached by applying `action`, or None if the transition is not allowed
    pub fn next(self, action: PhaseAction) -> Option<GamePhase> {
        match (self, action) {
            (GamePhase::Start, PhaseAction::Start) => Some(GamePhase::Playing),
            (GamePhase::Playing, PhaseAction::TimeUp) => Some(GamePhase::GameOver),
            (GamePhase::GameOver, PhaseAction::Restart) => Some(GamePhase::Playing),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Start => "Start",
            GamePhase::Playing => "Playing",
            GamePhase::GameOver => "GameOver",
        }
    }
}

/// 8-bit sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// From a packed `0xRRGGBB` value
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Normalised sRGB components with the given alpha
    pub fn to_rgba_f32(self, alpha: f32) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha,
        ]
    }
}

/// Hoop colours, left to right
pub const HOOP_COLORS: [Color; HOOP_COUNT] = [
    Color::from_hex(0xFF6B6B),
    Color::from_hex(0x4ECDC4),
    Color::from_hex(0xFFE66D),
];

/// Hoop anchor points as fractions of the play area (rim centre x, rim top y)
const HOOP_ANCHORS: [(f64, f64); HOOP_COUNT] = [(0.25, 0.3), (0.5, 0.25), (0.75, 0.3)];

/// Size of the play area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub width: f64,
    pub height: f64,
}

impl PlayArea {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Where the ball waits between flights
    pub fn ball_rest_position(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height - BALL_REST_OFFSET)
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    /// In flight (launched and not yet reset)
    pub is_moving: bool,
    /// Latched on the first basket of a flight
    pub has_scored: bool,
    /// Generation counter, bumped every time the ball is reset
    pub epoch: u32,
}

impl Ball {
    /// A ball resting at the launch spot
    pub fn at_rest(area: &PlayArea, radius: f64, epoch: u32) -> Self {
        Self {
            pos: area.ball_rest_position(),
            vel: DVec2::ZERO,
            radius,
            is_moving: false,
            has_scored: false,
            epoch,
        }
    }

    /// Start a flight with the given velocity
    pub fn launch(&mut self, vel: DVec2) {
        self.vel = vel;
        self.is_moving = true;
        self.has_scored = false;
    }
}

/// A hoop. `pos` is the top-left corner of the rim band.
#[derive(Debug, Clone, PartialEq)]
pub struct Hoop {
    pub pos: DVec2,
    pub width: f64,
    pub height: f64,
    pub color: Color,
}

impl Hoop {
    pub fn left(&self) -> f64 {
        self.pos.x
    }

    pub fn right(&self) -> f64 {
        self.pos.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.pos.y
    }

    pub fn bottom(&self) -> f64 {
        self.pos.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.pos.x + self.width / 2.0
    }
}

/// Lay the three hoops out across the play area
pub fn layout_hoops(area: &PlayArea, config: &GameConfig) -> [Hoop; HOOP_COUNT] {
    std::array::from_fn(|i| {
        let (fx, fy) = HOOP_ANCHORS[i];
        Hoop {
            pos: DVec2::new(
                area.width * fx - config.hoop_width / 2.0,
                area.height * fy,
            ),
            width: config.hoop_width,
            height: config.hoop_height,
            color: HOOP_COLORS[i],
        }
    })
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: DVec2,
    pub vel: DVec2,
    /// 1 at spawn, removed once it reaches 0
    pub life: f64,
    pub color: Color,
}

/// Notable things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RoundStarted { round_secs: u32 },
    Launched { velocity: DVec2 },
    Scored { hoop: usize, points: u32, total: u32, at: DVec2 },
    /// Ball left the bottom of the play area without scoring
    Missed,
    BallReset { epoch: u32 },
    RoundOver { final_score: u32 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub area: PlayArea,
    pub phase: GamePhase,
    pub score: u32,
    pub countdown: Countdown,
    pub ball: Ball,
    pub hoops: [Hoop; HOOP_COUNT],
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Active drag, if any
    pub aim: Option<AimSession>,
    /// Ball resets scheduled by baskets
    pub pending_resets: Vec<PendingReset>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Particle RNG
    pub rng: Pcg32,
    next_epoch: u32,
}

impl GameState {
    /// Create a game sitting on the start screen
    pub fn new(config: GameConfig, area: PlayArea, seed: u64) -> Self {
        let hoops = layout_hoops(&area, &config);
        let ball = Ball::at_rest(&area, config.ball_radius, 0);
        let countdown = Countdown::stopped(config.round_secs);

        Self {
            config,
            area,
            phase: GamePhase::Start,
            score: 0,
            countdown,
            ball,
            hoops,
            particles: Vec::new(),
            aim: None,
            pending_resets: Vec::new(),
            events: Vec::new(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_epoch: 1,
        }
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Play area changed size; hoops follow, the ball is left alone
    pub fn resize(&mut self, width: f64, height: f64) {
        self.area = PlayArea::new(width, height);
        self.hoops = layout_hoops(&self.area, &self.config);
    }

    /// Replace the ball with a fresh one at rest
    pub fn reset_ball(&mut self) {
        let epoch = self.next_epoch;
        self.next_epoch = self.next_epoch.wrapping_add(1);
        self.ball = Ball::at_rest(&self.area, self.config.ball_radius, epoch);
        self.events.push(GameEvent::BallReset { epoch });
    }

    /// Apply a phase action. Returns the new phase, or None if rejected.
    pub fn apply(&mut self, action: PhaseAction) -> Option<GamePhase> {
        let Some(next) = self.phase.next(action) else {
            log::debug!(
                "Ignoring {:?} while in phase {}",
                action,
                self.phase.as_str()
            );
            return None;
        };

        log::info!("Phase {} -> {}", self.phase.as_str(), next.as_str());
        match action {
            PhaseAction::Start => self.enter_playing(),
            PhaseAction::Restart => {
                self.particles.clear();
                self.enter_playing();
            }
            PhaseAction::TimeUp => self.enter_game_over(),
        }
        Some(next)
    }

    /// Start the round from the start screen
    pub fn start(&mut self) -> bool {
        self.apply(PhaseAction::Start).is_some()
    }

    /// Play again from the game-over screen
    pub fn restart(&mut self) -> bool {
        self.apply(PhaseAction::Restart).is_some()
    }

    fn enter_playing(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.aim = None;
        self.countdown.start(self.config.round_secs);
        self.reset_ball();
        self.events.push(GameEvent::RoundStarted {
            round_secs: self.config.round_secs,
        });
    }

    fn enter_game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.countdown.cancel();
        self.aim = None;
        self.events.push(GameEvent::RoundOver {
            final_score: self.score,
        });
    }
}
