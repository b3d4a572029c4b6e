//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation by one step.

use glam::DVec2;

use super::clock::{PendingReset, advance_pending};
use super::collision::{below_floor, scoring_hoop, wall_bounce};
use super::input::{PointerEvent, handle_pointer};
use super::particles::{spawn_burst, update_particles};
use super::state::{GameEvent, GamePhase, GameState, PhaseAction};
use crate::ms_to_ticks;

/// Input gathered between ticks
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Gestures in arrival order
    pub pointer: Vec<PointerEvent>,
    /// Start button pressed
    pub start: bool,
    /// Restart button pressed
    pub restart: bool,
}

impl TickInput {
    /// Queue a gesture. Back-to-back moves collapse into the latest one.
    pub fn push_pointer(&mut self, event: PointerEvent) {
        if let (Some(PointerEvent::Move(_)), PointerEvent::Move(_)) = (self.pointer.last(), event) {
            self.pointer.pop();
        }
        self.pointer.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.pointer.is_empty() && !self.start && !self.restart
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    // Delayed resets run in every phase and check for themselves whether they still apply
    for epoch in advance_pending(&mut state.pending_resets) {
        if state.phase == GamePhase::Playing && state.ball.epoch == epoch {
            log::debug!("Post-basket reset for ball {epoch}");
            state.reset_ball();
        }
    }

    if input.start {
        state.apply(PhaseAction::Start);
    }
    if input.restart {
        state.apply(PhaseAction::Restart);
    }

    // Frozen outside a round
    if state.phase != GamePhase::Playing {
        return;
    }

    for &event in &input.pointer {
        handle_pointer(state, event);
    }

    step_ball(state);
    update_particles(&mut state.particles);

    if state.countdown.tick() {
        state.apply(PhaseAction::TimeUp);
    }
}

/// Integrate the ball one step and resolve walls, floor and hoops
fn step_ball(state: &mut GameState) {
    if !state.ball.is_moving {
        return;
    }

    let gravity = state.config.gravity;
    let ball = &mut state.ball;
    // Semi-implicit Euler: velocity first, then position
    ball.vel.y += gravity;
    ball.pos += ball.vel;

    wall_bounce(ball, &state.area, state.config.wall_restitution);

    if below_floor(ball, &state.area) {
        if !ball.has_scored {
            log::debug!("Missed shot");
            state.events.push(GameEvent::Missed);
        }
        state.reset_ball();
        return;
    }

    check_baskets(state);
}

fn check_baskets(state: &mut GameState) {
    let Some(index) = scoring_hoop(&state.ball, &state.hoops) else {
        return;
    };

    let hoop = &state.hoops[index];
    let at = DVec2::new(state.ball.pos.x, hoop.top());
    let color = hoop.color;

    state.score += state.config.score_award;
    state.ball.has_scored = true;
    spawn_burst(
        &mut state.particles,
        &mut state.rng,
        at,
        color,
        state.config.burst_size,
    );
    state.pending_resets.push(PendingReset::new(
        state.ball.epoch,
        ms_to_ticks(state.config.reset_delay_ms),
    ));

    log::info!("Basket in hoop {index}! Score: {}", state.score);
    state.events.push(GameEvent::Scored {
        hoop: index,
        points: state.config.score_award,
        total: state.score,
        at,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_HZ;
    use crate::sim::state::PlayArea;
    use crate::tuning::GameConfig;
    use proptest::prelude::*;

    /// Tall court so a straight-up shot drops slowly through the middle hoop
    fn playing_state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), PlayArea::new(400.0, 1200.0), 42);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        state.drain_events();
        state
    }

    /// Straight-up shot whose apex sits just above the middle hoop
    fn shoot_middle(state: &mut GameState) {
        let ball = state.ball.pos;
        let mut input = TickInput::default();
        input.push_pointer(PointerEvent::Down(ball));
        input.push_pointer(PointerEvent::Move(ball + DVec2::new(0.0, 60.0)));
        input.push_pointer(PointerEvent::Up(Some(ball + DVec2::new(0.0, 110.0))));
        tick(state, &input);
    }

    fn run_until_score(state: &mut GameState, max_ticks: u32) -> Option<u32> {
        let idle = TickInput::default();
        for n in 0..max_ticks {
            if state.score > 0 {
                return Some(n);
            }
            tick(state, &idle);
        }
        None
    }

    #[test]
    fn test_tick_start_to_playing() {
        let mut state = GameState::new(GameConfig::default(), PlayArea::new(400.0, 700.0), 1);
        assert_eq!(state.phase, GamePhase::Start);

        // Tick without start - stays on the start screen
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Start);

        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.seconds_remaining(), 60);
        assert!(matches!(
            state.drain_events().last(),
            Some(GameEvent::RoundStarted { round_secs: 60 })
        ));
    }

    #[test]
    fn test_gravity_and_integration_order() {
        let mut state = playing_state();
        state.ball.pos = DVec2::new(200.0, 600.0);
        state.ball.launch(DVec2::new(2.0, -10.0));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.ball.vel, DVec2::new(2.0, -9.5));
        assert_eq!(state.ball.pos, DVec2::new(202.0, 590.5));
    }

    #[test]
    fn test_resting_ball_does_not_move() {
        let mut state = playing_state();
        let rest = state.ball.pos;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.ball.pos, rest);
        assert_eq!(state.ball.vel, DVec2::ZERO);
    }

    #[test]
    fn test_ball_below_floor_resets_without_scoring() {
        let mut state = playing_state();
        let rest = state.ball.pos;
        let epoch = state.ball.epoch;
        state.ball.pos = DVec2::new(100.0, 1210.0);
        state.ball.launch(DVec2::new(0.0, 5.0));

        tick(&mut state, &TickInput::default());
        assert!(!state.ball.is_moving);
        assert_eq!(state.ball.pos, rest);
        assert_eq!(state.ball.vel, DVec2::ZERO);
        assert_ne!(state.ball.epoch, epoch);
        assert_eq!(state.score, 0);
        assert!(state.drain_events().contains(&GameEvent::Missed));
    }

    #[test]
    fn test_scoring_end_to_end() {
        let mut state = playing_state();
        assert_eq!(state.score, 0);
        assert_eq!(state.seconds_remaining(), 60);

        shoot_middle(&mut state);
        assert!(state.ball.is_moving);

        let ticks = run_until_score(&mut state, 200).expect("shot should score");
        assert!(ticks > 30, "scores on the way down, not the way up");
        assert_eq!(state.score, 2);
        assert!(state.ball.has_scored);

        let middle = state.hoops[1].clone();
        let scored = state
            .drain_events()
            .into_iter()
            .find_map(|e| match e {
                GameEvent::Scored { hoop, at, total, .. } => Some((hoop, at, total)),
                _ => None,
            })
            .unwrap();
        assert_eq!(scored.0, 1);
        assert_eq!(scored.1, DVec2::new(200.0, middle.top()));
        assert_eq!(scored.2, 2);

        assert_eq!(state.particles.len(), 20);
        assert!(state.particles.iter().all(|p| p.color == middle.color));

        // Reset lands exactly 500 ms (30 ticks) after the basket
        let idle = TickInput::default();
        for _ in 0..29 {
            tick(&mut state, &idle);
        }
        assert!(state.ball.is_moving, "still in flight before the delay");
        assert!(state.ball.has_scored);

        tick(&mut state, &idle);
        assert!(!state.ball.is_moving);
        assert!(!state.ball.has_scored);
        assert_eq!(state.ball.pos, state.area.ball_rest_position());
        assert_eq!(state.score, 2);
    }

    #[test]
    fn test_scoring_is_once_per_flight() {
        let mut state = playing_state();
        shoot_middle(&mut state);
        run_until_score(&mut state, 200).unwrap();

        // Force the ball back into the rim band, still descending
        let hoop = state.hoops[0].clone();
        state.ball.pos = DVec2::new(hoop.center_x(), hoop.top());
        state.ball.vel = DVec2::new(0.0, 1.0);
        tick(&mut state, &TickInput::default());

        assert_eq!(state.score, 2);
        assert_eq!(state.particles.len(), 20);
    }

    #[test]
    fn test_stale_reset_ignored_after_restart() {
        let mut state = playing_state();
        shoot_middle(&mut state);
        run_until_score(&mut state, 200).unwrap();
        assert_eq!(state.pending_resets.len(), 1);

        // Round ends before the reset fires, then the player restarts
        state.apply(PhaseAction::TimeUp);
        tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);

        // New flight in the new round
        state.ball.launch(DVec2::new(0.0, -20.0));
        let flight_epoch = state.ball.epoch;
        for _ in 0..40 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.pending_resets.is_empty());
        assert_eq!(state.ball.epoch, flight_epoch, "old reset must not touch the new ball");
        assert!(state.ball.is_moving);
    }

    #[test]
    fn test_reset_skipped_when_round_over() {
        let mut state = playing_state();
        shoot_middle(&mut state);
        run_until_score(&mut state, 200).unwrap();
        assert_eq!(state.pending_resets.len(), 1);

        // Time runs out with the scoring ball still current
        let epoch = state.ball.epoch;
        state.apply(PhaseAction::TimeUp);
        let frozen = state.ball.clone();
        assert_eq!(frozen.epoch, epoch);

        for _ in 0..40 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.pending_resets.is_empty());
        assert_eq!(state.ball, frozen, "ball changed during GameOver");
        assert!(
            !state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::BallReset { .. }))
        );
    }

    #[test]
    fn test_burst_adds_to_live_particles() {
        let mut state = playing_state();
        shoot_middle(&mut state);

        let mut rehearsal = state.clone();
        let to_score = run_until_score(&mut rehearsal, 200).unwrap();
        assert!(to_score > 10);

        // An earlier burst, still alive when the basket lands
        let idle = TickInput::default();
        for _ in 0..to_score - 10 {
            tick(&mut state, &idle);
        }
        spawn_burst(
            &mut state.particles,
            &mut state.rng,
            DVec2::new(50.0, 50.0),
            state.hoops[0].color,
            7,
        );

        let mut before = state.particles.len();
        while state.score == 0 {
            before = state.particles.len();
            tick(&mut state, &idle);
        }
        assert_eq!(before, 7);
        assert_eq!(state.particles.len(), before + 20);
    }

    #[test]
    fn test_reset_skipped_when_ball_already_replaced() {
        let mut state = playing_state();
        shoot_middle(&mut state);
        run_until_score(&mut state, 200).unwrap();

        // Ball gets replaced (e.g. fell out) and a new shot is launched
        state.reset_ball();
        state.ball.launch(DVec2::new(0.0, -15.0));
        let epoch = state.ball.epoch;

        for _ in 0..30 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.ball.epoch, epoch);
        assert!(state.ball.is_moving);
    }

    #[test]
    fn test_round_ends_exactly_once() {
        let mut state = playing_state();
        let idle = TickInput::default();
        let mut round_overs = 0;

        // The start tick already counted toward the first second
        for _ in 0..(60 * SIM_HZ - 2) {
            tick(&mut state, &idle);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.seconds_remaining(), 1);

        for _ in 0..(5 * SIM_HZ) {
            tick(&mut state, &idle);
            round_overs += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::RoundOver { .. }))
                .count();
        }

        assert_eq!(round_overs, 1);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.seconds_remaining(), 0);
        assert!(!state.countdown.is_running());
    }

    #[test]
    fn test_game_over_freezes_world() {
        let mut state = playing_state();
        state.ball.launch(DVec2::new(3.0, -12.0));
        spawn_burst(
            &mut state.particles,
            &mut state.rng,
            DVec2::new(100.0, 100.0),
            state.hoops[0].color,
            5,
        );
        state.apply(PhaseAction::TimeUp);

        let ball = state.ball.clone();
        let particles = state.particles.clone();
        let mut input = TickInput::default();
        input.push_pointer(PointerEvent::Down(ball.pos));
        for _ in 0..10 {
            tick(&mut state, &input);
        }

        assert_eq!(state.ball, ball);
        assert_eq!(state.particles, particles);
        assert!(state.aim.is_none());
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut state = playing_state();
        state.score = 8;
        state.apply(PhaseAction::TimeUp);

        tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.seconds_remaining(), 60);
        assert!(state.countdown.is_running());
    }

    #[test]
    fn test_move_events_coalesce() {
        let mut input = TickInput::default();
        assert!(input.is_empty());
        input.push_pointer(PointerEvent::Down(DVec2::ZERO));
        input.push_pointer(PointerEvent::Move(DVec2::new(1.0, 0.0)));
        input.push_pointer(PointerEvent::Move(DVec2::new(2.0, 0.0)));
        input.push_pointer(PointerEvent::Up(None));
        input.push_pointer(PointerEvent::Move(DVec2::new(3.0, 0.0)));

        assert_eq!(
            input.pointer,
            vec![
                PointerEvent::Down(DVec2::ZERO),
                PointerEvent::Move(DVec2::new(2.0, 0.0)),
                PointerEvent::Up(None),
                PointerEvent::Move(DVec2::new(3.0, 0.0)),
            ]
        );
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = playing_state();
        let mut state2 = playing_state();

        shoot_middle(&mut state1);
        shoot_middle(&mut state2);
        for _ in 0..150 {
            tick(&mut state1, &TickInput::default());
            tick(&mut state2, &TickInput::default());
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.ball, state2.ball);
        assert_eq!(state1.particles, state2.particles);
    }

    proptest! {
        #[test]
        fn prop_ball_stays_between_walls(
            x in 15.0f64..385.0,
            y in 0.0f64..700.0,
            vx in -80.0f64..80.0,
            vy in -80.0f64..80.0,
            steps in 1usize..20,
        ) {
            let mut state = GameState::new(GameConfig::default(), PlayArea::new(400.0, 700.0), 5);
            state.start();
            state.ball.pos = DVec2::new(x, y);
            state.ball.launch(DVec2::new(vx, vy));

            for _ in 0..steps {
                tick(&mut state, &TickInput::default());
                let r = state.ball.radius;
                prop_assert!(state.ball.pos.x >= r);
                prop_assert!(state.ball.pos.x <= state.area.width - r);
            }
        }
    }
}
