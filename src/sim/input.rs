//! Drag-to-shoot input
//!
//! Pointer and touch gestures are normalised by the platform layer into
//! [`PointerEvent`]s in play-area coordinates. A press near the resting ball
//! opens an aim session; releasing launches the ball away from the release
//! point, like pulling back a slingshot.

use glam::DVec2;

use super::state::{GameEvent, GameState};

/// A press must land within this many ball radii of the centre to grab it
pub const PICKUP_RADIUS_FACTOR: f64 = 2.0;
/// Drag distance (px) that maps to a power of 1
pub const POWER_DISTANCE: f64 = 100.0;
/// Power cap
pub const MAX_POWER: f64 = 2.0;
/// Launch velocity per px of drag at power 1 (px/tick)
pub const LAUNCH_SCALE: f64 = 0.25;

/// Drag distance (px) per unit of aim indicator strength
const PREVIEW_DISTANCE: f64 = 50.0;
/// Aim indicator strength cap
const MAX_PREVIEW_STRENGTH: f64 = 3.0;

/// Normalised pointer gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(DVec2),
    Move(DVec2),
    /// Release. Mouse releases carry a point, touch releases don't.
    Up(Option<DVec2>),
}

/// An in-progress drag on the ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimSession {
    pub start: DVec2,
    /// Last recorded drag point
    pub current: Option<DVec2>,
}

/// What the renderer needs to draw the aim line and power ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimPreview {
    /// Ball centre minus drag point
    pub drag: DVec2,
    /// Indicator strength in 0..=3
    pub strength: f64,
}

/// Launch velocity for a ball at `ball_pos` released at `release`
pub fn launch_velocity(ball_pos: DVec2, release: DVec2) -> DVec2 {
    let drag = ball_pos - release;
    let power = (drag.length() / POWER_DISTANCE).min(MAX_POWER);
    drag * power * LAUNCH_SCALE
}

/// Feed one gesture into the game
pub fn handle_pointer(state: &mut GameState, event: PointerEvent) {
    match event {
        PointerEvent::Down(point) => pointer_down(state, point),
        PointerEvent::Move(point) => pointer_move(state, point),
        PointerEvent::Up(point) => pointer_up(state, point),
    }
}

fn pointer_down(state: &mut GameState, point: DVec2) {
    if !state.is_playing() || state.ball.is_moving {
        return;
    }

    let reach = state.ball.radius * PICKUP_RADIUS_FACTOR;
    if state.ball.pos.distance(point) < reach {
        state.aim = Some(AimSession {
            start: point,
            current: None,
        });
    }
}

fn pointer_move(state: &mut GameState, point: DVec2) {
    if let Some(aim) = state.aim.as_mut() {
        aim.current = Some(point);
    }
}

fn pointer_up(state: &mut GameState, point: Option<DVec2>) {
    let Some(aim) = state.aim else {
        return;
    };

    let Some(release) = point.or(aim.current) else {
        // Tap without a drag: keep the session so a later move/up can finish it
        return;
    };

    state.aim = None;
    let velocity = launch_velocity(state.ball.pos, release);
    state.ball.launch(velocity);
    state.events.push(GameEvent::Launched { velocity });
    log::debug!("Launched ball with velocity ({:.2}, {:.2})", velocity.x, velocity.y);
}

/// Aim line and power ring for the current drag, if one has moved
pub fn aim_preview(state: &GameState) -> Option<AimPreview> {
    let current = state.aim?.current?;
    let drag = state.ball.pos - current;
    Some(AimPreview {
        drag,
        strength: (drag.length() / PREVIEW_DISTANCE).min(MAX_PREVIEW_STRENGTH),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PlayArea;
    use crate::tuning::GameConfig;
    use proptest::prelude::*;

    fn playing_state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), PlayArea::new(400.0, 700.0), 1);
        state.start();
        state
    }

    #[test]
    fn test_grab_requires_proximity() {
        let mut state = playing_state();
        let ball = state.ball.pos;

        handle_pointer(&mut state, PointerEvent::Down(ball + DVec2::new(30.0, 0.0)));
        assert!(state.aim.is_none(), "exactly 2 radii away is outside reach");

        handle_pointer(&mut state, PointerEvent::Down(ball + DVec2::new(29.0, 0.0)));
        assert!(state.aim.is_some());
    }

    #[test]
    fn test_gestures_ignored_outside_playing() {
        let mut state = GameState::new(GameConfig::default(), PlayArea::new(400.0, 700.0), 1);
        let ball = state.ball.pos;
        handle_pointer(&mut state, PointerEvent::Down(ball));
        assert!(state.aim.is_none());

        let mut state = playing_state();
        state.ball.is_moving = true;
        handle_pointer(&mut state, PointerEvent::Down(ball));
        assert!(state.aim.is_none());
    }

    #[test]
    fn test_release_without_session_is_noop() {
        let mut state = playing_state();
        handle_pointer(&mut state, PointerEvent::Move(DVec2::new(1.0, 1.0)));
        handle_pointer(&mut state, PointerEvent::Up(Some(DVec2::new(1.0, 1.0))));
        assert!(!state.ball.is_moving);
        assert!(state.aim.is_none());
        assert_eq!(state.ball.vel, DVec2::ZERO);
    }

    #[test]
    fn test_zero_drag_still_flags_moving() {
        let mut state = playing_state();
        let ball = state.ball.pos;

        handle_pointer(&mut state, PointerEvent::Down(ball));
        handle_pointer(&mut state, PointerEvent::Up(Some(ball)));

        assert!(state.ball.is_moving);
        assert!(!state.ball.has_scored);
        assert_eq!(state.ball.vel, DVec2::ZERO);
        assert!(state.aim.is_none());
    }

    #[test]
    fn test_drag_launches_away_from_release() {
        let mut state = playing_state();
        let ball = state.ball.pos;

        handle_pointer(&mut state, PointerEvent::Down(ball));
        handle_pointer(&mut state, PointerEvent::Move(ball + DVec2::new(-40.0, 30.0)));
        handle_pointer(&mut state, PointerEvent::Up(Some(ball + DVec2::new(-60.0, 80.0))));

        // drag = (60, -80), |drag| = 100, power = 1
        assert!((state.ball.vel - DVec2::new(15.0, -20.0)).length() < 1e-9);
        assert!(state.ball.is_moving);
        assert!(matches!(
            state.drain_events().last(),
            Some(GameEvent::Launched { .. })
        ));
    }

    #[test]
    fn test_touch_release_uses_last_move() {
        let mut state = playing_state();
        let ball = state.ball.pos;

        handle_pointer(&mut state, PointerEvent::Down(ball));
        handle_pointer(&mut state, PointerEvent::Up(None));
        assert!(!state.ball.is_moving, "touch end without a drag does nothing");

        handle_pointer(&mut state, PointerEvent::Move(ball + DVec2::new(0.0, 50.0)));
        handle_pointer(&mut state, PointerEvent::Up(None));
        // drag = (0, -50), power = 0.5
        assert!((state.ball.vel - DVec2::new(0.0, -6.25)).length() < 1e-9);
    }

    #[test]
    fn test_aim_preview() {
        let mut state = playing_state();
        let ball = state.ball.pos;
        assert!(aim_preview(&state).is_none());

        handle_pointer(&mut state, PointerEvent::Down(ball));
        assert!(aim_preview(&state).is_none());

        handle_pointer(&mut state, PointerEvent::Move(ball + DVec2::new(0.0, 500.0)));
        let preview = aim_preview(&state).unwrap();
        assert_eq!(preview.drag, DVec2::new(0.0, -500.0));
        assert_eq!(preview.strength, MAX_PREVIEW_STRENGTH);
    }

    proptest! {
        #[test]
        fn prop_launch_power_is_capped(dx in -1000.0f64..1000.0, dy in -1000.0f64..1000.0) {
            let ball = DVec2::new(200.0, 650.0);
            let vel = launch_velocity(ball, ball - DVec2::new(dx, dy));
            let dist = (dx * dx + dy * dy).sqrt();

            // Speed is dist * min(dist/100, 2) * 0.25 and points along the drag
            let expected = dist * (dist / POWER_DISTANCE).min(MAX_POWER) * LAUNCH_SCALE;
            prop_assert!((vel.length() - expected).abs() < 1e-6 * expected.max(1.0));
            prop_assert!(vel.length() <= dist * MAX_POWER * LAUNCH_SCALE + 1e-9);
            if dist > 1e-6 {
                prop_assert!(vel.dot(DVec2::new(dx, dy)) >= 0.0);
            }
        }
    }
}
