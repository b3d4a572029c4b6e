//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame pacing (wall-clock frames to fixed simulation ticks)
//! - Input coordinates (mouse and touch to play-area points)
//! - DOM overlays

use glam::DVec2;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Converts animation-frame timestamps into a number of fixed ticks to run
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Timestamp of the previous frame (ms), None before the first frame
    last_time: Option<f64>,
    /// Unsimulated time carried between frames (seconds)
    accumulator: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a frame timestamp in milliseconds; returns how many ticks to run.
    ///
    /// The very first frame runs exactly one tick. Long stalls (tab in the
    /// background) are clamped so the game never fast-forwards.
    pub fn advance(&mut self, time_ms: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => ((time_ms - last) / 1000.0).clamp(0.0, MAX_FRAME_DT),
            None => SIM_DT,
        };
        self.last_time = Some(time_ms);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop whatever the substep cap couldn't absorb
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Forget timing history (after a restart). The next frame runs one tick,
    /// like the very first frame.
    pub fn reset(&mut self) {
        self.last_time = None;
        self.accumulator = 0.0;
    }
}

/// Convert viewport (client) coordinates into play-area coordinates
#[inline]
pub fn client_to_canvas(client_x: f64, client_y: f64, rect_left: f64, rect_top: f64) -> DVec2 {
    DVec2::new(client_x - rect_left, client_y - rect_top)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_runs_one_tick() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1000.0), 1);
    }

    #[test]
    fn test_steady_60hz() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);

        let frame_ms = 1000.0 / 60.0;
        let mut total = 0;
        for i in 1..=600 {
            total += clock.advance(i as f64 * frame_ms);
        }
        // Float drift may defer a single tick to the next frame
        assert!((599..=600).contains(&total), "ran {total} ticks");
    }

    #[test]
    fn test_high_refresh_rate_runs_fewer_ticks_per_frame() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);

        let frame_ms = 1000.0 / 144.0;
        let mut total = 0;
        for i in 1..=144 {
            total += clock.advance(i as f64 * frame_ms);
        }
        assert!((59..=60).contains(&total), "ran {total} ticks");
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        // Ten seconds in the background: clamped to 0.1 s, about 6 ticks
        let ticks = clock.advance(10_000.0);
        assert!((5..=6).contains(&ticks), "ran {ticks} ticks");
        assert!(clock.advance(10_000.0) <= 1);
    }

    #[test]
    fn test_backwards_time_runs_nothing() {
        let mut clock = FrameClock::new();
        clock.advance(500.0);
        assert_eq!(clock.advance(400.0), 0);
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        clock.advance(10.0);

        clock.reset();
        // A long gap since the last frame is not replayed
        assert_eq!(clock.advance(5_000.0), 1);
        assert_eq!(clock.advance(5_000.0 + 1000.0 / 60.0 + 0.5), 1);
    }

    #[test]
    fn test_client_to_canvas() {
        assert_eq!(
            client_to_canvas(120.0, 80.0, 20.0, 30.0),
            DVec2::new(100.0, 50.0)
        );
    }
}
