//! Collision tests for the ball against the court
//!
//! Side walls bounce with energy loss. Hoops never deflect the ball; they only
//! count as a basket when the ball drops through the rim band.

use super::state::{Ball, Hoop, PlayArea};

/// Bounce the ball off the left/right walls.
///
/// Returns true if the ball touched a wall this step. The ball is always left
/// inside `[radius, width - radius]` afterwards.
pub fn wall_bounce(ball: &mut Ball, area: &PlayArea, restitution: f64) -> bool {
    let r = ball.radius;
    if ball.pos.x - r < 0.0 || ball.pos.x + r > area.width {
        ball.vel.x *= -restitution;
        // max/min rather than clamp: a play area narrower than the ball must not panic
        ball.pos.x = ball.pos.x.min(area.width - r).max(r);
        return true;
    }
    false
}

/// Has the ball dropped completely below the play area?
pub fn below_floor(ball: &Ball, area: &PlayArea) -> bool {
    ball.pos.y - ball.radius > area.height
}

/// Does the ball's vertical extent overlap the hoop's rim band?
pub fn overlaps_rim_band(ball: &Ball, hoop: &Hoop) -> bool {
    ball.pos.y - ball.radius < hoop.bottom() && ball.pos.y + ball.radius > hoop.top()
}

/// Is the ball centre strictly between the rim edges?
pub fn within_rim(ball: &Ball, hoop: &Hoop) -> bool {
    ball.pos.x > hoop.left() && ball.pos.x < hoop.right()
}

/// Would this ball score in this hoop right now?
pub fn is_basket(ball: &Ball, hoop: &Hoop) -> bool {
    ball.vel.y > 0.0 && overlaps_rim_band(ball, hoop) && within_rim(ball, hoop)
}

/// Index of the first hoop the ball scores in, if any.
///
/// A ball that has already scored this flight never scores again.
pub fn scoring_hoop(ball: &Ball, hoops: &[Hoop]) -> Option<usize> {
    if ball.has_scored {
        return None;
    }
    hoops.iter().position(|hoop| is_basket(ball, hoop))
}
