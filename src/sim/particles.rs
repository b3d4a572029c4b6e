//! Basket celebration particles
//!
//! Purely cosmetic: nothing here reads or writes the ball or the score.

use glam::DVec2;
use rand::Rng;

use super::state::{Color, Particle};

/// Spread of initial particle velocity on each axis (px/tick)
pub const BURST_SPEED: f64 = 8.0;
/// Downward acceleration on particles, lighter than the ball's (px/tick²)
pub const PARTICLE_GRAVITY: f64 = 0.2;
/// Life lost per tick; a particle lasts 1 / PARTICLE_FADE ticks
pub const PARTICLE_FADE: f64 = 0.02;

/// Spawn `count` particles at `origin`, flying off in random directions
pub fn spawn_burst<R: Rng>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    origin: DVec2,
    color: Color,
    count: usize,
) {
    particles.reserve(count);
    for _ in 0..count {
        let vel = DVec2::new(
            (rng.random::<f64>() - 0.5) * BURST_SPEED,
            (rng.random::<f64>() - 0.5) * BURST_SPEED,
        );
        particles.push(Particle {
            pos: origin,
            vel,
            life: 1.0,
            color,
        });
    }
}

/// Advance every particle one tick and drop the dead ones.
///
/// Uses swap-remove, so particle order is not preserved.
pub fn update_particles(particles: &mut Vec<Particle>) {
    let mut i = 0;
    while i < particles.len() {
        let p = &mut particles[i];
        p.pos += p.vel;
        p.vel.y += PARTICLE_GRAVITY;
        p.life -= PARTICLE_FADE;

        if p.life <= 0.0 {
            // The swapped-in particle hasn't been updated yet; revisit index i
            particles.swap_remove(i);
        } else {
            i += 1;
        }
    }
}
