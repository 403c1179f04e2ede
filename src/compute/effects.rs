/// Particle bursts.  Purely visual; nothing here affects gameplay.

use rand::Rng;

use crate::entities::{GameState, Particle, ParticleColor};

pub const PARTICLE_LIFE_MS: f32 = 1000.0;

pub fn create_particle(state: &mut GameState, x: f32, y: f32, color: ParticleColor, vx: f32, vy: f32) {
    state.particles.push(Particle {
        x,
        y,
        vx,
        vy,
        color,
        life: PARTICLE_LIFE_MS,
        max_life: PARTICLE_LIFE_MS,
        alpha: 1.0,
    });
}

/// `count` particles flying out of (x, y) with each velocity axis in ±`spread`.
pub fn create_burst(
    state: &mut GameState,
    x: f32,
    y: f32,
    color: ParticleColor,
    count: usize,
    spread: f32,
    rng: &mut impl Rng,
) {
    for _ in 0..count {
        let vx = rng.gen_range(-spread..spread);
        let vy = rng.gen_range(-spread..spread);
        create_particle(state, x, y, color, vx, vy);
    }
}

pub fn create_explosion(state: &mut GameState, x: f32, y: f32, rng: &mut impl Rng) {
    create_burst(state, x, y, ParticleColor::Explosion, 8, 3.0, rng);
}

pub fn update_particles(state: &mut GameState, dt: f32) {
    for p in state.particles.iter_mut() {
        p.x += p.vx;
        p.y += p.vy;
        p.life -= dt;
        p.alpha = (p.life / p.max_life).max(0.0);
    }
    state.particles.retain(|p| p.life > 0.0);
}
