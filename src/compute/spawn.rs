/// Probabilistic spawning of falling obstacles and power-ups.

use rand::Rng;

use crate::entities::{GameState, Obstacle, ObstacleKind, PowerUp, PowerUpKind};
use crate::levels::{is_boss_level, level_config};

pub const OBSTACLE_MARGIN: f32 = 30.0;
pub const POWER_UP_MARGIN: f32 = 20.0;
pub const POWER_UP_SIZE: f32 = 25.0;

/// One Bernoulli trial for each entity type.  Both trials are always drawn so
/// the RNG stream does not depend on the level; the boss level just ignores
/// the obstacle result because the boss supplies its own.
pub fn spawn_objects(state: &mut GameState, rng: &mut impl Rng) {
    let cfg = level_config(state.level);
    let obstacle_roll = rng.gen_bool(cfg.obstacle_spawn_rate);
    let power_up_roll = rng.gen_bool(cfg.power_up_spawn_rate);

    if obstacle_roll && !is_boss_level(state.level) {
        spawn_obstacle(state, rng);
    }
    if power_up_roll {
        spawn_power_up(state, rng);
    }
}

/// Random x within the field minus `margin` on each side.
fn random_x(width: f32, margin: f32, rng: &mut impl Rng) -> f32 {
    let hi = width - margin;
    if hi <= margin {
        return margin.min(width / 2.0);
    }
    rng.gen_range(margin..hi)
}

pub fn spawn_obstacle(state: &mut GameState, rng: &mut impl Rng) {
    let x = random_x(state.width, OBSTACLE_MARGIN, rng);
    let width = rng.gen_range(30.0..50.0);
    let height = rng.gen_range(30.0..50.0);
    let rotation_speed = rng.gen_range(-0.1..0.1);
    let kind = if rng.gen_bool(0.5) {
        ObstacleKind::Asteroid
    } else {
        ObstacleKind::Insect
    };
    state.obstacles.push(Obstacle {
        x,
        y: -height,
        width,
        height,
        rotation: 0.0,
        rotation_speed,
        vx: 0.0,
        vy: 0.0,
        kind,
        life_ms: None,
    });
}

pub fn spawn_power_up(state: &mut GameState, rng: &mut impl Rng) {
    let x = random_x(state.width, POWER_UP_MARGIN, rng);
    let kind = PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())];
    state.power_ups.push(PowerUp {
        x,
        y: -POWER_UP_SIZE,
        width: POWER_UP_SIZE,
        height: POWER_UP_SIZE,
        rotation: 0.0,
        kind,
    });
}
