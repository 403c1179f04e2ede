/// Per-tick movement of obstacles, power-ups and player shots, plus
/// expiry of anything that left the field or ran out of time.

use crate::entities::{GameState, ObstacleKind};
use crate::levels::level_config;

/// Awarded for every obstacle that makes it past the bottom edge.
pub const SURVIVAL_SCORE: u32 = 10;
pub const POWER_UP_FALL_FACTOR: f32 = 0.7;
pub const POWER_UP_SPIN: f32 = 0.05;
/// Free-moving shots are dropped this far outside the side walls.
const SIDE_MARGIN: f32 = 50.0;

pub fn advance_entities(state: &mut GameState, dt: f32) {
    let game_speed = level_config(state.level).game_speed;
    let (width, height) = (state.width, state.height);

    // ── Obstacles ────────────────────────────────────────────────────────────
    let mut survived = 0u32;
    for o in state.obstacles.iter_mut() {
        match &mut o.kind {
            ObstacleKind::Asteroid | ObstacleKind::Insect => o.y += game_speed,
            ObstacleKind::BossProjectile | ObstacleKind::BossHoming | ObstacleKind::SwarmInsect => {
                o.x += o.vx;
                o.y += o.vy;
            }
            ObstacleKind::RageBeam {
                warning_ms,
                active_ms,
            } => {
                if *warning_ms > 0.0 {
                    *warning_ms -= dt;
                } else {
                    *active_ms -= dt;
                }
            }
        }
        o.rotation += o.rotation_speed;
        if let Some(life) = o.life_ms.as_mut() {
            *life -= dt;
        }
    }
    state.obstacles.retain(|o| {
        if let ObstacleKind::RageBeam { active_ms, .. } = o.kind {
            return active_ms > 0.0;
        }
        if o.life_ms.map_or(false, |life| life <= 0.0) {
            return false;
        }
        let gone_sideways = o.x + o.width < -SIDE_MARGIN || o.x > width + SIDE_MARGIN;
        let gone_below = o.y > height + o.height;
        if gone_below {
            survived += 1;
        }
        !(gone_below || gone_sideways)
    });
    state.score += survived * SURVIVAL_SCORE;

    // ── Power-ups ────────────────────────────────────────────────────────────
    for p in state.power_ups.iter_mut() {
        p.y += game_speed * POWER_UP_FALL_FACTOR;
        p.rotation += POWER_UP_SPIN;
    }
    state.power_ups.retain(|p| p.y <= height + p.height);

    // ── Player shots ─────────────────────────────────────────────────────────
    for shot in state.projectiles.iter_mut() {
        shot.x += shot.vx;
        shot.y += shot.vy;
        shot.life_ms -= dt;
    }
    state.projectiles.retain(|s| {
        s.life_ms > 0.0
            && s.y + s.height >= 0.0
            && s.y <= height
            && s.x + s.width >= 0.0
            && s.x <= width
    });
}
