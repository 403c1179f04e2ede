/// Blaster fire.  Automatic while the blaster power-up is active, and on
/// demand through `compute::shoot_at`.

use crate::entities::{Bounds, GameState, Projectile, ShotPattern};

/// Only obstacles within this distance are auto-targeted.
pub const AUTO_TARGET_RANGE: f32 = 150.0;
pub const PROJECTILE_LIFE_MS: f32 = 3_000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotProfile {
    pub pattern: ShotPattern,
    pub damage: f32,
    pub speed: f32,
    pub width: f32,
    pub height: f32,
}

/// Milliseconds between volleys for a blaster level; `None` when it is off.
pub fn fire_interval_ms(blaster_level: u8) -> Option<f32> {
    match blaster_level {
        1 => Some(800.0),
        2 => Some(600.0),
        3 => Some(400.0),
        _ => None,
    }
}

pub fn shot_profile(blaster_level: u8) -> ShotProfile {
    match blaster_level {
        0 | 1 => ShotProfile {
            pattern: ShotPattern::Single,
            damage: 25.0,
            speed: 12.0,
            width: 6.0,
            height: 12.0,
        },
        2 => ShotProfile {
            pattern: ShotPattern::Dual,
            damage: 20.0,
            speed: 12.0,
            width: 6.0,
            height: 12.0,
        },
        _ => ShotProfile {
            pattern: ShotPattern::Laser,
            damage: 40.0,
            speed: 15.0,
            width: 6.0,
            height: 30.0,
        },
    }
}

/// Centre of the nearest shootable obstacle strictly above the player and
/// within `AUTO_TARGET_RANGE`.
pub fn find_target(state: &GameState) -> Option<(f32, f32)> {
    let (px, py) = state.player.center();
    state
        .obstacles
        .iter()
        .filter(|o| o.kind.is_shootable())
        .map(|o| o.center())
        .filter(|&(_, oy)| oy < py)
        .map(|(ox, oy)| ((ox - px).hypot(oy - py), (ox, oy)))
        .filter(|&(dist, _)| dist <= AUTO_TARGET_RANGE)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, at)| at)
}

pub fn auto_fire(state: &mut GameState) {
    fire_if_ready(state, None);
}

/// Fire one volley if the blaster is on and its interval has elapsed.
/// `aim` overrides auto-targeting; without a target the shot goes straight up.
pub fn fire_if_ready(state: &mut GameState, aim: Option<(f32, f32)>) -> bool {
    let p = &state.player;
    if !p.blaster_mode {
        return false;
    }
    let Some(interval) = fire_interval_ms(p.blaster_level) else {
        return false;
    };
    if state.game_time - p.last_shot_ms < interval {
        return false;
    }

    let (cx, _) = p.center();
    let muzzle = (cx, p.y);
    let target = aim
        .or_else(|| find_target(state))
        .unwrap_or((muzzle.0, muzzle.1 - 1.0));
    let profile = shot_profile(state.player.blaster_level);

    let (dx, dy) = (target.0 - muzzle.0, target.1 - muzzle.1);
    let dist = dx.hypot(dy);
    let (ux, uy) = if dist > 0.0 { (dx / dist, dy / dist) } else { (0.0, -1.0) };

    let offsets: &[f32] = match profile.pattern {
        ShotPattern::Dual => &[-10.0, 10.0],
        ShotPattern::Single | ShotPattern::Laser => &[0.0],
    };
    for &off in offsets {
        state.projectiles.push(Projectile {
            x: muzzle.0 + off - profile.width / 2.0,
            y: muzzle.1 - profile.height,
            vx: ux * profile.speed,
            vy: uy * profile.speed,
            width: profile.width,
            height: profile.height,
            pattern: profile.pattern,
            damage: profile.damage,
            life_ms: PROJECTILE_LIFE_MS,
        });
    }
    state.player.last_shot_ms = state.game_time;
    true
}
