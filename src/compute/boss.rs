/// Boss controller for the final level: patrol, phase selection and the
/// attack pattern of each phase.
///
/// | phase | health      | shot (cadence)        | special (cadence)        |
/// |-------|-------------|-----------------------|--------------------------|
/// | 1     | above 67 %  | aimed shot, 1000 ms   | —                        |
/// | 2     | above 34 %  | 3-way spread, 700 ms  | 5-insect swarm, 3000 ms  |
/// | 3     | the rest    | homing shot, 500 ms   | rage beam, 2000 ms       |

use rand::Rng;
use tracing::{debug, info};

use super::effects::create_burst;
use crate::entities::{Boss, Bounds, GameState, Obstacle, ObstacleKind, ParticleColor, Tentacle};
use crate::events::GameEvent;
use crate::levels::BossConfig;

pub const BOSS_SIZE: f32 = 120.0;
pub const BOSS_Y: f32 = 60.0;
pub const BOSS_SPEED: f32 = 2.0;
pub const TENTACLE_COUNT: usize = 8;

pub const HIT_FLASH_MS: f32 = 100.0;
pub const CONTACT_COOLDOWN_MS: f32 = 1_000.0;

pub const PHASE1_SHOT_MS: f32 = 1_000.0;
pub const PHASE2_SHOT_MS: f32 = 700.0;
pub const PHASE2_SWARM_MS: f32 = 3_000.0;
pub const PHASE3_SHOT_MS: f32 = 500.0;
pub const PHASE3_BEAM_MS: f32 = 2_000.0;

pub const BEAM_WARNING_MS: f32 = 1_000.0;
pub const BEAM_ACTIVE_MS: f32 = 800.0;
pub const BEAM_WIDTH: f32 = 40.0;
pub const SWARM_SIZE: usize = 5;
/// A homing shot that misses keeps circling the player; it burns out after this.
pub const HOMING_LIFE_MS: f32 = 6_000.0;

const SHOT_SIZE: f32 = 15.0;
const HOMING_SIZE: f32 = 18.0;
const SWARM_INSECT_SIZE: f32 = 20.0;
/// How strongly the aimed shot leans toward the player.
const AIM_BIAS: f32 = 0.005;

/// Phase from remaining health.  Compared in integer percent so that a
/// ratio sitting exactly on a boundary falls into the harder phase.
pub fn boss_phase(health: f32, max_health: f32) -> u8 {
    let pct = health * 100.0;
    if pct > max_health * 67.0 {
        1
    } else if pct > max_health * 34.0 {
        2
    } else {
        3
    }
}

pub fn new_boss(field_width: f32, cfg: &BossConfig) -> Boss {
    let tentacles = (0..TENTACLE_COUNT)
        .map(|i| Tentacle {
            angle: i as f32 * std::f32::consts::TAU / TENTACLE_COUNT as f32,
            length: 50.0 + (i % 3) as f32 * 10.0,
            offset: 0.0,
        })
        .collect();
    Boss {
        x: field_width / 2.0 - BOSS_SIZE / 2.0,
        y: BOSS_Y,
        width: BOSS_SIZE,
        height: BOSS_SIZE,
        health: cfg.health,
        max_health: cfg.health,
        phase: 1,
        move_direction: 1.0,
        speed: BOSS_SPEED,
        shoot_timer: 0.0,
        special_timer: 0.0,
        tentacles,
        invulnerable_ms: 0.0,
        contact_cooldown_ms: 0.0,
    }
}

/// Cosmetic sway, driven by the frame counter so it keeps moving during the intro.
pub fn animate_tentacles(boss: &mut Boss, frame: u64) {
    let t = frame as f32 * 0.05;
    for (i, tentacle) in boss.tentacles.iter_mut().enumerate() {
        let dir = if i % 2 == 0 { 1.0 } else { -1.0 };
        tentacle.angle += 0.01 * dir;
        tentacle.offset = (t + i as f32).sin() * 8.0;
    }
}

pub fn update_boss(state: &mut GameState, dt: f32, rng: &mut impl Rng) {
    let Some(mut boss) = state.boss.take() else {
        return;
    };

    // ── Patrol ───────────────────────────────────────────────────────────────
    boss.x += boss.speed * boss.move_direction;
    if boss.x <= 0.0 {
        boss.x = 0.0;
        boss.move_direction = 1.0;
    } else if boss.x + boss.width >= state.width {
        boss.x = state.width - boss.width;
        boss.move_direction = -1.0;
    }
    animate_tentacles(&mut boss, state.frame);

    boss.invulnerable_ms = (boss.invulnerable_ms - dt).max(0.0);
    boss.contact_cooldown_ms = (boss.contact_cooldown_ms - dt).max(0.0);

    // ── Phase ────────────────────────────────────────────────────────────────
    let phase = boss_phase(boss.health, boss.max_health);
    if phase != boss.phase {
        debug!(from = boss.phase, to = phase, health = boss.health, "boss phase change");
        boss.phase = phase;
        boss.shoot_timer = 0.0;
        boss.special_timer = 0.0;
        state.events.push(GameEvent::BossPhaseChanged(phase));
    }

    // ── Attacks ──────────────────────────────────────────────────────────────
    boss.shoot_timer += dt;
    boss.special_timer += dt;
    match boss.phase {
        1 => {
            if boss.shoot_timer >= PHASE1_SHOT_MS {
                boss.shoot_timer = 0.0;
                fire_aimed(state, &boss);
            }
        }
        2 => {
            if boss.shoot_timer >= PHASE2_SHOT_MS {
                boss.shoot_timer = 0.0;
                fire_spread(state, &boss);
            }
            if boss.special_timer >= PHASE2_SWARM_MS {
                boss.special_timer = 0.0;
                release_swarm(state, &boss, rng);
            }
        }
        _ => {
            if boss.shoot_timer >= PHASE3_SHOT_MS {
                boss.shoot_timer = 0.0;
                fire_homing(state, &boss);
            }
            if boss.special_timer >= PHASE3_BEAM_MS {
                boss.special_timer = 0.0;
                warn_rage_beam(state);
            }
        }
    }

    state.boss = Some(boss);
}

fn boss_shot(boss: &Boss, size: f32, vx: f32, vy: f32, kind: ObstacleKind) -> Obstacle {
    let (cx, _) = boss.center();
    let life_ms = match kind {
        ObstacleKind::BossHoming => Some(HOMING_LIFE_MS),
        _ => None,
    };
    Obstacle {
        x: cx - size / 2.0,
        y: boss.y + boss.height,
        width: size,
        height: size,
        rotation: 0.0,
        rotation_speed: 0.3,
        vx,
        vy,
        kind,
        life_ms,
    }
}

fn aim_bias(state: &GameState, boss: &Boss) -> f32 {
    (state.player.center().0 - boss.center().0) * AIM_BIAS
}

fn fire_aimed(state: &mut GameState, boss: &Boss) {
    let vx = aim_bias(state, boss);
    state
        .obstacles
        .push(boss_shot(boss, SHOT_SIZE, vx, 3.0, ObstacleKind::BossProjectile));
}

fn fire_spread(state: &mut GameState, boss: &Boss) {
    let bias = aim_bias(state, boss);
    for spread in [-2.0, 0.0, 2.0] {
        state.obstacles.push(boss_shot(
            boss,
            SHOT_SIZE,
            bias + spread,
            3.5,
            ObstacleKind::BossProjectile,
        ));
    }
}

fn fire_homing(state: &mut GameState, boss: &Boss) {
    state
        .obstacles
        .push(boss_shot(boss, HOMING_SIZE, 0.0, 2.0, ObstacleKind::BossHoming));
}

fn release_swarm(state: &mut GameState, boss: &Boss, rng: &mut impl Rng) {
    debug!("boss releases swarm");
    let step = boss.width / SWARM_SIZE as f32;
    for i in 0..SWARM_SIZE {
        state.obstacles.push(Obstacle {
            x: boss.x + step * i as f32,
            y: boss.y + boss.height,
            width: SWARM_INSECT_SIZE,
            height: SWARM_INSECT_SIZE,
            rotation: 0.0,
            rotation_speed: rng.gen_range(-0.2..0.2),
            vx: rng.gen_range(-1.5..1.5),
            vy: rng.gen_range(2.0..3.0),
            kind: ObstacleKind::SwarmInsect,
            life_ms: None,
        });
    }
}

/// Telegraph a beam at the player's column; it turns dangerous once the
/// warning runs out.
fn warn_rage_beam(state: &mut GameState) {
    let (px, _) = state.player.center();
    let x = (px - BEAM_WIDTH / 2.0).clamp(0.0, (state.width - BEAM_WIDTH).max(0.0));
    debug!(x, "boss rage beam warning");
    state.obstacles.push(Obstacle {
        x,
        y: 0.0,
        width: BEAM_WIDTH,
        height: state.height,
        rotation: 0.0,
        rotation_speed: 0.0,
        vx: 0.0,
        vy: 0.0,
        kind: ObstacleKind::RageBeam {
            warning_ms: BEAM_WARNING_MS,
            active_ms: BEAM_ACTIVE_MS,
        },
        life_ms: None,
    });
}

/// Apply projectile damage and start the hit flash.
pub fn damage_boss(state: &mut GameState, damage: f32) {
    if let Some(boss) = state.boss.as_mut() {
        boss.health = (boss.health - damage).max(0.0);
        boss.invulnerable_ms = HIT_FLASH_MS;
    }
}

/// Blow the boss up and count the win.  Level completion is the caller's job.
pub fn defeat_boss(state: &mut GameState, rng: &mut impl Rng) {
    let Some(boss) = state.boss.take() else {
        return;
    };
    let (cx, cy) = boss.center();
    create_burst(state, cx, cy, ParticleColor::BossBlast, 40, 6.0, rng);
    state.boss_defeats += 1;
    state.events.push(GameEvent::BossDefeated);
    info!(game_time_ms = state.game_time, "boss defeated");
}
