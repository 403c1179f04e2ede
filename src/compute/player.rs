/// Player controller: easing toward the pointer, power-up timers, damage,
/// pickups and the flutterer special.

use rand::Rng;
use tracing::info;

use super::collision::{remove_indices, score_for};
use super::effects::{create_burst, create_explosion};
use crate::entities::{Bounds, GameState, GameStatus, ParticleColor, Player, PowerUpKind};
use crate::events::GameEvent;
use crate::flutterers::{Flutterer, Special};

pub const PLAYER_SIZE: f32 = 40.0;
pub const BASE_PLAYER_SPEED: f32 = 8.0;
/// Fraction of the remaining distance covered per tick at base speed.
pub const EASE: f32 = 0.15;

pub const HIT_DAMAGE: f32 = 25.0;
pub const HEALTH_PICKUP: f32 = 25.0;
pub const PICKUP_SCORE: u32 = 50;

pub const SPEED_BOOST_MS: f32 = 5_000.0;
pub const SPEED_BOOST_FACTOR: f32 = 1.5;
pub const SHIELD_MS: f32 = 8_000.0;
pub const BLASTER_MS: f32 = 10_000.0;
pub const MAX_BLASTER_LEVEL: u8 = 3;

pub const SPECIAL_COOLDOWN_MS: f32 = 15_000.0;
pub const SPECIAL_EFFECT_MS: f32 = 3_000.0;
pub const SPECIAL_BLASTER_MS: f32 = 5_000.0;
pub const SPECIAL_RADIUS: f32 = 150.0;

/// Fresh player, centred horizontally, 100 units above the bottom edge.
pub fn new_player(width: f32, height: f32, flutterer: &Flutterer) -> Player {
    let x = width / 2.0 - PLAYER_SIZE / 2.0;
    let y = height - 100.0 - PLAYER_SIZE / 2.0;
    let speed = BASE_PLAYER_SPEED * flutterer.speed;
    Player {
        x,
        y,
        target_x: x,
        target_y: y,
        width: PLAYER_SIZE,
        height: PLAYER_SIZE,
        base_speed: speed,
        speed,
        health: flutterer.health,
        max_health: flutterer.health,
        has_shield: false,
        shield_time: 0.0,
        blaster_mode: false,
        blaster_time: 0.0,
        blaster_level: 0,
        speed_boost: false,
        speed_boost_time: 0.0,
        last_shot_ms: f32::NEG_INFINITY,
        special_cooldown: 0.0,
    }
}

pub fn update_player(state: &mut GameState, dt: f32) {
    let (max_x, max_y) = (state.width, state.height);
    let p = &mut state.player;

    let ease = (EASE * p.speed / BASE_PLAYER_SPEED).min(1.0);
    p.x += (p.target_x - p.x) * ease;
    p.y += (p.target_y - p.y) * ease;
    p.x = p.x.clamp(0.0, (max_x - p.width).max(0.0));
    p.y = p.y.clamp(0.0, (max_y - p.height).max(0.0));

    if p.shield_time > 0.0 {
        p.shield_time -= dt;
        if p.shield_time <= 0.0 {
            p.shield_time = 0.0;
            p.has_shield = false;
        }
    }

    // The blaster level only drops back to 0 when the timer runs out.
    if p.blaster_time > 0.0 {
        p.blaster_time -= dt;
        if p.blaster_time <= 0.0 {
            p.blaster_time = 0.0;
            p.blaster_mode = false;
            p.blaster_level = 0;
        }
    }

    if p.speed_boost_time > 0.0 {
        p.speed_boost_time -= dt;
        if p.speed_boost_time <= 0.0 {
            p.speed_boost_time = 0.0;
            p.speed_boost = false;
            p.speed = p.base_speed;
        }
    }

    p.special_cooldown = (p.special_cooldown - dt).max(0.0);
}

/// An unshielded hit: health first, then lives.
pub fn apply_player_hit(state: &mut GameState) {
    if state.status != GameStatus::Playing {
        return;
    }
    state.events.push(GameEvent::PlayerHit);

    state.player.health -= HIT_DAMAGE;
    if state.player.health > 0.0 {
        return;
    }

    state.player.health = 0.0;
    state.lives = state.lives.saturating_sub(1);
    state.events.push(GameEvent::LifeLost);

    if state.lives > 0 {
        state.player.health = state.player.max_health;
    } else {
        state.status = GameStatus::GameOver;
        state.events.push(GameEvent::GameOver);
        info!(level = state.level, score = state.score, "game over");
    }
}

pub fn collect_power_up(state: &mut GameState, kind: PowerUpKind) {
    let p = &mut state.player;
    match kind {
        PowerUpKind::Speed => {
            p.speed_boost = true;
            p.speed_boost_time = SPEED_BOOST_MS;
            p.speed = p.base_speed * SPEED_BOOST_FACTOR;
        }
        PowerUpKind::Shield => {
            p.has_shield = true;
            p.shield_time = SHIELD_MS;
        }
        PowerUpKind::Blaster => {
            p.blaster_mode = true;
            p.blaster_time = BLASTER_MS;
            p.blaster_level = (p.blaster_level + 1).min(MAX_BLASTER_LEVEL);
        }
        PowerUpKind::Health => {
            p.health = (p.health + HEALTH_PICKUP).min(p.max_health);
        }
    }
    state.score += PICKUP_SCORE;
    state.events.push(GameEvent::PowerUpCollected(kind));
}

pub fn trigger_special(state: &mut GameState, rng: &mut impl Rng) {
    if state.status != GameStatus::Playing || state.player.special_cooldown > 0.0 {
        return;
    }
    let Some(special) = state.flutterer.special else {
        return;
    };

    let p = &mut state.player;
    match special {
        Special::SolarBoost | Special::SpeedMaster => {
            p.speed_boost = true;
            p.speed_boost_time = p.speed_boost_time.max(SPECIAL_EFFECT_MS);
            p.speed = p.base_speed * SPEED_BOOST_FACTOR;
        }
        Special::EnergyBarrier | Special::OneHitShield | Special::PhaseThrough => {
            p.has_shield = true;
            p.shield_time = p.shield_time.max(SPECIAL_EFFECT_MS);
        }
        Special::ShootProjectiles => {
            p.blaster_mode = true;
            p.blaster_time = p.blaster_time.max(SPECIAL_BLASTER_MS);
            p.blaster_level = p.blaster_level.max(1);
        }
        Special::PlasmaBurst | Special::FreezeEnemies => clear_nearby_obstacles(state, rng),
        Special::TrailSparkles => {
            let (cx, cy) = state.player.center();
            create_burst(state, cx, cy, ParticleColor::Sparkle, 12, 2.0, rng);
        }
    }
    state.player.special_cooldown = SPECIAL_COOLDOWN_MS;
}

fn clear_nearby_obstacles(state: &mut GameState, rng: &mut impl Rng) {
    let (px, py) = state.player.center();
    let hit: Vec<usize> = state
        .obstacles
        .iter()
        .enumerate()
        .filter(|(_, o)| {
            let (ox, oy) = o.center();
            o.kind.is_shootable() && (ox - px).hypot(oy - py) <= SPECIAL_RADIUS
        })
        .map(|(i, _)| i)
        .collect();

    for &i in &hit {
        let (ox, oy) = state.obstacles[i].center();
        let points = score_for(&state.obstacles[i].kind);
        state.score += points;
        state.enemies_defeated += 1;
        create_explosion(state, ox, oy, rng);
    }
    remove_indices(&mut state.obstacles, &hit);
}
