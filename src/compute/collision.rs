/// Collision resolution.  Every pair is an axis-aligned bounding-box test.
///
/// Removal while traversing is mark-and-compact: hits are collected as
/// indices first and each collection is filtered once afterwards, so no
/// entity is ever skipped.

use rand::Rng;

use super::boss::{damage_boss, CONTACT_COOLDOWN_MS};
use super::effects::{create_burst, create_explosion};
use super::player::{apply_player_hit, collect_power_up};
use crate::entities::{Bounds, GameState, GameStatus, ObstacleKind, ParticleColor};
use crate::events::GameEvent;

/// Velocity nudge per tick applied to homing shots, per unit of direction.
pub const HOMING_SPEED: f32 = 0.15;
pub const HOMING_MAX_SPEED: f32 = 5.0;

pub fn is_colliding<A, B>(a: &A, b: &B) -> bool
where
    A: Bounds + ?Sized,
    B: Bounds + ?Sized,
{
    a.bounds().intersects(&b.bounds())
}

/// Score awarded per obstacle shot down.
pub fn score_for(kind: &ObstacleKind) -> u32 {
    match kind {
        ObstacleKind::Asteroid => 100,
        ObstacleKind::Insect => 150,
        ObstacleKind::SwarmInsect => 75,
        ObstacleKind::BossProjectile | ObstacleKind::BossHoming => 25,
        ObstacleKind::RageBeam { .. } => 0,
    }
}

/// Drop the elements at `indices` (any order, duplicates allowed).
pub fn remove_indices<T>(items: &mut Vec<T>, indices: &[usize]) {
    if indices.is_empty() {
        return;
    }
    let mut i = 0;
    items.retain(|_| {
        let keep = !indices.contains(&i);
        i += 1;
        keep
    });
}

/// Bend every homing shot toward the player's current position.
pub fn steer_homing(state: &mut GameState) {
    let (px, py) = state.player.center();
    for o in state
        .obstacles
        .iter_mut()
        .filter(|o| o.kind == ObstacleKind::BossHoming)
    {
        let (ox, oy) = o.center();
        let (dx, dy) = (px - ox, py - oy);
        let dist = dx.hypot(dy);
        if dist > 0.0 {
            o.vx += dx / dist * HOMING_SPEED;
            o.vy += dy / dist * HOMING_SPEED;
        }
        let speed = o.vx.hypot(o.vy);
        if speed > HOMING_MAX_SPEED {
            o.vx *= HOMING_MAX_SPEED / speed;
            o.vy *= HOMING_MAX_SPEED / speed;
        }
    }
}

/// Resolve one tick of collisions in a fixed order: player/obstacles,
/// player/power-ups, shots/obstacles, shots/boss, player/boss body.
pub fn resolve_collisions(state: &mut GameState, rng: &mut impl Rng) {
    player_vs_obstacles(state, rng);
    player_vs_power_ups(state, rng);
    projectiles_vs_obstacles(state, rng);
    projectiles_vs_boss(state);
    player_vs_boss(state);
}

// ── (a) player ↔ obstacles ───────────────────────────────────────────────────

fn player_vs_obstacles(state: &mut GameState, rng: &mut impl Rng) {
    let hits: Vec<usize> = state
        .obstacles
        .iter()
        .enumerate()
        .filter(|(_, o)| o.kind.is_armed() && is_colliding(&state.player, *o))
        .map(|(i, _)| i)
        .collect();

    for &i in &hits {
        let kind = state.obstacles[i].kind;
        let (ox, oy) = state.obstacles[i].center();
        if !state.player.has_shield {
            apply_player_hit(state);
        } else if kind.is_boss_attack() {
            let (px, py) = state.player.center();
            create_burst(state, px, py, ParticleColor::Cyan, 6, 2.0, rng);
            state.events.push(GameEvent::ShieldDeflect);
        }
        create_explosion(state, ox, oy, rng);
    }
    remove_indices(&mut state.obstacles, &hits);
}

// ── (b) player ↔ power-ups ───────────────────────────────────────────────────

fn player_vs_power_ups(state: &mut GameState, rng: &mut impl Rng) {
    if state.status != GameStatus::Playing {
        return;
    }
    let hits: Vec<usize> = state
        .power_ups
        .iter()
        .enumerate()
        .filter(|(_, p)| is_colliding(&state.player, *p))
        .map(|(i, _)| i)
        .collect();

    for &i in &hits {
        let kind = state.power_ups[i].kind;
        let (cx, cy) = state.power_ups[i].center();
        collect_power_up(state, kind);
        create_burst(state, cx, cy, ParticleColor::Gold, 6, 2.0, rng);
    }
    remove_indices(&mut state.power_ups, &hits);
}

// ── (c) projectiles ↔ obstacles ──────────────────────────────────────────────

fn projectiles_vs_obstacles(state: &mut GameState, rng: &mut impl Rng) {
    let mut killed: Vec<usize> = Vec::new();
    let mut used: Vec<usize> = Vec::new();

    for (pi, shot) in state.projectiles.iter().enumerate() {
        let target = state
            .obstacles
            .iter()
            .enumerate()
            .find(|(oi, o)| {
                o.kind.is_shootable() && !killed.contains(oi) && is_colliding(shot, *o)
            })
            .map(|(oi, _)| oi);
        if let Some(oi) = target {
            killed.push(oi);
            used.push(pi);
        }
    }

    for &oi in &killed {
        let (ox, oy) = state.obstacles[oi].center();
        state.score += score_for(&state.obstacles[oi].kind);
        state.enemies_defeated += 1;
        create_explosion(state, ox, oy, rng);
    }
    remove_indices(&mut state.obstacles, &killed);
    remove_indices(&mut state.projectiles, &used);
}

// ── (d) projectiles ↔ boss ───────────────────────────────────────────────────

fn projectiles_vs_boss(state: &mut GameState) {
    let Some(boss) = state.boss.as_ref() else {
        return;
    };
    let hits: Vec<(usize, f32)> = state
        .projectiles
        .iter()
        .enumerate()
        .filter(|(_, shot)| is_colliding(*shot, boss))
        .map(|(i, shot)| (i, shot.damage))
        .collect();

    for &(_, damage) in &hits {
        damage_boss(state, damage);
    }
    let used: Vec<usize> = hits.iter().map(|&(i, _)| i).collect();
    remove_indices(&mut state.projectiles, &used);
}

// ── (e) player ↔ boss body ───────────────────────────────────────────────────

fn player_vs_boss(state: &mut GameState) {
    // A boss shot down earlier this tick is already beaten and cannot hurt.
    let touching = match &state.boss {
        Some(boss) => {
            boss.health > 0.0
                && boss.contact_cooldown_ms <= 0.0
                && is_colliding(&state.player, boss)
        }
        None => false,
    };
    if !touching {
        return;
    }
    if !state.player.has_shield {
        apply_player_hit(state);
    }
    if let Some(boss) = state.boss.as_mut() {
        boss.contact_cooldown_ms = CONTACT_COOLDOWN_MS;
    }
}
