/// Level lifecycle: setting a level up, deciding when it ends, and the timed
/// sub-states between levels (`LevelComplete`) and before the boss (`BossIntro`).
///
/// Both delays are deadlines stored on the state and counted down by `tick`,
/// never wall-clock timers.

use rand::Rng;
use tracing::info;

use super::boss::{animate_tentacles, defeat_boss, new_boss};
use super::effects::update_particles;
use super::player::new_player;
use crate::entities::{GameState, GameStatus};
use crate::events::GameEvent;
use crate::levels::{is_boss_level, level_config, MAX_LEVEL};

pub const LEVEL_TRANSITION_MS: f32 = 2_000.0;
pub const BOSS_INTRO_MS: f32 = 3_000.0;
/// Completion bonus per level number.
pub const LEVEL_BONUS: u32 = 1_000;

/// Reset the field for `state.level`: fresh player, empty collections and,
/// on the final level, the boss plus a pending intro.
pub fn initialize_level(state: &mut GameState) {
    let cfg = level_config(state.level);

    state.obstacles.clear();
    state.power_ups.clear();
    state.projectiles.clear();
    state.particles.clear();
    state.level_time = 0.0;
    state.level_duration = cfg.duration_ms;
    state.transition_ms = 0.0;
    state.player = new_player(state.width, state.height, state.flutterer);

    match (is_boss_level(state.level), cfg.boss.as_ref()) {
        (true, Some(boss_cfg)) => {
            state.boss = Some(new_boss(state.width, boss_cfg));
            state.boss_intro_ms = Some(BOSS_INTRO_MS);
        }
        _ => {
            state.boss = None;
            state.boss_intro_ms = None;
        }
    }

    state.events.push(GameEvent::LevelStarted(state.level));
    info!(level = state.level, name = cfg.name, "level started");
}

/// Switch a freshly started boss level into its intro.  Returns `true` if it did.
pub fn enter_boss_intro(state: &mut GameState) -> bool {
    if state.status != GameStatus::Playing || state.boss_intro_ms.is_none() {
        return false;
    }
    state.status = GameStatus::BossIntro;
    state.events.push(GameEvent::BossIntro);
    true
}

/// Count the intro down; the background keeps animating meanwhile.
pub fn advance_boss_intro(state: &mut GameState, dt: f32) {
    update_particles(state, dt);
    let frame = state.frame;
    if let Some(boss) = state.boss.as_mut() {
        animate_tentacles(boss, frame);
    }

    let remaining = state.boss_intro_ms.unwrap_or(0.0) - dt;
    if remaining > 0.0 {
        state.boss_intro_ms = Some(remaining);
    } else {
        state.boss_intro_ms = None;
        state.status = GameStatus::Playing;
    }
}

pub fn check_level_completion(state: &mut GameState, rng: &mut impl Rng) {
    if is_boss_level(state.level) {
        let boss_down = state.boss.as_ref().map_or(false, |b| b.health <= 0.0);
        if boss_down {
            defeat_boss(state, rng);
            complete_level(state);
        } else if state.level_time >= state.level_duration {
            state.status = GameStatus::GameOver;
            state.events.push(GameEvent::GameOver);
            info!(score = state.score, "boss fight timed out");
        }
    } else if state.level_time >= state.level_duration {
        complete_level(state);
    }
}

pub fn complete_level(state: &mut GameState) {
    state.score += LEVEL_BONUS * state.level;
    state.events.push(GameEvent::LevelCompleted(state.level));
    info!(level = state.level, score = state.score, "level complete");

    if state.level >= MAX_LEVEL {
        state.status = GameStatus::GameComplete;
        state.events.push(GameEvent::GameComplete);
    } else {
        state.level += 1;
        state.status = GameStatus::LevelComplete;
        state.transition_ms = LEVEL_TRANSITION_MS;
    }
}

/// Count the between-levels delay down and start the next level when it runs out.
pub fn advance_transition(state: &mut GameState, dt: f32) {
    state.transition_ms -= dt;
    if state.transition_ms <= 0.0 {
        initialize_level(state);
        state.status = GameStatus::Playing;
    }
}
