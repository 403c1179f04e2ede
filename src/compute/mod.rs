/// Simulation entry points.
///
/// Input handlers and `tick` read a `GameState` and hand back the next one;
/// randomness only enters through the RNG argument.  The submodules hold the
/// individual steps, each working on a `&mut GameState` scratch copy, and
/// `tick` runs them in a fixed order.

pub mod boss;
pub mod collision;
pub mod effects;
pub mod motion;
pub mod player;
pub mod progression;
pub mod spawn;
pub mod weapon;

use rand::Rng;

use crate::entities::{GameState, GameStatus};
use crate::flutterers::Flutterer;
use crate::levels::{level_config, MAX_LEVEL};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the state shown on the menu, before any run has started.
/// A run always gets at least one life.
pub fn init_state(
    width: f32,
    height: f32,
    flutterer: &'static Flutterer,
    starting_lives: u32,
    high_score: u32,
) -> GameState {
    let starting_lives = starting_lives.max(1);
    GameState {
        player: player::new_player(width, height, flutterer),
        obstacles: Vec::new(),
        power_ups: Vec::new(),
        projectiles: Vec::new(),
        particles: Vec::new(),
        boss: None,
        status: GameStatus::Menu,
        level: 1,
        score: 0,
        lives: starting_lives,
        starting_lives,
        game_time: 0.0,
        level_time: 0.0,
        level_duration: level_config(1).duration_ms,
        high_score,
        enemies_defeated: 0,
        boss_defeats: 0,
        flutterer,
        transition_ms: 0.0,
        boss_intro_ms: None,
        events: Vec::new(),
        frame: 0,
        width,
        height,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Begin a fresh run at level 1.
pub fn start_game(state: &GameState) -> GameState {
    start_at_level(state, 1)
}

/// Begin a fresh run at `level` (clamped to 1..=15).
pub fn start_at_level(state: &GameState, level: u32) -> GameState {
    let mut next = state.clone();
    next.events.clear();
    next.level = level.clamp(1, MAX_LEVEL);
    next.score = 0;
    next.starting_lives = next.starting_lives.max(1);
    next.lives = next.starting_lives;
    next.game_time = 0.0;
    next.enemies_defeated = 0;
    next.boss_defeats = 0;
    next.status = GameStatus::Playing;
    progression::initialize_level(&mut next);
    next
}

/// Restart after the run ended; any other state is returned unchanged.
pub fn restart(state: &GameState) -> GameState {
    match state.status {
        GameStatus::GameOver | GameStatus::GameComplete | GameStatus::Menu => start_game(state),
        _ => state.clone(),
    }
}

pub fn toggle_pause(state: &GameState) -> GameState {
    let status = match state.status {
        GameStatus::Playing => GameStatus::Paused,
        GameStatus::Paused => GameStatus::Playing,
        other => other,
    };
    GameState {
        status,
        ..state.clone()
    }
}

/// Point the player at a pointer position (the box centre follows it).
pub fn set_target(state: &GameState, x: f32, y: f32) -> GameState {
    let mut next = state.clone();
    next.player.target_x = x - next.player.width / 2.0;
    next.player.target_y = y - next.player.height / 2.0;
    next
}

/// "Shoot here": fire one blaster volley at a point if the blaster is ready.
pub fn shoot_at(state: &GameState, x: f32, y: f32) -> GameState {
    let mut next = state.clone();
    if next.status == GameStatus::Playing {
        weapon::fire_if_ready(&mut next, Some((x, y)));
    }
    next
}

/// Use the flutterer's special ability if it is off cooldown.
pub fn trigger_special(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    next.events.clear();
    player::trigger_special(&mut next, rng);
    next
}

// ── Per-frame tick (RNG injected) ────────────────────────────────────────────

/// Advance the simulation by `dt` milliseconds.  All randomness comes through
/// `rng` so callers control determinism (tests use a seeded RNG).
pub fn tick(state: &GameState, dt: f32, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    next.events.clear();
    next.frame += 1;

    match next.status {
        GameStatus::Playing => step_playing(&mut next, dt, rng),
        GameStatus::BossIntro => progression::advance_boss_intro(&mut next, dt),
        GameStatus::LevelComplete => {
            effects::update_particles(&mut next, dt);
            progression::advance_transition(&mut next, dt);
        }
        GameStatus::Menu | GameStatus::Paused | GameStatus::GameOver | GameStatus::GameComplete => {}
    }

    next.high_score = next.high_score.max(next.score);
    next
}

fn step_playing(state: &mut GameState, dt: f32, rng: &mut impl Rng) {
    if progression::enter_boss_intro(state) {
        return;
    }

    state.game_time += dt;
    state.level_time += dt;

    // ── 1. Player movement, power-up timers, weapon ──────────────────────────
    player::update_player(state, dt);
    weapon::auto_fire(state);

    // ── 2. Move everything else ──────────────────────────────────────────────
    motion::advance_entities(state, dt);
    effects::update_particles(state, dt);
    boss::update_boss(state, dt, rng);

    // ── 3. Spawn ─────────────────────────────────────────────────────────────
    spawn::spawn_objects(state, rng);

    // ── 4. Collisions ────────────────────────────────────────────────────────
    collision::steer_homing(state);
    collision::resolve_collisions(state, rng);

    // ── 5. Level end ─────────────────────────────────────────────────────────
    if state.status == GameStatus::Playing {
        progression::check_level_completion(state, rng);
    }
}
