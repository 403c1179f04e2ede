/// Per-level difficulty table.
///
/// Levels 1–14 are timed survival; level 15 is the boss encounter with a
/// time cap instead of a survival timer.

pub const MAX_LEVEL: u32 = 15;

/// Survival time for the regular levels.
pub const LEVEL_DURATION_MS: f32 = 45_000.0;

/// Hard cap on the boss fight.
pub const BOSS_LEVEL_CAP_MS: f32 = 180_000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    StarryNight,
    CosmicAurora,
    NebulaClouds,
    CrystalVoid,
    PlasmaStorm,
    QuantumRealm,
    SolarFlare,
    GalacticCore,
    VoidDarkness,
    BossArena,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossConfig {
    pub name: &'static str,
    pub health: f32,
    pub phases: u8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelConfig {
    pub level: u32,
    pub name: &'static str,
    pub theme: Theme,
    /// Units per tick an obstacle falls.
    pub game_speed: f32,
    /// Per-tick probability of spawning an obstacle.
    pub obstacle_spawn_rate: f64,
    /// Per-tick probability of spawning a power-up.
    pub power_up_spawn_rate: f64,
    pub duration_ms: f32,
    pub boss: Option<BossConfig>,
}

const fn survival(
    level: u32,
    name: &'static str,
    theme: Theme,
    game_speed: f32,
    obstacle_spawn_rate: f64,
    power_up_spawn_rate: f64,
) -> LevelConfig {
    LevelConfig {
        level,
        name,
        theme,
        game_speed,
        obstacle_spawn_rate,
        power_up_spawn_rate,
        duration_ms: LEVEL_DURATION_MS,
        boss: None,
    }
}

static LEVELS: [LevelConfig; MAX_LEVEL as usize] = [
    survival(1, "Starry Genesis", Theme::StarryNight, 2.0, 0.02, 0.005),
    survival(2, "Cosmic Drift", Theme::StarryNight, 2.5, 0.025, 0.006),
    survival(3, "Aurora Fields", Theme::CosmicAurora, 3.0, 0.03, 0.007),
    survival(4, "Magnetic Storms", Theme::CosmicAurora, 3.5, 0.035, 0.008),
    survival(5, "Colorful Nebula", Theme::NebulaClouds, 4.0, 0.04, 0.009),
    survival(6, "Crystal Formations", Theme::CrystalVoid, 4.5, 0.045, 0.01),
    survival(7, "Plasma Turbulence", Theme::PlasmaStorm, 5.0, 0.05, 0.011),
    survival(8, "Quantum Fluctuations", Theme::QuantumRealm, 5.5, 0.055, 0.012),
    survival(9, "Solar Eruption", Theme::SolarFlare, 6.0, 0.06, 0.013),
    survival(10, "Galactic Heart", Theme::GalacticCore, 6.5, 0.065, 0.014),
    survival(11, "Event Horizon", Theme::VoidDarkness, 7.0, 0.07, 0.015),
    survival(12, "Dark Matter Storm", Theme::VoidDarkness, 7.5, 0.075, 0.016),
    survival(13, "Singularity Approach", Theme::VoidDarkness, 8.0, 0.08, 0.017),
    survival(14, "Pre-Boss Gauntlet", Theme::VoidDarkness, 8.5, 0.085, 0.018),
    LevelConfig {
        level: 15,
        name: "Mother Insect's Lair",
        theme: Theme::BossArena,
        game_speed: 4.0,
        obstacle_spawn_rate: 0.03,
        power_up_spawn_rate: 0.02,
        duration_ms: BOSS_LEVEL_CAP_MS,
        boss: Some(BossConfig {
            name: "Mother Insect",
            health: 500.0,
            phases: 3,
        }),
    },
];

/// Look up a level; anything outside 1..=15 falls back to level 1.
pub fn level_config(level: u32) -> &'static LevelConfig {
    LEVELS
        .iter()
        .find(|c| c.level == level)
        .unwrap_or(&LEVELS[0])
}

pub fn is_boss_level(level: u32) -> bool {
    level == MAX_LEVEL
}

pub fn all_levels() -> &'static [LevelConfig] {
    &LEVELS
}
