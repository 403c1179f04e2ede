/// Flutterer catalog: the selectable butterflies and the stats they bring.

use crate::storage::ProgressStats;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Ability bound to the special key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Special {
    TrailSparkles,
    SolarBoost,
    FreezeEnemies,
    PlasmaBurst,
    PhaseThrough,
    ShootProjectiles,
    EnergyBarrier,
    OneHitShield,
    SpeedMaster,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnlockCondition {
    Starter,
    Score(u32),
    Level(u32),
    EnemiesDefeated(u32),
    SurvivalSeconds(u64),
    BossDefeats(u32),
    /// Only obtainable through the store, which this game does not ship.
    PurchaseOnly,
}

impl UnlockCondition {
    pub fn is_met(&self, stats: &ProgressStats) -> bool {
        match *self {
            UnlockCondition::Starter => true,
            UnlockCondition::Score(n) => stats.high_score >= n,
            UnlockCondition::Level(n) => stats.max_level >= n,
            UnlockCondition::EnemiesDefeated(n) => stats.enemies_defeated >= n,
            UnlockCondition::SurvivalSeconds(n) => stats.total_survival_secs >= n,
            UnlockCondition::BossDefeats(n) => stats.boss_defeats >= n,
            UnlockCondition::PurchaseOnly => false,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Flutterer {
    pub id: &'static str,
    pub name: &'static str,
    pub rarity: Rarity,
    /// Multiplier on the base player speed.
    pub speed: f32,
    /// Max health at level start.
    pub health: f32,
    pub special: Option<Special>,
    pub unlock: UnlockCondition,
}

pub const STARTER_ID: &str = "basic_cosmic";

static FLUTTERERS: [Flutterer; 10] = [
    Flutterer {
        id: STARTER_ID,
        name: "Basic Cosmic Flutter",
        rarity: Rarity::Common,
        speed: 1.0,
        health: 100.0,
        special: None,
        unlock: UnlockCondition::Starter,
    },
    Flutterer {
        id: "stardust_dancer",
        name: "Stardust Dancer",
        rarity: Rarity::Common,
        speed: 1.1,
        health: 100.0,
        special: Some(Special::TrailSparkles),
        unlock: UnlockCondition::Score(5_000),
    },
    Flutterer {
        id: "solar_glider",
        name: "Solar Glider",
        rarity: Rarity::Common,
        speed: 0.9,
        health: 120.0,
        special: Some(Special::SolarBoost),
        unlock: UnlockCondition::Level(5),
    },
    Flutterer {
        id: "frost_wing",
        name: "Frost Wing",
        rarity: Rarity::Rare,
        speed: 1.2,
        health: 110.0,
        special: Some(Special::FreezeEnemies),
        unlock: UnlockCondition::EnemiesDefeated(100),
    },
    Flutterer {
        id: "plasma_striker",
        name: "Plasma Striker",
        rarity: Rarity::Rare,
        speed: 1.0,
        health: 100.0,
        special: Some(Special::PlasmaBurst),
        unlock: UnlockCondition::SurvivalSeconds(300),
    },
    Flutterer {
        id: "void_phantom",
        name: "Void Phantom",
        rarity: Rarity::Rare,
        speed: 1.3,
        health: 90.0,
        special: Some(Special::PhaseThrough),
        unlock: UnlockCondition::Score(25_000),
    },
    Flutterer {
        id: "epic_blaster_wing",
        name: "Epic Blaster Wing",
        rarity: Rarity::Epic,
        speed: 1.1,
        health: 120.0,
        special: Some(Special::ShootProjectiles),
        unlock: UnlockCondition::Level(10),
    },
    Flutterer {
        id: "cosmic_guardian",
        name: "Cosmic Guardian",
        rarity: Rarity::Epic,
        speed: 0.9,
        health: 150.0,
        special: Some(Special::EnergyBarrier),
        unlock: UnlockCondition::BossDefeats(3),
    },
    Flutterer {
        id: "legendary_nebula_guardian",
        name: "Legendary Nebula Guardian",
        rarity: Rarity::Legendary,
        speed: 1.2,
        health: 100.0,
        special: Some(Special::OneHitShield),
        unlock: UnlockCondition::Level(15),
    },
    Flutterer {
        id: "speedy_cosmic_flutter",
        name: "Speedy Cosmic Flutter",
        rarity: Rarity::Legendary,
        speed: 1.8,
        health: 80.0,
        special: Some(Special::SpeedMaster),
        unlock: UnlockCondition::PurchaseOnly,
    },
];

pub fn all_flutterers() -> &'static [Flutterer] {
    &FLUTTERERS
}

pub fn starter() -> &'static Flutterer {
    &FLUTTERERS[0]
}

pub fn flutterer_by_id(id: &str) -> Option<&'static Flutterer> {
    FLUTTERERS.iter().find(|f| f.id == id)
}

pub fn flutterers_by_rarity(rarity: Rarity) -> impl Iterator<Item = &'static Flutterer> {
    FLUTTERERS.iter().filter(move |f| f.rarity == rarity)
}

/// Flutterers whose unlock condition the given progress satisfies.
pub fn unlocked_flutterers(stats: &ProgressStats) -> Vec<&'static Flutterer> {
    FLUTTERERS.iter().filter(|f| f.unlock.is_met(stats)).collect()
}
