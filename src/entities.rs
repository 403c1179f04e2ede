/// Entity and state types.  Plain data; the only behaviour is bounding boxes.

use crate::events::GameEvent;
use crate::flutterers::Flutterer;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box.  `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    /// Strict overlap on both axes; touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Anything that occupies a box on the field.
pub trait Bounds {
    fn bounds(&self) -> Rect;

    fn center(&self) -> (f32, f32) {
        self.bounds().center()
    }
}

impl Bounds for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

// ── State machine ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Menu,
    Playing,
    Paused,
    /// Timed, non-interactive lead-in before the boss starts attacking.
    BossIntro,
    GameOver,
    /// Between levels; the next level starts when the transition deadline runs out.
    LevelComplete,
    GameComplete,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// Pointer position the player eases toward.
    pub target_x: f32,
    pub target_y: f32,
    pub width: f32,
    pub height: f32,
    pub base_speed: f32,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub has_shield: bool,
    /// Remaining milliseconds.
    pub shield_time: f32,
    pub blaster_mode: bool,
    pub blaster_time: f32,
    /// 0 when the blaster is off, otherwise 1..=3.
    pub blaster_level: u8,
    pub speed_boost: bool,
    pub speed_boost_time: f32,
    /// `GameState::game_time` of the last shot fired.
    pub last_shot_ms: f32,
    /// Milliseconds until the flutterer special can be used again.
    pub special_cooldown: f32,
}

impl Bounds for Player {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObstacleKind {
    Asteroid,
    Insect,
    /// Aimed shot from the boss.
    BossProjectile,
    /// Boss shot that steers toward the player every tick.
    BossHoming,
    /// Fast minion released in a boss swarm.
    SwarmInsect,
    /// Full-height hazard.  Harmless while `warning_ms > 0`, then damaging
    /// for `active_ms`.
    RageBeam { warning_ms: f32, active_ms: f32 },
}

impl ObstacleKind {
    /// Boss attacks that a shield deflects with a cyan burst.
    pub fn is_boss_attack(&self) -> bool {
        matches!(
            self,
            ObstacleKind::BossProjectile | ObstacleKind::BossHoming | ObstacleKind::RageBeam { .. }
        )
    }

    /// A rage beam in its warning window cannot hurt anyone.
    pub fn is_armed(&self) -> bool {
        match self {
            ObstacleKind::RageBeam { warning_ms, .. } => *warning_ms <= 0.0,
            _ => true,
        }
    }

    /// Player projectiles pass through rage beams.
    pub fn is_shootable(&self) -> bool {
        !matches!(self, ObstacleKind::RageBeam { .. })
    }
}

#[derive(Clone, Debug)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Velocity for free-moving kinds; asteroids and insects fall at game speed.
    pub vx: f32,
    pub vy: f32,
    pub kind: ObstacleKind,
    /// Remaining milliseconds for shots that could otherwise linger forever.
    pub life_ms: Option<f32>,
}

impl Bounds for Obstacle {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    Speed,
    Shield,
    Blaster,
    Health,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Speed,
        PowerUpKind::Shield,
        PowerUpKind::Blaster,
        PowerUpKind::Health,
    ];
}

#[derive(Clone, Debug)]
pub struct PowerUp {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    pub kind: PowerUpKind,
}

impl Bounds for PowerUp {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Blaster configuration a shot was fired in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotPattern {
    Single,
    Dual,
    Laser,
}

/// A player shot.  Boss fire travels as obstacles instead.
#[derive(Clone, Debug)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    pub pattern: ShotPattern,
    pub damage: f32,
    /// Remaining milliseconds.
    pub life_ms: f32,
}

impl Bounds for Projectile {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Boss ──────────────────────────────────────────────────────────────────────

/// Purely cosmetic.
#[derive(Clone, Debug)]
pub struct Tentacle {
    pub angle: f32,
    pub length: f32,
    pub offset: f32,
}

#[derive(Clone, Debug)]
pub struct Boss {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub health: f32,
    pub max_health: f32,
    /// 1..=3, derived from the health ratio.
    pub phase: u8,
    /// +1.0 moving right, -1.0 moving left.
    pub move_direction: f32,
    pub speed: f32,
    /// Milliseconds since the last regular shot.
    pub shoot_timer: f32,
    /// Milliseconds since the last swarm / rage beam.
    pub special_timer: f32,
    pub tentacles: Vec<Tentacle>,
    /// Hit flash window in milliseconds.
    pub invulnerable_ms: f32,
    /// Milliseconds until body contact can hurt the player again.
    pub contact_cooldown_ms: f32,
}

impl Boss {
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ms > 0.0
    }
}

impl Bounds for Boss {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Particles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleColor {
    /// Orange burst when something blows up.
    Explosion,
    /// Power-up pickup.
    Gold,
    /// Shield deflecting a boss attack.
    Cyan,
    BossBlast,
    Sparkle,
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: ParticleColor,
    pub life: f32,
    pub max_life: f32,
    pub alpha: f32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire simulation state.  Cloneable so update functions can
/// return a new copy without mutating the original; the renderer reads it
/// as a snapshot.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    /// Only ever present on the boss level.
    pub boss: Option<Boss>,
    pub status: GameStatus,
    pub level: u32,
    pub score: u32,
    pub lives: u32,
    pub starting_lives: u32,
    /// Milliseconds played in this run.
    pub game_time: f32,
    /// Milliseconds played in the current level.
    pub level_time: f32,
    pub level_duration: f32,
    /// Best score seen so far (updated live during play).
    pub high_score: u32,
    /// Obstacles shot down in this run.
    pub enemies_defeated: u32,
    /// Bosses beaten in this run.
    pub boss_defeats: u32,
    pub flutterer: &'static Flutterer,
    /// Remaining milliseconds in `LevelComplete` before the next level starts.
    pub transition_ms: f32,
    /// `Some` while the boss intro is pending or running.
    pub boss_intro_ms: Option<f32>,
    /// Events raised during the most recent tick.
    pub events: Vec<GameEvent>,
    pub frame: u64,
    pub width: f32,
    pub height: f32,
}
