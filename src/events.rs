/// Events the simulation raises for the audio collaborator.
///
/// A tick records what happened in `GameState::events`; the front end drains
/// them into an `AudioSink`.  Sinks are best effort: nothing they do can
/// affect the simulation.

use crate::entities::PowerUpKind;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    LevelStarted(u32),
    PowerUpCollected(PowerUpKind),
    PlayerHit,
    ShieldDeflect,
    LifeLost,
    BossIntro,
    BossPhaseChanged(u8),
    BossDefeated,
    LevelCompleted(u32),
    GameOver,
    GameComplete,
}

impl GameEvent {
    /// Symbolic sound name.
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::LevelStarted(_) => "level_start",
            GameEvent::PowerUpCollected(PowerUpKind::Speed) => "powerup_speed",
            GameEvent::PowerUpCollected(PowerUpKind::Shield) => "powerup_shield",
            GameEvent::PowerUpCollected(PowerUpKind::Blaster) => "powerup_blaster",
            GameEvent::PowerUpCollected(PowerUpKind::Health) => "powerup_health",
            GameEvent::PlayerHit => "player_hit",
            GameEvent::ShieldDeflect => "shield_deflect",
            GameEvent::LifeLost => "life_lost",
            GameEvent::BossIntro => "boss_intro",
            GameEvent::BossPhaseChanged(_) => "boss_phase",
            GameEvent::BossDefeated => "boss_defeated",
            GameEvent::LevelCompleted(_) => "level_complete",
            GameEvent::GameOver => "game_over",
            GameEvent::GameComplete => "game_complete",
        }
    }
}

pub trait AudioSink {
    fn play(&mut self, event: &GameEvent);
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _event: &GameEvent) {}
}

/// Hand every event of the last tick to `sink`.
pub fn dispatch(events: &[GameEvent], sink: &mut dyn AudioSink) {
    for event in events {
        sink.play(event);
    }
}
