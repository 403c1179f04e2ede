use butterfly_brawl::compute::boss::*;
use butterfly_brawl::compute::{collision, init_state, motion, start_at_level, tick};
use butterfly_brawl::entities::*;
use butterfly_brawl::events::GameEvent;
use butterfly_brawl::flutterers::starter;

use rand::rngs::StdRng;
use rand::SeedableRng;

const W: f32 = 480.0;
const H: f32 = 800.0;

/// Level 15 with the intro already over.
fn boss_fight() -> GameState {
    let mut s = start_at_level(&init_state(W, H, starter(), 3, 0), 15);
    s.boss_intro_ms = None;
    s.events.clear();
    s
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn boss(s: &GameState) -> &Boss {
    s.boss.as_ref().expect("boss level has a boss")
}

fn boss_mut(s: &mut GameState) -> &mut Boss {
    s.boss.as_mut().expect("boss level has a boss")
}

fn count(s: &GameState, kind: ObstacleKind) -> usize {
    s.obstacles.iter().filter(|o| o.kind == kind).count()
}

// ── Phases ────────────────────────────────────────────────────────────────────

#[test]
fn phase_from_health_ratio() {
    assert_eq!(boss_phase(500.0, 500.0), 1);
    assert_eq!(boss_phase(400.0, 500.0), 1);
    assert_eq!(boss_phase(335.0, 500.0), 2);
    assert_eq!(boss_phase(200.0, 500.0), 2);
    assert_eq!(boss_phase(170.0, 500.0), 3);
    assert_eq!(boss_phase(0.0, 500.0), 3);
}

#[test]
fn boss_spawns_at_full_health_in_phase_one() {
    let s = boss_fight();
    let b = boss(&s);
    assert_eq!(b.health, 500.0);
    assert_eq!(b.max_health, 500.0);
    assert_eq!(b.phase, 1);
    assert_eq!(b.tentacles.len(), TENTACLE_COUNT);
    assert_eq!(b.x, W / 2.0 - BOSS_SIZE / 2.0);
}

#[test]
fn phase_change_resets_timers_and_is_announced() {
    let mut rng = seeded_rng();
    let mut s = boss_fight();
    {
        let b = boss_mut(&mut s);
        b.health = 170.0;
        b.shoot_timer = 400.0;
        b.special_timer = 1_500.0;
    }

    update_boss(&mut s, 33.0, &mut rng);

    let b = boss(&s);
    assert_eq!(b.phase, 3);
    assert_eq!(b.shoot_timer, 33.0);
    assert_eq!(b.special_timer, 33.0);
    assert!(s.events.contains(&GameEvent::BossPhaseChanged(3)));
    assert!(s.obstacles.is_empty());
}

// ── Attacks ───────────────────────────────────────────────────────────────────

#[test]
fn phase_one_fires_an_aimed_shot() {
    let mut rng = seeded_rng();
    let mut s = boss_fight();
    boss_mut(&mut s).shoot_timer = PHASE1_SHOT_MS - 10.0;

    update_boss(&mut s, 33.0, &mut rng);

    assert_eq!(count(&s, ObstacleKind::BossProjectile), 1);
    assert_eq!(s.obstacles[0].vy, 3.0);
    assert_eq!(boss(&s).shoot_timer, 0.0);
}

#[test]
fn phase_one_holds_fire_before_cadence() {
    let mut rng = seeded_rng();
    let mut s = boss_fight();
    update_boss(&mut s, 33.0, &mut rng);
    assert!(s.obstacles.is_empty());
}

#[test]
fn phase_two_spreads_and_swarms() {
    let mut rng = seeded_rng();
    let mut s = boss_fight();
    {
        let b = boss_mut(&mut s);
        b.health = 300.0;
        b.phase = 2;
        b.shoot_timer = PHASE2_SHOT_MS - 10.0;
        b.special_timer = PHASE2_SWARM_MS - 10.0;
    }

    update_boss(&mut s, 33.0, &mut rng);

    assert_eq!(count(&s, ObstacleKind::BossProjectile), 3);
    assert_eq!(count(&s, ObstacleKind::SwarmInsect), SWARM_SIZE);
}

#[test]
fn phase_three_homes_and_warns_a_beam_at_the_player() {
    let mut rng = seeded_rng();
    let mut s = boss_fight();
    {
        let b = boss_mut(&mut s);
        b.health = 100.0;
        b.phase = 3;
        b.shoot_timer = PHASE3_SHOT_MS - 10.0;
        b.special_timer = PHASE3_BEAM_MS - 10.0;
    }

    update_boss(&mut s, 33.0, &mut rng);

    assert_eq!(count(&s, ObstacleKind::BossHoming), 1);
    let homing = s
        .obstacles
        .iter()
        .find(|o| o.kind == ObstacleKind::BossHoming)
        .expect("homing shot fired");
    assert_eq!(homing.life_ms, Some(HOMING_LIFE_MS));
    let beam = s
        .obstacles
        .iter()
        .find(|o| matches!(o.kind, ObstacleKind::RageBeam { .. }))
        .expect("beam warned");
    let (px, _) = s.player.center();
    assert_eq!(beam.x, px - BEAM_WIDTH / 2.0);
    assert_eq!(beam.height, H);
    assert!(!beam.kind.is_armed());
}

#[test]
fn homing_shots_bend_toward_the_player() {
    let mut s = boss_fight();
    let (px, _) = s.player.center();
    s.obstacles.push(Obstacle {
        x: px + 100.0,
        y: 300.0,
        width: 18.0,
        height: 18.0,
        rotation: 0.0,
        rotation_speed: 0.0,
        vx: 0.0,
        vy: 0.0,
        kind: ObstacleKind::BossHoming,
        life_ms: Some(HOMING_LIFE_MS),
    });

    collision::steer_homing(&mut s);

    let o = &s.obstacles[0];
    assert!(o.vx < 0.0);
    assert!(o.vy > 0.0);
    assert!(o.vx.hypot(o.vy) <= collision::HOMING_MAX_SPEED);
}

#[test]
fn missed_homing_shot_burns_out() {
    let mut s = boss_fight();
    let (px, py) = s.player.center();
    // Parked below the player it keeps turning back up and never leaves the field
    s.obstacles.push(Obstacle {
        x: px,
        y: py + 60.0,
        width: 18.0,
        height: 18.0,
        rotation: 0.0,
        rotation_speed: 0.0,
        vx: 0.0,
        vy: 0.0,
        kind: ObstacleKind::BossHoming,
        life_ms: Some(HOMING_LIFE_MS),
    });

    motion::advance_entities(&mut s, HOMING_LIFE_MS - 1.0);
    assert_eq!(count(&s, ObstacleKind::BossHoming), 1);
    motion::advance_entities(&mut s, 1.0);
    assert_eq!(count(&s, ObstacleKind::BossHoming), 0);
}

#[test]
fn homing_shot_chasing_the_player_does_not_live_forever() {
    let mut s = boss_fight();
    let (px, py) = s.player.center();
    s.obstacles.push(Obstacle {
        x: px - 9.0,
        y: py + 80.0,
        width: 18.0,
        height: 18.0,
        rotation: 0.0,
        rotation_speed: 0.0,
        vx: 0.0,
        vy: 0.0,
        kind: ObstacleKind::BossHoming,
        life_ms: Some(HOMING_LIFE_MS),
    });

    let ticks = (HOMING_LIFE_MS / 16.0) as usize + 2;
    for _ in 0..ticks {
        collision::steer_homing(&mut s);
        motion::advance_entities(&mut s, 16.0);
    }
    assert_eq!(count(&s, ObstacleKind::BossHoming), 0);
}

#[test]
fn rage_beam_warns_then_strikes_then_fades() {
    let mut rng = seeded_rng();
    let mut s = boss_fight();
    let (px, _) = s.player.center();
    s.obstacles.push(Obstacle {
        x: px - BEAM_WIDTH / 2.0,
        y: 0.0,
        width: BEAM_WIDTH,
        height: H,
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

    // Warning: standing in the beam is safe
    collision::resolve_collisions(&mut s, &mut rng);
    assert_eq!(s.player.health, 100.0);
    assert_eq!(s.obstacles.len(), 1);

    motion::advance_entities(&mut s, BEAM_WARNING_MS);
    assert!(s.obstacles[0].kind.is_armed());

    // Active: it hurts
    collision::resolve_collisions(&mut s, &mut rng);
    assert_eq!(s.player.health, 75.0);
    assert!(s.obstacles.is_empty());
}

#[test]
fn unused_rage_beam_expires() {
    let mut s = boss_fight();
    s.obstacles.push(Obstacle {
        x: 0.0,
        y: 0.0,
        width: BEAM_WIDTH,
        height: H,
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
    motion::advance_entities(&mut s, BEAM_WARNING_MS);
    motion::advance_entities(&mut s, BEAM_ACTIVE_MS - 1.0);
    assert_eq!(s.obstacles.len(), 1);
    motion::advance_entities(&mut s, 1.0);
    assert!(s.obstacles.is_empty());
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[test]
fn boss_patrol_reverses_at_the_wall() {
    let mut rng = seeded_rng();
    let mut s = boss_fight();
    {
        let b = boss_mut(&mut s);
        b.x = W - BOSS_SIZE - 1.0;
        b.move_direction = 1.0;
    }
    update_boss(&mut s, 33.0, &mut rng);
    assert_eq!(boss(&s).x, W - BOSS_SIZE);
    assert_eq!(boss(&s).move_direction, -1.0);

    boss_mut(&mut s).x = 1.0;
    update_boss(&mut s, 33.0, &mut rng);
    assert_eq!(boss(&s).x, 0.0);
    assert_eq!(boss(&s).move_direction, 1.0);
}

// ── Damage ────────────────────────────────────────────────────────────────────

#[test]
fn player_shots_damage_the_boss() {
    let mut rng = seeded_rng();
    let mut s = boss_fight();
    let (bx, by) = boss(&s).center();
    s.projectiles.push(Projectile {
        x: bx,
        y: by,
        vx: 0.0,
        vy: -12.0,
        width: 6.0,
        height: 12.0,
        pattern: ShotPattern::Single,
        damage: 25.0,
        life_ms: 3000.0,
    });

    collision::resolve_collisions(&mut s, &mut rng);

    assert_eq!(boss(&s).health, 475.0);
    assert!(boss(&s).is_invulnerable());
    assert!(s.projectiles.is_empty());
}

#[test]
fn boss_health_never_goes_negative() {
    let mut s = boss_fight();
    damage_boss(&mut s, 10_000.0);
    assert_eq!(boss(&s).health, 0.0);
}

#[test]
fn body_contact_hurts_once_per_cooldown() {
    let mut rng = seeded_rng();
    let mut s = boss_fight();
    let (bx, by) = boss(&s).center();
    s.player.x = bx - 20.0;
    s.player.y = by - 20.0;

    collision::resolve_collisions(&mut s, &mut rng);
    assert_eq!(s.player.health, 75.0);
    assert_eq!(boss(&s).contact_cooldown_ms, CONTACT_COOLDOWN_MS);

    collision::resolve_collisions(&mut s, &mut rng);
    assert_eq!(s.player.health, 75.0);
}

// ── Defeat ────────────────────────────────────────────────────────────────────

#[test]
fn defeating_the_boss_completes_the_game() {
    let mut rng = seeded_rng();
    let mut s = boss_fight();
    s.score = 0;
    boss_mut(&mut s).health = 0.0;

    let s = tick(&s, 33.0, &mut rng);

    assert_eq!(s.status, GameStatus::GameComplete);
    assert!(s.boss.is_none());
    assert_eq!(s.boss_defeats, 1);
    assert_eq!(s.level, 15);
    assert!(s.score >= 15_000);
    assert!(s.events.contains(&GameEvent::BossDefeated));
    assert!(s.events.contains(&GameEvent::LevelCompleted(15)));
    assert!(s.events.contains(&GameEvent::GameComplete));
    let blast = s
        .particles
        .iter()
        .filter(|p| p.color == ParticleColor::BossBlast)
        .count();
    assert_eq!(blast, 40);
}

#[test]
fn killing_shot_beats_body_contact_in_the_same_tick() {
    let mut rng = seeded_rng();
    let mut s = boss_fight();
    s.lives = 1;
    s.player.health = 25.0;
    boss_mut(&mut s).health = 10.0;
    let (bx, by) = boss(&s).center();
    s.player.x = bx - 20.0;
    s.player.y = by - 20.0;
    s.player.target_x = s.player.x;
    s.player.target_y = s.player.y;
    s.projectiles.push(Projectile {
        x: bx + 30.0,
        y: by,
        vx: 0.0,
        vy: 0.0,
        width: 6.0,
        height: 12.0,
        pattern: ShotPattern::Single,
        damage: 25.0,
        life_ms: 3000.0,
    });

    let s = tick(&s, 33.0, &mut rng);

    assert_eq!(s.status, GameStatus::GameComplete);
    assert!(s.boss.is_none());
    assert_eq!(s.boss_defeats, 1);
    assert_eq!(s.lives, 1);
    assert!(!s.events.contains(&GameEvent::PlayerHit));
}

#[test]
fn beaten_boss_body_is_harmless() {
    let mut rng = seeded_rng();
    let mut s = boss_fight();
    boss_mut(&mut s).health = 0.0;
    let (bx, by) = boss(&s).center();
    s.player.x = bx - 20.0;
    s.player.y = by - 20.0;

    collision::resolve_collisions(&mut s, &mut rng);

    assert_eq!(s.player.health, 100.0);
}

#[test]
fn boss_fight_time_cap_ends_the_run() {
    let mut rng = seeded_rng();
    let mut s = boss_fight();
    s.level_time = s.level_duration - 1.0;

    let s = tick(&s, 33.0, &mut rng);

    assert_eq!(s.status, GameStatus::GameOver);
    assert!(s.events.contains(&GameEvent::GameOver));
    assert!(s.boss.is_some());
}
