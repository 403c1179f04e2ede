use butterfly_brawl::compute::*;
use butterfly_brawl::entities::*;
use butterfly_brawl::events::GameEvent;
use butterfly_brawl::flutterers::{flutterer_by_id, starter};
use butterfly_brawl::levels::level_config;

use rand::rngs::StdRng;
use rand::SeedableRng;

const W: f32 = 480.0;
const H: f32 = 800.0;

fn make_state() -> GameState {
    let menu = init_state(W, H, starter(), 3, 0);
    start_game(&menu)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn obstacle_at(x: f32, y: f32, size: f32, kind: ObstacleKind) -> Obstacle {
    Obstacle {
        x,
        y,
        width: size,
        height: size,
        rotation: 0.0,
        rotation_speed: 0.0,
        vx: 0.0,
        vy: 0.0,
        kind,
        life_ms: None,
    }
}

/// An asteroid sitting right on top of the player.
fn obstacle_on_player(s: &GameState, kind: ObstacleKind) -> Obstacle {
    obstacle_at(s.player.x + 5.0, s.player.y + 5.0, 30.0, kind)
}

fn power_up_on_player(s: &GameState, kind: PowerUpKind) -> PowerUp {
    PowerUp {
        x: s.player.x + 5.0,
        y: s.player.y + 5.0,
        width: 25.0,
        height: 25.0,
        rotation: 0.0,
        kind,
    }
}

// ── init_state / start_game ───────────────────────────────────────────────────

#[test]
fn init_state_is_menu_with_centred_player() {
    let s = init_state(W, H, starter(), 3, 1234);
    assert_eq!(s.status, GameStatus::Menu);
    assert_eq!(s.player.x, W / 2.0 - 20.0);
    assert_eq!(s.player.y, H - 100.0 - 20.0);
    assert_eq!(s.player.health, 100.0);
    assert_eq!(s.lives, 3);
    assert_eq!(s.high_score, 1234);
}

#[test]
fn start_game_enters_level_one() {
    let s = make_state();
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.level, 1);
    assert_eq!(s.score, 0);
    assert!(s.boss.is_none());
    assert!(s.obstacles.is_empty());
    assert_eq!(s.level_duration, level_config(1).duration_ms);
    assert_eq!(s.events, vec![GameEvent::LevelStarted(1)]);
}

#[test]
fn flutterer_stats_shape_the_player() {
    let glider = flutterer_by_id("solar_glider").unwrap();
    let s = start_game(&init_state(W, H, glider, 3, 0));
    assert_eq!(s.player.max_health, 120.0);
    assert!((s.player.base_speed - 8.0 * 0.9).abs() < 1e-5);
}

#[test]
fn a_run_never_starts_without_lives() {
    let mut rng = seeded_rng();
    let menu = init_state(W, H, starter(), 0, 0);
    assert_eq!(menu.lives, 1);

    let mut s = start_game(&menu);
    assert_eq!(s.lives, 1);
    for _ in 0..3 {
        s = tick(&s, 33.0, &mut rng);
    }
    assert!(s.lives > 0 || s.status == GameStatus::GameOver);

    let mut broken = make_state();
    broken.starting_lives = 0;
    assert_eq!(start_game(&broken).lives, 1);
}

#[test]
fn start_at_level_clamps() {
    let menu = init_state(W, H, starter(), 3, 0);
    assert_eq!(start_at_level(&menu, 0).level, 1);
    assert_eq!(start_at_level(&menu, 99).level, 15);
    assert_eq!(start_at_level(&menu, 7).level, 7);
}

#[test]
fn restart_only_after_the_run_ended() {
    let mut s = make_state();
    s.score = 500;
    s.level = 4;
    assert_eq!(restart(&s).score, 500);

    s.status = GameStatus::GameOver;
    let r = restart(&s);
    assert_eq!(r.status, GameStatus::Playing);
    assert_eq!(r.level, 1);
    assert_eq!(r.score, 0);
    assert_eq!(r.lives, 3);
}

// ── Pointer and pause ─────────────────────────────────────────────────────────

#[test]
fn set_target_centres_player_on_pointer() {
    let s = set_target(&make_state(), 100.0, 200.0);
    assert_eq!(s.player.target_x, 80.0);
    assert_eq!(s.player.target_y, 180.0);
}

#[test]
fn player_eases_toward_target_and_stays_in_field() {
    let mut rng = seeded_rng();
    let s = set_target(&make_state(), -500.0, 100.0);
    let start_x = s.player.x;
    let s = tick(&s, 33.0, &mut rng);
    assert!(s.player.x < start_x);
    assert!(s.player.x >= 0.0);

    let mut s = s;
    for _ in 0..200 {
        s = tick(&s, 1.0, &mut rng);
        if s.status != GameStatus::Playing {
            break;
        }
    }
    assert!(s.player.x >= 0.0);
}

#[test]
fn pause_freezes_the_field() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.obstacles.push(obstacle_at(100.0, 100.0, 30.0, ObstacleKind::Asteroid));
    let paused = toggle_pause(&s);
    assert_eq!(paused.status, GameStatus::Paused);

    let after = tick(&paused, 33.0, &mut rng);
    assert_eq!(after.obstacles[0].y, 100.0);
    assert_eq!(after.game_time, paused.game_time);

    assert_eq!(toggle_pause(&after).status, GameStatus::Playing);
}

#[test]
fn pause_is_ignored_outside_play() {
    let mut s = make_state();
    s.status = GameStatus::GameOver;
    assert_eq!(toggle_pause(&s).status, GameStatus::GameOver);
}

// ── Player damage ─────────────────────────────────────────────────────────────

#[test]
fn hit_costs_health() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    let o = obstacle_on_player(&s, ObstacleKind::Asteroid);
    s.obstacles.push(o);

    collision::resolve_collisions(&mut s, &mut rng);

    assert_eq!(s.player.health, 75.0);
    assert_eq!(s.lives, 3);
    assert!(s.obstacles.is_empty());
    assert!(s.events.contains(&GameEvent::PlayerHit));
    // explosion particles
    assert_eq!(s.particles.len(), 8);
}

#[test]
fn last_health_costs_a_life_and_refills() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.player.health = 25.0;
    let o = obstacle_on_player(&s, ObstacleKind::Insect);
    s.obstacles.push(o);

    collision::resolve_collisions(&mut s, &mut rng);

    assert_eq!(s.lives, 2);
    assert_eq!(s.player.health, s.player.max_health);
    assert_eq!(s.status, GameStatus::Playing);
    assert!(s.events.contains(&GameEvent::LifeLost));
}

#[test]
fn last_life_ends_the_game() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.lives = 1;
    s.player.health = 25.0;
    let o = obstacle_on_player(&s, ObstacleKind::Asteroid);
    s.obstacles.push(o);

    collision::resolve_collisions(&mut s, &mut rng);

    assert_eq!(s.lives, 0);
    assert_eq!(s.player.health, 0.0);
    assert_eq!(s.status, GameStatus::GameOver);
    assert!(s.events.contains(&GameEvent::GameOver));
}

#[test]
fn second_hit_in_the_same_tick_after_game_over_is_ignored() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.lives = 1;
    s.player.health = 25.0;
    let a = obstacle_on_player(&s, ObstacleKind::Asteroid);
    let b = obstacle_on_player(&s, ObstacleKind::Insect);
    s.obstacles.push(a);
    s.obstacles.push(b);

    collision::resolve_collisions(&mut s, &mut rng);

    assert_eq!(s.lives, 0);
    let hits = s.events.iter().filter(|e| **e == GameEvent::PlayerHit).count();
    assert_eq!(hits, 1);
    assert!(s.obstacles.is_empty());
}

#[test]
fn shield_blocks_damage() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.player.has_shield = true;
    s.player.shield_time = 8000.0;
    let o = obstacle_on_player(&s, ObstacleKind::Asteroid);
    s.obstacles.push(o);

    collision::resolve_collisions(&mut s, &mut rng);

    assert_eq!(s.player.health, 100.0);
    assert!(s.obstacles.is_empty());
    assert!(!s.events.contains(&GameEvent::ShieldDeflect));
}

#[test]
fn shield_deflects_boss_fire() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.player.has_shield = true;
    s.player.shield_time = 8000.0;
    let o = obstacle_on_player(&s, ObstacleKind::BossProjectile);
    s.obstacles.push(o);

    collision::resolve_collisions(&mut s, &mut rng);

    assert_eq!(s.player.health, 100.0);
    assert!(s.events.contains(&GameEvent::ShieldDeflect));
    let cyan = s
        .particles
        .iter()
        .filter(|p| p.color == ParticleColor::Cyan)
        .count();
    assert_eq!(cyan, 6);
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[test]
fn speed_power_up_boosts_then_expires() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    let p = power_up_on_player(&s, PowerUpKind::Speed);
    s.power_ups.push(p);

    collision::resolve_collisions(&mut s, &mut rng);
    assert!(s.player.speed_boost);
    assert_eq!(s.player.speed, 12.0);
    assert_eq!(s.score, 50);
    assert!(s.events.contains(&GameEvent::PowerUpCollected(PowerUpKind::Speed)));

    player::update_player(&mut s, 5_000.0);
    assert!(!s.player.speed_boost);
    assert_eq!(s.player.speed, 8.0);
}

#[test]
fn shield_power_up_lasts_eight_seconds() {
    let mut s = make_state();
    player::collect_power_up(&mut s, PowerUpKind::Shield);
    assert!(s.player.has_shield);

    player::update_player(&mut s, 7_999.0);
    assert!(s.player.has_shield);
    player::update_player(&mut s, 1.0);
    assert!(!s.player.has_shield);
}

#[test]
fn blaster_level_caps_at_three() {
    let mut s = make_state();
    for _ in 0..4 {
        player::collect_power_up(&mut s, PowerUpKind::Blaster);
    }
    assert!(s.player.blaster_mode);
    assert_eq!(s.player.blaster_level, 3);
    assert_eq!(s.score, 200);
}

#[test]
fn blaster_level_resets_when_timer_runs_out() {
    let mut s = make_state();
    player::collect_power_up(&mut s, PowerUpKind::Blaster);
    player::collect_power_up(&mut s, PowerUpKind::Blaster);
    assert_eq!(s.player.blaster_level, 2);

    player::update_player(&mut s, 10_000.0);
    assert!(!s.player.blaster_mode);
    assert_eq!(s.player.blaster_level, 0);
}

#[test]
fn health_power_up_never_overheals() {
    let mut s = make_state();
    s.player.health = 90.0;
    player::collect_power_up(&mut s, PowerUpKind::Health);
    assert_eq!(s.player.health, 100.0);

    s.player.health = 50.0;
    player::collect_power_up(&mut s, PowerUpKind::Health);
    assert_eq!(s.player.health, 75.0);
}

// ── Weapon ────────────────────────────────────────────────────────────────────

#[test]
fn fire_intervals_per_level() {
    assert_eq!(weapon::fire_interval_ms(0), None);
    assert_eq!(weapon::fire_interval_ms(1), Some(800.0));
    assert_eq!(weapon::fire_interval_ms(2), Some(600.0));
    assert_eq!(weapon::fire_interval_ms(3), Some(400.0));
}

#[test]
fn no_blaster_no_shots() {
    let mut s = make_state();
    assert!(!weapon::fire_if_ready(&mut s, None));
    assert!(s.projectiles.is_empty());
}

#[test]
fn auto_fire_aims_at_nearest_obstacle_above() {
    let mut s = make_state();
    player::collect_power_up(&mut s, PowerUpKind::Blaster);
    let (px, py) = s.player.center();
    // One in range above, one further away, one below
    s.obstacles.push(obstacle_at(px - 15.0, py - 120.0, 30.0, ObstacleKind::Asteroid));
    s.obstacles.push(obstacle_at(px - 15.0, py - 300.0, 30.0, ObstacleKind::Insect));
    s.obstacles.push(obstacle_at(px - 15.0, py + 40.0, 30.0, ObstacleKind::Insect));

    assert_eq!(weapon::find_target(&s), Some((px, py - 105.0)));

    weapon::auto_fire(&mut s);
    assert_eq!(s.projectiles.len(), 1);
    let shot = &s.projectiles[0];
    assert_eq!(shot.pattern, ShotPattern::Single);
    assert_eq!(shot.damage, 25.0);
    assert!(shot.vy < 0.0);
    assert!(shot.vx.abs() < 1e-4);
}

#[test]
fn out_of_range_obstacles_are_not_targeted() {
    let mut s = make_state();
    let (px, py) = s.player.center();
    s.obstacles.push(obstacle_at(px - 15.0, py - 400.0, 30.0, ObstacleKind::Asteroid));
    assert_eq!(weapon::find_target(&s), None);
}

#[test]
fn blaster_respects_its_interval() {
    let mut s = make_state();
    player::collect_power_up(&mut s, PowerUpKind::Blaster);

    assert!(weapon::fire_if_ready(&mut s, None));
    assert!(!weapon::fire_if_ready(&mut s, None));

    s.game_time += 800.0;
    assert!(weapon::fire_if_ready(&mut s, None));
    assert_eq!(s.projectiles.len(), 2);
}

#[test]
fn dual_and_laser_patterns() {
    let mut s = make_state();
    player::collect_power_up(&mut s, PowerUpKind::Blaster);
    player::collect_power_up(&mut s, PowerUpKind::Blaster);
    weapon::fire_if_ready(&mut s, None);
    assert_eq!(s.projectiles.len(), 2);
    assert!(s.projectiles.iter().all(|p| p.pattern == ShotPattern::Dual));

    let mut s = make_state();
    for _ in 0..3 {
        player::collect_power_up(&mut s, PowerUpKind::Blaster);
    }
    weapon::fire_if_ready(&mut s, None);
    assert_eq!(s.projectiles.len(), 1);
    assert_eq!(s.projectiles[0].pattern, ShotPattern::Laser);
    assert_eq!(s.projectiles[0].damage, 40.0);
}

#[test]
fn shoot_at_aims_at_the_pointer() {
    let mut s = make_state();
    player::collect_power_up(&mut s, PowerUpKind::Blaster);
    let (px, _) = s.player.center();
    let s = shoot_at(&s, px + 300.0, s.player.y);
    assert_eq!(s.projectiles.len(), 1);
    assert!(s.projectiles[0].vx > 0.0);
}

#[test]
fn shot_destroys_obstacle_and_scores() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.obstacles.push(obstacle_at(100.0, 100.0, 40.0, ObstacleKind::Insect));
    s.projectiles.push(Projectile {
        x: 110.0,
        y: 110.0,
        vx: 0.0,
        vy: -12.0,
        width: 6.0,
        height: 12.0,
        pattern: ShotPattern::Single,
        damage: 25.0,
        life_ms: 3000.0,
    });

    collision::resolve_collisions(&mut s, &mut rng);

    assert!(s.obstacles.is_empty());
    assert!(s.projectiles.is_empty());
    assert_eq!(s.score, 150);
    assert_eq!(s.enemies_defeated, 1);
}

#[test]
fn kill_scores_per_kind() {
    assert_eq!(collision::score_for(&ObstacleKind::Asteroid), 100);
    assert_eq!(collision::score_for(&ObstacleKind::Insect), 150);
    assert_eq!(collision::score_for(&ObstacleKind::SwarmInsect), 75);
    assert_eq!(collision::score_for(&ObstacleKind::BossProjectile), 25);
}

// ── Motion ────────────────────────────────────────────────────────────────────

#[test]
fn obstacles_fall_at_level_speed() {
    let mut s = make_state();
    s.obstacles.push(obstacle_at(100.0, 100.0, 30.0, ObstacleKind::Asteroid));
    motion::advance_entities(&mut s, 33.0);
    assert_eq!(s.obstacles[0].y, 100.0 + level_config(1).game_speed);
}

#[test]
fn dodged_obstacle_scores_survival_points() {
    let mut s = make_state();
    s.obstacles.push(obstacle_at(100.0, H + 29.0, 30.0, ObstacleKind::Asteroid));
    motion::advance_entities(&mut s, 33.0);
    assert!(s.obstacles.is_empty());
    assert_eq!(s.score, 10);
}

#[test]
fn spent_projectiles_are_dropped() {
    let mut s = make_state();
    s.projectiles.push(Projectile {
        x: 100.0,
        y: -1.0,
        vx: 0.0,
        vy: -12.0,
        width: 6.0,
        height: 12.0,
        pattern: ShotPattern::Single,
        damage: 25.0,
        life_ms: 3000.0,
    });
    motion::advance_entities(&mut s, 33.0);
    assert!(s.projectiles.is_empty());
}

#[test]
fn remove_indices_handles_any_order() {
    let mut v = vec![0, 1, 2, 3, 4];
    collision::remove_indices(&mut v, &[3, 0, 3]);
    assert_eq!(v, vec![1, 2, 4]);
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[test]
fn spawned_objects_start_above_the_field() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    for _ in 0..20 {
        spawn::spawn_obstacle(&mut s, &mut rng);
        spawn::spawn_power_up(&mut s, &mut rng);
    }
    for o in &s.obstacles {
        assert_eq!(o.y, -o.height);
        assert!(o.width >= 30.0 && o.width < 50.0);
        assert!(o.x >= 30.0 && o.x < W - 30.0);
        assert!(matches!(o.kind, ObstacleKind::Asteroid | ObstacleKind::Insect));
    }
    for p in &s.power_ups {
        assert_eq!(p.y, -25.0);
        assert!(p.x >= 20.0 && p.x < W - 20.0);
    }
}

#[test]
fn regular_levels_spawn_obstacles() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    for _ in 0..1000 {
        spawn::spawn_objects(&mut s, &mut rng);
    }
    assert!(!s.obstacles.is_empty());
}

#[test]
fn boss_level_spawns_no_regular_obstacles() {
    let mut rng = seeded_rng();
    let mut s = start_at_level(&init_state(W, H, starter(), 3, 0), 15);
    for _ in 0..1000 {
        spawn::spawn_objects(&mut s, &mut rng);
    }
    assert!(s.obstacles.is_empty());
    assert!(!s.power_ups.is_empty());
}

#[test]
fn same_seed_same_run() {
    let s = make_state();
    let mut a = s.clone();
    let mut b = s.clone();
    let mut rng_a = StdRng::seed_from_u64(7);
    let mut rng_b = StdRng::seed_from_u64(7);
    for _ in 0..300 {
        a = tick(&a, 33.0, &mut rng_a);
        b = tick(&b, 33.0, &mut rng_b);
    }
    assert_eq!(a.score, b.score);
    assert_eq!(a.obstacles.len(), b.obstacles.len());
    assert_eq!(a.power_ups.len(), b.power_ups.len());
}

// ── Tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_advances_clocks() {
    let mut rng = seeded_rng();
    let s = tick(&make_state(), 33.0, &mut rng);
    assert_eq!(s.game_time, 33.0);
    assert_eq!(s.level_time, 33.0);
    assert_eq!(s.frame, 1);
}

#[test]
fn tick_clears_last_ticks_events() {
    let mut rng = seeded_rng();
    let s = make_state();
    assert!(!s.events.is_empty());
    let s = tick(&s, 33.0, &mut rng);
    assert!(!s.events.contains(&GameEvent::LevelStarted(1)));
}

#[test]
fn high_score_tracks_live_score() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.score = 5000;
    let s = tick(&s, 1.0, &mut rng);
    assert!(s.high_score >= 5000);
}

#[test]
fn nothing_moves_after_game_over() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.status = GameStatus::GameOver;
    s.obstacles.push(obstacle_at(100.0, 100.0, 30.0, ObstacleKind::Asteroid));
    let after = tick(&s, 33.0, &mut rng);
    assert_eq!(after.obstacles[0].y, 100.0);
    assert_eq!(after.status, GameStatus::GameOver);
}

// ── Specials ──────────────────────────────────────────────────────────────────

#[test]
fn starter_has_no_special() {
    let mut rng = seeded_rng();
    let s = trigger_special(&make_state(), &mut rng);
    assert_eq!(s.player.special_cooldown, 0.0);
}

#[test]
fn plasma_burst_clears_nearby_obstacles() {
    let mut rng = seeded_rng();
    let striker = flutterer_by_id("plasma_striker").unwrap();
    let mut s = start_game(&init_state(W, H, striker, 3, 0));
    let (px, py) = s.player.center();
    s.obstacles.push(obstacle_at(px - 15.0, py - 100.0, 30.0, ObstacleKind::Asteroid));
    s.obstacles.push(obstacle_at(px - 15.0, py - 400.0, 30.0, ObstacleKind::Asteroid));

    let s = trigger_special(&s, &mut rng);

    assert_eq!(s.obstacles.len(), 1);
    assert_eq!(s.score, 100);
    assert_eq!(s.player.special_cooldown, player::SPECIAL_COOLDOWN_MS);

    // On cooldown: a second use does nothing
    let again = trigger_special(&s, &mut rng);
    assert_eq!(again.obstacles.len(), 1);
}

#[test]
fn energy_barrier_raises_a_shield() {
    let mut rng = seeded_rng();
    let guardian = flutterer_by_id("cosmic_guardian").unwrap();
    let s = start_game(&init_state(W, H, guardian, 3, 0));
    let s = trigger_special(&s, &mut rng);
    assert!(s.player.has_shield);
    assert_eq!(s.player.shield_time, player::SPECIAL_EFFECT_MS);
}

// ── Invariants ────────────────────────────────────────────────────────────────

#[test]
fn hit_on_last_health_with_two_lives() {
    let mut s = make_state();
    s.lives = 2;
    s.player.health = 25.0;
    player::apply_player_hit(&mut s);
    assert_eq!(s.lives, 1);
    assert_eq!(s.player.health, 100.0);
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn health_pickup_at_full_health_only_scores() {
    let mut s = make_state();
    player::collect_power_up(&mut s, PowerUpKind::Health);
    assert_eq!(s.player.health, s.player.max_health);
    assert_eq!(s.score, 50);
}

#[test]
fn collision_is_symmetric_between_entities() {
    let s = make_state();
    let near = obstacle_on_player(&s, ObstacleKind::Asteroid);
    let far = obstacle_at(0.0, 0.0, 30.0, ObstacleKind::Insect);
    assert!(collision::is_colliding(&s.player, &near));
    assert!(collision::is_colliding(&near, &s.player));
    assert!(!collision::is_colliding(&s.player, &far));
    assert!(!collision::is_colliding(&far, &s.player));
}

#[test]
fn health_and_lives_stay_in_range_over_a_long_run() {
    let mut rng = StdRng::seed_from_u64(1234);
    let mut s = start_at_level(&init_state(W, H, starter(), 3, 0), 9);
    // Sit still in the middle of the field and let things happen
    for _ in 0..5_000 {
        s = tick(&s, 33.0, &mut rng);
        assert!(s.player.health >= 0.0 && s.player.health <= s.player.max_health);
        if s.lives == 0 {
            assert_eq!(s.status, GameStatus::GameOver);
        }
        assert!(s.player.blaster_level <= 3);
        if s.status == GameStatus::GameOver {
            break;
        }
    }
}
