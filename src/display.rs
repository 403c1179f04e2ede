/// Terminal renderer.
///
/// Draws a read-only snapshot of `GameState` by scaling world units onto the
/// framed play area and queueing crossterm commands, flushed once per frame.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use butterfly_brawl::entities::{
    Boss, GameState, GameStatus, Obstacle, ObstacleKind, Particle, ParticleColor, PowerUp,
    PowerUpKind, Projectile, ShotPattern,
};
use butterfly_brawl::levels::{level_config, Theme};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_HEALTH: Color = Color::Green;
const C_PLAYER: Color = Color::Magenta;
const C_SHIELD: Color = Color::Cyan;
const C_ASTEROID: Color = Color::DarkYellow;
const C_INSECT: Color = Color::Green;
const C_BOSS_SHOT: Color = Color::Red;
const C_BEAM_WARNING: Color = Color::Yellow;
const C_BEAM: Color = Color::Red;
const C_SHOT: Color = Color::Cyan;
const C_LASER: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;
const C_POWERUP_ACTIVE: Color = Color::Yellow;

// ── World → terminal mapping ──────────────────────────────────────────────────

/// Maps the world field onto the framed play area of the terminal:
/// rows 2 ..= rows-3 and columns 1 ..= cols-2.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    world_w: f32,
    world_h: f32,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, world_w: f32, world_h: f32) -> Self {
        Viewport {
            cols,
            rows,
            world_w,
            world_h,
        }
    }

    fn play_cols(&self) -> f32 {
        self.cols.saturating_sub(2).max(1) as f32
    }

    fn play_rows(&self) -> f32 {
        self.rows.saturating_sub(4).max(1) as f32
    }

    /// Cell for a world point, or `None` if it falls outside the play area.
    pub fn to_cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 || x >= self.world_w || y >= self.world_h {
            return None;
        }
        let col = 1.0 + x / self.world_w * self.play_cols();
        let row = 2.0 + y / self.world_h * self.play_rows();
        Some((col as u16, row as u16))
    }

    /// World point at the centre of a terminal cell (used for mouse input).
    pub fn to_world(&self, col: u16, row: u16) -> (f32, f32) {
        let cx = (col.saturating_sub(1) as f32 + 0.5) / self.play_cols();
        let cy = (row.saturating_sub(2) as f32 + 0.5) / self.play_rows();
        (
            (cx * self.world_w).clamp(0.0, self.world_w),
            (cy * self.world_h).clamp(0.0, self.world_h),
        )
    }

    /// Width of `w` world units in cells, at least one.
    fn cells_wide(&self, w: f32) -> u16 {
        ((w / self.world_w * self.play_cols()).round() as u16).max(1)
    }

    fn cells_tall(&self, h: f32) -> u16 {
        ((h / self.world_h * self.play_rows()).round() as u16).max(1)
    }
}

fn put<W: Write>(out: &mut W, at: Option<(u16, u16)>, color: Color, glyph: &str) -> std::io::Result<()> {
    if let Some((col, row)) = at {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, theme_color(level_config(state.level).theme), view)?;
    draw_hud(out, state, view)?;

    for particle in &state.particles {
        draw_particle(out, particle, view)?;
    }
    for obstacle in &state.obstacles {
        draw_obstacle(out, obstacle, view)?;
    }
    for power_up in &state.power_ups {
        draw_power_up(out, power_up, view)?;
    }
    for shot in &state.projectiles {
        draw_projectile(out, shot, view)?;
    }
    if let Some(boss) = &state.boss {
        let phases = level_config(state.level).boss.map_or(3, |b| b.phases);
        draw_boss(out, boss, phases, view)?;
    }

    draw_player(out, state, view)?;
    draw_controls_hint(out, view)?;
    draw_overlay(out, state, view)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

/// Frame colour for a level's backdrop.
fn theme_color(theme: Theme) -> Color {
    match theme {
        Theme::StarryNight => Color::DarkBlue,
        Theme::CosmicAurora => Color::DarkGreen,
        Theme::NebulaClouds => Color::DarkMagenta,
        Theme::CrystalVoid => Color::DarkCyan,
        Theme::PlasmaStorm => Color::Magenta,
        Theme::QuantumRealm => Color::Blue,
        Theme::SolarFlare => Color::DarkYellow,
        Theme::GalacticCore => Color::Yellow,
        Theme::VoidDarkness => Color::DarkGrey,
        Theme::BossArena => Color::DarkRed,
    }
}

fn draw_border<W: Write>(out: &mut W, color: Color, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(color))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    // Score and high score, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    if state.high_score > 0 {
        out.queue(Print(format!(
            "Score:{:>7}  Hi:{:>7}",
            state.score, state.high_score
        )))?;
    } else {
        out.queue(Print(format!("Score:{:>7}", state.score)))?;
    }

    // Level name, centred
    let cfg = level_config(state.level);
    let level_str = format!("[ {} · {} ]", state.level, cfg.name);
    let level_color = if state.boss.is_some() { Color::Red } else { Color::Cyan };
    let lx = (view.cols / 2).saturating_sub(level_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(level_color))?;
    out.queue(Print(&level_str))?;

    // Power-ups, health and lives, right-aligned
    let p = &state.player;
    let mut tags = String::new();
    if p.speed_boost {
        tags.push_str(&format!("[» {:>2}s] ", (p.speed_boost_time / 1000.0).ceil() as u32));
    }
    if p.has_shield {
        tags.push_str(&format!("[◯ {:>2}s] ", (p.shield_time / 1000.0).ceil() as u32));
    }
    if p.blaster_mode {
        tags.push_str(&format!(
            "[⚡{} {:>2}s] ",
            p.blaster_level,
            (p.blaster_time / 1000.0).ceil() as u32
        ));
    }
    let filled = ((p.health / p.max_health.max(1.0)) * 10.0).round() as usize;
    let health_str = format!("{}{} ", "■".repeat(filled), "□".repeat(10usize.saturating_sub(filled)));
    let lives_str = format!("Lives:{}", "♥".repeat(state.lives as usize));
    let right_len = tags.chars().count() + health_str.chars().count() + lives_str.chars().count();

    let rx = view.cols.saturating_sub(right_len as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    if !tags.is_empty() {
        out.queue(style::SetForegroundColor(C_POWERUP_ACTIVE))?;
        out.queue(Print(&tags))?;
    }
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(&health_str))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    // Sprite (1 row):  ƸӜƷ, wrapped in ( ) while shielded
    let p = &state.player;
    let at = view.to_cell(p.x + p.width / 2.0, p.y + p.height / 2.0);
    let Some((col, row)) = at else {
        return Ok(());
    };
    if p.has_shield {
        put(out, Some((col.saturating_sub(2), row)), C_SHIELD, "(")?;
        put(out, Some((col + 2, row)), C_SHIELD, ")")?;
    }
    put(out, Some((col.saturating_sub(1), row)), C_PLAYER, "ƸӜƷ")
}

fn draw_obstacle<W: Write>(out: &mut W, o: &Obstacle, view: &Viewport) -> std::io::Result<()> {
    let center = view.to_cell(o.x + o.width / 2.0, o.y + o.height / 2.0);
    match o.kind {
        ObstacleKind::Asteroid => put(out, center, C_ASTEROID, "◆"),
        ObstacleKind::Insect => put(out, center, C_INSECT, "ж"),
        ObstacleKind::SwarmInsect => put(out, center, C_INSECT, "x"),
        ObstacleKind::BossProjectile => put(out, center, C_BOSS_SHOT, "●"),
        ObstacleKind::BossHoming => put(out, center, Color::Magenta, "◎"),
        ObstacleKind::RageBeam { warning_ms, .. } => {
            let (glyph, color) = if warning_ms > 0.0 {
                ("┆", C_BEAM_WARNING)
            } else {
                ("█", C_BEAM)
            };
            let Some((col, _)) = view.to_cell(o.x + o.width / 2.0, 0.0) else {
                return Ok(());
            };
            let half = view.cells_wide(o.width) / 2;
            for row in 2..view.rows.saturating_sub(2) {
                for c in col.saturating_sub(half)..=col + half {
                    put(out, Some((c.max(1), row)), color, glyph)?;
                }
            }
            Ok(())
        }
    }
}

/// Symbols:
///   »  (yellow)  speed boost
///   ◯  (cyan)    shield
///   ⚡ (magenta) blaster
///   ✚  (green)   health
fn draw_power_up<W: Write>(out: &mut W, p: &PowerUp, view: &Viewport) -> std::io::Result<()> {
    let at = view.to_cell(p.x + p.width / 2.0, p.y + p.height / 2.0);
    match p.kind {
        PowerUpKind::Speed => put(out, at, Color::Yellow, "»"),
        PowerUpKind::Shield => put(out, at, Color::Cyan, "◯"),
        PowerUpKind::Blaster => put(out, at, Color::Magenta, "⚡"),
        PowerUpKind::Health => put(out, at, Color::Green, "✚"),
    }
}

fn draw_projectile<W: Write>(out: &mut W, shot: &Projectile, view: &Viewport) -> std::io::Result<()> {
    let at = view.to_cell(shot.x + shot.width / 2.0, shot.y + shot.height / 2.0);
    match shot.pattern {
        ShotPattern::Single | ShotPattern::Dual => put(out, at, C_SHOT, "|"),
        ShotPattern::Laser => put(out, at, C_LASER, "║"),
    }
}

fn draw_particle<W: Write>(out: &mut W, p: &Particle, view: &Viewport) -> std::io::Result<()> {
    if p.alpha < 0.25 {
        return Ok(());
    }
    let color = match p.color {
        ParticleColor::Explosion => Color::DarkYellow,
        ParticleColor::Gold => Color::Yellow,
        ParticleColor::Cyan => Color::Cyan,
        ParticleColor::BossBlast => Color::Red,
        ParticleColor::Sparkle => Color::White,
    };
    let glyph = if p.alpha > 0.6 { "*" } else { "·" };
    put(out, view.to_cell(p.x, p.y), color, glyph)
}

fn draw_boss<W: Write>(out: &mut W, boss: &Boss, phases: u8, view: &Viewport) -> std::io::Result<()> {
    let color = if boss.is_invulnerable() {
        Color::White
    } else {
        match boss.phase {
            1 => Color::DarkMagenta,
            2 => Color::DarkRed,
            _ => Color::Red,
        }
    };
    let Some((left, top)) = view.to_cell(boss.x.max(0.0), boss.y.max(0.0)) else {
        return Ok(());
    };
    let w = view.cells_wide(boss.width);
    let h = view.cells_tall(boss.height);
    for dy in 0..h {
        let line: String = if dy == h / 2 {
            let eyes = "◉ ◉";
            let pad = (w as usize).saturating_sub(eyes.chars().count());
            format!("{}{}{}", "▓".repeat(pad / 2), eyes, "▓".repeat(pad - pad / 2))
        } else {
            "▓".repeat(w as usize)
        };
        put(out, Some((left, top + dy)), color, &line)?;
    }

    // Tentacles hang below the body; their sway shifts them sideways.
    let bottom = top + h;
    for (i, t) in boss.tentacles.iter().enumerate() {
        let step = w as f32 / boss.tentacles.len() as f32;
        let sway = (t.offset / 8.0).round() as i32;
        let col = (left as i32 + (i as f32 * step) as i32 + sway).max(1) as u16;
        put(out, Some((col, bottom)), color, if sway < 0 { "\\" } else { "/" })?;
    }

    // Health bar above the body
    let ratio = (boss.health / boss.max_health.max(1.0)).clamp(0.0, 1.0);
    let filled = (ratio * w as f32).round() as usize;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat((w as usize).saturating_sub(filled)));
    let bar_row = top.saturating_sub(1).max(2);
    put(out, Some((left, bar_row)), Color::Red, &bar)?;
    let phase_tag = format!(" PHASE {}/{}", boss.phase, phases);
    put(out, Some((left + w, bar_row)), color, &phase_tag)
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "Mouse/←→↑↓/WASD : Fly   Click/F : Shoot   SPACE : Special   P : Pause   Q : Quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_overlay<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let (title, color, hint): (String, Color, &str) = match state.status {
        GameStatus::Paused => ("PAUSED".to_string(), Color::White, "P - Resume  Q - Quit"),
        GameStatus::BossIntro => (
            format!("{} APPROACHES", boss_name(state)),
            Color::Red,
            "Get ready...",
        ),
        GameStatus::LevelComplete => (
            format!("LEVEL {} COMPLETE", state.level.saturating_sub(1)),
            Color::Green,
            "Next level incoming",
        ),
        GameStatus::GameOver => (
            "GAME  OVER".to_string(),
            Color::Red,
            "R - Play Again  M - Menu  Q - Quit",
        ),
        GameStatus::GameComplete => (
            "NEBULA CLEARED!".to_string(),
            Color::Yellow,
            "R - Play Again  M - Menu  Q - Quit",
        ),
        GameStatus::Menu | GameStatus::Playing => return Ok(()),
    };

    let inner = format!("  {title}  ");
    let bar = "═".repeat(inner.chars().count());
    let score_line = format!("Score: {:>7}", state.score);
    let best_line = if state.score >= state.high_score && state.score > 0 {
        format!("★ NEW BEST: {:>7} ★", state.score)
    } else {
        format!("Best Score:  {:>7}", state.high_score)
    };

    let lines: Vec<(String, Color)> = vec![
        (format!("╔{bar}╗"), color),
        (format!("║{inner}║"), color),
        (format!("╚{bar}╝"), color),
        (score_line, Color::Yellow),
        (best_line, Color::DarkGrey),
        (hint.to_string(), Color::White),
    ];

    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, c)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*c))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn boss_name(state: &GameState) -> String {
    level_config(state.level)
        .boss
        .map(|b| b.name.to_uppercase())
        .unwrap_or_else(|| "THE BOSS".to_string())
}
