mod display;

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};
use tracing_subscriber::filter::EnvFilter;

use butterfly_brawl::compute::{
    init_state, restart, set_target, shoot_at, start_at_level, tick, toggle_pause,
    trigger_special,
};
use butterfly_brawl::config::Settings;
use butterfly_brawl::entities::{Bounds, GameState, GameStatus};
use butterfly_brawl::events::{dispatch, AudioSink, GameEvent};
use butterfly_brawl::flutterers::{all_flutterers, starter, Flutterer};
use butterfly_brawl::levels::all_levels;
use butterfly_brawl::storage::{default_save_path, JsonFileStore, ProgressStats};

use display::Viewport;

#[derive(Parser)]
#[command(name = "butterfly_brawl")]
#[command(about = "Dodge and blast your way through the nebula as a butterfly")]
struct Args {
    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Flutterer id to preselect on the menu
    #[arg(long)]
    flutterer: Option<String>,
    /// Level to start runs at
    #[arg(long, default_value_t = 1)]
    start_level: u32,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Log filter directive used when RUST_LOG is unset, e.g. "butterfly_brawl=debug"
    #[arg(long)]
    log_filter: Option<String>,
}

// ── Held keys ─────────────────────────────────────────────────────────────────

/// World units the pointer target moves per frame while a direction key is held.
const KEY_STEP: f32 = 24.0;

/// Frames a press or repeat keeps a direction key down.  Terminals without
/// release events re-send the key at ≥ 15 Hz, which refreshes this window.
const HOLD_WINDOW: u64 = 4;

/// Any of `keys` pressed or repeated within the hold window.
fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    })
}

// ── Audio ─────────────────────────────────────────────────────────────────────

/// The terminal has no mixer: events are logged, and the important ones ring
/// the bell on the next frame.
#[derive(Default)]
struct TerminalAudio {
    bell: bool,
}

impl AudioSink for TerminalAudio {
    fn play(&mut self, event: &GameEvent) {
        debug!(sound = event.name(), "audio event");
        if matches!(
            event,
            GameEvent::PlayerHit | GameEvent::BossDefeated | GameEvent::GameOver
        ) {
            self.bell = true;
        }
    }
}

impl TerminalAudio {
    fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell)
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(&'static Flutterer),
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    stats: &ProgressStats,
    preselected: &'static Flutterer,
) -> Result<MenuResult> {
    let mut selected = preselected;

    loop {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
        let (width, height) = terminal::size()?;
        let cx = width / 2;
        let top = (height / 2).saturating_sub(10);

        let title = "✦  BUTTERFLY  NEBULA  BRAWL  ✦";
        out.queue(cursor::MoveTo(cx.saturating_sub(title.chars().count() as u16 / 2), top))?;
        out.queue(style::SetForegroundColor(Color::Magenta))?;
        out.queue(Print(title))?;

        let stats_line = format!(
            "Best: {}   Max level: {}/{}   Defeated: {}   Boss wins: {}",
            stats.high_score,
            stats.max_level,
            all_levels().len(),
            stats.enemies_defeated,
            stats.boss_defeats
        );
        out.queue(cursor::MoveTo(
            cx.saturating_sub(stats_line.chars().count() as u16 / 2),
            top + 1,
        ))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&stats_line))?;

        let left = cx.saturating_sub(30);
        out.queue(cursor::MoveTo(left, top + 3))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print("Choose your flutterer:"))?;

        for (i, f) in all_flutterers().iter().enumerate() {
            let row = top + 4 + i as u16;
            let key = (i + 1) % 10;
            let unlocked = f.unlock.is_met(stats);
            let marker = if std::ptr::eq(f, selected) { "▶" } else { " " };
            out.queue(cursor::MoveTo(left, row))?;
            out.queue(style::SetForegroundColor(Color::DarkGrey))?;
            out.queue(Print(format!("{marker}[{key}] ")))?;
            out.queue(style::SetForegroundColor(if unlocked { Color::Cyan } else { Color::DarkGrey }))?;
            out.queue(Print(format!("{:<26}", f.name)))?;
            out.queue(style::SetForegroundColor(Color::DarkGrey))?;
            let detail = if unlocked {
                format!(" spd ×{:.1}  hp {:>3}", f.speed, f.health)
            } else {
                format!(" locked ({:?})", f.unlock)
            };
            out.queue(Print(detail))?;
        }

        let legend_row = top + 5 + all_flutterers().len() as u16;
        out.queue(cursor::MoveTo(left, legend_row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print("Power-ups:  » speed   ◯ shield   ⚡ blaster   ✚ health"))?;
        out.queue(cursor::MoveTo(left, legend_row + 2))?;
        out.queue(Print("ENTER : Start   0-9 : Select   Q : Quit"))?;

        out.queue(style::ResetColor)?;
        out.flush()?;

        // Wait for a key
        let Ok(ev) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        if let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = ev
        {
            match code {
                KeyCode::Enter => return Ok(MenuResult::Start(selected)),
                KeyCode::Char(c @ '0'..='9') => {
                    let idx = (c as usize - '0' as usize + 9) % 10;
                    if let Some(f) = all_flutterers().get(idx) {
                        if f.unlock.is_met(stats) {
                            selected = f;
                        }
                    }
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// How a play session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionEnd {
    Quit,
    Menu,
    /// Play again with the same flutterer, skipping the menu.
    Restart,
}

/// Runs one play session until the player quits, restarts or heads back to the menu.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key, and each frame every key that is still
/// "fresh" nudges the pointer target.  The mouse sets the target directly and
/// a click fires at the clicked point.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    audio: &mut TerminalAudio,
    frame_time: Duration,
) -> Result<SessionEnd> {
    let ended = |status: GameStatus| matches!(status, GameStatus::GameOver | GameStatus::GameComplete);
    let dt = frame_time.as_secs_f32() * 1000.0;
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let (cols, rows) = terminal::size()?;
        let view = Viewport::new(cols, rows, state.width, state.height);

        // ── Input ─────────────────────────────────────────────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(SessionEnd::Quit);
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(SessionEnd::Quit);
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') if ended(state.status) => {
                                return Ok(SessionEnd::Restart);
                            }
                            KeyCode::Char('m') | KeyCode::Char('M') if ended(state.status) => {
                                return Ok(SessionEnd::Menu);
                            }
                            KeyCode::Char('p') | KeyCode::Char('P') => {
                                *state = toggle_pause(state);
                            }
                            KeyCode::Char(' ') => {
                                *state = trigger_special(state, rng);
                                dispatch(&state.events, audio);
                            }
                            KeyCode::Char('f') | KeyCode::Char('F') => {
                                let (cx, _) = state.player.center();
                                *state = shoot_at(state, cx, 0.0);
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    // Only reported with keyboard enhancement enabled
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent {
                    kind, column, row, ..
                }) => {
                    let (x, y) = view.to_world(column, row);
                    match kind {
                        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                            *state = set_target(state, x, y);
                        }
                        MouseEventKind::Down(MouseButton::Left) => {
                            *state = shoot_at(state, x, y);
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        // ── Apply held-key movement every frame ───────────────────────────────
        if state.status == GameStatus::Playing {
            let left = is_held(&key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame);
            let right = is_held(&key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame);
            let up = is_held(&key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame);
            let down = is_held(&key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame);

            if left || right || up || down {
                let p = &state.player;
                let mut tx = p.target_x + p.width / 2.0;
                let mut ty = p.target_y + p.height / 2.0;
                if left {
                    tx -= KEY_STEP;
                }
                if right {
                    tx += KEY_STEP;
                }
                if up {
                    ty -= KEY_STEP;
                }
                if down {
                    ty += KEY_STEP;
                }
                let tx = tx.clamp(0.0, state.width);
                let ty = ty.clamp(0.0, state.height);
                *state = set_target(state, tx, ty);
            }
        }

        *state = tick(state, dt, rng);
        dispatch(&state.events, audio);

        display::render(out, state, &view)?;
        if audio.take_bell() {
            out.queue(Print("\x07"))?;
            out.flush()?;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(settings: &Settings) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_path)
        .with_context(|| format!("opening log file {}", settings.log_path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref()).context("loading settings")?;
    if let Some(id) = &args.flutterer {
        settings.flutterer = id.clone();
    }
    if let Some(filter) = &args.log_filter {
        settings.log_filter = filter.clone();
    }
    let preselected = settings.flutterer()?;
    init_logging(&settings)?;

    let save_path = settings.save_path.clone().unwrap_or_else(default_save_path);
    let mut store = JsonFileStore::open(&save_path)
        .with_context(|| format!("opening save file {}", save_path.display()))?;
    info!(path = %save_path.display(), "progress store opened");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Release events need the kitty protocol; without it the hold window applies.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread; the frame loop polls the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(
        &mut out,
        &rx,
        &settings,
        &args,
        preselected,
        &mut store,
        &mut rng,
    );

    // Restore the terminal even when the run failed
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    settings: &Settings,
    args: &Args,
    preselected: &'static Flutterer,
    store: &mut JsonFileStore,
    rng: &mut StdRng,
) -> Result<()> {
    let mut stats = ProgressStats::load(&*store);
    let mut audio = TerminalAudio::default();
    let frame_time = Duration::from_millis(settings.frame_ms.max(1));
    let mut preselected = if preselected.unlock.is_met(&stats) {
        preselected
    } else {
        warn!(flutterer = preselected.id, "flutterer still locked, using the starter");
        starter()
    };

    loop {
        match show_menu(out, rx, &stats, preselected)? {
            MenuResult::Quit => break,
            MenuResult::Start(flutterer) => {
                preselected = flutterer;
                info!(flutterer = flutterer.id, "run started");
                let menu_state = init_state(
                    settings.width,
                    settings.height,
                    flutterer,
                    settings.starting_lives,
                    stats.high_score,
                );
                let mut state = start_at_level(&menu_state, args.start_level);
                dispatch(&state.events, &mut audio);

                let end = loop {
                    let end = game_loop(out, &mut state, rx, rng, &mut audio, frame_time)?;

                    // Persist progress whether the run ended or was abandoned
                    stats.record_session(&state);
                    if let Err(e) = stats.save(store) {
                        warn!(error = %e, "could not save progress");
                    }

                    if end != SessionEnd::Restart {
                        break end;
                    }
                    info!(flutterer = flutterer.id, score = state.score, "run restarted");
                    state = restart(&state);
                    dispatch(&state.events, &mut audio);
                };

                if end == SessionEnd::Quit {
                    break;
                }
            }
        }
    }
    Ok(())
}
