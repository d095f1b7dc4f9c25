mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
    ExecutableCommand,
};
use log::{error, info};
use rand::thread_rng;

use cat_hero::assets::{AssetStore, DEFAULT_ASSET_DIR, LOAD_TIMEOUT};
use cat_hero::config::GameConfig;
use cat_hero::engine::{GameEngine, GameStatus};
use cat_hero::events::GameEvent;
use cat_hero::input::InputState;
use cat_hero::records::Records;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// Longest delta fed to the engine; a stalled frame must not teleport
/// enemies onto the player.
const MAX_DT: Duration = Duration::from_millis(100);

/// How long a feedback message stays on screen.
const MESSAGE_TIME: Duration = Duration::from_millis(2000);

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// OS key-repeat refreshes the key well before the window expires.
const HOLD_WINDOW: u64 = 8;

const LOG_FILE: &str = "cat_hero.log";

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

fn held_input(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> InputState {
    InputState {
        up: any_held(key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame),
        down: any_held(key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame),
        left: any_held(key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
        right: any_held(key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is in raw mode while playing, so logs go to a file.
fn init_logging() {
    let file = match std::fs::File::create(LOG_FILE) {
        Ok(file) => file,
        Err(_) => return,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

// ── Records ───────────────────────────────────────────────────────────────────

fn update_records(records: &mut Records, engine: &GameEngine, status: GameStatus) {
    let victory_time = match status {
        GameStatus::Victory => Some(engine.total_time),
        GameStatus::GameOver => None,
        _ => return,
    };
    if records.record_run(engine.total_kills, victory_time) {
        if let Err(e) = records.save(&Records::default_path()) {
            error!("could not save records: {}", e);
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: instead of acting on each key event individually, we keep
/// a `key_frame` map of the frame each key was last pressed or repeated.
/// Movement reads which keys are still "fresh" every frame, so diagonal
/// movement and attacking while running work together. One-shot actions
/// (attack, pause, menu navigation) fire on the press itself.
fn game_loop<W: Write>(
    out: &mut W,
    engine: &mut GameEngine,
    assets: &AssetStore,
    records: &mut Records,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut message: Option<(String, Duration)> = None;
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last).min(MAX_DT);
        last = frame_start;
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Esc => engine.toggle_pause(),
                        KeyCode::Char(' ') => {
                            engine.perform_attack(&mut rng);
                        }
                        KeyCode::Enter => match engine.status {
                            GameStatus::Menu | GameStatus::GameOver | GameStatus::Victory => {
                                engine.start_new_game(&mut rng);
                            }
                            GameStatus::LevelComplete => engine.next_level(&mut rng),
                            _ => {}
                        },
                        KeyCode::Char('m') | KeyCode::Char('M') => engine.exit_to_menu(),
                        _ => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let (width, height) = terminal::size()?;
        let (view_w, view_h) = display::viewport_for(width, height);
        engine.set_viewport(view_w, view_h);

        let input = held_input(&key_frame, frame);
        engine.update(dt, &input, &mut rng);

        for event in engine.drain_events() {
            match event {
                GameEvent::Message(text) => message = Some((text, MESSAGE_TIME)),
                GameEvent::StatusChanged { to, .. } => update_records(records, engine, to),
                _ => {}
            }
        }
        message = message
            .and_then(|(text, left)| Some((text, left.checked_sub(dt)?)))
            .filter(|(_, left)| !left.is_zero());

        let view = display::View {
            width,
            height,
            message: message.as_ref().map(|(text, _)| text.as_str()),
            records,
        };
        display::render(out, engine, assets, &view)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn load_config() -> std::io::Result<GameConfig> {
    match std::env::args().nth(1) {
        Some(path) => GameConfig::load(&path)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())),
        None => Ok(GameConfig::default()),
    }
}

fn main() -> std::io::Result<()> {
    init_logging();

    // Fail on a bad config before the terminal is taken over.
    let config = load_config()?;
    let asset_dir = std::env::var("CAT_HERO_ASSETS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_ASSET_DIR));
    let assets = AssetStore::load_with_timeout(asset_dir, LOAD_TIMEOUT);
    let mut records = Records::load(&Records::default_path());
    let mut engine = GameEngine::new(config);
    info!("starting with {} sprites loaded", assets.len());

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut out, &mut engine, &assets, &mut records, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        error!("terminal error: {}", e);
    }
    result
}
