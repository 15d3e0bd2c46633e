mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Instant;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pixel_quest::config::GameConfig;
use pixel_quest::entities::{GameEvent, GameStatus, Intent};
use pixel_quest::game::{Action, AudioNotifier, Game, InputFrame, SoundCue};
use pixel_quest::store::FileScoreStore;

use display::Overlay;

/// Frames a direction key stays down after its last press or repeat event.
/// Terminals without release events rely on auto-repeat (15 Hz or faster)
/// to keep refreshing it.
const HOLD_WINDOW: u64 = 8;

const UP_KEYS: [KeyCode; 3] = [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const DOWN_KEYS: [KeyCode; 3] = [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .is_some_and(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

// ── Audio ─────────────────────────────────────────────────────────────────────

/// Rings the terminal bell for the loud cues; collection and level-clear
/// sounds are dropped.
struct TerminalBell;

impl AudioNotifier for TerminalBell {
    fn notify(&mut self, cue: SoundCue) {
        if matches!(cue, SoundCue::Hit | SoundCue::GameOver) {
            let mut out = stdout();
            let _ = out.write_all(b"\x07").and_then(|_| out.flush());
        }
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Logs go to a file; the terminal is busy with the game.
fn init_logging(config: &GameConfig) {
    let file = match File::create(&config.log_file) {
        Ok(file) => file,
        Err(err) => {
            let path = config.log_file.display();
            eprintln!("pixel_quest: logging disabled, cannot open {path}: {err}");
            return;
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

// ── Game loop ─────────────────────────────────────────────────────────────────

type TerminalGame = Game<StdRng, FileScoreStore, TerminalBell>;

/// Runs until the player quits.
///
/// Direction keys are level-triggered through `key_frame` (last frame each
/// key was seen) so two held keys give a diagonal. Enter, Esc, P and M are
/// edge-triggered actions.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut TerminalGame,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> std::io::Result<()> {
    let frame_time = config.frame_duration();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut overlay = Overlay::default();
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut actions = Vec::new();

        // ── Input ─────────────────────────────────────────────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Enter | KeyCode::Char(' ') => actions.push(Action::Confirm),
                        KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('P') => {
                            actions.push(Action::Pause)
                        }
                        KeyCode::Char('m') | KeyCode::Char('M') => actions.push(Action::Menu),
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let intent = Intent {
            up: any_held(&key_frame, &UP_KEYS, frame),
            down: any_held(&key_frame, &DOWN_KEYS, frame),
            left: any_held(&key_frame, &LEFT_KEYS, frame),
            right: any_held(&key_frame, &RIGHT_KEYS, frame),
        };

        let now = Instant::now();
        let dt_ms = now.duration_since(last).as_secs_f32() * 1000.0;
        last = now;

        let was_start = game.state().status == GameStatus::Start;
        game.advance(&InputFrame { intent, actions }, dt_ms);

        if game.state().events.contains(&GameEvent::Victory) {
            overlay.victory = true;
        } else if was_start && game.state().status != GameStatus::Start {
            overlay.victory = false;
        }

        display::render(out, game.state(), &overlay)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let config_path = GameConfig::locate();
    let (config, config_error) = match GameConfig::load(&config_path) {
        Ok(config) => (config, None),
        Err(err) => (GameConfig::default(), Some(err)),
    };
    init_logging(&config);
    if let Some(err) = config_error {
        warn!(path = %config_path.display(), %err, "ignoring unreadable config");
    }

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let store = FileScoreStore::new(
        config
            .score_file
            .clone()
            .unwrap_or_else(FileScoreStore::default_path),
    );
    info!(path = %store.path().display(), fps = config.fps, "starting");
    let mut game = Game::new(rng, store, TerminalBell);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Release events where the terminal supports them; the hold window
    // covers the rest.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &mut game, &rx, &config);

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!(
        best = game.state().best_score,
        score_file = %game.store().path().display(),
        "exiting"
    );
    result
}
