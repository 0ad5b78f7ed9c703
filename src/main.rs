mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;

use space_defender::audio::{AudioService, NullAudio, MUSIC_LEVEL, MUSIC_MENU};
use space_defender::input::InputState;
use space_defender::level::{self, MAX_LEVEL};
use space_defender::save::{SaveData, SaveStore};
use space_defender::session::{GameSession, TickOutcome};
use space_defender::world::World;

use display::{FrameStore, Overlay, RenderCtx};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS
const DT: f32 = 0.016;

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈128 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

/// Build this frame's input snapshot from the held-key map.
fn input_snapshot(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> InputState {
    let held = |code: KeyCode| is_held(key_frame, &code, frame);
    InputState {
        left: held(KeyCode::Left) || held(KeyCode::Char('a')) || held(KeyCode::Char('A')),
        right: held(KeyCode::Right) || held(KeyCode::Char('d')) || held(KeyCode::Char('D')),
        jump: held(KeyCode::Char(' '))
            || held(KeyCode::Char('w'))
            || held(KeyCode::Char('W'))
            || held(KeyCode::Up),
        shoot: held(KeyCode::Char('x')) || held(KeyCode::Char('X')),
        shoot_up: held(KeyCode::Char('c')) || held(KeyCode::Char('C')),
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(u32),
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    save: &SaveData,
) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  SPACE  DEFENDER  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    if save.high_score > 0 {
        let hs_str = format!("Best Score: {}", save.high_score);
        out.queue(cursor::MoveTo(
            cx.saturating_sub(hs_str.chars().count() as u16 / 2),
            cy.saturating_sub(5),
        ))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&hs_str))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select level:"))?;

    for number in 1..=MAX_LEVEL {
        let row = cy.saturating_sub(1) + number as u16;
        let unlocked = number <= save.max_level_unlocked;
        let name = level::spec(number).map_or("?", |s| s.name);

        out.queue(cursor::MoveTo(cx.saturating_sub(12), row))?;
        if unlocked {
            out.queue(style::SetForegroundColor(Color::DarkGrey))?;
            out.queue(Print(format!("[{}] ", number)))?;
            out.queue(style::SetForegroundColor(Color::Green))?;
            out.queue(Print(format!("Level {} — {}", number, name)))?;
        } else {
            out.queue(style::SetForegroundColor(Color::DarkGrey))?;
            out.queue(Print(format!("[{}] Level {} — locked", number, number)))?;
        }
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy + 4))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(
        "← → / A D : Move   SPACE/W : Jump   X : Shoot   C : Shoot Up   Q : Quit",
    ))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        if let Ok(Event::Key(KeyEvent { code, kind, .. })) = rx.recv() {
            if kind == KeyEventKind::Release {
                continue;
            }
            match code {
                KeyCode::Char(c @ '1'..='9') => {
                    let number = c as u32 - '0' as u32;
                    if number <= MAX_LEVEL && number <= save.max_level_unlocked {
                        return Ok(MenuResult::Start(number));
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

// ── Per-level loop ────────────────────────────────────────────────────────────

enum LevelExit {
    /// Quit the whole program.
    Quit,
    /// Back to the menu (pause-quit, game over, or post-victory).
    ToMenu,
    /// Restart the same level.
    Retry,
    /// Level cleared; carry the score into the next one.
    Complete,
}

struct LevelOutcome {
    exit: LevelExit,
    score: i32,
    kills: u32,
    seconds: u64,
}

/// Run one level to completion.
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame we check which keys are still "fresh"
/// (within `HOLD_WINDOW` frames) and build the input snapshot from all of
/// them at once, so e.g. running, jumping and shooting combine freely.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire naturally after `HOLD_WINDOW` frames of
///   silence, which is shorter than the OS repeat interval, so the key stays
///   live while it is actively generating repeats.
fn run_level<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    store: &FrameStore,
    audio: &mut dyn AudioService,
    number: u32,
    carry_score: i32,
    high_score: i32,
) -> std::io::Result<LevelOutcome> {
    let Some(spec) = level::spec(number) else {
        return Ok(LevelOutcome {
            exit: LevelExit::ToMenu,
            score: carry_score,
            kills: 0,
            seconds: 0,
        });
    };

    let mut world = World::new();
    level::populate(&spec, &mut world);
    let mut session = GameSession::start(&spec, carry_score);

    let mut rng = thread_rng();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut paused = false;
    let mut overlay = Overlay::None;
    let started = Instant::now();

    let finish = |exit: LevelExit, session: &GameSession, started: Instant| LevelOutcome {
        exit,
        score: session.score,
        kills: session.enemies_killed,
        seconds: started.elapsed().as_secs(),
    };

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(finish(LevelExit::Quit, &session, started));
                        }
                        KeyCode::Esc if overlay == Overlay::None || overlay == Overlay::Paused => {
                            paused = !paused;
                            overlay = if paused { Overlay::Paused } else { Overlay::None };
                        }
                        KeyCode::Char('q') | KeyCode::Char('Q') => match overlay {
                            // Mid-game Q quits the program, overlay Q goes
                            // back to the menu.
                            Overlay::None => {
                                return Ok(finish(LevelExit::Quit, &session, started));
                            }
                            _ => {
                                return Ok(finish(LevelExit::ToMenu, &session, started));
                            }
                        },
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if overlay == Overlay::GameOver =>
                        {
                            return Ok(finish(LevelExit::Retry, &session, started));
                        }
                        KeyCode::Enter if overlay == Overlay::Victory => {
                            return Ok(finish(LevelExit::ToMenu, &session, started));
                        }
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

        // ── Simulation tick (skipped while paused) ────────────────────────────
        if !paused {
            let input = if overlay == Overlay::None {
                input_snapshot(&key_frame, frame)
            } else {
                InputState::idle()
            };
            match session.tick(&mut world, input, DT, &mut rng, &mut *audio) {
                TickOutcome::Running => {}
                TickOutcome::PlayerDead => {
                    // Keep ticking so the death animation plays out under
                    // the overlay.
                    overlay = Overlay::GameOver;
                }
                TickOutcome::LevelComplete => {
                    if session.level_number >= MAX_LEVEL {
                        overlay = Overlay::Victory;
                    } else {
                        return Ok(finish(LevelExit::Complete, &session, started));
                    }
                }
            }
        }

        let ctx = RenderCtx {
            world: &world,
            session: &session,
            high_score,
            level_name: spec.name,
            overlay,
        };
        display::render(out, store, &ctx)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    // Logging goes to a file so it never tears the alternate screen; off by
    // default, enabled by setting RUST_LOG.
    if std::env::var_os("RUST_LOG").is_some() {
        if let Ok(log_file) = File::create("space_defender.log") {
            env_logger::Builder::from_default_env()
                .target(env_logger::Target::Pipe(Box::new(log_file)))
                .init();
        }
    }

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    let store = FrameStore::new();
    let save_store = SaveStore::at(SaveStore::default_path());
    let mut save = save_store.load();
    let mut audio = NullAudio;

    loop {
        audio.play_music(MUSIC_MENU, save.music_volume);
        match show_menu(out, rx, &save)? {
            MenuResult::Quit => break,
            MenuResult::Start(start_level) => {
                let mut number = start_level;
                let mut carry_score = 0;
                audio.stop_music();
                audio.play_music(MUSIC_LEVEL, save.music_volume);

                let quit = loop {
                    let outcome =
                        run_level(out, rx, &store, &mut audio, number, carry_score, save.high_score)?;

                    save.total_enemies_killed += outcome.kills;
                    save.total_play_time += outcome.seconds;
                    save_store.update_high_score(&mut save, outcome.score);
                    if let Err(err) = save_store.save(&save) {
                        log::warn!("could not persist save data: {err}");
                    }

                    match outcome.exit {
                        LevelExit::Quit => break true,
                        LevelExit::ToMenu => break false,
                        LevelExit::Retry => continue,
                        LevelExit::Complete => {
                            number += 1;
                            carry_score = outcome.score;
                            save_store.unlock_level(&mut save, number);
                        }
                    }
                };

                audio.stop_music();
                if quit {
                    break;
                }
                // Otherwise loop back to the menu
            }
        }
    }
    Ok(())
}
