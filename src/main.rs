mod display;

use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;

use crossing_game::compute::{handle_input, init_state, tick, SESSION_SECONDS};
use crossing_game::entities::{Direction, GameState, GameStatus};
use crossing_game::resources::{all_sprite_keys, SpriteStore};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// Map a pressed key to a movement command.  Anything else is ignored by
/// the engine.
fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
        _ => None,
    }
}

// ── Start screen ──────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  BUG  CROSSING  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(8),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let rules: &[&str] = &[
        "Cross the stone lanes and dodge the bugs.",
        "Getting hit or falling in the water costs a life.",
        "Grab the items that appear on the field:",
    ];
    for (i, line) in rules.iter().enumerate() {
        out.queue(cursor::MoveTo(cx.saturating_sub(24), cy.saturating_sub(6) + i as u16))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(*line))?;
    }

    let item_info: &[(&str, Color, &str)] = &[
        ("♥", Color::Magenta, " Heart      — +1 life"),
        ("◆", Color::DarkYellow, " Orange gem — slows the bugs to a third"),
        ("◆", Color::Green, " Green gem  — +10 points"),
        ("◆", Color::Cyan, " Blue gem   — +20 points"),
        ("●", Color::Grey, " Rock       — −1 life"),
    ];
    for (i, (sym, color, desc)) in item_info.iter().enumerate() {
        let row = cy.saturating_sub(2) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(22), row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*sym))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(*desc))?;
    }

    let clock_line = format!("You have {} seconds and 5 lives.", SESSION_SECONDS);
    out.queue(cursor::MoveTo(
        cx.saturating_sub(clock_line.chars().count() as u16 / 2),
        cy + 4,
    ))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(&clock_line))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(18), cy + 6))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("ENTER / S : Start   Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the player makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. })) => match code {
                KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('S') => {
                    return Ok(MenuResult::Start);
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            },
            Ok(_) => {}
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Each frame drains the pending key events (a press is one discrete
/// step — movement is event-driven, not held), computes `dt` as the
/// wall-clock delta since the previous frame, runs one simulation tick,
/// and renders.  Once the session ends no further ticks or frames are
/// scheduled; the loop blocks waiting for retry/quit.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    sprites: &SpriteStore,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            if kind != KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(true),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(true);
                }
                _ => {
                    if let Some(direction) = direction_for(code) {
                        *state = handle_input(state, direction);
                    }
                }
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f64();
        last = now;

        *state = tick(state, dt, &mut rng);

        display::render(out, state, sprites)?;

        if let GameStatus::GameOver(_) = state.status {
            return wait_for_restart(rx);
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

/// The end screen stays up until the player picks retry or quit.
fn wait_for_restart(rx: &mpsc::Receiver<Event>) -> std::io::Result<bool> {
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, modifiers, .. })) => {
                match code {
                    KeyCode::Char('r') | KeyCode::Char('R') => return Ok(false),
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(true),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(true);
                    }
                    _ => {}
                }
            }
            Ok(_) => {}
            Err(_) => return Ok(true),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    env_logger::init();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

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
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    let mut sprites = SpriteStore::new();
    sprites.on_ready(|| log::info!("sprite cache ready"));
    sprites.load(&all_sprite_keys());

    let mut rng = thread_rng();
    loop {
        match show_menu(out, rx)? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                let mut state = init_state(&mut rng);
                log::info!("session started: {} seconds on the clock", SESSION_SECONDS);
                let quit = game_loop(out, &mut state, rx, &sprites)?;
                if quit {
                    break;
                }
                // Otherwise loop back to the start screen
            }
        }
    }
    Ok(())
}
