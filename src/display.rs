/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crossing_game::compute::format_timer;
use crossing_game::entities::{GameOverCause, GameState, GameStatus};
use crossing_game::resources::{
    helper_sprite, Sprite, SpriteStore, ENEMY_SPRITE, GRASS_TILE, PLAYER_SPRITE, STONE_TILE,
    WATER_TILE,
};

// ── Board geometry ────────────────────────────────────────────────────────────

const BOARD_COLS: u16 = 8;
const BOARD_ROWS: u16 = 6;
/// Terminal cells per tile.
const CELL_W: u16 = 5;
const CELL_H: u16 = 2;
const BOARD_W: u16 = BOARD_COLS * CELL_W;
/// Row 0 is the HUD; the board starts below it.
const BOARD_TOP: u16 = 1;

/// Field units per tile column / row.
const FIELD_TILE_W: f64 = 101.0;
const FIELD_TILE_H: f64 = 83.0;
/// Entity y values sit above their tile row in field units; this shift
/// drops them onto the right visual row.
const ENTITY_Y_OFFSET: f64 = 63.0;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIFE: Color = Color::Red;
const C_HUD_TIMER: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

const FALLBACK_SPRITE: Sprite = Sprite {
    glyph: "?",
    color: Color::White,
};

fn sprite(sprites: &SpriteStore, key: &str) -> Sprite {
    sprites.get(key).copied().unwrap_or(FALLBACK_SPRITE)
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame: tile grid, then enemies, player and helper
/// in that order, then the HUD and, once the session has ended, the
/// game-over overlay.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    sprites: &SpriteStore,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_tiles(out, sprites)?;

    let bug = sprite(sprites, ENEMY_SPRITE);
    for enemy in &state.enemies {
        draw_entity(out, bug, enemy.x, enemy.y)?;
    }
    draw_entity(out, sprite(sprites, PLAYER_SPRITE), state.player.x, state.player.y)?;
    draw_entity(
        out,
        sprite(sprites, helper_sprite(state.helper.kind)),
        state.helper.x,
        state.helper.y,
    )?;

    draw_hud(out, state)?;
    draw_controls_hint(out)?;

    if let GameStatus::GameOver(cause) = state.status {
        draw_game_over(out, state, cause)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, BOARD_TOP + BOARD_ROWS * CELL_H + 2))?;
    out.flush()?;
    Ok(())
}

// ── Tile grid ─────────────────────────────────────────────────────────────────

fn tile_key(row: u16) -> &'static str {
    match row {
        0 => WATER_TILE,
        1..=3 => STONE_TILE,
        _ => GRASS_TILE,
    }
}

fn draw_tiles<W: Write>(out: &mut W, sprites: &SpriteStore) -> std::io::Result<()> {
    for row in 0..BOARD_ROWS {
        let tile = sprite(sprites, tile_key(row));
        out.queue(style::SetForegroundColor(tile.color))?;
        for sub in 0..CELL_H {
            out.queue(cursor::MoveTo(0, BOARD_TOP + row * CELL_H + sub))?;
            out.queue(Print(tile.glyph.repeat(BOARD_W as usize)))?;
        }
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Map continuous field coordinates onto a terminal cell.  Off-board
/// positions (the off-screen sentinel, the wrap origin) stay hidden.
fn cell_of(x: f64, y: f64) -> Option<(u16, u16)> {
    let col = x / FIELD_TILE_W;
    let row = (y + ENTITY_Y_OFFSET) / FIELD_TILE_H;
    if col < 0.0 || row < 0.0 || col >= BOARD_COLS as f64 || row >= BOARD_ROWS as f64 {
        return None;
    }
    let cx = (col * CELL_W as f64) as u16;
    let cy = BOARD_TOP + (row as u16) * CELL_H;
    Some((cx, cy))
}

fn draw_entity<W: Write>(out: &mut W, sprite: Sprite, x: f64, y: f64) -> std::io::Result<()> {
    if let Some((cx, cy)) = cell_of(x, y) {
        let width = sprite.glyph.chars().count() as u16;
        let cx = cx.min(BOARD_W.saturating_sub(width));
        out.queue(cursor::MoveTo(cx, cy))?;
        out.queue(style::SetForegroundColor(sprite.color))?;
        out.queue(Print(sprite.glyph))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    // Score — left
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {}", state.score)))?;

    // Timer — centre
    let timer_str = format_timer(state.countdown.remaining);
    let tx = (BOARD_W / 2).saturating_sub(timer_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(tx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_TIMER))?;
    out.queue(Print(&timer_str))?;

    // Life — right
    let life_str = format!("Life: {}", state.life);
    let lx = BOARD_W.saturating_sub(life_str.len() as u16);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIFE))?;
    out.queue(Print(&life_str))?;

    Ok(())
}

// ── Controls hint (below the board) ───────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, BOARD_TOP + BOARD_ROWS * CELL_H))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← ↑ → ↓ / WASD : Move   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    cause: GameOverCause,
) -> std::io::Result<()> {
    let box_lines: &[&str] = &[
        "╔══════════════════════╗",
        "║      GAME  OVER      ║",
        "╚══════════════════════╝",
    ];
    let cause_line = match cause {
        GameOverCause::LifeExhausted => "Out of lives!",
        GameOverCause::TimeExpired => "Time's up!",
    };
    let score_line = format!("Your final score is {}", state.score);
    let hint = "R - Play Again  Q - Quit";

    let cx = BOARD_W / 2;
    let start_row = BOARD_TOP + 2;

    for (i, msg) in box_lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(Color::Red))?;
        out.queue(Print(*msg))?;
    }

    let cause_row = start_row + box_lines.len() as u16;
    let col = cx.saturating_sub(cause_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, cause_row))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(cause_line))?;

    let score_row = cause_row + 1;
    let col = cx.saturating_sub(score_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, score_row))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&score_line))?;

    let hint_row = score_row + 1;
    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, hint_row))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;

    Ok(())
}
