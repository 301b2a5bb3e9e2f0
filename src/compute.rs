/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, a time delta and an RNG handle) and
/// returns a brand-new `GameState`.  Side effects are limited to the
/// injected RNG and diagnostic logging.

use rand::Rng;

use crate::entities::{
    Countdown, Direction, Enemy, GameOverCause, GameState, GameStatus, Helper, HelperKind,
    Player, SlowEffect,
};

// ── Field geometry ───────────────────────────────────────────────────────────

/// Enemies wrap once their x passes this edge.
pub const FIELD_RIGHT_EDGE: f64 = 800.0;
/// Off-screen x an enemy restarts from after wrapping.
pub const ENEMY_SPAWN_X: f64 = -101.0;
/// The three stone-lane y values enemies travel along.
pub const ENEMY_LANES: [f64; 3] = [60.0, 145.0, 230.0];
pub const ENEMY_COUNT: usize = 4;
/// Enemy speeds are drawn uniformly from this range (units per second).
pub const ENEMY_SPEED_RANGE: std::ops::Range<f64> = 100.0..400.0;

pub const PLAYER_START_X: f64 = 300.0;
pub const PLAYER_START_Y: f64 = 400.0;
/// Discrete step sizes per directional input.
pub const STEP_X: f64 = 100.0;
pub const STEP_Y: f64 = 90.0;
/// Pre-move bounds: a step is taken only while the current position is
/// strictly inside these limits, so the boundary step can land one step
/// past them (that is how the player enters the water at y = −50).
pub const PLAYER_MAX_X: f64 = 700.0;
pub const PLAYER_MAX_Y: f64 = 375.0;

/// Candidate grid the helper item respawns onto.
pub const ITEM_COLS: [f64; 6] = [100.0, 200.0, 300.0, 400.0, 500.0, 600.0];
pub const ITEM_ROWS: [f64; 4] = [80.0, 160.0, 240.0, 320.0];
/// Where the helper sits between collection and respawn.
pub const HELPER_PARKED: (f64, f64) = (-100.0, -100.0);

/// Two entities touch when both axis-wise distances are strictly below this.
pub const COLLISION_RANGE: f64 = 50.0;

pub const STARTING_LIFE: u32 = 5;
pub const SESSION_SECONDS: u32 = 90;
pub const HELPER_RESPAWN_SECS: f64 = 5.0;
pub const SLOW_DURATION_SECS: f64 = 2.0;
pub const SLOW_FACTOR: f64 = 3.0;

// ── Constructors ─────────────────────────────────────────────────────────────

fn spawn_enemy(rng: &mut impl Rng) -> Enemy {
    Enemy {
        x: ENEMY_SPAWN_X,
        y: roll_lane(rng),
        speed: rng.gen_range(ENEMY_SPEED_RANGE),
    }
}

fn roll_lane(rng: &mut impl Rng) -> f64 {
    ENEMY_LANES[rng.gen_range(0..ENEMY_LANES.len())]
}

fn roll_helper_kind(rng: &mut impl Rng) -> HelperKind {
    HelperKind::ALL[rng.gen_range(0..HelperKind::ALL.len())]
}

/// Pick a fresh spot on the candidate grid, each axis independently.
fn item_position(rng: &mut impl Rng) -> (f64, f64) {
    let x = ITEM_COLS[rng.gen_range(0..ITEM_COLS.len())];
    let y = ITEM_ROWS[rng.gen_range(0..ITEM_ROWS.len())];
    (x, y)
}

fn start_player() -> Player {
    Player {
        x: PLAYER_START_X,
        y: PLAYER_START_Y,
    }
}

/// Build the initial state for one session: player at the start tile, four
/// enemies parked off-screen on random lanes with random speeds, the helper
/// parked off-screen until its first respawn, and the countdown armed.
pub fn init_state(rng: &mut impl Rng) -> GameState {
    GameState {
        player: start_player(),
        enemies: (0..ENEMY_COUNT).map(|_| spawn_enemy(rng)).collect(),
        helper: Helper {
            x: HELPER_PARKED.0,
            y: HELPER_PARKED.1,
            kind: roll_helper_kind(rng),
        },
        score: 0,
        life: STARTING_LIFE,
        status: GameStatus::Playing,
        helper_respawn_in: HELPER_RESPAWN_SECS,
        slow_effect: None,
        countdown: Countdown {
            remaining: SESSION_SECONDS,
            carry: 0.0,
        },
    }
}

// ── Input-driven state transitions (pure) ────────────────────────────────────

/// Move the player one discrete step.  The bound is checked against the
/// pre-move position, so the boundary step may land one step outside the
/// nominal field.
pub fn handle_input(state: &GameState, direction: Direction) -> GameState {
    let mut next = state.clone();
    match direction {
        Direction::Left if next.player.x > 0.0 => next.player.x -= STEP_X,
        Direction::Up if next.player.y > 0.0 => next.player.y -= STEP_Y,
        Direction::Right if next.player.x < PLAYER_MAX_X => next.player.x += STEP_X,
        Direction::Down if next.player.y < PLAYER_MAX_Y => next.player.y += STEP_Y,
        _ => {}
    }
    next
}

// ── Per-frame tick (nearly pure — RNG is injected) ───────────────────────────

/// Advance the simulation by one frame of `dt` wall-clock seconds.
///
/// Order per tick: timed effects (speed restore, helper respawn), enemy
/// motion, then the three proximity checks (enemies, water, helper), the
/// terminal life check, and finally the countdown.  Ticking a finished
/// session is an identity operation, which is what makes termination safe
/// against still-pending timers.
pub fn tick(state: &GameState, dt: f64, rng: &mut impl Rng) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let dt = dt.max(0.0);
    let mut next = state.clone();

    advance_slow_effect(&mut next, dt);
    advance_helper_respawn(&mut next, dt, rng);
    advance_enemies(&mut next, dt, rng);

    check_enemy_collisions(&mut next);
    check_destination(&mut next);
    check_helper_pickup(&mut next);

    if next.life == 0 {
        finish(&mut next, GameOverCause::LifeExhausted);
    }
    advance_countdown(&mut next, dt);

    next
}

/// Format remaining whole seconds as MM:SS for the HUD.
pub fn format_timer(total_seconds: u32) -> String {
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

// ── Entity motion ────────────────────────────────────────────────────────────

fn advance_enemies(state: &mut GameState, dt: f64, rng: &mut impl Rng) {
    for enemy in &mut state.enemies {
        enemy.x += enemy.speed * dt;
        // Off the right edge: restart just before the left edge on a
        // freshly randomized lane.
        if enemy.x > FIELD_RIGHT_EDGE {
            enemy.x = ENEMY_SPAWN_X;
            enemy.y = roll_lane(rng);
        }
    }
}

// ── Timed effects ────────────────────────────────────────────────────────────

fn advance_slow_effect(state: &mut GameState, dt: f64) {
    let expired = state
        .slow_effect
        .as_mut()
        .map(|effect| {
            effect.remaining -= dt;
            effect.remaining <= 0.0
        })
        .unwrap_or(false);
    if expired {
        if let Some(effect) = state.slow_effect.take() {
            for (enemy, original) in state.enemies.iter_mut().zip(effect.original_speeds) {
                enemy.speed = original;
            }
            log::debug!("enemy speeds restored");
        }
    }
}

fn advance_helper_respawn(state: &mut GameState, dt: f64, rng: &mut impl Rng) {
    state.helper_respawn_in -= dt;
    while state.helper_respawn_in <= 0.0 {
        state.helper_respawn_in += HELPER_RESPAWN_SECS;
        state.helper.kind = roll_helper_kind(rng);
        let (x, y) = item_position(rng);
        state.helper.x = x;
        state.helper.y = y;
        log::debug!("helper respawned: {:?} at ({}, {})", state.helper.kind, x, y);
    }
}

fn advance_countdown(state: &mut GameState, dt: f64) {
    state.countdown.carry += dt;
    while state.countdown.carry >= 1.0 && state.countdown.remaining > 0 {
        state.countdown.carry -= 1.0;
        state.countdown.remaining -= 1;
    }
    if state.countdown.remaining == 0 {
        finish(state, GameOverCause::TimeExpired);
    }
}

// ── Collision & effects ──────────────────────────────────────────────────────

fn within_reach(ax: f64, ay: f64, bx: f64, by: f64) -> bool {
    (ax - bx).abs() < COLLISION_RANGE && (ay - by).abs() < COLLISION_RANGE
}

/// Every enemy is tested against the player's current position, in order.
/// A hit resets the player to the start tile, so later enemies are tested
/// against the start tile and can trigger an independent second hit.
fn check_enemy_collisions(state: &mut GameState) {
    for i in 0..state.enemies.len() {
        let (ex, ey) = (state.enemies[i].x, state.enemies[i].y);
        if within_reach(state.player.x, state.player.y, ex, ey) {
            state.player = start_player();
            lose_life(state);
            log::debug!("hit by enemy, life {}", state.life);
        }
    }
}

/// Crossing the top boundary into the water resets the player and costs a
/// life, under the same guard as an enemy hit.
fn check_destination(state: &mut GameState) {
    if state.player.y < 0.0 {
        state.player = start_player();
        lose_life(state);
        log::debug!("reached the water, life {}", state.life);
    }
}

fn check_helper_pickup(state: &mut GameState) {
    if !within_reach(state.player.x, state.player.y, state.helper.x, state.helper.y) {
        return;
    }
    log::debug!("collected {:?}", state.helper.kind);
    match state.helper.kind {
        HelperKind::Heart => state.life += 1,
        HelperKind::GemOrange => arm_slow_effect(state),
        HelperKind::GemGreen => state.score += 10,
        HelperKind::GemBlue => state.score += 20,
        HelperKind::Rock => lose_life(state),
    }
    // Inert until the respawn timer relocates it.
    state.helper.x = HELPER_PARKED.0;
    state.helper.y = HELPER_PARKED.1;
}

fn lose_life(state: &mut GameState) {
    if state.life > 0 {
        state.life -= 1;
    }
}

fn arm_slow_effect(state: &mut GameState) {
    match state.slow_effect.as_mut() {
        // A second orange gem while slowed refreshes the window without
        // compounding the divide.
        Some(effect) => effect.remaining = SLOW_DURATION_SECS,
        None => {
            let original_speeds = state.enemies.iter().map(|e| e.speed).collect();
            for enemy in &mut state.enemies {
                enemy.speed /= SLOW_FACTOR;
            }
            state.slow_effect = Some(SlowEffect {
                remaining: SLOW_DURATION_SECS,
                original_speeds,
            });
        }
    }
}

// ── Termination ──────────────────────────────────────────────────────────────

/// End the session.  Idempotent: the first cause wins, so the life and
/// timer paths cannot double-trigger the end screen.
fn finish(state: &mut GameState, cause: GameOverCause) {
    if let GameStatus::GameOver(_) = state.status {
        return;
    }
    state.status = GameStatus::GameOver(cause);
    log::info!("game over ({:?}), final score {}", cause, state.score);
}
