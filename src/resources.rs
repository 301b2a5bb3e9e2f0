/// Sprite cache — the terminal analogue of an image-resource cache.
///
/// The game asks for sprites by opaque key; this module owns the mapping
/// from key to drawable handle (a glyph plus a colour).  `load` populates
/// the cache up front, `on_ready` fires exactly once when every key is
/// available, and `get` tolerates being called any time after load.

use std::collections::HashMap;

use crossterm::style::Color;

use crate::entities::HelperKind;

pub const WATER_TILE: &str = "water-block";
pub const STONE_TILE: &str = "stone-block";
pub const GRASS_TILE: &str = "grass-block";
pub const ENEMY_SPRITE: &str = "enemy-bug";
pub const PLAYER_SPRITE: &str = "char-boy";

/// Sprite key for a helper item of the given kind.
pub fn helper_sprite(kind: HelperKind) -> &'static str {
    match kind {
        HelperKind::Heart => "heart",
        HelperKind::GemOrange => "gem-orange",
        HelperKind::GemGreen => "gem-green",
        HelperKind::GemBlue => "gem-blue",
        HelperKind::Rock => "rock",
    }
}

/// Every sprite key the game draws, handed to `load` up front.
pub fn all_sprite_keys() -> [&'static str; 10] {
    [
        WATER_TILE,
        STONE_TILE,
        GRASS_TILE,
        ENEMY_SPRITE,
        PLAYER_SPRITE,
        "heart",
        "gem-orange",
        "gem-green",
        "gem-blue",
        "rock",
    ]
}

/// A drawable handle: what the rendering layer actually prints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub glyph: &'static str,
    pub color: Color,
}

fn builtin(key: &str) -> Option<Sprite> {
    let sprite = match key {
        "water-block" => Sprite { glyph: "≈", color: Color::Blue },
        "stone-block" => Sprite { glyph: "░", color: Color::DarkGrey },
        "grass-block" => Sprite { glyph: "▒", color: Color::DarkGreen },
        "enemy-bug" => Sprite { glyph: "«@»", color: Color::Red },
        "char-boy" => Sprite { glyph: "☺", color: Color::White },
        "heart" => Sprite { glyph: "♥", color: Color::Magenta },
        "gem-orange" => Sprite { glyph: "◆", color: Color::DarkYellow },
        "gem-green" => Sprite { glyph: "◆", color: Color::Green },
        "gem-blue" => Sprite { glyph: "◆", color: Color::Cyan },
        "rock" => Sprite { glyph: "●", color: Color::Grey },
        _ => return None,
    };
    Some(sprite)
}

#[derive(Default)]
pub struct SpriteStore {
    sprites: HashMap<&'static str, Sprite>,
    ready: bool,
    pending: Vec<Box<dyn FnOnce()>>,
}

impl SpriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every listed key into the cache, then fire any queued
    /// readiness callbacks.  Keys without built-in art are skipped.
    pub fn load(&mut self, keys: &[&'static str]) {
        for &key in keys {
            if let Some(sprite) = builtin(key) {
                self.sprites.insert(key, sprite);
            }
        }
        self.ready = true;
        for callback in self.pending.drain(..) {
            callback();
        }
    }

    /// Invoke `callback` exactly once when all sprites are available:
    /// immediately if `load` has already run, otherwise when it does.
    pub fn on_ready<F: FnOnce() + 'static>(&mut self, callback: F) {
        if self.ready {
            callback();
        } else {
            self.pending.push(Box::new(callback));
        }
    }

    /// Look up a loaded sprite.
    pub fn get(&self, key: &str) -> Option<&Sprite> {
        self.sprites.get(key)
    }
}
