use std::cell::Cell;
use std::rc::Rc;

use crossing_game::entities::HelperKind;
use crossing_game::resources::{all_sprite_keys, helper_sprite, SpriteStore};

#[test]
fn load_populates_every_known_key() {
    let mut store = SpriteStore::new();
    store.load(&all_sprite_keys());
    for key in all_sprite_keys() {
        assert!(store.get(key).is_some(), "missing sprite for {key}");
    }
}

#[test]
fn every_helper_kind_has_a_loaded_sprite() {
    let mut store = SpriteStore::new();
    store.load(&all_sprite_keys());
    for kind in HelperKind::ALL {
        assert!(store.get(helper_sprite(kind)).is_some());
    }
}

#[test]
fn get_unknown_key_is_none() {
    let mut store = SpriteStore::new();
    assert!(store.get("enemy-bug").is_none()); // nothing loaded yet
    store.load(&all_sprite_keys());
    assert!(store.get("no-such-sprite").is_none());
}

#[test]
fn on_ready_fires_when_load_completes() {
    let mut store = SpriteStore::new();
    let fired = Rc::new(Cell::new(0));
    let observer = Rc::clone(&fired);
    store.on_ready(move || observer.set(observer.get() + 1));
    assert_eq!(fired.get(), 0); // not yet loaded

    store.load(&all_sprite_keys());
    assert_eq!(fired.get(), 1);

    // A reload must not re-fire an already-consumed callback
    store.load(&all_sprite_keys());
    assert_eq!(fired.get(), 1);
}

#[test]
fn on_ready_fires_immediately_once_loaded() {
    let mut store = SpriteStore::new();
    store.load(&all_sprite_keys());

    let fired = Rc::new(Cell::new(0));
    let observer = Rc::clone(&fired);
    store.on_ready(move || observer.set(observer.get() + 1));
    assert_eq!(fired.get(), 1);
}
