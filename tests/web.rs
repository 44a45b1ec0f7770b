//! Browser suite, run with `wasm-pack test --headless --firefox`
#![cfg(target_arch = "wasm32")]

use sven_herd::engine::audio::{Audio, Sound};
use sven_herd::game::{Herding, Phase, Turn};
use sven_herd::level::LevelConfig;
use sven_herd::map::{Direction, TileId};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

/// Stands in for the HtmlAudioElement mixer, autoplay is blocked headless
#[derive(Default)]
struct Mute;

impl Audio for Mute {
    fn play(&mut self, _sound: Sound) {}
    fn stop(&mut self, _sound: Sound) {}
    fn is_playing(&self, _sound: Sound) -> bool {
        false
    }
    fn fade(&mut self, _sound: Sound, _from: f32, _to: f32, _duration_ms: f32) {}
}

#[wasm_bindgen_test]
fn random_facing_uses_browser_entropy() {
    let facings: Vec<Direction> = (0..64).map(|_| Direction::random()).collect();
    let distinct = Direction::ALL
        .iter()
        .filter(|direction| facings.contains(direction))
        .count();
    assert!(distinct >= 2, "only saw {:?}", facings);
}

#[wasm_bindgen_test]
fn default_level_plays_a_move() {
    let mut herding = Herding::new(LevelConfig::default(), Box::new(Mute)).unwrap();
    herding.start();
    let start = herding.map().sven_pos().unwrap();

    herding.on_key_down("ArrowLeft");
    herding.on_key_up("ArrowLeft");
    assert!(matches!(herding.turn(), Turn::Moving { .. }));
    for _ in 0..40 {
        herding.update();
    }

    assert_eq!(herding.turn(), Turn::Idle);
    assert_eq!(herding.map().get_tile(start), Some(TileId::Empty));
    assert_eq!(herding.map().pos_by_id(TileId::Sven).len(), 1);
    assert_eq!(herding.phase(), Phase::Playing);
}
