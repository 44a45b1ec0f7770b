// ==================== Modules ====================
// src/
// ├── browser.rs : web-sys plumbing + log! macro
// ├── engine.rs  : game loop, renderer, sprite sheet
// │   └── engine/  animation, audio, input, tween
// ├── map.rs     : tile grid
// ├── level.rs   : level.json configuration
// ├── sprite/    : entity, sven, sheep
// ├── hud.rs     : score, timer, end screen
// └── game.rs    : input/action state machine
use wasm_bindgen::prelude::*;

#[macro_use]
mod browser;
pub mod engine;
pub mod game;
pub mod hud;
pub mod level;
pub mod map;
pub mod sprite;

use engine::GameLoop;
use game::SvenGame;

// ==================== Main Functions ====================
/// Main entry for Webassembly module
/// - installs the panic hook
/// - loads assets and starts the game loop
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();

    // wasm has no threads, the loop runs as a local task
    browser::spawn_local(async move {
        if let Err(err) = GameLoop::start(SvenGame::new()).await {
            log!("Could not start the game : {:#?}", err);
        }
    });

    Ok(())
}
