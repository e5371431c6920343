//! Falling Words core crate.
//!
//! The letters of a Korean word fall across the play area; type the word
//! before the countdown runs out. Rounds chain while answers are correct and
//! the score resets on the first miss.
//!
//! Everything except [`dom`] is plain Rust and runs natively, which is how the
//! test suite exercises the round state machine. The browser page calls
//! [`init_game`] once, after which its buttons drive the game.

use wasm_bindgen::prelude::*;

#[macro_use]
mod log;

pub mod clock;
pub mod config;
pub mod dom;
pub mod game;
pub mod physics;
pub mod scheduler;
pub mod settings;
pub mod words;

pub use clock::{ClockEvent, RoundClock};
pub use config::GameConfig;
pub use game::{Game, Outcome, Phase, Rejected, Screen, SurfaceCommand, Verdict, WordSource};
pub use physics::{FallingLetter, LetterId};
pub use settings::{Difficulty, Preferences, Speed};
pub use words::WordBank;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Bind the page and show the start screen.
#[wasm_bindgen]
pub fn init_game() -> Result<(), JsValue> {
    dom::mount(GameConfig::default())
}

/// Like [`init_game`], with tuning overrides given as a JSON object.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn init_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    dom::mount(config)
}

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    dom::start()
}

#[wasm_bindgen]
pub fn restart_game() -> Result<(), JsValue> {
    dom::restart()
}

#[wasm_bindgen]
pub fn submit_answer() -> Result<(), JsValue> {
    dom::submit()
}

/// Store new preferences from the settings page. Unknown keys fall back to
/// the middle tier.
#[wasm_bindgen]
pub fn set_preferences(difficulty: &str, speed: &str) -> Result<(), JsValue> {
    dom::set_preferences(Preferences {
        difficulty: Difficulty::from_key(difficulty),
        speed: Speed::from_key(speed),
    })
}
