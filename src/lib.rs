//! Simon core crate.
//!
//! The game logic lives in [`engine`]: a state machine that grows a random
//! sequence one step per round, plays it back through a [`Presenter`], and
//! judges the player's clicks. Delays are [`Timer`]s handed to a
//! [`Scheduler`]; [`TimerQueue`] is the virtual-clock scheduler used both by
//! the browser board (driven by `requestAnimationFrame`) and by native tests.
//!
//! `start_game()` boots the canvas board with the classic configuration;
//! `start_game_with_config(json)` accepts overrides.

use wasm_bindgen::prelude::*;

mod board;
mod diag;

pub mod config;
pub mod engine;
pub mod scheduler;

pub use config::{ConfigError, MAX_SQUARES, SimonConfig};
pub use engine::{
    ClickOutcome, GamePhase, IDLE_COUNTER, LOSE_COUNTER, Presenter, START_LABEL, STOP_LABEL,
    SequenceEngine, WIN_COUNTER,
};
pub use scheduler::{Scheduler, Timer, TimerId, TimerQueue};

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
// Entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    board::start_board(SimonConfig::default())
}

/// Boot with a JSON config object; omitted fields keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = SimonConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    board::start_board(config)
}

/// Milliseconds on the page clock; 0 outside a browser.
pub(crate) fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Seed for the sequence RNG: browser/OS entropy when available, else the clock.
pub(crate) fn entropy_seed() -> u64 {
    #[cfg(feature = "rng")]
    {
        let mut buf = [0u8; 8];
        if getrandom::getrandom(&mut buf).is_ok() {
            return u64::from_le_bytes(buf);
        }
    }
    clock_seed()
}

#[cfg(target_family = "wasm")]
fn clock_seed() -> u64 {
    // microsecond bits of the page clock through one LCG step
    ((performance_now() * 1_000.0) as u64)
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407)
}

#[cfg(not(target_family = "wasm"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
