// Browser tests: `wasm-pack test --headless --firefox`.
// Native builds skip this file entirely.
#![cfg(target_arch = "wasm32")]

use simon::{ClickOutcome, GamePhase, Presenter, SequenceEngine, SimonConfig, TimerQueue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[derive(Default)]
struct Labels {
    counter: String,
}

impl Presenter for Labels {
    fn render_flash(&mut self, _square: u8, _duration_ms: u32) {}
    fn set_input_enabled(&mut self, _enabled: bool) {}
    fn set_counter_text(&mut self, text: &str) {
        self.counter = text.to_string();
    }
    fn set_button_text(&mut self, _text: &str) {}
}

#[wasm_bindgen_test]
fn browser_seeded_engine_plays_a_round() {
    let mut g = SequenceEngine::new(SimonConfig::default(), Labels::default(), TimerQueue::new(0.0));
    g.start();
    g.advance_by(1_000.0);
    assert_eq!(g.phase(), GamePhase::AwaitingPlayer);
    assert_eq!(g.presenter().counter, "1");
    let step = g.target()[0];
    assert!(step < 4);
    assert_eq!(g.on_square_clicked(step), ClickOutcome::RoundComplete);
}

#[wasm_bindgen_test]
fn start_game_builds_the_canvas() {
    simon::start_game().expect("board boots");
    let doc = web_sys::window().unwrap().document().unwrap();
    assert!(doc.get_element_by_id("simon-canvas").is_some());
}

#[cfg(feature = "serde_json")]
#[wasm_bindgen_test]
fn bad_config_is_reported_to_js() {
    let err = simon::start_game_with_config(r#"{ "square_count": 9 }"#).unwrap_err();
    assert!(err.as_string().unwrap_or_default().contains("square count"));
}
