//! Browser board: draws the four squares and the center action button on a
//! canvas, routes clicks into the [`SequenceEngine`], and pumps the engine's
//! timers from a `requestAnimationFrame` loop.
//!
//! The engine is stored in a thread-local (the browser is single-threaded) so
//! event listeners and the frame callback can reach it. Scheduled timers live
//! in a [`TimerQueue`] whose clock is the page's `performance.now()`; every
//! frame advances it to the frame timestamp, which fires whatever came due.
use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, window};

use crate::config::{MAX_SQUARES, SimonConfig};
use crate::diag::{console_log, console_warn};
use crate::engine::{Presenter, SequenceEngine};
use crate::performance_now;
use crate::scheduler::TimerQueue;

mod audio;
mod layout;

use audio::Tones;
use layout::{BoardLayout, CLASSIC_LAYOUT, Hit, SQUARE_STYLES, blink_alpha};

const CANVAS_ID: &str = "simon-canvas";
/// Length of the action button blink on click (ms).
const BUTTON_BLINK_MS: f64 = 400.0;

#[derive(Clone, Copy, Debug)]
struct Flash {
    start_ms: f64,
    duration_ms: f64,
}

impl Flash {
    fn alpha(slot: Option<Flash>, now: f64) -> f64 {
        slot.map(|f| blink_alpha(now - f.start_ms, f.duration_ms)).unwrap_or(1.0)
    }
}

/// Presenter backed by canvas state; the frame loop reads it to draw.
struct CanvasPresenter {
    flashes: [Option<Flash>; MAX_SQUARES as usize],
    button_blink: Option<Flash>,
    input_enabled: bool,
    counter_text: String,
    button_text: String,
    tones: Tones,
}

impl CanvasPresenter {
    fn new() -> Self {
        Self {
            flashes: [None; MAX_SQUARES as usize],
            button_blink: None,
            input_enabled: false,
            counter_text: String::new(),
            button_text: String::new(),
            tones: Tones::new(),
        }
    }

    fn square_alpha(&self, index: u8, now: f64) -> f64 {
        Flash::alpha(self.flashes[index as usize], now)
    }

    fn button_alpha(&self, now: f64) -> f64 {
        Flash::alpha(self.button_blink, now)
    }
}

impl Presenter for CanvasPresenter {
    fn render_flash(&mut self, square: u8, duration_ms: u32) {
        let Some(style) = SQUARE_STYLES.get(square as usize) else {
            return;
        };
        self.flashes[square as usize] =
            Some(Flash { start_ms: performance_now(), duration_ms: duration_ms as f64 });
        self.tones.play(style.tone_hz, duration_ms);
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn set_counter_text(&mut self, text: &str) {
        self.counter_text = text.to_string();
    }

    fn set_button_text(&mut self, text: &str) {
        self.button_text = text.to_string();
    }
}

/// Runtime board state.
struct BoardState {
    ctx: CanvasRenderingContext2d,
    layout: BoardLayout,
    engine: SequenceEngine<CanvasPresenter, TimerQueue>,
}

thread_local! {
    static BOARD_STATE: RefCell<Option<BoardState>> = const { RefCell::new(None) };
}

/// Create (or reuse) the canvas, build the engine, and play the intro.
/// Listeners and the frame loop are installed on the first call only; later
/// calls swap in a fresh engine.
pub fn start_board(config: SimonConfig) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let layout = CLASSIC_LAYOUT;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(CANVAS_ID);
        c.set_width(layout.canvas_size as u32);
        c.set_height(layout.canvas_size as u32);
        c.set_attribute("style", "position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); border-radius:12px;").ok();
        let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
        body.append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");

    let mut engine = SequenceEngine::new(config, CanvasPresenter::new(), TimerQueue::new(performance_now()));
    engine.intro();
    console_log!(
        "simon: board ready ({} steps, strict={})",
        engine.config().max_steps,
        engine.is_strict()
    );

    let board = BoardState { ctx, layout, engine };
    let first_boot = BOARD_STATE.with(|b| b.replace(Some(board)).is_none());
    if first_boot {
        install_click_listener(&canvas)?;
        start_board_loop();
    }
    Ok(())
}

fn install_click_listener(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let canvas_click = canvas.clone();
    let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
        // offset coordinates are in CSS pixels; rescale if the canvas is stretched
        let scale = canvas_click.width() as f64 / canvas_click.client_width().max(1) as f64;
        let x = evt.offset_x() as f64 * scale;
        let y = evt.offset_y() as f64 * scale;
        let now = performance_now();
        BOARD_STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                handle_click(state, x, y, now);
            }
        });
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn handle_click(state: &mut BoardState, x: f64, y: f64, now: f64) {
    // fire anything already due so the click sees the current phase
    state.engine.advance_to(now);
    let square_count = state.engine.config().square_count;
    match state.layout.hit_test(x, y, square_count) {
        Some(Hit::ActionButton) => {
            let presenter = state.engine.presenter_mut();
            presenter.tones.resume();
            presenter.button_blink = Some(Flash { start_ms: now, duration_ms: BUTTON_BLINK_MS });
            state.engine.on_action_button();
        }
        Some(Hit::Square(index)) => {
            if !state.engine.presenter().input_enabled {
                return;
            }
            let outcome = state.engine.on_square_clicked(index);
            console_log!("simon: {} -> {:?}", SQUARE_STYLES[index as usize].name, outcome);
        }
        Some(Hit::Ring) | None => {}
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_board_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        BOARD_STATE.with(|state_cell| {
            if let Some(state) = state_cell.borrow_mut().as_mut() {
                board_tick(state, ts);
            }
        });
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(callback: &FrameCallback) {
    let Some(w) = window() else {
        return;
    };
    if let Some(cb) = callback.borrow().as_ref() {
        if let Err(e) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            console_warn!("simon: requestAnimationFrame failed: {e:?}");
        }
    }
}

// --- Tick & Rendering -------------------------------------------------------

fn board_tick(state: &mut BoardState, now: f64) {
    state.engine.advance_to(now);
    render_board(state, now);
}

fn render_board(state: &BoardState, now: f64) {
    let ctx = &state.ctx;
    let l = &state.layout;
    let presenter = state.engine.presenter();

    ctx.set_global_alpha(1.0);
    ctx.set_fill_style(&JsValue::from_str(l.background));
    ctx.fill_rect(0.0, 0.0, l.canvas_size, l.canvas_size);

    for index in 0..state.engine.config().square_count {
        let (x, y) = l.square_origin(index);
        ctx.set_global_alpha(presenter.square_alpha(index, now));
        ctx.set_fill_style(&JsValue::from_str(SQUARE_STYLES[index as usize].color));
        ctx.fill_rect(x, y, l.square_size, l.square_size);
    }
    ctx.set_global_alpha(1.0);

    let (cx, cy) = l.center();
    fill_circle(ctx, cx, cy, l.ring_radius(), l.background);
    ctx.set_global_alpha(presenter.button_alpha(now));
    fill_circle(ctx, cx, cy, l.circle_radius, l.circle_color);
    ctx.set_global_alpha(1.0);

    ctx.set_fill_style(&JsValue::from_str(l.text_color));
    ctx.set_font(l.counter_font);
    ctx.fill_text(&presenter.counter_text, cx, cy).ok();
    let (lx, ly) = l.label_position();
    ctx.set_font(l.label_font);
    ctx.fill_text(&presenter.button_text, lx, ly).ok();
}

fn fill_circle(ctx: &CanvasRenderingContext2d, cx: f64, cy: f64, radius: f64, color: &str) {
    ctx.begin_path();
    ctx.set_fill_style(&JsValue::from_str(color));
    if ctx.arc(cx, cy, radius, 0.0, std::f64::consts::TAU).is_ok() {
        ctx.fill();
    }
}
