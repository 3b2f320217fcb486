// Square tones through the Web Audio API: one short oscillator note per flash.

use web_sys::{AudioContext, OscillatorType};

/// Peak gain of a square tone.
const TONE_VOLUME: f32 = 0.35;
/// Attack ramp at the start of each note (s).
const ATTACK_S: f64 = 0.01;

/// Wraps the Web Audio context. Browsers may refuse to create one before a
/// user gesture; in that case every call is silently skipped.
pub struct Tones {
    ctx: Option<AudioContext>,
}

impl Tones {
    pub fn new() -> Self {
        Self { ctx: AudioContext::new().ok() }
    }

    /// Play `frequency` Hz for `duration_ms`.
    pub fn play(&self, frequency: f32, duration_ms: u32) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        let Ok(oscillator) = ctx.create_oscillator() else {
            return;
        };
        let Ok(gain_node) = ctx.create_gain() else {
            return;
        };

        oscillator.set_type(OscillatorType::Triangle);
        oscillator.frequency().set_value(frequency);
        gain_node.gain().set_value(0.0);

        let now = ctx.current_time();
        let end = now + duration_ms as f64 / 1000.0;
        let _ = gain_node.gain().linear_ramp_to_value_at_time(TONE_VOLUME, now + ATTACK_S);
        let _ = gain_node.gain().linear_ramp_to_value_at_time(0.0, end);

        let _ = oscillator.connect_with_audio_node(&gain_node);
        let _ = gain_node.connect_with_audio_node(&ctx.destination());
        let _ = oscillator.start();
        let _ = oscillator.stop_with_when(end);
    }

    /// Resume a context the browser suspended until the first click.
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }
}
