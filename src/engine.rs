//! Sequence state machine: grows the target one random step per round, plays
//! it back, checks the player's clicks, and resolves rounds into another
//! round, a retry, a loss, or a win.
//!
//! The engine never waits. Every delay (playback cadence, pause between
//! rounds) is a [`Timer`] handed to the [`Scheduler`]; the host delivers it
//! back through [`SequenceEngine::fire`]. Handles of outstanding timers are
//! tracked so a restart can cancel them, and anything that fires without
//! being tracked is dropped.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimonConfig;
use crate::scheduler::{Scheduler, Timer, TimerId, TimerQueue};

pub const START_LABEL: &str = "Start";
pub const STOP_LABEL: &str = "Stop";
pub const IDLE_COUNTER: &str = "-";
pub const WIN_COUNTER: &str = "WIN";
pub const LOSE_COUNTER: &str = "LOSE";

/// Output side of the game, implemented by the host (canvas, test recorder).
pub trait Presenter {
    /// Light (and sound) a square for `duration_ms`. Fire-and-forget.
    fn render_flash(&mut self, square: u8, duration_ms: u32);
    /// Enable or disable click delivery for all squares.
    fn set_input_enabled(&mut self, enabled: bool);
    fn set_counter_text(&mut self, text: &str);
    fn set_button_text(&mut self, text: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Idle,
    /// Engine is flashing the target; input disabled.
    PlayingBack,
    AwaitingPlayer,
    Won,
    Lost,
}

/// What a square click did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Not accepting input right now, or the index is off the board.
    Ignored,
    /// Correct so far; the round continues.
    Accepted,
    /// Whole sequence reproduced; the next round follows after a pause.
    RoundComplete,
    Mistake,
    Won,
}

/// Flash requests for `sequence` at `cadence_ms`, starting `offset_ms` from
/// now, and the offset at which that playback is over.
fn playback_plan(sequence: &[u8], cadence_ms: u32, offset_ms: u32) -> (Vec<(u32, Timer)>, u32) {
    let at = |i: usize| offset_ms.saturating_add(cadence_ms.saturating_mul(i as u32 + 1));
    let plan = sequence.iter().enumerate().map(|(i, &sq)| (at(i), Timer::Flash(sq))).collect();
    (plan, at(sequence.len()))
}

pub struct SequenceEngine<P, S, R = StdRng> {
    config: SimonConfig,
    presenter: P,
    scheduler: S,
    rng: R,
    phase: GamePhase,
    target: Vec<u8>,
    input: Vec<u8>,
    input_enabled: bool,
    pending: Vec<TimerId>,
}

impl<P: Presenter, S: Scheduler> SequenceEngine<P, S, StdRng> {
    /// Engine with a sequence RNG seeded from browser/OS entropy.
    pub fn new(config: SimonConfig, presenter: P, scheduler: S) -> Self {
        Self::with_rng(config, presenter, scheduler, StdRng::seed_from_u64(crate::entropy_seed()))
    }
}

impl<P: Presenter, S: Scheduler, R: Rng> SequenceEngine<P, S, R> {
    /// `config` is expected to be validated (see [`SimonConfig::validated`]).
    pub fn with_rng(config: SimonConfig, presenter: P, scheduler: S, rng: R) -> Self {
        debug_assert!(config.validate().is_ok(), "engine built from invalid config");
        let mut engine = Self {
            config,
            presenter,
            scheduler,
            rng,
            phase: GamePhase::Idle,
            target: Vec::new(),
            input: Vec::new(),
            input_enabled: false,
            pending: Vec::new(),
        };
        engine.presenter.set_counter_text(IDLE_COUNTER);
        engine.presenter.set_button_text(START_LABEL);
        engine.presenter.set_input_enabled(false);
        engine
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn target(&self) -> &[u8] {
        &self.target
    }

    pub fn input(&self) -> &[u8] {
        &self.input
    }

    pub fn is_strict(&self) -> bool {
        self.config.strict_mode
    }

    /// Whether square clicks are currently accepted.
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Number of scheduled timers that have neither fired nor been cancelled.
    pub fn pending_timers(&self) -> usize {
        self.pending.len()
    }

    pub fn config(&self) -> &SimonConfig {
        &self.config
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Play the intro pattern. Only while idle; returns false otherwise.
    pub fn intro(&mut self) -> bool {
        if self.phase != GamePhase::Idle {
            return false;
        }
        self.cancel_pending();
        self.set_input(false);
        let (plan, _) = playback_plan(&self.config.intro_sequence, self.config.intro_ms, 0);
        self.submit(plan);
        true
    }

    /// Begin a new game, abandoning any game in progress.
    pub fn start(&mut self) {
        tracing::debug!(previous = ?self.phase, "starting game");
        self.cancel_pending();
        self.target.clear();
        self.input.clear();
        self.presenter.set_button_text(STOP_LABEL);
        self.set_input(false);
        self.advance_round();
    }

    /// Abandon the current game. Idempotent.
    pub fn stop(&mut self) {
        if self.phase != GamePhase::Idle {
            tracing::debug!(previous = ?self.phase, round = self.target.len(), "stopping game");
        }
        self.cancel_pending();
        self.target.clear();
        self.input.clear();
        self.phase = GamePhase::Idle;
        self.set_input(false);
        self.presenter.set_button_text(START_LABEL);
        self.presenter.set_counter_text(IDLE_COUNTER);
    }

    /// Center button: stops a running game, starts one otherwise.
    pub fn on_action_button(&mut self) {
        match self.phase {
            GamePhase::PlayingBack | GamePhase::AwaitingPlayer => self.stop(),
            GamePhase::Idle | GamePhase::Won | GamePhase::Lost => self.start(),
        }
    }

    pub fn on_square_clicked(&mut self, index: u8) -> ClickOutcome {
        if self.phase != GamePhase::AwaitingPlayer || !self.input_enabled {
            tracing::debug!(index, phase = ?self.phase, "click ignored: not accepting input");
            return ClickOutcome::Ignored;
        }
        if index >= self.config.square_count {
            tracing::debug!(index, "click ignored: no such square");
            return ClickOutcome::Ignored;
        }

        self.input.push(index);
        self.presenter.render_flash(index, self.config.flash_ms);

        if self.input.len() > self.target.len() || !self.target.starts_with(&self.input) {
            self.lose();
            return ClickOutcome::Mistake;
        }
        if self.input.len() < self.target.len() {
            return ClickOutcome::Accepted;
        }
        if self.target.len() >= self.config.max_steps {
            self.win();
            return ClickOutcome::Won;
        }

        self.input.clear();
        // no clicks during the pause before the next step
        self.set_input(false);
        self.schedule(self.config.round_pause_ms(), Timer::AdvanceRound);
        ClickOutcome::RoundComplete
    }

    /// Deliver a timer that came due. Ids that are no longer tracked
    /// (cancelled by a restart, or already delivered) are dropped.
    pub fn fire(&mut self, id: TimerId, timer: Timer) {
        let Some(pos) = self.pending.iter().position(|&p| p == id) else {
            tracing::debug!(?id, ?timer, "dropping stale timer");
            return;
        };
        self.pending.swap_remove(pos);

        match timer {
            Timer::Flash(square) => self.presenter.render_flash(square, self.config.flash_ms),
            Timer::OpenInput => {
                if self.phase == GamePhase::PlayingBack {
                    self.phase = GamePhase::AwaitingPlayer;
                    self.set_input(true);
                }
            }
            Timer::AdvanceRound => {
                if self.phase == GamePhase::AwaitingPlayer {
                    self.advance_round();
                }
            }
        }
    }

    fn advance_round(&mut self) {
        if self.target.len() >= self.config.max_steps {
            self.win();
            return;
        }
        let step = self.random_step();
        self.target.push(step);
        tracing::debug!(round = self.target.len(), step, "round started");

        self.presenter.set_counter_text(&self.target.len().to_string());
        self.phase = GamePhase::PlayingBack;
        self.set_input(false);

        let (plan, end) = playback_plan(&self.target, self.config.step_ms, 0);
        self.submit(plan);
        self.schedule(end, Timer::OpenInput);
    }

    fn lose(&mut self) {
        tracing::info!(round = self.target.len(), strict = self.config.strict_mode, "player mistake");
        self.cancel_pending();
        self.input.clear();
        self.set_input(false);

        let (error_plan, error_end) =
            playback_plan(&self.config.error_sequence, self.config.error_ms, 0);
        self.submit(error_plan);

        if self.config.strict_mode {
            self.presenter.set_counter_text(LOSE_COUNTER);
            self.presenter.set_button_text(START_LABEL);
            self.phase = GamePhase::Lost;
            return;
        }

        // same round again, replayed once the error pattern is over
        self.phase = GamePhase::PlayingBack;
        let (replay, end) = playback_plan(&self.target, self.config.step_ms, error_end);
        self.submit(replay);
        self.schedule(end, Timer::OpenInput);
    }

    fn win(&mut self) {
        tracing::info!(steps = self.target.len(), "player won");
        self.cancel_pending();
        self.input.clear();
        self.set_input(false);
        let (plan, _) = playback_plan(&self.config.win_sequence, self.config.win_ms, 0);
        self.submit(plan);
        self.presenter.set_counter_text(WIN_COUNTER);
        self.presenter.set_button_text(START_LABEL);
        self.phase = GamePhase::Won;
    }

    fn random_step(&mut self) -> u8 {
        self.rng.random_range(0..self.config.square_count)
    }

    fn set_input(&mut self, enabled: bool) {
        self.input_enabled = enabled;
        self.presenter.set_input_enabled(enabled);
    }

    fn schedule(&mut self, delay_ms: u32, timer: Timer) {
        let id = self.scheduler.after(delay_ms, timer);
        self.pending.push(id);
    }

    fn submit(&mut self, plan: Vec<(u32, Timer)>) {
        for (delay_ms, timer) in plan {
            self.schedule(delay_ms, timer);
        }
    }

    fn cancel_pending(&mut self) {
        for id in self.pending.drain(..) {
            self.scheduler.cancel(id);
        }
    }
}

impl<P: Presenter, R: Rng> SequenceEngine<P, TimerQueue, R> {
    /// Fire every timer due at or before `now_ms`, in order, then move the
    /// clock to `now_ms`.
    pub fn advance_to(&mut self, now_ms: f64) {
        while let Some((id, timer)) = self.scheduler.pop_due(now_ms) {
            self.fire(id, timer);
        }
        self.scheduler.set_now(now_ms);
    }

    pub fn advance_by(&mut self, ms: f64) {
        let until = self.scheduler.now() + ms;
        self.advance_to(until);
    }
}
