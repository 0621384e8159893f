//! Session controller
//!
//! Owns the menu → playing → game-over state machine, the fixed-tick
//! scheduler, and the conversation with the high-score store.
//!
//! Leaving `Playing` (menu, retry, run end) always stops the scheduler before
//! anything else happens, so no tick can land on a store that is being
//! replaced.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::highscores::ScoreStore;
use crate::platform::InputState;
use crate::sim::{EndCause, GameEvent, GamePhase, GameState, TickInput, WorldMode, tick};
use crate::tuning::Tuning;

/// Fixed-rate tick scheduler driven by variable frame deltas
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    running: bool,
    accumulator: f32,
}

impl Scheduler {
    pub fn start(&mut self) {
        self.running = true;
        self.accumulator = 0.0;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Add a frame's worth of time. Large gaps (tab switches) are capped.
    fn accumulate(&mut self, frame_dt: f32) {
        if self.running {
            self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
        }
    }

    /// Claim one tick's worth of accumulated time, if available
    fn take_tick(&mut self, substeps: u32) -> bool {
        if self.running && self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            true
        } else {
            false
        }
    }
}

/// How the last run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub cause: EndCause,
    pub score: u64,
    /// High score for the mode after the run
    pub high_score: u64,
    /// This run set a new high score
    pub new_record: bool,
    pub jumps: u32,
    pub pickups: u32,
}

/// Read-only view handed to the renderer and HUD
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub state: &'a GameState,
    pub high_score: u64,
    pub last_run: Option<RunSummary>,
}

impl Snapshot<'_> {
    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }
}

/// One player's session with Pixel Jumper
pub struct Session<S: ScoreStore> {
    state: GameState,
    scheduler: Scheduler,
    scores: S,
    high_score: u64,
    last_run: Option<RunSummary>,
    mode: WorldMode,
    tuning: Tuning,
    next_seed: u64,
    /// Counters for the current run
    jumps: u32,
    pickups: u32,
    /// Recorded player input, sampled once per tick
    pub input: InputState,
}

impl<S: ScoreStore> Session<S> {
    /// New session sitting in the menu
    pub fn new(scores: S, tuning: Tuning, seed: u64) -> Self {
        let mode = WorldMode::Endless;
        let mut state = GameState::new(seed, mode, tuning);
        state.phase = GamePhase::Menu;
        let high_score = scores.get(&mode.score_key());
        Self {
            state,
            scheduler: Scheduler::default(),
            scores,
            high_score,
            last_run: None,
            mode,
            tuning,
            next_seed: seed,
            jumps: 0,
            pickups: 0,
            input: InputState::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn mode(&self) -> WorldMode {
        self.mode
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn last_run(&self) -> Option<RunSummary> {
        self.last_run
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scores(&self) -> &S {
        &self.scores
    }

    /// Pick the mode for the next run. Ignored mid-run.
    pub fn select_mode(&mut self, mode: WorldMode) {
        if self.state.is_playing() {
            log::warn!("Ignoring mode change to {:?} during a run", mode);
            return;
        }
        self.mode = mode;
        self.high_score = self.scores.get(&mode.score_key());
    }

    /// Start a fresh run with the given seed
    pub fn start(&mut self, seed: u64) {
        self.scheduler.stop();
        self.state = GameState::new(seed, self.mode, self.tuning);
        self.high_score = self.scores.get(&self.mode.score_key());
        self.last_run = None;
        self.jumps = 0;
        self.pickups = 0;
        self.input.clear_edges();
        self.scheduler.start();
        log::info!("Run started: mode={:?} seed={}", self.mode, seed);
    }

    /// Start again from the game-over screen
    pub fn retry(&mut self, seed: u64) {
        if !matches!(self.state.phase, GamePhase::GameOver(_)) {
            log::warn!("Retry requested outside game over ({:?})", self.state.phase);
            return;
        }
        self.start(seed);
    }

    /// Back to the menu. The current world is discarded on the next start.
    pub fn to_menu(&mut self) {
        self.scheduler.stop();
        self.state.phase = GamePhase::Menu;
        self.input.clear_edges();
        log::info!("Back to menu");
    }

    /// Run as many ticks as `frame_dt` seconds allow. Returns ticks run.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.handle_transitions();

        self.scheduler.accumulate(frame_dt);
        let mut substeps = 0;
        while self.scheduler.take_tick(substeps) {
            let input = self.input.sample();
            if input.menu {
                self.to_menu();
                break;
            }
            self.run_tick(&input);
            substeps += 1;
        }
        substeps
    }

    /// Run exactly one tick with explicit input (headless runner, tests)
    pub fn step(&mut self, input: &TickInput) {
        if !self.scheduler.is_running() {
            return;
        }
        self.run_tick(input);
    }

    /// Pull-based view of the latest committed state
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            state: &self.state,
            high_score: self.high_score,
            last_run: self.last_run,
        }
    }

    /// Menu/confirm edges recorded since the last frame
    fn handle_transitions(&mut self) {
        match self.state.phase {
            GamePhase::Menu => {
                if self.input.take_confirm() {
                    let seed = self.roll_seed();
                    self.start(seed);
                }
            }
            GamePhase::GameOver(_) => {
                if self.input.take_menu() {
                    self.to_menu();
                } else if self.input.take_confirm() {
                    let seed = self.roll_seed();
                    self.retry(seed);
                }
            }
            GamePhase::Playing => {}
        }
    }

    fn run_tick(&mut self, input: &TickInput) {
        tick(&mut self.state, input);
        for event in self.state.drain_events() {
            match event {
                GameEvent::Jumped => self.jumps += 1,
                GameEvent::Collected { score } => {
                    self.pickups += 1;
                    log::debug!("Pickup #{} (score {})", self.pickups, score);
                }
                GameEvent::WorldExtended { frontier } => {
                    log::debug!("World extended to x={:.0}", frontier);
                }
                GameEvent::RunEnded { cause, score } => self.finish_run(cause, score),
            }
        }
    }

    /// The tick just ended the run: stop ticking, then record the score
    fn finish_run(&mut self, cause: EndCause, score: u64) {
        self.scheduler.stop();
        let new_record = self.record_score(score);
        self.last_run = Some(RunSummary {
            cause,
            score,
            high_score: self.high_score,
            new_record,
            jumps: self.jumps,
            pickups: self.pickups,
        });
        log::info!(
            "{} score={} high={}{}",
            cause.message(),
            score,
            self.high_score,
            if new_record { " (new record)" } else { "" }
        );
    }

    /// Persist `score` if it beats the stored value
    fn record_score(&mut self, score: u64) -> bool {
        let key = self.mode.score_key();
        if score > self.high_score && self.scores.set(&key, score) {
            self.high_score = score;
            return true;
        }
        false
    }

    /// Seed for runs started from input rather than by the embedder
    fn roll_seed(&mut self) -> u64 {
        self.next_seed = self
            .next_seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.next_seed
    }
}
