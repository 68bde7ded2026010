//! Run lifecycle
//!
//! Owns the current [`GameState`], drives it at a fixed timestep from
//! variable frame deltas and handles restart/exit once a run is over.

use crate::audio::{AudioManager, AudioSink};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::settings::Settings;
use crate::sim::{GamePhase, GameEvent, GameState, TickInput, Track, tick};

/// Largest frame delta accepted before clamping (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// Player choice on the game-over screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Restart,
    Exit,
}

/// Result of a [`Command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A fresh run is active
    Restarted,
    /// Session left for the menu; nothing more will be simulated
    ExitedToMenu,
    /// Not valid right now (run still active or session already exited)
    Ignored,
}

pub struct Session<S: AudioSink> {
    state: GameState,
    audio: AudioManager<S>,
    accumulator: f32,
    /// Input gathered since the last substep
    pending: TickInput,
    seed: u64,
    runs: u32,
    exited: bool,
}

impl<S: AudioSink> Session<S> {
    pub fn new(seed: u64, settings: &Settings, sink: S) -> Self {
        let mut audio = AudioManager::new(sink, settings);
        audio.start_track(Track::Normal);
        log::info!("Session started with seed: {}", seed);
        Self {
            state: GameState::new(seed),
            audio,
            accumulator: 0.0,
            pending: TickInput::default(),
            seed,
            runs: 1,
            exited: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio(&self) -> &AudioManager<S> {
        &self.audio
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    /// Number of runs started in this session
    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn is_exited(&self) -> bool {
        self.exited
    }

    /// Advance by a frame's wall-clock delta (seconds)
    pub fn update(&mut self, frame_dt: f32, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.exited {
            return events;
        }

        self.pending.merge(input);
        // Non-finite deltas count as no time
        let frame_dt = if frame_dt.is_finite() { frame_dt } else { 0.0 };
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            events.extend(tick(&mut self.state, &self.pending, SIM_DT));
            self.accumulator -= SIM_DT;
            substeps += 1;

            // One-shots apply to a single substep
            self.pending.clear_one_shots();
        }

        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::debug!("Dropping {:.1}ms of simulation backlog", self.accumulator * 1000.0);
            self.accumulator = 0.0;
        }

        self.audio.handle_events(&events);
        events
    }

    /// Apply a game-over screen choice
    pub fn command(&mut self, command: Command) -> Transition {
        if self.exited || self.state.phase() != GamePhase::Ended {
            log::debug!("Ignoring {:?} while {:?}", command, self.state.phase());
            return Transition::Ignored;
        }

        match command {
            Command::Restart => {
                self.seed = next_seed(self.seed);
                self.state = GameState::new(self.seed);
                self.accumulator = 0.0;
                self.pending = TickInput::default();
                self.runs += 1;
                self.audio.start_track(Track::Normal);
                log::info!("Run {} started with seed: {}", self.runs, self.seed);
                Transition::Restarted
            }
            Command::Exit => {
                self.audio.stop_track();
                self.exited = true;
                log::info!("Exited to menu after {} run(s)", self.runs);
                Transition::ExitedToMenu
            }
        }
    }
}

/// Derive the next run's seed (PCG multiplier LCG step)
fn next_seed(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}
