//! Frame driver shared by the native and web front ends
//!
//! Collects input intents between frames, turns the host's clock into
//! clamped steps, ticks the session and sorts the resulting events into
//! what the host has to act on.

use crate::best::BestLevel;
use crate::platform::FrameClock;
use crate::sim::{GameEvent, GamePhase, Session, SoundCue, TickInput, tick};

/// What a frame asks of the host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// Cues to play, in emission order
    pub cues: Vec<SoundCue>,
    /// `best` improved and should be persisted
    pub best_changed: bool,
    /// No map could be loaded (message for the user)
    pub load_failed: Option<String>,
    /// A started run ended and the session is back at the menu
    pub run_over: bool,
}

pub struct Driver {
    pub session: Session,
    pub best: BestLevel,
    clock: FrameClock,
    pending: TickInput,
    /// A level has been entered since the last time the menu was shown
    in_run: bool,
}

impl Driver {
    pub fn new(session: Session, best: BestLevel) -> Self {
        let clock = FrameClock::new(session.tuning.max_dt);
        Self {
            session,
            best,
            clock,
            pending: TickInput::default(),
            in_run: false,
        }
    }

    /// Merge intents into the input for the next frame
    pub fn queue(&mut self, input: &TickInput) {
        let p = &mut self.pending;
        if input.aim.is_some() {
            p.aim = input.aim;
        }
        p.begin_fire |= input.begin_fire;
        p.end_fire |= input.end_fire;
        p.pause |= input.pause;
        p.confirm |= input.confirm;
        p.home |= input.home;
        p.hidden |= input.hidden;
    }

    /// Tick once at `now` seconds with everything queued since the last frame
    pub fn frame(&mut self, now: f64) -> FrameOutcome {
        let dt = self.clock.advance(now);
        let input = std::mem::take(&mut self.pending);
        tick(&mut self.session, &input, now, dt);

        let mut outcome = FrameOutcome::default();
        for event in self.session.drain_events() {
            match event {
                GameEvent::Cue(cue) => outcome.cues.push(cue),
                GameEvent::NewBest(level) => {
                    if self.best.record(level) {
                        outcome.best_changed = true;
                    }
                }
                GameEvent::PhaseChanged { from, to } => {
                    // Time spent paused is not simulated
                    if from == GamePhase::Paused && to == GamePhase::Playing {
                        self.clock.rearm();
                    }
                    match to {
                        GamePhase::Playing | GamePhase::Ready => self.in_run = true,
                        GamePhase::Menu if self.in_run => {
                            self.in_run = false;
                            outcome.run_over = true;
                        }
                        _ => {}
                    }
                }
                GameEvent::LoadFailed {
                    requested,
                    fallback,
                    error,
                } => {
                    outcome.load_failed =
                        Some(format!("map {requested} and fallback {fallback} failed: {error}"));
                }
            }
        }
        outcome
    }
}
