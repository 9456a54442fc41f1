//! Free-spin round state machine
//!
//! `Idle → Intro → Spinning → Summary → Idle`. The intro is shown exactly once
//! per round; re-triggers while `Spinning` only extend the remaining counter.
//! The engine drives the transitions and owns the actual spins; this type
//! tracks the round's lifecycle and its accumulated win.

use serde::{Deserialize, Serialize};

/// Lifecycle phase of the bonus round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FreeSpinPhase {
    /// No round active; manual spin enabled
    #[default]
    Idle,
    /// Intro overlay visible, awarded count announced
    Intro,
    /// No-cost spins running; remaining counter may grow via re-triggers
    Spinning,
    /// Summary overlay visible with the round total
    Summary,
}

/// Closing report for one completed round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreeSpinSummary {
    /// Spins actually played (initial award plus re-triggers)
    pub spins_played: u32,
    /// Win accumulated across the round
    pub total_win: f64,
}

/// One bonus round from entry to summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FreeSpinRound {
    phase: FreeSpinPhase,
    spins_awarded: u32,
    spins_played: u32,
    retriggers: u32,
    total_win: f64,
}

impl FreeSpinRound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> FreeSpinPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != FreeSpinPhase::Idle
    }

    pub fn spins_awarded(&self) -> u32 {
        self.spins_awarded
    }

    pub fn retriggers(&self) -> u32 {
        self.retriggers
    }

    /// Enter the round with the initially awarded spin count (Idle → Intro)
    pub fn begin(&mut self, spins_awarded: u32) {
        debug_assert_eq!(self.phase, FreeSpinPhase::Idle);
        *self = Self {
            phase: FreeSpinPhase::Intro,
            spins_awarded,
            ..Self::default()
        };
    }

    /// Intro overlay finished; spins start (Intro → Spinning)
    pub fn activate(&mut self) {
        debug_assert_eq!(self.phase, FreeSpinPhase::Intro);
        self.phase = FreeSpinPhase::Spinning;
    }

    /// Account one played spin and its win; extra spins from a re-trigger are
    /// counted but never replay the intro
    pub fn record_spin(&mut self, win: f64, retriggered_spins: u32) {
        debug_assert_eq!(self.phase, FreeSpinPhase::Spinning);
        self.spins_played += 1;
        self.total_win += win;
        if retriggered_spins > 0 {
            self.retriggers += 1;
            self.spins_awarded += retriggered_spins;
        }
    }

    /// All spins consumed (Spinning → Summary); returns the round report
    pub fn complete(&mut self) -> FreeSpinSummary {
        debug_assert_eq!(self.phase, FreeSpinPhase::Spinning);
        self.phase = FreeSpinPhase::Summary;
        FreeSpinSummary {
            spins_played: self.spins_played,
            total_win: self.total_win,
        }
    }

    /// Summary dismissed; manual spin re-enabled (Summary → Idle)
    pub fn close(&mut self) {
        debug_assert_eq!(self.phase, FreeSpinPhase::Summary);
        self.phase = FreeSpinPhase::Idle;
    }
}
