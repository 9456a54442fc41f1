//! Auto-spin control loop
//!
//! Repeats manual spin cycles under player-configured stop conditions.
//! Cancellation is cooperative: the token is checked at defined checkpoints
//! (before each spin, and again immediately after one completes, before the
//! inter-spin pause), so a spin in flight always finishes and a cancel never
//! lets another one start. Free-spin rounds run to completion inside the spin
//! call itself, which gives the "never overlaps a bonus round" ordering
//! without the polling loop the UI layer would otherwise need.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::SlotEngine;
use crate::presentation::Presentation;
use crate::session::SlotError;

/// How many spins the player asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoSpinPlan {
    /// Stop after exactly this many spins
    Count(u32),
    /// Spin until cancelled or out of funds
    Infinite,
}

/// Shareable cancellation handle
///
/// Clone one side into the UI; cancelling is always allowed, regardless of
/// engine state, and takes effect at the next checkpoint.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why the auto-spin loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoSpinStop {
    /// The requested count was reached
    Completed,
    /// Cancelled at a checkpoint
    Cancelled,
    /// Balance no longer covers the bet
    OutOfFunds,
}

/// Closing report for one auto-spin session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoSpinReport {
    /// Manual spin cycles completed (bonus rounds don't count extra)
    pub spins_completed: u32,
    pub stop: AutoSpinStop,
}

impl<P: Presentation> SlotEngine<P> {
    /// Run an auto-spin session to completion
    ///
    /// Refused while a spin or bonus round is already active. Each iteration
    /// is a full manual spin cycle, including any free-spin round it
    /// triggers; the remaining count only moves after the whole cycle ends.
    pub fn auto_spin(
        &mut self,
        plan: AutoSpinPlan,
        token: &CancelToken,
    ) -> Result<AutoSpinReport, SlotError> {
        if self.is_spinning() || self.in_free_spins() {
            log::debug!("auto-spin refused: already in progress");
            return Err(SlotError::ActionInProgress);
        }

        log::info!("auto-spin: starting ({:?})", plan);
        let mut remaining = match plan {
            AutoSpinPlan::Count(n) => Some(n),
            AutoSpinPlan::Infinite => None,
        };
        let mut spins_completed = 0u32;

        let stop = loop {
            if token.is_cancelled() {
                break AutoSpinStop::Cancelled;
            }
            if remaining == Some(0) {
                break AutoSpinStop::Completed;
            }
            if !self.session().can_afford(self.session().bet()) {
                break AutoSpinStop::OutOfFunds;
            }

            self.spin()?;
            spins_completed += 1;
            if let Some(n) = remaining.as_mut() {
                *n -= 1;
            }

            // Checkpoint right after the spin, before the pause
            if token.is_cancelled() {
                break AutoSpinStop::Cancelled;
            }
            self.auto_spin_pause();
        };

        log::info!(
            "auto-spin: stopped after {} spins ({:?})",
            spins_completed,
            stop
        );
        Ok(AutoSpinReport {
            spins_completed,
            stop,
        })
    }
}
