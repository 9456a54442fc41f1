//! Presentation boundary
//!
//! The engine resolves outcomes and hands them across this trait; rendering,
//! animation, and overlay pacing live entirely on the other side. A call
//! returns when the presentation is done with it, which is what keeps
//! evaluation strictly after the reel animation and balance updates in spin
//! order.

use crate::session::SlotError;
use crate::spin::SpinResult;
use crate::symbols::Grid;
use crate::timing::SpinTiming;

/// Full-screen overlay kinds the core can request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Overlay {
    /// Bonus round intro, showing the awarded spin count
    FreeSpinIntro { spins: u32 },
    /// Bonus round summary, showing the accumulated win
    FreeSpinSummary { total_win: f64 },
    /// Buy-feature confirmation, showing spins granted and cost
    PurchaseConfirmed { spins: u32, cost: f64 },
}

/// Consumer of resolved outcomes
///
/// Every method has a no-op default so headless users implement only what
/// they display.
pub trait Presentation {
    /// Animate the reels to the finalized grid; return when settled
    fn render_grid(&mut self, _grid: &Grid, _timing: SpinTiming) {}

    /// Show a win banner for a resolved spin
    fn display_win(&mut self, _result: &SpinResult) {}

    /// Reflect the post-update balance
    fn display_balance(&mut self, _balance: f64) {}

    /// Reflect the running session win
    fn display_session_win(&mut self, _amount: f64) {}

    /// Show a full-screen overlay for roughly `duration_ms`; return when done
    fn display_overlay(&mut self, _overlay: Overlay, _duration_ms: u32) {}

    /// Warn about a refused action (insufficient funds)
    fn display_warning(&mut self, _error: &SlotError) {}

    /// Idle pause between spins (auto-spin pacing, free-spin gaps)
    fn pause(&mut self, _duration_ms: u32) {}
}

/// Discards everything; pure simulation
#[derive(Debug, Default)]
pub struct NullPresentation;

impl Presentation for NullPresentation {}

/// Logs outcomes through the `log` crate; useful for CLI runs
#[derive(Debug, Default)]
pub struct LogPresentation;

impl Presentation for LogPresentation {
    fn display_win(&mut self, result: &SpinResult) {
        log::info!(
            "[Spin {}] win {:.2} ({} clusters, {} scatters)",
            result.spin_index,
            result.total_win,
            result.cluster_wins.len(),
            result.scatter_win.as_ref().map(|s| s.count).unwrap_or(0),
        );
    }

    fn display_balance(&mut self, balance: f64) {
        log::debug!("balance {:.2}", balance);
    }

    fn display_overlay(&mut self, overlay: Overlay, _duration_ms: u32) {
        log::info!("overlay: {:?}", overlay);
    }

    fn display_warning(&mut self, error: &SlotError) {
        log::warn!("refused: {}", error);
    }
}

/// Records every call for assertion in tests and headless harnesses
#[derive(Debug, Default)]
pub struct RecordingPresentation {
    pub grids: Vec<Grid>,
    pub wins: Vec<f64>,
    pub balances: Vec<f64>,
    pub session_wins: Vec<f64>,
    pub overlays: Vec<Overlay>,
    pub warnings: Vec<SlotError>,
    pub pauses: Vec<u32>,
}

impl Presentation for RecordingPresentation {
    fn render_grid(&mut self, grid: &Grid, _timing: SpinTiming) {
        self.grids.push(grid.clone());
    }

    fn display_win(&mut self, result: &SpinResult) {
        self.wins.push(result.total_win);
    }

    fn display_balance(&mut self, balance: f64) {
        self.balances.push(balance);
    }

    fn display_session_win(&mut self, amount: f64) {
        self.session_wins.push(amount);
    }

    fn display_overlay(&mut self, overlay: Overlay, _duration_ms: u32) {
        self.overlays.push(overlay);
    }

    fn display_warning(&mut self, error: &SlotError) {
        self.warnings.push(error.clone());
    }

    fn pause(&mut self, duration_ms: u32) {
        self.pauses.push(duration_ms);
    }
}

impl RecordingPresentation {
    /// Number of intro overlays shown, for one-intro-per-round assertions
    pub fn intro_count(&self) -> usize {
        self.overlays
            .iter()
            .filter(|o| matches!(o, Overlay::FreeSpinIntro { .. }))
            .count()
    }
}
