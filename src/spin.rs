//! Spin context and result types

use serde::{Deserialize, Serialize};

use crate::paytable::{ClusterWin, EvaluationResult, ScatterWin};
use crate::symbols::Grid;

/// Whether a spin runs in the base game or inside a free-spin round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinContext {
    /// Player-paid spin; scatter hits may start the bonus round
    Base,
    /// No-cost spin inside the bonus round; re-triggers add spins silently
    FreeSpin,
}

impl SpinContext {
    pub fn is_free(&self) -> bool {
        matches!(self, SpinContext::FreeSpin)
    }
}

/// Win size classification for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinTier {
    Win,
    /// Total win ≥ 20
    BigWin,
    /// Total win ≥ 50
    MegaWin,
}

impl WinTier {
    /// Classify a currency amount
    pub fn classify(amount: f64) -> Option<Self> {
        if amount <= 0.0 {
            None
        } else if amount >= 50.0 {
            Some(WinTier::MegaWin)
        } else if amount >= 20.0 {
            Some(WinTier::BigWin)
        } else {
            Some(WinTier::Win)
        }
    }
}

/// Complete result of one resolved spin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinResult {
    /// Monotonic spin counter value for this spin
    pub spin_index: u64,
    /// Finalized grid the result was evaluated from
    pub grid: Grid,
    /// Bet the payouts were computed against
    pub bet: f64,
    /// Context the spin ran in
    pub context: SpinContext,
    /// Cluster total + scatter cash
    pub total_win: f64,
    /// Win-to-bet ratio
    pub win_ratio: f64,
    /// Per-symbol cluster wins (with positions for highlighting)
    pub cluster_wins: Vec<ClusterWin>,
    /// Scatter outcome, if 3 or more scatters landed
    pub scatter_win: Option<ScatterWin>,
    /// Free spins granted by this spin (re-triggers included)
    pub free_spins_awarded: u32,
    /// True when this spin starts the bonus round (base context only)
    pub feature_triggered: bool,
    /// Whether the forced-win nudge was applied to this grid
    pub nudged: bool,
}

impl SpinResult {
    pub(crate) fn from_evaluation(
        spin_index: u64,
        grid: Grid,
        bet: f64,
        context: SpinContext,
        nudged: bool,
        eval: EvaluationResult,
    ) -> Self {
        Self {
            spin_index,
            grid,
            bet,
            context,
            total_win: eval.total_win,
            win_ratio: eval.win_ratio,
            free_spins_awarded: eval.free_spins_awarded(),
            feature_triggered: eval.triggers_feature(),
            cluster_wins: eval.cluster_wins,
            scatter_win: eval.scatter_win,
            nudged,
        }
    }

    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }

    /// Presentation tier for the total win
    pub fn win_tier(&self) -> Option<WinTier> {
        WinTier::classify(self.total_win)
    }

    /// All winning positions across clusters (presentation highlighting)
    pub fn winning_positions(&self) -> Vec<(u8, u8)> {
        self.cluster_wins
            .iter()
            .flat_map(|w| w.positions.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_tier_thresholds() {
        assert_eq!(WinTier::classify(0.0), None);
        assert_eq!(WinTier::classify(5.0), Some(WinTier::Win));
        assert_eq!(WinTier::classify(19.99), Some(WinTier::Win));
        assert_eq!(WinTier::classify(20.0), Some(WinTier::BigWin));
        assert_eq!(WinTier::classify(50.0), Some(WinTier::MegaWin));
    }
}
