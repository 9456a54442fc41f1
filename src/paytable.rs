//! Paytable and cluster/scatter win evaluation
//!
//! Cluster model is count-based pay-anywhere: every occurrence of a symbol on
//! the grid counts toward its cluster, adjacency is irrelevant. Tiers are
//! inclusive lower bounds checked highest-first; a count below the lowest tier
//! pays zero.

use serde::{Deserialize, Serialize};

use crate::spin::SpinContext;
use crate::symbols::{Grid, PAYING_SYMBOLS, Symbol};

/// One payout tier: minimum cluster count → bet multiplier
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PayTier {
    pub min_count: u8,
    pub multiplier: f64,
}

/// Scatter award for one count bracket
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScatterTier {
    /// Cash prize = this multiplier × bet
    pub cash_multiplier: f64,
    /// Free spins granted
    pub free_spins: u32,
}

/// A win for one symbol's cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterWin {
    pub symbol: Symbol,
    pub count: u8,
    pub multiplier: f64,
    /// multiplier × bet
    pub win_amount: f64,
    /// Winning positions (row, col), for presentation highlighting
    pub positions: Vec<(u8, u8)>,
}

/// Scatter evaluation outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterWin {
    pub count: u8,
    pub cash_multiplier: f64,
    /// cash_multiplier × bet
    pub cash_win: f64,
    pub free_spins: u32,
    pub positions: Vec<(u8, u8)>,
    /// True only when the bonus round should start (base-game context)
    pub triggers_feature: bool,
}

/// Static payout lookup: per-symbol cluster tiers plus scatter brackets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayTable {
    /// Tiers per paying symbol, ascending by `min_count` (index = `Symbol` order)
    pub cluster_tiers: [Vec<PayTier>; 9],
    /// Awards for exactly 3, 4, 5 scatters
    pub scatter_tiers: [ScatterTier; 3],
    /// Award for 6 or more scatters
    pub scatter_tier_6_plus: ScatterTier,
    /// Scatters needed to trigger/extend the bonus round
    pub scatter_trigger_count: u8,
}

fn tiers(t8: f64, t10: f64, t12: f64) -> Vec<PayTier> {
    vec![
        PayTier { min_count: 8, multiplier: t8 },
        PayTier { min_count: 10, multiplier: t10 },
        PayTier { min_count: 12, multiplier: t12 },
    ]
}

impl PayTable {
    /// The standard fruit paytable
    pub fn standard() -> Self {
        Self {
            cluster_tiers: [
                tiers(2.00, 5.00, 15.00),   // grapes
                tiers(0.80, 1.20, 8.00),    // orange
                tiers(10.00, 25.00, 50.00), // lemon
                tiers(1.50, 2.00, 12.00),   // apple
                tiers(0.50, 1.00, 5.00),    // strawberry
                tiers(0.20, 0.70, 2.00),    // cherry
                tiers(2.50, 10.00, 25.00),  // watermelon
                tiers(1.00, 1.50, 25.00),   // peach
                tiers(0.40, 0.90, 4.00),    // pineapple
            ],
            scatter_tiers: [
                ScatterTier { cash_multiplier: 0.00, free_spins: 5 },
                ScatterTier { cash_multiplier: 3.00, free_spins: 15 },
                ScatterTier { cash_multiplier: 5.00, free_spins: 15 },
            ],
            scatter_tier_6_plus: ScatterTier { cash_multiplier: 100.00, free_spins: 15 },
            scatter_trigger_count: 3,
        }
    }

    /// Minimum winning cluster size (lowest tier threshold across symbols)
    pub fn min_cluster(&self) -> u8 {
        self.cluster_tiers
            .iter()
            .filter_map(|t| t.first().map(|tier| tier.min_count))
            .min()
            .unwrap_or(u8::MAX)
    }

    /// Bet multiplier for a symbol at a given cluster count (0 below threshold)
    pub fn cluster_multiplier(&self, symbol: Symbol, count: u8) -> f64 {
        let Some(idx) = symbol.pay_index() else {
            return 0.0;
        };
        // Highest threshold met wins
        self.cluster_tiers[idx]
            .iter()
            .rev()
            .find(|tier| count >= tier.min_count)
            .map(|tier| tier.multiplier)
            .unwrap_or(0.0)
    }

    /// Scatter award for a count (None below 3)
    pub fn scatter_award(&self, count: u8) -> Option<ScatterTier> {
        match count {
            0..=2 => None,
            3 | 4 | 5 => Some(self.scatter_tiers[count as usize - 3]),
            _ => Some(self.scatter_tier_6_plus),
        }
    }

    /// Evaluate a finalized grid
    ///
    /// A single grid may pay several symbols and the scatter bonus at once;
    /// everything is summed into one total so the caller applies a single
    /// balance update. The trigger flag is set only in base-game context —
    /// a re-trigger during free spins adds its spins silently.
    pub fn evaluate(&self, grid: &Grid, bet: f64, ctx: SpinContext) -> EvaluationResult {
        let mut cluster_wins = Vec::new();

        for symbol in PAYING_SYMBOLS {
            let positions = grid.positions_of(symbol);
            let count = positions.len() as u8;
            let multiplier = self.cluster_multiplier(symbol, count);
            if multiplier > 0.0 {
                cluster_wins.push(ClusterWin {
                    symbol,
                    count,
                    multiplier,
                    win_amount: multiplier * bet,
                    positions,
                });
            }
        }

        let scatter_positions = grid.positions_of(Symbol::Scatter);
        let scatter_count = scatter_positions.len() as u8;
        let scatter_win = self.scatter_award(scatter_count).map(|tier| ScatterWin {
            count: scatter_count,
            cash_multiplier: tier.cash_multiplier,
            cash_win: tier.cash_multiplier * bet,
            free_spins: tier.free_spins,
            positions: scatter_positions,
            triggers_feature: ctx == SpinContext::Base,
        });

        let cluster_total: f64 = cluster_wins.iter().map(|w| w.win_amount).sum();
        let scatter_total = scatter_win.as_ref().map(|s| s.cash_win).unwrap_or(0.0);
        let total_win = cluster_total + scatter_total;

        EvaluationResult {
            cluster_wins,
            scatter_win,
            total_win,
            win_ratio: if bet > 0.0 { total_win / bet } else { 0.0 },
        }
    }
}

impl Default for PayTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Result of evaluating a grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub cluster_wins: Vec<ClusterWin>,
    pub scatter_win: Option<ScatterWin>,
    /// Cluster total + scatter cash
    pub total_win: f64,
    pub win_ratio: f64,
}

impl EvaluationResult {
    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }

    pub fn triggers_feature(&self) -> bool {
        self.scatter_win
            .as_ref()
            .is_some_and(|s| s.triggers_feature)
    }

    /// Free spins granted by this evaluation (0 without scatters)
    pub fn free_spins_awarded(&self) -> u32 {
        self.scatter_win.as_ref().map(|s| s.free_spins).unwrap_or(0)
    }
}
