//! Engine configuration

use serde::{Deserialize, Serialize};

/// Grid specification (rows × columns)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of visible rows
    pub rows: u8,
    /// Number of columns (reels)
    pub cols: u8,
}

impl GridSpec {
    /// Standard 5×6 cluster grid
    pub fn standard_5x6() -> Self {
        Self { rows: 5, cols: 6 }
    }

    /// Total grid positions
    pub fn total_positions(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::standard_5x6()
    }
}

/// Symbol generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Per-cell probability of a scatter symbol
    pub scatter_probability: f64,
    /// Weights for the 9 paying symbols (index matches `Symbol` order)
    pub symbol_weights: [u32; 9],
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            scatter_probability: 0.01,
            // Equal weight, ~11% each
            symbol_weights: [1; 9],
        }
    }
}

/// Forced-win nudge parameters
///
/// Every `interval`-th base-game spin is nudged into a guaranteed minimum
/// cluster win. The symbol is drawn from a second weight table skewed toward
/// low-value symbols so the guaranteed win stays cheap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForcedWinConfig {
    /// Nudge every N base-game spins (0 disables)
    pub interval: u64,
    /// Skewed weights for the forced symbol pick (index matches `Symbol` order)
    pub symbol_weights: [u32; 9],
    /// Probability of overwriting each candidate cell
    pub overwrite_probability: f64,
}

impl Default for ForcedWinConfig {
    fn default() -> Self {
        Self {
            interval: 20,
            symbol_weights: [15, 20, 2, 18, 20, 25, 3, 15, 22],
            overwrite_probability: 0.7,
        }
    }
}

/// Bet step ladder: preset tiers, each expanding into sub-steps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetLadder {
    /// Preset tier values shown to the player
    pub presets: Vec<f64>,
    /// Sub-steps per preset, in the same order as `presets`
    pub steps: Vec<Vec<f64>>,
}

impl BetLadder {
    /// Flat, deduplicated, ordered list of all allowed bet values
    pub fn flat_steps(&self) -> Vec<f64> {
        let mut out: Vec<f64> = Vec::new();
        for tier in &self.steps {
            for &v in tier {
                if !out.iter().any(|&seen| (seen - v).abs() < 1e-3) {
                    out.push(v);
                }
            }
        }
        out
    }

    /// Index of `bet` in the flat ladder, with float tolerance
    pub fn index_of(&self, bet: f64) -> Option<usize> {
        self.flat_steps()
            .iter()
            .position(|&v| (v - bet).abs() < 1e-3)
    }

    /// Nearest valid step to an arbitrary requested value
    pub fn snap(&self, requested: f64) -> f64 {
        let steps = self.flat_steps();
        let Some(&first) = steps.first() else {
            return requested;
        };
        let mut best = first;
        for &v in &steps {
            if (v - requested).abs() < (best - requested).abs() {
                best = v;
            }
        }
        best
    }

    /// Is `bet` a member of the ladder?
    pub fn contains(&self, bet: f64) -> bool {
        self.index_of(bet).is_some()
    }
}

impl Default for BetLadder {
    fn default() -> Self {
        Self {
            presets: vec![1.0, 5.0, 10.0, 20.0, 50.0, 100.0],
            steps: vec![
                vec![1.0, 1.5, 2.0, 2.5, 3.0, 4.0, 5.0],
                vec![5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
                vec![10.0, 15.0, 20.0],
                vec![20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0],
                vec![50.0, 60.0, 70.0, 80.0, 90.0, 100.0],
                vec![100.0],
            ],
        }
    }
}

/// Buy-feature parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BuyFeatureConfig {
    /// Purchase cost = bet × this multiplier
    pub cost_multiplier: f64,
    /// Free spins granted by a purchase
    pub spins: u32,
}

impl Default for BuyFeatureConfig {
    fn default() -> Self {
        Self {
            cost_multiplier: 100.0,
            spins: 10,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Grid dimensions
    pub grid: GridSpec,
    /// Symbol generation
    pub generator: GeneratorConfig,
    /// Forced-win nudge
    pub forced_win: ForcedWinConfig,
    /// Bet ladder
    pub bet_ladder: BetLadder,
    /// Buy feature
    pub buy_feature: BuyFeatureConfig,
    /// Starting balance for a fresh session
    pub starting_balance: f64,
    /// Starting bet (snapped to the ladder on session creation)
    pub starting_bet: f64,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            grid: GridSpec::default(),
            generator: GeneratorConfig::default(),
            forced_win: ForcedWinConfig::default(),
            bet_ladder: BetLadder::default(),
            buy_feature: BuyFeatureConfig::default(),
            starting_balance: 100.0,
            starting_bet: 1.0,
        }
    }
}

impl SlotConfig {
    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid config: {}", e))
    }

    /// Parse from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yml::from_str(yaml).map_err(|e| format!("Invalid config: {}", e))
    }

    /// Export as pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Export as YAML
    pub fn to_yaml(&self) -> String {
        serde_yml::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_spec() {
        let grid = GridSpec::standard_5x6();
        assert_eq!(grid.total_positions(), 30);
    }

    #[test]
    fn test_ladder_flat_steps_deduplicated() {
        let ladder = BetLadder::default();
        let steps = ladder.flat_steps();
        // Tier boundaries (5, 10, 20, 50, 100) appear once
        let fives = steps.iter().filter(|&&v| (v - 5.0).abs() < 1e-3).count();
        assert_eq!(fives, 1);
        // Ordered ascending
        for w in steps.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn test_ladder_snap() {
        let ladder = BetLadder::default();
        assert_eq!(ladder.snap(1.4), 1.5);
        assert_eq!(ladder.snap(3.3), 3.0);
        assert_eq!(ladder.snap(500.0), 100.0);
        assert!(ladder.contains(2.5));
        assert!(!ladder.contains(11.0));
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = SlotConfig::default();
        let json = config.to_json();
        let parsed = SlotConfig::from_json(&json).unwrap();
        assert_eq!(parsed.forced_win.interval, 20);
        assert_eq!(parsed.generator.scatter_probability, 0.01);
    }

    #[test]
    fn test_config_yaml_round_trip() {
        let config = SlotConfig::default();
        let parsed = SlotConfig::from_yaml(&config.to_yaml()).unwrap();
        assert_eq!(parsed.bet_ladder.presets.len(), 6);
        assert_eq!(parsed.buy_feature.spins, 10);
    }
}
