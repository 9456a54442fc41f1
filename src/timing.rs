//! Presentation timing hints
//!
//! The core never sleeps; these durations are handed to the presentation layer
//! so reel animation, overlays, and auto-spin pacing stay consistent with the
//! resolved outcomes.

use serde::{Deserialize, Serialize};

use crate::spin::SpinContext;

/// Timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimingProfile {
    /// Normal gameplay timing
    #[default]
    Normal,
    /// Fast mode (halved durations)
    Turbo,
    /// Instant (headless/simulation)
    Instant,
}

/// Reel animation timing for one spin
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpinTiming {
    /// Base roll duration for the first column (ms)
    pub base_roll_ms: u32,
    /// Stagger between column starts (ms)
    pub column_stagger_ms: u32,
    /// Extra roll duration added per column (ms)
    pub column_ramp_ms: u32,
    /// Settle pause after the last column stops (ms)
    pub settle_ms: u32,
}

/// Detailed timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    pub profile: TimingProfile,
    /// Base-game reel timing
    pub base_spin: SpinTiming,
    /// Tighter reel timing during free spins
    pub free_spin: SpinTiming,
    /// Free-spin intro overlay duration (ms)
    pub intro_overlay_ms: u32,
    /// Free-spin summary overlay duration (ms)
    pub summary_overlay_ms: u32,
    /// Purchase confirmation overlay duration (ms)
    pub purchase_overlay_ms: u32,
    /// Pause between free spins (ms)
    pub free_spin_gap_ms: u32,
    /// Pause between auto-spins (ms)
    pub auto_spin_gap_ms: u32,
}

impl TimingConfig {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            base_spin: SpinTiming {
                base_roll_ms: 900,
                column_stagger_ms: 80,
                column_ramp_ms: 120,
                settle_ms: 100,
            },
            free_spin: SpinTiming {
                base_roll_ms: 650,
                column_stagger_ms: 55,
                column_ramp_ms: 80,
                settle_ms: 80,
            },
            intro_overlay_ms: 3200,
            summary_overlay_ms: 3000,
            purchase_overlay_ms: 2200,
            free_spin_gap_ms: 600,
            auto_spin_gap_ms: 300,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        let normal = Self::normal();
        Self {
            profile: TimingProfile::Turbo,
            base_spin: normal.base_spin.scaled(0.5),
            free_spin: normal.free_spin.scaled(0.5),
            intro_overlay_ms: normal.intro_overlay_ms / 2,
            summary_overlay_ms: normal.summary_overlay_ms / 2,
            purchase_overlay_ms: normal.purchase_overlay_ms / 2,
            free_spin_gap_ms: normal.free_spin_gap_ms / 2,
            auto_spin_gap_ms: normal.auto_spin_gap_ms / 2,
        }
    }

    /// Instant mode for headless runs and tests
    pub fn instant() -> Self {
        Self {
            profile: TimingProfile::Instant,
            base_spin: SpinTiming {
                base_roll_ms: 0,
                column_stagger_ms: 0,
                column_ramp_ms: 0,
                settle_ms: 0,
            },
            free_spin: SpinTiming {
                base_roll_ms: 0,
                column_stagger_ms: 0,
                column_ramp_ms: 0,
                settle_ms: 0,
            },
            intro_overlay_ms: 0,
            summary_overlay_ms: 0,
            purchase_overlay_ms: 0,
            free_spin_gap_ms: 0,
            auto_spin_gap_ms: 0,
        }
    }

    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Instant => Self::instant(),
        }
    }

    /// Reel timing for a context
    pub fn spin_timing(&self, ctx: SpinContext) -> SpinTiming {
        match ctx {
            SpinContext::Base => self.base_spin,
            SpinContext::FreeSpin => self.free_spin,
        }
    }
}

impl SpinTiming {
    fn scaled(self, factor: f64) -> Self {
        let scale = |ms: u32| (ms as f64 * factor) as u32;
        Self {
            base_roll_ms: scale(self.base_roll_ms),
            column_stagger_ms: scale(self.column_stagger_ms),
            column_ramp_ms: scale(self.column_ramp_ms),
            settle_ms: scale(self.settle_ms),
        }
    }

    /// Total animation span for `cols` columns
    pub fn total_ms(&self, cols: u8) -> u32 {
        let last = cols.saturating_sub(1) as u32;
        last * self.column_stagger_ms
            + self.base_roll_ms
            + last * self.column_ramp_ms
            + self.settle_ms
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_spins_run_tighter() {
        let config = TimingConfig::normal();
        assert!(config.free_spin.base_roll_ms < config.base_spin.base_roll_ms);
        assert!(config.free_spin.column_stagger_ms < config.base_spin.column_stagger_ms);
    }

    #[test]
    fn test_instant_is_zero() {
        let config = TimingConfig::instant();
        assert_eq!(config.base_spin.total_ms(6), 0);
        assert_eq!(config.intro_overlay_ms, 0);
    }

    #[test]
    fn test_total_span() {
        let timing = SpinTiming {
            base_roll_ms: 900,
            column_stagger_ms: 80,
            column_ramp_ms: 120,
            settle_ms: 100,
        };
        // 5 × 80 + 900 + 5 × 120 + 100
        assert_eq!(timing.total_ms(6), 2000);
    }
}
