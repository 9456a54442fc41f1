//! Spin orchestration — grid generation, forced-win nudge, payout application
//!
//! Single-threaded cooperative model: every presentation call returns before
//! the engine proceeds, so evaluation always follows the reel animation and
//! balance updates land in strict spin order. No locks are needed; all shared
//! state lives in [`SessionState`] and is mutated through its operations only.

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use crate::config::SlotConfig;
use crate::free_spins::{FreeSpinRound, FreeSpinSummary};
use crate::paytable::PayTable;
use crate::presentation::{Overlay, Presentation};
use crate::session::{SessionState, SessionStats, SlotError};
use crate::spin::{SpinContext, SpinResult};
use crate::symbols::{Grid, SymbolGenerator, WeightedTable};
use crate::timing::{TimingConfig, TimingProfile};

/// Outcome of one manual spin, including any bonus round it started
#[derive(Debug, Clone)]
pub struct SpinOutcome {
    /// The base-game spin itself
    pub result: SpinResult,
    /// Summary of the free-spin round, when this spin triggered one
    pub free_spin_round: Option<FreeSpinSummary>,
}

/// Cluster-pays slot engine
///
/// Owns the RNG, paytable, session state, and the presentation handle. All
/// player actions (manual spin, bet change, buy feature, auto-spin) enter
/// through this type.
pub struct SlotEngine<P: Presentation> {
    config: SlotConfig,
    paytable: PayTable,
    generator: SymbolGenerator,
    /// Skewed table for the forced-win symbol pick
    forced_table: WeightedTable,
    timing: TimingConfig,
    rng: StdRng,
    session: SessionState,
    stats: SessionStats,
    round: FreeSpinRound,
    presentation: P,
    spinning: bool,
}

impl<P: Presentation> SlotEngine<P> {
    /// Create with the default configuration
    pub fn new(presentation: P) -> Self {
        Self::with_config(SlotConfig::default(), presentation)
    }

    /// Create with a specific configuration
    pub fn with_config(config: SlotConfig, presentation: P) -> Self {
        let generator = SymbolGenerator::new(&config.generator);
        let forced_table = WeightedTable::new(config.forced_win.symbol_weights);
        let session = SessionState::new(
            config.starting_balance,
            config.starting_bet,
            config.bet_ladder.clone(),
        );

        Self {
            generator,
            forced_table,
            timing: TimingConfig::normal(),
            rng: StdRng::from_os_rng(),
            session,
            stats: SessionStats::default(),
            round: FreeSpinRound::new(),
            presentation,
            spinning: false,
            paytable: PayTable::standard(),
            config,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Seed the RNG for reproducible results
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Switch timing profile
    pub fn set_timing(&mut self, profile: TimingProfile) {
        self.timing = TimingConfig::from_profile(profile);
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn paytable(&self) -> &PayTable {
        &self.paytable
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    /// Is a spin currently resolving?
    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// Is a bonus round active?
    pub fn in_free_spins(&self) -> bool {
        self.round.is_active()
    }

    /// Export config as JSON
    pub fn export_config(&self) -> String {
        self.config.to_json()
    }

    /// Import config from JSON; session state survives, generation parameters
    /// take effect on the next spin
    pub fn import_config(&mut self, json: &str) -> Result<(), String> {
        let config = SlotConfig::from_json(json)?;
        self.generator = SymbolGenerator::new(&config.generator);
        self.forced_table = WeightedTable::new(config.forced_win.symbol_weights);
        self.session.set_ladder(config.bet_ladder.clone());
        self.config = config;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BET SELECTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Set the bet; off-ladder values snap to the nearest step. Ignored while
    /// a spin or bonus round is in progress (the UI disables the control).
    pub fn set_bet(&mut self, requested: f64) -> f64 {
        if self.spinning || self.round.is_active() {
            return self.session.bet();
        }
        self.session.set_bet(requested)
    }

    /// Step the bet up (+1) or down (-1) the ladder; same in-progress guard
    pub fn step_bet(&mut self, direction: i32) -> f64 {
        if self.spinning || self.round.is_active() {
            return self.session.bet();
        }
        self.session.step_bet(direction)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// One player-initiated spin
    ///
    /// Preconditions: not currently spinning, no bonus round active, and
    /// balance covers the bet. Debits the bet up front, resets the session
    /// win, and — when the spin triggers the bonus — runs the whole free-spin
    /// round before returning.
    pub fn spin(&mut self) -> Result<SpinOutcome, SlotError> {
        if self.spinning || self.round.is_active() {
            log::debug!("spin refused: already in progress");
            return Err(SlotError::ActionInProgress);
        }
        let bet = self.session.bet();
        if !self.session.can_afford(bet) {
            let err = SlotError::InsufficientFunds {
                balance: self.session.balance(),
                required: bet,
            };
            self.presentation.display_warning(&err);
            return Err(err);
        }

        self.session.debit(bet)?;
        self.spinning = true;
        self.session.reset_session_win();
        self.presentation.display_balance(self.session.balance());
        self.presentation.display_session_win(0.0);

        let result = self.run_spin(SpinContext::Base);
        self.spinning = false;

        let free_spin_round = if result.feature_triggered {
            Some(self.run_free_spin_round())
        } else {
            None
        };

        Ok(SpinOutcome {
            result,
            free_spin_round,
        })
    }

    /// Resolve one spin in the given context: generate (and possibly nudge)
    /// the grid, animate, evaluate, and apply payouts.
    ///
    /// Does not debit — the manual-spin and buy-feature paths own their costs.
    /// The spin counter advances on every call, but the forced-win check is
    /// gated to base-game context.
    fn run_spin(&mut self, ctx: SpinContext) -> SpinResult {
        let spin_index = self.session.advance_spin_counter();

        let mut grid = self.generator.generate(self.config.grid, &mut self.rng);

        let interval = self.config.forced_win.interval;
        let nudged = ctx == SpinContext::Base && interval > 0 && spin_index % interval == 0;
        if nudged {
            self.apply_forced_win(&mut grid);
            self.stats.nudged_spins += 1;
        }

        // Presentation animates to the finalized grid before any payout shows
        self.presentation
            .render_grid(&grid, self.timing.spin_timing(ctx));

        let eval = self.paytable.evaluate(&grid, self.session.bet(), ctx);
        let result = SpinResult::from_evaluation(
            spin_index,
            grid,
            self.session.bet(),
            ctx,
            nudged,
            eval,
        );

        if result.is_win() {
            // Single atomic balance update for clusters + scatter cash
            self.session.credit_win(result.total_win);
            self.presentation.display_win(&result);
            self.presentation.display_balance(self.session.balance());
            self.presentation
                .display_session_win(self.session.session_win());
        }

        if result.free_spins_awarded > 0 {
            self.session.add_free_spins(result.free_spins_awarded);
            if ctx.is_free() {
                log::info!(
                    "[Spin {}] re-trigger: +{} free spins ({} remaining)",
                    spin_index,
                    result.free_spins_awarded,
                    self.session.free_spins_remaining()
                );
            }
        }

        self.update_stats(&result);
        result
    }

    /// Forced-win nudge: overwrite cells with one skew-picked symbol, each
    /// candidate with the configured probability, row-major, until the minimum
    /// winning cluster size has been placed or the grid is exhausted. Existing
    /// occurrences are never removed, so the final cluster may exceed the
    /// minimum.
    fn apply_forced_win(&mut self, grid: &mut Grid) {
        let symbol = self.forced_table.pick(&mut self.rng);
        let target = self.paytable.min_cluster() as usize;
        let p = self.config.forced_win.overwrite_probability;

        let mut placed = 0usize;
        for cell in grid.cells_mut() {
            if placed >= target {
                break;
            }
            if self.rng.random::<f64>() < p {
                *cell = symbol;
                placed += 1;
            }
        }

        log::debug!("forced-win nudge: {} × {}", placed, symbol.name());
    }

    fn update_stats(&mut self, result: &SpinResult) {
        self.stats.total_spins += 1;
        if result.context == SpinContext::Base {
            self.stats.total_bet += result.bet;
        }
        self.stats.total_win += result.total_win;

        if result.is_win() {
            self.stats.wins += 1;
        } else {
            self.stats.losses += 1;
        }

        if result.feature_triggered {
            self.stats.features_triggered += 1;
        }

        if result.win_ratio > self.stats.max_win_ratio {
            self.stats.max_win_ratio = result.win_ratio;
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FREE SPINS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Drive one bonus round from intro to summary
    ///
    /// Spins here are free: the balance is only ever credited. Re-triggers
    /// grow the remaining counter mid-loop without replaying the intro.
    fn run_free_spin_round(&mut self) -> FreeSpinSummary {
        let awarded = self.session.free_spins_remaining();
        log::info!("free spins: entering with {} spins", awarded);

        self.round.begin(awarded);
        self.session.enter_free_spins();
        self.presentation.display_overlay(
            Overlay::FreeSpinIntro { spins: awarded },
            self.timing.intro_overlay_ms,
        );
        self.round.activate();

        while self.session.consume_free_spin() {
            let result = self.run_spin(SpinContext::FreeSpin);
            self.round
                .record_spin(result.total_win, result.free_spins_awarded);
            self.presentation.pause(self.timing.free_spin_gap_ms);
        }

        let summary = self.round.complete();
        self.presentation.display_overlay(
            Overlay::FreeSpinSummary {
                total_win: summary.total_win,
            },
            self.timing.summary_overlay_ms,
        );
        self.session.exit_free_spins();
        self.round.close();
        self.presentation.display_balance(self.session.balance());

        log::info!(
            "free spins: finished, {} spins for {:.2}",
            summary.spins_played,
            summary.total_win
        );
        summary
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BUY FEATURE
    // ═══════════════════════════════════════════════════════════════════════════

    /// Purchase a free-spin round for bet × cost multiplier
    pub fn buy_free_spins(&mut self) -> Result<FreeSpinSummary, SlotError> {
        if self.spinning || self.round.is_active() {
            log::debug!("purchase refused: already in progress");
            return Err(SlotError::ActionInProgress);
        }
        let cost = self.session.bet() * self.config.buy_feature.cost_multiplier;
        if !self.session.can_afford(cost) {
            let err = SlotError::InsufficientFunds {
                balance: self.session.balance(),
                required: cost,
            };
            self.presentation.display_warning(&err);
            return Err(err);
        }

        self.session.debit(cost)?;
        self.presentation.display_balance(self.session.balance());

        let spins = self.config.buy_feature.spins;
        self.session.set_free_spins(spins);
        self.presentation.display_overlay(
            Overlay::PurchaseConfirmed { spins, cost },
            self.timing.purchase_overlay_ms,
        );

        Ok(self.run_free_spin_round())
    }

    /// Idle pause between auto-spins (presentation pacing)
    pub(crate) fn auto_spin_pause(&mut self) {
        let gap = self.timing.auto_spin_gap_ms;
        self.presentation.pause(gap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::{NullPresentation, RecordingPresentation};
    use crate::symbols::PAYING_SYMBOLS;
    use approx::assert_relative_eq;

    fn rich_config() -> SlotConfig {
        SlotConfig {
            starting_balance: 10_000.0,
            ..SlotConfig::default()
        }
    }

    fn engine() -> SlotEngine<RecordingPresentation> {
        let mut engine =
            SlotEngine::with_config(rich_config(), RecordingPresentation::default());
        engine.set_timing(TimingProfile::Instant);
        engine
    }

    #[test]
    fn test_manual_spin_debits_then_credits() {
        let mut e = engine();
        e.seed(42);

        let before = e.session().balance();
        let outcome = e.spin().unwrap();
        let expected = before - outcome.result.bet
            + outcome.result.total_win
            + outcome
                .free_spin_round
                .map(|r| r.total_win)
                .unwrap_or(0.0);
        assert_relative_eq!(e.session().balance(), expected);
    }

    #[test]
    fn test_spin_refused_without_funds() {
        let config = SlotConfig {
            starting_balance: 0.5,
            ..SlotConfig::default()
        };
        let mut e = SlotEngine::with_config(config, RecordingPresentation::default());

        let err = e.spin().unwrap_err();
        assert!(matches!(err, SlotError::InsufficientFunds { .. }));
        assert_eq!(e.session().balance(), 0.5);
        assert_eq!(e.presentation().warnings.len(), 1);
        assert_eq!(e.stats().total_spins, 0);
    }

    #[test]
    fn test_spin_sequence_reproducible() {
        let run = |seed: u64| {
            let mut e = SlotEngine::with_config(rich_config(), NullPresentation);
            e.seed(seed);
            (0..30)
                .map(|_| e.spin().unwrap().result.total_win)
                .collect::<Vec<_>>()
        };

        assert_eq!(run(7), run(7));
        assert_ne!(run(7), run(8));
    }

    #[test]
    fn test_forced_win_nudge_guarantees_cluster() {
        let mut e = engine();
        e.seed(3);

        let mut nudges = 0;
        for _ in 0..60 {
            let outcome = e.spin().unwrap();
            let result = outcome.result;
            if result.nudged {
                nudges += 1;
                assert_eq!(result.spin_index % 20, 0);
                let max_count = PAYING_SYMBOLS
                    .iter()
                    .map(|&s| result.grid.count(s))
                    .max()
                    .unwrap();
                assert!(
                    max_count >= 8,
                    "nudged grid holds only {} of its best symbol",
                    max_count
                );
                assert!(result.is_win());
            }
        }
        assert!(nudges >= 1, "no nudged spin in 60 manual spins");
    }

    #[test]
    fn test_nudge_disabled_by_zero_interval() {
        let mut config = rich_config();
        config.forced_win.interval = 0;
        let mut e = SlotEngine::with_config(config, NullPresentation);
        e.seed(3);

        for _ in 0..40 {
            assert!(!e.spin().unwrap().result.nudged);
        }
    }

    #[test]
    fn test_free_spins_never_debit() {
        let mut e = engine();
        e.seed(11);

        let cost = e.session().bet() * e.config().buy_feature.cost_multiplier;
        let before = e.session().balance();
        let summary = e.buy_free_spins().unwrap();

        // Only the purchase debits; every free spin can only credit
        assert_relative_eq!(
            e.session().balance(),
            before - cost + summary.total_win
        );
        assert!(summary.spins_played >= 10);
        assert!(!e.in_free_spins());
    }

    #[test]
    fn test_bonus_round_shows_one_intro_and_summary() {
        let mut e = engine();
        e.seed(11);
        e.buy_free_spins().unwrap();

        let p = e.presentation();
        assert_eq!(p.intro_count(), 1);
        assert!(
            p.overlays
                .iter()
                .any(|o| matches!(o, Overlay::FreeSpinSummary { .. }))
        );
        assert!(
            p.overlays
                .iter()
                .any(|o| matches!(o, Overlay::PurchaseConfirmed { spins: 10, .. }))
        );
    }

    #[test]
    fn test_buy_refused_without_cover() {
        let config = SlotConfig {
            starting_balance: 50.0, // Cost is 100 at bet 1
            ..SlotConfig::default()
        };
        let mut e = SlotEngine::with_config(config, RecordingPresentation::default());

        let err = e.buy_free_spins().unwrap_err();
        assert!(matches!(err, SlotError::InsufficientFunds { .. }));
        assert_eq!(e.session().balance(), 50.0);
        assert_eq!(e.session().free_spins_remaining(), 0);
    }

    #[test]
    fn test_spin_counter_advances_in_free_context_too() {
        let mut e = engine();
        e.seed(5);

        let summary = e.buy_free_spins().unwrap();
        // Every free spin advanced the monotonic counter
        assert_eq!(e.session().spin_count(), summary.spins_played as u64);
    }

    #[test]
    fn test_bet_change_guarded_and_snapped() {
        let mut e = engine();
        assert_eq!(e.set_bet(11.0), 10.0);
        assert_eq!(e.step_bet(1), 15.0);
        assert_eq!(e.step_bet(-1), 10.0);
    }

    #[test]
    fn test_render_precedes_payout_display() {
        let mut e = engine();
        e.seed(21);
        let mut spins = 0;
        while spins < 50 {
            let outcome = e.spin().unwrap();
            spins += 1;
            if outcome.result.is_win() {
                // The rendered grid for a winning spin was recorded before the
                // win amount
                let p = e.presentation();
                assert!(!p.grids.is_empty());
                assert!(!p.wins.is_empty());
                return;
            }
        }
        panic!("no winning spin in 50 attempts");
    }

    #[test]
    fn test_stats_track_spins_and_rtp_inputs() {
        let mut e = engine();
        e.seed(9);

        for _ in 0..25 {
            e.spin().unwrap();
        }
        let stats = e.stats();
        assert!(stats.total_spins >= 25); // Free spins count too
        assert_relative_eq!(stats.total_bet, 25.0); // Only base spins bet
        assert_eq!(stats.wins + stats.losses, stats.total_spins);
    }

    #[test]
    fn test_config_import_replaces_ladder() {
        let mut e = engine();
        let mut config = rich_config();
        config.bet_ladder = crate::config::BetLadder {
            presets: vec![2.0, 13.0],
            steps: vec![vec![2.0], vec![13.0]],
        };
        e.import_config(&config.to_json()).unwrap();

        // The starting bet (1.0) re-snapped onto the imported ladder
        assert_eq!(e.session().bet(), 2.0);
        // Snapping now targets the new ladder, not the default one
        assert_eq!(e.set_bet(13.0), 13.0);
        assert_eq!(e.set_bet(15.0), 13.0);
        assert!(e.config().bet_ladder.contains(e.session().bet()));
    }

    #[test]
    fn test_config_import_keeps_session() {
        let mut e = engine();
        e.seed(1);
        e.spin().unwrap();
        let count = e.session().spin_count();

        let mut config = rich_config();
        config.forced_win.interval = 10;
        e.import_config(&config.to_json()).unwrap();

        assert_eq!(e.session().spin_count(), count);
        assert_eq!(e.config().forced_win.interval, 10);
    }
}
