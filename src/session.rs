//! Session state and bookkeeping
//!
//! All balance/bet/counter mutation funnels through these operations; nothing
//! else in the crate writes the fields directly. Balance is checked before
//! every debit, so it can never go negative.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::BetLadder;

/// Recoverable action failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SlotError {
    /// Manual spin or feature purchase attempted without cover
    #[error("insufficient funds: balance {balance:.2} < required {required:.2}")]
    InsufficientFunds { balance: f64, required: f64 },
    /// A spin or bonus round is already in progress; callers treat this as a no-op
    #[error("action conflicts with a spin or bonus round in progress")]
    ActionInProgress,
}

/// Mutable account and round-tracking state for one play session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    balance: f64,
    bet: f64,
    ladder: BetLadder,
    /// Monotonic; advances on every resolved spin
    spin_count: u64,
    /// Win accumulated since the last manual spin started
    session_win: f64,
    free_spins_remaining: u32,
    in_free_spins: bool,
    free_spin_total_win: f64,
}

impl SessionState {
    /// New session; the starting bet is snapped onto the ladder
    pub fn new(starting_balance: f64, starting_bet: f64, ladder: BetLadder) -> Self {
        let bet = ladder.snap(starting_bet);
        Self {
            balance: starting_balance.max(0.0),
            bet,
            ladder,
            spin_count: 0,
            session_win: 0.0,
            free_spins_remaining: 0,
            in_free_spins: false,
            free_spin_total_win: 0.0,
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn bet(&self) -> f64 {
        self.bet
    }

    pub fn spin_count(&self) -> u64 {
        self.spin_count
    }

    pub fn session_win(&self) -> f64 {
        self.session_win
    }

    pub fn free_spins_remaining(&self) -> u32 {
        self.free_spins_remaining
    }

    pub fn in_free_spins(&self) -> bool {
        self.in_free_spins
    }

    pub fn free_spin_total_win(&self) -> f64 {
        self.free_spin_total_win
    }

    /// Can the session cover `amount`?
    pub fn can_afford(&self, amount: f64) -> bool {
        self.balance >= amount
    }

    /// Remove funds; refused rather than driving the balance negative
    pub fn debit(&mut self, amount: f64) -> Result<(), SlotError> {
        if self.balance < amount {
            return Err(SlotError::InsufficientFunds {
                balance: self.balance,
                required: amount,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Credit a spin's total win in one atomic update and accumulate it into
    /// the session (and, during the bonus round, the free-spin) totals
    pub fn credit_win(&mut self, amount: f64) {
        self.balance += amount;
        self.session_win += amount;
        if self.in_free_spins {
            self.free_spin_total_win += amount;
        }
    }

    /// Advance the monotonic spin counter, returning the new value
    pub fn advance_spin_counter(&mut self) -> u64 {
        self.spin_count += 1;
        self.spin_count
    }

    /// A new manual spin starts: the session win resets
    pub fn reset_session_win(&mut self) {
        self.session_win = 0.0;
    }

    /// Set the bet, snapping off-ladder values to the nearest valid step
    pub fn set_bet(&mut self, requested: f64) -> f64 {
        self.bet = self.ladder.snap(requested);
        self.bet
    }

    /// Step the bet up (+1) or down (-1) the flat ladder; clamped at the ends
    pub fn step_bet(&mut self, direction: i32) -> f64 {
        let steps = self.ladder.flat_steps();
        let idx = match self.ladder.index_of(self.bet) {
            Some(idx) => idx as i64,
            // Off-ladder (config change): snap first
            None => {
                self.bet = self.ladder.snap(self.bet);
                self.ladder.index_of(self.bet).unwrap_or(0) as i64
            }
        };
        let next = idx + direction.signum() as i64;
        if next >= 0 && (next as usize) < steps.len() {
            self.bet = steps[next as usize];
        }
        self.bet
    }

    /// Replace the bet ladder (config import); the current bet re-snaps so it
    /// is always a member of the active ladder
    pub fn set_ladder(&mut self, ladder: BetLadder) {
        self.ladder = ladder;
        self.bet = self.ladder.snap(self.bet);
    }

    /// Grant free spins (initial trigger, re-trigger, or purchase top-up)
    pub fn add_free_spins(&mut self, count: u32) {
        self.free_spins_remaining += count;
    }

    /// Replace the free-spin counter (buy feature sets, it does not add)
    pub fn set_free_spins(&mut self, count: u32) {
        self.free_spins_remaining = count;
    }

    /// Enter the bonus round: mode flag on, bonus total reset
    pub fn enter_free_spins(&mut self) {
        self.in_free_spins = true;
        self.free_spin_total_win = 0.0;
    }

    /// Consume one remaining free spin; false when none are left
    pub fn consume_free_spin(&mut self) -> bool {
        if self.free_spins_remaining == 0 {
            return false;
        }
        self.free_spins_remaining -= 1;
        true
    }

    /// Leave the bonus round
    pub fn exit_free_spins(&mut self) {
        self.in_free_spins = false;
    }
}

/// Aggregate statistics for a running session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub total_bet: f64,
    pub total_win: f64,
    pub wins: u64,
    pub losses: u64,
    pub features_triggered: u64,
    pub nudged_spins: u64,
    pub max_win_ratio: f64,
}

impl SessionStats {
    /// Return-to-player percentage
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0.0 {
            (self.total_win / self.total_bet) * 100.0
        } else {
            0.0
        }
    }

    /// Percentage of spins that won anything
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionState {
        SessionState::new(100.0, 1.0, BetLadder::default())
    }

    #[test]
    fn test_debit_refused_below_balance() {
        let mut s = session();
        assert_eq!(
            s.debit(200.0),
            Err(SlotError::InsufficientFunds {
                balance: 100.0,
                required: 200.0
            })
        );
        assert_eq!(s.balance(), 100.0);

        s.debit(100.0).unwrap();
        assert_eq!(s.balance(), 0.0);
        assert!(s.debit(0.01).is_err());
    }

    #[test]
    fn test_credit_accumulates_session_and_bonus_totals() {
        let mut s = session();
        s.credit_win(5.0);
        assert_eq!(s.session_win(), 5.0);
        assert_eq!(s.free_spin_total_win(), 0.0);

        s.enter_free_spins();
        s.credit_win(2.0);
        assert_eq!(s.free_spin_total_win(), 2.0);
        assert_eq!(s.session_win(), 7.0);
        assert_eq!(s.balance(), 107.0);
    }

    #[test]
    fn test_bet_snaps_to_ladder() {
        let mut s = session();
        assert_eq!(s.set_bet(11.0), 10.0);
        assert_eq!(s.set_bet(2.5), 2.5);
        assert_eq!(s.set_bet(-3.0), 1.0);
    }

    #[test]
    fn test_step_bet_clamped() {
        let mut s = session();
        assert_eq!(s.step_bet(-1), 1.0); // Already at the bottom
        assert_eq!(s.step_bet(1), 1.5);
        assert_eq!(s.step_bet(1), 2.0);
        assert_eq!(s.step_bet(-1), 1.5);

        s.set_bet(100.0);
        assert_eq!(s.step_bet(1), 100.0); // Top of the ladder
    }

    #[test]
    fn test_ladder_swap_resnaps_bet() {
        let mut s = session();
        s.set_bet(10.0);

        s.set_ladder(BetLadder {
            presets: vec![2.0, 13.0],
            steps: vec![vec![2.0], vec![13.0]],
        });
        assert_eq!(s.bet(), 13.0);
        assert_eq!(s.set_bet(15.0), 13.0);
    }

    #[test]
    fn test_free_spin_counters() {
        let mut s = session();
        assert!(!s.consume_free_spin());

        s.add_free_spins(5);
        s.enter_free_spins();
        assert!(s.in_free_spins());

        assert!(s.consume_free_spin());
        assert_eq!(s.free_spins_remaining(), 4);
        s.add_free_spins(15); // Re-trigger mid-round
        assert_eq!(s.free_spins_remaining(), 19);

        s.exit_free_spins();
        assert!(!s.in_free_spins());
    }

    #[test]
    fn test_stats_rtp_and_hit_rate() {
        let stats = SessionStats {
            total_spins: 100,
            total_bet: 100.0,
            total_win: 95.0,
            wins: 20,
            ..Default::default()
        };
        assert_eq!(stats.rtp(), 95.0);
        assert_eq!(stats.hit_rate(), 20.0);
    }
}
