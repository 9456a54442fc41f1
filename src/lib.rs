//! # clusterspin — Cluster-Pays Slot Resolution Engine
//!
//! Resolves slot spins for a 5×6 cluster-pays fruit game: weighted symbol
//! generation, pay-anywhere cluster and scatter evaluation, free-spin rounds
//! with re-triggers, a periodic forced-win nudge, and an auto-spin loop —
//! everything with real rules and money attached. Rendering stays behind the
//! [`presentation::Presentation`] trait.
//!
//! ## Architecture
//!
//! ```text
//! SlotEngine
//!     │
//!     ├── SlotConfig (grid, weights, ladder, nudge, buy feature)
//!     ├── SymbolGenerator → Grid
//!     ├── PayTable (cluster tiers, scatter brackets)
//!     ├── SessionState (balance, bet, counters)
//!     └── FreeSpinRound (Idle → Intro → Spinning → Summary)
//!           │
//!           v
//!     SpinResult → Presentation
//! ```

pub mod autoplay;
pub mod config;
pub mod engine;
pub mod free_spins;
pub mod paytable;
pub mod presentation;
pub mod session;
pub mod spin;
pub mod symbols;
pub mod timing;

pub use autoplay::*;
pub use config::*;
pub use engine::*;
pub use free_spins::*;
pub use paytable::*;
pub use presentation::*;
pub use session::*;
pub use spin::*;
pub use symbols::*;
pub use timing::*;
