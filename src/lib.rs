//! # settlement-engine
//!
//! Balance netting and transfer settlement for shared expenses.
//!
//! Given the participants of an event and the expenses they split, this
//! engine answers "who pays whom, and how much" with a short list of
//! direct transfers.
//!
//! ## Architecture
//!
//! - **core** — Ledger types: participants, expenses and shares, snapshots, money
//! - **settlement** — Net balances, greedy matching, chain simplification, reports
//! - **config** — Engine tolerances and simplifier pass cap
//! - **simulation** — Random ledger generation for stress testing

pub mod config;
pub mod core;
pub mod settlement;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::core::expense::{Expense, ExpenseError, Share};
    pub use crate::core::ledger::LedgerSnapshot;
    pub use crate::core::participant::{Participant, ParticipantId};
    pub use crate::settlement::balance::NetBalance;
    pub use crate::settlement::engine::{SettlementEngine, SettlementError, SettlementWarning};
    pub use crate::settlement::plan::{ParticipantSummary, SettlementReport, Transfer};
}
