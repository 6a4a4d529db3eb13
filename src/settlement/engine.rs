use crate::config::EngineConfig;
use crate::core::expense::{Expense, ExpenseError};
use crate::core::ledger::{LedgerSnapshot, MembershipError};
use crate::core::participant::{Participant, ParticipantId};
use crate::settlement::balance::{aggregate, NetBalance};
use crate::settlement::greedy::match_greedy;
use crate::settlement::plan::{format_report, SettlementReport};
use crate::settlement::simplify::simplify;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Reasons a settlement request is refused.
///
/// Both variants describe bad input; callers should reject the request
/// rather than retry it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("expense #{index} is malformed: {source}")]
    MalformedExpense {
        index: usize,
        #[source]
        source: ExpenseError,
    },
    #[error("expense #{expense_index} references participant {participant} outside the participant set")]
    ReferentialIntegrity {
        expense_index: usize,
        participant: ParticipantId,
    },
}

impl From<MembershipError> for SettlementError {
    fn from(err: MembershipError) -> Self {
        SettlementError::ReferentialIntegrity {
            expense_index: err.expense_index,
            participant: err.participant,
        }
    }
}

/// Non-fatal conditions attached to an otherwise valid report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SettlementWarning {
    /// The simplifier stopped at its pass cap with chains left to collapse.
    NonConvergence { passes: usize },
}

impl fmt::Display for SettlementWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettlementWarning::NonConvergence { passes } => write!(
                f,
                "transfer simplification stopped after {} passes; plan is valid but not fully simplified",
                passes
            ),
        }
    }
}

/// Computes who pays whom to settle a shared-expense ledger.
///
/// The engine is stateless: each call is a pure function of the snapshot
/// and the configuration, so one engine can serve concurrent requests.
///
/// # Pipeline
///
/// 1. Validate every expense (shares sum to the total within epsilon).
/// 2. Aggregate expenses into a [`NetBalance`].
/// 3. Greedily match largest debtors with largest creditors.
/// 4. Collapse transitive `A → B → C` chains.
/// 5. Round and emit the report.
///
/// # Examples
///
/// ```
/// use settlement_engine::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let participants = vec![
///     Participant::new(1, "alice"),
///     Participant::new(2, "bob"),
///     Participant::new(3, "carol"),
/// ];
/// let dinner = Expense::new(1, dec!(90), vec![
///     Share::new(1, dec!(30)),
///     Share::new(2, dec!(30)),
///     Share::new(3, dec!(30)),
/// ]).unwrap();
///
/// let report = SettlementEngine::default()
///     .compute_settlement(participants, vec![dinner])
///     .unwrap();
///
/// assert_eq!(report.transfers.len(), 2);
/// assert_eq!(report.net_balance(ParticipantId::new(1)), Some(dec!(60)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    config: EngineConfig,
}

impl SettlementEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Settle `expenses` among `participants`.
    ///
    /// Participant order is significant: it breaks ties between equal
    /// balances and orders the emitted transfers.
    pub fn compute_settlement(
        &self,
        participants: Vec<Participant>,
        expenses: Vec<Expense>,
    ) -> Result<SettlementReport, SettlementError> {
        self.settle(&LedgerSnapshot::new(participants, expenses))
    }

    /// Settle a prepared snapshot.
    pub fn settle(&self, snapshot: &LedgerSnapshot) -> Result<SettlementReport, SettlementError> {
        let epsilon = self.config.epsilon;
        let balance = self.net_balances(snapshot)?;

        let initial = match_greedy(&balance, epsilon);
        debug!(
            "greedy matcher produced {} transfers for {} participants",
            initial.edge_count(epsilon),
            initial.size()
        );

        let outcome = simplify(&initial, epsilon, self.config.pass_cap);
        debug!(
            "simplifier left {} transfers after {} passes",
            outcome.matrix.edge_count(epsilon),
            outcome.passes
        );

        let mut report = format_report(snapshot, &balance, &outcome.matrix, epsilon, self.config.scale);
        report.passes = outcome.passes;
        if !outcome.converged {
            report.warnings.push(SettlementWarning::NonConvergence {
                passes: outcome.passes,
            });
        }
        Ok(report)
    }

    /// Validate the snapshot and compute unrounded net balances.
    pub fn net_balances(&self, snapshot: &LedgerSnapshot) -> Result<NetBalance, SettlementError> {
        for (index, expense) in snapshot.expenses().iter().enumerate() {
            expense
                .validate()
                .map_err(|source| SettlementError::MalformedExpense { index, source })?;
        }
        let balance = aggregate(snapshot)?;
        debug!(
            "aggregated {} expenses into {} balances (gross {})",
            snapshot.expenses().len(),
            balance.len(),
            snapshot.gross_total()
        );
        Ok(balance)
    }
}
