use crate::core::ledger::LedgerSnapshot;
use crate::core::money::round_amount;
use crate::core::participant::ParticipantId;
use crate::settlement::balance::NetBalance;
use crate::settlement::engine::SettlementWarning;
use crate::settlement::matrix::TransferMatrix;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single payment in the settlement plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: ParticipantId,
    pub from_label: String,
    pub to: ParticipantId,
    pub to_label: String,
    pub amount: Decimal,
}

/// Rounded net position of one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub participant: ParticipantId,
    pub label: String,
    pub net_balance: Decimal,
}

/// Everything a caller needs to show and execute a settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReport {
    /// One entry per participant, in snapshot order.
    pub summary: Vec<ParticipantSummary>,
    /// Directed payments, row-major over the final transfer matrix.
    pub transfers: Vec<Transfer>,
    /// Sum of all expense amounts in the snapshot.
    pub gross_total: Decimal,
    /// Simplifier passes executed.
    pub passes: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SettlementWarning>,
}

impl SettlementReport {
    /// Rounded net balance of a participant, if present.
    pub fn net_balance(&self, participant: ParticipantId) -> Option<Decimal> {
        self.summary
            .iter()
            .find(|s| s.participant == participant)
            .map(|s| s.net_balance)
    }

    /// Amount `from` pays `to` in the plan; zero when no such transfer exists.
    pub fn transfer_amount(&self, from: ParticipantId, to: ParticipantId) -> Decimal {
        self.transfers
            .iter()
            .find(|t| t.from == from && t.to == to)
            .map(|t| t.amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// Total money moved by the plan.
    pub fn total_transferred(&self) -> Decimal {
        self.transfers.iter().map(|t| t.amount).sum()
    }

    /// True when the simplifier stopped at its pass cap.
    pub fn is_partially_simplified(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, SettlementWarning::NonConvergence { .. }))
    }
}

/// Emit the per-participant summary and the non-zero transfers.
///
/// Cells above `epsilon` become transfers, rounded to `scale` decimal
/// places half away from zero; a transfer that rounds to zero is dropped.
/// Balances in the summary are rounded the same way.
pub fn format_report(
    snapshot: &LedgerSnapshot,
    balance: &NetBalance,
    matrix: &TransferMatrix,
    epsilon: Decimal,
    scale: u32,
) -> SettlementReport {
    let label = |id: ParticipantId| {
        snapshot
            .label_of(id)
            .map(str::to_owned)
            .unwrap_or_else(|| id.to_string())
    };

    let summary = balance
        .entries()
        .iter()
        .map(|(id, amount)| ParticipantSummary {
            participant: *id,
            label: label(*id),
            net_balance: round_amount(*amount, scale),
        })
        .collect();

    let transfers = matrix
        .edges_above(epsilon)
        .into_iter()
        .filter_map(|(from, to, amount)| {
            let amount = round_amount(amount, scale);
            if amount.is_zero() {
                return None;
            }
            let (from, to) = (matrix.participant(from), matrix.participant(to));
            Some(Transfer {
                from,
                from_label: label(from),
                to,
                to_label: label(to),
                amount,
            })
        })
        .collect();

    SettlementReport {
        summary,
        transfers,
        gross_total: snapshot.gross_total(),
        passes: 0,
        warnings: Vec::new(),
    }
}

impl std::fmt::Display for SettlementReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Settlement ===")?;
        writeln!(f, "Gross Total:    {}", self.gross_total)?;
        writeln!(f, "Transfers:      {}", self.transfers.len())?;
        writeln!(f, "Moved:          {}", self.total_transferred())?;

        writeln!(f, "\n--- Balances ---")?;
        for entry in &self.summary {
            let status = if entry.net_balance > Decimal::ZERO {
                "OWED"
            } else if entry.net_balance < Decimal::ZERO {
                "OWES"
            } else {
                "SETTLED"
            };
            writeln!(f, "  {:<16} {:>12}  [{}]", entry.label, entry.net_balance, status)?;
        }

        writeln!(f, "\n--- Transfers ---")?;
        if self.transfers.is_empty() {
            writeln!(f, "  (nothing to settle)")?;
        }
        for t in &self.transfers {
            writeln!(f, "  {} → {}: {}", t.from_label, t.to_label, t.amount)?;
        }

        for warning in &self.warnings {
            writeln!(f, "\nWarning: {}", warning)?;
        }
        Ok(())
    }
}
