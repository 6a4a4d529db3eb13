use crate::core::ledger::{LedgerSnapshot, MembershipError};
use crate::core::money::approx_zero;
use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Signed net position of every participant in a snapshot.
///
/// Positive = net creditor (is owed money).
/// Negative = net debtor (owes money).
///
/// Entries follow the snapshot's participant order, and every
/// participant is present, including those at zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetBalance {
    entries: Vec<(ParticipantId, Decimal)>,
}

impl NetBalance {
    /// Build a balance table directly from ordered entries.
    pub fn from_entries(entries: Vec<(ParticipantId, Decimal)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(ParticipantId, Decimal)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Net position of a participant; zero for unknown IDs.
    pub fn get(&self, participant: ParticipantId) -> Decimal {
        self.entries
            .iter()
            .find(|(id, _)| *id == participant)
            .map(|(_, amount)| *amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// Sum of all positions. Zero for any balance built from a ledger.
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|(_, amount)| *amount).sum()
    }

    /// True when positions sum to zero within `epsilon`.
    pub fn is_conserved(&self, epsilon: Decimal) -> bool {
        approx_zero(self.total(), epsilon)
    }

    /// Sum of positive positions: the amount that has to change hands.
    pub fn total_owed(&self) -> Decimal {
        self.entries
            .iter()
            .map(|(_, amount)| *amount)
            .filter(|amount| *amount > Decimal::ZERO)
            .sum()
    }
}

/// Reduce a snapshot's expenses to one net position per participant.
///
/// The payer of each expense is credited with the full amount and every
/// share's participant is debited with its share. A payer who also holds
/// a share ends up owed only the remainder.
///
/// # Algorithm
///
/// 1. Start every participant at zero.
/// 2. For each expense: payer += amount; for each share, participant -= share.
///
/// Fails with the first reference to a participant outside the snapshot.
pub fn aggregate(snapshot: &LedgerSnapshot) -> Result<NetBalance, MembershipError> {
    let mut positions = vec![Decimal::ZERO; snapshot.participant_count()];

    for (expense_index, expense) in snapshot.expenses().iter().enumerate() {
        let locate = |participant: ParticipantId| {
            snapshot
                .participant_index(participant)
                .ok_or(MembershipError {
                    expense_index,
                    participant,
                })
        };

        positions[locate(expense.payer())?] += expense.amount();
        for share in expense.shares() {
            positions[locate(share.participant)?] -= share.amount;
        }
    }

    let entries = snapshot.participant_ids().zip(positions).collect();
    Ok(NetBalance { entries })
}
