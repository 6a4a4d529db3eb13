use crate::core::expense::Expense;
use crate::core::participant::{Participant, ParticipantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// A participant or payer that is not a member of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expense #{expense_index} references participant {participant} outside the participant set")]
pub struct MembershipError {
    pub expense_index: usize,
    pub participant: ParticipantId,
}

/// The immutable input to one settlement computation.
///
/// Participants keep the order in which they were supplied; a repeated
/// ID is dropped in favour of its first occurrence. That order is what
/// the settlement stages use for tie-breaking and for laying out the
/// transfer matrix.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "SnapshotRecord", into = "SnapshotRecord")]
pub struct LedgerSnapshot {
    participants: Vec<Participant>,
    expenses: Vec<Expense>,
    index: HashMap<ParticipantId, usize>,
}

#[derive(Serialize, Deserialize)]
struct SnapshotRecord {
    participants: Vec<Participant>,
    #[serde(default)]
    expenses: Vec<Expense>,
}

impl From<SnapshotRecord> for LedgerSnapshot {
    fn from(record: SnapshotRecord) -> Self {
        Self::new(record.participants, record.expenses)
    }
}

impl From<LedgerSnapshot> for SnapshotRecord {
    fn from(snapshot: LedgerSnapshot) -> Self {
        Self {
            participants: snapshot.participants,
            expenses: snapshot.expenses,
        }
    }
}

impl LedgerSnapshot {
    pub fn new(participants: Vec<Participant>, expenses: Vec<Expense>) -> Self {
        let mut index = HashMap::with_capacity(participants.len());
        let mut unique = Vec::with_capacity(participants.len());
        for participant in participants {
            if index.contains_key(&participant.id) {
                continue;
            }
            index.insert(participant.id, unique.len());
            unique.push(participant);
        }
        Self {
            participants: unique,
            expenses,
            index,
        }
    }

    /// Build a snapshot from bare IDs, labelling each participant with its ID.
    pub fn from_ids(ids: impl IntoIterator<Item = ParticipantId>, expenses: Vec<Expense>) -> Self {
        let participants = ids
            .into_iter()
            .map(|id| Participant::new(id, id.to_string()))
            .collect();
        Self::new(participants, expenses)
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant_ids(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.participants.iter().map(|p| p.id)
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Position of a participant in insertion order.
    pub fn participant_index(&self, id: ParticipantId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.index.contains_key(&id)
    }

    /// Display label for a participant, if it belongs to the snapshot.
    pub fn label_of(&self, id: ParticipantId) -> Option<&str> {
        self.participant_index(id)
            .map(|i| self.participants[i].label.as_str())
    }

    /// Total of all expense amounts.
    pub fn gross_total(&self) -> Decimal {
        self.expenses.iter().map(|e| e.amount()).sum()
    }

    /// Check that every payer and share participant is a member.
    ///
    /// Reports the first offending reference in expense order.
    pub fn validate_membership(&self) -> Result<(), MembershipError> {
        for (expense_index, expense) in self.expenses.iter().enumerate() {
            if let Some(participant) = expense
                .referenced_participants()
                .find(|p| !self.contains(*p))
            {
                return Err(MembershipError {
                    expense_index,
                    participant,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expense::Share;
    use rust_decimal_macros::dec;

    fn trio() -> Vec<Participant> {
        vec![
            Participant::new(1, "alice"),
            Participant::new(2, "bob"),
            Participant::new(3, "carol"),
        ]
    }

    #[test]
    fn test_snapshot_keeps_insertion_order() {
        let snapshot = LedgerSnapshot::new(
            vec![
                Participant::new(9, "zed"),
                Participant::new(1, "alice"),
                Participant::new(9, "duplicate"),
            ],
            vec![],
        );
        assert_eq!(snapshot.participant_count(), 2);
        assert_eq!(snapshot.participant_index(ParticipantId::new(9)), Some(0));
        assert_eq!(snapshot.participant_index(ParticipantId::new(1)), Some(1));
        assert_eq!(snapshot.label_of(ParticipantId::new(9)), Some("zed"));
    }

    #[test]
    fn test_gross_total() {
        let snapshot = LedgerSnapshot::new(
            trio(),
            vec![
                Expense::new(1, dec!(90), vec![Share::new(2, dec!(90))]).unwrap(),
                Expense::new(2, dec!(15.50), vec![Share::new(3, dec!(15.50))]).unwrap(),
            ],
        );
        assert_eq!(snapshot.gross_total(), dec!(105.50));
    }

    #[test]
    fn test_membership_rejects_outsider() {
        let snapshot = LedgerSnapshot::new(
            trio(),
            vec![
                Expense::new(1, dec!(10), vec![Share::new(2, dec!(10))]).unwrap(),
                Expense::new(3, dec!(10), vec![Share::new(4, dec!(10))]).unwrap(),
            ],
        );
        assert_eq!(
            snapshot.validate_membership(),
            Err(MembershipError {
                expense_index: 1,
                participant: ParticipantId::new(4),
            })
        );
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let snapshot = LedgerSnapshot::new(
            trio(),
            vec![Expense::new(1, dec!(10), vec![Share::new(2, dec!(10))]).unwrap()],
        );
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: LedgerSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.participant_count(), 3);
        assert_eq!(back.participant_index(ParticipantId::new(3)), Some(2));
        assert_eq!(back.expenses().len(), 1);
    }
}
