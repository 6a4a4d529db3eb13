use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Dense participant × participant table of pending transfers.
///
/// `amount(i, j)` is what the participant at position `i` pays the
/// participant at position `j`. Rows and columns share the participant
/// order of the balance they were built from, and cells never go negative.
/// A pair is stored once per direction, so parallel transfers between
/// the same two participants are merged by construction.
///
/// # Examples
///
/// ```
/// use settlement_engine::core::participant::ParticipantId;
/// use settlement_engine::settlement::matrix::TransferMatrix;
/// use rust_decimal_macros::dec;
///
/// let ids = vec![ParticipantId::new(1), ParticipantId::new(2)];
/// let mut matrix = TransferMatrix::new(ids);
/// matrix.add(1, 0, dec!(25));
///
/// assert_eq!(matrix.net_position(0), dec!(25));
/// assert_eq!(matrix.net_position(1), dec!(-25));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferMatrix {
    participants: Vec<ParticipantId>,
    cells: Vec<Decimal>,
}

impl TransferMatrix {
    /// An all-zero matrix over `participants`.
    pub fn new(participants: Vec<ParticipantId>) -> Self {
        let n = participants.len();
        Self {
            participants,
            cells: vec![Decimal::ZERO; n * n],
        }
    }

    /// Number of participants (rows = columns).
    pub fn size(&self) -> usize {
        self.participants.len()
    }

    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    pub fn participant(&self, index: usize) -> ParticipantId {
        self.participants[index]
    }

    pub fn amount(&self, from: usize, to: usize) -> Decimal {
        self.cells[self.offset(from, to)]
    }

    pub fn set(&mut self, from: usize, to: usize, amount: Decimal) {
        debug_assert!(from != to, "self-transfer at index {}", from);
        debug_assert!(amount >= Decimal::ZERO, "negative cell {}", amount);
        let offset = self.offset(from, to);
        self.cells[offset] = amount;
    }

    pub fn add(&mut self, from: usize, to: usize, amount: Decimal) {
        let current = self.amount(from, to);
        self.set(from, to, current + amount);
    }

    /// Total paid out by a participant.
    pub fn row_sum(&self, index: usize) -> Decimal {
        (0..self.size()).map(|to| self.amount(index, to)).sum()
    }

    /// Total received by a participant.
    pub fn column_sum(&self, index: usize) -> Decimal {
        (0..self.size()).map(|from| self.amount(from, index)).sum()
    }

    /// Received minus paid out.
    ///
    /// Executing every transfer in the matrix moves this much money to the
    /// participant, so for a matrix that settles a balance this equals the
    /// participant's net balance.
    pub fn net_position(&self, index: usize) -> Decimal {
        self.column_sum(index) - self.row_sum(index)
    }

    /// Cells strictly above `threshold`, row-major: `(from, to, amount)`.
    pub fn edges_above(&self, threshold: Decimal) -> Vec<(usize, usize, Decimal)> {
        let n = self.size();
        let mut edges = Vec::new();
        for from in 0..n {
            for to in 0..n {
                let amount = self.amount(from, to);
                if amount > threshold {
                    edges.push((from, to, amount));
                }
            }
        }
        edges
    }

    /// Number of cells strictly above `threshold`.
    pub fn edge_count(&self, threshold: Decimal) -> usize {
        self.cells.iter().filter(|c| **c > threshold).count()
    }

    fn offset(&self, from: usize, to: usize) -> usize {
        from * self.size() + to
    }
}
