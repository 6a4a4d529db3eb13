use crate::core::money::{approx_eq, EPSILON};
use crate::core::participant::ParticipantId;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Reasons an expense cannot enter a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseError {
    #[error("expense amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("share for participant {participant} is negative: {amount}")]
    NegativeShare {
        participant: ParticipantId,
        amount: Decimal,
    },
    #[error("expense has no shares")]
    EmptyShares,
    #[error("sum of shares ({actual}) must equal expense amount ({expected})")]
    SharesMismatch { expected: Decimal, actual: Decimal },
}

/// One participant's portion of one expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub participant: ParticipantId,
    pub amount: Decimal,
}

impl Share {
    pub fn new(participant: impl Into<ParticipantId>, amount: Decimal) -> Self {
        Self {
            participant: participant.into(),
            amount,
        }
    }
}

/// An amount fronted by one payer and split across participant shares.
///
/// Build expenses with [`Expense::new`], which rejects totals that the
/// shares do not add up to (within one cent). Deserialization does not
/// validate; the settlement engine re-checks every expense it receives.
///
/// # Examples
///
/// ```
/// use settlement_engine::core::expense::{Expense, Share};
/// use rust_decimal_macros::dec;
///
/// let dinner = Expense::new(
///     1,
///     dec!(100.00),
///     vec![
///         Share::new(1, dec!(33.33)),
///         Share::new(2, dec!(33.33)),
///         Share::new(3, dec!(33.34)),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(dinner.amount(), dec!(100.00));
/// assert_eq!(dinner.shares().len(), 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    payer: ParticipantId,
    amount: Decimal,
    #[serde(default)]
    description: Option<String>,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
    shares: Vec<Share>,
}

impl Expense {
    /// Create a validated expense.
    pub fn new(
        payer: impl Into<ParticipantId>,
        amount: Decimal,
        shares: Vec<Share>,
    ) -> Result<Self, ExpenseError> {
        Self::with_id(Uuid::new_v4(), payer, amount, shares)
    }

    /// Create a validated expense with a caller-supplied ID.
    pub fn with_id(
        id: Uuid,
        payer: impl Into<ParticipantId>,
        amount: Decimal,
        shares: Vec<Share>,
    ) -> Result<Self, ExpenseError> {
        let expense = Self {
            id,
            payer: payer.into(),
            amount,
            description: None,
            created_at: Utc::now(),
            shares,
        };
        expense.validate()?;
        Ok(expense)
    }

    /// Split `amount` evenly across `participants`, assigning the rounding
    /// remainder cent by cent to the first participants.
    pub fn split_evenly(
        payer: impl Into<ParticipantId>,
        amount: Decimal,
        participants: &[ParticipantId],
    ) -> Result<Self, ExpenseError> {
        if participants.is_empty() {
            return Err(ExpenseError::EmptyShares);
        }
        let count = Decimal::from(participants.len());
        let base = (amount / count).round_dp_with_strategy(2, RoundingStrategy::ToZero);
        let mut remainder = amount - base * count;
        let shares = participants
            .iter()
            .map(|p| {
                let mut share = base;
                if remainder >= EPSILON {
                    share += EPSILON;
                    remainder -= EPSILON;
                }
                Share::new(*p, share)
            })
            .collect();
        Self::new(payer, amount, shares)
    }

    /// Attach a free-text description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the shares, re-checking them against the current amount.
    pub fn with_shares(mut self, shares: Vec<Share>) -> Result<Self, ExpenseError> {
        self.shares = shares;
        self.validate()?;
        Ok(self)
    }

    /// Replace the amount, re-checking it against the current shares.
    pub fn with_amount(mut self, amount: Decimal) -> Result<Self, ExpenseError> {
        self.amount = amount;
        self.validate()?;
        Ok(self)
    }

    /// Reassign the payer.
    pub fn with_payer(mut self, payer: impl Into<ParticipantId>) -> Self {
        self.payer = payer.into();
        self
    }

    /// Check the amount and share invariants.
    ///
    /// A difference of exactly one cent between the share sum and the
    /// total is accepted.
    pub fn validate(&self) -> Result<(), ExpenseError> {
        if self.amount <= Decimal::ZERO {
            return Err(ExpenseError::NonPositiveAmount(self.amount));
        }
        if self.shares.is_empty() {
            return Err(ExpenseError::EmptyShares);
        }
        if let Some(share) = self.shares.iter().find(|s| s.amount < Decimal::ZERO) {
            return Err(ExpenseError::NegativeShare {
                participant: share.participant,
                amount: share.amount,
            });
        }
        let actual = self.share_total();
        if !approx_eq(actual, self.amount, EPSILON) {
            return Err(ExpenseError::SharesMismatch {
                expected: self.amount,
                actual,
            });
        }
        Ok(())
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn payer(&self) -> ParticipantId {
        self.payer
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    /// Sum of all share amounts.
    pub fn share_total(&self) -> Decimal {
        self.shares.iter().map(|s| s.amount).sum()
    }

    /// Participants referenced by this expense: the payer, then each
    /// share's participant in order (duplicates kept).
    pub fn referenced_participants(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        std::iter::once(self.payer).chain(self.shares.iter().map(|s| s.participant))
    }
}
