use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a participant in a shared-expense ledger.
///
/// The engine never interprets the value; it only compares identifiers
/// and uses them as keys. Upstream record stores typically hand out
/// sequential integer keys, which is what this wraps.
///
/// # Examples
///
/// ```
/// use settlement_engine::core::participant::ParticipantId;
///
/// let alice = ParticipantId::new(1);
/// let bob = ParticipantId::new(2);
/// assert_ne!(alice, bob);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(u64);

impl ParticipantId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric value of this identifier.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ParticipantId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// A participant together with the label shown in reports.
///
/// The label is presentation only; equality and lookups go through `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub label: String,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.label, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_equality() {
        let a = ParticipantId::new(7);
        let b = ParticipantId::from(7);
        let c = ParticipantId::new(8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_participant_display() {
        let p = Participant::new(3, "carol");
        assert_eq!(format!("{}", p), "carol (#3)");
        assert_eq!(format!("{}", p.id), "3");
    }

    #[test]
    fn test_participant_id_serializes_as_number() {
        let json = serde_json::to_string(&ParticipantId::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
