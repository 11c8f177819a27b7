//! Produce sale transactions recorded on the ledger.

use serde::{Deserialize, Serialize};

/// One farmer's sale offer. Immutable once sealed into a block; the
/// timestamp is stamped at creation, never supplied by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub farmer: String,
    pub crop: String,
    pub price: f64,
    pub quantity: f64,
    pub location: String,
    /// Unix seconds with sub-second precision.
    pub timestamp: f64,
}

impl Transaction {
    /// Build a transaction stamped with the current wall-clock time.
    pub fn new(
        farmer: impl Into<String>,
        crop: impl Into<String>,
        price: f64,
        quantity: f64,
        location: impl Into<String>,
    ) -> Self {
        Transaction {
            farmer: farmer.into(),
            crop: crop.into(),
            price,
            quantity,
            location: location.into(),
            timestamp: now_unix_seconds(),
        }
    }
}

/// Current wall-clock time as fractional unix seconds.
///
/// Microsecond resolution keeps the full sub-second precision that the
/// canonical block serialization hashes over.
pub fn now_unix_seconds() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_carries_inputs_verbatim() {
        let tx = Transaction::new("Ravi", "tomato", 42.5, 120.0, "10.79,78.70");
        assert_eq!(tx.farmer, "Ravi");
        assert_eq!(tx.crop, "tomato");
        assert_eq!(tx.price, 42.5);
        assert_eq!(tx.quantity, 120.0);
        assert_eq!(tx.location, "10.79,78.70");
        assert!(tx.timestamp > 0.0);
    }

    #[test]
    fn test_timestamps_are_monotonic_enough() {
        let a = now_unix_seconds();
        let b = now_unix_seconds();
        assert!(b >= a);
    }

    #[test]
    fn test_negative_amounts_are_not_rejected_here() {
        // The ledger core mirrors the original behavior and accepts
        // negative amounts; rejection is an API-boundary policy.
        let tx = Transaction::new("Ravi", "onion", -1.0, -5.0, "Unknown");
        assert_eq!(tx.price, -1.0);
        assert_eq!(tx.quantity, -5.0);
    }
}
