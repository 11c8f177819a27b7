//! The append-only block chain and its pending-transaction buffer.

use crate::crypto::canonical_hash;
use crate::error::{LedgerError, Result};
use crate::transaction::{now_unix_seconds, Transaction};
use serde::{Deserialize, Serialize};

/// Proof recorded on the genesis block. Never validated against the work
/// target; it predates any search.
pub const GENESIS_PROOF: u64 = 100;

/// Placeholder previous_hash for the genesis block, which has no
/// predecessor to hash.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// One link in the chain. Frozen at creation: mutating a historical block
/// would silently invalidate every descendant's previous_hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the chain, strictly sequential.
    pub index: u64,
    /// Unix seconds with sub-second precision, stamped at creation.
    pub timestamp: f64,
    /// Transactions captured from the pending buffer, insertion order kept.
    pub transactions: Vec<Transaction>,
    /// Nonce recorded by the caller; opaque metadata as far as chaining is
    /// concerned (see [`crate::pow`] for the work function).
    pub proof: u64,
    /// Lowercase hex SHA-256 of the previous block's canonical
    /// serialization, or the sentinel `"1"` on the genesis block.
    pub previous_hash: String,
}

impl Block {
    /// Hash of this block's canonical serialization, as lowercase hex.
    pub fn hash(&self) -> Result<String> {
        canonical_hash(self)
    }
}

/// The ledger: an append-only sequence of blocks plus the buffer of
/// transactions not yet sealed into one.
///
/// Chain growth is the only state transition. No deletion, no reordering,
/// no in-place edits.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Ledger {
    /// Create a ledger initialized with its genesis block
    /// (`proof = 100`, `previous_hash = "1"`).
    pub fn new() -> Self {
        let mut ledger = Ledger {
            chain: Vec::new(),
            pending: Vec::new(),
        };
        ledger
            .new_block(GENESIS_PROOF, Some(GENESIS_PREVIOUS_HASH.to_string()))
            .expect("genesis block construction cannot fail");
        ledger
    }

    /// Seal the pending transactions into a new block and append it.
    ///
    /// `previous_hash` is normally omitted and computed from the current
    /// last block; only the genesis path supplies the sentinel explicitly.
    /// Returns `EmptyChain` if the chain is empty and no hash was given.
    pub fn new_block(&mut self, proof: u64, previous_hash: Option<String>) -> Result<Block> {
        let previous_hash = match previous_hash {
            Some(hash) => hash,
            None => self
                .chain
                .last()
                .ok_or(LedgerError::EmptyChain)?
                .hash()?,
        };

        let block = Block {
            index: self.chain.len() as u64 + 1,
            timestamp: now_unix_seconds(),
            transactions: std::mem::take(&mut self.pending),
            proof,
            previous_hash,
        };

        self.chain.push(block.clone());
        Ok(block)
    }

    /// Buffer a new transaction and return the index of the block that will
    /// eventually absorb it.
    ///
    /// The return value is a prediction: the transaction stays in the
    /// pending buffer until the next [`Ledger::new_block`] call. Negative
    /// price/quantity are accepted here to match the original behavior;
    /// callers that want them rejected must do so at their own boundary.
    pub fn new_transaction(
        &mut self,
        farmer: impl Into<String>,
        crop: impl Into<String>,
        price: f64,
        quantity: f64,
        location: impl Into<String>,
    ) -> u64 {
        self.pending
            .push(Transaction::new(farmer, crop, price, quantity, location));
        self.chain.len() as u64 + 1
    }

    /// The most recent block.
    ///
    /// The chain is never empty after construction; an empty chain here is
    /// a broken invariant, not a recoverable condition.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    /// The full chain, genesis first.
    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Transactions not yet sealed into a block, in insertion order.
    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Every sealed transaction, flattened in block-then-insertion order.
    /// Excludes the pending buffer.
    pub fn all_transactions(&self) -> Vec<Transaction> {
        self.chain
            .iter()
            .flat_map(|block| block.transactions.iter().cloned())
            .collect()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
