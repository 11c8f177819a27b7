//! Brute-force proof-of-work search.
//!
//! A candidate nonce is valid when SHA-256 over the concatenated decimal
//! strings of the previous proof and the candidate yields a hex digest with
//! the required number of leading zero digits. Each hex digit is zero with
//! probability 1/16, so the default difficulty of 4 costs ~65536 trials.
//! Pure CPU work, no shared state; callers in async contexts should run
//! [`ProofOfWork::search`] on a blocking thread.

use crate::crypto::sha256_hex;
use crate::error::{LedgerError, Result};

pub const DEFAULT_DIFFICULTY: usize = 4;
/// Iteration cap replacing the original's unbounded loop. Generous next to
/// the ~65536 expected trials at the default difficulty.
pub const DEFAULT_MAX_ITERATIONS: u64 = 10_000_000;

#[derive(Debug, Clone)]
pub struct ProofOfWork {
    difficulty: usize,
    max_iterations: u64,
}

impl ProofOfWork {
    pub fn new(difficulty: usize, max_iterations: u64) -> Self {
        ProofOfWork {
            difficulty,
            max_iterations,
        }
    }

    /// Leading zero hex digits required of a valid guess hash.
    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Check a candidate nonce against the previous block's proof.
    pub fn valid_proof(&self, last_proof: u64, candidate: u64) -> bool {
        let guess = format!("{}{}", last_proof, candidate);
        let digest = sha256_hex(guess.as_bytes());
        digest.bytes().take(self.difficulty).all(|b| b == b'0')
    }

    /// Linear scan from 0; the first valid candidate wins.
    ///
    /// Returns `ProofSearchExhausted` once the iteration cap is hit, so a
    /// hostile difficulty setting cannot hang the caller forever.
    pub fn search(&self, last_proof: u64) -> Result<u64> {
        for candidate in 0..self.max_iterations {
            if self.valid_proof(last_proof, candidate) {
                return Ok(candidate);
            }
        }
        Err(LedgerError::ProofSearchExhausted(self.max_iterations))
    }
}

impl Default for ProofOfWork {
    fn default() -> Self {
        ProofOfWork::new(DEFAULT_DIFFICULTY, DEFAULT_MAX_ITERATIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_proof_matches_digest_prefix() {
        let pow = ProofOfWork::new(1, 1_000_000);
        let proof = pow.search(100).unwrap();
        let digest = sha256_hex(format!("100{}", proof).as_bytes());
        assert!(digest.starts_with('0'));
    }

    #[test]
    fn test_search_returns_first_match() {
        // Low difficulty keeps the scan cheap while still exercising the
        // first-match contract.
        let pow = ProofOfWork::new(2, 1_000_000);
        let proof = pow.search(100).unwrap();
        assert!(pow.valid_proof(100, proof));
        for earlier in 0..proof {
            assert!(!pow.valid_proof(100, earlier));
        }
    }

    #[test]
    fn test_search_is_deterministic() {
        let pow = ProofOfWork::new(2, 1_000_000);
        assert_eq!(pow.search(100).unwrap(), pow.search(100).unwrap());
    }

    #[test]
    fn test_exhausted_search_is_an_error() {
        // Difficulty 64 cannot be met by any SHA-256 digest prefix within
        // two iterations.
        let pow = ProofOfWork::new(64, 2);
        assert!(matches!(
            pow.search(100),
            Err(LedgerError::ProofSearchExhausted(2))
        ));
    }
}
