//! Agrochain - An append-only ledger for transparent farm produce transactions
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`ledger`] - Block structure, chaining and the pending buffer
//! - [`transaction`] - Produce sale transactions
//!
//! ## Hashing & Proof-of-Work
//! - [`crypto`] - Canonical serialization and SHA-256 hashing
//! - [`pow`] - Bounded brute-force nonce search
//!
//! ## Integration
//! - [`api`] - HTTP endpoints (axum, feature `api`)
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod ledger;
pub mod transaction;

// ============================================================================
// Hashing & Proof-of-Work
// ============================================================================
pub mod crypto;
pub mod pow;

// ============================================================================
// Integration
// ============================================================================
#[cfg(feature = "api")]
pub mod api;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
