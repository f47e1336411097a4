//! Settle Test Harness - Reference stores and reconciliation fuzzing
//!
//! This crate provides:
//! - An ordered in-memory store
//! - A store wrapper that rejects chosen mutations
//! - Seeded state fuzzing with convergence checks

pub mod faulty;
pub mod memory;
pub mod state_fuzzer;

pub use faulty::*;
pub use memory::*;
pub use state_fuzzer::*;
