use thiserror::Error;

use crate::pow::MiningError;

/// Why a candidate block cannot follow a given predecessor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("index {found} does not follow predecessor (expected {expected})")]
    IndexMismatch { expected: u64, found: u64 },
    #[error("predecessor index {index} has no successor")]
    IndexOverflow { index: u64 },
    #[error("previous_hash {found:?} does not link to predecessor hash {expected:?}")]
    BrokenLink { expected: String, found: String },
    #[error("stored hash {stored} does not match block content ({computed})")]
    HashMismatch { stored: String, computed: String },
    #[error("hash {hash} does not meet difficulty {difficulty}")]
    InsufficientWork { hash: String, difficulty: u32 },
    #[error("predecessor block #{index} was altered after sealing")]
    TamperedPredecessor { index: u64 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("mining failed: {0}")]
    Mining(#[from] MiningError),
    #[error("block rejected: {0}")]
    Validation(#[from] ValidationError),
}
