pub mod difficulty;
pub mod digest;
pub mod miner;

pub use difficulty::{MAX_DIFFICULTY, satisfies};
pub use digest::{sha256, sha256_hex};
pub use miner::{Candidate, Miner, MiningError, MiningResult, mine};
