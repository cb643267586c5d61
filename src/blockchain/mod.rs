pub mod block;
pub mod error;
pub mod model;

pub use block::Block;
pub use error::{ChainError, ValidationError};
pub use model::{Blockchain, create_genesis, validate, validate_block};

/// Default Proof-of-Work difficulty (number of leading zeros).
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Highest difficulty accepted by the API (keep low to avoid long waits).
pub const DIFF_MAX: u32 = 6;

/// Payload of the genesis block unless configured otherwise.
pub const DEFAULT_GENESIS_PAYLOAD: &str = "genesis block";
