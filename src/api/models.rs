use crate::blockchain::{Block, Blockchain, ChainError};
use crate::config::Config;
use crate::pow::{Miner, MiningResult};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Shared application state with the in-memory blockchain.
pub struct AppState {
    pub blockchain: Mutex<Blockchain>,
    pub default_difficulty: u32,
    pub progress_interval: u64,
}

impl AppState {
    /// Mines the genesis block, so this blocks for the configured difficulty.
    pub fn new(config: &Config) -> Result<Self, ChainError> {
        let miner = Miner::new(config.difficulty).with_progress_interval(config.progress_interval);
        Ok(Self {
            blockchain: Mutex::new(Blockchain::with_miner(
                config.genesis_payload.as_str(),
                miner,
            )?),
            default_difficulty: config.difficulty,
            progress_interval: config.progress_interval,
        })
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub difficulty: u32,
    pub chain: &'a [Block],
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
}

#[derive(Serialize)]
pub struct DifficultyResponse {
    pub difficulty: u32,
}

#[derive(Deserialize)]
pub struct AppendRequest {
    pub payload: String,
}

/* ---------- PoW API Models ---------- */

#[derive(Deserialize)]
pub struct PowRequest {
    pub prefix: String,
    pub difficulty: Option<u32>,
    pub max_attempts: Option<u64>,
    pub timeout_ms: Option<u64>,
}

#[derive(Serialize)]
pub struct PowResponse {
    pub hash: String,
    pub nonce: u64,
    pub attempts: u64,
    pub elapsed_ms: u128,
    pub content: String,
    pub difficulty: u32,
}

impl PowResponse {
    pub fn new(result: &MiningResult, difficulty: u32) -> Self {
        Self {
            hash: result.hash.clone(),
            nonce: result.nonce,
            attempts: result.attempts,
            elapsed_ms: result.elapsed.as_millis(),
            content: result.content_lossy().into_owned(),
            difficulty,
        }
    }
}

/* ---------- Signing API Models ---------- */

#[derive(Serialize)]
pub struct NewWalletResponse {
    pub private_key: String,
    pub public_key: String,
}

#[derive(Deserialize)]
pub struct SignRequest {
    pub private_key: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct SignResponse {
    pub signature: String,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub public_key: String,
    pub message: String,
    pub signature: String,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
}
