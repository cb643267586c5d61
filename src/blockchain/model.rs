use log::{info, warn};

use super::error::{ChainError, ValidationError};
use super::Block;
use crate::pow::{Miner, satisfies};

/// Simple in-memory blockchain with Proof-of-Work at a fixed difficulty.
///
/// Blocks are only added through validated appends, so the sequence is
/// never left in an inconsistent state. Appends take `&mut self`; callers
/// sharing a chain serialize them (the API keeps it behind a `Mutex`).
#[derive(Debug)]
pub struct Blockchain {
    chain: Vec<Block>,
    difficulty: u32,
    miner: Miner,
}

impl Blockchain {
    /// Initialize a new blockchain with a mined genesis block.
    pub fn new(genesis_payload: impl Into<Vec<u8>>, difficulty: u32) -> Result<Self, ChainError> {
        Self::with_miner(genesis_payload, Miner::new(difficulty))
    }

    /// Like `new`, with a caller-configured miner (budget, progress interval).
    /// The chain's difficulty is the miner's.
    pub fn with_miner(genesis_payload: impl Into<Vec<u8>>, miner: Miner) -> Result<Self, ChainError> {
        let genesis = create_genesis(genesis_payload, &miner)?;
        info!("genesis block mined: hash={} nonce={}", genesis.hash, genesis.nonce);
        Ok(Self {
            chain: vec![genesis],
            difficulty: miner.difficulty(),
            miner,
        })
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    /// Mine a block carrying `payload` on top of the tail, validate it and append it.
    pub fn append(&mut self, payload: impl Into<Vec<u8>>) -> Result<&Block, ChainError> {
        let block = self.next_candidate(payload).mine_with(&self.miner)?;
        self.append_block(block)
    }

    /// Unmined block carrying `payload` that would follow the current tail.
    ///
    /// Lets callers mine without holding the chain; `append_block` rejects
    /// the result if the tail moved in the meantime.
    pub fn next_candidate(&self, payload: impl Into<Vec<u8>>) -> Block {
        let tail = self.last_block();
        Block::new(tail.index.saturating_add(1), tail.hash.clone(), payload)
    }

    /// The miner used for appends.
    pub fn miner(&self) -> &Miner {
        &self.miner
    }

    #[cfg(test)]
    pub(crate) fn set_miner(&mut self, miner: Miner) {
        self.miner = miner;
    }

    /// Append an already mined block after validating it against the tail.
    /// On rejection the chain is left untouched.
    pub fn append_block(&mut self, block: Block) -> Result<&Block, ChainError> {
        if let Err(e) = validate_block(self.last_block(), &block, self.difficulty) {
            warn!("rejected block #{}: {}", block.index, e);
            return Err(e.into());
        }
        info!(
            "appended block #{} hash={} nonce={}",
            block.index, block.hash, block.nonce
        );
        self.chain.push(block);
        Ok(self.last_block())
    }

    /// Validate the entire chain: genesis shape, linkage, hashes and PoW.
    pub fn is_valid_chain(&self) -> bool {
        let Some(genesis) = self.chain.first() else {
            return false;
        };
        if genesis.index != 0 || !genesis.previous_hash.is_empty() || !genesis.is_valid(self.difficulty)
        {
            return false;
        }
        self.chain
            .windows(2)
            .all(|pair| validate(&pair[0], &pair[1], self.difficulty))
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }
}

/// Build and mine the genesis block (index 0, empty `previous_hash`).
pub fn create_genesis(payload: impl Into<Vec<u8>>, miner: &Miner) -> Result<Block, ChainError> {
    Ok(Block::genesis(payload).mine_with(miner)?)
}

/// Whether `candidate` may follow `prev` at `difficulty`.
pub fn validate(prev: &Block, candidate: &Block, difficulty: u32) -> bool {
    validate_block(prev, candidate, difficulty).is_ok()
}

/// Like `validate`, reporting the first rule that failed.
///
/// Besides index continuity, linkage and difficulty, both stored hashes are
/// recomputed from content so a block edited after sealing is caught on
/// either side of the pair.
pub fn validate_block(prev: &Block, candidate: &Block, difficulty: u32) -> Result<(), ValidationError> {
    let Some(expected_index) = prev.index.checked_add(1) else {
        return Err(ValidationError::IndexOverflow { index: prev.index });
    };
    if candidate.index != expected_index {
        return Err(ValidationError::IndexMismatch {
            expected: expected_index,
            found: candidate.index,
        });
    }
    if candidate.previous_hash != prev.hash {
        return Err(ValidationError::BrokenLink {
            expected: prev.hash.clone(),
            found: candidate.previous_hash.clone(),
        });
    }
    if prev.hash != prev.compute_hash() {
        return Err(ValidationError::TamperedPredecessor { index: prev.index });
    }
    let computed = candidate.compute_hash();
    if candidate.hash != computed {
        return Err(ValidationError::HashMismatch {
            stored: candidate.hash.clone(),
            computed,
        });
    }
    if !satisfies(&candidate.hash, difficulty) {
        return Err(ValidationError::InsufficientWork {
            hash: candidate.hash.clone(),
            difficulty,
        });
    }
    Ok(())
}
