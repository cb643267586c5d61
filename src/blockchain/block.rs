use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::pow::{Candidate, Miner, MiningError, satisfies, sha256_hex};

/// A single block in the chain. `nonce` and `hash` are filled in by mining.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix timestamp (UTC)
    #[serde(with = "hex::serde")]
    pub payload: Vec<u8>,
    pub previous_hash: String, // empty for genesis
    pub nonce: u64,            // Proof-of-Work nonce
    pub hash: String,          // Cached hash of the block
}

impl Block {
    /// Create an unmined genesis block (index 0, no predecessor).
    pub fn genesis(payload: impl Into<Vec<u8>>) -> Self {
        Self::new(0, String::new(), payload)
    }

    /// Create a new block (not mined yet). Call `mine()` to perform PoW.
    pub fn new(index: u64, previous_hash: String, payload: impl Into<Vec<u8>>) -> Self {
        Self::new_with_timestamp(index, previous_hash, payload, Utc::now().timestamp())
    }

    pub fn new_with_timestamp(
        index: u64,
        previous_hash: String,
        payload: impl Into<Vec<u8>>,
        timestamp: i64,
    ) -> Self {
        Self {
            index,
            timestamp,
            payload: payload.into(),
            previous_hash,
            nonce: 0,
            hash: String::new(),
        }
    }

    /// Canonical preimage for `nonce`:
    /// `"{index}:{timestamp}:{hex(payload)}:{previous_hash}:{nonce}"` as UTF-8.
    /// The payload is hex-encoded so it can never contain the separator.
    pub fn canonical_bytes(&self, nonce: u64) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_content(nonce, &mut out);
        out
    }

    /// SHA-256 of the canonical preimage at the block's current nonce.
    pub fn compute_hash(&self) -> String {
        sha256_hex(&self.canonical_bytes(self.nonce))
    }

    /// Perform Proof-of-Work with an unbounded miner at `difficulty`.
    pub fn mine(self, difficulty: u32) -> Result<Self, MiningError> {
        self.mine_with(&Miner::new(difficulty))
    }

    /// Search nonces from 0 upward with `miner`; returns the sealed block.
    pub fn mine_with(mut self, miner: &Miner) -> Result<Self, MiningError> {
        let result = miner.search(&self)?;
        self.nonce = result.nonce;
        self.hash = result.hash;
        Ok(self)
    }

    /// The cached `hash` matches the content and satisfies `difficulty`.
    /// (Does NOT validate chain linkage.)
    pub fn is_valid(&self, difficulty: u32) -> bool {
        self.hash == self.compute_hash() && satisfies(&self.hash, difficulty)
    }
}

impl Candidate for Block {
    fn write_content(&self, nonce: u64, out: &mut Vec<u8>) {
        let preimage = format!(
            "{}:{}:{}:{}:{}",
            self.index,
            self.timestamp,
            hex::encode(&self.payload),
            self.previous_hash,
            nonce
        );
        out.extend_from_slice(preimage.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::Block;

    #[test]
    fn canonical_layout_is_fixed() {
        let b = Block::new_with_timestamp(3, "abc".into(), b"hi".to_vec(), 1_700_000_000);
        assert_eq!(b.canonical_bytes(42), b"3:1700000000:6869:abc:42");
    }

    #[test]
    fn mining_produces_leading_zeros() {
        let b = Block::new(1, "prev".into(), "payload").mine(2).unwrap();
        assert!(b.hash.starts_with("00"));
        assert_eq!(b.hash, b.compute_hash());
        assert!(b.is_valid(2));
    }

    #[test]
    fn genesis_has_no_predecessor() {
        let b = Block::genesis("genesis block").mine(1).unwrap();
        assert_eq!(b.index, 0);
        assert!(b.previous_hash.is_empty());
        assert!(b.is_valid(1));
    }

    #[test]
    fn invalid_when_mutated() {
        let mut b = Block::new(2, "prev".into(), "payload").mine(2).unwrap();
        let old_hash = b.hash.clone();

        // Tamper with the payload after sealing
        b.payload.push(b'!');

        assert_ne!(old_hash, b.compute_hash());
        assert!(!b.is_valid(2));
    }

    #[test]
    fn payload_serializes_as_hex() {
        let b = Block::new_with_timestamp(0, String::new(), b"ok".to_vec(), 1);
        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["payload"], "6f6b");
    }
}
