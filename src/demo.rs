//! Console walkthrough: solve the nickname puzzle, sign the result, then
//! grow a small chain and print it.

use std::error::Error;

use crate::blockchain::{Blockchain, validate};
use crate::config::Config;
use crate::pow::{Miner, MiningResult};
use crate::signing;

/// Difficulties the nickname puzzle is solved at, in order.
const PUZZLE_DIFFICULTIES: [u32; 2] = [4, 5];
const CHAIN_DIFFICULTY: u32 = 4;
const CHAIN_BLOCKS: usize = 5;

pub fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    let first = solve_puzzles(config)?;
    sign_and_verify(&first)?;
    build_chain(config)?;
    Ok(())
}

fn solve_puzzles(config: &Config) -> Result<MiningResult, Box<dyn Error>> {
    let mut first = None;
    for difficulty in PUZZLE_DIFFICULTIES {
        println!("⛏️ Mining \"{}\" for {} leading zeros", config.nickname, difficulty);
        let result = Miner::new(difficulty)
            .with_progress_interval(config.progress_interval)
            .search(config.nickname.as_str())?;
        println!(
            "cost: {:?} hash: {} nonce: {} content: {}",
            result.elapsed,
            result.hash,
            result.nonce,
            result.content_lossy()
        );
        first.get_or_insert(result);
    }
    first.ok_or_else(|| "no puzzle difficulties configured".into())
}

/// Sign the winning hash, verify it, then verify a one-character edit.
fn sign_and_verify(result: &MiningResult) -> Result<(), Box<dyn Error>> {
    let keys = signing::generate_keypair()?;
    let message = result.hash.as_bytes();
    let signature = signing::sign(&keys.secret, message);

    let verified = signing::verify(&keys.public, message, &signature)?;
    println!("verified: {verified}");

    let tampered = flip_last_char(&result.hash);
    let verified = signing::verify(&keys.public, tampered.as_bytes(), &signature)?;
    println!("verified after modification ({tampered}): {verified}");
    Ok(())
}

fn build_chain(config: &Config) -> Result<(), Box<dyn Error>> {
    let miner = Miner::new(CHAIN_DIFFICULTY).with_progress_interval(config.progress_interval);
    let mut bc = Blockchain::with_miner(config.genesis_payload.as_str(), miner)?;
    for i in 1..=CHAIN_BLOCKS {
        bc.append(format!("block #{i}"))?;
    }

    for block in bc.blocks() {
        println!("Index: {}", block.index);
        println!("Previous Hash: {}", block.previous_hash);
        println!("Hash: {}", block.hash);
        println!("Data: {}", String::from_utf8_lossy(&block.payload));
        println!("Nonce: {}", block.nonce);
        println!("------------------------");
    }
    for pair in bc.blocks().windows(2) {
        let ok = validate(&pair[0], &pair[1], bc.difficulty());
        println!("block #{} -> #{} valid: {}", pair[0].index, pair[1].index, ok);
    }
    Ok(())
}

/// Replace the last hex digit with a different one.
fn flip_last_char(hex_digest: &str) -> String {
    let mut out = hex_digest.to_string();
    if let Some(last) = out.pop() {
        out.push(if last == '0' { '1' } else { '0' });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_changes_exactly_one_char() {
        let h = "0000abc0";
        let f = flip_last_char(h);
        assert_eq!(f, "0000abc1");
        assert_eq!(flip_last_char("0000abc7"), "0000abc0");
        assert_eq!(h.len(), f.len());
    }

    #[test]
    fn signed_hash_rejects_flipped_copy() {
        let result = crate::pow::mine("alice", 1).unwrap();
        let keys = signing::generate_keypair().unwrap();
        let sig = signing::sign(&keys.secret, result.hash.as_bytes());
        let flipped = flip_last_char(&result.hash);
        assert_eq!(signing::verify(&keys.public, flipped.as_bytes(), &sig), Ok(false));
        assert_eq!(signing::verify(&keys.public, result.hash.as_bytes(), &sig), Ok(true));
    }
}
