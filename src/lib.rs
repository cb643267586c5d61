//! Proof-of-work mining over SHA-256 and a hash-linked chain of mined
//! blocks, with secp256k1 signing of winning hashes.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod demo;
pub mod pow;
pub mod signing;
