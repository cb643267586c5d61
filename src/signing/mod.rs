//! ECDSA (secp256k1) signatures over the SHA-256 digest of a message.
//!
//! Verification distinguishes a signature that does not match (`Ok(false)`)
//! from input that cannot be parsed (`Err`).

use rand::RngCore;
use rand::rngs::OsRng;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey, ecdsa::Signature};
use thiserror::Error;

use crate::pow::sha256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SigningError {
    #[error("key generation failed: {0}")]
    KeyGeneration(String),
    #[error("invalid private key")]
    InvalidSecretKey,
    #[error("invalid public key")]
    InvalidPublicKey,
    #[error("malformed DER signature")]
    InvalidSignature,
    #[error("invalid {0} hex")]
    InvalidHex(&'static str),
}

/// A freshly generated private/public key pair.
#[derive(Debug, Clone, Copy)]
pub struct KeyPair {
    pub secret: SecretKey,
    pub public: PublicKey,
}

impl KeyPair {
    pub fn secret_hex(&self) -> String {
        hex::encode(self.secret.secret_bytes())
    }

    /// Compressed (33 bytes) public key as hex.
    pub fn public_hex(&self) -> String {
        hex::encode(self.public.serialize())
    }
}

/// Generate a keypair from the OS entropy source.
pub fn generate_keypair() -> Result<KeyPair, SigningError> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| SigningError::KeyGeneration(e.to_string()))?;
    let secret = SecretKey::from_slice(&bytes)
        .map_err(|e| SigningError::KeyGeneration(e.to_string()))?;
    let public = PublicKey::from_secret_key(&Secp256k1::signing_only(), &secret);
    Ok(KeyPair { secret, public })
}

fn message_for(data: &[u8]) -> Message {
    Message::from_digest(sha256(data))
}

/// Sign `message`; returns the DER-encoded signature.
pub fn sign(secret: &SecretKey, message: &[u8]) -> Vec<u8> {
    let secp = Secp256k1::signing_only();
    secp.sign_ecdsa(&message_for(message), secret)
        .serialize_der()
        .to_vec()
}

/// Verify a DER `signature` over `message`. A mismatch is `Ok(false)`.
pub fn verify(public: &PublicKey, message: &[u8], signature: &[u8]) -> Result<bool, SigningError> {
    let sig = Signature::from_der(signature).map_err(|_| SigningError::InvalidSignature)?;
    let secp = Secp256k1::verification_only();
    Ok(secp.verify_ecdsa(&message_for(message), &sig, public).is_ok())
}

/// Sign with a hex private key; returns the hex DER signature.
pub fn sign_hex(secret_hex: &str, message: &[u8]) -> Result<String, SigningError> {
    let bytes = hex::decode(secret_hex).map_err(|_| SigningError::InvalidHex("private key"))?;
    let secret = SecretKey::from_slice(&bytes).map_err(|_| SigningError::InvalidSecretKey)?;
    Ok(hex::encode(sign(&secret, message)))
}

/// Verify a hex DER signature against a hex (compressed or uncompressed) public key.
pub fn verify_hex(pubkey_hex: &str, message: &[u8], sig_hex: &str) -> Result<bool, SigningError> {
    let pk_bytes = hex::decode(pubkey_hex).map_err(|_| SigningError::InvalidHex("public key"))?;
    let public = PublicKey::from_slice(&pk_bytes).map_err(|_| SigningError::InvalidPublicKey)?;
    let sig_bytes = hex::decode(sig_hex).map_err(|_| SigningError::InvalidHex("signature"))?;
    verify(&public, message, &sig_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let kp = generate_keypair().unwrap();
        let msg = b"0000a1b2c3";
        let sig = sign(&kp.secret, msg);
        assert_eq!(verify(&kp.public, msg, &sig), Ok(true));
    }

    #[test]
    fn one_changed_byte_fails_verification() {
        let kp = generate_keypair().unwrap();
        let msg = b"0000a1b2c3".to_vec();
        let sig = sign(&kp.secret, &msg);

        let mut tampered = msg.clone();
        tampered[5] = b'f';
        assert_eq!(verify(&kp.public, &tampered, &sig), Ok(false));
    }

    #[test]
    fn other_key_fails_verification() {
        let a = generate_keypair().unwrap();
        let b = generate_keypair().unwrap();
        let sig = sign(&a.secret, b"msg");
        assert_eq!(verify(&b.public, b"msg", &sig), Ok(false));
    }

    #[test]
    fn malformed_signature_is_an_error() {
        let kp = generate_keypair().unwrap();
        assert_eq!(
            verify(&kp.public, b"msg", &[0x30, 0x01]),
            Err(SigningError::InvalidSignature)
        );
    }

    #[test]
    fn hex_helpers() {
        let kp = generate_keypair().unwrap();
        assert_eq!(kp.public_hex().len(), 66);
        let sig = sign_hex(&kp.secret_hex(), b"hello").unwrap();
        assert_eq!(verify_hex(&kp.public_hex(), b"hello", &sig), Ok(true));
        assert_eq!(verify_hex(&kp.public_hex(), b"hellp", &sig), Ok(false));
    }

    #[test]
    fn malformed_keys_are_errors() {
        assert_eq!(
            sign_hex("zz", b"m"),
            Err(SigningError::InvalidHex("private key"))
        );
        assert_eq!(
            sign_hex(&"00".repeat(32), b"m"),
            Err(SigningError::InvalidSecretKey)
        );
        assert_eq!(
            verify_hex("02ab", b"m", "3006020101020101"),
            Err(SigningError::InvalidPublicKey)
        );
    }
}
