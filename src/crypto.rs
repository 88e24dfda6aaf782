//! Hashing and signature verification
//!
//! Signature checking is a collaborator of the ledger: validation only sees the
//! [`SignatureVerifier`] trait. [`Secp256k1Verifier`] is the adapter used by
//! default.

use crate::constants::COMPACT_SIGNATURE_SIZE;
use crate::types::Hash;
use bitcoin_hashes::{sha256d, Hash as BitcoinHash, HashEngine};
use secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1, VerifyOnly};
use sha2::{Digest, Sha256};

/// Checks that `signature` was produced over `message` by the owner of `public_key`.
///
/// Implementations must be deterministic and free of side effects.
pub trait SignatureVerifier {
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool;
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for &V {
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        (**self).verify(public_key, message, signature)
    }
}

/// ECDSA over secp256k1. Messages are hashed with SHA-256 before verification.
pub struct Secp256k1Verifier {
    secp: Secp256k1<VerifyOnly>,
}

impl Default for Secp256k1Verifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Secp256k1Verifier {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::verification_only(),
        }
    }
}

impl SignatureVerifier for Secp256k1Verifier {
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        let pubkey = match PublicKey::from_slice(public_key) {
            Ok(pk) => pk,
            Err(_) => return false,
        };

        // Compact encoding first, DER otherwise
        let signature = if signature.len() == COMPACT_SIGNATURE_SIZE {
            Signature::from_compact(signature)
        } else {
            Signature::from_der(signature)
        };
        let signature = match signature {
            Ok(sig) => sig,
            Err(_) => return false,
        };

        let message = match Message::from_digest_slice(&sha256(message)) {
            Ok(msg) => msg,
            Err(_) => return false,
        };

        self.secp.verify_ecdsa(&message, &signature, &pubkey).is_ok()
    }
}

/// Double SHA-256, used for transaction and block identifiers
pub fn sha256d(data: &[u8]) -> Hash {
    let mut engine = sha256d::Hash::engine();
    engine.input(data);
    let result = sha256d::Hash::from_engine(engine);
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Single SHA-256, used as the digest that signatures commit to
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}
