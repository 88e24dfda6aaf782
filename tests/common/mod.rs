//! Shared fixtures for the integration tests

#![allow(dead_code)]

use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use utxo_ledger::crypto::sha256;
use utxo_ledger::*;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A deterministic secp256k1 keypair
pub struct Key {
    secret: SecretKey,
    pub public: Vec<u8>,
}

impl Key {
    pub fn new(seed: u8) -> Self {
        let secp = Secp256k1::new();
        let secret = SecretKey::from_slice(&[seed; 32]).unwrap();
        let public = PublicKey::from_secret_key(&secp, &secret).serialize().to_vec();
        Self { secret, public }
    }

    pub fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let secp = Secp256k1::new();
        let msg = Message::from_digest_slice(&sha256(payload)).unwrap();
        secp.sign_ecdsa(&msg, &self.secret).serialize_der().to_vec()
    }
}

pub fn signed_spend(inputs: &[(OutPoint, &Key)], outputs: &[(Amount, &Key)]) -> Transaction {
    let mut tx = Transaction::new();
    for (op, _) in inputs {
        tx.add_input(*op);
    }
    for (value, recipient) in outputs {
        tx.add_output(*value, recipient.public.clone());
    }
    for (i, (_, signer)) in inputs.iter().enumerate() {
        let payload = tx.signing_payload(i).unwrap();
        assert!(tx.add_signature(i, signer.sign(&payload)));
    }
    tx.finalize();
    tx
}

pub fn genesis_for(miner: &Key) -> Block {
    Block::genesis(Transaction::coinbase(COINBASE_VALUE, miner.public.clone(), 0))
}

/// Block on `parent` at `height` carrying `txs`
pub fn block_on(parent: &Block, height: Natural, miner: &Key, txs: Vec<Transaction>) -> Block {
    let mut block = Block::new(
        Some(parent.hash()),
        Transaction::coinbase(COINBASE_VALUE, miner.public.clone(), height),
    );
    for tx in txs {
        block.add_transaction(tx);
    }
    block
}

/// Extend the tip with `count` empty blocks, returning them in order
pub fn extend_empty(chain: &mut ChainState, miner: &Key, count: usize) -> Vec<Block> {
    let mut added = Vec::with_capacity(count);
    for _ in 0..count {
        let tip = chain.get_max_height_block().clone();
        let block = block_on(&tip, chain.max_height() + 1, miner, vec![]);
        assert!(chain.add_block(block.clone()).unwrap().is_accepted());
        added.push(block);
    }
    added
}
