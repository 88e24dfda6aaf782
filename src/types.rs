//! Core ledger types: outpoints, transactions and blocks

use crate::constants::{NULL_OUTPOINT_HASH, NULL_OUTPOINT_INDEX};
use crate::crypto::sha256d;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash type: 256-bit identifier
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Natural number type
pub type Natural = u64;

/// Monetary amount. Signed so that negative outputs can be represented and rejected.
pub type Amount = i64;

/// OutPoint: reference to output `index` of transaction `hash`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutPoint {
    pub hash: Hash,
    pub index: u32,
}

impl OutPoint {
    pub fn new(hash: Hash, index: u32) -> Self {
        Self { hash, index }
    }

    /// The prevout carried by coinbase inputs
    pub fn null() -> Self {
        Self {
            hash: NULL_OUTPOINT_HASH,
            index: NULL_OUTPOINT_INDEX,
        }
    }

    pub fn is_null(&self) -> bool {
        self.hash == NULL_OUTPOINT_HASH && self.index == NULL_OUTPOINT_INDEX
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", hex::encode(self.hash), self.index)
    }
}

/// Transaction input: the output being spent and the spender's signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub prevout: OutPoint,
    pub signature: ByteString,
}

/// Transaction output: a value locked to a public key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub value: Amount,
    pub public_key: ByteString,
}

/// Transaction with ordered inputs and outputs.
///
/// Inputs and outputs only change through the builder methods, each of which
/// clears the hash cached by [`Transaction::finalize`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
    #[serde(skip)]
    hash: Option<Hash>,
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.inputs == other.inputs && self.outputs == other.outputs
    }
}

impl Eq for Transaction {}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Transaction {
    pub fn new() -> Self {
        Self {
            inputs: Vec::new(),
            outputs: Vec::new(),
            hash: None,
        }
    }

    /// Coinbase paying `value` to `public_key`.
    ///
    /// The height is written into the coinbase input so two coinbases paying the
    /// same key at different heights never share a hash.
    pub fn coinbase(value: Amount, public_key: ByteString, height: Natural) -> Self {
        let mut tx = Self::new();
        tx.inputs.push(TransactionInput {
            prevout: OutPoint::null(),
            signature: height.to_le_bytes().to_vec(),
        });
        tx.add_output(value, public_key);
        tx.finalize();
        tx
    }

    pub fn inputs(&self) -> &[TransactionInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    pub fn add_input(&mut self, prevout: OutPoint) {
        self.inputs.push(TransactionInput {
            prevout,
            signature: Vec::new(),
        });
        self.hash = None;
    }

    pub fn add_output(&mut self, value: Amount, public_key: ByteString) {
        self.outputs.push(TransactionOutput { value, public_key });
        self.hash = None;
    }

    /// Attach a signature to input `index`. Returns false if there is no such input.
    pub fn add_signature(&mut self, index: usize, signature: ByteString) -> bool {
        match self.inputs.get_mut(index) {
            Some(input) => {
                input.signature = signature;
                self.hash = None;
                true
            }
            None => false,
        }
    }

    /// Compute and cache the transaction hash
    pub fn finalize(&mut self) -> Hash {
        let hash = sha256d(&self.raw_data());
        self.hash = Some(hash);
        hash
    }

    /// Transaction identifier. Falls back to hashing the current contents when
    /// the transaction has not been finalized.
    pub fn hash(&self) -> Hash {
        self.hash.unwrap_or_else(|| sha256d(&self.raw_data()))
    }

    pub fn is_finalized(&self) -> bool {
        self.hash.is_some()
    }

    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].prevout.is_null()
    }

    /// Canonical message signed by input `index`: that input's prevout followed by
    /// every output.
    pub fn signing_payload(&self, index: usize) -> Option<Vec<u8>> {
        let input = self.inputs.get(index)?;
        let mut data = Vec::with_capacity(36 + self.outputs.len() * 41);
        data.extend_from_slice(&input.prevout.hash);
        data.extend_from_slice(&input.prevout.index.to_le_bytes());
        for output in &self.outputs {
            encode_output(&mut data, output);
        }
        Some(data)
    }

    /// Canonical raw encoding, signatures included
    pub fn raw_data(&self) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&(self.inputs.len() as u32).to_le_bytes());
        for input in &self.inputs {
            data.extend_from_slice(&input.prevout.hash);
            data.extend_from_slice(&input.prevout.index.to_le_bytes());
            data.extend_from_slice(&(input.signature.len() as u32).to_le_bytes());
            data.extend_from_slice(&input.signature);
        }
        data.extend_from_slice(&(self.outputs.len() as u32).to_le_bytes());
        for output in &self.outputs {
            encode_output(&mut data, output);
        }
        data
    }

    /// Sum of output values, `None` on overflow
    pub fn total_output_value(&self) -> Option<Amount> {
        self.outputs
            .iter()
            .try_fold(0i64, |acc, o| acc.checked_add(o.value))
    }

    /// Outpoints created by this transaction, paired with their outputs
    pub fn created_outpoints(&self) -> impl Iterator<Item = (OutPoint, &TransactionOutput)> {
        let hash = self.hash();
        self.outputs
            .iter()
            .enumerate()
            .map(move |(i, output)| (OutPoint::new(hash, i as u32), output))
    }
}

fn encode_output(data: &mut Vec<u8>, output: &TransactionOutput) {
    data.extend_from_slice(&output.value.to_le_bytes());
    data.extend_from_slice(&(output.public_key.len() as u32).to_le_bytes());
    data.extend_from_slice(&output.public_key);
}

/// Block: previous-block link, ordered transactions and one coinbase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub prev_block_hash: Option<Hash>,
    pub transactions: Vec<Transaction>,
    pub coinbase: Transaction,
}

impl Block {
    pub fn new(prev_block_hash: Option<Hash>, coinbase: Transaction) -> Self {
        Self {
            prev_block_hash,
            transactions: Vec::new(),
            coinbase,
        }
    }

    /// Genesis block carrying only a coinbase
    pub fn genesis(coinbase: Transaction) -> Self {
        Self::new(None, coinbase)
    }

    pub fn add_transaction(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_block_hash.is_none()
    }

    /// Block identifier over the parent link, the coinbase and every transaction
    pub fn hash(&self) -> Hash {
        let mut data = Vec::with_capacity(32 * (self.transactions.len() + 3));
        match &self.prev_block_hash {
            Some(prev) => {
                data.push(1);
                data.extend_from_slice(prev);
            }
            None => data.push(0),
        }
        data.extend_from_slice(&self.coinbase.hash());
        for tx in &self.transactions {
            data.extend_from_slice(&tx.hash());
        }
        sha256d(&data)
    }
}

/// Validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(crate::error::TxRejection),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}
