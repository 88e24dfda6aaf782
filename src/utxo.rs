//! Unspent transaction output set

use crate::error::{LedgerError, Result};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// UTXO Set: OutPoint → TransactionOutput
///
/// Cloning produces an independent snapshot; speculative work on a clone never
/// touches the original.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoSet {
    utxos: HashMap<OutPoint, TransactionOutput>,
}

impl UtxoSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the output recorded at `outpoint`
    pub fn add_utxo(&mut self, outpoint: OutPoint, output: TransactionOutput) {
        self.utxos.insert(outpoint, output);
    }

    /// Remove and return the output at `outpoint`, if present
    pub fn remove_utxo(&mut self, outpoint: &OutPoint) -> Option<TransactionOutput> {
        self.utxos.remove(outpoint)
    }

    pub fn get(&self, outpoint: &OutPoint) -> Option<&TransactionOutput> {
        self.utxos.get(outpoint)
    }

    pub fn contains(&self, outpoint: &OutPoint) -> bool {
        self.utxos.contains_key(outpoint)
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OutPoint, &TransactionOutput)> {
        self.utxos.iter()
    }

    /// All outpoints, sorted for stable iteration
    pub fn outpoints(&self) -> Vec<OutPoint> {
        let mut all: Vec<OutPoint> = self.utxos.keys().copied().collect();
        all.sort();
        all
    }

    /// Total value held in the set, `None` on overflow
    pub fn total_value(&self) -> Option<Amount> {
        self.utxos
            .values()
            .try_fold(0i64, |acc, o| acc.checked_add(o.value))
    }

    /// Add every output of `tx` keyed by the transaction hash. Inputs are ignored,
    /// which is how coinbase outputs enter the set.
    pub fn add_outputs(&mut self, tx: &Transaction) {
        for (outpoint, output) in tx.created_outpoints() {
            self.utxos.insert(outpoint, output.clone());
        }
    }

    /// ApplyTransaction: remove every spent input, then add every output.
    ///
    /// Each input must be present exactly once. On failure the set is left as it
    /// was before the call.
    pub fn apply_transaction(&mut self, tx: &Transaction) -> Result<()> {
        let mut removed = Vec::with_capacity(tx.inputs().len());
        for input in tx.inputs() {
            match self.utxos.remove(&input.prevout) {
                Some(output) => removed.push((input.prevout, output)),
                None => {
                    for (outpoint, output) in removed {
                        self.utxos.insert(outpoint, output);
                    }
                    return Err(LedgerError::UtxoNotFound(input.prevout.to_string()));
                }
            }
        }
        self.add_outputs(tx);
        Ok(())
    }
}

impl FromIterator<(OutPoint, TransactionOutput)> for UtxoSet {
    fn from_iter<I: IntoIterator<Item = (OutPoint, TransactionOutput)>>(iter: I) -> Self {
        Self {
            utxos: iter.into_iter().collect(),
        }
    }
}
