//! Pending transaction pool

use crate::types::*;
use crate::utxo::UtxoSet;
use std::collections::{HashMap, HashSet};

/// Transactions waiting for inclusion in a block.
///
/// Entries are keyed by transaction hash and iterate in arrival order. The pool
/// performs no validation; that happens at block assembly or block acceptance.
#[derive(Debug, Clone, Default)]
pub struct TransactionPool {
    order: Vec<Hash>,
    entries: HashMap<Hash, Transaction>,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `tx`. Returns false if a transaction with the same hash is already pooled.
    pub fn add_transaction(&mut self, tx: Transaction) -> bool {
        let hash = tx.hash();
        if self.entries.contains_key(&hash) {
            return false;
        }
        self.order.push(hash);
        self.entries.insert(hash, tx);
        true
    }

    pub fn remove_transaction(&mut self, hash: &Hash) -> Option<Transaction> {
        let tx = self.entries.remove(hash)?;
        self.order.retain(|h| h != hash);
        Some(tx)
    }

    pub fn get_transaction(&self, hash: &Hash) -> Option<&Transaction> {
        self.entries.get(hash)
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.entries.contains_key(hash)
    }

    /// Drop every transaction with an input that is neither unspent in `utxo_set`
    /// nor created by another pooled transaction. Returns how many were dropped.
    pub fn retain_spendable(&mut self, utxo_set: &UtxoSet) -> usize {
        let pooled_outputs: HashSet<OutPoint> = self
            .entries
            .values()
            .flat_map(|tx| tx.created_outpoints().map(|(op, _)| op))
            .collect();

        let before = self.entries.len();
        self.entries.retain(|_, tx| {
            tx.inputs()
                .iter()
                .all(|input| utxo_set.contains(&input.prevout) || pooled_outputs.contains(&input.prevout))
        });
        let entries = &self.entries;
        self.order.retain(|h| entries.contains_key(h));
        before - self.entries.len()
    }

    /// Pooled transactions in arrival order
    pub fn transactions(&self) -> Vec<Transaction> {
        self.order
            .iter()
            .filter_map(|h| self.entries.get(h))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
