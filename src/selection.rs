//! Fee-ordered transaction selection

use crate::crypto::SignatureVerifier;
use crate::error::Result;
use crate::transaction::{calculate_fee, TransactionValidator};
use crate::types::*;
use crate::utxo::UtxoSet;
use log::debug;

/// Picks a mutually valid, fee-maximizing subset of candidate transactions.
pub struct TransactionSelector<'a, V> {
    validator: &'a TransactionValidator<V>,
}

impl<'a, V: SignatureVerifier> TransactionSelector<'a, V> {
    pub fn new(validator: &'a TransactionValidator<V>) -> Self {
        Self { validator }
    }

    /// HandleTxs: 𝒯𝒳* × 𝒰𝒮 → 𝒯𝒳* × 𝒰𝒮
    ///
    /// For candidates txs and UTXO set us:
    /// 1. fee(tx) computed once against the initial us
    /// 2. txs stable-sorted by fee, highest first
    /// 3. each tx checked against the current us; if valid, its inputs are
    ///    removed and its outputs added before the next tx is checked
    /// 4. accepted txs returned in processing order
    ///
    /// A transaction spending an output created earlier in the same batch is
    /// accepted only when its producer is processed first.
    pub fn select(&self, candidates: &[Transaction], utxo_set: &mut UtxoSet) -> Result<Vec<Transaction>> {
        // 1-2. Rank against the initial snapshot
        let mut ranked: Vec<(Amount, &Transaction)> = candidates
            .iter()
            .map(|tx| (calculate_fee(tx, utxo_set), tx))
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0));

        // 3. Validate and apply in rank order
        let mut accepted = Vec::with_capacity(ranked.len());
        for (fee, tx) in ranked {
            match self.validator.check_transaction(tx, utxo_set) {
                ValidationResult::Valid => {
                    utxo_set.apply_transaction(tx)?;
                    accepted.push(tx.clone());
                }
                ValidationResult::Invalid(reason) => {
                    debug!(
                        "Skipping transaction {} (fee {}): {}",
                        hex::encode(tx.hash()),
                        fee,
                        reason
                    );
                }
            }
        }

        Ok(accepted)
    }
}
