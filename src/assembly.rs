//! Block assembly on top of the current tip

use crate::chain::ChainState;
use crate::crypto::SignatureVerifier;
use crate::error::Result;
use crate::selection::TransactionSelector;
use crate::types::*;
use log::debug;

/// CreateBlock: 𝒞𝒮 × 𝕊 → ℬ
///
/// For chain cs and coinbase key k:
/// 1. parent = tip of cs, height = height(tip) + 1
/// 2. select from the pool against a copy of the tip's UTXO set
/// 3. coinbase pays cs.coinbase_value to k at height
///
/// The chain is not modified.
pub fn create_block<V: SignatureVerifier>(chain: &ChainState<V>, coinbase_key: &[u8]) -> Result<Block> {
    // 1. Parent
    let parent_hash = chain.tip_hash();
    let height = chain.max_height() + 1;

    // 2. Transactions
    let mut utxo_set = chain.get_max_height_utxo_pool();
    let candidates = chain.get_transaction_pool().transactions();
    let selected = TransactionSelector::new(chain.validator()).select(&candidates, &mut utxo_set)?;
    debug!(
        "Assembling block at height {} with {} of {} pooled transactions",
        height,
        selected.len(),
        candidates.len()
    );

    // 3. Coinbase
    let coinbase = Transaction::coinbase(chain.config().coinbase_value, coinbase_key.to_vec(), height);
    let mut block = Block::new(Some(parent_hash), coinbase);
    for tx in selected {
        block.add_transaction(tx);
    }
    Ok(block)
}

/// Assemble a block with [`create_block`] and offer it to the chain.
///
/// Returns the block when the chain accepted it.
pub fn create_and_add_block<V: SignatureVerifier>(
    chain: &mut ChainState<V>,
    coinbase_key: &[u8],
) -> Result<Option<Block>> {
    let block = create_block(chain, coinbase_key)?;
    if chain.add_block(block.clone())?.is_accepted() {
        Ok(Some(block))
    } else {
        Ok(None)
    }
}
