//! Fork-aware block tree
//!
//! Every retained block owns the UTXO set that results from applying it, so a
//! block on any recent branch can be validated against its own parent without
//! replaying history. Branches that fall more than the cut-off age behind the
//! tip stop accepting children and are pruned.

use crate::config::ChainConfig;
use crate::crypto::{Secp256k1Verifier, SignatureVerifier};
use crate::error::{BlockRejection, Result};
use crate::pool::TransactionPool;
use crate::selection::TransactionSelector;
use crate::transaction::TransactionValidator;
use crate::types::*;
use crate::utxo::UtxoSet;
use log::{debug, info, warn};
use std::collections::HashMap;

/// A retained block with its height and post-block UTXO set
#[derive(Debug, Clone)]
pub struct BlockNode {
    pub block: Block,
    pub height: Natural,
    utxo_set: UtxoSet,
}

impl BlockNode {
    pub fn utxo_set(&self) -> &UtxoSet {
        &self.utxo_set
    }
}

/// Outcome of offering a block to the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockStatus {
    Accepted { height: Natural, new_tip: bool },
    Rejected(BlockRejection),
}

impl BlockStatus {
    pub fn is_accepted(&self) -> bool {
        matches!(self, BlockStatus::Accepted { .. })
    }
}

pub struct ChainState<V = Secp256k1Verifier> {
    nodes: HashMap<Hash, BlockNode>,
    tip: Hash,
    tx_pool: TransactionPool,
    config: ChainConfig,
    validator: TransactionValidator<V>,
}

impl ChainState<Secp256k1Verifier> {
    /// Chain rooted at `genesis` with the default configuration
    pub fn new(genesis: Block) -> Self {
        Self::build(genesis, ChainConfig::default(), Secp256k1Verifier::new())
    }

    pub fn with_config(genesis: Block, config: ChainConfig) -> Result<Self> {
        Self::with_verifier(genesis, config, Secp256k1Verifier::new())
    }
}

impl<V: SignatureVerifier> ChainState<V> {
    pub fn with_verifier(genesis: Block, config: ChainConfig, verifier: V) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(genesis, config, verifier))
    }

    fn build(genesis: Block, config: ChainConfig, verifier: V) -> Self {
        let mut utxo_set = UtxoSet::new();
        utxo_set.add_outputs(&genesis.coinbase);

        let hash = genesis.hash();
        info!("Chain initialized at genesis {}", hex::encode(hash));

        let mut nodes = HashMap::new();
        nodes.insert(
            hash,
            BlockNode {
                block: genesis,
                height: 0,
                utxo_set,
            },
        );

        Self {
            nodes,
            tip: hash,
            tx_pool: TransactionPool::new(),
            config,
            validator: TransactionValidator::new(verifier),
        }
    }

    /// AddBlock: ℬ × 𝒞𝒮 → {accepted, rejected} × 𝒞𝒮
    ///
    /// For block b with parent p:
    /// 1. b must name a parent, must not already be retained, and p must be retained
    /// 2. every transaction of b must be accepted by the selector against a copy
    ///    of p's UTXO set
    /// 3. height(b) = height(p) + 1 must exceed height(tip) - cut_off_age
    /// 4. coinbase outputs are added, the node is registered, and the tip moves
    ///    if height(b) > height(tip)
    /// 5. b's transactions leave the pool, pool entries unspendable at a new tip
    ///    are evicted, and stale nodes are pruned
    ///
    /// A rejected block leaves the chain untouched.
    pub fn add_block(&mut self, block: Block) -> Result<BlockStatus> {
        let hash = block.hash();
        let status = self.connect_block(block, hash)?;
        match &status {
            BlockStatus::Accepted { height, new_tip } => {
                info!(
                    "Accepted block {} at height {}{}",
                    hex::encode(hash),
                    height,
                    if *new_tip { " (new tip)" } else { "" }
                );
            }
            BlockStatus::Rejected(reason) => {
                warn!("Rejected block {}: {}", hex::encode(hash), reason);
            }
        }
        Ok(status)
    }

    fn connect_block(&mut self, block: Block, hash: Hash) -> Result<BlockStatus> {
        // 1. Parent linkage
        let parent_hash = match block.prev_block_hash {
            Some(prev) => prev,
            None => return Ok(BlockStatus::Rejected(BlockRejection::MissingPrevHash)),
        };
        if self.nodes.contains_key(&hash) {
            return Ok(BlockStatus::Rejected(BlockRejection::DuplicateBlock(
                hex::encode(hash),
            )));
        }
        let parent = match self.nodes.get(&parent_hash) {
            Some(parent) => parent,
            None => {
                return Ok(BlockStatus::Rejected(BlockRejection::UnknownParent(
                    hex::encode(parent_hash),
                )))
            }
        };

        // 2. Transactions, on a scratch copy of the parent's set
        let mut utxo_set = parent.utxo_set.clone();
        let accepted = TransactionSelector::new(&self.validator)
            .select(&block.transactions, &mut utxo_set)?;
        if accepted.len() != block.transactions.len() {
            return Ok(BlockStatus::Rejected(BlockRejection::InvalidTransactions {
                accepted: accepted.len(),
                declared: block.transactions.len(),
            }));
        }

        // 3. Depth
        let height = parent.height + 1;
        let tip_height = self.max_height();
        if tip_height >= self.config.cut_off_age && height <= tip_height - self.config.cut_off_age {
            return Ok(BlockStatus::Rejected(BlockRejection::TooDeep { height, tip_height }));
        }

        // 4. Commit
        utxo_set.add_outputs(&block.coinbase);
        for tx in &block.transactions {
            self.tx_pool.remove_transaction(&tx.hash());
        }
        self.nodes.insert(
            hash,
            BlockNode {
                block,
                height,
                utxo_set,
            },
        );
        let new_tip = height > tip_height;
        if new_tip {
            self.tip = hash;
            let evicted = self.tx_pool.retain_spendable(&self.nodes[&hash].utxo_set);
            if evicted > 0 {
                debug!("Evicted {} pooled transaction(s) unspendable at the new tip", evicted);
            }
        }

        // 5. Bound memory
        self.prune();

        Ok(BlockStatus::Accepted { height, new_tip })
    }

    /// Drop every node that can no longer parent an acceptable block
    fn prune(&mut self) {
        let tip_height = self.max_height();
        if tip_height <= self.config.cut_off_age {
            return;
        }
        let min_height = tip_height - self.config.cut_off_age;
        let before = self.nodes.len();
        self.nodes.retain(|_, node| node.height >= min_height);
        let pruned = before - self.nodes.len();
        if pruned > 0 {
            debug!("Pruned {} block(s) below height {}", pruned, min_height);
        }
    }

    fn tip_node(&self) -> &BlockNode {
        // The tip is never pruned: it sits at the maximum height
        &self.nodes[&self.tip]
    }

    /// The block at the tip of the tallest retained branch
    pub fn get_max_height_block(&self) -> &Block {
        &self.tip_node().block
    }

    /// Copy of the UTXO set at the tip
    pub fn get_max_height_utxo_pool(&self) -> UtxoSet {
        self.tip_node().utxo_set.clone()
    }

    pub fn get_transaction_pool(&self) -> &TransactionPool {
        &self.tx_pool
    }

    /// Queue `tx` for inclusion. No validation is performed here.
    pub fn add_transaction(&mut self, tx: Transaction) {
        if !self.tx_pool.add_transaction(tx) {
            debug!("Transaction already pooled");
        }
    }

    pub fn max_height(&self) -> Natural {
        self.tip_node().height
    }

    pub fn tip_hash(&self) -> Hash {
        self.tip
    }

    pub fn block_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains_block(&self, hash: &Hash) -> bool {
        self.nodes.contains_key(hash)
    }

    pub fn height_of(&self, hash: &Hash) -> Option<Natural> {
        self.nodes.get(hash).map(|node| node.height)
    }

    pub fn node(&self, hash: &Hash) -> Option<&BlockNode> {
        self.nodes.get(hash)
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub(crate) fn validator(&self) -> &TransactionValidator<V> {
        &self.validator
    }
}
