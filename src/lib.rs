//! # UTXO Ledger
//!
//! A minimal fork-aware cryptocurrency ledger built on an unspent transaction
//! output (UTXO) model.
//!
//! ## Architecture
//!
//! The crate is layered, leaves first:
//! - [`utxo`]: the unspent output set
//! - [`transaction`]: validation of one transaction against a UTXO set
//! - [`selection`]: fee-ordered greedy selection of a mutually valid subset
//! - [`pool`]: pending transactions
//! - [`chain`]: the block tree with per-block UTXO snapshots, tip tracking and pruning
//! - [`assembly`]: building a block on the current tip from the pool
//!
//! ## Design Principles
//!
//! 1. **Snapshot Then Commit**: Blocks are validated on a copy of their parent's
//!    UTXO set and committed only when every check passes
//! 2. **Rejections Are Values**: Invalid transactions and blocks are reported as
//!    [`ValidationResult`] and [`BlockStatus`], faults as [`LedgerError`]
//! 3. **Pluggable Signatures**: Validation depends only on [`SignatureVerifier`]
//! 4. **Exact Version Pinning**: Cryptographic dependencies are pinned to exact versions
//!
//! ## Usage
//!
//! ```rust
//! use utxo_ledger::{Block, ChainState, Transaction};
//!
//! let key = vec![0x02; 33];
//! let genesis = Block::genesis(Transaction::coinbase(25, key.clone(), 0));
//! let mut chain = ChainState::new(genesis.clone());
//!
//! let next = Block::new(Some(genesis.hash()), Transaction::coinbase(25, key, 1));
//! assert!(chain.add_block(next).unwrap().is_accepted());
//! assert_eq!(chain.max_height(), 1);
//! ```

pub mod types;
pub mod constants;
pub mod crypto;
pub mod utxo;
pub mod transaction;
pub mod selection;
pub mod pool;
pub mod chain;
pub mod assembly;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use types::*;
pub use constants::*;
pub use assembly::{create_and_add_block, create_block};
pub use chain::{BlockNode, BlockStatus, ChainState};
pub use config::ChainConfig;
pub use crypto::{Secp256k1Verifier, SignatureVerifier};
pub use error::{BlockRejection, LedgerError, Result, TxRejection};
pub use pool::TransactionPool;
pub use selection::TransactionSelector;
pub use transaction::{calculate_fee, TransactionValidator};
pub use utxo::UtxoSet;
