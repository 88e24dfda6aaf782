//! Error and rejection types
//!
//! `LedgerError` is reserved for faults. Rejected transactions and blocks are
//! ordinary outcomes and are reported through [`TxRejection`] and
//! [`BlockRejection`] instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("UTXO not found: {0}")]
    UtxoNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Why a transaction failed validation against a UTXO set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxRejection {
    #[error("input {input} spends an output missing from the UTXO set")]
    MissingUtxo { input: usize },

    #[error("input {input} carries an invalid signature")]
    InvalidSignature { input: usize },

    #[error("input {input} claims an output already claimed by this transaction")]
    DuplicateInput { input: usize },

    #[error("output {output} has negative value {value}")]
    NegativeOutput { output: usize, value: i64 },

    #[error("inputs total {input_total} is less than outputs total {output_total}")]
    InsufficientInput { input_total: i64, output_total: i64 },

    #[error("value arithmetic overflowed")]
    ValueOverflow,
}

/// Why a block was not added to the chain
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockRejection {
    #[error("block has no previous-block reference")]
    MissingPrevHash,

    #[error("block {0} is already part of the chain")]
    DuplicateBlock(String),

    #[error("parent block {0} is unknown")]
    UnknownParent(String),

    #[error("only {accepted} of {declared} transactions are valid")]
    InvalidTransactions { accepted: usize, declared: usize },

    #[error("block height {height} is too far behind tip height {tip_height}")]
    TooDeep { height: u64, tip_height: u64 },
}
