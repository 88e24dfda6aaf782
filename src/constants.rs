//! Ledger constants

/// How many generations behind the tip a block may still attach
pub const CUT_OFF_AGE: u64 = 10;

/// Default coinbase reward per block
pub const COINBASE_VALUE: i64 = 25;

/// Prevout hash used by coinbase inputs
pub const NULL_OUTPOINT_HASH: [u8; 32] = [0u8; 32];

/// Prevout index used by coinbase inputs
pub const NULL_OUTPOINT_INDEX: u32 = u32::MAX;

/// Length of a compact ECDSA signature
pub const COMPACT_SIGNATURE_SIZE: usize = 64;
