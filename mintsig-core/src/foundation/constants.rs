//! System-wide constants for the mint-signature service.

/// Raw recoverable ECDSA signature size: 64 compact bytes plus one recovery byte.
pub const RAW_SIGNATURE_SIZE: usize = 65;

/// Compact ECDSA signature size (r ++ s).
pub const COMPACT_SIGNATURE_SIZE: usize = 64;

/// Chain address size in bytes.
pub const ADDRESS_SIZE: usize = 20;

/// Request/transaction hash size in bytes.
pub const HASH_SIZE: usize = 32;

/// Offset added to the raw recovery id to produce the chain-canonical `v`.
pub const V_OFFSET: u8 = 27;

/// Env var overriding the wall clock, for deterministic tests.
pub const TEST_NOW_SECS_ENV_VAR: &str = "MINTSIG_TEST_NOW_SECS";

/// Bound on waiting for a storage mutex before reporting a lock timeout.
pub const STORAGE_LOCK_TIMEOUT_SECS: u64 = 5;
