use secp256k1::Error as SecpError;
use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidInput,
    NotFound,
    AlreadyUsed,
    AddressMismatch,
    InvalidState,
    SigningError,
    StorageError,
    ChainReadError,
    ConfigError,
    SerializationError,
    EncodingError,
    SchemaMismatch,
    StorageLockTimeout,
    Message,
}

#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum MintError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("hash already used: {hash} (status {status})")]
    AlreadyUsed { hash: String, status: String },

    #[error("address mismatch for {hash}: stored={stored} provided={provided}")]
    AddressMismatch { hash: String, stored: String, provided: String },

    #[error("invalid state transition: {from} -> {to}")]
    InvalidState { from: String, to: String },

    #[error("signing failed: {0}")]
    SigningError(String),

    #[error("storage error during {operation}: {details}")]
    StorageError { operation: String, details: String },

    #[error("chain read error during {operation}: {details}")]
    ChainReadError { operation: String, details: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("{format} serialization error: {details}")]
    SerializationError { format: String, details: String },

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("schema mismatch: stored={stored} current={current}")]
    SchemaMismatch { stored: u32, current: u32 },

    #[error("storage lock timeout: {operation} (waited {timeout_secs}s)")]
    StorageLockTimeout { operation: String, timeout_secs: u64 },

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, MintError>;

impl MintError {
    pub fn code(&self) -> ErrorCode {
        match self {
            MintError::InvalidInput(_) => ErrorCode::InvalidInput,
            MintError::NotFound { .. } => ErrorCode::NotFound,
            MintError::AlreadyUsed { .. } => ErrorCode::AlreadyUsed,
            MintError::AddressMismatch { .. } => ErrorCode::AddressMismatch,
            MintError::InvalidState { .. } => ErrorCode::InvalidState,
            MintError::SigningError(_) => ErrorCode::SigningError,
            MintError::StorageError { .. } => ErrorCode::StorageError,
            MintError::ChainReadError { .. } => ErrorCode::ChainReadError,
            MintError::ConfigError(_) => ErrorCode::ConfigError,
            MintError::SerializationError { .. } => ErrorCode::SerializationError,
            MintError::EncodingError(_) => ErrorCode::EncodingError,
            MintError::SchemaMismatch { .. } => ErrorCode::SchemaMismatch,
            MintError::StorageLockTimeout { .. } => ErrorCode::StorageLockTimeout,
            MintError::Message(_) => ErrorCode::Message,
        }
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext { code: self.code(), message: self.to_string() }
    }

    pub fn invalid_input(details: impl Into<String>) -> Self {
        MintError::InvalidInput(details.into())
    }

    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        MintError::NotFound { entity, key: key.into() }
    }

    pub fn already_used(hash: impl Into<String>, status: impl Into<String>) -> Self {
        MintError::AlreadyUsed { hash: hash.into(), status: status.into() }
    }

    pub fn address_mismatch(hash: impl Into<String>, stored: impl Into<String>, provided: impl Into<String>) -> Self {
        MintError::AddressMismatch { hash: hash.into(), stored: stored.into(), provided: provided.into() }
    }
}

impl From<hex::FromHexError> for MintError {
    fn from(err: hex::FromHexError) -> Self {
        MintError::EncodingError(format!("hex decode error: {}", err))
    }
}

impl From<io::Error> for MintError {
    fn from(err: io::Error) -> Self {
        MintError::StorageError { operation: "io".to_string(), details: err.to_string() }
    }
}

impl From<serde_json::Error> for MintError {
    fn from(err: serde_json::Error) -> Self {
        MintError::SerializationError { format: "json".to_string(), details: err.to_string() }
    }
}

impl From<bincode::Error> for MintError {
    fn from(err: bincode::Error) -> Self {
        MintError::SerializationError { format: "bincode".to_string(), details: err.to_string() }
    }
}

impl From<rocksdb::Error> for MintError {
    fn from(err: rocksdb::Error) -> Self {
        MintError::StorageError { operation: "rocksdb".to_string(), details: err.to_string() }
    }
}

impl From<SecpError> for MintError {
    fn from(err: SecpError) -> Self {
        MintError::SigningError(err.to_string())
    }
}

#[macro_export]
macro_rules! storage_err {
    ($op:expr, $err:expr) => {
        $crate::foundation::MintError::StorageError { operation: $op.into(), details: $err.to_string() }
    };
}

#[macro_export]
macro_rules! chain_err {
    ($op:expr, $err:expr) => {
        $crate::foundation::MintError::ChainReadError { operation: $op.into(), details: $err.to_string() }
    };
}

// NOTE: Avoid adding generic "stringly" error conversions here.
// Use structured `MintError` variants at the call site to preserve context.
