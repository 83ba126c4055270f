//! Infrastructure layer: I/O and external integrations.

pub mod chain;
pub mod config;
pub mod storage;
