//! HTTP surface and background runtime for the mint-signature service.

pub mod api;
pub mod service;
