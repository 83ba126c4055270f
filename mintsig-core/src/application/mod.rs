//! Application layer: orchestration across domain logic and infrastructure I/O.

pub mod lifecycle;
pub mod reconcile;

pub use lifecycle::{MintLifecycle, MintSignature};
pub use reconcile::{ReconcileSummary, Reconciler};
