pub mod reconciliation;

pub use reconciliation::ReconciliationTask;
