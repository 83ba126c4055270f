pub mod state_machine;
pub mod types;

pub use state_machine::{
    ensure_valid_transition, is_terminal, validate_transition, BINDABLE_STATUSES, SIGNABLE_STATUSES,
};
pub use types::{MintRequest, RequestStatus};
