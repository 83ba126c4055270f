pub mod request;
pub mod signing;

pub use request::{MintRequest, RequestStatus};
pub use signing::{mint_digest, recover_signer, MintSigner, VrsSignature};
