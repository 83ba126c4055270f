//! Foundation layer: shared primitives grouped for the layered architecture.

pub mod constants;
pub mod error;
pub mod types;
pub mod util;

pub use constants::*;
pub use error::*;
pub use types::*;
pub use util::encoding::{decode_hex, parse_hex_20bytes, parse_hex_32bytes, strip_hex_prefix};
pub use util::time::unix_now_secs;
