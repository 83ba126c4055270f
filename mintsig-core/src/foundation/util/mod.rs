pub mod encoding;
pub mod time;

pub use encoding::{decode_hex, parse_hex_20bytes, parse_hex_32bytes, strip_hex_prefix};
pub use time::unix_now_secs;
