mod schema;
mod store;
mod util;

pub use store::RocksRequestStore;
