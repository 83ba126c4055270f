pub use memory::MemoryRequestStore;
pub use rocks::RocksRequestStore;
pub use traits::*;
pub mod memory;
pub mod rocks;
pub mod traits;
