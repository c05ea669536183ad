pub mod store;
pub mod tiered;

pub use store::{KeyValueStore, SqliteStore, StoreError};
pub use tiered::{CacheStats, STORAGE_PREFIX, TieredCache};
