//! Read-through caching on top of Moka.
//!
//! Store backends keep hot rows here and invalidate them on every write,
//! so a cached value is never staler than its TTL.

mod typed;

pub use typed::{CacheConfig, TypedCache};
