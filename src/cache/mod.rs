// Cache module for in-memory response caching.
// Keeps recently fetched lookups local so rapid re-queries skip the network.

pub mod lru;

pub use lru::LruCache;
