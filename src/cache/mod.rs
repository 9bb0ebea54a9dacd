//! Exact-match and semantic response caches.
//!
//! Both caches are dialect-scoped through a [`CacheNamespace`] and are independent of
//! each other: an entry stored in one is never visible through the other.

pub mod error;
pub mod exact;
pub mod namespace;
pub mod semantic;
pub mod types;


pub use error::{CacheError, CacheResult};
pub use exact::ExactMatchCache;
pub use namespace::{CacheNamespace, EXACT_KEY_PREFIX, SEMANTIC_COLLECTION_PREFIX};
pub use semantic::{DEFAULT_DISTANCE_THRESHOLD, DEFAULT_SEARCH_LIMIT, SemanticCache};
pub use types::{CacheHit, CacheMetadata, CacheStrategy};
