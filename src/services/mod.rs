// Service exports
pub mod cache;
pub mod upstream;

pub use cache::{CacheError, CacheKey, CacheStats, ResponseCache};
pub use upstream::{UpstreamClient, UpstreamError};
