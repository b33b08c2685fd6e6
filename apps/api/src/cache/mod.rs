//! Shared ephemeral cache for generated content that is not user-specific
//! (quizzes by title, job listings by query and location).
//!
//! Read-through, write-on-miss, fixed TTL. Backend failures are treated as
//! misses: the cache can make a request faster, never make it fail.

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

pub mod memory;
pub mod redis_cache;

pub use memory::MemoryCache;
pub use redis_cache::RedisCache;

/// Lifetime of every shared cache entry: 24 hours.
pub const SHARED_TTL: Duration = Duration::from_secs(86_400);

#[async_trait]
pub trait SharedCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String, ttl: Duration);
}

/// Reads and deserializes a cached value. Undecodable entries count as misses.
pub async fn read_json<T: DeserializeOwned>(cache: &dyn SharedCache, key: &str) -> Option<T> {
    let raw = cache.get(key).await?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, "Discarding undecodable cache entry: {e}");
            None
        }
    }
}

/// Serializes and stores a value with the shared TTL.
pub async fn write_json<T: Serialize>(cache: &dyn SharedCache, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => cache.set(key, raw, SHARED_TTL).await,
        Err(e) => warn!(key, "Could not serialize value for cache: {e}"),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Key construction
// ────────────────────────────────────────────────────────────────────────────

/// Lowercases, trims and joins whitespace-separated words with `_`.
pub fn normalize_segment(input: &str) -> String {
    input
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Key for a job search. An empty location leaves an empty trailing segment.
pub fn job_search_key(query: &str, location: &str) -> String {
    format!(
        "jobs_v2_{}_{}",
        normalize_segment(query),
        normalize_segment(location)
    )
}

/// Key for a quiz shared across every internship with the same title.
pub fn quiz_key(title: &str) -> String {
    let safe_title: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("quiz_shared_{safe_title}")
}
