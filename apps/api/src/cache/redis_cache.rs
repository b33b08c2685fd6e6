use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::warn;

use super::SharedCache;

/// Shared cache backed by Redis `GET` / `SET EX`.
///
/// A connection is opened per operation from the multiplexed client; any
/// Redis failure is logged and reported as a miss or a skipped write.
#[derive(Clone)]
pub struct RedisCache {
    client: redis::Client,
}

impl RedisCache {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    async fn connection(&self) -> redis::RedisResult<redis::aio::MultiplexedConnection> {
        self.client.get_multiplexed_async_connection().await
    }
}

#[async_trait]
impl SharedCache for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        let result: redis::RedisResult<Option<String>> = async {
            let mut conn = self.connection().await?;
            conn.get(key).await
        }
        .await;

        result.unwrap_or_else(|e| {
            warn!(key, "Redis GET failed, treating as miss: {e}");
            None
        })
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        let result: redis::RedisResult<()> = async {
            let mut conn = self.connection().await?;
            conn.set_ex(key, value, ttl.as_secs()).await
        }
        .await;

        if let Err(e) = result {
            warn!(key, "Redis SET failed, entry not cached: {e}");
        }
    }
}
