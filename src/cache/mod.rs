//! Read-through cache for catalog listings.
//!
//! Backed by Redis when `REDIS_URL` is set. Without it every call is a miss
//! and writes are dropped, so callers never branch on whether caching is on.
//! Cache failures are logged and treated as misses.

use crate::redis_client::RedisClient;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

pub mod catalog;

#[derive(Clone)]
pub struct CacheService {
    redis: Option<RedisClient>,
    ttl_seconds: u64,
}

impl CacheService {
    pub fn new(redis: RedisClient, ttl_seconds: u64) -> Self {
        Self {
            redis: Some(redis),
            ttl_seconds,
        }
    }

    pub fn disabled() -> Self {
        Self {
            redis: None,
            ttl_seconds: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.redis.is_some()
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let redis = self.redis.as_ref()?;
        let mut conn = redis.conn.clone();

        let data: Option<String> = match conn.get(key).await {
            Ok(data) => data,
            Err(e) => {
                warn!(key, error = %e, "cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&data?) {
            Ok(value) => {
                debug!(key, "cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(key, error = %e, "cached value did not parse");
                None
            }
        }
    }

    async fn put_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let Some(redis) = self.redis.as_ref() else {
            return;
        };
        let data = match serde_json::to_string(value) {
            Ok(data) => data,
            Err(e) => {
                warn!(key, error = %e, "cache serialize failed");
                return;
            }
        };
        let mut conn = redis.conn.clone();
        if let Err(e) = conn.set_ex::<_, _, ()>(key, data, self.ttl_seconds).await {
            warn!(key, error = %e, "cache write failed");
        }
    }

    async fn invalidate(&self, key: &str) {
        let Some(redis) = self.redis.as_ref() else {
            return;
        };
        let mut conn = redis.conn.clone();
        if let Err(e) = conn.del::<_, ()>(key).await {
            warn!(key, error = %e, "cache invalidation failed");
        }
    }
}
