use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client};

use crate::services::ServiceError;

use super::CacheStore;

/// Redis-backed cache store.
#[derive(Clone)]
pub struct RedisCacheStore {
    _client: Client,
    manager: ConnectionManager,
}

impl RedisCacheStore {
    pub async fn new(url: &str) -> Result<Self, ServiceError> {
        tracing::info!(url = %url, "Connecting to Redis");
        let client = Client::open(url)
            .map_err(|e| ServiceError::Cache(anyhow::anyhow!("Invalid Redis URL: {}", e)))?;

        // ConnectionManager reconnects automatically
        let manager = client.get_connection_manager().await.map_err(|e| {
            tracing::error!("Failed to get Redis connection manager: {}", e);
            ServiceError::Cache(anyhow::anyhow!("Failed to connect to Redis: {}", e))
        })?;

        tracing::info!("Successfully connected to Redis");

        Ok(Self {
            _client: client,
            manager,
        })
    }

    pub async fn health_check(&self) -> Result<(), ServiceError> {
        let mut conn = self.manager.clone();
        redis::cmd("PING")
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| ServiceError::Cache(anyhow::anyhow!("Redis health check failed: {}", e)))
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        let mut conn = self.manager.clone();
        redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| ServiceError::Cache(anyhow::anyhow!("Failed to get cache: {}", e)))
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), ServiceError> {
        let mut conn = self.manager.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await
            .map_err(|e| ServiceError::Cache(anyhow::anyhow!("Failed to set cache: {}", e)))
    }

    async fn remove(&self, key: &str) -> Result<(), ServiceError> {
        let mut conn = self.manager.clone();
        redis::cmd("DEL")
            .arg(key)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| ServiceError::Cache(anyhow::anyhow!("Failed to remove cache key: {}", e)))
    }

    async fn exists(&self, key: &str) -> Result<bool, ServiceError> {
        let mut conn = self.manager.clone();
        redis::cmd("EXISTS")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| ServiceError::Cache(anyhow::anyhow!("Failed to check cache key: {}", e)))
    }
}
