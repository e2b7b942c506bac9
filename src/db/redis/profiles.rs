use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;

use crate::{
    db::ProfileStore,
    error::{AppError, AppResult},
    models::{UserDocument, UserProfile},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    User(String),
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKey::User(id) => write!(f, "user:{}", id),
        }
    }
}

/// Creates a Redis client for the profile store
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Read-only access to user documents kept in Redis
///
/// Each user is a JSON document at `user:{id}` holding `searchHistory` and
/// `clickHistory` arrays.
#[derive(Clone)]
pub struct RedisProfileStore {
    redis_client: Client,
}

impl RedisProfileStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }

    async fn get_document(&self, key: &StoreKey) -> AppResult<Option<UserDocument>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let stored: Option<String> = conn.get(key.to_string()).await?;

        match stored {
            Some(json) => {
                let document = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Malformed user document at {}: {}", key, e))
                })?;
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }
}

#[async_trait::async_trait]
impl ProfileStore for RedisProfileStore {
    async fn fetch_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        let document = self.get_document(&StoreKey::User(user_id.to_string())).await?;

        tracing::debug!(user_id = %user_id, found = document.is_some(), "Fetched user document");

        Ok(document.map(UserProfile::from))
    }
}
