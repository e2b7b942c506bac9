use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::{error::AppResult, models::UserProfile};

pub mod redis;

pub use self::redis::create_redis_client;
pub use self::redis::RedisProfileStore;

/// Source of recorded user interests
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns the union of the user's search and click history, or `None`
    /// when the user is unknown
    async fn fetch_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>>;
}

/// Profile store kept in process memory
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user_id: impl Into<String>, profile: UserProfile) {
        self.profiles.write().await.insert(user_id.into(), profile);
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn fetch_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }
}
