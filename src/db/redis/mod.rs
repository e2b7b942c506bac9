pub mod profiles;

pub use profiles::create_redis_client;
pub use profiles::RedisProfileStore;
pub use profiles::StoreKey;
