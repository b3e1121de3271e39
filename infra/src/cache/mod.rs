//! Redis-backed ephemeral storage.

pub mod redis_client;
pub mod session_store;

pub use redis_client::RedisClient;
pub use session_store::RedisSessionStore;
