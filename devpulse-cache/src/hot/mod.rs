//! Hot-tier store implementations.

pub mod memory;
pub mod redis;

pub use memory::InMemoryHotStore;
pub use redis::RedisHotStore;
