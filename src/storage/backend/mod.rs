//! Store backends
//!
//! - `memory`: DashMap-backed table with an interval TTL sweeper
//! - `redis`: one hash per record, TTL enforced by Redis `EXPIREAT`

mod memory;
mod redis;

pub use memory::{MemoryStore, spawn_sweeper};
pub use redis::RedisStore;
