// Service exports
pub mod memory;
pub mod postgres;
pub mod storage;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use storage::{MatchStore, StoreError};
