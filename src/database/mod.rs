pub mod manager;
pub mod memory;
pub mod postgres;
pub mod query_builder;
pub mod record;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use record::Record;
pub use repository::Repository;
pub use store::Store;
