//! Repository backends for burrow.
//!
//! Three interchangeable implementations of [`Repository`]: a volatile
//! in-memory map, an embedded SQLite file and a PostgreSQL server. All of
//! them share one error taxonomy and the same atomicity guarantees for
//! `create` and `increment_clicks`.

pub mod memory;
pub mod postgres;
mod row;
pub mod sqlite;

pub use burrow_core::repository::Result;
pub use burrow_core::{ReadRepository, Repository, StorageError};
pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;
pub use sqlite::SqliteRepository;
