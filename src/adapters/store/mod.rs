//! Local record store adapters
//!
//! The [`RecordStore`] trait is the single persistence contract; the
//! SQLite backend is used in production, the in-memory backend in tests
//! and dry runs.

pub mod memory;
pub mod sqlite;
pub mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{RecordStore, UpsertFailure, UpsertOutcome};
