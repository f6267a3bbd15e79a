//! Ledger snapshot persistence boundary.
//!
//! The ledger only ever talks to a `PersistenceGateway`; the on-disk format is
//! owned by the adapters in this module.

pub mod in_memory;
pub mod json_file;
pub mod r#trait;

pub use in_memory::InMemoryGateway;
pub use json_file::JsonFileGateway;
pub use r#trait::{PersistenceError, PersistenceGateway, Snapshot};
