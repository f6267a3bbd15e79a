use std::collections::HashMap;
use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cryptotasks_core::User;

/// Durable part of the ledger: every user plus the shared pool balance.
///
/// Serialized layout:
///
/// ```json
/// { "users": { "alice": { "username": "alice", ... } }, "tap_balance": 0.3 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: HashMap<String, User>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub tap_balance: Decimal,
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("no snapshot stored")]
    Missing,

    #[error("persistence unavailable: {0}")]
    Unavailable(String),
}

/// Load/save boundary for ledger snapshots.
///
/// `save` is called synchronously after every ledger mutation while the ledger
/// lock is held, so implementations must not call back into the ledger.
pub trait PersistenceGateway: Send + Sync + 'static {
    fn load(&self) -> Result<Snapshot, PersistenceError>;

    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError>;
}
