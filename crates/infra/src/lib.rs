//! Infrastructure layer: shared in-process state, background sweeping, and
//! snapshot persistence.

pub mod ledger;
pub mod persistence;
pub mod visitors;

pub use ledger::{AccountView, BalanceLedger, DEFAULT_SESSION_TTL_HOURS};
pub use visitors::{
    RegistryConfig, SessionSweeper, SessionSweeperHandle, VisitorRegistry, VisitorSnapshot,
};
