//! `cryptotasks-core` — domain building blocks for the tap game.
//!
//! This crate contains **pure domain** types (no locking, no I/O).

pub mod error;
pub mod id;
pub mod task;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use id::{SessionKey, SessionToken};
pub use task::{Task, sample_tasks};
pub use user::{REGISTRATION_BONUS, TAP_QUANTUM, User};
