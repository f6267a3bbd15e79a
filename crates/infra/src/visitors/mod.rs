//! Visit accounting: per-address sessions, visit counters and "online now".

pub mod registry;
pub mod sweeper;

pub use registry::{RegistryConfig, VisitorRegistry, VisitorSnapshot};
pub use sweeper::{SessionSweeper, SessionSweeperHandle};
