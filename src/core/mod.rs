//! Core framework: the typed workspace event bus.

pub mod bus;

pub use bus::{EventQueue, WorkspaceEvent};
