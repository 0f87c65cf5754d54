//! Application Layer
//!
//! Orchestration of the hosted services' lifecycle.

pub mod orchestrator;

pub use orchestrator::{AuxTask, Orchestrator, RunError, DEFAULT_SHUTDOWN_GRACE};
