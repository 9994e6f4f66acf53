//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the session and orchestration code can stay focused on driving battles.

pub mod errors;
pub mod providers;

pub use errors::{Result, SessionError};
pub use providers::{ActionProvider, AutoPilotProvider, ScriptedProvider};
