//! Session orchestration around the battle engine.
//!
//! This crate owns everything that lives outside the deterministic engine
//! boundary: per-session ownership of state and roll streams, entropy-seeded
//! randomness, asynchronous player input and the final battle report.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the session factory
//! - [`session`] drives one battle turn by turn
//! - [`api`] exposes the provider trait and error types
//! - [`report`] is the serializable end-of-battle record
pub mod api;
pub mod report;
pub mod rng;
pub mod runtime;
pub mod session;

pub use api::{ActionProvider, AutoPilotProvider, Result, ScriptedProvider, SessionError};
pub use report::{BattleReport, CompanionReport};
pub use rng::EntropyRng;
pub use runtime::{BattleRuntime, SessionSpec};
pub use session::BattleSession;
