//! Simulated host for the spawn engine.
//!
//! A [`script::Script`] declares worlds, integrations, players and a list of
//! events; [`replay::Session`] feeds the events through the listener and the
//! admin commands and reports what the server would do.

pub mod replay;
pub mod script;

pub use replay::{ReplayStep, Session};
pub use script::{Script, ScriptEvent, ScriptPlayer};
