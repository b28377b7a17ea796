//! # stateward
//!
//! Embeddable entity lifecycle state machine engine.
//!
//! This crate provides:
//! - Declarative transition tables with construction-time validation
//! - Guarded transitions with typed business rejections
//! - Machine instances recoverable from persisted state
//! - Direct reachability queries for "what can I do next"
//!
//! The engine owns no I/O: loading the persisted state, storing the new
//! one, and whatever a guard queries to make its decision all belong to
//! the caller.

pub mod error;
pub mod guard;
pub mod machine;
pub mod table;
pub mod workflows;

pub use error::{Error, GuardError};
pub use guard::{guard, Guard, GuardPanicked};
pub use machine::{Applied, Machine};
pub use table::{TableBuilder, TransitionTable};
