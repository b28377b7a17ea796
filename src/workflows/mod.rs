//! Reference workflow tables.
//!
//! These fix the transition shapes shared by the services that drive each
//! entity's lifecycle. The services supply the guard implementations
//! (business rules are theirs, not the engine's) and persist the current
//! state after each accepted transition.

pub mod lead;
pub mod proposal;
