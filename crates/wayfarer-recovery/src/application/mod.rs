//! Operations for the Failure & Recovery context.

pub mod recovery_system;
