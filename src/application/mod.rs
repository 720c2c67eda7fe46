//! Application layer: command handlers wiring ports to the domain.

pub mod handlers;
