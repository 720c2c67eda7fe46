//! Adapters: concrete implementations of the ports.
//!
//! Only offline adapters live in this crate: scripted oracles for tests and
//! demos, and an in-memory repository. Network-backed oracle adapters plug
//! in through the same ports.

pub mod oracles;
pub mod persistence;
