//! Stride Coach - Conversational Running Coach
//!
//! This crate turns a free-form coaching conversation into a personalized,
//! periodized multi-week training plan. A finite-state dialogue engine
//! elicits a structured athlete profile through oracle-backed judgments
//! (classification, extraction, coherence verification), and a
//! deterministic periodization engine expands the resulting strategy into
//! exact weekly volume and long-run targets.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
