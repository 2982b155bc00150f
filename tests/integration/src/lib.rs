//! Integration test utilities for the inbox server
//!
//! Spawns the REST API on an ephemeral port, backed by the in-memory store,
//! and drives it over real HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
