//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (`core-service`, `api-server`). Hosts can depend on
//! `music-library-workspace` and enable the documented features without wiring
//! each crate individually.

#[cfg(feature = "service")]
pub use core_service;

#[cfg(feature = "http")]
pub use api_server;
