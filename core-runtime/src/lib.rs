//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the music library service:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the other crates depend on.
//! It establishes the logging conventions and the environment-driven
//! configuration used by the HTTP server binary.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{AppConfig, Environment};
pub use error::{Error, Result};
