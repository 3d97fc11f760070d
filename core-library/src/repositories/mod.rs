//! # Repository Pattern Implementation
//!
//! Repository traits and implementations for data access.
//!
//! - Traits define the interface so callers can substitute test doubles
//! - SQLite implementations use sqlx for async database access
//! - All operations return `Result<T>` for error handling
//! - Pagination is described by `PageRequest` and returned as `Page<T>`

pub mod pagination;
pub mod song;

pub use pagination::{Page, PageRequest};
pub use song::{SongRepository, SqliteSongRepository};
