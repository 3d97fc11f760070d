//! # Song Catalog Library
//!
//! Owns the song catalog database and the query logic layered on top of it.
//!
//! ## Overview
//!
//! This crate manages:
//! - SQLite connection pooling and migrations
//! - The `Song` domain model
//! - The song repository (record store) with soft deletion
//! - Pagination of listings (`PageRequest`, `Page<T>`)
//! - Filter composition for listings (`SongFilter`, `Projection`)
//! - Line windowing over stored lyrics (`LyricsWindow`)

pub mod db;
pub mod error;
pub mod lyrics;
pub mod models;
pub mod query;
pub mod repositories;

pub use error::{LibraryError, Result};
pub use lyrics::LyricsWindow;
pub use models::{NewSong, Song, SongChanges, SongId, SongInfo, SongSummary};
pub use query::{fold_case, Projection, SongFilter};
pub use repositories::{Page, PageRequest, SongRepository, SqliteSongRepository};
