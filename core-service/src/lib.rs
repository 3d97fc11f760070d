//! Song catalog service façade.
//!
//! [`SongCatalogService`] implements the catalog operations (create, list,
//! show, update, lyrics, info, delete) on top of any [`SongRepository`]
//! implementation and shapes results into response envelopes. Transports
//! hand over raw parameters and map [`CatalogError`] variants to their own
//! status codes.
//!
//! [`SongRepository`]: core_library::SongRepository

pub mod catalog;
pub mod error;
pub mod params;
pub mod response;

pub use catalog::SongCatalogService;
pub use error::{CatalogError, Result};
pub use params::{InfoParams, ListParams, LyricsParams};
pub use response::{
    DataEnvelope, InfoData, ListEnvelope, LyricsData, SongData, SongListItem, SongPage,
};
